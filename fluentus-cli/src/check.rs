use fluentus::ast::{Entry, PatternElement, Resource};
use fluentus::traits::Parser;
use fluentus::TranslationStore;
use std::path::PathBuf;
use tracing::error;

/// One fragment the parser could not structure.
#[derive(Debug, PartialEq)]
pub struct JunkReport {
    pub path: PathBuf,
    pub location: String,
    pub content: String,
}

fn entry_junk(entry: &Entry) -> Vec<(String, String)> {
    let (key, patterns) = match entry {
        Entry::Junk(junk) => return vec![("entry".to_string(), junk.to_string())],
        Entry::Message(message) => (
            entry.key().unwrap_or_default(),
            message
                .value
                .iter()
                .map(|value| ("value".to_string(), value))
                .chain(message.attributes.iter().map(|a| (format!(".{}", a.id), &a.value)))
                .collect::<Vec<_>>(),
        ),
        Entry::Term(term) => (
            entry.key().unwrap_or_default(),
            std::iter::once(("value".to_string(), &term.value))
                .chain(term.attributes.iter().map(|a| (format!(".{}", a.id), &a.value)))
                .collect::<Vec<_>>(),
        ),
        Entry::Comment(_) | Entry::Blank(_) => return Vec::new(),
    };

    let mut found = Vec::new();
    for (field, pattern) in patterns {
        for element in &pattern.elements {
            if let PatternElement::Junk(content) = element {
                found.push((format!("{} {}", key, field), content.clone()));
            }
        }
    }
    found
}

/// Re-read every loaded file and collect its junk. A file that cannot be
/// read is reported as a whole and the others are still checked.
pub fn collect_junk(store: &TranslationStore) -> Vec<JunkReport> {
    let mut reports = Vec::new();
    for locale in store.locales() {
        for path in store.files(locale) {
            let resource = match Resource::read_from(path) {
                Ok(resource) => resource,
                Err(e) => {
                    error!("Skipping file {:?}: {}", path, e);
                    reports.push(JunkReport {
                        path: path.clone(),
                        location: "unreadable file".to_string(),
                        content: e.to_string(),
                    });
                    continue;
                }
            };
            for entry in &resource.body {
                for (location, content) in entry_junk(entry) {
                    reports.push(JunkReport {
                        path: path.clone(),
                        location,
                        content,
                    });
                }
            }
        }
    }
    reports
}

/// Print junk per file. Fails when any was found.
pub fn run_check_command(store: &TranslationStore) -> Result<(), String> {
    let reports = collect_junk(store);
    if reports.is_empty() {
        println!("✅ No syntax errors found");
        return Ok(());
    }

    for report in &reports {
        println!("❌ {}: {}", report.path.display(), report.location);
        for line in report.content.lines() {
            println!("    {}", line);
        }
    }
    Err(format!("Found {} unparseable fragment(s)", reports.len()))
}
