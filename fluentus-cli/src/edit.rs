use fluentus::{Edit, TranslationStore};
use fluentus_cli::validation::parse_attribute_assignment;
use std::path::Path;

/// The field selected on the command line for `set`.
#[derive(Debug, Default)]
pub struct SetTarget {
    pub value: Option<String>,
    pub attribute: Option<String>,
    pub comment: Option<String>,
    pub needs_review: Option<bool>,
}

impl SetTarget {
    fn into_edit(self) -> Result<Edit, String> {
        let mut edits = Vec::new();
        if let Some(value) = self.value {
            edits.push(Edit::Value(value));
        }
        if let Some(assignment) = self.attribute {
            let (name, value) = parse_attribute_assignment(&assignment)?;
            edits.push(Edit::Attribute { name, value });
        }
        if let Some(comment) = self.comment {
            edits.push(Edit::Comment(comment));
        }
        if let Some(flag) = self.needs_review {
            edits.push(Edit::NeedsReview(flag));
        }

        match edits.len() {
            1 => Ok(edits.remove(0)),
            0 => Err(
                "Nothing to set; pass one of --value, --attribute, --comment or --needs-review"
                    .to_string(),
            ),
            _ => Err("Only one of --value, --attribute, --comment or --needs-review may be set at a time".to_string()),
        }
    }
}

fn save(store: &mut TranslationStore, output: &Option<String>) -> Result<(), String> {
    store
        .save(output.as_deref().map(Path::new))
        .map_err(|e| format!("Error writing output: {}", e))?;
    match output {
        Some(out) => println!("📄 Wrote project to {}", out),
        None => println!("📄 Updated project in place"),
    }
    Ok(())
}

pub fn run_set_command(
    store: &mut TranslationStore,
    key: &str,
    lang: &str,
    target: SetTarget,
    output: &Option<String>,
) -> Result<(), String> {
    let edit = target.into_edit()?;
    let field = edit.field_name();

    let changed = store
        .update(key, lang, edit)
        .map_err(|e| format!("{}", e))?;
    if !changed && output.is_none() {
        println!("ℹ️  No changes to {} of '{}' in {}", field, key, lang);
        return Ok(());
    }

    if changed {
        println!("✅ Updated {} of '{}' in {}", field, key, lang);
    }
    save(store, output)
}

/// Rewrite every file of the project in the canonical layout.
pub fn run_format_command(store: &mut TranslationStore, output: &Option<String>) -> Result<(), String> {
    save(store, output)
}
