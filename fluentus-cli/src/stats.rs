use fluentus::TranslationStore;
use serde_json::json;

#[derive(Default, Debug, PartialEq)]
struct LocaleStats {
    total: usize,
    translated: usize,
    missing: usize,
    needs_review: usize,
}

fn collect(store: &TranslationStore, locale: &str) -> LocaleStats {
    let mut stats = LocaleStats::default();
    for key in store.keys() {
        let record = store.get(key, locale).unwrap_or_default();
        stats.total += 1;
        if record.is_translated() {
            stats.translated += 1;
        } else {
            stats.missing += 1;
        }
        if record.needs_review {
            stats.needs_review += 1;
        }
    }
    stats
}

fn completion(stats: &LocaleStats) -> f64 {
    if stats.total == 0 {
        100.0
    } else {
        (stats.translated as f64) * 100.0 / (stats.total as f64)
    }
}

pub fn print_stats(store: &TranslationStore, lang_filter: &Option<String>, json_output: bool) {
    let locales: Vec<_> = store
        .locales()
        .into_iter()
        .filter(|locale| lang_filter.as_deref().is_none_or(|lang| lang == *locale))
        .collect();

    if json_output {
        let mut per_lang = Vec::new();
        for locale in &locales {
            let stats = collect(store, locale);
            let percent = completion(&stats);
            per_lang.push(json!({
                "language": locale,
                "total": stats.total,
                "translated": stats.translated,
                "missing": stats.missing,
                "needs_review": stats.needs_review,
                "completion_percent": (percent * 100.0).round() / 100.0,
            }));
        }
        let body = json!({
            "summary": {
                "languages": locales.len(),
                "unique_keys": store.len(),
            },
            "languages": per_lang,
        });
        match serde_json::to_string_pretty(&body) {
            Ok(text) => println!("{}", text),
            Err(e) => eprintln!("Error serializing to JSON: {}", e),
        }
        return;
    }

    println!("=== Stats ===");
    println!("Languages: {}", locales.len());
    println!("Unique keys: {}", store.len());

    for locale in &locales {
        let stats = collect(store, locale);
        println!("\nLanguage: {}", locale);
        println!("  Total: {}", stats.total);
        println!("  Translated: {}", stats.translated);
        println!("  Missing: {}", stats.missing);
        println!("  Needs review: {}", stats.needs_review);
        println!("  Completion: {:.2}%", completion(&stats));
    }
}
