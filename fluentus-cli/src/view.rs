use fluentus::{TranslationRecord, TranslationStore};
use serde_json::json;
use unicode_width::UnicodeWidthChar;

const PREVIEW_WIDTH: usize = 50;

/// Cut `value` to the preview width in terminal columns, on one line.
fn truncate(value: &str, full: bool) -> String {
    let flat = value.replace('\n', "⏎");
    if full {
        return flat;
    }

    let mut width = 0;
    let mut out = String::new();
    for c in flat.chars() {
        width += c.width().unwrap_or(0);
        if width > PREVIEW_WIDTH {
            out.push_str("...");
            return out;
        }
        out.push(c);
    }
    out
}

fn selected_locales<'a>(store: &'a TranslationStore, lang_filter: &Option<String>) -> Vec<&'a str> {
    store
        .locales()
        .into_iter()
        .filter(|locale| lang_filter.as_deref().is_none_or(|lang| lang == *locale))
        .collect()
}

fn selected_keys<'a>(store: &'a TranslationStore, key_filter: &Option<String>) -> Vec<&'a str> {
    store
        .keys()
        .filter(|key| key_filter.as_deref().is_none_or(|filter| filter == *key))
        .collect()
}

fn record_json(record: &TranslationRecord) -> serde_json::Value {
    json!({
        "value": record.value,
        "attributes": record.attributes,
        "comment": record.comment,
        "needs_review": record.needs_review,
        "source_path": record.source_path,
    })
}

/// Print the records of a project, one block per key.
pub fn print_view(
    store: &TranslationStore,
    lang_filter: &Option<String>,
    key_filter: &Option<String>,
    full: bool,
    json_output: bool,
) -> Result<(), String> {
    let locales = selected_locales(store, lang_filter);
    if locales.is_empty() {
        return Err(match lang_filter {
            Some(lang) => format!("No translations found for language: {}", lang),
            None => "No locale directories found".to_string(),
        });
    }

    let keys = selected_keys(store, key_filter);
    if let Some(key) = key_filter {
        if keys.is_empty() {
            return Err(format!("Key not found: {}", key));
        }
    }

    if json_output {
        let mut body = serde_json::Map::new();
        for key in &keys {
            let mut per_locale = serde_json::Map::new();
            for locale in &locales {
                let record = store.get(key, locale).map_err(|e| e.to_string())?;
                per_locale.insert(locale.to_string(), record_json(&record));
            }
            body.insert(key.to_string(), per_locale.into());
        }
        let text = serde_json::to_string_pretty(&body)
            .map_err(|e| format!("Error serializing to JSON: {}", e))?;
        println!("{}", text);
        return Ok(());
    }

    println!("Locales: {}", locales.join(", "));
    println!("Keys: {}", keys.len());

    for (i, key) in keys.iter().enumerate() {
        println!("\n  Key {}: {}", i + 1, key);
        for locale in &locales {
            let record = store.get(key, locale).map_err(|e| e.to_string())?;
            let review = if record.needs_review { " [needs review]" } else { "" };
            if record.is_blank() {
                println!("    {}: (missing)", locale);
                continue;
            }
            println!("    {}: {}{}", locale, truncate(&record.value, full), review);
            for (name, value) in &record.attributes {
                println!("      {} = {}", name, truncate(value, full));
            }
            if let Some(comment) = &record.comment {
                println!("      # {}", truncate(comment, full));
            }
        }
    }

    Ok(())
}
