use fluentus::ast::Resource;
use fluentus::{Config, Converter, Edit, TranslationRecord, TranslationStore, normalize, parse, serialize};
use proptest::prelude::*;
use std::collections::BTreeMap;
use std::fs;
use std::path::Path;

fn key_strategy() -> impl Strategy<Value = String> {
    proptest::string::string_regex("[a-z][a-z0-9_]{0,15}").expect("valid key regex")
}

fn line_strategy() -> impl Strategy<Value = String> {
    proptest::string::string_regex("[A-Za-z0-9]([A-Za-z0-9 _\\-\\.,!\\?]{0,28}[A-Za-z0-9!\\?])?")
        .expect("valid line regex")
}

fn value_strategy() -> impl Strategy<Value = String> {
    prop::collection::vec(line_strategy(), 1..4).prop_map(|lines| lines.join("\n"))
}

fn record_strategy() -> impl Strategy<Value = TranslationRecord> {
    (
        value_strategy(),
        prop::option::of(line_strategy()),
        prop::option::of(line_strategy()),
        any::<bool>(),
    )
        .prop_map(|(value, title, comment, needs_review)| {
            let mut record = TranslationRecord {
                value,
                comment,
                needs_review,
                ..Default::default()
            };
            if let Some(title) = title {
                record.attributes.insert(".title".to_string(), title);
            }
            record
        })
}

fn dataset_strategy() -> impl Strategy<Value = BTreeMap<String, TranslationRecord>> {
    prop::collection::btree_map(key_strategy(), record_strategy(), 1..8)
}

fn render(records: &BTreeMap<String, TranslationRecord>) -> Result<String, TestCaseError> {
    let converter = Converter::new(Config::default());
    let body = records
        .iter()
        .map(|(key, record)| converter.record_to_entry(key, record))
        .collect::<Result<Vec<_>, _>>()
        .map_err(|e| TestCaseError::fail(e.to_string()))?;
    Ok(serialize(&Resource::new(body)))
}

fn write_project(root: &Path, locale: &str, content: &str) -> Result<(), TestCaseError> {
    let dir = root.join(locale);
    fs::create_dir_all(&dir).map_err(|e| TestCaseError::fail(e.to_string()))?;
    fs::write(dir.join("main.ftl"), content).map_err(|e| TestCaseError::fail(e.to_string()))
}

fn stored_values(store: &TranslationStore, locale: &str) -> BTreeMap<String, TranslationRecord> {
    store
        .keys()
        .map(|key| {
            let mut record = store.get(key, locale).expect("known key");
            record.source_path = None;
            (key.to_string(), record)
        })
        .collect()
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(24))]

    #[test]
    fn rendered_resources_reparse_to_the_same_text(records in dataset_strategy()) {
        let text = render(&records)?;
        let resource = parse(&text);
        prop_assert!(!resource.has_junk(), "junk in {:?}", text);
        prop_assert_eq!(serialize(&resource), text);
    }

    #[test]
    fn store_load_and_save_preserve_records(records in dataset_strategy()) {
        let tmp = tempfile::tempdir().map_err(|e| TestCaseError::fail(e.to_string()))?;
        write_project(tmp.path(), "en", &render(&records)?)?;

        let mut store = TranslationStore::open(tmp.path(), Config::default())
            .map_err(|e| TestCaseError::fail(e.to_string()))?;
        prop_assert_eq!(&stored_values(&store, "en"), &records);

        let output = tempfile::tempdir().map_err(|e| TestCaseError::fail(e.to_string()))?;
        store
            .save(Some(output.path()))
            .map_err(|e| TestCaseError::fail(e.to_string()))?;

        let reloaded = TranslationStore::open(output.path(), Config::default())
            .map_err(|e| TestCaseError::fail(e.to_string()))?;
        prop_assert_eq!(&stored_values(&reloaded, "en"), &records);
    }

    #[test]
    fn repeated_updates_report_no_change(records in dataset_strategy(), value in value_strategy()) {
        let tmp = tempfile::tempdir().map_err(|e| TestCaseError::fail(e.to_string()))?;
        write_project(tmp.path(), "en", &render(&records)?)?;
        let mut store = TranslationStore::open(tmp.path(), Config::default())
            .map_err(|e| TestCaseError::fail(e.to_string()))?;

        let key = records.keys().next().expect("non-empty dataset").clone();
        store
            .update(&key, "en", Edit::value(value.clone()))
            .map_err(|e| TestCaseError::fail(e.to_string()))?;
        let changed = store
            .update(&key, "en", Edit::value(value))
            .map_err(|e| TestCaseError::fail(e.to_string()))?;
        prop_assert!(!changed);
    }

    #[test]
    fn normalize_is_idempotent(value in value_strategy(), trailing in "[ \n]{0,3}") {
        let input = format!("{value}{trailing}");
        let once = normalize(&input, 4);
        prop_assert!(!once.had_junk);
        prop_assert_eq!(&once.text, &input);
        prop_assert_eq!(normalize(&once.text, 4), once);
    }
}
