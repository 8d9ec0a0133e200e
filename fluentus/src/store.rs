//! In-memory reconciliation cache over a folder of locale directories.
//!
//! The project layout is `<root>/<locale>/<file>.ftl`. Every message and term is
//! flattened into a [`TranslationRecord`] indexed by key and locale, edits go
//! through [`TranslationStore::update`], and [`TranslationStore::save`] writes
//! each record back to the file it came from.
//!
//! Standalone comments and junk of a loaded file are remembered in the file's
//! layout and written back in place, so saving never drops text the parser
//! could not structure.

use std::{
    collections::{HashMap, HashSet},
    fs,
    path::{Path, PathBuf},
};

use indexmap::IndexMap;
use tracing::{debug, error, info, warn};
use unic_langid::LanguageIdentifier;

use crate::{
    ast::{Entry, Resource},
    config::Config,
    converter::Converter,
    error::Error,
    parser::{normalize_line_endings, parse},
    serializer::Serializer,
    traits::decode,
    types::{Edit, TranslationRecord, attribute_key},
};

/// One top-level item of a loaded file.
#[derive(Debug, Clone)]
enum Slot {
    /// A message or term, written from the current record.
    Record(String),
    /// A comment, junk or an entry that could not be converted, written as read.
    Verbatim(Entry),
}

#[derive(Debug, Clone)]
struct FileLayout {
    locale: String,
    slots: Vec<Slot>,
}

/// Translations of every key in every locale of one project folder.
///
/// Not synchronized: wrap it in a lock to share it between threads.
#[derive(Debug, Clone, Default)]
pub struct TranslationStore {
    converter: Converter,
    serializer: Serializer,
    root: Option<PathBuf>,
    records: IndexMap<String, IndexMap<String, TranslationRecord>>,
    /// Locale codes in load order, with the files found in each.
    locales: IndexMap<String, Vec<PathBuf>>,
    layouts: IndexMap<PathBuf, FileLayout>,
    edited: bool,
}

impl TranslationStore {
    /// Creates an empty store. Nothing is loaded until [`Self::load`].
    pub fn new(config: Config) -> Self {
        Self {
            serializer: Serializer::new(config.indent),
            converter: Converter::new(config),
            ..Default::default()
        }
    }

    /// Creates a store and loads `folder` into it.
    pub fn open<P: AsRef<Path>>(folder: P, config: Config) -> Result<Self, Error> {
        let mut store = Self::new(config);
        store.load(folder)?;
        Ok(store)
    }

    pub fn config(&self) -> &Config {
        self.converter.config()
    }

    /// Project folder of the last successful [`Self::load`].
    pub fn root(&self) -> Option<&Path> {
        self.root.as_deref()
    }

    /// Replaces the store content with the project found in `folder`.
    ///
    /// Each immediate subdirectory is a locale. Files that cannot be read or
    /// decoded, and entries that cannot be converted, are logged and skipped.
    /// When a key appears twice in one locale the last entry provides the
    /// record and the earlier one is kept in its file as written.
    /// Only a failure to list `folder` itself is returned, in which case the
    /// store is left untouched.
    pub fn load<P: AsRef<Path>>(&mut self, folder: P) -> Result<(), Error> {
        let folder = folder.as_ref();
        let read_error = |source: std::io::Error| Error::Read {
            path: folder.to_path_buf(),
            source,
        };

        let mut locale_dirs = Vec::new();
        for dir_entry in fs::read_dir(folder).map_err(read_error)? {
            let dir_entry = dir_entry.map_err(read_error)?;
            let path = dir_entry.path();
            if !path.is_dir() {
                continue;
            }
            let Some(locale) = path.file_name().and_then(|name| name.to_str()) else {
                warn!("Skipping directory with a non UTF-8 name: {:?}", path);
                continue;
            };
            if locale.starts_with('.') {
                debug!("Skipping hidden directory {:?}", path);
                continue;
            }
            locale_dirs.push((locale.to_string(), path));
        }
        locale_dirs.sort();

        self.root = Some(folder.to_path_buf());
        self.records.clear();
        self.locales.clear();
        self.layouts.clear();
        self.edited = false;

        for (locale, dir) in locale_dirs {
            if locale.parse::<LanguageIdentifier>().is_err() {
                warn!(locale = %locale, "Directory name is not a language identifier");
            }
            let files = self.locale_files(&dir);
            for path in &files {
                self.load_file(&locale, path);
            }
            self.locales.insert(locale, files);
        }

        info!(
            root = %folder.display(),
            locales = self.locales.len(),
            keys = self.records.len(),
            "Loaded translations"
        );
        Ok(())
    }

    /// Files with the configured extension directly inside `dir`, sorted.
    fn locale_files(&self, dir: &Path) -> Vec<PathBuf> {
        let extension = self.config().extension.as_str();
        let entries = match fs::read_dir(dir) {
            Ok(entries) => entries,
            Err(e) => {
                error!("Failed to read locale directory {:?}: {}", dir, e);
                return Vec::new();
            }
        };

        let mut files = entries
            .filter_map(|entry| match entry {
                Ok(entry) => Some(entry.path()),
                Err(err) => {
                    debug!(?err, "Failed to read directory entry");
                    None
                }
            })
            .filter(|path| {
                path.is_file() && path.extension().and_then(|ext| ext.to_str()) == Some(extension)
            })
            .collect::<Vec<_>>();
        files.sort();
        files
    }

    fn load_file(&mut self, locale: &str, path: &Path) {
        let bytes = match fs::read(path) {
            Ok(bytes) => bytes,
            Err(e) => {
                error!("Failed to read file {:?}: {}", path, e);
                return;
            }
        };
        let source = match decode(&bytes) {
            Ok(source) => source,
            Err(e) => {
                error!("Skipping file {:?}: {}", path, e);
                return;
            }
        };

        let resource = parse(&source);
        let mut slots = Vec::with_capacity(resource.body.len());
        // Slot index and entry of every key read from this file so far.
        let mut seen: HashMap<String, (usize, Entry)> = HashMap::new();
        for entry in resource.body {
            if !matches!(entry, Entry::Message(_) | Entry::Term(_)) {
                slots.push(Slot::Verbatim(entry));
                continue;
            }
            match self.converter.entry_to_record(&entry, Some(path)) {
                Ok((key, record)) => {
                    if let Some((index, shadowed)) = seen.remove(&key) {
                        warn!(key = %key, path = %path.display(), "Duplicate entry, the last one wins");
                        slots[index] = Slot::Verbatim(shadowed);
                    } else {
                        self.shadow_record(&key, locale, path);
                    }
                    self.records
                        .entry(key.clone())
                        .or_default()
                        .insert(locale.to_string(), record);
                    seen.insert(key.clone(), (slots.len(), entry));
                    slots.push(Slot::Record(key));
                }
                Err(e) => {
                    error!(path = %path.display(), "Skipping entry: {}", e);
                    slots.push(Slot::Verbatim(entry));
                }
            }
        }

        debug!(path = %path.display(), locale, entries = slots.len(), "Loaded file");
        self.layouts.insert(
            path.to_path_buf(),
            FileLayout {
                locale: locale.to_string(),
                slots,
            },
        );
    }

    /// Keeps the entry of `key` that an earlier file of `locale` holds as
    /// verbatim text, since the record now comes from `path`.
    fn shadow_record(&mut self, key: &str, locale: &str, path: &Path) {
        let Some(previous) = self
            .records
            .get(key)
            .and_then(|per_locale| per_locale.get(locale))
        else {
            return;
        };
        let Some(previous_path) = previous.source_path.clone() else {
            return;
        };
        warn!(
            key,
            locale,
            first = %previous_path.display(),
            last = %path.display(),
            "Key defined in several files, the last one wins"
        );

        let entry = match self.converter.record_to_entry(key, previous) {
            Ok(entry) => entry,
            Err(e) => {
                error!(key, path = %previous_path.display(), "Cannot keep shadowed entry: {}", e);
                return;
            }
        };
        if let Some(layout) = self.layouts.get_mut(&previous_path) {
            for slot in &mut layout.slots {
                if matches!(slot, Slot::Record(slot_key) if slot_key == key) {
                    *slot = Slot::Verbatim(entry.clone());
                }
            }
        }
    }

    /// Locale codes in load order.
    pub fn locales(&self) -> Vec<&str> {
        self.locales.keys().map(String::as_str).collect()
    }

    /// Whether `locale` was loaded, even if it holds no file yet.
    pub fn has_locale(&self, locale: &str) -> bool {
        self.locales.contains_key(locale)
    }

    /// Files loaded for `locale`, sorted.
    pub fn files(&self, locale: &str) -> &[PathBuf] {
        self.locales.get(locale).map(Vec::as_slice).unwrap_or_default()
    }

    /// Keys in the order they were first seen.
    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.records.keys().map(String::as_str)
    }

    pub fn contains_key(&self, key: &str) -> bool {
        self.records.contains_key(key)
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// The records of `key` for the locales that have one.
    pub fn records(&self, key: &str) -> Option<&IndexMap<String, TranslationRecord>> {
        self.records.get(key)
    }

    /// A copy of the record of `key` in `locale`.
    ///
    /// A locale without a translation yields an empty record. Only an unknown
    /// key is an error, and the store is never modified.
    pub fn get(&self, key: &str, locale: &str) -> Result<TranslationRecord, Error> {
        let per_locale = self.records.get(key).ok_or_else(|| Error::KeyNotFound {
            key: key.to_string(),
        })?;
        Ok(per_locale.get(locale).cloned().unwrap_or_default())
    }

    /// Applies one edit and returns whether the record changed.
    ///
    /// Value and attribute text is normalized first; input that does not parse
    /// cleanly is stored as given. A record created for a locale that had no
    /// translation yet is assigned the sibling file of another locale.
    pub fn update(&mut self, key: &str, locale: &str, edit: Edit) -> Result<bool, Error> {
        let Some(per_locale) = self.records.get(key) else {
            return Err(Error::KeyNotFound {
                key: key.to_string(),
            });
        };
        if !self.locales.contains_key(locale) {
            return Err(Error::LocaleNotFound {
                key: key.to_string(),
                locale: locale.to_string(),
            });
        }

        let current = per_locale.get(locale);
        let mut record = current.cloned().unwrap_or_default();
        let field = edit.field_name();
        match edit {
            Edit::Value(text) => record.value = self.normalized(&text),
            Edit::Attribute { name, value } => {
                let attribute = attribute_key(&name);
                if value.is_empty() && !record.attributes.contains_key(&attribute) {
                    return Ok(false);
                }
                let value = self.normalized(&value);
                record.attributes.insert(attribute, value);
            }
            Edit::Comment(text) => {
                record.comment = if text.trim().is_empty() {
                    None
                } else {
                    Some(normalize_line_endings(&text).into_owned())
                };
            }
            Edit::NeedsReview(flag) => record.needs_review = flag,
        }

        if current.map_or(record.is_blank(), |current| *current == record) {
            return Ok(false);
        }
        if record.source_path.is_none() {
            record.source_path = self.sibling_path(key, locale);
        }

        info!(key, locale, field = %field, "Updated translation");
        self.records
            .entry(key.to_string())
            .or_default()
            .insert(locale.to_string(), record);
        self.edited = true;
        Ok(true)
    }

    fn normalized(&self, text: &str) -> String {
        let normalized = self.converter.normalize(text);
        if normalized.had_junk {
            warn!(value = %text, "Value kept as typed since it does not parse");
            normalize_line_endings(text).into_owned()
        } else {
            normalized.text
        }
    }

    /// `<root>/<locale>/<relative path>` of the first other locale that has
    /// `key` in a file under the project root.
    fn sibling_path(&self, key: &str, locale: &str) -> Option<PathBuf> {
        let root = self.root.as_deref()?;
        self.records.get(key)?.iter().find_map(|(other, record)| {
            let path = record.source_path.as_deref()?;
            let relative = path.strip_prefix(root.join(other)).ok()?;
            Some(root.join(locale).join(relative))
        })
    }

    /// `true` if an update changed something since the last load or save.
    pub fn is_edited(&self) -> bool {
        self.edited
    }

    /// Writes every record back to its file, or under `target` when given.
    ///
    /// Entries keep their file and order; records new to a file are appended.
    /// Nothing is written if a record has no file or a file lies outside the
    /// project folder. A failed write aborts the save and leaves files written
    /// so far in place.
    pub fn save(&mut self, target: Option<&Path>) -> Result<(), Error> {
        let mut by_path: IndexMap<PathBuf, Vec<(&str, &str)>> = IndexMap::new();
        for (key, per_locale) in &self.records {
            for (locale, record) in per_locale {
                let path = record
                    .source_path
                    .as_ref()
                    .ok_or_else(|| Error::MissingSourcePath {
                        key: key.clone(),
                        locale: locale.clone(),
                    })?;
                by_path
                    .entry(path.clone())
                    .or_default()
                    .push((key.as_str(), locale.as_str()));
            }
        }

        let mut outputs = Vec::new();
        for (path, layout) in &self.layouts {
            let pending = by_path.shift_remove(path).unwrap_or_default();
            let entries = self.file_entries(path, Some(layout), pending);
            outputs.push((path.clone(), layout.locale.clone(), entries));
        }
        for (path, pending) in by_path {
            let locale = pending
                .first()
                .map(|(_, locale)| locale.to_string())
                .unwrap_or_default();
            let entries = self.file_entries(&path, None, pending);
            outputs.push((path, locale, entries));
        }

        let mut destinations = Vec::with_capacity(outputs.len());
        for (path, _, _) in &outputs {
            destinations.push(self.output_path(path, target)?);
        }

        for ((_, _, slots), destination) in outputs.iter().zip(&destinations) {
            let entries = slots.iter().map(|(entry, _)| entry.clone()).collect();
            let resource = Resource::new(entries);
            self.write_file(destination, &self.serializer.serialize(&resource))?;
            debug!(path = %destination.display(), entries = slots.len(), "Wrote file");
        }
        info!(files = outputs.len(), target = ?target, "Saved translations");

        if target.is_none() {
            self.remember_layouts(outputs);
        }
        self.edited = false;
        Ok(())
    }

    /// Entries of one output file: its layout with current records filled in,
    /// then the records that were not part of it. Entries written from a record
    /// carry its key.
    fn file_entries(
        &self,
        path: &Path,
        layout: Option<&FileLayout>,
        pending: Vec<(&str, &str)>,
    ) -> Vec<(Entry, Option<String>)> {
        let mut written = HashSet::new();
        let mut entries: Vec<(Entry, Option<String>)> = Vec::new();

        if let Some(layout) = layout {
            for slot in &layout.slots {
                match slot {
                    // Dropped records must not leave two blank runs side by side.
                    Slot::Verbatim(Entry::Blank(_))
                        if matches!(entries.last(), Some((Entry::Blank(_), _))) => {}
                    Slot::Verbatim(entry) => entries.push((entry.clone(), None)),
                    Slot::Record(key) => {
                        let record = self
                            .records
                            .get(key)
                            .and_then(|per_locale| per_locale.get(&layout.locale))
                            .filter(|record| record.source_path.as_deref() == Some(path));
                        if let Some(record) = record {
                            written.insert((key.as_str(), layout.locale.as_str()));
                            entries.extend(
                                self.record_entry(key, record)
                                    .map(|entry| (entry, Some(key.clone()))),
                            );
                        }
                    }
                }
            }
        }

        for (key, locale) in pending {
            if written.contains(&(key, locale)) {
                continue;
            }
            let Some(record) = self.records.get(key).and_then(|per_locale| per_locale.get(locale))
            else {
                continue;
            };
            let Some(entry) = self.record_entry(key, record) else {
                continue;
            };
            if matches!(entries.last(), Some((Entry::Comment(_), _))) {
                entries.push((Entry::Blank("\n".to_string()), None));
            }
            entries.push((entry, Some(key.to_string())));
        }

        entries
    }

    fn record_entry(&self, key: &str, record: &TranslationRecord) -> Option<Entry> {
        if record.is_blank() {
            debug!(key, "Dropping empty translation");
            return None;
        }
        match self.converter.record_to_entry(key, record) {
            Ok(entry) => Some(entry),
            Err(e) => {
                error!(key, "Skipping entry: {}", e);
                None
            }
        }
    }

    fn output_path(&self, path: &Path, target: Option<&Path>) -> Result<PathBuf, Error> {
        let Some(target) = target else {
            return Ok(path.to_path_buf());
        };
        let root = self.root.as_deref().unwrap_or_else(|| Path::new(""));
        let relative = path
            .strip_prefix(root)
            .map_err(|_| Error::OutsideProject {
                path: path.to_path_buf(),
                root: root.to_path_buf(),
            })?;
        Ok(target.join(relative))
    }

    fn write_file(&self, path: &Path, content: &str) -> Result<(), Error> {
        let write_error = |source: std::io::Error| Error::Write {
            path: path.to_path_buf(),
            source,
        };
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).map_err(write_error)?;
        }
        fs::write(path, content).map_err(write_error)
    }

    /// After an in-place save the written files become the new layouts.
    fn remember_layouts(&mut self, outputs: Vec<(PathBuf, String, Vec<(Entry, Option<String>)>)>) {
        for (path, locale, entries) in outputs {
            let slots = entries
                .into_iter()
                .map(|(entry, key)| match key {
                    Some(key) => Slot::Record(key),
                    None => Slot::Verbatim(entry),
                })
                .collect();

            let files = self.locales.entry(locale.clone()).or_default();
            if !files.contains(&path) {
                files.push(path.clone());
                files.sort();
            }
            self.layouts.insert(path, FileLayout { locale, slots });
        }
    }
}
