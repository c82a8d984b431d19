//! `metadata.json` store
//!
//! A single JSON object keyed by icon name. An import replaces exactly one
//! entry; every other entry is carried through as an opaque value, so its
//! content and key position survive the rewrite.
//!
//! Read-modify-write is serialized across processes with a sidecar lock file
//! (`metadata.json.lock`, created exclusively) and the new content is renamed
//! into place, so concurrent imports cannot drop each other's entries.

use crate::error::{ImportError, ImportResult};
use crate::models::{
    Author, MetadataEntry, Submission, UpdateInfo, VariantKey, VariantNames, VariantTarget,
};
use crate::services::planner::resolve_base_format;
use chrono::{DateTime, Utc};
use serde::Serialize;
use serde_json::{Map, Value};
use std::fs::{self, OpenOptions};
use std::io::{ErrorKind, Write};
use std::path::{Path, PathBuf};
use std::time::{Duration, Instant};
use tracing::{debug, info, warn};

/// Default time to wait for another import to release the store
pub const DEFAULT_LOCK_TIMEOUT: Duration = Duration::from_secs(30);

const LOCK_POLL_INTERVAL: Duration = Duration::from_millis(100);

/// Parsed store: icon name → entry
pub type MetadataMap = Map<String, Value>;

/// Build the entry an import writes for its icon
///
/// Variant values are destination stems (`acme-dark`), never the uploaded
/// filenames. Unresolved targets contribute nothing.
pub fn build_entry(
    submission: &Submission,
    targets: &[VariantTarget],
    now: DateTime<Utc>,
) -> MetadataEntry {
    let extras = submission.extras();

    let mut colors = VariantNames::default();
    let mut wordmark = VariantNames::default();
    for target in targets.iter().filter(|t| t.is_resolved()) {
        let stem = Some(target.dest_stem().to_string());
        match target.key {
            VariantKey::Base => {}
            VariantKey::Light => colors.light = stem,
            VariantKey::Dark => colors.dark = stem,
            VariantKey::WordmarkLight => wordmark.light = stem,
            VariantKey::WordmarkDark => wordmark.dark = stem,
        }
    }

    MetadataEntry {
        base: resolve_base_format(submission),
        aliases: extras.aliases,
        categories: extras.categories,
        update: UpdateInfo {
            timestamp: dashicons_common::time::iso_timestamp(now),
            author: author_of(submission),
        },
        colors: colors.non_empty(),
        wordmark: wordmark.non_empty(),
    }
}

/// Expanded creator when available, else the bare relation id
fn author_of(submission: &Submission) -> Author {
    match submission.creator() {
        Some(user) => Author {
            id: if user.id.is_empty() {
                submission.created_by.clone()
            } else {
                user.id.clone()
            },
            name: user.username.clone(),
            login: user.email.clone(),
        },
        None => Author {
            id: submission.created_by.clone(),
            name: None,
            login: None,
        },
    }
}

/// Serialize with 4-space indentation and a trailing newline
pub fn render(map: &MetadataMap) -> ImportResult<String> {
    let mut buf = Vec::new();
    let formatter = serde_json::ser::PrettyFormatter::with_indent(b"    ");
    let mut serializer = serde_json::Serializer::with_formatter(&mut buf, formatter);
    map.serialize(&mut serializer)
        .map_err(|e| ImportError::Store(format!("Failed to serialize metadata: {}", e)))?;
    buf.push(b'\n');
    String::from_utf8(buf).map_err(|e| ImportError::Store(e.to_string()))
}

/// Exclusive hold on the store; released on drop
#[derive(Debug)]
pub struct StoreLock {
    path: PathBuf,
}

impl StoreLock {
    /// Create the lock file, polling until `timeout` if another import holds it
    pub fn acquire(path: PathBuf, timeout: Duration) -> ImportResult<Self> {
        let started = Instant::now();
        loop {
            match OpenOptions::new().write(true).create_new(true).open(&path) {
                Ok(mut file) => {
                    // Holder pid helps when a crashed run leaves the lock behind
                    if let Err(e) = writeln!(file, "{}", std::process::id()) {
                        warn!(lock = %path.display(), "Failed to record lock holder pid: {}", e);
                    }
                    debug!(lock = %path.display(), "Acquired metadata store lock");
                    return Ok(Self { path });
                }
                Err(e) if e.kind() == ErrorKind::AlreadyExists => {
                    if started.elapsed() >= timeout {
                        return Err(ImportError::StoreLocked(format!(
                            "{} still held after {:?}; remove it if no import is running",
                            path.display(),
                            timeout
                        )));
                    }
                    std::thread::sleep(LOCK_POLL_INTERVAL);
                }
                Err(e) => return Err(e.into()),
            }
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl Drop for StoreLock {
    fn drop(&mut self) {
        if let Err(e) = fs::remove_file(&self.path) {
            warn!(lock = %self.path.display(), "Failed to release metadata store lock: {}", e);
        }
    }
}

/// Handle on a metadata.json file
#[derive(Debug, Clone)]
pub struct MetadataStore {
    path: PathBuf,
    lock_timeout: Duration,
}

impl MetadataStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            lock_timeout: DEFAULT_LOCK_TIMEOUT,
        }
    }

    pub fn with_lock_timeout(mut self, timeout: Duration) -> Self {
        self.lock_timeout = timeout;
        self
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn lock_path(&self) -> PathBuf {
        let mut name = self.path.as_os_str().to_os_string();
        name.push(".lock");
        PathBuf::from(name)
    }

    fn parent_dir(&self) -> PathBuf {
        match self.path.parent() {
            Some(parent) if !parent.as_os_str().is_empty() => parent.to_path_buf(),
            _ => PathBuf::from("."),
        }
    }

    /// Read the whole store; a missing file is an empty store
    pub fn load(&self) -> ImportResult<MetadataMap> {
        let content = match fs::read_to_string(&self.path) {
            Ok(content) => content,
            Err(e) if e.kind() == ErrorKind::NotFound => {
                debug!(path = %self.path.display(), "Metadata store not found, starting empty");
                return Ok(MetadataMap::new());
            }
            Err(e) => return Err(e.into()),
        };

        let value: Value = serde_json::from_str(&content).map_err(|e| {
            ImportError::Store(format!("{} is not valid JSON: {}", self.path.display(), e))
        })?;

        match value {
            Value::Object(map) => Ok(map),
            other => Err(ImportError::Store(format!(
                "{} must contain a JSON object, found {}",
                self.path.display(),
                json_kind(&other)
            ))),
        }
    }

    /// Typed view of one entry
    pub fn get(&self, icon_name: &str) -> ImportResult<Option<MetadataEntry>> {
        self.load()?
            .remove(icon_name)
            .map(|v| {
                serde_json::from_value(v).map_err(|e| {
                    ImportError::Store(format!("Entry '{}' is malformed: {}", icon_name, e))
                })
            })
            .transpose()
    }

    /// Replace the entry for `icon_name`, leaving all others untouched
    ///
    /// Dry-run reads the store (so a corrupt file still fails the run) but
    /// neither locks nor writes.
    pub fn upsert(&self, icon_name: &str, entry: &MetadataEntry, dry_run: bool) -> ImportResult<()> {
        let value = serde_json::to_value(entry)
            .map_err(|e| ImportError::Store(format!("Failed to encode entry: {}", e)))?;

        if dry_run {
            let existing = self.load()?;
            info!(
                icon = %icon_name,
                path = %self.path.display(),
                replaces_existing = existing.contains_key(icon_name),
                "[dry-run] Would update metadata entry"
            );
            return Ok(());
        }

        fs::create_dir_all(self.parent_dir())?;
        let _lock = StoreLock::acquire(self.lock_path(), self.lock_timeout)?;

        let mut map = self.load()?;
        let replaced = map.insert(icon_name.to_string(), value).is_some();
        self.write(&map)?;

        info!(
            icon = %icon_name,
            path = %self.path.display(),
            replaced,
            "Updated metadata entry"
        );
        Ok(())
    }

    fn write(&self, map: &MetadataMap) -> ImportResult<()> {
        let rendered = render(map)?;
        let mut tmp = tempfile::NamedTempFile::new_in(self.parent_dir())?;
        tmp.write_all(rendered.as_bytes())?;
        tmp.as_file().sync_all()?;
        tmp.persist(&self.path).map_err(|e| ImportError::Io(e.error))?;
        Ok(())
    }
}

fn json_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{ExpandedUser, Extras, SubmissionExpand, SubmissionStatus};
    use chrono::TimeZone;
    use serde_json::json;
    use tempfile::TempDir;

    fn fixed_now() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 5, 1, 12, 0, 0).unwrap()
    }

    fn submission() -> Submission {
        Submission {
            id: "sub1".to_string(),
            name: "foo".to_string(),
            assets: vec!["foo.svg".to_string()],
            created_by: "user1".to_string(),
            approved_by: None,
            status: SubmissionStatus::Approved,
            extras: Some(Extras {
                aliases: vec!["foo-app".to_string()],
                categories: vec!["tools".to_string()],
                ..Default::default()
            }),
            expand: None,
        }
    }

    fn resolved(key: VariantKey) -> VariantTarget {
        let mut target = VariantTarget::new("foo", key, "svg");
        target.source_asset = Some(format!("upload-{}.svg", key));
        target
    }

    fn sample_entry() -> MetadataEntry {
        build_entry(
            &submission(),
            &[
                resolved(VariantKey::Base),
                resolved(VariantKey::Light),
                resolved(VariantKey::Dark),
            ],
            fixed_now(),
        )
    }

    #[test]
    fn test_build_entry_uses_destination_stems() {
        let entry = sample_entry();

        assert_eq!(entry.base, "svg");
        assert_eq!(entry.aliases, vec!["foo-app"]);
        assert_eq!(entry.categories, vec!["tools"]);
        assert_eq!(entry.update.timestamp, "2024-05-01T12:00:00.000Z");
        let colors = entry.colors.unwrap();
        assert_eq!(colors.light.as_deref(), Some("foo-light"));
        assert_eq!(colors.dark.as_deref(), Some("foo-dark"));
        assert!(entry.wordmark.is_none());
    }

    #[test]
    fn test_build_entry_skips_unresolved_targets() {
        let unresolved = VariantTarget::new("foo", VariantKey::WordmarkDark, "svg");
        let entry = build_entry(
            &submission(),
            &[resolved(VariantKey::WordmarkLight), unresolved],
            fixed_now(),
        );

        let wordmark = entry.wordmark.unwrap();
        assert_eq!(wordmark.light.as_deref(), Some("foo-wordmark-light"));
        assert_eq!(wordmark.dark, None);
        assert!(entry.colors.is_none());
    }

    #[test]
    fn test_author_prefers_expanded_creator() {
        let mut sub = submission();
        sub.expand = Some(SubmissionExpand {
            created_by: Some(ExpandedUser {
                id: "user1".to_string(),
                username: Some("alice".to_string()),
                email: None,
            }),
            approved_by: None,
        });

        let entry = build_entry(&sub, &[], fixed_now());
        assert_eq!(
            serde_json::to_value(&entry.update.author).unwrap(),
            json!({"id": "user1", "name": "alice"})
        );
    }

    #[test]
    fn test_author_falls_back_to_created_by() {
        let entry = build_entry(&submission(), &[], fixed_now());
        assert_eq!(
            serde_json::to_value(&entry.update.author).unwrap(),
            json!({"id": "user1"})
        );
    }

    #[test]
    fn test_render_format() {
        let mut map = MetadataMap::new();
        map.insert("a".to_string(), json!({"base": "svg", "aliases": []}));

        assert_eq!(
            render(&map).unwrap(),
            "{\n    \"a\": {\n        \"base\": \"svg\",\n        \"aliases\": []\n    }\n}\n"
        );
    }

    #[test]
    fn test_missing_file_loads_empty() {
        let temp_dir = TempDir::new().unwrap();
        let store = MetadataStore::new(temp_dir.path().join("metadata.json"));
        assert!(store.load().unwrap().is_empty());
    }

    #[test]
    fn test_non_object_store_is_rejected() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("metadata.json");
        fs::write(&path, "[1, 2]").unwrap();

        let result = MetadataStore::new(&path).load();
        assert!(matches!(result, Err(ImportError::Store(msg)) if msg.contains("an array")));
    }

    #[test]
    fn test_upsert_round_trip_preserves_siblings() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("metadata.json");
        let sibling = json!({
            "base": "png",
            "aliases": ["zeta-app"],
            "categories": [],
            "update": {"timestamp": "2023-01-01T00:00:00.000Z", "author": {"id": "z"}},
            "custom_field": {"kept": true}
        });
        fs::write(
            &path,
            serde_json::to_string_pretty(&json!({"zeta": sibling, "alpha": {"base": "svg"}})).unwrap(),
        )
        .unwrap();

        let store = MetadataStore::new(&path);
        store.upsert("foo", &sample_entry(), false).unwrap();

        let map = store.load().unwrap();
        let keys: Vec<&String> = map.keys().collect();
        assert_eq!(keys, vec!["zeta", "alpha", "foo"]);
        assert_eq!(map["zeta"], sibling);
        assert_eq!(map["alpha"], json!({"base": "svg"}));

        let entry = store.get("foo").unwrap().unwrap();
        assert_eq!(entry.colors.unwrap().light.as_deref(), Some("foo-light"));
        assert!(fs::read_to_string(&path).unwrap().ends_with("}\n"));
        assert!(!store.lock_path().exists());
    }

    #[test]
    fn test_upsert_replaces_whole_entry_in_place() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("metadata.json");
        fs::write(
            &path,
            r#"{"foo": {"base": "png", "legacy": 1}, "bar": {"base": "svg"}}"#,
        )
        .unwrap();

        let store = MetadataStore::new(&path);
        store.upsert("foo", &sample_entry(), false).unwrap();

        let map = store.load().unwrap();
        let keys: Vec<&String> = map.keys().collect();
        assert_eq!(keys, vec!["foo", "bar"]);
        assert!(map["foo"].get("legacy").is_none());
        assert_eq!(map["foo"]["base"], json!("svg"));
    }

    #[test]
    fn test_dry_run_does_not_write() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("metadata.json");
        fs::write(&path, "{}\n").unwrap();

        MetadataStore::new(&path)
            .upsert("foo", &sample_entry(), true)
            .unwrap();

        assert_eq!(fs::read_to_string(&path).unwrap(), "{}\n");
    }

    #[test]
    fn test_held_lock_times_out() {
        let temp_dir = TempDir::new().unwrap();
        let store = MetadataStore::new(temp_dir.path().join("metadata.json"))
            .with_lock_timeout(Duration::from_millis(200));

        let _held = StoreLock::acquire(store.lock_path(), Duration::from_secs(1)).unwrap();
        let result = store.upsert("foo", &sample_entry(), false);

        assert!(matches!(result, Err(ImportError::StoreLocked(_))));
        assert!(!store.path().exists());
    }

    #[test]
    fn test_lock_released_on_drop() {
        let temp_dir = TempDir::new().unwrap();
        let lock_path = temp_dir.path().join("metadata.json.lock");

        {
            let lock = StoreLock::acquire(lock_path.clone(), Duration::from_secs(1)).unwrap();
            assert!(lock.path().exists());
        }

        assert!(!lock_path.exists());
        StoreLock::acquire(lock_path, Duration::from_millis(10)).unwrap();
    }

    #[test]
    fn test_lock_file_records_holder_pid() {
        let temp_dir = TempDir::new().unwrap();
        let lock_path = temp_dir.path().join("metadata.json.lock");

        let _lock = StoreLock::acquire(lock_path.clone(), Duration::from_secs(1)).unwrap();

        let content = fs::read_to_string(&lock_path).unwrap();
        assert_eq!(content.trim(), std::process::id().to_string());
    }
}
