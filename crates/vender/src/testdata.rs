//! Test data.
//!
//! Two JSON documents feed the scenarios. The static document maps screen
//! names to field/value pairs and is read-only for the whole run. The unique
//! document is flat key/value, rewritten by the setup scenario with
//! freshly-generated names so later scenarios agree on what was created.

use crate::result::{VenderError, VenderResult};
use chrono::{Local, Months};
use serde_json::Value;
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicU64, Ordering};

/// Static per-screen test data (screen -> field -> value).
#[derive(Debug, Clone)]
pub struct TestData {
    root: Value,
}

impl TestData {
    /// Load the document from a JSON file.
    pub fn load(path: &Path) -> VenderResult<Self> {
        let raw = std::fs::read_to_string(path).map_err(|e| {
            VenderError::config(format!("cannot read test data {}: {e}", path.display()))
        })?;
        Ok(Self {
            root: serde_json::from_str(&raw)?,
        })
    }

    /// Build directly from a JSON value.
    #[must_use]
    pub const fn from_value(root: Value) -> Self {
        Self { root }
    }

    /// Required field; a missing screen or field names the full key path.
    pub fn value(&self, screen: &str, field: &str) -> VenderResult<String> {
        self.root
            .get(screen)
            .and_then(|s| s.get(field))
            .and_then(Value::as_str)
            .map(str::to_string)
            .ok_or_else(|| VenderError::not_found(format!("test data key {screen}.{field}")))
    }

    /// Field that may be absent or deliberately left empty.
    #[must_use]
    pub fn non_empty(&self, screen: &str, field: &str) -> Option<String> {
        self.value(screen, field)
            .ok()
            .filter(|v| !v.trim().is_empty())
    }
}

/// Flat key/value document shared across scenarios within one run.
#[derive(Debug, Clone)]
pub struct UniqueDataStore {
    path: PathBuf,
}

impl UniqueDataStore {
    #[must_use]
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Replace the document with `entries`, pretty-printed.
    pub fn write(&self, entries: &BTreeMap<String, String>) -> VenderResult<()> {
        if let Some(dir) = self.path.parent() {
            std::fs::create_dir_all(dir)?;
        }
        let json = serde_json::to_string_pretty(entries)?;
        std::fs::write(&self.path, json)?;
        Ok(())
    }

    /// Read the whole document back.
    pub fn read(&self) -> VenderResult<BTreeMap<String, String>> {
        let raw = std::fs::read_to_string(&self.path).map_err(|e| {
            VenderError::config(format!(
                "cannot read unique data {}: {e}",
                self.path.display()
            ))
        })?;
        Ok(serde_json::from_str(&raw)?)
    }

    /// Single required key.
    pub fn value(&self, key: &str) -> VenderResult<String> {
        self.read()?
            .remove(key)
            .ok_or_else(|| VenderError::not_found(format!("unique data key {key}")))
    }
}

static UNIQUE_SEQ: AtomicU64 = AtomicU64::new(0);

/// Generate a short run-unique identifier: prefix, four hex chars of a v4
/// UUID, the trailing digits of the epoch-millis clock, and a process-wide
/// sequence number so two calls in the same millisecond still differ.
#[must_use]
pub fn unique_string(prefix: &str) -> String {
    let uuid = uuid::Uuid::new_v4().simple().to_string();
    let hex = &uuid[..4];
    let millis = Local::now().timestamp_millis().to_string();
    let tail = millis.get(8..).unwrap_or(&millis);
    let seq = UNIQUE_SEQ.fetch_add(1, Ordering::Relaxed);
    format!("{prefix}{hex}{tail}{seq}")
}

/// Today's date rendered with a `chrono` format string.
#[must_use]
pub fn current_date(format: &str) -> String {
    Local::now().format(format).to_string()
}

/// Today's date shifted forward by whole months.
#[must_use]
pub fn date_after_months(format: &str, months: u32) -> String {
    let today = Local::now().date_naive();
    let shifted = today.checked_add_months(Months::new(months)).unwrap_or(today);
    shifted.format(format).to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    mod test_data_tests {
        use super::*;

        fn sample() -> TestData {
            TestData::from_value(json!({
                "accounts": {"status": "Active", "currency": "USD"},
                "opportunities": {"closeDate": ""}
            }))
        }

        #[test]
        fn nested_lookup_returns_value() {
            assert_eq!(sample().value("accounts", "status").unwrap(), "Active");
        }

        #[test]
        fn missing_key_names_the_full_path() {
            let err = sample().value("accounts", "region").unwrap_err();
            assert!(err.to_string().contains("accounts.region"));
        }

        #[test]
        fn missing_screen_is_also_not_found() {
            assert!(matches!(
                sample().value("quotes", "term").unwrap_err(),
                VenderError::NotFound { .. }
            ));
        }

        #[test]
        fn empty_value_is_filtered_by_non_empty() {
            let data = sample();
            assert!(data.non_empty("opportunities", "closeDate").is_none());
            assert_eq!(
                data.non_empty("accounts", "currency").unwrap(),
                "USD"
            );
        }
    }

    mod unique_store_tests {
        use super::*;

        #[test]
        fn written_values_read_back_exactly() {
            let dir = tempfile::tempdir().unwrap();
            let store = UniqueDataStore::new(dir.path().join("unique.json"));
            let mut entries = BTreeMap::new();
            entries.insert("accountName".to_string(), "ANab1270011".to_string());
            entries.insert("email".to_string(), "ANab1270011@example.com".to_string());
            store.write(&entries).unwrap();

            assert_eq!(store.read().unwrap(), entries);
            assert_eq!(store.value("accountName").unwrap(), "ANab1270011");
        }

        #[test]
        fn missing_key_is_not_found() {
            let dir = tempfile::tempdir().unwrap();
            let store = UniqueDataStore::new(dir.path().join("unique.json"));
            store.write(&BTreeMap::new()).unwrap();
            assert!(matches!(
                store.value("contactName").unwrap_err(),
                VenderError::NotFound { .. }
            ));
        }

        #[test]
        fn rewrite_replaces_previous_content() {
            let dir = tempfile::tempdir().unwrap();
            let store = UniqueDataStore::new(dir.path().join("unique.json"));
            let mut first = BTreeMap::new();
            first.insert("old".to_string(), "1".to_string());
            store.write(&first).unwrap();
            let mut second = BTreeMap::new();
            second.insert("new".to_string(), "2".to_string());
            store.write(&second).unwrap();
            assert_eq!(store.read().unwrap(), second);
        }
    }

    mod generator_tests {
        use super::*;

        #[test]
        fn unique_strings_carry_their_prefix() {
            assert!(unique_string("AN").starts_with("AN"));
        }

        #[test]
        fn same_prefix_never_collides() {
            let mut seen = std::collections::HashSet::new();
            for _ in 0..1000 {
                assert!(seen.insert(unique_string("FN")));
            }
        }

        #[test]
        fn current_date_honors_format() {
            let rendered = current_date("%Y");
            assert_eq!(rendered.len(), 4);
            assert!(rendered.chars().all(|c| c.is_ascii_digit()));
        }

        #[test]
        fn month_shift_moves_forward() {
            let today = current_date("%Y%m%d");
            let later = date_after_months("%Y%m%d", 2);
            assert!(later > today);
        }
    }
}
