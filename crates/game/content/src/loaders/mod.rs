//! Content loaders for reading combat data from files.
//!
//! Every loader works in two passes. The file is parsed into a list of
//! untyped RON values (a syntax error fails the whole file), then each entry
//! is converted into its raw record and validated into its typed definition.
//! An entry with a wrong field type or an invalid value is skipped with a
//! [`Diagnostic`] and loading continues.

pub mod abilities;
pub mod elements;
pub mod factory;
pub mod moves;
pub mod rules;

pub use abilities::AbilityLoader;
pub use elements::ElementLoader;
pub use factory::{ContentFactory, LoadedContent};
pub use moves::MoveLoader;
pub use rules::RulesLoader;

use std::fmt;
use std::path::Path;

use serde::de::DeserializeOwned;
use tracing::warn;

/// Common result type for loaders.
pub type LoadResult<T> = anyhow::Result<T>;

/// Helper function to read file contents.
pub(crate) fn read_file(path: &Path) -> LoadResult<String> {
    std::fs::read_to_string(path)
        .map_err(|e| anyhow::anyhow!("Failed to read file {}: {}", path.display(), e))
}

/// A content entry that was skipped or partially loaded.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Diagnostic {
    /// File or embedded source name.
    pub source: String,
    /// Id of the offending entry, or its position when it has none.
    pub entry: String,
    pub message: String,
}

impl fmt::Display for Diagnostic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: '{}': {}", self.source, self.entry, self.message)
    }
}

/// Collects diagnostics for one source file and logs each one.
#[derive(Debug)]
pub struct Diagnostics<'a> {
    source: &'a str,
    items: &'a mut Vec<Diagnostic>,
}

impl<'a> Diagnostics<'a> {
    pub fn new(source: &'a str, items: &'a mut Vec<Diagnostic>) -> Self {
        Self { source, items }
    }

    pub fn report(&mut self, entry: &str, message: impl Into<String>) {
        let diagnostic = Diagnostic {
            source: self.source.to_string(),
            entry: entry.to_string(),
            message: message.into(),
        };
        warn!(
            source = %diagnostic.source,
            entry = %diagnostic.entry,
            "content entry rejected: {}",
            diagnostic.message
        );
        self.items.push(diagnostic);
    }
}

/// Parses a RON list and converts each entry into `T` on its own.
///
/// Entries that do not fit `T` are reported under the label `label` derives
/// from the untyped entry (or their position) and left out of the result.
pub(crate) fn parse_entries<T, F>(
    content: &str,
    what: &str,
    diagnostics: &mut Diagnostics<'_>,
    label: F,
) -> LoadResult<Vec<T>>
where
    T: DeserializeOwned,
    F: Fn(&ron::Value) -> Option<String>,
{
    let values: Vec<ron::Value> = ron::from_str(content)
        .map_err(|e| anyhow::anyhow!("Failed to parse {} RON: {}", what, e))?;

    let mut records = Vec::with_capacity(values.len());
    for (index, value) in values.into_iter().enumerate() {
        let entry = label(&value).unwrap_or_else(|| format!("#{index}"));
        match value.into_rust::<T>() {
            Ok(record) => records.push(record),
            Err(e) => diagnostics.report(&entry, format!("malformed entry: {e}")),
        }
    }
    Ok(records)
}

/// String value of `key` when `value` is a RON struct or map.
pub(crate) fn str_field<'v>(value: &'v ron::Value, key: &str) -> Option<&'v str> {
    let ron::Value::Map(map) = value else {
        return None;
    };
    match map.get(&ron::Value::String(key.to_string()))? {
        ron::Value::String(s) => Some(s.as_str()),
        _ => None,
    }
}

/// Label for entries keyed by an `id` field.
pub(crate) fn id_label(value: &ron::Value) -> Option<String> {
    str_field(value, "id").map(str::to_string)
}

/// Parses a named enum value, reporting the field on failure.
pub(crate) fn parse_named<T: std::str::FromStr>(field: &str, raw: &str) -> Result<T, String> {
    raw.trim()
        .parse()
        .map_err(|_| format!("unknown {field} '{raw}'"))
}

/// Converts a raw integer into a narrower type, reporting the field on failure.
pub(crate) fn narrow<T: TryFrom<i64>>(field: &str, raw: i64) -> Result<T, String> {
    T::try_from(raw).map_err(|_| format!("{field} {raw} is out of range"))
}

/// Like [`narrow`], additionally bounding the value to `0..=100`.
pub(crate) fn percent(field: &str, raw: i64) -> Result<u8, String> {
    if !(0..=100).contains(&raw) {
        return Err(format!("{field} {raw} must be within 0..=100"));
    }
    narrow(field, raw)
}
