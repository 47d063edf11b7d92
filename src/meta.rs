//! Per-alias metadata: tags and creation time.
//!
//! On disk a record may still carry the legacy single `tag` string. Records are
//! normalized into [`AliasMetadata`] as soon as they are read, and written back
//! in the list form only.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Record shape as found in the metadata file
#[derive(Clone, Debug, Default, PartialEq, Eq, Deserialize)]
pub struct RawRecord {
    #[serde(default)]
    pub tags: Option<Vec<String>>,

    #[serde(default)]
    pub created: Option<String>,

    #[serde(default)]
    pub tag: Option<String>,
}

/// Normalized metadata record
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize)]
pub struct AliasMetadata {
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub tags: Vec<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub created: Option<String>,
}

impl From<RawRecord> for AliasMetadata {
    fn from(raw: RawRecord) -> Self {
        let tags = match raw.tags {
            Some(tags) if !tags.is_empty() => tags,
            _ => raw.tag.filter(|tag| !tag.is_empty()).into_iter().collect(),
        };
        Self {
            tags,
            created: raw.created,
        }
    }
}

impl AliasMetadata {
    pub fn created_now() -> Self {
        Self {
            tags: Vec::new(),
            created: Some(now_iso8601()),
        }
    }

    pub fn get_tags(&self) -> &[String] {
        &self.tags
    }

    pub fn has_tag(&self, tag: &str) -> bool {
        let tag = tag.to_lowercase();
        self.tags.iter().any(|t| t.to_lowercase() == tag)
    }

    /// Replace all tags. Callers pass an already de-duplicated list.
    pub fn set_tags(&mut self, tags: Vec<String>) {
        self.tags = tags;
    }

    /// Case-insensitive union; existing tags keep their position and casing
    pub fn merge_add<S: AsRef<str>>(&mut self, to_add: &[S]) {
        for tag in to_add {
            let tag = tag.as_ref().trim();
            if !tag.is_empty() && !self.has_tag(tag) {
                self.tags.push(tag.to_string());
            }
        }
    }

    /// Case-insensitive difference
    pub fn merge_remove<S: AsRef<str>>(&mut self, to_remove: &[S]) {
        let removed: Vec<String> = to_remove.iter().map(|t| t.as_ref().trim().to_lowercase()).collect();
        self.tags.retain(|tag| !removed.contains(&tag.to_lowercase()));
    }

    pub fn clear(&mut self) {
        self.tags.clear();
    }

    pub fn is_empty(&self) -> bool {
        self.tags.is_empty() && self.created.is_none()
    }
}

/// Trim, drop empties and collapse case-insensitive duplicates, first casing wins
pub fn dedup_tags<S: AsRef<str>>(tags: &[S]) -> Vec<String> {
    let mut record = AliasMetadata::default();
    record.merge_add(tags);
    record.tags
}

pub fn now_iso8601() -> String {
    chrono::Utc::now().to_rfc3339_opts(chrono::SecondsFormat::Millis, true)
}

/// All metadata records, keyed by alias name
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct MetadataStore {
    records: BTreeMap<String, AliasMetadata>,
}

impl MetadataStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Parse the metadata file contents, normalizing legacy records
    pub fn from_json(text: &str) -> Result<Self, serde_json::Error> {
        if text.trim().is_empty() {
            return Ok(Self::default());
        }
        let raw: BTreeMap<String, RawRecord> = serde_json::from_str(text)?;
        let records = raw
            .into_iter()
            .map(|(name, record)| (name, AliasMetadata::from(record)))
            .filter(|(_, record)| !record.is_empty())
            .collect();
        Ok(Self { records })
    }

    /// Pretty JSON with 2-space indentation and a trailing newline
    pub fn to_json(&self) -> String {
        let mut text = serde_json::to_string_pretty(&self.records).unwrap_or_else(|_| "{}".to_string());
        text.push('\n');
        text
    }

    pub fn get(&self, name: &str) -> Option<&AliasMetadata> {
        self.records.get(name)
    }

    pub fn tags_of(&self, name: &str) -> Vec<String> {
        self.get(name).map(|record| record.tags.clone()).unwrap_or_default()
    }

    pub fn has_tag(&self, name: &str, tag: &str) -> bool {
        self.get(name).is_some_and(|record| record.has_tag(tag))
    }

    /// Record for `name`, created empty on first use
    pub fn entry(&mut self, name: &str) -> &mut AliasMetadata {
        self.records.entry(name.to_string()).or_default()
    }

    pub fn insert(&mut self, name: &str, record: AliasMetadata) {
        self.records.insert(name.to_string(), record);
    }

    pub fn remove(&mut self, name: &str) -> Option<AliasMetadata> {
        self.records.remove(name)
    }

    /// Set `created` if the record has none yet
    pub fn mark_created(&mut self, name: &str) {
        let record = self.entry(name);
        if record.created.is_none() {
            record.created = Some(now_iso8601());
        }
    }

    /// Move a record to a new key, replacing anything stored there
    pub fn rename(&mut self, old: &str, new: &str) {
        match self.records.remove(old) {
            Some(record) => {
                self.records.insert(new.to_string(), record);
            }
            None => {
                self.records.remove(new);
            }
        }
    }

    /// Drop the record when it no longer carries anything
    pub fn prune(&mut self, name: &str) {
        if self.records.get(name).is_some_and(AliasMetadata::is_empty) {
            self.records.remove(name);
        }
    }

    /// Keep only records whose name satisfies `keep`
    pub fn retain<F: FnMut(&str) -> bool>(&mut self, mut keep: F) {
        self.records.retain(|name, _| keep(name.as_str()));
    }

    pub fn iter(&self) -> impl Iterator<Item = (&String, &AliasMetadata)> {
        self.records.iter()
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }
}
