//! Remote sound manifest: a bare list or `{ "files": [...] }`, where each entry
//! is either a plain URL string or an object carrying category metadata.

use crate::errors::{AppError, AppResult};
use crate::models::category::Category;
use serde_json::Value;
use std::path::PathBuf;

/// Where a downloaded clip lands, relative to the cloud root.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EntryTarget {
    Base(Category),
    /// Season or holiday sub-pool of a category (`<category>/<id>`).
    Variant(Category, String),
    Tag(Category, String),
    /// Dedicated holiday clips (`holidays/<id>/<kind>`), kind is `common` or `greeting`.
    Holiday { id: String, kind: String },
}

impl EntryTarget {
    pub fn relative_dir(&self) -> PathBuf {
        match self {
            EntryTarget::Base(cat) => PathBuf::from(cat.as_str()),
            EntryTarget::Variant(cat, id) => PathBuf::from(cat.as_str()).join(id),
            EntryTarget::Tag(cat, tag) => PathBuf::from(cat.as_str()).join("tags").join(tag),
            EntryTarget::Holiday { id, kind } => PathBuf::from("holidays").join(id).join(kind),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ManifestEntry {
    pub url: String,
    pub file_name: String,
    pub target: EntryTarget,
}

impl ManifestEntry {
    pub fn relative_path(&self) -> PathBuf {
        self.target.relative_dir().join(&self.file_name)
    }

    /// Build an entry from one manifest item; `None` for anything unusable.
    pub fn from_value(item: &Value) -> Option<Self> {
        match item {
            Value::String(url) => {
                let file_name = file_name_from_url(url)?;
                Some(Self {
                    url: url.clone(),
                    file_name,
                    target: EntryTarget::Base(Category::Start),
                })
            }
            Value::Object(map) => {
                let field = |key: &str| {
                    map.get(key)
                        .and_then(Value::as_str)
                        .map(|s| s.trim().to_lowercase())
                        .filter(|s| !s.is_empty())
                };

                let url = map.get("url").and_then(Value::as_str)?.trim().to_string();
                let file_name = file_name_from_url(&url)?;
                let raw_category = field("category");
                let season = field("season").filter(|s| safe_component(s));
                let tag = field("tag").filter(|s| safe_component(s));
                let holiday = field("holiday").filter(|s| safe_component(s));
                let known = raw_category.as_deref().and_then(Category::parse);

                let target = match (known, holiday) {
                    (None, Some(id)) => EntryTarget::Holiday {
                        id,
                        kind: field("type")
                            .filter(|s| safe_component(s))
                            .unwrap_or_else(|| "common".to_string()),
                    },
                    (Some(cat), Some(id)) => EntryTarget::Variant(cat, id),
                    (cat, None) => {
                        let cat = cat.unwrap_or(Category::Start);
                        match (season, tag) {
                            (Some(season), _) => EntryTarget::Variant(cat, season),
                            (None, Some(tag)) => EntryTarget::Tag(cat, tag),
                            (None, None) => EntryTarget::Base(cat),
                        }
                    }
                };

                Some(Self {
                    url,
                    file_name,
                    target,
                })
            }
            _ => None,
        }
    }
}

#[derive(Debug, Default)]
pub struct Manifest {
    pub entries: Vec<ManifestEntry>,
    /// Items dropped because they had no usable URL or file name.
    pub skipped: usize,
}

impl Manifest {
    pub fn parse(text: &str) -> AppResult<Self> {
        let doc: Value = serde_json::from_str(text)?;
        Self::from_value(&doc)
    }

    pub fn from_value(doc: &Value) -> AppResult<Self> {
        let items = match doc {
            Value::Array(items) => items,
            Value::Object(map) => match map.get("files") {
                Some(Value::Array(items)) => items,
                Some(_) => return Err(AppError::Manifest("`files` is not a list".into())),
                None => return Ok(Self::default()),
            },
            _ => return Err(AppError::Manifest("expected a list or an object".into())),
        };

        let mut manifest = Self::default();
        for item in items {
            match ManifestEntry::from_value(item) {
                Some(entry) => manifest.entries.push(entry),
                None => manifest.skipped += 1,
            }
        }
        Ok(manifest)
    }
}

/// Last path segment of a URL, without query or fragment.
pub fn file_name_from_url(url: &str) -> Option<String> {
    let without_query = url.split(['?', '#']).next()?;
    let name = without_query.rsplit('/').next()?.trim();
    if safe_component(name) {
        Some(name.to_string())
    } else {
        None
    }
}

/// A single path component that cannot escape its parent directory.
fn safe_component(s: &str) -> bool {
    !s.is_empty() && s != "." && s != ".." && !s.contains(['/', '\\', ':'])
}
