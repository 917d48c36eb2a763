use crate::classifier::DateRangeClassifier;
use crate::data_structures::FeedItem;
use crate::error::ConfigError;
use anyhow::{Context, Result};
use chrono::{DateTime, Utc};
use serde_json::{Map, Value};
use std::fs;
use std::path::Path;
use tracing::{debug, warn};

const TIMESTAMP_FIELDS: [&str; 7] = [
    "publishedAt",
    "published_at",
    "releaseDate",
    "release_date",
    "createdAt",
    "created_at",
    "date",
];

const WRAPPER_FIELDS: [&str; 5] = ["articles", "items", "data", "releases", "galleries"];

pub struct FeedLoader {
    classifier: DateRangeClassifier,
}

impl FeedLoader {
    pub fn new() -> Self {
        Self {
            classifier: DateRangeClassifier::new(),
        }
    }

    /// Naive timestamps in the feed are read in the classifier's zone.
    pub fn with_classifier(classifier: DateRangeClassifier) -> Self {
        Self { classifier }
    }

    pub fn load_from_file<P: AsRef<Path>>(&self, path: P) -> Result<Vec<FeedItem>> {
        let content = fs::read_to_string(&path)
            .with_context(|| format!("Failed to open file: {}", path.as_ref().display()))?;

        self.parse_document(&content)
            .with_context(|| format!("Failed to parse feed: {}", path.as_ref().display()))
    }

    pub fn load_from_directory<P: AsRef<Path>>(&self, dir_path: P) -> Result<Vec<FeedItem>> {
        let mut all_items = Vec::new();
        self.load_from_directory_recursive(dir_path.as_ref(), &mut all_items)?;
        Ok(all_items)
    }

    /// Tries each source in turn and keeps the first one that yields items.
    pub fn load_with_fallback<P: AsRef<Path>>(&self, sources: &[P]) -> Result<Vec<FeedItem>> {
        if sources.is_empty() {
            return Err(ConfigError::NoSources.into());
        }

        let mut last_error = None;

        for source in sources {
            let source = source.as_ref();
            let result = if source.is_dir() {
                self.load_from_directory(source)
            } else {
                self.load_from_file(source)
            };

            match result {
                Ok(items) if !items.is_empty() => {
                    debug!(source = %source.display(), count = items.len(), "loaded feed");
                    return Ok(items);
                }
                Ok(_) => {
                    debug!(source = %source.display(), "feed source is empty, trying next");
                }
                Err(e) => {
                    warn!(source = %source.display(), error = %e, "feed source failed, trying next");
                    last_error = Some(e);
                }
            }
        }

        match last_error {
            Some(e) => Err(e),
            None => Ok(Vec::new()),
        }
    }

    fn load_from_directory_recursive(&self, dir_path: &Path, items: &mut Vec<FeedItem>) -> Result<()> {
        let dir = fs::read_dir(dir_path)
            .with_context(|| format!("Failed to read directory: {}", dir_path.display()))?;

        for entry in dir {
            let entry = entry.context("Failed to read directory entry")?;
            let path = entry.path();

            if path.is_file() {
                if path.extension().is_some_and(|ext| ext == "json") {
                    match self.load_from_file(&path) {
                        Ok(mut file_items) => items.append(&mut file_items),
                        Err(e) => {
                            warn!(path = %path.display(), error = %e, "skipping feed file");
                        }
                    }
                }
            } else if path.is_dir() {
                if let Err(e) = self.load_from_directory_recursive(&path, items) {
                    warn!(path = %path.display(), error = %e, "skipping feed directory");
                }
            }
        }

        Ok(())
    }

    pub fn parse_document(&self, content: &str) -> Result<Vec<FeedItem>> {
        let json: Value = serde_json::from_str(content).context("Failed to parse JSON")?;

        let records = match &json {
            Value::Array(records) => records,
            Value::Object(map) => WRAPPER_FIELDS
                .iter()
                .find_map(|key| map.get(*key).and_then(|v| v.as_array()))
                .ok_or_else(|| anyhow::anyhow!("No item array found in document"))?,
            _ => return Err(anyhow::anyhow!("Feed document must be an array or object")),
        };

        let mut items = Vec::with_capacity(records.len());
        for (index, record) in records.iter().enumerate() {
            match self.parse_record(record) {
                Ok(item) => items.push(item),
                Err(e) => {
                    warn!(index, error = %e, "skipping feed record");
                }
            }
        }

        Ok(items)
    }

    fn parse_record(&self, record: &Value) -> Result<FeedItem> {
        let object = record
            .as_object()
            .ok_or_else(|| anyhow::anyhow!("Record is not an object"))?;

        let id = self.extract_id(object)?;
        let title = self
            .extract_string(object, "title")
            .unwrap_or_else(|_| "Untitled".to_string());
        let category = self
            .extract_string(object, "category")
            .unwrap_or_else(|_| "general".to_string());

        let mut item = FeedItem::new(id, title, category, self.extract_timestamp(object));

        if let Ok(summary) = self
            .extract_string(object, "summary")
            .or_else(|_| self.extract_string(object, "description"))
        {
            item = item.with_summary(summary);
        }
        if let Ok(slug) = self.extract_string(object, "slug") {
            item = item.with_slug(slug);
        }

        Ok(item)
    }

    /// First timestamp field present wins; an unparseable value leaves the item undated.
    fn extract_timestamp(&self, object: &Map<String, Value>) -> Option<DateTime<Utc>> {
        let raw = TIMESTAMP_FIELDS
            .iter()
            .find_map(|key| object.get(*key).and_then(|v| v.as_str()))?;
        self.classifier.parse_timestamp(raw)
    }

    fn extract_id(&self, object: &Map<String, Value>) -> Result<String> {
        ["id", "_id"]
            .iter()
            .find_map(|key| match object.get(*key) {
                Some(Value::String(s)) if !s.is_empty() => Some(s.clone()),
                Some(Value::Number(n)) => Some(n.to_string()),
                _ => None,
            })
            .ok_or_else(|| anyhow::anyhow!("Missing or invalid 'id' field"))
    }

    fn extract_string(&self, object: &Map<String, Value>, key: &str) -> Result<String> {
        object
            .get(key)
            .and_then(|v| v.as_str())
            .map(|s| s.to_string())
            .ok_or_else(|| anyhow::anyhow!("Missing or invalid '{}' field", key))
    }
}

impl Default for FeedLoader {
    fn default() -> Self {
        Self::new()
    }
}
