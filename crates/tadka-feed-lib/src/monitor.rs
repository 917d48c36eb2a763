use crate::classifier::{sort_latest_first, DateRangeClassifier};
use crate::data_structures::{Bucket, BucketCount, FeedItem, Timestamped};
use crate::loader::FeedLoader;
use anyhow::Result;
use chrono::{DateTime, Utc};
use std::collections::HashMap;
use std::path::Path;

/// Holds the loaded feed and answers the questions the pages ask of it.
pub struct FeedMonitor {
    items: Vec<FeedItem>,
    classifier: DateRangeClassifier,
    loader: FeedLoader,
}

impl FeedMonitor {
    pub fn new() -> Self {
        Self::with_classifier(DateRangeClassifier::new())
    }

    pub fn with_classifier(classifier: DateRangeClassifier) -> Self {
        Self {
            items: Vec::new(),
            classifier,
            loader: FeedLoader::with_classifier(classifier),
        }
    }

    pub fn classifier(&self) -> &DateRangeClassifier {
        &self.classifier
    }

    pub fn load_data<P: AsRef<Path>>(&mut self, path: P) -> Result<()> {
        self.items = self.loader.load_from_file(path)?;
        Ok(())
    }

    pub fn load_directory<P: AsRef<Path>>(&mut self, dir_path: P) -> Result<()> {
        self.items = self.loader.load_from_directory(dir_path)?;
        Ok(())
    }

    pub fn load_with_fallback<P: AsRef<Path>>(&mut self, sources: &[P]) -> Result<()> {
        self.items = self.loader.load_with_fallback(sources)?;
        Ok(())
    }

    pub fn add_item(&mut self, item: FeedItem) {
        self.items.push(item);
    }

    pub fn items(&self) -> &[FeedItem] {
        &self.items
    }

    /// Items in `bucket`, newest first.
    pub fn filtered(&self, bucket: Bucket, now: DateTime<Utc>) -> Vec<FeedItem> {
        let mut items = self.classifier.classify(&self.items, bucket, now);
        sort_latest_first(&mut items);
        items
    }

    pub fn filtered_named(&self, bucket: &str, now: DateTime<Utc>) -> Vec<FeedItem> {
        let mut items = self.classifier.classify_named(&self.items, bucket, now);
        sort_latest_first(&mut items);
        items
    }

    pub fn bucket_counts(&self, now: DateTime<Utc>) -> Vec<BucketCount> {
        Bucket::ALL
            .iter()
            .map(|bucket| {
                let count = self
                    .items
                    .iter()
                    .filter(|item| self.classifier.matches(item.published_at(), *bucket, now))
                    .count();
                BucketCount::new(*bucket, count)
            })
            .collect()
    }

    pub fn count_in(&self, bucket: Bucket, now: DateTime<Utc>) -> usize {
        self.items
            .iter()
            .filter(|item| self.classifier.matches(item.published_at(), bucket, now))
            .count()
    }

    pub fn category_breakdown(&self) -> HashMap<String, usize> {
        let mut breakdown = HashMap::new();

        for item in &self.items {
            *breakdown.entry(item.category().to_string()).or_insert(0) += 1;
        }

        breakdown
    }

    pub fn latest_published(&self) -> Option<DateTime<Utc>> {
        self.items.iter().filter_map(|item| item.published_at()).max()
    }

    pub fn undated_count(&self) -> usize {
        self.items.iter().filter(|item| !item.is_dated()).count()
    }

    pub fn item_count(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn clear_data(&mut self) {
        self.items.clear();
    }
}

impl Default for FeedMonitor {
    fn default() -> Self {
        Self::new()
    }
}
