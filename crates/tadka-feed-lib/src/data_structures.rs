use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::error::ParseBucketError;

/// Anything that carries an optional publication instant.
pub trait Timestamped {
    fn published_at(&self) -> Option<DateTime<Utc>>;
}

impl<T: Timestamped + ?Sized> Timestamped for &T {
    fn published_at(&self) -> Option<DateTime<Utc>> {
        (**self).published_at()
    }
}

impl Timestamped for Option<DateTime<Utc>> {
    fn published_at(&self) -> Option<DateTime<Utc>> {
        *self
    }
}

impl Timestamped for DateTime<Utc> {
    fn published_at(&self) -> Option<DateTime<Utc>> {
        Some(*self)
    }
}

/// Named time window used by the feed pages' filter tabs.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum Bucket {
    Latest,
    Today,
    Yesterday,
    ThisWeek,
    Last7Days,
    Last30Days,
    Last90Days,
    Last180Days,
    LastYear,
    Upcoming,
    ThisMonth,
    Last6Months,
}

impl Bucket {
    pub const ALL: [Bucket; 12] = [
        Bucket::Latest,
        Bucket::Today,
        Bucket::Yesterday,
        Bucket::ThisWeek,
        Bucket::Last7Days,
        Bucket::Last30Days,
        Bucket::Last90Days,
        Bucket::Last180Days,
        Bucket::LastYear,
        Bucket::Upcoming,
        Bucket::ThisMonth,
        Bucket::Last6Months,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Bucket::Latest => "latest",
            Bucket::Today => "today",
            Bucket::Yesterday => "yesterday",
            Bucket::ThisWeek => "thisWeek",
            Bucket::Last7Days => "last7Days",
            Bucket::Last30Days => "last30Days",
            Bucket::Last90Days => "last90Days",
            Bucket::Last180Days => "last180Days",
            Bucket::LastYear => "lastYear",
            Bucket::Upcoming => "upcoming",
            Bucket::ThisMonth => "thisMonth",
            Bucket::Last6Months => "last6Months",
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            Bucket::Latest => "Latest",
            Bucket::Today => "Today",
            Bucket::Yesterday => "Yesterday",
            Bucket::ThisWeek => "This Week",
            Bucket::Last7Days => "Last 7 Days",
            Bucket::Last30Days => "Last 30 Days",
            Bucket::Last90Days => "Last 90 Days",
            Bucket::Last180Days => "Last 180 Days",
            Bucket::LastYear => "Last Year",
            Bucket::Upcoming => "Upcoming",
            Bucket::ThisMonth => "This Month",
            Bucket::Last6Months => "Last 6 Months",
        }
    }

    /// Upper bound of `daysDiff` for the rolling-window buckets.
    pub fn max_days(&self) -> Option<i64> {
        match self {
            Bucket::Last7Days => Some(7),
            Bucket::Last30Days => Some(30),
            Bucket::Last90Days => Some(90),
            Bucket::Last180Days => Some(180),
            Bucket::LastYear => Some(365),
            _ => None,
        }
    }

    pub fn next(&self) -> Bucket {
        let idx = self.index();
        Bucket::ALL[(idx + 1) % Bucket::ALL.len()]
    }

    pub fn previous(&self) -> Bucket {
        let idx = self.index();
        Bucket::ALL[(idx + Bucket::ALL.len() - 1) % Bucket::ALL.len()]
    }

    pub fn index(&self) -> usize {
        Bucket::ALL
            .iter()
            .position(|b| b == self)
            .unwrap_or_default()
    }
}

impl fmt::Display for Bucket {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Bucket {
    type Err = ParseBucketError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Bucket::ALL
            .iter()
            .copied()
            .find(|b| b.as_str() == s)
            .ok_or_else(|| ParseBucketError::new(s))
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FeedItem {
    id: String,
    title: String,
    category: String,
    summary: Option<String>,
    slug: Option<String>,
    published_at: Option<DateTime<Utc>>,
}

impl FeedItem {
    pub fn new(
        id: String,
        title: String,
        category: String,
        published_at: Option<DateTime<Utc>>,
    ) -> Self {
        Self {
            id,
            title,
            category,
            summary: None,
            slug: None,
            published_at,
        }
    }

    pub fn with_summary(mut self, summary: impl Into<String>) -> Self {
        self.summary = Some(summary.into());
        self
    }

    pub fn with_slug(mut self, slug: impl Into<String>) -> Self {
        self.slug = Some(slug.into());
        self
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn title(&self) -> &str {
        &self.title
    }

    pub fn category(&self) -> &str {
        &self.category
    }

    pub fn summary(&self) -> Option<&str> {
        self.summary.as_deref()
    }

    pub fn slug(&self) -> Option<&str> {
        self.slug.as_deref()
    }

    pub fn is_dated(&self) -> bool {
        self.published_at.is_some()
    }
}

impl Timestamped for FeedItem {
    fn published_at(&self) -> Option<DateTime<Utc>> {
        self.published_at
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BucketCount {
    bucket: Bucket,
    count: usize,
}

impl BucketCount {
    pub fn new(bucket: Bucket, count: usize) -> Self {
        Self { bucket, count }
    }

    pub fn bucket(&self) -> Bucket {
        self.bucket
    }

    pub fn count(&self) -> usize {
        self.count
    }
}
