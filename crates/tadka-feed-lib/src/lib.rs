pub mod classifier;
pub mod clock;
pub mod data_structures;
pub mod error;
pub mod loader;
pub mod monitor;

pub use classifier::{days_diff, sort_latest_first, DateRangeClassifier, DEFAULT_TIMEZONE};
pub use clock::{Clock, FixedClock, SystemClock};
pub use data_structures::{Bucket, BucketCount, FeedItem, Timestamped};
pub use error::{ConfigError, ParseBucketError};
pub use loader::FeedLoader;
pub use monitor::FeedMonitor;

pub use anyhow::Result;
pub use chrono::{DateTime, Duration, Utc};
pub use chrono_tz::Tz;

pub mod prelude {
    pub use crate::classifier::DateRangeClassifier;
    pub use crate::clock::{Clock, SystemClock};
    pub use crate::data_structures::{Bucket, FeedItem, Timestamped};
    pub use crate::monitor::FeedMonitor;
    pub use anyhow::Result;
    pub use chrono::{DateTime, Utc};
}
