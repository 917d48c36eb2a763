//! Date-bucket classification of feed items.
//!
//! All calendar arithmetic (today, yesterday, week and month boundaries) is
//! done in a single timezone held by the classifier. Rolling windows
//! (`last7Days` and friends) use whole days elapsed between the two instants,
//! floored, so they do not depend on the zone at all.

use crate::data_structures::{Bucket, Timestamped};
use crate::error::ConfigError;
use chrono::{DateTime, Datelike, Days, Duration, Months, NaiveDate, NaiveDateTime, TimeZone, Utc};
use chrono_tz::Tz;
use tracing::debug;

/// Zone the feeds are displayed in.
pub const DEFAULT_TIMEZONE: Tz = chrono_tz::Asia::Kolkata;

#[derive(Debug, Clone, Copy)]
pub struct DateRangeClassifier {
    timezone: Tz,
}

impl DateRangeClassifier {
    pub fn new() -> Self {
        Self {
            timezone: DEFAULT_TIMEZONE,
        }
    }

    pub fn with_timezone(timezone: Tz) -> Self {
        Self { timezone }
    }

    pub fn from_timezone_name(name: &str) -> Result<Self, ConfigError> {
        let timezone: Tz = name
            .parse()
            .map_err(|_| ConfigError::UnknownTimezone(name.to_string()))?;
        Ok(Self::with_timezone(timezone))
    }

    pub fn timezone(&self) -> Tz {
        self.timezone
    }

    /// Keeps the items that fall inside `bucket`, preserving input order.
    pub fn classify<T: Timestamped + Clone>(
        &self,
        items: &[T],
        bucket: Bucket,
        now: DateTime<Utc>,
    ) -> Vec<T> {
        items
            .iter()
            .filter(|item| self.matches(item.published_at(), bucket, now))
            .cloned()
            .collect()
    }

    /// Like [`classify`](Self::classify), but takes the bucket's wire name.
    /// Unknown names select nothing.
    pub fn classify_named<T: Timestamped + Clone>(
        &self,
        items: &[T],
        bucket: &str,
        now: DateTime<Utc>,
    ) -> Vec<T> {
        match bucket.parse::<Bucket>() {
            Ok(bucket) => self.classify(items, bucket, now),
            Err(e) => {
                debug!(bucket = e.name(), "unknown bucket, selecting no items");
                Vec::new()
            }
        }
    }

    pub fn matches(
        &self,
        published_at: Option<DateTime<Utc>>,
        bucket: Bucket,
        now: DateTime<Utc>,
    ) -> bool {
        if bucket == Bucket::Latest {
            return true;
        }

        // Undated items only ever show up under `latest`.
        let Some(published_at) = published_at else {
            return false;
        };

        let today = self.local_date(now);
        let item_date = self.local_date(published_at);
        let days_diff = days_diff(published_at, now);

        match bucket {
            Bucket::Latest => true,
            Bucket::Today => item_date == today,
            Bucket::Yesterday => today.checked_sub_days(Days::new(1)) == Some(item_date),
            Bucket::ThisWeek => {
                let offset = u64::from(today.weekday().num_days_from_monday());
                match today.checked_sub_days(Days::new(offset)) {
                    Some(monday) => {
                        item_date >= monday
                            && monday
                                .checked_add_days(Days::new(6))
                                .map_or(true, |sunday| item_date <= sunday)
                    }
                    None => false,
                }
            }
            Bucket::Last7Days
            | Bucket::Last30Days
            | Bucket::Last90Days
            | Bucket::Last180Days
            | Bucket::LastYear => bucket
                .max_days()
                .map_or(false, |max| (0..=max).contains(&days_diff)),
            Bucket::Upcoming => item_date > today,
            Bucket::ThisMonth => {
                item_date.year() == today.year() && item_date.month() == today.month()
            }
            Bucket::Last6Months => {
                days_diff >= 0
                    && today
                        .checked_sub_months(Months::new(6))
                        .map_or(false, |start| item_date >= start)
            }
        }
    }

    /// Calendar date of `instant` in the classifier's zone.
    pub fn local_date(&self, instant: DateTime<Utc>) -> NaiveDate {
        instant.with_timezone(&self.timezone).date_naive()
    }

    /// Parses an ISO-8601 style timestamp. Values without an offset are read
    /// as wall-clock time in the classifier's zone.
    pub fn parse_timestamp(&self, raw: &str) -> Option<DateTime<Utc>> {
        let raw = raw.trim();
        if raw.is_empty() {
            return None;
        }

        if let Ok(dt) = DateTime::parse_from_rfc3339(raw) {
            return Some(dt.with_timezone(&Utc));
        }

        let naive = ["%Y-%m-%dT%H:%M:%S%.f", "%Y-%m-%d %H:%M:%S%.f", "%Y-%m-%dT%H:%M"]
            .iter()
            .find_map(|fmt| NaiveDateTime::parse_from_str(raw, fmt).ok())
            .or_else(|| {
                NaiveDate::parse_from_str(raw, "%Y-%m-%d")
                    .ok()
                    .and_then(|date| date.and_hms_opt(0, 0, 0))
            })?;

        // Wall-clock times inside a DST gap are pushed past it.
        self.timezone
            .from_local_datetime(&naive)
            .earliest()
            .or_else(|| {
                self.timezone
                    .from_local_datetime(&(naive + Duration::hours(1)))
                    .earliest()
            })
            .map(|dt| dt.with_timezone(&Utc))
    }
}

impl Default for DateRangeClassifier {
    fn default() -> Self {
        Self::new()
    }
}

/// Whole days from `published_at` to `now`, floored. Negative for future items.
pub fn days_diff(published_at: DateTime<Utc>, now: DateTime<Utc>) -> i64 {
    let elapsed = now - published_at;
    let days = elapsed.num_days();
    // num_days truncates toward zero; step down for partial negative days.
    if elapsed < Duration::days(days) {
        days - 1
    } else {
        days
    }
}

/// Stable newest-first ordering; undated items sink to the end.
pub fn sort_latest_first<T: Timestamped>(items: &mut [T]) {
    items.sort_by(|a, b| b.published_at().cmp(&a.published_at()));
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data_structures::FeedItem;

    fn ist(year: i32, month: u32, day: u32, hour: u32, min: u32) -> DateTime<Utc> {
        DEFAULT_TIMEZONE
            .with_ymd_and_hms(year, month, day, hour, min, 0)
            .unwrap()
            .with_timezone(&Utc)
    }

    fn item(id: &str, published_at: Option<DateTime<Utc>>) -> FeedItem {
        FeedItem::new(
            id.to_string(),
            format!("Story {}", id),
            "movies".to_string(),
            published_at,
        )
    }

    fn ids(items: &[FeedItem]) -> Vec<&str> {
        items.iter().map(|i| i.id()).collect()
    }

    fn sample_items(now: DateTime<Utc>) -> Vec<FeedItem> {
        vec![
            item("a", Some(now - Duration::hours(8))),
            item("b", Some(now - Duration::days(1))),
            item("c", Some(now - Duration::days(7))),
            item("d", Some(now - Duration::days(40))),
            item("e", None),
            item("f", Some(now - Duration::days(200))),
        ]
    }

    #[test]
    fn test_empty_input_yields_empty_output_for_every_bucket() {
        let classifier = DateRangeClassifier::new();
        let now = ist(2024, 6, 15, 10, 0);
        let items: Vec<FeedItem> = Vec::new();

        for bucket in Bucket::ALL {
            assert!(classifier.classify(&items, bucket, now).is_empty());
        }
    }

    #[test]
    fn test_latest_is_identity_including_undated() {
        let classifier = DateRangeClassifier::new();
        let now = ist(2024, 6, 15, 10, 0);
        let items = sample_items(now);

        let latest = classifier.classify(&items, Bucket::Latest, now);
        assert_eq!(latest, items);
    }

    #[test]
    fn test_undated_items_excluded_from_every_other_bucket() {
        let classifier = DateRangeClassifier::new();
        let now = ist(2024, 6, 15, 10, 0);
        let items = vec![item("undated", None)];

        for bucket in Bucket::ALL.iter().filter(|b| **b != Bucket::Latest) {
            assert!(classifier.classify(&items, *bucket, now).is_empty());
        }
    }

    #[test]
    fn test_unknown_bucket_name_fails_closed() {
        let classifier = DateRangeClassifier::new();
        let now = ist(2024, 6, 15, 10, 0);
        let items = sample_items(now);

        assert!(classifier.classify_named(&items, "everything", now).is_empty());
        assert!(classifier.classify_named(&items, "", now).is_empty());
        assert_eq!(classifier.classify_named(&items, "latest", now).len(), items.len());
    }

    #[test]
    fn test_today_is_subset_of_last_7_days() {
        let classifier = DateRangeClassifier::new();
        let now = ist(2024, 6, 15, 10, 0);
        let items = sample_items(now);

        let today = classifier.classify(&items, Bucket::Today, now);
        let week = classifier.classify(&items, Bucket::Last7Days, now);
        assert!(!today.is_empty());
        assert!(today.iter().all(|i| week.contains(i)));
    }

    #[test]
    fn test_classify_is_idempotent() {
        let classifier = DateRangeClassifier::new();
        let now = ist(2024, 6, 15, 10, 0);
        let items = sample_items(now);

        for bucket in Bucket::ALL {
            let once = classifier.classify(&items, bucket, now);
            let twice = classifier.classify(&once, bucket, now);
            assert_eq!(once, twice, "bucket {}", bucket);
        }
    }

    #[test]
    fn test_survivors_keep_input_order() {
        let classifier = DateRangeClassifier::new();
        let now = ist(2024, 6, 15, 10, 0);
        let items = vec![
            item("old", Some(now - Duration::days(3))),
            item("new", Some(now - Duration::hours(1))),
            item("mid", Some(now - Duration::days(2))),
        ];

        let filtered = classifier.classify(&items, Bucket::Last7Days, now);
        assert_eq!(ids(&filtered), vec!["old", "new", "mid"]);
    }

    #[test]
    fn test_same_day_item() {
        let classifier = DateRangeClassifier::new();
        let now = ist(2024, 6, 15, 10, 0);
        let published = Some(ist(2024, 6, 15, 2, 0));

        assert!(classifier.matches(published, Bucket::Today, now));
        assert!(classifier.matches(published, Bucket::ThisWeek, now));
        assert!(classifier.matches(published, Bucket::Last7Days, now));
        assert!(!classifier.matches(published, Bucket::Yesterday, now));
    }

    #[test]
    fn test_exactly_seven_days_back_is_in_last_7_days() {
        let classifier = DateRangeClassifier::new();
        let now = ist(2024, 6, 15, 10, 0);
        let published = ist(2024, 6, 8, 10, 0);

        assert_eq!(days_diff(published, now), 7);
        assert!(classifier.matches(Some(published), Bucket::Last7Days, now));
        assert!(!classifier.matches(Some(published), Bucket::Today, now));
        assert!(!classifier.matches(Some(published), Bucket::Yesterday, now));

        let a_bit_earlier = published - Duration::days(1);
        assert!(!classifier.matches(Some(a_bit_earlier), Bucket::Last7Days, now));
    }

    #[test]
    fn test_days_diff_floors() {
        let now = ist(2024, 6, 15, 10, 0);
        assert_eq!(days_diff(now - Duration::hours(23), now), 0);
        assert_eq!(days_diff(now - Duration::hours(25), now), 1);
        assert_eq!(days_diff(now + Duration::hours(1), now), -1);
    }

    #[test]
    fn test_yesterday() {
        let classifier = DateRangeClassifier::new();
        let now = ist(2024, 6, 15, 0, 30);

        assert!(classifier.matches(Some(ist(2024, 6, 14, 23, 59)), Bucket::Yesterday, now));
        assert!(classifier.matches(Some(ist(2024, 6, 14, 0, 0)), Bucket::Yesterday, now));
        assert!(!classifier.matches(Some(ist(2024, 6, 13, 23, 59)), Bucket::Yesterday, now));
        assert!(!classifier.matches(Some(ist(2024, 6, 15, 0, 10)), Bucket::Yesterday, now));
    }

    #[test]
    fn test_rolling_windows_exclude_future_items() {
        let classifier = DateRangeClassifier::new();
        let now = ist(2024, 6, 15, 10, 0);
        let future = Some(now + Duration::minutes(5));

        for bucket in [
            Bucket::Last7Days,
            Bucket::Last30Days,
            Bucket::Last90Days,
            Bucket::Last180Days,
            Bucket::LastYear,
            Bucket::Last6Months,
        ] {
            assert!(!classifier.matches(future, bucket, now), "bucket {}", bucket);
        }
    }

    #[test]
    fn test_sub_second_future_items_are_not_in_rolling_windows() {
        let classifier = DateRangeClassifier::new();
        let now = Utc.with_ymd_and_hms(2024, 6, 15, 4, 30, 0).unwrap();
        let future = now + Duration::milliseconds(250);

        assert_eq!(days_diff(future, now), -1);
        assert_eq!(days_diff(now + Duration::nanoseconds(1), now), -1);
        assert_eq!(days_diff(now, now), 0);

        for bucket in [
            Bucket::Last7Days,
            Bucket::Last30Days,
            Bucket::Last90Days,
            Bucket::Last180Days,
            Bucket::LastYear,
            Bucket::Last6Months,
        ] {
            assert!(!classifier.matches(Some(future), bucket, now), "bucket {}", bucket);
        }
        assert!(classifier.matches(Some(now), Bucket::Last7Days, now));
    }

    #[test]
    fn test_naive_timestamp_in_dst_gap_is_shifted_forward() {
        let classifier = DateRangeClassifier::with_timezone(chrono_tz::America::New_York);

        // 02:30 does not exist on 2024-03-10 in New York; it reads as 03:30 EDT.
        assert_eq!(
            classifier.parse_timestamp("2024-03-10T02:30:00"),
            Some(Utc.with_ymd_and_hms(2024, 3, 10, 7, 30, 0).unwrap())
        );
        // Ambiguous fall-back hour takes the earlier instant.
        assert_eq!(
            classifier.parse_timestamp("2024-11-03T01:30:00"),
            Some(Utc.with_ymd_and_hms(2024, 11, 3, 5, 30, 0).unwrap())
        );
    }

    #[test]
    fn test_rolling_window_upper_bounds() {
        let classifier = DateRangeClassifier::new();
        let now = ist(2024, 6, 15, 10, 0);

        for bucket in [
            Bucket::Last30Days,
            Bucket::Last90Days,
            Bucket::Last180Days,
            Bucket::LastYear,
        ] {
            let max = bucket.max_days().unwrap();
            let edge = Some(now - Duration::days(max));
            let past_edge = Some(now - Duration::days(max + 1));
            assert!(classifier.matches(edge, bucket, now), "bucket {}", bucket);
            assert!(!classifier.matches(past_edge, bucket, now), "bucket {}", bucket);
        }
    }

    #[test]
    fn test_this_week_runs_monday_to_sunday() {
        let classifier = DateRangeClassifier::new();
        // Saturday
        let now = ist(2024, 6, 15, 10, 0);

        assert!(classifier.matches(Some(ist(2024, 6, 10, 0, 0)), Bucket::ThisWeek, now));
        assert!(classifier.matches(Some(ist(2024, 6, 16, 23, 0)), Bucket::ThisWeek, now));
        assert!(!classifier.matches(Some(ist(2024, 6, 9, 23, 59)), Bucket::ThisWeek, now));
        assert!(!classifier.matches(Some(ist(2024, 6, 17, 0, 0)), Bucket::ThisWeek, now));
    }

    #[test]
    fn test_this_week_on_sunday_reaches_back_to_monday() {
        let classifier = DateRangeClassifier::new();
        let sunday = ist(2024, 6, 16, 18, 0);

        assert!(classifier.matches(Some(ist(2024, 6, 10, 9, 0)), Bucket::ThisWeek, sunday));
        assert!(!classifier.matches(Some(ist(2024, 6, 9, 9, 0)), Bucket::ThisWeek, sunday));
    }

    #[test]
    fn test_this_month() {
        let classifier = DateRangeClassifier::new();
        let now = ist(2024, 6, 15, 10, 0);

        assert!(classifier.matches(Some(ist(2024, 6, 1, 0, 0)), Bucket::ThisMonth, now));
        assert!(classifier.matches(Some(ist(2024, 6, 30, 20, 0)), Bucket::ThisMonth, now));
        assert!(!classifier.matches(Some(ist(2024, 5, 31, 23, 0)), Bucket::ThisMonth, now));
        assert!(!classifier.matches(Some(ist(2023, 6, 15, 10, 0)), Bucket::ThisMonth, now));
    }

    #[test]
    fn test_upcoming_is_strictly_after_today() {
        let classifier = DateRangeClassifier::new();
        let now = ist(2024, 6, 15, 10, 0);

        assert!(classifier.matches(Some(ist(2024, 6, 20, 0, 0)), Bucket::Upcoming, now));
        assert!(!classifier.matches(Some(ist(2024, 6, 10, 0, 0)), Bucket::Upcoming, now));
        // Later today is not upcoming.
        assert!(!classifier.matches(Some(ist(2024, 6, 15, 22, 0)), Bucket::Upcoming, now));
        assert!(classifier.matches(Some(ist(2024, 6, 16, 0, 0)), Bucket::Upcoming, now));
    }

    #[test]
    fn test_last_6_months_uses_calendar_months() {
        let classifier = DateRangeClassifier::new();
        let now = ist(2024, 6, 15, 10, 0);

        assert!(classifier.matches(Some(ist(2023, 12, 15, 0, 0)), Bucket::Last6Months, now));
        assert!(!classifier.matches(Some(ist(2023, 12, 14, 23, 0)), Bucket::Last6Months, now));

        let month_end = ist(2024, 8, 31, 12, 0);
        assert!(classifier.matches(Some(ist(2024, 2, 29, 0, 0)), Bucket::Last6Months, month_end));
        assert!(!classifier.matches(Some(ist(2024, 2, 28, 23, 0)), Bucket::Last6Months, month_end));
    }

    #[test]
    fn test_day_boundaries_follow_classifier_timezone() {
        let kolkata = DateRangeClassifier::new();
        let utc = DateRangeClassifier::with_timezone(chrono_tz::UTC);
        let now = Utc.with_ymd_and_hms(2024, 6, 15, 4, 0, 0).unwrap();
        // 01:30 on the 15th in Kolkata, still the 14th in UTC.
        let published = Some(Utc.with_ymd_and_hms(2024, 6, 14, 20, 0, 0).unwrap());

        assert!(kolkata.matches(published, Bucket::Today, now));
        assert!(!utc.matches(published, Bucket::Today, now));
        assert!(utc.matches(published, Bucket::Yesterday, now));
    }

    #[test]
    fn test_from_timezone_name() {
        let classifier = DateRangeClassifier::from_timezone_name("America/New_York").unwrap();
        assert_eq!(classifier.timezone(), chrono_tz::America::New_York);

        let err = DateRangeClassifier::from_timezone_name("Mars/Olympus").unwrap_err();
        assert_eq!(err, ConfigError::UnknownTimezone("Mars/Olympus".to_string()));
    }

    #[test]
    fn test_parse_timestamp_formats() {
        let classifier = DateRangeClassifier::new();

        assert_eq!(
            classifier.parse_timestamp("2024-06-15T10:00:00Z"),
            Some(Utc.with_ymd_and_hms(2024, 6, 15, 10, 0, 0).unwrap())
        );
        assert_eq!(
            classifier.parse_timestamp("2024-06-15T10:00:00+05:30"),
            Some(ist(2024, 6, 15, 10, 0))
        );
        assert_eq!(
            classifier.parse_timestamp("2024-06-15T10:00:00.250"),
            Some(ist(2024, 6, 15, 10, 0) + Duration::milliseconds(250))
        );
        assert_eq!(
            classifier.parse_timestamp("2024-06-15 10:00:00"),
            Some(ist(2024, 6, 15, 10, 0))
        );
        assert_eq!(
            classifier.parse_timestamp("2024-06-15"),
            Some(ist(2024, 6, 15, 0, 0))
        );
        assert_eq!(classifier.parse_timestamp("yesterday"), None);
        assert_eq!(classifier.parse_timestamp(""), None);
        assert_eq!(classifier.parse_timestamp("2024-13-40"), None);
    }

    #[test]
    fn test_sort_latest_first_puts_undated_last() {
        let now = ist(2024, 6, 15, 10, 0);
        let mut items = vec![
            item("undated", None),
            item("old", Some(now - Duration::days(3))),
            item("new", Some(now)),
            item("mid", Some(now - Duration::days(1))),
        ];

        sort_latest_first(&mut items);
        assert_eq!(ids(&items), vec!["new", "mid", "old", "undated"]);
    }

    #[test]
    fn test_works_with_bare_timestamps() {
        let classifier = DateRangeClassifier::new();
        let now = ist(2024, 6, 15, 10, 0);
        let stamps = vec![Some(now), None, Some(now - Duration::days(2))];

        let today = classifier.classify(&stamps, Bucket::Today, now);
        assert_eq!(today, vec![Some(now)]);
    }
}
