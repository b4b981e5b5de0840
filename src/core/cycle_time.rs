//! Cycle-time derivation from an issue's status-change history.

use chrono::{DateTime, Datelike, Utc, Weekday};

use super::errors::{Error, Result};
use super::status::StatusMap;
use super::{CycleTimeSegments, StatusChange};

/// Count the calendar days in `[start, end)` that fall Monday through
/// Friday. Partial days are not fractionally weighted: a Friday 00:00 to
/// Monday 00:00 interval is exactly one business day.
///
/// Pure over its two arguments; no stored calendar.
pub fn business_days_between(start: DateTime<Utc>, end: DateTime<Utc>) -> f64 {
    if start >= end {
        return 0.0;
    }

    let last = end.date_naive();
    let mut current = start.date_naive();
    let mut days = 0u64;
    while current < last {
        if !matches!(current.weekday(), Weekday::Sat | Weekday::Sun) {
            days += 1;
        }
        let Some(next) = current.succ_opt() else {
            break;
        };
        current = next;
    }
    days as f64
}

/// Walk an issue's ordered status-change history and accumulate business
/// days spent in each active-work category.
///
/// Each interval `[change[i], change[i+1])` is attributed to the category
/// of its *starting* status; the final interval runs from the last change
/// to `now` under the same rule, covering issues still in flight. Issues
/// that move backward (rework) accumulate into the same buckets; cycle
/// time is cumulative, never reset.
pub fn cycle_time_segments(
    key: &str,
    history: &[StatusChange],
    now: DateTime<Utc>,
    statuses: &StatusMap,
) -> Result<CycleTimeSegments> {
    for pair in history.windows(2) {
        if pair[1].timestamp < pair[0].timestamp {
            return Err(Error::malformed_history(
                key,
                format!(
                    "status change at {} precedes the one before it at {}",
                    pair[1].timestamp, pair[0].timestamp
                ),
            ));
        }
    }

    let mut segments = CycleTimeSegments::default();
    for (i, change) in history.iter().enumerate() {
        let category = statuses
            .classify(&change.status)
            .ok_or_else(|| Error::unknown_status(key, &change.status))?;
        if !category.is_active_work() {
            continue;
        }
        let end = history
            .get(i + 1)
            .map(|next| next.timestamp)
            .unwrap_or(now);
        segments.add(category, business_days_between(change.timestamp, end));
    }
    Ok(segments)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::status::StatusCategory;
    use chrono::TimeZone;

    fn ts(y: i32, m: u32, d: u32, h: u32) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(y, m, d, h, 0, 0).unwrap()
    }

    fn statuses() -> StatusMap {
        StatusMap::from_entries([
            ("to do", StatusCategory::Unstarted),
            ("started", StatusCategory::Started),
            ("blocked", StatusCategory::Blocked),
            ("peer review", StatusCategory::PeerReview),
            ("finished", StatusCategory::Finished),
            ("delivered", StatusCategory::Delivered),
            ("accepted", StatusCategory::Accepted),
            ("rejected", StatusCategory::Rejected),
        ])
    }

    fn change(status: &str, timestamp: DateTime<Utc>) -> StatusChange {
        StatusChange {
            status: status.to_string(),
            timestamp,
        }
    }

    #[test]
    fn weekend_is_excluded() {
        // 2025-01-03 is a Friday; Friday 00:00 -> Monday 00:00 is one
        // business day (Saturday and Sunday drop out).
        assert_eq!(
            business_days_between(ts(2025, 1, 3, 0), ts(2025, 1, 6, 0)),
            1.0
        );
    }

    #[test]
    fn monday_to_friday_is_four_days() {
        // 2025-01-06 is a Monday.
        assert_eq!(
            business_days_between(ts(2025, 1, 6, 0), ts(2025, 1, 10, 0)),
            4.0
        );
    }

    #[test]
    fn inverted_interval_is_zero() {
        assert_eq!(
            business_days_between(ts(2025, 1, 10, 0), ts(2025, 1, 6, 0)),
            0.0
        );
    }

    #[test]
    fn weekend_only_interval_is_zero() {
        // Saturday to Monday.
        assert_eq!(
            business_days_between(ts(2025, 1, 4, 0), ts(2025, 1, 6, 0)),
            0.0
        );
    }

    #[test]
    fn segments_attribute_to_starting_status() {
        let history = vec![
            change("started", ts(2025, 1, 6, 0)),
            change("peer review", ts(2025, 1, 8, 0)),
            change("delivered", ts(2025, 1, 9, 0)),
            change("accepted", ts(2025, 1, 10, 0)),
        ];
        let segments =
            cycle_time_segments("PROJ-1", &history, ts(2025, 1, 20, 0), &statuses()).unwrap();
        assert_eq!(segments.dev_days, 2.0);
        assert_eq!(segments.review_days, 1.0);
        assert_eq!(segments.delivered_days, 1.0);
        // Terminal interval starts in Accepted, which is not active work.
        assert_eq!(segments.total_active_days(), 4.0);
    }

    #[test]
    fn open_ended_final_interval_counts_until_now() {
        let history = vec![change("started", ts(2025, 1, 6, 0))];
        let segments =
            cycle_time_segments("PROJ-2", &history, ts(2025, 1, 8, 0), &statuses()).unwrap();
        assert_eq!(segments.dev_days, 2.0);
    }

    #[test]
    fn rework_accumulates_into_same_buckets() {
        let history = vec![
            change("started", ts(2025, 1, 6, 0)),
            change("delivered", ts(2025, 1, 7, 0)),
            change("rejected", ts(2025, 1, 8, 0)),
            change("started", ts(2025, 1, 8, 0)),
            change("delivered", ts(2025, 1, 9, 0)),
        ];
        let segments =
            cycle_time_segments("PROJ-3", &history, ts(2025, 1, 10, 0), &statuses()).unwrap();
        assert_eq!(segments.dev_days, 2.0);
        assert_eq!(segments.delivered_days, 2.0);
    }

    #[test]
    fn empty_history_yields_zero_segments() {
        let segments =
            cycle_time_segments("PROJ-4", &[], ts(2025, 1, 10, 0), &statuses()).unwrap();
        assert_eq!(segments, CycleTimeSegments::default());
    }

    #[test]
    fn never_started_issue_contributes_nothing() {
        let history = vec![change("to do", ts(2025, 1, 6, 0))];
        let segments =
            cycle_time_segments("PROJ-5", &history, ts(2025, 1, 10, 0), &statuses()).unwrap();
        assert_eq!(segments.total_active_days(), 0.0);
    }

    #[test]
    fn out_of_order_history_is_malformed() {
        let history = vec![
            change("started", ts(2025, 1, 8, 0)),
            change("delivered", ts(2025, 1, 6, 0)),
        ];
        let err =
            cycle_time_segments("PROJ-6", &history, ts(2025, 1, 10, 0), &statuses()).unwrap_err();
        assert!(matches!(err, Error::MalformedHistory { .. }));
    }

    #[test]
    fn unknown_status_in_history_fails() {
        let history = vec![change("warp review", ts(2025, 1, 6, 0))];
        let err =
            cycle_time_segments("PROJ-7", &history, ts(2025, 1, 10, 0), &statuses()).unwrap_err();
        assert!(matches!(err, Error::UnknownStatus { .. }));
    }
}
