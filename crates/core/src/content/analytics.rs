//! Submissions analytics.
//!
//! Simple in-memory aggregation over fetched submission lists: totals,
//! rolling 7-day counts, calendar-month counts, and the most requested
//! class. No SQL aggregation is involved; the admin panel works on the
//! same lists it displays.

use std::collections::HashMap;

use chrono::{DateTime, Datelike, Duration, NaiveTime, Utc};
use serde::Serialize;

/// Admission form data relevant to analytics.
#[derive(Debug, Clone)]
pub struct AdmissionEntry {
    /// Class the applicant selected.
    pub selected_class: String,
    /// When the form was submitted.
    pub created_at: DateTime<Utc>,
}

/// Contact message data relevant to analytics.
#[derive(Debug, Clone)]
pub struct ContactEntry {
    /// When the message was submitted.
    pub created_at: DateTime<Utc>,
}

/// The most requested class and its application count.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TopClass {
    /// Class name as submitted.
    pub name: String,
    /// Number of applications naming it.
    pub count: u64,
}

/// Aggregated submission statistics for the admin dashboard.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SubmissionStats {
    /// All admission forms ever received.
    pub total_admissions: u64,
    /// All contact messages ever received.
    pub total_contacts: u64,
    /// Admissions in the last 7 days.
    pub admissions_this_week: u64,
    /// Admissions since the first of the current month.
    pub admissions_this_month: u64,
    /// Contact messages in the last 7 days.
    pub contacts_this_week: u64,
    /// Contact messages since the first of the current month.
    pub contacts_this_month: u64,
    /// Most requested class, if any admissions exist.
    pub top_class: Option<TopClass>,
}

/// Aggregates submission lists into dashboard statistics.
///
/// "This week" is a rolling 7-day window ending at `now`; "this month"
/// starts at midnight on the first of `now`'s calendar month.
#[must_use]
pub fn summarize(
    admissions: &[AdmissionEntry],
    contacts: &[ContactEntry],
    now: DateTime<Utc>,
) -> SubmissionStats {
    let week_start = now - Duration::days(7);
    let month_start = now
        .date_naive()
        .with_day(1)
        .unwrap_or_else(|| now.date_naive())
        .and_time(NaiveTime::MIN)
        .and_utc();

    let admissions_this_week = admissions
        .iter()
        .filter(|entry| entry.created_at >= week_start)
        .count() as u64;
    let admissions_this_month = admissions
        .iter()
        .filter(|entry| entry.created_at >= month_start)
        .count() as u64;
    let contacts_this_week = contacts
        .iter()
        .filter(|entry| entry.created_at >= week_start)
        .count() as u64;
    let contacts_this_month = contacts
        .iter()
        .filter(|entry| entry.created_at >= month_start)
        .count() as u64;

    let mut by_class: HashMap<&str, u64> = HashMap::new();
    for entry in admissions {
        *by_class.entry(entry.selected_class.as_str()).or_default() += 1;
    }
    let top_class = by_class
        .into_iter()
        .max_by(|a, b| a.1.cmp(&b.1).then_with(|| b.0.cmp(a.0)))
        .map(|(name, count)| TopClass {
            name: name.to_string(),
            count,
        });

    SubmissionStats {
        total_admissions: admissions.len() as u64,
        total_contacts: contacts.len() as u64,
        admissions_this_week,
        admissions_this_month,
        contacts_this_week,
        contacts_this_month,
        top_class,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn admission(class: &str, at: DateTime<Utc>) -> AdmissionEntry {
        AdmissionEntry {
            selected_class: class.to_string(),
            created_at: at,
        }
    }

    fn contact(at: DateTime<Utc>) -> ContactEntry {
        ContactEntry { created_at: at }
    }

    #[test]
    fn test_empty_lists() {
        let now = Utc.with_ymd_and_hms(2026, 8, 15, 12, 0, 0).unwrap();
        let stats = summarize(&[], &[], now);

        assert_eq!(stats.total_admissions, 0);
        assert_eq!(stats.total_contacts, 0);
        assert_eq!(stats.top_class, None);
    }

    #[test]
    fn test_week_window_is_rolling_seven_days() {
        let now = Utc.with_ymd_and_hms(2026, 8, 15, 12, 0, 0).unwrap();
        let admissions = vec![
            admission("Kyumino - Beginner", now - Duration::days(2)),
            admission("Kyumino - Beginner", now - Duration::days(6)),
            // outside the rolling window, inside the calendar month
            admission("Kyumino - Beginner", now - Duration::days(10)),
        ];

        let stats = summarize(&admissions, &[], now);
        assert_eq!(stats.admissions_this_week, 2);
        assert_eq!(stats.admissions_this_month, 3);
        assert_eq!(stats.total_admissions, 3);
    }

    #[test]
    fn test_month_window_starts_on_the_first() {
        let now = Utc.with_ymd_and_hms(2026, 8, 3, 12, 0, 0).unwrap();
        let contacts = vec![
            contact(Utc.with_ymd_and_hms(2026, 8, 1, 0, 0, 0).unwrap()),
            contact(Utc.with_ymd_and_hms(2026, 7, 31, 23, 59, 59).unwrap()),
            contact(now - Duration::days(1)),
        ];

        let stats = summarize(&[], &contacts, now);
        assert_eq!(stats.contacts_this_month, 2);
        // the July 31 message is still inside the rolling week
        assert_eq!(stats.contacts_this_week, 3);
        assert_eq!(stats.total_contacts, 3);
    }

    #[test]
    fn test_top_class_counts_applications() {
        let now = Utc.with_ymd_and_hms(2026, 8, 15, 12, 0, 0).unwrap();
        let admissions = vec![
            admission("Aikido - Self-Defense", now),
            admission("Kirigama - Advanced", now),
            admission("Aikido - Self-Defense", now - Duration::days(40)),
        ];

        let stats = summarize(&admissions, &[], now);
        assert_eq!(
            stats.top_class,
            Some(TopClass {
                name: "Aikido - Self-Defense".to_string(),
                count: 2,
            })
        );
    }
}
