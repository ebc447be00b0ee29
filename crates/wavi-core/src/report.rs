//! Report DTOs and the client-side daily summary.

use std::collections::HashMap;
use std::fmt;
use std::str::FromStr;

use chrono::{Datelike, Duration, NaiveDate};
use serde::{Deserialize, Serialize};

use crate::error::ValidationError;
use crate::habit::schedule::is_scheduled_today;
use crate::habit::{Habit, HabitId, HabitLog};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ReportKind {
    Weekly,
    Monthly,
    Yearly,
}

impl ReportKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            ReportKind::Weekly => "WEEKLY",
            ReportKind::Monthly => "MONTHLY",
            ReportKind::Yearly => "YEARLY",
        }
    }

    /// Date range of this kind that contains `date`.
    pub fn range(&self, date: NaiveDate) -> (NaiveDate, NaiveDate) {
        match self {
            ReportKind::Weekly => week_range(date),
            ReportKind::Monthly => month_range(date),
            ReportKind::Yearly => year_range(date),
        }
    }
}

impl fmt::Display for ReportKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ReportKind {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_uppercase().as_str() {
            "WEEKLY" => Ok(ReportKind::Weekly),
            "MONTHLY" => Ok(ReportKind::Monthly),
            "YEARLY" => Ok(ReportKind::Yearly),
            other => Err(ValidationError::OutOfRange {
                field: "type",
                message: format!("'{other}' is not one of WEEKLY, MONTHLY, YEARLY"),
            }),
        }
    }
}

/// Monday..Sunday of the week containing `date`.
pub fn week_range(date: NaiveDate) -> (NaiveDate, NaiveDate) {
    let monday = date - Duration::days(i64::from(date.weekday().num_days_from_monday()));
    (monday, monday + Duration::days(6))
}

/// First..last day of `date`'s month.
pub fn month_range(date: NaiveDate) -> (NaiveDate, NaiveDate) {
    let first = date.with_day(1).unwrap_or(date);
    let next_month = if first.month() == 12 {
        NaiveDate::from_ymd_opt(first.year() + 1, 1, 1)
    } else {
        NaiveDate::from_ymd_opt(first.year(), first.month() + 1, 1)
    };
    let last = next_month.and_then(|d| d.pred_opt()).unwrap_or(date);
    (first, last)
}

pub fn year_range(date: NaiveDate) -> (NaiveDate, NaiveDate) {
    let first = date.with_ordinal(1).unwrap_or(date);
    let last = NaiveDate::from_ymd_opt(date.year(), 12, 31).unwrap_or(date);
    (first, last)
}

/// Whole-number percentage of a 0.0..=1.0 rate, e.g. `0.666` -> `"67%"`.
pub fn format_percent(rate: f64) -> String {
    format!("{:.0}%", (rate * 100.0).round())
}

/// Server rates are already percentage points; the fraction is dropped,
/// e.g. `69.8` -> `"69%"`.
pub fn format_points(points: f64) -> String {
    format!("{}%", points.trunc() as i64)
}

// ── Server-generated reports ─────────────────────────────────────────

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Report {
    pub id: u64,
    #[serde(rename = "type")]
    pub kind: ReportKind,
    pub start_date: String,
    pub end_date: String,
    #[serde(default)]
    pub created_at: Option<String>,
    #[serde(default)]
    pub updated_at: Option<String>,
    #[serde(default)]
    pub summary: Option<String>,
    /// Percentage points, 0..=100.
    #[serde(default)]
    pub overall_success_rate: Option<f64>,
    #[serde(default)]
    pub top_failure_reasons: Option<Vec<TopFailureReason>>,
    #[serde(default)]
    pub habit_success_rates: Option<Vec<HabitSuccessRate>>,
    #[serde(default, rename = "recommendation")]
    pub recommendations: Option<Vec<Recommendation>>,
    #[serde(default)]
    pub consistency_index: Option<ConsistencyIndex>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TopFailureReason {
    pub id: u64,
    pub reason: String,
    pub priority: u32,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HabitSuccessRate {
    pub name: String,
    pub rate: f64,
}

/// Suggested habit, optionally replacing an existing one.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Recommendation {
    pub id: u64,
    pub name: String,
    pub start_time: String,
    pub end_time: String,
    pub day_of_week: Vec<u8>,
    #[serde(default)]
    pub current_habit_name: Option<String>,
    #[serde(default)]
    pub current_habit_start_time: Option<String>,
    #[serde(default)]
    pub current_habit_end_time: Option<String>,
    #[serde(default)]
    pub current_habit_day_of_week: Option<Vec<u8>>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ConsistencyIndex {
    pub id: u64,
    pub success_rate: f64,
    pub display_message: String,
}

// ── Daily summary ────────────────────────────────────────────────────

#[derive(Debug, Clone, PartialEq)]
pub struct DailyEntry {
    pub habit_id: HabitId,
    pub name: String,
    pub icon: String,
    pub completed: bool,
}

/// One day's scheduled habits and how they went.
#[derive(Debug, Clone, PartialEq)]
pub struct DailySummary {
    pub date: NaiveDate,
    pub entries: Vec<DailyEntry>,
    /// Completed over distinct habits that have a log; later logs override
    /// earlier ones for the same habit.
    pub success_rate: f64,
}

impl DailySummary {
    /// `logs` should be that day's logs in server order.
    pub fn build(date: NaiveDate, habits: &[Habit], logs: &[HabitLog]) -> Self {
        let mut latest: HashMap<HabitId, bool> = HashMap::new();
        for log in logs {
            latest.insert(log.habit_id, log.completed);
        }

        let entries = habits
            .iter()
            .filter(|h| is_scheduled_today(h, date))
            .map(|h| DailyEntry {
                habit_id: h.id,
                name: h.name.clone(),
                icon: h.icon.clone(),
                completed: latest.get(&h.id).copied().unwrap_or(false),
            })
            .collect();

        let success_rate = if latest.is_empty() {
            0.0
        } else {
            let completed = latest.values().filter(|c| **c).count();
            completed as f64 / latest.len() as f64
        };

        Self {
            date,
            entries,
            success_rate,
        }
    }

    pub fn completed_count(&self) -> usize {
        self.entries.iter().filter(|e| e.completed).count()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::habit::{DaysOfWeek, HabitStatus};

    fn d(y: i32, m: u32, day: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, day).unwrap()
    }

    fn habit(id: HabitId, days: &[u8]) -> Habit {
        Habit {
            id,
            name: format!("h{id}"),
            status: HabitStatus::Active,
            days_of_week: DaysOfWeek::new(days.iter().copied()).unwrap(),
            icon: "✅".into(),
            start_time: "08:00:00".into(),
            end_time: "09:00:00".into(),
        }
    }

    fn log(id: u64, habit_id: HabitId, completed: bool) -> HabitLog {
        HabitLog {
            id,
            habit_id,
            name: format!("h{habit_id}"),
            date: "2025-10-15".into(),
            completed,
            failure_reasons: None,
        }
    }

    #[test]
    fn week_range_is_monday_to_sunday() {
        // Wednesday
        assert_eq!(week_range(d(2025, 10, 15)), (d(2025, 10, 13), d(2025, 10, 19)));
        // Sunday belongs to the week before
        assert_eq!(week_range(d(2025, 10, 19)), (d(2025, 10, 13), d(2025, 10, 19)));
        assert_eq!(week_range(d(2025, 10, 13)).0, d(2025, 10, 13));
    }

    #[test]
    fn month_range_handles_lengths_and_december() {
        assert_eq!(month_range(d(2024, 2, 10)), (d(2024, 2, 1), d(2024, 2, 29)));
        assert_eq!(month_range(d(2025, 12, 31)), (d(2025, 12, 1), d(2025, 12, 31)));
        assert_eq!(ReportKind::Yearly.range(d(2025, 6, 1)), (d(2025, 1, 1), d(2025, 12, 31)));
    }

    #[test]
    fn success_rate_uses_latest_log_per_habit() {
        let habits = vec![habit(1, &[3]), habit(2, &[3]), habit(3, &[1])];
        let logs = vec![log(1, 1, false), log(2, 2, true), log(3, 1, true)];
        let s = DailySummary::build(d(2025, 10, 15), &habits, &logs);
        assert_eq!(s.success_rate, 1.0);
        assert_eq!(s.entries.len(), 2, "Monday-only habit is excluded on Wednesday");
        assert_eq!(s.completed_count(), 2);
    }

    #[test]
    fn no_logs_means_zero_rate() {
        let s = DailySummary::build(d(2025, 10, 15), &[habit(1, &[3])], &[]);
        assert_eq!(s.success_rate, 0.0);
        assert!(!s.entries[0].completed);
    }

    #[test]
    fn rate_counts_logged_habits_only() {
        let habits = vec![habit(1, &[3]), habit(2, &[3]), habit(3, &[3])];
        let s = DailySummary::build(d(2025, 10, 15), &habits, &[log(1, 1, true), log(2, 2, false)]);
        assert_eq!(s.success_rate, 0.5);
        assert_eq!(format_percent(s.success_rate), "50%");
    }

    #[test]
    fn format_percent_rounds() {
        assert_eq!(format_percent(0.666), "67%");
        assert_eq!(format_percent(0.0), "0%");
        assert_eq!(format_percent(1.0), "100%");
    }

    #[test]
    fn server_rates_are_points() {
        assert_eq!(format_points(69.8), "69%");
        assert_eq!(format_points(100.0), "100%");
    }

    #[test]
    fn report_decodes_sparse_payload() {
        let r: Report = serde_json::from_str(
            r#"{"id":3,"type":"WEEKLY","startDate":"2025-10-13","endDate":"2025-10-19",
                "overallSuccessRate":0.75,
                "habitSuccessRates":[{"name":"Read","rate":0.5}],
                "consistencyIndex":{"id":1,"successRate":0.8,"displayMessage":"steady"}}"#,
        )
        .unwrap();
        assert_eq!(r.kind, ReportKind::Weekly);
        assert_eq!(r.overall_success_rate, Some(0.75));
        assert!(r.recommendations.is_none());
        assert_eq!("monthly".parse::<ReportKind>(), Ok(ReportKind::Monthly));
    }
}
