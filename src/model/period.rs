//! Period reset vocabulary: periods, rolling metrics, and champion snapshots.

use chrono::{DateTime, Datelike, Days, TimeZone};
use serde::{Deserialize, Serialize};

/// The two reset cadences.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Period {
    Weekly,
    Monthly,
}

impl Period {
    /// Storage key for the period marker row.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Weekly => "weekly",
            Self::Monthly => "monthly",
        }
    }

    /// Key identifying the period that contains `now`.
    ///
    /// Weekly keys are ISO weeks (`2026-W32`), monthly keys calendar months
    /// (`2026-08`), both in the scheduler timezone. Two runs inside the same
    /// period compute the same key, which is what the double-fire guard
    /// compares against.
    pub fn key<Tz: TimeZone>(&self, now: &DateTime<Tz>) -> String {
        match self {
            Self::Weekly => {
                let week = now.iso_week();
                format!("{:04}-W{:02}", week.year(), week.week())
            }
            Self::Monthly => format!("{:04}-{:02}", now.year(), now.month()),
        }
    }

    /// Calendar year of the period that just elapsed.
    ///
    /// Pairs with `elapsed_record_id` for the hall-of-fame write; at a year
    /// boundary the elapsed period belongs to the previous year.
    pub fn elapsed_year<Tz: TimeZone>(&self, now: &DateTime<Tz>) -> i32 {
        let today = now.date_naive();
        match self {
            Self::Weekly => {
                let this_monday = today
                    .checked_sub_days(Days::new(today.weekday().num_days_from_monday() as u64))
                    .unwrap_or(today);
                this_monday
                    .checked_sub_days(Days::new(7))
                    .unwrap_or(this_monday)
                    .year()
            }
            Self::Monthly => {
                let first_of_month = today.with_day(1).unwrap_or(today);
                first_of_month
                    .checked_sub_days(Days::new(1))
                    .unwrap_or(first_of_month)
                    .year()
            }
        }
    }

    /// Hall-of-fame record ID for the period that just elapsed.
    ///
    /// The reset fires right after a boundary, so the elapsed week is the one
    /// before the week containing `now`, and the elapsed month is the month
    /// before the month containing `now`.
    pub fn elapsed_record_id<Tz: TimeZone>(&self, now: &DateTime<Tz>) -> String {
        match self {
            Self::Weekly => {
                let today = now.date_naive();
                let this_monday = today
                    .checked_sub_days(Days::new(today.weekday().num_days_from_monday() as u64))
                    .unwrap_or(today);
                let elapsed_monday = this_monday
                    .checked_sub_days(Days::new(7))
                    .unwrap_or(this_monday);
                format!("weekly-{}", elapsed_monday.format("%Y-%m-%d"))
            }
            Self::Monthly => {
                let today = now.date_naive();
                let first_of_month = today.with_day(1).unwrap_or(today);
                let last_of_elapsed = first_of_month
                    .checked_sub_days(Days::new(1))
                    .unwrap_or(first_of_month);
                format!(
                    "monthly-{:04}-{:02}",
                    last_of_elapsed.year(),
                    last_of_elapsed.month()
                )
            }
        }
    }
}

/// The three rolling metrics every period tracks.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RollingMetric {
    /// Lunar Points earned this period.
    ClimbingPoints,
    /// Hosting points earned this period.
    GuidePoints,
    /// Expeditions completed this period.
    Expeditions,
}

impl RollingMetric {
    pub const ALL: [RollingMetric; 3] = [
        RollingMetric::ClimbingPoints,
        RollingMetric::GuidePoints,
        RollingMetric::Expeditions,
    ];
}

/// The member leading one rolling metric at reset time.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Champion {
    pub roblox_id: String,
    pub roblox_username: String,
    pub discord_id: Option<String>,
    /// The metric value that won the period.
    pub value: i64,
}

impl Champion {
    /// Mention string for announcements: Discord mention when linked,
    /// Roblox username otherwise.
    pub fn mention(&self) -> String {
        match &self.discord_id {
            Some(id) => format!("<@{}>", id),
            None => self.roblox_username.clone(),
        }
    }
}

/// Leaders computed per period at reset time.
///
/// Purely derived, used once for the announcement and hall-of-fame write,
/// then discarded. A metric whose top value is zero reports no champion.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PeriodSnapshot {
    pub climber: Option<Champion>,
    pub host: Option<Champion>,
    pub explorer: Option<Champion>,
}

impl PeriodSnapshot {
    /// Whether no metric produced a champion this period.
    pub fn is_empty(&self) -> bool {
        self.climber.is_none() && self.host.is_none() && self.explorer.is_none()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;

    fn at(y: i32, m: u32, d: u32) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(y, m, d, 5, 0, 0).unwrap()
    }

    #[test]
    fn weekly_key_is_iso_week() {
        // 2026-08-03 is a Monday in ISO week 32.
        assert_eq!(Period::Weekly.key(&at(2026, 8, 3)), "2026-W32");
        // Early January can belong to the previous ISO year.
        assert_eq!(Period::Weekly.key(&at(2027, 1, 1)), "2026-W53");
    }

    #[test]
    fn monthly_key_is_calendar_month() {
        assert_eq!(Period::Monthly.key(&at(2026, 8, 1)), "2026-08");
    }

    #[test]
    fn same_period_runs_share_a_key() {
        assert_eq!(
            Period::Weekly.key(&at(2026, 8, 3)),
            Period::Weekly.key(&at(2026, 8, 9))
        );
        assert_ne!(
            Period::Weekly.key(&at(2026, 8, 3)),
            Period::Weekly.key(&at(2026, 8, 10))
        );
    }

    #[test]
    fn elapsed_weekly_record_points_at_previous_monday() {
        // Run fires Monday 2026-08-03; the elapsed week started 2026-07-27.
        assert_eq!(
            Period::Weekly.elapsed_record_id(&at(2026, 8, 3)),
            "weekly-2026-07-27"
        );
    }

    #[test]
    fn elapsed_monthly_record_points_at_previous_month() {
        assert_eq!(
            Period::Monthly.elapsed_record_id(&at(2026, 8, 1)),
            "monthly-2026-07"
        );
        // Year boundary.
        assert_eq!(
            Period::Monthly.elapsed_record_id(&at(2026, 1, 1)),
            "monthly-2025-12"
        );
    }

    #[test]
    fn elapsed_year_respects_boundaries() {
        // A monthly run on New Year's Day records for the previous year.
        assert_eq!(Period::Monthly.elapsed_year(&at(2026, 1, 1)), 2025);
        assert_eq!(Period::Monthly.elapsed_year(&at(2026, 8, 1)), 2026);
        // A weekly run on Monday 2026-01-05 records the week of 2025-12-29.
        assert_eq!(Period::Weekly.elapsed_year(&at(2026, 1, 5)), 2025);
    }

    #[test]
    fn champion_mention_prefers_discord_link() {
        let mut champion = Champion {
            roblox_id: "1".to_string(),
            roblox_username: "Aldi".to_string(),
            discord_id: Some("42".to_string()),
            value: 50,
        };
        assert_eq!(champion.mention(), "<@42>");

        champion.discord_id = None;
        assert_eq!(champion.mention(), "Aldi");
    }
}
