//! Date-range selection, validation, and timezone-aware formatting

use crate::error::{CoreError, CoreResult};
use crate::models::DateRange;
use chrono::{Datelike, Duration, LocalResult, NaiveDate, NaiveTime, TimeZone, Utc};
use chrono_tz::Tz;
use rangeweb_config::{CalendarConfig, DateOverride, DefaultsConfig};
use serde::Serialize;
use std::collections::BTreeMap;
use std::str::FromStr;

/// Output format of formatted range endpoints
pub const DATE_RANGE_FORMAT: &str = "%Y-%m-%d %H:%M:%S %:z";

/// Per-day report used by the calendar grid and its hover tooltips
#[derive(Debug, Clone, Serialize)]
pub struct DayInfo {
    /// Calendar date
    pub date: NaiveDate,
    /// Unselectable, whether by look-back cutoff or override
    pub disabled: bool,
    /// Override message, if any
    pub message: Option<String>,
    /// Availability indicator shown alongside the message
    pub available: bool,
}

/// Owns the selected calendar dates and timezone, enforces the selection
/// rules, and produces formatted [`DateRange`] values.
#[derive(Debug, Clone)]
pub struct RangeSelector {
    start: NaiveDate,
    end: NaiveDate,
    zone: Tz,
    max_span_days: i64,
    max_past_days: i64,
    overrides: BTreeMap<NaiveDate, DateOverride>,
}

impl RangeSelector {
    /// Create a selector seeded with the default look-back window
    pub fn new(calendar: &CalendarConfig, defaults: &DefaultsConfig) -> CoreResult<Self> {
        let zone = resolve_zone(&defaults.timezone)?;
        let today = today_in(&zone);
        Ok(Self {
            start: today - Duration::days(defaults.lookback_days),
            end: today,
            zone,
            max_span_days: calendar.max_span_days,
            max_past_days: calendar.max_past_days,
            overrides: calendar.overrides.clone(),
        })
    }

    /// Selected start date
    pub fn start(&self) -> NaiveDate {
        self.start
    }

    /// Selected end date
    pub fn end(&self) -> NaiveDate {
        self.end
    }

    /// Selected zone id
    pub fn zone_id(&self) -> &str {
        self.zone.name()
    }

    /// Whether a date is unselectable
    ///
    /// Dates strictly before today minus the look-back cap are excluded,
    /// and the override table can disable any date regardless of that rule.
    pub fn is_disabled(&self, date: NaiveDate) -> bool {
        let cutoff = today_in(&self.zone) - Duration::days(self.max_past_days);
        if date < cutoff {
            return true;
        }
        self.overrides.get(&date).map_or(false, |o| o.disabled)
    }

    /// Per-day metadata for a single date
    pub fn day_info(&self, date: NaiveDate) -> DayInfo {
        let disabled = self.is_disabled(date);
        DayInfo {
            date,
            disabled,
            message: self.overrides.get(&date).and_then(|o| o.message.clone()),
            available: !disabled,
        }
    }

    /// Per-day metadata for every date of a month
    pub fn month_days(&self, year: i32, month: u32) -> Vec<DayInfo> {
        let Some(first) = NaiveDate::from_ymd_opt(year, month, 1) else {
            return Vec::new();
        };
        let mut days = Vec::new();
        let mut date = first;
        while date.month() == month {
            days.push(self.day_info(date));
            match date.succ_opt() {
                Some(next) => date = next,
                None => break,
            }
        }
        days
    }

    /// Attempt to select a new start/end pair
    ///
    /// On rejection the previous selection stays in effect and the error
    /// carries the user-facing advisory text.
    pub fn try_select(&mut self, start: NaiveDate, end: NaiveDate) -> CoreResult<DateRange> {
        if end < start {
            return Err(CoreError::InvalidRange);
        }
        // Inclusive span of max_span_days means a day difference of at most
        // max_span_days - 1.
        if end.signed_duration_since(start).num_days() > self.max_span_days - 1 {
            return Err(CoreError::RangeTooLarge { max: self.max_span_days });
        }
        if self.is_disabled(start) {
            return Err(CoreError::DateDisabled { date: start });
        }
        if self.is_disabled(end) {
            return Err(CoreError::DateDisabled { date: end });
        }

        self.start = start;
        self.end = end;
        Ok(self.range())
    }

    /// Switch the timezone, reformatting the unchanged calendar dates
    pub fn set_timezone(&mut self, zone: &str) -> CoreResult<DateRange> {
        self.zone = resolve_zone(zone)?;
        Ok(self.range())
    }

    /// The current selection as a formatted range
    pub fn range(&self) -> DateRange {
        DateRange {
            start_date: format_in_zone(self.start, NaiveTime::MIN, &self.zone),
            end_date: format_in_zone(self.end, end_of_day(), &self.zone),
            time_zone: self.zone.name().to_string(),
        }
    }
}

fn resolve_zone(zone: &str) -> CoreResult<Tz> {
    Tz::from_str(zone).map_err(|_| CoreError::UnknownTimezone { zone: zone.to_string() })
}

fn today_in(zone: &Tz) -> NaiveDate {
    Utc::now().with_timezone(zone).date_naive()
}

fn end_of_day() -> NaiveTime {
    NaiveTime::from_hms_opt(23, 59, 59).unwrap_or(NaiveTime::MIN)
}

/// Format a calendar date at the given wall time in a zone, with a numeric
/// UTC-offset suffix. DST gaps fall back to the UTC reading; ambiguous
/// times take the earlier offset.
fn format_in_zone(date: NaiveDate, time: NaiveTime, zone: &Tz) -> String {
    let naive = date.and_time(time);
    let localized = match zone.from_local_datetime(&naive) {
        LocalResult::Single(dt) => dt,
        LocalResult::Ambiguous(earliest, _) => earliest,
        LocalResult::None => zone.from_utc_datetime(&naive),
    };
    localized.format(DATE_RANGE_FORMAT).to_string()
}

// ==================== Tests ====================

#[cfg(test)]
mod tests {
    use super::*;
    use rangeweb_config::CalendarConfig;

    fn defaults() -> DefaultsConfig {
        DefaultsConfig {
            timezone: "Europe/Moscow".to_string(),
            lookback_days: 7,
        }
    }

    fn calendar() -> CalendarConfig {
        CalendarConfig::default()
    }

    fn selector() -> RangeSelector {
        RangeSelector::new(&calendar(), &defaults()).unwrap()
    }

    fn today() -> NaiveDate {
        Utc::now().with_timezone(&chrono_tz::Europe::Moscow).date_naive()
    }

    #[test]
    fn test_initial_range_uses_lookback() {
        let selector = selector();
        assert_eq!(selector.end(), today());
        assert_eq!(selector.start(), today() - Duration::days(7));
        assert_eq!(selector.zone_id(), "Europe/Moscow");
    }

    #[test]
    fn test_initial_range_is_formatted() {
        let range = selector().range();
        assert!(range.is_complete());
        // Moscow has no DST; the offset is fixed.
        assert!(range.start_date.ends_with("00:00:00 +03:00"), "{}", range.start_date);
        assert!(range.end_date.ends_with("23:59:59 +03:00"), "{}", range.end_date);
        assert_eq!(range.time_zone, "Europe/Moscow");
    }

    #[test]
    fn test_unknown_default_zone_is_an_error() {
        let bad = DefaultsConfig {
            timezone: "Mars/Olympus".to_string(),
            lookback_days: 7,
        };
        assert!(RangeSelector::new(&calendar(), &bad).is_err());
    }

    #[test]
    fn test_select_within_span_is_accepted() {
        let mut selector = selector();
        let start = today() - Duration::days(5);
        let range = selector.try_select(start, today()).unwrap();
        assert_eq!(selector.start(), start);
        assert_eq!(range.start_date_naive(), Some(start));
    }

    #[test]
    fn test_select_at_exact_span_limit_is_accepted() {
        let mut selector = selector();
        // 10 inclusive days: difference of 9.
        let start = today() - Duration::days(9);
        assert!(selector.try_select(start, today()).is_ok());
    }

    #[test]
    fn test_select_over_span_limit_is_rejected() {
        let mut selector = selector();
        let prior_start = selector.start();
        let prior_end = selector.end();

        let start = today() - Duration::days(10);
        let err = selector.try_select(start, today()).unwrap_err();
        assert_eq!(err.to_string(), "Maximum 10 days allowed for selection");

        // The previous valid range remains in effect.
        assert_eq!(selector.start(), prior_start);
        assert_eq!(selector.end(), prior_end);
    }

    #[test]
    fn test_sixteen_day_selection_is_rejected_even_in_the_past() {
        // A 16-day window is rejected on span before any look-back check.
        let mut selector = selector();
        let start = NaiveDate::from_ymd_opt(2025, 4, 10).unwrap();
        let end = NaiveDate::from_ymd_opt(2025, 4, 25).unwrap();
        let err = selector.try_select(start, end).unwrap_err();
        assert_eq!(err.to_string(), "Maximum 10 days allowed for selection");
    }

    #[test]
    fn test_reversed_range_is_rejected() {
        let mut selector = selector();
        assert!(selector.try_select(today(), today() - Duration::days(1)).is_err());
    }

    #[test]
    fn test_lookback_cutoff() {
        let selector = selector();
        assert!(selector.is_disabled(today() - Duration::days(91)));
        assert!(!selector.is_disabled(today() - Duration::days(90)));
        assert!(!selector.is_disabled(today()));
    }

    #[test]
    fn test_select_disabled_endpoint_is_rejected() {
        let mut config = calendar();
        let blocked = today() - Duration::days(2);
        config.overrides.insert(blocked, DateOverride {
            message: Some("Maintenance Day - Date Disabled".to_string()),
            disabled: true,
        });

        let mut selector = RangeSelector::new(&config, &defaults()).unwrap();
        let err = selector.try_select(blocked, today()).unwrap_err();
        assert_eq!(err.code(), crate::error::ErrorCode::DateDisabled);
    }

    #[test]
    fn test_override_disables_regardless_of_lookback() {
        let mut config = calendar();
        let blocked = today();
        config.overrides.insert(blocked, DateOverride {
            message: None,
            disabled: true,
        });

        let selector = RangeSelector::new(&config, &defaults()).unwrap();
        assert!(selector.is_disabled(blocked));
    }

    #[test]
    fn test_day_info_message_without_disable() {
        let mut config = calendar();
        let noted = today() - Duration::days(1);
        config.overrides.insert(noted, DateOverride {
            message: Some("Limited availability".to_string()),
            disabled: false,
        });

        let selector = RangeSelector::new(&config, &defaults()).unwrap();
        let info = selector.day_info(noted);
        assert!(!info.disabled);
        assert!(info.available);
        assert_eq!(info.message.as_deref(), Some("Limited availability"));

        // Selectability is unaffected by a message alone.
        let mut selector = RangeSelector::new(&config, &defaults()).unwrap();
        assert!(selector.try_select(noted, today()).is_ok());
    }

    #[test]
    fn test_timezone_change_reformats_same_dates() {
        let mut selector = selector();
        let start = selector.start();
        let end = selector.end();

        let range = selector.set_timezone("Asia/Tokyo").unwrap();
        assert_eq!(selector.start(), start);
        assert_eq!(selector.end(), end);
        assert!(range.start_date.ends_with("+09:00"), "{}", range.start_date);
        assert_eq!(range.time_zone, "Asia/Tokyo");
    }

    #[test]
    fn test_month_days_covers_whole_month() {
        let selector = selector();
        let days = selector.month_days(2025, 4);
        assert_eq!(days.len(), 30);
        assert_eq!(days[0].date, NaiveDate::from_ymd_opt(2025, 4, 1).unwrap());
        assert_eq!(days[29].date, NaiveDate::from_ymd_opt(2025, 4, 30).unwrap());
    }

    #[test]
    fn test_month_days_invalid_month() {
        assert!(selector().month_days(2025, 13).is_empty());
    }
}
