//! Recurrence engine: maps a [`ScheduleEntry`] onto trigger registration
//! parameters, and those parameters onto concrete fire instants.

use chrono::{DateTime, Datelike, Days, Duration, NaiveDate, NaiveDateTime, TimeZone, Utc};
use chrono_tz::Tz;
use tracing::warn;

use crate::{
    error::{Result, SchedulerError},
    types::{Recurrence, RegistrationSpec, ScheduleEntry, TriggerSchedule},
};

/// How far ahead monthly lookups search for a month containing the day.
const MONTH_SEARCH_LIMIT: u32 = 48;

/// Zone used for entries without one.
///
/// Order: configured IANA id, then the host zone, then UTC.
pub fn ambient_timezone(configured: Option<&str>) -> Tz {
    if let Some(id) = configured {
        match id.parse::<Tz>() {
            Ok(tz) => return tz,
            Err(e) => warn!(zone = %id, "ignoring invalid configured timezone: {e}"),
        }
    }
    iana_time_zone::get_timezone()
        .ok()
        .and_then(|id| id.parse::<Tz>().ok())
        .unwrap_or(chrono_tz::UTC)
}

/// Compute the registration for `entry`.
///
/// Defaults the entry's timezone to `ambient` in place, so later reads of the
/// same entry see an explicit zone.
pub fn compute_registration(entry: &mut ScheduleEntry, ambient: Tz) -> Result<RegistrationSpec> {
    let tz = *entry.timezone.get_or_insert(ambient);
    let row = entry.row_no;

    if entry.hour > 23 || entry.minute > 59 {
        return Err(SchedulerError::validation(
            row,
            format!("fire time {:02}:{:02} is out of range", entry.hour, entry.minute),
        ));
    }

    let schedule = match entry.mode {
        Recurrence::None => {
            let date = entry.sent_on_date.ok_or_else(|| {
                SchedulerError::validation(row, "one-shot entry has no fire date")
            })?;
            let naive = wall_clock(date, entry.hour, entry.minute)
                .ok_or_else(|| SchedulerError::validation(row, "invalid fire date/time"))?;
            TriggerSchedule::At {
                at: local_to_utc(tz, naive),
            }
        }
        Recurrence::Daily => TriggerSchedule::EveryDays {
            days: 1,
            hour: entry.hour,
            near_minute: entry.minute,
        },
        Recurrence::Weekly => {
            let weekday = entry.weekday.ok_or_else(|| {
                SchedulerError::validation(row, "weekly entry has no weekday")
            })?;
            TriggerSchedule::EveryWeeks {
                weeks: 1,
                weekday,
                hour: entry.hour,
                near_minute: entry.minute,
            }
        }
        Recurrence::Monthly => {
            let day = entry.month_day.ok_or_else(|| {
                SchedulerError::validation(row, "monthly entry has no month day")
            })?;
            if !(1..=31).contains(&day) {
                return Err(SchedulerError::validation(
                    row,
                    format!("month day {day} is out of range"),
                ));
            }
            TriggerSchedule::OnMonthDay {
                day,
                hour: entry.hour,
                near_minute: entry.minute,
            }
        }
        Recurrence::Custom => {
            return Err(SchedulerError::UnsupportedMode { mode: entry.mode });
        }
    };

    Ok(RegistrationSpec {
        timezone: tz.name().to_string(),
        schedule,
    })
}

/// First fire strictly after `after`, or `None` when the schedule is exhausted.
///
/// Wall-clock fields are interpreted in the spec's zone. Monthly schedules
/// skip months that do not contain the requested day.
pub fn next_fire(spec: &RegistrationSpec, after: DateTime<Utc>) -> Option<DateTime<Utc>> {
    let tz = match spec.timezone.parse::<Tz>() {
        Ok(tz) => tz,
        Err(e) => {
            warn!(zone = %spec.timezone, "registration has an unknown timezone: {e}");
            return None;
        }
    };
    let today = after.with_timezone(&tz).date_naive();

    match spec.schedule {
        TriggerSchedule::At { at } => (at > after).then_some(at),

        TriggerSchedule::EveryDays {
            days,
            hour,
            near_minute,
        } => {
            let candidate = local_to_utc(tz, wall_clock(today, hour, near_minute)?);
            if candidate > after {
                return Some(candidate);
            }
            let next = today.checked_add_days(Days::new(u64::from(days.max(1))))?;
            Some(local_to_utc(tz, wall_clock(next, hour, near_minute)?))
        }

        TriggerSchedule::EveryWeeks {
            weeks,
            weekday,
            hour,
            near_minute,
        } => {
            let days_ahead = (7 + weekday.num_days_from_monday()
                - today.weekday().num_days_from_monday())
                % 7;
            let date = today.checked_add_days(Days::new(u64::from(days_ahead)))?;
            let candidate = local_to_utc(tz, wall_clock(date, hour, near_minute)?);
            if candidate > after {
                return Some(candidate);
            }
            let next = date.checked_add_days(Days::new(7 * u64::from(weeks.max(1))))?;
            Some(local_to_utc(tz, wall_clock(next, hour, near_minute)?))
        }

        TriggerSchedule::OnMonthDay {
            day,
            hour,
            near_minute,
        } => {
            let (mut year, mut month) = (today.year(), today.month());
            for _ in 0..MONTH_SEARCH_LIMIT {
                if let Some(date) = NaiveDate::from_ymd_opt(year, month, u32::from(day)) {
                    let candidate = local_to_utc(tz, wall_clock(date, hour, near_minute)?);
                    if candidate > after {
                        return Some(candidate);
                    }
                }
                (year, month) = if month == 12 {
                    (year + 1, 1)
                } else {
                    (year, month + 1)
                };
            }
            None
        }
    }
}

/// Resolve a local wall-clock time to an instant.
///
/// Ambiguous times (DST fall-back) take the earlier instant; times inside a
/// DST gap move forward to the first valid quarter hour.
pub fn local_to_utc(tz: Tz, naive: NaiveDateTime) -> DateTime<Utc> {
    (0..=8)
        .find_map(|step| {
            tz.from_local_datetime(&(naive + Duration::minutes(15 * step)))
                .earliest()
        })
        .map(|dt| dt.with_timezone(&Utc))
        .unwrap_or_else(|| Utc.from_utc_datetime(&naive))
}

/// Human-readable next occurrence for status messages.
pub fn describe_next_run(entry: &ScheduleEntry, ambient: Tz, now: DateTime<Utc>) -> String {
    let mut entry = entry.clone();
    let Ok(spec) = compute_registration(&mut entry, ambient) else {
        return "none".to_string();
    };
    let tz = entry.timezone.unwrap_or(ambient);
    match next_fire(&spec, now) {
        Some(next) => next.with_timezone(&tz).format("%Y-%m-%d %H:%M %Z").to_string(),
        None => "none".to_string(),
    }
}

fn wall_clock(date: NaiveDate, hour: u8, minute: u8) -> Option<NaiveDateTime> {
    date.and_hms_opt(u32::from(hour), u32::from(minute), 0)
}
