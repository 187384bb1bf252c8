//! Localised display labels for recurrence modes and weekdays.
//!
//! Business logic only sees the closed [`Recurrence`] / [`Weekday`] enums; the
//! free-text cells users type are matched against this table.

use std::collections::HashMap;

use chrono::Weekday;

use crate::types::Recurrence;

const WEEKDAYS: [Weekday; 7] = [
    Weekday::Mon,
    Weekday::Tue,
    Weekday::Wed,
    Weekday::Thu,
    Weekday::Fri,
    Weekday::Sat,
    Weekday::Sun,
];

const DEFAULT_LABELS: &[(&str, &str)] = &[
    ("recurrence.None", "None"),
    ("recurrence.Daily", "Daily"),
    ("recurrence.Weekly", "Weekly"),
    ("recurrence.Monthly", "Monthly"),
    ("recurrence.Custom", "Custom"),
    ("weekDay.Monday", "Monday"),
    ("weekDay.Tuesday", "Tuesday"),
    ("weekDay.Wednesday", "Wednesday"),
    ("weekDay.Thursday", "Thursday"),
    ("weekDay.Friday", "Friday"),
    ("weekDay.Saturday", "Saturday"),
    ("weekDay.Sunday", "Sunday"),
];

/// Localisation key of a weekday label, e.g. `weekDay.Monday`.
pub fn weekday_key(day: Weekday) -> &'static str {
    match day {
        Weekday::Mon => "weekDay.Monday",
        Weekday::Tue => "weekDay.Tuesday",
        Weekday::Wed => "weekDay.Wednesday",
        Weekday::Thu => "weekDay.Thursday",
        Weekday::Fri => "weekDay.Friday",
        Weekday::Sat => "weekDay.Saturday",
        Weekday::Sun => "weekDay.Sunday",
    }
}

/// Key → display string table. Unknown keys render as the key itself.
#[derive(Debug, Clone)]
pub struct Labels {
    messages: HashMap<String, String>,
}

impl Labels {
    /// English defaults with `overrides` layered on top.
    pub fn with_overrides(overrides: &HashMap<String, String>) -> Self {
        let mut messages: HashMap<String, String> = DEFAULT_LABELS
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        messages.extend(overrides.iter().map(|(k, v)| (k.clone(), v.clone())));
        Self { messages }
    }

    pub fn label<'a>(&'a self, key: &'a str) -> &'a str {
        self.messages.get(key).map(String::as_str).unwrap_or(key)
    }

    /// Parse a recurrence cell. Anything unrecognised is [`Recurrence::Custom`].
    pub fn recurrence(&self, cell: &str) -> Recurrence {
        Recurrence::SCHEDULABLE
            .into_iter()
            .find(|mode| self.matches(mode.label_key(), cell))
            .unwrap_or(Recurrence::Custom)
    }

    /// Parse a weekday cell. Blank or unrecognised cells yield `None`.
    pub fn weekday(&self, cell: &str) -> Option<Weekday> {
        WEEKDAYS
            .into_iter()
            .find(|day| self.matches(weekday_key(*day), cell))
    }

    fn matches(&self, key: &str, cell: &str) -> bool {
        let cell = cell.trim();
        !cell.is_empty() && self.label(key).trim().to_lowercase() == cell.to_lowercase()
    }
}

impl Default for Labels {
    fn default() -> Self {
        Self::with_overrides(&HashMap::new())
    }
}
