//! Time-templated complication text.
//!
//! Providers hand over a template rather than a finished string so that
//! countdowns and clocks stay correct between data updates. The template is
//! evaluated against the frame's render time on every draw.

use chrono::TimeZone;
use chrono_tz::Tz;
use serde::{Deserialize, Serialize};

/// Unit granularity for [`ComplicationText::TimeDifference`]
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
pub enum TimeDifferenceStyle {
    /// Largest whole unit only, e.g. `5m`, `2h`, `3d`
    #[serde(rename = "single_unit")]
    #[default]
    SingleUnit,
    /// Two most significant units, e.g. `2h 5m`
    #[serde(rename = "dual_unit")]
    DualUnit,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(tag = "type")]
pub enum ComplicationText {
    #[serde(rename = "plain")]
    Plain { text: String },
    /// chrono `strftime` pattern rendered in the frame's time zone
    #[serde(rename = "time_format")]
    TimeFormat { pattern: String },
    /// Distance between render time and `reference_millis`
    #[serde(rename = "time_difference")]
    TimeDifference {
        reference_millis: i64,
        #[serde(default)]
        style: TimeDifferenceStyle,
    },
}

impl ComplicationText {
    pub fn plain(text: impl Into<String>) -> Self {
        Self::Plain { text: text.into() }
    }

    pub fn time_format(pattern: impl Into<String>) -> Self {
        Self::TimeFormat {
            pattern: pattern.into(),
        }
    }

    /// Evaluate the template at `render_millis` (Unix epoch milliseconds)
    pub fn text_at(&self, render_millis: i64, tz: &Tz) -> String {
        match self {
            Self::Plain { text } => text.clone(),
            Self::TimeFormat { pattern } => match tz.timestamp_millis_opt(render_millis).single() {
                Some(local) => local.format(pattern).to_string(),
                None => String::new(),
            },
            Self::TimeDifference {
                reference_millis,
                style,
            } => format_difference((reference_millis - render_millis).unsigned_abs(), *style),
        }
    }
}

const MINUTE_MS: u64 = 60_000;
const HOUR_MS: u64 = 60 * MINUTE_MS;
const DAY_MS: u64 = 24 * HOUR_MS;

fn format_difference(millis: u64, style: TimeDifferenceStyle) -> String {
    // Round up so a countdown never shows 0m while time remains
    let minutes = millis.div_ceil(MINUTE_MS);
    let total = minutes * MINUTE_MS;
    let days = total / DAY_MS;
    let hours = (total % DAY_MS) / HOUR_MS;
    let mins = (total % HOUR_MS) / MINUTE_MS;

    match style {
        TimeDifferenceStyle::SingleUnit => {
            if days > 0 {
                format!("{}d", days)
            } else if hours > 0 {
                format!("{}h", hours)
            } else {
                format!("{}m", mins)
            }
        }
        TimeDifferenceStyle::DualUnit => {
            if days > 0 {
                format!("{}d {}h", days, hours)
            } else if hours > 0 {
                format!("{}h {}m", hours, mins)
            } else {
                format!("{}m", mins)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const NOON_UTC: i64 = 1_700_000_000_000 - (1_700_000_000_000 % 86_400_000) + 12 * 3_600_000;

    #[test]
    fn test_plain_ignores_time() {
        let text = ComplicationText::plain("72%");
        assert_eq!(text.text_at(0, &Tz::UTC), "72%");
        assert_eq!(text.text_at(NOON_UTC, &Tz::UTC), "72%");
    }

    #[test]
    fn test_time_format_uses_zone() {
        let text = ComplicationText::time_format("%H:%M");
        assert_eq!(text.text_at(NOON_UTC, &Tz::UTC), "12:00");
        assert_eq!(text.text_at(NOON_UTC, &chrono_tz::Asia::Tokyo), "21:00");
    }

    #[test]
    fn test_time_difference_styles() {
        let reference = NOON_UTC + 2 * HOUR_MS as i64 + 5 * MINUTE_MS as i64;
        let single = ComplicationText::TimeDifference {
            reference_millis: reference,
            style: TimeDifferenceStyle::SingleUnit,
        };
        let dual = ComplicationText::TimeDifference {
            reference_millis: reference,
            style: TimeDifferenceStyle::DualUnit,
        };
        assert_eq!(single.text_at(NOON_UTC, &Tz::UTC), "2h");
        assert_eq!(dual.text_at(NOON_UTC, &Tz::UTC), "2h 5m");
        // Evaluated per frame, not at construction
        assert_eq!(dual.text_at(reference - 30_000, &Tz::UTC), "1m");
    }

    #[test]
    fn test_serde_tagging() {
        let json = r#"{"type":"time_difference","reference_millis":5}"#;
        let text: ComplicationText = serde_json::from_str(json).unwrap();
        assert_eq!(
            text,
            ComplicationText::TimeDifference {
                reference_millis: 5,
                style: TimeDifferenceStyle::SingleUnit
            }
        );
    }
}
