//! Locale-aware display strings for measurements and instants
//!
//! Number and unit patterns follow what browsers produce through
//! `Intl.NumberFormat` with `style: "unit"`: at most three fraction digits,
//! locale grouping, and a per-locale unit pattern for each display width.
//! Month names come from chrono's localized formatting.

use std::fmt::Display;
use std::str::FromStr;

use chrono::{DateTime, TimeZone};
use serde::{Deserialize, Serialize};

use crate::models::Units;
use crate::WeatherPageError;

const MAX_FRACTION_DIGITS: i32 = 3;
const NBSP: char = '\u{a0}';
const NARROW_NBSP: char = '\u{202f}';

/// Supported display locales
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum Locale {
    #[default]
    #[serde(rename = "en-US")]
    EnUs,
    #[serde(rename = "en-GB")]
    EnGb,
    #[serde(rename = "de-DE")]
    DeDe,
    #[serde(rename = "fr-FR")]
    FrFr,
}

impl FromStr for Locale {
    type Err = WeatherPageError;

    /// Accepts BCP 47 (`de-DE`) and POSIX (`de_DE`) spellings, or a bare language
    fn from_str(tag: &str) -> Result<Self, Self::Err> {
        let normalized = tag.trim().replace('_', "-").to_ascii_lowercase();
        match normalized.as_str() {
            "en" | "en-us" => Ok(Self::EnUs),
            "en-gb" => Ok(Self::EnGb),
            "de" | "de-de" => Ok(Self::DeDe),
            "fr" | "fr-fr" => Ok(Self::FrFr),
            _ => Err(WeatherPageError::validation(format!(
                "Unsupported locale '{tag}'. Must be one of: en-US, en-GB, de-DE, fr-FR"
            ))),
        }
    }
}

impl Locale {
    #[must_use]
    pub fn tag(self) -> &'static str {
        match self {
            Self::EnUs => "en-US",
            Self::EnGb => "en-GB",
            Self::DeDe => "de-DE",
            Self::FrFr => "fr-FR",
        }
    }

    fn chrono_locale(self) -> chrono::Locale {
        match self {
            Self::EnUs => chrono::Locale::en_US,
            Self::EnGb => chrono::Locale::en_GB,
            Self::DeDe => chrono::Locale::de_DE,
            Self::FrFr => chrono::Locale::fr_FR,
        }
    }

    fn decimal_separator(self) -> char {
        match self {
            Self::EnUs | Self::EnGb => '.',
            Self::DeDe | Self::FrFr => ',',
        }
    }

    fn group_separator(self) -> char {
        match self {
            Self::EnUs | Self::EnGb => ',',
            Self::DeDe => '.',
            Self::FrFr => NARROW_NBSP,
        }
    }

    fn time_pattern(self) -> &'static str {
        match self {
            Self::EnUs => "%I:%M %p",
            Self::EnGb | Self::DeDe | Self::FrFr => "%H:%M",
        }
    }

    fn date_pattern(self) -> &'static str {
        match self {
            Self::EnUs => "%B %d, %Y at %I:%M %p",
            Self::EnGb => "%d %B %Y at %H:%M",
            Self::DeDe => "%d. %B %Y um %H:%M",
            Self::FrFr => "%d %B %Y à %H:%M",
        }
    }
}

/// Measurement units the page displays
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MeasureUnit {
    Percent,
    Celsius,
    Fahrenheit,
    /// Angular degree
    Degree,
    MeterPerSecond,
    MilePerHour,
}

impl MeasureUnit {
    /// Temperature unit for the given measurement system
    #[must_use]
    pub fn temperature(units: Units) -> Self {
        match units {
            Units::Metric => Self::Celsius,
            Units::Imperial => Self::Fahrenheit,
        }
    }

    /// Speed unit for the given measurement system
    #[must_use]
    pub fn speed(units: Units) -> Self {
        match units {
            Units::Metric => Self::MeterPerSecond,
            Units::Imperial => Self::MilePerHour,
        }
    }
}

/// Width of the unit label
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum UnitDisplay {
    Long,
    #[default]
    Short,
    Narrow,
}

/// Formats values for one locale
#[derive(Debug, Clone, Copy, Default)]
pub struct Formatter {
    locale: Locale,
}

impl Formatter {
    #[must_use]
    pub fn new(locale: Locale) -> Self {
        Self { locale }
    }

    #[must_use]
    pub fn locale(&self) -> Locale {
        self.locale
    }

    /// Format a measurement with its unit label; `display` defaults to short
    #[must_use]
    pub fn format_unit(&self, value: f64, unit: MeasureUnit, display: Option<UnitDisplay>) -> String {
        let number = self.format_number(value);
        let display = display.unwrap_or_default();
        let singular = value == 1.0;

        match self.locale {
            Locale::EnUs | Locale::EnGb => english_unit(&number, unit, display, singular),
            Locale::DeDe => german_unit(&number, unit, display),
            Locale::FrFr => french_unit(&number, unit, display, value.abs() < 2.0),
        }
    }

    /// Plain decimal number: up to three fraction digits, locale grouping
    #[must_use]
    pub fn format_number(&self, value: f64) -> String {
        let scale = 10_f64.powi(MAX_FRACTION_DIGITS);
        let rounded = (value * scale).round() / scale;
        let negative = rounded < 0.0;

        let text = format!("{:.*}", MAX_FRACTION_DIGITS as usize, rounded.abs());
        let (integer, fraction) = text.split_once('.').unwrap_or((text.as_str(), ""));
        let fraction = fraction.trim_end_matches('0');

        let mut out = String::new();
        if negative {
            out.push('-');
        }
        out.push_str(&group_digits(integer, self.locale.group_separator()));
        if !fraction.is_empty() {
            out.push(self.locale.decimal_separator());
            out.push_str(fraction);
        }
        out
    }

    /// Two-digit hour and minute
    #[must_use]
    pub fn format_time<Tz>(&self, instant: &DateTime<Tz>) -> String
    where
        Tz: TimeZone,
        Tz::Offset: Display,
    {
        instant
            .format_localized(self.locale.time_pattern(), self.locale.chrono_locale())
            .to_string()
    }

    /// Month name, two-digit day, year, hour and minute
    #[must_use]
    pub fn format_date<Tz>(&self, instant: &DateTime<Tz>) -> String
    where
        Tz: TimeZone,
        Tz::Offset: Display,
    {
        instant
            .format_localized(self.locale.date_pattern(), self.locale.chrono_locale())
            .to_string()
    }
}

fn group_digits(integer: &str, separator: char) -> String {
    let len = integer.len();
    let mut out = String::with_capacity(len + len / 3);
    for (i, digit) in integer.chars().enumerate() {
        if i > 0 && (len - i) % 3 == 0 {
            out.push(separator);
        }
        out.push(digit);
    }
    out
}

fn english_unit(number: &str, unit: MeasureUnit, display: UnitDisplay, singular: bool) -> String {
    use MeasureUnit::*;
    use UnitDisplay::*;

    let plural = |one: &str, many: &str| {
        format!("{number} {}", if singular { one } else { many })
    };

    match (unit, display) {
        (Percent, Long) => format!("{number} percent"),
        (Percent, _) => format!("{number}%"),
        (Celsius, Long) => plural("degree Celsius", "degrees Celsius"),
        (Celsius, _) => format!("{number}°C"),
        (Fahrenheit, Long) => plural("degree Fahrenheit", "degrees Fahrenheit"),
        (Fahrenheit, _) => format!("{number}°F"),
        (Degree, Long) => plural("degree", "degrees"),
        (Degree, Short) => format!("{number} deg"),
        (Degree, Narrow) => format!("{number}°"),
        (MeterPerSecond, Long) => plural("meter per second", "meters per second"),
        (MeterPerSecond, Short) => format!("{number} m/s"),
        (MeterPerSecond, Narrow) => format!("{number}m/s"),
        (MilePerHour, Long) => plural("mile per hour", "miles per hour"),
        (MilePerHour, Short) => format!("{number} mph"),
        (MilePerHour, Narrow) => format!("{number}mph"),
    }
}

fn german_unit(number: &str, unit: MeasureUnit, display: UnitDisplay) -> String {
    use MeasureUnit::*;
    use UnitDisplay::*;

    match (unit, display) {
        (Percent, Long) => format!("{number} Prozent"),
        (Percent, _) => format!("{number}{NBSP}%"),
        (Celsius, Long) => format!("{number} Grad Celsius"),
        (Celsius, Short) => format!("{number}{NBSP}°C"),
        (Celsius, Narrow) => format!("{number}°C"),
        (Fahrenheit, Long) => format!("{number} Grad Fahrenheit"),
        (Fahrenheit, Short) => format!("{number}{NBSP}°F"),
        (Fahrenheit, Narrow) => format!("{number}°F"),
        (Degree, Narrow) => format!("{number}°"),
        (Degree, _) => format!("{number} Grad"),
        (MeterPerSecond, Long) => format!("{number} Meter pro Sekunde"),
        (MeterPerSecond, _) => format!("{number}{NBSP}m/s"),
        (MilePerHour, Long) => format!("{number} Meilen pro Stunde"),
        (MilePerHour, _) => format!("{number}{NBSP}mi/h"),
    }
}

fn french_unit(number: &str, unit: MeasureUnit, display: UnitDisplay, singular: bool) -> String {
    use MeasureUnit::*;
    use UnitDisplay::*;

    let plural = |one: &str, many: &str| {
        format!("{number} {}", if singular { one } else { many })
    };

    match (unit, display) {
        (Percent, Long) => format!("{number} pour cent"),
        (Percent, _) => format!("{number}{NARROW_NBSP}%"),
        (Celsius, Long) => plural("degré Celsius", "degrés Celsius"),
        (Celsius, Short) => format!("{number}{NBSP}°C"),
        (Celsius, Narrow) => format!("{number}°C"),
        (Fahrenheit, Long) => plural("degré Fahrenheit", "degrés Fahrenheit"),
        (Fahrenheit, Short) => format!("{number}{NBSP}°F"),
        (Fahrenheit, Narrow) => format!("{number}°F"),
        (Degree, Long) => plural("degré", "degrés"),
        (Degree, _) => format!("{number}°"),
        (MeterPerSecond, Long) => plural("mètre par seconde", "mètres par seconde"),
        (MeterPerSecond, _) => format!("{number}{NBSP}m/s"),
        (MilePerHour, Long) => plural("mille par heure", "milles par heure"),
        (MilePerHour, _) => format!("{number}{NBSP}mi/h"),
    }
}
