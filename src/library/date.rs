//! `Date`: a UTC timestamp with millisecond precision.
//!
//! Dates are written as their seven UTC components, month 0-based:
//!
//! ```text
//! Date(2024,0,31,23,59,59,999)
//! ```
//!
//! Out-of-range components are carried into the next larger unit, so
//! `Date(2024,12,1)` is January 1st 2025. An invalid date is written with every
//! component `NaN`.

use super::{slot_materializer, slot_of};
use crate::class::{Class, TypeToken};
use crate::registry::ConstructionSpec;
use crate::{Object, Slot, Value};
use chrono::{DateTime, Datelike, NaiveDate, TimeDelta, Timelike, Utc};

pub static DATE: Class = Class::new("Date");

/// Largest distance from the epoch a date can have, in milliseconds.
const MAX_TIME: f64 = 8.64e15;

const MS_PER_DAY: f64 = 86_400_000.0;

pub(super) fn spec() -> ConstructionSpec {
    let class = TypeToken::of(&DATE);
    ConstructionSpec::new(class)
        .with_serializer(move |value| {
            let components = match slot_of(value, class)? {
                Slot::Date(Some(dt)) => components(&dt),
                _ => [f64::NAN; 7],
            };
            Ok(components.into_iter().map(Value::Number).collect())
        })
        .with_materializer(move |placeholder, args| {
            slot_materializer(class, placeholder, args, |args| {
                if args.is_empty() {
                    return Ok(Slot::Date(Some(truncate_to_millis(Utc::now()))));
                }
                let fields: Vec<f64> = args.iter().map(Value::to_number).collect();
                Ok(Slot::Date(from_components(&fields)))
            })
        })
}

fn components(dt: &DateTime<Utc>) -> [f64; 7] {
    [
        f64::from(dt.year()),
        f64::from(dt.month0()),
        f64::from(dt.day()),
        f64::from(dt.hour()),
        f64::from(dt.minute()),
        f64::from(dt.second()),
        f64::from(dt.timestamp_subsec_millis()),
    ]
}

/// Builds a date from UTC components the way `Date.UTC` does: missing trailing
/// fields default to `0, 1, 0, 0, 0, 0`, fractions are truncated and overflow
/// carries. Returns `None` for non-finite fields or times out of range.
fn from_components(fields: &[f64]) -> Option<DateTime<Utc>> {
    const DEFAULTS: [f64; 7] = [f64::NAN, 0.0, 1.0, 0.0, 0.0, 0.0, 0.0];

    let mut parts = [0.0; 7];
    for (index, part) in parts.iter_mut().enumerate() {
        let field = fields.get(index).copied().unwrap_or(DEFAULTS[index]);
        if !field.is_finite() {
            return None;
        }
        *part = field.trunc();
    }
    let [year, month, day, hour, minute, second, millis] = parts;

    let year = year + (month / 12.0).floor();
    let month = month.rem_euclid(12.0);
    if year.abs() > 400_000.0 {
        return None;
    }
    let first_of_month = NaiveDate::from_ymd_opt(year as i32, month as u32 + 1, 1)?;
    let days = first_of_month
        .and_hms_opt(0, 0, 0)?
        .and_utc()
        .timestamp_millis() as f64
        / MS_PER_DAY;

    let time = (days + day - 1.0) * MS_PER_DAY
        + hour * 3_600_000.0
        + minute * 60_000.0
        + second * 1_000.0
        + millis;
    if !time.is_finite() || time.abs() > MAX_TIME {
        return None;
    }
    DateTime::from_timestamp_millis(time as i64)
}

fn truncate_to_millis(dt: DateTime<Utc>) -> DateTime<Utc> {
    let excess = TimeDelta::nanoseconds(i64::from(dt.nanosecond() % 1_000_000));
    dt - excess
}

/// The milliseconds since the epoch of a `Date` object, `None` for anything else
/// or an invalid date.
///
/// ```rust
/// use serde_construct::library::timestamp;
/// use serde_construct::Value;
///
/// let date = Value::date_from_millis(1_700_000_000_123.0);
/// assert_eq!(timestamp(&date), Some(1_700_000_000_123));
/// assert_eq!(timestamp(&Value::date_from_millis(f64::NAN)), None);
/// ```
#[must_use]
pub fn timestamp(value: &Value) -> Option<i64> {
    match value {
        Value::Object(object) => match &*object.slot() {
            Slot::Date(Some(dt)) => Some(dt.timestamp_millis()),
            _ => None,
        },
        _ => None,
    }
}

impl Value {
    /// A `Date` object. Sub-millisecond precision is dropped.
    #[must_use]
    pub fn date(dt: DateTime<Utc>) -> Value {
        Value::Object(Object::with_slot(
            TypeToken::of(&DATE),
            Slot::Date(Some(truncate_to_millis(dt))),
        ))
    }

    /// A `Date` object from milliseconds since the epoch; non-finite or out of
    /// range times give an invalid date.
    #[must_use]
    pub fn date_from_millis(millis: f64) -> Value {
        let dt = if millis.is_finite() && millis.abs() <= MAX_TIME {
            DateTime::from_timestamp_millis(millis.trunc() as i64)
        } else {
            None
        };
        Value::Object(Object::with_slot(TypeToken::of(&DATE), Slot::Date(dt)))
    }
}

impl From<DateTime<Utc>> for Value {
    fn from(value: DateTime<Utc>) -> Self {
        Value::date(value)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn millis(fields: &[f64]) -> Option<i64> {
        from_components(fields).map(|dt| dt.timestamp_millis())
    }

    #[test]
    fn test_components_round_trip() {
        let dt = Utc.with_ymd_and_hms(2024, 2, 29, 13, 45, 7).unwrap() + TimeDelta::milliseconds(89);
        let parts = components(&dt);
        assert_eq!(parts, [2024.0, 1.0, 29.0, 13.0, 45.0, 7.0, 89.0]);
        assert_eq!(from_components(&parts), Some(dt));
    }

    #[test]
    fn test_missing_fields_use_defaults() {
        let expected = Utc.with_ymd_and_hms(1999, 1, 1, 0, 0, 0).unwrap();
        assert_eq!(millis(&[1999.0]), Some(expected.timestamp_millis()));
        assert_eq!(millis(&[]), None);
    }

    #[test]
    fn test_overflow_carries() {
        let expected = Utc.with_ymd_and_hms(2025, 1, 1, 0, 0, 0).unwrap();
        assert_eq!(millis(&[2024.0, 12.0, 1.0]), Some(expected.timestamp_millis()));

        let expected = Utc.with_ymd_and_hms(2023, 12, 31, 23, 59, 59).unwrap();
        assert_eq!(
            millis(&[2024.0, 0.0, 1.0, 0.0, 0.0, -1.0]),
            Some(expected.timestamp_millis())
        );
        assert_eq!(millis(&[2024.0, -1.0, 1.0]), millis(&[2023.0, 11.0, 1.0]));
    }

    #[test]
    fn test_invalid_fields() {
        assert_eq!(millis(&[2024.0, f64::NAN]), None);
        assert_eq!(millis(&[f64::INFINITY]), None);
        assert_eq!(millis(&[300_000.0]), None);
    }

    #[test]
    fn test_invalid_date_serializes_as_nans() {
        let mut registry = crate::Registry::new();
        let date = registry.register(spec()).unwrap();
        let parts = date.serialize(&Value::date_from_millis(f64::NAN)).unwrap();
        assert_eq!(parts.len(), 7);
        assert!(parts.iter().all(|p| p.as_f64().is_some_and(f64::is_nan)));
    }

    #[test]
    fn test_date_drops_nanoseconds() {
        let dt = Utc.timestamp_opt(10, 123_456_789).unwrap();
        assert_eq!(timestamp(&Value::date(dt)), Some(10_123));
    }
}
