//! Best-effort conversion between dynamic values.
//!
//! Every `to_*` function returns `None` when the value cannot be interpreted
//! as the requested type; none of them fail loudly.

use chrono::{DateTime, TimeDelta, Utc};

use crate::{AnyValue, TypeCode};

/// Resolves the type code of a value. `Null` resolves to [`TypeCode::Unknown`].
pub fn to_type_code(value: &AnyValue) -> TypeCode {
    match value {
        AnyValue::Null => TypeCode::Unknown,
        AnyValue::Boolean(_) => TypeCode::Boolean,
        AnyValue::Integer(_) => TypeCode::Integer,
        AnyValue::Long(_) => TypeCode::Long,
        AnyValue::Float(_) => TypeCode::Float,
        AnyValue::Double(_) => TypeCode::Double,
        AnyValue::String(_) => TypeCode::String,
        AnyValue::DateTime(_) => TypeCode::DateTime,
        AnyValue::Duration(_) => TypeCode::Duration,
        AnyValue::Enum(_) => TypeCode::Enum,
        AnyValue::Array(_) => TypeCode::Array,
        AnyValue::Map(_) => TypeCode::Map,
        AnyValue::Object(_) => TypeCode::Object,
    }
}

/// Converts scalars to their string form. Containers and `Null` yield `None`.
pub fn to_string(value: &AnyValue) -> Option<String> {
    match value {
        AnyValue::Null | AnyValue::Array(_) | AnyValue::Map(_) | AnyValue::Object(_) => None,
        AnyValue::Boolean(b) => Some(b.to_string()),
        AnyValue::Integer(i) => Some(i.to_string()),
        AnyValue::Long(l) => Some(l.to_string()),
        AnyValue::Float(f) => Some(f.to_string()),
        AnyValue::Double(d) => Some(d.to_string()),
        AnyValue::String(s) | AnyValue::Enum(s) => Some(s.clone()),
        AnyValue::DateTime(dt) => Some(dt.to_rfc3339()),
        AnyValue::Duration(d) => Some(d.num_milliseconds().to_string()),
    }
}

/// Converts to a boolean.
///
/// Strings accept `true/false`, `1/0`, `yes/no`, `y/n` and `t/f` in any case;
/// numbers are `true` when non-zero.
pub fn to_boolean(value: &AnyValue) -> Option<bool> {
    match value {
        AnyValue::Boolean(b) => Some(*b),
        AnyValue::Integer(_) | AnyValue::Long(_) | AnyValue::Float(_) | AnyValue::Double(_) => {
            to_double(value).map(|d| d != 0.0)
        }
        AnyValue::Duration(d) => Some(!d.is_zero()),
        AnyValue::String(s) => match s.trim().to_ascii_lowercase().as_str() {
            "true" | "1" | "yes" | "y" | "t" => Some(true),
            "false" | "0" | "no" | "n" | "f" => Some(false),
            _ => None,
        },
        _ => None,
    }
}

/// Converts to a 64-bit integer, truncating fractions.
pub fn to_long(value: &AnyValue) -> Option<i64> {
    match value {
        AnyValue::Integer(i) => Some(i64::from(*i)),
        AnyValue::Long(l) => Some(*l),
        AnyValue::Float(_) | AnyValue::Double(_) => to_double(value)
            .filter(|d| d.is_finite())
            .map(|d| d.trunc() as i64),
        AnyValue::Boolean(b) => Some(i64::from(*b)),
        AnyValue::DateTime(dt) => Some(dt.timestamp_millis()),
        AnyValue::Duration(d) => Some(d.num_milliseconds()),
        AnyValue::String(s) => {
            let s = s.trim();
            s.parse::<i64>().ok().or_else(|| {
                s.parse::<f64>()
                    .ok()
                    .filter(|d| d.is_finite())
                    .map(|d| d.trunc() as i64)
            })
        }
        _ => None,
    }
}

/// Converts to a 32-bit integer; values outside the `i32` range yield `None`.
pub fn to_integer(value: &AnyValue) -> Option<i32> {
    to_long(value).and_then(|l| i32::try_from(l).ok())
}

/// Converts to a 64-bit float.
pub fn to_double(value: &AnyValue) -> Option<f64> {
    match value {
        AnyValue::Integer(i) => Some(f64::from(*i)),
        AnyValue::Long(l) => Some(*l as f64),
        AnyValue::Float(f) => Some(f64::from(*f)),
        AnyValue::Double(d) => Some(*d),
        AnyValue::Boolean(b) => Some(if *b { 1.0 } else { 0.0 }),
        AnyValue::DateTime(dt) => Some(dt.timestamp_millis() as f64),
        AnyValue::Duration(d) => Some(d.num_milliseconds() as f64),
        AnyValue::String(s) => s.trim().parse::<f64>().ok(),
        _ => None,
    }
}

/// Converts to `f32`, narrowing from `f64` when needed.
pub fn to_float(value: &AnyValue) -> Option<f32> {
    to_double(value).map(|d| d as f32)
}

/// Converts to a UTC date-time.
///
/// Strings are parsed as RFC 3339 (or a bare `YYYY-MM-DD` date); numbers are
/// read as milliseconds since the Unix epoch.
pub fn to_datetime(value: &AnyValue) -> Option<DateTime<Utc>> {
    match value {
        AnyValue::DateTime(dt) => Some(*dt),
        AnyValue::Integer(_) | AnyValue::Long(_) | AnyValue::Float(_) | AnyValue::Double(_) => {
            to_long(value).and_then(DateTime::from_timestamp_millis)
        }
        AnyValue::String(s) => parse_datetime(s.trim()),
        _ => None,
    }
}

fn parse_datetime(s: &str) -> Option<DateTime<Utc>> {
    if let Ok(dt) = DateTime::parse_from_rfc3339(s) {
        return Some(dt.with_timezone(&Utc));
    }
    chrono::NaiveDate::parse_from_str(s, "%Y-%m-%d")
        .ok()
        .and_then(|date| date.and_hms_opt(0, 0, 0))
        .map(|naive| naive.and_utc())
}

/// Converts to a duration; numbers are read as milliseconds.
pub fn to_duration(value: &AnyValue) -> Option<TimeDelta> {
    match value {
        AnyValue::Duration(d) => Some(*d),
        AnyValue::Integer(_)
        | AnyValue::Long(_)
        | AnyValue::Float(_)
        | AnyValue::Double(_)
        | AnyValue::String(_) => to_long(value).and_then(TimeDelta::try_milliseconds),
        _ => None,
    }
}

/// Converts a value into the representation of `code`.
///
/// Returns `Null` when the conversion is not possible. Container codes and
/// [`TypeCode::Unknown`] return the value unchanged.
///
/// # Examples
///
/// ```
/// use value_schema_core::{convert, AnyValue, TypeCode};
///
/// let n = convert::convert_to(&AnyValue::from("42"), TypeCode::Long);
/// assert_eq!(n, AnyValue::Long(42));
///
/// let bad = convert::convert_to(&AnyValue::from("abc"), TypeCode::Integer);
/// assert!(bad.is_null());
/// ```
pub fn convert_to(value: &AnyValue, code: TypeCode) -> AnyValue {
    match code {
        TypeCode::String => to_string(value).into(),
        TypeCode::Boolean => to_boolean(value).into(),
        TypeCode::Integer => to_integer(value).into(),
        TypeCode::Long => to_long(value).into(),
        TypeCode::Float => to_float(value).into(),
        TypeCode::Double => to_double(value).into(),
        TypeCode::DateTime => to_datetime(value).into(),
        TypeCode::Duration => to_duration(value).into(),
        TypeCode::Enum => to_string(value).map(AnyValue::Enum).unwrap_or_default(),
        TypeCode::Unknown | TypeCode::Object | TypeCode::Array | TypeCode::Map => value.clone(),
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    #[test]
    fn test_type_codes_of_json_values() {
        let samples = [
            json!(null),
            json!(true),
            json!(1),
            json!(1.5),
            json!("s"),
            json!([]),
            json!({}),
        ];
        let codes: Vec<TypeCode> = samples
            .into_iter()
            .map(|j| to_type_code(&AnyValue::from(j)))
            .collect();
        assert_eq!(
            codes,
            vec![
                TypeCode::Unknown,
                TypeCode::Boolean,
                TypeCode::Integer,
                TypeCode::Double,
                TypeCode::String,
                TypeCode::Array,
                TypeCode::Map
            ]
        );
    }

    #[test]
    fn test_string_to_numbers() {
        assert_eq!(to_long(&"123".into()), Some(123));
        assert_eq!(to_long(&"12.9".into()), Some(12));
        assert_eq!(to_integer(&AnyValue::Long(5_000_000_000)), None);
        assert_eq!(to_double(&" 2.5 ".into()), Some(2.5));
        assert_eq!(to_double(&"abc".into()), None);
    }

    #[test]
    fn test_booleans() {
        assert_eq!(to_boolean(&"Yes".into()), Some(true));
        assert_eq!(to_boolean(&"0".into()), Some(false));
        assert_eq!(to_boolean(&AnyValue::Double(0.5)), Some(true));
        assert_eq!(to_boolean(&"maybe".into()), None);
    }

    #[test]
    fn test_datetimes() {
        let dt = to_datetime(&"2024-01-15T10:30:00Z".into()).unwrap();
        assert_eq!(dt.timestamp(), 1_705_314_600);
        assert_eq!(to_datetime(&AnyValue::Long(0)), DateTime::from_timestamp(0, 0));
        assert!(to_datetime(&"2024-01-15".into()).is_some());
        assert!(to_datetime(&"yesterday".into()).is_none());
    }

    #[test]
    fn test_containers_have_no_string_form() {
        assert_eq!(to_string(&AnyValue::from(json!([1]))), None);
        assert_eq!(to_string(&AnyValue::Null), None);
    }
}
