//! String-to-value coercion for each supported field kind.

use crate::core::{Kind, Value};
use crate::error::{CoerceError, DurationError};
use std::num::ParseIntError;
use std::str::FromStr;
use std::time::Duration;

/// Convert a raw source string into a value of the given kind.
///
/// Integers are parsed in base 10 at the target width, so out-of-range input
/// fails instead of truncating. Durations use literals such as `"300ms"`,
/// `"1h30m"` or `"1.5h"`.
///
/// # Errors
///
/// Returns a [`CoerceError`] if `raw` is not a valid literal for `kind`, or if
/// `kind` is [`Kind::Unsupported`].
pub fn coerce(kind: Kind, raw: &str) -> Result<Value, CoerceError> {
    match kind {
        Kind::String => Ok(Value::String(raw.to_string())),
        Kind::I8 => signed::<i8>(kind, raw, i64::from),
        Kind::I16 => signed::<i16>(kind, raw, i64::from),
        Kind::I32 => signed::<i32>(kind, raw, i64::from),
        Kind::I64 => signed::<i64>(kind, raw, i64::from),
        Kind::Isize => signed::<isize>(kind, raw, |v| v as i64),
        Kind::U8 => unsigned::<u8>(kind, raw, u64::from),
        Kind::U16 => unsigned::<u16>(kind, raw, u64::from),
        Kind::U32 => unsigned::<u32>(kind, raw, u64::from),
        Kind::U64 => unsigned::<u64>(kind, raw, u64::from),
        Kind::Usize => unsigned::<usize>(kind, raw, |v| v as u64),
        Kind::F32 => raw
            .parse::<f32>()
            .map(|v| Value::Float(f64::from(v)))
            .map_err(CoerceError::InvalidFloat),
        Kind::F64 => raw
            .parse::<f64>()
            .map(Value::Float)
            .map_err(CoerceError::InvalidFloat),
        Kind::Bool => parse_bool(raw).map(Value::Bool),
        Kind::Duration => Ok(Value::Duration(parse_duration(raw)?)),
        Kind::Unsupported(name) => Err(CoerceError::Unsupported(name)),
    }
}

fn signed<N>(kind: Kind, raw: &str, widen: fn(N) -> i64) -> Result<Value, CoerceError>
where
    N: FromStr<Err = ParseIntError>,
{
    raw.parse::<N>()
        .map(|v| Value::Int(widen(v)))
        .map_err(|error| CoerceError::InvalidInteger { kind, error })
}

fn unsigned<N>(kind: Kind, raw: &str, widen: fn(N) -> u64) -> Result<Value, CoerceError>
where
    N: FromStr<Err = ParseIntError>,
{
    raw.parse::<N>()
        .map(|v| Value::Uint(widen(v)))
        .map_err(|error| CoerceError::InvalidUnsigned { kind, error })
}

/// Parse a boolean, accepting `1 t T TRUE true True` and `0 f F FALSE false False`.
pub fn parse_bool(raw: &str) -> Result<bool, CoerceError> {
    match raw {
        "1" | "t" | "T" | "TRUE" | "true" | "True" => Ok(true),
        "0" | "f" | "F" | "FALSE" | "false" | "False" => Ok(false),
        _ => Err(CoerceError::InvalidBool(raw.to_string())),
    }
}

const NANOSECOND: u128 = 1;
const MICROSECOND: u128 = 1_000 * NANOSECOND;
const MILLISECOND: u128 = 1_000 * MICROSECOND;
const SECOND: u128 = 1_000 * MILLISECOND;
const MINUTE: u128 = 60 * SECOND;
const HOUR: u128 = 60 * MINUTE;

// Fraction digits past this precision cannot change the nanosecond result.
const MAX_FRACTION_DIGITS: usize = 20;

/// Parse a duration literal: a sequence of decimal numbers, each with an optional
/// fraction and a unit suffix, e.g. `"300ms"`, `"1.5h"` or `"2h45m"`.
///
/// Valid units are `ns`, `us` (or `µs`), `ms`, `s`, `m` and `h`. A bare `"0"`
/// needs no unit. Negative durations are rejected since [`Duration`] is unsigned.
///
/// # Examples
///
/// ```rust
/// use configly::core::parse_duration;
/// use std::time::Duration;
///
/// assert_eq!(parse_duration("1h30m").unwrap(), Duration::from_secs(5400));
/// assert_eq!(parse_duration("1.5s").unwrap(), Duration::from_millis(1500));
/// assert!(parse_duration("10").is_err());
/// ```
pub fn parse_duration(input: &str) -> Result<Duration, DurationError> {
    let (negative, mut rest) = match input.as_bytes().first() {
        Some(b'-') => (true, &input[1..]),
        Some(b'+') => (false, &input[1..]),
        _ => (false, input),
    };

    if rest == "0" {
        return Ok(Duration::ZERO);
    }
    if rest.is_empty() {
        return Err(DurationError::Invalid(input.to_string()));
    }

    let mut total: u128 = 0;
    while !rest.is_empty() {
        let (whole, after) = split_digits(rest);
        let (fraction, after) = match after.strip_prefix('.') {
            Some(after) => split_digits(after),
            None => ("", after),
        };
        if whole.is_empty() && fraction.is_empty() {
            return Err(DurationError::Invalid(input.to_string()));
        }

        let unit_end = after
            .find(|c: char| c == '.' || c.is_ascii_digit())
            .unwrap_or(after.len());
        let (unit, after) = after.split_at(unit_end);
        let scale = match unit {
            "" => return Err(DurationError::MissingUnit(input.to_string())),
            "ns" => NANOSECOND,
            "us" | "µs" | "μs" => MICROSECOND,
            "ms" => MILLISECOND,
            "s" => SECOND,
            "m" => MINUTE,
            "h" => HOUR,
            _ => {
                return Err(DurationError::UnknownUnit {
                    unit: unit.to_string(),
                    input: input.to_string(),
                });
            }
        };

        let overflow = || DurationError::Overflow(input.to_string());
        let whole: u128 = if whole.is_empty() {
            0
        } else {
            whole.parse().map_err(|_| overflow())?
        };
        let mut nanos = whole.checked_mul(scale).ok_or_else(overflow)?;
        if !fraction.is_empty() {
            let digits = &fraction[..fraction.len().min(MAX_FRACTION_DIGITS)];
            let numerator: u128 = digits.parse().map_err(|_| overflow())?;
            nanos = nanos
                .checked_add(numerator * scale / 10u128.pow(digits.len() as u32))
                .ok_or_else(overflow)?;
        }
        total = total.checked_add(nanos).ok_or_else(overflow)?;
        rest = after;
    }

    if negative && total != 0 {
        return Err(DurationError::Negative(input.to_string()));
    }
    let nanos = u64::try_from(total).map_err(|_| DurationError::Overflow(input.to_string()))?;
    Ok(Duration::from_nanos(nanos))
}

fn split_digits(s: &str) -> (&str, &str) {
    let end = s.find(|c: char| !c.is_ascii_digit()).unwrap_or(s.len());
    s.split_at(end)
}
