//! Literal-to-value coercion shared by every configuration source.
//!
//! Defaults, file scalars and environment variables all arrive as text and go
//! through [`coerce`], so two layers can never disagree on what a literal means.

use chrono::TimeDelta;
use std::fmt;
use thiserror::Error;

const NANOS_PER_MICRO: i128 = 1_000;
const NANOS_PER_MILLI: i128 = 1_000_000;
const NANOS_PER_SEC: i128 = 1_000_000_000;
const NANOS_PER_MIN: i128 = 60 * NANOS_PER_SEC;
const NANOS_PER_HOUR: i128 = 60 * NANOS_PER_MIN;

/// Fraction digits beyond this cannot affect a nanosecond total.
const MAX_FRACTION_DIGITS: usize = 18;

/// The type of a configuration leaf.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FieldKind {
    String,
    Integer,
    Duration,
    Boolean,
    StringList { separator: &'static str },
}

impl fmt::Display for FieldKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FieldKind::String => write!(f, "string"),
            FieldKind::Integer => write!(f, "integer"),
            FieldKind::Duration => write!(f, "duration"),
            FieldKind::Boolean => write!(f, "boolean"),
            FieldKind::StringList { .. } => write!(f, "string list"),
        }
    }
}

/// A typed leaf value.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Value {
    String(String),
    Integer(i64),
    Duration(TimeDelta),
    Boolean(bool),
    StringList(Vec<String>),
}

impl Value {
    /// Whether this is the zero value of its kind.
    pub fn is_zero(&self) -> bool {
        match self {
            Value::String(s) => s.is_empty(),
            Value::Integer(n) => *n == 0,
            Value::Duration(d) => d.is_zero(),
            Value::Boolean(b) => !b,
            Value::StringList(items) => items.is_empty(),
        }
    }
}

/// A literal that cannot be interpreted as the requested kind.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("cannot convert {literal:?} to {kind}: {reason}")]
pub struct ConversionError {
    pub kind: FieldKind,
    pub literal: String,
    pub reason: String,
}

impl ConversionError {
    pub fn new(kind: FieldKind, literal: &str, reason: impl Into<String>) -> Self {
        Self {
            kind,
            literal: literal.to_string(),
            reason: reason.into(),
        }
    }
}

/// Convert `literal` into a value of `kind`.
pub fn coerce(kind: FieldKind, literal: &str) -> Result<Value, ConversionError> {
    let value = match kind {
        FieldKind::String => Value::String(literal.to_string()),
        FieldKind::Integer => Value::Integer(
            literal
                .parse::<i64>()
                .map_err(|e| ConversionError::new(kind, literal, e.to_string()))?,
        ),
        FieldKind::Duration => Value::Duration(
            parse_duration(literal).map_err(|reason| ConversionError::new(kind, literal, reason))?,
        ),
        FieldKind::Boolean => match literal {
            "true" => Value::Boolean(true),
            "false" => Value::Boolean(false),
            _ => {
                return Err(ConversionError::new(
                    kind,
                    literal,
                    "expected \"true\" or \"false\"",
                ));
            }
        },
        FieldKind::StringList { separator } => Value::StringList(split_list(literal, separator)),
    };
    Ok(value)
}

/// Split a separator-joined list, trimming each element.
///
/// A blank literal is the empty list, never `[""]`.
pub fn split_list(literal: &str, separator: &str) -> Vec<String> {
    if literal.trim().is_empty() {
        return Vec::new();
    }
    literal
        .split(separator)
        .map(|item| item.trim().to_string())
        .collect()
}

/// Parse a duration such as `1h30m`, `1.5h`, `-90s` or `250ms`.
///
/// The literal is an optional sign followed by one or more `<number><unit>`
/// tokens. Units are `h`, `m`, `s`, `ms`, `us` (or `µs`) and `ns`. A bare `0`
/// is accepted without a unit.
pub fn parse_duration(literal: &str) -> Result<TimeDelta, String> {
    let (negative, mut rest) = match literal.as_bytes().first() {
        Some(b'-') => (true, &literal[1..]),
        Some(b'+') => (false, &literal[1..]),
        _ => (false, literal),
    };
    if rest == "0" {
        return Ok(TimeDelta::zero());
    }
    if rest.is_empty() {
        return Err("empty duration".to_string());
    }

    let mut total: i128 = 0;
    while !rest.is_empty() {
        let (int_part, after) = split_digits(rest);
        let (frac_part, after) = match after.strip_prefix('.') {
            Some(stripped) => split_digits(stripped),
            None => ("", after),
        };
        if int_part.is_empty() && frac_part.is_empty() {
            return Err(format!("expected a number at {rest:?}"));
        }

        let unit_end = after
            .find(|c: char| c == '.' || c.is_ascii_digit())
            .unwrap_or(after.len());
        let (unit, after) = after.split_at(unit_end);
        let scale = match unit {
            "ns" => 1,
            "us" | "\u{b5}s" | "\u{3bc}s" => NANOS_PER_MICRO,
            "ms" => NANOS_PER_MILLI,
            "s" => NANOS_PER_SEC,
            "m" => NANOS_PER_MIN,
            "h" => NANOS_PER_HOUR,
            "" => return Err(format!("missing unit after {int_part}")),
            other => return Err(format!("unknown unit {other:?}")),
        };

        let whole: i128 = if int_part.is_empty() {
            0
        } else {
            int_part.parse().map_err(|_| "duration out of range".to_string())?
        };
        let mut nanos = whole
            .checked_mul(scale)
            .ok_or_else(|| "duration out of range".to_string())?;
        if !frac_part.is_empty() {
            let digits = &frac_part[..frac_part.len().min(MAX_FRACTION_DIGITS)];
            let fraction: i128 = digits
                .parse()
                .map_err(|_| "invalid fraction".to_string())?;
            nanos += fraction * scale / 10_i128.pow(digits.len() as u32);
        }

        total = total
            .checked_add(nanos)
            .filter(|t| *t <= i128::from(i64::MAX))
            .ok_or_else(|| "duration out of range".to_string())?;
        rest = after;
    }

    let total = if negative { -total } else { total };
    let nanos = i64::try_from(total).map_err(|_| "duration out of range".to_string())?;
    Ok(TimeDelta::nanoseconds(nanos))
}

fn split_digits(s: &str) -> (&str, &str) {
    let end = s.find(|c: char| !c.is_ascii_digit()).unwrap_or(s.len());
    s.split_at(end)
}

/// Render a duration in the canonical form accepted by [`parse_duration`].
///
/// Durations of a second or more use `h`/`m`/`s` (`1h0m0s`, `2m30s`, `1.5s`);
/// shorter ones use the largest sub-second unit (`250ms`, `1.5µs`, `7ns`).
pub fn format_duration(duration: TimeDelta) -> String {
    let total = i128::from(duration.num_seconds()) * NANOS_PER_SEC
        + i128::from(duration.subsec_nanos());
    if total == 0 {
        return "0s".to_string();
    }

    let mut out = String::new();
    if total < 0 {
        out.push('-');
    }
    let mut rest = total.abs();

    if rest < NANOS_PER_SEC {
        let (unit, scale) = if rest < NANOS_PER_MICRO {
            ("ns", 1)
        } else if rest < NANOS_PER_MILLI {
            ("\u{b5}s", NANOS_PER_MICRO)
        } else {
            ("ms", NANOS_PER_MILLI)
        };
        out.push_str(&format_scaled(rest, scale));
        out.push_str(unit);
        return out;
    }

    let hours = rest / NANOS_PER_HOUR;
    rest %= NANOS_PER_HOUR;
    let minutes = rest / NANOS_PER_MIN;
    rest %= NANOS_PER_MIN;
    if hours > 0 {
        out.push_str(&format!("{hours}h{minutes}m"));
    } else if minutes > 0 {
        out.push_str(&format!("{minutes}m"));
    }
    out.push_str(&format_scaled(rest, NANOS_PER_SEC));
    out.push('s');
    out
}

/// `value / scale` as a decimal with trailing zeros trimmed.
fn format_scaled(value: i128, scale: i128) -> String {
    let whole = value / scale;
    let fraction = value % scale;
    if fraction == 0 {
        return whole.to_string();
    }
    let width = scale.to_string().len() - 1;
    let digits = format!("{fraction:0width$}");
    format!("{whole}.{}", digits.trim_end_matches('0'))
}
