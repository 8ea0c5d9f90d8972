// Copyright 2025 the Plotline Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Value formatting for tick labels, annotations and legends.

use core::fmt::{self, Write as _};
use std::sync::Arc;

use chrono::{DateTime, Utc};

/// `%Y-%m-%d`
pub const DATE_FORMAT: &str = "%Y-%m-%d";
/// `%m-%d %-I%p`
pub const DATE_HOUR_FORMAT: &str = "%m-%d %-I%p";
/// `%m-%d %-I:%M%p`
pub const DATE_MINUTE_FORMAT: &str = "%m-%d %-I:%M%p";
/// `%.2f`
pub const FLOAT_FORMAT: &str = "%.2f";
/// `%.2f%%`
pub const PERCENT_FORMAT: &str = "%.2f%%";

/// A value of any kind a formatter may be asked to render.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum FormatValue {
    /// A 32-bit integer.
    Int(i32),
    /// A 64-bit integer. Time formatters read it as Unix nanoseconds.
    Int64(i64),
    /// A 32-bit float.
    Float32(f32),
    /// A 64-bit float. Time formatters read it as Unix nanoseconds.
    Float64(f64),
    /// A point in time.
    Time(DateTime<Utc>),
}

impl From<i32> for FormatValue {
    fn from(v: i32) -> Self {
        Self::Int(v)
    }
}

impl From<i64> for FormatValue {
    fn from(v: i64) -> Self {
        Self::Int64(v)
    }
}

impl From<f32> for FormatValue {
    fn from(v: f32) -> Self {
        Self::Float32(v)
    }
}

impl From<f64> for FormatValue {
    fn from(v: f64) -> Self {
        Self::Float64(v)
    }
}

impl From<DateTime<Utc>> for FormatValue {
    fn from(v: DateTime<Utc>) -> Self {
        Self::Time(v)
    }
}

impl FormatValue {
    fn as_f64(&self) -> Option<f64> {
        match *self {
            Self::Int(v) => Some(f64::from(v)),
            Self::Int64(v) => Some(v as f64),
            Self::Float32(v) => Some(f64::from(v)),
            Self::Float64(v) => Some(v),
            Self::Time(_) => None,
        }
    }

    fn as_time(&self) -> Option<DateTime<Utc>> {
        match *self {
            Self::Time(t) => Some(t),
            Self::Int64(nanos) => Some(DateTime::from_timestamp_nanos(nanos)),
            Self::Float64(nanos) if nanos.is_finite() => {
                #[allow(
                    clippy::cast_possible_truncation,
                    reason = "saturating conversion of a finite nanosecond count"
                )]
                let nanos = nanos as i64;
                Some(DateTime::from_timestamp_nanos(nanos))
            }
            _ => None,
        }
    }
}

/// Turns a value into a label.
///
/// A formatter that does not understand the kind of value it is given
/// produces an empty string rather than an error.
#[derive(Clone, Default)]
pub enum ValueFormatter {
    /// Fixed two decimals.
    #[default]
    Float,
    /// Integer, truncating floats.
    Int,
    /// Value times one hundred, two decimals and a percent sign.
    Percent,
    /// Calendar date.
    Time,
    /// Month, day and hour.
    TimeHour,
    /// Month, day, hour and minute.
    TimeMinute,
    /// A printf-style float pattern such as `"%.3f"` or `"%0.0f%%"`.
    FloatWithFormat(Arc<str>),
    /// A strftime pattern.
    TimeWithFormat(Arc<str>),
    /// Any other formatting.
    Custom(Arc<dyn Fn(&FormatValue) -> String>),
}

impl fmt::Debug for ValueFormatter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Float => f.write_str("Float"),
            Self::Int => f.write_str("Int"),
            Self::Percent => f.write_str("Percent"),
            Self::Time => f.write_str("Time"),
            Self::TimeHour => f.write_str("TimeHour"),
            Self::TimeMinute => f.write_str("TimeMinute"),
            Self::FloatWithFormat(p) => f.debug_tuple("FloatWithFormat").field(p).finish(),
            Self::TimeWithFormat(p) => f.debug_tuple("TimeWithFormat").field(p).finish(),
            Self::Custom(_) => f.write_str("Custom(<fn>)"),
        }
    }
}

impl ValueFormatter {
    /// Wraps a closure.
    pub fn custom(f: impl Fn(&FormatValue) -> String + 'static) -> Self {
        Self::Custom(Arc::new(f))
    }

    /// A printf-style float formatter.
    pub fn float_with_format(pattern: impl Into<Arc<str>>) -> Self {
        Self::FloatWithFormat(pattern.into())
    }

    /// A strftime time formatter.
    pub fn time_with_format(pattern: impl Into<Arc<str>>) -> Self {
        Self::TimeWithFormat(pattern.into())
    }

    /// Returns `true` for the default float formatter, which enables nice ticks.
    #[must_use]
    pub fn is_default_float(&self) -> bool {
        matches!(self, Self::Float)
    }

    /// Formats a value.
    pub fn format(&self, value: impl Into<FormatValue>) -> String {
        let value = value.into();
        match self {
            Self::Float => float_with_format(&value, FLOAT_FORMAT),
            Self::Int => match value {
                FormatValue::Int(v) => v.to_string(),
                FormatValue::Int64(v) => v.to_string(),
                FormatValue::Float32(v) => truncated(f64::from(v)),
                FormatValue::Float64(v) => truncated(v),
                FormatValue::Time(_) => String::new(),
            },
            Self::Percent => value
                .as_f64()
                .map(|v| printf_float(PERCENT_FORMAT, v * 100.0))
                .unwrap_or_default(),
            Self::Time => time_with_format(&value, DATE_FORMAT),
            Self::TimeHour => time_with_format(&value, DATE_HOUR_FORMAT),
            Self::TimeMinute => time_with_format(&value, DATE_MINUTE_FORMAT),
            Self::FloatWithFormat(pattern) => float_with_format(&value, pattern),
            Self::TimeWithFormat(pattern) => time_with_format(&value, pattern),
            Self::Custom(f) => f(&value),
        }
    }
}

/// Integer part of `v`, without a sign on zero.
fn truncated(v: f64) -> String {
    let t = v.trunc();
    let t = if t == 0.0 { 0.0 } else { t };
    t.to_string()
}

fn float_with_format(value: &FormatValue, pattern: &str) -> String {
    value
        .as_f64()
        .map(|v| printf_float(pattern, v))
        .unwrap_or_default()
}

fn time_with_format(value: &FormatValue, pattern: &str) -> String {
    let Some(t) = value.as_time() else {
        return String::new();
    };
    let mut out = String::new();
    match write!(out, "{}", t.format(pattern)) {
        Ok(()) => out,
        Err(_) => String::new(),
    }
}

/// Largest width or precision a printf-style pattern may request.
const MAX_FIELD: usize = 64;

/// Expands a printf-style pattern with a single float argument.
///
/// Supports `%%`, and `%[flags][width][.precision]` followed by `f`, `F`
/// or `d` (truncating), with the `-`, `+`, `0` and space flags. Any other
/// conversion is copied through literally.
pub(crate) fn printf_float(pattern: &str, value: f64) -> String {
    let mut out = String::with_capacity(pattern.len() + 8);
    let mut chars = pattern.char_indices().peekable();
    while let Some((start, c)) = chars.next() {
        if c != '%' {
            out.push(c);
            continue;
        }
        if let Some(&(_, '%')) = chars.peek() {
            chars.next();
            out.push('%');
            continue;
        }

        let mut conv = Conversion::default();
        while let Some(&(_, flag)) = chars.peek() {
            match flag {
                '-' => conv.left = true,
                '+' => conv.plus = true,
                '0' => conv.zero = true,
                ' ' => conv.space = true,
                _ => break,
            }
            chars.next();
        }
        conv.width = take_number(&mut chars);
        if let Some(&(_, '.')) = chars.peek() {
            chars.next();
            conv.precision = Some(take_number(&mut chars).unwrap_or(0));
        }
        match chars.next() {
            Some((_, 'f' | 'F')) => conv.write(&mut out, value, conv.precision.unwrap_or(6)),
            Some((_, 'd')) => conv.write(&mut out, value.trunc(), 0),
            Some((end, other)) => out.push_str(&pattern[start..end + other.len_utf8()]),
            None => out.push_str(&pattern[start..]),
        }
    }
    out
}

/// Reads a width or precision, capped at [`MAX_FIELD`].
fn take_number(chars: &mut core::iter::Peekable<core::str::CharIndices<'_>>) -> Option<usize> {
    let mut n: Option<usize> = None;
    while let Some(&(_, d)) = chars.peek() {
        let Some(digit) = d.to_digit(10) else {
            break;
        };
        let next = n
            .unwrap_or(0)
            .saturating_mul(10)
            .saturating_add(digit as usize);
        n = Some(next.min(MAX_FIELD));
        chars.next();
    }
    n
}

#[derive(Default)]
struct Conversion {
    left: bool,
    plus: bool,
    zero: bool,
    space: bool,
    width: Option<usize>,
    precision: Option<usize>,
}

impl Conversion {
    fn write(&self, out: &mut String, value: f64, precision: usize) {
        let body = format!("{:.*}", precision, value.abs());
        let sign = if value.is_sign_negative() && body.bytes().any(|b| b.is_ascii_digit() && b != b'0')
        {
            "-"
        } else if self.plus {
            "+"
        } else if self.space {
            " "
        } else {
            ""
        };
        let len = sign.len() + body.len();
        let pad = self.width.map_or(0, |w| w.saturating_sub(len));
        if self.left {
            out.push_str(sign);
            out.push_str(&body);
            out.extend(core::iter::repeat_n(' ', pad));
        } else if self.zero {
            out.push_str(sign);
            out.extend(core::iter::repeat_n('0', pad));
            out.push_str(&body);
        } else {
            out.extend(core::iter::repeat_n(' ', pad));
            out.push_str(sign);
            out.push_str(&body);
        }
    }
}

#[cfg(test)]
mod tests {
    use chrono::TimeZone;

    use super::*;

    #[test]
    fn float_formatter_accepts_every_numeric_kind() {
        let vf = ValueFormatter::Float;
        assert_eq!(vf.format(1234.0_f64), "1234.00");
        assert_eq!(vf.format(1234.0_f32), "1234.00");
        assert_eq!(vf.format(1234_i32), "1234.00");
        assert_eq!(vf.format(1234_i64), "1234.00");
    }

    #[test]
    fn float_with_format() {
        let vf = ValueFormatter::float_with_format("%.3f");
        assert_eq!(vf.format(123.456), "123.456");
        assert_eq!(vf.format(123_i32), "123.000");
        assert_eq!(printf_float("%0.0f%%", 40.0), "40%");
        assert_eq!(printf_float("%06.2f", -1.5), "-01.50");
        assert_eq!(printf_float("%-6.1f|", 2.24), "2.2   |");
        assert_eq!(printf_float("%+.1f", 2.0), "+2.0");
        assert_eq!(printf_float("%5d", 42.9), "   42");
        assert_eq!(printf_float("x=%q", 1.0), "x=%q");
    }

    #[test]
    fn negative_zero_prints_without_sign() {
        assert_eq!(printf_float("%.2f", -0.0001), "0.00");
    }

    #[test]
    fn percent_and_int() {
        assert_eq!(ValueFormatter::Percent.format(0.1234), "12.34%");
        assert_eq!(ValueFormatter::Int.format(12.9), "12");
        assert_eq!(ValueFormatter::Int.format(-7_i64), "-7");
        assert_eq!(ValueFormatter::Int.format(-0.5), "0");
        assert_eq!(ValueFormatter::Int.format(-0.5_f32), "0");
        assert_eq!(ValueFormatter::Int.format(-2.5), "-2");
    }

    #[test]
    fn oversized_fields_are_capped() {
        let wide = printf_float("%99999999999999999999999d", 1.0);
        assert_eq!(wide.len(), MAX_FIELD);
        assert!(wide.ends_with('1'));
        let precise = printf_float("%.99999999999999999999999f", 1.0);
        assert_eq!(precise.len(), 2 + MAX_FIELD);
    }

    #[test]
    fn time_formatter_reads_nanoseconds() {
        let t = Utc.with_ymd_and_hms(2024, 3, 9, 15, 4, 0).single();
        let Some(t) = t else {
            panic!("valid timestamp");
        };
        let nanos = t.timestamp_nanos_opt().unwrap_or_default();
        let as_float = nanos as f64;

        let vf = ValueFormatter::Time;
        assert_eq!(vf.format(t), "2024-03-09");
        assert_eq!(vf.format(t), vf.format(nanos));
        assert_eq!(vf.format(t), vf.format(as_float));
        assert_eq!(ValueFormatter::TimeHour.format(t), "03-09 3PM");
        assert_eq!(ValueFormatter::TimeMinute.format(t), "03-09 3:04PM");
    }

    #[test]
    fn mismatched_kinds_format_as_empty() {
        let t = DateTime::from_timestamp_nanos(0);
        assert_eq!(ValueFormatter::Float.format(t), "");
        assert_eq!(ValueFormatter::Int.format(t), "");
        assert_eq!(ValueFormatter::Percent.format(t), "");
        assert_eq!(ValueFormatter::Time.format(3_i32), "");
        assert_eq!(ValueFormatter::Time.format(3.0_f32), "");
    }

    #[test]
    fn custom_and_default() {
        let vf = ValueFormatter::custom(|v| format!("<{v:?}>"));
        assert_eq!(vf.format(1_i32), "<Int(1)>");
        assert!(ValueFormatter::default().is_default_float());
        assert!(!ValueFormatter::float_with_format(FLOAT_FORMAT).is_default_float());
    }
}
