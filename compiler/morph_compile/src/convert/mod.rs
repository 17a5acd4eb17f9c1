//! Built-in conversions between primitive kinds.

use morph_types::PrimitiveKind;
use morph_value::Value;

use crate::ConversionError;

/// Whether a built-in conversion exists from `from` to `to`.
///
/// Conversions that can fail on particular values (parsing, float to int,
/// int to char) still count as convertible; they fail at run time.
pub fn can_convert(from: PrimitiveKind, to: PrimitiveKind) -> bool {
    use PrimitiveKind::{Bool, Char, Float, Int, Str};
    from == to
        || matches!(
            (from, to),
            (_, Str) | (Str, _) | (Int, Float | Bool | Char) | (Float | Bool | Char, Int)
        )
}

/// Convert a primitive value to `to`. Null converts to null.
pub fn convert_primitive(value: &Value, to: PrimitiveKind) -> Result<Value, ConversionError> {
    let value = value.unboxed();
    let converted = match (&value, to) {
        (Value::Null, _) => Some(Value::Null),

        (Value::Bool(_), PrimitiveKind::Bool)
        | (Value::Int(_), PrimitiveKind::Int)
        | (Value::Float(_), PrimitiveKind::Float)
        | (Value::Char(_), PrimitiveKind::Char)
        | (Value::Str(_), PrimitiveKind::Str) => Some(value.clone()),

        (Value::Bool(b), PrimitiveKind::Str) => Some(Value::str(&b.to_string())),
        (Value::Int(n), PrimitiveKind::Str) => Some(Value::str(&n.to_string())),
        (Value::Float(x), PrimitiveKind::Str) => Some(Value::str(&x.to_string())),
        (Value::Char(c), PrimitiveKind::Str) => Some(Value::str(c.encode_utf8(&mut [0; 4]))),

        (Value::Int(n), PrimitiveKind::Float) => Some(Value::Float(int_to_float(*n))),
        (Value::Float(x), PrimitiveKind::Int) => float_to_int(*x).map(Value::Int),
        (Value::Int(n), PrimitiveKind::Bool) => Some(Value::Bool(*n != 0)),
        (Value::Bool(b), PrimitiveKind::Int) => Some(Value::Int(i64::from(*b))),
        (Value::Char(c), PrimitiveKind::Int) => Some(Value::Int(i64::from(u32::from(*c)))),
        (Value::Int(n), PrimitiveKind::Char) => u32::try_from(*n)
            .ok()
            .and_then(char::from_u32)
            .map(Value::Char),

        (Value::Str(s), PrimitiveKind::Int) => s.trim().parse().ok().map(Value::Int),
        (Value::Str(s), PrimitiveKind::Float) => s.trim().parse().ok().map(Value::Float),
        (Value::Str(s), PrimitiveKind::Bool) => parse_bool(s).map(Value::Bool),
        (Value::Str(s), PrimitiveKind::Char) => {
            let mut chars = s.chars();
            match (chars.next(), chars.next()) {
                (Some(c), None) => Some(Value::Char(c)),
                _ => None,
            }
        }

        _ => None,
    };

    converted.ok_or_else(|| ConversionError::Primitive {
        value: format!("{value:?}"),
        to: to.name(),
    })
}

fn parse_bool(s: &str) -> Option<bool> {
    let s = s.trim();
    if s.eq_ignore_ascii_case("true") {
        Some(true)
    } else if s.eq_ignore_ascii_case("false") {
        Some(false)
    } else {
        None
    }
}

#[expect(clippy::cast_precision_loss, reason = "large ints round to the nearest float")]
fn int_to_float(n: i64) -> f64 {
    n as f64
}

/// Truncating conversion. Non-finite and out-of-range values have no
/// integer form.
#[expect(clippy::cast_possible_truncation, reason = "range checked before the cast")]
fn float_to_int(x: f64) -> Option<i64> {
    const LIMIT: f64 = 9_223_372_036_854_775_808.0; // 2^63
    let truncated = x.trunc();
    if truncated.is_finite() && (-LIMIT..LIMIT).contains(&truncated) {
        Some(truncated as i64)
    } else {
        None
    }
}
