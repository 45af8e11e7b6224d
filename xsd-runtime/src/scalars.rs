//! Coercers from lexical attribute/text values to the Rust scalar types
//! generated `Base`-kind types alias (§3.2, §4.3.3). Grounded on
//! `original_source/src/XmlParser.cpp`'s `toType<T>` specializations,
//! which share this exact one-message-per-type shape.

use crate::error::{ParseError, Result};
use crate::position::Position;

pub fn parse_enum_value(pos: Position, values: &[&str], value: &str) -> Result<u32> {
    values
        .iter()
        .position(|candidate| *candidate == value)
        .map(|index| index as u32)
        .ok_or_else(|| ParseError::Verification {
            line: pos.line,
            message: format!("Unknown attribute value '{value}'"),
        })
}

macro_rules! int_coercer {
    ($name:ident, $ty:ty, $message:literal) => {
        pub fn $name(pos: Position, value: &str) -> Result<$ty> {
            value.parse::<$ty>().map_err(|_| ParseError::Verification {
                line: pos.line,
                message: $message.to_string(),
            })
        }
    };
}

int_coercer!(parse_u64, u64, "Expected unsigned 64-bit integer value");
int_coercer!(parse_i64, i64, "Expected 64-bit integer value");
int_coercer!(parse_u32, u32, "Expected unsigned 32-bit integer value");
int_coercer!(parse_i32, i32, "Expected 32-bit integer value");
int_coercer!(parse_u16, u16, "Expected unsigned 16-bit integer value");
int_coercer!(parse_i16, i16, "Expected 16-bit integer value");
int_coercer!(parse_f64, f64, "Expected double precision floating point value");
int_coercer!(parse_f32, f32, "Expected single precision floating point value");

/// Accepts both `"true"`/`"false"` and the `"1"`/`"0"` spelling XSD's
/// `xs:boolean` lexical space also allows.
pub fn parse_bool(pos: Position, value: &str) -> Result<bool> {
    match value {
        "true" | "1" => Ok(true),
        "false" | "0" => Ok(false),
        _ => Err(ParseError::Verification {
            line: pos.line,
            message: "Expected boolean value".to_string(),
        }),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn pos() -> Position {
        Position { line: 1 }
    }

    #[test]
    fn enum_value_found() {
        assert_eq!(parse_enum_value(pos(), &["a", "b", "c"], "b").unwrap(), 1);
    }

    #[test]
    fn enum_value_missing() {
        let err = parse_enum_value(pos(), &["a", "b"], "z").unwrap_err();
        assert_eq!(err.to_string(), "Error at line '1': Unknown attribute value 'z'");
    }

    #[test]
    fn bool_accepts_numeric_spelling() {
        assert!(parse_bool(pos(), "1").unwrap());
        assert!(!parse_bool(pos(), "0").unwrap());
    }

    #[test]
    fn bool_rejects_garbage() {
        assert!(parse_bool(pos(), "yes").is_err());
    }

    #[test]
    fn u64_rejects_negative() {
        assert!(parse_u64(pos(), "-1").is_err());
    }
}
