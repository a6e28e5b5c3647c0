// -------------------------------------------------------------------------------------------------
//  Copyright (C) 2015-2026 Nautech Systems Pty Ltd. All rights reserved.
//  https://nautechsystems.io
//
//  Licensed under the GNU Lesser General Public License Version 3.0 (the "License");
//  You may not use this file except in compliance with the License.
//  You may obtain a copy of the License at https://www.gnu.org/licenses/lgpl-3.0.en.html
//
//  Unless required by applicable law or agreed to in writing, software
//  distributed under the License is distributed on an "AS IS" BASIS,
//  WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
//  See the License for the specific language governing permissions and
//  limitations under the License.
// -------------------------------------------------------------------------------------------------

//! Type-coercion rules bridging loosely-typed wire values to strongly-typed fields.
//!
//! Each primitive category has a small closed set of conversions. The exact wire
//! representation binds directly; anything else goes through the category's explicit
//! conversion rule, which either produces a value or fails.
//!
//! Arbitrary-precision decimals carry one lenient path: wire text in exponent notation is
//! parsed with an invariant scientific parse, and a failure there leaves the field unset
//! instead of failing the decode. Exchanges are inconsistent in how they format prices.

use std::str::FromStr;

use rust_decimal::Decimal;
use serde_json::{Number, Value};
use ustr::Ustr;

use crate::error::{CoercionError, value_kind};

/// Outcome of a coercion: `Some` binds the value, `None` leaves the field untouched.
pub type Coerced<T> = Result<Option<T>, CoercionError>;

/// The type-level default codec for a field value.
///
/// Implement this for a custom type to make it usable with
/// [`PositionMapBuilder::field`](crate::map::PositionMapBuilder::field); a
/// [`FieldCodec`](crate::codecs::FieldCodec) attached to an individual field takes precedence.
pub trait WireValue: Sized {
    /// Name reported in coercion errors.
    const TYPE_NAME: &'static str;

    /// Converts a wire value into `Self`.
    ///
    /// Returns `Ok(None)` when the value should be skipped and the field left unset.
    ///
    /// # Errors
    ///
    /// Returns an error if no conversion rule produces `Self` from `value`.
    fn from_wire(value: &Value) -> Coerced<Self>;

    /// Converts `self` into its wire representation.
    fn to_wire(&self) -> Value;
}

fn mismatch(expected: &'static str, value: &Value) -> CoercionError {
    CoercionError::TypeMismatch {
        expected,
        found: value_kind(value),
    }
}

fn parse_error(expected: &'static str, value: &str, reason: impl ToString) -> CoercionError {
    CoercionError::Parse {
        expected,
        value: value.to_string(),
        reason: reason.to_string(),
    }
}

/// Widens an integral wire value to `i128` before narrowing to the declared width.
fn integral(value: &Value, expected: &'static str) -> Result<i128, CoercionError> {
    match value {
        Value::Number(n) => {
            if let Some(i) = n.as_i64() {
                Ok(i128::from(i))
            } else if let Some(u) = n.as_u64() {
                Ok(i128::from(u))
            } else {
                let f = n.as_f64().unwrap_or(f64::NAN);
                if f.is_finite() && f.fract() == 0.0 && f.abs() < 1e38 {
                    Ok(f as i128)
                } else {
                    Err(parse_error(expected, &n.to_string(), "not an integral number"))
                }
            }
        }
        Value::String(s) => s
            .trim()
            .parse::<i128>()
            .map_err(|e| parse_error(expected, s, e)),
        Value::Bool(b) => Ok(i128::from(*b)),
        Value::Null => Err(CoercionError::UnexpectedNull { expected }),
        Value::Array(_) | Value::Object(_) => Err(mismatch(expected, value)),
    }
}

macro_rules! impl_wire_integer {
    ($($ty:ty),* $(,)?) => {
        $(
            impl WireValue for $ty {
                const TYPE_NAME: &'static str = stringify!($ty);

                fn from_wire(value: &Value) -> Coerced<Self> {
                    let wide = integral(value, Self::TYPE_NAME)?;
                    <$ty>::try_from(wide).map(Some).map_err(|_| CoercionError::OutOfRange {
                        expected: Self::TYPE_NAME,
                        value: wide.to_string(),
                    })
                }

                fn to_wire(&self) -> Value {
                    Value::from(*self)
                }
            }
        )*
    };
}

impl_wire_integer!(i8, i16, i32, i64, u8, u16, u32, u64, usize);

fn float(value: &Value, expected: &'static str) -> Result<f64, CoercionError> {
    match value {
        Value::Number(n) => n
            .as_f64()
            .ok_or_else(|| parse_error(expected, &n.to_string(), "not representable as f64")),
        Value::String(s) => s.trim().parse::<f64>().map_err(|e| parse_error(expected, s, e)),
        Value::Bool(b) => Ok(if *b { 1.0 } else { 0.0 }),
        Value::Null => Err(CoercionError::UnexpectedNull { expected }),
        Value::Array(_) | Value::Object(_) => Err(mismatch(expected, value)),
    }
}

impl WireValue for f64 {
    const TYPE_NAME: &'static str = "f64";

    fn from_wire(value: &Value) -> Coerced<Self> {
        float(value, Self::TYPE_NAME).map(Some)
    }

    fn to_wire(&self) -> Value {
        Number::from_f64(*self).map_or(Value::Null, Value::Number)
    }
}

impl WireValue for f32 {
    const TYPE_NAME: &'static str = "f32";

    fn from_wire(value: &Value) -> Coerced<Self> {
        let wide = float(value, Self::TYPE_NAME)?;
        if wide.is_finite() && wide.abs() > f64::from(f32::MAX) {
            return Err(CoercionError::OutOfRange {
                expected: Self::TYPE_NAME,
                value: wide.to_string(),
            });
        }
        Ok(Some(wide as f32))
    }

    fn to_wire(&self) -> Value {
        Number::from_f64(f64::from(*self)).map_or(Value::Null, Value::Number)
    }
}

/// Returns true if the text contains an `e` or `E` anywhere.
///
/// This is a character check, not a grammar check: any text containing the letter (e.g.
/// `"free"`) is routed to the lenient scientific parse, while other malformed text fails.
#[must_use]
pub fn has_exponent(text: &str) -> bool {
    text.contains(['e', 'E'])
}

/// Parses decimal text, taking the lenient scientific path for exponent notation.
///
/// # Errors
///
/// Returns an error if plain (non-exponent) text is not a valid decimal.
pub fn parse_decimal_text(text: &str) -> Coerced<Decimal> {
    let text = text.trim();
    if has_exponent(text) {
        return Ok(Decimal::from_scientific(text).ok());
    }
    Decimal::from_str(text)
        .map(Some)
        .map_err(|e| parse_error(Decimal::TYPE_NAME, text, e))
}

impl WireValue for Decimal {
    const TYPE_NAME: &'static str = "Decimal";

    fn from_wire(value: &Value) -> Coerced<Self> {
        match value {
            Value::Number(n) => parse_decimal_text(&n.to_string()),
            Value::String(s) => parse_decimal_text(s),
            Value::Bool(b) => Ok(Some(if *b { Self::ONE } else { Self::ZERO })),
            Value::Null => Err(CoercionError::UnexpectedNull {
                expected: Self::TYPE_NAME,
            }),
            Value::Array(_) | Value::Object(_) => Err(mismatch(Self::TYPE_NAME, value)),
        }
    }

    // Text keeps the full precision, matching rust_decimal's own serde format
    fn to_wire(&self) -> Value {
        Value::String(self.to_string())
    }
}

impl WireValue for bool {
    const TYPE_NAME: &'static str = "bool";

    fn from_wire(value: &Value) -> Coerced<Self> {
        match value {
            Value::Bool(b) => Ok(Some(*b)),
            Value::Number(n) => match (n.as_i64(), n.as_f64()) {
                (Some(i), _) => Ok(Some(i != 0)),
                (None, Some(f)) => Ok(Some(f != 0.0)),
                (None, None) => Err(parse_error(Self::TYPE_NAME, &n.to_string(), "not a number")),
            },
            Value::String(s) => {
                let trimmed = s.trim();
                if trimmed.eq_ignore_ascii_case("true") {
                    Ok(Some(true))
                } else if trimmed.eq_ignore_ascii_case("false") {
                    Ok(Some(false))
                } else {
                    Err(parse_error(Self::TYPE_NAME, s, "expected 'true' or 'false'"))
                }
            }
            Value::Null => Err(CoercionError::UnexpectedNull {
                expected: Self::TYPE_NAME,
            }),
            Value::Array(_) | Value::Object(_) => Err(mismatch(Self::TYPE_NAME, value)),
        }
    }

    fn to_wire(&self) -> Value {
        Value::Bool(*self)
    }
}

fn text(value: &Value, expected: &'static str) -> Result<String, CoercionError> {
    match value {
        Value::String(s) => Ok(s.clone()),
        Value::Number(n) => Ok(n.to_string()),
        Value::Bool(b) => Ok(b.to_string()),
        Value::Null => Err(CoercionError::UnexpectedNull { expected }),
        Value::Array(_) | Value::Object(_) => Err(mismatch(expected, value)),
    }
}

impl WireValue for String {
    const TYPE_NAME: &'static str = "String";

    fn from_wire(value: &Value) -> Coerced<Self> {
        text(value, Self::TYPE_NAME).map(Some)
    }

    fn to_wire(&self) -> Value {
        Value::String(self.clone())
    }
}

impl WireValue for Ustr {
    const TYPE_NAME: &'static str = "Ustr";

    fn from_wire(value: &Value) -> Coerced<Self> {
        match value {
            Value::String(s) => Ok(Some(Self::from(s.as_str()))),
            other => text(other, Self::TYPE_NAME).map(|s| Some(Self::from(s.as_str()))),
        }
    }

    fn to_wire(&self) -> Value {
        Value::String(self.as_str().to_string())
    }
}

/// Raw passthrough for slots whose shape varies per message.
impl WireValue for Value {
    const TYPE_NAME: &'static str = "Value";

    fn from_wire(value: &Value) -> Coerced<Self> {
        Ok(Some(value.clone()))
    }

    fn to_wire(&self) -> Value {
        self.clone()
    }
}

impl<T: WireValue> WireValue for Option<T> {
    const TYPE_NAME: &'static str = T::TYPE_NAME;

    fn from_wire(value: &Value) -> Coerced<Self> {
        if value.is_null() {
            return Ok(Some(None));
        }
        T::from_wire(value).map(|inner| inner.map(Some))
    }

    fn to_wire(&self) -> Value {
        self.as_ref().map_or(Value::Null, WireValue::to_wire)
    }
}

/// Lists of primitives, e.g. `["BTC", "ETH"]`.
///
/// A lenient skip of any element leaves the whole field unset.
impl<T: WireValue> WireValue for Vec<T> {
    const TYPE_NAME: &'static str = "list";

    fn from_wire(value: &Value) -> Coerced<Self> {
        match value {
            Value::Array(items) => {
                let mut out = Self::with_capacity(items.len());
                for item in items {
                    match T::from_wire(item)? {
                        Some(v) => out.push(v),
                        None => return Ok(None),
                    }
                }
                Ok(Some(out))
            }
            Value::Null => Err(CoercionError::UnexpectedNull {
                expected: Self::TYPE_NAME,
            }),
            other => Err(mismatch(Self::TYPE_NAME, other)),
        }
    }

    fn to_wire(&self) -> Value {
        Value::Array(self.iter().map(WireValue::to_wire).collect())
    }
}
