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

//! Field-level codecs overriding the type-level coercion rules for a single field.

use std::{fmt::Display, marker::PhantomData, str::FromStr};

use anyhow::Context;
use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde_json::{Number, Value};

use crate::coerce::{WireValue, has_exponent};

/// A custom transform attached to one field of a position map.
///
/// Registered through [`PositionMapBuilder::field_with`](crate::map::PositionMapBuilder::field_with),
/// a field codec replaces the default [`WireValue`] conversion for that field in both
/// directions.
pub trait FieldCodec<F>: Send + Sync + 'static {
    /// Converts a wire value into the field value.
    ///
    /// # Errors
    ///
    /// Returns an error if `value` cannot be represented as `F`.
    fn decode(&self, value: &Value) -> anyhow::Result<F>;

    /// Converts the field value into its wire representation.
    ///
    /// # Errors
    ///
    /// Returns an error if `value` has no wire representation.
    fn encode(&self, value: &F) -> anyhow::Result<Value>;
}

/// Adapts a codec for `F` to an optional field: null on the wire is `None`.
#[derive(Clone, Copy, Debug, Default)]
pub struct Nullable<C>(pub C);

impl<F, C: FieldCodec<F>> FieldCodec<Option<F>> for Nullable<C> {
    fn decode(&self, value: &Value) -> anyhow::Result<Option<F>> {
        if value.is_null() {
            return Ok(None);
        }
        self.0.decode(value).map(Some)
    }

    fn encode(&self, value: &Option<F>) -> anyhow::Result<Value> {
        match value {
            Some(inner) => self.0.encode(inner),
            None => Ok(Value::Null),
        }
    }
}

fn epoch_number(value: &Value) -> anyhow::Result<f64> {
    let number = match value {
        Value::Number(n) => n.as_f64().context("epoch number not representable as f64")?,
        Value::String(s) => s
            .trim()
            .parse::<f64>()
            .with_context(|| format!("invalid epoch text '{s}'"))?,
        other => anyhow::bail!("expected epoch number, was {other}"),
    };
    anyhow::ensure!(number.is_finite(), "non-finite epoch value {value}");
    Ok(number)
}

/// Epoch milliseconds on the wire, `DateTime<Utc>` in the record.
#[derive(Clone, Copy, Debug, Default)]
pub struct UnixMillisCodec;

impl FieldCodec<DateTime<Utc>> for UnixMillisCodec {
    fn decode(&self, value: &Value) -> anyhow::Result<DateTime<Utc>> {
        let millis = match value.as_i64() {
            Some(ms) => ms,
            None => epoch_number(value)?.round() as i64,
        };
        DateTime::from_timestamp_millis(millis)
            .with_context(|| format!("timestamp {millis}ms out of range"))
    }

    fn encode(&self, value: &DateTime<Utc>) -> anyhow::Result<Value> {
        Ok(Value::from(value.timestamp_millis()))
    }
}

/// Epoch seconds on the wire (integer or fractional), `DateTime<Utc>` in the record.
#[derive(Clone, Copy, Debug, Default)]
pub struct UnixSecondsCodec;

impl FieldCodec<DateTime<Utc>> for UnixSecondsCodec {
    fn decode(&self, value: &Value) -> anyhow::Result<DateTime<Utc>> {
        if let Some(secs) = value.as_i64() {
            return DateTime::from_timestamp(secs, 0)
                .with_context(|| format!("timestamp {secs}s out of range"));
        }
        let secs = epoch_number(value)?;
        let micros = (secs * 1_000_000.0).round() as i64;
        DateTime::from_timestamp_micros(micros)
            .with_context(|| format!("timestamp {secs}s out of range"))
    }

    fn encode(&self, value: &DateTime<Utc>) -> anyhow::Result<Value> {
        if value.timestamp_subsec_nanos() == 0 {
            return Ok(Value::from(value.timestamp()));
        }
        let secs = value.timestamp_micros() as f64 / 1_000_000.0;
        Number::from_f64(secs)
            .map(Value::Number)
            .context("timestamp not representable as a JSON number")
    }
}

/// Enum-like wire strings mapped through `FromStr` and `AsRef<str>`.
///
/// Pairs with `strum::EnumString` and `strum::AsRefStr` derives.
#[derive(Debug)]
pub struct StrEnumCodec<E>(PhantomData<fn() -> E>);

impl<E> StrEnumCodec<E> {
    #[must_use]
    pub const fn new() -> Self {
        Self(PhantomData)
    }
}

impl<E> Default for StrEnumCodec<E> {
    fn default() -> Self {
        Self::new()
    }
}

impl<E> FieldCodec<E> for StrEnumCodec<E>
where
    E: FromStr + AsRef<str> + 'static,
    <E as FromStr>::Err: Display,
{
    fn decode(&self, value: &Value) -> anyhow::Result<E> {
        let text = value
            .as_str()
            .with_context(|| format!("expected enum string, was {value}"))?;
        E::from_str(text).map_err(|e| anyhow::anyhow!("invalid enum value '{text}': {e}"))
    }

    fn encode(&self, value: &E) -> anyhow::Result<Value> {
        Ok(Value::String(value.as_ref().to_string()))
    }
}

/// Flags sent as `0`/`1` integers.
#[derive(Clone, Copy, Debug, Default)]
pub struct BoolIntCodec;

impl FieldCodec<bool> for BoolIntCodec {
    fn decode(&self, value: &Value) -> anyhow::Result<bool> {
        match value {
            Value::Bool(b) => Ok(*b),
            Value::Number(n) => match n.as_i64() {
                Some(0) => Ok(false),
                Some(1) => Ok(true),
                _ => anyhow::bail!("expected 0 or 1, was {n}"),
            },
            Value::String(s) => match s.trim() {
                "0" => Ok(false),
                "1" => Ok(true),
                _ => anyhow::bail!("expected '0' or '1', was '{s}'"),
            },
            other => anyhow::bail!("expected 0 or 1, was {other}"),
        }
    }

    fn encode(&self, value: &bool) -> anyhow::Result<Value> {
        Ok(Value::from(u8::from(*value)))
    }
}

/// Emits a `Decimal` as a JSON number for venues which reject numeric text.
///
/// Decoding is strict: a malformed exponent is an error here, not a lenient skip.
#[derive(Clone, Copy, Debug, Default)]
pub struct DecimalNumberCodec;

impl FieldCodec<Decimal> for DecimalNumberCodec {
    fn decode(&self, value: &Value) -> anyhow::Result<Decimal> {
        let text = match value {
            Value::Number(n) => n.to_string(),
            Value::String(s) => s.trim().to_string(),
            other => anyhow::bail!("expected decimal, was {other}"),
        };
        let parsed = if has_exponent(&text) {
            Decimal::from_scientific(&text)
        } else {
            Decimal::from_str(&text)
        };
        parsed.with_context(|| format!("invalid decimal '{text}'"))
    }

    fn encode(&self, value: &Decimal) -> anyhow::Result<Value> {
        let text = value.normalize().to_string();
        serde_json::from_str::<Number>(&text)
            .map(Value::Number)
            .with_context(|| format!("decimal {text} not representable as a JSON number"))
    }
}

/// Delegates to the type-level [`WireValue`] rules; a lenient skip becomes an error.
///
/// Useful to force strict decoding of a single field.
#[derive(Debug)]
pub struct StrictCodec<F>(PhantomData<fn() -> F>);

impl<F> StrictCodec<F> {
    #[must_use]
    pub const fn new() -> Self {
        Self(PhantomData)
    }
}

impl<F> Default for StrictCodec<F> {
    fn default() -> Self {
        Self::new()
    }
}

impl<F: WireValue + 'static> FieldCodec<F> for StrictCodec<F> {
    fn decode(&self, value: &Value) -> anyhow::Result<F> {
        F::from_wire(value)?.with_context(|| format!("cannot convert {value} into {}", F::TYPE_NAME))
    }

    fn encode(&self, value: &F) -> anyhow::Result<Value> {
        Ok(value.to_wire())
    }
}
