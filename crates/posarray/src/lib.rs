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

//! Positional array codec for exchange wire payloads.
//!
//! Many venue APIs send records as index-based arrays rather than keyed objects, e.g.
//! `[1622.50, "BTCUSD", null, 3]` instead of `{"price": 1622.50, ...}`. The `posarray` crate
//! maps such arrays to and from typed records:
//!
//! - `map`: per-record [`PositionMap`] binding fields to array indices, built once through
//!   [`PositionMapBuilder`].
//! - `record`: the [`PositionalRecord`] trait and the process-wide position map cache.
//! - `decode` / `encode`: the array-to-record and record-to-array algorithms, including
//!   nested records, lists of records and explicit null gap filling.
//! - `coerce`: the [`WireValue`] rules converting loosely-typed wire values.
//! - `codecs`: the [`FieldCodec`] trait for per-field overrides, plus built-in codecs.
//! - `serde_array`: serde glue for positional records embedded in keyed payloads.
//!
//! Transport, authentication and venue-specific logic live with the callers; this crate only
//! transforms values in memory.
//!
//! # Example
//!
//! ```
//! use posarray::{PositionMapBuilder, PositionalRecord};
//! use rust_decimal::Decimal;
//! use serde_json::json;
//!
//! #[derive(Debug, Default, PartialEq)]
//! struct Trade {
//!     id: i64,
//!     price: Decimal,
//!     amount: Decimal,
//! }
//!
//! impl PositionalRecord for Trade {
//!     fn describe_positions(map: PositionMapBuilder<Self>) -> PositionMapBuilder<Self> {
//!         map.field(0, "id", |r| &r.id, |r| &mut r.id)
//!             .field(2, "price", |r| &r.price, |r| &mut r.price)
//!             .field(3, "amount", |r| &r.amount, |r| &mut r.amount)
//!     }
//! }
//!
//! let trade: Trade = posarray::decode(&json!([401597395, 1574694475039_i64, "7245.2", 0.1])).unwrap();
//! assert_eq!(trade.id, 401597395);
//!
//! let encoded = posarray::encode(&trade).unwrap();
//! assert_eq!(encoded, json!([401597395, null, "7245.2", "0.1"]));
//! ```
//!
//! # Feature flags
//!
//! - `stubs`: Enables record stubs and fixtures for testing.

#![warn(rustc::all)]
#![deny(unsafe_code)]
#![deny(nonstandard_style)]
#![deny(missing_debug_implementations)]
#![deny(clippy::missing_errors_doc)]
#![deny(clippy::missing_panics_doc)]
#![deny(rustdoc::broken_intra_doc_links)]

pub mod codec;
pub mod codecs;
pub mod coerce;
pub mod config;
pub mod decode;
pub mod encode;
pub mod error;
pub mod map;
pub mod record;
pub mod serde_array;

#[cfg(any(test, feature = "stubs"))]
pub mod stubs;

pub use crate::{
    codec::{ArrayCodec, decode, decode_list, encode, from_str, to_string},
    codecs::FieldCodec,
    coerce::WireValue,
    config::ArrayCodecConfig,
    error::{ArrayCodecError, ArrayCodecResult, CoercionError},
    map::{FieldDescriptor, FieldKind, PositionMap, PositionMapBuilder},
    record::{PositionalRecord, position_map},
    serde_array::Positional,
};
