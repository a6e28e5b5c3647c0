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

//! The configured codec facade and default-configured free functions.

use serde_json::Value;

use crate::{
    config::ArrayCodecConfig,
    decode::{DecodeState, decode_list as decode_list_value, decode_record},
    encode::encode_record,
    error::{ArrayCodecError, ArrayCodecResult},
    record::PositionalRecord,
};

/// Positional array codec with an explicit configuration.
///
/// The codec holds no state besides its configuration; position maps are shared
/// process-wide, so one instance may be used from any number of threads.
#[derive(Clone, Debug, Default)]
pub struct ArrayCodec {
    config: ArrayCodecConfig,
}

impl ArrayCodec {
    #[must_use]
    pub const fn new(config: ArrayCodecConfig) -> Self {
        Self { config }
    }

    #[must_use]
    pub const fn config(&self) -> &ArrayCodecConfig {
        &self.config
    }

    /// Decodes a record from a positional array.
    ///
    /// # Errors
    ///
    /// Returns an error if the record's position map is invalid, `value` is not an array,
    /// or a bound field cannot be converted.
    pub fn decode<T: PositionalRecord>(&self, value: &Value) -> ArrayCodecResult<T> {
        decode_record(value, DecodeState::new(&self.config))
    }

    /// Decodes a list of records from an array of arrays (or a single flat array).
    ///
    /// # Errors
    ///
    /// Returns an error if `value` is not an array or any record fails to decode.
    pub fn decode_list<T: PositionalRecord>(&self, value: &Value) -> ArrayCodecResult<Vec<T>> {
        decode_list_value(value, DecodeState::new(&self.config))
    }

    /// Parses JSON text and decodes a record from it.
    ///
    /// # Errors
    ///
    /// Returns an error if `payload` is not valid JSON or the record fails to decode.
    pub fn decode_str<T: PositionalRecord>(&self, payload: &str) -> ArrayCodecResult<T> {
        let value: Value =
            serde_json::from_str(payload).map_err(|e| ArrayCodecError::Json(e.to_string()))?;
        self.decode(&value)
    }

    /// Encodes a record into a positional array.
    ///
    /// # Errors
    ///
    /// Returns an error if the record's position map is invalid or a field codec fails.
    pub fn encode<T: PositionalRecord>(&self, record: &T) -> ArrayCodecResult<Value> {
        encode_record(record)
    }

    /// Encodes a record into compact JSON text.
    ///
    /// # Errors
    ///
    /// Returns an error if the record fails to encode.
    pub fn encode_to_string<T: PositionalRecord>(&self, record: &T) -> ArrayCodecResult<String> {
        Ok(self.encode(record)?.to_string())
    }
}

/// Decodes a record from a positional array with the default configuration.
///
/// # Errors
///
/// Returns an error if the record fails to decode, see [`ArrayCodec::decode`].
pub fn decode<T: PositionalRecord>(value: &Value) -> ArrayCodecResult<T> {
    ArrayCodec::default().decode(value)
}

/// Decodes a list of records with the default configuration.
///
/// # Errors
///
/// Returns an error if any record fails to decode, see [`ArrayCodec::decode_list`].
pub fn decode_list<T: PositionalRecord>(value: &Value) -> ArrayCodecResult<Vec<T>> {
    ArrayCodec::default().decode_list(value)
}

/// Parses JSON text and decodes a record with the default configuration.
///
/// # Errors
///
/// Returns an error if `payload` is invalid JSON or fails to decode.
pub fn from_str<T: PositionalRecord>(payload: &str) -> ArrayCodecResult<T> {
    ArrayCodec::default().decode_str(payload)
}

/// Encodes a record into a positional array.
///
/// # Errors
///
/// Returns an error if the record fails to encode, see [`ArrayCodec::encode`].
pub fn encode<T: PositionalRecord>(record: &T) -> ArrayCodecResult<Value> {
    ArrayCodec::default().encode(record)
}

/// Encodes a record into compact JSON text.
///
/// # Errors
///
/// Returns an error if the record fails to encode.
pub fn to_string<T: PositionalRecord>(record: &T) -> ArrayCodecResult<String> {
    ArrayCodec::default().encode_to_string(record)
}
