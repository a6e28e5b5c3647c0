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

//! Serde integration for positional records embedded in keyed payloads.
//!
//! Use [`Positional`] as a field type, or this module with `#[serde(with = ...)]`:
//!
//! ```ignore
//! #[derive(Deserialize, Serialize)]
//! struct Envelope {
//!     channel: String,
//!     #[serde(with = "posarray::serde_array")]
//!     data: Candle,
//!     #[serde(with = "posarray::serde_array::list")]
//!     history: Vec<Candle>,
//! }
//! ```

use serde::{Deserialize, Deserializer, Serialize, Serializer, de::Error as _, ser::Error as _};
use serde_json::Value;

use crate::{
    codec::{decode, encode},
    record::PositionalRecord,
};

/// Wraps a record so it serializes as its positional array.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct Positional<T>(pub T);

impl<T> Positional<T> {
    /// Consumes the wrapper, returning the record.
    pub fn into_inner(self) -> T {
        self.0
    }
}

impl<T: PositionalRecord> Serialize for Positional<T> {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serialize(&self.0, serializer)
    }
}

impl<'de, T: PositionalRecord> Deserialize<'de> for Positional<T> {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        deserialize(deserializer).map(Self)
    }
}

/// Serializes a record as its positional array.
///
/// # Errors
///
/// Returns an error if the record fails to encode.
pub fn serialize<T, S>(record: &T, serializer: S) -> Result<S::Ok, S::Error>
where
    T: PositionalRecord,
    S: Serializer,
{
    encode(record)
        .map_err(S::Error::custom)?
        .serialize(serializer)
}

/// Deserializes a record from its positional array.
///
/// # Errors
///
/// Returns an error if the input is not a decodable positional array.
pub fn deserialize<'de, T, D>(deserializer: D) -> Result<T, D::Error>
where
    T: PositionalRecord,
    D: Deserializer<'de>,
{
    let value = Value::deserialize(deserializer)?;
    decode(&value).map_err(D::Error::custom)
}

/// Serde functions for `Vec` fields holding positional records.
pub mod list {
    use serde::{Deserialize, Deserializer, Serialize, Serializer, de::Error as _, ser::Error as _};
    use serde_json::Value;

    use crate::{
        codec::{decode_list, encode},
        record::PositionalRecord,
    };

    /// Serializes records as an array of positional arrays.
    ///
    /// # Errors
    ///
    /// Returns an error if any record fails to encode.
    pub fn serialize<T, S>(records: &[T], serializer: S) -> Result<S::Ok, S::Error>
    where
        T: PositionalRecord,
        S: Serializer,
    {
        let items = records
            .iter()
            .map(encode)
            .collect::<Result<Vec<_>, _>>()
            .map_err(S::Error::custom)?;
        Value::Array(items).serialize(serializer)
    }

    /// Deserializes records from an array of positional arrays (or a single flat array).
    ///
    /// # Errors
    ///
    /// Returns an error if the input is not a decodable list of records.
    pub fn deserialize<'de, T, D>(deserializer: D) -> Result<Vec<T>, D::Error>
    where
        T: PositionalRecord,
        D: Deserializer<'de>,
    {
        let value = Value::deserialize(deserializer)?;
        decode_list(&value).map_err(D::Error::custom)
    }
}
