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

//! Error types for positional array encoding and decoding.

use serde_json::Value;
use thiserror::Error;

/// Maximum number of characters of an offending raw value kept in an error message.
const MAX_VALUE_PREVIEW: usize = 128;

/// Error raised by the positional array codec.
///
/// Errors are `Clone` so that a configuration error detected while building a record's
/// position map can be cached and surfaced again on every subsequent call.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ArrayCodecError {
    /// Two fields of one record type claim the same array index.
    #[error("Duplicate index {index} in position map for {record}: fields '{first}' and '{second}'")]
    DuplicateIndex {
        record: &'static str,
        index: usize,
        first: &'static str,
        second: &'static str,
    },

    /// The payload (or a nested slot) was expected to be an array.
    #[error("Expected array payload for {record}, was {value}")]
    ExpectedArray { record: &'static str, value: String },

    /// A wire value could not be converted into the declared field type.
    #[error("Failed to decode {record}.{field} at index {index} from {value}: {reason}")]
    Decode {
        record: &'static str,
        field: &'static str,
        index: usize,
        value: String,
        reason: String,
    },

    /// A field value could not be serialized by its field codec.
    #[error("Failed to encode {record}.{field} at index {index}: {reason}")]
    Encode {
        record: &'static str,
        field: &'static str,
        index: usize,
        reason: String,
    },

    /// Textual payload is not valid JSON.
    #[error("Invalid JSON payload: {0}")]
    Json(String),

    /// Nested records recurse deeper than the configured limit.
    #[error("Nesting depth {depth} exceeds maximum {max} while decoding {record}")]
    DepthExceeded {
        record: &'static str,
        depth: usize,
        max: usize,
    },
}

impl ArrayCodecError {
    pub(crate) fn expected_array(record: &'static str, value: &Value) -> Self {
        Self::ExpectedArray {
            record,
            value: preview(value),
        }
    }

    pub(crate) fn decode(
        record: &'static str,
        field: &'static str,
        index: usize,
        value: &Value,
        reason: impl ToString,
    ) -> Self {
        Self::Decode {
            record,
            field,
            index,
            value: preview(value),
            reason: reason.to_string(),
        }
    }
}

/// Result type for positional array codec operations.
pub type ArrayCodecResult<T> = Result<T, ArrayCodecError>;

/// Error raised by a primitive coercion rule.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CoercionError {
    /// Null wire value for a field which cannot represent absence.
    #[error("null is not a valid {expected}")]
    UnexpectedNull { expected: &'static str },

    /// Wire value kind has no conversion rule into the declared type.
    #[error("cannot convert {found} into {expected}")]
    TypeMismatch {
        expected: &'static str,
        found: &'static str,
    },

    /// Textual or numeric wire value failed to parse as the declared type.
    #[error("cannot parse '{value}' as {expected}: {reason}")]
    Parse {
        expected: &'static str,
        value: String,
        reason: String,
    },

    /// Numeric wire value does not fit into the declared type.
    #[error("{value} is out of range for {expected}")]
    OutOfRange {
        expected: &'static str,
        value: String,
    },
}

/// Returns the JSON kind name of a wire value, used in mismatch messages.
#[must_use]
pub fn value_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "bool",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}

/// Renders a wire value for an error message, truncating long payloads.
pub(crate) fn preview(value: &Value) -> String {
    let rendered = value.to_string();
    if rendered.chars().count() <= MAX_VALUE_PREVIEW {
        return rendered;
    }
    let truncated: String = rendered.chars().take(MAX_VALUE_PREVIEW).collect();
    format!("{truncated}...")
}
