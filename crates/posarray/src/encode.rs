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

//! Encoding records into positional arrays.

use serde_json::Value;

use crate::{
    error::{ArrayCodecError, ArrayCodecResult},
    map::{FieldError, PositionMap},
    record::{PositionalRecord, position_map},
};

/// Encodes a record into the elements of a positional array using an explicit map.
///
/// The output holds one element per index up to the highest bound index; unbound
/// indices in between are emitted as explicit nulls. A repeated index keeps the first
/// field, though a built map never contains one.
///
/// # Errors
///
/// Returns an error if a field codec (or a nested record) fails to encode.
pub fn encode_with_map<T>(map: &PositionMap<T>, record: &T) -> ArrayCodecResult<Vec<Value>> {
    let mut out = Vec::with_capacity(map.width());
    let mut last: Option<usize> = None;

    for field in map.iter() {
        let index = field.index();
        // Guards the cursor only: `PositionMapBuilder::build` rejects duplicate indices
        if last == Some(index) {
            continue;
        }

        let next = last.map_or(0, |l| l + 1);
        for _ in next..index {
            out.push(Value::Null);
        }

        let value = (field.encode)(record).map_err(|e| match e {
            FieldError::Reason(reason) => ArrayCodecError::Encode {
                record: map.record_name(),
                field: field.name(),
                index,
                reason,
            },
            FieldError::Nested(err) => err,
        })?;
        out.push(value);
        last = Some(index);
    }

    Ok(out)
}

pub(crate) fn encode_record<T: PositionalRecord>(record: &T) -> ArrayCodecResult<Value> {
    let map = position_map::<T>()?;
    encode_with_map(&map, record).map(Value::Array)
}

#[cfg(test)]
mod tests {
    use chrono::DateTime;
    use rstest::rstest;
    use rust_decimal_macros::dec;
    use serde_json::json;
    use ustr::Ustr;

    use super::*;
    use crate::{
        codecs::FieldCodec,
        config::ArrayCodecConfig,
        decode::{DecodeState, decode_record},
        stubs::{
            StubBook, StubCandle, StubDuplicate, StubGapped, StubNested, StubPair, StubTicker,
            stub_book, stub_candle, stub_nested,
        },
    };

    #[rstest]
    fn test_encode_fills_gap_with_null() {
        let gapped = StubGapped {
            first: 1,
            third: "c".to_string(),
        };
        assert_eq!(encode_record(&gapped).unwrap(), json!([1, null, "c"]));
    }

    #[rstest]
    fn test_encode_flat_record() {
        let ticker = StubTicker {
            symbol: Ustr::from("tBTCUSD"),
            bid: dec!(1622.50),
            ask: Some(dec!(1623)),
            count: 3,
        };
        assert_eq!(
            encode_record(&ticker).unwrap(),
            json!(["tBTCUSD", "1622.50", null, "1623", 3])
        );
    }

    #[rstest]
    fn test_encode_none_as_null() {
        let ticker = StubTicker::default();
        let encoded = encode_record(&ticker).unwrap();
        assert_eq!(encoded[3], Value::Null);
        assert_eq!(encoded.as_array().map(Vec::len), Some(5));
    }

    #[rstest]
    fn test_encode_nested_list_as_array_of_arrays(stub_book: StubBook) {
        assert_eq!(
            encode_record(&stub_book).unwrap(),
            json!(["tBTCUSD", [[1, "a"], [2, "b"]], 5])
        );
    }

    #[rstest]
    fn test_encode_empty_list() {
        let book = StubBook {
            symbol: "tBTCUSD".to_string(),
            entries: Vec::new(),
            sequence: 1,
        };
        assert_eq!(encode_record(&book).unwrap(), json!(["tBTCUSD", [], 1]));
    }

    #[rstest]
    fn test_encode_nested_record(stub_nested: StubNested) {
        assert_eq!(
            encode_record(&stub_nested).unwrap(),
            json!([[1, "a"], null, [["10.5", "2", 1]]])
        );
    }

    #[rstest]
    fn test_encode_field_codec(stub_candle: StubCandle) {
        let encoded = encode_record(&stub_candle).unwrap();
        assert_eq!(encoded[0], json!(1_700_000_000_000_i64));
        assert_eq!(encoded[5], json!("42.5"));
    }

    #[rstest]
    fn test_encode_surfaces_configuration_error() {
        let err = encode_record(&StubDuplicate::default()).unwrap_err();
        assert!(matches!(err, ArrayCodecError::DuplicateIndex { .. }));
    }

    #[rstest]
    fn test_encode_codec_failure() {
        #[derive(Debug, Default)]
        struct Failing {
            value: i64,
        }

        struct RejectAll;

        impl FieldCodec<i64> for RejectAll {
            fn decode(&self, _value: &Value) -> anyhow::Result<i64> {
                anyhow::bail!("never")
            }

            fn encode(&self, value: &i64) -> anyhow::Result<Value> {
                anyhow::bail!("cannot encode {value}")
            }
        }

        let map = PositionMap::<Failing>::builder("Failing")
            .field_with(2, "value", RejectAll, |r| &r.value, |r| &mut r.value)
            .build()
            .unwrap();
        let err = encode_with_map(&map, &Failing { value: 9 }).unwrap_err();

        assert_eq!(
            err,
            ArrayCodecError::Encode {
                record: "Failing",
                field: "value",
                index: 2,
                reason: "cannot encode 9".to_string(),
            }
        );
    }

    #[rstest]
    fn test_round_trip(stub_book: StubBook, stub_candle: StubCandle, stub_nested: StubNested) {
        let state = DecodeState::new(&ArrayCodecConfig::default());

        let book: StubBook = decode_record(&encode_record(&stub_book).unwrap(), state).unwrap();
        assert_eq!(book, stub_book);

        let candle: StubCandle =
            decode_record(&encode_record(&stub_candle).unwrap(), state).unwrap();
        assert_eq!(candle, stub_candle);

        let nested: StubNested =
            decode_record(&encode_record(&stub_nested).unwrap(), state).unwrap();
        assert_eq!(nested, stub_nested);
    }

    #[rstest]
    fn test_round_trip_single_entry_list() {
        let book = StubBook {
            symbol: "tETHUSD".to_string(),
            entries: vec![StubPair {
                id: 9,
                name: "z".to_string(),
            }],
            sequence: 2,
        };
        let encoded = encode_record(&book).unwrap();
        assert_eq!(encoded, json!(["tETHUSD", [[9, "z"]], 2]));

        let state = DecodeState::new(&ArrayCodecConfig::default());
        let decoded: StubBook = decode_record(&encoded, state).unwrap();
        assert_eq!(decoded, book);
    }

    #[rstest]
    fn test_encode_default_time() {
        let candle = StubCandle {
            time: DateTime::UNIX_EPOCH,
            ..StubCandle::default()
        };
        assert_eq!(encode_record(&candle).unwrap()[0], json!(0));
    }
}
