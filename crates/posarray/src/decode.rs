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

//! Decoding positional arrays into records.

use serde_json::Value;

use crate::{
    config::ArrayCodecConfig,
    error::{ArrayCodecError, ArrayCodecResult},
    map::{Bound, FieldError, PositionMap},
    record::{PositionalRecord, position_map},
};

/// Recursion bookkeeping threaded through nested decodes.
#[derive(Clone, Copy, Debug)]
pub(crate) struct DecodeState {
    depth: usize,
    max_depth: usize,
}

impl DecodeState {
    pub(crate) const fn new(config: &ArrayCodecConfig) -> Self {
        Self {
            depth: 0,
            max_depth: config.max_depth,
        }
    }

    fn descend(self, record: &'static str) -> ArrayCodecResult<Self> {
        let depth = self.depth + 1;
        if depth > self.max_depth {
            return Err(ArrayCodecError::DepthExceeded {
                record,
                depth,
                max: self.max_depth,
            });
        }
        Ok(Self { depth, ..self })
    }
}

/// Decodes a record from the elements of a positional array using an explicit map.
///
/// Fields whose index lies beyond the end of `items` keep their default value.
///
/// # Errors
///
/// Returns an error if any in-range field fails to convert; the partial record is dropped.
pub fn decode_with_map<T: Default>(map: &PositionMap<T>, items: &[Value]) -> ArrayCodecResult<T> {
    decode_items(map, items, DecodeState::new(&ArrayCodecConfig::default()))
}

pub(crate) fn decode_items<T: Default>(
    map: &PositionMap<T>,
    items: &[Value],
    state: DecodeState,
) -> ArrayCodecResult<T> {
    let mut record = T::default();

    for field in map.iter() {
        let index = field.index();
        let Some(slot) = items.get(index) else {
            // Ascending order: every remaining field is out of range too
            tracing::trace!(
                record = map.record_name(),
                field = field.name(),
                index,
                len = items.len(),
                "Payload shorter than position map, remaining fields left at default"
            );
            break;
        };

        match (field.decode)(&mut record, slot, state) {
            Ok(Bound::Set) => {}
            Ok(Bound::Skipped) => {
                tracing::debug!(
                    record = map.record_name(),
                    field = field.name(),
                    index,
                    value = %slot,
                    "Lenient skip, field left at default"
                );
            }
            Err(FieldError::Reason(reason)) => {
                return Err(ArrayCodecError::decode(
                    map.record_name(),
                    field.name(),
                    index,
                    slot,
                    reason,
                ));
            }
            Err(FieldError::Nested(err)) => return Err(err),
        }
    }

    Ok(record)
}

/// Decodes a top-level record of type `T` from `value`.
pub(crate) fn decode_record<T: PositionalRecord>(
    value: &Value,
    state: DecodeState,
) -> ArrayCodecResult<T> {
    let map = position_map::<T>()?;
    let Value::Array(items) = value else {
        return Err(ArrayCodecError::expected_array(map.record_name(), value));
    };
    decode_items(&map, items, state)
}

/// Decodes a top-level list of records, with the same shape rules as list fields.
pub(crate) fn decode_list<T: PositionalRecord>(
    value: &Value,
    state: DecodeState,
) -> ArrayCodecResult<Vec<T>> {
    let Value::Array(items) = value else {
        return Err(ArrayCodecError::expected_array(T::record_name(), value));
    };
    decode_list_items(value, items, state)
}

/// Applies the list shape rules to the elements of an array slot.
///
/// - `[]` yields no records.
/// - `[[..], [..]]` yields one record per inner array, in order.
/// - `[a, b, ..]` (flat) is a single record spanning the whole slot.
fn decode_list_items<T: PositionalRecord>(
    slot: &Value,
    items: &[Value],
    state: DecodeState,
) -> ArrayCodecResult<Vec<T>> {
    let state = state.descend(T::record_name())?;
    match items.first() {
        None => Ok(Vec::new()),
        Some(Value::Array(_)) => items
            .iter()
            .map(|item| decode_record::<T>(item, state))
            .collect(),
        Some(_) => Ok(vec![decode_record::<T>(slot, state)?]),
    }
}

/// Decodes a nested record field slot.
pub(crate) fn decode_record_slot<T: PositionalRecord>(
    slot: &Value,
    state: DecodeState,
) -> Result<T, FieldError> {
    if !slot.is_array() {
        return Err(FieldError::Reason(format!(
            "expected array for {}",
            T::record_name()
        )));
    }
    let state = state.descend(T::record_name())?;
    Ok(decode_record::<T>(slot, state)?)
}

/// Decodes a list-of-records field slot.
pub(crate) fn decode_list_slot<T: PositionalRecord>(
    slot: &Value,
    state: DecodeState,
) -> Result<Vec<T>, FieldError> {
    let Value::Array(items) = slot else {
        return Err(FieldError::Reason(format!(
            "expected array of {}",
            T::record_name()
        )));
    };
    Ok(decode_list_items(slot, items, state)?)
}

#[cfg(test)]
mod tests {
    use rstest::rstest;
    use rust_decimal::Decimal;
    use rust_decimal_macros::dec;
    use serde_json::json;
    use tracing_test::traced_test;

    use super::*;
    use crate::stubs::{
        StubBook, StubCandle, StubDuplicate, StubGapped, StubLevel, StubNested, StubPair,
        StubPriced, StubTicker,
    };

    fn decode<T: PositionalRecord>(value: &Value) -> ArrayCodecResult<T> {
        decode_record(value, DecodeState::new(&ArrayCodecConfig::default()))
    }

    #[rstest]
    fn test_decode_flat_record() {
        let ticker: StubTicker = decode(&json!(["tBTCUSD", "1622.50", "unbound", null, 3])).unwrap();

        assert_eq!(ticker.symbol.as_str(), "tBTCUSD");
        assert_eq!(ticker.bid, dec!(1622.50));
        assert_eq!(ticker.ask, None);
        assert_eq!(ticker.count, 3);
    }

    #[rstest]
    fn test_decode_short_payload_leaves_defaults() {
        let ticker: StubTicker = decode(&json!(["tETHUSD"])).unwrap();

        assert_eq!(ticker.symbol.as_str(), "tETHUSD");
        assert_eq!(ticker.bid, Decimal::ZERO);
        assert_eq!(ticker.ask, None);
        assert_eq!(ticker.count, 0);
    }

    #[rstest]
    fn test_decode_empty_payload() {
        let pair: StubPair = decode(&json!([])).unwrap();
        assert_eq!(pair, StubPair::default());
    }

    #[rstest]
    fn test_decode_ignores_extra_elements() {
        let pair: StubPair = decode(&json!([7, "x", "extra", 99])).unwrap();
        assert_eq!(pair.id, 7);
        assert_eq!(pair.name, "x");
    }

    #[rstest]
    fn test_decode_gap_slot_is_ignored() {
        let gapped: StubGapped = decode(&json!([1, {"anything": true}, "third"])).unwrap();
        assert_eq!(gapped.first, 1);
        assert_eq!(gapped.third, "third");
    }

    #[rstest]
    fn test_decode_list_of_arrays() {
        let book: StubBook = decode(&json!(["tBTCUSD", [[1, "a"], [2, "b"]], 5])).unwrap();

        assert_eq!(
            book.entries,
            vec![
                StubPair {
                    id: 1,
                    name: "a".to_string(),
                },
                StubPair {
                    id: 2,
                    name: "b".to_string(),
                },
            ]
        );
        assert_eq!(book.sequence, 5);
    }

    #[rstest]
    fn test_decode_list_from_single_flat_array() {
        let book: StubBook = decode(&json!(["tBTCUSD", [1, "a"], 5])).unwrap();

        assert_eq!(
            book.entries,
            vec![StubPair {
                id: 1,
                name: "a".to_string(),
            }]
        );
    }

    #[rstest]
    fn test_decode_list_from_empty_array() {
        let book: StubBook = decode(&json!(["tBTCUSD", [], 5])).unwrap();
        assert!(book.entries.is_empty());
        assert_eq!(book.sequence, 5);
    }

    #[rstest]
    fn test_decode_list_rejects_scalar_slot() {
        let err = decode::<StubBook>(&json!(["tBTCUSD", 42, 5])).unwrap_err();
        assert_eq!(
            err,
            ArrayCodecError::Decode {
                record: "StubBook",
                field: "entries",
                index: 1,
                value: "42".to_string(),
                reason: "expected array of StubPair".to_string(),
            }
        );
    }

    #[rstest]
    fn test_decode_list_rejects_mixed_shapes() {
        let err = decode::<StubBook>(&json!(["tBTCUSD", [[1, "a"], 2], 5])).unwrap_err();
        assert!(matches!(
            err,
            ArrayCodecError::ExpectedArray {
                record: "StubPair",
                ..
            }
        ));
    }

    #[rstest]
    fn test_decode_nested_record() {
        let nested: StubNested =
            decode(&json!([[1, "inner"], null, [[10.5, 2.0, 1]]])).unwrap();

        assert_eq!(nested.pair.id, 1);
        assert_eq!(nested.pair.name, "inner");
        assert_eq!(nested.extra, None);
        assert_eq!(nested.levels.len(), 1);
        assert_eq!(nested.levels[0].price, dec!(10.5));
    }

    #[rstest]
    fn test_decode_optional_nested_record_present() {
        let nested: StubNested = decode(&json!([[1, "a"], [2, "b"], []])).unwrap();
        assert_eq!(
            nested.extra,
            Some(StubPair {
                id: 2,
                name: "b".to_string(),
            })
        );
    }

    #[rstest]
    fn test_decode_nested_record_rejects_scalar() {
        let err = decode::<StubNested>(&json!(["not-an-array"])).unwrap_err();
        assert!(matches!(
            err,
            ArrayCodecError::Decode {
                record: "StubNested",
                field: "pair",
                index: 0,
                ..
            }
        ));
    }

    #[rstest]
    fn test_decode_nested_failure_reports_inner_field() {
        let err = decode::<StubNested>(&json!([["x", "a"]])).unwrap_err();
        assert!(matches!(
            err,
            ArrayCodecError::Decode {
                record: "StubPair",
                field: "id",
                index: 0,
                ..
            }
        ));
    }

    #[rstest]
    fn test_decode_exponent_decimal() {
        let priced: StubPriced = decode(&json!(["1.23456789012345E+20", 1])).unwrap();
        assert_eq!(priced.price, dec!(123456789012345000000));
        assert_eq!(priced.quantity, 1);
    }

    #[rstest]
    fn test_decode_malformed_exponent_leaves_default() {
        let priced: StubPriced = decode(&json!(["1.2E+abc", 4])).unwrap();
        assert_eq!(priced.price, Decimal::ZERO);
        assert_eq!(priced.quantity, 4);
    }

    #[rstest]
    fn test_decode_malformed_plain_decimal_fails() {
        let err = decode::<StubPriced>(&json!(["12.3.4", 4])).unwrap_err();
        assert!(matches!(
            err,
            ArrayCodecError::Decode {
                record: "StubPriced",
                field: "price",
                ..
            }
        ));
    }

    #[rstest]
    fn test_decode_null_into_non_nullable_fails() {
        let err = decode::<StubPair>(&json!([null, "a"])).unwrap_err();
        assert_eq!(
            err,
            ArrayCodecError::Decode {
                record: "StubPair",
                field: "id",
                index: 0,
                value: "null".to_string(),
                reason: "null is not a valid i64".to_string(),
            }
        );
    }

    #[rstest]
    fn test_decode_field_codec() {
        let candle: StubCandle =
            decode(&json!([1_700_000_000_000_i64, 10.0, 11.0, 12.0, 9.5, "42.5"])).unwrap();

        assert_eq!(candle.time.timestamp_millis(), 1_700_000_000_000);
        assert_eq!(candle.close, 11.0);
        assert_eq!(candle.volume, dec!(42.5));
    }

    #[rstest]
    fn test_decode_field_codec_failure() {
        let err = decode::<StubCandle>(&json!(["soon", 1.0])).unwrap_err();
        match err {
            ArrayCodecError::Decode {
                field, index, reason, ..
            } => {
                assert_eq!(field, "time");
                assert_eq!(index, 0);
                assert!(reason.contains("invalid epoch text 'soon'"));
            }
            other => panic!("Expected Decode error, was {other:?}"),
        }
    }

    #[rstest]
    fn test_decode_rejects_non_array_payload() {
        let err = decode::<StubPair>(&json!({"id": 1})).unwrap_err();
        assert_eq!(
            err,
            ArrayCodecError::ExpectedArray {
                record: "StubPair",
                value: "{\"id\":1}".to_string(),
            }
        );
    }

    #[rstest]
    fn test_decode_surfaces_configuration_error() {
        let err = decode::<StubDuplicate>(&json!([1, 2])).unwrap_err();
        assert!(matches!(err, ArrayCodecError::DuplicateIndex { .. }));
    }

    #[rstest]
    fn test_decode_depth_limit() {
        let state = DecodeState::new(&ArrayCodecConfig::default().with_max_depth(1));
        let ok: StubNested = decode_record(&json!([[1, "a"]]), state).unwrap();
        assert_eq!(ok.pair.id, 1);

        let state = DecodeState::new(&ArrayCodecConfig::default().with_max_depth(0));
        let err = decode_record::<StubNested>(&json!([[1, "a"]]), state).unwrap_err();
        assert_eq!(
            err,
            ArrayCodecError::DepthExceeded {
                record: "StubPair",
                depth: 1,
                max: 0,
            }
        );
    }

    #[rstest]
    fn test_decode_top_level_list() {
        let state = DecodeState::new(&ArrayCodecConfig::default());
        let levels: Vec<StubLevel> =
            decode_list(&json!([["1.5", "2", 3], ["1.6", "4", 1]]), state).unwrap();
        assert_eq!(levels.len(), 2);
        assert_eq!(levels[1].price, dec!(1.6));
        assert_eq!(levels[1].count, 1);

        let single: Vec<StubLevel> = decode_list(&json!(["1.5", "2", 3]), state).unwrap();
        assert_eq!(single.len(), 1);
    }

    #[rstest]
    fn test_decode_with_explicit_map() {
        let map = PositionMap::<StubPair>::builder("AdHoc")
            .field(1, "id", |r| &r.id, |r| &mut r.id)
            .build()
            .unwrap();
        let pair = decode_with_map(&map, &[json!("ignored"), json!("17")]).unwrap();
        assert_eq!(pair.id, 17);
        assert!(pair.name.is_empty());
    }

    #[traced_test]
    #[test]
    fn test_lenient_skip_is_logged() {
        let _: StubPriced = decode(&json!(["9.9E+?", 1])).unwrap();
        assert!(logs_contain("Lenient skip"));
    }
}
