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

//! Record stubs and fixtures for testing.

use chrono::{DateTime, Utc};
use rstest::fixture;
use rust_decimal::Decimal;
use ustr::Ustr;

use crate::{codecs::UnixMillisCodec, map::PositionMapBuilder, record::PositionalRecord};

#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct StubPair {
    pub id: i64,
    pub name: String,
}

impl PositionalRecord for StubPair {
    fn describe_positions(map: PositionMapBuilder<Self>) -> PositionMapBuilder<Self> {
        map.field(0, "id", |r| &r.id, |r| &mut r.id)
            .field(1, "name", |r| &r.name, |r| &mut r.name)
    }
}

/// Order book level: `[PRICE, AMOUNT, COUNT]`.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct StubLevel {
    pub price: Decimal,
    pub amount: Decimal,
    pub count: u32,
}

impl PositionalRecord for StubLevel {
    fn describe_positions(map: PositionMapBuilder<Self>) -> PositionMapBuilder<Self> {
        map.field(0, "price", |r| &r.price, |r| &mut r.price)
            .field(1, "amount", |r| &r.amount, |r| &mut r.amount)
            .field(2, "count", |r| &r.count, |r| &mut r.count)
    }
}

/// Ticker with an unbound slot at index 2.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct StubTicker {
    pub symbol: Ustr,
    pub bid: Decimal,
    pub ask: Option<Decimal>,
    pub count: u32,
}

impl PositionalRecord for StubTicker {
    fn describe_positions(map: PositionMapBuilder<Self>) -> PositionMapBuilder<Self> {
        map.field(0, "symbol", |r| &r.symbol, |r| &mut r.symbol)
            .field(1, "bid", |r| &r.bid, |r| &mut r.bid)
            .field(3, "ask", |r| &r.ask, |r| &mut r.ask)
            .field(4, "count", |r| &r.count, |r| &mut r.count)
    }
}

#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct StubBook {
    pub symbol: String,
    pub entries: Vec<StubPair>,
    pub sequence: u64,
}

impl PositionalRecord for StubBook {
    fn describe_positions(map: PositionMapBuilder<Self>) -> PositionMapBuilder<Self> {
        map.field(0, "symbol", |r| &r.symbol, |r| &mut r.symbol)
            .list(1, "entries", |r| &r.entries, |r| &mut r.entries)
            .field(2, "sequence", |r| &r.sequence, |r| &mut r.sequence)
    }
}

/// Candle: `[MTS, OPEN, CLOSE, HIGH, LOW, VOLUME]`.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct StubCandle {
    pub time: DateTime<Utc>,
    pub open: f64,
    pub close: f64,
    pub high: f64,
    pub low: f64,
    pub volume: Decimal,
}

impl PositionalRecord for StubCandle {
    fn describe_positions(map: PositionMapBuilder<Self>) -> PositionMapBuilder<Self> {
        map.field_with(0, "time", UnixMillisCodec, |r| &r.time, |r| &mut r.time)
            .field(1, "open", |r| &r.open, |r| &mut r.open)
            .field(2, "close", |r| &r.close, |r| &mut r.close)
            .field(3, "high", |r| &r.high, |r| &mut r.high)
            .field(4, "low", |r| &r.low, |r| &mut r.low)
            .field(5, "volume", |r| &r.volume, |r| &mut r.volume)
    }
}

#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct StubGapped {
    pub first: i64,
    pub third: String,
}

impl PositionalRecord for StubGapped {
    fn describe_positions(map: PositionMapBuilder<Self>) -> PositionMapBuilder<Self> {
        map.field(0, "first", |r| &r.first, |r| &mut r.first)
            .field(2, "third", |r| &r.third, |r| &mut r.third)
    }
}

#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct StubPriced {
    pub price: Decimal,
    pub quantity: i64,
}

impl PositionalRecord for StubPriced {
    fn describe_positions(map: PositionMapBuilder<Self>) -> PositionMapBuilder<Self> {
        map.field(0, "price", |r| &r.price, |r| &mut r.price)
            .field(1, "quantity", |r| &r.quantity, |r| &mut r.quantity)
    }
}

#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct StubNested {
    pub pair: StubPair,
    pub extra: Option<StubPair>,
    pub levels: Vec<StubLevel>,
}

impl PositionalRecord for StubNested {
    fn describe_positions(map: PositionMapBuilder<Self>) -> PositionMapBuilder<Self> {
        map.record(0, "pair", |r| &r.pair, |r| &mut r.pair)
            .optional_record(1, "extra", |r| &r.extra, |r| &mut r.extra)
            .list(2, "levels", |r| &r.levels, |r| &mut r.levels)
    }
}

/// Invalid: two fields bound to index 1.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct StubDuplicate {
    pub left: i64,
    pub right: i64,
}

impl PositionalRecord for StubDuplicate {
    fn describe_positions(map: PositionMapBuilder<Self>) -> PositionMapBuilder<Self> {
        map.field(1, "left", |r| &r.left, |r| &mut r.left)
            .field(1, "right", |r| &r.right, |r| &mut r.right)
    }
}

#[fixture]
pub fn stub_book() -> StubBook {
    StubBook {
        symbol: "tBTCUSD".to_string(),
        entries: vec![
            StubPair {
                id: 1,
                name: "a".to_string(),
            },
            StubPair {
                id: 2,
                name: "b".to_string(),
            },
        ],
        sequence: 5,
    }
}

#[fixture]
pub fn stub_candle() -> StubCandle {
    StubCandle {
        time: DateTime::from_timestamp_millis(1_700_000_000_000).unwrap_or_default(),
        open: 10.0,
        close: 11.0,
        high: 12.0,
        low: 9.5,
        volume: Decimal::new(425, 1),
    }
}

#[fixture]
pub fn stub_nested() -> StubNested {
    StubNested {
        pair: StubPair {
            id: 1,
            name: "a".to_string(),
        },
        extra: None,
        levels: vec![StubLevel {
            price: Decimal::new(105, 1),
            amount: Decimal::TWO,
            count: 1,
        }],
    }
}

#[fixture]
pub fn stub_ticker() -> StubTicker {
    StubTicker {
        symbol: Ustr::from("tBTCUSD"),
        bid: Decimal::new(162_250, 2),
        ask: Some(Decimal::new(162_300, 2)),
        count: 3,
    }
}
