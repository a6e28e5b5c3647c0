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


use std::hint::black_box;

use criterion::{BenchmarkId, Criterion, Throughput, criterion_group, criterion_main};
use posarray::{
    decode_list, encode, from_str, position_map,
    stubs::{StubBook, StubCandle, StubLevel, StubNested, StubTicker, stub_book, stub_nested, stub_ticker},
    to_string,
};
use serde_json::Value;

const HTTP_CANDLES: &str = include_str!("../test_data/http_candles.json");
const TICKER: &str = r#"["tBTCUSD","1622.50",null,"1623.00",3]"#;

fn bench_position_map(c: &mut Criterion) {
    let mut group = c.benchmark_group("Position Map");

    group.bench_function("cached_lookup", |b| {
        let _ = position_map::<StubNested>().unwrap();
        b.iter(|| black_box(position_map::<StubNested>().unwrap()));
    });

    group.finish();
}

fn bench_decode(c: &mut Criterion) {
    let mut group = c.benchmark_group("Decode");

    group.bench_function("ticker_from_str", |b| {
        b.iter(|| black_box(from_str::<StubTicker>(black_box(TICKER)).unwrap()));
    });

    let candles: Value = serde_json::from_str(HTTP_CANDLES).unwrap();
    group.bench_with_input(BenchmarkId::new("decode_list", "candles"), &candles, |b, v| {
        b.iter(|| black_box(decode_list::<StubCandle>(black_box(v)).unwrap()));
    });

    group.finish();
}

fn bench_encode(c: &mut Criterion) {
    let mut group = c.benchmark_group("Encode");

    let ticker = stub_ticker();
    group.bench_function("ticker_to_string", |b| {
        b.iter(|| black_box(to_string(black_box(&ticker)).unwrap()));
    });

    let book: StubBook = stub_book();
    group.bench_function("book", |b| {
        b.iter(|| black_box(encode(black_box(&book)).unwrap()));
    });

    let nested = stub_nested();
    group.bench_function("nested", |b| {
        b.iter(|| black_box(encode(black_box(&nested)).unwrap()));
    });

    group.finish();
}

fn bench_batch(c: &mut Criterion) {
    let mut group = c.benchmark_group("Batch");

    for batch_size in [10, 100, 1000] {
        group.throughput(Throughput::Elements(batch_size as u64));

        let payload = Value::Array(
            (0..batch_size)
                .map(|i| serde_json::json!([format!("{i}.5"), "0.25", i]))
                .collect(),
        );

        group.bench_with_input(
            BenchmarkId::new("decode_levels", batch_size),
            &payload,
            |b, payload| {
                b.iter(|| black_box(decode_list::<StubLevel>(black_box(payload)).unwrap()));
            },
        );
    }

    group.finish();
}

criterion_group!(
    benches,
    bench_position_map,
    bench_decode,
    bench_encode,
    bench_batch
);
criterion_main!(benches);
