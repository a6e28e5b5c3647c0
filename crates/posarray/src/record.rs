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

//! Record types with positional wire layouts and the process-wide position map cache.

use std::{
    any::{Any, TypeId},
    sync::{Arc, LazyLock, PoisonError, RwLock},
};

use ahash::AHashMap;

use crate::{
    error::ArrayCodecResult,
    map::{PositionMap, PositionMapBuilder},
};

/// A record type which is decoded from and encoded to a positional array.
///
/// Default construction is the factory for decoded instances: every field starts at its
/// default and is overwritten only when the payload binds it.
pub trait PositionalRecord: Default + Send + Sync + 'static {
    /// Registers the record's field-to-index bindings.
    fn describe_positions(map: PositionMapBuilder<Self>) -> PositionMapBuilder<Self>;

    /// Name of the record type reported in errors and logs.
    #[must_use]
    fn record_name() -> &'static str {
        short_type_name(std::any::type_name::<Self>())
    }
}

/// Strips the module path from a type name, keeping any generic arguments.
fn short_type_name(full: &'static str) -> &'static str {
    let base_end = full.find('<').unwrap_or(full.len());
    let start = full[..base_end].rfind("::").map_or(0, |pos| pos + 2);
    &full[start..]
}

type CachedMap<T> = ArrayCodecResult<Arc<PositionMap<T>>>;

static POSITION_MAPS: LazyLock<RwLock<AHashMap<TypeId, Box<dyn Any + Send + Sync>>>> =
    LazyLock::new(|| RwLock::new(AHashMap::new()));

fn lookup<T: PositionalRecord>(
    maps: &AHashMap<TypeId, Box<dyn Any + Send + Sync>>,
) -> Option<CachedMap<T>> {
    maps.get(&TypeId::of::<T>())
        .and_then(|entry| entry.downcast_ref::<CachedMap<T>>())
        .cloned()
}

/// Returns the position map for `T`, building and caching it on first use.
///
/// The build outcome is cached either way, so a configuration error is reported by every
/// call for that record type.
///
/// # Errors
///
/// Returns [`ArrayCodecError::DuplicateIndex`](crate::error::ArrayCodecError::DuplicateIndex)
/// if the record's field bindings are invalid.
pub fn position_map<T: PositionalRecord>() -> CachedMap<T> {
    {
        let maps = POSITION_MAPS
            .read()
            .unwrap_or_else(PoisonError::into_inner);
        if let Some(cached) = lookup::<T>(&maps) {
            return cached;
        }
    }

    // Built outside the lock, the descriptor table is pure derived data
    let built = T::describe_positions(PositionMapBuilder::new(T::record_name()))
        .build()
        .map(Arc::new);

    match &built {
        Ok(map) => tracing::debug!(
            record = map.record_name(),
            fields = map.len(),
            width = map.width(),
            "Built position map"
        ),
        Err(e) => tracing::debug!(record = T::record_name(), "Invalid position map: {e}"),
    }

    let mut maps = POSITION_MAPS
        .write()
        .unwrap_or_else(PoisonError::into_inner);
    if let Some(existing) = lookup::<T>(&maps) {
        return existing;
    }
    maps.insert(TypeId::of::<T>(), Box::new(built.clone()));
    built
}
