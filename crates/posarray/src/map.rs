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

//! Position maps binding record fields to array indices.
//!
//! A [`PositionMap`] is built once per record type through [`PositionMapBuilder`] and shared
//! read-only by every decode and encode call for that type. Each registered field carries a
//! pair of accessor functions plus the conversion to use: the field type's [`WireValue`]
//! rules, a [`FieldCodec`] override, or recursion into a nested record (or list of records).

use std::{fmt, sync::Arc};

use ahash::AHashMap;
use serde_json::Value;

use crate::{
    codecs::FieldCodec,
    coerce::WireValue,
    decode::{DecodeState, decode_list_slot, decode_record_slot},
    encode::encode_record,
    error::{ArrayCodecError, ArrayCodecResult},
    record::PositionalRecord,
};

/// The declared semantic type of a field.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum FieldKind {
    /// A scalar (or list of scalars) converted by [`WireValue`] or a field codec.
    Primitive,
    /// A nested record encoded as its own positional array.
    Record,
    /// A list of nested records.
    List,
}

/// Outcome of binding one wire slot into a record.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub(crate) enum Bound {
    Set,
    /// Left at its default by a lenient coercion rule.
    Skipped,
}

/// Failure while converting one field.
#[derive(Debug)]
pub(crate) enum FieldError {
    /// Conversion failed at this field; the caller attaches record and field context.
    Reason(String),
    /// Failure inside a nested record, already carrying its own context.
    Nested(ArrayCodecError),
}

impl From<ArrayCodecError> for FieldError {
    fn from(err: ArrayCodecError) -> Self {
        Self::Nested(err)
    }
}

type DecodeFn<T> =
    Box<dyn Fn(&mut T, &Value, DecodeState) -> Result<Bound, FieldError> + Send + Sync>;
type EncodeFn<T> = Box<dyn Fn(&T) -> Result<Value, FieldError> + Send + Sync>;

fn boxed_decode<T, D>(decode: D) -> DecodeFn<T>
where
    D: Fn(&mut T, &Value, DecodeState) -> Result<Bound, FieldError> + Send + Sync + 'static,
{
    Box::new(decode)
}

fn boxed_encode<T, E>(encode: E) -> EncodeFn<T>
where
    E: Fn(&T) -> Result<Value, FieldError> + Send + Sync + 'static,
{
    Box::new(encode)
}

/// A single field binding within a [`PositionMap`].
pub struct FieldDescriptor<T> {
    index: usize,
    name: &'static str,
    kind: FieldKind,
    type_name: &'static str,
    has_codec: bool,
    pub(crate) decode: DecodeFn<T>,
    pub(crate) encode: EncodeFn<T>,
}

impl<T> FieldDescriptor<T> {
    /// The 0-based array slot of this field.
    #[must_use]
    pub const fn index(&self) -> usize {
        self.index
    }

    #[must_use]
    pub const fn name(&self) -> &'static str {
        self.name
    }

    #[must_use]
    pub const fn kind(&self) -> FieldKind {
        self.kind
    }

    /// Name of the declared field type (element type for lists).
    #[must_use]
    pub const fn type_name(&self) -> &'static str {
        self.type_name
    }

    /// Whether a field-level codec overrides the default conversion.
    #[must_use]
    pub const fn has_codec(&self) -> bool {
        self.has_codec
    }
}

impl<T> fmt::Debug for FieldDescriptor<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct(stringify!(FieldDescriptor))
            .field("index", &self.index)
            .field("name", &self.name)
            .field("kind", &self.kind)
            .field("type_name", &self.type_name)
            .field("has_codec", &self.has_codec)
            .finish()
    }
}

/// Immutable field-to-index table for one record type.
///
/// ```
/// use posarray::map::PositionMap;
///
/// #[derive(Default)]
/// struct Quote {
///     bid: f64,
///     ask: f64,
/// }
///
/// let map = PositionMap::<Quote>::builder("Quote")
///     .field(0, "bid", |r| &r.bid, |r| &mut r.bid)
///     .field(2, "ask", |r| &r.ask, |r| &mut r.ask)
///     .build()
///     .unwrap();
///
/// assert_eq!(map.get(2).map(|f| f.name()), Some("ask"));
/// assert!(map.get(1).is_none());
/// assert_eq!(map.width(), 3);
/// ```
pub struct PositionMap<T> {
    record: &'static str,
    fields: Vec<FieldDescriptor<T>>,
    by_index: AHashMap<usize, usize>,
}

impl<T: 'static> PositionMap<T> {
    /// Creates a builder for the record type named `record`.
    #[must_use]
    pub fn builder(record: &'static str) -> PositionMapBuilder<T> {
        PositionMapBuilder::new(record)
    }
}

impl<T> PositionMap<T> {
    #[must_use]
    pub const fn record_name(&self) -> &'static str {
        self.record
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.fields.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    /// Iterates the field descriptors in ascending index order.
    pub fn iter(&self) -> impl Iterator<Item = &FieldDescriptor<T>> {
        self.fields.iter()
    }

    /// Returns the field bound to `index`, if any.
    #[must_use]
    pub fn get(&self, index: usize) -> Option<&FieldDescriptor<T>> {
        self.by_index.get(&index).map(|&pos| &self.fields[pos])
    }

    /// Returns the field registered under `name`, if any.
    #[must_use]
    pub fn field(&self, name: &str) -> Option<&FieldDescriptor<T>> {
        self.fields.iter().find(|field| field.name == name)
    }

    /// Length of an encoded array: one past the highest bound index.
    #[must_use]
    pub fn width(&self) -> usize {
        self.fields.last().map_or(0, |field| field.index + 1)
    }
}

impl<T> fmt::Debug for PositionMap<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct(stringify!(PositionMap))
            .field("record", &self.record)
            .field("fields", &self.fields)
            .finish()
    }
}

/// Registers the fields of a record type, then validates them into a [`PositionMap`].
///
/// Fields are bound through plain accessor functions, so registration never inspects the
/// record type at runtime:
///
/// ```
/// use posarray::map::PositionMapBuilder;
///
/// #[derive(Default)]
/// struct Level {
///     price: f64,
///     amount: f64,
/// }
///
/// let map = PositionMapBuilder::<Level>::new("Level")
///     .field(0, "price", |r| &r.price, |r| &mut r.price)
///     .field(1, "amount", |r| &r.amount, |r| &mut r.amount)
///     .build()
///     .unwrap();
///
/// assert_eq!(map.width(), 2);
/// ```
pub struct PositionMapBuilder<T> {
    record: &'static str,
    fields: Vec<FieldDescriptor<T>>,
}

impl<T> fmt::Debug for PositionMapBuilder<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct(stringify!(PositionMapBuilder))
            .field("record", &self.record)
            .field("fields", &self.fields)
            .finish()
    }
}

impl<T: 'static> PositionMapBuilder<T> {
    #[must_use]
    pub fn new(record: &'static str) -> Self {
        Self {
            record,
            fields: Vec::new(),
        }
    }

    fn push(mut self, descriptor: FieldDescriptor<T>) -> Self {
        self.fields.push(descriptor);
        self
    }

    /// Binds a field converted by its type-level [`WireValue`] rules.
    #[must_use]
    pub fn field<F: WireValue + 'static>(
        self,
        index: usize,
        name: &'static str,
        get: fn(&T) -> &F,
        get_mut: fn(&mut T) -> &mut F,
    ) -> Self {
        self.push(FieldDescriptor {
            index,
            name,
            kind: FieldKind::Primitive,
            type_name: F::TYPE_NAME,
            has_codec: false,
            decode: boxed_decode(move |record, value, _| {
                match F::from_wire(value).map_err(|e| FieldError::Reason(e.to_string()))? {
                    Some(v) => {
                        *get_mut(record) = v;
                        Ok(Bound::Set)
                    }
                    None => Ok(Bound::Skipped),
                }
            }),
            encode: boxed_encode(move |record| {
                Ok(get(record).to_wire())
            }),
        })
    }

    /// Binds a field converted by a field-level codec instead of its type-level rules.
    #[must_use]
    pub fn field_with<F: 'static, C: FieldCodec<F>>(
        self,
        index: usize,
        name: &'static str,
        codec: C,
        get: fn(&T) -> &F,
        get_mut: fn(&mut T) -> &mut F,
    ) -> Self {
        let codec = Arc::new(codec);
        let encoder = Arc::clone(&codec);
        self.push(FieldDescriptor {
            index,
            name,
            kind: FieldKind::Primitive,
            type_name: std::any::type_name::<F>(),
            has_codec: true,
            decode: boxed_decode(move |record, value, _| {
                let v = codec
                    .decode(value)
                    .map_err(|e| FieldError::Reason(format!("{e:#}")))?;
                *get_mut(record) = v;
                Ok(Bound::Set)
            }),
            encode: boxed_encode(move |record| {
                encoder
                    .encode(get(record))
                    .map_err(|e| FieldError::Reason(format!("{e:#}")))
            }),
        })
    }

    /// Binds a nested record encoded as its own positional array.
    #[must_use]
    pub fn record<U: PositionalRecord>(
        self,
        index: usize,
        name: &'static str,
        get: fn(&T) -> &U,
        get_mut: fn(&mut T) -> &mut U,
    ) -> Self {
        self.push(FieldDescriptor {
            index,
            name,
            kind: FieldKind::Record,
            type_name: U::record_name(),
            has_codec: false,
            decode: boxed_decode(move |record, value, state| {
                *get_mut(record) = decode_record_slot::<U>(value, state)?;
                Ok(Bound::Set)
            }),
            encode: boxed_encode(move |record| {
                Ok(encode_record(get(record))?)
            }),
        })
    }

    /// Binds an optional nested record: a null slot decodes to `None` and `None` encodes as null.
    #[must_use]
    pub fn optional_record<U: PositionalRecord>(
        self,
        index: usize,
        name: &'static str,
        get: fn(&T) -> &Option<U>,
        get_mut: fn(&mut T) -> &mut Option<U>,
    ) -> Self {
        self.push(FieldDescriptor {
            index,
            name,
            kind: FieldKind::Record,
            type_name: U::record_name(),
            has_codec: false,
            decode: boxed_decode(move |record, value, state| {
                *get_mut(record) = if value.is_null() {
                    None
                } else {
                    Some(decode_record_slot::<U>(value, state)?)
                };
                Ok(Bound::Set)
            }),
            encode: boxed_encode(move |record| {
                match get(record) {
                    Some(inner) => Ok(encode_record(inner)?),
                    None => Ok(Value::Null),
                }
            }),
        })
    }

    /// Binds a list of nested records.
    ///
    /// The slot may hold an array of arrays (one record each), a single flat array (exactly
    /// one record) or an empty array (no records).
    #[must_use]
    pub fn list<U: PositionalRecord>(
        self,
        index: usize,
        name: &'static str,
        get: fn(&T) -> &Vec<U>,
        get_mut: fn(&mut T) -> &mut Vec<U>,
    ) -> Self {
        self.push(FieldDescriptor {
            index,
            name,
            kind: FieldKind::List,
            type_name: U::record_name(),
            has_codec: false,
            decode: boxed_decode(move |record, value, state| {
                *get_mut(record) = decode_list_slot::<U>(value, state)?;
                Ok(Bound::Set)
            }),
            encode: boxed_encode(move |record| {
                let items = get(record)
                    .iter()
                    .map(encode_record)
                    .collect::<ArrayCodecResult<Vec<_>>>()?;
                Ok(Value::Array(items))
            }),
        })
    }

    /// Validates the registered fields and produces the immutable map.
    ///
    /// # Errors
    ///
    /// Returns [`ArrayCodecError::DuplicateIndex`] if two fields claim the same index.
    pub fn build(self) -> ArrayCodecResult<PositionMap<T>> {
        let Self { record, mut fields } = self;

        // Stable sort keeps registration order among equal indices for the error report
        fields.sort_by_key(|field| field.index);

        if let Some(pair) = fields.windows(2).find(|pair| pair[0].index == pair[1].index) {
            return Err(ArrayCodecError::DuplicateIndex {
                record,
                index: pair[0].index,
                first: pair[0].name,
                second: pair[1].name,
            });
        }

        let by_index = fields
            .iter()
            .enumerate()
            .map(|(pos, field)| (field.index, pos))
            .collect();

        Ok(PositionMap {
            record,
            fields,
            by_index,
        })
    }
}
