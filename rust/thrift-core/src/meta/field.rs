// Licensed to the Apache Software Foundation (ASF) under one
// or more contributor license agreements.  See the NOTICE file
// distributed with this work for additional information
// regarding copyright ownership.  The ASF licenses this file
// to you under the Apache License, Version 2.0 (the
// "License"); you may not use this file except in compliance
// with the License.  You may obtain a copy of the License at
//
//   http://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing,
// software distributed under the License is distributed on an
// "AS IS" BASIS, WITHOUT WARRANTIES OR CONDITIONS OF ANY
// KIND, either express or implied.  See the License for the
// specific language governing permissions and limitations
// under the License.

use std::sync::Arc;

use crate::error::Error;
use crate::meta::{Converter, ThriftType};
use crate::protocol::Protocol;
use crate::resolver::{Resolution, ResolveFn};
use crate::serializer::struct_::{write_field, DefaultFn, FieldAccessor};
use crate::serializer::ThriftValue;
use crate::types::FieldHeader;

/// When a field is put on the wire.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Presence {
    /// Written unconditionally. Used for method parameters.
    Always,
    /// Must be set when writing and present when reading.
    Required,
    /// Written only when set and different from its default.
    Optional,
}

/// Resolved metadata of one struct field.
#[derive(Debug)]
pub struct ThriftField {
    header: FieldHeader,
    presence: Presence,
    has_default: bool,
    wire_type: Arc<ThriftType>,
    converter: Option<&'static str>,
}

impl ThriftField {
    pub(crate) fn new(
        id: i16,
        name: &str,
        presence: Presence,
        has_default: bool,
        wire_type: Arc<ThriftType>,
        converter: Option<&'static str>,
    ) -> ThriftField {
        ThriftField {
            header: FieldHeader::new(id, name, wire_type.id()),
            presence,
            has_default,
            wire_type,
            converter,
        }
    }

    #[inline(always)]
    pub fn id(&self) -> i16 {
        self.header.id
    }

    #[inline(always)]
    pub fn name(&self) -> &str {
        &self.header.name
    }

    /// The header written in front of the field's value.
    #[inline(always)]
    pub fn header(&self) -> &FieldHeader {
        &self.header
    }

    pub fn presence(&self) -> Presence {
        self.presence
    }

    pub fn is_required(&self) -> bool {
        self.presence == Presence::Required
    }

    pub fn has_default(&self) -> bool {
        self.has_default
    }

    #[inline(always)]
    pub fn wire_type(&self) -> &Arc<ThriftType> {
        &self.wire_type
    }

    /// Name of the converter between the wire type and the host type, if any.
    pub fn converter(&self) -> Option<&'static str> {
        self.converter
    }
}

/// A field declaration that has not been resolved yet: its wire type is
/// known only as a resolution function, and its accessors are erased.
pub struct PendingField<T> {
    pub(crate) id: i16,
    pub(crate) name: &'static str,
    pub(crate) presence: Presence,
    pub(crate) has_default: bool,
    pub(crate) converter: Option<&'static str>,
    pub(crate) resolve: ResolveFn,
    pub(crate) accessor: FieldAccessor<T>,
}

/// Anything that can be added to a [`StructSchema`](crate::meta::StructSchema).
pub trait FieldSpec<T> {
    fn into_pending(self) -> PendingField<T>;
}

impl<T> FieldSpec<T> for PendingField<T> {
    fn into_pending(self) -> PendingField<T> {
        self
    }
}

/// Declares a struct field backed by a member of `T`.
///
/// ```rust
/// use thrift_core::meta::Field;
///
/// #[derive(Default)]
/// struct User {
///     id: i64,
///     name: Option<String>,
/// }
///
/// let id = Field::new(1, "id", |u: &User| &u.id, |u, v| u.id = v).required();
/// let name = Field::new(2, "name", |u: &User| &u.name, |u, v| u.name = v);
/// ```
pub struct Field<T, M> {
    id: i16,
    name: &'static str,
    presence: Presence,
    get: fn(&T) -> &M,
    set: fn(&mut T, M),
    default: Option<M>,
}

impl<T, M> Field<T, M> {
    pub fn new(id: i16, name: &'static str, get: fn(&T) -> &M, set: fn(&mut T, M)) -> Self {
        Field {
            id,
            name,
            presence: Presence::Optional,
            get,
            set,
            default: None,
        }
    }

    pub fn required(mut self) -> Self {
        self.presence = Presence::Required;
        self
    }

    /// Value applied when the field is absent on read, and omitted on write.
    pub fn default_value(mut self, value: M) -> Self {
        self.default = Some(value);
        self
    }

    /// Puts `C::Wire` on the wire instead of the member type.
    pub fn with_converter<C>(self, converter: C) -> ConvertedField<T, C>
    where
        C: Converter<Model = M>,
    {
        ConvertedField {
            field: self,
            converter: Arc::new(converter),
        }
    }
}

impl<T, M> FieldSpec<T> for Field<T, M>
where
    T: 'static,
    M: ThriftValue + PartialEq + Clone,
{
    fn into_pending(self) -> PendingField<T> {
        let Field {
            id,
            name,
            presence,
            get,
            set,
            default,
        } = self;
        let has_default = default.is_some();
        let apply_default = default.clone().map(|value| {
            Box::new(move |owner: &mut T| set(owner, value.clone())) as DefaultFn<T>
        });
        let write = move |owner: &T,
                          struct_name: &str,
                          field: &ThriftField,
                          protocol: &mut dyn Protocol| {
            let value = get(owner);
            let is_default = default.as_ref() == Some(value);
            write_field(value, is_default, struct_name, field, protocol)
        };
        let read = move |owner: &mut T, field: &ThriftField, protocol: &mut dyn Protocol| {
            set(owner, M::read_value(field.wire_type(), protocol)?);
            Ok::<_, Error>(())
        };
        PendingField {
            id,
            name,
            presence,
            has_default,
            converter: None,
            resolve: Resolution::resolve::<M>,
            accessor: FieldAccessor {
                write: Box::new(write),
                read: Box::new(read),
                apply_default,
            },
        }
    }
}

/// A field whose member type differs from its wire type.
pub struct ConvertedField<T, C: Converter> {
    field: Field<T, C::Model>,
    converter: Arc<C>,
}

impl<T, C: Converter> ConvertedField<T, C> {
    pub fn required(mut self) -> Self {
        self.field = self.field.required();
        self
    }

    pub fn default_value(mut self, value: C::Model) -> Self {
        self.field = self.field.default_value(value);
        self
    }
}

impl<T, C> FieldSpec<T> for ConvertedField<T, C>
where
    T: 'static,
    C: Converter,
    C::Model: PartialEq + Clone,
{
    fn into_pending(self) -> PendingField<T> {
        let ConvertedField { field, converter } = self;
        let Field {
            id,
            name,
            presence,
            get,
            set,
            default,
        } = field;
        let has_default = default.is_some();
        let apply_default = default.clone().map(|value| {
            Box::new(move |owner: &mut T| set(owner, value.clone())) as DefaultFn<T>
        });
        let converter_name = converter.name();
        let writer = converter.clone();
        let write = move |owner: &T,
                          struct_name: &str,
                          field: &ThriftField,
                          protocol: &mut dyn Protocol| {
            let model = get(owner);
            let is_default = default.as_ref() == Some(model);
            let wire = writer.convert_back(model);
            write_field(&wire, is_default, struct_name, field, protocol)
        };
        let read = move |owner: &mut T, field: &ThriftField, protocol: &mut dyn Protocol| {
            let wire = C::Wire::read_value(field.wire_type(), protocol)?;
            set(owner, converter.convert(wire));
            Ok::<_, Error>(())
        };
        PendingField {
            id,
            name,
            presence,
            has_default,
            converter: Some(converter_name),
            resolve: Resolution::resolve::<C::Wire>,
            accessor: FieldAccessor {
                write: Box::new(write),
                read: Box::new(read),
                apply_default,
            },
        }
    }
}
