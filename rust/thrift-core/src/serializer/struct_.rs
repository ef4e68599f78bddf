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

//! Struct reader and writer.
//!
//! A struct codec is the list of erased per-field accessors built from a
//! [`StructSchema`](crate::meta::StructSchema) when the struct is resolved.
//! Writing walks the fields in declaration order and applies each field's
//! presence rules; reading dispatches incoming fields by id in whatever order
//! they arrive, then enforces required fields and applies defaults.

use tracing::trace;

use crate::ensure;
use crate::error::Error;
use crate::meta::{Presence, ThriftField, ThriftStruct, ThriftType};
use crate::protocol::Protocol;
use crate::resolver::Resolution;
use crate::serializer::{skip, ThriftStructType, ThriftValue};

pub(crate) type WriteFn<T> =
    Box<dyn Fn(&T, &str, &ThriftField, &mut dyn Protocol) -> Result<(), Error> + Send + Sync>;
pub(crate) type ReadFn<T> =
    Box<dyn Fn(&mut T, &ThriftField, &mut dyn Protocol) -> Result<(), Error> + Send + Sync>;
pub(crate) type DefaultFn<T> = Box<dyn Fn(&mut T) + Send + Sync>;

pub(crate) struct FieldAccessor<T> {
    /// Writes the field, header included, if its presence rules allow.
    pub(crate) write: WriteFn<T>,
    /// Reads the field value and stores it into the owner.
    pub(crate) read: ReadFn<T>,
    pub(crate) apply_default: Option<DefaultFn<T>>,
}

pub(crate) struct StructCodec<T> {
    // parallel to ThriftStruct::fields
    accessors: Vec<FieldAccessor<T>>,
}

impl<T> StructCodec<T> {
    pub(crate) fn new(accessors: Vec<FieldAccessor<T>>) -> StructCodec<T> {
        StructCodec { accessors }
    }

    pub(crate) fn write(
        &self,
        value: &T,
        definition: &ThriftStruct,
        protocol: &mut dyn Protocol,
    ) -> Result<(), Error> {
        protocol.inc_depth()?;
        let result = self.write_fields(value, definition, protocol);
        protocol.dec_depth();
        result
    }

    /// Reads one struct, one nesting level below the caller. Fails with
    /// [`Error::DepthExceeded`] instead of recursing past the protocol's
    /// recursion limit.
    pub(crate) fn read(
        &self,
        definition: &ThriftStruct,
        protocol: &mut dyn Protocol,
    ) -> Result<T, Error>
    where
        T: Default,
    {
        protocol.inc_depth()?;
        let result = self.read_fields(definition, protocol);
        protocol.dec_depth();
        result
    }

    fn write_fields(
        &self,
        value: &T,
        definition: &ThriftStruct,
        protocol: &mut dyn Protocol,
    ) -> Result<(), Error> {
        protocol.write_struct_begin(definition.header())?;
        for (field, accessor) in definition.fields().iter().zip(&self.accessors) {
            (accessor.write)(value, definition.name(), field, protocol)?;
        }
        protocol.write_field_stop()?;
        protocol.write_struct_end()
    }

    fn read_fields(
        &self,
        definition: &ThriftStruct,
        protocol: &mut dyn Protocol,
    ) -> Result<T, Error>
    where
        T: Default,
    {
        let fields = definition.fields();
        let mut value = T::default();
        let mut seen = vec![false; fields.len()];
        protocol.read_struct_begin()?;
        loop {
            let header = protocol.read_field_begin()?;
            if header.is_stop() {
                break;
            }
            match definition.position(header.id) {
                Some(idx) => {
                    let field = &fields[idx];
                    let expected = field.wire_type().id();
                    ensure!(
                        header.type_id == expected,
                        Error::type_id_mismatch(
                            definition.name(),
                            field.name(),
                            field.id(),
                            expected,
                            header.type_id,
                        )
                    );
                    (self.accessors[idx].read)(&mut value, field, protocol)?;
                    seen[idx] = true;
                }
                None => {
                    trace!(
                        struct_name = definition.name(),
                        field_id = header.id,
                        type_id = ?header.type_id,
                        "skipping unknown field"
                    );
                    skip(protocol, header.type_id)?;
                }
            }
            protocol.read_field_end()?;
        }
        protocol.read_struct_end()?;

        for ((field, accessor), seen) in fields.iter().zip(&self.accessors).zip(seen) {
            if seen {
                continue;
            }
            if field.presence() == Presence::Required {
                return Err(Error::missing_required_field(
                    definition.name(),
                    field.name(),
                ));
            }
            if let Some(apply_default) = &accessor.apply_default {
                apply_default(&mut value);
            }
        }
        Ok(value)
    }
}

/// Writes one field according to its presence rules. Nothing is written
/// when the value is rejected.
pub(crate) fn write_field<W: ThriftValue>(
    value: &W,
    is_default: bool,
    struct_name: &str,
    field: &ThriftField,
    protocol: &mut dyn Protocol,
) -> Result<(), Error> {
    match field.presence() {
        Presence::Always => {}
        Presence::Required => ensure!(
            !value.is_null(),
            Error::required_field_is_null(struct_name, field.name())
        ),
        Presence::Optional => {
            if value.is_null() || is_default {
                return Ok(());
            }
        }
    }
    protocol.write_field_begin(field.header())?;
    value.write_value(field.wire_type(), protocol)?;
    protocol.write_field_end()
}

#[doc(hidden)]
pub fn compile_struct<T: ThriftStructType>(
    resolution: &mut Resolution,
) -> Result<ThriftStruct, Error> {
    T::describe().compile(resolution)
}

#[doc(hidden)]
pub fn write_struct_value<T: ThriftStructType>(
    value: &T,
    ty: &ThriftType,
    protocol: &mut dyn Protocol,
) -> Result<(), Error> {
    let definition = ty.as_struct()?;
    definition.codec::<T>()?.write(value, definition, protocol)
}

#[doc(hidden)]
pub fn read_struct_value<T: ThriftStructType>(
    ty: &ThriftType,
    protocol: &mut dyn Protocol,
) -> Result<T, Error> {
    let definition = ty.as_struct()?;
    definition.codec::<T>()?.read(definition, protocol)
}
