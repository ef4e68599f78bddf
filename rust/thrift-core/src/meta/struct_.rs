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

use std::any::{Any, TypeId};
use std::collections::{HashMap, HashSet};
use std::fmt;

use tracing::debug;

use crate::error::{Error, ParseErrorKind};
use crate::meta::{FieldSpec, PendingField, ThriftField};
use crate::resolver::Resolution;
use crate::serializer::struct_::StructCodec;
use crate::types::StructHeader;

/// Resolved metadata of a struct, together with the compiled routines that
/// read and write its host type.
pub struct ThriftStruct {
    header: StructHeader,
    fields: Vec<ThriftField>,
    index: HashMap<i16, usize>,
    host_type: TypeId,
    host_name: &'static str,
    // StructCodec<T> for the host type T
    codec: Box<dyn Any + Send + Sync>,
}

impl ThriftStruct {
    pub fn name(&self) -> &str {
        &self.header.name
    }

    pub fn header(&self) -> &StructHeader {
        &self.header
    }

    /// Fields in declaration order, which is also the write order.
    pub fn fields(&self) -> &[ThriftField] {
        &self.fields
    }

    pub fn field(&self, id: i16) -> Option<&ThriftField> {
        self.position(id).map(|idx| &self.fields[idx])
    }

    #[inline(always)]
    pub(crate) fn position(&self, id: i16) -> Option<usize> {
        self.index.get(&id).copied()
    }

    /// Identity of the host type this struct materializes.
    pub fn host_type(&self) -> TypeId {
        self.host_type
    }

    pub fn host_name(&self) -> &'static str {
        self.host_name
    }

    pub(crate) fn codec<T: 'static>(&self) -> Result<&StructCodec<T>, Error> {
        self.codec.downcast_ref::<StructCodec<T>>().ok_or_else(|| {
            Error::invalid_argument(format!(
                "struct {} materializes {}, not {}",
                self.header.name,
                self.host_name,
                std::any::type_name::<T>()
            ))
        })
    }
}

impl fmt::Debug for ThriftStruct {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ThriftStruct")
            .field("name", &self.header.name)
            .field("host", &self.host_name)
            .field("fields", &self.fields)
            .finish()
    }
}

/// The declared shape of a struct: its wire name and fields, in write order.
///
/// ```rust
/// use thrift_core::meta::{Field, StructSchema};
///
/// #[derive(Default)]
/// struct Point {
///     x: i32,
///     y: i32,
/// }
///
/// let schema = StructSchema::new("Point")
///     .field(Field::new(1, "x", |p: &Point| &p.x, |p, v| p.x = v).required())
///     .field(Field::new(2, "y", |p: &Point| &p.y, |p, v| p.y = v).default_value(0));
/// assert_eq!(schema.len(), 2);
/// ```
pub struct StructSchema<T> {
    name: String,
    fields: Vec<PendingField<T>>,
}

impl<T: 'static> StructSchema<T> {
    pub fn new<S: Into<String>>(name: S) -> StructSchema<T> {
        StructSchema {
            name: name.into(),
            fields: Vec::new(),
        }
    }

    pub fn field<F: FieldSpec<T>>(mut self, field: F) -> Self {
        self.fields.push(field.into_pending());
        self
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn len(&self) -> usize {
        self.fields.len()
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    /// Resolves every field type and compiles the struct codec.
    pub(crate) fn compile(self, resolution: &mut Resolution) -> Result<ThriftStruct, Error> {
        let host_name = std::any::type_name::<T>();
        let mut fields = Vec::with_capacity(self.fields.len());
        let mut accessors = Vec::with_capacity(self.fields.len());
        let mut index = HashMap::with_capacity(self.fields.len());
        let mut names = HashSet::with_capacity(self.fields.len());
        for pending in self.fields {
            if index.insert(pending.id, fields.len()).is_some() {
                return Err(Error::parse(
                    ParseErrorKind::DuplicateFieldId(pending.id),
                    self.name.clone(),
                ));
            }
            if !names.insert(pending.name) {
                return Err(Error::parse(
                    ParseErrorKind::DuplicateFieldName,
                    self.name.clone(),
                ));
            }
            let wire_type = (pending.resolve)(resolution)?;
            if wire_type.is_void() {
                return Err(Error::parse(
                    ParseErrorKind::VoidNotAllowed,
                    self.name.clone(),
                ));
            }
            fields.push(ThriftField::new(
                pending.id,
                pending.name,
                pending.presence,
                pending.has_default,
                wire_type,
                pending.converter,
            ));
            accessors.push(pending.accessor);
        }
        debug!(
            name = %self.name,
            host = host_name,
            fields = fields.len(),
            "compiled struct codec"
        );
        Ok(ThriftStruct {
            header: StructHeader::new(self.name),
            fields,
            index,
            host_type: TypeId::of::<T>(),
            host_name,
            codec: Box::new(StructCodec::new(accessors)),
        })
    }
}
