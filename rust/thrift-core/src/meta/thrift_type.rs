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

use std::fmt;
use std::sync::{Arc, OnceLock};

use crate::error::Error;
use crate::meta::ThriftStruct;
use crate::types::ThriftTypeId;

/// Wire-level description of a host type, produced once per type by the
/// [`TypeMapper`](crate::resolver::TypeMapper) and shared afterwards.
#[derive(Debug)]
pub enum ThriftType {
    /// The absence of a value; only legal as a method return type.
    Void,
    /// `bool`, `i8`, `f64`, `i16`, `i32` or `i64`.
    Primitive(ThriftTypeId),
    /// UTF-8 text. Shares the `Binary` id with raw bytes.
    String,
    Binary,
    /// An enum carried as its `i32` value.
    Enum,
    /// A value that may be absent. Has the wire id of the wrapped type.
    Nullable(Arc<ThriftType>),
    /// A sequence. `array` marks fixed-length storage allocated at the wire
    /// count rather than grown element by element.
    List {
        element: Arc<ThriftType>,
        array: bool,
    },
    Set(Arc<ThriftType>),
    Map {
        key: Arc<ThriftType>,
        value: Arc<ThriftType>,
    },
    Struct(Arc<StructSlot>),
}

impl ThriftType {
    pub fn id(&self) -> ThriftTypeId {
        match self {
            ThriftType::Void => ThriftTypeId::Empty,
            ThriftType::Primitive(id) => *id,
            ThriftType::String | ThriftType::Binary => ThriftTypeId::Binary,
            ThriftType::Enum => ThriftTypeId::Int32,
            ThriftType::Nullable(inner) => inner.id(),
            ThriftType::List { .. } => ThriftTypeId::List,
            ThriftType::Set(_) => ThriftTypeId::Set,
            ThriftType::Map { .. } => ThriftTypeId::Map,
            ThriftType::Struct(_) => ThriftTypeId::Struct,
        }
    }

    pub fn is_void(&self) -> bool {
        matches!(self, ThriftType::Void)
    }

    pub fn is_struct(&self) -> bool {
        matches!(self, ThriftType::Struct(_))
    }

    /// The wrapped type of a nullable, or the type itself.
    pub fn non_null(&self) -> &ThriftType {
        match self {
            ThriftType::Nullable(inner) => inner.non_null(),
            other => other,
        }
    }

    pub fn element(&self) -> Result<&Arc<ThriftType>, Error> {
        match self {
            ThriftType::List { element, .. } | ThriftType::Set(element) => Ok(element),
            other => Err(Error::invalid_data(format!(
                "expected a list or set type, found {:?}",
                other.id()
            ))),
        }
    }

    pub fn key_value(&self) -> Result<(&Arc<ThriftType>, &Arc<ThriftType>), Error> {
        match self {
            ThriftType::Map { key, value } => Ok((key, value)),
            other => Err(Error::invalid_data(format!(
                "expected a map type, found {:?}",
                other.id()
            ))),
        }
    }

    /// The struct definition behind a `Struct` type.
    pub fn as_struct(&self) -> Result<&Arc<ThriftStruct>, Error> {
        match self {
            ThriftType::Struct(slot) => slot.get(),
            other => Err(Error::invalid_data(format!(
                "expected a struct type, found {:?}",
                other.id()
            ))),
        }
    }
}

/// Late-bound struct reference.
///
/// The slot is registered before the struct's fields are resolved so that a
/// struct reachable from its own fields resolves to the same slot instead of
/// recursing forever. It is filled exactly once, before the type is published.
pub struct StructSlot {
    type_name: &'static str,
    definition: OnceLock<Arc<ThriftStruct>>,
}

impl StructSlot {
    pub(crate) fn new(type_name: &'static str) -> StructSlot {
        StructSlot {
            type_name,
            definition: OnceLock::new(),
        }
    }

    pub fn type_name(&self) -> &'static str {
        self.type_name
    }

    pub(crate) fn fill(&self, definition: Arc<ThriftStruct>) {
        // a slot belongs to exactly one resolution, which fills it once
        let _ = self.definition.set(definition);
    }

    pub fn get(&self) -> Result<&Arc<ThriftStruct>, Error> {
        self.definition.get().ok_or_else(|| {
            Error::invalid_data(format!(
                "struct {} used before its definition was resolved",
                self.type_name
            ))
        })
    }
}

impl fmt::Debug for StructSlot {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        // never print the definition, it may refer back to this slot
        f.debug_tuple("StructSlot").field(&self.type_name).finish()
    }
}
