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

//! Memoized mapping from host types to wire types.
//!
//! Resolution runs in a [`Resolution`] session. Every type classified during
//! the session is first recorded in the session's pending table; a struct is
//! recorded as a placeholder before its fields are resolved, so a struct
//! reachable from itself terminates on the placeholder. Only when the
//! outermost resolution succeeds are the pending entries published to the
//! process-wide cache, first writer wins. A failed session publishes nothing,
//! so the cache never holds a half-built type.

use std::any::TypeId;
use std::collections::HashMap;
use std::sync::{Arc, LazyLock};

use parking_lot::RwLock;
use tracing::debug;

use crate::error::{Error, ParseErrorKind};
use crate::meta::{StructSlot, ThriftService, ThriftStruct, ThriftType};
use crate::rpc::ThriftServiceType;
use crate::serializer::{ThriftValue, TypeKind};

/// Resolves a child type inside the current session.
pub type ResolveFn = fn(&mut Resolution) -> Result<Arc<ThriftType>, Error>;

/// Builds the definition of a struct host type inside the current session.
pub type CompileFn = fn(&mut Resolution) -> Result<ThriftStruct, Error>;

static TYPES: LazyLock<RwLock<HashMap<TypeId, Arc<ThriftType>>>> =
    LazyLock::new(|| RwLock::new(HashMap::new()));

static SERVICES: LazyLock<RwLock<HashMap<TypeId, Arc<ThriftService>>>> =
    LazyLock::new(|| RwLock::new(HashMap::new()));

/// Entry point to the process-wide type and service caches.
pub struct TypeMapper;

impl TypeMapper {
    /// The wire type of `T`, resolving and caching it on first use.
    pub fn resolve<T: ThriftValue>() -> Result<Arc<ThriftType>, Error> {
        let id = TypeId::of::<T>();
        if let Some(ty) = TYPES.read().get(&id) {
            return Ok(ty.clone());
        }
        let mut resolution = Resolution::default();
        let resolved = resolution.resolve::<T>()?;
        resolution.publish();
        // another thread may have published first; hand out its entry
        Ok(TYPES.read().get(&id).cloned().unwrap_or(resolved))
    }

    /// Runs `f` in a fresh session and publishes what it resolved if it
    /// succeeds.
    pub fn with_resolution<R, F>(f: F) -> Result<R, Error>
    where
        F: FnOnce(&mut Resolution) -> Result<R, Error>,
    {
        let mut resolution = Resolution::default();
        let out = f(&mut resolution)?;
        resolution.publish();
        Ok(out)
    }

    /// The struct definition of `T`. Fails if `T` does not map to a struct.
    pub fn struct_of<T: ThriftValue>() -> Result<Arc<ThriftStruct>, Error> {
        match &*Self::resolve::<T>()? {
            ThriftType::Struct(slot) => slot.get().cloned(),
            _ => Err(Error::parse(
                ParseErrorKind::NotAStruct,
                std::any::type_name::<T>(),
            )),
        }
    }

    /// The cached wire type of `T`, without resolving it.
    pub fn cached<T: 'static>() -> Option<Arc<ThriftType>> {
        TYPES.read().get(&TypeId::of::<T>()).cloned()
    }

    /// The service descriptor of `S`, built and cached on first use.
    pub fn service<S: ThriftServiceType>() -> Result<Arc<ThriftService>, Error> {
        let id = TypeId::of::<S>();
        if let Some(service) = SERVICES.read().get(&id) {
            return Ok(service.clone());
        }
        let service = Arc::new(S::describe().build()?);
        debug!(service = service.name(), "resolved service");
        Ok(SERVICES.write().entry(id).or_insert(service).clone())
    }
}

/// One resolution session. See the module documentation.
#[derive(Default)]
pub struct Resolution {
    pending: HashMap<TypeId, Arc<ThriftType>>,
}

impl Resolution {
    pub fn resolve<T: ThriftValue>(&mut self) -> Result<Arc<ThriftType>, Error> {
        let id = TypeId::of::<T>();
        if let Some(ty) = self.lookup(&id) {
            return Ok(ty);
        }
        let type_name = std::any::type_name::<T>();
        let ty = match T::thrift_kind() {
            TypeKind::Void => Arc::new(ThriftType::Void),
            TypeKind::Nullable(inner) => {
                let inner = inner(self)?;
                if inner.is_void() {
                    return Err(Error::parse(ParseErrorKind::VoidNotAllowed, type_name));
                }
                Arc::new(ThriftType::Nullable(inner))
            }
            TypeKind::Primitive(type_id) => Arc::new(ThriftType::Primitive(type_id)),
            TypeKind::String => Arc::new(ThriftType::String),
            TypeKind::Binary => Arc::new(ThriftType::Binary),
            TypeKind::Enum => Arc::new(ThriftType::Enum),
            TypeKind::UnknownValue => {
                return Err(Error::parse(ParseErrorKind::UnknownValueType, type_name));
            }
            TypeKind::Map { key, value } => {
                let key = key(self)?;
                let value = value(self)?;
                if key.is_void() || value.is_void() {
                    return Err(Error::parse(ParseErrorKind::UnsupportedMapType, type_name));
                }
                Arc::new(ThriftType::Map { key, value })
            }
            TypeKind::Set(element) => {
                let element = element(self)?;
                if element.is_void() {
                    return Err(Error::parse(ParseErrorKind::UnsupportedSetType, type_name));
                }
                Arc::new(ThriftType::Set(element))
            }
            TypeKind::List(element) => self.resolve_list(element, false, type_name)?,
            TypeKind::Array(element) => self.resolve_list(element, true, type_name)?,
            TypeKind::Boxed(inner) => inner(self)?,
            TypeKind::Struct(compile) => return self.resolve_struct(id, type_name, compile),
        };
        self.pending.insert(id, ty.clone());
        Ok(ty)
    }

    fn resolve_list(
        &mut self,
        element: ResolveFn,
        array: bool,
        type_name: &'static str,
    ) -> Result<Arc<ThriftType>, Error> {
        let element = element(self)?;
        if element.is_void() {
            return Err(Error::parse(ParseErrorKind::UnsupportedListType, type_name));
        }
        Ok(Arc::new(ThriftType::List { element, array }))
    }

    fn resolve_struct(
        &mut self,
        id: TypeId,
        type_name: &'static str,
        compile: CompileFn,
    ) -> Result<Arc<ThriftType>, Error> {
        let slot = Arc::new(StructSlot::new(type_name));
        let ty = Arc::new(ThriftType::Struct(slot.clone()));
        // registered before the fields so self references land on the slot
        self.pending.insert(id, ty.clone());
        let definition = compile(self)?;
        slot.fill(Arc::new(definition));
        Ok(ty)
    }

    fn lookup(&self, id: &TypeId) -> Option<Arc<ThriftType>> {
        self.pending
            .get(id)
            .cloned()
            .or_else(|| TYPES.read().get(id).cloned())
    }

    fn publish(self) {
        if self.pending.is_empty() {
            return;
        }
        let mut types = TYPES.write();
        for (id, ty) in self.pending {
            types.entry(id).or_insert_with(|| {
                debug!(type_id = ?ty.id(), "published resolved type");
                ty
            });
        }
    }
}
