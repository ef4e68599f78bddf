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

use crate::error::Error;
use crate::meta::ThriftType;
use crate::protocol::Protocol;
use crate::resolver::Resolution;
use crate::serializer::{ThriftValue, TypeKind};

#[inline(always)]
fn wrapped(ty: &ThriftType) -> &ThriftType {
    match ty {
        ThriftType::Nullable(inner) => inner,
        other => other,
    }
}

impl<T: ThriftValue> ThriftValue for Option<T> {
    fn thrift_kind() -> TypeKind {
        TypeKind::Nullable(Resolution::resolve::<T>)
    }

    fn write_value(&self, ty: &ThriftType, protocol: &mut dyn Protocol) -> Result<(), Error> {
        match self {
            Some(value) => value.write_value(wrapped(ty), protocol),
            // absent values are filtered by the field presence rules
            None => Err(Error::invalid_argument(
                "a null value has no wire representation",
            )),
        }
    }

    fn read_value(ty: &ThriftType, protocol: &mut dyn Protocol) -> Result<Self, Error> {
        T::read_value(wrapped(ty), protocol).map(Some)
    }

    #[inline(always)]
    fn is_null(&self) -> bool {
        self.is_none()
    }
}

impl<T: ThriftValue> ThriftValue for Box<T> {
    fn thrift_kind() -> TypeKind {
        TypeKind::Boxed(Resolution::resolve::<T>)
    }

    #[inline(always)]
    fn write_value(&self, ty: &ThriftType, protocol: &mut dyn Protocol) -> Result<(), Error> {
        T::write_value(self, ty, protocol)
    }

    #[inline(always)]
    fn read_value(ty: &ThriftType, protocol: &mut dyn Protocol) -> Result<Self, Error> {
        T::read_value(ty, protocol).map(Box::new)
    }

    #[inline(always)]
    fn is_null(&self) -> bool {
        T::is_null(self)
    }
}
