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

use std::collections::{LinkedList, VecDeque};

use crate::error::Error;
use crate::meta::ThriftType;
use crate::protocol::Protocol;
use crate::resolver::Resolution;
use crate::serializer::collection::{read_array, read_list, write_list};
use crate::serializer::{ThriftValue, TypeKind};

macro_rules! impl_list {
    ($($ty:ident),+) => {
        $(
            impl<T: ThriftValue> ThriftValue for $ty<T> {
                fn thrift_kind() -> TypeKind {
                    TypeKind::List(Resolution::resolve::<T>)
                }

                #[inline(always)]
                fn write_value(&self, ty: &ThriftType, protocol: &mut dyn Protocol) -> Result<(), Error> {
                    write_list(self.iter(), ty, protocol)
                }

                #[inline(always)]
                fn read_value(ty: &ThriftType, protocol: &mut dyn Protocol) -> Result<Self, Error> {
                    read_list(ty, protocol)
                }
            }
        )+
    };
}

impl_list!(Vec, VecDeque, LinkedList);

/// Fixed-length sequences. Same wire form as `Vec`; storage is reserved from
/// the wire count, capped, and never reallocated for short arrays.
impl<T: ThriftValue> ThriftValue for Box<[T]> {
    fn thrift_kind() -> TypeKind {
        TypeKind::Array(Resolution::resolve::<T>)
    }

    #[inline(always)]
    fn write_value(&self, ty: &ThriftType, protocol: &mut dyn Protocol) -> Result<(), Error> {
        write_list(self.iter(), ty, protocol)
    }

    fn read_value(ty: &ThriftType, protocol: &mut dyn Protocol) -> Result<Self, Error> {
        read_array(ty, protocol).map(Vec::into_boxed_slice)
    }
}
