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

use crate::error::{Error, ParseErrorKind};
use crate::meta::ThriftType;
use crate::protocol::Protocol;
use crate::serializer::{ThriftValue, TypeKind};
use crate::types::ThriftTypeId;

macro_rules! impl_primitive {
    ($($ty:ty => $id:ident, $write:ident, $read:ident);+ $(;)?) => {
        $(
            impl ThriftValue for $ty {
                #[inline(always)]
                fn thrift_kind() -> TypeKind {
                    TypeKind::Primitive(ThriftTypeId::$id)
                }

                #[inline(always)]
                fn write_value(&self, _ty: &ThriftType, protocol: &mut dyn Protocol) -> Result<(), Error> {
                    protocol.$write(*self)
                }

                #[inline(always)]
                fn read_value(_ty: &ThriftType, protocol: &mut dyn Protocol) -> Result<Self, Error> {
                    protocol.$read()
                }
            }
        )+
    };
}

impl_primitive! {
    bool => Boolean, write_bool, read_bool;
    i8 => SByte, write_i8, read_i8;
    i16 => Int16, write_i16, read_i16;
    i32 => Int32, write_i32, read_i32;
    i64 => Int64, write_i64, read_i64;
    f64 => Double, write_double, read_double;
}

// Value types without a wire counterpart. They classify so that resolution
// can report them, and refuse to be encoded.
macro_rules! impl_unknown_value {
    ($($ty:ty),+ $(,)?) => {
        $(
            impl ThriftValue for $ty {
                fn thrift_kind() -> TypeKind {
                    TypeKind::UnknownValue
                }

                fn write_value(&self, _ty: &ThriftType, _protocol: &mut dyn Protocol) -> Result<(), Error> {
                    Err(Error::parse(ParseErrorKind::UnknownValueType, stringify!($ty)))
                }

                fn read_value(_ty: &ThriftType, _protocol: &mut dyn Protocol) -> Result<Self, Error> {
                    Err(Error::parse(ParseErrorKind::UnknownValueType, stringify!($ty)))
                }
            }
        )+
    };
}

impl_unknown_value!(u8, u16, u32, u64, usize, isize, f32, char);

/// `()` is the void type: the return type of methods without a result.
impl ThriftValue for () {
    fn thrift_kind() -> TypeKind {
        TypeKind::Void
    }

    fn write_value(&self, _ty: &ThriftType, _protocol: &mut dyn Protocol) -> Result<(), Error> {
        Ok(())
    }

    fn read_value(_ty: &ThriftType, _protocol: &mut dyn Protocol) -> Result<Self, Error> {
        Ok(())
    }
}
