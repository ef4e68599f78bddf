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

//! Host-type serialization.
//!
//! Every type that can appear on the wire implements [`ThriftValue`]: it
//! reports how the [`TypeMapper`] should classify it and reads or writes
//! itself under the guidance of its resolved [`ThriftType`]. Structs are
//! declared with [`ThriftStructType`] plus [`thrift_struct!`](crate::thrift_struct)
//! and enums with [`thrift_enum!`](crate::thrift_enum); their codecs are
//! interpreters over the resolved field list, compiled once per type.

mod collection;
mod enum_;
mod list;
mod map;
mod number;
mod option;
mod set;
mod skip;
mod string;
pub(crate) mod struct_;

use bytes::Bytes;

use crate::error::Error;
use crate::meta::{StructSchema, ThriftType};
use crate::protocol::{BinaryProtocol, Protocol};
use crate::resolver::{CompileFn, ResolveFn, TypeMapper};
use crate::transport::MemoryTransport;
use crate::types::ThriftTypeId;

pub use enum_::{read_enum, write_enum};
pub use skip::skip;
pub use struct_::{compile_struct, read_struct_value, write_struct_value};

/// How a host type maps onto the wire, consumed by the [`TypeMapper`].
#[derive(Clone, Copy)]
pub enum TypeKind {
    Void,
    Nullable(ResolveFn),
    Primitive(ThriftTypeId),
    String,
    Binary,
    Enum,
    /// A value type with no wire counterpart. Resolving it is an error.
    UnknownValue,
    Map {
        key: ResolveFn,
        value: ResolveFn,
    },
    Set(ResolveFn),
    List(ResolveFn),
    Array(ResolveFn),
    /// Same wire type as the pointee.
    Boxed(ResolveFn),
    Struct(CompileFn),
}

pub trait ThriftValue: Sized + Send + Sync + 'static {
    fn thrift_kind() -> TypeKind;

    /// Writes `self` as a value of `ty`, which is the resolved type of `Self`.
    fn write_value(&self, ty: &ThriftType, protocol: &mut dyn Protocol) -> Result<(), Error>;

    fn read_value(ty: &ThriftType, protocol: &mut dyn Protocol) -> Result<Self, Error>;

    /// Whether this value is absent and must not be written.
    #[inline(always)]
    fn is_null(&self) -> bool {
        false
    }
}

/// A host struct with a declared field layout.
///
/// ```rust
/// use thrift_core::meta::{Field, StructSchema};
/// use thrift_core::serializer::{from_bytes, to_bytes, ThriftStructType};
/// use thrift_core::thrift_struct;
///
/// #[derive(Debug, Default, PartialEq)]
/// struct Greeting {
///     text: String,
/// }
///
/// impl ThriftStructType for Greeting {
///     fn describe() -> StructSchema<Self> {
///         StructSchema::new("Greeting")
///             .field(Field::new(1, "text", |g: &Greeting| &g.text, |g, v| g.text = v).required())
///     }
/// }
/// thrift_struct!(Greeting);
///
/// let bytes = to_bytes(&Greeting { text: "hi".into() }).unwrap();
/// assert_eq!(&bytes[..], &[0x0B, 0x00, 0x01, 0, 0, 0, 2, b'h', b'i', 0x00]);
/// assert_eq!(from_bytes::<Greeting>(&bytes).unwrap().text, "hi");
/// ```
pub trait ThriftStructType: ThriftValue + Default {
    fn describe() -> StructSchema<Self>;
}

/// Enums carried as their `i32` value, typically derived with `num_enum`.
pub trait ThriftEnum: Copy + Default + Into<i32> + TryFrom<i32> + Send + Sync + 'static {}

impl<E> ThriftEnum for E where E: Copy + Default + Into<i32> + TryFrom<i32> + Send + Sync + 'static
{}

/// Implements [`ThriftValue`] for types implementing [`ThriftStructType`].
#[macro_export]
macro_rules! thrift_struct {
    ($($ty:ty),+ $(,)?) => {
        $(
            impl $crate::serializer::ThriftValue for $ty {
                fn thrift_kind() -> $crate::serializer::TypeKind {
                    $crate::serializer::TypeKind::Struct($crate::serializer::compile_struct::<$ty>)
                }

                fn write_value(
                    &self,
                    ty: &$crate::meta::ThriftType,
                    protocol: &mut dyn $crate::protocol::Protocol,
                ) -> ::std::result::Result<(), $crate::error::Error> {
                    $crate::serializer::write_struct_value(self, ty, protocol)
                }

                fn read_value(
                    ty: &$crate::meta::ThriftType,
                    protocol: &mut dyn $crate::protocol::Protocol,
                ) -> ::std::result::Result<Self, $crate::error::Error> {
                    $crate::serializer::read_struct_value(ty, protocol)
                }
            }
        )+
    };
}

/// Implements [`ThriftValue`] for types implementing [`ThriftEnum`].
#[macro_export]
macro_rules! thrift_enum {
    ($($ty:ty),+ $(,)?) => {
        $(
            impl $crate::serializer::ThriftValue for $ty {
                fn thrift_kind() -> $crate::serializer::TypeKind {
                    $crate::serializer::TypeKind::Enum
                }

                fn write_value(
                    &self,
                    _ty: &$crate::meta::ThriftType,
                    protocol: &mut dyn $crate::protocol::Protocol,
                ) -> ::std::result::Result<(), $crate::error::Error> {
                    $crate::serializer::write_enum(self, protocol)
                }

                fn read_value(
                    _ty: &$crate::meta::ThriftType,
                    protocol: &mut dyn $crate::protocol::Protocol,
                ) -> ::std::result::Result<Self, $crate::error::Error> {
                    $crate::serializer::read_enum(protocol)
                }
            }
        )+
    };
}

pub fn write_struct<T: ThriftStructType>(
    value: &T,
    protocol: &mut dyn Protocol,
) -> Result<(), Error> {
    let ty = TypeMapper::resolve::<T>()?;
    value.write_value(&ty, protocol)
}

pub fn read_struct<T: ThriftStructType>(protocol: &mut dyn Protocol) -> Result<T, Error> {
    let ty = TypeMapper::resolve::<T>()?;
    T::read_value(&ty, protocol)
}

/// Encodes `value` with the binary protocol.
pub fn to_bytes<T: ThriftStructType>(value: &T) -> Result<Bytes, Error> {
    let mut protocol = BinaryProtocol::new(MemoryTransport::new());
    write_struct(value, &mut protocol)?;
    Ok(protocol.into_inner().into_written())
}

/// Decodes a binary protocol encoding of `T`.
pub fn from_bytes<T: ThriftStructType>(bytes: &[u8]) -> Result<T, Error> {
    let mut protocol = BinaryProtocol::new(MemoryTransport::from_bytes(Bytes::copy_from_slice(
        bytes,
    )));
    read_struct(&mut protocol)
}
