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

//! # Thrift Core
//!
//! A Thrift binary-protocol serializer and RPC client driven by declared
//! metadata. Host types describe their wire layout once; the crate derives
//! wire types from those descriptions, compiles a reader and a writer per
//! struct, and reuses them for every value and every call.
//!
//! ## Architecture
//!
//! - **`types`**: wire type ids, message types and header records
//! - **`protocol`**: the `Protocol` interface and the binary protocol codec
//! - **`transport`**: the byte transport boundary and an in-memory transport
//! - **`meta`**: struct, field, converter and service descriptors
//! - **`resolver`**: memoized mapping from host types to wire types
//! - **`serializer`**: value codecs, the struct reader/writer and skipping
//! - **`rpc`**: call framing over synthetic argument and result structs
//! - **`config`**: protocol limits and strictness
//! - **`error`**: the crate error type
//!
//! ## Key Concepts
//!
//! ### Declaring types
//!
//! Structs implement [`ThriftStructType`](serializer::ThriftStructType) and
//! list their fields with [`Field`](meta::Field) builders; enums carried as
//! `i32` only need `num_enum` derives. The `thrift_struct!` and
//! `thrift_enum!` macros connect both to the serializer.
//!
//! ### Resolution
//!
//! The first use of a type resolves it into a [`ThriftType`](meta::ThriftType)
//! graph, published to a process-wide cache once complete. Self-referential
//! structs resolve through a placeholder registered before their fields.
//!
//! ### Presence
//!
//! Required fields must be set on write and present on read. Optional fields
//! are skipped on write when unset or equal to their default, and take their
//! default on read when absent. Unknown fields are skipped structurally.
//!
//! ## Usage
//!
//! ```rust
//! use num_enum::{IntoPrimitive, TryFromPrimitive};
//! use thrift_core::meta::{Field, StructSchema};
//! use thrift_core::serializer::{from_bytes, to_bytes, ThriftStructType};
//! use thrift_core::{thrift_enum, thrift_struct};
//!
//! #[derive(Clone, Copy, Debug, PartialEq, IntoPrimitive, TryFromPrimitive)]
//! #[repr(i32)]
//! enum Color {
//!     Red = 0,
//!     Green = 1,
//! }
//!
//! impl Default for Color {
//!     fn default() -> Self {
//!         Color::Red
//!     }
//! }
//! thrift_enum!(Color);
//!
//! #[derive(Debug, Default, PartialEq)]
//! struct Pixel {
//!     x: i32,
//!     color: Color,
//!     label: Option<String>,
//! }
//!
//! impl ThriftStructType for Pixel {
//!     fn describe() -> StructSchema<Self> {
//!         StructSchema::new("Pixel")
//!             .field(Field::new(1, "x", |p: &Pixel| &p.x, |p, v| p.x = v).required())
//!             .field(Field::new(2, "color", |p: &Pixel| &p.color, |p, v| p.color = v))
//!             .field(Field::new(3, "label", |p: &Pixel| &p.label, |p, v| p.label = v))
//!     }
//! }
//! thrift_struct!(Pixel);
//!
//! let pixel = Pixel { x: 3, color: Color::Green, label: None };
//! let bytes = to_bytes(&pixel).unwrap();
//! assert_eq!(from_bytes::<Pixel>(&bytes).unwrap(), pixel);
//! ```

pub mod config;
pub mod error;
pub mod meta;
pub mod protocol;
pub mod resolver;
pub mod rpc;
pub mod serializer;
pub mod transport;
pub mod types;

pub use config::ProtocolConfig;
pub use error::Error;
pub use protocol::{BinaryProtocol, Protocol};
pub use rpc::{call_method, CallArgs, Client};
pub use transport::{MemoryTransport, Transport};
