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

//! Metadata model: wire types, struct and field descriptors, converters,
//! and service descriptors.
//!
//! Descriptors are built once and never mutated afterwards, so they are
//! shared freely between threads.

mod converter;
mod field;
mod service;
mod struct_;
mod thrift_type;

pub use converter::{Converter, JavaDateConverter, UnixDateConverter};
pub use field::{ConvertedField, Field, FieldSpec, PendingField, Presence, ThriftField};
pub use service::{MethodBuilder, ServiceBuilder, ThriftMethod, ThriftService, ThrowsClause};
pub use struct_::{StructSchema, ThriftStruct};
pub use thrift_type::{StructSlot, ThriftType};
