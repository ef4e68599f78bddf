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

//! Protocol abstraction.
//!
//! [`Protocol`] is the uniform interface the struct reader/writer and the RPC
//! framing are written against. The end-of-X tokens exist for protocols that
//! need them; [`BinaryProtocol`] treats them as no-ops.

mod binary;

use async_trait::async_trait;
use bytes::Bytes;

use crate::error::Error;
use crate::types::{CollectionHeader, FieldHeader, MapHeader, MessageHeader, StructHeader};

pub use binary::{BinaryProtocol, VERSION_1, VERSION_MASK};

#[async_trait]
pub trait Protocol: Send {
    fn write_message_begin(&mut self, header: &MessageHeader) -> Result<(), Error>;
    fn write_message_end(&mut self) -> Result<(), Error>;
    fn write_struct_begin(&mut self, header: &StructHeader) -> Result<(), Error>;
    fn write_struct_end(&mut self) -> Result<(), Error>;
    fn write_field_begin(&mut self, header: &FieldHeader) -> Result<(), Error>;
    fn write_field_end(&mut self) -> Result<(), Error>;
    fn write_field_stop(&mut self) -> Result<(), Error>;
    fn write_list_begin(&mut self, header: &CollectionHeader) -> Result<(), Error>;
    fn write_list_end(&mut self) -> Result<(), Error>;
    fn write_set_begin(&mut self, header: &CollectionHeader) -> Result<(), Error>;
    fn write_set_end(&mut self) -> Result<(), Error>;
    fn write_map_begin(&mut self, header: &MapHeader) -> Result<(), Error>;
    fn write_map_end(&mut self) -> Result<(), Error>;
    fn write_bool(&mut self, value: bool) -> Result<(), Error>;
    fn write_i8(&mut self, value: i8) -> Result<(), Error>;
    fn write_i16(&mut self, value: i16) -> Result<(), Error>;
    fn write_i32(&mut self, value: i32) -> Result<(), Error>;
    fn write_i64(&mut self, value: i64) -> Result<(), Error>;
    fn write_double(&mut self, value: f64) -> Result<(), Error>;
    fn write_string(&mut self, value: &str) -> Result<(), Error>;
    fn write_binary(&mut self, value: &[u8]) -> Result<(), Error>;

    fn read_message_begin(&mut self) -> Result<MessageHeader, Error>;
    fn read_message_end(&mut self) -> Result<(), Error>;
    fn read_struct_begin(&mut self) -> Result<StructHeader, Error>;
    fn read_struct_end(&mut self) -> Result<(), Error>;
    /// Returns a header whose type id is `Empty` at the stop marker.
    fn read_field_begin(&mut self) -> Result<FieldHeader, Error>;
    fn read_field_end(&mut self) -> Result<(), Error>;
    fn read_list_begin(&mut self) -> Result<CollectionHeader, Error>;
    fn read_list_end(&mut self) -> Result<(), Error>;
    fn read_set_begin(&mut self) -> Result<CollectionHeader, Error>;
    fn read_set_end(&mut self) -> Result<(), Error>;
    fn read_map_begin(&mut self) -> Result<MapHeader, Error>;
    fn read_map_end(&mut self) -> Result<(), Error>;
    fn read_bool(&mut self) -> Result<bool, Error>;
    fn read_i8(&mut self) -> Result<i8, Error>;
    fn read_i16(&mut self) -> Result<i16, Error>;
    fn read_i32(&mut self) -> Result<i32, Error>;
    fn read_i64(&mut self) -> Result<i64, Error>;
    fn read_double(&mut self) -> Result<f64, Error>;
    fn read_string(&mut self) -> Result<String, Error>;
    fn read_binary(&mut self) -> Result<Bytes, Error>;

    /// Maximum struct nesting depth, for typed values and skipped ones alike.
    fn recursion_limit(&self) -> usize {
        64
    }

    /// Enters one struct level, failing with [`Error::DepthExceeded`] once
    /// [`Protocol::recursion_limit`] levels are open.
    fn inc_depth(&mut self) -> Result<(), Error>;

    /// Leaves the level opened by the matching [`Protocol::inc_depth`].
    fn dec_depth(&mut self);

    /// Commits the written request and makes the response readable.
    async fn flush_and_read(&mut self) -> Result<(), Error>;
}
