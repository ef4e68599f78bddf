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

use num_enum::{IntoPrimitive, TryFromPrimitive};

use crate::error::Error;

/// Wire-level type tags. The discriminants are the Thrift wire constants.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, TryFromPrimitive, IntoPrimitive)]
#[repr(u8)]
pub enum ThriftTypeId {
    /// Stop marker, also the id of `void`.
    Empty = 0,
    Boolean = 2,
    SByte = 3,
    Double = 4,
    Int16 = 6,
    Int32 = 8,
    Int64 = 10,
    /// Raw bytes and UTF-8 strings.
    Binary = 11,
    Struct = 12,
    Map = 13,
    Set = 14,
    List = 15,
}

impl ThriftTypeId {
    #[inline(always)]
    pub fn from_wire(byte: u8) -> Result<ThriftTypeId, Error> {
        ThriftTypeId::try_from(byte)
            .map_err(|_| Error::invalid_data(format!("unknown type id {byte:#04x}")))
    }

    #[inline(always)]
    pub fn to_wire(self) -> u8 {
        self.into()
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, TryFromPrimitive, IntoPrimitive)]
#[repr(u8)]
pub enum MessageType {
    Call = 1,
    Reply = 2,
    Exception = 3,
    OneWay = 4,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct MessageHeader {
    pub name: String,
    pub message_type: MessageType,
    /// Always written as 0; request/response pairing is done by the transport.
    pub sequence_id: i32,
}

impl MessageHeader {
    pub fn new<S: Into<String>>(name: S, message_type: MessageType) -> MessageHeader {
        MessageHeader {
            name: name.into(),
            message_type,
            sequence_id: 0,
        }
    }
}

/// Struct headers carry no bytes in the binary protocol; the name only exists
/// for protocols that echo it.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct StructHeader {
    pub name: String,
}

impl StructHeader {
    pub fn new<S: Into<String>>(name: S) -> StructHeader {
        StructHeader { name: name.into() }
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct FieldHeader {
    pub name: String,
    pub type_id: ThriftTypeId,
    pub id: i16,
}

impl FieldHeader {
    pub fn new<S: Into<String>>(id: i16, name: S, type_id: ThriftTypeId) -> FieldHeader {
        FieldHeader {
            name: name.into(),
            type_id,
            id,
        }
    }

    pub fn stop() -> FieldHeader {
        FieldHeader {
            name: String::new(),
            type_id: ThriftTypeId::Empty,
            id: 0,
        }
    }

    #[inline(always)]
    pub fn is_stop(&self) -> bool {
        self.type_id == ThriftTypeId::Empty
    }
}

/// Header of a list or a set.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct CollectionHeader {
    pub element_type: ThriftTypeId,
    pub count: i32,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct MapHeader {
    pub key_type: ThriftTypeId,
    pub value_type: ThriftTypeId,
    pub count: i32,
}
