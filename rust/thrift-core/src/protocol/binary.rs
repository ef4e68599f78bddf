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

use async_trait::async_trait;
use byteorder::{BigEndian, ByteOrder};
use bytes::Bytes;

use super::Protocol;
use crate::config::ProtocolConfig;
use crate::ensure;
use crate::error::Error;
use crate::rpc::{ApplicationException, ApplicationExceptionType};
use crate::transport::Transport;
use crate::types::{
    CollectionHeader, FieldHeader, MapHeader, MessageHeader, MessageType, StructHeader,
    ThriftTypeId,
};

/// Version word of the strict message header.
pub const VERSION_1: u32 = 0x8001_0000;
pub const VERSION_MASK: u32 = 0xffff_0000;

const READ_CHUNK: usize = 64 * 1024;

/// Thrift binary protocol: big-endian fixed-width integers, length-prefixed
/// strings, no struct framing.
#[derive(Debug)]
pub struct BinaryProtocol<T> {
    transport: T,
    config: ProtocolConfig,
    // no primitive needs more than 8 bytes
    scratch: [u8; 8],
    // open struct levels
    depth: usize,
}

impl<T: Transport> BinaryProtocol<T> {
    pub fn new(transport: T) -> BinaryProtocol<T> {
        Self::with_config(transport, ProtocolConfig::default())
    }

    pub fn with_config(transport: T, config: ProtocolConfig) -> BinaryProtocol<T> {
        BinaryProtocol {
            transport,
            config,
            scratch: [0; 8],
            depth: 0,
        }
    }

    pub fn config(&self) -> &ProtocolConfig {
        &self.config
    }

    pub fn transport(&self) -> &T {
        &self.transport
    }

    pub fn transport_mut(&mut self) -> &mut T {
        &mut self.transport
    }

    pub fn into_inner(self) -> T {
        self.transport
    }

    #[inline(always)]
    fn write_scratch(&mut self, len: usize) -> Result<(), Error> {
        self.transport
            .write_bytes(&self.scratch[..len])
            .map_err(Error::transport)
    }

    #[inline(always)]
    fn read_scratch(&mut self, len: usize) -> Result<(), Error> {
        self.transport
            .read_bytes(&mut self.scratch[..len])
            .map_err(Error::transport)
    }

    #[inline(always)]
    fn write_byte(&mut self, value: u8) -> Result<(), Error> {
        self.scratch[0] = value;
        self.write_scratch(1)
    }

    #[inline(always)]
    fn read_byte(&mut self) -> Result<u8, Error> {
        self.read_scratch(1)?;
        Ok(self.scratch[0])
    }

    fn read_type_id(&mut self) -> Result<ThriftTypeId, Error> {
        let byte = self.read_byte()?;
        ThriftTypeId::from_wire(byte)
    }

    fn read_size(&mut self, limit: Option<usize>, what: &str) -> Result<usize, Error> {
        let size = self.read_i32()?;
        ensure!(
            size >= 0,
            Error::invalid_data(format!("negative {what} size {size}"))
        );
        let size = size as usize;
        if let Some(limit) = limit {
            ensure!(
                size <= limit,
                Error::invalid_data(format!("{what} size {size} exceeds limit {limit}"))
            );
        }
        Ok(size)
    }

    fn write_size(&mut self, size: usize, what: &str) -> Result<(), Error> {
        let size = i32::try_from(size)
            .map_err(|_| Error::invalid_data(format!("{what} size {size} does not fit in i32")))?;
        self.write_i32(size)
    }

    /// Reads `len` bytes, growing the buffer one chunk at a time so a forged
    /// length cannot allocate more than the stream actually carries.
    fn read_vec(&mut self, len: usize) -> Result<Vec<u8>, Error> {
        let mut buf = Vec::with_capacity(len.min(READ_CHUNK));
        while buf.len() < len {
            let start = buf.len();
            let end = len.min(start + READ_CHUNK);
            buf.resize(end, 0);
            self.transport
                .read_bytes(&mut buf[start..end])
                .map_err(Error::transport)?;
        }
        Ok(buf)
    }

    fn read_collection_header(&mut self) -> Result<CollectionHeader, Error> {
        let element_type = self.read_type_id()?;
        let count = self.read_size(self.config.container_size_limit, "collection")?;
        Ok(CollectionHeader {
            element_type,
            count: count as i32,
        })
    }

    fn write_collection_header(&mut self, header: &CollectionHeader) -> Result<(), Error> {
        self.write_byte(header.element_type.to_wire())?;
        self.write_i32(header.count)
    }
}

fn message_type(byte: u8) -> Result<MessageType, Error> {
    MessageType::try_from(byte).map_err(|_| {
        Error::application(ApplicationException::new(
            ApplicationExceptionType::InvalidMessageType,
            format!("invalid message type {byte}"),
        ))
    })
}

#[async_trait]
impl<T: Transport> Protocol for BinaryProtocol<T> {
    fn write_message_begin(&mut self, header: &MessageHeader) -> Result<(), Error> {
        let message_type: u8 = header.message_type.into();
        if self.config.strict_write {
            let version = VERSION_1 | message_type as u32;
            self.write_i32(version as i32)?;
            self.write_string(&header.name)?;
        } else {
            self.write_string(&header.name)?;
            self.write_byte(message_type)?;
        }
        self.write_i32(header.sequence_id)
    }

    fn write_message_end(&mut self) -> Result<(), Error> {
        Ok(())
    }

    fn write_struct_begin(&mut self, _header: &StructHeader) -> Result<(), Error> {
        Ok(())
    }

    fn write_struct_end(&mut self) -> Result<(), Error> {
        Ok(())
    }

    fn write_field_begin(&mut self, header: &FieldHeader) -> Result<(), Error> {
        self.write_byte(header.type_id.to_wire())?;
        self.write_i16(header.id)
    }

    fn write_field_end(&mut self) -> Result<(), Error> {
        Ok(())
    }

    fn write_field_stop(&mut self) -> Result<(), Error> {
        self.write_byte(ThriftTypeId::Empty.to_wire())
    }

    fn write_list_begin(&mut self, header: &CollectionHeader) -> Result<(), Error> {
        self.write_collection_header(header)
    }

    fn write_list_end(&mut self) -> Result<(), Error> {
        Ok(())
    }

    fn write_set_begin(&mut self, header: &CollectionHeader) -> Result<(), Error> {
        self.write_collection_header(header)
    }

    fn write_set_end(&mut self) -> Result<(), Error> {
        Ok(())
    }

    fn write_map_begin(&mut self, header: &MapHeader) -> Result<(), Error> {
        self.write_byte(header.key_type.to_wire())?;
        self.write_byte(header.value_type.to_wire())?;
        self.write_i32(header.count)
    }

    fn write_map_end(&mut self) -> Result<(), Error> {
        Ok(())
    }

    fn write_bool(&mut self, value: bool) -> Result<(), Error> {
        self.write_byte(if value { 1 } else { 0 })
    }

    fn write_i8(&mut self, value: i8) -> Result<(), Error> {
        self.write_byte(value as u8)
    }

    fn write_i16(&mut self, value: i16) -> Result<(), Error> {
        BigEndian::write_i16(&mut self.scratch, value);
        self.write_scratch(2)
    }

    fn write_i32(&mut self, value: i32) -> Result<(), Error> {
        BigEndian::write_i32(&mut self.scratch, value);
        self.write_scratch(4)
    }

    fn write_i64(&mut self, value: i64) -> Result<(), Error> {
        BigEndian::write_i64(&mut self.scratch, value);
        self.write_scratch(8)
    }

    fn write_double(&mut self, value: f64) -> Result<(), Error> {
        self.write_i64(value.to_bits() as i64)
    }

    fn write_string(&mut self, value: &str) -> Result<(), Error> {
        self.write_binary(value.as_bytes())
    }

    fn write_binary(&mut self, value: &[u8]) -> Result<(), Error> {
        self.write_size(value.len(), "binary")?;
        self.transport.write_bytes(value).map_err(Error::transport)
    }

    fn read_message_begin(&mut self) -> Result<MessageHeader, Error> {
        let size = self.read_i32()?;
        if size < 0 {
            let version = size as u32 & VERSION_MASK;
            ensure!(
                version == VERSION_1,
                Error::invalid_data(format!("bad protocol version {version:#010x}"))
            );
            let message_type = message_type((size as u32 & 0xff) as u8)?;
            let name = self.read_string()?;
            let sequence_id = self.read_i32()?;
            Ok(MessageHeader {
                name,
                message_type,
                sequence_id,
            })
        } else {
            ensure!(
                !self.config.strict_read,
                Error::invalid_data("missing version in message header, unversioned peer?")
            );
            let len = size as usize;
            if let Some(limit) = self.config.string_size_limit {
                ensure!(
                    len <= limit,
                    Error::invalid_data(format!("string size {len} exceeds limit {limit}"))
                );
            }
            let name = String::from_utf8(self.read_vec(len)?)
                .map_err(|e| Error::invalid_data(format!("invalid utf-8 message name: {e}")))?;
            let message_type = message_type(self.read_byte()?)?;
            let sequence_id = self.read_i32()?;
            Ok(MessageHeader {
                name,
                message_type,
                sequence_id,
            })
        }
    }

    fn read_message_end(&mut self) -> Result<(), Error> {
        Ok(())
    }

    fn read_struct_begin(&mut self) -> Result<StructHeader, Error> {
        Ok(StructHeader::default())
    }

    fn read_struct_end(&mut self) -> Result<(), Error> {
        Ok(())
    }

    fn read_field_begin(&mut self) -> Result<FieldHeader, Error> {
        let type_id = self.read_type_id()?;
        if type_id == ThriftTypeId::Empty {
            return Ok(FieldHeader::stop());
        }
        let id = self.read_i16()?;
        Ok(FieldHeader::new(id, String::new(), type_id))
    }

    fn read_field_end(&mut self) -> Result<(), Error> {
        Ok(())
    }

    fn read_list_begin(&mut self) -> Result<CollectionHeader, Error> {
        self.read_collection_header()
    }

    fn read_list_end(&mut self) -> Result<(), Error> {
        Ok(())
    }

    fn read_set_begin(&mut self) -> Result<CollectionHeader, Error> {
        self.read_collection_header()
    }

    fn read_set_end(&mut self) -> Result<(), Error> {
        Ok(())
    }

    fn read_map_begin(&mut self) -> Result<MapHeader, Error> {
        let key_type = self.read_type_id()?;
        let value_type = self.read_type_id()?;
        let count = self.read_size(self.config.container_size_limit, "map")?;
        Ok(MapHeader {
            key_type,
            value_type,
            count: count as i32,
        })
    }

    fn read_map_end(&mut self) -> Result<(), Error> {
        Ok(())
    }

    fn read_bool(&mut self) -> Result<bool, Error> {
        Ok(self.read_byte()? != 0)
    }

    fn read_i8(&mut self) -> Result<i8, Error> {
        Ok(self.read_byte()? as i8)
    }

    fn read_i16(&mut self) -> Result<i16, Error> {
        self.read_scratch(2)?;
        Ok(BigEndian::read_i16(&self.scratch))
    }

    fn read_i32(&mut self) -> Result<i32, Error> {
        self.read_scratch(4)?;
        Ok(BigEndian::read_i32(&self.scratch))
    }

    fn read_i64(&mut self) -> Result<i64, Error> {
        self.read_scratch(8)?;
        Ok(BigEndian::read_i64(&self.scratch))
    }

    fn read_double(&mut self) -> Result<f64, Error> {
        Ok(f64::from_bits(self.read_i64()? as u64))
    }

    fn read_string(&mut self) -> Result<String, Error> {
        let len = self.read_size(self.config.string_size_limit, "string")?;
        String::from_utf8(self.read_vec(len)?)
            .map_err(|e| Error::invalid_data(format!("invalid utf-8 string: {e}")))
    }

    fn read_binary(&mut self) -> Result<Bytes, Error> {
        let len = self.read_size(self.config.string_size_limit, "binary")?;
        Ok(Bytes::from(self.read_vec(len)?))
    }

    fn recursion_limit(&self) -> usize {
        self.config.recursion_limit
    }

    fn inc_depth(&mut self) -> Result<(), Error> {
        ensure!(
            self.depth < self.config.recursion_limit,
            Error::depth_exceeded(format!(
                "struct nesting depth exceeds limit {}",
                self.config.recursion_limit
            ))
        );
        self.depth += 1;
        Ok(())
    }

    fn dec_depth(&mut self) {
        self.depth = self.depth.saturating_sub(1);
    }

    async fn flush_and_read(&mut self) -> Result<(), Error> {
        self.transport
            .flush_and_read()
            .await
            .map_err(Error::transport)
    }
}
