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

//! Byte transport boundary.
//!
//! The core only needs to append bytes to an outgoing message, read bytes from
//! the incoming one and commit a request. Real transports (HTTP, sockets) live
//! outside this crate; [`MemoryTransport`] covers buffers and loopback tests.

mod memory;

use async_trait::async_trait;
use std::io;

pub use memory::{MemoryTransport, Responder};

#[async_trait]
pub trait Transport: Send {
    /// Appends `buf` to the outgoing message body.
    fn write_bytes(&mut self, buf: &[u8]) -> io::Result<()>;

    /// Fills `buf` completely from the incoming message body.
    fn read_bytes(&mut self, buf: &mut [u8]) -> io::Result<()>;

    /// Commits the written request and makes the response readable.
    async fn flush_and_read(&mut self) -> io::Result<()>;
}

#[async_trait]
impl<T: Transport + ?Sized> Transport for Box<T> {
    fn write_bytes(&mut self, buf: &[u8]) -> io::Result<()> {
        (**self).write_bytes(buf)
    }

    fn read_bytes(&mut self, buf: &mut [u8]) -> io::Result<()> {
        (**self).read_bytes(buf)
    }

    async fn flush_and_read(&mut self) -> io::Result<()> {
        (**self).flush_and_read().await
    }
}
