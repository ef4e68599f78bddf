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

use std::fmt;
use std::io;
use std::sync::Arc;

use async_trait::async_trait;
use bytes::{Buf, Bytes, BytesMut};

use super::Transport;

/// Turns a committed request into the response bytes.
pub type Responder = Arc<dyn Fn(Bytes) -> io::Result<Bytes> + Send + Sync>;

/// In-memory transport.
///
/// Without a responder it is a loopback: committing makes the written bytes
/// readable. With a responder, the committed request is handed to it and its
/// answer becomes readable.
#[derive(Default)]
pub struct MemoryTransport {
    written: BytesMut,
    readable: Bytes,
    responder: Option<Responder>,
    flush_count: usize,
    read_calls: usize,
}

impl MemoryTransport {
    pub fn new() -> MemoryTransport {
        MemoryTransport::default()
    }

    /// A transport whose incoming body is already `bytes`.
    pub fn from_bytes<B: Into<Bytes>>(bytes: B) -> MemoryTransport {
        MemoryTransport {
            readable: bytes.into(),
            ..MemoryTransport::default()
        }
    }

    pub fn with_responder<F>(responder: F) -> MemoryTransport
    where
        F: Fn(Bytes) -> io::Result<Bytes> + Send + Sync + 'static,
    {
        MemoryTransport {
            responder: Some(Arc::new(responder)),
            ..MemoryTransport::default()
        }
    }

    /// Bytes written since the last commit.
    pub fn written(&self) -> &[u8] {
        &self.written
    }

    pub fn into_written(self) -> Bytes {
        self.written.freeze()
    }

    /// Unread bytes of the incoming body.
    pub fn remaining(&self) -> usize {
        self.readable.len()
    }

    pub fn flush_count(&self) -> usize {
        self.flush_count
    }

    /// Number of `read_bytes` calls served so far.
    pub fn read_calls(&self) -> usize {
        self.read_calls
    }
}

impl fmt::Debug for MemoryTransport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("MemoryTransport")
            .field("written", &self.written.len())
            .field("readable", &self.readable.len())
            .field("responder", &self.responder.is_some())
            .field("flush_count", &self.flush_count)
            .finish()
    }
}

#[async_trait]
impl Transport for MemoryTransport {
    fn write_bytes(&mut self, buf: &[u8]) -> io::Result<()> {
        self.written.extend_from_slice(buf);
        Ok(())
    }

    fn read_bytes(&mut self, buf: &mut [u8]) -> io::Result<()> {
        self.read_calls += 1;
        if self.readable.remaining() < buf.len() {
            return Err(io::Error::new(
                io::ErrorKind::UnexpectedEof,
                format!(
                    "need {} bytes, {} available",
                    buf.len(),
                    self.readable.remaining()
                ),
            ));
        }
        self.readable.copy_to_slice(buf);
        Ok(())
    }

    async fn flush_and_read(&mut self) -> io::Result<()> {
        self.flush_count += 1;
        let request = self.written.split().freeze();
        self.readable = match &self.responder {
            Some(responder) => responder(request)?,
            None => request,
        };
        Ok(())
    }
}
