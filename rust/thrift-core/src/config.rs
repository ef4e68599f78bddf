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

/// Configuration for a protocol instance.
///
/// ```rust
/// use thrift_core::config::ProtocolConfig;
///
/// let config = ProtocolConfig::default()
///     .strict_read(true)
///     .container_size_limit(Some(10_000));
/// assert!(config.is_strict_read());
/// ```
#[derive(Clone, Debug)]
pub struct ProtocolConfig {
    /// Reject message headers that lack the version word.
    pub strict_read: bool,
    /// Emit the versioned message header. When disabled the legacy
    /// unversioned form is written.
    pub strict_write: bool,
    /// Maximum accepted length of a string or binary value.
    pub string_size_limit: Option<usize>,
    /// Maximum accepted element count of a list, set or map.
    pub container_size_limit: Option<usize>,
    /// Maximum struct nesting depth, applied to typed reads and writes and to
    /// skipped values.
    pub recursion_limit: usize,
}

impl Default for ProtocolConfig {
    fn default() -> Self {
        ProtocolConfig {
            strict_read: false,
            strict_write: true,
            string_size_limit: None,
            container_size_limit: None,
            recursion_limit: 64,
        }
    }
}

impl ProtocolConfig {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn strict_read(mut self, strict_read: bool) -> Self {
        self.strict_read = strict_read;
        self
    }

    pub fn strict_write(mut self, strict_write: bool) -> Self {
        self.strict_write = strict_write;
        self
    }

    pub fn string_size_limit(mut self, limit: Option<usize>) -> Self {
        self.string_size_limit = limit;
        self
    }

    pub fn container_size_limit(mut self, limit: Option<usize>) -> Self {
        self.container_size_limit = limit;
        self
    }

    pub fn recursion_limit(mut self, limit: usize) -> Self {
        self.recursion_limit = limit;
        self
    }

    #[inline(always)]
    pub fn is_strict_read(&self) -> bool {
        self.strict_read
    }

    #[inline(always)]
    pub fn is_strict_write(&self) -> bool {
        self.strict_write
    }
}
