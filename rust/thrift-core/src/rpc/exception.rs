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

use std::error::Error as StdError;
use std::fmt;

use num_enum::{IntoPrimitive, TryFromPrimitive};

use crate::meta::{Field, StructSchema};
use crate::serializer::ThriftStructType;
use crate::{thrift_enum, thrift_struct};

/// Type codes of [`ApplicationException`], fixed by the Thrift protocol.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, TryFromPrimitive, IntoPrimitive)]
#[repr(i32)]
pub enum ApplicationExceptionType {
    Unknown = 0,
    UnknownMethod = 1,
    InvalidMessageType = 2,
    WrongMethodName = 3,
    BadSequenceId = 4,
    MissingResult = 5,
    InternalError = 6,
    ProtocolError = 7,
    InvalidTransform = 8,
    InvalidProtocol = 9,
    UnsupportedClientType = 10,
}

impl Default for ApplicationExceptionType {
    fn default() -> Self {
        ApplicationExceptionType::Unknown
    }
}

thrift_enum!(ApplicationExceptionType);

/// Protocol-level failure, sent by a server in place of a reply or raised
/// locally when a reply cannot be matched to the call.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct ApplicationException {
    message: String,
    kind: ApplicationExceptionType,
}

impl ApplicationException {
    pub fn new<S: Into<String>>(kind: ApplicationExceptionType, message: S) -> Self {
        ApplicationException {
            message: message.into(),
            kind,
        }
    }

    pub fn message(&self) -> &str {
        &self.message
    }

    pub fn kind(&self) -> ApplicationExceptionType {
        self.kind
    }
}

impl fmt::Display for ApplicationException {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.message.is_empty() {
            write!(f, "application exception ({:?})", self.kind)
        } else {
            write!(f, "application exception ({:?}): {}", self.kind, self.message)
        }
    }
}

impl StdError for ApplicationException {}

impl ThriftStructType for ApplicationException {
    fn describe() -> StructSchema<Self> {
        StructSchema::new("TApplicationException")
            .field(Field::new(
                1,
                "message",
                |e: &ApplicationException| &e.message,
                |e, v| e.message = v,
            ))
            .field(Field::new(
                2,
                "type",
                |e: &ApplicationException| &e.kind,
                |e, v| e.kind = v,
            ))
    }
}

thrift_struct!(ApplicationException);

/// One of the exceptions a method declares in its throws clauses, raised by
/// the server.
#[derive(Debug)]
pub struct DeclaredException {
    id: i16,
    name: String,
    inner: Box<dyn StdError + Send + Sync>,
}

impl DeclaredException {
    pub fn new<E>(id: i16, name: &str, inner: E) -> Self
    where
        E: StdError + Send + Sync + 'static,
    {
        DeclaredException {
            id,
            name: name.to_owned(),
            inner: Box::new(inner),
        }
    }

    /// Id of the throws clause that carried the exception.
    pub fn id(&self) -> i16 {
        self.id
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn is<E: StdError + 'static>(&self) -> bool {
        self.inner.is::<E>()
    }

    pub fn downcast_ref<E: StdError + 'static>(&self) -> Option<&E> {
        self.inner.downcast_ref::<E>()
    }

    pub fn downcast<E: StdError + 'static>(self) -> Result<E, Self> {
        match self.inner.downcast::<E>() {
            Ok(inner) => Ok(*inner),
            Err(inner) => Err(DeclaredException {
                id: self.id,
                name: self.name,
                inner,
            }),
        }
    }
}

impl fmt::Display for DeclaredException {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.name, self.inner)
    }
}

impl StdError for DeclaredException {
    fn source(&self) -> Option<&(dyn StdError + 'static)> {
        Some(&*self.inner)
    }
}
