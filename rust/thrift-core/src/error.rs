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

//! Error handling for type derivation, serialization and RPC calls.
//!
//! Every failure in this crate is reported through the single [`enum@Error`] type.
//! The variants fall into four families:
//!
//! - **Parsing errors** ([`Error::Parse`]): raised the first time a host type is
//!   mapped to a wire type. They are permanent until the type description is fixed.
//! - **Serialization errors** ([`Error::TypeIdMismatch`], [`Error::MissingRequiredField`],
//!   [`Error::RequiredFieldIsNull`], [`Error::NullParameter`], [`Error::InvalidData`]):
//!   scoped to a single read or write.
//! - **Remote errors** ([`Error::Application`], [`Error::Declared`]): the server
//!   answered, but with a failure.
//! - **Transport errors** ([`Error::Transport`], [`Error::Cancelled`]): the bytes
//!   never made it across.

use std::borrow::Cow;
use std::fmt;

use thiserror::Error;

use crate::rpc::{ApplicationException, DeclaredException};
use crate::types::ThriftTypeId;

/// Set THRIFT_PANIC_ON_ERROR=1 at compile time to panic where an error is created.
pub const PANIC_ON_ERROR: bool = option_env!("THRIFT_PANIC_ON_ERROR").is_some();

#[inline(always)]
pub const fn should_panic_on_error() -> bool {
    PANIC_ON_ERROR
}

/// The reason a host type could not be mapped to a wire description.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[non_exhaustive]
pub enum ParseErrorKind {
    /// A value type that has no Thrift counterpart (unsigned integers, `f32`, `char`).
    UnknownValueType,
    UnsupportedMapType,
    UnsupportedSetType,
    UnsupportedListType,
    NotAStruct,
    /// A throws clause whose type does not map to a struct.
    NotAnException,
    /// A field, parameter or return value whose wire type is void.
    VoidNotAllowed,
    DuplicateFieldId(i16),
    DuplicateFieldName,
    DuplicateMethod,
    /// A one-way method with a return value or throws clauses.
    InvalidOneWay,
}

impl fmt::Display for ParseErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ParseErrorKind::UnknownValueType => f.write_str("unknown value type"),
            ParseErrorKind::UnsupportedMapType => f.write_str("unsupported map type"),
            ParseErrorKind::UnsupportedSetType => f.write_str("unsupported set type"),
            ParseErrorKind::UnsupportedListType => f.write_str("unsupported list type"),
            ParseErrorKind::NotAStruct => f.write_str("not a struct"),
            ParseErrorKind::NotAnException => f.write_str("not an exception type"),
            ParseErrorKind::VoidNotAllowed => f.write_str("void is not a value type"),
            ParseErrorKind::DuplicateFieldId(id) => write!(f, "duplicate field id {id}"),
            ParseErrorKind::DuplicateFieldName => f.write_str("duplicate field name"),
            ParseErrorKind::DuplicateMethod => f.write_str("duplicate method name"),
            ParseErrorKind::InvalidOneWay => {
                f.write_str("one-way method must return void and declare no exceptions")
            }
        }
    }
}

/// Error type for Thrift type derivation, serialization and RPC calls.
///
/// Do not construct variants directly; use the constructor functions
/// ([`Error::parse`], [`Error::type_id_mismatch`], ...). They accept anything
/// convertible into `Cow<'static, str>` and honor `THRIFT_PANIC_ON_ERROR`:
///
/// ```bash
/// RUST_BACKTRACE=1 THRIFT_PANIC_ON_ERROR=1 cargo test
/// ```
#[derive(Error, Debug)]
#[non_exhaustive]
pub enum Error {
    /// A host type could not be mapped to a wire type.
    #[error("failed to map type {type_name}: {kind}")]
    Parse {
        kind: ParseErrorKind,
        type_name: Cow<'static, str>,
    },

    /// The type id of a field on the wire differs from the schema.
    #[error(
        "type id mismatch for field {struct_name}.{field_name} (id {field_id}): expected {expected:?}, got {actual:?}"
    )]
    TypeIdMismatch {
        struct_name: String,
        field_name: String,
        field_id: i16,
        expected: ThriftTypeId,
        actual: ThriftTypeId,
    },

    #[error("missing required field {struct_name}.{field_name}")]
    MissingRequiredField {
        struct_name: String,
        field_name: String,
    },

    #[error("required field {struct_name}.{field_name} is null")]
    RequiredFieldIsNull {
        struct_name: String,
        field_name: String,
    },

    #[error("parameter {parameter} of method {method} must not be null")]
    NullParameter { method: String, parameter: String },

    /// Malformed bytes on the wire.
    #[error("{0}")]
    InvalidData(Cow<'static, str>),

    /// The caller passed something the method description does not accept.
    #[error("{0}")]
    InvalidArgument(Cow<'static, str>),

    #[error("{0}")]
    DepthExceeded(Cow<'static, str>),

    /// The server answered with a protocol-level exception.
    #[error(transparent)]
    Application(ApplicationException),

    /// The server raised one of the exceptions declared by the method.
    #[error(transparent)]
    Declared(DeclaredException),

    #[error("transport error: {0}")]
    Transport(#[source] std::io::Error),

    #[error("call cancelled")]
    Cancelled,
}

macro_rules! checked {
    ($err:expr) => {{
        let err = $err;
        if PANIC_ON_ERROR {
            panic!("THRIFT_PANIC_ON_ERROR: {}", err);
        }
        err
    }};
}

impl Error {
    #[inline(always)]
    #[cold]
    #[track_caller]
    pub fn parse<S: Into<Cow<'static, str>>>(kind: ParseErrorKind, type_name: S) -> Self {
        checked!(Error::Parse {
            kind,
            type_name: type_name.into(),
        })
    }

    #[inline(always)]
    #[cold]
    #[track_caller]
    pub fn type_id_mismatch(
        struct_name: &str,
        field_name: &str,
        field_id: i16,
        expected: ThriftTypeId,
        actual: ThriftTypeId,
    ) -> Self {
        checked!(Error::TypeIdMismatch {
            struct_name: struct_name.to_owned(),
            field_name: field_name.to_owned(),
            field_id,
            expected,
            actual,
        })
    }

    #[inline(always)]
    #[cold]
    #[track_caller]
    pub fn missing_required_field(struct_name: &str, field_name: &str) -> Self {
        checked!(Error::MissingRequiredField {
            struct_name: struct_name.to_owned(),
            field_name: field_name.to_owned(),
        })
    }

    #[inline(always)]
    #[cold]
    #[track_caller]
    pub fn required_field_is_null(struct_name: &str, field_name: &str) -> Self {
        checked!(Error::RequiredFieldIsNull {
            struct_name: struct_name.to_owned(),
            field_name: field_name.to_owned(),
        })
    }

    #[inline(always)]
    #[cold]
    #[track_caller]
    pub fn null_parameter(method: &str, parameter: &str) -> Self {
        checked!(Error::NullParameter {
            method: method.to_owned(),
            parameter: parameter.to_owned(),
        })
    }

    #[inline(always)]
    #[cold]
    #[track_caller]
    pub fn invalid_data<S: Into<Cow<'static, str>>>(s: S) -> Self {
        checked!(Error::InvalidData(s.into()))
    }

    #[inline(always)]
    #[cold]
    #[track_caller]
    pub fn invalid_argument<S: Into<Cow<'static, str>>>(s: S) -> Self {
        checked!(Error::InvalidArgument(s.into()))
    }

    #[inline(always)]
    #[cold]
    #[track_caller]
    pub fn depth_exceeded<S: Into<Cow<'static, str>>>(s: S) -> Self {
        checked!(Error::DepthExceeded(s.into()))
    }

    #[inline(always)]
    #[cold]
    #[track_caller]
    pub fn application(exception: ApplicationException) -> Self {
        checked!(Error::Application(exception))
    }

    #[inline(always)]
    #[cold]
    #[track_caller]
    pub fn declared(exception: DeclaredException) -> Self {
        checked!(Error::Declared(exception))
    }

    #[inline(always)]
    #[cold]
    #[track_caller]
    pub fn transport(err: std::io::Error) -> Self {
        checked!(Error::Transport(err))
    }

    #[inline(always)]
    #[cold]
    #[track_caller]
    pub fn cancelled() -> Self {
        checked!(Error::Cancelled)
    }

    /// Whether the failure happened below the protocol, before any answer was decoded.
    pub fn is_transport(&self) -> bool {
        matches!(self, Error::Transport(_) | Error::Cancelled)
    }

    /// The parse failure kind, if this is a parsing error.
    pub fn parse_kind(&self) -> Option<ParseErrorKind> {
        match self {
            Error::Parse { kind, .. } => Some(*kind),
            _ => None,
        }
    }
}

impl From<std::io::Error> for Error {
    #[track_caller]
    fn from(err: std::io::Error) -> Self {
        Error::transport(err)
    }
}

/// Ensures a condition is true; otherwise returns an [`enum@Error`].
///
/// ```
/// use thrift_core::ensure;
/// use thrift_core::error::Error;
///
/// fn check_count(n: i32) -> Result<(), Error> {
///     ensure!(n >= 0, Error::invalid_data(format!("negative count {}", n)));
///     Ok(())
/// }
/// ```
#[macro_export]
macro_rules! ensure {
    ($cond:expr, $err:expr) => {
        if !$cond {
            return Err($err);
        }
    };
}

/// Returns early with an [`Error::InvalidData`].
///
/// ```
/// use thrift_core::bail;
/// use thrift_core::error::Error;
///
/// fn reject(tag: u8) -> Result<(), Error> {
///     bail!("unexpected tag {}", tag);
/// }
/// ```
#[macro_export]
macro_rules! bail {
    ($msg:literal) => {
        return Err($crate::error::Error::invalid_data($msg))
    };
    ($fmt:expr, $($arg:tt)*) => {
        return Err($crate::error::Error::invalid_data(format!($fmt, $($arg)*)))
    };
}
