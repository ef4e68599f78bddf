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

//! One request/response exchange per method call.
//!
//! [`call_method`] writes the method's `{name}_args` struct inside a `Call`
//! (or `OneWay`) message, commits it through the protocol, and decodes the
//! `{name}_result` struct of the reply. The await on the transport is the
//! only suspension point; a [`CancellationToken`] passed in [`CallArgs`] is
//! observed there and nowhere else.

pub(crate) mod envelope;
mod exception;

use std::any::Any;
use std::sync::Arc;

use tokio_util::sync::CancellationToken;
use tracing::debug;

use crate::error::Error;
use crate::meta::{ServiceBuilder, ThriftService};
use crate::protocol::Protocol;
use crate::resolver::TypeMapper;
use crate::serializer::read_struct;
use crate::types::{MessageHeader, MessageType};

pub use exception::{ApplicationException, ApplicationExceptionType, DeclaredException};

/// A host type that describes a service, typically the marker type of a
/// generated client.
pub trait ThriftServiceType: 'static {
    fn describe() -> ServiceBuilder;
}

/// Positional arguments of a call.
///
/// ```rust
/// use thrift_core::rpc::CallArgs;
/// use tokio_util::sync::CancellationToken;
///
/// let args = CallArgs::new()
///     .arg(1_i32)
///     .arg(String::from("two"))
///     .with_cancellation(CancellationToken::new());
/// assert_eq!(args.len(), 2);
/// ```
#[derive(Default)]
pub struct CallArgs {
    values: Vec<Box<dyn Any + Send + Sync>>,
    cancellation: Option<CancellationToken>,
}

impl CallArgs {
    pub fn new() -> CallArgs {
        CallArgs::default()
    }

    pub fn arg<P: Any + Send + Sync>(mut self, value: P) -> Self {
        self.values.push(Box::new(value));
        self
    }

    /// Aborts the call with [`Error::Cancelled`] if `token` fires while
    /// waiting for the transport.
    pub fn with_cancellation(mut self, token: CancellationToken) -> Self {
        self.cancellation = Some(token);
        self
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }
}

/// Calls `method_name` of `service` over `protocol`.
///
/// `R` must be the host type of the method's return value, `()` for void
/// methods. Arguments are validated before anything is written. One-way
/// methods return as soon as the request is committed.
pub async fn call_method<R: Send + 'static>(
    protocol: &mut dyn Protocol,
    service: &ThriftService,
    method_name: &str,
    args: CallArgs,
) -> Result<R, Error> {
    let method = service.method(method_name).ok_or_else(|| {
        Error::invalid_argument(format!(
            "service {} has no method {}",
            service.name(),
            method_name
        ))
    })?;
    method.check_return::<R>()?;
    let CallArgs {
        values,
        cancellation,
    } = args;
    method.check_args(&values)?;

    let message_type = if method.is_one_way() {
        MessageType::OneWay
    } else {
        MessageType::Call
    };
    debug!(
        service = service.name(),
        method = method.name(),
        ?message_type,
        "sending call"
    );
    protocol.write_message_begin(&MessageHeader::new(method.name(), message_type))?;
    method.write_args(values, protocol)?;
    protocol.write_message_end()?;

    match cancellation {
        Some(token) => {
            tokio::select! {
                biased;
                _ = token.cancelled() => return Err(Error::cancelled()),
                flushed = protocol.flush_and_read() => flushed?,
            }
        }
        None => protocol.flush_and_read().await?,
    }

    if method.is_one_way() {
        return void_result::<R>();
    }

    let header = protocol.read_message_begin()?;
    match header.message_type {
        MessageType::Reply => {}
        MessageType::Exception => {
            let exception = read_struct::<ApplicationException>(protocol)?;
            protocol.read_message_end()?;
            return Err(Error::application(exception));
        }
        other => {
            return Err(Error::application(ApplicationException::new(
                ApplicationExceptionType::InvalidMessageType,
                format!("{other:?} message received in reply to {}", method.name()),
            )));
        }
    }
    if header.name != method.name() {
        return Err(Error::application(ApplicationException::new(
            ApplicationExceptionType::WrongMethodName,
            format!(
                "reply for {} received in reply to {}",
                header.name,
                method.name()
            ),
        )));
    }

    let success = method.read_result(protocol)?;
    protocol.read_message_end()?;
    debug!(
        service = service.name(),
        method = method.name(),
        "call completed"
    );

    match success {
        Some(value) => value.downcast::<R>().map(|value| *value).map_err(|_| {
            Error::invalid_argument(format!(
                "result of {} is not a {}",
                method.name(),
                std::any::type_name::<R>()
            ))
        }),
        None if method.is_void() => void_result::<R>(),
        None => Err(Error::application(ApplicationException::new(
            ApplicationExceptionType::MissingResult,
            format!("{} failed: unknown result", method.name()),
        ))),
    }
}

// `R` is `()` whenever the method is void, which check_return enforces.
fn void_result<R: 'static>() -> Result<R, Error> {
    let unit: Box<dyn Any> = Box::new(());
    unit.downcast::<R>()
        .map(|value| *value)
        .map_err(|_| Error::invalid_argument("a void method returns ()"))
}

/// A protocol bound to a service description.
pub struct Client<P> {
    protocol: P,
    service: Arc<ThriftService>,
}

impl<P: Protocol> Client<P> {
    pub fn new(protocol: P, service: Arc<ThriftService>) -> Client<P> {
        Client { protocol, service }
    }

    /// A client for the service described by `S`.
    pub fn for_service<S: ThriftServiceType>(protocol: P) -> Result<Client<P>, Error> {
        Ok(Client::new(protocol, TypeMapper::service::<S>()?))
    }

    pub async fn call<R: Send + 'static>(
        &mut self,
        method: &str,
        args: CallArgs,
    ) -> Result<R, Error> {
        call_method(&mut self.protocol, &self.service, method, args).await
    }

    pub fn service(&self) -> &Arc<ThriftService> {
        &self.service
    }

    pub fn protocol(&self) -> &P {
        &self.protocol
    }

    pub fn protocol_mut(&mut self) -> &mut P {
        &mut self.protocol
    }

    pub fn into_inner(self) -> P {
        self.protocol
    }
}
