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

//! The synthetic structs a call travels in.
//!
//! `{method}_args` has one always-present field per parameter, and
//! `{method}_result` has the return value as optional field 0 plus one field
//! per throws clause. The result fields of throws clauses do not store what
//! they read: their setter raises the decoded exception, so a declared
//! exception and a return value go through the same field dispatch.

use std::any::Any;
use std::error::Error as StdError;
use std::sync::Arc;

use crate::error::Error;
use crate::meta::{Converter, PendingField, Presence, ThriftField};
use crate::protocol::Protocol;
use crate::resolver::Resolution;
use crate::rpc::DeclaredException;
use crate::serializer::struct_::{write_field, FieldAccessor};
use crate::serializer::ThriftValue;

pub(crate) type BoxedValue = Box<dyn Any + Send + Sync>;

/// Outcome of checking one argument against its parameter.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub(crate) enum ArgCheck {
    Valid,
    WrongType,
    Null,
}

pub(crate) type ArgCheckFn = Box<dyn Fn(&(dyn Any + Send + Sync)) -> ArgCheck + Send + Sync>;

#[derive(Default)]
pub(crate) struct ArgsEnvelope {
    values: Vec<Option<BoxedValue>>,
}

impl ArgsEnvelope {
    pub(crate) fn new(values: Vec<BoxedValue>) -> ArgsEnvelope {
        ArgsEnvelope {
            values: values.into_iter().map(Some).collect(),
        }
    }

    fn get<P: 'static>(&self, index: usize, field: &ThriftField) -> Result<&P, Error> {
        self.values
            .get(index)
            .and_then(Option::as_ref)
            .and_then(|value| value.downcast_ref::<P>())
            .ok_or_else(|| {
                Error::invalid_argument(format!(
                    "argument {} is missing or is not a {}",
                    field.name(),
                    std::any::type_name::<P>()
                ))
            })
    }

    fn set(&mut self, index: usize, value: BoxedValue) {
        if self.values.len() <= index {
            self.values.resize_with(index + 1, || None);
        }
        self.values[index] = Some(value);
    }

    pub(crate) fn into_values(self) -> Vec<Option<BoxedValue>> {
        self.values
    }
}

#[derive(Default)]
pub(crate) struct ResultEnvelope {
    success: Option<BoxedValue>,
}

impl ResultEnvelope {
    pub(crate) fn success(value: BoxedValue) -> ResultEnvelope {
        ResultEnvelope {
            success: Some(value),
        }
    }

    pub(crate) fn into_success(self) -> Option<BoxedValue> {
        self.success
    }
}

fn check_arg<P: ThriftValue>(value: &(dyn Any + Send + Sync)) -> ArgCheck {
    match value.downcast_ref::<P>() {
        Some(value) if value.is_null() => ArgCheck::Null,
        Some(_) => ArgCheck::Valid,
        None => ArgCheck::WrongType,
    }
}

pub(crate) fn param<P: ThriftValue>(
    index: usize,
    id: i16,
    name: &'static str,
) -> (PendingField<ArgsEnvelope>, ArgCheckFn) {
    let write = move |args: &ArgsEnvelope,
                      struct_name: &str,
                      field: &ThriftField,
                      protocol: &mut dyn Protocol| {
        let value = args.get::<P>(index, field)?;
        write_field(value, false, struct_name, field, protocol)
    };
    let read = move |args: &mut ArgsEnvelope, field: &ThriftField, protocol: &mut dyn Protocol| {
        let value = P::read_value(field.wire_type(), protocol)?;
        args.set(index, Box::new(value));
        Ok::<_, Error>(())
    };
    let field = PendingField {
        id,
        name,
        presence: Presence::Always,
        has_default: false,
        converter: None,
        resolve: Resolution::resolve::<P>,
        accessor: FieldAccessor {
            write: Box::new(write),
            read: Box::new(read),
            apply_default: None,
        },
    };
    (field, Box::new(check_arg::<P>))
}

pub(crate) fn converted_param<C: Converter>(
    index: usize,
    id: i16,
    name: &'static str,
    converter: C,
) -> (PendingField<ArgsEnvelope>, ArgCheckFn) {
    let converter = Arc::new(converter);
    let converter_name = converter.name();
    let writer = converter.clone();
    let checker = converter.clone();
    let write = move |args: &ArgsEnvelope,
                      struct_name: &str,
                      field: &ThriftField,
                      protocol: &mut dyn Protocol| {
        let wire = writer.convert_back(args.get::<C::Model>(index, field)?);
        write_field(&wire, false, struct_name, field, protocol)
    };
    let read = move |args: &mut ArgsEnvelope, field: &ThriftField, protocol: &mut dyn Protocol| {
        let wire = C::Wire::read_value(field.wire_type(), protocol)?;
        args.set(index, Box::new(converter.convert(wire)));
        Ok::<_, Error>(())
    };
    let check = move |value: &(dyn Any + Send + Sync)| match value.downcast_ref::<C::Model>() {
        Some(model) if checker.convert_back(model).is_null() => ArgCheck::Null,
        Some(_) => ArgCheck::Valid,
        None => ArgCheck::WrongType,
    };
    let field = PendingField {
        id,
        name,
        presence: Presence::Always,
        has_default: false,
        converter: Some(converter_name),
        resolve: Resolution::resolve::<C::Wire>,
        accessor: FieldAccessor {
            write: Box::new(write),
            read: Box::new(read),
            apply_default: None,
        },
    };
    (field, Box::new(check))
}

const SUCCESS_ID: i16 = 0;
const SUCCESS_NAME: &str = "success";

pub(crate) fn success<R: ThriftValue>() -> PendingField<ResultEnvelope> {
    let write = |result: &ResultEnvelope,
                 struct_name: &str,
                 field: &ThriftField,
                 protocol: &mut dyn Protocol| {
        match result.success.as_ref().and_then(|v| v.downcast_ref::<R>()) {
            Some(value) => write_field(value, false, struct_name, field, protocol),
            None => Ok(()),
        }
    };
    let read = |result: &mut ResultEnvelope, field: &ThriftField, protocol: &mut dyn Protocol| {
        let value = R::read_value(field.wire_type(), protocol)?;
        result.success = Some(Box::new(value));
        Ok::<_, Error>(())
    };
    PendingField {
        id: SUCCESS_ID,
        name: SUCCESS_NAME,
        presence: Presence::Optional,
        has_default: false,
        converter: None,
        resolve: Resolution::resolve::<R>,
        accessor: FieldAccessor {
            write: Box::new(write),
            read: Box::new(read),
            apply_default: None,
        },
    }
}

pub(crate) fn converted_success<C: Converter>(converter: C) -> PendingField<ResultEnvelope> {
    let converter = Arc::new(converter);
    let converter_name = converter.name();
    let writer = converter.clone();
    let write = move |result: &ResultEnvelope,
                      struct_name: &str,
                      field: &ThriftField,
                      protocol: &mut dyn Protocol| {
        match result
            .success
            .as_ref()
            .and_then(|v| v.downcast_ref::<C::Model>())
        {
            Some(model) => {
                let wire = writer.convert_back(model);
                write_field(&wire, false, struct_name, field, protocol)
            }
            None => Ok(()),
        }
    };
    let read = move |result: &mut ResultEnvelope, field: &ThriftField, protocol: &mut dyn Protocol| {
        let wire = C::Wire::read_value(field.wire_type(), protocol)?;
        result.success = Some(Box::new(converter.convert(wire)));
        Ok::<_, Error>(())
    };
    PendingField {
        id: SUCCESS_ID,
        name: SUCCESS_NAME,
        presence: Presence::Optional,
        has_default: false,
        converter: Some(converter_name),
        resolve: Resolution::resolve::<C::Wire>,
        accessor: FieldAccessor {
            write: Box::new(write),
            read: Box::new(read),
            apply_default: None,
        },
    }
}

pub(crate) fn throws<E>(id: i16, name: &'static str) -> PendingField<ResultEnvelope>
where
    E: ThriftValue + StdError,
{
    // the envelope never carries an exception to write
    let write = |_: &ResultEnvelope, _: &str, _: &ThriftField, _: &mut dyn Protocol| {
        Ok::<_, Error>(())
    };
    let read = |_: &mut ResultEnvelope,
                field: &ThriftField,
                protocol: &mut dyn Protocol|
     -> Result<(), Error> {
        let exception = E::read_value(field.wire_type(), protocol)?;
        Err(Error::declared(DeclaredException::new(
            field.id(),
            field.name(),
            exception,
        )))
    };
    PendingField {
        id,
        name,
        presence: Presence::Optional,
        has_default: false,
        converter: None,
        resolve: Resolution::resolve::<E>,
        accessor: FieldAccessor {
            write: Box::new(write),
            read: Box::new(read),
            apply_default: None,
        },
    }
}
