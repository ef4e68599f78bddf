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

//! Service and method descriptors.
//!
//! A method is described once, through [`ThriftMethod::builder`], and
//! resolved eagerly: its parameter and result envelopes are compiled into
//! ordinary [`ThriftStruct`]s when the method is built, so every call reuses
//! the struct reader and writer.

use std::any::{Any, TypeId};
use std::collections::HashMap;
use std::error::Error as StdError;
use std::fmt;
use std::sync::Arc;

use crate::ensure;
use crate::error::{Error, ParseErrorKind};
use crate::meta::{Converter, PendingField, StructSchema, ThriftField, ThriftStruct, ThriftType};
use crate::protocol::Protocol;
use crate::resolver::{Resolution, TypeMapper};
use crate::rpc::envelope::{self, ArgCheck, ArgCheckFn, ArgsEnvelope, BoxedValue, ResultEnvelope};
use crate::serializer::ThriftValue;

/// A named set of methods.
pub struct ThriftService {
    name: String,
    methods: HashMap<String, Arc<ThriftMethod>>,
}

impl ThriftService {
    pub fn builder<S: Into<String>>(name: S) -> ServiceBuilder {
        ServiceBuilder {
            name: name.into(),
            methods: Vec::new(),
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn method(&self, name: &str) -> Option<&Arc<ThriftMethod>> {
        self.methods.get(name)
    }

    pub fn methods(&self) -> impl Iterator<Item = &Arc<ThriftMethod>> {
        self.methods.values()
    }
}

impl fmt::Debug for ThriftService {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ThriftService")
            .field("name", &self.name)
            .field("methods", &self.methods.keys().collect::<Vec<_>>())
            .finish()
    }
}

pub struct ServiceBuilder {
    name: String,
    methods: Vec<MethodBuilder>,
}

impl ServiceBuilder {
    pub fn method(mut self, method: MethodBuilder) -> Self {
        self.methods.push(method);
        self
    }

    /// Resolves every method. Fails on the first invalid method or on a
    /// method name declared twice.
    pub fn build(self) -> Result<ThriftService, Error> {
        let ServiceBuilder { name, methods } = self;
        TypeMapper::with_resolution(move |resolution| {
            let mut resolved = HashMap::with_capacity(methods.len());
            for builder in methods {
                if resolved.contains_key(&builder.name) {
                    return Err(Error::parse(
                        ParseErrorKind::DuplicateMethod,
                        format!("{}.{}", name, builder.name),
                    ));
                }
                let method = builder.compile(resolution)?;
                resolved.insert(method.name.clone(), Arc::new(method));
            }
            Ok(ThriftService {
                name,
                methods: resolved,
            })
        })
    }
}

/// A declared exception type and the result field that carries it.
#[derive(Debug)]
pub struct ThrowsClause {
    id: i16,
    name: String,
    exception_type: Arc<ThriftType>,
    type_name: &'static str,
}

impl ThrowsClause {
    pub fn id(&self) -> i16 {
        self.id
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn exception_type(&self) -> &Arc<ThriftType> {
        &self.exception_type
    }

    pub fn type_name(&self) -> &'static str {
        self.type_name
    }
}

struct ArgSpec {
    check: ArgCheckFn,
    type_name: &'static str,
}

pub struct ThriftMethod {
    name: String,
    one_way: bool,
    return_type: Arc<ThriftType>,
    return_host: TypeId,
    return_name: &'static str,
    throws: Vec<ThrowsClause>,
    arg_specs: Vec<ArgSpec>,
    args: ThriftStruct,
    result: ThriftStruct,
}

impl ThriftMethod {
    pub fn builder<S: Into<String>>(name: S) -> MethodBuilder {
        MethodBuilder {
            name: name.into(),
            one_way: false,
            params: Vec::new(),
            returns: None,
            throws: Vec::new(),
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn is_one_way(&self) -> bool {
        self.one_way
    }

    pub fn is_void(&self) -> bool {
        self.return_type.is_void()
    }

    pub fn return_type(&self) -> &Arc<ThriftType> {
        &self.return_type
    }

    /// Converter applied to the return value, if any.
    pub fn return_converter(&self) -> Option<&'static str> {
        self.result
            .field(0)
            .filter(|_| !self.is_void())
            .and_then(ThriftField::converter)
    }

    /// Parameters in declaration order.
    pub fn parameters(&self) -> &[ThriftField] {
        self.args.fields()
    }

    pub fn throws(&self) -> &[ThrowsClause] {
        &self.throws
    }

    /// The `{name}_args` envelope.
    pub fn args_struct(&self) -> &ThriftStruct {
        &self.args
    }

    /// The `{name}_result` envelope.
    pub fn result_struct(&self) -> &ThriftStruct {
        &self.result
    }

    /// Checks that `R` is the host type of the return value.
    pub(crate) fn check_return<R: 'static>(&self) -> Result<(), Error> {
        ensure!(
            TypeId::of::<R>() == self.return_host,
            Error::invalid_argument(format!(
                "method {} returns {}, not {}",
                self.name,
                self.return_name,
                std::any::type_name::<R>()
            ))
        );
        Ok(())
    }

    /// Checks argument count, types and nullness before anything is written.
    pub(crate) fn check_args(&self, values: &[BoxedValue]) -> Result<(), Error> {
        ensure!(
            values.len() == self.arg_specs.len(),
            Error::invalid_argument(format!(
                "method {} takes {} arguments, {} given",
                self.name,
                self.arg_specs.len(),
                values.len()
            ))
        );
        let params = self.args.fields().iter().zip(&self.arg_specs);
        for ((param, spec), value) in params.zip(values) {
            match (spec.check)(&**value) {
                ArgCheck::Valid => {}
                ArgCheck::Null => {
                    return Err(Error::null_parameter(&self.name, param.name()));
                }
                ArgCheck::WrongType => {
                    return Err(Error::invalid_argument(format!(
                        "argument {} of method {} must be a {}",
                        param.name(),
                        self.name,
                        spec.type_name
                    )));
                }
            }
        }
        Ok(())
    }

    /// Writes the `{name}_args` struct. Arguments must have passed
    /// `check_args`.
    pub(crate) fn write_args(
        &self,
        values: Vec<BoxedValue>,
        protocol: &mut dyn Protocol,
    ) -> Result<(), Error> {
        let envelope = ArgsEnvelope::new(values);
        self.args
            .codec::<ArgsEnvelope>()?
            .write(&envelope, &self.args, protocol)
    }

    /// Reads the `{name}_result` struct. A populated throws clause fails
    /// with [`Error::Declared`]; an empty result yields `None`.
    pub(crate) fn read_result(
        &self,
        protocol: &mut dyn Protocol,
    ) -> Result<Option<BoxedValue>, Error> {
        let envelope = self
            .result
            .codec::<ResultEnvelope>()?
            .read(&self.result, protocol)?;
        Ok(envelope.into_success())
    }

    /// Reads the `{name}_args` struct, for the serving side of a call.
    /// Arguments absent from the wire are `None`.
    pub fn read_args(
        &self,
        protocol: &mut dyn Protocol,
    ) -> Result<Vec<Option<Box<dyn Any + Send + Sync>>>, Error> {
        let envelope = self
            .args
            .codec::<ArgsEnvelope>()?
            .read(&self.args, protocol)?;
        let mut values = envelope.into_values();
        values.resize_with(self.arg_specs.len(), || None);
        Ok(values)
    }

    /// Writes a `{name}_result` struct holding `value`, for the serving side
    /// of a call.
    pub fn write_success<R: Send + Sync + 'static>(
        &self,
        value: R,
        protocol: &mut dyn Protocol,
    ) -> Result<(), Error> {
        self.check_return::<R>()?;
        let envelope = ResultEnvelope::success(Box::new(value));
        self.result
            .codec::<ResultEnvelope>()?
            .write(&envelope, &self.result, protocol)
    }
}

impl fmt::Debug for ThriftMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ThriftMethod")
            .field("name", &self.name)
            .field("one_way", &self.one_way)
            .field("parameters", &self.args.fields())
            .field("return_type", &self.return_type)
            .field("throws", &self.throws)
            .finish()
    }
}

struct ReturnSpec {
    field: PendingField<ResultEnvelope>,
    host: TypeId,
    type_name: &'static str,
}

/// Declares a method.
///
/// ```rust
/// use thrift_core::meta::ThriftMethod;
///
/// let add = ThriftMethod::builder("add")
///     .param::<i32>(1, "a")
///     .param::<i32>(2, "b")
///     .returns::<i64>()
///     .build()
///     .unwrap();
/// assert_eq!(add.parameters().len(), 2);
/// assert!(!add.is_void());
/// ```
pub struct MethodBuilder {
    name: String,
    one_way: bool,
    params: Vec<(PendingField<ArgsEnvelope>, ArgSpec)>,
    returns: Option<ReturnSpec>,
    throws: Vec<(PendingField<ResultEnvelope>, &'static str)>,
}

impl MethodBuilder {
    pub fn param<P: ThriftValue>(mut self, id: i16, name: &'static str) -> Self {
        let (field, check) = envelope::param::<P>(self.params.len(), id, name);
        let spec = ArgSpec {
            check,
            type_name: std::any::type_name::<P>(),
        };
        self.params.push((field, spec));
        self
    }

    /// A parameter passed as `C::Model` and sent as `C::Wire`.
    pub fn param_with_converter<C: Converter>(
        mut self,
        id: i16,
        name: &'static str,
        converter: C,
    ) -> Self {
        let (field, check) = envelope::converted_param(self.params.len(), id, name, converter);
        let spec = ArgSpec {
            check,
            type_name: std::any::type_name::<C::Model>(),
        };
        self.params.push((field, spec));
        self
    }

    /// Sets the return type. `()` leaves the method void.
    pub fn returns<R: ThriftValue>(mut self) -> Self {
        self.returns = if TypeId::of::<R>() == TypeId::of::<()>() {
            None
        } else {
            Some(ReturnSpec {
                field: envelope::success::<R>(),
                host: TypeId::of::<R>(),
                type_name: std::any::type_name::<R>(),
            })
        };
        self
    }

    /// A return value received as `C::Wire` and handed out as `C::Model`.
    pub fn returns_with_converter<C: Converter>(mut self, converter: C) -> Self {
        self.returns = Some(ReturnSpec {
            field: envelope::converted_success(converter),
            host: TypeId::of::<C::Model>(),
            type_name: std::any::type_name::<C::Model>(),
        });
        self
    }

    /// Declares an exception carried in result field `id`. `E` must map to
    /// a struct.
    pub fn throws<E>(mut self, id: i16, name: &'static str) -> Self
    where
        E: ThriftValue + StdError,
    {
        self.throws
            .push((envelope::throws::<E>(id, name), std::any::type_name::<E>()));
        self
    }

    pub fn one_way(mut self) -> Self {
        self.one_way = true;
        self
    }

    pub fn build(self) -> Result<ThriftMethod, Error> {
        TypeMapper::with_resolution(move |resolution| self.compile(resolution))
    }

    fn compile(self, resolution: &mut Resolution) -> Result<ThriftMethod, Error> {
        let MethodBuilder {
            name,
            one_way,
            params,
            returns,
            throws,
        } = self;
        if one_way && (returns.is_some() || !throws.is_empty()) {
            return Err(Error::parse(ParseErrorKind::InvalidOneWay, name));
        }

        let mut args = StructSchema::<ArgsEnvelope>::new(format!("{name}_args"));
        let mut arg_specs = Vec::with_capacity(params.len());
        for (field, spec) in params {
            args = args.field(field);
            arg_specs.push(spec);
        }
        let args = args.compile(resolution)?;

        let mut result = StructSchema::<ResultEnvelope>::new(format!("{name}_result"));
        let (return_host, return_name) = match &returns {
            Some(spec) => (spec.host, spec.type_name),
            None => (TypeId::of::<()>(), std::any::type_name::<()>()),
        };
        let has_success = returns.is_some();
        if let Some(spec) = returns {
            result = result.field(spec.field);
        }
        let mut throws_types = Vec::with_capacity(throws.len());
        for (field, type_name) in throws {
            result = result.field(field);
            throws_types.push(type_name);
        }
        let result = result.compile(resolution)?;

        let (return_type, throws_fields) = if has_success {
            (result.fields()[0].wire_type().clone(), &result.fields()[1..])
        } else {
            (resolution.resolve::<()>()?, result.fields())
        };
        let mut clauses = Vec::with_capacity(throws_fields.len());
        for (field, type_name) in throws_fields.iter().zip(throws_types) {
            if !field.wire_type().is_struct() {
                return Err(Error::parse(ParseErrorKind::NotAnException, type_name));
            }
            clauses.push(ThrowsClause {
                id: field.id(),
                name: field.name().to_owned(),
                exception_type: field.wire_type().clone(),
                type_name,
            });
        }

        Ok(ThriftMethod {
            name,
            one_way,
            return_type,
            return_host,
            return_name,
            throws: clauses,
            arg_specs,
            args,
            result,
        })
    }
}
