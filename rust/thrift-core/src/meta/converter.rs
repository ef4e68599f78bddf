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

use chrono::{DateTime, Utc};

use crate::serializer::ThriftValue;

/// Bidirectional transform between a value on the wire and the value kept in
/// the host type.
///
/// Converters are stateless and total: every wire value maps to some model
/// value and back. `convert_back(convert(x))` only has to be wire compatible
/// with `x`, not equal to it.
pub trait Converter: Send + Sync + 'static {
    type Wire: ThriftValue;
    type Model: Send + Sync + 'static;

    fn convert(&self, wire: Self::Wire) -> Self::Model;

    fn convert_back(&self, model: &Self::Model) -> Self::Wire;

    fn name(&self) -> &'static str {
        std::any::type_name::<Self>()
    }
}

/// `DateTime<Utc>` carried as `i32` seconds since the Unix epoch.
///
/// Instants outside the `i32` range are clamped to it.
#[derive(Clone, Copy, Debug, Default)]
pub struct UnixDateConverter;

impl Converter for UnixDateConverter {
    type Wire = i32;
    type Model = DateTime<Utc>;

    fn convert(&self, wire: i32) -> DateTime<Utc> {
        DateTime::from_timestamp(i64::from(wire), 0).unwrap_or_default()
    }

    fn convert_back(&self, model: &DateTime<Utc>) -> i32 {
        model
            .timestamp()
            .clamp(i64::from(i32::MIN), i64::from(i32::MAX)) as i32
    }

    fn name(&self) -> &'static str {
        "unix-date"
    }
}

/// `DateTime<Utc>` carried as `i64` milliseconds since the Unix epoch, the
/// representation used by Java services.
#[derive(Clone, Copy, Debug, Default)]
pub struct JavaDateConverter;

impl Converter for JavaDateConverter {
    type Wire = i64;
    type Model = DateTime<Utc>;

    fn convert(&self, wire: i64) -> DateTime<Utc> {
        DateTime::from_timestamp_millis(wire).unwrap_or_default()
    }

    fn convert_back(&self, model: &DateTime<Utc>) -> i64 {
        model.timestamp_millis()
    }

    fn name(&self) -> &'static str {
        "java-date"
    }
}
