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

use tracing::warn;

use crate::error::Error;
use crate::protocol::Protocol;
use crate::serializer::ThriftEnum;

#[inline(always)]
pub fn write_enum<E: ThriftEnum>(value: &E, protocol: &mut dyn Protocol) -> Result<(), Error> {
    protocol.write_i32((*value).into())
}

/// Reads an enum value. Values this build does not know decode to the
/// enum's default member instead of failing, so that peers may add members.
pub fn read_enum<E: ThriftEnum>(protocol: &mut dyn Protocol) -> Result<E, Error> {
    let raw = protocol.read_i32()?;
    Ok(E::try_from(raw).unwrap_or_else(|_| {
        warn!(
            value = raw,
            enum_type = std::any::type_name::<E>(),
            "unknown enum value, using the default member"
        );
        E::default()
    }))
}
