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

use crate::error::Error;
use crate::protocol::Protocol;
use crate::types::ThriftTypeId;

/// Consumes one value of type `type_id` without materializing it.
///
/// Follows exactly the traversal the typed readers perform, so the stream
/// stays in sync after an unknown field. Nesting deeper than the protocol's
/// recursion limit fails with [`Error::DepthExceeded`].
pub fn skip(protocol: &mut dyn Protocol, type_id: ThriftTypeId) -> Result<(), Error> {
    let depth = protocol.recursion_limit();
    skip_till_depth(protocol, type_id, depth)
}

fn skip_till_depth(
    protocol: &mut dyn Protocol,
    type_id: ThriftTypeId,
    depth: usize,
) -> Result<(), Error> {
    if depth == 0 {
        return Err(Error::depth_exceeded(format!(
            "cannot skip {type_id:?}: maximum nesting depth exceeded"
        )));
    }
    match type_id {
        ThriftTypeId::Boolean => protocol.read_bool().map(drop),
        ThriftTypeId::SByte => protocol.read_i8().map(drop),
        ThriftTypeId::Double => protocol.read_double().map(drop),
        ThriftTypeId::Int16 => protocol.read_i16().map(drop),
        ThriftTypeId::Int32 => protocol.read_i32().map(drop),
        ThriftTypeId::Int64 => protocol.read_i64().map(drop),
        // strings are skipped as bytes, they need not be valid utf-8 here
        ThriftTypeId::Binary => protocol.read_binary().map(drop),
        ThriftTypeId::Struct => {
            protocol.read_struct_begin()?;
            loop {
                let header = protocol.read_field_begin()?;
                if header.is_stop() {
                    break;
                }
                skip_till_depth(protocol, header.type_id, depth - 1)?;
                protocol.read_field_end()?;
            }
            protocol.read_struct_end()
        }
        ThriftTypeId::List => {
            let header = protocol.read_list_begin()?;
            for _ in 0..header.count {
                skip_till_depth(protocol, header.element_type, depth - 1)?;
            }
            protocol.read_list_end()
        }
        ThriftTypeId::Set => {
            let header = protocol.read_set_begin()?;
            for _ in 0..header.count {
                skip_till_depth(protocol, header.element_type, depth - 1)?;
            }
            protocol.read_set_end()
        }
        ThriftTypeId::Map => {
            let header = protocol.read_map_begin()?;
            for _ in 0..header.count {
                skip_till_depth(protocol, header.key_type, depth - 1)?;
                skip_till_depth(protocol, header.value_type, depth - 1)?;
            }
            protocol.read_map_end()
        }
        ThriftTypeId::Empty => Err(Error::invalid_data("cannot skip a value of type Empty")),
    }
}
