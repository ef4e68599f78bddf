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

use crate::ensure;
use crate::error::Error;
use crate::meta::ThriftType;
use crate::protocol::Protocol;
use crate::serializer::ThriftValue;
use crate::types::{CollectionHeader, MapHeader, ThriftTypeId};

const MAX_PREALLOCATED: usize = 4096;

#[inline(always)]
fn wire_count(len: usize) -> Result<i32, Error> {
    i32::try_from(len)
        .map_err(|_| Error::invalid_data(format!("collection of {len} elements is too large")))
}

fn read_count(count: i32) -> Result<usize, Error> {
    usize::try_from(count).map_err(|_| Error::invalid_data(format!("negative count {count}")))
}

// Type ids only matter when there is something to decode; empty containers
// from other implementations often carry a placeholder id.
fn check_element_type(
    count: usize,
    expected: ThriftTypeId,
    actual: ThriftTypeId,
) -> Result<(), Error> {
    ensure!(
        count == 0 || expected == actual,
        Error::invalid_data(format!(
            "container element type mismatch: expected {expected:?}, got {actual:?}"
        ))
    );
    Ok(())
}

pub(super) fn write_list<'a, T, I>(
    items: I,
    ty: &ThriftType,
    protocol: &mut dyn Protocol,
) -> Result<(), Error>
where
    T: ThriftValue,
    I: ExactSizeIterator<Item = &'a T>,
{
    let element = ty.element()?;
    protocol.write_list_begin(&CollectionHeader {
        element_type: element.id(),
        count: wire_count(items.len())?,
    })?;
    for item in items {
        item.write_value(element, protocol)?;
    }
    protocol.write_list_end()
}

pub(super) fn read_list<T, C>(ty: &ThriftType, protocol: &mut dyn Protocol) -> Result<C, Error>
where
    T: ThriftValue,
    C: FromIterator<T>,
{
    let element = ty.element()?;
    let header = protocol.read_list_begin()?;
    let count = read_count(header.count)?;
    check_element_type(count, element.id(), header.element_type)?;
    let items = (0..count)
        .map(|_| T::read_value(element, protocol))
        .collect::<Result<C, Error>>()?;
    protocol.read_list_end()?;
    Ok(items)
}

/// Reads a list into a vector sized from the wire count. The up-front
/// reservation is capped so a forged count cannot allocate ahead of the data.
pub(super) fn read_array<T: ThriftValue>(
    ty: &ThriftType,
    protocol: &mut dyn Protocol,
) -> Result<Vec<T>, Error> {
    let element = ty.element()?;
    let header = protocol.read_list_begin()?;
    let count = read_count(header.count)?;
    check_element_type(count, element.id(), header.element_type)?;
    let mut items = Vec::with_capacity(count.min(MAX_PREALLOCATED));
    for _ in 0..count {
        items.push(T::read_value(element, protocol)?);
    }
    protocol.read_list_end()?;
    Ok(items)
}

pub(super) fn write_set<'a, T, I>(
    items: I,
    ty: &ThriftType,
    protocol: &mut dyn Protocol,
) -> Result<(), Error>
where
    T: ThriftValue,
    I: ExactSizeIterator<Item = &'a T>,
{
    let element = ty.element()?;
    protocol.write_set_begin(&CollectionHeader {
        element_type: element.id(),
        count: wire_count(items.len())?,
    })?;
    for item in items {
        item.write_value(element, protocol)?;
    }
    protocol.write_set_end()
}

pub(super) fn read_set<T, C>(ty: &ThriftType, protocol: &mut dyn Protocol) -> Result<C, Error>
where
    T: ThriftValue,
    C: FromIterator<T>,
{
    let element = ty.element()?;
    let header = protocol.read_set_begin()?;
    let count = read_count(header.count)?;
    check_element_type(count, element.id(), header.element_type)?;
    let items = (0..count)
        .map(|_| T::read_value(element, protocol))
        .collect::<Result<C, Error>>()?;
    protocol.read_set_end()?;
    Ok(items)
}

pub(super) fn write_map<'a, K, V, I>(
    entries: I,
    ty: &ThriftType,
    protocol: &mut dyn Protocol,
) -> Result<(), Error>
where
    K: ThriftValue,
    V: ThriftValue,
    I: ExactSizeIterator<Item = (&'a K, &'a V)>,
{
    let (key_type, value_type) = ty.key_value()?;
    protocol.write_map_begin(&MapHeader {
        key_type: key_type.id(),
        value_type: value_type.id(),
        count: wire_count(entries.len())?,
    })?;
    for (key, value) in entries {
        key.write_value(key_type, protocol)?;
        value.write_value(value_type, protocol)?;
    }
    protocol.write_map_end()
}

pub(super) fn read_map<K, V, C>(ty: &ThriftType, protocol: &mut dyn Protocol) -> Result<C, Error>
where
    K: ThriftValue,
    V: ThriftValue,
    C: FromIterator<(K, V)>,
{
    let (key_type, value_type) = ty.key_value()?;
    let header = protocol.read_map_begin()?;
    let count = read_count(header.count)?;
    check_element_type(count, key_type.id(), header.key_type)?;
    check_element_type(count, value_type.id(), header.value_type)?;
    let entries = (0..count)
        .map(|_| {
            let key = K::read_value(key_type, protocol)?;
            let value = V::read_value(value_type, protocol)?;
            Ok((key, value))
        })
        .collect::<Result<C, Error>>()?;
    protocol.read_map_end()?;
    Ok(entries)
}
