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

use std::collections::HashMap;
use std::sync::Arc;
use thrift_core::error::{Error, ParseErrorKind};
use thrift_core::meta::{Field, Presence, StructSchema};
use thrift_core::resolver::TypeMapper;
use thrift_core::serializer::{to_bytes, ThriftStructType};
use thrift_core::thrift_struct;
use thrift_core::types::ThriftTypeId;

#[derive(Clone, Debug, Default, PartialEq)]
struct DuplicateIds {
    a: i32,
    b: i64,
}

impl ThriftStructType for DuplicateIds {
    fn describe() -> StructSchema<Self> {
        StructSchema::new("DuplicateIds")
            .field(Field::new(1, "a", |s: &Self| &s.a, |s, v| s.a = v))
            .field(Field::new(1, "b", |s: &Self| &s.b, |s, v| s.b = v))
    }
}
thrift_struct!(DuplicateIds);

#[test]
fn duplicate_field_id() {
    let err = TypeMapper::resolve::<DuplicateIds>().unwrap_err();
    assert_eq!(err.parse_kind(), Some(ParseErrorKind::DuplicateFieldId(1)));
    match err {
        Error::Parse { type_name, .. } => assert_eq!(type_name, "DuplicateIds"),
        other => panic!("unexpected {other:?}"),
    }
    assert!(TypeMapper::cached::<DuplicateIds>().is_none());
}

#[derive(Clone, Debug, Default, PartialEq)]
struct DuplicateNames {
    a: i32,
    b: i32,
}

impl ThriftStructType for DuplicateNames {
    fn describe() -> StructSchema<Self> {
        StructSchema::new("DuplicateNames")
            .field(Field::new(1, "value", |s: &Self| &s.a, |s, v| s.a = v))
            .field(Field::new(2, "value", |s: &Self| &s.b, |s, v| s.b = v))
    }
}
thrift_struct!(DuplicateNames);

#[test]
fn duplicate_field_name() {
    let err = TypeMapper::resolve::<DuplicateNames>().unwrap_err();
    assert_eq!(err.parse_kind(), Some(ParseErrorKind::DuplicateFieldName));
}

#[derive(Clone, Debug, Default, PartialEq)]
struct Unsigned {
    count: u32,
}

impl ThriftStructType for Unsigned {
    fn describe() -> StructSchema<Self> {
        StructSchema::new("Unsigned")
            .field(Field::new(1, "count", |s: &Self| &s.count, |s, v| s.count = v))
    }
}
thrift_struct!(Unsigned);

#[test]
fn unsigned_fields_have_no_wire_type() {
    let err = to_bytes(&Unsigned { count: 1 }).unwrap_err();
    assert_eq!(err.parse_kind(), Some(ParseErrorKind::UnknownValueType));
}

#[derive(Clone, Debug, Default, PartialEq)]
struct VoidField {
    nothing: (),
}

impl ThriftStructType for VoidField {
    fn describe() -> StructSchema<Self> {
        StructSchema::new("VoidField")
            .field(Field::new(1, "nothing", |s: &Self| &s.nothing, |s, v| s.nothing = v))
    }
}
thrift_struct!(VoidField);

#[test]
fn void_fields_are_rejected() {
    let err = TypeMapper::resolve::<VoidField>().unwrap_err();
    assert_eq!(err.parse_kind(), Some(ParseErrorKind::VoidNotAllowed));
}

#[derive(Clone, Debug, Default, PartialEq)]
struct Holder {
    id: i32,
    broken: Vec<DuplicateIds>,
}

impl ThriftStructType for Holder {
    fn describe() -> StructSchema<Self> {
        StructSchema::new("Holder")
            .field(Field::new(1, "id", |s: &Self| &s.id, |s, v| s.id = v))
            .field(Field::new(2, "broken", |s: &Self| &s.broken, |s, v| s.broken = v))
    }
}
thrift_struct!(Holder);

#[test]
fn failure_in_a_nested_type_publishes_nothing() {
    let err = TypeMapper::resolve::<Holder>().unwrap_err();
    assert_eq!(err.parse_kind(), Some(ParseErrorKind::DuplicateFieldId(1)));
    assert!(TypeMapper::cached::<Holder>().is_none());
    assert!(TypeMapper::cached::<Vec<DuplicateIds>>().is_none());
    // the failure is permanent
    assert!(TypeMapper::resolve::<Holder>().is_err());
}

#[derive(Clone, Debug, Default, PartialEq)]
struct Account {
    id: i64,
    owner: String,
    balance: Option<f64>,
    tags: HashMap<String, String>,
    limit: i32,
}

impl ThriftStructType for Account {
    fn describe() -> StructSchema<Self> {
        StructSchema::new("Account")
            .field(Field::new(1, "id", |s: &Self| &s.id, |s, v| s.id = v).required())
            .field(Field::new(2, "owner", |s: &Self| &s.owner, |s, v| s.owner = v))
            .field(Field::new(4, "balance", |s: &Self| &s.balance, |s, v| s.balance = v))
            .field(Field::new(3, "tags", |s: &Self| &s.tags, |s, v| s.tags = v))
            .field(
                Field::new(5, "limit", |s: &Self| &s.limit, |s, v| s.limit = v)
                    .default_value(100),
            )
    }
}
thrift_struct!(Account);

#[test]
fn struct_metadata() {
    let ty = TypeMapper::resolve::<Account>().unwrap();
    assert_eq!(ty.id(), ThriftTypeId::Struct);
    let account = ty.as_struct().unwrap();
    assert_eq!(account.name(), "Account");
    assert!(account.host_name().ends_with("Account"));

    // declaration order is kept
    let ids: Vec<i16> = account.fields().iter().map(|f| f.id()).collect();
    assert_eq!(ids, vec![1, 2, 4, 3, 5]);

    let id = account.field(1).unwrap();
    assert_eq!(id.name(), "id");
    assert!(id.is_required());
    assert_eq!(id.header().type_id, ThriftTypeId::Int64);

    let balance = account.field(4).unwrap();
    assert_eq!(balance.presence(), Presence::Optional);
    assert_eq!(balance.wire_type().id(), ThriftTypeId::Double);

    let tags = account.field(3).unwrap().wire_type();
    let (key, value) = tags.key_value().unwrap();
    assert_eq!(key.id(), ThriftTypeId::Binary);
    assert_eq!(value.id(), ThriftTypeId::Binary);

    assert!(account.field(5).unwrap().has_default());
    assert!(account.field(6).is_none());
}

#[test]
fn resolution_is_memoized() {
    let first = TypeMapper::resolve::<Account>().unwrap();
    let second = TypeMapper::resolve::<Account>().unwrap();
    assert!(Arc::ptr_eq(&first, &second));
    assert!(Arc::ptr_eq(&TypeMapper::cached::<Account>().unwrap(), &first));
}

#[test]
fn struct_lookup() {
    let account = TypeMapper::struct_of::<Account>().unwrap();
    assert_eq!(account.name(), "Account");
    assert_eq!(account.fields().len(), 5);

    let err = TypeMapper::struct_of::<Vec<i32>>().unwrap_err();
    assert_eq!(err.parse_kind(), Some(ParseErrorKind::NotAStruct));
}
