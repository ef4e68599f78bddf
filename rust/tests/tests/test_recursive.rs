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

use std::sync::Arc;
use thrift_core::error::Error;
use thrift_core::meta::{Field, StructSchema, ThriftType};
use thrift_core::resolver::TypeMapper;
use thrift_core::serializer::{
    from_bytes, read_struct, to_bytes, write_struct, ThriftStructType,
};
use thrift_core::{thrift_struct, BinaryProtocol, MemoryTransport, ProtocolConfig};
use thrift_tests::round_trip;

#[derive(Clone, Debug, Default, PartialEq)]
struct Node {
    value: i32,
    next: Option<Box<Node>>,
}

impl ThriftStructType for Node {
    fn describe() -> StructSchema<Self> {
        StructSchema::new("Node")
            .field(Field::new(1, "value", |s: &Self| &s.value, |s, v| s.value = v).required())
            .field(Field::new(2, "next", |s: &Self| &s.next, |s, v| s.next = v))
    }
}
thrift_struct!(Node);

#[test]
fn self_reference_shares_one_definition() {
    let ty = TypeMapper::resolve::<Node>().unwrap();
    let node = ty.as_struct().unwrap();
    let next = node.field(2).unwrap().wire_type();
    let ThriftType::Nullable(inner) = &**next else {
        panic!("expected a nullable field, got {next:?}");
    };
    assert!(Arc::ptr_eq(inner.as_struct().unwrap(), node));
    assert!(Arc::ptr_eq(&TypeMapper::resolve::<Node>().unwrap(), &ty));
}

#[test]
fn linked_list_round_trip() {
    let head = chain(5);
    let bytes = to_bytes(&head).unwrap();
    let decoded: Node = from_bytes(&bytes).unwrap();
    assert_eq!(decoded, head);

    let mut values = vec![];
    let mut cursor = Some(&decoded);
    while let Some(node) = cursor {
        values.push(node.value);
        cursor = node.next.as_deref();
    }
    assert_eq!(values, vec![1, 2, 3, 4, 5]);
}

fn chain(len: i32) -> Node {
    let list = (1..=len).rev().fold(None, |next, value| {
        Some(Box::new(Node { value, next }))
    });
    *list.unwrap()
}

#[test]
fn deeply_nested_input_is_rejected() {
    // `next` headers only, each opening another Node
    let mut bytes = [0x0C, 0x00, 0x02].repeat(2000);
    bytes.push(0x00);
    match from_bytes::<Node>(&bytes) {
        Err(Error::DepthExceeded(_)) => {}
        other => panic!("expected DepthExceeded, got {other:?}"),
    }
}

#[test]
fn nesting_up_to_the_limit_is_accepted() {
    let head = chain(64);
    let bytes = to_bytes(&head).unwrap();
    let decoded: Node = from_bytes(&bytes).unwrap();
    assert_eq!(decoded, head);

    let too_deep = to_bytes(&chain(65)).unwrap_err();
    assert!(matches!(too_deep, Error::DepthExceeded(_)));
}

#[test]
fn configured_limit_applies_to_both_directions() {
    let config = ProtocolConfig::new().recursion_limit(10);
    let mut writer = BinaryProtocol::with_config(MemoryTransport::new(), config.clone());
    let err = write_struct(&chain(100), &mut writer).unwrap_err();
    assert!(matches!(err, Error::DepthExceeded(_)));

    // the failed write leaves the protocol usable at full depth again
    let mut writer = BinaryProtocol::with_config(MemoryTransport::new(), config.clone());
    assert!(write_struct(&chain(11), &mut writer).is_err());
    write_struct(&chain(10), &mut writer).unwrap();

    let bytes = to_bytes(&chain(11)).unwrap();
    let mut reader = BinaryProtocol::with_config(MemoryTransport::from_bytes(bytes), config);
    let err = read_struct::<Node>(&mut reader).unwrap_err();
    assert!(matches!(err, Error::DepthExceeded(_)));
}

#[derive(Clone, Debug, Default, PartialEq)]
struct Tree {
    label: String,
    children: Vec<Tree>,
}

impl ThriftStructType for Tree {
    fn describe() -> StructSchema<Self> {
        StructSchema::new("Tree")
            .field(Field::new(1, "label", |s: &Self| &s.label, |s, v| s.label = v))
            .field(Field::new(2, "children", |s: &Self| &s.children, |s, v| s.children = v))
    }
}
thrift_struct!(Tree);

#[test]
fn tree_round_trip() {
    let leaf = |label: &str| Tree {
        label: label.to_string(),
        children: vec![],
    };
    let tree = Tree {
        label: "root".to_string(),
        children: vec![
            Tree {
                label: "left".to_string(),
                children: vec![leaf("a"), leaf("b")],
            },
            leaf("right"),
        ],
    };
    assert_eq!(round_trip(&tree), tree);
}

#[derive(Clone, Debug, Default, PartialEq)]
struct Employee {
    name: String,
    manager: Option<Box<Manager>>,
}

#[derive(Clone, Debug, Default, PartialEq)]
struct Manager {
    name: String,
    reports: Vec<Employee>,
}

impl ThriftStructType for Employee {
    fn describe() -> StructSchema<Self> {
        StructSchema::new("Employee")
            .field(Field::new(1, "name", |s: &Self| &s.name, |s, v| s.name = v).required())
            .field(Field::new(2, "manager", |s: &Self| &s.manager, |s, v| s.manager = v))
    }
}

impl ThriftStructType for Manager {
    fn describe() -> StructSchema<Self> {
        StructSchema::new("Manager")
            .field(Field::new(1, "name", |s: &Self| &s.name, |s, v| s.name = v).required())
            .field(Field::new(2, "reports", |s: &Self| &s.reports, |s, v| s.reports = v))
    }
}
thrift_struct!(Employee, Manager);

#[test]
fn mutually_recursive_structs() {
    let employee = Employee {
        name: "ada".to_string(),
        manager: Some(Box::new(Manager {
            name: "grace".to_string(),
            reports: vec![Employee {
                name: "alan".to_string(),
                manager: None,
            }],
        })),
    };
    assert_eq!(round_trip(&employee), employee);

    // resolving one side published the other
    let manager = TypeMapper::cached::<Manager>().expect("manager is cached");
    let reports = manager.as_struct().unwrap().field(2).unwrap().wire_type();
    let element = reports.element().unwrap();
    assert!(Arc::ptr_eq(
        element.as_struct().unwrap(),
        TypeMapper::resolve::<Employee>().unwrap().as_struct().unwrap()
    ));
}
