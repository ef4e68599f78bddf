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

use bytes::Bytes;
use num_enum::{IntoPrimitive, TryFromPrimitive};
use std::collections::{BTreeMap, BTreeSet, HashMap, HashSet, LinkedList, VecDeque};
use thrift_core::error::Error;
use thrift_core::meta::{Field, StructSchema};
use thrift_core::serializer::{from_bytes, read_struct, to_bytes, write_struct, ThriftStructType};
use thrift_core::types::ThriftTypeId;
use thrift_core::{thrift_enum, thrift_struct, BinaryProtocol, MemoryTransport};
use thrift_tests::round_trip;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, IntoPrimitive, TryFromPrimitive)]
#[repr(i32)]
enum Color {
    Red = 0,
    Green = 1,
    Blue = 7,
}

impl Default for Color {
    fn default() -> Self {
        Color::Red
    }
}
thrift_enum!(Color);

#[derive(Clone, Debug, Default, PartialEq)]
struct Primitives {
    flag: bool,
    byte: i8,
    ratio: f64,
    short: i16,
    int: i32,
    long: i64,
    text: String,
    blob: Bytes,
    color: Color,
    maybe: Option<i32>,
}

impl ThriftStructType for Primitives {
    fn describe() -> StructSchema<Self> {
        StructSchema::new("Primitives")
            .field(Field::new(1, "flag", |s: &Self| &s.flag, |s, v| s.flag = v).required())
            .field(Field::new(2, "byte", |s: &Self| &s.byte, |s, v| s.byte = v).required())
            .field(Field::new(3, "ratio", |s: &Self| &s.ratio, |s, v| s.ratio = v).required())
            .field(Field::new(4, "short", |s: &Self| &s.short, |s, v| s.short = v).required())
            .field(Field::new(5, "int", |s: &Self| &s.int, |s, v| s.int = v).required())
            .field(Field::new(6, "long", |s: &Self| &s.long, |s, v| s.long = v).required())
            .field(Field::new(7, "text", |s: &Self| &s.text, |s, v| s.text = v).required())
            .field(Field::new(8, "blob", |s: &Self| &s.blob, |s, v| s.blob = v).required())
            .field(Field::new(9, "color", |s: &Self| &s.color, |s, v| s.color = v).required())
            .field(Field::new(10, "maybe", |s: &Self| &s.maybe, |s, v| s.maybe = v))
    }
}
thrift_struct!(Primitives);

#[test]
fn primitives_round_trip() {
    let value = Primitives {
        flag: true,
        byte: -5,
        ratio: 2.5,
        short: -300,
        int: 123_456,
        long: i64::MIN,
        text: "héllo".to_string(),
        blob: Bytes::from_static(&[0, 1, 2, 255]),
        color: Color::Blue,
        maybe: Some(-1),
    };
    assert_eq!(round_trip(&value), value);

    let without = Primitives {
        maybe: None,
        ..value
    };
    assert_eq!(round_trip(&without), without);
}

#[derive(Clone, Debug, Default, PartialEq)]
struct Collections {
    ints: Vec<i32>,
    names: HashSet<String>,
    scores: BTreeMap<String, i64>,
    queue: VecDeque<i16>,
    flags: LinkedList<bool>,
    fixed: Box<[i64]>,
    groups: HashMap<i32, Vec<String>>,
    small: BTreeSet<i8>,
    colors: Vec<Color>,
    tags: Option<Vec<String>>,
}

impl ThriftStructType for Collections {
    fn describe() -> StructSchema<Self> {
        StructSchema::new("Collections")
            .field(Field::new(1, "ints", |s: &Self| &s.ints, |s, v| s.ints = v))
            .field(Field::new(2, "names", |s: &Self| &s.names, |s, v| s.names = v))
            .field(Field::new(3, "scores", |s: &Self| &s.scores, |s, v| s.scores = v))
            .field(Field::new(4, "queue", |s: &Self| &s.queue, |s, v| s.queue = v))
            .field(Field::new(5, "flags", |s: &Self| &s.flags, |s, v| s.flags = v))
            .field(Field::new(6, "fixed", |s: &Self| &s.fixed, |s, v| s.fixed = v))
            .field(Field::new(7, "groups", |s: &Self| &s.groups, |s, v| s.groups = v))
            .field(Field::new(8, "small", |s: &Self| &s.small, |s, v| s.small = v))
            .field(Field::new(9, "colors", |s: &Self| &s.colors, |s, v| s.colors = v))
            .field(Field::new(10, "tags", |s: &Self| &s.tags, |s, v| s.tags = v))
    }
}
thrift_struct!(Collections);

#[test]
fn collections_round_trip() {
    let value = Collections {
        ints: vec![1, -2, 3],
        names: ["a", "b", "c"].into_iter().map(String::from).collect(),
        scores: [("x".to_string(), 10), ("y".to_string(), -20)]
            .into_iter()
            .collect(),
        queue: VecDeque::from(vec![7, 8]),
        flags: [true, false, true].into_iter().collect(),
        fixed: vec![i64::MAX, 0].into_boxed_slice(),
        groups: [(1, vec!["one".to_string()]), (2, vec![])].into_iter().collect(),
        small: [-1, 0, 1].into_iter().collect(),
        colors: vec![Color::Green, Color::Red],
        tags: Some(vec!["t".to_string()]),
    };
    assert_eq!(round_trip(&value), value);
}

#[test]
fn empty_collections_round_trip() {
    let value = Collections::default();
    assert_eq!(round_trip(&value), value);
}

#[derive(Clone, Debug, Default, PartialEq)]
struct Inner {
    id: i32,
    label: String,
}

impl ThriftStructType for Inner {
    fn describe() -> StructSchema<Self> {
        StructSchema::new("Inner")
            .field(Field::new(1, "id", |s: &Self| &s.id, |s, v| s.id = v).required())
            .field(Field::new(2, "label", |s: &Self| &s.label, |s, v| s.label = v))
    }
}
thrift_struct!(Inner);

#[derive(Clone, Debug, Default, PartialEq)]
struct Outer {
    inner: Inner,
    inners: Vec<Inner>,
    by_name: HashMap<String, Inner>,
    maybe: Option<Inner>,
}

impl ThriftStructType for Outer {
    fn describe() -> StructSchema<Self> {
        StructSchema::new("Outer")
            .field(Field::new(1, "inner", |s: &Self| &s.inner, |s, v| s.inner = v).required())
            .field(Field::new(2, "inners", |s: &Self| &s.inners, |s, v| s.inners = v))
            .field(Field::new(3, "by_name", |s: &Self| &s.by_name, |s, v| s.by_name = v))
            .field(Field::new(4, "maybe", |s: &Self| &s.maybe, |s, v| s.maybe = v))
    }
}
thrift_struct!(Outer);

#[test]
fn nested_structs_round_trip() {
    let inner = |id: i32| Inner {
        id,
        label: format!("inner-{id}"),
    };
    let value = Outer {
        inner: inner(1),
        inners: vec![inner(2), inner(3)],
        by_name: [("four".to_string(), inner(4))].into_iter().collect(),
        maybe: Some(inner(5)),
    };
    assert_eq!(round_trip(&value), value);
}

#[derive(Clone, Debug, Default, PartialEq)]
struct Single {
    value: i32,
}

impl ThriftStructType for Single {
    fn describe() -> StructSchema<Self> {
        StructSchema::new("Single")
            .field(Field::new(1, "value", |s: &Self| &s.value, |s, v| s.value = v).required())
    }
}
thrift_struct!(Single);

#[test]
fn required_int32_encoding() {
    let bytes = to_bytes(&Single { value: 123_456 }).unwrap();
    assert_eq!(
        &bytes[..],
        &[0x08, 0x00, 0x01, 0x00, 0x01, 0xE2, 0x40, 0x00]
    );
    assert_eq!(from_bytes::<Single>(&bytes).unwrap().value, 123_456);
}

#[derive(Clone, Debug, Default, PartialEq)]
struct Text {
    value: String,
}

impl ThriftStructType for Text {
    fn describe() -> StructSchema<Self> {
        StructSchema::new("Text")
            .field(Field::new(1, "value", |s: &Self| &s.value, |s, v| s.value = v).required())
    }
}
thrift_struct!(Text);

#[test]
fn required_string_encoding() {
    let bytes = to_bytes(&Text {
        value: "hi".to_string(),
    })
    .unwrap();
    assert_eq!(
        &bytes[..],
        &[0x0B, 0x00, 0x01, 0x00, 0x00, 0x00, 0x02, 0x68, 0x69, 0x00]
    );
}

#[derive(Clone, Debug, Default, PartialEq)]
struct Numbers {
    values: Vec<i32>,
}

impl ThriftStructType for Numbers {
    fn describe() -> StructSchema<Self> {
        StructSchema::new("Numbers")
            .field(Field::new(1, "values", |s: &Self| &s.values, |s, v| s.values = v).required())
    }
}
thrift_struct!(Numbers);

#[test]
fn required_list_encoding() {
    let bytes = to_bytes(&Numbers {
        values: vec![1, 2, 3],
    })
    .unwrap();
    #[rustfmt::skip]
    let expected = [
        0x0F, 0x00, 0x01,
        0x08, 0x00, 0x00, 0x00, 0x03,
        0x00, 0x00, 0x00, 0x01,
        0x00, 0x00, 0x00, 0x02,
        0x00, 0x00, 0x00, 0x03,
        0x00,
    ];
    assert_eq!(&bytes[..], &expected);
}

#[test]
fn missing_required_field() {
    match from_bytes::<Single>(&[0x00]) {
        Err(Error::MissingRequiredField {
            struct_name,
            field_name,
        }) => {
            assert_eq!(struct_name, "Single");
            assert_eq!(field_name, "value");
        }
        other => panic!("unexpected {other:?}"),
    }
}

#[derive(Clone, Debug, Default, PartialEq)]
struct Person {
    id: i32,
    name: Option<String>,
    nickname: Option<String>,
}

impl ThriftStructType for Person {
    fn describe() -> StructSchema<Self> {
        StructSchema::new("Person")
            .field(Field::new(1, "id", |s: &Self| &s.id, |s, v| s.id = v).required())
            .field(Field::new(2, "name", |s: &Self| &s.name, |s, v| s.name = v).required())
            .field(Field::new(3, "nickname", |s: &Self| &s.nickname, |s, v| s.nickname = v))
    }
}
thrift_struct!(Person);

#[test]
fn required_field_is_null() {
    let person = Person {
        id: 7,
        name: None,
        nickname: Some("x".to_string()),
    };
    let mut protocol = BinaryProtocol::new(MemoryTransport::new());
    match write_struct(&person, &mut protocol) {
        Err(Error::RequiredFieldIsNull { field_name, .. }) => assert_eq!(field_name, "name"),
        other => panic!("unexpected {other:?}"),
    }
    // nothing of the rejected field reached the wire
    assert_eq!(
        protocol.transport().written(),
        &[0x08, 0x00, 0x01, 0x00, 0x00, 0x00, 0x07]
    );
}

#[test]
fn unset_optional_field_is_omitted() {
    let person = Person {
        id: 1,
        name: Some("a".to_string()),
        nickname: None,
    };
    let bytes = to_bytes(&person).unwrap();
    assert_eq!(
        &bytes[..],
        &[0x08, 0, 1, 0, 0, 0, 1, 0x0B, 0, 2, 0, 0, 0, 1, b'a', 0x00]
    );
    assert_eq!(from_bytes::<Person>(&bytes).unwrap(), person);
}

#[derive(Clone, Debug, Default, PartialEq)]
struct Settings {
    retries: i32,
    name: String,
    verbose: Option<bool>,
}

impl ThriftStructType for Settings {
    fn describe() -> StructSchema<Self> {
        StructSchema::new("Settings")
            .field(
                Field::new(1, "retries", |s: &Self| &s.retries, |s, v| s.retries = v)
                    .default_value(3),
            )
            .field(
                Field::new(2, "name", |s: &Self| &s.name, |s, v| s.name = v)
                    .default_value("main".to_string()),
            )
            .field(Field::new(3, "verbose", |s: &Self| &s.verbose, |s, v| s.verbose = v))
    }
}
thrift_struct!(Settings);

#[test]
fn default_values_are_omitted_and_back_filled() {
    let defaults = Settings {
        retries: 3,
        name: "main".to_string(),
        verbose: None,
    };
    let bytes = to_bytes(&defaults).unwrap();
    assert_eq!(&bytes[..], &[0x00]);
    // the declared defaults win over the host type's Default
    assert_eq!(from_bytes::<Settings>(&bytes).unwrap(), defaults);

    let custom = Settings {
        retries: 5,
        name: "main".to_string(),
        verbose: Some(false),
    };
    let bytes = to_bytes(&custom).unwrap();
    assert_eq!(
        &bytes[..],
        &[0x08, 0, 1, 0, 0, 0, 5, 0x02, 0, 3, 0, 0x00]
    );
    assert_eq!(from_bytes::<Settings>(&bytes).unwrap(), custom);
}

#[derive(Clone, Debug, Default, PartialEq)]
struct RecordV1 {
    id: i32,
    name: String,
}

impl ThriftStructType for RecordV1 {
    fn describe() -> StructSchema<Self> {
        StructSchema::new("Record")
            .field(Field::new(1, "id", |s: &Self| &s.id, |s, v| s.id = v).required())
            .field(Field::new(2, "name", |s: &Self| &s.name, |s, v| s.name = v))
    }
}
thrift_struct!(RecordV1);

#[derive(Clone, Debug, Default, PartialEq)]
struct RecordV2 {
    id: i32,
    history: Vec<Inner>,
    attributes: HashMap<String, Vec<i64>>,
    parent: Option<Inner>,
    name: String,
}

impl ThriftStructType for RecordV2 {
    fn describe() -> StructSchema<Self> {
        StructSchema::new("Record")
            .field(Field::new(1, "id", |s: &Self| &s.id, |s, v| s.id = v).required())
            .field(Field::new(5, "history", |s: &Self| &s.history, |s, v| s.history = v))
            .field(Field::new(6, "attributes", |s: &Self| &s.attributes, |s, v| s.attributes = v))
            .field(Field::new(7, "parent", |s: &Self| &s.parent, |s, v| s.parent = v))
            .field(Field::new(2, "name", |s: &Self| &s.name, |s, v| s.name = v))
    }
}
thrift_struct!(RecordV2);

#[test]
fn unknown_fields_are_skipped() {
    let newer = RecordV2 {
        id: 9,
        history: vec![Inner {
            id: 1,
            label: "old".to_string(),
        }],
        attributes: [("k".to_string(), vec![1, 2])].into_iter().collect(),
        parent: Some(Inner::default()),
        name: "record".to_string(),
    };
    let older = from_bytes::<RecordV1>(&to_bytes(&newer).unwrap()).unwrap();
    assert_eq!(
        older,
        RecordV1 {
            id: 9,
            name: "record".to_string(),
        }
    );
}

#[derive(Clone, Debug, Default, PartialEq)]
struct SingleLong {
    value: i64,
}

impl ThriftStructType for SingleLong {
    fn describe() -> StructSchema<Self> {
        StructSchema::new("Single")
            .field(Field::new(1, "value", |s: &Self| &s.value, |s, v| s.value = v).required())
    }
}
thrift_struct!(SingleLong);

#[test]
fn type_id_mismatch_is_detected() {
    let bytes = to_bytes(&SingleLong { value: 1 }).unwrap();
    match from_bytes::<Single>(&bytes) {
        Err(Error::TypeIdMismatch {
            field_id,
            expected,
            actual,
            ..
        }) => {
            assert_eq!(field_id, 1);
            assert_eq!(expected, ThriftTypeId::Int32);
            assert_eq!(actual, ThriftTypeId::Int64);
        }
        other => panic!("unexpected {other:?}"),
    }
}

#[test]
fn reading_stops_at_the_stop_marker() {
    let bytes = vec![0x08, 0x00, 0x01, 0x00, 0x00, 0x00, 0x2A, 0x00, 0xFF, 0xFF];
    let mut protocol = BinaryProtocol::new(MemoryTransport::from_bytes(bytes));
    let single: Single = read_struct(&mut protocol).unwrap();
    assert_eq!(single.value, 42);
    assert_eq!(protocol.transport().remaining(), 2);
}

#[derive(Clone, Debug, Default, PartialEq)]
struct Pair {
    a: i32,
    b: i32,
}

impl ThriftStructType for Pair {
    fn describe() -> StructSchema<Self> {
        StructSchema::new("Pair")
            .field(Field::new(1, "a", |s: &Self| &s.a, |s, v| s.a = v).required())
            .field(Field::new(2, "b", |s: &Self| &s.b, |s, v| s.b = v).required())
    }
}
thrift_struct!(Pair);

#[test]
fn fields_are_matched_by_id_not_position() {
    #[rustfmt::skip]
    let bytes = [
        0x08, 0x00, 0x02, 0x00, 0x00, 0x00, 0x02,
        0x08, 0x00, 0x01, 0x00, 0x00, 0x00, 0x01,
        0x00,
    ];
    assert_eq!(from_bytes::<Pair>(&bytes).unwrap(), Pair { a: 1, b: 2 });
}

#[derive(Clone, Debug, Default, PartialEq)]
struct Palette {
    color: Color,
}

impl ThriftStructType for Palette {
    fn describe() -> StructSchema<Self> {
        StructSchema::new("Palette")
            .field(Field::new(1, "color", |s: &Self| &s.color, |s, v| s.color = v).required())
    }
}
thrift_struct!(Palette);

#[test]
fn enums_travel_as_i32() {
    let bytes = to_bytes(&Palette { color: Color::Blue }).unwrap();
    assert_eq!(&bytes[..], &[0x08, 0x00, 0x01, 0x00, 0x00, 0x00, 0x07, 0x00]);
}

#[test]
fn unknown_enum_value_decodes_to_default() {
    let bytes = [0x08, 0x00, 0x01, 0x00, 0x00, 0x00, 0x63, 0x00];
    assert_eq!(from_bytes::<Palette>(&bytes).unwrap().color, Color::Red);
}

#[test]
fn container_element_type_is_checked() {
    // list<i64> where the schema expects list<i32>
    #[rustfmt::skip]
    let bytes = [
        0x0F, 0x00, 0x01,
        0x0A, 0x00, 0x00, 0x00, 0x01,
        0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x01,
        0x00,
    ];
    assert!(matches!(
        from_bytes::<Numbers>(&bytes),
        Err(Error::InvalidData(_))
    ));
}

#[test]
fn truncated_input_is_a_transport_error() {
    let err = from_bytes::<Single>(&[0x08, 0x00, 0x01, 0x00]).unwrap_err();
    assert!(err.is_transport());
}

#[derive(Debug, Default, PartialEq)]
struct Samples {
    values: Box<[i64]>,
}

impl ThriftStructType for Samples {
    fn describe() -> StructSchema<Self> {
        StructSchema::new("Samples")
            .field(Field::new(1, "values", |s: &Self| &s.values, |s, v| s.values = v))
    }
}
thrift_struct!(Samples);

#[test]
fn array_reads_the_wire_count() {
    let samples = Samples {
        values: vec![3, -1, i64::MAX].into_boxed_slice(),
    };
    let bytes = to_bytes(&samples).unwrap();
    assert_eq!(&bytes[..8], &[0x0F, 0x00, 0x01, 0x0A, 0x00, 0x00, 0x00, 0x03]);
    let decoded: Samples = from_bytes(&bytes).unwrap();
    assert_eq!(decoded.values.len(), 3);
    assert_eq!(decoded, samples);
}

#[test]
fn forged_array_count_fails_on_missing_elements() {
    let mut bytes = vec![0x0F, 0x00, 0x01, 0x0A, 0x7F, 0xFF, 0xFF, 0xFF];
    bytes.extend_from_slice(&1i64.to_be_bytes());
    bytes.extend_from_slice(&2i64.to_be_bytes());
    let err = from_bytes::<Samples>(&bytes).unwrap_err();
    assert!(matches!(err, Error::Transport(_)));
}
