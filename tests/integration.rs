//! Integration tests over shared, cyclic and bucketed object graphs.

use std::cell::RefCell;
use std::rc::Rc;

use xson::{Encoder, Node, StaticMapper, Strategy, Value, XObject, XsonError, XsonFormat};

/// Record with a single `f` field, set after creation so graphs can be
/// wired into cycles.
#[derive(Debug, Default)]
struct Foo {
    f: RefCell<Option<Value>>,
}

impl Foo {
    fn new() -> Rc<Self> {
        Rc::new(Self::default())
    }
}

impl XObject for Foo {
    fn node(&self) -> Node {
        let f = self.f.borrow().clone().unwrap_or(Value::Null);
        Node::Mapping(vec![("f".to_string(), f)])
    }
}

#[derive(Debug, Default)]
struct Bar {
    b: RefCell<Option<Value>>,
}

impl Bar {
    fn new() -> Rc<Self> {
        Rc::new(Self::default())
    }
}

impl XObject for Bar {
    fn node(&self) -> Node {
        let b = self.b.borrow().clone().unwrap_or(Value::Null);
        Node::Mapping(vec![("b".to_string(), b)])
    }
}

#[derive(Debug, Default)]
struct Baz {
    z: RefCell<Option<Value>>,
}

impl Baz {
    fn new() -> Rc<Self> {
        Rc::new(Self::default())
    }
}

impl XObject for Baz {
    fn node(&self) -> Node {
        let z = self.z.borrow().clone().unwrap_or(Value::Null);
        Node::Mapping(vec![("z".to_string(), z)])
    }
}

/// Free-form record keeping field insertion order.
#[derive(Debug, Default)]
struct Record {
    fields: RefCell<Vec<(String, Value)>>,
}

impl Record {
    fn new() -> Rc<Self> {
        Rc::new(Self::default())
    }

    fn set(&self, key: &str, value: impl Into<Value>) {
        self.fields.borrow_mut().push((key.to_string(), value.into()));
    }
}

impl XObject for Record {
    fn node(&self) -> Node {
        Node::Mapping(self.fields.borrow().clone())
    }
}

/// A person in the family graph: a fixed `name` plus ordered relations.
#[derive(Debug)]
struct Character {
    name: String,
    relations: RefCell<Vec<(&'static str, Value)>>,
}

impl Character {
    fn new(name: &str) -> Rc<Self> {
        Rc::new(Character {
            name: name.to_string(),
            relations: RefCell::new(Vec::new()),
        })
    }

    fn set(&self, key: &'static str, value: impl Into<Value>) {
        self.relations.borrow_mut().push((key, value.into()));
    }
}

impl XObject for Character {
    fn node(&self) -> Node {
        let mut fields = vec![("name".to_string(), Value::from(self.name.clone()))];
        for (key, value) in self.relations.borrow().iter() {
            fields.push((key.to_string(), value.clone()));
        }
        Node::Mapping(fields)
    }
}

fn people(characters: &[&Rc<Character>]) -> Value {
    Value::Array(characters.iter().map(|c| Value::from(Rc::clone(*c))).collect())
}

/// Malcolm in the Middle, heavily cross-linked.
fn family() -> Rc<Character> {
    let hal = Character::new("Hal");
    let lois = Character::new("Lois");
    let reese = Character::new("Reese");
    let malcolm = Character::new("Malcolm");
    let dewey = Character::new("Dewey");
    let ida = Character::new("Ida");

    hal.set("wife", Rc::clone(&lois));
    lois.set("husband", Rc::clone(&hal));
    hal.set("children", people(&[&reese, &malcolm, &dewey]));
    lois.set("children", people(&[&reese, &malcolm, &dewey]));
    for child in [&reese, &malcolm, &dewey] {
        child.set("father", Rc::clone(&hal));
        child.set("mother", Rc::clone(&lois));
    }
    reese.set("siblings", people(&[&malcolm, &dewey]));
    malcolm.set("siblings", people(&[&reese, &dewey]));
    dewey.set("siblings", people(&[&reese, &malcolm]));
    lois.set("mother", Rc::clone(&ida));
    ida.set("children", people(&[&lois]));

    hal
}

#[test]
fn cross_bucket_cycle_resolves_through_the_root() {
    let foo = Foo::new();
    let foo0 = Foo::new();
    let bar0 = Bar::new();
    *foo.f.borrow_mut() = Some(Value::from(Rc::clone(&foo0)));
    *foo0.f.borrow_mut() = Some(Value::from(Rc::clone(&bar0)));
    *bar0.b.borrow_mut() = Some(Value::Array(vec![Value::from(Rc::clone(&foo))]));

    let encoder = Encoder::new()
        .with_format(XsonFormat::pretty())
        .with_mapper(StaticMapper::new().with::<Foo>("foos").with::<Bar>("bars"));

    let out = encoder.x_encode(&Value::from(foo)).unwrap();
    let expected = r#"{
    "$": {
        "f": _.foos[0]
    },
    "foos": [
        {
            "f": _.bars[0]
        }
    ],
    "bars": [
        {
            "b": [
                _.$
            ]
        }
    ]
}"#;
    assert_eq!(out, expected);
}

#[test]
fn buckets_keep_discovery_order() {
    let foo = Foo::new();
    let foo0 = Foo::new();
    let bar0 = Bar::new();
    *foo.f.borrow_mut() = Some(Value::from(Rc::clone(&foo0)));
    *foo0.f.borrow_mut() = Some(Value::from(Rc::clone(&bar0)));
    *bar0.b.borrow_mut() = Some(Value::Array(vec![Value::from(Rc::clone(&foo))]));
    let baz = Baz::new();
    *baz.z.borrow_mut() = Some(Value::from(Rc::clone(&bar0)));

    let encoder = Encoder::new()
        .with_format(XsonFormat::pretty())
        .with_mapper(StaticMapper::new().with::<Foo>("foos").with::<Bar>("bars"));

    // A Bar is met first here, so "bars" drains before "foos".
    let out = encoder.x_encode(&Value::from(baz)).unwrap();
    let expected = r#"{
    "$": {
        "z": _.bars[0]
    },
    "bars": [
        {
            "b": [
                _.foos[0]
            ]
        }
    ],
    "foos": [
        {
            "f": _.foos[1]
        },
        {
            "f": _.bars[0]
        }
    ]
}"#;
    assert_eq!(out, expected);
}

#[test]
fn exhaustive_tracking_encodes_each_object_once() {
    let encoder = Encoder::new().with_format(XsonFormat::pretty());

    let out = encoder.x_encode(&Value::from(family())).unwrap();
    let expected = r#"{
    "$": {
        "name": "Hal",
        "wife": {
            "name": "Lois",
            "husband": _.$,
            "children": [
                {
                    "name": "Reese",
                    "father": _.$,
                    "mother": _.$.wife,
                    "siblings": [
                        {
                            "name": "Malcolm",
                            "father": _.$,
                            "mother": _.$.wife,
                            "siblings": [
                                _.$.wife.children[0],
                                {
                                    "name": "Dewey",
                                    "father": _.$,
                                    "mother": _.$.wife,
                                    "siblings": [
                                        _.$.wife.children[0],
                                        _.$.wife.children[0].siblings[0]
                                    ]
                                }
                            ]
                        },
                        _.$.wife.children[0].siblings[0].siblings[1]
                    ]
                },
                _.$.wife.children[0].siblings[0],
                _.$.wife.children[0].siblings[0].siblings[1]
            ],
            "mother": {
                "name": "Ida",
                "children": [
                    _.$.wife
                ]
            }
        },
        "children": [
            _.$.wife.children[0],
            _.$.wife.children[0].siblings[0],
            _.$.wife.children[0].siblings[0].siblings[1]
        ]
    }
}"#;
    assert_eq!(out, expected);
}

#[test]
fn bucketed_family_flattens_the_graph() {
    let encoder = Encoder::new()
        .with_format(XsonFormat::pretty())
        .with_mapper(StaticMapper::new().with::<Character>("characters"));

    let out = encoder.x_encode(&Value::from(family())).unwrap();
    let expected = r#"{
    "$": {
        "name": "Hal",
        "wife": _.characters[0],
        "children": [
            _.characters[1],
            _.characters[2],
            _.characters[3]
        ]
    },
    "characters": [
        {
            "name": "Lois",
            "husband": _.$,
            "children": [
                _.characters[1],
                _.characters[2],
                _.characters[3]
            ],
            "mother": _.characters[4]
        },
        {
            "name": "Reese",
            "father": _.$,
            "mother": _.characters[0],
            "siblings": [
                _.characters[2],
                _.characters[3]
            ]
        },
        {
            "name": "Malcolm",
            "father": _.$,
            "mother": _.characters[0],
            "siblings": [
                _.characters[1],
                _.characters[3]
            ]
        },
        {
            "name": "Dewey",
            "father": _.$,
            "mother": _.characters[0],
            "siblings": [
                _.characters[1],
                _.characters[2]
            ]
        },
        {
            "name": "Ida",
            "children": [
                _.characters[0]
            ]
        }
    ]
}"#;
    assert_eq!(out, expected);
}

#[test]
fn encoding_is_deterministic() {
    let encoder = Encoder::new()
        .with_format(XsonFormat::pretty())
        .with_mapper(StaticMapper::new().with::<Character>("characters"));
    let root = Value::from(family());

    let first = encoder.x_encode(&root).unwrap();
    let second = encoder.x_encode(&root).unwrap();
    assert_eq!(first, second);
}

#[test]
fn formats_differ_only_in_whitespace() {
    let table = || {
        let mut table = indexmap::IndexMap::new();
        table.insert("a".to_string(), Value::from(1));
        table.insert("b".to_string(), Value::from(2));
        Value::Table(table)
    };

    let dense = Encoder::new().encode(&table()).unwrap();
    let light = Encoder::new()
        .with_format(XsonFormat::Light)
        .encode(&table())
        .unwrap();
    let pretty = Encoder::new()
        .with_format(XsonFormat::pretty())
        .encode(&table())
        .unwrap();

    assert_eq!(dense, r#"{"a":1,"b":2}"#);
    assert_eq!(light, r#"{ "a": 1, "b": 2 }"#);
    assert_eq!(pretty, "{\n    \"a\": 1,\n    \"b\": 2\n}");

    let strip = |s: &str| s.chars().filter(|c| !c.is_whitespace()).collect::<String>();
    assert_eq!(strip(&light), dense);
    assert_eq!(strip(&pretty), dense);
}

#[test]
fn bounded_fails_on_cycles() {
    let record = Record::new();
    record.set("self", Rc::clone(&record));

    let out = Encoder::new()
        .with_strategy(Strategy::Bounded { max_depth: 8 })
        .encode(&Value::from(record));
    assert_eq!(out, Err(XsonError::DepthExceeded { max_depth: 8 }));
}

#[test]
fn bounded_accepts_acyclic_input_within_the_limit() {
    let mut value = Value::from(1);
    for _ in 0..5 {
        value = Value::Array(vec![value]);
    }

    let within = Encoder::new()
        .with_strategy(Strategy::Bounded { max_depth: 8 })
        .encode(&value);
    assert_eq!(within.unwrap(), "[[[[[1]]]]]");

    let beyond = Encoder::new()
        .with_strategy(Strategy::Bounded { max_depth: 3 })
        .encode(&value);
    assert_eq!(beyond, Err(XsonError::DepthExceeded { max_depth: 3 }));
}

#[test]
fn scoped_catches_ancestor_cycles() {
    let record = Record::new();
    record.set("self", Rc::clone(&record));

    let out = Encoder::new()
        .with_strategy(Strategy::Scoped)
        .encode(&Value::from(record))
        .unwrap();
    assert_eq!(out, r#"{"self":_}"#);
}

#[test]
fn scoped_reencodes_sibling_shared_objects() {
    let shared = Record::new();
    shared.set("v", 1);
    let root = Record::new();
    root.set("left", Rc::clone(&shared));
    root.set("right", Rc::clone(&shared));

    let out = Encoder::new()
        .with_strategy(Strategy::Scoped)
        .encode(&Value::from(root))
        .unwrap();
    assert_eq!(out, r#"{"left":{"v":1},"right":{"v":1}}"#);
}

#[test]
fn empty_composites_stay_compact() {
    let encoder = Encoder::new().with_format(XsonFormat::pretty());
    assert_eq!(encoder.encode(&Value::Array(Vec::new())).unwrap(), "[]");
    assert_eq!(
        encoder.encode(&Value::Table(indexmap::IndexMap::new())).unwrap(),
        "{}"
    );
}
