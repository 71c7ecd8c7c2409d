use std::cell::Cell;

use itemize::basics::{
    assert_missing, elements, get, get_all, has, indices, iterget, merge, missing, pairs,
};
use itemize::{Fallback, Indices, ItemizeError, Key, Miss, Record, Value};

fn defaults() -> Value {
    Value::map([
        ("driver", "com.mysql.jdbc.Driver"),
        ("dburl", "jdbc:mysql://localhost/drug_db"),
        ("proptable", "testproptb"),
        ("login", "user"),
        ("password", "tsibetcwwi"),
    ])
}

fn mixed_keys() -> Value {
    Value::map([
        (Key::from("a"), Value::from(1)),
        (Key::from("b"), Value::from(2)),
        (Key::from("c"), Value::from(3)),
        (Key::from("d"), Value::from(4)),
        (Key::from(5), Value::from("55")),
    ])
}

// Counts every probe so tests can see how far a lookup went.
struct Counting {
    inner: Value,
    probes: Cell<usize>,
}

impl Counting {
    fn new(inner: Value) -> Self {
        Self { inner, probes: Cell::new(0) }
    }
}

impl Record for Counting {
    fn fetch(&self, index: &Value) -> Result<Value, Miss> {
        self.probes.set(self.probes.get() + 1);
        self.inner.fetch(index)
    }
}

#[test]
fn missing_positions() {
    let letters = Value::seq(["a", "b", "c"]);
    assert!(missing(&letters, [0, 1, 2]).is_empty());
    assert_eq!(missing(&letters, [0, 1, 2, 3, 4]), vec![Value::from(3), Value::from(4)]);
    // text indices do not apply to sequences
    assert_eq!(missing(&letters, ["0"]), vec![Value::from("0")]);
}

#[test]
fn missing_keys_keep_given_order() {
    let record = mixed_keys();
    let probes: Vec<Value> = vec![
        Value::from(12.5),
        "a".into(),
        "b".into(),
        "c".into(),
        Value::from(5),
        "ee".into(),
    ];
    assert_eq!(missing(&record, probes), vec![Value::from(12.5), Value::from("ee")]);
    assert!(missing(&record, ["a", "b", "c", "d"]).is_empty());
}

#[test]
fn unhashable_index_is_missing() {
    let record = mixed_keys();
    let set_like = Value::map([("a", 1)]);
    let probes: Vec<Value> = vec![set_like.clone(), "a".into()];
    assert_eq!(missing(&record, probes), vec![set_like]);
}

#[test]
fn has_all_or_nothing() {
    let record = mixed_keys();
    assert!(has(&record, ["a", "b"]));
    assert!(has(&record, 5));
    assert!(!has(&record, ["a", "zz"]));
    assert!(has(&record, Vec::<Value>::new()), "nothing asked, nothing missing");
}

#[test]
fn assert_missing_hands_record_back() {
    let record = defaults();
    let checked = assert_missing(&record, ["driver", "login"], "connection").expect("all present");
    assert!(std::ptr::eq(checked, &record));
}

#[test]
fn assert_missing_reports_names() {
    let record = defaults();
    let err = assert_missing(&record, ["driver", "socket", "port"], "connection").unwrap_err();
    match &err {
        ItemizeError::Validation { name, missing } => {
            assert_eq!(name, "connection");
            assert_eq!(missing, &vec!["'socket'".to_string(), "'port'".to_string()]);
        }
        other => panic!("expected a validation error, got {other:?}"),
    }
    assert!(err.to_string().contains("'socket', 'port'"));
}

#[test]
fn get_first_found_mapping() {
    let record = defaults();
    let driver = Value::from("com.mysql.jdbc.Driver");
    let dburl = Value::from("jdbc:mysql://localhost/drug_db");
    let first = get(&record, ["driver", "dburl", "nonexistant"], Fallback::given(123));
    assert_eq!(first.unwrap(), driver);
    assert_eq!(get(&record, ["nonexistant", "dburl"], Fallback::given(123)).unwrap(), dburl);
    let nothing: Vec<Value> =
        vec!["kkaa".into(), Value::from(123.43), "nonexistant".into(), Value::from(0)];
    assert_eq!(get(&record, nothing.clone(), Fallback::given(123)).unwrap(), Value::from(123));
    match get(&record, nothing, Fallback::NotPassed) {
        Err(ItemizeError::NotFound { indices }) => assert_eq!(indices.len(), 4),
        other => panic!("expected not found, got {other:?}"),
    }
}

#[test]
fn get_first_found_sequence() {
    let record = Value::seq(["s0", "s1", "s2"]);
    assert_eq!(get(&record, 2, Fallback::NotPassed).unwrap(), Value::from("s2"));
    assert!(get(&record, 3, Fallback::NotPassed).is_err());
    let probes: Vec<Value> = vec!["0".into(), Value::from(3)];
    assert!(get(&record, probes.clone(), Fallback::NotPassed).is_err());
    assert_eq!(get(&record, probes.clone(), Fallback::given("AA")).unwrap(), Value::from("AA"));
    assert_eq!(get(&record, probes, Fallback::given(Value::Null)).unwrap(), Value::Null);
    let probes: Vec<Value> = vec!["0".into(), Value::from(3), Value::from(0)];
    assert_eq!(get(&record, probes, Fallback::NotPassed).unwrap(), Value::from("s0"));
    // no counting from the end
    assert!(get(&record, -1, Fallback::NotPassed).is_err());
}

#[test]
fn get_all_collects_every_hit() {
    let record = defaults();
    let found = get_all(&record, ["driver", "dburl", "nonexistant"], Fallback::NotPassed).unwrap();
    assert_eq!(found.len(), 2);
    assert_eq!(found[0], Value::from("com.mysql.jdbc.Driver"));
    let fallback = get_all(&record, ["kkaa", "nonexistant"], Fallback::given(123)).unwrap();
    assert_eq!(fallback, vec![Value::from(123)]);
    assert!(get_all(&record, ["kkaa"], Fallback::NotPassed).is_err());
}

#[test]
fn get_all_is_repeatable() {
    let record = defaults();
    let first = get_all(&record, ["login", "password"], Fallback::NotPassed).unwrap();
    let second = get_all(&record, ["login", "password"], Fallback::NotPassed).unwrap();
    assert_eq!(first, second);
}

#[test]
fn get_stops_at_first_hit() {
    let record = Counting::new(Value::map([("a", 1), ("b", 2), ("c", 3)]));
    assert_eq!(get(&record, ["a", "b", "c"], Fallback::NotPassed).unwrap(), Value::from(1));
    assert_eq!(record.probes.get(), 1);
}

#[test]
fn iterget_is_lazy() {
    let record = Counting::new(Value::map([("a", 1), ("b", 2)]));
    let mut found = iterget(&record, ["x", "a", "b"], Fallback::NotPassed);
    assert_eq!(found.next().unwrap().unwrap(), Value::from(1));
    assert_eq!(record.probes.get(), 2);
    let rest: Vec<Value> = found.map(|r| r.expect("hit")).collect();
    assert_eq!(rest, vec![Value::from(2)]);
    assert_eq!(record.probes.get(), 3);
}

#[test]
fn iterget_yields_default_once() {
    let record = defaults();
    let found: Vec<_> = iterget(&record, ["x", "y"], Fallback::given(0)).collect();
    assert_eq!(found.len(), 1);
    assert_eq!(found[0].as_ref().unwrap(), &Value::from(0));
    let failed: Vec<_> = iterget(&record, ["x"], Fallback::NotPassed).collect();
    assert_eq!(failed.len(), 1);
    assert!(failed[0].is_err());
}

#[test]
fn sequence_indices_are_spread() {
    let record = Value::map([
        (Key::from("a"), Value::from(1)),
        (Key::Tuple(vec![Key::from(1), Key::from(2)]), Value::from("pair")),
    ]);
    assert_eq!(get(&record, Value::seq(["x", "a"]), Fallback::NotPassed).unwrap(), Value::from(1));
    // a tuple key has to be asked for as one index
    assert!(get(&record, Value::seq([1, 2]), Fallback::NotPassed).is_err());
    assert_eq!(
        get(&record, Indices::one(Value::seq([1, 2])), Fallback::NotPassed).unwrap(),
        Value::from("pair")
    );
    let lazy = Indices::drain(vec!["x", "a"].into_iter());
    assert_eq!(get(&record, lazy, Fallback::NotPassed).unwrap(), Value::from(1));
}

#[test]
fn text_is_indexed_but_shapeless() {
    assert_eq!(get("abc", 1, Fallback::NotPassed).unwrap(), Value::from("b"));
    assert_eq!(missing("abc", [0, 5]), vec![Value::from(5)]);
    assert!(matches!(pairs("abc"), Err(ItemizeError::TypeMismatch(_))));
    assert!(matches!(pairs(&Value::from("abc")), Err(ItemizeError::TypeMismatch(_))));
}

#[test]
fn generalized_accessors() {
    let letters = Value::seq(["a", "b"]);
    assert_eq!(
        pairs(&letters).unwrap(),
        vec![(Key::from(0), Value::from("a")), (Key::from(1), Value::from("b"))]
    );
    assert_eq!(indices(&letters).unwrap(), vec![Key::from(0), Key::from(1)]);
    let record = Value::map([("x", 10), ("y", 20)]);
    assert_eq!(indices(&record).unwrap(), vec![Key::from("x"), Key::from("y")]);
    assert_eq!(elements(&record).unwrap(), vec![Value::from(10), Value::from(20)]);
    assert!(matches!(elements(&Value::from(7)), Err(ItemizeError::TypeMismatch(_))));
    let empty = Value::seq(Vec::<Value>::new());
    assert!(pairs(&empty).unwrap().is_empty());
}

#[test]
fn merge_prefers_earlier_records() {
    let map1 = Value::map([
        (Key::from("a"), Value::from("a1")),
        (Key::from("b"), Value::from("b2")),
        (Key::from(3), Value::from("33")),
    ]);
    let seq2 = Value::seq([1, 2, 3, 4]);
    let merged = merge(&[&map1, &seq2]).unwrap();
    assert_eq!(merged.len(), 6);
    assert_eq!(merged[&Key::from(3)], Value::from("33"));
    assert_eq!(merged[&Key::from(0)], Value::from(1));
    let text = Value::from("abc");
    assert!(merge(&[&map1, &text]).is_err());
}

#[test]
fn json_documents_are_records() {
    let document = serde_json::json!({"a": 1, "list": [10, 20], "name": "itemize"});
    assert_eq!(get(&document, ["x", "a"], Fallback::NotPassed).unwrap(), Value::from(1));
    assert!(has(&document, ["a", "list", "name"]));
    assert_eq!(missing(&document, [0]), vec![Value::from(0)]);
    let list = &document["list"];
    assert_eq!(
        get_all(list, [0, 1, 2], Fallback::NotPassed).unwrap(),
        vec![Value::from(10), Value::from(20)]
    );
    assert_eq!(indices(&document).unwrap().len(), 3);
}

#[test]
fn integral_floats_name_integer_keys() {
    let record = Value::map([
        (Key::from(3), Value::from("x")),
        (Key::from(0.5), Value::from("half")),
    ]);
    assert_eq!(get(&record, 3.0, Fallback::NotPassed).unwrap(), Value::from("x"));
    assert_eq!(get(&record, 0.5, Fallback::NotPassed).unwrap(), Value::from("half"));
    assert_eq!(Key::from(3.0), Key::from(3));
    assert_eq!(missing(&record, [3.5]), vec![Value::from(3.5)]);
    // positions stay strictly integral
    let letters = Value::seq(["a", "b"]);
    assert!(get(&letters, 1.0, Fallback::NotPassed).is_err());
}
