use std::collections::HashMap;

use iris::{Dict, Int, Key, Text, Value};
use proptest::prelude::*;

// ============================================================================
// Strategies
// ============================================================================

fn symbol() -> impl Strategy<Value = String> {
    "[a-z]{1,12}"
}

#[derive(Debug, Clone)]
enum Op {
    Insert(Int, Int),
    Erase(Int),
}

fn op() -> impl Strategy<Value = Op> {
    prop_oneof![
        3 => (-64i64..64, any::<i64>()).prop_map(|(k, v)| Op::Insert(k, v)),
        1 => (-64i64..64).prop_map(Op::Erase),
    ]
}

// ============================================================================
// Growth Properties
// ============================================================================

proptest! {
    #![proptest_config(ProptestConfig::with_cases(256))]

    #[test]
    fn distinct_keys_survive_growth(n in 1usize..600) {
        let mut dict = Dict::new();
        for i in 0..n {
            dict.insert(i as Int, Value::Int(i as Int));
        }
        prop_assert_eq!(dict.len(), n);
        prop_assert!(dict.is_valid());
        prop_assert!(dict.capacity().is_power_of_two());
        prop_assert!(dict.len() < dict.capacity());
        for i in 0..n {
            prop_assert_eq!(dict.get(i as Int), Some(Value::Int(i as Int)));
        }
    }

    #[test]
    fn latest_value_wins(keys in prop::collection::vec(symbol(), 1..200)) {
        let mut dict = Dict::new();
        let mut model: HashMap<String, usize> = HashMap::new();
        for (i, key) in keys.iter().enumerate() {
            dict.insert(key.as_str(), Value::Int(i as Int));
            model.insert(key.clone(), i);
        }
        prop_assert_eq!(dict.len(), model.len());
        for (key, i) in &model {
            prop_assert_eq!(dict.get(key.as_str()), Some(Value::Int(*i as Int)));
        }
    }

    #[test]
    fn matches_std_hashmap(ops in prop::collection::vec(op(), 0..400)) {
        let mut dict = Dict::new();
        let mut model: HashMap<Int, Int> = HashMap::new();
        for op in ops {
            match op {
                Op::Insert(k, v) => {
                    let previous = dict.insert(k, Value::Int(v));
                    prop_assert_eq!(previous, model.insert(k, v).map(Value::Int));
                }
                Op::Erase(k) => {
                    prop_assert_eq!(dict.erase(k), model.remove(&k).map(Value::Int));
                }
            }
            prop_assert!(dict.is_valid());
        }
        prop_assert_eq!(dict.len(), model.len());
        let mut seen: Vec<Key> = dict.iter().map(|(key, _)| key).collect();
        seen.sort_by_key(|key| key.hash());
        seen.dedup();
        prop_assert_eq!(seen.len(), model.len());
    }

    #[test]
    fn text_keys_match_str_keys(name in symbol()) {
        let mut dict = Dict::new();
        let text = Text::from(name.as_str());
        dict.insert(&text, Value::from(name.as_str()));
        prop_assert!(dict.has(name.as_str()));
        prop_assert_eq!(Key::from(&text), Key::from(name.as_str()));
    }
}
