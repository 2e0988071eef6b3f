//! Contract tests shared by both tables

use std::collections::HashMap;

use proptest::prelude::*;

use crate::{
    DynamicHashTable, FixedKeyTable, KeySet, KeyValueTable, PlayerStat, TableConfig, TableError,
};

/// Runs the same absence / round-trip checks through the trait object.
fn exercise_contract(table: &mut dyn KeyValueTable<u32>, present: &str, absent: &str) {
    assert!(table.is_empty());
    assert!(!table.contains(present));

    table.set(present, 7).unwrap();
    assert_eq!(*table.get(present).unwrap(), 7);
    assert_eq!(table.len(), 1);

    table.set(present, 8).unwrap();
    assert_eq!(table.len(), 1);
    assert_eq!(table.keys(), vec![present]);
    assert_eq!(table.values(), vec![&8]);

    assert!(matches!(table.get(absent), Err(TableError::KeyNotFound { .. })));
    assert!(!table.contains(absent));

    assert_eq!(table.delete(present), Ok(8));
    assert!(matches!(table.get(present), Err(TableError::KeyNotFound { .. })));
    assert!(table.is_empty());
}

#[test]
fn both_tables_honour_the_contract() {
    let mut fixed: FixedKeyTable<u32> = FixedKeyTable::new().unwrap();
    exercise_contract(&mut fixed, "Goals", "Assists");

    let mut dynamic: DynamicHashTable<u32> = DynamicHashTable::new();
    exercise_contract(&mut dynamic, "Goals For", "Goals Against");
}

#[test]
fn player_record_lifecycle() {
    let mut stats: FixedKeyTable<i64> = FixedKeyTable::new().unwrap();
    stats.fill(0);

    for _ in 0..3 {
        *stats.get_mut(PlayerStat::GamesPlayed.as_str()).unwrap() += 1;
    }
    *stats.get_mut(PlayerStat::Goals.as_str()).unwrap() += 2;

    assert_eq!(*stats.get("Games Played").unwrap(), 3);
    assert_eq!(*stats.get("Goals").unwrap(), 2);
    assert_eq!(stats.len(), PlayerStat::ALL.len());
    assert_eq!(stats.keys().len(), PlayerStat::ALL.len());
}

#[test]
fn roster_grows_across_many_rungs() {
    let mut roster: DynamicHashTable<usize> = DynamicHashTable::new();
    for i in 0..2_000 {
        roster.set(&format!("player-{i}"), i).unwrap();
    }
    assert_eq!(roster.len(), 2_000);
    assert!(roster.capacity() >= 3_000);
    assert!(roster.size_index() > 0);
    for i in 0..2_000 {
        assert_eq!(*roster.get(&format!("player-{i}")).unwrap(), i);
    }

    for i in (0..2_000).step_by(2) {
        roster.delete(&format!("player-{i}")).unwrap();
    }
    assert_eq!(roster.len(), 1_000);
    assert_eq!(roster.tombstones(), 1_000);
    for i in 0..2_000 {
        assert_eq!(roster.contains(&format!("player-{i}")), i % 2 == 1);
    }
}

#[test]
fn configured_ladder_drives_growth() {
    let config = TableConfig::from_toml_str("growth_ladder = [5, 13]\n").unwrap();
    let mut t: DynamicHashTable<u8> = DynamicHashTable::from_config(&config).unwrap();
    for (i, key) in ["w", "x", "y", "z"].iter().enumerate() {
        t.set(key, i as u8).unwrap();
    }
    assert_eq!(t.capacity(), 13);

    // 8 * 3 <= 13 * 2, the ninth entry would cross it with no rung left
    for key in ["p", "q", "r", "s"] {
        t.set(key, 0).unwrap();
    }
    assert_eq!(t.set("t", 0), Err(TableError::TableFull { capacity: 13 }));
    assert_eq!(t.capacity(), 13);
    assert_eq!(t.len(), 8);
    assert!(!t.contains("t"));

    // overwrites are still accepted at the limit
    t.set("p", 9).unwrap();
    assert_eq!(*t.get("p").unwrap(), 9);
}

#[derive(Clone, Debug)]
enum Op {
    Set(String, u16),
    Get(String),
    Delete(String),
}

fn key_strategy() -> impl Strategy<Value = String> {
    // small alphabet forces collisions and repeated keys
    "[a-d]{1,3}"
}

fn op_strategy() -> impl Strategy<Value = Op> {
    prop_oneof![
        3 => (key_strategy(), any::<u16>()).prop_map(|(k, v)| Op::Set(k, v)),
        1 => key_strategy().prop_map(Op::Get),
        2 => key_strategy().prop_map(Op::Delete),
    ]
}

fn stat_op_strategy() -> impl Strategy<Value = Op> {
    let stat = (0..PlayerStat::ALL.len()).prop_map(|i| PlayerStat::ALL[i].as_str().to_string());
    prop_oneof![
        3 => (stat.clone(), any::<u16>()).prop_map(|(k, v)| Op::Set(k, v)),
        1 => stat.clone().prop_map(Op::Get),
        1 => stat.prop_map(Op::Delete),
    ]
}

fn check_against_model(table: &mut dyn KeyValueTable<u16>, ops: Vec<Op>) -> Result<(), TestCaseError> {
    let mut model: HashMap<String, u16> = HashMap::new();
    for op in ops {
        match op {
            Op::Set(k, v) => {
                table.set(&k, v).unwrap();
                model.insert(k, v);
            }
            Op::Get(k) => {
                prop_assert_eq!(table.get(&k).ok().copied(), model.get(&k).copied());
            }
            Op::Delete(k) => {
                prop_assert_eq!(table.delete(&k).ok(), model.remove(&k));
            }
        }
        prop_assert_eq!(table.len(), model.len());
    }

    let mut keys: Vec<String> = table.keys().into_iter().map(str::to_string).collect();
    keys.sort();
    let mut expected: Vec<String> = model.keys().cloned().collect();
    expected.sort();
    prop_assert_eq!(keys, expected);
    Ok(())
}

proptest! {
    #[test]
    fn dynamic_table_matches_hash_map(ops in prop::collection::vec(op_strategy(), 0..200)) {
        let mut t: DynamicHashTable<u16> = DynamicHashTable::new();
        check_against_model(&mut t, ops)?;
    }

    #[test]
    fn dynamic_table_on_short_ladder_matches_hash_map(ops in prop::collection::vec(op_strategy(), 0..200)) {
        // 84 distinct keys fit below the load threshold of 131
        let mut t: DynamicHashTable<u16> = DynamicHashTable::with_sizes(vec![3, 7, 131]).unwrap();
        check_against_model(&mut t, ops)?;
    }

    #[test]
    fn fixed_table_matches_hash_map(ops in prop::collection::vec(stat_op_strategy(), 0..100)) {
        let mut t: FixedKeyTable<u16> = FixedKeyTable::new().unwrap();
        check_against_model(&mut t, ops)?;
    }

    #[test]
    fn primary_hash_is_in_range(key in ".{0,24}", rung in 0usize..19) {
        let capacity = crate::config::DEFAULT_LADDER[rung];
        prop_assert!(crate::dynamic::primary_hash(&key, capacity) < capacity);
        let step = crate::dynamic::step_hash(&key, capacity);
        prop_assert!(step >= 1 && step < capacity);
    }
}
