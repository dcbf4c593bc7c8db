//! Property-based tests for remote ingredient slot extraction.
//!
//! Whatever subset of the 20 positional slots carries a non-blank name, the
//! parsed dish yields exactly those ingredients in ascending slot order.

use dishbook::types::dish::{RemoteDish, MAX_INGREDIENT_SLOTS};
use proptest::prelude::*;
use serde_json::{json, Map, Value};

/// Per slot: `None` leaves it absent, `Some(Err(blank))` writes whitespace or
/// null, `Some(Ok(name))` writes a real ingredient.
fn arb_slots() -> impl Strategy<Value = Vec<Option<Result<String, Value>>>> {
    let cell = proptest::option::of(prop_oneof![
        "[a-z]{1,8}( [a-z]{1,8})?".prop_map(Ok),
        Just(Err(json!(""))),
        Just(Err(json!("   "))),
        Just(Err(Value::Null)),
    ]);
    proptest::collection::vec(cell, MAX_INGREDIENT_SLOTS)
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(64))]

    #[test]
    fn populated_slots_extracted_in_order(slots in arb_slots()) {
        let mut record = Map::new();
        record.insert("idMeal".into(), json!("1"));
        let mut expected = Vec::new();

        for (i, cell) in slots.iter().enumerate() {
            let n = i + 1;
            match cell {
                Some(Ok(name)) => {
                    record.insert(format!("strIngredient{}", n), json!(format!(" {} ", name)));
                    record.insert(format!("strMeasure{}", n), json!(format!("{} tsp", n)));
                    expected.push((name.clone(), format!("{} tsp", n)));
                }
                Some(Err(blank)) => {
                    record.insert(format!("strIngredient{}", n), blank.clone());
                    record.insert(format!("strMeasure{}", n), json!("1 cup"));
                }
                None => {}
            }
        }

        let dish = RemoteDish::from_payload(&record).unwrap();
        let got: Vec<(String, String)> = dish
            .ingredient_slots()
            .map(|s| (s.name.clone(), s.measure.clone()))
            .collect();
        prop_assert_eq!(got, expected);
    }
}

#[test]
fn slots_one_five_twenty() {
    let mut record = Map::new();
    record.insert("idMeal".into(), json!("1"));
    for (n, name) in [(1, "flour"), (5, "eggs"), (20, "salt")] {
        record.insert(format!("strIngredient{}", n), json!(name));
    }
    for n in [2, 3, 4, 6, 19] {
        record.insert(format!("strIngredient{}", n), json!(""));
    }

    let dish = RemoteDish::from_payload(&record).unwrap();
    let names: Vec<&str> = dish.ingredient_slots().map(|s| s.name.as_str()).collect();
    assert_eq!(names, vec!["flour", "eggs", "salt"]);
}
