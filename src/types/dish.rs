use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Number of positional ingredient/measure slots a remote dish record carries.
pub const MAX_INGREDIENT_SLOTS: usize = 20;

/// Minimal projection of a dish, recorded in favorites and history.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DishSummary {
    pub id: String,
    pub name: String,
    pub thumbnail: String,
}

/// Nutrition totals embedded in a bundled dish.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct DishNutrition {
    pub calories: f64,
    pub protein: f64,
    pub fat: f64,
    pub carbs: f64,
}

/// A self-contained dish from the bundled local dataset.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LocalDish {
    pub id: String,
    pub name: String,
    pub thumbnail: String,
    pub instructions: String,
    pub category: String,
    pub ingredients: Vec<String>,
    pub nutrition: DishNutrition,
}

/// One populated ingredient/measure slot of a remote dish.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct IngredientSlot {
    pub name: String,
    pub measure: String,
}

/// A dish fetched from the remote catalog.
///
/// The positional `strIngredientN` / `strMeasureN` fields of the payload are
/// folded into a fixed array at parse time; blank names leave the slot empty.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RemoteDish {
    pub id: String,
    pub name: String,
    pub thumbnail: String,
    pub instructions: String,
    pub category: Option<String>,
    pub area: Option<String>,
    pub slots: [Option<IngredientSlot>; MAX_INGREDIENT_SLOTS],
}

impl RemoteDish {
    /// Builds a dish from a raw catalog record (one element of `meals`).
    ///
    /// Returns `None` when the record has no `idMeal`.
    pub fn from_payload(record: &Map<String, Value>) -> Option<Self> {
        let id = text_field(record, "idMeal")?;
        if id.is_empty() {
            return None;
        }

        let mut slots: [Option<IngredientSlot>; MAX_INGREDIENT_SLOTS] = Default::default();
        for (index, slot) in slots.iter_mut().enumerate() {
            let n = index + 1;
            let name = text_field(record, &format!("strIngredient{}", n)).unwrap_or_default();
            if name.is_empty() {
                continue;
            }
            let measure = text_field(record, &format!("strMeasure{}", n)).unwrap_or_default();
            *slot = Some(IngredientSlot { name, measure });
        }

        Some(Self {
            id,
            name: text_field(record, "strMeal").unwrap_or_default(),
            thumbnail: text_field(record, "strMealThumb").unwrap_or_default(),
            instructions: text_field(record, "strInstructions").unwrap_or_default(),
            category: text_field(record, "strCategory").filter(|s| !s.is_empty()),
            area: text_field(record, "strArea").filter(|s| !s.is_empty()),
            slots,
        })
    }

    /// Populated slots in ascending slot order. Repeated names are kept.
    pub fn ingredient_slots(&self) -> impl Iterator<Item = &IngredientSlot> {
        self.slots.iter().flatten()
    }
}

/// Reads a string field, trimmed. Numeric ids are accepted as well.
fn text_field(record: &Map<String, Value>, key: &str) -> Option<String> {
    match record.get(key)? {
        Value::String(s) => Some(s.trim().to_string()),
        Value::Number(n) => Some(n.to_string()),
        _ => None,
    }
}

/// A fully resolved dish from either source.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "source", rename_all = "snake_case")]
pub enum Dish {
    Local(LocalDish),
    Remote(RemoteDish),
}

impl Dish {
    pub fn id(&self) -> &str {
        match self {
            Dish::Local(d) => &d.id,
            Dish::Remote(d) => &d.id,
        }
    }

    pub fn summary(&self) -> DishSummary {
        match self {
            Dish::Local(d) => DishSummary {
                id: d.id.clone(),
                name: d.name.clone(),
                thumbnail: d.thumbnail.clone(),
            },
            Dish::Remote(d) => DishSummary {
                id: d.id.clone(),
                name: d.name.clone(),
                thumbnail: d.thumbnail.clone(),
            },
        }
    }

    pub fn is_local(&self) -> bool {
        matches!(self, Dish::Local(_))
    }
}
