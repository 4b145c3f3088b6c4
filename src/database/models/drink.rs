use serde::{Deserialize, Serialize};
use serde_json::{json, Value};
use sqlx::FromRow;

use crate::database::store::StoreError;

/// Placeholder shown in place of ingredient names in the public summary view.
pub const MASKED_NAME: &str = "*";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Ingredient {
    pub name: String,
    pub color: String,
    pub parts: i64,
}

/// The sole domain entity: a named recipe composed of ingredient records.
#[derive(Debug, Clone, Serialize)]
pub struct Drink {
    pub id: i64,
    pub title: String,
    pub recipe: Vec<Ingredient>,
}

/// Raw row shape; `recipe` is stored as serialized JSON text.
#[derive(Debug, FromRow)]
pub struct DrinkRow {
    pub id: i64,
    pub title: String,
    pub recipe: String,
}

impl Drink {
    /// Full detail view, gated behind the `get:drinks-detail` permission.
    pub fn long(&self) -> Value {
        json!({
            "id": self.id,
            "title": self.title,
            "recipe": self.recipe,
        })
    }

    /// Public summary view. Strips `color` and `parts` and masks each
    /// ingredient name, so only the ingredient count is visible.
    pub fn short(&self) -> Value {
        let masked: Vec<Value> = self
            .recipe
            .iter()
            .map(|_| json!({ "name": MASKED_NAME }))
            .collect();

        json!({
            "id": self.id,
            "title": self.title,
            "recipe": masked,
        })
    }
}

impl TryFrom<DrinkRow> for Drink {
    type Error = StoreError;

    fn try_from(row: DrinkRow) -> Result<Self, Self::Error> {
        let recipe: Vec<Ingredient> =
            serde_json::from_str(&row.recipe).map_err(StoreError::InvalidRecipe)?;
        Ok(Drink {
            id: row.id,
            title: row.title,
            recipe,
        })
    }
}
