use axum::extract::rejection::{JsonRejection, PathRejection};
use axum::extract::{Path, State};
use axum::Json;
use serde::Deserialize;
use serde_json::{json, Value};

use crate::database::models::drink::{Drink, Ingredient};
use crate::database::store::DrinkStore;
use crate::error::ApiError;

/// Request body for POST /drinks and PATCH /drinks/:id. Field presence is
/// enforced by deserialization; emptiness is checked in `validate`.
#[derive(Debug, Deserialize)]
pub struct DrinkPayload {
    pub title: String,
    pub recipe: Vec<Ingredient>,
}

impl DrinkPayload {
    fn validate(&self) -> Result<(), ApiError> {
        if self.title.trim().is_empty() {
            return Err(ApiError::bad_request("Drink title must not be empty"));
        }
        if self.recipe.is_empty() {
            return Err(ApiError::bad_request("Drink recipe must not be empty"));
        }
        Ok(())
    }
}

/// GET /drinks - public summary listing
pub async fn get_drinks(State(store): State<DrinkStore>) -> Result<Json<Value>, ApiError> {
    let drinks = store.list_all().await?;
    let formatted: Vec<Value> = drinks.iter().map(Drink::short).collect();

    Ok(Json(json!({
        "success": true,
        "drinks": formatted,
    })))
}

/// GET /drinks-detail - full listing, requires get:drinks-detail
pub async fn get_drinks_detail(State(store): State<DrinkStore>) -> Result<Json<Value>, ApiError> {
    let drinks = store.list_all().await?;
    let formatted: Vec<Value> = drinks.iter().map(Drink::long).collect();

    Ok(Json(json!({
        "success": true,
        "drinks": formatted,
    })))
}

/// POST /drinks - create a drink, requires post:drinks
pub async fn post_drinks(
    State(store): State<DrinkStore>,
    payload: Result<Json<DrinkPayload>, JsonRejection>,
) -> Result<Json<Value>, ApiError> {
    let Json(payload) = payload.map_err(bad_body)?;
    payload.validate()?;

    let drink = store.insert(&payload.title, &payload.recipe).await?;
    tracing::info!(id = drink.id, title = %drink.title, "created drink");

    Ok(Json(json!({
        "success": true,
        "drinks": [drink.long()],
    })))
}

/// PATCH /drinks/:id - overwrite title and recipe, requires patch:drinks
pub async fn patch_drinks(
    State(store): State<DrinkStore>,
    id: Result<Path<i64>, PathRejection>,
    payload: Result<Json<DrinkPayload>, JsonRejection>,
) -> Result<Json<Value>, ApiError> {
    let Path(id) = id.map_err(bad_id)?;
    let Json(payload) = payload.map_err(bad_body)?;
    payload.validate()?;

    let drink = store.update(id, &payload.title, &payload.recipe).await?;
    tracing::info!(id = drink.id, "updated drink");

    Ok(Json(json!({
        "success": true,
        "drinks": [drink.long()],
    })))
}

/// DELETE /drinks/:id - remove a drink, requires delete:drinks
pub async fn delete_drinks(
    State(store): State<DrinkStore>,
    id: Result<Path<i64>, PathRejection>,
) -> Result<Json<Value>, ApiError> {
    let Path(id) = id.map_err(bad_id)?;

    let deleted = store.delete(id).await?;
    tracing::info!(id = deleted, "deleted drink");

    Ok(Json(json!({
        "success": true,
        "delete": deleted,
    })))
}

fn bad_body(rejection: JsonRejection) -> ApiError {
    ApiError::bad_request(format!("Invalid request body: {}", rejection.body_text()))
}

fn bad_id(rejection: PathRejection) -> ApiError {
    ApiError::bad_request(format!("Invalid drink id: {}", rejection.body_text()))
}
