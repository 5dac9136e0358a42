use axum::{
    extract::State,
    routing::{get, post},
    Json, Router,
};
use tracing::{info, instrument};

use super::dto::{
    CharacterDetails, CharacterInput, CharacterList, CreatedCharacterResponse, ListInfo,
    MutationResponse,
};
use crate::{
    error::{AppError, AppResult},
    extract::{AppJson, AppPath},
    state::AppState,
};

pub fn character_routes() -> Router<AppState> {
    Router::new()
        .route("/characters", get(list_characters))
        .route(
            "/characters/:id",
            get(get_character)
                .put(update_character)
                .delete(delete_character),
        )
        .route("/newCharacter", post(create_character))
}

#[instrument(skip(state))]
pub async fn list_characters(State(state): State<AppState>) -> AppResult<Json<CharacterList>> {
    let results = state.characters.list().await?;
    Ok(Json(CharacterList {
        info: ListInfo {
            count: results.len(),
        },
        results,
    }))
}

#[instrument(skip(state))]
pub async fn get_character(
    State(state): State<AppState>,
    AppPath(id): AppPath<i64>,
) -> AppResult<Json<CharacterDetails>> {
    let character = state
        .characters
        .get_by_id(id)
        .await?
        .ok_or_else(|| AppError::bad_request("This character does not exist in the database"))?;
    Ok(Json(CharacterDetails { results: character }))
}

#[instrument(skip(state, body))]
pub async fn create_character(
    State(state): State<AppState>,
    AppJson(body): AppJson<CharacterInput>,
) -> AppResult<Json<CreatedCharacterResponse>> {
    let id = state.characters.insert(body).await?;
    info!(id, "character created");
    Ok(Json(CreatedCharacterResponse { success: true, id }))
}

#[instrument(skip(state, body))]
pub async fn update_character(
    State(state): State<AppState>,
    AppPath(id): AppPath<i64>,
    AppJson(body): AppJson<CharacterInput>,
) -> AppResult<Json<MutationResponse>> {
    let affected = state.characters.update(id, body).await?;
    Ok(Json(mutation_outcome(
        affected,
        "The character was modified successfully",
    )))
}

#[instrument(skip(state))]
pub async fn delete_character(
    State(state): State<AppState>,
    AppPath(id): AppPath<i64>,
) -> AppResult<Json<MutationResponse>> {
    let affected = state.characters.delete(id).await?;
    Ok(Json(mutation_outcome(
        affected,
        "The character was deleted successfully",
    )))
}

fn mutation_outcome(affected: u64, done: &str) -> MutationResponse {
    if affected > 0 {
        MutationResponse {
            success: true,
            message: done.into(),
        }
    } else {
        MutationResponse {
            success: false,
            message: "This character does not exist".into(),
        }
    }
}
