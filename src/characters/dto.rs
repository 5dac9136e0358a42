use serde::{Deserialize, Serialize};

use super::repo::Character;

/// Body for create and full update.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct CharacterInput {
    pub name: String,
    pub gender: String,
    pub ocupation: String,
    pub image: String,
}

#[derive(Debug, Serialize)]
pub struct ListInfo {
    pub count: usize,
}

#[derive(Debug, Serialize)]
pub struct CharacterList {
    pub info: ListInfo,
    pub results: Vec<Character>,
}

#[derive(Debug, Serialize)]
pub struct CharacterDetails {
    pub results: Character,
}

#[derive(Debug, Serialize)]
pub struct CreatedCharacterResponse {
    pub success: bool,
    pub id: i64,
}

#[derive(Debug, Serialize)]
pub struct MutationResponse {
    pub success: bool,
    pub message: String,
}
