use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use sqlx::{FromRow, PgPool};
use tokio::sync::RwLock;

use super::dto::CharacterInput;
use crate::error::AppResult;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, FromRow)]
pub struct Character {
    pub id: i64,
    pub name: String,
    pub gender: String,
    pub ocupation: String,
    pub image: String,
}

impl Character {
    fn from_input(id: i64, input: CharacterInput) -> Self {
        Self {
            id,
            name: input.name,
            gender: input.gender,
            ocupation: input.ocupation,
            image: input.image,
        }
    }
}

/// `update` and `delete` report rows affected; zero means no such id.
#[async_trait]
pub trait CharacterStore: Send + Sync {
    async fn list(&self) -> AppResult<Vec<Character>>;
    async fn get_by_id(&self, id: i64) -> AppResult<Option<Character>>;
    async fn insert(&self, input: CharacterInput) -> AppResult<i64>;
    async fn update(&self, id: i64, input: CharacterInput) -> AppResult<u64>;
    async fn delete(&self, id: i64) -> AppResult<u64>;
}

#[derive(Clone)]
pub struct PgCharacterStore {
    db: PgPool,
}

impl PgCharacterStore {
    pub fn new(db: PgPool) -> Self {
        Self { db }
    }
}

#[async_trait]
impl CharacterStore for PgCharacterStore {
    async fn list(&self) -> AppResult<Vec<Character>> {
        let rows = sqlx::query_as::<_, Character>(
            r#"
            SELECT id, name, gender, ocupation, image
            FROM characters
            ORDER BY id
            "#,
        )
        .fetch_all(&self.db)
        .await?;
        Ok(rows)
    }

    async fn get_by_id(&self, id: i64) -> AppResult<Option<Character>> {
        let row = sqlx::query_as::<_, Character>(
            r#"
            SELECT id, name, gender, ocupation, image
            FROM characters
            WHERE id = $1
            "#,
        )
        .bind(id)
        .fetch_optional(&self.db)
        .await?;
        Ok(row)
    }

    async fn insert(&self, input: CharacterInput) -> AppResult<i64> {
        let id = sqlx::query_scalar::<_, i64>(
            r#"
            INSERT INTO characters (name, gender, ocupation, image)
            VALUES ($1, $2, $3, $4)
            RETURNING id
            "#,
        )
        .bind(&input.name)
        .bind(&input.gender)
        .bind(&input.ocupation)
        .bind(&input.image)
        .fetch_one(&self.db)
        .await?;
        Ok(id)
    }

    async fn update(&self, id: i64, input: CharacterInput) -> AppResult<u64> {
        let res = sqlx::query(
            r#"
            UPDATE characters
               SET name = $1, gender = $2, ocupation = $3, image = $4
             WHERE id = $5
            "#,
        )
        .bind(&input.name)
        .bind(&input.gender)
        .bind(&input.ocupation)
        .bind(&input.image)
        .bind(id)
        .execute(&self.db)
        .await?;
        Ok(res.rows_affected())
    }

    async fn delete(&self, id: i64) -> AppResult<u64> {
        let res = sqlx::query(r#"DELETE FROM characters WHERE id = $1"#)
            .bind(id)
            .execute(&self.db)
            .await?;
        Ok(res.rows_affected())
    }
}

#[derive(Default)]
pub struct MemoryCharacterStore {
    inner: RwLock<MemoryTable>,
}

#[derive(Default)]
struct MemoryTable {
    next_id: i64,
    rows: Vec<Character>,
}

#[async_trait]
impl CharacterStore for MemoryCharacterStore {
    async fn list(&self) -> AppResult<Vec<Character>> {
        Ok(self.inner.read().await.rows.clone())
    }

    async fn get_by_id(&self, id: i64) -> AppResult<Option<Character>> {
        let table = self.inner.read().await;
        Ok(table.rows.iter().find(|c| c.id == id).cloned())
    }

    async fn insert(&self, input: CharacterInput) -> AppResult<i64> {
        let mut table = self.inner.write().await;
        table.next_id += 1;
        let id = table.next_id;
        table.rows.push(Character::from_input(id, input));
        Ok(id)
    }

    async fn update(&self, id: i64, input: CharacterInput) -> AppResult<u64> {
        let mut table = self.inner.write().await;
        match table.rows.iter_mut().find(|c| c.id == id) {
            Some(row) => {
                *row = Character::from_input(id, input);
                Ok(1)
            }
            None => Ok(0),
        }
    }

    async fn delete(&self, id: i64) -> AppResult<u64> {
        let mut table = self.inner.write().await;
        let before = table.rows.len();
        table.rows.retain(|c| c.id != id);
        Ok((before - table.rows.len()) as u64)
    }
}
