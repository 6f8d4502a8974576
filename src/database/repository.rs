use async_trait::async_trait;
use sqlx::{PgPool, SqlitePool};

use crate::database::manager::DatabaseError;
use crate::database::models::person::{Person, PersonDraft};

/// Storage gateway for [`Person`] rows, keyed by integer id
#[async_trait]
pub trait PersonRepository: Send + Sync {
    async fn find_by_id(&self, id: i32) -> Result<Option<Person>, DatabaseError>;

    /// Overwrite the row matching `draft.id`, or insert a new row with a
    /// generated id when there is none. Returns the row as stored and
    /// whether an existing row was overwritten, decided in one transaction.
    async fn save_and_flush(&self, draft: PersonDraft) -> Result<(Person, bool), DatabaseError>;

    async fn delete(&self, person: &Person) -> Result<(), DatabaseError>;

    async fn health_check(&self) -> Result<(), DatabaseError>;
}

pub struct PgPersonRepository {
    pool: PgPool,
}

impl PgPersonRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    pub async fn ensure_schema(&self) -> Result<(), DatabaseError> {
        sqlx::query(
            r#"
            CREATE TABLE IF NOT EXISTS person (
                id           SERIAL PRIMARY KEY,
                first_name   TEXT NOT NULL,
                last_name    TEXT,
                phone_number VARCHAR(10)
            )
            "#,
        )
        .execute(&self.pool)
        .await?;
        Ok(())
    }
}

#[async_trait]
impl PersonRepository for PgPersonRepository {
    async fn find_by_id(&self, id: i32) -> Result<Option<Person>, DatabaseError> {
        let person = sqlx::query_as::<_, Person>(
            "SELECT id, first_name, last_name, phone_number FROM person WHERE id = $1",
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(person)
    }

    async fn save_and_flush(&self, draft: PersonDraft) -> Result<(Person, bool), DatabaseError> {
        let mut tx = self.pool.begin().await?;

        if let Some(id) = draft.id {
            let updated = sqlx::query_as::<_, Person>(
                "UPDATE person SET first_name = $2, last_name = $3, phone_number = $4
                 WHERE id = $1
                 RETURNING id, first_name, last_name, phone_number",
            )
            .bind(id)
            .bind(&draft.first_name)
            .bind(&draft.last_name)
            .bind(&draft.phone_number)
            .fetch_optional(&mut *tx)
            .await?;

            if let Some(person) = updated {
                tx.commit().await?;
                return Ok((person, true));
            }
        }

        let inserted = sqlx::query_as::<_, Person>(
            "INSERT INTO person (first_name, last_name, phone_number)
             VALUES ($1, $2, $3)
             RETURNING id, first_name, last_name, phone_number",
        )
        .bind(&draft.first_name)
        .bind(&draft.last_name)
        .bind(&draft.phone_number)
        .fetch_one(&mut *tx)
        .await?;

        tx.commit().await?;
        Ok((inserted, false))
    }

    async fn delete(&self, person: &Person) -> Result<(), DatabaseError> {
        sqlx::query("DELETE FROM person WHERE id = $1")
            .bind(person.id)
            .execute(&self.pool)
            .await?;
        Ok(())
    }

    async fn health_check(&self) -> Result<(), DatabaseError> {
        sqlx::query("SELECT 1").execute(&self.pool).await?;
        Ok(())
    }
}

pub struct SqlitePersonRepository {
    pool: SqlitePool,
}

impl SqlitePersonRepository {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    pub async fn ensure_schema(&self) -> Result<(), DatabaseError> {
        sqlx::query(
            r#"
            CREATE TABLE IF NOT EXISTS person (
                id           INTEGER PRIMARY KEY AUTOINCREMENT,
                first_name   TEXT NOT NULL,
                last_name    TEXT,
                phone_number TEXT
            )
            "#,
        )
        .execute(&self.pool)
        .await?;
        Ok(())
    }
}

#[async_trait]
impl PersonRepository for SqlitePersonRepository {
    async fn find_by_id(&self, id: i32) -> Result<Option<Person>, DatabaseError> {
        let person = sqlx::query_as::<_, Person>(
            "SELECT id, first_name, last_name, phone_number FROM person WHERE id = ?",
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(person)
    }

    async fn save_and_flush(&self, draft: PersonDraft) -> Result<(Person, bool), DatabaseError> {
        let mut tx = self.pool.begin().await?;

        if let Some(id) = draft.id {
            let updated = sqlx::query_as::<_, Person>(
                "UPDATE person SET first_name = ?, last_name = ?, phone_number = ?
                 WHERE id = ?
                 RETURNING id, first_name, last_name, phone_number",
            )
            .bind(&draft.first_name)
            .bind(&draft.last_name)
            .bind(&draft.phone_number)
            .bind(id)
            .fetch_optional(&mut *tx)
            .await?;

            if let Some(person) = updated {
                tx.commit().await?;
                return Ok((person, true));
            }
        }

        let inserted = sqlx::query_as::<_, Person>(
            "INSERT INTO person (first_name, last_name, phone_number)
             VALUES (?, ?, ?)
             RETURNING id, first_name, last_name, phone_number",
        )
        .bind(&draft.first_name)
        .bind(&draft.last_name)
        .bind(&draft.phone_number)
        .fetch_one(&mut *tx)
        .await?;

        tx.commit().await?;
        Ok((inserted, false))
    }

    async fn delete(&self, person: &Person) -> Result<(), DatabaseError> {
        sqlx::query("DELETE FROM person WHERE id = ?")
            .bind(person.id)
            .execute(&self.pool)
            .await?;
        Ok(())
    }

    async fn health_check(&self) -> Result<(), DatabaseError> {
        sqlx::query("SELECT 1").execute(&self.pool).await?;
        Ok(())
    }
}
