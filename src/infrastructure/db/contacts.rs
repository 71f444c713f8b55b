use crate::domain::contact::{ContactRecord, StoredContact};
use crate::domain::error::{AppError, Result};
use sqlx::{
    sqlite::{SqliteConnectOptions, SqlitePool, SqlitePoolOptions},
    Pool, Sqlite,
};
use std::str::FromStr;
use validator::Validate;

pub struct ContactRepository {
    pool: Pool<Sqlite>,
}

/// What happened to one record on insert
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InsertOutcome {
    Inserted,
    Duplicate,
}

impl ContactRepository {
    pub async fn init(database_url: &str, max_connections: u32) -> Result<Self> {
        let options = SqliteConnectOptions::from_str(database_url)
            .map_err(|e| {
                AppError::DatabaseError(format!("Failed to parse connection string: {}", e))
            })?
            .create_if_missing(true);

        // every connection to sqlite::memory: is its own database
        let max_connections = if database_url.contains(":memory:") {
            1
        } else {
            max_connections
        };

        let pool = SqlitePoolOptions::new()
            .max_connections(max_connections)
            .connect_with(options)
            .await
            .map_err(|e| AppError::DatabaseError(format!("Failed to connect: {}", e)))?;

        sqlx::query(
            "CREATE TABLE IF NOT EXISTS connections (
                id INTEGER PRIMARY KEY AUTOINCREMENT,
                user_id INTEGER NOT NULL,
                connection_name TEXT NOT NULL,
                connection_company TEXT,
                connection_title TEXT,
                connection_email TEXT,
                connection_location TEXT,
                connection_profile_url TEXT,
                relationship_strength INTEGER NOT NULL DEFAULT 3,
                mutual_connections_count INTEGER NOT NULL DEFAULT 0,
                created_at DATETIME NOT NULL
            )",
        )
        .execute(&pool)
        .await
        .map_err(|e| AppError::DatabaseError(format!("Failed to create table: {}", e)))?;

        sqlx::query(
            "CREATE INDEX IF NOT EXISTS idx_connections_user_name
             ON connections (user_id, connection_name)",
        )
        .execute(&pool)
        .await
        .map_err(|e| AppError::DatabaseError(format!("Failed to create index: {}", e)))?;

        Ok(Self { pool })
    }

    /// Insert each record unless the user already has a contact with the same name.
    /// Runs in one transaction; outcomes are returned in input order.
    pub async fn insert_if_absent(
        &self,
        user_id: i64,
        records: &[ContactRecord],
    ) -> Result<Vec<InsertOutcome>> {
        let mut tx = self
            .pool
            .begin()
            .await
            .map_err(|e| AppError::DatabaseError(format!("Failed to begin transaction: {}", e)))?;

        let mut outcomes = Vec::with_capacity(records.len());

        for record in records {
            record
                .validate()
                .map_err(|e| AppError::ValidationError(format!("Invalid contact: {}", e)))?;

            let result = sqlx::query(
                "INSERT INTO connections (
                    user_id, connection_name, connection_company, connection_title,
                    connection_email, connection_location, connection_profile_url,
                    relationship_strength, mutual_connections_count, created_at
                 )
                 SELECT ?, ?, ?, ?, ?, ?, ?, ?, ?, ?
                 WHERE NOT EXISTS (
                    SELECT 1 FROM connections WHERE user_id = ? AND connection_name = ?
                 )",
            )
            .bind(user_id)
            .bind(&record.name)
            .bind(&record.company)
            .bind(&record.title)
            .bind(&record.email)
            .bind(&record.location)
            .bind(&record.profile_url)
            .bind(record.relationship_strength as i64)
            .bind(record.mutual_connections_count as i64)
            .bind(chrono::Utc::now())
            .bind(user_id)
            .bind(&record.name)
            .execute(&mut *tx)
            .await
            .map_err(|e| AppError::DatabaseError(format!("Failed to insert contact: {}", e)))?;

            outcomes.push(if result.rows_affected() == 1 {
                InsertOutcome::Inserted
            } else {
                InsertOutcome::Duplicate
            });
        }

        tx.commit()
            .await
            .map_err(|e| AppError::DatabaseError(format!("Failed to commit: {}", e)))?;

        Ok(outcomes)
    }

    pub async fn list_for_user(&self, user_id: i64) -> Result<Vec<StoredContact>> {
        sqlx::query_as::<_, ContactEntity>(
            "SELECT id, user_id, connection_name, connection_company, connection_title,
                    connection_email, connection_location, connection_profile_url,
                    relationship_strength, mutual_connections_count, created_at
             FROM connections WHERE user_id = ? ORDER BY id",
        )
        .bind(user_id)
        .fetch_all(&self.pool)
        .await
        .map_err(|e| AppError::DatabaseError(format!("Failed to fetch contacts: {}", e)))
        .map(|entities| entities.into_iter().map(|e| e.into()).collect())
    }
}

// Internal entity for database mapping
#[derive(sqlx::FromRow)]
struct ContactEntity {
    id: i64,
    user_id: i64,
    connection_name: String,
    connection_company: Option<String>,
    connection_title: Option<String>,
    connection_email: Option<String>,
    connection_location: Option<String>,
    connection_profile_url: Option<String>,
    relationship_strength: i64,
    mutual_connections_count: i64,
    created_at: chrono::DateTime<chrono::Utc>,
}

impl From<ContactEntity> for StoredContact {
    fn from(e: ContactEntity) -> Self {
        Self {
            id: e.id,
            user_id: e.user_id,
            record: ContactRecord {
                name: e.connection_name,
                company: e.connection_company,
                title: e.connection_title,
                email: e.connection_email,
                location: e.connection_location,
                profile_url: e.connection_profile_url,
                relationship_strength: e.relationship_strength.clamp(1, 5) as u8,
                mutual_connections_count: e.mutual_connections_count.max(0) as u32,
            },
            created_at: e.created_at,
        }
    }
}
