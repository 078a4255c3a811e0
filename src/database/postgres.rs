use deadpool_postgres::{Config, Pool, PoolConfig, Runtime};
use log::{error, info};
use tokio_postgres::{NoTls, Row};

use super::models::StoredQuestion;
use super::{DatabaseError, QuestionStore, Result};
use crate::config::DatabaseConfig;
use crate::quiz::{Question, ValidDraft};

const CREATE_QUESTIONS_TABLE: &str = r#"
    CREATE TABLE IF NOT EXISTS questions (
        id BIGSERIAL PRIMARY KEY,
        text TEXT NOT NULL,
        type TEXT NOT NULL,
        options TEXT NOT NULL,
        correct_answers TEXT NOT NULL
    )
"#;

#[derive(Debug)]
pub struct DatabaseManager {
    pool: Pool,
}

impl DatabaseManager {
    pub async fn new(settings: &DatabaseConfig) -> Result<Self> {
        info!(
            "Connecting to database: {}@{}:{}/{}",
            settings.user, settings.host, settings.port, settings.dbname
        );

        let mut cfg = Config::new();
        cfg.host = Some(settings.host.clone());
        cfg.port = Some(settings.port);
        cfg.dbname = Some(settings.dbname.clone());
        cfg.user = Some(settings.user.clone());
        cfg.password = Some(settings.password.clone());
        cfg.manager = Some(deadpool_postgres::ManagerConfig {
            recycling_method: deadpool_postgres::RecyclingMethod::Fast,
        });
        cfg.pool = Some(PoolConfig::new(settings.pool_size));

        let pool = cfg
            .create_pool(Some(Runtime::Tokio1), NoTls)
            .map_err(|e| DatabaseError::ConnectionFailed(format!("Pool creation failed: {}", e)))?;

        // Test connection
        let _client = pool
            .get()
            .await
            .map_err(|e| DatabaseError::ConnectionFailed(format!("Connection test failed: {}", e)))?;

        info!("Database connection established successfully");

        Ok(DatabaseManager { pool })
    }

    /// Creates the `questions` table if it does not exist yet.
    pub async fn initialize_schema(&self) -> Result<()> {
        let client = self.client().await?;

        client.batch_execute(CREATE_QUESTIONS_TABLE).await.map_err(|e| {
            error!("Failed to create questions table: {}", e);
            DatabaseError::QueryFailed(format!("Failed to create questions table: {}", e))
        })?;

        info!("Questions table is ready");
        Ok(())
    }

    pub fn close(&self) {
        self.pool.close();
        info!("Closed the database connection pool");
    }

    async fn client(&self) -> Result<deadpool_postgres::Object> {
        self.pool
            .get()
            .await
            .map_err(|e| DatabaseError::ConnectionFailed(e.to_string()))
    }

    fn row_to_question(row: &Row) -> Result<Question> {
        StoredQuestion {
            id: row.get("id"),
            text: row.get("text"),
            question_type: row.get("type"),
            options: row.get("options"),
            correct_answers: row.get("correct_answers"),
        }
        .decode()
        .map_err(|e| {
            error!("Failed to decode stored question: {}", e);
            e
        })
    }
}

impl QuestionStore for DatabaseManager {
    async fn create(&self, draft: &ValidDraft) -> Result<i64> {
        let client = self.client().await?;
        let stored = StoredQuestion::encode(0, draft)?;

        let row = client
            .query_one(
                r#"
                INSERT INTO questions (text, type, options, correct_answers)
                VALUES ($1, $2, $3, $4)
                RETURNING id
                "#,
                &[
                    &stored.text,
                    &stored.question_type,
                    &stored.options,
                    &stored.correct_answers,
                ],
            )
            .await
            .map_err(|e| {
                error!("Failed to insert question: {}", e);
                DatabaseError::QueryFailed(format!("Failed to insert question: {}", e))
            })?;

        let id: i64 = row.get(0);
        info!("Inserted question {}", id);
        Ok(id)
    }

    async fn list(&self) -> Result<Vec<Question>> {
        let client = self.client().await?;

        let rows = client
            .query(
                "SELECT id, text, type, options, correct_answers FROM questions ORDER BY id",
                &[],
            )
            .await
            .map_err(|e| {
                error!("Failed to fetch questions: {}", e);
                DatabaseError::QueryFailed(format!("Failed to fetch questions: {}", e))
            })?;

        rows.iter().map(Self::row_to_question).collect()
    }

    async fn get(&self, id: i64) -> Result<Question> {
        let client = self.client().await?;

        let row = client
            .query_opt(
                "SELECT id, text, type, options, correct_answers FROM questions WHERE id = $1",
                &[&id],
            )
            .await
            .map_err(|e| {
                error!("Failed to fetch question {}: {}", id, e);
                DatabaseError::QueryFailed(format!("Failed to fetch question: {}", e))
            })?
            .ok_or(DatabaseError::QuestionNotFound(id))?;

        Self::row_to_question(&row)
    }

    async fn update(&self, id: i64, draft: &ValidDraft) -> Result<u64> {
        let client = self.client().await?;
        let stored = StoredQuestion::encode(id, draft)?;

        let rows_affected = client
            .execute(
                r#"
                UPDATE questions
                SET text = $1, type = $2, options = $3, correct_answers = $4
                WHERE id = $5
                "#,
                &[
                    &stored.text,
                    &stored.question_type,
                    &stored.options,
                    &stored.correct_answers,
                    &id,
                ],
            )
            .await
            .map_err(|e| {
                error!("Failed to update question {}: {}", id, e);
                DatabaseError::QueryFailed(format!("Failed to update question: {}", e))
            })?;

        if rows_affected == 0 {
            return Err(DatabaseError::QuestionNotFound(id));
        }

        info!("Question {} updated", id);
        Ok(rows_affected)
    }

    async fn delete(&self, id: i64) -> Result<u64> {
        let client = self.client().await?;

        let rows_affected = client
            .execute("DELETE FROM questions WHERE id = $1", &[&id])
            .await
            .map_err(|e| {
                error!("Failed to delete question {}: {}", id, e);
                DatabaseError::QueryFailed(format!("Failed to delete question: {}", e))
            })?;

        if rows_affected == 0 {
            return Err(DatabaseError::QuestionNotFound(id));
        }

        info!("Question {} deleted", id);
        Ok(rows_affected)
    }
}
