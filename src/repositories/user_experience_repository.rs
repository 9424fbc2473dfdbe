// src/repositories/user_experience_repository.rs
//
// Persistence of per-user experience counters ({xp, level, role})

use std::sync::Arc;

use chrono::Utc;
use rusqlite::{params, OptionalExtension, Row};
use uuid::Uuid;

use crate::db::{get_connection, ConnectionPool};
use crate::domain::experience::{ExperienceState, Role};
use crate::error::AppResult;

#[cfg_attr(test, mockall::automock)]
pub trait UserExperienceRepository: Send + Sync {
    fn get(&self, user_id: Uuid) -> AppResult<Option<ExperienceState>>;
    fn save(&self, user_id: Uuid, state: &ExperienceState) -> AppResult<()>;
}

pub struct SqliteUserExperienceRepository {
    pool: Arc<ConnectionPool>,
}

impl SqliteUserExperienceRepository {
    pub fn new(pool: Arc<ConnectionPool>) -> Self {
        Self { pool }
    }

    /// Map database row to ExperienceState - returns rusqlite::Error for
    /// query_row compatibility
    fn row_to_state(row: &Row) -> Result<ExperienceState, rusqlite::Error> {
        let xp: i64 = row.get("xp")?;
        let level: i64 = row.get("level")?;
        let role_str: String = row.get("role")?;

        let role = match role_str.as_str() {
            "Bronze" => Role::Bronze,
            "Silver" => Role::Silver,
            "Gold" => Role::Gold,
            "Platinum" => Role::Platinum,
            "Diamond" => Role::Diamond,
            other => {
                return Err(rusqlite::Error::FromSqlConversionFailure(
                    0,
                    rusqlite::types::Type::Text,
                    format!("unknown role: {}", other).into(),
                ))
            }
        };

        Ok(ExperienceState {
            xp: xp as u64,
            level: level as u32,
            role,
        })
    }
}

impl UserExperienceRepository for SqliteUserExperienceRepository {
    fn get(&self, user_id: Uuid) -> AppResult<Option<ExperienceState>> {
        let conn = get_connection(&self.pool)?;

        let state = conn
            .query_row(
                "SELECT xp, level, role FROM user_experience WHERE user_id = ?1",
                params![user_id.to_string()],
                Self::row_to_state,
            )
            .optional()?;

        Ok(state)
    }

    fn save(&self, user_id: Uuid, state: &ExperienceState) -> AppResult<()> {
        let conn = get_connection(&self.pool)?;

        conn.execute(
            "INSERT INTO user_experience (user_id, xp, level, role, updated_at)
             VALUES (?1, ?2, ?3, ?4, ?5)
             ON CONFLICT(user_id) DO UPDATE SET
                 xp = excluded.xp,
                 level = excluded.level,
                 role = excluded.role,
                 updated_at = excluded.updated_at",
            params![
                user_id.to_string(),
                state.xp as i64,
                state.level as i64,
                state.role.to_string(),
                Utc::now().to_rfc3339(),
            ],
        )?;

        Ok(())
    }
}
