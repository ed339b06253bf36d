//! UserRepository - Accounts, roles and bans

use super::{Create, Read, Update};
use crate::dtos::{CreateUserDTO, UpdateUserDTO};
use crate::entities::{User, UserRole};
use chrono::Utc;
use sqlx::{Error, QueryBuilder, Sqlite, SqlitePool};
use tracing::{debug, instrument};

pub struct UserRepository {
    connection_pool: SqlitePool,
}

impl UserRepository {
    pub fn new(connection_pool: SqlitePool) -> UserRepository {
        Self { connection_pool }
    }

    /// Exact nickname match (nicknames are unique)
    pub async fn find_by_nickname(&self, nickname: &str) -> Result<Option<User>, Error> {
        sqlx::query_as::<_, User>("SELECT * FROM users WHERE nickname = ?")
            .bind(nickname)
            .fetch_optional(&self.connection_pool)
            .await
    }

    /// Users ordered by id, optionally filtered by nickname prefix
    #[instrument(skip(self))]
    pub async fn list(
        &self,
        prefix: Option<&str>,
        limit: i64,
        offset: i64,
    ) -> Result<Vec<User>, Error> {
        let mut query: QueryBuilder<Sqlite> = QueryBuilder::new("SELECT * FROM users");
        if let Some(prefix) = prefix.filter(|p| !p.is_empty()) {
            query
                .push(" WHERE nickname LIKE ")
                .push_bind(format!("{}%", escape_like(prefix)))
                .push(" ESCAPE '\\'");
        }
        query
            .push(" ORDER BY user_id LIMIT ")
            .push_bind(limit)
            .push(" OFFSET ")
            .push_bind(offset);

        let users = query
            .build_query_as::<User>()
            .fetch_all(&self.connection_pool)
            .await?;
        debug!("Listed {} users", users.len());
        Ok(users)
    }

    #[instrument(skip(self))]
    pub async fn set_banned(&self, user_id: i32, banned: bool) -> Result<User, Error> {
        sqlx::query_as::<_, User>("UPDATE users SET is_banned = ? WHERE user_id = ? RETURNING *")
            .bind(banned)
            .bind(user_id)
            .fetch_optional(&self.connection_pool)
            .await?
            .ok_or(Error::RowNotFound)
    }

    #[instrument(skip(self))]
    pub async fn set_role(&self, user_id: i32, role: UserRole) -> Result<User, Error> {
        sqlx::query_as::<_, User>("UPDATE users SET role = ? WHERE user_id = ? RETURNING *")
            .bind(role)
            .bind(user_id)
            .fetch_optional(&self.connection_pool)
            .await?
            .ok_or(Error::RowNotFound)
    }
}

/// Escapes `%`, `_` and `\` so user input matches literally inside LIKE
pub(crate) fn escape_like(input: &str) -> String {
    let mut escaped = String::with_capacity(input.len());
    for c in input.chars() {
        if matches!(c, '%' | '_' | '\\') {
            escaped.push('\\');
        }
        escaped.push(c);
    }
    escaped
}

impl Create<User, CreateUserDTO> for UserRepository {
    /// `data.password` must already be a bcrypt hash
    async fn create(&self, data: &CreateUserDTO) -> Result<User, Error> {
        sqlx::query_as::<_, User>(
            "INSERT INTO users (nickname, password, role, is_banned, created_at) \
             VALUES (?, ?, ?, 0, ?) RETURNING *",
        )
        .bind(&data.nickname)
        .bind(&data.password)
        .bind(UserRole::User)
        .bind(Utc::now())
        .fetch_one(&self.connection_pool)
        .await
    }
}

impl Read<User, i32> for UserRepository {
    async fn read(&self, id: &i32) -> Result<Option<User>, Error> {
        sqlx::query_as::<_, User>("SELECT * FROM users WHERE user_id = ?")
            .bind(id)
            .fetch_optional(&self.connection_pool)
            .await
    }
}

impl Update<User, UpdateUserDTO, i32> for UserRepository {
    /// `data.password`, when present, must already be a bcrypt hash
    async fn update(&self, id: &i32, data: &UpdateUserDTO) -> Result<User, Error> {
        sqlx::query_as::<_, User>(
            "UPDATE users SET nickname = COALESCE(?, nickname), password = COALESCE(?, password) \
             WHERE user_id = ? RETURNING *",
        )
        .bind(&data.nickname)
        .bind(&data.password)
        .bind(id)
        .fetch_optional(&self.connection_pool)
        .await?
        .ok_or(Error::RowNotFound)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[sqlx::test(fixtures(path = "../../fixtures", scripts("users")))]
    async fn test_find_by_nickname(pool: SqlitePool) -> sqlx::Result<()> {
        let repo = UserRepository::new(pool);
        let carol = repo.find_by_nickname("carol").await?.unwrap();
        assert_eq!(carol.user_id, 3);
        assert_eq!(carol.role, UserRole::Moderator);
        assert!(repo.find_by_nickname("nobody").await?.is_none());
        Ok(())
    }

    #[sqlx::test(fixtures(path = "../../fixtures", scripts("users")))]
    async fn test_create_defaults_to_plain_user(pool: SqlitePool) -> sqlx::Result<()> {
        let repo = UserRepository::new(pool);
        let user = repo
            .create(&CreateUserDTO {
                nickname: "henry".to_string(),
                password: "hash".to_string(),
            })
            .await?;
        assert_eq!(user.role, UserRole::User);
        assert!(!user.is_banned);

        let duplicate = repo
            .create(&CreateUserDTO {
                nickname: "henry".to_string(),
                password: "hash".to_string(),
            })
            .await;
        assert!(matches!(duplicate, Err(Error::Database(e)) if e.is_unique_violation()));
        Ok(())
    }

    #[sqlx::test(fixtures(path = "../../fixtures", scripts("users")))]
    async fn test_list_with_prefix(pool: SqlitePool) -> sqlx::Result<()> {
        let repo = UserRepository::new(pool);
        assert_eq!(repo.list(None, 100, 0).await?.len(), 7);

        let found = repo.list(Some("gr"), 100, 0).await?;
        assert_eq!(found.len(), 1);
        assert_eq!(found[0].nickname, "grace");

        // a literal '%' must not match everything
        assert!(repo.list(Some("%"), 100, 0).await?.is_empty());
        assert_eq!(repo.list(None, 2, 2).await?[0].user_id, 3);
        Ok(())
    }

    #[sqlx::test(fixtures(path = "../../fixtures", scripts("users")))]
    async fn test_set_banned_and_role(pool: SqlitePool) -> sqlx::Result<()> {
        let repo = UserRepository::new(pool);
        assert!(repo.set_banned(1, true).await?.is_banned);
        assert_eq!(repo.set_role(1, UserRole::Legend).await?.role, UserRole::Legend);
        assert!(matches!(repo.set_banned(99, true).await, Err(Error::RowNotFound)));
        Ok(())
    }

    #[sqlx::test(fixtures(path = "../../fixtures", scripts("users")))]
    async fn test_update_keeps_absent_fields(pool: SqlitePool) -> sqlx::Result<()> {
        let repo = UserRepository::new(pool);
        let updated = repo
            .update(
                &2,
                &UpdateUserDTO {
                    nickname: Some("bobby".to_string()),
                    password: None,
                },
            )
            .await?;
        assert_eq!(updated.nickname, "bobby");
        assert!(updated.password.starts_with("$2b$"));
        Ok(())
    }
}
