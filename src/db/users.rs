//! User insert, lookup, and paged enumeration.

use crate::error::{Error, Result};
use crate::types::{User, UserId};

use super::{Database, PAGE_SIZE};

impl Database {
    /// Insert a user, failing with [`Error::Duplicate`] if the id exists
    ///
    /// The insert is durably committed before this returns.
    pub async fn add_user(&self, user: &User) -> Result<UserId> {
        sqlx::query(
            r#"
            INSERT INTO users (id, username, permalink, avatar_url)
            VALUES (?, ?, ?, ?)
            "#,
        )
        .bind(user.id)
        .bind(&user.username)
        .bind(&user.permalink)
        .bind(&user.avatar_url)
        .execute(&self.pool)
        .await
        .map_err(|e| duplicate_or(e, || format!("user {}", user.id)))?;

        Ok(user.id)
    }

    /// Look up a user by id
    pub async fn find_user(&self, id: UserId) -> Result<Option<User>> {
        let row = sqlx::query_as::<_, User>(
            r#"
            SELECT id, username, permalink, avatar_url
            FROM users
            WHERE id = ?
            "#,
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(row)
    }

    /// One page of users in ascending id order (zero-based page number)
    pub async fn list_users_page(&self, page: i64) -> Result<Vec<User>> {
        let rows = sqlx::query_as::<_, User>(
            r#"
            SELECT id, username, permalink, avatar_url
            FROM users
            ORDER BY id
            LIMIT ? OFFSET ?
            "#,
        )
        .bind(PAGE_SIZE)
        .bind(PAGE_SIZE * page)
        .fetch_all(&self.pool)
        .await?;

        Ok(rows)
    }

    /// Cursor over all users, one page at a time, starting from the beginning
    pub fn users(&self) -> UserPages<'_> {
        UserPages {
            db: self,
            page: 0,
            done: false,
        }
    }
}

/// Page cursor over the users table in ascending id order
///
/// Enumeration ends at the first empty page. Stable (no skips or repeats) as
/// long as no concurrent writes land in already-visited id ranges.
#[derive(Debug)]
pub struct UserPages<'a> {
    db: &'a Database,
    page: i64,
    done: bool,
}

impl UserPages<'_> {
    /// Fetch the next page, or `None` when the table is exhausted
    pub async fn next_page(&mut self) -> Result<Option<Vec<User>>> {
        if self.done {
            return Ok(None);
        }
        let rows = self.db.list_users_page(self.page).await?;
        if rows.is_empty() {
            self.done = true;
            return Ok(None);
        }
        self.page += 1;
        Ok(Some(rows))
    }
}

/// Map a unique-constraint violation to [`Error::Duplicate`]
pub(super) fn duplicate_or(e: sqlx::Error, what: impl FnOnce() -> String) -> Error {
    if let sqlx::Error::Database(db_err) = &e {
        if db_err.is_unique_violation() {
            return Error::Duplicate(what());
        }
    }
    Error::Database(e)
}
