//! SQLite user repository.

use std::collections::BTreeSet;

use async_trait::async_trait;
use chrono::NaiveDate;
use filmhub_domain::{FilmId, NewUser, User, UserId};
use sqlx::sqlite::SqliteRow;
use sqlx::{Row, SqlitePool};

use crate::infrastructure::ports::{LinkMode, RepoError, UserRepo};

pub struct SqliteUserRepo {
    pool: SqlitePool,
    friend_links: LinkMode,
}

impl SqliteUserRepo {
    pub(super) fn new(pool: SqlitePool, friend_links: LinkMode) -> Self {
        Self { pool, friend_links }
    }

    async fn ids(&self, operation: &'static str, sql: &str, id: UserId) -> Result<Vec<i64>, RepoError> {
        sqlx::query_scalar::<_, i64>(sql)
            .bind(id.get())
            .fetch_all(&self.pool)
            .await
            .map_err(|e| RepoError::database(operation, e))
    }

    async fn hydrate(&self, row: &SqliteRow) -> Result<User, RepoError> {
        let decode = |e: sqlx::Error| RepoError::database("users.decode", e);
        let id = UserId::new(row.try_get("id").map_err(decode)?);
        let birthday: NaiveDate = row.try_get("birthday").map_err(decode)?;

        let friends = self
            .ids(
                "users.friends",
                "SELECT friend_id FROM users_friends WHERE user_id = ? ORDER BY friend_id",
                id,
            )
            .await?
            .into_iter()
            .map(UserId::new)
            .collect::<BTreeSet<_>>();
        let liked_films = self
            .ids(
                "users.liked_films",
                "SELECT film_id FROM films_likes WHERE user_id = ? ORDER BY film_id",
                id,
            )
            .await?
            .into_iter()
            .map(FilmId::new)
            .collect::<BTreeSet<_>>();

        Ok(User {
            id,
            email: row.try_get("email").map_err(decode)?,
            login: row.try_get("login").map_err(decode)?,
            name: row.try_get("name").map_err(decode)?,
            birthday,
            friends,
            liked_films,
        })
    }

    async fn hydrate_all(&self, rows: Vec<SqliteRow>) -> Result<Vec<User>, RepoError> {
        let mut users = Vec::with_capacity(rows.len());
        for row in &rows {
            users.push(self.hydrate(row).await?);
        }
        Ok(users)
    }

    async fn fetch_saved(&self, id: UserId) -> Result<User, RepoError> {
        self.get(id)
            .await?
            .ok_or_else(|| RepoError::not_found("User", id))
    }
}

#[async_trait]
impl UserRepo for SqliteUserRepo {
    async fn exists(&self, id: UserId) -> Result<bool, RepoError> {
        let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM users WHERE id = ?")
            .bind(id.get())
            .fetch_one(&self.pool)
            .await
            .map_err(|e| RepoError::database("users.exists", e))?;
        Ok(count > 0)
    }

    async fn get(&self, id: UserId) -> Result<Option<User>, RepoError> {
        let row = sqlx::query("SELECT id, email, login, name, birthday FROM users WHERE id = ?")
            .bind(id.get())
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| RepoError::database("users.get", e))?;

        match row {
            Some(row) => Ok(Some(self.hydrate(&row).await?)),
            None => Ok(None),
        }
    }

    async fn list_all(&self) -> Result<Vec<User>, RepoError> {
        let rows = sqlx::query("SELECT id, email, login, name, birthday FROM users ORDER BY id")
            .fetch_all(&self.pool)
            .await
            .map_err(|e| RepoError::database("users.list_all", e))?;
        self.hydrate_all(rows).await
    }

    async fn save(&self, user: &NewUser) -> Result<User, RepoError> {
        let result = sqlx::query(
            "INSERT INTO users (email, login, name, birthday) VALUES (?, ?, ?, ?)",
        )
        .bind(&user.email)
        .bind(&user.login)
        .bind(user.display_name())
        .bind(user.birthday)
        .execute(&self.pool)
        .await
        .map_err(|e| RepoError::database("users.save", e))?;
        let id = UserId::new(result.last_insert_rowid());

        tracing::debug!(user_id = %id, login = %user.login, "User created");
        self.fetch_saved(id).await
    }

    async fn update(&self, id: UserId, user: &NewUser) -> Result<User, RepoError> {
        let result = sqlx::query(
            "UPDATE users SET email = ?, login = ?, name = ?, birthday = ? WHERE id = ?",
        )
        .bind(&user.email)
        .bind(&user.login)
        .bind(user.display_name())
        .bind(user.birthday)
        .bind(id.get())
        .execute(&self.pool)
        .await
        .map_err(|e| RepoError::database("users.update", e))?;
        if result.rows_affected() == 0 {
            return Err(RepoError::not_found("User", id));
        }

        tracing::debug!(user_id = %id, "User updated");
        self.fetch_saved(id).await
    }

    async fn add_friend(&self, user_id: UserId, friend_id: UserId) -> Result<(), RepoError> {
        let mut tx = self
            .pool
            .begin()
            .await
            .map_err(|e| RepoError::database("users.add_friend", e))?;

        let mut pairs = vec![(user_id, friend_id)];
        if self.friend_links == LinkMode::Mutual {
            pairs.push((friend_id, user_id));
        }
        for (from, to) in pairs {
            sqlx::query("INSERT OR IGNORE INTO users_friends (user_id, friend_id) VALUES (?, ?)")
                .bind(from.get())
                .bind(to.get())
                .execute(&mut *tx)
                .await
                .map_err(|e| RepoError::database("users.add_friend", e))?;
        }

        tx.commit()
            .await
            .map_err(|e| RepoError::database("users.add_friend", e))?;
        tracing::debug!(user_id = %user_id, friend_id = %friend_id, "Friend added");
        Ok(())
    }

    async fn remove_friend(&self, user_id: UserId, friend_id: UserId) -> Result<(), RepoError> {
        let sql = match self.friend_links {
            LinkMode::Directed => "DELETE FROM users_friends WHERE user_id = ?1 AND friend_id = ?2",
            LinkMode::Mutual => {
                r#"
                DELETE FROM users_friends
                WHERE (user_id = ?1 AND friend_id = ?2) OR (user_id = ?2 AND friend_id = ?1)
                "#
            }
        };
        sqlx::query(sql)
            .bind(user_id.get())
            .bind(friend_id.get())
            .execute(&self.pool)
            .await
            .map_err(|e| RepoError::database("users.remove_friend", e))?;
        tracing::debug!(user_id = %user_id, friend_id = %friend_id, "Friend removed");
        Ok(())
    }

    async fn friends_of(&self, id: UserId) -> Result<Vec<User>, RepoError> {
        let rows = sqlx::query(
            r#"
            SELECT u.id, u.email, u.login, u.name, u.birthday
            FROM users_friends uf
            JOIN users u ON u.id = uf.friend_id
            WHERE uf.user_id = ?
            ORDER BY u.id
            "#,
        )
        .bind(id.get())
        .fetch_all(&self.pool)
        .await
        .map_err(|e| RepoError::database("users.friends_of", e))?;
        self.hydrate_all(rows).await
    }

    async fn mutual_friends(&self, id: UserId, other_id: UserId) -> Result<Vec<User>, RepoError> {
        let rows = sqlx::query(
            r#"
            SELECT u.id, u.email, u.login, u.name, u.birthday
            FROM users u
            WHERE u.id IN (SELECT friend_id FROM users_friends WHERE user_id = ?1)
              AND u.id IN (SELECT friend_id FROM users_friends WHERE user_id = ?2)
            ORDER BY u.id
            "#,
        )
        .bind(id.get())
        .bind(other_id.get())
        .fetch_all(&self.pool)
        .await
        .map_err(|e| RepoError::database("users.mutual_friends", e))?;
        self.hydrate_all(rows).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::infrastructure::sqlite::{open_temp, SqliteRepositories};

    fn user(login: &str) -> NewUser {
        NewUser::new(
            format!("{login}@example.com"),
            login,
            NaiveDate::from_ymd_opt(1985, 10, 26).expect("valid date"),
        )
    }

    async fn seed(repos: &SqliteRepositories, count: usize) -> Vec<UserId> {
        let mut ids = Vec::new();
        for n in 0..count {
            let saved = repos
                .user
                .save(&user(&format!("sqlite{n}")))
                .await
                .expect("save");
            ids.push(saved.id);
        }
        ids
    }

    #[tokio::test]
    async fn save_applies_name_fallback_and_sequential_ids() {
        let temp_dir = tempfile::tempdir().expect("tempdir");
        let repos = open_temp(&temp_dir, LinkMode::Directed).await;

        let first = repos.user.save(&user("marty")).await.expect("save");
        let second = repos
            .user
            .save(&user("doc").with_name("Emmett Brown"))
            .await
            .expect("save");

        assert_eq!(first.id, UserId::new(1));
        assert_eq!(first.name, "marty");
        assert_eq!(second.id, UserId::new(2));
        assert_eq!(second.name, "Emmett Brown");
        assert!(!repos.user.exists(UserId::new(-1)).await.expect("exists"));
    }

    #[tokio::test]
    async fn update_unknown_id_is_not_found() {
        let temp_dir = tempfile::tempdir().expect("tempdir");
        let repos = open_temp(&temp_dir, LinkMode::Directed).await;
        let err = repos
            .user
            .update(UserId::new(8), &user("biff"))
            .await
            .expect_err("missing user");
        assert!(err.is_not_found());
    }

    #[tokio::test]
    async fn mutual_mode_mirrors_links() {
        let temp_dir = tempfile::tempdir().expect("tempdir");
        let repos = open_temp(&temp_dir, LinkMode::Mutual).await;
        let ids = seed(&repos, 2).await;

        repos.user.add_friend(ids[0], ids[1]).await.expect("link");
        repos.user.add_friend(ids[1], ids[0]).await.expect("redundant link");
        let friends: Vec<UserId> = repos
            .user
            .friends_of(ids[1])
            .await
            .expect("friends")
            .into_iter()
            .map(|u| u.id)
            .collect();
        assert_eq!(friends, vec![ids[0]]);

        repos.user.remove_friend(ids[1], ids[0]).await.expect("unlink");
        assert!(repos.user.friends_of(ids[0]).await.expect("friends").is_empty());
    }

    #[tokio::test]
    async fn directed_mode_keeps_one_direction() {
        let temp_dir = tempfile::tempdir().expect("tempdir");
        let repos = open_temp(&temp_dir, LinkMode::Directed).await;
        let ids = seed(&repos, 2).await;

        repos.user.add_friend(ids[0], ids[1]).await.expect("link");
        let user = repos.user.get(ids[0]).await.expect("get").expect("user");
        assert_eq!(user.friends, [ids[1]].into_iter().collect());
        assert!(repos.user.friends_of(ids[1]).await.expect("friends").is_empty());
    }

    #[tokio::test]
    async fn mutual_friends_are_ordered_by_id() {
        let temp_dir = tempfile::tempdir().expect("tempdir");
        let repos = open_temp(&temp_dir, LinkMode::Directed).await;
        let ids = seed(&repos, 5).await;
        for friend in [ids[4], ids[2], ids[3]] {
            repos.user.add_friend(ids[0], friend).await.expect("link");
        }
        for friend in [ids[4], ids[3]] {
            repos.user.add_friend(ids[1], friend).await.expect("link");
        }

        let common: Vec<UserId> = repos
            .user
            .mutual_friends(ids[1], ids[0])
            .await
            .expect("mutual")
            .into_iter()
            .map(|u| u.id)
            .collect();
        assert_eq!(common, vec![ids[3], ids[4]]);
    }
}
