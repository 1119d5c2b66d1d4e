//! In-memory user repository.

use async_trait::async_trait;
use filmhub_domain::{NewUser, User, UserId};

use super::{SharedState, UserRecord};
use crate::infrastructure::ports::{RepoError, UserRepo};

pub struct MemoryUserRepo {
    state: SharedState,
}

impl MemoryUserRepo {
    pub(super) fn new(state: SharedState) -> Self {
        Self { state }
    }
}

impl From<&NewUser> for UserRecord {
    fn from(user: &NewUser) -> Self {
        Self {
            email: user.email.clone(),
            login: user.login.clone(),
            name: user.display_name(),
            birthday: user.birthday,
        }
    }
}

#[async_trait]
impl UserRepo for MemoryUserRepo {
    async fn exists(&self, id: UserId) -> Result<bool, RepoError> {
        Ok(self.state.read().await.users.contains(id))
    }

    async fn get(&self, id: UserId) -> Result<Option<User>, RepoError> {
        Ok(self.state.read().await.user(id))
    }

    async fn list_all(&self) -> Result<Vec<User>, RepoError> {
        let state = self.state.read().await;
        Ok(state
            .users
            .iter()
            .map(|(id, record)| state.assemble_user(id, record))
            .collect())
    }

    async fn save(&self, user: &NewUser) -> Result<User, RepoError> {
        let mut state = self.state.write().await;
        let record = UserRecord::from(user);
        let id = state.users.insert(record.clone());
        tracing::debug!(user_id = %id, login = %record.login, "User created");
        Ok(state.assemble_user(id, &record))
    }

    async fn update(&self, id: UserId, user: &NewUser) -> Result<User, RepoError> {
        let mut state = self.state.write().await;
        let record = UserRecord::from(user);
        if !state.users.replace(id, record.clone()) {
            return Err(RepoError::not_found("User", id));
        }
        tracing::debug!(user_id = %id, "User updated");
        Ok(state.assemble_user(id, &record))
    }

    async fn add_friend(&self, user_id: UserId, friend_id: UserId) -> Result<(), RepoError> {
        self.state.write().await.friends.link(user_id, friend_id);
        tracing::debug!(user_id = %user_id, friend_id = %friend_id, "Friend added");
        Ok(())
    }

    async fn remove_friend(&self, user_id: UserId, friend_id: UserId) -> Result<(), RepoError> {
        self.state.write().await.friends.unlink(user_id, friend_id);
        tracing::debug!(user_id = %user_id, friend_id = %friend_id, "Friend removed");
        Ok(())
    }

    async fn friends_of(&self, id: UserId) -> Result<Vec<User>, RepoError> {
        let state = self.state.read().await;
        Ok(state.users_by_ids(state.friends.targets(id)))
    }

    async fn mutual_friends(&self, id: UserId, other_id: UserId) -> Result<Vec<User>, RepoError> {
        let state = self.state.read().await;
        Ok(state.users_by_ids(state.friends.common_targets(id, other_id)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::infrastructure::memory::MemoryRepositories;
    use crate::infrastructure::ports::LinkMode;
    use chrono::NaiveDate;

    fn user(login: &str) -> NewUser {
        NewUser::new(
            format!("{login}@example.com"),
            login,
            NaiveDate::from_ymd_opt(1991, 8, 24).expect("valid date"),
        )
    }

    async fn seed(repos: &MemoryRepositories, count: usize) -> Vec<UserId> {
        let mut ids = Vec::new();
        for n in 0..count {
            let saved = repos
                .user
                .save(&user(&format!("user{n}")))
                .await
                .expect("save");
            ids.push(saved.id);
        }
        ids
    }

    #[tokio::test]
    async fn save_defaults_name_to_login() {
        let repos = MemoryRepositories::default();
        let saved = repos.user.save(&user("morpheus")).await.expect("save");
        assert_eq!(saved.id, UserId::new(1));
        assert_eq!(saved.name, "morpheus");
    }

    #[tokio::test]
    async fn update_reapplies_name_fallback() {
        let repos = MemoryRepositories::default();
        let saved = repos
            .user
            .save(&user("smith").with_name("Agent Smith"))
            .await
            .expect("save");

        let updated = repos
            .user
            .update(saved.id, &user("smith2").with_name(""))
            .await
            .expect("update");
        assert_eq!(updated.login, "smith2");
        assert_eq!(updated.name, "smith2");
    }

    #[tokio::test]
    async fn update_unknown_id_is_not_found() {
        let repos = MemoryRepositories::default();
        let err = repos
            .user
            .update(UserId::new(3), &user("ghost"))
            .await
            .expect_err("missing user");
        assert!(err.is_not_found());
    }

    #[tokio::test]
    async fn directed_mode_stores_one_direction_per_call() {
        let repos = MemoryRepositories::new(LinkMode::Directed);
        let ids = seed(&repos, 2).await;

        repos.user.add_friend(ids[0], ids[1]).await.expect("link");
        let first = repos.user.friends_of(ids[0]).await.expect("friends");
        let second = repos.user.friends_of(ids[1]).await.expect("friends");
        assert_eq!(first.len(), 1);
        assert!(second.is_empty());
    }

    #[tokio::test]
    async fn mutual_mode_stores_both_directions_per_call() {
        let repos = MemoryRepositories::new(LinkMode::Mutual);
        let ids = seed(&repos, 2).await;

        repos.user.add_friend(ids[0], ids[1]).await.expect("link");
        repos.user.add_friend(ids[1], ids[0]).await.expect("redundant link");
        let fetched = repos.user.get(ids[1]).await.expect("get").expect("user");
        assert_eq!(fetched.friends, [ids[0]].into_iter().collect());

        repos.user.remove_friend(ids[0], ids[1]).await.expect("unlink");
        assert!(repos.user.friends_of(ids[1]).await.expect("friends").is_empty());
    }

    #[tokio::test]
    async fn mutual_friends_resolves_intersection() {
        let repos = MemoryRepositories::default();
        let ids = seed(&repos, 5).await;
        for friend in [ids[2], ids[3], ids[4]] {
            repos.user.add_friend(ids[0], friend).await.expect("link");
        }
        for friend in [ids[3], ids[4]] {
            repos.user.add_friend(ids[1], friend).await.expect("link");
        }

        let common: Vec<UserId> = repos
            .user
            .mutual_friends(ids[0], ids[1])
            .await
            .expect("mutual")
            .into_iter()
            .map(|u| u.id)
            .collect();
        assert_eq!(common, vec![ids[3], ids[4]]);
    }
}
