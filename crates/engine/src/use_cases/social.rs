//! Social graph use cases: user accounts and friendships.

use std::sync::Arc;

use filmhub_domain::common::or_fallback;
use filmhub_domain::{NewUser, User, UserDraft, UserId};

use super::validation::{check_user_fields, Violations};
use super::ServiceError;
use crate::infrastructure::ports::{ClockPort, UserRepo};

pub struct SocialGraph {
    users: Arc<dyn UserRepo>,
    clock: Arc<dyn ClockPort>,
}

impl SocialGraph {
    pub fn new(users: Arc<dyn UserRepo>, clock: Arc<dyn ClockPort>) -> Self {
        Self { users, clock }
    }

    pub async fn get_user(&self, id: UserId) -> Result<User, ServiceError> {
        self.users
            .get(id)
            .await?
            .ok_or_else(|| ServiceError::not_found("User", id))
    }

    pub async fn list_users(&self) -> Result<Vec<User>, ServiceError> {
        Ok(self.users.list_all().await?)
    }

    pub async fn create_user(&self, draft: UserDraft) -> Result<User, ServiceError> {
        let new_user = self.validate(draft)?;
        let user = self.users.save(&new_user).await?;
        tracing::info!(user_id = %user.id, login = %user.login, "Created user");
        Ok(user)
    }

    /// Replaces every field of an existing user.
    pub async fn update_user(&self, draft: UserDraft) -> Result<User, ServiceError> {
        let id = draft
            .id
            .ok_or_else(|| ServiceError::validation("Id must not be empty"))?;
        self.require_user(id).await?;

        let new_user = self.validate(draft)?;
        let user = self.users.update(id, &new_user).await?;
        tracing::info!(user_id = %id, "Updated user");
        Ok(user)
    }

    /// Makes `user_id` and `friend_id` friends of each other.
    pub async fn add_friend(&self, user_id: UserId, friend_id: UserId) -> Result<(), ServiceError> {
        self.require_pair(user_id, friend_id).await?;
        self.users.add_friend(user_id, friend_id).await?;
        self.users.add_friend(friend_id, user_id).await?;
        tracing::info!(user_id = %user_id, friend_id = %friend_id, "Friendship added");
        Ok(())
    }

    pub async fn remove_friend(
        &self,
        user_id: UserId,
        friend_id: UserId,
    ) -> Result<(), ServiceError> {
        self.require_pair(user_id, friend_id).await?;
        self.users.remove_friend(user_id, friend_id).await?;
        self.users.remove_friend(friend_id, user_id).await?;
        tracing::info!(user_id = %user_id, friend_id = %friend_id, "Friendship removed");
        Ok(())
    }

    pub async fn list_friends(&self, id: UserId) -> Result<Vec<User>, ServiceError> {
        self.require_user(id).await?;
        Ok(self.users.friends_of(id).await?)
    }

    pub async fn list_mutual_friends(
        &self,
        id: UserId,
        other_id: UserId,
    ) -> Result<Vec<User>, ServiceError> {
        self.require_user(id).await?;
        self.require_user(other_id).await?;
        Ok(self.users.mutual_friends(id, other_id).await?)
    }

    async fn require_user(&self, id: UserId) -> Result<(), ServiceError> {
        if !self.users.exists(id).await? {
            return Err(ServiceError::not_found("User", id));
        }
        Ok(())
    }

    async fn require_pair(&self, user_id: UserId, friend_id: UserId) -> Result<(), ServiceError> {
        self.require_user(user_id).await?;
        self.require_user(friend_id).await?;
        if user_id == friend_id {
            return Err(ServiceError::validation("A user cannot befriend themselves"));
        }
        Ok(())
    }

    fn validate(&self, draft: UserDraft) -> Result<NewUser, ServiceError> {
        let mut violations = Violations::new();
        let birthday = check_user_fields(&draft, self.clock.today(), &mut violations);
        violations.finish()?;

        let birthday =
            birthday.ok_or_else(|| ServiceError::validation("Birthday is required"))?;
        let name = or_fallback(draft.name.as_deref(), &draft.login);
        Ok(NewUser::new(draft.email, draft.login, birthday).with_name(name))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::infrastructure::clock::FixedClock;
    use crate::infrastructure::ports::{MockUserRepo, RepoError};
    use chrono::NaiveDate;
    use mockall::predicate::eq;
    use mockall::Sequence;

    fn clock() -> Arc<dyn ClockPort> {
        Arc::new(FixedClock::on(
            NaiveDate::from_ymd_opt(2024, 6, 1).expect("valid date"),
        ))
    }

    fn draft(login: &str) -> UserDraft {
        UserDraft {
            email: format!("{login}@example.com"),
            login: login.to_string(),
            birthday: NaiveDate::from_ymd_opt(1990, 5, 5),
            ..UserDraft::default()
        }
    }

    fn stored(id: i64, user: &NewUser) -> User {
        User {
            id: UserId::new(id),
            email: user.email.clone(),
            login: user.login.clone(),
            name: user.display_name(),
            birthday: user.birthday,
            friends: Default::default(),
            liked_films: Default::default(),
        }
    }

    #[tokio::test]
    async fn create_user_defaults_name_to_login() {
        let mut users = MockUserRepo::new();
        users
            .expect_save()
            .withf(|user| user.name.as_deref() == Some("trinity"))
            .times(1)
            .returning(|user| Ok(stored(1, user)));

        let social = SocialGraph::new(Arc::new(users), clock());
        let user = social.create_user(draft("trinity")).await.expect("create");
        assert_eq!(user.name, "trinity");
    }

    #[tokio::test]
    async fn create_user_rejects_future_birthday_without_saving() {
        let mut users = MockUserRepo::new();
        users.expect_save().never();

        let mut future = draft("oracle");
        future.birthday = NaiveDate::from_ymd_opt(2030, 1, 1);
        let social = SocialGraph::new(Arc::new(users), clock());
        let err = social.create_user(future).await.expect_err("future birthday");
        assert!(err.is_validation());
    }

    #[tokio::test]
    async fn update_without_id_is_validation_error() {
        let mut users = MockUserRepo::new();
        users.expect_exists().never();
        users.expect_update().never();

        let social = SocialGraph::new(Arc::new(users), clock());
        let err = social.update_user(draft("cypher")).await.expect_err("no id");
        assert!(err.is_validation());
        assert_eq!(err.to_string(), "Id must not be empty");
    }

    #[tokio::test]
    async fn update_unknown_id_fails_before_validation() {
        let mut users = MockUserRepo::new();
        users
            .expect_exists()
            .with(eq(UserId::new(9)))
            .returning(|_| Ok(false));
        users.expect_update().never();

        let mut invalid = draft("x");
        invalid.id = Some(UserId::new(9));
        let social = SocialGraph::new(Arc::new(users), clock());
        let err = social.update_user(invalid).await.expect_err("unknown id");
        assert_eq!(err.to_string(), "User not found with id = 9");
    }

    #[tokio::test]
    async fn add_friend_stores_both_directions_in_order() {
        let mut seq = Sequence::new();
        let mut users = MockUserRepo::new();
        users.expect_exists().returning(|_| Ok(true));
        users
            .expect_add_friend()
            .with(eq(UserId::new(1)), eq(UserId::new(2)))
            .times(1)
            .in_sequence(&mut seq)
            .returning(|_, _| Ok(()));
        users
            .expect_add_friend()
            .with(eq(UserId::new(2)), eq(UserId::new(1)))
            .times(1)
            .in_sequence(&mut seq)
            .returning(|_, _| Ok(()));

        let social = SocialGraph::new(Arc::new(users), clock());
        social
            .add_friend(UserId::new(1), UserId::new(2))
            .await
            .expect("add friend");
    }

    #[tokio::test]
    async fn add_friend_reports_first_missing_id() {
        let mut users = MockUserRepo::new();
        users.expect_exists().returning(|_| Ok(false));
        users.expect_add_friend().never();

        let social = SocialGraph::new(Arc::new(users), clock());
        let err = social
            .add_friend(UserId::new(3), UserId::new(4))
            .await
            .expect_err("both missing");
        assert_eq!(err.to_string(), "User not found with id = 3");
    }

    #[tokio::test]
    async fn self_friendship_is_rejected() {
        let mut users = MockUserRepo::new();
        users.expect_exists().returning(|_| Ok(true));
        users.expect_add_friend().never();

        let social = SocialGraph::new(Arc::new(users), clock());
        let err = social
            .add_friend(UserId::new(5), UserId::new(5))
            .await
            .expect_err("self friend");
        assert!(err.is_validation());
    }

    #[tokio::test]
    async fn mutual_friends_checks_second_id() {
        let mut users = MockUserRepo::new();
        users
            .expect_exists()
            .returning(|id| Ok(id == UserId::new(1)));
        users.expect_mutual_friends().never();

        let social = SocialGraph::new(Arc::new(users), clock());
        let err = social
            .list_mutual_friends(UserId::new(1), UserId::new(2))
            .await
            .expect_err("second missing");
        assert_eq!(err.to_string(), "User not found with id = 2");
    }

    #[tokio::test]
    async fn storage_faults_propagate() {
        let mut users = MockUserRepo::new();
        users
            .expect_exists()
            .returning(|_| Err(RepoError::database("users.exists", "disk full")));

        let social = SocialGraph::new(Arc::new(users), clock());
        let err = social
            .list_friends(UserId::new(1))
            .await
            .expect_err("fault");
        assert!(matches!(err, ServiceError::Repo(_)));
    }
}
