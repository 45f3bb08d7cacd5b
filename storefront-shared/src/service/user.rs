/// User use cases

use super::{ServiceError, ServiceResult};
use crate::auth::password;
use crate::dto::{CreateUser, UpdateUser};
use crate::models::user::DEFAULT_ROLE;
use crate::models::{NewUser, Pagination, User, UserChanges};
use crate::repository::{RepoError, UserRepository};
use std::sync::Arc;
use tracing::{debug, info};

const EMAIL_EXISTS: &str = "email already exists";
const EMAIL_IN_USE: &str = "email already in use";

/// One page of users with the total row count
#[derive(Debug, Clone)]
pub struct UserPage {
    pub users: Vec<User>,
    pub total: i64,
    pub pagination: Pagination,
}

#[derive(Clone)]
pub struct UserService {
    repo: Arc<dyn UserRepository>,
}

impl UserService {
    pub fn new(repo: Arc<dyn UserRepository>) -> Self {
        Self { repo }
    }

    /// Registers a user after checking the email is free
    ///
    /// The check and the insert are not atomic. When two requests race, the
    /// unique index rejects the loser and it gets the same `Conflict`.
    pub async fn create(&self, input: CreateUser) -> ServiceResult<User> {
        match self.repo.get_by_email(&input.email).await {
            Ok(_) => return Err(ServiceError::conflict(EMAIL_EXISTS)),
            Err(RepoError::NotFound) => {}
            Err(e) => return Err(ServiceError::internal("error checking existing user", e)),
        }

        // Argon2 is CPU-bound; keep it off the async workers
        let plaintext = input.password;
        let password_hash = tokio::task::spawn_blocking(move || password::hash_password(&plaintext))
            .await
            .map_err(|e| ServiceError::internal("error hashing password", e))?
            .map_err(|e| ServiceError::internal("error hashing password", e))?;

        let user = self
            .repo
            .create(NewUser {
                email: input.email,
                password_hash,
                first_name: input.first_name,
                last_name: input.last_name,
                role: DEFAULT_ROLE.to_string(),
            })
            .await
            .map_err(|e| match e {
                RepoError::Conflict => ServiceError::conflict(EMAIL_EXISTS),
                other => ServiceError::internal("error creating user", other),
            })?;

        info!(user_id = user.id, "User created");
        Ok(user)
    }

    pub async fn get_by_id(&self, id: i64) -> ServiceResult<User> {
        self.repo.get_by_id(id).await.map_err(lookup_error)
    }

    pub async fn get_by_email(&self, email: &str) -> ServiceResult<User> {
        self.repo.get_by_email(email).await.map_err(lookup_error)
    }

    /// Applies a selective update
    ///
    /// Empty fields leave the stored value alone. A changed email is checked
    /// for uniqueness against every other user first.
    pub async fn update(&self, id: i64, input: UpdateUser) -> ServiceResult<User> {
        let user = self.repo.get_by_id(id).await.map_err(lookup_error)?;

        let mut changes = UserChanges {
            email: user.email.clone(),
            first_name: user.first_name,
            last_name: user.last_name,
        };

        if !input.email.is_empty() && input.email != user.email {
            match self.repo.get_by_email(&input.email).await {
                Ok(existing) if existing.id != id => {
                    return Err(ServiceError::conflict(EMAIL_IN_USE));
                }
                Ok(_) | Err(RepoError::NotFound) => {}
                Err(e) => return Err(ServiceError::internal("error checking existing email", e)),
            }
            changes.email = input.email;
        }

        if !input.first_name.is_empty() {
            changes.first_name = input.first_name;
        }
        if !input.last_name.is_empty() {
            changes.last_name = input.last_name;
        }

        let updated = self.repo.update(id, changes).await.map_err(|e| match e {
            RepoError::NotFound => ServiceError::not_found("user not found"),
            RepoError::Conflict => ServiceError::conflict(EMAIL_IN_USE),
            other => ServiceError::internal("error updating user", other),
        })?;

        debug!(user_id = id, "User updated");
        Ok(updated)
    }

    pub async fn delete(&self, id: i64) -> ServiceResult<()> {
        self.repo.delete(id).await.map_err(|e| match e {
            RepoError::NotFound => ServiceError::not_found("user not found"),
            other => ServiceError::internal("error deleting user", other),
        })?;

        info!(user_id = id, "User deleted");
        Ok(())
    }

    /// Lists one page of users plus the overall count
    pub async fn list(&self, page: i64, per_page: i64) -> ServiceResult<UserPage> {
        let pagination = Pagination::new(page, per_page);

        let users = self
            .repo
            .list(pagination.offset(), pagination.limit())
            .await
            .map_err(|e| ServiceError::internal("error retrieving users", e))?;

        let total = self
            .repo
            .count()
            .await
            .map_err(|e| ServiceError::internal("error counting users", e))?;

        Ok(UserPage {
            users,
            total,
            pagination,
        })
    }
}

fn lookup_error(err: RepoError) -> ServiceError {
    match err {
        RepoError::NotFound => ServiceError::not_found("user not found"),
        other => ServiceError::internal("error retrieving user", other),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{NewUser, User, UserChanges};
    use crate::repository::memory::MemoryUserRepository;
    use crate::repository::RepoResult;
    use crate::service::ErrorKind;
    use async_trait::async_trait;

    fn service() -> (UserService, Arc<MemoryUserRepository>) {
        let repo = Arc::new(MemoryUserRepository::default());
        (UserService::new(repo.clone()), repo)
    }

    fn create_input(email: &str) -> CreateUser {
        CreateUser {
            email: email.to_string(),
            password: "password123".to_string(),
            first_name: "Ada".to_string(),
            last_name: "Lovelace".to_string(),
        }
    }

    #[tokio::test]
    async fn test_create_hashes_password_and_sets_default_role() {
        let (service, repo) = service();

        let user = service.create(create_input("ada@example.com")).await.unwrap();

        let stored = repo.get_by_id(user.id).await.unwrap();
        assert_ne!(stored.password_hash, "password123");
        assert!(stored.password_hash.starts_with("$argon2id$"));
        assert!(stored.check_password("password123").unwrap());
        assert_eq!(stored.role, "user");

        let json = serde_json::to_value(&user).unwrap();
        assert!(json.get("password_hash").is_none());
    }

    #[tokio::test]
    async fn test_create_duplicate_email_is_conflict() {
        let (service, _) = service();

        service.create(create_input("dup@example.com")).await.unwrap();
        let err = service.create(create_input("dup@example.com")).await.unwrap_err();

        assert_eq!(err.kind(), ErrorKind::Conflict);
        assert_eq!(err.public_message(), "email already exists");
    }

    /// Simulates losing the check-then-insert race: the lookup sees nothing but
    /// the insert hits the unique constraint.
    struct RacingRepository;

    #[async_trait]
    impl UserRepository for RacingRepository {
        async fn create(&self, _user: NewUser) -> RepoResult<User> {
            Err(RepoError::Conflict)
        }
        async fn get_by_id(&self, _id: i64) -> RepoResult<User> {
            Err(RepoError::NotFound)
        }
        async fn get_by_email(&self, _email: &str) -> RepoResult<User> {
            Err(RepoError::NotFound)
        }
        async fn update(&self, _id: i64, _changes: UserChanges) -> RepoResult<User> {
            Err(RepoError::NotFound)
        }
        async fn delete(&self, _id: i64) -> RepoResult<()> {
            Err(RepoError::NotFound)
        }
        async fn list(&self, _offset: i64, _limit: i64) -> RepoResult<Vec<User>> {
            Ok(Vec::new())
        }
        async fn count(&self) -> RepoResult<i64> {
            Ok(0)
        }
    }

    #[tokio::test]
    async fn test_create_losing_race_is_conflict() {
        let service = UserService::new(Arc::new(RacingRepository));

        let err = service.create(create_input("race@example.com")).await.unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Conflict);
    }

    #[tokio::test]
    async fn test_concurrent_creates_with_same_email() {
        let (service, repo) = service();

        let (first, second) = tokio::join!(
            service.create(create_input("same@example.com")),
            service.create(create_input("same@example.com")),
        );

        let outcomes = [first, second];
        assert_eq!(outcomes.iter().filter(|r| r.is_ok()).count(), 1);
        let loser = outcomes.into_iter().find_map(Result::err).unwrap();
        assert_eq!(loser.kind(), ErrorKind::Conflict);
        assert_eq!(repo.count().await.unwrap(), 1);
    }

    #[tokio::test]
    async fn test_update_with_empty_fields_leaves_values_unchanged() {
        let (service, _) = service();
        let user = service.create(create_input("keep@example.com")).await.unwrap();

        let updated = service.update(user.id, UpdateUser::default()).await.unwrap();

        assert_eq!(updated.email, "keep@example.com");
        assert_eq!(updated.first_name, "Ada");
        assert_eq!(updated.last_name, "Lovelace");
    }

    #[tokio::test]
    async fn test_update_overwrites_non_empty_fields() {
        let (service, _) = service();
        let user = service.create(create_input("old@example.com")).await.unwrap();

        let updated = service
            .update(
                user.id,
                UpdateUser {
                    email: "new@example.com".to_string(),
                    first_name: "Grace".to_string(),
                    last_name: String::new(),
                },
            )
            .await
            .unwrap();

        assert_eq!(updated.email, "new@example.com");
        assert_eq!(updated.first_name, "Grace");
        assert_eq!(updated.last_name, "Lovelace");
    }

    #[tokio::test]
    async fn test_update_to_taken_email_is_conflict() {
        let (service, _) = service();
        service.create(create_input("taken@example.com")).await.unwrap();
        let user = service.create(create_input("mine@example.com")).await.unwrap();

        let err = service
            .update(
                user.id,
                UpdateUser {
                    email: "taken@example.com".to_string(),
                    ..Default::default()
                },
            )
            .await
            .unwrap_err();

        assert_eq!(err.kind(), ErrorKind::Conflict);
        assert_eq!(err.public_message(), "email already in use");
    }

    #[tokio::test]
    async fn test_update_missing_user_is_not_found() {
        let (service, _) = service();

        let err = service.update(42, UpdateUser::default()).await.unwrap_err();
        assert_eq!(err.kind(), ErrorKind::NotFound);
    }

    #[tokio::test]
    async fn test_delete_twice_is_not_found() {
        let (service, _) = service();
        let user = service.create(create_input("gone@example.com")).await.unwrap();

        service.delete(user.id).await.unwrap();
        let err = service.delete(user.id).await.unwrap_err();
        assert_eq!(err.kind(), ErrorKind::NotFound);

        let err = service.get_by_id(user.id).await.unwrap_err();
        assert_eq!(err.kind(), ErrorKind::NotFound);
    }

    #[tokio::test]
    async fn test_list_normalizes_page_arguments() {
        let (service, _) = service();
        for i in 0..12 {
            service
                .create(create_input(&format!("user{}@example.com", i)))
                .await
                .unwrap();
        }

        let normalized = service.list(0, -5).await.unwrap();
        let explicit = service.list(1, 10).await.unwrap();

        assert_eq!(normalized.pagination, explicit.pagination);
        assert_eq!(normalized.users.len(), 10);
        assert_eq!(normalized.total, 12);
        let ids = |page: &UserPage| page.users.iter().map(|u| u.id).collect::<Vec<_>>();
        assert_eq!(ids(&normalized), ids(&explicit));

        let second = service.list(2, 10).await.unwrap();
        assert_eq!(second.users.len(), 2);
        assert_eq!(second.pagination.total_pages(second.total), 2);
    }

    #[tokio::test]
    async fn test_get_by_email() {
        let (service, _) = service();
        let user = service.create(create_input("find@example.com")).await.unwrap();

        assert_eq!(service.get_by_email("find@example.com").await.unwrap().id, user.id);
        assert_eq!(
            service.get_by_email("nobody@example.com").await.unwrap_err().kind(),
            ErrorKind::NotFound
        );
    }
}
