use serde_json::json;
use sqlx::PgPool;
use tracing::info;

use crate::auth::{hash_password, verify_password};
use crate::config::SecurityConfig;
use crate::database::models::{User, UserCreate};
use crate::database::{DatabaseError, Repository};
use crate::filter::FilterData;

use super::{Page, ServiceError, ServiceResult};

pub struct UserService {
    pool: PgPool,
    users: Repository<User>,
}

impl UserService {
    pub fn new(pool: PgPool) -> Self {
        Self { users: Repository::new("users", pool.clone()), pool }
    }

    pub async fn list(&self, page: Page) -> ServiceResult<Vec<User>> {
        let filter = FilterData::default().order_by("id asc").page(page.skip, page.limit);
        Ok(self.users.select_any(filter).await?)
    }

    pub async fn get(&self, id: i64) -> ServiceResult<Option<User>> {
        Ok(self.users.select_one(FilterData::with_where(json!({ "id": id }))).await?)
    }

    pub async fn find_by_email(&self, email: &str) -> ServiceResult<Option<User>> {
        Ok(self.users.select_one(FilterData::with_where(json!({ "email": email }))).await?)
    }

    pub async fn create(&self, input: UserCreate) -> ServiceResult<User> {
        input.validate()?;
        if self.find_by_email(&input.email).await?.is_some() {
            return Err(ServiceError::BadRequest(
                "The user with this username already exists in the system.".to_string(),
            ));
        }
        let hashed = hash_password(&input.password)?;

        let user = sqlx::query_as::<_, User>(
            "INSERT INTO users (email, hashed_password, full_name, is_superuser)
             VALUES ($1, $2, $3, $4)
             RETURNING *",
        )
        .bind(&input.email)
        .bind(&hashed)
        .bind(&input.full_name)
        .bind(input.is_superuser)
        .fetch_one(&self.pool)
        .await
        .map_err(DatabaseError::from)?;

        info!("Created user {} ({})", user.id, user.email);
        Ok(user)
    }

    /// The user whose email and password match, if any. Inactive users are
    /// returned too; the caller decides what to do with them.
    pub async fn authenticate(&self, email: &str, password: &str) -> ServiceResult<Option<User>> {
        let Some(user) = self.find_by_email(email).await? else {
            return Ok(None);
        };
        if !verify_password(password, &user.hashed_password) {
            return Ok(None);
        }
        Ok(Some(user))
    }

    /// Create the configured first superuser unless that email already exists.
    pub async fn ensure_first_superuser(&self, security: &SecurityConfig) -> ServiceResult<bool> {
        if self.find_by_email(&security.first_superuser_email).await?.is_some() {
            return Ok(false);
        }
        self.create(UserCreate {
            email: security.first_superuser_email.clone(),
            password: security.first_superuser_password.clone(),
            full_name: None,
            is_superuser: true,
        })
        .await?;
        Ok(true)
    }
}
