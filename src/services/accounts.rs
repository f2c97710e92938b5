use serde::Serialize;
use std::sync::Arc;
use tracing::info;
use uuid::Uuid;

use crate::approval::ensure_can_login;
use crate::auth::{password, TokenService};
use crate::config::SuperAdminSeed;
use crate::error::{AppError, AppResult};
use crate::models::user::{NewUser, ProfileChanges};
use crate::models::{Role, User};
use crate::store::Store;

#[derive(Debug, Clone)]
pub struct Registration {
    pub name: String,
    pub email: String,
    pub password: String,
    pub role: Option<Role>,
}

#[derive(Debug, Clone, Default)]
pub struct ProfileUpdate {
    pub name: Option<String>,
    pub email: Option<String>,
    pub password: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct LoginResponse {
    pub token: String,
    pub user: User,
}

#[derive(Clone)]
pub struct AccountService {
    store: Arc<dyn Store>,
    tokens: TokenService,
    bcrypt_cost: u32,
}

impl AccountService {
    pub fn new(store: Arc<dyn Store>, tokens: TokenService, bcrypt_cost: u32) -> Self {
        Self {
            store,
            tokens,
            bcrypt_cost,
        }
    }

    /// Admin registrations start pending; every other role is active at once.
    pub async fn register(&self, registration: Registration) -> AppResult<User> {
        let role = registration.role.unwrap_or(Role::User);
        if role == Role::SuperAdmin {
            return Err(AppError::forbidden("Super admin accounts cannot be registered"));
        }

        let email = normalize_email(&registration.email);
        if self.store.find_user_by_email(&email).await?.is_some() {
            return Err(AppError::conflict("Email is already registered"));
        }

        let password_hash = password::hash(registration.password, self.bcrypt_cost).await?;
        let user = self
            .store
            .insert_user(NewUser {
                name: registration.name.trim().to_string(),
                email,
                password_hash,
                role,
            })
            .await?;

        info!(user_id = %user.id, role = %user.role, status = ?user.status, "account registered");
        Ok(user)
    }

    pub async fn login(&self, email: &str, plain_password: String) -> AppResult<LoginResponse> {
        let invalid = || AppError::unauthorized("Invalid credentials");

        let user = self
            .store
            .find_user_by_email(&normalize_email(email))
            .await?
            .ok_or_else(invalid)?;

        if !password::verify(plain_password, user.password_hash.clone()).await? {
            return Err(invalid());
        }

        ensure_can_login(&user)?;

        let token = self.tokens.issue(user.id, user.role)?;
        info!(user_id = %user.id, "login succeeded");
        Ok(LoginResponse { token, user })
    }

    pub async fn profile(&self, user_id: Uuid) -> AppResult<User> {
        self.store
            .find_user(user_id)
            .await?
            .ok_or(AppError::NotFound("User"))
    }

    pub async fn update_profile(&self, user_id: Uuid, update: ProfileUpdate) -> AppResult<User> {
        let email = update.email.as_deref().map(normalize_email);
        if let Some(email) = &email {
            if let Some(existing) = self.store.find_user_by_email(email).await? {
                if existing.id != user_id {
                    return Err(AppError::conflict("Email is already registered"));
                }
            }
        }

        let password_hash = match update.password {
            Some(plain) => Some(password::hash(plain, self.bcrypt_cost).await?),
            None => None,
        };

        let changes = ProfileChanges {
            name: update.name.map(|n| n.trim().to_string()),
            email,
            password_hash,
        };

        self.store
            .update_profile(user_id, changes)
            .await?
            .ok_or(AppError::NotFound("User"))
    }

    pub async fn delete_user(&self, user_id: Uuid) -> AppResult<()> {
        if !self.store.delete_user(user_id).await? {
            return Err(AppError::NotFound("User"));
        }
        info!(user_id = %user_id, "user deleted");
        Ok(())
    }

    pub async fn list_users(&self) -> AppResult<Vec<User>> {
        self.store.list_users().await
    }

    /// Creates the configured super admin unless that email already exists.
    pub async fn seed_super_admin(&self, seed: &SuperAdminSeed) -> AppResult<Option<User>> {
        let email = normalize_email(&seed.email);
        if self.store.find_user_by_email(&email).await?.is_some() {
            return Ok(None);
        }

        let password_hash = password::hash(seed.password.clone(), self.bcrypt_cost).await?;
        let user = self
            .store
            .insert_user(NewUser {
                name: seed.name.clone(),
                email,
                password_hash,
                role: Role::SuperAdmin,
            })
            .await?;

        info!(user_id = %user.id, "super admin seeded");
        Ok(Some(user))
    }
}

fn normalize_email(email: &str) -> String {
    email.trim().to_lowercase()
}
