use validator::Validate;

use crate::entities::token::LoginResponse;
use crate::entities::user::{LoginUser, NewUser, User, UserResponse};
use crate::errors::{AppError, AuthError};
use crate::interfaces::repositories::user::UserRepository;
use crate::auth::password::{hash_password, verify_password};
use crate::repositories::token::TokenServiceRepository;

pub struct AuthHandler<R, T>
where
    R: UserRepository,
    T: TokenServiceRepository,
{
    pub user_repo: R,
    pub token_service: T,
}

impl<R, T> AuthHandler<R, T>
where
    R: UserRepository,
    T: TokenServiceRepository,
{
    pub fn new(user_repo: R, token_service: T) -> Self {
        AuthHandler {
            user_repo,
            token_service
        }
    }

    /// Registers a new user after validation and password hashing
    pub async fn register(&self, request: NewUser) -> Result<UserResponse, AppError> {
        let request = request.normalized();
        request.validate()?;

        let hashed_password = hash_password(&request.password)?;
        let user_insert = request.prepare_for_insert(hashed_password);

        let user = self.user_repo.create_user(&user_insert).await?;

        tracing::info!(user_id = %user.id, username = %user.username, "User registered");
        Ok(UserResponse::from(user))
    }

    /// Logs in a user by checking the password hash and issuing a JWT
    pub async fn login(&self, request: LoginUser) -> Result<LoginResponse, AuthError> {
        let request = request.normalized();
        request.validate().map_err(|_| AuthError::WrongCredentials)?;

        let user = self.user_repo.get_user_by_username(&request.username)
            .await
            .map_err(|e| {
                tracing::error!("User lookup failed during login: {}", e);
                AuthError::WrongCredentials
            })?
            .ok_or(AuthError::WrongCredentials)?;

        let is_password_valid = verify_password(&request.password, &user.password_hash)
            .map_err(|e| {
                tracing::warn!("Stored password hash unusable for {}: {}", user.username, e);
                AuthError::WrongCredentials
            })?;
        if !is_password_valid {
            return Err(AuthError::WrongCredentials);
        }

        let response = self.create_login_response(&user)?;

        tracing::info!(username = %user.username, "User logged in successfully");
        Ok(response)
    }

    pub fn create_login_response(&self, user: &User) -> Result<LoginResponse, AuthError> {
        let token = self.token_service.create_jwt(user)
            .map_err(|e| {
                tracing::warn!("Failed to create JWT: {}", e);
                AuthError::TokenCreation
            })?;

        Ok(LoginResponse {
            token,
            username: user.username.clone(),
            name: user.name.clone(),
        })
    }
}
