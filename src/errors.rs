use actix_web::{
    error::ResponseError,
    http::{header::ContentType, StatusCode},
    HttpResponse,
};
use derive_more::Display;
use jsonwebtoken::errors::{Error as JwtError, ErrorKind};
use serde::Serialize;
use serde_json::{json, Value};
use validator::ValidationErrors;

/// Failures surfaced by the use cases. Every variant renders as a JSON body
/// with an `error` key.
#[derive(Debug, Display)]
pub enum AppError {
    #[display("validation error: {}", join_fields(_0))]
    ValidationError(Vec<FieldError>),

    #[display("{_0}")]
    InvalidInput(String),

    #[display("{_0}")]
    NotFound(String),

    #[display("{_0}")]
    Conflict(String),

    #[display("{_0}")]
    Unauthorized(String),

    #[display("only the creator of a blog can delete it")]
    ForbiddenAccess,

    #[display("Internal server error: {_0}")]
    InternalError(String),
}

fn join_fields(errors: &[FieldError]) -> String {
    errors
        .iter()
        .map(|e| format!("{}: {}", e.field, e.message))
        .collect::<Vec<_>>()
        .join(", ")
}

fn json_error(status: StatusCode, body: Value) -> HttpResponse {
    HttpResponse::build(status)
        .insert_header(ContentType::json())
        .json(body)
}

impl ResponseError for AppError {
    fn status_code(&self) -> StatusCode {
        match self {
            AppError::ValidationError(_) | AppError::InvalidInput(_) => StatusCode::BAD_REQUEST,
            AppError::Unauthorized(_) => StatusCode::UNAUTHORIZED,
            AppError::ForbiddenAccess => StatusCode::FORBIDDEN,
            AppError::NotFound(_) => StatusCode::NOT_FOUND,
            AppError::Conflict(_) => StatusCode::CONFLICT,
            AppError::InternalError(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    fn error_response(&self) -> HttpResponse {
        let body = match self {
            AppError::ValidationError(details) => json!({
                "error": "Validation failed",
                "details": details,
            }),
            AppError::InternalError(cause) => {
                tracing::error!("Request failed: {}", cause);
                json!({ "error": self.to_string() })
            }
            _ => json!({ "error": self.to_string() }),
        };
        json_error(self.status_code(), body)
    }
}

impl From<ValidationErrors> for AppError {
    fn from(errors: ValidationErrors) -> Self {
        let mut details: Vec<FieldError> = errors
            .field_errors()
            .into_iter()
            .flat_map(|(field, failures)| {
                failures.iter().map(move |failure| FieldError {
                    field: field.to_string(),
                    message: failure
                        .message
                        .as_ref()
                        .map(|m| m.to_string())
                        .unwrap_or_else(|| format!("invalid {}", field)),
                })
            })
            .collect();

        // field_errors() is backed by a HashMap
        details.sort_by(|a, b| a.field.cmp(&b.field));

        AppError::ValidationError(details)
    }
}

impl From<sqlx::Error> for AppError {
    fn from(err: sqlx::Error) -> Self {
        match &err {
            sqlx::Error::Database(db) if db.is_unique_violation() => {
                AppError::Conflict("duplicate record".into())
            }
            sqlx::Error::Database(db) if db.is_check_violation() => {
                AppError::InvalidInput(format!(
                    "value violates constraint {}",
                    db.constraint().unwrap_or("check")
                ))
            }
            sqlx::Error::Database(db) if db.is_foreign_key_violation() => {
                AppError::NotFound("referenced record does not exist".into())
            }
            sqlx::Error::RowNotFound => AppError::NotFound("record not found".into()),
            _ => AppError::InternalError(format!("database error: {}", err)),
        }
    }
}

impl From<sqlx::migrate::MigrateError> for AppError {
    fn from(err: sqlx::migrate::MigrateError) -> Self {
        AppError::InternalError(format!("migration error: {}", err))
    }
}

impl From<anyhow::Error> for AppError {
    fn from(err: anyhow::Error) -> Self {
        AppError::InternalError(format!("{:#}", err))
    }
}

impl From<PasswordError> for AppError {
    fn from(err: PasswordError) -> Self {
        AppError::InternalError(err.to_string())
    }
}

impl From<AuthError> for AppError {
    fn from(err: AuthError) -> Self {
        if err.status_code() == StatusCode::UNAUTHORIZED {
            AppError::Unauthorized(err.to_string())
        } else {
            AppError::InternalError(err.to_string())
        }
    }
}

/// Token and credential failures. The messages are part of the API.
#[derive(Debug, Display, PartialEq)]
pub enum AuthError {
    #[display("token missing")]
    MissingCredentials,

    #[display("token invalid")]
    InvalidToken,

    #[display("token expired")]
    TokenExpired,

    #[display("invalid username or password")]
    WrongCredentials,

    #[display("Token creation error")]
    TokenCreation,

    #[display("Missing JWT service")]
    MissingJwtService,

    #[display("Password error: {_0}")]
    PasswordError(String),
}

impl ResponseError for AuthError {
    fn status_code(&self) -> StatusCode {
        match self {
            AuthError::MissingCredentials
            | AuthError::InvalidToken
            | AuthError::TokenExpired
            | AuthError::WrongCredentials => StatusCode::UNAUTHORIZED,
            AuthError::TokenCreation
            | AuthError::MissingJwtService
            | AuthError::PasswordError(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    fn error_response(&self) -> HttpResponse {
        json_error(self.status_code(), json!({ "error": self.to_string() }))
    }
}

impl From<JwtError> for AuthError {
    fn from(err: JwtError) -> Self {
        match err.kind() {
            ErrorKind::ExpiredSignature => AuthError::TokenExpired,
            _ => AuthError::InvalidToken,
        }
    }
}

impl From<PasswordError> for AuthError {
    fn from(err: PasswordError) -> Self {
        AuthError::PasswordError(err.to_string())
    }
}

#[derive(Debug, Display)]
pub enum PasswordError {
    #[display("Invalid password parameters: {_0}")]
    InvalidParameters(String),

    #[display("Password hashing failed: {_0}")]
    HashingError(String),

    #[display("Invalid password hash format: {_0}")]
    InvalidHashFormat(String),

    #[display("Password verification failed: {_0}")]
    VerificationError(String),
}

#[derive(Debug, Serialize, PartialEq)]
pub struct FieldError {
    pub field: String,
    pub message: String,
}

#[cfg(test)]
mod tests {
    use super::*;
    use actix_web::body::to_bytes;
    use validator::Validate;

    #[derive(Validate)]
    struct Sample {
        #[validate(length(min = 1, message = "url is required"))]
        url: String,
        #[validate(length(min = 1, message = "title is required"))]
        title: String,
    }

    #[test]
    fn auth_errors_map_to_unauthorized_app_errors() {
        let err = AppError::from(AuthError::MissingCredentials);
        assert_eq!(err.status_code(), StatusCode::UNAUTHORIZED);
        assert_eq!(err.to_string(), "token missing");

        let err = AppError::from(AuthError::TokenCreation);
        assert_eq!(err.status_code(), StatusCode::INTERNAL_SERVER_ERROR);
    }

    #[test]
    fn forbidden_and_not_found_status_codes() {
        assert_eq!(AppError::ForbiddenAccess.status_code(), StatusCode::FORBIDDEN);
        assert_eq!(AppError::NotFound("blog not found".into()).status_code(), StatusCode::NOT_FOUND);
        assert_eq!(AppError::InvalidInput("malformatted id".into()).status_code(), StatusCode::BAD_REQUEST);
    }

    #[test]
    fn validation_details_are_sorted_by_field() {
        let sample = Sample { url: String::new(), title: String::new() };
        let err = AppError::from(sample.validate().unwrap_err());

        match &err {
            AppError::ValidationError(details) => {
                let fields: Vec<&str> = details.iter().map(|d| d.field.as_str()).collect();
                assert_eq!(fields, vec!["title", "url"]);
            }
            other => panic!("expected validation error, got {:?}", other),
        }
        assert_eq!(err.to_string(), "validation error: title: title is required, url: url is required");
    }

    #[actix_rt::test]
    async fn error_bodies_carry_the_message() {
        let response = AppError::ForbiddenAccess.error_response();
        let body = to_bytes(response.into_body()).await.unwrap();
        let json: Value = serde_json::from_slice(&body).unwrap();

        assert_eq!(json, json!({ "error": "only the creator of a blog can delete it" }));
    }
}
