use actix_web::{FromRequest, HttpRequest, HttpMessage};
use futures_util::future::{ready, Ready};

use crate::{auth::jwt::AuthenticatedUser, errors::AuthError};

/// Extractor for the caller verified by the auth middleware.
/// Returns 401 if the request carried no valid token.
/// Usage: Add `caller: AuthUser` as a parameter to your handler function.
#[derive(Debug)]
pub struct AuthUser(pub AuthenticatedUser);

impl FromRequest for AuthUser {
    type Error = actix_web::Error;
    type Future = Ready<Result<Self, Self::Error>>;

    fn from_request(req: &HttpRequest, _: &mut actix_web::dev::Payload) -> Self::Future {
        match req.extensions().get::<AuthenticatedUser>() {
            Some(user) => ready(Ok(AuthUser(user.clone()))),
            None => ready(Err(AuthError::MissingCredentials.into())),
        }
    }
}
