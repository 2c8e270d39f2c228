use actix_web::{
    body::BoxBody,
    dev::{Service, ServiceRequest, ServiceResponse, Transform},
    http::Method,
    web, Error, HttpMessage, ResponseError,
};
use futures_util::future::{ok, Ready, LocalBoxFuture};
use std::{rc::Rc, task::{Context, Poll}};

use crate::{
    auth::jwt::AuthenticatedUser,
    errors::AuthError,
    AppState,
};

/// Verifies the bearer token on routes that mutate blogs and stores the
/// caller in the request extensions for the `AuthUser` extractor.
pub struct AuthMiddleware;

impl<S> Transform<S, ServiceRequest> for AuthMiddleware
where
    S: Service<ServiceRequest, Response = ServiceResponse<BoxBody>, Error = Error> + 'static,
{
    type Response = ServiceResponse<BoxBody>;
    type Error = Error;
    type InitError = ();
    type Transform = AuthMiddlewareService<S>;
    type Future = Ready<Result<Self::Transform, Self::InitError>>;

    fn new_transform(&self, service: S) -> Self::Future {
        ok(AuthMiddlewareService {
            service: Rc::new(service),
        })
    }
}

pub struct AuthMiddlewareService<S> {
    service: Rc<S>,
}

impl<S> Service<ServiceRequest> for AuthMiddlewareService<S>
where
    S: Service<ServiceRequest, Response = ServiceResponse<BoxBody>, Error = Error> + 'static,
{
    type Response = ServiceResponse<BoxBody>;
    type Error = Error;
    type Future = LocalBoxFuture<'static, Result<Self::Response, Self::Error>>;

    fn poll_ready(&self, ctx: &mut Context<'_>) -> Poll<Result<(), Self::Error>> {
        self.service.poll_ready(ctx)
    }

    fn call(&self, req: ServiceRequest) -> Self::Future {
        let service = Rc::clone(&self.service);

        Box::pin(async move {
            if !requires_auth(req.path(), req.method()) {
                return service.call(req).await;
            }

            match authenticate(&req) {
                Ok(user) => {
                    req.extensions_mut().insert(user);
                    service.call(req).await
                }
                Err(e) => {
                    tracing::warn!(path = %req.path(), method = %req.method(), "Rejected request: {}", e);
                    Ok(req.into_response(e.error_response()))
                }
            }
        })
    }
}

/// Reading blogs and the account endpoints are public; every blog mutation needs a token.
fn requires_auth(path: &str, method: &Method) -> bool {
    let is_blog_route = path == "/api/blogs" || path.starts_with("/api/blogs/");
    is_blog_route && matches!(*method, Method::POST | Method::PUT | Method::DELETE)
}

fn authenticate(req: &ServiceRequest) -> Result<AuthenticatedUser, AuthError> {
    let state = req.app_data::<web::Data<AppState>>()
        .ok_or_else(|| {
            tracing::error!("AppState missing in middleware");
            AuthError::MissingJwtService
        })?;

    let token = extract_token(req).ok_or(AuthError::MissingCredentials)?;
    let claims = state.auth_handler.token_service.decode_jwt(&token)?.claims;

    AuthenticatedUser::try_from(claims)
}

fn extract_token(req: &ServiceRequest) -> Option<String> {
    req.headers()
        .get("Authorization")
        .and_then(|header| header.to_str().ok())
        .and_then(|header| {
            let (scheme, token) = header.trim().split_once(' ')?;
            let token = token.trim();
            (scheme.eq_ignore_ascii_case("bearer") && !token.is_empty()).then(|| token.to_string())
        })
}

#[cfg(test)]
mod tests {
    use super::*;
    use actix_web::test::TestRequest;

    #[test]
    fn only_blog_mutations_require_auth() {
        assert!(requires_auth("/api/blogs", &Method::POST));
        assert!(requires_auth("/api/blogs/abc", &Method::PUT));
        assert!(requires_auth("/api/blogs/abc", &Method::DELETE));

        assert!(!requires_auth("/api/blogs", &Method::GET));
        assert!(!requires_auth("/api/users", &Method::POST));
        assert!(!requires_auth("/api/login", &Method::POST));
        assert!(!requires_auth("/api/blogsearch", &Method::POST));
    }

    #[test]
    fn bearer_scheme_is_case_insensitive() {
        let req = TestRequest::default()
            .insert_header(("Authorization", "bearer abc.def.ghi"))
            .to_srv_request();
        assert_eq!(extract_token(&req).as_deref(), Some("abc.def.ghi"));

        let req = TestRequest::default()
            .insert_header(("Authorization", "Bearer   abc.def.ghi"))
            .to_srv_request();
        assert_eq!(extract_token(&req).as_deref(), Some("abc.def.ghi"));
    }

    #[test]
    fn other_schemes_and_empty_tokens_are_ignored() {
        let req = TestRequest::default()
            .insert_header(("Authorization", "Basic dXNlcjpwYXNz"))
            .to_srv_request();
        assert!(extract_token(&req).is_none());

        let req = TestRequest::default()
            .insert_header(("Authorization", "Bearer "))
            .to_srv_request();
        assert!(extract_token(&req).is_none());

        assert!(extract_token(&TestRequest::default().to_srv_request()).is_none());
    }
}
