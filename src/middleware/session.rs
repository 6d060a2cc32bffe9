// src/middleware/session.rs
// DOCUMENTATION: Session identity middleware
// PURPOSE: Attach the logged-in user (if any) to every request

use actix_web::{
    dev::{forward_ready, Payload, Service, ServiceRequest, ServiceResponse, Transform},
    Error, FromRequest, HttpMessage, HttpRequest,
};
use futures_util::future::{ready, LocalBoxFuture, Ready};
use jsonwebtoken::{decode, Algorithm, DecodingKey, Validation};
use serde::{Deserialize, Serialize};
use std::rc::Rc;
use uuid::Uuid;

use crate::errors::PlacesError;

/// Cookie carrying the session token issued by the login service
pub const SESSION_COOKIE: &str = "session";

/// Claims of a session token; `sub` is the user id
#[derive(Debug, Serialize, Deserialize)]
pub struct SessionClaims {
    pub sub: String,
    pub exp: usize,
}

/// Authenticated user of the current request
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CurrentUser(pub Uuid);

impl CurrentUser {
    pub fn id(&self) -> Uuid {
        self.0
    }
}

/// Reads the session token, never rejects. Requests without a valid
/// token simply carry no CurrentUser.
pub struct SessionIdentity {
    key: DecodingKey,
}

impl SessionIdentity {
    pub fn new(secret: &str) -> Self {
        Self {
            key: DecodingKey::from_secret(secret.as_bytes()),
        }
    }
}

impl<S, B> Transform<S, ServiceRequest> for SessionIdentity
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = Error> + 'static,
    S::Future: 'static,
    B: 'static,
{
    type Response = ServiceResponse<B>;
    type Error = Error;
    type Transform = SessionIdentityService<S>;
    type InitError = ();
    type Future = Ready<Result<Self::Transform, Self::InitError>>;

    fn new_transform(&self, service: S) -> Self::Future {
        ready(Ok(SessionIdentityService {
            service: Rc::new(service),
            key: Rc::new(self.key.clone()),
        }))
    }
}

pub struct SessionIdentityService<S> {
    service: Rc<S>,
    key: Rc<DecodingKey>,
}

impl<S, B> Service<ServiceRequest> for SessionIdentityService<S>
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = Error> + 'static,
    S::Future: 'static,
    B: 'static,
{
    type Response = ServiceResponse<B>;
    type Error = Error;
    type Future = LocalBoxFuture<'static, Result<Self::Response, Self::Error>>;

    forward_ready!(service);

    fn call(&self, req: ServiceRequest) -> Self::Future {
        let service = self.service.clone();

        if let Some(token) = session_token(&req) {
            match validate_token(&token, &self.key) {
                Ok(user_id) => {
                    req.extensions_mut().insert(CurrentUser(user_id));
                }
                Err(e) => log::debug!("Ignoring invalid session token: {}", e),
            }
        }

        Box::pin(async move { service.call(req).await })
    }
}

/// Token from the session cookie, or a Bearer Authorization header
fn session_token(req: &ServiceRequest) -> Option<String> {
    if let Some(cookie) = req.cookie(SESSION_COOKIE) {
        return Some(cookie.value().to_string());
    }

    req.headers()
        .get("Authorization")
        .and_then(|h| h.to_str().ok())
        .and_then(|h| h.strip_prefix("Bearer "))
        .map(str::to_string)
}

fn validate_token(token: &str, key: &DecodingKey) -> Result<Uuid, String> {
    let data = decode::<SessionClaims>(token, key, &Validation::new(Algorithm::HS256))
        .map_err(|e| e.to_string())?;
    Uuid::parse_str(&data.claims.sub).map_err(|e| format!("malformed user id: {}", e))
}

/// Handlers behind RouteGuard take `CurrentUser`; handlers that work for
/// anyone take `Option<CurrentUser>`
impl FromRequest for CurrentUser {
    type Error = PlacesError;
    type Future = Ready<Result<Self, Self::Error>>;

    fn from_request(req: &HttpRequest, _payload: &mut Payload) -> Self::Future {
        match req.extensions().get::<CurrentUser>() {
            Some(user) => ready(Ok(*user)),
            None => ready(Err(PlacesError::Unauthorized)),
        }
    }
}

/// Issue a token the way the login service does
#[cfg(test)]
pub fn issue_token(user_id: Uuid, secret: &str, ttl_seconds: i64) -> String {
    use jsonwebtoken::{encode, EncodingKey, Header};

    let claims = SessionClaims {
        sub: user_id.to_string(),
        exp: (chrono::Utc::now().timestamp() + ttl_seconds) as usize,
    };
    encode(
        &Header::new(Algorithm::HS256),
        &claims,
        &EncodingKey::from_secret(secret.as_bytes()),
    )
    .unwrap()
}
