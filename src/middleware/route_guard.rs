// src/middleware/route_guard.rs
// DOCUMENTATION: Route guard middleware
// PURPOSE: Reject requests without a session user before the handler runs

use actix_web::{
    body::EitherBody,
    dev::{forward_ready, Service, ServiceRequest, ServiceResponse, Transform},
    Error, HttpMessage, ResponseError,
};
use futures_util::future::{ready, LocalBoxFuture, Ready};
use std::rc::Rc;

use crate::errors::PlacesError;
use crate::middleware::CurrentUser;

/// Wraps individual resources. Requires SessionIdentity further out.
pub struct RouteGuard;

impl<S, B> Transform<S, ServiceRequest> for RouteGuard
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = Error> + 'static,
    S::Future: 'static,
    B: 'static,
{
    type Response = ServiceResponse<EitherBody<B>>;
    type Error = Error;
    type Transform = RouteGuardService<S>;
    type InitError = ();
    type Future = Ready<Result<Self::Transform, Self::InitError>>;

    fn new_transform(&self, service: S) -> Self::Future {
        ready(Ok(RouteGuardService {
            service: Rc::new(service),
        }))
    }
}

pub struct RouteGuardService<S> {
    service: Rc<S>,
}

impl<S, B> Service<ServiceRequest> for RouteGuardService<S>
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = Error> + 'static,
    S::Future: 'static,
    B: 'static,
{
    type Response = ServiceResponse<EitherBody<B>>;
    type Error = Error;
    type Future = LocalBoxFuture<'static, Result<Self::Response, Self::Error>>;

    forward_ready!(service);

    fn call(&self, req: ServiceRequest) -> Self::Future {
        let authenticated = req.extensions().get::<CurrentUser>().is_some();

        if !authenticated {
            log::warn!("Blocked unauthenticated {} {}", req.method(), req.path());
            let response = PlacesError::Unauthorized.error_response();
            return Box::pin(async move { Ok(req.into_response(response).map_into_right_body()) });
        }

        let service = self.service.clone();
        Box::pin(async move { service.call(req).await.map(ServiceResponse::map_into_left_body) })
    }
}
