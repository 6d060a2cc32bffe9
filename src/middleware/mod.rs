// src/middleware/mod.rs
// DOCUMENTATION: Request middleware
// PURPOSE: Session identity and the route guard for protected pages

pub mod route_guard;
pub mod session;

pub use route_guard::RouteGuard;
pub use session::{CurrentUser, SessionIdentity};
