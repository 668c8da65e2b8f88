pub mod auth;

pub use auth::{role_route_middleware, route_decision, RouteDecision};
