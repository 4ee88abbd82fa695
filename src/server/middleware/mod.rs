//! HTTP middleware

pub mod request_id;

pub use request_id::RequestIdMiddleware;
