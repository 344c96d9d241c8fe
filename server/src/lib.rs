//! HTTP surface for the ride simulator.
//!
//! The binary and the integration tests both build the router from here.

pub mod error;
pub mod rides;
pub mod routes;

pub use error::{ApiError, ApiResult};
pub use rides::{AppState, RidePage};
pub use routes::router;
