//! SithWash Dashboard API Module
//! REST API serving fraud predictions and synthetic dashboard transactions

pub mod handlers;
pub mod middleware;
pub mod routes;
pub mod types;

pub use handlers::AppState;
pub use routes::create_router;
pub use types::*;
