//! Web layer for the bike router.
//!
//! A JSON API over nearest-station search and route planning.

mod dto;
mod routes;
mod state;

pub use dto::*;
pub use routes::{AppError, create_router};
pub use state::AppState;
