//! HTTP service library for the Meru Roads register.

pub mod contractor_handlers;
pub mod db;
pub mod errors;
pub mod infra;
pub mod map_handlers;
pub mod notification_handlers;
pub mod photo_handlers;
pub mod road_handlers;
pub mod routes;
pub mod stats_handlers;
pub mod user_handlers;

pub use errors::{AppError, AppResult};
pub use infra::app_state::AppState;
