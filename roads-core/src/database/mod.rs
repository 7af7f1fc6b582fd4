//! Persistence layer: the repository trait and its PostgreSQL backend.

pub mod postgres;
pub mod traits;

pub use postgres::PostgresRepository;
pub use traits::RoadsRepository;
