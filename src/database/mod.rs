pub mod manager;
pub mod models;
pub mod repository;

pub use manager::{DatabaseError, DatabaseManager};
pub use models::person::{Person, PersonDraft};
pub use repository::{PersonRepository, PgPersonRepository, SqlitePersonRepository};
