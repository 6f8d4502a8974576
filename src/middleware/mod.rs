pub mod auth;

pub use auth::basic_auth_middleware;
