//! Vigil Users Client
//!
//! Typed data model and a thin HTTP client for the users fixture API
//! (a JSONPlaceholder-compatible `/users` resource).

pub mod api;
pub mod error;
pub mod types;

pub use api::{ApiResponse, UsersClient};
pub use error::{ClientError, ClientResult};
pub use types::{Address, Company, Geo, NewUser, User, UserFilter};
