//! Vigil Fixture Service
//!
//! A local, in-process stand-in for the remote users fixture: the same
//! `/users` REST surface with the canned ten-user dataset, the console
//! page the browser smoke test targets, and a readiness endpoint. The
//! suites default to this service so runs stay hermetic.

pub mod data;
pub mod error;
pub mod service;

pub use data::dataset;
pub use error::{FixtureError, FixtureResult};
pub use service::{router, FixtureServer, CONSOLE_TITLE, JSON_CONTENT_TYPE};
