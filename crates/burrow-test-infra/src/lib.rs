//! Disposable containers for burrow integration tests.
//!
//! Every fixture owns its container; dropping the fixture stops it.

pub mod error;
pub mod postgres;
pub mod redis;

pub use error::{Result, TestInfraError};
