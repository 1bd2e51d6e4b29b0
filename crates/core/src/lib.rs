//! Domain types and pure logic shared across the threadlock crates.
//!
//! Everything here is side-effect free: the lock decision function, the
//! user-facing message catalogue, Slack request-signature verification, and
//! the error taxonomy. The effectful layers (`threadlock-db`,
//! `threadlock-bot`) build on top of these.

pub mod error;
pub mod lock;
pub mod messages;
pub mod signing;
pub mod types;

pub use error::CoreError;
pub use types::Timestamp;
