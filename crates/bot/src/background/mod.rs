//! Long-running background tasks.

pub mod expiry_sweep;

pub use expiry_sweep::ExpirySweeper;
