//! Repository layer.
//!
//! Each repository is a zero-sized struct providing async methods that accept
//! `&PgPool` as the first argument.

pub mod thread_lock_repo;

pub use thread_lock_repo::ThreadLockRepo;
