//! Lock transitions and enforcement.

pub mod gate;
pub mod notifier;
pub mod service;

pub use notifier::Notifier;
pub use service::LockService;
