//! Slack transport layer: the Web API client plus typed inbound payloads
//! (Events API deliveries, interactivity payloads, and the lock modal).

pub mod client;
pub mod events;
pub mod interactions;
pub mod views;

pub use client::{SlackClient, SlackError};
