//! Data Transfer Objects
//!
//! Wire shapes exchanged with external services: the notification event
//! delivered to the relay and the Slack Web API payloads it sends back.

pub mod event;
pub mod slack;
