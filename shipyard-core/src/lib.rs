//! Shipyard Core
//!
//! Core types shared by the Shipyard delivery tooling.
//!
//! This crate contains:
//! - Domain types: environments, notification targets, pipeline stages and
//!   the resource template handed to the provisioner
//! - DTOs: event payloads received by the notification relay and the Slack
//!   wire types it sends

pub mod domain;
pub mod dto;
