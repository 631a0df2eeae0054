//! Core domain types
//!
//! Deployment definitions are read by the assembler (which turns them into a
//! template) and by the CLI (which loads them from disk). Everything here is
//! plain data; the assembly logic lives in `shipyard-assembler`.

pub mod deployment;
pub mod environment;
pub mod notification;
pub mod pipeline;
pub mod template;
