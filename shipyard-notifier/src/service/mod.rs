//! Service layer
//!
//! Services hold the relay's logic: finding the destination channel and
//! shaping the message. They depend on repositories through traits only.

mod blocks;
mod formatter;
mod resolver;

pub use formatter::{FormattedMessage, MessageFormatter};
pub use resolver::ChannelResolver;
