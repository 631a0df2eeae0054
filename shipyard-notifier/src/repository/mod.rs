//! Repository layer
//!
//! Repositories are thin wrappers over the Slack client. They expose the two
//! remote operations the relay depends on without any business logic.
//!
//! Both are trait-based so the services can be tested against fakes.

mod channels;
mod messages;

// Re-export traits
pub use channels::ChannelDirectory;
pub use messages::MessagePoster;

// Re-export implementations
pub use channels::SlackChannelDirectory;
pub use messages::SlackMessagePoster;
