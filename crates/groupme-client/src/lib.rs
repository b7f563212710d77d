//! groupme-client: model layer for the GroupMe REST API
//!
//! Typed managers for group and direct messages, their attachments, likes,
//! and the per-group leaderboard. All network I/O goes through a shared
//! [`Session`] built on `reqwest`; managers hold nothing but the session and
//! the identifiers that scope them.

pub mod attachments;
pub mod client;
pub mod config;
pub mod direct_messages;
pub mod error;
pub mod likes;
pub mod messages;
pub mod session;

pub use attachments::{Attachment, GenericAttachment, Image, Location};
pub use client::Client;
pub use config::Config;
pub use direct_messages::{DirectListParams, DirectMessage, DirectMessages};
pub use error::{Error, Result};
pub use likes::{Leaderboard, Likes, Period};
pub use messages::{ListParams, Message, Messages};
pub use session::{ApiResponse, Session};
