//! Server Module
//!
//! The Unix-socket front end: newline-framed JSON requests in, newline-framed
//! JSON replies out.
//!
//! # Events
//! - `SET` - store a key-value pair in one tier
//! - `GET KEY` - retrieve a value, memory tier first
//! - `GET GROUP` - retrieve a group from both tiers
//! - `DELETE KEY` - delete a key from both tiers
//! - `DELETE GROUP` - delete a group from both tiers
//! - `LIST` - snapshot both tiers

pub mod dispatch;
pub mod listener;

pub use dispatch::handle_line;
pub use listener::{bind, serve, MAX_IN_FLIGHT};
