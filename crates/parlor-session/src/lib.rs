//! Player sessions for Parlor.
//!
//! A session is the server's record of one connected player: their
//! opaque [`PlayerId`](parlor_protocol::PlayerId), their display name
//! once they introduce themselves, and the outbound channel their
//! connection's writer task drains.
//!
//! Delivery through the manager is best-effort and at-most-once: a
//! message for a player whose channel is gone is dropped silently,
//! because the next state broadcast supersedes it anyway.

mod manager;

pub use manager::{Session, SessionManager};
