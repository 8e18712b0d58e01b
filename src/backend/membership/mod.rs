//! Membership Module
//!
//! Decides whether a user may join or write to a conversation. The chat
//! core never creates membership records; it only asks.
//!
//! - **`guard`** - `MembershipGuard` trait and the in-memory `StaticMembership`
//! - **`db`** - `PgMembershipGuard` over the match roster and friendship tables

/// Membership guard trait and in-memory implementation
pub mod guard;

/// PostgreSQL-backed membership guard
pub mod db;

pub use db::PgMembershipGuard;
pub use guard::{MembershipError, MembershipGuard, StaticMembership};
