//! Row-level queries, one module per table. Relationships are followed
//! through explicit id lookups.

pub mod attendee;
pub mod event;
pub mod location;
pub mod session;
pub mod user;
