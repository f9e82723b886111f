pub mod attendance;
pub mod events;
pub mod identity;
