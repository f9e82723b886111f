pub mod cookies;
pub mod error;
pub mod response;
