pub mod auth;
pub mod gatekeeper;
