//! Database models and DTOs for all domain entities.

pub mod catalog;
pub mod fleet;
pub mod links;
pub mod location;
pub mod pagination;
pub mod session;
pub mod user;
