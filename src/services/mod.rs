//! Business logic services.

pub mod analytics;
pub mod auth;
pub mod catalog;
pub mod fleet;
pub mod links;
pub mod locations;
pub mod ordering;
pub mod policy;
