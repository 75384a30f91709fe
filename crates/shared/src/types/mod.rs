//! Common types used across the application.

pub mod entity;
pub mod id;

pub use entity::EntityKind;
pub use id::*;
