//! Domain layer - Pure business logic.

pub mod multipart;
pub mod registration;
