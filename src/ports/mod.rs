//! Ports - Trait definitions for the collaborators of a submission.

pub mod clock;
pub mod repository;
pub mod storage;
