//! Application layer - Services generic over the ports they use.

pub mod registration;
