//! Adapters - Concrete implementations of ports, plus the HTTP inbound side.

pub mod http;

#[cfg(feature = "aws")]
pub mod aws;

#[cfg(feature = "local")]
pub mod local;

#[cfg(feature = "supabase")]
pub mod supabase;
