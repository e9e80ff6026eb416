//! Supabase adapters: Storage API for payment proofs, PostgREST for the
//! registrations table.

mod client;
mod storage;
mod table;

pub use client::{SupabaseClient, SupabaseError};
pub use storage::SupabaseStorage;
pub use table::SupabaseTable;
