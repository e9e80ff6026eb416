//! Supabase Binary
//!
//! Stores payment proofs in Supabase Storage and registrations in a
//! PostgREST-exposed table.
//!
//! Environment Variables:
//! - SUPABASE_URL: project URL
//! - SUPABASE_ANON_KEY: API key
//! - SUPABASE_BUCKET: storage bucket (default `registration-files`)
//! - SUPABASE_TABLE: table name (default `registrations`)

use registrar::adapters::http;
use registrar::adapters::supabase::{SupabaseClient, SupabaseStorage, SupabaseTable};
use registrar::{telemetry, HttpConfig, RegistrationService, SupabaseConfig};
use std::sync::Arc;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let config = HttpConfig::from_env()?;
    telemetry::init(config.json_logs);

    let supabase = SupabaseConfig::from_env()?;
    let client = SupabaseClient::new(&supabase.url, &supabase.api_key)?;

    let storage = SupabaseStorage::new(client.clone(), &supabase.bucket);
    let table = SupabaseTable::new(client, &supabase.table);
    let service = Arc::new(RegistrationService::new(
        storage,
        table,
        config.id_prefix.clone(),
    ));

    tracing::info!(
        url = %supabase.url,
        bucket = %supabase.bucket,
        table = %supabase.table,
        "Using Supabase backend"
    );
    http::serve(&config, http::router(&config, service)).await?;
    Ok(())
}
