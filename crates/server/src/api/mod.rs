use std::{io::ErrorKind, path::PathBuf};

use shared::{
    error::{ApiError, ApiException, ErrorCode},
    protocol::ClientRecord,
};
use tracing::{info, warn};

#[derive(Debug, Clone)]
pub struct ApiContext {
    pub clients_file: PathBuf,
}

/// Reads the seed file on every call so edits show up without a restart.
/// A missing file is an empty list, which the site answers with its
/// fallback clients.
pub async fn list_clients(ctx: &ApiContext) -> Result<Vec<ClientRecord>, ApiError> {
    let clients = read_clients(ctx).await.map_err(|err| {
        warn!(path = %ctx.clients_file.display(), error = %err, "failed to serve clients");
        ApiError::from(err)
    })?;
    info!(count = clients.len(), "serving clients");
    Ok(clients)
}

async fn read_clients(ctx: &ApiContext) -> Result<Vec<ClientRecord>, ApiException> {
    let raw = match tokio::fs::read_to_string(&ctx.clients_file).await {
        Ok(raw) => raw,
        Err(err) if err.kind() == ErrorKind::NotFound => return Ok(Vec::new()),
        Err(err) => return Err(internal(format!("failed to read client seed file: {err}"))),
    };
    serde_json::from_str(&raw).map_err(|err| internal(format!("invalid client seed file: {err}")))
}

fn internal(message: String) -> ApiException {
    ApiException {
        code: ErrorCode::Internal,
        message,
    }
}

#[cfg(test)]
#[path = "tests/mod_tests.rs"]
mod tests;
