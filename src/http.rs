use std::time::Duration;

use crate::error::Result;

/// Builds an outbound HTTP client with a fixed request timeout.
///
/// reqwest is built without a bundled crypto provider, so the ring provider
/// is installed process-wide first. Installing twice is a no-op.
pub fn client(timeout: Duration) -> Result<reqwest::Client> {
    let _ = rustls::crypto::ring::default_provider().install_default();

    let client = reqwest::Client::builder()
        .timeout(timeout)
        .user_agent(concat!("autosales/", env!("CARGO_PKG_VERSION")))
        .build()?;
    Ok(client)
}
