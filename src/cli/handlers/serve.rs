use std::net::SocketAddr;

use anyhow::{Context, Result};
use crate::server::{AppState, run_server};

use super::CommandContext;

pub fn handle_serve(ctx: CommandContext, host: Option<String>, port: Option<u16>) -> Result<()> {
    let host = host.unwrap_or_else(|| ctx.config.server.host.clone());
    let port = port.unwrap_or(ctx.config.server.port);
    let addr: SocketAddr = format!("{}:{}", host, port)
        .parse()
        .with_context(|| format!("Invalid listen address {}:{}", host, port))?;

    let state = AppState::from_config(&ctx.config)?;

    println!("Starting autosales server on http://{}", addr);
    println!(
        "Model: {}  Classifier: {}  Data service: {}",
        ctx.config.llm.model,
        ctx.config.router.classifier,
        ctx.config
            .data_service
            .base_url
            .as_deref()
            .unwrap_or("none")
    );

    tokio::runtime::Runtime::new()?.block_on(async { run_server(state, addr).await })?;
    Ok(())
}
