use std::{net::SocketAddr, sync::Arc};

use anyhow::Context;
use tracing::info;

use crate::config::Settings;
use crate::server;
use crate::service::GeminiService;

/// Runs the proxy. It always calls Gemini directly, whatever `backend` says.
pub async fn run(settings: &Settings, bind: Option<&str>) -> anyhow::Result<()> {
    let bind = bind.unwrap_or(&settings.bind_addr);
    let addr: SocketAddr = bind
        .parse()
        .with_context(|| format!("invalid bind address '{bind}'"))?;

    let service = GeminiService::from_settings(settings)?;
    info!(
        text_model = %settings.text_model,
        image_model = %settings.image_model,
        "starting generation proxy"
    );

    server::serve(addr, Arc::new(service)).await
}
