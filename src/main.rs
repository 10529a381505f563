// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

use std::{net::SocketAddr, sync::Arc};

use tracing_subscriber::EnvFilter;

use trait_oracle::{
    api::router,
    blockchain::{signer_from_hex, VaultClient},
    config::{Config, LogFormat, DEFAULT_LOG_FILTER},
    state::AppState,
    store::TraitStore,
};

fn init_tracing(config: &Config) {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(DEFAULT_LOG_FILTER));

    match config.log_format {
        LogFormat::Json => tracing_subscriber::fmt()
            .with_env_filter(filter)
            .json()
            .init(),
        LogFormat::Pretty => tracing_subscriber::fmt().with_env_filter(filter).init(),
    }
}

async fn shutdown_signal() {
    tokio::signal::ctrl_c()
        .await
        .expect("Failed to listen for shutdown signal");
    tracing::info!("shutdown signal received");
}

#[tokio::main]
async fn main() {
    let config = Config::from_env().expect("Invalid configuration");
    init_tracing(&config);

    let store = Arc::new(
        TraitStore::open(&config.data_dir.join("traits.redb"))
            .expect("Failed to open trait database"),
    );
    let chain = Arc::new(
        VaultClient::new(&config.rpc_url, config.vault_address)
            .expect("Failed to build vault client"),
    );
    let signer = signer_from_hex(&config.signing_key).expect("Invalid oracle signing key");
    let signer_address = signer.address();

    let state = AppState::new(store, chain, signer, config.addresses);
    let app = router(state);

    let addr: SocketAddr = format!("{}:{}", config.host, config.port)
        .parse()
        .expect("Failed to parse bind address");

    tracing::info!(
        %addr,
        vault = %config.vault_address,
        signer = %signer_address,
        "trait oracle listening (docs at /docs)"
    );

    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .expect("Failed to bind listener");

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .expect("HTTP server failed");
}
