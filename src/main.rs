// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

use std::process::ExitCode;

use storefront_server::{
    api::router,
    auth::{password::hash_password, Role, TokenCodec},
    config::{AdminSeed, AppConfig},
    logging,
    models::{CustomerKind, NewCustomer},
    state::AppState,
    store::Store,
};
use tokio::net::TcpListener;

#[tokio::main]
async fn main() -> ExitCode {
    let config = match AppConfig::from_env() {
        Ok(config) => config,
        Err(e) => {
            eprintln!("configuration error: {e}");
            return ExitCode::FAILURE;
        }
    };
    logging::init(config.log_format);

    match run(config).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            tracing::error!(error = %e, "server failed");
            ExitCode::FAILURE
        }
    }
}

async fn run(config: AppConfig) -> Result<(), Box<dyn std::error::Error>> {
    let mut store = Store::new();
    if config.seed_demo_data {
        store.seed_demo_catalog();
        store.seed_demo_locations();
        tracing::info!("demo catalog and locations loaded");
    }
    if let Some(admin) = &config.admin {
        seed_admin(&mut store, admin)?;
    }

    let tokens = TokenCodec::new(&config.secret, config.token_expiration);
    let state = AppState::new(store, tokens).with_frame_embedding(config.allow_frame_embedding);

    let token_expiration_secs = state.tokens.expiration().as_secs();
    let app = router(state);

    let listener = TcpListener::bind(config.bind_addr).await?;
    tracing::info!(
        addr = %config.bind_addr,
        token_expiration_secs,
        "storefront server listening"
    );

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    tracing::info!("server stopped");
    Ok(())
}

fn seed_admin(store: &mut Store, admin: &AdminSeed) -> Result<(), Box<dyn std::error::Error>> {
    if store.customer_by_email(&admin.email).is_some() {
        return Ok(());
    }

    let customer = store
        .insert_customer(NewCustomer {
            name: "Administrator".to_string(),
            email: admin.email.clone(),
            document: "-".to_string(),
            kind: CustomerKind::Individual,
            phones: Vec::new(),
            addresses: Vec::new(),
            password_hash: hash_password(&admin.password)?,
            roles: [Role::Admin, Role::Customer].into_iter().collect(),
        })
        .map_err(|e| e.message)?;
    tracing::info!(customer_id = customer.id, email = %customer.email, "administrator account created");
    Ok(())
}

async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            tracing::warn!(error = %e, "failed to listen for ctrl-c");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut signal) => {
                signal.recv().await;
            }
            Err(e) => {
                tracing::warn!(error = %e, "failed to listen for SIGTERM");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }
    tracing::info!("shutdown signal received");
}
