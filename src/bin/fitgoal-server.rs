// ABOUTME: Server binary: loads configuration, opens the store, and serves the fitgoal API
// ABOUTME: CLI flags override the HTTP port and database URL from the environment
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

//! # Fitgoal Server Binary

use std::sync::Arc;

use anyhow::{anyhow, Result};
use clap::Parser;
use fitgoal_server::auth::AuthManager;
use fitgoal_server::config::{DatabaseUrl, ServerConfig};
use fitgoal_server::database_plugins::sqlite::SqliteDatabase;
use fitgoal_server::llm::{OpenAiCompatibleConfig, OpenAiCompatibleProvider};
use fitgoal_server::logging;
use fitgoal_server::resources::ServerResources;
use fitgoal_server::server::run_server;
use tracing::{error, info};

#[derive(Parser)]
#[command(name = "fitgoal-server")]
#[command(about = "Fitgoal API - workouts, AI-planned goals, and progress summaries")]
struct Args {
    /// Override HTTP port
    #[arg(long)]
    http_port: Option<u16>,

    /// Override database URL (e.g. `sqlite:./data/fitgoal.db`)
    #[arg(long)]
    database_url: Option<String>,
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();

    logging::init_from_env()?;

    let mut config = ServerConfig::from_env()?;
    if let Some(http_port) = args.http_port {
        config.http_port = http_port;
    }
    if let Some(url) = args.database_url.as_deref() {
        config.database.url = DatabaseUrl::parse_url(url)?;
    }

    info!("Starting fitgoal server");
    info!("{}", config.summary());

    let database =
        SqliteDatabase::new(&config.database.url, config.database.max_connections).await?;
    let planner = OpenAiCompatibleProvider::new(OpenAiCompatibleConfig::from(&config.llm))?;
    let auth_manager = AuthManager::new(
        config.auth.jwt_secret.as_bytes(),
        config.auth.jwt_expiry_minutes,
    );

    let resources = ServerResources::builder()
        .with_database(Arc::new(database))
        .with_llm(Arc::new(planner))
        .with_auth_manager(auth_manager)
        .with_config(Arc::new(config))
        .build()
        .map_err(|e| anyhow!(e))?;

    if let Err(e) = run_server(resources).await {
        error!("Server error: {e:#}");
        return Err(e);
    }
    Ok(())
}
