// SPDX-FileCopyrightText: 2026 Bruno Meilick
// SPDX-License-Identifier: LicenseRef-Roadgrid-FreeUse-NoCopy-NoDerivatives
//
// All rights reserved.
//
// This file is part of Roadgrid and is proprietary software.
// Unauthorized copying, modification, or distribution is prohibited.

//! Roadgrid CLI entrypoint.
//!
//! By default this serves the routing tools over streamable HTTP at
//! `http://127.0.0.1:<port>/mcp` until Ctrl-C.
//!
//! Use `--stdio` to serve MCP over stdio instead (intended for tool integrations).

use std::error::Error;
use std::sync::Arc;

use axum::Router;
use rmcp::transport::{
    streamable_http_server::session::local::LocalSessionManager, StreamableHttpServerConfig,
    StreamableHttpService,
};
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

use roadgrid::mcp::RoadgridMcp;
use roadgrid::{EngineConfig, RoutingEngine};

const DEFAULT_MCP_HTTP_PORT: u16 = 27436;
const LOG_ENV: &str = "ROADGRID_LOG";

fn print_usage(program: &str) {
    eprintln!(
        "Usage:\n  {program} [--config <file>] [--seed <u64>] [--http-port <port>]\n  {program} [--config <file>] [--seed <u64>] --stdio\n\nDefault mode serves MCP over streamable HTTP at `http://127.0.0.1:<port>/mcp`.\n--http-port selects the port (0 = ephemeral; default {DEFAULT_MCP_HTTP_PORT}).\n\n--config loads cache and lane settings from a JSON file.\n--seed fixes pothole placement (overrides `pothole_seed` from the config).\n\nLogs go to stderr; filter them with {LOG_ENV} (default `info`)."
    );
}

#[derive(Debug, Default, Clone, PartialEq, Eq)]
struct CliOptions {
    stdio: bool,
    config: Option<String>,
    http_port: Option<u16>,
    seed: Option<u64>,
}

fn parse_options(mut args: impl Iterator<Item = String>) -> Result<CliOptions, ()> {
    let mut options = CliOptions::default();

    while let Some(arg) = args.next() {
        match arg.as_str() {
            "--stdio" => {
                if options.stdio {
                    return Err(());
                }
                options.stdio = true;
            }
            "--config" => {
                if options.config.is_some() {
                    return Err(());
                }
                options.config = Some(args.next().ok_or(())?);
            }
            "--http-port" => {
                if options.http_port.is_some() {
                    return Err(());
                }
                let raw = args.next().ok_or(())?;
                options.http_port = Some(raw.parse().map_err(|_| ())?);
            }
            "--seed" => {
                if options.seed.is_some() {
                    return Err(());
                }
                let raw = args.next().ok_or(())?;
                options.seed = Some(raw.parse().map_err(|_| ())?);
            }
            _ => return Err(()),
        }
    }

    if options.stdio && options.http_port.is_some() {
        return Err(());
    }

    Ok(options)
}

fn init_tracing() {
    let filter = EnvFilter::try_from_env(LOG_ENV).unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt().with_env_filter(filter).with_writer(std::io::stderr).init();
}

fn load_config(options: &CliOptions) -> Result<EngineConfig, Box<dyn Error>> {
    let mut config = match &options.config {
        Some(path) => EngineConfig::load(path)?,
        None => EngineConfig::default(),
    };
    if let Some(seed) = options.seed {
        config = config.with_pothole_seed(seed);
    }
    config.validate()?;
    Ok(config)
}

async fn serve_http(mcp: RoadgridMcp, port: u16) -> Result<(), Box<dyn Error>> {
    let listener = tokio::net::TcpListener::bind(("127.0.0.1", port)).await?;
    info!(addr = %listener.local_addr()?, "serving MCP over streamable HTTP at /mcp");

    let config =
        StreamableHttpServerConfig { stateful_mode: true, ..StreamableHttpServerConfig::default() };
    let shutdown_token = config.cancellation_token.clone();
    let server_shutdown = shutdown_token.clone();

    let session_manager = Arc::new(LocalSessionManager::default());
    let mcp_service = StreamableHttpService::new(move || Ok(mcp.clone()), session_manager, config);

    let router = Router::new().nest_service("/mcp", mcp_service);
    let server_handle = tokio::spawn(async move {
        let serve = axum::serve(listener, router).with_graceful_shutdown(async move {
            server_shutdown.cancelled().await;
        });
        if let Err(err) = serve.await {
            warn!(%err, "MCP HTTP server error");
        }
    });

    if let Err(err) = tokio::signal::ctrl_c().await {
        warn!(%err, "cannot listen for Ctrl-C; shutting down");
    }
    info!("shutting down");
    shutdown_token.cancel();
    let _ = server_handle.await;
    Ok(())
}

fn main() {
    let result = (|| -> Result<(), Box<dyn Error>> {
        let mut args = std::env::args();
        let program = args.next().unwrap_or_else(|| "roadgrid".to_owned());

        let options = match parse_options(args) {
            Ok(options) => options,
            Err(()) => {
                print_usage(&program);
                std::process::exit(2);
            }
        };

        init_tracing();
        let config = load_config(&options)?;
        let runtime = tokio::runtime::Builder::new_multi_thread().enable_all().build()?;

        runtime.block_on(async move {
            let engine = Arc::new(RoutingEngine::new(config));
            let _sweeper = engine.spawn_sweeper();
            let mcp = RoadgridMcp::new(engine);

            if options.stdio {
                info!("serving MCP over stdio");
                mcp.serve_stdio().await?;
            } else {
                serve_http(mcp, options.http_port.unwrap_or(DEFAULT_MCP_HTTP_PORT)).await?;
            }
            Ok::<(), Box<dyn Error>>(())
        })?;

        Ok(())
    })();

    if let Err(err) = result {
        eprintln!("roadgrid: {err}");
        std::process::exit(1);
    }
}
