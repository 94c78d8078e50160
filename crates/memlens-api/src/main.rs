//! memlens CLI and proxy server entry point.
//!
//! Binary name: `memlens`
//!
//! Parses CLI arguments, loads configuration, wires the vendor transport, then
//! dispatches to the requested command or starts the HTTP proxy.

mod cli;
mod http;
mod state;

use clap::Parser;

use cli::{Cli, Commands};
use memlens_types::chat::VendorCredentials;
use state::AppState;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let filter = match cli.verbose {
        0 if cli.quiet => "error",
        0 => cli.command.default_filter(),
        1 => "info,memlens=debug,tower_http=debug",
        _ => "trace",
    };
    memlens_observe::tracing_setup::init_tracing(filter, cli.otel)
        .map_err(|e| anyhow::anyhow!("failed to initialize tracing: {e}"))?;

    let mut config = memlens_infra::config::load_config(cli.config.as_deref()).await;

    let result = match cli.command {
        Commands::Serve {
            port,
            host,
            web_dir,
        } => {
            if let Some(port) = port {
                config.port = port;
            }
            if let Some(host) = host {
                config.host = host;
            }
            if let Some(web_dir) = web_dir {
                config.web_dir = web_dir;
            }
            serve(AppState::init(config)?, cli.quiet).await
        }

        Commands::CheckKey {
            vendor,
            api_key,
            api_url,
        } => {
            let state = AppState::init(config)?;
            cli::check_key::check(&state, vendor, api_key, api_url, cli.json).await
        }

        Commands::Compare {
            message,
            session_id,
            mem0_api_key,
            mem0_api_url,
            zep_api_key,
            zep_api_url,
        } => {
            let state = AppState::init(config)?;
            let args = cli::compare::CompareArgs {
                message,
                session_id,
                mem0: VendorCredentials {
                    api_key: mem0_api_key,
                    api_url: mem0_api_url,
                },
                zep: VendorCredentials {
                    api_key: zep_api_key,
                    api_url: zep_api_url,
                },
            };
            cli::compare::run(&state, args, cli.json).await
        }
    };

    memlens_observe::tracing_setup::shutdown_tracing();
    result
}

async fn serve(state: AppState, quiet: bool) -> anyhow::Result<()> {
    let addr = format!("{}:{}", state.config.host, state.config.port);
    let listener = tokio::net::TcpListener::bind(&addr).await?;

    if state.config.zep.api_key.is_none() {
        tracing::warn!("ZEP_API_KEY is not set; Zep requests must carry their own apiKey");
    }

    if !quiet {
        println!(
            "  {} memlens proxy listening on {}",
            console::style("⚡").bold(),
            console::style(format!("http://{addr}")).cyan()
        );
        println!("  {}", console::style("Press Ctrl+C to stop").dim());
    }

    let router = http::router::build_router(state);

    axum::serve(listener, router)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    if !quiet {
        println!("\n  Server stopped.");
    }
    Ok(())
}

/// Wait for Ctrl+C or SIGTERM for graceful shutdown.
async fn shutdown_signal() {
    let ctrl_c = async {
        tokio::signal::ctrl_c()
            .await
            .expect("failed to install Ctrl+C handler");
    };

    #[cfg(unix)]
    let terminate = async {
        tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate())
            .expect("failed to install SIGTERM handler")
            .recv()
            .await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }
}
