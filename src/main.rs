// Copyright 2025 The Traffic Counts API Authors.
//
// Licensed under the Apache License, Version 2.0 (the "License");
// you may not use this file except in compliance with the License.
// You may obtain a copy of the License at
//
//     http://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing, software
// distributed under the License is distributed on an "AS IS" BASIS,
// WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
// See the License for the specific language governing permissions and
// limitations under the License.

// Allow println! in main.rs for CLI user-facing output (validate command)
#![allow(clippy::print_stdout)]

use anyhow::Result;
use clap::{Parser, Subcommand};
use log::{debug, info};
use std::path::{Path, PathBuf};

use traffic_counts_api::{load_config_file, TrafficCountsServer};

#[derive(Parser)]
#[command(name = "traffic-counts-api")]
#[command(about = "Read-only HTTP API over DVRPC's traffic counts database")]
#[command(version = env!("CARGO_PKG_VERSION"))]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,

    /// Path to the configuration file
    #[arg(short, long, default_value = "config/server.yaml", global = true)]
    config: PathBuf,

    /// Override the server port
    #[arg(short, long, global = true)]
    port: Option<u16>,
}

#[derive(Subcommand)]
enum Commands {
    /// Run the server (default if no subcommand specified)
    Run,

    /// Validate a configuration file without starting the server
    Validate {
        /// Show resolved configuration with environment variables expanded
        #[arg(long)]
        show_resolved: bool,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    match cli.command {
        Some(Commands::Validate { show_resolved }) => validate_config(&cli.config, show_resolved),
        Some(Commands::Run) | None => run_server(cli.config, cli.port).await,
    }
}

/// Load `.env` from the config file's directory, if there is one.
fn load_env_file(config_path: &Path) -> bool {
    let Some(env_file) = config_path.parent().map(|dir| dir.join(".env")) else {
        return false;
    };
    if !env_file.exists() {
        return false;
    }
    match dotenvy::from_path(&env_file) {
        Ok(_) => true,
        Err(e) => {
            eprintln!("Warning: Failed to load .env file: {e}");
            false
        }
    }
}

async fn run_server(config_path: PathBuf, port_override: Option<u16>) -> Result<()> {
    let env_file_loaded = load_env_file(&config_path);

    let config = load_config_file(&config_path)?;

    // Log level from config unless RUST_LOG was set by the user
    if std::env::var("RUST_LOG").is_err() {
        std::env::set_var("RUST_LOG", &config.log_level);
    }
    env_logger::init();

    info!("Starting Traffic Counts API");
    debug!("Debug logging is enabled");

    if env_file_loaded {
        info!("Loaded environment variables from .env file");
    }
    info!("Config file: {}", config_path.display());
    debug!("Server configuration: {config:?}");

    let server = TrafficCountsServer::new(config_path, port_override).await?;
    server.run().await?;

    Ok(())
}

/// Validate a configuration file
fn validate_config(config_path: &Path, show_resolved: bool) -> Result<()> {
    println!("Validating configuration: {}", config_path.display());
    println!();

    if !config_path.exists() {
        println!(
            "[ERROR] Configuration file not found: {}",
            config_path.display()
        );
        std::process::exit(1);
    }

    load_env_file(config_path);

    match load_config_file(config_path) {
        Ok(config) => {
            println!("[OK] Configuration file is valid");

            if show_resolved {
                println!();
                println!("Resolved server settings:");
                println!("  Host: {}", config.host);
                println!("  Port: {}", config.port);
                println!("  Log Level: {}", config.log_level);
                println!("  URL Prefix: {}", config.url_prefix);
                println!("  CSV Cache Dir: {}", config.csv_cache_dir.display());
                println!("  Static PDF Base URL: {}", config.static_pdf_base_url);
                println!("  Database: {:?}", config.database);
            }

            Ok(())
        }
        Err(e) => {
            println!("[ERROR] Configuration is invalid:");
            println!("  {e}");
            std::process::exit(1);
        }
    }
}
