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

use anyhow::Result;
use axum::Router;
use log::{error, info};
use std::path::PathBuf;
use std::sync::Arc;

use crate::api;
use crate::config::{load_config_file, TrafficCountsConfig};
use crate::csv_export::CsvCache;
use crate::service::CountService;
use crate::store::{CountStore, PgCountStore};

pub struct TrafficCountsServer {
    config: TrafficCountsConfig,
    service: Arc<CountService>,
    csv_cache: Arc<CsvCache>,
    pool: Option<sqlx::PgPool>,
}

impl TrafficCountsServer {
    /// Create a server from a configuration file, backed by PostgreSQL.
    ///
    /// The connection pool is lazy: the server starts even when the database
    /// is down, and requests fail with 503 until it is reachable.
    pub async fn new(config_path: PathBuf, port_override: Option<u16>) -> Result<Self> {
        let mut config = load_config_file(&config_path)?;
        if let Some(port) = port_override {
            config.port = port;
        }

        let store = PgCountStore::connect_lazy(&config.database);
        let pool = store.pool().clone();
        info!(
            "Using database '{}' at {}:{} (max {} connections)",
            config.database.name,
            config.database.host,
            config.database.port,
            config.database.max_connections
        );

        let mut server = Self::with_store(config, Arc::new(store));
        server.pool = Some(pool);
        Ok(server)
    }

    /// Create a server over any count store.
    pub fn with_store(config: TrafficCountsConfig, store: Arc<dyn CountStore>) -> Self {
        let service = Arc::new(CountService::new(store, &config.static_pdf_base_url));
        let csv_cache = Arc::new(CsvCache::new(&config.csv_cache_dir));
        Self {
            config,
            service,
            csv_cache,
            pool: None,
        }
    }

    pub fn config(&self) -> &TrafficCountsConfig {
        &self.config
    }

    /// The application router, as served by [`run`](Self::run).
    pub fn router(&self) -> Router {
        api::build_router(
            self.service.clone(),
            self.csv_cache.clone(),
            &self.config.url_prefix,
        )
    }

    /// Serve the API until Ctrl-C.
    pub async fn run(self) -> Result<()> {
        tokio::fs::create_dir_all(self.csv_cache.root()).await?;
        info!("CSV cache directory: {}", self.csv_cache.root().display());

        self.start_api().await?;
        info!(
            "Traffic Counts API started successfully on port {}",
            self.config.port
        );

        tokio::signal::ctrl_c().await?;

        info!("Shutting down Traffic Counts API");
        if let Some(pool) = &self.pool {
            pool.close().await;
        }

        Ok(())
    }

    async fn start_api(&self) -> Result<()> {
        let app = self.router();

        let addr = format!("{}:{}", self.config.host, self.config.port);
        let prefix = &self.config.url_prefix;
        info!("Starting web API on {addr}");
        info!("API v1 available at http://{addr}{prefix}/v1/");
        info!("API v2 available at http://{addr}{prefix}/v2/");
        info!("Swagger UI available at http://{addr}{prefix}/v2/docs/");

        let listener = tokio::net::TcpListener::bind(&addr).await?;

        tokio::spawn(async move {
            if let Err(e) = axum::serve(listener, app).await {
                error!("Web API server error: {e}");
            }
        });

        Ok(())
    }
}
