use crate::github::Github;
use crate::rollout::FlagRollout;
use crate::server::config::ServerConfig;
use anyhow::Result;
use axum::Router;
use axum::routing::{get, post};
use std::sync::Arc;
use tower_http::trace::{DefaultMakeSpan, DefaultOnRequest, DefaultOnResponse, TraceLayer};
use tracing::{Level, info};

pub mod config;
mod handlers;
mod responses;

pub struct Server {
    pub address: std::net::Ipv4Addr,
    pub port: u16,

    rollout: Arc<FlagRollout>,
}

#[derive(Clone)]
pub struct AppState {
    rollout: Arc<FlagRollout>,
}

impl Server {
    pub fn new(config: &ServerConfig) -> Result<Self> {
        config.validate()?;

        let github = Github::new(
            &config.github_token,
            &config.github_api_url,
            config.repository.clone(),
        )?;
        let rollout = FlagRollout::new(Arc::new(github), config.rollout.clone());

        info!(
            "Managing flags in {} (base branch {}, branch prefix {})",
            config.repository, config.rollout.base_branch, config.rollout.branch_prefix
        );

        Ok(Server {
            address: config.address,
            port: config.port,
            rollout: Arc::new(rollout),
        })
    }

    pub async fn start(&self) -> Result<()> {
        let listener = tokio::net::TcpListener::bind((self.address, self.port)).await?;
        info!("Server started on {}", listener.local_addr()?);

        axum::serve(
            listener,
            get_router(AppState {
                rollout: self.rollout.clone(),
            }),
        )
        .await?;

        Ok(())
    }
}

/// Creates the Axum router with the webhook route and the tracing middleware.
fn get_router(state: AppState) -> Router {
    let cors = tower_http::cors::CorsLayer::new()
        .allow_origin(tower_http::cors::Any)
        .allow_methods(tower_http::cors::Any)
        .allow_headers(tower_http::cors::Any);

    Router::new()
        .route("/", get(handlers::health))
        .route("/webhook", post(handlers::webhook))
        .layer(
            TraceLayer::new_for_http()
                .make_span_with(DefaultMakeSpan::new().include_headers(true))
                .on_request(DefaultOnRequest::new().level(Level::INFO))
                .on_response(
                    DefaultOnResponse::new()
                        .level(Level::INFO)
                        .latency_unit(tower_http::LatencyUnit::Micros),
                ),
        )
        .layer(cors)
        .with_state(state)
}
