//! Teamfight Gateway - HTTP CRUD gateway
//!
//! This is the main entry point for the gateway service.
//!
//! # Configuration
//!
//! - `LISTEN_ADDR`: listen address (default `0.0.0.0:8080`)
//! - `API_GATEWAY_URL`: base URL of the remote table gateway
//! - `AUTH0_DOMAIN`: identity provider domain
//! - `CORS_ORIGINS`: comma-separated allowed origins (default `*`)
//!
//! # Dev Mode
//!
//! Build with `--features dev-mode` to use a mock identity provider that
//! doesn't require network access. Use tokens in format: `test-token:<email>`

use std::sync::Arc;

use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[cfg(feature = "dev-mode")]
use teamfight_auth::MockIdentityProvider;
#[cfg(not(feature = "dev-mode"))]
use teamfight_auth::{AuthConfig, UserInfoClient, DEFAULT_DOMAIN};
use teamfight_control::Dispatcher;
use teamfight_gateway::{create_router, GatewayConfig, GatewayState};
use teamfight_store::{HttpGatewayClient, StoreConfig, DEFAULT_GATEWAY_URL};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Initialize tracing
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info,teamfight=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    tracing::info!("Starting Teamfight Gateway");

    // Load configuration from environment
    let listen_addr = std::env::var("LISTEN_ADDR").unwrap_or_else(|_| "0.0.0.0:8080".into());
    let gateway_url =
        std::env::var("API_GATEWAY_URL").unwrap_or_else(|_| DEFAULT_GATEWAY_URL.into());
    let cors_origins = std::env::var("CORS_ORIGINS").unwrap_or_else(|_| "*".into());

    tracing::info!(
        listen_addr = %listen_addr,
        gateway_url = %gateway_url,
        cors_origins = %cors_origins,
        "Gateway configuration loaded"
    );

    let store_config = StoreConfig {
        base_url: gateway_url,
        ..StoreConfig::default()
    };
    let gateway = Arc::new(HttpGatewayClient::new(&store_config)?);
    tracing::info!(base_url = %gateway.base_url(), "Gateway client initialized");

    // Initialize identity provider
    #[cfg(feature = "dev-mode")]
    let identity = {
        tracing::warn!("DEV MODE ENABLED - using mock identity provider");
        tracing::warn!("Use tokens in format: test-token:<email>");
        Arc::new(MockIdentityProvider)
    };

    #[cfg(not(feature = "dev-mode"))]
    let identity = {
        let domain =
            std::env::var("AUTH0_DOMAIN").unwrap_or_else(|_| DEFAULT_DOMAIN.into());
        let auth_config = AuthConfig::from_domain(&domain);
        tracing::info!(userinfo_url = %auth_config.userinfo_url(), "Identity provider configured");
        Arc::new(UserInfoClient::new(auth_config)?)
    };

    let dispatcher = Arc::new(Dispatcher::with_defaults(gateway, identity));

    // Build gateway state and configuration
    let origins = GatewayConfig::parse_origins(&cors_origins);
    let gateway_config = GatewayConfig {
        listen_addr: listen_addr.clone(),
        cors_origins: if origins.is_empty() {
            vec!["*".to_string()]
        } else {
            origins
        },
        ..GatewayConfig::default()
    };
    let state = GatewayState::new(dispatcher, gateway_config);

    let app = create_router(state);
    tracing::info!("Router configured");

    // Start HTTP server
    tracing::info!(listen_addr = %listen_addr, "Starting HTTP server");
    let listener = tokio::net::TcpListener::bind(&listen_addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
