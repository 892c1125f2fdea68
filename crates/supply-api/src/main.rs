//! # SupplyLink
//!
//! Marketplace server for street-food vendors and raw-material suppliers.
//!
//! ## Usage
//!
//! ```bash
//! # Optional: enable online payments
//! export STRIPE_SECRET_KEY=sk_test_...
//! export STRIPE_WEBHOOK_SECRET=whsec_...
//!
//! # Run the server
//! supplylink
//! ```

use supply_api::{
    routes,
    state::{AppConfig, AppState},
};
use tracing::{info, Level};
use tracing_subscriber::{fmt, prelude::*, EnvFilter, Layer};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let config = AppConfig::from_env();

    let fmt_layer = if config.json_logs {
        fmt::layer().json().boxed()
    } else {
        fmt::layer().boxed()
    };
    tracing_subscriber::registry()
        .with(fmt_layer)
        .with(
            EnvFilter::builder()
                .with_default_directive(Level::INFO.into())
                .from_env_lossy(),
        )
        .init();

    print_banner();

    let state = AppState::from_config(config)?;

    let addr = state.config.socket_addr()?;
    let is_prod = state.config.is_production();

    info!("Environment: {}", state.config.environment);
    info!("Payment providers: {:?}", state.strategies.providers());

    let app = routes::create_router(state);

    info!("SupplyLink starting on http://{}", addr);

    if !is_prod {
        info!("Health: http://{}/health", addr);
        info!("Checkout: POST http://{}/api/create-checkout-session", addr);
        info!("Webhook: POST http://{}/api/stripe-webhook", addr);
    }

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}

fn print_banner() {
    println!(
        r#"
  SupplyLink
  ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
  Raw materials for street food
  Version: {}
"#,
        env!("CARGO_PKG_VERSION")
    );
}
