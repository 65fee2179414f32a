use actix_cors::Cors;
use actix_web::{web, App, HttpServer};
use anyhow::{Context, Result};
use clap::Parser;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use secscan::api::{self, AppState};
use secscan::Config;

#[derive(Parser)]
#[command(name = "secscan-server", about = "AI-assisted security analysis gateway")]
struct Args {
    /// Address to bind the HTTP server to
    #[arg(long, env = "BIND_ADDR", default_value = "0.0.0.0:8000")]
    bind: String,
}

#[actix_web::main]
async fn main() -> Result<()> {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "secscan=info,actix_web=info".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let args = Args::parse();
    let config = Config::from_env().context("Failed to load configuration")?;
    tracing::info!(provider = %config.provider, model = %config.model, "engine configured");

    let state = AppState::from_config(config).context("Failed to initialize application state")?;

    tracing::info!("secscan server listening on {}", args.bind);

    HttpServer::new(move || {
        App::new()
            .app_data(web::Data::new(state.clone()))
            .wrap(Cors::permissive())
            .configure(api::configure_routes)
    })
    .bind(&args.bind)?
    .run()
    .await?;

    Ok(())
}
