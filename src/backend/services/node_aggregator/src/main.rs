use actix_web::{web, App, HttpServer};
use anyhow::Result;

use node_aggregator::api::{node_routes, AppState};
use node_aggregator::build_services;
use node_aggregator::config::AggregatorConfig;

#[actix_web::main]
async fn main() -> Result<()> {
    // Initialize tracing subscriber
    tracing_subscriber::fmt::init();

    let config = AggregatorConfig::from_env();
    tracing::info!(bind = %config.bind_addr, "starting node_aggregator service");

    let (aggregator, scores) = build_services(&config)?;
    let state = web::Data::new(AppState { aggregator, scores });

    HttpServer::new(move || App::new().app_data(state.clone()).service(node_routes()))
        .bind(&config.bind_addr)?
        .run()
        .await?;

    Ok(())
}
