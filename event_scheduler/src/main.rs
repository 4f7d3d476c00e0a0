use crate::{
    backend::ScheduleBackend, booking_store::BookingStore, configuration::Configuration,
    configuration_handler::ConfigurationHandler, http::create_app,
};
use tracing::info;
use tracing_subscriber::EnvFilter;

mod backend;
mod booking_store;
mod configuration;
mod configuration_handler;
mod error;
mod http;
#[cfg(test)]
mod testutils;
mod types;
mod venue_schedule;

#[derive(Clone)]
pub struct AppState<T: ScheduleBackend> {
    pub schedule_backend: T,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    dotenvy::dotenv().ok();
    let env_filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt().with_env_filter(env_filter).init();

    println!("###################");
    println!("# Event Scheduler #");
    println!("###################");

    let configuration = ConfigurationHandler::parse_arguments();

    let booking_store = BookingStore::default();
    if let Some(date) = configuration.example_events() {
        booking_store.insert_example_events(date)?;
        info!(%date, "Inserted example events");
    }

    let address = format!("{}:{}", configuration.bind_address(), configuration.port());
    let listener = tokio::net::TcpListener::bind(&address).await?;
    info!("Accessible at {address}");

    axum::serve(listener, create_app(booking_store)).await?;
    Ok(())
}
