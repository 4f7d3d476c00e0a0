use crate::configuration::Configuration;
use chrono::NaiveDate;
use clap::Parser;

#[derive(Clone, Debug, Parser)]
#[command(version, about = "Books venue time-slots and rejects overlapping events")]
pub struct ConfigurationHandler {
    /// Port the HTTP server listens on
    #[arg(short, long, default_value_t = 4567)]
    port: u16,

    /// Address the HTTP server binds to
    #[arg(short, long, default_value = "0.0.0.0")]
    bind_address: String,

    /// Seed a few example events on this date (YYYY-MM-DD)
    #[arg(long)]
    example_events: Option<NaiveDate>,
}

impl ConfigurationHandler {
    pub fn parse_arguments() -> Self {
        Self::parse()
    }
}

impl Configuration for ConfigurationHandler {
    fn port(&self) -> u16 {
        self.port
    }

    fn bind_address(&self) -> String {
        self.bind_address.clone()
    }

    fn example_events(&self) -> Option<NaiveDate> {
        self.example_events
    }
}
