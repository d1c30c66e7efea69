// Upstream league data provider: wire records and the HTTP client.

pub mod client;
pub mod types;

pub use client::{LeagueApi, SleeperClient};
