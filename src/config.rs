use std::net::SocketAddr;

use anyhow::Context;

#[derive(Clone, Debug)]
pub struct Config {
    pub addr: SocketAddr,
    pub database_url: String,
    pub omdb_api_key: String,
    pub omdb_api_url: String,
    pub secret_key: String,
    pub debug: bool,
}

impl Config {
    pub fn from_env() -> anyhow::Result<Self> {
        dotenvy::dotenv().ok();

        let host = std::env::var("HOST").unwrap_or_else(|_| "0.0.0.0".to_string());
        let port: u16 =
            std::env::var("PORT").unwrap_or_else(|_| "5005".to_string()).parse().context("PORT")?;

        let database_url = std::env::var("DATABASE_URL")
            .unwrap_or_else(|_| "sqlite://movies.db?mode=rwc".to_string());

        let omdb_api_key = std::env::var("OMDB_API_KEY").unwrap_or_else(|_| "".to_string());
        let omdb_api_url = std::env::var("OMDB_API_URL")
            .unwrap_or_else(|_| "http://www.omdbapi.com".to_string());

        // Signs the flash/session cookies.
        let secret_key = std::env::var("SECRET_KEY")
            .unwrap_or_else(|_| "dev-secret-key-change-in-production".to_string());
        anyhow::ensure!(secret_key.len() >= 32, "SECRET_KEY must be at least 32 bytes");

        let debug =
            std::env::var("APP_ENV").unwrap_or_else(|_| "development".to_string()) != "production";

        Ok(Self {
            addr: format!("{host}:{port}").parse().context("HOST/PORT")?,
            database_url,
            omdb_api_key,
            omdb_api_url,
            secret_key,
            debug,
        })
    }
}
