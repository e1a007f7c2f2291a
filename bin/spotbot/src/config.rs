//! Runtime configuration, read once from the environment at startup.

use anyhow::Context;
use std::env;

pub struct Config {
    pub port: u16,
    pub database_url: String,
    pub storage_root: String,
    pub storage_url_prefix: String,
    pub chat_api_base: String,
    pub chat_token: String,
    /// The competitive period every ranking query is scoped to, e.g. "fa24".
    pub semester: String,
}

impl Config {
    pub fn load() -> anyhow::Result<Self> {
        Ok(Self {
            port: optional("PORT", "3000").parse().context("invalid PORT")?,
            database_url: optional("DATABASE_URL", "sqlite:spotbot.db"),
            storage_root: optional("STORAGE_ROOT", "./data/spots"),
            storage_url_prefix: optional("STORAGE_URL_PREFIX", "http://localhost:3000/spots"),
            chat_api_base: required("CHAT_API_BASE")?,
            chat_token: required("CHAT_TOKEN")?,
            semester: required("CURRENT_SEMESTER")?,
        })
    }
}

fn optional(key: &str, default: &str) -> String {
    env::var(key).unwrap_or_else(|_| {
        log::info!("{key} not set, using default: {default}");
        default.to_string()
    })
}

fn required(key: &str) -> anyhow::Result<String> {
    env::var(key).with_context(|| format!("{key} must be set"))
}
