//! We can have a little hard-coded config, [as a
//! snack](https://knowyourmeme.com/memes/cats-can-have-a-little-salami).
//! Everything here can be overridden from the environment (or a `.env` file).

use anyhow::{Context, Result};
use std::{env, net::SocketAddr, path::PathBuf};

/// Blob-store key holding the whole note collection.
pub const DEFAULT_STORAGE_KEY: &str = "notes";
pub const DEFAULT_DATA_DIR: &str = "./data";
/// Where `htmx.min.js` is served from; the pages work without it.
pub const DEFAULT_ASSETS_DIR: &str = "./assets";
pub const DEFAULT_ADDR: &str = "127.0.0.1:8000";
pub const DEFAULT_LOG_FILTER: &str = "notes=debug,tower_http=info";

/// Number of characters of note content shown on a list card.
pub const PREVIEW_CHARS: usize = 160;

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Config {
    pub addr: SocketAddr,
    pub data_dir: PathBuf,
    pub assets_dir: PathBuf,
    pub storage_key: String,
}

impl Config {
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|name| env::var(name).ok())
    }

    /// Build the config from an arbitrary variable lookup, which keeps tests
    /// away from the process environment.
    pub fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let addr_str =
            lookup("NOTES_ADDR").unwrap_or_else(|| DEFAULT_ADDR.to_string());
        let addr = addr_str
            .parse()
            .with_context(|| format!("NOTES_ADDR {addr_str:?} is not a socket address"))?;
        let data_dir = lookup("NOTES_DATA_DIR")
            .unwrap_or_else(|| DEFAULT_DATA_DIR.to_string())
            .into();
        let assets_dir = lookup("NOTES_ASSETS_DIR")
            .unwrap_or_else(|| DEFAULT_ASSETS_DIR.to_string())
            .into();
        let storage_key = lookup("NOTES_STORAGE_KEY")
            .unwrap_or_else(|| DEFAULT_STORAGE_KEY.to_string());

        Ok(Config {
            addr,
            data_dir,
            assets_dir,
            storage_key,
        })
    }
}
