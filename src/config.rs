use std::io;
use std::path::{Path, PathBuf};

use crate::resolve::lexical_normalize;

pub const DEFAULT_PORT: u16 = 8080;
pub const DEFAULT_STORAGE_ROOT: &str = "storage/pdf";
pub const DEFAULT_STATIC_ROOT: &str = ".";

/// Process-wide settings, resolved once at startup and shared read-only.
#[derive(Debug, Clone)]
pub struct Config {
    pub port: u16,
    pub storage_root: PathBuf,
    pub static_root: PathBuf,
}

impl Config {
    /// Reads `PORT`, `STORAGE_ROOT` and `STATIC_ROOT` from the environment,
    /// falling back to the defaults for missing or malformed values.
    pub fn from_env() -> io::Result<Config> {
        let port = parse_port(std::env::var("PORT").ok().as_deref());
        let storage_root = env_string("STORAGE_ROOT", DEFAULT_STORAGE_ROOT);
        let static_root = env_string("STATIC_ROOT", DEFAULT_STATIC_ROOT);
        Config::new(port, storage_root, static_root)
    }

    /// Normalizes both roots to absolute paths and creates the storage root
    /// if it does not exist yet.
    pub fn new(
        port: u16,
        storage_root: impl AsRef<Path>,
        static_root: impl AsRef<Path>,
    ) -> io::Result<Config> {
        let storage_root = absolute_normalized(storage_root.as_ref())?;
        std::fs::create_dir_all(&storage_root)?;
        let static_root = absolute_normalized(static_root.as_ref())?;
        Ok(Config {
            port,
            storage_root,
            static_root,
        })
    }
}

pub fn parse_port(raw: Option<&str>) -> u16 {
    match raw {
        Some(val) => val.trim().parse().unwrap_or(DEFAULT_PORT),
        None => DEFAULT_PORT,
    }
}

fn env_string(key: &str, default: &str) -> String {
    match std::env::var(key) {
        Ok(val) if !val.trim().is_empty() => val,
        _ => default.to_string(),
    }
}

fn absolute_normalized(path: &Path) -> io::Result<PathBuf> {
    let absolute = if path.is_absolute() {
        path.to_path_buf()
    } else {
        std::env::current_dir()?.join(path)
    };
    Ok(lexical_normalize(&absolute))
}
