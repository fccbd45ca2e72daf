// crates/server/src/config.rs
//! Environment-backed server configuration.

use std::path::PathBuf;
use std::time::Duration;

/// Default port for the server.
const DEFAULT_PORT: u16 = 3000;

/// Default bounded wait on one transcription call (10 minutes; large audio
/// can legitimately take a while, but a hung call must not strand a job).
const DEFAULT_BACKEND_TIMEOUT_SECS: u64 = 600;

/// Runtime configuration, read once at startup.
#[derive(Debug, Clone)]
pub struct Config {
    /// Listen port (`SUBGEN_PORT`, falling back to `PORT`).
    pub port: u16,
    /// Directory for in-flight uploads (`SUBGEN_UPLOAD_DIR`).
    pub upload_dir: PathBuf,
    /// Directory for finished subtitle files (`SUBGEN_OUTPUT_DIR`).
    pub output_dir: PathBuf,
    /// OpenAI credential (`OPENAI_API_KEY`). Never logged.
    pub api_key: Option<String>,
    /// Bounded wait per transcription call (`SUBGEN_BACKEND_TIMEOUT_SECS`).
    pub backend_timeout: Duration,
    /// Optional static UI directory (`STATIC_DIR`, or `./public` if present).
    pub static_dir: Option<PathBuf>,
}

impl Config {
    pub fn from_env() -> Self {
        Self {
            port: std::env::var("SUBGEN_PORT")
                .ok()
                .or_else(|| std::env::var("PORT").ok())
                .and_then(|p| p.parse().ok())
                .unwrap_or(DEFAULT_PORT),
            upload_dir: std::env::var("SUBGEN_UPLOAD_DIR")
                .map(PathBuf::from)
                .unwrap_or_else(|_| PathBuf::from("uploads")),
            output_dir: std::env::var("SUBGEN_OUTPUT_DIR")
                .map(PathBuf::from)
                .unwrap_or_else(|_| PathBuf::from("outputs")),
            api_key: std::env::var("OPENAI_API_KEY").ok(),
            backend_timeout: Duration::from_secs(
                std::env::var("SUBGEN_BACKEND_TIMEOUT_SECS")
                    .ok()
                    .and_then(|s| s.parse().ok())
                    .unwrap_or(DEFAULT_BACKEND_TIMEOUT_SECS),
            ),
            static_dir: Self::static_dir(),
        }
    }

    /// Static UI directory, if any.
    ///
    /// Priority:
    /// 1. STATIC_DIR environment variable (explicit override)
    /// 2. ./public directory (if it exists)
    /// 3. None (API-only mode)
    fn static_dir() -> Option<PathBuf> {
        std::env::var("STATIC_DIR")
            .ok()
            .map(PathBuf::from)
            .or_else(|| {
                let public = PathBuf::from("public");
                public.is_dir().then_some(public)
            })
    }
}
