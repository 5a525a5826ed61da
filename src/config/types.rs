//! Configuration types and CLI options.
//!
//! This module defines enums and structs used for command-line argument parsing
//! and configuration.

use clap::{Parser, ValueEnum};

use crate::config::constants::{
    DEFAULT_BIND_ADDRESS, DEFAULT_CONNECT_TIMEOUT_SECS, DEFAULT_MAX_BODY_BYTES, DEFAULT_PORT,
    DEFAULT_ROUTE_PATH, DEFAULT_TIMEOUT_SECS, DEFAULT_USER_AGENT,
};

/// Logging level for the application.
///
/// Controls the verbosity of log output, from most restrictive (Error) to most
/// verbose (Trace).
#[derive(Clone, Debug, ValueEnum)]
pub enum LogLevel {
    /// Only error messages
    Error,
    /// Error and warning messages
    Warn,
    /// Error, warning, and informational messages
    Info,
    /// All messages except trace
    Debug,
    /// All messages including trace
    Trace,
}

impl From<LogLevel> for log::LevelFilter {
    fn from(l: LogLevel) -> Self {
        match l {
            LogLevel::Error => log::LevelFilter::Error,
            LogLevel::Warn => log::LevelFilter::Warn,
            LogLevel::Info => log::LevelFilter::Info,
            LogLevel::Debug => log::LevelFilter::Debug,
            LogLevel::Trace => log::LevelFilter::Trace,
        }
    }
}

/// Log output format.
///
/// - `Plain`: Human-readable format with colors (default)
/// - `Json`: Structured JSON format for machine parsing
#[derive(Clone, Debug, ValueEnum)]
pub enum LogFormat {
    /// Human-readable format with colors (default)
    Plain,
    /// Structured JSON format for machine parsing
    Json,
}

/// Library configuration (no CLI dependencies).
///
/// # Examples
///
/// ```no_run
/// use fetch_proxy::Config;
///
/// let config = Config {
///     port: 9000,
///     timeout_seconds: 15,
///     ..Default::default()
/// };
/// ```
#[derive(Debug, Clone)]
pub struct Config {
    /// Address the server binds to
    pub bind_address: String,

    /// Port the server listens on
    pub port: u16,

    /// Route the proxy endpoint is mounted on
    pub route_path: String,

    /// Transport timeout for one outbound request, in seconds
    pub timeout_seconds: u64,

    /// TCP/TLS connect timeout, in seconds
    pub connect_timeout_seconds: u64,

    /// Largest upstream body relayed to the caller, in bytes
    pub max_body_bytes: usize,

    /// HTTP User-Agent header value for outbound requests
    pub user_agent: String,

    /// Log level
    pub log_level: LogLevel,

    /// Log format
    pub log_format: LogFormat,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            bind_address: DEFAULT_BIND_ADDRESS.to_string(),
            port: DEFAULT_PORT,
            route_path: DEFAULT_ROUTE_PATH.to_string(),
            timeout_seconds: DEFAULT_TIMEOUT_SECS,
            connect_timeout_seconds: DEFAULT_CONNECT_TIMEOUT_SECS,
            max_body_bytes: DEFAULT_MAX_BODY_BYTES,
            user_agent: DEFAULT_USER_AGENT.to_string(),
            log_level: LogLevel::Info,
            log_format: LogFormat::Plain,
        }
    }
}

/// Command-line options for the `fetch_proxy` binary.
///
/// # Examples
///
/// ```bash
/// # Listen on the defaults (127.0.0.1:8787, /api/proxy)
/// fetch_proxy
///
/// # Public interface, custom route, shorter upstream timeout
/// fetch_proxy --bind-address 0.0.0.0 --route-path /proxy --timeout-seconds 10
/// ```
#[derive(Debug, Parser)]
#[command(
    name = "fetch_proxy",
    about = "Forwards browser requests to public URLs, refusing private and internal addresses."
)]
pub struct Opt {
    /// Address to bind to
    #[arg(long, env = "FETCH_PROXY_BIND", default_value = DEFAULT_BIND_ADDRESS)]
    pub bind_address: String,

    /// Port to listen on
    #[arg(long, env = "FETCH_PROXY_PORT", default_value_t = DEFAULT_PORT)]
    pub port: u16,

    /// Route the proxy endpoint is mounted on
    #[arg(long, default_value = DEFAULT_ROUTE_PATH)]
    pub route_path: String,

    /// Per-request upstream timeout in seconds
    #[arg(long, default_value_t = DEFAULT_TIMEOUT_SECS)]
    pub timeout_seconds: u64,

    /// Upstream connect timeout in seconds
    #[arg(long, default_value_t = DEFAULT_CONNECT_TIMEOUT_SECS)]
    pub connect_timeout_seconds: u64,

    /// Largest upstream body to relay, in bytes
    #[arg(long, default_value_t = DEFAULT_MAX_BODY_BYTES)]
    pub max_body_bytes: usize,

    /// HTTP User-Agent header value for outbound requests
    #[arg(long, default_value = DEFAULT_USER_AGENT)]
    pub user_agent: String,

    /// Log level: error|warn|info|debug|trace
    #[arg(long, value_enum, default_value_t = LogLevel::Info)]
    pub log_level: LogLevel,

    /// Log format: plain|json
    #[arg(long, value_enum, default_value_t = LogFormat::Plain)]
    pub log_format: LogFormat,
}

impl From<Opt> for Config {
    fn from(opt: Opt) -> Self {
        Self {
            bind_address: opt.bind_address,
            port: opt.port,
            route_path: opt.route_path,
            timeout_seconds: opt.timeout_seconds,
            connect_timeout_seconds: opt.connect_timeout_seconds,
            max_body_bytes: opt.max_body_bytes,
            user_agent: opt.user_agent,
            log_level: opt.log_level,
            log_format: opt.log_format,
        }
    }
}
