use clap::builder::TypedValueParser as _;
use clap::Parser;
use dotenvy::dotenv;
use log::LevelFilter;
use std::fmt;
use std::str::FromStr;
use std::time::Duration;

/// Name of the Postgresql database the service would connect to.
pub const DATABASE_NAME: &str = "meeting_analyzer_db";

#[derive(Clone, Debug, PartialEq)]
pub enum RustEnv {
    Development,
    Production,
    Staging,
}

#[derive(Debug, PartialEq, Eq)]
pub struct RustEnvParseError;

impl FromStr for RustEnv {
    type Err = RustEnvParseError;
    fn from_str(level: &str) -> Result<RustEnv, Self::Err> {
        match level.to_lowercase().as_str() {
            "development" => Ok(RustEnv::Development),
            "production" => Ok(RustEnv::Production),
            "staging" => Ok(RustEnv::Staging),
            _ => Err(RustEnvParseError),
        }
    }
}

impl fmt::Display for RustEnv {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            RustEnv::Development => write!(f, "development"),
            RustEnv::Production => write!(f, "production"),
            RustEnv::Staging => write!(f, "staging"),
        }
    }
}

#[derive(Clone, Debug, Parser)]
#[command(author, version, about, long_about = None)]
pub struct Config {
    /// The host interface to listen for incoming connections
    #[arg(short, long, env, default_value = "127.0.0.1")]
    pub interface: Option<String>,

    /// The host TCP port to listen for incoming connections
    #[arg(short, long, env, default_value_t = 8080)]
    pub port: u16,

    /// Seconds to wait for in-flight requests to finish after a termination signal
    #[arg(long, env, default_value_t = 5)]
    pub shutdown_grace_period_secs: u64,

    /// Upper bound in seconds for handling a single inbound request. Must cover every
    /// completion attempt plus the backoff between them.
    #[arg(long, env, default_value_t = 200)]
    pub request_timeout_secs: u64,

    /// Seconds a client gets to send the complete request headers
    #[arg(long, env, default_value_t = 5)]
    pub header_read_timeout_secs: u64,

    /// The chat-completion endpoint summaries are generated with
    #[arg(long, env)]
    completion_url: Option<String>,

    /// The bearer credential sent to the chat-completion endpoint.
    #[arg(long, env)]
    completion_api_key: Option<String>,

    /// The model identifier requested from the chat-completion endpoint.
    #[arg(long, env)]
    completion_model: Option<String>,

    /// Optional provider session identifier attached to every completion request.
    #[arg(long, env)]
    completion_session_id: Option<String>,

    /// Optional provider chat identifier attached to every completion request.
    #[arg(long, env)]
    completion_chat_id: Option<String>,

    /// Optional provider message identifier attached to every completion request.
    #[arg(long, env)]
    completion_message_id: Option<String>,

    /// Timeout in seconds for a single call to the chat-completion endpoint
    #[arg(long, env, default_value_t = 60)]
    pub completion_timeout_secs: u64,

    /// How many times a completion call is retried after a transport failure.
    /// Responses carrying an HTTP status are never retried.
    #[arg(long, env, default_value_t = 2)]
    pub completion_max_retries: u32,

    /// Keep generated summaries in process memory so they can be listed and fetched.
    /// When disabled, the list and read endpoints answer 501 Not Implemented.
    #[arg(long, env, default_value_t = true, action = clap::ArgAction::Set)]
    pub retain_summaries: bool,

    /// Most summaries kept in memory; the oldest are dropped once the cap is reached.
    #[arg(long, env, default_value_t = 10_000, value_parser = clap::value_parser!(u64).range(1..))]
    pub retain_summaries_max: u64,

    /// Postgresql host (reserved for a database-backed summary store)
    #[arg(long, env)]
    postgres_host: Option<String>,

    /// Postgresql port
    #[arg(long, env, default_value_t = 5432)]
    postgres_port: u16,

    /// Postgresql user
    #[arg(long, env)]
    postgres_user: Option<String>,

    /// Postgresql password
    #[arg(long, env)]
    postgres_password: Option<String>,

    /// Set the log level verbosity threshold (level) to control what gets displayed on console output
    #[arg(
        short,
        long,
        env,
        default_value_t = LevelFilter::Info,
        value_parser = clap::builder::PossibleValuesParser::new(["OFF", "ERROR", "WARN", "INFO", "DEBUG", "TRACE"])
            .map(|s| s.parse::<LevelFilter>().unwrap()),
        )]
    pub log_level_filter: LevelFilter,

    /// Set the Rust runtime environment to use.
    #[arg(
    short,
    long,
    env,
    default_value_t = RustEnv::Development,
    value_parser = clap::builder::PossibleValuesParser::new([
        "DEVELOPMENT", "PRODUCTION", "STAGING",
        "development", "production", "staging"
    ])
        .map(|s| s.parse::<RustEnv>().unwrap()),
    )]
    pub runtime_env: RustEnv,
}

impl Default for Config {
    fn default() -> Self {
        Self::new()
    }
}

impl Config {
    pub fn new() -> Self {
        // Load .env file first
        dotenv().ok();
        // Then parse the command line parameters and flags
        Config::parse()
    }

    /// Returns the `interface:port` pair the server binds to.
    pub fn bind_address(&self) -> String {
        format!(
            "{}:{}",
            self.interface.as_deref().unwrap_or("127.0.0.1"),
            self.port
        )
    }

    pub fn completion_url(&self) -> Option<String> {
        self.completion_url.clone()
    }

    pub fn completion_api_key(&self) -> Option<String> {
        self.completion_api_key.clone()
    }

    pub fn completion_model(&self) -> Option<String> {
        self.completion_model.clone()
    }

    pub fn completion_session_id(&self) -> Option<String> {
        self.completion_session_id.clone()
    }

    pub fn completion_chat_id(&self) -> Option<String> {
        self.completion_chat_id.clone()
    }

    pub fn completion_message_id(&self) -> Option<String> {
        self.completion_message_id.clone()
    }

    pub fn completion_timeout(&self) -> Duration {
        Duration::from_secs(self.completion_timeout_secs)
    }

    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_secs)
    }

    pub fn header_read_timeout(&self) -> Duration {
        Duration::from_secs(self.header_read_timeout_secs)
    }

    pub fn shutdown_grace_period(&self) -> Duration {
        Duration::from_secs(self.shutdown_grace_period_secs)
    }

    /// Builds the Postgresql connection URL when a database host has been configured.
    pub fn database_url(&self) -> Option<String> {
        let host = self.postgres_host.as_ref()?;
        let user = self.postgres_user.as_deref().unwrap_or("postgres");
        let credentials = match &self.postgres_password {
            Some(password) => format!("{user}:{password}"),
            None => user.to_string(),
        };
        Some(format!(
            "postgres://{credentials}@{host}:{}/{DATABASE_NAME}",
            self.postgres_port
        ))
    }

    pub fn runtime_env(&self) -> RustEnv {
        self.runtime_env.clone()
    }
}
