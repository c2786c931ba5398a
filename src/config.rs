use std::collections::HashMap;
use std::path::Path;

use serde::Deserialize;
use serde::Serialize;

use crate::options::ChatOptions;
use crate::vector_store::DistanceStrategy;

/// Embedding model used for both queries and stored passages
pub const EMBEDDING_MODEL: &str = "cohere.embed-multilingual-v3.0";

/// Output dimension of [`EMBEDDING_MODEL`]
pub const EMBEDDING_DIMENSION: usize = 1024;

/// Chat model used for answer generation
pub const CHAT_MODEL: &str = "cohere.command-r-plus";

/// Query issued once when the vector store is bound, to verify the setup
pub const PROBE_QUERY: &str = "What is Oracle Database?";

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct DatabaseConfig {
    pub username: String,
    pub password: String,
    /// Either a `postgres://` URL or an easy-connect `host[:port]/database` string
    pub dsn: String,
    /// Directory holding the server CA certificate (`root.crt`)
    pub config_dir: Option<String>,
    /// Directory holding the client certificate and key (`client.crt`, `client.key`)
    pub wallet_dir: Option<String>,
    pub wallet_password: Option<String>,
    pub table_name: String,
    pub max_connections: u32,
    pub min_connections: u32,
    pub connection_timeout: u64,
    pub distance_strategy: DistanceStrategy,
}

impl Default for DatabaseConfig {
    fn default() -> Self {
        Self {
            username: String::new(),
            password: String::new(),
            dsn: String::new(),
            config_dir: None,
            wallet_dir: None,
            wallet_password: None,
            table_name: String::new(),
            max_connections: 5,
            min_connections: 1,
            connection_timeout: 30,
            distance_strategy: DistanceStrategy::Cosine,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct GenAiConfig {
    pub service_endpoint: String,
    pub compartment_id: String,
    pub embedding_model: String,
    pub embedding_dimension: usize,
    pub chat_model: String,
    /// Bearer token sent with every inference call, if set
    pub auth_token: Option<String>,
    pub request_timeout: u64,
    pub probe_query: String,
}

impl Default for GenAiConfig {
    fn default() -> Self {
        Self {
            service_endpoint: String::new(),
            compartment_id: String::new(),
            embedding_model: EMBEDDING_MODEL.to_string(),
            embedding_dimension: EMBEDDING_DIMENSION,
            chat_model: CHAT_MODEL.to_string(),
            auth_token: None,
            request_timeout: 120,
            probe_query: PROBE_QUERY.to_string(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
    pub enable_cors: bool,
    pub session_timeout: u64,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: "127.0.0.1".to_string(),
            port: 8501,
            enable_cors: false,
            session_timeout: 3600,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    pub level: String,
    pub backtrace: bool,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            backtrace: true,
        }
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    pub database: DatabaseConfig,
    pub genai: GenAiConfig,
    pub server: ServerConfig,
    pub logging: LoggingConfig,
    /// Initial values of the chat sidebar
    pub chat: ChatOptions,
}

/// Values read from the process environment
#[derive(Debug, Default, Deserialize)]
pub(crate) struct EnvOverrides {
    username: Option<String>,
    password: Option<String>,
    dsn: Option<String>,
    config_dir: Option<String>,
    wallet_dir: Option<String>,
    wallet_password: Option<String>,
    table_name: Option<String>,
    compartment_id: Option<String>,
    service_endpoint: Option<String>,
    genai_auth_token: Option<String>,
}

impl EnvOverrides {
    /// Read overrides through the `config` crate; `None` reads the real environment
    pub(crate) fn collect(source: Option<HashMap<String, String>>) -> crate::Result<Self> {
        let environment = config::Environment::default().source(source);
        let settings = config::Config::builder().add_source(environment).build()?;
        Ok(settings.try_deserialize()?)
    }
}

fn non_empty(value: Option<String>) -> Option<String> {
    value.filter(|v| !v.trim().is_empty())
}

impl AppConfig {
    /// Load configuration from a TOML file
    pub fn from_file<P: AsRef<Path>>(path: P) -> crate::Result<Self> {
        let content = std::fs::read_to_string(path)?;
        let config: AppConfig = toml::from_str(&content)?;
        Ok(config)
    }

    /// Load the file layer without validating it or applying the environment
    pub fn load_file_layer() -> crate::Result<Self> {
        if Path::new("config.toml").exists() {
            Self::from_file("config.toml")
        } else if Path::new("config.example.toml").exists() {
            println!(
                "Warning: Using config.example.toml. Please create config.toml for production use."
            );
            Self::from_file("config.example.toml")
        } else {
            Ok(Self::default())
        }
    }

    /// Load file layer and environment, without validation
    pub fn load_unchecked() -> crate::Result<Self> {
        let mut config = Self::load_file_layer()?;
        config.apply_env(EnvOverrides::collect(None)?);
        Ok(config)
    }

    /// Load configuration: `config.toml` (if any), then the environment, then validate
    pub fn load() -> crate::Result<Self> {
        let config = Self::load_unchecked()?;
        config.validate()?;
        Ok(config)
    }

    /// Build a validated configuration from defaults plus an explicit variable map
    pub fn from_env_map(vars: HashMap<String, String>) -> crate::Result<Self> {
        let mut config = Self::default();
        config.apply_env(EnvOverrides::collect(Some(vars))?);
        config.validate()?;
        Ok(config)
    }

    pub(crate) fn apply_env(&mut self, env: EnvOverrides) {
        if let Some(v) = non_empty(env.username) {
            self.database.username = v;
        }
        if let Some(v) = non_empty(env.password) {
            self.database.password = v;
        }
        if let Some(v) = non_empty(env.dsn) {
            self.database.dsn = v;
        }
        if let Some(v) = non_empty(env.table_name) {
            self.database.table_name = v;
        }
        if let Some(v) = non_empty(env.config_dir) {
            self.database.config_dir = Some(v);
        }
        if let Some(v) = non_empty(env.wallet_dir) {
            self.database.wallet_dir = Some(v);
        }
        if let Some(v) = non_empty(env.wallet_password) {
            self.database.wallet_password = Some(v);
        }
        if let Some(v) = non_empty(env.compartment_id) {
            self.genai.compartment_id = v;
        }
        if let Some(v) = non_empty(env.service_endpoint) {
            self.genai.service_endpoint = v.trim_end_matches('/').to_string();
        }
        if let Some(v) = non_empty(env.genai_auth_token) {
            self.genai.auth_token = Some(v);
        }
    }

    /// Check that every required value is present and well-formed
    pub fn validate(&self) -> crate::Result<()> {
        let required = [
            ("USERNAME", &self.database.username),
            ("PASSWORD", &self.database.password),
            ("DSN", &self.database.dsn),
            ("TABLE_NAME", &self.database.table_name),
            ("COMPARTMENT_ID", &self.genai.compartment_id),
            ("SERVICE_ENDPOINT", &self.genai.service_endpoint),
        ];
        for (name, value) in required {
            if value.trim().is_empty() {
                return Err(crate::RagChatError::Config(format!("{name} is not set")));
            }
        }

        validate_table_name(&self.database.table_name)?;

        let endpoint = url::Url::parse(&self.genai.service_endpoint).map_err(|e| {
            crate::RagChatError::Config(format!("SERVICE_ENDPOINT is not a valid URL: {e}"))
        })?;
        if !matches!(endpoint.scheme(), "http" | "https") {
            return Err(crate::RagChatError::Config(format!(
                "SERVICE_ENDPOINT must be http(s), got {}",
                endpoint.scheme()
            )));
        }

        if self.genai.embedding_dimension == 0 {
            return Err(crate::RagChatError::Config(
                "genai.embedding_dimension must be positive".to_string(),
            ));
        }

        self.chat.validate()
    }

    /// Get target table name
    pub fn table_name(&self) -> &str {
        &self.database.table_name
    }

    /// Get max connections for database pool
    pub fn max_connections(&self) -> u32 {
        self.database.max_connections
    }

    /// Get min connections for database pool
    pub fn min_connections(&self) -> u32 {
        self.database.min_connections
    }

    /// Get connection timeout in seconds
    pub fn connection_timeout(&self) -> u64 {
        self.database.connection_timeout
    }

    /// Get embedding dimension
    pub fn embedding_dimension(&self) -> usize {
        self.genai.embedding_dimension
    }

    /// Get inference service endpoint
    pub fn service_endpoint(&self) -> &str {
        &self.genai.service_endpoint
    }
}

/// Table names are interpolated into SQL, so only plain identifiers are accepted
pub fn validate_table_name(name: &str) -> crate::Result<()> {
    let mut chars = name.chars();
    let valid_start = chars
        .next()
        .is_some_and(|c| c.is_ascii_alphabetic() || c == '_');
    let valid_rest = chars.all(|c| c.is_ascii_alphanumeric() || c == '_');
    if valid_start && valid_rest && name.len() <= 63 {
        Ok(())
    } else {
        Err(crate::RagChatError::Config(format!(
            "TABLE_NAME '{name}' is not a plain SQL identifier"
        )))
    }
}
