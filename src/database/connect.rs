//! Connection options from DSN, credentials and wallet materials

use std::path::Path;
use std::str::FromStr;

use sqlx::postgres::PgConnectOptions;
use sqlx::postgres::PgSslMode;
use tracing::warn;

use crate::config::DatabaseConfig;
use crate::RagChatError;
use crate::Result;

const DEFAULT_PORT: u16 = 5432;

/// Easy-connect DSN: `host[:port][/database]`
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EasyConnect {
    pub host: String,
    pub port: u16,
    pub database: Option<String>,
}

impl EasyConnect {
    pub fn parse(dsn: &str) -> Result<Self> {
        let dsn = dsn.trim();
        let (address, database) = match dsn.split_once('/') {
            Some((address, database)) => (address, Some(database)),
            None => (dsn, None),
        };

        let (host, port) = match address.rsplit_once(':') {
            Some((host, port)) => {
                let port = port
                    .parse::<u16>()
                    .map_err(|_| RagChatError::Config(format!("DSN has an invalid port: {port}")))?;
                (host, port)
            }
            None => (address, DEFAULT_PORT),
        };

        if host.is_empty() {
            return Err(RagChatError::Config(format!("DSN '{dsn}' has no host")));
        }

        Ok(Self {
            host: host.to_string(),
            port,
            database: database.filter(|d| !d.is_empty()).map(str::to_string),
        })
    }
}

fn is_url(dsn: &str) -> bool {
    dsn.starts_with("postgres://") || dsn.starts_with("postgresql://")
}

/// Build connect options; USERNAME and PASSWORD always override the DSN
pub fn connect_options(config: &DatabaseConfig) -> Result<PgConnectOptions> {
    let dsn = config.dsn.trim();
    let mut options = if is_url(dsn) {
        PgConnectOptions::from_str(dsn)
            .map_err(|e| RagChatError::Config(format!("DSN is not a valid URL: {e}")))?
    } else {
        let easy = EasyConnect::parse(dsn)?;
        let mut options = PgConnectOptions::new().host(&easy.host).port(easy.port);
        if let Some(database) = &easy.database {
            options = options.database(database);
        }
        options
    };

    options = options
        .username(&config.username)
        .password(&config.password);

    if let Some(dir) = &config.config_dir {
        let root_cert = Path::new(dir).join("root.crt");
        if root_cert.exists() {
            options = options
                .ssl_root_cert(root_cert)
                .ssl_mode(PgSslMode::VerifyFull);
        } else {
            warn!("CONFIG_DIR is set but {} does not exist", root_cert.display());
        }
    }

    if let Some(dir) = &config.wallet_dir {
        let cert = Path::new(dir).join("client.crt");
        let key = Path::new(dir).join("client.key");
        if cert.exists() && key.exists() {
            options = options.ssl_client_cert(cert).ssl_client_key(key);
            if config.wallet_password.is_some() {
                warn!("WALLET_PASSWORD is set; the client key in WALLET_DIR must be unencrypted");
            }
        } else {
            warn!("WALLET_DIR is set but client.crt/client.key were not found in {dir}");
        }
    }

    Ok(options)
}
