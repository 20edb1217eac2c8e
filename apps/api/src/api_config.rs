use std::env;
use std::net::{IpAddr, SocketAddr};
use std::str::FromStr;
use std::time::Duration;

use hsg_application::{DEFAULT_LOOKUP_TIMEOUT, DEFAULT_RATE_LIMIT};
use hsg_core::AppError;
use hsg_infrastructure::MIN_URL_SECRET_LENGTH;
use ipnet::IpNet;
use tracing_subscriber::EnvFilter;

/// Where intakes, cases and documents are persisted.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PersistenceBackend {
    Postgres,
    Memory,
}

impl PersistenceBackend {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Postgres => "postgres",
            Self::Memory => "memory",
        }
    }

    fn parse(value: &str) -> Result<Self, AppError> {
        match value.trim().to_ascii_lowercase().as_str() {
            "postgres" => Ok(Self::Postgres),
            "memory" => Ok(Self::Memory),
            other => Err(AppError::Validation(format!(
                "PERSISTENCE_BACKEND must be either 'postgres' or 'memory', got '{other}'"
            ))),
        }
    }
}

#[derive(Debug, Clone)]
pub struct ApiConfig {
    pub migrate_only: bool,
    pub persistence_backend: PersistenceBackend,
    pub database_url: Option<String>,
    pub admin_token: String,
    pub frontend_url: String,
    pub app_env: String,
    pub api_host: String,
    pub api_port: u16,
    pub intake_rate_limit: u32,
    pub intake_rate_window_ms: u64,
    pub case_number_lookup_timeout: Duration,
    pub document_storage_dir: String,
    pub document_url_secret: String,
    pub public_api_url: String,
    pub trusted_proxies: Vec<IpNet>,
}

impl ApiConfig {
    pub fn load() -> Result<Self, AppError> {
        let migrate_only = env::args().nth(1).as_deref() == Some("migrate");

        let persistence_backend = PersistenceBackend::parse(
            env::var("PERSISTENCE_BACKEND")
                .unwrap_or_else(|_| "postgres".to_owned())
                .as_str(),
        )?;
        let database_url = match persistence_backend {
            PersistenceBackend::Postgres => Some(required_non_empty_env("DATABASE_URL")?),
            PersistenceBackend::Memory => env::var("DATABASE_URL").ok(),
        };
        if migrate_only && database_url.is_none() {
            return Err(AppError::Validation(
                "DATABASE_URL is required to run migrations".to_owned(),
            ));
        }

        let admin_token = required_non_empty_env("ADMIN_TOKEN")?;
        let frontend_url =
            env::var("FRONTEND_URL").unwrap_or_else(|_| "http://localhost:3000".to_owned());
        let app_env = env::var("APP_ENV").unwrap_or_else(|_| "development".to_owned());

        let api_host = env::var("API_HOST").unwrap_or_else(|_| "127.0.0.1".to_owned());
        let api_port = env::var("API_PORT")
            .ok()
            .and_then(|value| value.parse::<u16>().ok())
            .unwrap_or(3001);

        let intake_rate_limit = parse_positive_env("INTAKE_RATE_LIMIT", DEFAULT_RATE_LIMIT)?;
        let intake_rate_window_seconds = parse_positive_env("INTAKE_RATE_WINDOW_SECONDS", 60_u64)?;
        let lookup_timeout_ms = parse_positive_env(
            "CASE_NUMBER_LOOKUP_TIMEOUT_MS",
            u64::try_from(DEFAULT_LOOKUP_TIMEOUT.as_millis()).unwrap_or(5_000),
        )?;

        let document_storage_dir = env::var("DOCUMENT_STORAGE_DIR")
            .unwrap_or_else(|_| "./storage/case-documents".to_owned());
        let document_url_secret = required_env("DOCUMENT_URL_SECRET")?;
        if document_url_secret.len() < MIN_URL_SECRET_LENGTH {
            return Err(AppError::Validation(format!(
                "DOCUMENT_URL_SECRET must be at least {MIN_URL_SECRET_LENGTH} characters"
            )));
        }
        let public_api_url = env::var("PUBLIC_API_URL")
            .unwrap_or_else(|_| format!("http://{api_host}:{api_port}"));

        let trusted_proxies =
            parse_trusted_proxies(env::var("TRUSTED_PROXY_CIDRS").unwrap_or_default().as_str())?;

        Ok(Self {
            migrate_only,
            persistence_backend,
            database_url,
            admin_token,
            frontend_url,
            app_env,
            api_host,
            api_port,
            intake_rate_limit,
            intake_rate_window_ms: intake_rate_window_seconds.saturating_mul(1000),
            case_number_lookup_timeout: Duration::from_millis(lookup_timeout_ms),
            document_storage_dir,
            document_url_secret,
            public_api_url,
            trusted_proxies,
        })
    }

    pub fn is_production(&self) -> bool {
        self.app_env.eq_ignore_ascii_case("production")
    }

    pub fn socket_address(&self) -> Result<SocketAddr, AppError> {
        let host = IpAddr::from_str(&self.api_host).map_err(|error| {
            AppError::Internal(format!("invalid API_HOST '{}': {error}", self.api_host))
        })?;
        Ok(SocketAddr::from((host, self.api_port)))
    }
}

pub fn init_tracing() {
    let env_filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));

    tracing_subscriber::fmt()
        .with_env_filter(env_filter)
        .with_target(false)
        .compact()
        .init();
}

/// Parses a comma-separated list of CIDRs or bare addresses.
pub fn parse_trusted_proxies(value: &str) -> Result<Vec<IpNet>, AppError> {
    value
        .split(',')
        .map(str::trim)
        .filter(|entry| !entry.is_empty())
        .map(|entry| {
            entry
                .parse::<IpNet>()
                .or_else(|_| entry.parse::<IpAddr>().map(IpNet::from))
                .map_err(|error| {
                    AppError::Validation(format!(
                        "invalid TRUSTED_PROXY_CIDRS entry '{entry}': {error}"
                    ))
                })
        })
        .collect()
}

fn required_env(name: &str) -> Result<String, AppError> {
    env::var(name).map_err(|_| AppError::Validation(format!("{name} is required")))
}

fn required_non_empty_env(name: &str) -> Result<String, AppError> {
    let value = required_env(name)?;
    if value.trim().is_empty() {
        return Err(AppError::Validation(format!("{name} must not be empty")));
    }

    Ok(value)
}

fn parse_positive_env<T>(name: &str, default: T) -> Result<T, AppError>
where
    T: FromStr + PartialOrd + Default,
{
    let Ok(raw) = env::var(name) else {
        return Ok(default);
    };

    match raw.trim().parse::<T>() {
        Ok(value) if value > T::default() => Ok(value),
        _ => Err(AppError::Validation(format!(
            "{name} must be a positive integer, got '{raw}'"
        ))),
    }
}
