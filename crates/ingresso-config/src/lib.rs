use std::collections::BTreeMap;
use std::env;
use std::fs;
use std::path::{Path, PathBuf};

use chrono::{DateTime, FixedOffset};
use ingresso_core::rules::{
    validate_timeout_ms, DeliveryMode, DeliveryPolicy, RedirectPolicy, SuccessCriterion,
};
use ingresso_core::{Price, TicketCatalog, TicketOffer, TicketType};
use serde::Deserialize;
use thiserror::Error;
use url::{Host, Url};

const APP_DIR: &str = "ingresso";
const CONFIG_FILENAME: &str = "config.toml";

pub const DEFAULT_THANK_YOU: &str = "obrigado.html";

#[derive(Debug, Clone)]
pub struct AppConfig {
    pub delivery: DeliveryConfig,
    pub redirect: RedirectConfig,
    pub event: EventConfig,
    pub tickets: TicketCatalog,
}

#[derive(Debug, Clone)]
pub struct DeliveryConfig {
    pub mode: DeliveryMode,
    pub endpoint: Option<Url>,
    pub policy: DeliveryPolicy,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RedirectConfig {
    pub thank_you: String,
    pub open_payment_link: bool,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct EventConfig {
    pub deadline: Option<DateTime<FixedOffset>>,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            delivery: DeliveryConfig {
                mode: DeliveryMode::PaymentLink,
                endpoint: None,
                policy: DeliveryPolicy::preset(DeliveryMode::PaymentLink),
            },
            redirect: RedirectConfig {
                thank_you: DEFAULT_THANK_YOU.to_string(),
                open_payment_link: true,
            },
            event: EventConfig::default(),
            tickets: TicketCatalog::default(),
        }
    }
}

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("missing home directory")]
    MissingHomeDir,
    #[error("invalid config path: {0}")]
    InvalidConfigPath(PathBuf),
    #[error("config file not found: {0}")]
    MissingConfigFile(PathBuf),
    #[error("config file permissions too permissive: {0}")]
    InsecurePermissions(PathBuf),
    #[error("invalid delivery.endpoint: {0}")]
    InvalidEndpoint(String),
    #[error("invalid delivery.timeout_ms value: {0}")]
    InvalidTimeout(u64),
    #[error("redirect.thank_you cannot be empty")]
    EmptyThankYou,
    #[error("invalid event.deadline value: {0}")]
    InvalidDeadline(String),
    #[error("invalid ticket type in tickets.offers: {0}")]
    InvalidTicketType(String),
    #[error("invalid tickets.offers.{ticket}: {reason}")]
    InvalidOffer { ticket: String, reason: String },
    #[error("invalid tickets.fallback_link: {0}")]
    InvalidFallbackLink(String),
    #[error("failed to read config file {path}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("failed to parse config file {path}: {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: toml::de::Error,
    },
}

pub type Result<T> = std::result::Result<T, ConfigError>;

#[derive(Debug, Default, Deserialize)]
#[serde(deny_unknown_fields)]
struct ConfigFile {
    delivery: Option<DeliveryFile>,
    redirect: Option<RedirectFile>,
    event: Option<EventFile>,
    tickets: Option<TicketsFile>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(deny_unknown_fields)]
struct DeliveryFile {
    mode: Option<DeliveryMode>,
    endpoint: Option<String>,
    timeout_ms: Option<u64>,
    fallback: Option<bool>,
    success: Option<SuccessCriterion>,
    redirect: Option<RedirectPolicy>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(deny_unknown_fields)]
struct RedirectFile {
    thank_you: Option<String>,
    open_payment_link: Option<bool>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(deny_unknown_fields)]
struct EventFile {
    deadline: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(deny_unknown_fields)]
struct TicketsFile {
    fallback_link: Option<String>,
    offers: Option<BTreeMap<String, OfferFile>>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(deny_unknown_fields)]
struct OfferFile {
    price: Option<f64>,
    link: Option<String>,
}

pub fn load(config_path: Option<PathBuf>) -> Result<AppConfig> {
    let required = config_path.is_some();
    let path = match resolve_config_path(config_path.clone()) {
        Ok(path) => path,
        Err(ConfigError::MissingHomeDir) if !required => return Ok(AppConfig::default()),
        Err(ConfigError::InvalidConfigPath(_)) if !required => return Ok(AppConfig::default()),
        Err(err) => return Err(err),
    };
    match load_at_path(&path, required)? {
        Some(config) => Ok(config),
        None => Ok(AppConfig::default()),
    }
}

pub fn resolve_config_path(custom: Option<PathBuf>) -> Result<PathBuf> {
    match custom {
        Some(path) => {
            if path.as_os_str().is_empty() {
                return Err(ConfigError::InvalidConfigPath(path));
            }
            Ok(path)
        }
        None => {
            let base = if let Some(dir) = env::var_os("XDG_CONFIG_HOME") {
                let path = PathBuf::from(dir);
                if path.as_os_str().is_empty() {
                    return Err(ConfigError::InvalidConfigPath(path));
                }
                path
            } else {
                let home = dirs::home_dir().ok_or(ConfigError::MissingHomeDir)?;
                home.join(".config")
            };
            Ok(base.join(APP_DIR).join(CONFIG_FILENAME))
        }
    }
}

/// Accepts `https` endpoints, plus plain `http` on loopback hosts.
pub fn parse_endpoint(raw: &str) -> Result<Url> {
    let trimmed = raw.trim();
    let url = Url::parse(trimmed).map_err(|_| ConfigError::InvalidEndpoint(trimmed.to_string()))?;
    let allowed = match url.scheme() {
        "https" => url.host().is_some(),
        "http" => match url.host() {
            Some(Host::Domain(domain)) => domain.eq_ignore_ascii_case("localhost"),
            Some(Host::Ipv4(addr)) => addr.is_loopback(),
            Some(Host::Ipv6(addr)) => addr.is_loopback(),
            None => false,
        },
        _ => false,
    };
    if !allowed {
        return Err(ConfigError::InvalidEndpoint(trimmed.to_string()));
    }
    Ok(url)
}

pub fn parse_deadline(raw: &str) -> Result<DateTime<FixedOffset>> {
    DateTime::parse_from_rfc3339(raw.trim()).map_err(|_| ConfigError::InvalidDeadline(raw.to_string()))
}

fn load_at_path(path: &Path, required: bool) -> Result<Option<AppConfig>> {
    if !path.exists() {
        if required {
            return Err(ConfigError::MissingConfigFile(path.to_path_buf()));
        }
        return Ok(None);
    }

    ensure_permissions(path)?;
    let contents = fs::read_to_string(path).map_err(|source| ConfigError::Read {
        path: path.to_path_buf(),
        source,
    })?;
    let parsed: ConfigFile = toml::from_str(&contents).map_err(|source| ConfigError::Parse {
        path: path.to_path_buf(),
        source,
    })?;
    Ok(Some(merge_config(parsed)?))
}

fn merge_config(parsed: ConfigFile) -> Result<AppConfig> {
    let mut config = AppConfig::default();

    if let Some(delivery) = parsed.delivery {
        if let Some(mode) = delivery.mode {
            config.delivery.mode = mode;
            config.delivery.policy = DeliveryPolicy::preset(mode);
        }
        if let Some(endpoint) = delivery.endpoint {
            config.delivery.endpoint = Some(parse_endpoint(&endpoint)?);
        }
        if let Some(timeout_ms) = delivery.timeout_ms {
            config.delivery.policy.timeout =
                validate_timeout_ms(timeout_ms).ok_or(ConfigError::InvalidTimeout(timeout_ms))?;
        }
        if let Some(fallback) = delivery.fallback {
            config.delivery.policy.fallback_enabled = fallback;
        }
        if let Some(success) = delivery.success {
            config.delivery.policy.success = success;
        }
        if let Some(redirect) = delivery.redirect {
            config.delivery.policy.redirect = redirect;
        }
    }

    if let Some(redirect) = parsed.redirect {
        if let Some(thank_you) = redirect.thank_you {
            let trimmed = thank_you.trim();
            if trimmed.is_empty() {
                return Err(ConfigError::EmptyThankYou);
            }
            config.redirect.thank_you = trimmed.to_string();
        }
        if let Some(open) = redirect.open_payment_link {
            config.redirect.open_payment_link = open;
        }
    }

    if let Some(event) = parsed.event {
        if let Some(deadline) = event.deadline {
            config.event.deadline = Some(parse_deadline(&deadline)?);
        }
    }

    if let Some(tickets) = parsed.tickets {
        config.tickets = merge_tickets(tickets)?;
    }

    Ok(config)
}

// A configured offers table replaces the built-in one wholesale; types it
// leaves out resolve to the fallback offer.
fn merge_tickets(tickets: TicketsFile) -> Result<TicketCatalog> {
    let defaults = TicketCatalog::default();
    let fallback = match tickets.fallback_link {
        Some(raw) => TicketOffer::link(&raw).map_err(|_| ConfigError::InvalidFallbackLink(raw))?,
        None => defaults.fallback().clone(),
    };

    let offers = match tickets.offers {
        Some(entries) => {
            let mut offers = BTreeMap::new();
            for (key, entry) in entries {
                let kind: TicketType = key
                    .parse()
                    .map_err(|_| ConfigError::InvalidTicketType(key.clone()))?;
                offers.insert(kind, parse_offer(&key, entry)?);
            }
            offers
        }
        None => defaults.iter().map(|(kind, offer)| (kind, offer.clone())).collect(),
    };

    Ok(TicketCatalog::new(offers, fallback))
}

fn parse_offer(key: &str, entry: OfferFile) -> Result<TicketOffer> {
    let invalid = |reason: String| ConfigError::InvalidOffer {
        ticket: key.to_string(),
        reason,
    };
    match (entry.price, entry.link) {
        (Some(price), None) => Price::from_reais(price)
            .map(TicketOffer::Price)
            .map_err(|err| invalid(err.to_string())),
        (None, Some(link)) => TicketOffer::link(&link).map_err(|err| invalid(err.to_string())),
        (Some(_), Some(_)) => Err(invalid("set either price or link, not both".to_string())),
        (None, None) => Err(invalid("price or link is required".to_string())),
    }
}

#[cfg(unix)]
fn ensure_permissions(path: &Path) -> Result<()> {
    use std::os::unix::fs::PermissionsExt;

    let metadata = fs::metadata(path).map_err(|source| ConfigError::Read {
        path: path.to_path_buf(),
        source,
    })?;
    let mode = metadata.permissions().mode();
    if mode & 0o077 != 0 {
        return Err(ConfigError::InsecurePermissions(path.to_path_buf()));
    }
    Ok(())
}

#[cfg(not(unix))]
fn ensure_permissions(_path: &Path) -> Result<()> {
    Ok(())
}
