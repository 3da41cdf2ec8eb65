//! Process configuration, read once from the environment at startup.

use paybridge_core::{Error, Result};
use paybridge_nats::NatsConfig;
use paybridge_stripe::StripeConfig;
use paybridge_stripe::config::DEFAULT_WEBHOOK_TOLERANCE_SECS;
use url::Url;

/// Log output format.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum LogFormat {
    #[default]
    Pretty,
    Json,
}

/// Validated service configuration.
#[derive(Debug, Clone)]
pub struct AppConfig {
    pub port: u16,
    pub stripe: StripeConfig,
    pub nats: NatsConfig,
    pub log_format: LogFormat,
}

impl AppConfig {
    /// Load from the process environment, after merging an optional `.env`.
    pub fn from_env() -> Result<Self> {
        // A missing .env file is fine; the variables may come from the environment.
        let _ = dotenvy::dotenv();
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build from an arbitrary variable source.
    pub fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let port = parse_port(&lookup)?;

        let secret_key = required(&lookup, "STRIPE_SECRET_KEY")?;
        let webhook_secret = required(&lookup, "STRIPE_WEBHOOK_SECRET")?;
        let success_url = absolute_url(&lookup, "STRIPE_SUCCESS_URL")?;
        let cancel_url = absolute_url(&lookup, "STRIPE_CANCEL_URL")?;

        let urls: Vec<String> = required(&lookup, "NATS_URL")?
            .split(',')
            .map(str::trim)
            .filter(|url| !url.is_empty())
            .map(str::to_string)
            .collect();
        if urls.is_empty() {
            return Err(Error::config("NATS_URL", "must contain at least one server"));
        }

        let mut stripe = StripeConfig::new(secret_key, webhook_secret, success_url, cancel_url)
            .with_webhook_tolerance(parse_tolerance(&lookup)?);
        if let Some(api_base) = optional(&lookup, "STRIPE_API_BASE") {
            stripe = stripe.with_api_base(parse_url("STRIPE_API_BASE", &api_base)?);
        }

        let mut nats = NatsConfig::default().with_urls(urls);
        if let Some(group) = optional(&lookup, "NATS_QUEUE_GROUP") {
            nats = nats.with_queue_group(group);
        }

        let log_format = match optional(&lookup, "LOG_FORMAT").as_deref() {
            None | Some("pretty") => LogFormat::Pretty,
            Some("json") => LogFormat::Json,
            Some(other) => {
                return Err(Error::config(
                    "LOG_FORMAT",
                    format!("must be \"pretty\" or \"json\", got {other:?}"),
                ));
            }
        };

        Ok(Self {
            port,
            stripe,
            nats,
            log_format,
        })
    }
}

fn optional<F>(lookup: &F, key: &str) -> Option<String>
where
    F: Fn(&str) -> Option<String>,
{
    lookup(key)
        .map(|value| value.trim().to_string())
        .filter(|value| !value.is_empty())
}

fn required<F>(lookup: &F, key: &'static str) -> Result<String>
where
    F: Fn(&str) -> Option<String>,
{
    optional(lookup, key).ok_or_else(|| Error::config(key, "is required"))
}

fn parse_port<F>(lookup: &F) -> Result<u16>
where
    F: Fn(&str) -> Option<String>,
{
    let raw = required(lookup, "PORT")?;
    match raw.parse::<u16>() {
        Ok(0) | Err(_) => Err(Error::config(
            "PORT",
            format!("must be a port number between 1 and 65535, got {raw:?}"),
        )),
        Ok(port) => Ok(port),
    }
}

fn parse_tolerance<F>(lookup: &F) -> Result<i64>
where
    F: Fn(&str) -> Option<String>,
{
    match optional(lookup, "STRIPE_WEBHOOK_TOLERANCE_SECS") {
        None => Ok(DEFAULT_WEBHOOK_TOLERANCE_SECS),
        Some(raw) => match raw.parse::<i64>() {
            Ok(secs) if secs >= 0 => Ok(secs),
            _ => Err(Error::config(
                "STRIPE_WEBHOOK_TOLERANCE_SECS",
                format!("must be a non-negative number of seconds, got {raw:?}"),
            )),
        },
    }
}

fn absolute_url<F>(lookup: &F, key: &'static str) -> Result<String>
where
    F: Fn(&str) -> Option<String>,
{
    let raw = required(lookup, key)?;
    parse_url(key, &raw)
}

fn parse_url(key: &'static str, raw: &str) -> Result<String> {
    let url = Url::parse(raw)
        .map_err(|e| Error::config(key, format!("must be an absolute URL: {e}")))?;
    if !matches!(url.scheme(), "http" | "https") {
        return Err(Error::config(key, "must use http or https"));
    }
    Ok(raw.to_string())
}
