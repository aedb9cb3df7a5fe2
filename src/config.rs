// config.rs
use chrono::Duration;

use crate::service::booking_service::SecurityDepositPolicy;

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum DataSource {
    /// In-process fixture store, nothing survives a restart
    Memory,
    Postgres,
}

#[derive(Debug, Clone)]
pub struct Config {
    pub data_source: DataSource,
    pub database_url: Option<String>,
    /// JSON array of listings seeded into the in-memory store
    pub fixtures_path: Option<String>,
    pub jwt_secret: String,
    pub port: u16,
    pub allowed_origins: Vec<String>,
    // Marketplace policy
    pub negotiation_ttl_hours: i64,
    pub payment_window_hours: i64,
    pub security_deposit: SecurityDepositPolicy,
}

impl Config {
    pub fn init() -> Config {
        let jwt_secret = std::env::var("JWT_SECRET_KEY").expect("JWT_SECRET_KEY must be set");

        let data_source = match std::env::var("DATA_SOURCE")
            .unwrap_or_else(|_| "memory".to_string())
            .to_lowercase()
            .as_str()
        {
            "postgres" | "postgresql" => DataSource::Postgres,
            _ => DataSource::Memory,
        };
        let database_url = std::env::var("DATABASE_URL").ok();
        let fixtures_path = std::env::var("FIXTURES_PATH").ok();

        let port = std::env::var("PORT")
            .ok()
            .and_then(|v| v.parse::<u16>().ok())
            .unwrap_or(8000);

        let allowed_origins = std::env::var("ALLOWED_ORIGINS")
            .unwrap_or_else(|_| "http://localhost:3000,http://localhost:8081".to_string())
            .split(',')
            .map(|o| o.trim().to_string())
            .filter(|o| !o.is_empty())
            .collect();

        let negotiation_ttl_hours = env_count("NEGOTIATION_TTL_HOURS").unwrap_or(168);
        let payment_window_hours = env_count("BOOKING_PAYMENT_WINDOW_HOURS").unwrap_or(48);

        let security_deposit = deposit_policy(
            std::env::var("SECURITY_DEPOSIT_FIXED").ok(),
            std::env::var("SECURITY_DEPOSIT_MONTHS").ok(),
        );

        Config {
            data_source,
            database_url,
            fixtures_path,
            jwt_secret,
            port,
            allowed_origins,
            negotiation_ttl_hours,
            payment_window_hours,
            security_deposit,
        }
    }

    /// How long a pending booking may stay unpaid before it is flagged overdue.
    pub fn payment_window(&self) -> Duration {
        Duration::hours(self.payment_window_hours)
    }

    /// Configuration used by tests and local fixtures.
    #[cfg(test)]
    pub fn for_tests() -> Config {
        Config {
            data_source: DataSource::Memory,
            database_url: None,
            fixtures_path: None,
            jwt_secret: "test-secret".to_string(),
            port: 0,
            allowed_origins: vec![],
            negotiation_ttl_hours: 168,
            payment_window_hours: 48,
            security_deposit: SecurityDepositPolicy::MonthsOfRent(1),
        }
    }
}

fn env_count(name: &str) -> Option<i64> {
    non_negative(name, std::env::var(name).ok())
}

/// Parses a count that must not be negative. Unparsable or negative values are
/// ignored with a warning so the default applies.
fn non_negative(name: &str, raw: Option<String>) -> Option<i64> {
    let raw = raw?;
    match raw.trim().parse::<i64>() {
        Ok(value) if value >= 0 => Some(value),
        _ => {
            tracing::warn!("ignoring {}={}: expected a non-negative integer", name, raw);
            None
        }
    }
}

// A fixed deposit wins over the months-of-rent rule when both are set
fn deposit_policy(fixed: Option<String>, months: Option<String>) -> SecurityDepositPolicy {
    match non_negative("SECURITY_DEPOSIT_FIXED", fixed) {
        Some(amount) => SecurityDepositPolicy::Fixed(amount),
        None => SecurityDepositPolicy::MonthsOfRent(
            non_negative("SECURITY_DEPOSIT_MONTHS", months).unwrap_or(1),
        ),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_deposit_policy_from_env_values() {
        assert_eq!(deposit_policy(None, None), SecurityDepositPolicy::MonthsOfRent(1));
        assert_eq!(deposit_policy(None, Some("2".into())), SecurityDepositPolicy::MonthsOfRent(2));
        assert_eq!(
            deposit_policy(Some("5000".into()), Some("2".into())),
            SecurityDepositPolicy::Fixed(5000)
        );
    }

    #[test]
    fn test_negative_deposit_settings_fall_back() {
        assert_eq!(
            deposit_policy(Some("-5000".into()), None),
            SecurityDepositPolicy::MonthsOfRent(1)
        );
        assert_eq!(
            deposit_policy(None, Some("-3".into())),
            SecurityDepositPolicy::MonthsOfRent(1)
        );
        assert_eq!(non_negative("X", Some("abc".into())), None);
        assert_eq!(non_negative("X", Some(" 48 ".into())), Some(48));
    }
}
