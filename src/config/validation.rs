//! Configuration validation.
//!
//! # Responsibilities
//! - Semantic validation (serde handles syntactic)
//! - Validate value ranges (intervals and timeouts > 0)
//! - Check member names are usable as artifact file names
//!
//! # Design Decisions
//! - Returns all validation errors, not just first
//! - Validation is pure function: FailoverConfig → Result<(), Vec<ValidationError>>
//! - Runs before config is accepted into the system

use thiserror::Error;

use crate::config::schema::FailoverConfig;

/// A single semantic problem in the configuration.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    #[error("no servers configured")]
    NoServers,

    #[error("server name {0:?} is not a valid artifact name")]
    InvalidServerName(String),

    #[error("proxy.admin_connection is empty")]
    MissingAdminConnection,

    #[error("proxy.config_link is empty")]
    MissingConfigLink,

    #[error("proxy.config_dir is empty")]
    MissingConfigDir,

    #[error("{0} must be greater than zero")]
    ZeroDuration(&'static str),
}

/// Validate a parsed configuration.
pub fn validate_config(config: &FailoverConfig) -> Result<(), Vec<ValidationError>> {
    let mut errors = Vec::new();

    if config.servers.is_empty() {
        errors.push(ValidationError::NoServers);
    }
    for name in config.servers.keys() {
        if name.is_empty() || name.contains('/') || name.contains('\\') || name == "." || name == ".." {
            errors.push(ValidationError::InvalidServerName(name.clone()));
        }
    }

    if config.proxy.admin_connection.trim().is_empty() {
        errors.push(ValidationError::MissingAdminConnection);
    }
    if config.proxy.config_link.as_os_str().is_empty() {
        errors.push(ValidationError::MissingConfigLink);
    }
    if config.proxy.config_dir.as_os_str().is_empty() {
        errors.push(ValidationError::MissingConfigDir);
    }

    if config.controller.interval_secs == 0 {
        errors.push(ValidationError::ZeroDuration("controller.interval_secs"));
    }
    if config.controller.timeout_secs == 0 {
        errors.push(ValidationError::ZeroDuration("controller.timeout_secs"));
    }
    if config.controller.aggressive_interval_ms == 0 {
        errors.push(ValidationError::ZeroDuration("controller.aggressive_interval_ms"));
    }
    if config.controller.proxy_retry_secs == 0 {
        errors.push(ValidationError::ZeroDuration("controller.proxy_retry_secs"));
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn valid_config() -> FailoverConfig {
        let mut config = FailoverConfig::default();
        config.proxy.admin_connection = "host=/tmp port=6432 dbname=pgbouncer".into();
        config.proxy.config_link = "/tmp/pgbouncer.ini".into();
        config.proxy.config_dir = "/tmp/variants".into();
        config.servers.insert("db1".into(), "host=db1".into());
        config
    }

    #[test]
    fn test_valid_config_passes() {
        assert!(validate_config(&valid_config()).is_ok());
    }

    #[test]
    fn test_reports_every_problem() {
        let mut config = FailoverConfig::default();
        config.controller.interval_secs = 0;

        let errors = validate_config(&config).unwrap_err();
        assert!(errors.contains(&ValidationError::NoServers));
        assert!(errors.contains(&ValidationError::MissingAdminConnection));
        assert!(errors.contains(&ValidationError::MissingConfigLink));
        assert!(errors.contains(&ValidationError::MissingConfigDir));
        assert!(errors.contains(&ValidationError::ZeroDuration("controller.interval_secs")));
        assert_eq!(errors.len(), 5);
    }

    #[test]
    fn test_rejects_zero_proxy_retry() {
        let mut config = valid_config();
        config.controller.proxy_retry_secs = 0;

        let errors = validate_config(&config).unwrap_err();
        assert_eq!(errors, vec![ValidationError::ZeroDuration("controller.proxy_retry_secs")]);
    }

    #[test]
    fn test_rejects_path_like_server_names() {
        let mut config = valid_config();
        config.servers.insert("../etc".into(), "host=x".into());

        let errors = validate_config(&config).unwrap_err();
        assert_eq!(errors, vec![ValidationError::InvalidServerName("../etc".into())]);
    }
}
