//! Configuration validation.
//!
//! # Responsibilities
//! - Semantic validation (serde handles syntactic)
//! - Validate addresses and endpoint URLs
//! - Check wallet account entries are complete
//!
//! # Design Decisions
//! - Returns all validation errors, not just first
//! - Validation is pure function: GatewayConfig → Result<(), Vec<ValidationError>>
//! - Runs before config is accepted into the system

use std::net::SocketAddr;

use crate::config::schema::GatewayConfig;

/// A single semantic validation failure.
#[derive(Debug)]
pub struct ValidationError {
    /// Config field the error refers to (dotted path).
    pub field: String,
    /// Human-readable description.
    pub message: String,
}

impl std::fmt::Display for ValidationError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}: {}", self.field, self.message)
    }
}

/// Validate a loaded configuration, collecting every error found.
pub fn validate_config(config: &GatewayConfig) -> Result<(), Vec<ValidationError>> {
    let mut errors = Vec::new();

    match url::Url::parse(&config.node.url) {
        Ok(url) if url.scheme() == "ws" || url.scheme() == "wss" => {}
        Ok(url) => errors.push(ValidationError {
            field: "node.url".to_string(),
            message: format!("scheme '{}' is not ws or wss", url.scheme()),
        }),
        Err(e) => errors.push(ValidationError {
            field: "node.url".to_string(),
            message: e.to_string(),
        }),
    }

    if config.node.call_timeout_secs == 0 {
        errors.push(ValidationError {
            field: "node.call_timeout_secs".to_string(),
            message: "must be greater than zero".to_string(),
        });
    }

    if config.rpc.bind_address.parse::<SocketAddr>().is_err() {
        errors.push(ValidationError {
            field: "rpc.bind_address".to_string(),
            message: format!("'{}' is not a socket address", config.rpc.bind_address),
        });
    }

    for (i, account) in config.wallet.accounts.iter().enumerate() {
        if account.name.is_empty() {
            errors.push(ValidationError {
                field: format!("wallet.accounts[{}].name", i),
                message: "must not be empty".to_string(),
            });
        }
        if account.private_key_env.is_empty() {
            errors.push(ValidationError {
                field: format!("wallet.accounts[{}].private_key_env", i),
                message: "must not be empty".to_string(),
            });
        }
    }

    if config.observability.metrics_enabled
        && config
            .observability
            .metrics_address
            .parse::<SocketAddr>()
            .is_err()
    {
        errors.push(ValidationError {
            field: "observability.metrics_address".to_string(),
            message: format!(
                "'{}' is not a socket address",
                config.observability.metrics_address
            ),
        });
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}
