//! Marketplace configuration.

use crate::domain::DEFAULT_COLLATERAL_DIVISOR;
use std::env;
use thiserror::Error;

/// Default page size for list queries.
pub const DEFAULT_PAGE_LIMIT: u32 = 50;

/// Upper bound on any page size.
pub const MAX_PAGE_LIMIT: u32 = 1000;

/// Configuration errors.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ConfigError {
    /// Collateral divisor must be positive.
    #[error("collateral divisor must be positive")]
    ZeroCollateralDivisor,

    /// Page limits must be positive.
    #[error("page limits must be positive")]
    ZeroPageLimit,

    /// Default page size above the bound.
    #[error("default page limit {default} exceeds max page limit {max}")]
    DefaultAboveMax {
        /// Configured default.
        default: u32,
        /// Configured bound.
        max: u32,
    },
}

/// Marketplace configuration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MarketConfig {
    /// Page size when a list query gives none.
    pub default_page_limit: u32,
    /// Largest page a list query may return.
    pub max_page_limit: u32,
    /// Minimum collateral is `reward / collateral_divisor`.
    pub collateral_divisor: u64,
}

impl Default for MarketConfig {
    fn default() -> Self {
        Self {
            default_page_limit: DEFAULT_PAGE_LIMIT,
            max_page_limit: MAX_PAGE_LIMIT,
            collateral_divisor: DEFAULT_COLLATERAL_DIVISOR,
        }
    }
}

impl MarketConfig {
    /// Create configuration from environment variables.
    ///
    /// # Environment Variables
    ///
    /// - `DQPU_DEFAULT_PAGE_LIMIT`: Default page size (default: 50)
    /// - `DQPU_MAX_PAGE_LIMIT`: Page size bound (default: 1000)
    /// - `DQPU_COLLATERAL_DIVISOR`: Reward / collateral ratio (default: 10)
    ///
    /// Unparseable values fall back to the default.
    pub fn from_env() -> Result<Self, ConfigError> {
        let defaults = Self::default();
        let config = Self {
            default_page_limit: env::var("DQPU_DEFAULT_PAGE_LIMIT")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(defaults.default_page_limit),

            max_page_limit: env::var("DQPU_MAX_PAGE_LIMIT")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(defaults.max_page_limit),

            collateral_divisor: env::var("DQPU_COLLATERAL_DIVISOR")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(defaults.collateral_divisor),
        };
        config.validate()?;
        Ok(config)
    }

    /// Check the configuration is usable.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.collateral_divisor == 0 {
            return Err(ConfigError::ZeroCollateralDivisor);
        }
        if self.default_page_limit == 0 || self.max_page_limit == 0 {
            return Err(ConfigError::ZeroPageLimit);
        }
        if self.default_page_limit > self.max_page_limit {
            return Err(ConfigError::DefaultAboveMax {
                default: self.default_page_limit,
                max: self.max_page_limit,
            });
        }
        Ok(())
    }

    /// Resolve a requested page size: `None` means the default, anything
    /// else is clamped into `1..=max_page_limit`.
    pub fn page_limit(&self, requested: Option<u32>) -> usize {
        let limit = requested
            .unwrap_or(self.default_page_limit)
            .min(self.max_page_limit)
            .max(1);
        limit as usize
    }
}
