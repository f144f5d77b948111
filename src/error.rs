// ⚠️ Typed errors for the two places a bad input must stop the run
//
// Everything else flows through anyhow with context; these exist so callers
// can tell *which* currency or setting broke.

use thiserror::Error;

/// Exchange-rate table problems. Always fatal for the run.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum RateError {
    #[error("exchange-rate table has no rate for currency {code}")]
    MissingCurrency { code: String },

    #[error("invalid rate {value:?} for currency {code}")]
    InvalidRate { code: String, value: String },

    #[error("currency {code} appears more than once in the exchange-rate table")]
    DuplicateCurrency { code: String },
}

/// Configuration values that can't drive a run.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ConfigError {
    #[error("at least one target currency is required")]
    NoCurrencies,

    #[error("table_attribs must name exactly two columns (name, capital), got {0}")]
    FieldNames(usize),

    #[error("row_limit must be greater than zero")]
    ZeroRowLimit,

    #[error("table_name must not be empty")]
    EmptyTableName,

    #[error("currency code must not be empty")]
    EmptyCurrency,

    #[error("currency {0} is listed more than once")]
    DuplicateCurrency(String),
}
