// 💱 Exchange Rates - static currency table, loaded once per run
//
// Source is a CSV with at least `Currency` and `Rate` columns. Rates are
// multipliers relative to USD.

use crate::error::RateError;
use anyhow::{Context, Result};
use serde::Deserialize;
use std::collections::HashMap;
use std::path::Path;

#[derive(Debug, Deserialize)]
struct RateRow {
    #[serde(rename = "Currency")]
    currency: String,

    // Kept as text so a bad value reports which currency it belongs to
    #[serde(rename = "Rate")]
    rate: String,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct ExchangeRateTable {
    rates: HashMap<String, f64>,
}

impl ExchangeRateTable {
    /// Load rates from a CSV file. Extra columns are ignored.
    pub fn from_csv<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let mut rdr = csv::ReaderBuilder::new()
            .trim(csv::Trim::All)
            .from_path(path)
            .with_context(|| format!("Failed to open exchange-rate file: {:?}", path))?;

        let mut table = ExchangeRateTable::default();
        for result in rdr.deserialize() {
            let row: RateRow = result
                .with_context(|| format!("Failed to read exchange-rate row in {:?}", path))?;
            table.insert(&row.currency, &row.rate)?;
        }

        Ok(table)
    }

    /// Build a table from already-parsed pairs
    pub fn from_pairs<I, S>(pairs: I) -> Result<Self, RateError>
    where
        I: IntoIterator<Item = (S, f64)>,
        S: Into<String>,
    {
        let mut table = ExchangeRateTable::default();
        for (code, rate) in pairs {
            table.insert_rate(code.into(), rate)?;
        }
        Ok(table)
    }

    fn insert(&mut self, code: &str, raw_rate: &str) -> Result<(), RateError> {
        let rate = raw_rate.parse::<f64>().map_err(|_| RateError::InvalidRate {
            code: code.to_string(),
            value: raw_rate.to_string(),
        })?;
        self.insert_rate(code.to_string(), rate)
    }

    fn insert_rate(&mut self, code: String, rate: f64) -> Result<(), RateError> {
        // Negative rates would flip the sign of converted capital
        if !rate.is_finite() || rate < 0.0 {
            return Err(RateError::InvalidRate {
                code,
                value: rate.to_string(),
            });
        }
        if self.rates.contains_key(&code) {
            return Err(RateError::DuplicateCurrency { code });
        }
        self.rates.insert(code, rate);
        Ok(())
    }

    /// Rate for a currency code (exact, case-sensitive match)
    pub fn rate(&self, code: &str) -> Result<f64, RateError> {
        self.rates
            .get(code)
            .copied()
            .ok_or_else(|| RateError::MissingCurrency {
                code: code.to_string(),
            })
    }

    pub fn len(&self) -> usize {
        self.rates.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rates.is_empty()
    }
}
