// 🔄 Transformer - convert USD capital into the target currencies
//
// Same length, same order as the input. Rounding is per currency, never
// chained from another converted value.

use crate::rates::ExchangeRateTable;
use crate::records::{Converted, EnrichedRecord, EnrichedTable, ResultTable};
use anyhow::Result;
use std::path::Path;
use tracing::debug;

/// Round to 2 decimal places, ties to even
pub fn round2(value: f64) -> f64 {
    (value * 100.0).round_ties_even() / 100.0
}

/// Load the rate CSV at `rates_path`, then enrich `table`.
///
/// Fails if the file can't be read or lacks any of `currencies`.
pub fn transform<P: AsRef<Path>>(
    table: &ResultTable,
    rates_path: P,
    currencies: &[String],
) -> Result<EnrichedTable> {
    let rates = ExchangeRateTable::from_csv(rates_path.as_ref())?;
    debug!(rates = rates.len(), path = ?rates_path.as_ref(), "exchange rates loaded");
    Ok(enrich(table, &rates, currencies)?)
}

/// Enrich with an already-loaded rate table.
///
/// Every target rate is resolved up front, so a missing currency fails
/// even when `table` is empty.
pub fn enrich(
    table: &ResultTable,
    rates: &ExchangeRateTable,
    currencies: &[String],
) -> Result<EnrichedTable, crate::error::RateError> {
    let targets = currencies
        .iter()
        .map(|code| rates.rate(code).map(|rate| (code.as_str(), rate)))
        .collect::<Result<Vec<_>, _>>()?;

    let records = table
        .records
        .iter()
        .map(|record| {
            // Non-finite capital (NaN, inf) counts as missing
            let usd = Some(record.market_cap_usd).filter(|v| v.is_finite());
            let converted = targets
                .iter()
                .map(|&(code, rate)| Converted {
                    currency: code.to_string(),
                    value: usd.map(|v| round2(v * rate)),
                })
                .collect();

            EnrichedRecord {
                name: record.name.clone(),
                market_cap_usd: usd,
                converted,
            }
        })
        .collect();

    Ok(EnrichedTable {
        name_column: table.name_column.clone(),
        capital_column: table.capital_column.clone(),
        currencies: currencies.to_vec(),
        records,
    })
}
