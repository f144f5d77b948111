// 🏦 Records - bank rows as they move through the pipeline
//
// BankRecord (extracted) → EnrichedRecord (converted into target currencies).
// Both tables carry their own column names so the sinks never hard-code them.

// ============================================================================
// EXTRACTED
// ============================================================================

/// One ranked bank, as read from the source page
#[derive(Debug, Clone, PartialEq)]
pub struct BankRecord {
    pub name: String,
    /// Market capitalization in USD billions
    pub market_cap_usd: f64,
}

impl BankRecord {
    pub fn new(name: impl Into<String>, market_cap_usd: f64) -> Self {
        BankRecord {
            name: name.into(),
            market_cap_usd,
        }
    }
}

/// Extractor output: records in source order, already truncated
#[derive(Debug, Clone, PartialEq)]
pub struct ResultTable {
    pub name_column: String,
    pub capital_column: String,
    pub records: Vec<BankRecord>,
    /// Candidate data rows rejected during parsing (missing name, bad capital)
    pub skipped: usize,
}

impl ResultTable {
    pub fn new(name_column: impl Into<String>, capital_column: impl Into<String>) -> Self {
        ResultTable {
            name_column: name_column.into(),
            capital_column: capital_column.into(),
            records: Vec::new(),
            skipped: 0,
        }
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }
}

// ============================================================================
// ENRICHED
// ============================================================================

/// Market cap expressed in one target currency
#[derive(Debug, Clone, PartialEq)]
pub struct Converted {
    pub currency: String,
    /// None when the USD capital was missing
    pub value: Option<f64>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct EnrichedRecord {
    pub name: String,
    pub market_cap_usd: Option<f64>,
    /// One entry per target currency, in the table's currency order
    pub converted: Vec<Converted>,
}

impl EnrichedRecord {
    /// Converted value for a currency code, if that currency was a target
    pub fn market_cap_in(&self, currency: &str) -> Option<f64> {
        self.converted
            .iter()
            .find(|c| c.currency == currency)
            .and_then(|c| c.value)
    }

    /// Cell values in column order (name excluded)
    pub fn numeric_values(&self) -> impl Iterator<Item = Option<f64>> + '_ {
        std::iter::once(self.market_cap_usd).chain(self.converted.iter().map(|c| c.value))
    }
}

/// Transformer output, shared by both sinks
#[derive(Debug, Clone, PartialEq)]
pub struct EnrichedTable {
    pub name_column: String,
    pub capital_column: String,
    pub currencies: Vec<String>,
    pub records: Vec<EnrichedRecord>,
}

impl EnrichedTable {
    /// Column name for a converted currency: `MC_GBP_Billion`, ...
    pub fn currency_column(currency: &str) -> String {
        format!("MC_{}_Billion", currency)
    }

    /// Header row: name, USD capital, then one column per target currency
    pub fn columns(&self) -> Vec<String> {
        let mut columns = vec![self.name_column.clone(), self.capital_column.clone()];
        columns.extend(self.currencies.iter().map(|c| Self::currency_column(c)));
        columns
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }
}
