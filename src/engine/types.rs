use std::fmt;

/// What to do with a coin that has no liquidation value in the fetched data.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, clap::ValueEnum)]
pub enum MissingPolicy {
    /// Leave the stored lickvalue untouched
    #[default]
    Keep,
    /// Overwrite the stored lickvalue with "None", like the legacy LHPC script
    Placeholder,
}

/// Change between the stored and the freshly computed lickvalue.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum PercentChange {
    Unchanged,
    // previous value is zero or not a number
    Undefined,
    Moved { increased: bool, magnitude: f64 },
}

impl fmt::Display for PercentChange {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match *self {
            PercentChange::Unchanged | PercentChange::Undefined => write!(f, "0"),
            PercentChange::Moved { increased, magnitude } => {
                let sign = if increased { '+' } else { '-' };
                write!(f, "{}{}%", sign, format_float(magnitude))
            }
        }
    }
}

// Whole numbers keep one decimal place ("65.0"), everything else prints its shortest form
fn format_float(value: f64) -> String {
    if value.is_finite() && value.fract() == 0.0 {
        format!("{:.1}", value)
    } else {
        format!("{}", value)
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum CoinUpdate {
    Updated { symbol: String, previous: String, current: f64, change: PercentChange },
    Kept { symbol: String },
    Placeholder { symbol: String, previous: String },
}

impl CoinUpdate {
    pub fn symbol(&self) -> &str {
        match self {
            CoinUpdate::Updated { symbol, .. }
            | CoinUpdate::Kept { symbol }
            | CoinUpdate::Placeholder { symbol, .. } => symbol,
        }
    }
}

/// Per-coin outcomes of one update pass, in config file order.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct UpdateSummary {
    pub updates: Vec<CoinUpdate>,
}

impl UpdateSummary {
    pub fn updated(&self) -> usize {
        self.count(|u| matches!(u, CoinUpdate::Updated { .. }))
    }

    pub fn kept(&self) -> usize {
        self.count(|u| matches!(u, CoinUpdate::Kept { .. }))
    }

    pub fn placeholders(&self) -> usize {
        self.count(|u| matches!(u, CoinUpdate::Placeholder { .. }))
    }

    pub fn missing(&self) -> usize {
        self.kept() + self.placeholders()
    }

    /// Symbols that had no liquidation value, in config file order.
    pub fn missing_symbols(&self) -> Vec<&str> {
        self.updates
            .iter()
            .filter(|u| !matches!(u, CoinUpdate::Updated { .. }))
            .map(CoinUpdate::symbol)
            .collect()
    }

    fn count(&self, pred: impl Fn(&CoinUpdate) -> bool) -> usize {
        self.updates.iter().filter(|u| pred(*u)).count()
    }
}
