//! Qualitative liquidity / leverage / profitability readings.

use serde::Serialize;

use crate::domain::FinancialRecord;

const LIQUIDITY_STRONG: f64 = 1.5;
const LIQUIDITY_ADEQUATE: f64 = 1.0;
const LEVERAGE_CONSERVATIVE: f64 = 2.0;
const LEVERAGE_MODERATE: f64 = 4.0;
const PROFITABILITY_STRONG: f64 = 0.1;

/// Marker printed in front of an indicator line.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Signal {
    Good,
    Caution,
    Bad,
}

impl Signal {
    pub fn marker(self) -> char {
        match self {
            Signal::Good => '✓',
            Signal::Caution => '⚠',
            Signal::Bad => '✗',
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Liquidity {
    Strong,
    Adequate,
    Weak,
}

impl Liquidity {
    pub fn from_current_ratio(current_ratio: f64) -> Self {
        if current_ratio >= LIQUIDITY_STRONG {
            Liquidity::Strong
        } else if current_ratio >= LIQUIDITY_ADEQUATE {
            Liquidity::Adequate
        } else {
            Liquidity::Weak
        }
    }

    pub fn signal(self) -> Signal {
        match self {
            Liquidity::Strong => Signal::Good,
            Liquidity::Adequate => Signal::Caution,
            Liquidity::Weak => Signal::Bad,
        }
    }

    pub fn description(self) -> &'static str {
        match self {
            Liquidity::Strong => "Strong liquidity position",
            Liquidity::Adequate => "Adequate liquidity",
            Liquidity::Weak => "Weak liquidity position",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Leverage {
    Conservative,
    Moderate,
    High,
}

impl Leverage {
    pub fn from_debt_to_equity(debt_to_equity: f64) -> Self {
        if debt_to_equity <= LEVERAGE_CONSERVATIVE {
            Leverage::Conservative
        } else if debt_to_equity <= LEVERAGE_MODERATE {
            Leverage::Moderate
        } else {
            Leverage::High
        }
    }

    pub fn signal(self) -> Signal {
        match self {
            Leverage::Conservative => Signal::Good,
            Leverage::Moderate => Signal::Caution,
            Leverage::High => Signal::Bad,
        }
    }

    pub fn description(self) -> &'static str {
        match self {
            Leverage::Conservative => "Conservative debt levels",
            Leverage::Moderate => "Moderate debt levels",
            Leverage::High => "High debt levels",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Profitability {
    Strong,
    Marginal,
    Losses,
}

impl Profitability {
    pub fn from_ebitda_margin(ebitda_margin: f64) -> Self {
        if ebitda_margin >= PROFITABILITY_STRONG {
            Profitability::Strong
        } else if ebitda_margin >= 0.0 {
            Profitability::Marginal
        } else {
            Profitability::Losses
        }
    }

    pub fn signal(self) -> Signal {
        match self {
            Profitability::Strong => Signal::Good,
            Profitability::Marginal => Signal::Caution,
            Profitability::Losses => Signal::Bad,
        }
    }

    pub fn description(self) -> &'static str {
        match self {
            Profitability::Strong => "Strong profitability",
            Profitability::Marginal => "Marginal profitability",
            Profitability::Losses => "Operating losses",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Indicators {
    pub liquidity: Liquidity,
    pub leverage: Leverage,
    pub profitability: Profitability,
}

impl Indicators {
    pub fn from_record(record: &FinancialRecord) -> Self {
        Self {
            liquidity: Liquidity::from_current_ratio(record.current_ratio()),
            leverage: Leverage::from_debt_to_equity(record.debt_to_equity()),
            profitability: Profitability::from_ebitda_margin(record.ebitda_margin()),
        }
    }

    /// `(signal, description)` lines in display order.
    pub fn lines(&self) -> [(Signal, &'static str); 3] {
        [
            (self.liquidity.signal(), self.liquidity.description()),
            (self.leverage.signal(), self.leverage.description()),
            (self.profitability.signal(), self.profitability.description()),
        ]
    }
}
