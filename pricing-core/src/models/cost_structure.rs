use rust_decimal::Decimal;
use rust_decimal::prelude::ToPrimitive;
use serde::{Deserialize, Serialize};

/// Billing period of an indirect (fixed) cost.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CostPeriod {
    Day,
    Week,
    #[default]
    Month,
    Year,
}

impl CostPeriod {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Day => "day",
            Self::Week => "week",
            Self::Month => "month",
            Self::Year => "year",
        }
    }

    /// Case-insensitive parse of a period label.
    pub fn parse(s: &str) -> Option<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "day" | "daily" => Some(Self::Day),
            "week" | "weekly" => Some(Self::Week),
            "month" | "monthly" => Some(Self::Month),
            "year" | "yearly" | "annual" => Some(Self::Year),
            _ => None,
        }
    }

    /// Converts an amount billed once per period into a monthly amount.
    ///
    /// A month is taken as 30 days or 52/12 weeks.
    pub fn to_monthly(
        &self,
        amount: Decimal,
    ) -> Decimal {
        match self {
            Self::Day => amount * Decimal::from(30),
            Self::Week => amount * Decimal::from(52) / Decimal::from(12),
            Self::Month => amount,
            Self::Year => amount / Decimal::from(12),
        }
    }
}

/// Per-unit variable cost (materials, packaging, shipping).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DirectCost {
    pub name: String,
    pub amount: Decimal,
}

/// Fixed cost that recurs every `period` (rent, insurance, subscriptions).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct IndirectCost {
    pub name: String,
    pub amount: Decimal,
    #[serde(default)]
    pub period: CostPeriod,
}

/// Labour cost expressed as an hourly rate and hours per month.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TimeCost {
    pub name: String,
    pub rate: Decimal,
    pub hours: Decimal,
}

impl TimeCost {
    /// Monthly labour cost. Non-positive rates or hours contribute nothing.
    pub fn monthly_cost(&self) -> Decimal {
        positive(self.rate) * positive(self.hours)
    }
}

/// Everything a user enters about how a product costs money to make.
///
/// Non-positive amounts are accepted but treated as absent by every
/// aggregate.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CostStructure {
    #[serde(default)]
    pub direct_costs: Vec<DirectCost>,
    #[serde(default)]
    pub indirect_costs: Vec<IndirectCost>,
    #[serde(default)]
    pub time_costs: Vec<TimeCost>,
    /// Desired margin as a fraction of price, in `[0, 1)`.
    pub target_margin: Decimal,
    /// Expected sales volume in units per month.
    pub expected_volume: Decimal,
}

impl CostStructure {
    pub const DEFAULT_TARGET_MARGIN: Decimal = Decimal::from_parts(3, 0, 0, false, 1);
    pub const DEFAULT_EXPECTED_VOLUME: Decimal = Decimal::from_parts(100, 0, 0, false, 0);

    /// Sum of per-unit variable costs.
    pub fn total_direct_cost(&self) -> Decimal {
        self.direct_costs.iter().map(|c| positive(c.amount)).sum()
    }

    /// Indirect costs normalised to a monthly amount.
    pub fn monthly_indirect_cost(&self) -> Decimal {
        self.indirect_costs
            .iter()
            .map(|c| c.period.to_monthly(positive(c.amount)))
            .sum()
    }

    pub fn total_time_cost(&self) -> Decimal {
        self.time_costs.iter().map(TimeCost::monthly_cost).sum()
    }

    /// Monthly fixed costs: indirect costs plus labour.
    pub fn total_fixed_cost(&self) -> Decimal {
        self.monthly_indirect_cost() + self.total_time_cost()
    }

    /// `true` when there are no cost entries at all.
    pub fn is_empty(&self) -> bool {
        self.direct_costs.is_empty() && self.indirect_costs.is_empty() && self.time_costs.is_empty()
    }
}

impl Default for CostStructure {
    fn default() -> Self {
        Self {
            direct_costs: Vec::new(),
            indirect_costs: Vec::new(),
            time_costs: Vec::new(),
            target_margin: Self::DEFAULT_TARGET_MARGIN,
            expected_volume: Self::DEFAULT_EXPECTED_VOLUME,
        }
    }
}

fn positive(value: Decimal) -> Decimal {
    if value > Decimal::ZERO { value } else { Decimal::ZERO }
}

/// Lossy conversion used when handing money values to the formula library.
pub(crate) fn to_f64(value: Decimal) -> f64 {
    value.to_f64().unwrap_or_default()
}
