//! Shared domain types.
//!
//! Raw rows keep their numeric cells as text: coercion to numbers belongs to
//! the cleaner, which runs once per consuming computation. Everything the
//! engines return is plain data and serializable so it can be exported.

use std::path::PathBuf;

use serde::{Deserialize, Serialize};

/// Default weights for the trailing weighted moving average (newest first).
pub const DEFAULT_WMA_WEIGHTS: [f64; 3] = [0.6, 0.3, 0.1];

/// Default number of bootstrap resamples per statistic.
pub const DEFAULT_RESAMPLES: usize = 10_000;

/// Default seed for the bootstrap generators.
pub const DEFAULT_SEED: u64 = 42;

/// Default confidence level (2.5 / 97.5 percentiles).
pub const DEFAULT_CONFIDENCE_LEVEL: f64 = 0.95;

/// Calendar month, ordered January to December.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum Month {
    Jan,
    Feb,
    Mar,
    Apr,
    May,
    Jun,
    Jul,
    Aug,
    Sep,
    Oct,
    Nov,
    Dec,
}

impl Month {
    pub const ALL: [Month; 12] = [
        Month::Jan,
        Month::Feb,
        Month::Mar,
        Month::Apr,
        Month::May,
        Month::Jun,
        Month::Jul,
        Month::Aug,
        Month::Sep,
        Month::Oct,
        Month::Nov,
        Month::Dec,
    ];

    /// Three-letter English abbreviation, as it appears in input files.
    pub fn abbrev(self) -> &'static str {
        match self {
            Month::Jan => "Jan",
            Month::Feb => "Feb",
            Month::Mar => "Mar",
            Month::Apr => "Apr",
            Month::May => "May",
            Month::Jun => "Jun",
            Month::Jul => "Jul",
            Month::Aug => "Aug",
            Month::Sep => "Sep",
            Month::Oct => "Oct",
            Month::Nov => "Nov",
            Month::Dec => "Dec",
        }
    }

    /// Strict parse: only the exact abbreviations are recognized.
    ///
    /// Anything else (full names, lowercase, numbers) is the unordered NA bucket.
    pub fn parse(s: &str) -> Option<Month> {
        let s = s.trim();
        Month::ALL.into_iter().find(|m| m.abbrev() == s)
    }
}

impl std::fmt::Display for Month {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.pad(self.abbrev())
    }
}

/// The four numeric columns the engines consume.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum NumericColumn {
    InventoryOnHand,
    UnitsSold,
    Cost,
    Revenue,
}

impl NumericColumn {
    pub const ALL: [NumericColumn; 4] = [
        NumericColumn::InventoryOnHand,
        NumericColumn::UnitsSold,
        NumericColumn::Cost,
        NumericColumn::Revenue,
    ];
}

pub const HEADER_STORE: &str = "Store";
pub const HEADER_ITEM: &str = "Item Name";
pub const HEADER_MONTH: &str = "Month";
pub const HEADER_INVENTORY: &str = "Number Stored in Inventory";
pub const HEADER_SOLD: &str = "Number Sold";
pub const HEADER_COST: &str = "Cost (PHP)";
pub const HEADER_REVENUE: &str = "Revenue (PHP)";

/// Every header the input file must carry.
pub const REQUIRED_HEADERS: [&str; 7] = [
    HEADER_STORE,
    HEADER_ITEM,
    HEADER_MONTH,
    HEADER_INVENTORY,
    HEADER_SOLD,
    HEADER_COST,
    HEADER_REVENUE,
];

/// One uploaded row, numeric cells still as text.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct RawRecord {
    pub store: String,
    pub item: String,
    /// `None` when the month text is not one of the 12 abbreviations.
    pub month: Option<Month>,
    pub month_raw: String,
    pub inventory_on_hand: String,
    pub units_sold: String,
    pub cost: String,
    pub revenue: String,
}

/// The uploaded table. Immutable once loaded; replaced wholesale, never merged.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Dataset {
    pub rows: Vec<RawRecord>,
}

impl Dataset {
    pub fn new(rows: Vec<RawRecord>) -> Self {
        Self { rows }
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }
}

/// A coerced row. Columns that were not requested from the cleaner may be NaN.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Record {
    pub store: String,
    pub item: String,
    pub month: Option<Month>,
    pub inventory_on_hand: f64,
    pub units_sold: f64,
    pub cost: f64,
    pub revenue: f64,
}

impl Record {
    pub fn value(&self, column: NumericColumn) -> f64 {
        match column {
            NumericColumn::InventoryOnHand => self.inventory_on_hand,
            NumericColumn::UnitsSold => self.units_sold,
            NumericColumn::Cost => self.cost,
            NumericColumn::Revenue => self.revenue,
        }
    }
}

/// Output of the cleaner.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct Table {
    pub rows: Vec<Record>,
}

impl Table {
    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    pub fn column(&self, column: NumericColumn) -> impl Iterator<Item = f64> + '_ {
        self.rows.iter().map(move |r| r.value(column))
    }
}

/// Headline aggregates. Undefined ratios are NaN.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MetricsSummary {
    pub rows_used: usize,
    pub total_inventory: f64,
    pub total_sold: f64,
    pub total_cost: f64,
    pub total_revenue: f64,
    pub sales_volume: f64,
    pub gross_profit_margin: f64,
    pub avg_inventory: f64,
    pub inv_turnover: f64,
    pub holding_period: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MetricsOutput {
    pub summary: MetricsSummary,
    #[serde(skip)]
    pub cleaned: Table,
}

/// Inventory turnover for one calendar month.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MonthTurnover {
    pub month: Month,
    pub units_sold: f64,
    pub avg_inventory: f64,
    pub turnover: f64,
}

/// A row of the time-ordered series with its rolling weighted average.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct WmaRow {
    pub store: String,
    pub item: String,
    pub month: Month,
    pub units_sold: f64,
    pub wma: f64,
}

/// Next-period forecast for one (store, item) group.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct GroupForecast {
    pub store: String,
    pub item: String,
    pub forecast: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ForecastOutput {
    pub weights: Vec<f64>,
    pub series: Vec<WmaRow>,
    pub forecasts: Vec<GroupForecast>,
    pub total_actual: f64,
    pub total_forecast: f64,
}

/// A `[low, high]` percentile interval.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Interval {
    pub low: f64,
    pub high: f64,
}

impl Interval {
    pub const UNDEFINED: Interval = Interval {
        low: f64::NAN,
        high: f64::NAN,
    };

    pub fn is_defined(&self) -> bool {
        self.low.is_finite() && self.high.is_finite()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct ConfidenceIntervals {
    pub turnover: Interval,
    pub sales: Interval,
    /// Synthetic savings interval; does not depend on the dataset.
    pub financial: Interval,
}

/// Bootstrap knobs.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct ConfidenceSettings {
    pub resamples: usize,
    pub seed: u64,
    /// Two-sided confidence level, e.g. `0.95` for the 2.5/97.5 percentiles.
    pub level: f64,
}

impl Default for ConfidenceSettings {
    fn default() -> Self {
        Self {
            resamples: DEFAULT_RESAMPLES,
            seed: DEFAULT_SEED,
            level: DEFAULT_CONFIDENCE_LEVEL,
        }
    }
}

/// Reorder-policy inputs.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct PolicyParams {
    pub reorder_point: f64,
    /// Accepted and reported, but no formula uses it.
    pub lead_time_days: f64,
    pub safety_stock: f64,
}

impl Default for PolicyParams {
    fn default() -> Self {
        Self {
            reorder_point: 150.0,
            lead_time_days: 7.0,
            safety_stock: 50.0,
        }
    }
}

/// Per-row reorder-policy evaluation.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PolicyRow {
    pub store: String,
    pub item: String,
    pub month: Option<Month>,
    pub inventory_on_hand: f64,
    pub units_sold: f64,
    pub stockout_risk: bool,
    pub holding_cost: f64,
    pub adjusted_capacity: f64,
    pub potential_stockout: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PolicySummary {
    pub params: PolicyParams,
    pub rows: usize,
    pub potential_stockouts: usize,
    pub mean_holding_cost: f64,
    pub total_holding_cost: f64,
    pub stockout_risk_pct: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ItemHoldingCost {
    pub item: String,
    pub mean_holding_cost: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SimulationOutput {
    pub summary: PolicySummary,
    pub rows: Vec<PolicyRow>,
    /// Highest mean holding cost first, truncated for display.
    pub per_item_holding_cost: Vec<ItemHoldingCost>,
}

/// A full run's configuration as understood by the pipeline.
///
/// Derived from CLI flags, `.env` and defaults.
#[derive(Debug, Clone)]
pub struct AnalysisConfig {
    pub data_path: PathBuf,
    pub wma_weights: Vec<f64>,
    pub confidence: ConfidenceSettings,
    pub policy: PolicyParams,

    pub export_json: Option<PathBuf>,
    pub export_forecasts: Option<PathBuf>,
    pub export_policy: Option<PathBuf>,
}

impl AnalysisConfig {
    pub fn new(data_path: impl Into<PathBuf>) -> Self {
        Self {
            data_path: data_path.into(),
            wma_weights: DEFAULT_WMA_WEIGHTS.to_vec(),
            confidence: ConfidenceSettings::default(),
            policy: PolicyParams::default(),
            export_json: None,
            export_forecasts: None,
            export_policy: None,
        }
    }
}
