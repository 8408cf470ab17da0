//! Reorder-policy simulator.
//!
//! Per cleaned row (inventory and units sold finite):
//!
//! - `stockout_risk      = inventory_on_hand < reorder_point`
//! - `holding_cost       = max(inventory_on_hand - reorder_point, 0) * 0.5`
//! - `adjusted_capacity  = reorder_point + safety_stock`
//! - `potential_stockout = units_sold > adjusted_capacity`
//!
//! `lead_time_days` is carried through to the summary but enters no formula.

use std::collections::BTreeMap;

use tracing::debug;

use crate::domain::{
    Dataset, ItemHoldingCost, NumericColumn, PolicyParams, PolicyRow, PolicySummary,
    SimulationOutput,
};
use crate::math::{mean, sum};
use crate::stats::clean::clean;

/// Holding cost per unit above the reorder point.
pub const HOLDING_COST_PER_UNIT: f64 = 0.5;

/// Number of items kept in the per-item holding cost ranking.
pub const TOP_ITEMS: usize = 10;

pub fn simulate(dataset: &Dataset, params: &PolicyParams) -> SimulationOutput {
    let cleaned = clean(
        dataset,
        &[NumericColumn::InventoryOnHand, NumericColumn::UnitsSold],
    );

    let adjusted_capacity = params.reorder_point + params.safety_stock;
    let rows: Vec<PolicyRow> = cleaned
        .rows
        .into_iter()
        .map(|r| PolicyRow {
            stockout_risk: r.inventory_on_hand < params.reorder_point,
            holding_cost: holding_cost(r.inventory_on_hand, params.reorder_point),
            adjusted_capacity,
            potential_stockout: r.units_sold > adjusted_capacity,
            inventory_on_hand: r.inventory_on_hand,
            units_sold: r.units_sold,
            month: r.month,
            store: r.store,
            item: r.item,
        })
        .collect();

    let summary = summarize(&rows, params);
    let per_item_holding_cost = rank_items_by_holding_cost(&rows, TOP_ITEMS);

    debug!(
        rows = summary.rows,
        potential_stockouts = summary.potential_stockouts,
        total_holding_cost = summary.total_holding_cost,
        "policy simulated"
    );

    SimulationOutput {
        summary,
        rows,
        per_item_holding_cost,
    }
}

pub fn holding_cost(inventory_on_hand: f64, reorder_point: f64) -> f64 {
    (inventory_on_hand - reorder_point).max(0.0) * HOLDING_COST_PER_UNIT
}

fn summarize(rows: &[PolicyRow], params: &PolicyParams) -> PolicySummary {
    let at_risk = rows.iter().filter(|r| r.stockout_risk).count();
    let stockout_risk_pct = if rows.is_empty() {
        f64::NAN
    } else {
        at_risk as f64 / rows.len() as f64 * 100.0
    };

    PolicySummary {
        params: *params,
        rows: rows.len(),
        potential_stockouts: rows.iter().filter(|r| r.potential_stockout).count(),
        mean_holding_cost: mean(rows.iter().map(|r| r.holding_cost)),
        total_holding_cost: sum(rows.iter().map(|r| r.holding_cost)),
        stockout_risk_pct,
    }
}

/// Mean holding cost per item, highest first, truncated to `top_n`.
///
/// Ties keep item-name order.
pub fn rank_items_by_holding_cost(rows: &[PolicyRow], top_n: usize) -> Vec<ItemHoldingCost> {
    let mut by_item: BTreeMap<&str, Vec<f64>> = BTreeMap::new();
    for r in rows {
        by_item.entry(r.item.as_str()).or_default().push(r.holding_cost);
    }

    let mut ranked: Vec<ItemHoldingCost> = by_item
        .into_iter()
        .map(|(item, costs)| ItemHoldingCost {
            item: item.to_string(),
            mean_holding_cost: mean(costs),
        })
        .collect();
    ranked.sort_by(|a, b| b.mean_holding_cost.total_cmp(&a.mean_holding_cost));
    ranked.truncate(top_n);
    ranked
}
