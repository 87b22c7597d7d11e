//! Plain-text itemization of cost breakdowns.

use std::fmt::Write;

use crate::core::{Comparison, CostBreakdown, CostGroup};

/// Whole currency units with thousands separators, e.g. `$1,234,567` or
/// `$-1,234`.
pub fn format_money(amount: f64) -> String {
    // `+ 0.0` turns a rounded -0 into 0
    let rounded = format!("{:.0}", amount.round_ties_even() + 0.0);
    let (sign, digits) = match rounded.strip_prefix('-') {
        Some(digits) => ("-", digits),
        None => ("", rounded.as_str()),
    };

    let mut grouped = String::with_capacity(digits.len() + digits.len() / 3);
    for (idx, ch) in digits.chars().enumerate() {
        if idx > 0 && (digits.len() - idx) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(ch);
    }
    format!("${sign}{grouped}")
}

fn write_group(out: &mut String, title: &str, group: &CostGroup) {
    let _ = writeln!(out, "{title}: {}", format_money(group.total));
    for item in &group.items {
        let _ = writeln!(out, "  {}: {}", item.label, format_money(item.amount));
    }
}

pub fn render_breakdown(breakdown: &CostBreakdown) -> String {
    let mut out = String::new();
    write_group(&mut out, "Initial Costs", &breakdown.initial_costs);
    write_group(&mut out, "Recurring Costs", &breakdown.recurring_costs);
    let _ = writeln!(
        out,
        "Opportunity Costs: {}",
        format_money(breakdown.opportunity_cost)
    );
    write_group(&mut out, "Proceeds", &breakdown.proceeds);
    let _ = write!(out, "Net Cost: {}", format_money(breakdown.net_cost));
    out
}

pub fn render_comparison(comparison: &Comparison) -> String {
    let cheaper = if comparison.buy_minus_rent > 0.0 {
        "renting is cheaper"
    } else if comparison.buy_minus_rent < 0.0 {
        "buying is cheaper"
    } else {
        "no difference"
    };
    format!(
        "== Buy ==\n{}\n\n== Rent ==\n{}\n\nBuy minus rent: {} ({cheaper})",
        render_breakdown(&comparison.buy),
        render_breakdown(&comparison.rent),
        format_money(comparison.buy_minus_rent),
    )
}
