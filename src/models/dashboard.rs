use serde::Serialize;

use super::orders::{OrderResponse, OrderStatus};

/// Share of revenue counted as profit.
pub const PROFIT_RATE: f64 = 0.36;
/// Number of orders shown in the "recent orders" panel.
pub const RECENT_ORDERS: usize = 4;

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct StatusCounts {
    pub en_attente: usize,
    pub en_cours: usize,
    pub livre: usize,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DashboardSummary {
    pub total_revenue: f64,
    pub total_profit: f64,
    pub total_revenue_display: String,
    pub total_profit_display: String,
    pub orders_count: usize,
    pub clients_count: usize,
    pub status_counts: StatusCounts,
    pub recent_orders: Vec<OrderResponse>,
}

impl DashboardSummary {
    pub fn compute(clients_count: usize, mut orders: Vec<OrderResponse>) -> Self {
        // Folding from +0.0: an empty f64 `sum` is -0.0.
        let total_revenue = orders
            .iter()
            .map(|o| o.total_price)
            .filter(|total| total.is_finite())
            .fold(0.0, |acc, total| acc + total);
        let total_profit = total_revenue * PROFIT_RATE;

        let mut status_counts = StatusCounts::default();
        for order in &orders {
            match order.status {
                OrderStatus::Pending => status_counts.en_attente += 1,
                OrderStatus::InProgress => status_counts.en_cours += 1,
                OrderStatus::Delivered => status_counts.livre += 1,
            }
        }

        let orders_count = orders.len();
        orders.sort_by(|a, b| b.created_at.cmp(&a.created_at).then(b.id.cmp(&a.id)));
        orders.truncate(RECENT_ORDERS);

        Self {
            total_revenue,
            total_profit,
            total_revenue_display: format_ariary(total_revenue),
            total_profit_display: format_ariary(total_profit),
            orders_count,
            clients_count,
            status_counts,
            recent_orders: orders,
        }
    }
}

/// Format an amount in Ariary the way `fr-FR` locales do: narrow no-break
/// spaces between thousands, a decimal comma, at most three decimals.
pub fn format_ariary(amount: f64) -> String {
    if !amount.is_finite() {
        return "0 Ar".to_string();
    }

    let rounded = (amount * 1000.0).round() / 1000.0;
    let digits = format!("{:.3}", rounded.abs());
    let (int_part, frac_part) = digits.split_once('.').unwrap_or((digits.as_str(), ""));
    let frac_part = frac_part.trim_end_matches('0');

    let mut out = String::new();
    if rounded < 0.0 {
        out.push('-');
    }
    let len = int_part.len();
    for (i, ch) in int_part.chars().enumerate() {
        if i > 0 && (len - i) % 3 == 0 {
            out.push('\u{202F}');
        }
        out.push(ch);
    }
    if !frac_part.is_empty() {
        out.push(',');
        out.push_str(frac_part);
    }
    out.push_str(" Ar");
    out
}
