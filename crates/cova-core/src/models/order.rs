use serde::{Deserialize, Serialize};

use super::MenuItem;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "ts", derive(ts_rs::TS), ts(export))]
pub struct OrderLine {
    pub item_id: String,
    pub quantity: u32,
}

/// A delivery order sent to `POST /orders`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[cfg_attr(feature = "ts", derive(ts_rs::TS), ts(export))]
pub struct OrderRequest {
    pub items: Vec<OrderLine>,
    pub total: f64,
    pub address: String,
    pub notes: String,
}

impl OrderRequest {
    /// Build an order from explicit lines, pricing them against `menu`.
    pub fn from_lines(
        menu: &[MenuItem],
        items: Vec<OrderLine>,
        address: impl Into<String>,
        notes: impl Into<String>,
    ) -> Self {
        let total = order_total(menu, &items);
        Self {
            items,
            total,
            address: address.into(),
            notes: notes.into(),
        }
    }

    /// The single-dish cart the site offers: first menu item, quantity 1.
    /// An empty menu yields an order with no lines.
    pub fn first_item(
        menu: &[MenuItem],
        address: impl Into<String>,
        notes: impl Into<String>,
    ) -> Self {
        let items = menu
            .iter()
            .take(1)
            .map(|item| OrderLine {
                item_id: item.id.clone(),
                quantity: 1,
            })
            .collect();
        Self::from_lines(menu, items, address, notes)
    }
}

/// Sum of unit price times quantity. Lines naming an unknown item add nothing.
pub fn order_total(menu: &[MenuItem], lines: &[OrderLine]) -> f64 {
    lines
        .iter()
        .map(|line| {
            let price = menu
                .iter()
                .find(|item| item.id == line.item_id)
                .map(|item| item.price)
                .unwrap_or(0.0);
            price * f64::from(line.quantity)
        })
        .sum()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn menu() -> Vec<MenuItem> {
        serde_json::from_str(
            r#"[
                {"_id":"1","name":"Soup","price":5},
                {"_id":"2","name":"Salad","price":7.25}
            ]"#,
        )
        .unwrap()
    }

    #[test]
    fn test_total_sums_price_times_quantity() {
        let lines = vec![
            OrderLine { item_id: "1".to_string(), quantity: 2 },
            OrderLine { item_id: "2".to_string(), quantity: 1 },
        ];
        assert_eq!(order_total(&menu(), &lines), 17.25);
    }

    #[test]
    fn test_unknown_item_adds_nothing() {
        let lines = vec![OrderLine { item_id: "99".to_string(), quantity: 3 }];
        assert_eq!(order_total(&menu(), &lines), 0.0);
    }

    #[test]
    fn test_first_item_order() {
        let order = OrderRequest::first_item(&menu(), "1 Harbour St", "");
        assert_eq!(
            order.items,
            vec![OrderLine { item_id: "1".to_string(), quantity: 1 }]
        );
        assert_eq!(order.total, 5.0);
        assert_eq!(order.address, "1 Harbour St");
        assert_eq!(order.notes, "");
    }

    #[test]
    fn test_first_item_with_empty_menu() {
        let order = OrderRequest::first_item(&[], "", "");
        assert!(order.items.is_empty());
        assert_eq!(order.total, 0.0);
    }
}
