//! Utility functions and helpers

/// Format a price in whole currency units for operator messages
pub fn format_price(price: u64) -> String {
    format!("{}\u{20bd}", price)
}

/// Calculate percentage change between two prices
pub fn calculate_percentage_change(old_value: f64, new_value: f64) -> f64 {
    if old_value > 0.0 {
        ((new_value - old_value) / old_value) * 100.0
    } else {
        0.0
    }
}

/// Generate unique ID
pub fn generate_id() -> uuid::Uuid {
    uuid::Uuid::new_v4()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_percentage_change() {
        assert_eq!(calculate_percentage_change(100.0, 120.0), 20.0);
        assert_eq!(calculate_percentage_change(0.0, 50.0), 0.0);
    }
}
