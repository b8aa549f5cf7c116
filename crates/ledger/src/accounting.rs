use {
    alloy::primitives::U256,
    model::OrderHash,
    std::{collections::HashMap, sync::Mutex},
};

/// Tracks for every order how much of its taker amount is no longer
/// available, i.e. filled or cancelled.
///
/// The tracked amount never decreases. Chain reads can lag behind fills this
/// process already knows are mined, so an observed value only replaces the
/// tracked one when it is larger.
#[derive(Debug, Default)]
pub struct FillAccounting {
    unavailable: Mutex<HashMap<OrderHash, U256>>,
}

impl FillAccounting {
    pub fn unavailable(&self, order: &OrderHash) -> U256 {
        self.unavailable
            .lock()
            .unwrap()
            .get(order)
            .copied()
            .unwrap_or_default()
    }

    /// Merges a cumulative filled amount read from the chain. Returns the
    /// tracked amount afterwards.
    pub fn observe_chain(&self, order: OrderHash, cumulative_filled: U256) -> U256 {
        let mut unavailable = self.unavailable.lock().unwrap();
        let entry = unavailable.entry(order).or_default();
        if cumulative_filled > *entry {
            *entry = cumulative_filled;
        }
        *entry
    }

    /// Accounts for a fill that was confirmed on-chain. Returns the tracked
    /// amount afterwards.
    pub fn record_fill(&self, order: OrderHash, filled: U256) -> U256 {
        let mut unavailable = self.unavailable.lock().unwrap();
        let entry = unavailable.entry(order).or_default();
        *entry = entry.saturating_add(filled);
        tracing::debug!(%order, %filled, unavailable = %entry, "recorded fill");
        *entry
    }
}

#[cfg(test)]
mod tests {
    use {super::*, alloy::primitives::B256};

    #[test]
    fn unknown_order_has_nothing_unavailable() {
        let accounting = FillAccounting::default();
        assert_eq!(accounting.unavailable(&B256::repeat_byte(1)), U256::ZERO);
    }

    #[test]
    fn never_decreases() {
        let accounting = FillAccounting::default();
        let order = B256::repeat_byte(1);

        assert_eq!(accounting.observe_chain(order, U256::from(10)), U256::from(10));
        assert_eq!(accounting.record_fill(order, U256::from(5)), U256::from(15));
        // The chain has not caught up with the fill yet.
        assert_eq!(accounting.observe_chain(order, U256::from(10)), U256::from(15));
        assert_eq!(accounting.observe_chain(order, U256::from(40)), U256::from(40));
        assert_eq!(accounting.observe_chain(order, U256::ZERO), U256::from(40));
        assert_eq!(accounting.unavailable(&order), U256::from(40));
    }

    #[test]
    fn orders_are_tracked_independently() {
        let accounting = FillAccounting::default();
        let first = B256::repeat_byte(1);
        let second = B256::repeat_byte(2);

        accounting.record_fill(first, U256::from(7));
        accounting.observe_chain(second, U256::from(3));

        assert_eq!(accounting.unavailable(&first), U256::from(7));
        assert_eq!(accounting.unavailable(&second), U256::from(3));
    }

    #[test]
    fn record_fill_saturates() {
        let accounting = FillAccounting::default();
        let order = B256::repeat_byte(1);
        accounting.observe_chain(order, U256::MAX);
        assert_eq!(accounting.record_fill(order, U256::from(1)), U256::MAX);
    }
}
