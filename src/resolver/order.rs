// src/resolver/order.rs

//! Append-with-move-to-end ordering, used to stamp the causal order in
//! which the resolver decided each mark.

use std::collections::HashMap;

/// Remembers element order and can later rearrange an arbitrary list into
/// that same order.
#[derive(Debug, Clone, Default)]
pub struct Order {
    elements: Vec<String>,
    positions: HashMap<String, usize>,
}

impl Order {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append `element` in the last position. If `element` was already
    /// present, its prior occurrence is removed first, so re-insertion
    /// always moves it to the end rather than leaving a stale middle
    /// position or a duplicate entry.
    pub fn push(&mut self, element: &str) {
        if self.positions.contains_key(element) {
            self.elements.retain(|e| e != element);
        }
        self.elements.push(element.to_string());
        self.reindex();
    }

    fn reindex(&mut self) {
        self.positions.clear();
        for (i, e) in self.elements.iter().enumerate() {
            self.positions.insert(e.clone(), i);
        }
    }

    /// Sort `items` by the position its `key_fn(item)` occupies in this
    /// sequence. Items whose key was never pushed sort to the tail,
    /// regardless of `reverse`.
    pub fn rearrange<T>(&self, items: &mut [T], key_fn: impl Fn(&T) -> &str, reverse: bool) {
        items.sort_by_key(|item| {
            self.positions
                .get(key_fn(item))
                .copied()
                .unwrap_or(usize::MAX)
        });
        if reverse {
            // Sentinel-ranked (absent) items must stay last either way, so
            // reverse only the real, positioned prefix.
            let boundary = items
                .iter()
                .position(|item| self.positions.get(key_fn(item)).is_none())
                .unwrap_or(items.len());
            items[..boundary].reverse();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn push_appends_in_order() {
        let mut order = Order::new();
        order.push("a");
        order.push("b");
        order.push("c");
        assert_eq!(order.elements, vec!["a", "b", "c"]);
    }

    #[test]
    fn push_reinsertion_moves_to_end() {
        // Re-insertion removes the prior occurrence then appends fresh,
        // rather than leaving a stale position or duplicating the entry.
        let mut order = Order::new();
        order.push("a");
        order.push("b");
        order.push("a");
        order.push("c");
        assert_eq!(order.elements, vec!["b", "a", "c"]);
        assert_eq!(order.elements.iter().filter(|e| *e == "a").count(), 1);
    }

    #[test]
    fn rearrange_sorts_by_recorded_position() {
        let mut order = Order::new();
        order.push("leaf");
        order.push("mid");
        order.push("root");

        let mut items = vec!["root".to_string(), "leaf".to_string(), "mid".to_string()];
        order.rearrange(&mut items, |s| s.as_str(), false);
        assert_eq!(items, vec!["leaf", "mid", "root"]);
    }

    #[test]
    fn rearrange_reverse_puts_latest_first() {
        let mut order = Order::new();
        order.push("leaf");
        order.push("mid");
        order.push("root");

        let mut items = vec!["leaf".to_string(), "mid".to_string(), "root".to_string()];
        order.rearrange(&mut items, |s| s.as_str(), true);
        assert_eq!(items, vec!["root", "mid", "leaf"]);
    }

    #[test]
    fn rearrange_unknown_keys_sort_to_tail() {
        let mut order = Order::new();
        order.push("known");

        let mut items = vec!["unknown".to_string(), "known".to_string()];
        order.rearrange(&mut items, |s| s.as_str(), false);
        assert_eq!(items, vec!["known", "unknown"]);

        let mut items = vec!["unknown".to_string(), "known".to_string()];
        order.rearrange(&mut items, |s| s.as_str(), true);
        assert_eq!(items, vec!["known", "unknown"]);
    }
}
