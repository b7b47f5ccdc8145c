//! Counted stock of catalog items (seeds, harvested crops, furniture).

use std::collections::BTreeMap;
use std::marker::PhantomData;

/// Largest count a single item can hold once loaded from a save.
pub const MAX_STACK: u32 = 9999;

/// A fixed, ordered catalog whose entries can be counted in a [`Stock`].
pub trait CatalogItem: Copy + Eq + 'static {
    const ALL: &'static [Self];

    /// Stable id used in save files.
    fn id(self) -> &'static str;

    fn name(self) -> &'static str;

    fn index(self) -> usize {
        Self::ALL.iter().position(|&item| item == self).unwrap_or(0)
    }

    fn from_id(id: &str) -> Option<Self> {
        Self::ALL.iter().copied().find(|item| item.id() == id)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Stock<K> {
    counts: Vec<u32>,
    _kind: PhantomData<K>,
}

impl<K: CatalogItem> Default for Stock<K> {
    fn default() -> Self {
        Self {
            counts: vec![0; K::ALL.len()],
            _kind: PhantomData,
        }
    }
}

impl<K: CatalogItem> Stock<K> {
    pub fn with(entries: &[(K, u32)]) -> Self {
        let mut stock = Self::default();
        for &(item, count) in entries {
            stock.add(item, count);
        }
        stock
    }

    pub fn count(&self, item: K) -> u32 {
        self.counts[item.index()]
    }

    pub fn add(&mut self, item: K, quantity: u32) {
        let slot = &mut self.counts[item.index()];
        *slot = slot.saturating_add(quantity);
    }

    /// Take one unit. Returns `false` (and leaves the count alone) when empty.
    pub fn take_one(&mut self, item: K) -> bool {
        let slot = &mut self.counts[item.index()];
        if *slot == 0 {
            return false;
        }
        *slot -= 1;
        true
    }

    /// Remove up to `quantity` units spread across items in catalog order.
    /// Returns how many were actually removed.
    pub fn take_any(&mut self, quantity: u32) -> u32 {
        let mut remaining = quantity;
        for slot in self.counts.iter_mut() {
            let take = remaining.min(*slot);
            *slot -= take;
            remaining -= take;
        }
        quantity - remaining
    }

    pub fn total(&self) -> u32 {
        self.counts.iter().fold(0u32, |sum, &n| sum.saturating_add(n))
    }

    pub fn iter(&self) -> impl Iterator<Item = (K, u32)> + '_ {
        K::ALL.iter().copied().zip(self.counts.iter().copied())
    }

    /// Empty the stock, returning what was held.
    pub fn drain(&mut self) -> Vec<(K, u32)> {
        let held = self.iter().filter(|&(_, n)| n > 0).collect();
        self.counts.iter_mut().for_each(|slot| *slot = 0);
        held
    }

    pub fn to_map(&self) -> BTreeMap<String, u32> {
        self.iter()
            .map(|(item, count)| (item.id().to_string(), count))
            .collect()
    }

    /// Overwrite counts named in `map`, capped at [`MAX_STACK`]; unknown ids
    /// are ignored and items missing from the map keep their current count.
    pub fn merge_map(&mut self, map: &BTreeMap<String, u32>) {
        for (id, &count) in map {
            if let Some(item) = K::from_id(id) {
                self.counts[item.index()] = count.min(MAX_STACK);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Debug, Clone, Copy, PartialEq, Eq)]
    enum Fruit {
        Apple,
        Pear,
    }

    impl CatalogItem for Fruit {
        const ALL: &'static [Self] = &[Fruit::Apple, Fruit::Pear];

        fn id(self) -> &'static str {
            match self {
                Fruit::Apple => "apple",
                Fruit::Pear => "pear",
            }
        }

        fn name(self) -> &'static str {
            self.id()
        }
    }

    #[test]
    fn test_take_one_never_goes_negative() {
        let mut stock = Stock::with(&[(Fruit::Apple, 1)]);
        assert!(stock.take_one(Fruit::Apple));
        assert!(!stock.take_one(Fruit::Apple));
        assert_eq!(stock.count(Fruit::Apple), 0);
    }

    #[test]
    fn test_take_any_walks_catalog_order() {
        let mut stock = Stock::with(&[(Fruit::Apple, 1), (Fruit::Pear, 3)]);
        assert_eq!(stock.take_any(2), 2);
        assert_eq!(stock.count(Fruit::Apple), 0);
        assert_eq!(stock.count(Fruit::Pear), 2);
        assert_eq!(stock.take_any(10), 2);
        assert_eq!(stock.total(), 0);
    }

    #[test]
    fn test_merge_map_ignores_unknown_ids() {
        let mut stock = Stock::with(&[(Fruit::Apple, 2), (Fruit::Pear, 5)]);
        let mut map = BTreeMap::new();
        map.insert("pear".to_string(), 1);
        map.insert("plum".to_string(), 9);
        stock.merge_map(&map);
        assert_eq!(stock.count(Fruit::Apple), 2);
        assert_eq!(stock.count(Fruit::Pear), 1);
        assert_eq!(stock.total(), 3);
    }

    #[test]
    fn test_merge_map_caps_counts() {
        let mut stock = Stock::<Fruit>::default();
        let mut map = BTreeMap::new();
        map.insert("apple".to_string(), u32::MAX);
        map.insert("pear".to_string(), u32::MAX);
        stock.merge_map(&map);
        assert_eq!(stock.count(Fruit::Apple), MAX_STACK);
        assert_eq!(stock.total(), MAX_STACK * 2);
    }

    #[test]
    fn test_total_saturates() {
        let mut stock = Stock::with(&[(Fruit::Apple, u32::MAX)]);
        stock.add(Fruit::Pear, 5);
        assert_eq!(stock.total(), u32::MAX);
    }

    #[test]
    fn test_drain_reports_only_held_items() {
        let mut stock = Stock::with(&[(Fruit::Pear, 4)]);
        assert_eq!(stock.drain(), vec![(Fruit::Pear, 4)]);
        assert_eq!(stock.total(), 0);
    }
}
