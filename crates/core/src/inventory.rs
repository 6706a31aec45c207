//! Equipment inventory
//!
//! Equipment stock is a fixed total per type. Units held for a slot are derived from confirmed
//! reservations at that date and start time, so nothing here is a mutable counter.

use std::hash::Hash;

use rustc_hash::FxHashMap;
use smallvec::SmallVec;

/// Requested units per equipment type, ordered by ascending identity.
///
/// The ordering is the lock order: every transaction that locks equipment rows walks them in
/// this order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EquipmentDemand<K> {
    units: SmallVec<[(K, u32); 4]>,
}

impl<K> EquipmentDemand<K>
where
    K: Copy + Ord + Hash,
{
    /// Tallies requested identities; a repeated identity asks for one more unit.
    pub fn tally<I>(requested: I) -> Self
    where
        I: IntoIterator<Item = K>,
    {
        let mut counts: FxHashMap<K, u32> = FxHashMap::default();

        for key in requested {
            *counts.entry(key).or_default() += 1;
        }

        let mut units: SmallVec<[(K, u32); 4]> = counts.into_iter().collect();

        units.sort_unstable_by(|(a, _), (b, _)| a.cmp(b));

        Self { units }
    }

    /// Whether no equipment was requested.
    pub fn is_empty(&self) -> bool {
        self.units.is_empty()
    }

    /// Distinct identities, in lock order.
    pub fn keys(&self) -> impl Iterator<Item = K> + '_ {
        self.units.iter().map(|(key, _)| *key)
    }

    /// `(identity, units)` pairs, in lock order.
    pub fn iter(&self) -> impl Iterator<Item = (K, u32)> + '_ {
        self.units.iter().copied()
    }

    /// Units requested for `key`.
    pub fn units_of(&self, key: K) -> u32 {
        self.units
            .iter()
            .find_map(|(candidate, units)| (*candidate == key).then_some(*units))
            .unwrap_or(0)
    }

    /// Total units across all types.
    pub fn total_units(&self) -> u32 {
        self.units.iter().map(|(_, units)| units).sum()
    }
}

/// Units of a type still free for a slot; never negative.
pub fn remaining_units(stock: u32, held: u32) -> u32 {
    stock.saturating_sub(held)
}

/// Whether `wanted` more units fit in what is left of `stock` after `held`.
pub fn can_hold(stock: u32, held: u32, wanted: u32) -> bool {
    remaining_units(stock, held) >= wanted
}
