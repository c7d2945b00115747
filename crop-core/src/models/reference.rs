use std::collections::BTreeSet;

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// Minimum support price for one crop, quoted per quintal.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MspEntry {
    pub crop: String,
    pub msp_per_quintal: Decimal,
}

/// Minimum support prices keyed by crop name, in insertion order.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct MspTable {
    entries: Vec<MspEntry>,
}

impl MspTable {
    pub fn new() -> Self {
        Self::default()
    }

    /// Inserts or replaces the MSP for `crop`. A replaced entry keeps its
    /// original position.
    pub fn insert(
        &mut self,
        crop: impl Into<String>,
        msp_per_quintal: Decimal,
    ) {
        let crop = crop.into();
        match self.entries.iter_mut().find(|e| e.crop == crop) {
            Some(entry) => entry.msp_per_quintal = msp_per_quintal,
            None => self.entries.push(MspEntry {
                crop,
                msp_per_quintal,
            }),
        }
    }

    /// Per-quintal MSP for `crop`, or `None` when the crop has no MSP.
    pub fn get(
        &self,
        crop: &str,
    ) -> Option<Decimal> {
        self.entries
            .iter()
            .find(|e| e.crop == crop)
            .map(|e| e.msp_per_quintal)
    }

    pub fn contains(
        &self,
        crop: &str,
    ) -> bool {
        self.get(crop).is_some()
    }

    pub fn iter(&self) -> impl Iterator<Item = &MspEntry> {
        self.entries.iter()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl FromIterator<(String, Decimal)> for MspTable {
    fn from_iter<I: IntoIterator<Item = (String, Decimal)>>(iter: I) -> Self {
        let mut table = MspTable::new();
        for (crop, msp) in iter {
            table.insert(crop, msp);
        }
        table
    }
}

/// Market price reported by one state, quoted per quintal.
///
/// `price` is `None` when the source lists the state without a figure.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StatePrice {
    pub state: String,
    pub price: Option<Decimal>,
}

/// Market prices for a single crop, one entry per state, in source order.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct StatePrices {
    entries: Vec<StatePrice>,
}

impl StatePrices {
    pub fn new() -> Self {
        Self::default()
    }

    /// Inserts or replaces the price for `state`, keeping first-seen order.
    pub fn insert(
        &mut self,
        state: impl Into<String>,
        price: Option<Decimal>,
    ) {
        let state = state.into();
        match self.entries.iter_mut().find(|e| e.state == state) {
            Some(entry) => entry.price = price,
            None => self.entries.push(StatePrice { state, price }),
        }
    }

    /// Looks up a state.
    ///
    /// The outer `Option` says whether the state is listed at all, the inner
    /// one whether it carries a price.
    pub fn get(
        &self,
        state: &str,
    ) -> Option<Option<Decimal>> {
        self.entries
            .iter()
            .find(|e| e.state == state)
            .map(|e| e.price)
    }

    /// Per-quintal price for `state`, treating "listed without a price" the
    /// same as "not listed".
    pub fn price(
        &self,
        state: &str,
    ) -> Option<Decimal> {
        self.get(state).flatten()
    }

    pub fn iter(&self) -> impl Iterator<Item = &StatePrice> {
        self.entries.iter()
    }

    /// States that carry a price, in source order.
    pub fn priced(&self) -> impl Iterator<Item = (&str, Decimal)> {
        self.entries
            .iter()
            .filter_map(|e| e.price.map(|p| (e.state.as_str(), p)))
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl FromIterator<(String, Option<Decimal>)> for StatePrices {
    fn from_iter<I: IntoIterator<Item = (String, Option<Decimal>)>>(iter: I) -> Self {
        let mut prices = StatePrices::new();
        for (state, price) in iter {
            prices.insert(state, price);
        }
        prices
    }
}

/// State market prices for every crop, in source order.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct StatePriceTable {
    crops: Vec<(String, StatePrices)>,
}

impl StatePriceTable {
    pub fn new() -> Self {
        Self::default()
    }

    /// Inserts or replaces the prices for `crop`.
    pub fn insert(
        &mut self,
        crop: impl Into<String>,
        prices: StatePrices,
    ) {
        let crop = crop.into();
        match self.crops.iter_mut().find(|(c, _)| *c == crop) {
            Some((_, existing)) => *existing = prices,
            None => self.crops.push((crop, prices)),
        }
    }

    pub fn get(
        &self,
        crop: &str,
    ) -> Option<&StatePrices> {
        self.crops
            .iter()
            .find(|(c, _)| c == crop)
            .map(|(_, prices)| prices)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &StatePrices)> {
        self.crops.iter().map(|(c, p)| (c.as_str(), p))
    }

    pub fn len(&self) -> usize {
        self.crops.len()
    }

    pub fn is_empty(&self) -> bool {
        self.crops.is_empty()
    }
}

/// Read-only reference data every calculation runs against.
///
/// Built once at start-up and shared behind an `Arc`; nothing mutates it
/// afterwards.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReferenceData {
    pub msp: MspTable,
    pub state_prices: StatePriceTable,
}

impl ReferenceData {
    pub fn new(
        msp: MspTable,
        state_prices: StatePriceTable,
    ) -> Self {
        Self { msp, state_prices }
    }

    /// Crops with an MSP, sorted alphabetically.
    pub fn crops(&self) -> Vec<&str> {
        let mut crops: Vec<&str> = self.msp.iter().map(|e| e.crop.as_str()).collect();
        crops.sort_unstable();
        crops
    }

    /// Every state named anywhere in the state price table, sorted and
    /// de-duplicated.
    pub fn all_states(&self) -> Vec<&str> {
        self.state_prices
            .iter()
            .flat_map(|(_, prices)| prices.iter().map(|p| p.state.as_str()))
            .collect::<BTreeSet<_>>()
            .into_iter()
            .collect()
    }
}
