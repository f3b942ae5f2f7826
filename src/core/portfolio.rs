use std::collections::BTreeMap;

use super::types::{AssetDefaults, SimulationRequest};

const PERCENT: f64 = 100.0;

/// Parses a user-typed weight.
///
/// Never fails: anything that is not a finite, non-negative number reads as
/// zero so a half-typed value does not block editing.
pub fn parse_weight(raw: &str) -> f64 {
    match raw.trim().parse::<f64>() {
        Ok(value) if value.is_finite() && value >= 0.0 => value,
        _ => 0.0,
    }
}

/// Asset weights in percent, keyed by asset name.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct PortfolioState {
    weights: BTreeMap<String, f64>,
}

impl PortfolioState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_defaults(defaults: AssetDefaults) -> Self {
        let weights = match defaults {
            AssetDefaults::Weights(fractions) => fractions
                .into_iter()
                .map(|(asset, fraction)| (asset, fraction * PERCENT))
                .collect(),
            AssetDefaults::Names(names) => names.into_iter().map(|asset| (asset, 0.0)).collect(),
        };
        Self { weights }
    }

    pub fn weights(&self) -> &BTreeMap<String, f64> {
        &self.weights
    }

    pub fn weight(&self, asset: &str) -> Option<f64> {
        self.weights.get(asset).copied()
    }

    pub fn is_empty(&self) -> bool {
        self.weights.is_empty()
    }

    pub fn len(&self) -> usize {
        self.weights.len()
    }

    pub fn total(&self) -> f64 {
        self.weights.values().sum()
    }

    /// Replaces one asset's weight with the parsed `raw` value.
    ///
    /// The key set is fixed once loaded, so an unknown asset is left alone
    /// and `false` is returned.
    pub fn set_weight(&mut self, asset: &str, raw: &str) -> bool {
        let Some(slot) = self.weights.get_mut(asset) else {
            tracing::warn!(asset, "ignoring edit for unknown asset");
            return false;
        };
        *slot = parse_weight(raw);
        true
    }

    pub fn to_request(&self) -> SimulationRequest {
        SimulationRequest {
            assets: self
                .weights
                .iter()
                .map(|(asset, pct)| (asset.clone(), pct / PERCENT))
                .collect(),
        }
    }
}
