use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

/// Defaults payload as served by the simulation service.
///
/// Newer services answer with a name -> fraction object; older ones only
/// list the asset names.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(untagged)]
pub enum AssetDefaults {
    Weights(BTreeMap<String, f64>),
    Names(Vec<String>),
}

/// Wire body of `POST /simulate`. Weights are fractions of the whole.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SimulationRequest {
    pub assets: BTreeMap<String, f64>,
}

#[derive(Debug, Clone, Copy, PartialEq, Deserialize)]
pub struct SimulationResult {
    pub success_rate: f64,
    pub median_final_balance: f64,
}

impl SimulationResult {
    pub fn is_well_formed(&self) -> bool {
        (0.0..=1.0).contains(&self.success_rate)
            && self.median_final_balance.is_finite()
            && self.median_final_balance >= 0.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_parse_weight_object() {
        let defaults: AssetDefaults =
            serde_json::from_str(r#"{"VFINX": 0.5, "VBMFX": 0.5}"#).expect("object shape");
        let AssetDefaults::Weights(weights) = defaults else {
            panic!("expected weights shape");
        };
        assert_eq!(weights.len(), 2);
        assert_eq!(weights["VFINX"], 0.5);
    }

    #[test]
    fn defaults_parse_name_list() {
        let defaults: AssetDefaults =
            serde_json::from_str(r#"["us_equities", "intl_equities", "fixed_income"]"#)
                .expect("list shape");
        assert_eq!(
            defaults,
            AssetDefaults::Names(vec![
                "us_equities".to_string(),
                "intl_equities".to_string(),
                "fixed_income".to_string(),
            ])
        );
    }

    #[test]
    fn defaults_reject_other_shapes() {
        assert!(serde_json::from_str::<AssetDefaults>(r#"{"VFINX": "half"}"#).is_err());
        assert!(serde_json::from_str::<AssetDefaults>("42").is_err());
    }

    #[test]
    fn simulation_result_requires_both_fields() {
        assert!(serde_json::from_str::<SimulationResult>(r#"{"success_rate": 0.9}"#).is_err());
    }

    #[test]
    fn simulation_result_range_checks() {
        let ok = SimulationResult {
            success_rate: 1.0,
            median_final_balance: 0.0,
        };
        assert!(ok.is_well_formed());

        let rate_too_high = SimulationResult {
            success_rate: 1.5,
            ..ok
        };
        assert!(!rate_too_high.is_well_formed());

        let negative_balance = SimulationResult {
            median_final_balance: -1.0,
            ..ok
        };
        assert!(!negative_balance.is_well_formed());
    }

    #[test]
    fn simulation_request_serializes_under_assets_key() {
        let request = SimulationRequest {
            assets: BTreeMap::from([("VFINX".to_string(), 0.6), ("VBMFX".to_string(), 0.4)]),
        };
        let json = serde_json::to_value(&request).expect("request should serialize");
        assert_eq!(
            json,
            serde_json::json!({"assets": {"VFINX": 0.6, "VBMFX": 0.4}})
        );
    }
}
