//! Session Scratchpad State
//!
//! The slice of the host's per-session scratchpad this capability reads and
//! writes. The host owns creation and persistence across turns; inside this
//! workspace only the capability operations mutate it.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use crate::api::Sku;

/// Digital-goods session state, persisted by the host between turns.
///
/// `skus` is populated (replaced wholesale, never merged) by a cached
/// `get_skus` call. `last_purchased_sku_id` is set only by `purchase_sku`
/// and is never cleared by read-only queries; only another `purchase_sku`
/// overwrites it.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SessionState {
    /// Offers fetched this session, keyed by SKU id.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub skus: Option<HashMap<String, Sku>>,

    /// The SKU most recently sent into the purchase flow.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub last_purchased_sku_id: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_is_empty() {
        let state = SessionState::default();
        assert!(state.skus.is_none());
        assert!(state.last_purchased_sku_id.is_none());
        assert_eq!(serde_json::to_value(&state).unwrap(), serde_json::json!({}));
    }

    #[test]
    fn test_round_trips_through_camel_case_json() {
        let state = SessionState {
            skus: Some(HashMap::new()),
            last_purchased_sku_id: Some("premium".into()),
        };

        let raw = serde_json::to_value(&state).unwrap();
        assert_eq!(raw["lastPurchasedSkuId"], "premium");

        let back: SessionState = serde_json::from_value(raw).unwrap();
        assert_eq!(back, state);
    }
}
