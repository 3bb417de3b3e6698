//! Entitlement Snapshot Types
//!
//! Entitlements are proof of ownership for purchasable items. The host
//! supplies them read-only on every turn as part of the user snapshot;
//! plugins scan them but never create or delete them.

use serde::{Deserialize, Serialize};

/// A group of entitlements, as delivered by the host.
///
/// No ordering guarantee holds among groups beyond "as supplied".
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EntitlementGroup {
    #[serde(default)]
    pub entitlements: Vec<Entitlement>,
}

/// Proof that the conversation's user owns a given SKU.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Entitlement {
    /// Identifier of the owned SKU.
    pub sku_id: String,

    /// SKU category, when the host reports one.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sku_type: Option<String>,

    /// Transaction details, present for purchases that can be consumed.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub purchase_details: Option<PurchaseDetails>,
}

impl Entitlement {
    /// The purchase token tying this entitlement to its transaction, if any.
    pub fn purchase_token(&self) -> Option<&str> {
        self.purchase_details
            .as_ref()
            .map(|details| details.purchase_token.as_str())
    }
}

/// Transaction details carried by an entitlement.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PurchaseDetails {
    /// Opaque token required to consume the purchase.
    pub purchase_token: String,

    /// Additional backend-defined fields, passed through untouched.
    #[serde(flatten)]
    pub extra: serde_json::Map<String, serde_json::Value>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_entitlement_wire_format() {
        let raw = serde_json::json!({
            "skuId": "premium",
            "skuType": "SKU_TYPE_IN_APP",
            "purchaseDetails": {
                "purchaseToken": "tok--",
                "orderId": "GPA.1234"
            }
        });

        let entitlement: Entitlement = serde_json::from_value(raw).unwrap();
        assert_eq!(entitlement.sku_id, "premium");
        assert_eq!(entitlement.purchase_token(), Some("tok--"));
        assert_eq!(
            entitlement.purchase_details.as_ref().unwrap().extra["orderId"],
            "GPA.1234"
        );
    }

    #[test]
    fn test_entitlement_without_details() {
        let entitlement: Entitlement =
            serde_json::from_value(serde_json::json!({"skuId": "gold"})).unwrap();
        assert_eq!(entitlement.purchase_token(), None);
    }
}
