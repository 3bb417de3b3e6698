//! Entitlement Reconciliation
//!
//! Answers "was this SKU purchased?" and "can it be consumed?" by scanning
//! the turn's entitlement snapshot against the configured consumable
//! allow-list. Pure reads: nothing here mutates session state or touches
//! the network.

use std::collections::HashSet;

use convo_core::{Entitlement, EntitlementGroup};

use crate::error::{GoodsError, Result};
use crate::session::SessionState;

/// A borrowed view over one turn's entitlements plus the static consumable
/// allow-list.
///
/// Membership in the allow-list alone does not imply ownership; ownership
/// is proven only by the entitlement scan.
#[derive(Clone, Copy, Debug)]
pub struct Reconciler<'a> {
    groups: &'a [EntitlementGroup],
    consumable_ids: &'a HashSet<String>,
}

impl<'a> Reconciler<'a> {
    pub fn new(groups: &'a [EntitlementGroup], consumable_ids: &'a HashSet<String>) -> Self {
        Self {
            groups,
            consumable_ids,
        }
    }

    /// First entitlement whose id matches exactly, scanning groups in the
    /// order the host supplied them.
    pub fn find_entitlement(&self, sku_id: &str) -> Option<&'a Entitlement> {
        self.groups
            .iter()
            .flat_map(|group| group.entitlements.iter())
            .find(|entitlement| entitlement.sku_id == sku_id)
    }

    /// Whether some entitlement carries this exact SKU id.
    pub fn is_purchased(&self, sku_id: &str) -> bool {
        self.find_entitlement(sku_id).is_some()
    }

    /// The SKU a consume-style call targets: the explicit id when given,
    /// otherwise the session's last purchased SKU.
    pub fn resolve_target(
        &self,
        explicit: Option<&str>,
        state: &SessionState,
    ) -> Result<String> {
        explicit
            .map(str::to_owned)
            .or_else(|| state.last_purchased_sku_id.clone())
            .ok_or(GoodsError::MissingSku)
    }

    /// True iff the target SKU is both on the consumable allow-list and
    /// currently owned.
    pub fn can_consume(&self, explicit: Option<&str>, state: &SessionState) -> Result<bool> {
        let target = self.resolve_target(explicit, state)?;
        Ok(self.consumable_ids.contains(&target) && self.is_purchased(&target))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn groups_with(ids: &[&str]) -> Vec<EntitlementGroup> {
        // Split across two groups to exercise the cross-group scan.
        let mid = ids.len() / 2;
        let make = |slice: &[&str]| EntitlementGroup {
            entitlements: slice
                .iter()
                .map(|id| Entitlement {
                    sku_id: (*id).to_string(),
                    ..Entitlement::default()
                })
                .collect(),
        };
        vec![make(&ids[..mid]), make(&ids[mid..])]
    }

    fn consumables(ids: &[&str]) -> HashSet<String> {
        ids.iter().map(|id| (*id).to_string()).collect()
    }

    #[test]
    fn test_purchased_iff_entitlement_present() {
        let groups = groups_with(&["gold.monthly", "premium"]);
        let allow = consumables(&[]);
        let engine = Reconciler::new(&groups, &allow);

        assert!(engine.is_purchased("premium"));
        assert!(engine.is_purchased("gold.monthly"));
        assert!(!engine.is_purchased("unknown"));
        assert!(!engine.is_purchased("prem"));
    }

    #[test]
    fn test_can_consume_requires_allow_list_and_ownership() {
        let groups = groups_with(&["premium"]);
        let state = SessionState::default();

        let allow = consumables(&["premium"]);
        let engine = Reconciler::new(&groups, &allow);
        assert!(engine.can_consume(Some("premium"), &state).unwrap());

        // owned but not consumable
        let allow = consumables(&[]);
        let engine = Reconciler::new(&groups, &allow);
        assert!(!engine.can_consume(Some("premium"), &state).unwrap());

        // consumable but not owned
        let allow = consumables(&["other"]);
        let engine = Reconciler::new(&groups, &allow);
        assert!(!engine.can_consume(Some("other"), &state).unwrap());

        // neither
        assert!(!engine.can_consume(Some("unknown"), &state).unwrap());
    }

    #[test]
    fn test_target_falls_back_to_last_purchase() {
        let groups = groups_with(&[]);
        let allow = consumables(&[]);
        let engine = Reconciler::new(&groups, &allow);

        let mut state = SessionState::default();
        assert!(matches!(
            engine.resolve_target(None, &state),
            Err(GoodsError::MissingSku)
        ));

        state.last_purchased_sku_id = Some("premium".into());
        assert_eq!(engine.resolve_target(None, &state).unwrap(), "premium");
        assert_eq!(
            engine.resolve_target(Some("other"), &state).unwrap(),
            "other"
        );
    }

    #[test]
    fn test_can_consume_without_target_errors() {
        let groups = groups_with(&["premium"]);
        let allow = consumables(&["premium"]);
        let engine = Reconciler::new(&groups, &allow);

        assert!(matches!(
            engine.can_consume(None, &SessionState::default()),
            Err(GoodsError::MissingSku)
        ));
    }
}
