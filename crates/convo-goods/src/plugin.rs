//! Digital Goods Capability
//!
//! Ties the credential resolver, commerce client, and reconciliation engine
//! to one conversation turn. The plugin is configured once; attaching it to
//! a turn yields a [`DigitalGoods`] handle scoped to that turn's session.

use std::collections::{HashMap, HashSet};

use convo_core::{Directive, Turn, TurnPlugin};

use crate::api::{CommerceClient, Sku, SkuRequest};
use crate::auth::{AuthInput, CredentialResolver};
use crate::engine::Reconciler;
use crate::error::{GoodsError, Result};
use crate::session::SessionState;

/// System intent that sends the user into the out-of-band payment flow.
pub const COMPLETE_PURCHASE_INTENT: &str = "actions.intent.COMPLETE_PURCHASE";

/// Capability configuration, supplied once at registration.
#[derive(Clone, Debug)]
pub struct InitOptions {
    /// Target app package identifier.
    pub package_name: String,

    /// How to obtain a commerce API credential. Defaults to looking up a
    /// service-account descriptor via the resolver's credential source.
    pub auth: AuthInput,

    /// Whether fetched SKUs and the last purchased SKU id are written into
    /// the session scratchpad. Defaults to true; purchase flows require it.
    pub keep_in_session: bool,

    /// SKU ids the caller is permitted to consume. Allow-list only:
    /// membership does not imply ownership.
    pub consumable_ids: HashSet<String>,

    /// Which SKUs to query, per category.
    pub sku_request: SkuRequest,
}

impl InitOptions {
    pub fn new(package_name: impl Into<String>, sku_request: SkuRequest) -> Self {
        Self {
            package_name: package_name.into(),
            auth: AuthInput::default(),
            keep_in_session: true,
            consumable_ids: HashSet::new(),
            sku_request,
        }
    }

    #[must_use]
    pub fn with_auth(mut self, auth: AuthInput) -> Self {
        self.auth = auth;
        self
    }

    #[must_use]
    pub fn with_consumable_ids<I, S>(mut self, ids: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.consumable_ids = ids.into_iter().map(Into::into).collect();
        self
    }

    #[must_use]
    pub fn with_keep_in_session(mut self, keep: bool) -> Self {
        self.keep_in_session = keep;
        self
    }
}

/// The registered plugin: configuration plus long-lived clients.
pub struct DigitalGoodsPlugin {
    options: InitOptions,
    resolver: CredentialResolver,
    client: CommerceClient,
}

impl DigitalGoodsPlugin {
    /// Plugin against the production commerce endpoint, resolving
    /// credentials from the default environment source.
    pub fn new(options: InitOptions) -> Self {
        Self::with_parts(options, CredentialResolver::new(), CommerceClient::new())
    }

    /// Plugin with an injected resolver and client (tests, proxies).
    pub fn with_parts(
        options: InitOptions,
        resolver: CredentialResolver,
        client: CommerceClient,
    ) -> Self {
        Self {
            options,
            resolver,
            client,
        }
    }

    pub fn options(&self) -> &InitOptions {
        &self.options
    }
}

impl TurnPlugin<SessionState> for DigitalGoodsPlugin {
    type Capability<'t>
        = DigitalGoods<'t>
    where
        Self: 't,
        SessionState: 't;

    fn attach<'t>(&'t self, turn: &'t mut Turn<SessionState>) -> DigitalGoods<'t> {
        DigitalGoods {
            options: &self.options,
            resolver: &self.resolver,
            client: &self.client,
            turn,
        }
    }
}

/// Digital-goods capability bound to one turn.
pub struct DigitalGoods<'t> {
    options: &'t InitOptions,
    resolver: &'t CredentialResolver,
    client: &'t CommerceClient,
    turn: &'t mut Turn<SessionState>,
}

impl DigitalGoods<'_> {
    /// Fetch the configured SKUs from the commerce backend.
    ///
    /// With `keep_in_session`, the session's SKU cache is replaced (not
    /// merged) with the full result.
    pub async fn get_skus(&mut self) -> Result<HashMap<String, Sku>> {
        let access_token = self.resolver.resolve(&self.options.auth).await?;
        let skus = self
            .client
            .batch_get_skus(
                &self.turn.request.conversation_id,
                &access_token,
                &self.options.package_name,
                &self.options.sku_request,
            )
            .await?;

        if self.options.keep_in_session {
            self.turn.data.skus = Some(skus.clone());
        }
        Ok(skus)
    }

    /// Whether the user holds an entitlement for this SKU.
    pub fn sku_purchased(&self, sku_id: &str) -> bool {
        self.reconciler().is_purchased(sku_id)
    }

    /// Whether the SKU (explicit, or the last purchased one) is on the
    /// consumable allow-list and currently owned. Pure predicate.
    ///
    /// # Errors
    ///
    /// [`GoodsError::MissingSku`] when no id is given and no purchase has
    /// been recorded this session.
    pub fn can_consume_sku(&self, sku_id: Option<&str>) -> Result<bool> {
        self.reconciler().can_consume(sku_id, &self.turn.data)
    }

    /// Consume the SKU's entitlement. Callers are expected to check
    /// [`DigitalGoods::can_consume_sku`] first.
    ///
    /// Not idempotent: calling twice issues two RPCs, and the backend's own
    /// idempotency (if any) governs the outcome.
    pub async fn consume_sku(&self, sku_id: Option<&str>) -> Result<serde_json::Value> {
        let engine = self.reconciler();
        let target = engine.resolve_target(sku_id, &self.turn.data)?;

        let purchase_token = engine
            .find_entitlement(&target)
            .and_then(convo_core::Entitlement::purchase_token)
            .ok_or_else(|| GoodsError::EntitlementNotFound(target.clone()))?
            .to_owned();

        let access_token = self.resolver.resolve(&self.options.auth).await?;
        tracing::info!(sku_id = %target, "Consuming entitlement");
        self.client
            .consume_entitlement(
                &self.turn.request.conversation_id,
                &access_token,
                &purchase_token,
            )
            .await
    }

    /// Record the intent to purchase `sku_id` and queue the purchase
    /// directive for the host to render as the next action.
    ///
    /// Never confirms a purchase itself: the user completes payment out of
    /// band and the resulting entitlement arrives with a later turn.
    ///
    /// # Errors
    ///
    /// [`GoodsError::PurchaseFlow`] when `get_skus` has not cached offers
    /// into the session, or the id is not among the cached offers.
    pub fn purchase_sku(&mut self, sku_id: &str) -> Result<()> {
        let skus = self.turn.data.skus.as_ref().ok_or_else(|| {
            GoodsError::PurchaseFlow(
                "no SKUs cached in the session; enable keep_in_session and call get_skus first"
                    .into(),
            )
        })?;
        let sku = skus.get(sku_id).ok_or_else(|| {
            GoodsError::PurchaseFlow(format!("SKU '{sku_id}' is not among the cached offers"))
        })?;
        let identity = serde_json::json!({ "skuId": sku.sku_id });

        if self.options.keep_in_session {
            self.turn.data.last_purchased_sku_id = Some(sku_id.to_owned());
        }

        tracing::info!(sku_id = %sku_id, "Recording purchase intent");
        self.turn.ask(Directive::new(COMPLETE_PURCHASE_INTENT, identity));
        Ok(())
    }

    fn reconciler(&self) -> Reconciler<'_> {
        Reconciler::new(
            &self.turn.request.user.entitlement_groups,
            &self.options.consumable_ids,
        )
    }
}
