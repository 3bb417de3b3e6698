//! Commerce API Client
//!
//! Two stateless RPC wrappers against the commerce backend: batch-get SKUs
//! per category and consume an entitlement. Both are plain bearer-authed
//! POSTs with no retries, no timeouts of their own, and no local state;
//! at-least-once semantics are the caller's responsibility.

use std::collections::{BTreeMap, HashMap};

use serde::{Deserialize, Serialize};

use crate::error::{GoodsError, Result};

/// Production commerce endpoint.
pub const DEFAULT_BASE_URL: &str = "https://actions.googleapis.com";

/// Category of a purchasable SKU.
///
/// `Ord` fixes the request iteration order, so merging results across
/// categories is deterministic: on an id collision the last processed
/// category wins.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum SkuCategory {
    #[serde(rename = "SKU_TYPE_IN_APP")]
    InApp,
    #[serde(rename = "SKU_TYPE_SUBSCRIPTION")]
    Subscription,
}

impl SkuCategory {
    pub fn as_str(self) -> &'static str {
        match self {
            SkuCategory::InApp => "SKU_TYPE_IN_APP",
            SkuCategory::Subscription => "SKU_TYPE_SUBSCRIPTION",
        }
    }
}

/// Which SKU ids to query, per category.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SkuRequest {
    categories: BTreeMap<SkuCategory, Vec<String>>,
}

impl SkuRequest {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add in-app item ids to the request.
    #[must_use]
    pub fn in_app<I, S>(self, ids: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.with_category(SkuCategory::InApp, ids)
    }

    /// Add subscription ids to the request.
    #[must_use]
    pub fn subscription<I, S>(self, ids: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.with_category(SkuCategory::Subscription, ids)
    }

    #[must_use]
    pub fn with_category<I, S>(mut self, category: SkuCategory, ids: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.categories
            .entry(category)
            .or_default()
            .extend(ids.into_iter().map(Into::into));
        self
    }

    /// Categories and their ids, in fixed category order.
    pub fn iter(&self) -> impl Iterator<Item = (SkuCategory, &[String])> {
        self.categories
            .iter()
            .map(|(category, ids)| (*category, ids.as_slice()))
    }

    pub fn is_empty(&self) -> bool {
        self.categories.values().all(Vec::is_empty)
    }
}

/// Identity of a SKU as the commerce backend reports it.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SkuIdentifier {
    pub id: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sku_type: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub package_name: Option<String>,
}

/// A purchasable item, opaque beyond its identity.
///
/// Title, price, description and whatever else the backend returns ride
/// along in `details` untouched.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Sku {
    pub sku_id: SkuIdentifier,

    #[serde(flatten)]
    pub details: serde_json::Map<String, serde_json::Value>,
}

/// Client for the commerce REST API.
#[derive(Clone, Debug)]
pub struct CommerceClient {
    http: reqwest::Client,
    base_url: String,
}

impl Default for CommerceClient {
    fn default() -> Self {
        Self::new()
    }
}

impl CommerceClient {
    /// Client against the production endpoint.
    pub fn new() -> Self {
        Self::with_base_url(DEFAULT_BASE_URL)
    }

    /// Client against a custom endpoint (tests, proxies).
    pub fn with_base_url(base_url: impl Into<String>) -> Self {
        let mut base_url = base_url.into();
        while base_url.ends_with('/') {
            base_url.pop();
        }
        Self {
            http: reqwest::Client::new(),
            base_url,
        }
    }

    /// Fetch SKUs for every category in `request` that has ids, merged into
    /// one mapping keyed by SKU id.
    pub async fn batch_get_skus(
        &self,
        conversation_id: &str,
        access_token: &str,
        package_name: &str,
        request: &SkuRequest,
    ) -> Result<HashMap<String, Sku>> {
        let endpoint = format!("{}/v3/packages/{package_name}/skus:batchGet", self.base_url);
        let mut skus = HashMap::new();

        for (category, ids) in request.iter() {
            if ids.is_empty() {
                continue;
            }

            tracing::debug!(
                endpoint = %endpoint,
                category = category.as_str(),
                count = ids.len(),
                "Fetching SKUs"
            );

            let body = BatchGetRequest {
                conversation_id,
                sku_type: category,
                ids,
            };
            let response: BatchGetResponse = self
                .post_json(&endpoint, access_token, &body)
                .await?;

            for sku in response.skus {
                skus.insert(sku.sku_id.id.clone(), sku);
            }
        }

        Ok(skus)
    }

    /// Mark the purchase behind `purchase_token` as consumed. The response
    /// is backend-defined and passed through verbatim.
    pub async fn consume_entitlement(
        &self,
        conversation_id: &str,
        access_token: &str,
        purchase_token: &str,
    ) -> Result<serde_json::Value> {
        let endpoint = format!(
            "{}/v3/conversations/{conversation_id}/entitlement:consume",
            self.base_url
        );

        tracing::debug!(endpoint = %endpoint, "Consuming entitlement");

        self.post_json(
            &endpoint,
            access_token,
            &ConsumeRequest { purchase_token },
        )
        .await
    }

    async fn post_json<B, R>(&self, endpoint: &str, access_token: &str, body: &B) -> Result<R>
    where
        B: Serialize,
        R: serde::de::DeserializeOwned,
    {
        let response = self
            .http
            .post(endpoint)
            .bearer_auth(access_token)
            .json(body)
            .send()
            .await
            .map_err(|e| GoodsError::commerce(endpoint, None, e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            let message = response.text().await.unwrap_or_default();
            return Err(GoodsError::commerce(endpoint, Some(status.as_u16()), message));
        }

        response
            .json()
            .await
            .map_err(|e| GoodsError::commerce(endpoint, Some(status.as_u16()), e.to_string()))
    }
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct BatchGetRequest<'a> {
    conversation_id: &'a str,
    sku_type: SkuCategory,
    ids: &'a [String],
}

#[derive(Deserialize)]
struct BatchGetResponse {
    #[serde(default)]
    skus: Vec<Sku>,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct ConsumeRequest<'a> {
    purchase_token: &'a str,
}
