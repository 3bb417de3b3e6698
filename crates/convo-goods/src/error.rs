//! Digital Goods Error Types

use thiserror::Error;

/// Result type alias
pub type Result<T> = std::result::Result<T, GoodsError>;

/// Digital-goods errors
///
/// Every variant is surfaced to the immediate caller; nothing is swallowed
/// or retried inside this crate.
#[derive(Error, Debug)]
pub enum GoodsError {
    /// Credential source missing or malformed
    #[error("Configuration error: {0}")]
    Configuration(String),

    /// Credential exchange with the identity provider failed
    #[error("Credential exchange failed: {0}")]
    AuthExchange(String),

    /// Non-success response from a commerce RPC
    #[error("Commerce API error at {endpoint}: {message}")]
    CommerceApi {
        endpoint: String,
        /// HTTP status, absent when the request never reached the server.
        status: Option<u16>,
        message: String,
    },

    /// No SKU id was passed and no purchase was recorded this session
    #[error("No SKU id given and no last purchased SKU in the session; pass a SKU id or call purchase_sku first")]
    MissingSku,

    /// Consume attempted on a SKU with no matching entitlement
    #[error("No entitlement held for SKU: {0}")]
    EntitlementNotFound(String),

    /// Purchase intent recorded before offers were listed into the session
    #[error("Purchase flow error: {0}")]
    PurchaseFlow(String),
}

impl GoodsError {
    /// Check if this error is worth retrying at the host level
    pub fn is_retryable(&self) -> bool {
        matches!(
            self,
            GoodsError::AuthExchange(_) | GoodsError::CommerceApi { .. }
        )
    }

    /// Get user-friendly message
    pub fn user_message(&self) -> &str {
        match self {
            GoodsError::Configuration(_) => "Service configuration error.",
            GoodsError::AuthExchange(_) | GoodsError::CommerceApi { .. } => {
                "The store is unavailable right now. Please try again."
            }
            GoodsError::MissingSku => "No item was selected.",
            GoodsError::EntitlementNotFound(_) => "You don't own this item.",
            GoodsError::PurchaseFlow(_) => "This item can't be purchased yet.",
        }
    }

    pub(crate) fn commerce(
        endpoint: impl Into<String>,
        status: Option<u16>,
        message: impl Into<String>,
    ) -> Self {
        let message = message.into();
        GoodsError::CommerceApi {
            endpoint: endpoint.into(),
            status,
            message: match status {
                Some(code) => format!("HTTP {code}: {message}"),
                None => message,
            },
        }
    }
}
