//! # convo-goods
//!
//! Digital goods support for conversational agents: list purchasable SKUs,
//! check and consume entitlements, and kick off a purchase flow, all scoped
//! to one conversation turn.
//!
//! ## Architecture
//!
//! ```text
//! ┌──────────────────────────────────────────────────────────────┐
//! │                    DigitalGoodsPlugin                        │
//! │  ┌──────────────┐  ┌────────────────┐  ┌─────────────────┐   │
//! │  │ Credential   │  │  Commerce      │  │  Reconciliation │   │
//! │  │ Resolver     │──│  Client        │──│  Engine         │   │
//! │  │ (auth)       │  │  (two RPCs)    │  │  (entitlements) │   │
//! │  └──────────────┘  └────────────────┘  └─────────────────┘   │
//! └──────────────────────────────────────────────────────────────┘
//!            attach() per turn ──▶ DigitalGoods<'t>
//! ```
//!
//! The plugin is configured once with [`InitOptions`] and implements
//! [`convo_core::TurnPlugin`]; attaching it to a turn yields a
//! [`DigitalGoods`] capability bound to that turn's session.
//!
//! ## Usage
//!
//! ```rust,ignore
//! use convo_core::{Turn, TurnPlugin};
//! use convo_goods::{DigitalGoodsPlugin, InitOptions, SessionState, SkuRequest};
//!
//! let plugin = DigitalGoodsPlugin::new(
//!     InitOptions::new(
//!         "com.example.app",
//!         SkuRequest::new().in_app(["premium"]).subscription(["gold.monthly"]),
//!     )
//!     .with_consumable_ids(["premium"]),
//! );
//!
//! // per inbound turn
//! let mut goods = plugin.attach(&mut turn);
//! let offers = goods.get_skus().await?;
//! goods.purchase_sku("premium")?;          // queues the purchase directive
//!
//! // a later turn, once the entitlement shows up in the request snapshot
//! if goods.can_consume_sku(None)? {
//!     goods.consume_sku(None).await?;
//! }
//! ```
//!
//! Credentials are resolved fresh on every call that needs one; callers who
//! want token caching must wrap [`auth::CredentialResolver`] themselves.

pub mod api;
pub mod auth;
pub mod engine;
pub mod error;
pub mod plugin;
pub mod session;

pub use api::{CommerceClient, Sku, SkuCategory, SkuIdentifier, SkuRequest};
pub use auth::{AuthInput, CredentialResolver, CredentialSource, ServiceAccountKey};
pub use engine::Reconciler;
pub use error::{GoodsError, Result};
pub use plugin::{DigitalGoods, DigitalGoodsPlugin, InitOptions};
pub use session::SessionState;
