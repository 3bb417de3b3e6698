//! Turn Lifecycle
//!
//! One request-response cycle of the conversational host. A [`Turn`] pairs
//! the read-only request snapshot with the mutable session scratchpad and
//! collects the directives to render into the outbound response.

use serde::{Deserialize, Serialize};

use crate::entitlement::EntitlementGroup;

/// Read-only snapshot of one inbound request.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TurnRequest {
    /// Identifier of the conversation this turn belongs to.
    pub conversation_id: String,

    /// Snapshot of the user attached to the conversation.
    #[serde(default)]
    pub user: UserSnapshot,
}

/// User identity data the host supplies with every turn.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserSnapshot {
    /// Entitlements the user holds, grouped as delivered by the backend.
    #[serde(default)]
    pub entitlement_groups: Vec<EntitlementGroup>,
}

/// A "set next action" record for the host to render into the next
/// outbound response.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Directive {
    /// System intent the host should trigger next.
    pub intent: String,

    /// Intent-specific payload, passed through to the host verbatim.
    pub payload: serde_json::Value,
}

impl Directive {
    pub fn new(intent: impl Into<String>, payload: serde_json::Value) -> Self {
        Self {
            intent: intent.into(),
            payload,
        }
    }
}

/// One turn of a conversation.
///
/// `D` is the session scratchpad type. The host persists it between turns
/// and guarantees exclusive ownership while the turn is processed, so no
/// locking is involved here.
#[derive(Clone, Debug)]
pub struct Turn<D> {
    /// Inbound request snapshot. Read-only for the lifetime of the turn.
    pub request: TurnRequest,

    /// Session scratchpad, carried across turns by the host.
    pub data: D,

    directives: Vec<Directive>,
}

impl<D> Turn<D> {
    /// Start a turn from a request snapshot and the rehydrated scratchpad.
    pub fn new(request: TurnRequest, data: D) -> Self {
        Self {
            request,
            data,
            directives: Vec::new(),
        }
    }

    /// Enqueue a directive for the outbound response.
    pub fn ask(&mut self, directive: Directive) {
        tracing::debug!(intent = %directive.intent, "Queueing directive");
        self.directives.push(directive);
    }

    /// Directives queued so far, in insertion order.
    pub fn directives(&self) -> &[Directive] {
        &self.directives
    }

    /// Drain the queued directives; the host calls this when serializing
    /// the response.
    pub fn take_directives(&mut self) -> Vec<Directive> {
        std::mem::take(&mut self.directives)
    }
}
