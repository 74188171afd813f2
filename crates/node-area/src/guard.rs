//! The guarded mutation protocol
//!
//! Every mutation of a node view follows ask → (abort | commit) → notify.
//! Guards decide with a [`GuardDecision`]; a rejection is an ordinary value,
//! never an error. Errors returned by a guard abort the mutation before it is
//! committed. Errors returned by a notification surface after the commit and
//! do not roll it back.

use async_trait::async_trait;

use crate::drag::PointerEvent;
use crate::error::Result;
use crate::types::{Metadata, ResizeParams, TranslateParams};

/// A guard's answer to a proposed mutation
#[derive(Debug, Clone, PartialEq)]
pub enum GuardDecision<T> {
    /// Apply the mutation with these (possibly rewritten) parameters
    Accept(T),
    /// Leave state untouched
    Reject,
}

impl<T> GuardDecision<T> {
    pub fn is_accepted(&self) -> bool {
        matches!(self, GuardDecision::Accept(_))
    }

    pub fn accepted(self) -> Option<T> {
        match self {
            GuardDecision::Accept(params) => Some(params),
            GuardDecision::Reject => None,
        }
    }
}

impl<T> From<Option<T>> for GuardDecision<T> {
    fn from(value: Option<T>) -> Self {
        value.map_or(GuardDecision::Reject, GuardDecision::Accept)
    }
}

/// Result of a guarded operation
///
/// `Rejected` and `Unavailable` both mean nothing changed. They are kept apart
/// so callers can tell a policy veto from a view that is not ready (missing
/// view, no rendered content); [`Outcome::is_applied`] collapses them.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Outcome {
    /// The mutation was committed and observers were notified
    Applied,
    /// A guard vetoed the mutation
    Rejected,
    /// The target view or its content does not exist
    Unavailable,
}

impl Outcome {
    pub fn is_applied(self) -> bool {
        self == Outcome::Applied
    }
}

impl From<Outcome> for bool {
    fn from(outcome: Outcome) -> bool {
        outcome.is_applied()
    }
}

/// Veto/rewrite functions consulted before a node view mutates
#[async_trait]
pub trait NodeGuards: Send + Sync {
    async fn translate(
        &self,
        params: TranslateParams,
        metadata: Option<Metadata>,
    ) -> Result<GuardDecision<TranslateParams>>;

    async fn resize(&self, params: ResizeParams) -> Result<GuardDecision<ResizeParams>>;
}

/// Notifications a node view sends around its lifecycle
///
/// `picked`, `dragged` and `contextmenu` come from pointer input;
/// `translated` and `resized` follow committed mutations.
#[async_trait]
pub trait NodeEvents: Send + Sync {
    async fn picked(&self) -> Result<()>;

    async fn translated(&self, params: TranslateParams, metadata: Option<Metadata>) -> Result<()>;

    async fn dragged(&self) -> Result<()>;

    async fn contextmenu(&self, event: PointerEvent) -> Result<()>;

    async fn resized(&self, params: ResizeParams) -> Result<()>;
}

/// Guards that accept every mutation unchanged
pub struct AcceptAll;

#[async_trait]
impl NodeGuards for AcceptAll {
    async fn translate(
        &self,
        params: TranslateParams,
        _metadata: Option<Metadata>,
    ) -> Result<GuardDecision<TranslateParams>> {
        Ok(GuardDecision::Accept(params))
    }

    async fn resize(&self, params: ResizeParams) -> Result<GuardDecision<ResizeParams>> {
        Ok(GuardDecision::Accept(params))
    }
}

/// Events handler that ignores every notification
pub struct NullEvents;

#[async_trait]
impl NodeEvents for NullEvents {
    async fn picked(&self) -> Result<()> {
        Ok(())
    }

    async fn translated(&self, _params: TranslateParams, _metadata: Option<Metadata>) -> Result<()> {
        Ok(())
    }

    async fn dragged(&self) -> Result<()> {
        Ok(())
    }

    async fn contextmenu(&self, _event: PointerEvent) -> Result<()> {
        Ok(())
    }

    async fn resized(&self, _params: ResizeParams) -> Result<()> {
        Ok(())
    }
}
