//! Answer source tiers and trait definition.
//!
//! Defines the `AnswerSource` async trait; each submodule implements one
//! tier of the fallback chain. A source that cannot produce a usable
//! answer returns `None` and the chain moves on to the next tier.

pub mod assistant;
pub mod fallback;
pub mod instant;
pub mod summary;

use async_trait::async_trait;

use optic_core::types::AnswerRequest;

/// One tier of the answer source chain.
#[async_trait]
pub trait AnswerSource: Send + Sync {
    /// Short identifier used in logs.
    fn name(&self) -> &'static str;

    /// Attempt to answer the request.
    ///
    /// `None` means "no usable result here, try the next tier". This
    /// covers unavailability, transport failures, and empty responses
    /// alike.
    async fn answer(&self, request: &AnswerRequest) -> Option<String>;
}

pub use assistant::AssistantSource;
pub use fallback::FallbackSource;
pub use instant::InstantAnswerSource;
pub use summary::SummarySource;
