//! Knowledge resolution for Optic.
//!
//! Normalizes classifier labels into topics and resolves them to textual
//! summaries via a primary lookup with a search fallback, plus the
//! instant-answer client used by the answer source chain.

pub mod instant;
pub mod lookup;
pub mod normalize;
pub mod resolver;

pub use instant::{extract_abstract, mine_lifespan_fact, DuckDuckGoClient, InstantAnswer};
pub use lookup::{KnowledgeLookup, NullLookup, PageSummary, WikiLookup};
pub use normalize::{collapse_whitespace, normalize_label};
pub use resolver::KnowledgeResolver;
