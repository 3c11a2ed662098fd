//! Corroborate Domain Layer
//!
//! Record shapes shared by every stage of the corroboration core. The types
//! here carry no algorithms; weighting, canonicalization, scoring, calibration
//! and contradiction resolution live in `corroborate-scoring`.
//!
//! ## Key Concepts
//!
//! - **Source**: A retrieved document with a derived trust weight
//! - **Evidence card**: A snippet from a source with reliability and verification
//! - **Claim**: A typed assertion with polarity, backed by evidence cards
//! - **Edge**: A judged relation between two claims of the same type
//! - **Resolution**: The auditable outcome for one cluster of contradicting claims
//!
//! ## Architecture
//!
//! - Only `serde` as an external dependency, so records can be written to a ledger
//! - Capability traits for collaborators the core does not implement itself
//!   (relation and resolution judgment)

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod claim;
pub mod confidence;
pub mod evidence;
pub mod relationship;
pub mod resolution;
pub mod source;
pub mod traits;

// Re-exports for convenience
pub use claim::{Claim, ClaimId, ClaimType, Polarity};
pub use confidence::ConfidenceComponents;
pub use evidence::{EvidenceCard, EvidenceId, Verification, VerificationMethod};
pub use relationship::{Edge, Relation};
pub use resolution::Resolution;
pub use source::{Source, SourceId, SourceType};
