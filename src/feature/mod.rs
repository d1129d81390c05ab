//! Feature assembly subsystem.
//!
//! # Data Flow
//! ```text
//! (gene id, optional transcript id)
//!     → service.rs (validate, 4 concurrent upstream fetches)
//!     → domains first: transcript filter, no rows → NoProteinCodingTranscript
//!     → frequency enrichment, malformed-variant filter, variant transcript filter
//!     → join.rs (group by transcript, pick canonical, resolve sequences)
//!     → document.rs (project into the response document)
//! ```
//!
//! # Design Decisions
//! - Pure per request: identical upstream data gives an identical document
//! - Any upstream failure fails the whole request; no partial documents
//! - A gene without domain rows is reported as non-coding before other failures

pub mod document;
pub mod error;
pub mod join;
pub mod service;

pub use document::{
    build_document, DomainFeature, FeatureDocument, Protein, ProteinSequences, VariantFeature,
};
pub use error::{FeatureError, FeatureResult};
pub use join::{join_canonical, CanonicalTranscript, TranscriptGroup, TranscriptIndex};
pub use service::FeatureService;
