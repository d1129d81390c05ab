//! Annotation decoding subsystem.
//!
//! # Data Flow
//! ```text
//! BioMart TSV body
//!     → tabular.rs (split lines/fields, coerce by attribute kind)
//!     → attributes.rs (ordered attribute list per query purpose)
//!     → records.rs (typed DomainRecord / VariantRecord)
//! ```
//!
//! # Design Decisions
//! - Attribute order is the wire contract: the same list builds the BioMart
//!   query and decodes its rows positionally
//! - Decoding is lenient: short rows are padded, long rows truncated,
//!   unparseable numbers become `None`

pub mod attributes;
pub mod records;
pub mod tabular;

pub use attributes::{AttributeKind, AttributeSchema, DOMAIN_ATTRIBUTES, VARIANT_ATTRIBUTES};
pub use records::{DomainRecord, SequenceRecord, VariantRecord};
pub use tabular::{parse_records, parse_rows, Row, TabularRecord, Value};
