//! Redirect rule sources.
//!
//! # Data Flow
//! ```text
//! rule file bytes (YAML/JSON)
//!     → record.rs (decode into ordered PathRecord list)
//!     → table.rs (build immutable path → url table)
//!
//! redb store file
//!     → store.rs (read-only lookups, consulted per request)
//! ```
//!
//! # Design Decisions
//! - Decoding and table building happen once, at startup
//! - Store lookups are not cached; the store is the source of truth

pub mod record;
pub mod store;
pub mod table;

pub use record::{decode, encode, DecodeError, Encoding, PathRecord};
pub use store::StoreError;
pub use table::MappingTable;
