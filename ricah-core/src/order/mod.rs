//! Media-order reconciliation.
//!
//! The persisted order list is authoritative for every id it mentions; the
//! object store is authoritative for what exists. [`display_sequence`]
//! reconciles the two, and [`OrderService`] keeps them consistent across
//! upload, delete, and manual reorder.

pub mod sequence;
pub mod service;

pub use sequence::{append, display_sequence, remove, shuffled};
pub use service::OrderService;
