//! Display formatting functions and result types.
//!
//! Domain models implement `Display` directly; collections and operation
//! results get newtype wrappers so each output context formats consistently.
//!
//! ```text
//! ┌─────────────────┐    ┌─────────────────┐    ┌─────────────────┐
//! │  Domain Models  │    │  Wrappers       │    │   Formatted     │
//! │  (Book, ...)    │───▶│ (Books, Create- │───▶│    Output       │
//! │                 │    │  Result, ...)   │    │   (markdown)    │
//! └─────────────────┘    └─────────────────┘    └─────────────────┘
//! ```
//!
//! ## Module Organization
//!
//! - [`collections`]: Collection wrapper types (Books, Reminders)
//! - [`results`]: Operation result types (CreateResult, UpdateResult, DeleteResult)
//! - [`status`]: Status and confirmation messages (OperationStatus)
//! - [`datetime`]: Date/time formatting utilities
//! - [`models`]: Display implementations for domain models
//!
//! ## Usage
//!
//! ```rust
//! use shelf_core::display::OperationStatus;
//!
//! let done = OperationStatus::success("Reminders cleared".to_string());
//! assert_eq!(done.to_string(), "Success: Reminders cleared\n");
//! ```

pub mod collections;
pub mod datetime;
pub mod models;
pub mod results;
pub mod status;

pub use collections::{Books, Reminders};
pub use datetime::LocalDateTime;
pub use results::{CreateResult, DeleteResult, UpdateResult};
pub use status::OperationStatus;
