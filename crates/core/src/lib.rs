//! Pure domain logic for the Spotlight selection engine.
//!
//! Everything in this crate is synchronous and side-effect free: the
//! repository layer loads a snapshot of a content item's state, the functions
//! here decide which video is live (and what cursor value to persist), and
//! the repository writes the outcome back inside the same transaction.
//!
//! This crate has zero internal deps so the decision logic can be unit-tested
//! without a database.

pub mod eligibility;
pub mod error;
pub mod rotation;
pub mod schedule;
pub mod selection;
pub mod subscription;
pub mod types;
