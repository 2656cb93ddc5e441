//! The independent verification checks.
//!
//! Each check reads only the immutable entry list and the read-only
//! accessor, so they can run in any order, or not at all, without
//! affecting one another's outcome.

pub mod completeness;
pub mod fixity;
pub mod orphans;
pub mod validity;
