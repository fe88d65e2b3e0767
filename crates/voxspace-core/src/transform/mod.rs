//! Transform types and operations.
//!
//! Resampling regrids in place, so the only transform needed maps output
//! physical points onto themselves.

pub mod trait_;
pub mod identity;

pub use trait_::Transform;
pub use identity::IdentityTransform;
