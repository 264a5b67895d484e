//! Repository implementations.
//!
//! - [`local`]: In-memory implementation for unit testing and local
//!   development (feature `local-repo`, enabled by default).
//!
//! The hosted relational backend used in production is reached through the
//! same traits by the surrounding product; this crate ships only the local
//! stand-in.

#[cfg(feature = "local-repo")]
pub mod local;

#[cfg(feature = "local-repo")]
pub use local::LocalRepository;
