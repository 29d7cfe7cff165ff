//! Shared test utilities for the dataset-reconciler workspace.
//!
//! Dev-dependency only, never published.
//!
//! # Modules
//!
//! - [`dirs`]: [`TestDirs`] builder for temporary directory layouts
//! - [`faulty`]: [`FaultyFs`], a `LocalFs` wrapper that fails chosen operations

pub mod dirs;
pub mod faulty;

pub use dirs::TestDirs;
pub use faulty::{FaultyFs, Op};
