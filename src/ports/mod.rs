// SPDX-License-Identifier: MIT OR Apache-2.0

//! Ports layer containing trait definitions.
//!
//! This module contains the traits (ports) the configuration service depends
//! on. The cache and the durable store are implemented by adapters in the
//! adapters layer and know nothing about each other.

pub mod cache;
pub mod durable;

// Re-export commonly used types
pub use cache::ConfigCache;
pub use durable::DurableStore;
