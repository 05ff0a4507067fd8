//! Verification record storage
//!
//! - `InMemoryVerificationStore` - process-local store for development and tests

pub mod memory_store;

pub use memory_store::InMemoryVerificationStore;

#[cfg(test)]
mod tests;
