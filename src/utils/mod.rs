//! Shared utilities.

pub mod id_allocator;
