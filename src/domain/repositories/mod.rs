//! Repository traits defining the store adapter boundary.

pub mod link_repository;

pub use link_repository::{LinkChanges, LinkRepository};

#[cfg(test)]
pub use link_repository::MockLinkRepository;
