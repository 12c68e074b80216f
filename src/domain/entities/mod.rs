//! Core business entities.

pub mod link;

pub use link::{CreateLinkRequest, Link, LinkStatus, UpdateLinkRequest};
