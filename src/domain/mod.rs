//! Domain layer: entities, access context, clock, and store boundaries.

pub mod access;
pub mod clock;
pub mod entities;
pub mod repositories;
