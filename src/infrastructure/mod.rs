//! Infrastructure layer: external system integrations.

pub mod persistence;
