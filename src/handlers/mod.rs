//! HTTP handlers, one module per resource.

pub mod coffee;
pub mod pugs;
