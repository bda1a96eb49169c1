//! HTTP API surface

pub mod a2a;
