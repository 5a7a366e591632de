//! Integration tests for image-manifest
//!
//! Tests that need a live container runtime.

pub mod docker;
