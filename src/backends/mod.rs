//! Inference backend implementations
//!
//! Real model backends live with their host applications; this crate ships
//! only the deterministic mock used for testing and debugging the
//! compositing pipeline without a model.

pub mod mock;

pub use self::mock::MockBackend;
