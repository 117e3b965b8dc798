//! Platform abstraction layer
//!
//! Handles browser/native differences for:
//! - Storage (LocalStorage on web, nothing natively)
//! - Network requests (question pool, telemetry)

#[cfg(target_arch = "wasm32")]
pub mod net;
pub mod storage;
