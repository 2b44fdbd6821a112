//! Host-testable library interface for btn2ble.
//!
//! The link core - connection lifecycle, post-connect negotiation and
//! button-state notification - is pure logic over an injected transport
//! and builds on the host with default features.
//!
//! Usage: `cargo test --lib`
//!
//! The embedded firmware (`--features embedded`) layers the Nordic
//! SoftDevice transport, advertising and GPIO glue on top; see main.rs.

#![cfg_attr(not(test), no_std)]

pub mod config;
pub mod error;
pub mod link;

// ═══════════════════════════════════════════════════════════════════════════
// Unit Tests
// ═══════════════════════════════════════════════════════════════════════════
