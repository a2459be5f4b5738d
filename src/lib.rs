//! # Wireless station telemetry over netlink
//!
//! ## Rationale
//!
//! This crate talks to the kernel's 802.11 stack through generic
//! netlink and to the routing stack through rtnetlink, in pure Rust
//! over `libc` sockets. Kernel constants are wrapped in enums so that
//! values parsed out of received messages are checked against a known
//! set instead of being passed around as bare integers.
//!
//! Received messages are treated as untrusted input. Every length
//! field is checked against the bytes actually present before a slice
//! is taken; a truncated or malformed attribute stream ends the walk
//! early instead of reading past the end. Attributes whose payload
//! width does not match the expected width for their type are dropped
//! one at a time, keeping the rest of the message usable.
//!
//! The two binaries built from this library are `stadump`, which asks
//! for the station table of a wireless interface and prints one
//! report per associated peer, and `linkwatch`, which subscribes to
//! link change notifications and traces them.

#![deny(missing_docs)]

/// C constants defined as types
pub mod consts;
/// Wrapper for `libc` sockets
pub mod socket;
/// Bounds checked reads from received byte buffers
pub mod bytes;
/// Netlink attribute handler
pub mod attr;
/// Per-context attribute width policies
pub mod policy;
/// Top-level netlink header
pub mod nl;
/// Genetlink (generic netlink) header
pub mod genl;
/// Station telemetry decoding and report rendering
pub mod station;
/// Route netlink link notifications
pub mod rtnl;
/// Error module
pub mod err;
