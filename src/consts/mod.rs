//! # High level notes
//!
//! The enums in this module are created by the exported [`impl_var`]
//! macro, which pairs each constant set with conversions to and from
//! its wire representation.
//!
//! Most of these constants come from the Linux kernel headers, which
//! can be found in `/usr/include/linux` on many distros; the nl80211
//! sets come from `linux/nl80211.h`. See also `man 7 netlink` and
//! `man 7 rtnetlink`.
//!
//! # Design decisions
//!
//! * Enums are used so that values parsed out of received messages are
//!   checked against a finite set instead of whatever range the C
//!   struct member admits, which catches garbage early.
//! * `UnrecognizedVariant` is included in each enum because
//!   completeness cannot be guaranteed for every constant in every
//!   kernel version. An attribute type this crate has never heard of
//!   still parses, still carries its payload, and can still be
//!   reported with its numeric value.
//! * Flag sets (`NLM_F_*`, `IFF_*`) use [`bitflags`] rather than
//!   enums; they are combined values, not points.

#[macro_use]
mod macros;

/// Constants related to generic netlink
pub mod genl;
pub use crate::consts::genl::*;
/// Constants related to the top level netlink header
pub mod nl;
pub use crate::consts::nl::*;
/// Constants for the 802.11 generic netlink family
pub mod nl80211;
pub use crate::consts::nl80211::*;
/// Constants related to rtnetlink link messages
pub mod rtnl;
pub use crate::consts::rtnl::*;

/// Reimplementation of the `NLA_ALIGN` macro in C
pub fn alignto(len: usize) -> usize {
    (len + libc::NLA_ALIGNTO as usize - 1) & !(libc::NLA_ALIGNTO as usize - 1)
}
