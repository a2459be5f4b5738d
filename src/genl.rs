//! This module contains the generic netlink header code. Generic
//! netlink multiplexes protocol families over a single netlink
//! protocol number; the `Genlmsghdr` header selects the command within
//! a family and is followed directly by the family's attributes.
//!
//! # Design decisions
//!
//! The attribute stream after the header is not parsed here. It stays
//! a byte slice so that the attribute layer in
//! [`attr`][crate::attr] can walk it lazily against the policy of the
//! resolved family.

use std::io;

use byteorder::{NativeEndian, WriteBytesExt};

use crate::{bytes::SliceCursor, err::DeError};

/// Length of the header on every generic netlink message.
pub const GENL_HDRLEN: usize = 4;

/// Struct representing the generic netlink header
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct Genlmsghdr {
    /// Generic netlink message command
    pub cmd: u8,
    /// Version of the generic netlink family protocol
    pub version: u8,
    reserved: u16,
}

impl Genlmsghdr {
    /// Create a new generic netlink header
    pub fn new(cmd: u8, version: u8) -> Self {
        Genlmsghdr {
            cmd,
            version,
            reserved: 0,
        }
    }

    /// Parse a header from the front of `cur`.
    pub fn parse(cur: &mut SliceCursor) -> Result<Self, DeError> {
        let cmd = cur.read_u8()?;
        let version = cur.read_u8()?;
        let reserved = cur.read_u16()?;
        Ok(Genlmsghdr {
            cmd,
            version,
            reserved,
        })
    }

    /// Append the wire form of this header to an outgoing buffer.
    pub fn emit(&self, buf: &mut Vec<u8>) -> io::Result<()> {
        buf.write_u8(self.cmd)?;
        buf.write_u8(self.version)?;
        buf.write_u16::<NativeEndian>(self.reserved)?;
        Ok(())
    }
}
