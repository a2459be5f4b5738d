//! This module contains the top level netlink header code and message
//! framing. Every netlink message is encapsulated in a top level
//! `Nlmsghdr`.
//!
//! A single datagram read from a netlink socket can carry several
//! messages back to back, each 4 byte aligned; [`NlMessageIter`] steps
//! through them and hands out the header together with a payload slice
//! borrowed from the receive buffer. Interpreting the payload is left
//! to the caller since it depends on the message type.

use std::io;

use byteorder::{NativeEndian, WriteBytesExt};

use crate::{
    bytes::SliceCursor,
    consts::{alignto, nl::NlmF},
    err::DeError,
};

/// Length of the header on every netlink message.
pub const NLMSG_HDRLEN: usize = 16;

/// Top level netlink header.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct Nlmsghdr {
    /// Length of the netlink message including this header
    pub nl_len: u32,
    /// Type of the netlink message
    pub nl_type: u16,
    /// Flags indicating properties of the request or response
    pub nl_flags: NlmF,
    /// Sequence number for netlink protocol
    pub nl_seq: u32,
    /// ID of the netlink destination for requests and source for
    /// responses
    pub nl_pid: u32,
}

impl Nlmsghdr {
    /// Create a new top level netlink header for a message of
    /// `nl_len` bytes.
    pub fn new(nl_len: u32, nl_type: u16, nl_flags: NlmF, nl_seq: u32, nl_pid: u32) -> Self {
        Nlmsghdr {
            nl_len,
            nl_type,
            nl_flags,
            nl_seq,
            nl_pid,
        }
    }

    /// Parse a header from the front of `cur`.
    pub fn parse(cur: &mut SliceCursor) -> Result<Self, DeError> {
        let nl_len = cur.read_u32()?;
        let nl_type = cur.read_u16()?;
        let nl_flags = NlmF::from_bits_retain(cur.read_u16()?);
        let nl_seq = cur.read_u32()?;
        let nl_pid = cur.read_u32()?;
        Ok(Nlmsghdr {
            nl_len,
            nl_type,
            nl_flags,
            nl_seq,
            nl_pid,
        })
    }

    /// Append the wire form of this header to an outgoing buffer.
    pub fn emit(&self, buf: &mut Vec<u8>) -> io::Result<()> {
        buf.write_u32::<NativeEndian>(self.nl_len)?;
        buf.write_u16::<NativeEndian>(self.nl_type)?;
        buf.write_u16::<NativeEndian>(self.nl_flags.bits())?;
        buf.write_u32::<NativeEndian>(self.nl_seq)?;
        buf.write_u32::<NativeEndian>(self.nl_pid)?;
        Ok(())
    }
}

/// One netlink message framed out of a datagram.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct NlMessage<'a> {
    /// The message header.
    pub header: Nlmsghdr,
    /// Payload bytes following the header, `nl_len - 16` long.
    pub payload: &'a [u8],
}

/// Iterator over the messages packed into one received datagram.
///
/// Framing follows the kernel's `NLMSG_OK`/`NLMSG_NEXT` rules: the
/// walk ends at the first header that does not fit, declares a length
/// below the header size, or declares more payload than the datagram
/// holds. Messages framed before that point remain valid.
#[derive(Debug)]
pub struct NlMessageIter<'a> {
    cur: SliceCursor<'a>,
    done: bool,
}

impl<'a> NlMessageIter<'a> {
    /// Iterate over the messages in `buf`.
    pub fn new(buf: &'a [u8]) -> Self {
        NlMessageIter {
            cur: SliceCursor::new(buf),
            done: false,
        }
    }
}

impl<'a> Iterator for NlMessageIter<'a> {
    type Item = NlMessage<'a>;

    fn next(&mut self) -> Option<NlMessage<'a>> {
        if self.done {
            return None;
        }
        let header = match Nlmsghdr::parse(&mut self.cur) {
            Ok(header) => header,
            Err(_) => {
                self.done = true;
                return None;
            }
        };
        if (header.nl_len as usize) < NLMSG_HDRLEN {
            self.done = true;
            return None;
        }
        let payload_len = header.nl_len as usize - NLMSG_HDRLEN;
        let payload = match self.cur.take(payload_len) {
            Ok(payload) => payload,
            Err(_) => {
                self.done = true;
                return None;
            }
        };
        self.cur
            .skip(alignto(header.nl_len as usize) - header.nl_len as usize);
        Some(NlMessage { header, payload })
    }
}
