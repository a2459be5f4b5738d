//! Shared attribute code for all types of netlink attributes.
//!
//! Attributes are packed end to end in the payload of a netlink
//! message as `nla_len` (`u16`), `nla_type` (`u16`), and `nla_len - 4`
//! bytes of payload, with every record padded out to a 4 byte
//! boundary. [`AttrWalker`] steps through such a stream lazily,
//! borrowing payloads straight out of the receive buffer, and
//! [`AttrTable`] drains a walker into a sparse type-to-record mapping.
//!
//! # Design decisions
//! The walker never fails; a malformed or short record terminates the
//! walk and everything decoded up to that point remains usable. Whether
//! the terminating record was cut off by the buffer end is observable
//! through [`AttrWalker::truncated`] after iteration so that callers
//! can log the condition. Attribute types are kept exactly as they
//! appeared on the wire; the `NLA_F_NESTED` and `NLA_F_NET_BYTEORDER`
//! bits are masked off only when looking records up by type.

use std::{
    io::{self, Write},
    slice,
};

use byteorder::{ByteOrder, NativeEndian, WriteBytesExt};

use crate::{bytes::SliceCursor, consts::alignto};

/// Length of the header on every netlink attribute.
pub const NLA_HDRLEN: usize = 4;

/// Strip the `NLA_F_NESTED` and `NLA_F_NET_BYTEORDER` bits off a wire
/// attribute type, leaving the value used for table lookups.
pub fn nla_type_of(raw: u16) -> u16 {
    raw & libc::NLA_TYPE_MASK as u16
}

/// A single netlink attribute borrowed from a receive buffer.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct Attr<'a> {
    /// Declared length of the record including its header.
    pub nla_len: u16,
    /// Attribute type exactly as it appeared on the wire, high bits
    /// included.
    pub nla_type: u16,
    /// Payload of the attribute, `nla_len - 4` bytes long.
    pub payload: &'a [u8],
}

impl<'a> Attr<'a> {
    /// Attribute type with the high flag bits masked off.
    pub fn atype(&self) -> u16 {
        nla_type_of(self.nla_type)
    }

    /// Whether the sender marked this attribute as a nested container.
    pub fn nested(&self) -> bool {
        self.nla_type & libc::NLA_F_NESTED as u16 != 0
    }
}

/// Lazy iterator over a packed attribute stream.
///
/// Termination rules:
/// * fewer than [`NLA_HDRLEN`] bytes left: end of stream, flagged
///   truncated if the leftover is not empty;
/// * `nla_len` below [`NLA_HDRLEN`]: malformed record, walk stops;
/// * declared payload running past the end of the buffer: walk stops
///   and the stream is flagged truncated.
///
/// Records produced before the walk stopped are always valid.
#[derive(Debug)]
pub struct AttrWalker<'a> {
    cur: SliceCursor<'a>,
    truncated: bool,
    done: bool,
}

impl<'a> AttrWalker<'a> {
    /// Walk the attribute stream contained in `buf`.
    pub fn new(buf: &'a [u8]) -> Self {
        AttrWalker {
            cur: SliceCursor::new(buf),
            truncated: false,
            done: false,
        }
    }

    /// Whether the walk ended because a record was cut off by the end
    /// of the buffer. Meaningful once the iterator has returned
    /// [`None`].
    pub fn truncated(&self) -> bool {
        self.truncated
    }
}

impl<'a> Iterator for AttrWalker<'a> {
    type Item = Attr<'a>;

    fn next(&mut self) -> Option<Attr<'a>> {
        if self.done {
            return None;
        }
        let hdr = match self.cur.take(NLA_HDRLEN) {
            Ok(hdr) => hdr,
            Err(_) => {
                // A fragment shorter than an attribute header means the
                // stream was cut off mid record.
                self.truncated = !self.cur.is_empty();
                self.done = true;
                return None;
            }
        };
        let nla_len = <NativeEndian as ByteOrder>::read_u16(&hdr[..2]);
        let nla_type = <NativeEndian as ByteOrder>::read_u16(&hdr[2..]);
        if (nla_len as usize) < NLA_HDRLEN {
            // Zero and sub-header lengths cannot advance the walk.
            self.done = true;
            return None;
        }
        let payload = match self.cur.take(nla_len as usize - NLA_HDRLEN) {
            Ok(payload) => payload,
            Err(_) => {
                self.truncated = true;
                self.done = true;
                return None;
            }
        };
        // The final record of a stream may omit its trailer padding.
        self.cur
            .skip(alignto(nla_len as usize) - nla_len as usize);
        Some(Attr {
            nla_len,
            nla_type,
            payload,
        })
    }
}

/// A sparse mapping from attribute type to record, built by draining an
/// [`AttrWalker`].
///
/// Lookup is by masked type. When a type occurs more than once the
/// first occurrence wins and later duplicates are never returned;
/// iteration still yields every record in wire order.
#[derive(Debug, Default)]
pub struct AttrTable<'a> {
    attrs: Vec<Attr<'a>>,
    truncated: bool,
}

impl<'a> AttrTable<'a> {
    /// Parse the attribute stream in `buf` into a table.
    pub fn parse(buf: &'a [u8]) -> Self {
        let mut walker = AttrWalker::new(buf);
        let attrs = walker.by_ref().collect();
        AttrTable {
            attrs,
            truncated: walker.truncated(),
        }
    }

    /// Look up the first record with the given masked type.
    pub fn get(&self, atype: u16) -> Option<&Attr<'a>> {
        self.attrs.iter().find(|attr| attr.atype() == atype)
    }

    /// Whether a record with the given masked type is present.
    pub fn contains(&self, atype: u16) -> bool {
        self.get(atype).is_some()
    }

    /// Iterate over the records in wire order.
    pub fn iter(&self) -> slice::Iter<'_, Attr<'a>> {
        self.attrs.iter()
    }

    /// Number of records in the table, duplicates included.
    pub fn len(&self) -> usize {
        self.attrs.len()
    }

    /// Returns `true` when the walk produced no records at all.
    pub fn is_empty(&self) -> bool {
        self.attrs.is_empty()
    }

    /// Whether the underlying walk ended on a cut off record.
    pub fn truncated(&self) -> bool {
        self.truncated
    }

    /// Drop every record the predicate rejects, preserving order.
    pub fn retain<F>(&mut self, f: F)
    where
        F: FnMut(&Attr<'a>) -> bool,
    {
        self.attrs.retain(f);
    }
}

impl<'a, 'b> IntoIterator for &'b AttrTable<'a> {
    type Item = &'b Attr<'a>;
    type IntoIter = slice::Iter<'b, Attr<'a>>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

/// Append one attribute record, padded to the 4 byte boundary, to an
/// outgoing message buffer.
pub fn put_attr(buf: &mut Vec<u8>, nla_type: u16, payload: &[u8]) -> io::Result<()> {
    let nla_len = NLA_HDRLEN + payload.len();
    if nla_len > u16::MAX as usize {
        return Err(io::Error::new(
            io::ErrorKind::InvalidInput,
            "attribute payload too long",
        ));
    }
    buf.write_u16::<NativeEndian>(nla_len as u16)?;
    buf.write_u16::<NativeEndian>(nla_type)?;
    buf.write_all(payload)?;
    for _ in nla_len..alignto(nla_len) {
        buf.write_u8(0)?;
    }
    Ok(())
}

#[cfg(test)]
mod test {
    use super::*;

    use byteorder::WriteBytesExt;

    fn put_u32_attr(buf: &mut Vec<u8>, nla_type: u16, value: u32) {
        let mut payload = Vec::new();
        payload.write_u32::<NativeEndian>(value).unwrap();
        put_attr(buf, nla_type, &payload).unwrap();
    }

    #[test]
    fn test_walk_parses_packed_records() {
        let mut buf = Vec::new();
        put_u32_attr(&mut buf, 3, 7);
        put_attr(&mut buf, 6, &[0xaa, 0xbb, 0xcc, 0xdd, 0xee, 0xff]).unwrap();
        put_attr(&mut buf, 9, &[]).unwrap();

        let mut walker = AttrWalker::new(&buf);
        let first = walker.next().unwrap();
        assert_eq!(first.nla_len, 8);
        assert_eq!(first.atype(), 3);
        assert_eq!(first.payload.len(), 4);
        let second = walker.next().unwrap();
        assert_eq!(second.atype(), 6);
        assert_eq!(second.payload, &[0xaa, 0xbb, 0xcc, 0xdd, 0xee, 0xff]);
        let third = walker.next().unwrap();
        assert_eq!(third.nla_len, 4);
        assert!(third.payload.is_empty());
        assert!(walker.next().is_none());
        assert!(!walker.truncated());
    }

    #[test]
    fn test_walk_reencode_round_trips() {
        let mut buf = Vec::new();
        put_u32_attr(&mut buf, 1, 0x01020304);
        put_attr(&mut buf, 2, &[0x11]).unwrap();
        put_attr(&mut buf, 3, b"wlan0\0").unwrap();

        let records = AttrWalker::new(&buf).collect::<Vec<_>>();
        let mut reencoded = Vec::new();
        for record in &records {
            put_attr(&mut reencoded, record.nla_type, record.payload).unwrap();
        }
        assert_eq!(reencoded, buf);
    }

    #[test]
    fn test_declared_length_past_end_terminates() {
        let mut buf = Vec::new();
        put_u32_attr(&mut buf, 1, 1);
        put_u32_attr(&mut buf, 2, 2);
        // Header claims six payload bytes with only three present.
        buf.write_u16::<NativeEndian>(10).unwrap();
        buf.write_u16::<NativeEndian>(3).unwrap();
        buf.extend_from_slice(&[0xde, 0xad, 0xbe]);

        let mut walker = AttrWalker::new(&buf);
        assert_eq!(walker.next().unwrap().atype(), 1);
        assert_eq!(walker.next().unwrap().atype(), 2);
        assert!(walker.next().is_none());
        assert!(walker.truncated());
        // Re-polling an exhausted walker stays terminated.
        assert!(walker.next().is_none());
    }

    #[test]
    fn test_sub_header_length_terminates() {
        let mut buf = Vec::new();
        put_u32_attr(&mut buf, 1, 1);
        buf.write_u16::<NativeEndian>(2).unwrap();
        buf.write_u16::<NativeEndian>(5).unwrap();
        put_u32_attr(&mut buf, 2, 2);

        let mut walker = AttrWalker::new(&buf);
        assert_eq!(walker.next().unwrap().atype(), 1);
        assert!(walker.next().is_none());
        assert!(!walker.truncated());
    }

    #[test]
    fn test_header_fragment_flags_truncated() {
        let mut buf = Vec::new();
        put_u32_attr(&mut buf, 1, 1);
        buf.extend_from_slice(&[0x08, 0x00]);

        let mut walker = AttrWalker::new(&buf);
        assert_eq!(walker.next().unwrap().atype(), 1);
        assert!(walker.next().is_none());
        assert!(walker.truncated());
    }

    #[test]
    fn test_final_record_may_omit_padding() {
        let mut buf = Vec::new();
        put_u32_attr(&mut buf, 1, 1);
        buf.write_u16::<NativeEndian>(5).unwrap();
        buf.write_u16::<NativeEndian>(7).unwrap();
        buf.push(0x2a);

        let mut walker = AttrWalker::new(&buf);
        assert_eq!(walker.next().unwrap().atype(), 1);
        let last = walker.next().unwrap();
        assert_eq!(last.atype(), 7);
        assert_eq!(last.payload, &[0x2a]);
        assert!(walker.next().is_none());
        assert!(!walker.truncated());
    }

    #[test]
    fn test_empty_stream() {
        let table = AttrTable::parse(&[]);
        assert!(table.is_empty());
        assert!(!table.truncated());
    }

    #[test]
    fn test_table_first_duplicate_wins() {
        let mut buf = Vec::new();
        put_u32_attr(&mut buf, 7, 111);
        put_u32_attr(&mut buf, 7, 222);

        let table = AttrTable::parse(&buf);
        assert_eq!(table.len(), 2);
        let mut payload = Vec::new();
        payload.write_u32::<NativeEndian>(111).unwrap();
        assert_eq!(table.get(7).unwrap().payload, payload.as_slice());
    }

    #[test]
    fn test_high_bits_masked_for_lookup() {
        let mut buf = Vec::new();
        let nested_type = 21 | libc::NLA_F_NESTED as u16;
        put_attr(&mut buf, nested_type, &[0, 0, 0, 0]).unwrap();

        let table = AttrTable::parse(&buf);
        let attr = table.get(21).unwrap();
        assert_eq!(attr.nla_type, nested_type);
        assert_eq!(attr.atype(), 21);
        assert!(attr.nested());
    }

    #[test]
    fn test_retain_drops_rejected_records() {
        let mut buf = Vec::new();
        put_u32_attr(&mut buf, 1, 1);
        put_attr(&mut buf, 2, &[0xff]).unwrap();
        put_u32_attr(&mut buf, 3, 3);

        let mut table = AttrTable::parse(&buf);
        table.retain(|attr| attr.payload.len() == 4);
        assert_eq!(table.len(), 2);
        assert!(table.get(1).is_some());
        assert!(table.get(2).is_none());
        assert!(table.get(3).is_some());
    }
}
