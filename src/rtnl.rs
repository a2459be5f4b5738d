//! Link state change messages from the routing subsystem.
//!
//! Binding an `NETLINK_ROUTE` socket with the link multicast group in
//! its group mask delivers an unsolicited message whenever an
//! interface appears, disappears, or changes flags. Each message is a
//! fixed `ifinfomsg` header followed by `IFLA_*` attributes.
//!
//! # Design decisions
//! Every received message gets its netlink header echoed before the
//! type is even examined, so control messages leave a trace in the
//! output too. The `ifi_change` word names the bits that actually
//! changed; flags carrying it are marked `(C)` in the flag listing.

use std::str;

use crate::{
    attr::AttrTable,
    bytes::SliceCursor,
    consts::rtnl::{rtm_type_name, Ifla, Iff, IFF_NAMES},
    err::DeError,
    nl::{NlMessage, Nlmsghdr},
    station::MacAddr,
};

/// Length of the fixed link message header.
pub const IFINFOMSG_LEN: usize = 16;

/// The fixed header of a link message, one padding byte after the
/// family elided.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct Ifinfomsg {
    /// Address family, `AF_UNSPEC` in link messages.
    pub ifi_family: u8,
    /// ARPHRD hardware type.
    pub ifi_type: u16,
    /// Interface index.
    pub ifi_index: i32,
    /// Current interface flag word.
    pub ifi_flags: u32,
    /// Mask of flag bits this notification changed.
    pub ifi_change: u32,
}

impl Ifinfomsg {
    /// Read the fixed header off the front of a message payload.
    pub fn parse(cur: &mut SliceCursor) -> Result<Self, DeError> {
        let ifi_family = cur.read_u8()?;
        let _pad = cur.read_u8()?;
        let ifi_type = cur.read_u16()?;
        let ifi_index = cur.read_i32()?;
        let ifi_flags = cur.read_u32()?;
        let ifi_change = cur.read_u32()?;
        Ok(Ifinfomsg {
            ifi_family,
            ifi_type,
            ifi_index,
            ifi_flags,
            ifi_change,
        })
    }
}

/// Echo one netlink header the way the listener traces every message
/// it sees.
pub fn render_message_line(hdr: &Nlmsghdr, out: &mut String) {
    out.push_str(&format!(
        "netlink message: len = {}, type = {}, flags = 0x{:X}, seq = {}, pid = {}\n",
        hdr.nl_len,
        hdr.nl_type,
        hdr.nl_flags.bits(),
        hdr.nl_seq,
        hdr.nl_pid
    ));
}

/// One decoded link notification.
#[derive(Debug)]
pub struct LinkEvent<'a> {
    /// The netlink header the notification arrived under.
    pub header: Nlmsghdr,
    /// The fixed link header.
    pub ifi: Ifinfomsg,
    attrs: AttrTable<'a>,
}

impl<'a> LinkEvent<'a> {
    /// Decode the fixed header and the attributes following it. Fails
    /// only when the payload is too short to hold an `ifinfomsg`.
    pub fn decode(msg: &NlMessage<'a>) -> Result<Self, DeError> {
        let mut cur = SliceCursor::new(msg.payload);
        let ifi = Ifinfomsg::parse(&mut cur)?;
        let attrs = AttrTable::parse(cur.rest());
        Ok(LinkEvent {
            header: msg.header,
            ifi,
            attrs,
        })
    }

    /// The interface name attribute, with its terminating NUL and
    /// anything after it dropped.
    pub fn ifname(&self) -> Option<&'a str> {
        let attr = self.attrs.get(u16::from(Ifla::Ifname))?;
        let end = attr
            .payload
            .iter()
            .position(|byte| *byte == 0)
            .unwrap_or(attr.payload.len());
        str::from_utf8(&attr.payload[..end]).ok()
    }

    /// The interface hardware address attribute.
    pub fn address(&self) -> Option<MacAddr> {
        self.attrs
            .get(u16::from(Ifla::Address))
            .and_then(|attr| MacAddr::from_bytes(attr.payload))
    }

    /// Render the notification body: the fixed header fields, the
    /// message type name, the flag listing, and the name and address
    /// attributes when present.
    pub fn render(&self, out: &mut String) {
        out.push_str(&format!(
            "\tifi_family = {}, ifi_type = {}, ifi_index = {}, ifi_flags = 0x{:X}, ifi_change = 0x{:X}\n",
            self.ifi.ifi_family,
            self.ifi.ifi_type,
            self.ifi.ifi_index as u32,
            self.ifi.ifi_flags,
            self.ifi.ifi_change
        ));

        match rtm_type_name(self.header.nl_type) {
            Some(name) => out.push_str(&format!("\t\tMsg Type: {}\n", name)),
            None => out.push_str(&format!("\t\tMsg Type: unknown({})\n", self.header.nl_type)),
        }

        let flags = Iff::from_bits_retain(self.ifi.ifi_flags);
        let change = Iff::from_bits_retain(self.ifi.ifi_change);
        out.push_str("\t\tflags: ");
        for (flag, name) in IFF_NAMES {
            if flags.contains(flag) {
                out.push_str(name);
                if change.contains(flag) {
                    out.push_str("(C)");
                }
                out.push(' ');
            }
        }
        out.push('\n');

        if let Some(name) = self.ifname() {
            out.push_str(&format!("\t\tifname: {}\n", name));
        }
        if let Some(addr) = self.address() {
            out.push_str(&format!("\t\taddress: {}\n", addr));
        }
    }
}

#[cfg(test)]
mod test {
    use super::*;

    use byteorder::{NativeEndian, WriteBytesExt};

    use crate::{attr::put_attr, consts::nl::NlmF};

    fn ifinfomsg_bytes(
        family: u8,
        iftype: u16,
        index: i32,
        flags: u32,
        change: u32,
    ) -> Vec<u8> {
        let mut buf = Vec::new();
        buf.write_u8(family).unwrap();
        buf.write_u8(0).unwrap();
        buf.write_u16::<NativeEndian>(iftype).unwrap();
        buf.write_i32::<NativeEndian>(index).unwrap();
        buf.write_u32::<NativeEndian>(flags).unwrap();
        buf.write_u32::<NativeEndian>(change).unwrap();
        buf
    }

    #[test]
    fn test_ifinfomsg_parse() {
        let buf = ifinfomsg_bytes(0, 1, 3, 0x11043, 0x1);
        let mut cur = SliceCursor::new(&buf);
        let ifi = Ifinfomsg::parse(&mut cur).unwrap();
        assert_eq!(ifi.ifi_family, 0);
        assert_eq!(ifi.ifi_type, 1);
        assert_eq!(ifi.ifi_index, 3);
        assert_eq!(ifi.ifi_flags, 0x11043);
        assert_eq!(ifi.ifi_change, 0x1);
        assert!(cur.is_empty());
    }

    #[test]
    fn test_ifinfomsg_short_payload() {
        let buf = ifinfomsg_bytes(0, 1, 3, 0, 0);
        let mut cur = SliceCursor::new(&buf[..10]);
        assert_eq!(Ifinfomsg::parse(&mut cur), Err(DeError::UnexpectedEob));
    }

    #[test]
    fn test_message_line() {
        let hdr = Nlmsghdr::new(1068, libc::RTM_NEWLINK, NlmF::empty(), 0, 0);
        let mut out = String::new();
        render_message_line(&hdr, &mut out);
        assert_eq!(
            out,
            "netlink message: len = 1068, type = 16, flags = 0x0, seq = 0, pid = 0\n"
        );
    }

    #[test]
    fn test_link_event_render() {
        let mut payload = ifinfomsg_bytes(0, 1, 3, 0x11043, 0x1);
        put_attr(&mut payload, u16::from(Ifla::Ifname), b"wlan0\0").unwrap();
        put_attr(
            &mut payload,
            u16::from(Ifla::Address),
            &[0x00, 0x11, 0x22, 0x33, 0x44, 0x55],
        )
        .unwrap();

        let msg = NlMessage {
            header: Nlmsghdr::new(
                (16 + payload.len()) as u32,
                libc::RTM_NEWLINK,
                NlmF::empty(),
                0,
                0,
            ),
            payload: &payload,
        };
        let event = LinkEvent::decode(&msg).unwrap();
        assert_eq!(event.ifname(), Some("wlan0"));

        let mut out = String::new();
        event.render(&mut out);
        // 0x11043 = UP | RUNNING | LOWER_UP and the broadcast and
        // multicast bits; only UP is in the change mask.
        let expected = "\tifi_family = 0, ifi_type = 1, ifi_index = 3, ifi_flags = 0x11043, ifi_change = 0x1\n\
             \t\tMsg Type: RTM_NEWLINK\n\
             \t\tflags: IFF_UP(C) IFF_BROADCAST IFF_RUNNING IFF_MULTICAST IFF_LOWER_UP \n\
             \t\tifname: wlan0\n\
             \t\taddress: 00:11:22:33:44:55\n";
        assert_eq!(out, expected);
    }

    #[test]
    fn test_unlisted_msg_type() {
        let payload = ifinfomsg_bytes(0, 1, 2, 0, 0);
        let msg = NlMessage {
            header: Nlmsghdr::new(
                (16 + payload.len()) as u32,
                libc::RTM_GETTFILTER,
                NlmF::empty(),
                0,
                0,
            ),
            payload: &payload,
        };
        let event = LinkEvent::decode(&msg).unwrap();
        let mut out = String::new();
        event.render(&mut out);
        assert!(out.contains("\t\tMsg Type: unknown(46)\n"));
        assert!(out.contains("\t\tflags: \n"));
    }

    #[test]
    fn test_ifname_without_nul() {
        let mut payload = ifinfomsg_bytes(0, 1, 2, 0, 0);
        put_attr(&mut payload, u16::from(Ifla::Ifname), b"eth0").unwrap();
        let msg = NlMessage {
            header: Nlmsghdr::new(0, libc::RTM_NEWLINK, NlmF::empty(), 0, 0),
            payload: &payload,
        };
        let event = LinkEvent::decode(&msg).unwrap();
        assert_eq!(event.ifname(), Some("eth0"));
    }
}
