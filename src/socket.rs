//! # Socket code around `libc`
//!
//! Thin wrappers over the netlink socket system calls plus the
//! request builders and receive loops the binaries drive them with.
//!
//! # Design decisions
//! The socket holds nothing but the file descriptor. Framing lives in
//! [`nl`][crate::nl]; this module moves byte buffers. Each syscall
//! wrapper converts a negative return into
//! [`io::Error::last_os_error`] and nothing else.
//!
//! Sequence numbers are seeded from the wall clock the way the
//! classic netlink libraries do. Replies are matched by message type,
//! not sequence, since one socket here only ever has one request in
//! flight.

use std::{
    ffi::CString,
    io,
    mem::{size_of, zeroed},
    os::unix::io::{AsRawFd, IntoRawFd, RawFd},
    ptr, str,
};

use byteorder::{ByteOrder, NativeEndian, WriteBytesExt};
use libc::{c_int, c_void};
use log::{debug, trace};

use crate::{
    attr::{put_attr, AttrTable},
    bytes::SliceCursor,
    consts::{
        genl::{CtrlAttr, CtrlCmd, CTRL_VERSION, GENL_ID_CTRL},
        nl::{NlFamily, Nlmsg, NlmF},
        nl80211::{Nl80211Attr, Nl80211Cmd},
    },
    err::{Error, Nlmsgerr},
    genl::{Genlmsghdr, GENL_HDRLEN},
    nl::{NlMessageIter, Nlmsghdr, NLMSG_HDRLEN},
    station::MacAddr,
};

/// Receive buffer size, large enough for any station dump datagram.
pub const MAX_NL_LENGTH: usize = 32768;

/// Handle for the socket file descriptor.
pub struct NlSocket {
    fd: c_int,
}

impl NlSocket {
    /// Wrapper around `socket()` filling in the netlink specific
    /// arguments.
    pub fn new(proto: NlFamily) -> Result<Self, io::Error> {
        let fd = match unsafe { libc::socket(libc::AF_NETLINK, libc::SOCK_RAW, proto.into()) } {
            i if i >= 0 => Ok(i),
            _ => Err(io::Error::last_os_error()),
        }?;
        Ok(NlSocket { fd })
    }

    /// Bind with a multicast group mask. Pass zero to receive unicast
    /// replies only; the kernel assigns the port id either way.
    pub fn bind(&mut self, groups: u32) -> Result<(), io::Error> {
        let mut nladdr = unsafe { zeroed::<libc::sockaddr_nl>() };
        nladdr.nl_family = libc::AF_NETLINK as libc::sa_family_t;
        nladdr.nl_pid = 0;
        nladdr.nl_groups = groups;
        match unsafe {
            libc::bind(
                self.fd,
                &nladdr as *const _ as *const libc::sockaddr,
                size_of::<libc::sockaddr_nl>() as u32,
            )
        } {
            i if i >= 0 => Ok(()),
            _ => Err(io::Error::last_os_error()),
        }
    }

    /// Equivalent of `socket` and `bind` calls.
    pub fn connect(proto: NlFamily, groups: u32) -> Result<Self, io::Error> {
        let mut sock = NlSocket::new(proto)?;
        sock.bind(groups)?;
        Ok(sock)
    }

    /// Send one encoded message to the kernel.
    pub fn send(&mut self, buf: &[u8]) -> Result<usize, io::Error> {
        let sent = match unsafe {
            libc::send(self.fd, buf as *const _ as *const c_void, buf.len(), 0)
        } {
            i if i >= 0 => Ok(i as usize),
            _ => Err(io::Error::last_os_error()),
        }?;
        trace!("sent {} bytes", sent);
        Ok(sent)
    }

    /// Receive one datagram, blocking.
    pub fn recv(&mut self, buf: &mut [u8]) -> Result<usize, io::Error> {
        let read = match unsafe {
            libc::recv(self.fd, buf as *mut _ as *mut c_void, buf.len(), 0)
        } {
            i if i >= 0 => Ok(i as usize),
            _ => Err(io::Error::last_os_error()),
        }?;
        trace!("received {} bytes", read);
        Ok(read)
    }
}

impl AsRawFd for NlSocket {
    fn as_raw_fd(&self) -> RawFd {
        self.fd
    }
}

impl IntoRawFd for NlSocket {
    fn into_raw_fd(self) -> RawFd {
        self.fd
    }
}

impl Drop for NlSocket {
    /// Closes underlying file descriptor to avoid file descriptor leaks.
    fn drop(&mut self) {
        unsafe {
            libc::close(self.fd);
        }
    }
}

/// Sequence number for the next request.
pub fn next_seq() -> u32 {
    unsafe { libc::time(ptr::null_mut()) as u32 }
}

/// Interface index for a name, through `if_nametoindex`.
pub fn if_name_to_index(name: &str) -> Result<u32, Error> {
    let cname =
        CString::new(name).map_err(|_| Error::new("interface name contains a NUL byte"))?;
    match unsafe { libc::if_nametoindex(cname.as_ptr()) } {
        0 => Err(Error::Io(io::Error::last_os_error())),
        index => Ok(index),
    }
}

/// Interface name for an index, or [`None`] when the index does not
/// resolve.
pub fn if_index_to_name(index: u32) -> Option<String> {
    let mut buf = [0u8; libc::IF_NAMESIZE];
    let ret = unsafe { libc::if_indextoname(index, buf.as_mut_ptr() as *mut libc::c_char) };
    if ret.is_null() {
        return None;
    }
    let end = buf.iter().position(|byte| *byte == 0).unwrap_or(buf.len());
    str::from_utf8(&buf[..end]).ok().map(str::to_owned)
}

/// Encode a controller request resolving a family name to its id.
pub fn build_family_request(family_name: &str, seq: u32) -> Result<Vec<u8>, Error> {
    let mut name = Vec::with_capacity(family_name.len() + 1);
    name.extend_from_slice(family_name.as_bytes());
    name.push(0);
    let mut attrs = Vec::new();
    put_attr(&mut attrs, u16::from(CtrlAttr::FamilyName), &name)?;

    let len = (NLMSG_HDRLEN + GENL_HDRLEN + attrs.len()) as u32;
    let mut buf = Vec::with_capacity(len as usize);
    Nlmsghdr::new(len, GENL_ID_CTRL, NlmF::REQUEST, seq, 0).emit(&mut buf)?;
    Genlmsghdr::new(u8::from(CtrlCmd::Getfamily), CTRL_VERSION).emit(&mut buf)?;
    buf.extend_from_slice(&attrs);
    Ok(buf)
}

/// Pull the family id attribute out of a controller reply datagram.
pub fn family_id_from_reply(buf: &[u8], family_name: &str) -> Result<u16, Error> {
    for msg in NlMessageIter::new(buf) {
        match Nlmsg::from(msg.header.nl_type) {
            Nlmsg::Done => break,
            Nlmsg::Error => {
                let mut cur = SliceCursor::new(msg.payload);
                let nlerr = Nlmsgerr::parse(&mut cur)?;
                if !nlerr.is_ack() {
                    return Err(Error::Nlmsgerr(nlerr));
                }
            }
            _ => {
                let mut cur = SliceCursor::new(msg.payload);
                let _genlhdr = Genlmsghdr::parse(&mut cur)?;
                let attrs = AttrTable::parse(cur.rest());
                if let Some(attr) = attrs.get(u16::from(CtrlAttr::FamilyId)) {
                    if attr.payload.len() == 2 {
                        return Ok(NativeEndian::read_u16(attr.payload));
                    }
                }
            }
        }
    }
    Err(Error::new(format!(
        "failed to resolve generic netlink family {}",
        family_name
    )))
}

/// Resolve a generic netlink family name to the numeric message type
/// the kernel registered for it.
pub fn resolve_genl_family(sock: &mut NlSocket, family_name: &str) -> Result<u16, Error> {
    let request = build_family_request(family_name, next_seq())?;
    sock.send(&request)?;

    let mut buf = vec![0u8; MAX_NL_LENGTH];
    let read = sock.recv(&mut buf)?;
    let id = family_id_from_reply(&buf[..read], family_name)?;
    debug!("family {} resolved to id {}", family_name, id);
    Ok(id)
}

/// Encode a station request. A dump over the whole interface is made
/// when no hardware address narrows it to one peer.
pub fn build_get_station(
    family: u16,
    ifindex: u32,
    mac: Option<&MacAddr>,
    seq: u32,
) -> Result<Vec<u8>, Error> {
    let mut attrs = Vec::new();
    let mut index_payload = Vec::new();
    index_payload.write_u32::<NativeEndian>(ifindex)?;
    put_attr(&mut attrs, u16::from(Nl80211Attr::Ifindex), &index_payload)?;
    let mut flags = NlmF::REQUEST;
    match mac {
        Some(mac) => put_attr(&mut attrs, u16::from(Nl80211Attr::Mac), mac.octets())?,
        None => flags |= NlmF::DUMP,
    }

    let len = (NLMSG_HDRLEN + GENL_HDRLEN + attrs.len()) as u32;
    let mut buf = Vec::with_capacity(len as usize);
    Nlmsghdr::new(len, family, flags, seq, 0).emit(&mut buf)?;
    Genlmsghdr::new(u8::from(Nl80211Cmd::GetStation), 0).emit(&mut buf)?;
    buf.extend_from_slice(&attrs);
    Ok(buf)
}

/// Whether the receive loop needs further datagrams after handling
/// one.
#[derive(Debug, PartialEq)]
enum DumpFlow {
    Continue,
    Finished,
}

/// Walk the messages of one received datagram, handing each station
/// message's attribute region to `on_station`.
fn handle_dump_datagram<F>(buf: &[u8], family: u16, on_station: &mut F) -> Result<DumpFlow, Error>
where
    F: FnMut(&[u8]),
{
    let mut multipart = false;
    for msg in NlMessageIter::new(buf) {
        if msg.header.nl_flags.contains(NlmF::MULTI) {
            multipart = true;
        }
        match Nlmsg::from(msg.header.nl_type) {
            Nlmsg::Done => return Ok(DumpFlow::Finished),
            Nlmsg::Error => {
                let mut cur = SliceCursor::new(msg.payload);
                let nlerr = Nlmsgerr::parse(&mut cur)?;
                if nlerr.is_ack() {
                    return Ok(DumpFlow::Finished);
                }
                return Err(Error::Nlmsgerr(nlerr));
            }
            Nlmsg::Noop | Nlmsg::Overrun => {}
            _ => {
                if msg.header.nl_type != family {
                    debug!(
                        "skipping message of family {} while dumping family {}",
                        msg.header.nl_type, family
                    );
                    continue;
                }
                let mut cur = SliceCursor::new(msg.payload);
                let _genlhdr = Genlmsghdr::parse(&mut cur)?;
                on_station(cur.rest());
            }
        }
    }
    // A reply without the multipart flag is complete after one
    // datagram.
    if multipart {
        Ok(DumpFlow::Continue)
    } else {
        Ok(DumpFlow::Finished)
    }
}

/// Drive a station request to completion, handing each station
/// message's attribute region to `on_station`.
///
/// Stops on the end of a dump, after the first datagram of a
/// non-multipart reply, or with an error carried in an
/// `NLMSG_ERROR` response. Messages of other families are skipped.
pub fn dump_stations<F>(sock: &mut NlSocket, family: u16, mut on_station: F) -> Result<(), Error>
where
    F: FnMut(&[u8]),
{
    let mut buf = vec![0u8; MAX_NL_LENGTH];
    loop {
        let read = sock.recv(&mut buf)?;
        if read == 0 {
            return Ok(());
        }
        match handle_dump_datagram(&buf[..read], family, &mut on_station)? {
            DumpFlow::Continue => {}
            DumpFlow::Finished => return Ok(()),
        }
    }
}
