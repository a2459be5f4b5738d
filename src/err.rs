//! This is the module that contains the error types used in `stadump`
//!
//! There are three main types:
//! * [`Nlmsgerr`][crate::err::Nlmsgerr] - an application error returned from
//! netlink as a packet.
//! * [`Error`] - a general error wrapping kernel error packets, decoding
//! errors, I/O errors, and invalid command line input.
//! * [`DeError`] - error while decoding a received packet
//!
//! # Design decisions
//! All errors implement `std::error::Error` in an attempt to allow
//! them to be used in conjunction with `Result` for easier error
//! management even at the protocol error level.

use std::{
    error,
    fmt::{self, Display},
    io,
};

use crate::{bytes::SliceCursor, nl::Nlmsghdr};

/// Struct representing netlink packets containing errors
#[derive(Debug, PartialEq)]
pub struct Nlmsgerr {
    /// Error code as sent by the kernel, a negated errno value or
    /// zero for an ACK.
    pub error: libc::c_int,
    /// Packet header of the request that failed
    pub nlmsg: Nlmsghdr,
}

impl Nlmsgerr {
    /// Parse the fixed portion of an `NLMSG_ERROR` payload.
    pub fn parse(cur: &mut SliceCursor) -> Result<Self, DeError> {
        let error = cur.read_i32()?;
        let nlmsg = Nlmsghdr::parse(cur)?;
        Ok(Nlmsgerr { error, nlmsg })
    }

    /// Zero error codes acknowledge the request rather than failing it.
    pub fn is_ack(&self) -> bool {
        self.error == 0
    }
}

impl Display for Nlmsgerr {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{}", io::Error::from_raw_os_error(-self.error))
    }
}

impl error::Error for Nlmsgerr {}

macro_rules! err_from {
    ($err:ident, $($from_err:path { $from_impl:expr }),+ $(,)?) => {
        $(
            impl From<$from_err> for $err {
                fn from(e: $from_err) -> Self {
                    $from_impl(e)
                }
            }
        )*
    };
}

/// General error returned by the socket and report layers
#[derive(Debug)]
pub enum Error {
    /// Variant for [`String`]-based messages.
    Msg(String),
    /// An error packet sent back by netlink.
    Nlmsgerr(Nlmsgerr),
    /// A decoding error.
    De(DeError),
    /// A wrapped [`std::io::Error`] from the socket layer.
    Io(io::Error),
}

err_from!(
    Error,
    Nlmsgerr { Error::Nlmsgerr },
    DeError { Error::De },
    std::io::Error { Error::Io },
);

impl Error {
    /// Create new error from a data type implementing
    /// [`Display`][std::fmt::Display]
    pub fn new<D>(s: D) -> Self
    where
        D: Display,
    {
        Error::Msg(s.to_string())
    }
}

impl Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match *self {
            Error::Msg(ref msg) => write!(f, "{}", msg),
            Error::Nlmsgerr(ref err) => {
                write!(f, "Error response received from netlink: {}", err)
            }
            Error::De(ref err) => {
                write!(f, "Decoding error: {}", err)
            }
            Error::Io(ref err) => {
                write!(f, "IO error: {}", err)
            }
        }
    }
}

impl error::Error for Error {}

/// Decoding error
#[derive(Debug, PartialEq)]
pub enum DeError {
    /// Abitrary error message.
    Msg(String),
    /// The end of the buffer was reached before decoding finished.
    UnexpectedEob,
}

impl DeError {
    /// Create new error from a type implementing
    /// [`Display`][std::fmt::Display]
    pub fn new<D>(s: D) -> Self
    where
        D: Display,
    {
        DeError::Msg(s.to_string())
    }
}

impl Display for DeError {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match *self {
            DeError::Msg(ref s) => write!(f, "{}", s),
            DeError::UnexpectedEob => write!(
                f,
                "The buffer was not large enough to complete the decode \
                 operation",
            ),
        }
    }
}

impl error::Error for DeError {}
