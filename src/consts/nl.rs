use bitflags::bitflags;

impl_var!(
    /// Control values for `nl_type` in
    /// [`Nlmsghdr`][crate::nl::Nlmsghdr]
    pub Nlmsg, u16,
    Noop => libc::NLMSG_NOOP as u16,
    Error => libc::NLMSG_ERROR as u16,
    Done => libc::NLMSG_DONE as u16,
    Overrun => libc::NLMSG_OVERRUN as u16,
);

impl_var!(
    /// Netlink protocols understood by [`NlSocket`][crate::socket::NlSocket]
    pub NlFamily, i32,
    Route => libc::NETLINK_ROUTE,
    Generic => libc::NETLINK_GENERIC,
);

bitflags! {
    /// Values for `nl_flags` in [`Nlmsghdr`][crate::nl::Nlmsghdr]
    #[derive(Copy, Clone, Debug, Eq, Hash, Ord, PartialEq, PartialOrd)]
    pub struct NlmF: u16 {
        /// Required for all requests to the kernel
        const REQUEST = libc::NLM_F_REQUEST as u16;
        /// One message in a multipart sequence
        const MULTI = libc::NLM_F_MULTI as u16;
        /// Ask for an acknowledgment on success
        const ACK = libc::NLM_F_ACK as u16;
        /// Echo this request
        const ECHO = libc::NLM_F_ECHO as u16;
        /// Dump was inconsistent due to a sequence change
        const DUMP_INTR = libc::NLM_F_DUMP_INTR as u16;
        /// Dump was filtered as requested
        const DUMP_FILTERED = libc::NLM_F_DUMP_FILTERED as u16;
        /// Specify the tree root
        const ROOT = libc::NLM_F_ROOT as u16;
        /// Return all matching entries
        const MATCH = libc::NLM_F_MATCH as u16;
        /// Atomic get
        const ATOMIC = libc::NLM_F_ATOMIC as u16;
        /// Return the full table instead of a single entry
        const DUMP = libc::NLM_F_DUMP as u16;
    }
}
