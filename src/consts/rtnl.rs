use bitflags::bitflags;

/// Multicast group mask for link state notifications, for the
/// `nl_groups` field at bind time
pub const RTMGRP_LINK: u32 = libc::RTMGRP_LINK as u32;

impl_var!(
    /// rtnetlink message types
    pub Rtm, u16,
    Newlink => libc::RTM_NEWLINK,
    Dellink => libc::RTM_DELLINK,
    Getlink => libc::RTM_GETLINK,
    Setlink => libc::RTM_SETLINK,
    Newaddr => libc::RTM_NEWADDR,
    Deladdr => libc::RTM_DELADDR,
    Getaddr => libc::RTM_GETADDR,
    Newroute => libc::RTM_NEWROUTE,
    Delroute => libc::RTM_DELROUTE,
    Getroute => libc::RTM_GETROUTE,
    Newneigh => libc::RTM_NEWNEIGH,
    Delneigh => libc::RTM_DELNEIGH,
    Getneigh => libc::RTM_GETNEIGH,
    Newrule => libc::RTM_NEWRULE,
    Delrule => libc::RTM_DELRULE,
    Getrule => libc::RTM_GETRULE,
    Newqdisc => libc::RTM_NEWQDISC,
    Delqdisc => libc::RTM_DELQDISC,
    Getqdisc => libc::RTM_GETQDISC,
    Newtclass => libc::RTM_NEWTCLASS,
    Deltclass => libc::RTM_DELTCLASS,
    Gettclass => libc::RTM_GETTCLASS,
    Newtfilter => libc::RTM_NEWTFILTER,
    Deltfilter => libc::RTM_DELTFILTER,
    Newaction => libc::RTM_NEWACTION,
    Delaction => libc::RTM_DELACTION,
    Getaction => libc::RTM_GETACTION,
    Newprefix => libc::RTM_NEWPREFIX,
    Getmulticast => libc::RTM_GETMULTICAST,
    Getanycast => libc::RTM_GETANYCAST,
    Newneightbl => libc::RTM_NEWNEIGHTBL,
    Getneightbl => libc::RTM_GETNEIGHTBL,
    Setneightbl => libc::RTM_SETNEIGHTBL,
    Newnduseropt => libc::RTM_NEWNDUSEROPT,
    Newaddrlabel => libc::RTM_NEWADDRLABEL,
    Deladdrlabel => libc::RTM_DELADDRLABEL,
    Getaddrlabel => libc::RTM_GETADDRLABEL,
    Getdcb => libc::RTM_GETDCB,
    Setdcb => libc::RTM_SETDCB,
    Newnetconf => libc::RTM_NEWNETCONF,
    Getnetconf => libc::RTM_GETNETCONF,
    Newmdb => libc::RTM_NEWMDB,
    Delmdb => libc::RTM_DELMDB,
    Getmdb => libc::RTM_GETMDB,
);

/// Kernel constant name for an rtnetlink message type
pub fn rtm_type_name(msg_type: u16) -> Option<&'static str> {
    let name = match Rtm::from(msg_type) {
        Rtm::Newlink => "RTM_NEWLINK",
        Rtm::Dellink => "RTM_DELLINK",
        Rtm::Getlink => "RTM_GETLINK",
        Rtm::Setlink => "RTM_SETLINK",
        Rtm::Newaddr => "RTM_NEWADDR",
        Rtm::Deladdr => "RTM_DELADDR",
        Rtm::Getaddr => "RTM_GETADDR",
        Rtm::Newroute => "RTM_NEWROUTE",
        Rtm::Delroute => "RTM_DELROUTE",
        Rtm::Getroute => "RTM_GETROUTE",
        Rtm::Newneigh => "RTM_NEWNEIGH",
        Rtm::Delneigh => "RTM_DELNEIGH",
        Rtm::Getneigh => "RTM_GETNEIGH",
        Rtm::Newrule => "RTM_NEWRULE",
        Rtm::Delrule => "RTM_DELRULE",
        Rtm::Getrule => "RTM_GETRULE",
        Rtm::Newqdisc => "RTM_NEWQDISC",
        Rtm::Delqdisc => "RTM_DELQDISC",
        Rtm::Getqdisc => "RTM_GETQDISC",
        Rtm::Newtclass => "RTM_NEWTCLASS",
        Rtm::Deltclass => "RTM_DELTCLASS",
        Rtm::Gettclass => "RTM_GETTCLASS",
        Rtm::Newtfilter => "RTM_NEWTFILTER",
        Rtm::Deltfilter => "RTM_DELTFILTER",
        Rtm::Newaction => "RTM_NEWACTION",
        Rtm::Delaction => "RTM_DELACTION",
        Rtm::Getaction => "RTM_GETACTION",
        Rtm::Newprefix => "RTM_NEWPREFIX",
        Rtm::Getmulticast => "RTM_GETMULTICAST",
        Rtm::Getanycast => "RTM_GETANYCAST",
        Rtm::Newneightbl => "RTM_NEWNEIGHTBL",
        Rtm::Getneightbl => "RTM_GETNEIGHTBL",
        Rtm::Setneightbl => "RTM_SETNEIGHTBL",
        Rtm::Newnduseropt => "RTM_NEWNDUSEROPT",
        Rtm::Newaddrlabel => "RTM_NEWADDRLABEL",
        Rtm::Deladdrlabel => "RTM_DELADDRLABEL",
        Rtm::Getaddrlabel => "RTM_GETADDRLABEL",
        Rtm::Getdcb => "RTM_GETDCB",
        Rtm::Setdcb => "RTM_SETDCB",
        Rtm::Newnetconf => "RTM_NEWNETCONF",
        Rtm::Getnetconf => "RTM_GETNETCONF",
        Rtm::Newmdb => "RTM_NEWMDB",
        Rtm::Delmdb => "RTM_DELMDB",
        Rtm::Getmdb => "RTM_GETMDB",
        Rtm::UnrecognizedVariant(_) => return None,
    };
    Some(name)
}

impl_var!(
    /// Attributes following the fixed link header in link messages
    pub Ifla, u16,
    Unspec => libc::IFLA_UNSPEC,
    Address => libc::IFLA_ADDRESS,
    Broadcast => libc::IFLA_BROADCAST,
    Ifname => libc::IFLA_IFNAME,
    Mtu => libc::IFLA_MTU,
    Link => libc::IFLA_LINK,
    Qdisc => libc::IFLA_QDISC,
    Stats => libc::IFLA_STATS,
);

bitflags! {
    /// Interface flags from the `ifi_flags` and `ifi_change` words of
    /// a link message
    #[derive(Copy, Clone, Debug, Eq, Hash, Ord, PartialEq, PartialOrd)]
    pub struct Iff: u32 {
        /// Interface is up
        const UP = libc::IFF_UP as u32;
        /// Broadcast address valid
        const BROADCAST = libc::IFF_BROADCAST as u32;
        /// Turn on debugging
        const DEBUG = libc::IFF_DEBUG as u32;
        /// Is a loopback net
        const LOOPBACK = libc::IFF_LOOPBACK as u32;
        /// Interface is a point-to-point link
        const POINTOPOINT = libc::IFF_POINTOPOINT as u32;
        /// Avoid use of trailers
        const NOTRAILERS = libc::IFF_NOTRAILERS as u32;
        /// Resources allocated, operationally up
        const RUNNING = libc::IFF_RUNNING as u32;
        /// No ARP protocol
        const NOARP = libc::IFF_NOARP as u32;
        /// Receive all packets
        const PROMISC = libc::IFF_PROMISC as u32;
        /// Receive all multicast packets
        const ALLMULTI = libc::IFF_ALLMULTI as u32;
        /// Master of a load balancer
        const MASTER = libc::IFF_MASTER as u32;
        /// Slave of a load balancer
        const SLAVE = libc::IFF_SLAVE as u32;
        /// Supports multicast
        const MULTICAST = libc::IFF_MULTICAST as u32;
        /// Can set media type
        const PORTSEL = libc::IFF_PORTSEL as u32;
        /// Auto media select active
        const AUTOMEDIA = libc::IFF_AUTOMEDIA as u32;
        /// Dialup device with changing addresses
        const DYNAMIC = libc::IFF_DYNAMIC as u32;
        /// Driver signals L1 up
        const LOWER_UP = libc::IFF_LOWER_UP as u32;
        /// Driver signals dormant
        const DORMANT = libc::IFF_DORMANT as u32;
        /// Echo sent packets
        const ECHO = libc::IFF_ECHO as u32;
    }
}

/// Display names for every interface flag, in kernel header order
pub const IFF_NAMES: [(Iff, &str); 19] = [
    (Iff::UP, "IFF_UP"),
    (Iff::BROADCAST, "IFF_BROADCAST"),
    (Iff::DEBUG, "IFF_DEBUG"),
    (Iff::LOOPBACK, "IFF_LOOPBACK"),
    (Iff::POINTOPOINT, "IFF_POINTOPOINT"),
    (Iff::NOTRAILERS, "IFF_NOTRAILERS"),
    (Iff::RUNNING, "IFF_RUNNING"),
    (Iff::NOARP, "IFF_NOARP"),
    (Iff::PROMISC, "IFF_PROMISC"),
    (Iff::ALLMULTI, "IFF_ALLMULTI"),
    (Iff::MASTER, "IFF_MASTER"),
    (Iff::SLAVE, "IFF_SLAVE"),
    (Iff::MULTICAST, "IFF_MULTICAST"),
    (Iff::PORTSEL, "IFF_PORTSEL"),
    (Iff::AUTOMEDIA, "IFF_AUTOMEDIA"),
    (Iff::DYNAMIC, "IFF_DYNAMIC"),
    (Iff::LOWER_UP, "IFF_LOWER_UP"),
    (Iff::DORMANT, "IFF_DORMANT"),
    (Iff::ECHO, "IFF_ECHO"),
];
