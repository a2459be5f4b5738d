//! Constants for the `nl80211` generic netlink family, taken from
//! `linux/nl80211.h`. Only the subsets involved in station telemetry
//! are spelled out; everything else round-trips through
//! `UnrecognizedVariant`.

impl_var!(
    /// Supported `nl80211` commands
    pub Nl80211Cmd, u8,
    Unspec => 0,
    /// Request station telemetry; a dump request lists all stations
    /// known to an interface
    GetStation => 17,
    SetStation => 18,
    /// Carries one station's telemetry in responses to
    /// [`Nl80211Cmd::GetStation`]
    NewStation => 19,
    DelStation => 20,
);

impl_var!(
    /// Top level `nl80211` attributes
    pub Nl80211Attr, u16,
    Unspec => 0,
    Wiphy => 1,
    WiphyName => 2,
    Ifindex => 3,
    Ifname => 4,
    Iftype => 5,
    Mac => 6,
    /// Nested container holding [`Nl80211StaInfo`] attributes
    StaInfo => 21,
    Generation => 46,
);

/// Kernel constant name for a top level attribute, for the raw
/// attribute listing at the head of a station report
pub fn nl80211_attr_name(attr_type: u16) -> &'static str {
    match Nl80211Attr::from(attr_type) {
        Nl80211Attr::Unspec => "NL80211_ATTR_UNSPEC",
        Nl80211Attr::Wiphy => "NL80211_ATTR_WIPHY",
        Nl80211Attr::WiphyName => "NL80211_ATTR_WIPHY_NAME",
        Nl80211Attr::Ifindex => "NL80211_ATTR_IFINDEX",
        Nl80211Attr::Ifname => "NL80211_ATTR_IFNAME",
        Nl80211Attr::Iftype => "NL80211_ATTR_IFTYPE",
        Nl80211Attr::Mac => "NL80211_ATTR_MAC",
        Nl80211Attr::StaInfo => "NL80211_ATTR_STA_INFO",
        Nl80211Attr::Generation => "NL80211_ATTR_GENERATION",
        Nl80211Attr::UnrecognizedVariant(_) => "unknown",
    }
}

impl_var!(
    /// Attributes nested inside [`Nl80211Attr::StaInfo`]
    pub Nl80211StaInfo, u16,
    Invalid => 0,
    InactiveTime => 1,
    RxBytes => 2,
    TxBytes => 3,
    Llid => 4,
    Plid => 5,
    PlinkState => 6,
    Signal => 7,
    TxBitrate => 8,
    RxPackets => 9,
    TxPackets => 10,
    TxRetries => 11,
    TxFailed => 12,
    SignalAvg => 13,
    RxBitrate => 14,
    BssParam => 15,
    ConnectedTime => 16,
    /// Fixed eight byte mask/set pair, see
    /// [`StaFlagUpdate`][crate::station::StaFlagUpdate]
    StaFlags => 17,
    BeaconLoss => 18,
    TOffset => 19,
    LocalPm => 20,
    PeerPm => 21,
    NonpeerPm => 22,
    /// Preferred over [`Nl80211StaInfo::RxBytes`] when both are sent
    RxBytes64 => 23,
    /// Preferred over [`Nl80211StaInfo::TxBytes`] when both are sent
    TxBytes64 => 24,
    ChainSignal => 25,
    ChainSignalAvg => 26,
    ExpectedThroughput => 27,
    RxDropMisc => 28,
    BeaconRx => 29,
    BeaconSignalAvg => 30,
    TidStats => 31,
    RxDuration => 32,
    Pad => 33,
    AckSignal => 34,
    AckSignalAvg => 35,
    RxMpdus => 36,
    FcsErrorCount => 37,
    ConnectedToGate => 38,
    TxDuration => 39,
    AirtimeWeight => 40,
    AirtimeLinkMetric => 41,
    AssocAtBoottime => 42,
    ConnectedToAs => 43,
);

impl_var!(
    /// Attributes nested inside a bitrate descriptor
    pub Nl80211RateInfo, u16,
    Invalid => 0,
    Bitrate => 1,
    Mcs => 2,
    Width40Mhz => 3,
    ShortGi => 4,
    /// 32 bit rate in 100 kbit/s units; preferred over the legacy
    /// 16 bit [`Nl80211RateInfo::Bitrate`]
    Bitrate32 => 5,
    VhtMcs => 6,
    VhtNss => 7,
    Width80Mhz => 8,
    Width80P80Mhz => 9,
    Width160Mhz => 10,
    Width10Mhz => 11,
    Width5Mhz => 12,
    HeMcs => 13,
    HeNss => 14,
    HeGi => 15,
    HeDcm => 16,
    HeRuAlloc => 17,
    Width320Mhz => 18,
    EhtMcs => 19,
    EhtNss => 20,
    EhtGi => 21,
    EhtRuAlloc => 22,
);

impl_var!(
    /// Attributes nested inside [`Nl80211StaInfo::BssParam`]
    pub Nl80211StaBssParam, u16,
    Invalid => 0,
    CtsProt => 1,
    ShortPreamble => 2,
    ShortSlotTime => 3,
    DtimPeriod => 4,
    BeaconInterval => 5,
);

impl_var!(
    /// Attributes nested inside each per-TID entry of
    /// [`Nl80211StaInfo::TidStats`]
    pub Nl80211TidStats, u16,
    Invalid => 0,
    RxMsdu => 1,
    TxMsdu => 2,
    TxMsduRetries => 3,
    TxMsduFailed => 4,
    Pad => 5,
    TxqStats => 6,
);

impl_var!(
    /// Attributes nested inside [`Nl80211TidStats::TxqStats`]
    pub Nl80211TxqStats, u16,
    Invalid => 0,
    BacklogBytes => 1,
    BacklogPackets => 2,
    Flows => 3,
    Drops => 4,
    EcnMarks => 5,
    Overlimit => 6,
    Overmemory => 7,
    Collisions => 8,
    TxBytes => 9,
    TxPackets => 10,
    MaxFlows => 11,
);

impl_var!(
    /// Station capability flag numbers; the wire format stores
    /// `1 << flag` in the mask and set words of the flag update record
    pub Nl80211StaFlag, u32,
    Invalid => 0,
    Authorized => 1,
    ShortPreamble => 2,
    Wme => 3,
    Mfp => 4,
    Authenticated => 5,
    TdlsPeer => 6,
    Associated => 7,
);

impl Nl80211StaFlag {
    /// The bit this flag occupies in the mask and set words
    pub fn bit(self) -> u32 {
        1 << u32::from(self)
    }
}

impl_var!(
    /// Mesh peer link states reported by
    /// [`Nl80211StaInfo::PlinkState`]
    pub Nl80211PlinkState, u8,
    Listen => 0,
    OpnSnt => 1,
    OpnRcvd => 2,
    CnfRcvd => 3,
    Estab => 4,
    Holding => 5,
    Blocked => 6,
);

impl_var!(
    /// Mesh power save modes reported by the local, peer, and
    /// non-peer PM attributes
    pub Nl80211MeshPowerMode, u32,
    Unknown => 0,
    Active => 1,
    LightSleep => 2,
    DeepSleep => 3,
);
