//! Width and nesting policy for received attributes.
//!
//! Every attribute context the station report reads from has a table
//! of expected payload kinds, mirroring the kernel's `nla_policy`
//! arrays. Validation runs before extraction so that the typed getters
//! in [`station`][crate::station] never see a record whose width
//! contradicts its type.
//!
//! # Design decisions
//! A record that fails its width check is dropped from the table and
//! logged; its siblings are unaffected. Types without a table entry
//! are treated as [`ScalarKind::Opaque`] and retained untouched, so a
//! newer kernel can always send more than this crate understands
//! without breaking the rest of the report. Which context applies to
//! a nested payload is a pure function of the parent context and the
//! attribute type; nesting claimed anywhere else decodes as opaque
//! bytes.

use log::debug;

use crate::{
    attr::AttrTable,
    consts::nl80211::{
        Nl80211Attr, Nl80211RateInfo, Nl80211StaBssParam, Nl80211StaInfo, Nl80211TidStats,
        Nl80211TxqStats,
    },
};

/// Expected shape of an attribute payload.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum ScalarKind {
    /// One byte.
    U8,
    /// Two bytes, host endian.
    U16,
    /// Four bytes, host endian.
    U32,
    /// Eight bytes, host endian.
    U64,
    /// Presence flag; the payload must be empty.
    Flag,
    /// Container of further attributes.
    Nested,
    /// Exactly this many bytes, for example a six byte hardware
    /// address.
    FixedBytes(usize),
    /// Anything; retained without interpretation.
    Opaque,
}

impl ScalarKind {
    /// Whether a payload of `len` bytes satisfies this kind.
    pub fn accepts(self, len: usize) -> bool {
        match self {
            ScalarKind::U8 => len == 1,
            ScalarKind::U16 => len == 2,
            ScalarKind::U32 => len == 4,
            ScalarKind::U64 => len == 8,
            ScalarKind::Flag => len == 0,
            ScalarKind::FixedBytes(n) => len == n,
            ScalarKind::Nested | ScalarKind::Opaque => true,
        }
    }
}

/// The attribute namespaces a station dump message can nest through.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum AttrContext {
    /// Attributes directly inside the generic netlink payload.
    Top,
    /// Inside [`Nl80211Attr::StaInfo`].
    StaInfo,
    /// Inside [`Nl80211StaInfo::BssParam`].
    BssParam,
    /// Inside [`Nl80211StaInfo::TxBitrate`] or
    /// [`Nl80211StaInfo::RxBitrate`].
    RateInfo,
    /// Inside one per-TID entry of [`Nl80211StaInfo::TidStats`]. The
    /// entries themselves are anonymous wrappers keyed by TID number;
    /// this context applies to each wrapper's children.
    TidStats,
    /// Inside [`Nl80211TidStats::TxqStats`].
    TxqStats,
}

impl AttrContext {
    /// Expected payload kind for an attribute type in this context, or
    /// [`None`] when the context has no opinion and the record is
    /// retained as opaque bytes.
    pub fn expected(self, atype: u16) -> Option<ScalarKind> {
        match self {
            AttrContext::Top => expected_top(atype),
            AttrContext::StaInfo => expected_sta_info(atype),
            AttrContext::BssParam => expected_bss_param(atype),
            AttrContext::RateInfo => expected_rate_info(atype),
            AttrContext::TidStats => expected_tid_stats(atype),
            AttrContext::TxqStats => expected_txq_stats(atype),
        }
    }

    /// Context governing the payload of a nested attribute, or
    /// [`None`] when no edge from this context is defined for the
    /// type.
    pub fn child(self, atype: u16) -> Option<AttrContext> {
        match self {
            AttrContext::Top => match Nl80211Attr::from(atype) {
                Nl80211Attr::StaInfo => Some(AttrContext::StaInfo),
                _ => None,
            },
            AttrContext::StaInfo => match Nl80211StaInfo::from(atype) {
                Nl80211StaInfo::TxBitrate | Nl80211StaInfo::RxBitrate => {
                    Some(AttrContext::RateInfo)
                }
                Nl80211StaInfo::BssParam => Some(AttrContext::BssParam),
                Nl80211StaInfo::TidStats => Some(AttrContext::TidStats),
                _ => None,
            },
            AttrContext::TidStats => match Nl80211TidStats::from(atype) {
                Nl80211TidStats::TxqStats => Some(AttrContext::TxqStats),
                _ => None,
            },
            AttrContext::BssParam | AttrContext::RateInfo | AttrContext::TxqStats => None,
        }
    }
}

fn expected_top(atype: u16) -> Option<ScalarKind> {
    match Nl80211Attr::from(atype) {
        Nl80211Attr::Ifindex => Some(ScalarKind::U32),
        Nl80211Attr::Mac => Some(ScalarKind::FixedBytes(libc::ETH_ALEN as usize)),
        Nl80211Attr::StaInfo => Some(ScalarKind::Nested),
        Nl80211Attr::Generation => Some(ScalarKind::U32),
        _ => None,
    }
}

fn expected_sta_info(atype: u16) -> Option<ScalarKind> {
    match Nl80211StaInfo::from(atype) {
        Nl80211StaInfo::InactiveTime => Some(ScalarKind::U32),
        Nl80211StaInfo::RxBytes => Some(ScalarKind::U32),
        Nl80211StaInfo::TxBytes => Some(ScalarKind::U32),
        Nl80211StaInfo::Llid => Some(ScalarKind::U16),
        Nl80211StaInfo::Plid => Some(ScalarKind::U16),
        Nl80211StaInfo::PlinkState => Some(ScalarKind::U8),
        Nl80211StaInfo::Signal => Some(ScalarKind::U8),
        Nl80211StaInfo::TxBitrate => Some(ScalarKind::Nested),
        Nl80211StaInfo::RxPackets => Some(ScalarKind::U32),
        Nl80211StaInfo::TxPackets => Some(ScalarKind::U32),
        Nl80211StaInfo::TxRetries => Some(ScalarKind::U32),
        Nl80211StaInfo::TxFailed => Some(ScalarKind::U32),
        Nl80211StaInfo::SignalAvg => Some(ScalarKind::U8),
        Nl80211StaInfo::RxBitrate => Some(ScalarKind::Nested),
        Nl80211StaInfo::BssParam => Some(ScalarKind::Nested),
        Nl80211StaInfo::ConnectedTime => Some(ScalarKind::U32),
        Nl80211StaInfo::StaFlags => Some(ScalarKind::FixedBytes(8)),
        Nl80211StaInfo::BeaconLoss => Some(ScalarKind::U32),
        Nl80211StaInfo::TOffset => Some(ScalarKind::U64),
        Nl80211StaInfo::LocalPm => Some(ScalarKind::U32),
        Nl80211StaInfo::PeerPm => Some(ScalarKind::U32),
        Nl80211StaInfo::NonpeerPm => Some(ScalarKind::U32),
        Nl80211StaInfo::RxBytes64 => Some(ScalarKind::U64),
        Nl80211StaInfo::TxBytes64 => Some(ScalarKind::U64),
        Nl80211StaInfo::ChainSignal => Some(ScalarKind::Nested),
        Nl80211StaInfo::ChainSignalAvg => Some(ScalarKind::Nested),
        Nl80211StaInfo::ExpectedThroughput => Some(ScalarKind::U32),
        Nl80211StaInfo::RxDropMisc => Some(ScalarKind::U64),
        Nl80211StaInfo::BeaconRx => Some(ScalarKind::U64),
        Nl80211StaInfo::BeaconSignalAvg => Some(ScalarKind::U8),
        Nl80211StaInfo::TidStats => Some(ScalarKind::Nested),
        Nl80211StaInfo::RxDuration => Some(ScalarKind::U64),
        Nl80211StaInfo::AckSignal => Some(ScalarKind::U8),
        Nl80211StaInfo::AckSignalAvg => Some(ScalarKind::U8),
        Nl80211StaInfo::ConnectedToGate => Some(ScalarKind::U8),
        Nl80211StaInfo::TxDuration => Some(ScalarKind::U64),
        Nl80211StaInfo::AirtimeWeight => Some(ScalarKind::U16),
        Nl80211StaInfo::AirtimeLinkMetric => Some(ScalarKind::U32),
        Nl80211StaInfo::AssocAtBoottime => Some(ScalarKind::U64),
        Nl80211StaInfo::ConnectedToAs => Some(ScalarKind::U8),
        _ => None,
    }
}

fn expected_bss_param(atype: u16) -> Option<ScalarKind> {
    match Nl80211StaBssParam::from(atype) {
        Nl80211StaBssParam::CtsProt => Some(ScalarKind::Flag),
        Nl80211StaBssParam::ShortPreamble => Some(ScalarKind::Flag),
        Nl80211StaBssParam::ShortSlotTime => Some(ScalarKind::Flag),
        Nl80211StaBssParam::DtimPeriod => Some(ScalarKind::U8),
        Nl80211StaBssParam::BeaconInterval => Some(ScalarKind::U16),
        _ => None,
    }
}

fn expected_rate_info(atype: u16) -> Option<ScalarKind> {
    match Nl80211RateInfo::from(atype) {
        Nl80211RateInfo::Bitrate => Some(ScalarKind::U16),
        Nl80211RateInfo::Mcs => Some(ScalarKind::U8),
        Nl80211RateInfo::Width40Mhz => Some(ScalarKind::Flag),
        Nl80211RateInfo::ShortGi => Some(ScalarKind::Flag),
        Nl80211RateInfo::Bitrate32 => Some(ScalarKind::U32),
        Nl80211RateInfo::VhtMcs => Some(ScalarKind::U8),
        Nl80211RateInfo::VhtNss => Some(ScalarKind::U8),
        Nl80211RateInfo::Width80Mhz => Some(ScalarKind::Flag),
        Nl80211RateInfo::Width80P80Mhz => Some(ScalarKind::Flag),
        Nl80211RateInfo::Width160Mhz => Some(ScalarKind::Flag),
        Nl80211RateInfo::HeMcs => Some(ScalarKind::U8),
        Nl80211RateInfo::HeNss => Some(ScalarKind::U8),
        Nl80211RateInfo::HeGi => Some(ScalarKind::U8),
        Nl80211RateInfo::HeDcm => Some(ScalarKind::U8),
        Nl80211RateInfo::HeRuAlloc => Some(ScalarKind::U8),
        Nl80211RateInfo::Width320Mhz => Some(ScalarKind::Flag),
        Nl80211RateInfo::EhtMcs => Some(ScalarKind::U8),
        Nl80211RateInfo::EhtNss => Some(ScalarKind::U8),
        Nl80211RateInfo::EhtGi => Some(ScalarKind::U8),
        Nl80211RateInfo::EhtRuAlloc => Some(ScalarKind::U8),
        _ => None,
    }
}

fn expected_tid_stats(atype: u16) -> Option<ScalarKind> {
    match Nl80211TidStats::from(atype) {
        Nl80211TidStats::RxMsdu => Some(ScalarKind::U64),
        Nl80211TidStats::TxMsdu => Some(ScalarKind::U64),
        Nl80211TidStats::TxMsduRetries => Some(ScalarKind::U64),
        Nl80211TidStats::TxMsduFailed => Some(ScalarKind::U64),
        Nl80211TidStats::TxqStats => Some(ScalarKind::Nested),
        _ => None,
    }
}

fn expected_txq_stats(atype: u16) -> Option<ScalarKind> {
    match Nl80211TxqStats::from(atype) {
        Nl80211TxqStats::BacklogBytes => Some(ScalarKind::U32),
        Nl80211TxqStats::BacklogPackets => Some(ScalarKind::U32),
        Nl80211TxqStats::Flows => Some(ScalarKind::U32),
        Nl80211TxqStats::Drops => Some(ScalarKind::U32),
        Nl80211TxqStats::EcnMarks => Some(ScalarKind::U32),
        Nl80211TxqStats::Overlimit => Some(ScalarKind::U32),
        Nl80211TxqStats::Collisions => Some(ScalarKind::U32),
        Nl80211TxqStats::TxBytes => Some(ScalarKind::U32),
        Nl80211TxqStats::TxPackets => Some(ScalarKind::U32),
        _ => None,
    }
}

/// Drop every record whose payload width contradicts the expected kind
/// for this context. Records without a table entry pass through.
pub fn validate(table: &mut AttrTable, ctx: AttrContext) {
    table.retain(|attr| match ctx.expected(attr.atype()) {
        Some(kind) => {
            let ok = kind.accepts(attr.payload.len());
            if !ok {
                debug!(
                    "dropping attribute type {} in {:?}: payload length {} does not fit {:?}",
                    attr.atype(),
                    ctx,
                    attr.payload.len(),
                    kind
                );
            }
            ok
        }
        None => true,
    });
}

/// Parse the attribute stream in `buf` and remove every record the
/// context's policy rejects.
pub fn parse_validated(buf: &[u8], ctx: AttrContext) -> AttrTable<'_> {
    let mut table = AttrTable::parse(buf);
    validate(&mut table, ctx);
    table
}
