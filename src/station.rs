//! Station telemetry decoding and report rendering.
//!
//! A station dump reply carries one `NEW_STATION` message per peer,
//! each holding the interface index, the peer's hardware address, and
//! a nested container of counters and link quality attributes.
//! [`StationReport::decode`] validates the attribute tree against the
//! policies in [`policy`][crate::policy] and the render methods turn
//! it into the textual report, field by field in protocol order.
//!
//! # Design decisions
//! Rendering appends to a growable [`String`] rather than printing as
//! it goes, so a report can be built and inspected without touching
//! stdout. Absent attributes skip their line entirely; nothing in the
//! report is ever invented. Wall clock and boot clock samples are
//! taken by the caller through [`ReportClock`] which keeps rendering a
//! pure function of its inputs.

use std::{
    fmt::{self, Display},
    str::FromStr,
    time::{SystemTime, UNIX_EPOCH},
};

use byteorder::{ByteOrder, NativeEndian};

use crate::{
    attr::{Attr, AttrTable, AttrWalker},
    consts::nl80211::{
        nl80211_attr_name, Nl80211Attr, Nl80211MeshPowerMode, Nl80211PlinkState, Nl80211RateInfo,
        Nl80211StaBssParam, Nl80211StaFlag, Nl80211StaInfo, Nl80211TidStats, Nl80211TxqStats,
    },
    err::Error,
    policy::{self, AttrContext},
    socket,
};

/// A six byte IEEE 802 hardware address.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct MacAddr(pub [u8; 6]);

impl MacAddr {
    /// Build an address from an attribute payload, failing on any
    /// length but six.
    pub fn from_bytes(bytes: &[u8]) -> Option<Self> {
        if bytes.len() != 6 {
            return None;
        }
        let mut octets = [0u8; 6];
        octets.copy_from_slice(bytes);
        Some(MacAddr(octets))
    }

    /// The raw octets.
    pub fn octets(&self) -> &[u8; 6] {
        &self.0
    }
}

impl Display for MacAddr {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(
            f,
            "{:02X}:{:02X}:{:02X}:{:02X}:{:02X}:{:02X}",
            self.0[0], self.0[1], self.0[2], self.0[3], self.0[4], self.0[5]
        )
    }
}

impl FromStr for MacAddr {
    type Err = Error;

    /// Parse `aa:bb:cc:dd:ee:ff`, upper or lower case, nothing else.
    fn from_str(s: &str) -> Result<Self, Error> {
        if s.len() != 17 {
            return Err(Error::new("invalid mac address"));
        }
        let mut octets = [0u8; 6];
        let mut count = 0;
        for part in s.split(':') {
            if count == 6 || part.len() != 2 {
                return Err(Error::new("invalid mac address"));
            }
            octets[count] =
                u8::from_str_radix(part, 16).map_err(|_| Error::new("invalid mac address"))?;
            count += 1;
        }
        if count != 6 {
            return Err(Error::new("invalid mac address"));
        }
        Ok(MacAddr(octets))
    }
}

/// The station flag update record: a mask of valid flag bits and the
/// bits' values. Only flags named by the mask carry information.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq)]
pub struct StaFlagUpdate {
    /// Which flag bits in `set` are meaningful.
    pub mask: u32,
    /// Flag values, gated by `mask`.
    pub set: u32,
}

impl StaFlagUpdate {
    /// Read the fixed eight byte mask/set pair out of an attribute
    /// payload. Any other length is rejected.
    pub fn from_payload(payload: &[u8]) -> Option<Self> {
        if payload.len() != 8 {
            return None;
        }
        Some(StaFlagUpdate {
            mask: NativeEndian::read_u32(&payload[..4]),
            set: NativeEndian::read_u32(&payload[4..8]),
        })
    }

    /// The value of one flag, or [`None`] when the mask does not cover
    /// it.
    pub fn get(self, flag: Nl80211StaFlag) -> Option<bool> {
        let bit = flag.bit();
        if self.mask & bit != 0 {
            Some(self.set & bit != 0)
        } else {
            None
        }
    }
}

/// Clock samples the report arithmetic runs against.
///
/// The wall clock is sampled once per message; the boot clock is used
/// to translate the association timestamp into wall time. The two are
/// read at slightly different instants, which can skew the derived
/// association time by the in-between delay.
#[derive(Copy, Clone, Debug)]
pub struct ReportClock {
    /// Wall clock milliseconds since the epoch.
    pub now_ms: u64,
    /// Nanoseconds on `CLOCK_BOOTTIME`.
    pub boottime_ns: u64,
}

impl ReportClock {
    /// Sample both clocks now.
    pub fn sample() -> Self {
        let now_ms = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .map(|d| d.as_millis() as u64)
            .unwrap_or(0);
        let mut ts = libc::timespec {
            tv_sec: 0,
            tv_nsec: 0,
        };
        let ret = unsafe { libc::clock_gettime(libc::CLOCK_BOOTTIME, &mut ts) };
        let boottime_ns = if ret == 0 {
            ts.tv_sec as u64 * 1_000_000_000 + ts.tv_nsec as u64
        } else {
            0
        };
        ReportClock { now_ms, boottime_ns }
    }
}

fn attr_u8<T>(table: &AttrTable, atype: T) -> Option<u8>
where
    T: Into<u16>,
{
    table.get(atype.into()).and_then(|attr| match attr.payload {
        [byte] => Some(*byte),
        _ => None,
    })
}

fn attr_i8<T>(table: &AttrTable, atype: T) -> Option<i8>
where
    T: Into<u16>,
{
    attr_u8(table, atype).map(|byte| byte as i8)
}

fn attr_u16<T>(table: &AttrTable, atype: T) -> Option<u16>
where
    T: Into<u16>,
{
    table.get(atype.into()).and_then(|attr| {
        if attr.payload.len() == 2 {
            Some(NativeEndian::read_u16(attr.payload))
        } else {
            None
        }
    })
}

fn attr_u32<T>(table: &AttrTable, atype: T) -> Option<u32>
where
    T: Into<u16>,
{
    table.get(atype.into()).and_then(|attr| {
        if attr.payload.len() == 4 {
            Some(NativeEndian::read_u32(attr.payload))
        } else {
            None
        }
    })
}

fn attr_u64<T>(table: &AttrTable, atype: T) -> Option<u64>
where
    T: Into<u16>,
{
    table.get(atype.into()).and_then(|attr| {
        if attr.payload.len() == 8 {
            Some(NativeEndian::read_u64(attr.payload))
        } else {
            None
        }
    })
}

/// Byte counters come in a preferred 64 bit form with a legacy 32 bit
/// fallback.
fn attr_counter(table: &AttrTable, wide: Nl80211StaInfo, narrow: Nl80211StaInfo) -> Option<u64> {
    attr_u64(table, wide).or_else(|| attr_u32(table, narrow).map(u64::from))
}

/// Bracketed per-chain signal list, `"[a, b] "`, or the empty string
/// when the container is absent or empty.
fn chain_signal_str(attr: Option<&Attr>) -> String {
    let mut buf = String::new();
    let attr = match attr {
        Some(attr) => attr,
        None => return buf,
    };
    let mut count = 0;
    for entry in AttrWalker::new(attr.payload) {
        // Each chain entry is a single signed byte; anything else is
        // skipped.
        if entry.payload.len() != 1 {
            continue;
        }
        buf.push_str(if count > 0 { ", " } else { "[" });
        buf.push_str(&(entry.payload[0] as i8).to_string());
        count += 1;
    }
    if count > 0 {
        buf.push_str("] ");
    }
    buf
}

/// Compose one bitrate description line in fixed append order.
fn bitrate_line(attr: &Attr) -> String {
    let rinfo = policy::parse_validated(attr.payload, AttrContext::RateInfo);
    let mut line = String::new();

    let rate = attr_u32(&rinfo, Nl80211RateInfo::Bitrate32)
        .or_else(|| attr_u16(&rinfo, Nl80211RateInfo::Bitrate).map(u32::from))
        .unwrap_or(0);
    if rate > 0 {
        line.push_str(&format!("{}.{} MBit/s", rate / 10, rate % 10));
    } else {
        line.push_str("(unknown)");
    }

    if let Some(mcs) = attr_u8(&rinfo, Nl80211RateInfo::Mcs) {
        line.push_str(&format!(" MCS {}", mcs));
    }
    if let Some(mcs) = attr_u8(&rinfo, Nl80211RateInfo::VhtMcs) {
        line.push_str(&format!(" VHT-MCS {}", mcs));
    }
    if rinfo.contains(u16::from(Nl80211RateInfo::Width40Mhz)) {
        line.push_str(" 40MHz");
    }
    if rinfo.contains(u16::from(Nl80211RateInfo::Width80Mhz)) {
        line.push_str(" 80MHz");
    }
    if rinfo.contains(u16::from(Nl80211RateInfo::Width80P80Mhz)) {
        line.push_str(" 80P80MHz");
    }
    if rinfo.contains(u16::from(Nl80211RateInfo::Width160Mhz)) {
        line.push_str(" 160MHz");
    }
    if rinfo.contains(u16::from(Nl80211RateInfo::Width320Mhz)) {
        line.push_str(" 320MHz");
    }
    if rinfo.contains(u16::from(Nl80211RateInfo::ShortGi)) {
        line.push_str(" short GI");
    }
    if let Some(nss) = attr_u8(&rinfo, Nl80211RateInfo::VhtNss) {
        line.push_str(&format!(" VHT-NSS {}", nss));
    }
    if let Some(mcs) = attr_u8(&rinfo, Nl80211RateInfo::HeMcs) {
        line.push_str(&format!(" HE-MCS {}", mcs));
    }
    if let Some(nss) = attr_u8(&rinfo, Nl80211RateInfo::HeNss) {
        line.push_str(&format!(" HE-NSS {}", nss));
    }
    if let Some(gi) = attr_u8(&rinfo, Nl80211RateInfo::HeGi) {
        line.push_str(&format!(" HE-GI {}", gi));
    }
    if let Some(dcm) = attr_u8(&rinfo, Nl80211RateInfo::HeDcm) {
        line.push_str(&format!(" HE-DCM {}", dcm));
    }
    if let Some(ru) = attr_u8(&rinfo, Nl80211RateInfo::HeRuAlloc) {
        line.push_str(&format!(" HE-RU-ALLOC {}", ru));
    }
    if let Some(mcs) = attr_u8(&rinfo, Nl80211RateInfo::EhtMcs) {
        line.push_str(&format!(" EHT-MCS {}", mcs));
    }
    if let Some(nss) = attr_u8(&rinfo, Nl80211RateInfo::EhtNss) {
        line.push_str(&format!(" EHT-NSS {}", nss));
    }
    if let Some(gi) = attr_u8(&rinfo, Nl80211RateInfo::EhtGi) {
        line.push_str(&format!(" EHT-GI {}", gi));
    }
    if let Some(ru) = attr_u8(&rinfo, Nl80211RateInfo::EhtRuAlloc) {
        line.push_str(&format!(" EHT-RU-ALLOC {}", ru));
    }
    line
}

fn plink_state_name(state: u8) -> &'static str {
    match Nl80211PlinkState::from(state) {
        Nl80211PlinkState::Listen => "LISTEN",
        Nl80211PlinkState::OpnSnt => "OPN_SNT",
        Nl80211PlinkState::OpnRcvd => "OPN_RCVD",
        Nl80211PlinkState::CnfRcvd => "CNF_RCVD",
        Nl80211PlinkState::Estab => "ESTAB",
        Nl80211PlinkState::Holding => "HOLDING",
        Nl80211PlinkState::Blocked => "BLOCKED",
        Nl80211PlinkState::UnrecognizedVariant(_) => "UNKNOWN",
    }
}

fn power_mode_name(mode: u32) -> &'static str {
    match Nl80211MeshPowerMode::from(mode) {
        Nl80211MeshPowerMode::Active => "ACTIVE",
        Nl80211MeshPowerMode::LightSleep => "LIGHT SLEEP",
        Nl80211MeshPowerMode::DeepSleep => "DEEP SLEEP",
        Nl80211MeshPowerMode::Unknown | Nl80211MeshPowerMode::UnrecognizedVariant(_) => "UNKNOWN",
    }
}

/// Append one TXQ counter row, and the column header ahead of it when
/// this is the first row of the report.
fn render_txq_stats(buf: &mut String, attr: &Attr, header: bool, tid: usize) {
    let txq = policy::parse_validated(attr.payload, AttrContext::TxqStats);
    if header {
        buf.push_str(
            "\n\t\tTID\tqsz-byt\tqsz-pkt\tflows\tdrops\tmarks\toverlmt\thashcol\ttx-bytes\ttx-packets",
        );
    }
    buf.push_str(&format!("\n\t\t{}", tid));
    let cells = [
        (Nl80211TxqStats::BacklogBytes, "\t"),
        (Nl80211TxqStats::BacklogPackets, "\t"),
        (Nl80211TxqStats::Flows, "\t"),
        (Nl80211TxqStats::Drops, "\t"),
        (Nl80211TxqStats::EcnMarks, "\t"),
        (Nl80211TxqStats::Overlimit, "\t"),
        (Nl80211TxqStats::Collisions, "\t"),
        (Nl80211TxqStats::TxBytes, "\t"),
        (Nl80211TxqStats::TxPackets, "\t\t"),
    ];
    for (stat, spacer) in cells {
        buf.push_str(spacer);
        if let Some(value) = attr_u32(&txq, stat) {
            buf.push_str(&value.to_string());
        }
    }
}

/// Append the per-TID MSDU table and, when any TID carries TXQ
/// counters, the combined TXQ table after it.
fn render_tid_stats(attr: &Attr, out: &mut String) {
    out.push_str("\n\tMSDU:\n\t\tTID\trx\ttx\ttx retries\ttx failed");
    let mut txqbuf = String::new();
    for (tid, wrapper) in AttrWalker::new(attr.payload).enumerate() {
        let stats = policy::parse_validated(wrapper.payload, AttrContext::TidStats);
        out.push_str(&format!("\n\t\t{}", tid));
        if let Some(value) = attr_u64(&stats, Nl80211TidStats::RxMsdu) {
            out.push_str(&format!("\t{}", value));
        }
        if let Some(value) = attr_u64(&stats, Nl80211TidStats::TxMsdu) {
            out.push_str(&format!("\t{}", value));
        }
        if let Some(value) = attr_u64(&stats, Nl80211TidStats::TxMsduRetries) {
            out.push_str(&format!("\t{}", value));
        }
        if let Some(value) = attr_u64(&stats, Nl80211TidStats::TxMsduFailed) {
            out.push_str(&format!("\t\t{}", value));
        }
        if let Some(txq) = stats.get(u16::from(Nl80211TidStats::TxqStats)) {
            let first = txqbuf.is_empty();
            render_txq_stats(&mut txqbuf, txq, first, tid);
        }
    }
    if !txqbuf.is_empty() {
        out.push_str(&format!("\n\tTXQs:{}", txqbuf));
    }
}

/// Append the BSS parameter block.
fn render_bss_param(attr: &Attr, out: &mut String) {
    let bss = policy::parse_validated(attr.payload, AttrContext::BssParam);
    if let Some(period) = attr_u8(&bss, Nl80211StaBssParam::DtimPeriod) {
        out.push_str(&format!("\n\tDTIM period:\t{}", period));
    }
    if let Some(interval) = attr_u16(&bss, Nl80211StaBssParam::BeaconInterval) {
        out.push_str(&format!("\n\tbeacon interval:{}", interval));
    }
    if bss.contains(u16::from(Nl80211StaBssParam::CtsProt)) {
        out.push_str("\n\tCTS protection:\tyes");
    }
    if bss.contains(u16::from(Nl80211StaBssParam::ShortPreamble)) {
        out.push_str("\n\tshort preamble:\tyes");
    }
    if bss.contains(u16::from(Nl80211StaBssParam::ShortSlotTime)) {
        out.push_str("\n\tshort slot time:yes");
    }
}

/// A decoded station dump message.
///
/// Decoding never fails; whatever survived validation is queryable and
/// renderable. Decoding the same payload twice yields identical
/// reports.
#[derive(Debug)]
pub struct StationReport<'a> {
    top: AttrTable<'a>,
    sta: Option<AttrTable<'a>>,
}

impl<'a> StationReport<'a> {
    /// Decode the attribute tree of one station message payload,
    /// validating each nesting level against its policy.
    pub fn decode(payload: &'a [u8]) -> Self {
        let top = policy::parse_validated(payload, AttrContext::Top);
        let sta = top
            .get(u16::from(Nl80211Attr::StaInfo))
            .map(|attr| policy::parse_validated(attr.payload, AttrContext::StaInfo));
        StationReport { top, sta }
    }

    /// The peer's hardware address, when present.
    pub fn mac(&self) -> Option<MacAddr> {
        self.top
            .get(u16::from(Nl80211Attr::Mac))
            .and_then(|attr| MacAddr::from_bytes(attr.payload))
    }

    /// The interface index the station belongs to, when present.
    pub fn ifindex(&self) -> Option<u32> {
        attr_u32(&self.top, Nl80211Attr::Ifindex)
    }

    /// Brief form: just the hardware address, one line. Nothing is
    /// appended when the message carried no address.
    pub fn render_brief(&self, out: &mut String) {
        if let Some(mac) = self.mac() {
            out.push_str(&format!("{}\n", mac));
        }
    }

    /// Render the full report into `out`.
    ///
    /// The raw attribute listing and the interface and address lines
    /// are appended even when the telemetry container is missing; in
    /// that case an error carrying the diagnostic for stderr is
    /// returned and the body is skipped.
    pub fn render(&self, out: &mut String, clock: &ReportClock) -> Result<(), Error> {
        self.render_header(out);
        let sta = match self.sta {
            Some(ref sta) => sta,
            None => return Err(Error::new("sta stats missing!")),
        };
        self.render_body(sta, out, clock);
        Ok(())
    }

    fn render_header(&self, out: &mut String) {
        let mut types: Vec<u16> = self.top.iter().map(|attr| attr.atype()).collect();
        types.sort_unstable();
        types.dedup();
        for atype in types {
            if let Some(attr) = self.top.get(atype) {
                out.push_str(&format!(
                    "attr. type: {} {}\n",
                    attr.nla_type,
                    nl80211_attr_name(attr.nla_type)
                ));
            }
        }
        if let Some(idx) = self.ifindex() {
            let name = socket::if_index_to_name(idx).unwrap_or_default();
            out.push_str(&format!("dev idx: {} if: {}\n", idx, name));
        }
        if let Some(mac) = self.mac() {
            out.push_str(&format!("mac: {}\n", mac));
        }
    }

    fn render_body(&self, sta: &AttrTable, out: &mut String, clock: &ReportClock) {
        if let Some(value) = attr_u32(sta, Nl80211StaInfo::InactiveTime) {
            out.push_str(&format!("\n\tinactive time:\t{} ms", value));
        }
        if let Some(value) = attr_counter(sta, Nl80211StaInfo::RxBytes64, Nl80211StaInfo::RxBytes)
        {
            out.push_str(&format!("\n\trx bytes:\t{}", value));
        }
        if let Some(value) = attr_u32(sta, Nl80211StaInfo::RxPackets) {
            out.push_str(&format!("\n\trx packets:\t{}", value));
        }
        if let Some(value) = attr_counter(sta, Nl80211StaInfo::TxBytes64, Nl80211StaInfo::TxBytes)
        {
            out.push_str(&format!("\n\ttx bytes:\t{}", value));
        }
        if let Some(value) = attr_u32(sta, Nl80211StaInfo::TxPackets) {
            out.push_str(&format!("\n\ttx packets:\t{}", value));
        }
        if let Some(value) = attr_u32(sta, Nl80211StaInfo::TxRetries) {
            out.push_str(&format!("\n\ttx retries:\t{}", value));
        }
        if let Some(value) = attr_u32(sta, Nl80211StaInfo::TxFailed) {
            out.push_str(&format!("\n\ttx failed:\t{}", value));
        }
        if let Some(value) = attr_u32(sta, Nl80211StaInfo::BeaconLoss) {
            out.push_str(&format!("\n\tbeacon loss:\t{}", value));
        }
        if let Some(value) = attr_u64(sta, Nl80211StaInfo::BeaconRx) {
            out.push_str(&format!("\n\tbeacon rx:\t{}", value));
        }
        if let Some(value) = attr_u64(sta, Nl80211StaInfo::RxDropMisc) {
            out.push_str(&format!("\n\trx drop misc:\t{}", value));
        }

        let chain = chain_signal_str(sta.get(u16::from(Nl80211StaInfo::ChainSignal)));
        if let Some(signal) = attr_i8(sta, Nl80211StaInfo::Signal) {
            out.push_str(&format!("\n\tsignal:  \t{} {}dBm", signal, chain));
        }
        let chain = chain_signal_str(sta.get(u16::from(Nl80211StaInfo::ChainSignalAvg)));
        if let Some(signal) = attr_i8(sta, Nl80211StaInfo::SignalAvg) {
            out.push_str(&format!("\n\tsignal avg:\t{} {}dBm", signal, chain));
        }
        if let Some(signal) = attr_i8(sta, Nl80211StaInfo::BeaconSignalAvg) {
            out.push_str(&format!("\n\tbeacon signal avg:\t{} dBm", signal));
        }
        if let Some(value) = attr_u64(sta, Nl80211StaInfo::TOffset) {
            out.push_str(&format!("\n\tToffset:\t{} us", value));
        }

        if let Some(attr) = sta.get(u16::from(Nl80211StaInfo::TxBitrate)) {
            out.push_str(&format!("\n\ttx bitrate:\t{}", bitrate_line(attr)));
        }
        if let Some(value) = attr_u64(sta, Nl80211StaInfo::TxDuration) {
            out.push_str(&format!("\n\ttx duration:\t{} us", value));
        }
        if let Some(attr) = sta.get(u16::from(Nl80211StaInfo::RxBitrate)) {
            out.push_str(&format!("\n\trx bitrate:\t{}", bitrate_line(attr)));
        }
        if let Some(value) = attr_u64(sta, Nl80211StaInfo::RxDuration) {
            out.push_str(&format!("\n\trx duration:\t{} us", value));
        }

        if let Some(signal) = attr_i8(sta, Nl80211StaInfo::AckSignal) {
            out.push_str(&format!("\n\tlast ack signal:{} dBm", signal));
        }
        if let Some(signal) = attr_i8(sta, Nl80211StaInfo::AckSignalAvg) {
            out.push_str(&format!("\n\tavg ack signal:\t{} dBm", signal));
        }
        if let Some(weight) = attr_u16(sta, Nl80211StaInfo::AirtimeWeight) {
            out.push_str(&format!("\n\tairtime weight: {}", weight));
        }
        if let Some(raw) = attr_u32(sta, Nl80211StaInfo::ExpectedThroughput) {
            // Kbps scaled into Mbps with three fractional digits kept.
            let thr = u64::from(raw) * 1000 / 1024;
            out.push_str(&format!(
                "\n\texpected throughput:\t{}.{}Mbps",
                thr / 1000,
                thr % 1000
            ));
        }

        if let Some(llid) = attr_u16(sta, Nl80211StaInfo::Llid) {
            out.push_str(&format!("\n\tmesh llid:\t{}", llid));
        }
        if let Some(plid) = attr_u16(sta, Nl80211StaInfo::Plid) {
            out.push_str(&format!("\n\tmesh plid:\t{}", plid));
        }
        if let Some(state) = attr_u8(sta, Nl80211StaInfo::PlinkState) {
            out.push_str(&format!("\n\tmesh plink:\t{}", plink_state_name(state)));
        }
        if let Some(metric) = attr_u32(sta, Nl80211StaInfo::AirtimeLinkMetric) {
            out.push_str(&format!("\n\tmesh airtime link metric: {}", metric));
        }
        if let Some(gate) = attr_u8(sta, Nl80211StaInfo::ConnectedToGate) {
            out.push_str(&format!(
                "\n\tmesh connected to gate:\t{}",
                if gate != 0 { "yes" } else { "no" }
            ));
        }
        if let Some(auth) = attr_u8(sta, Nl80211StaInfo::ConnectedToAs) {
            out.push_str(&format!(
                "\n\tmesh connected to auth server:\t{}",
                if auth != 0 { "yes" } else { "no" }
            ));
        }
        if let Some(mode) = attr_u32(sta, Nl80211StaInfo::LocalPm) {
            out.push_str(&format!("\n\tmesh local PS mode:\t{}", power_mode_name(mode)));
        }
        if let Some(mode) = attr_u32(sta, Nl80211StaInfo::PeerPm) {
            out.push_str(&format!("\n\tmesh peer PS mode:\t{}", power_mode_name(mode)));
        }
        if let Some(mode) = attr_u32(sta, Nl80211StaInfo::NonpeerPm) {
            out.push_str(&format!(
                "\n\tmesh non-peer PS mode:\t{}",
                power_mode_name(mode)
            ));
        }

        let flags = sta
            .get(u16::from(Nl80211StaInfo::StaFlags))
            .and_then(|attr| StaFlagUpdate::from_payload(attr.payload));
        if let Some(flags) = flags {
            if let Some(yes) = flags.get(Nl80211StaFlag::Authorized) {
                out.push_str(&format!("\n\tauthorized:\t{}", if yes { "yes" } else { "no" }));
            }
            if let Some(yes) = flags.get(Nl80211StaFlag::Authenticated) {
                out.push_str(&format!(
                    "\n\tauthenticated:\t{}",
                    if yes { "yes" } else { "no" }
                ));
            }
            if let Some(yes) = flags.get(Nl80211StaFlag::Associated) {
                out.push_str(&format!("\n\tassociated:\t{}", if yes { "yes" } else { "no" }));
            }
            if let Some(short) = flags.get(Nl80211StaFlag::ShortPreamble) {
                out.push_str(&format!(
                    "\n\tpreamble:\t{}",
                    if short { "short" } else { "long" }
                ));
            }
            if let Some(yes) = flags.get(Nl80211StaFlag::Wme) {
                out.push_str(&format!("\n\tWMM/WME:\t{}", if yes { "yes" } else { "no" }));
            }
            if let Some(yes) = flags.get(Nl80211StaFlag::Mfp) {
                out.push_str(&format!("\n\tMFP:\t\t{}", if yes { "yes" } else { "no" }));
            }
            if let Some(yes) = flags.get(Nl80211StaFlag::TdlsPeer) {
                out.push_str(&format!("\n\tTDLS peer:\t{}", if yes { "yes" } else { "no" }));
            }
        }

        if let Some(attr) = sta.get(u16::from(Nl80211StaInfo::TidStats)) {
            render_tid_stats(attr, out);
        }
        if let Some(attr) = sta.get(u16::from(Nl80211StaInfo::BssParam)) {
            render_bss_param(attr, out);
        }
        if let Some(value) = attr_u32(sta, Nl80211StaInfo::ConnectedTime) {
            out.push_str(&format!("\n\tconnected time:\t{} seconds", value));
        }
        if let Some(bt) = attr_u64(sta, Nl80211StaInfo::AssocAtBoottime) {
            out.push_str(&format!(
                "\n\tassociated at [boottime]:\t{}.{:03}s",
                bt / 1_000_000_000,
                (bt % 1_000_000_000) / 1_000_000
            ));
            // Clock skew between the two samples can push this past
            // either end; unsigned wraparound is accepted.
            let assoc_at_ms = clock
                .now_ms
                .wrapping_sub(clock.boottime_ns.wrapping_sub(bt) / 1_000_000);
            out.push_str(&format!("\n\tassociated at:\t{} ms", assoc_at_ms));
        }

        out.push_str(&format!("\n\tcurrent time:\t{} ms\n", clock.now_ms));
    }
}

#[cfg(test)]
mod test {
    use super::*;

    use byteorder::WriteBytesExt;

    use crate::attr::put_attr;

    const CLOCK: ReportClock = ReportClock {
        now_ms: 1_000_000,
        boottime_ns: 10_000_000_000,
    };

    fn put_u16_attr(buf: &mut Vec<u8>, atype: u16, value: u16) {
        let mut payload = Vec::new();
        payload.write_u16::<NativeEndian>(value).unwrap();
        put_attr(buf, atype, &payload).unwrap();
    }

    fn put_u32_attr(buf: &mut Vec<u8>, atype: u16, value: u32) {
        let mut payload = Vec::new();
        payload.write_u32::<NativeEndian>(value).unwrap();
        put_attr(buf, atype, &payload).unwrap();
    }

    fn put_u64_attr(buf: &mut Vec<u8>, atype: u16, value: u64) {
        let mut payload = Vec::new();
        payload.write_u64::<NativeEndian>(value).unwrap();
        put_attr(buf, atype, &payload).unwrap();
    }

    /// Wrap a station info payload into a full message payload with a
    /// hardware address.
    fn message_with_sta(sta: &[u8]) -> Vec<u8> {
        let mut buf = Vec::new();
        put_attr(
            &mut buf,
            u16::from(Nl80211Attr::Mac),
            &[0xaa, 0xbb, 0xcc, 0xdd, 0xee, 0xff],
        )
        .unwrap();
        put_attr(&mut buf, u16::from(Nl80211Attr::StaInfo), sta).unwrap();
        buf
    }

    fn render_full(payload: &[u8]) -> String {
        let report = StationReport::decode(payload);
        let mut out = String::new();
        report.render(&mut out, &CLOCK).unwrap();
        out
    }

    #[test]
    fn test_mac_parse_and_display() {
        let mac: MacAddr = "aa:bb:cc:dd:ee:ff".parse().unwrap();
        assert_eq!(mac.octets(), &[0xaa, 0xbb, 0xcc, 0xdd, 0xee, 0xff]);
        assert_eq!(mac.to_string(), "AA:BB:CC:DD:EE:FF");
        assert!("AA:BB:CC:DD:EE:00".parse::<MacAddr>().is_ok());

        assert!("aa:bb:cc:dd:ee".parse::<MacAddr>().is_err());
        assert!("aa:bb:cc:dd:ee:f".parse::<MacAddr>().is_err());
        assert!("aa:bb:cc:dd:ee:fff".parse::<MacAddr>().is_err());
        assert!("zz:bb:cc:dd:ee:ff".parse::<MacAddr>().is_err());
        assert!("aabbccddeeff00:12".parse::<MacAddr>().is_err());
    }

    #[test]
    fn test_sta_flag_update_mask_gating() {
        let update = StaFlagUpdate {
            mask: Nl80211StaFlag::Authorized.bit() | Nl80211StaFlag::Associated.bit(),
            set: Nl80211StaFlag::Associated.bit(),
        };
        assert_eq!(update.get(Nl80211StaFlag::Authorized), Some(false));
        assert_eq!(update.get(Nl80211StaFlag::Associated), Some(true));
        assert_eq!(update.get(Nl80211StaFlag::Authenticated), None);
        assert_eq!(update.get(Nl80211StaFlag::TdlsPeer), None);

        assert!(StaFlagUpdate::from_payload(&[0; 7]).is_none());
        assert!(StaFlagUpdate::from_payload(&[0; 9]).is_none());

        let mut payload = Vec::new();
        payload.write_u32::<NativeEndian>(2).unwrap();
        payload.write_u32::<NativeEndian>(2).unwrap();
        assert_eq!(
            StaFlagUpdate::from_payload(&payload),
            Some(StaFlagUpdate { mask: 2, set: 2 })
        );
    }

    #[test]
    fn test_signal_byte_renders_signed() {
        let mut sta = Vec::new();
        put_attr(&mut sta, u16::from(Nl80211StaInfo::Signal), &[0xe2]).unwrap();
        let out = render_full(&message_with_sta(&sta));
        assert!(out.contains("\n\tsignal:  \t-30 dBm"));
    }

    #[test]
    fn test_chain_signal_list() {
        let mut chains = Vec::new();
        put_attr(&mut chains, 1, &[0xce]).unwrap();
        put_attr(&mut chains, 2, &[0xcc]).unwrap();
        let mut sta = Vec::new();
        put_attr(&mut sta, u16::from(Nl80211StaInfo::Signal), &[0xd8]).unwrap();
        put_attr(&mut sta, u16::from(Nl80211StaInfo::ChainSignal), &chains).unwrap();
        let out = render_full(&message_with_sta(&sta));
        assert!(out.contains("\n\tsignal:  \t-40 [-50, -52] dBm"));
    }

    #[test]
    fn test_chain_signal_absent_is_empty() {
        let mut sta = Vec::new();
        put_attr(&mut sta, u16::from(Nl80211StaInfo::Signal), &[0xd8]).unwrap();
        let out = render_full(&message_with_sta(&sta));
        assert!(out.contains("\n\tsignal:  \t-40 dBm"));
    }

    #[test]
    fn test_byte_counters_prefer_wide_form() {
        let mut sta = Vec::new();
        put_u32_attr(&mut sta, u16::from(Nl80211StaInfo::RxBytes), 100);
        put_u64_attr(&mut sta, u16::from(Nl80211StaInfo::RxBytes64), 5_000_000_000);
        let out = render_full(&message_with_sta(&sta));
        assert!(out.contains("\n\trx bytes:\t5000000000"));
        assert!(!out.contains("\n\trx bytes:\t100"));
    }

    #[test]
    fn test_byte_counter_narrow_fallback() {
        let mut sta = Vec::new();
        put_u32_attr(&mut sta, u16::from(Nl80211StaInfo::TxBytes), 4242);
        let out = render_full(&message_with_sta(&sta));
        assert!(out.contains("\n\ttx bytes:\t4242"));
    }

    #[test]
    fn test_bitrate_line_value_and_width() {
        let mut rate = Vec::new();
        put_u32_attr(&mut rate, u16::from(Nl80211RateInfo::Bitrate32), 300);
        put_attr(&mut rate, u16::from(Nl80211RateInfo::Width40Mhz), &[]).unwrap();
        let mut sta = Vec::new();
        put_attr(&mut sta, u16::from(Nl80211StaInfo::TxBitrate), &rate).unwrap();
        let out = render_full(&message_with_sta(&sta));
        assert!(out.contains("\n\ttx bitrate:\t30.0 MBit/s 40MHz"));
    }

    #[test]
    fn test_bitrate_line_append_order() {
        let mut rate = Vec::new();
        put_attr(&mut rate, u16::from(Nl80211RateInfo::ShortGi), &[]).unwrap();
        put_attr(&mut rate, u16::from(Nl80211RateInfo::Mcs), &[7]).unwrap();
        put_u16_attr(&mut rate, u16::from(Nl80211RateInfo::Bitrate), 135);
        put_attr(&mut rate, u16::from(Nl80211RateInfo::Width40Mhz), &[]).unwrap();
        let mut sta = Vec::new();
        put_attr(&mut sta, u16::from(Nl80211StaInfo::RxBitrate), &rate).unwrap();
        let out = render_full(&message_with_sta(&sta));
        // Composition order is fixed regardless of wire order.
        assert!(out.contains("\n\trx bitrate:\t13.5 MBit/s MCS 7 40MHz short GI"));
    }

    #[test]
    fn test_bitrate_line_unknown_rate() {
        let mut rate = Vec::new();
        put_attr(&mut rate, u16::from(Nl80211RateInfo::Mcs), &[3]).unwrap();
        let mut sta = Vec::new();
        put_attr(&mut sta, u16::from(Nl80211StaInfo::TxBitrate), &rate).unwrap();
        let out = render_full(&message_with_sta(&sta));
        assert!(out.contains("\n\ttx bitrate:\t(unknown) MCS 3"));
    }

    #[test]
    fn test_expected_throughput_fixed_point() {
        let mut sta = Vec::new();
        put_u32_attr(&mut sta, u16::from(Nl80211StaInfo::ExpectedThroughput), 1024);
        let out = render_full(&message_with_sta(&sta));
        assert!(out.contains("\n\texpected throughput:\t1.0Mbps"));
    }

    #[test]
    fn test_expected_throughput_fraction() {
        let mut sta = Vec::new();
        put_u32_attr(&mut sta, u16::from(Nl80211StaInfo::ExpectedThroughput), 2048);
        let out = render_full(&message_with_sta(&sta));
        assert!(out.contains("\n\texpected throughput:\t2.0Mbps"));

        let mut sta = Vec::new();
        put_u32_attr(&mut sta, u16::from(Nl80211StaInfo::ExpectedThroughput), 1536);
        let out = render_full(&message_with_sta(&sta));
        // 1536 * 1000 / 1024 == 1500
        assert!(out.contains("\n\texpected throughput:\t1.500Mbps"));
    }

    #[test]
    fn test_sta_flags_render_gated() {
        let update_mask = Nl80211StaFlag::Authorized.bit() | Nl80211StaFlag::Associated.bit();
        let mut payload = Vec::new();
        payload.write_u32::<NativeEndian>(update_mask).unwrap();
        payload
            .write_u32::<NativeEndian>(Nl80211StaFlag::Associated.bit())
            .unwrap();
        let mut sta = Vec::new();
        put_attr(&mut sta, u16::from(Nl80211StaInfo::StaFlags), &payload).unwrap();
        let out = render_full(&message_with_sta(&sta));
        assert!(out.contains("\n\tauthorized:\tno"));
        assert!(out.contains("\n\tassociated:\tyes"));
        assert!(!out.contains("authenticated:"));
        assert!(!out.contains("preamble:"));
        assert!(!out.contains("WMM/WME:"));
        assert!(!out.contains("MFP:"));
        assert!(!out.contains("TDLS peer:"));
    }

    #[test]
    fn test_mesh_enum_labels() {
        let mut sta = Vec::new();
        put_attr(&mut sta, u16::from(Nl80211StaInfo::PlinkState), &[4]).unwrap();
        put_u32_attr(&mut sta, u16::from(Nl80211StaInfo::LocalPm), 2);
        put_u32_attr(&mut sta, u16::from(Nl80211StaInfo::PeerPm), 7);
        let out = render_full(&message_with_sta(&sta));
        assert!(out.contains("\n\tmesh plink:\tESTAB"));
        assert!(out.contains("\n\tmesh local PS mode:\tLIGHT SLEEP"));
        assert!(out.contains("\n\tmesh peer PS mode:\tUNKNOWN"));
    }

    #[test]
    fn test_mesh_plink_unknown_sentinel() {
        let mut sta = Vec::new();
        put_attr(&mut sta, u16::from(Nl80211StaInfo::PlinkState), &[9]).unwrap();
        let out = render_full(&message_with_sta(&sta));
        assert!(out.contains("\n\tmesh plink:\tUNKNOWN"));
    }

    #[test]
    fn test_tid_and_txq_tables() {
        let mut txq = Vec::new();
        put_u32_attr(&mut txq, u16::from(Nl80211TxqStats::BacklogBytes), 64);
        put_u32_attr(&mut txq, u16::from(Nl80211TxqStats::Flows), 2);
        put_u32_attr(&mut txq, u16::from(Nl80211TxqStats::TxPackets), 99);

        let mut tid0 = Vec::new();
        put_u64_attr(&mut tid0, u16::from(Nl80211TidStats::RxMsdu), 10);
        put_u64_attr(&mut tid0, u16::from(Nl80211TidStats::TxMsdu), 20);
        put_u64_attr(&mut tid0, u16::from(Nl80211TidStats::TxMsduRetries), 3);
        put_u64_attr(&mut tid0, u16::from(Nl80211TidStats::TxMsduFailed), 1);
        put_attr(&mut tid0, u16::from(Nl80211TidStats::TxqStats), &txq).unwrap();

        let mut tid1 = Vec::new();
        put_u64_attr(&mut tid1, u16::from(Nl80211TidStats::RxMsdu), 5);

        let mut tids = Vec::new();
        put_attr(&mut tids, 1, &tid0).unwrap();
        put_attr(&mut tids, 2, &tid1).unwrap();

        let mut sta = Vec::new();
        put_attr(&mut sta, u16::from(Nl80211StaInfo::TidStats), &tids).unwrap();
        let out = render_full(&message_with_sta(&sta));

        assert!(out.contains("\n\tMSDU:\n\t\tTID\trx\ttx\ttx retries\ttx failed"));
        assert!(out.contains("\n\t\t0\t10\t20\t3\t\t1"));
        assert!(out.contains("\n\t\t1\t5"));
        assert!(out.contains(
            "\n\tTXQs:\n\t\tTID\tqsz-byt\tqsz-pkt\tflows\tdrops\tmarks\toverlmt\thashcol\ttx-bytes\ttx-packets"
        ));
        // Row for TID 0: present cells filled, absent cells left empty,
        // double tab before the final counter.
        assert!(out.contains("\n\t\t0\t64\t\t2\t\t\t\t\t\t\t99"));
    }

    #[test]
    fn test_tid_table_without_txq_has_no_txq_block() {
        let mut tid0 = Vec::new();
        put_u64_attr(&mut tid0, u16::from(Nl80211TidStats::RxMsdu), 7);
        let mut tids = Vec::new();
        put_attr(&mut tids, 1, &tid0).unwrap();
        let mut sta = Vec::new();
        put_attr(&mut sta, u16::from(Nl80211StaInfo::TidStats), &tids).unwrap();
        let out = render_full(&message_with_sta(&sta));
        assert!(out.contains("\n\tMSDU:"));
        assert!(!out.contains("TXQs:"));
    }

    #[test]
    fn test_bss_param_block() {
        let mut bss = Vec::new();
        put_attr(&mut bss, u16::from(Nl80211StaBssParam::CtsProt), &[]).unwrap();
        put_attr(&mut bss, u16::from(Nl80211StaBssParam::ShortSlotTime), &[]).unwrap();
        put_attr(&mut bss, u16::from(Nl80211StaBssParam::DtimPeriod), &[2]).unwrap();
        put_u16_attr(&mut bss, u16::from(Nl80211StaBssParam::BeaconInterval), 100);
        let mut sta = Vec::new();
        put_attr(&mut sta, u16::from(Nl80211StaInfo::BssParam), &bss).unwrap();
        let out = render_full(&message_with_sta(&sta));
        assert!(out.contains(
            "\n\tDTIM period:\t2\n\tbeacon interval:100\n\tCTS protection:\tyes\n\tshort slot time:yes"
        ));
        assert!(!out.contains("short preamble:"));
        // Presence flags render yes or nothing at all.
        assert!(!out.contains("\tno"));
        assert!(!out.contains("slot time:no"));
    }

    #[test]
    fn test_association_times() {
        let mut sta = Vec::new();
        put_u64_attr(
            &mut sta,
            u16::from(Nl80211StaInfo::AssocAtBoottime),
            5_500_000_000,
        );
        let out = render_full(&message_with_sta(&sta));
        assert!(out.contains("\n\tassociated at [boottime]:\t5.500s"));
        // 1_000_000 ms - (10s - 5.5s) = 995_500 ms against the fixed
        // test clock.
        assert!(out.contains("\n\tassociated at:\t995500 ms"));
        assert!(out.ends_with("\n\tcurrent time:\t1000000 ms\n"));
    }

    #[test]
    fn test_boottime_fraction_zero_padded() {
        let mut sta = Vec::new();
        put_u64_attr(
            &mut sta,
            u16::from(Nl80211StaInfo::AssocAtBoottime),
            7_003_000_000,
        );
        let out = render_full(&message_with_sta(&sta));
        assert!(out.contains("\n\tassociated at [boottime]:\t7.003s"));
    }

    #[test]
    fn test_missing_sta_info_skips_body() {
        let mut buf = Vec::new();
        put_attr(
            &mut buf,
            u16::from(Nl80211Attr::Mac),
            &[0xaa, 0xbb, 0xcc, 0xdd, 0xee, 0xff],
        )
        .unwrap();

        let report = StationReport::decode(&buf);
        let mut out = String::new();
        let err = report.render(&mut out, &CLOCK).unwrap_err();
        assert_eq!(err.to_string(), "sta stats missing!");
        // Header lines come through even without telemetry.
        assert!(out.contains("mac: AA:BB:CC:DD:EE:FF\n"));
        assert!(!out.contains("current time:"));
    }

    #[test]
    fn test_render_brief() {
        let sta = Vec::new();
        let payload = message_with_sta(&sta);
        let report = StationReport::decode(&payload);
        let mut out = String::new();
        report.render_brief(&mut out);
        assert_eq!(out, "AA:BB:CC:DD:EE:FF\n");

        let report = StationReport::decode(&[]);
        let mut out = String::new();
        report.render_brief(&mut out);
        assert!(out.is_empty());
    }

    #[test]
    fn test_decode_is_idempotent() {
        let mut sta = Vec::new();
        put_u32_attr(&mut sta, u16::from(Nl80211StaInfo::InactiveTime), 5000);
        put_attr(&mut sta, u16::from(Nl80211StaInfo::Signal), &[0xe2]).unwrap();
        let payload = message_with_sta(&sta);

        let first = render_full(&payload);
        let second = render_full(&payload);
        assert_eq!(first, second);
    }

    #[test]
    fn test_full_report_golden() {
        let mut sta = Vec::new();
        put_u32_attr(&mut sta, u16::from(Nl80211StaInfo::InactiveTime), 5000);
        put_u64_attr(&mut sta, u16::from(Nl80211StaInfo::RxBytes64), 1_000_000);
        put_u32_attr(&mut sta, u16::from(Nl80211StaInfo::RxPackets), 1500);
        put_attr(&mut sta, u16::from(Nl80211StaInfo::Signal), &[0xe2]).unwrap();
        put_u32_attr(&mut sta, u16::from(Nl80211StaInfo::ConnectedTime), 3600);

        let mut buf = Vec::new();
        // An index this large resolves to no interface name on any
        // live system, keeping the golden output stable.
        put_u32_attr(&mut buf, u16::from(Nl80211Attr::Ifindex), 0x7fff_ffff);
        put_attr(
            &mut buf,
            u16::from(Nl80211Attr::Mac),
            &[0xaa, 0xbb, 0xcc, 0xdd, 0xee, 0xff],
        )
        .unwrap();
        put_attr(&mut buf, u16::from(Nl80211Attr::StaInfo), &sta).unwrap();
        put_u32_attr(&mut buf, u16::from(Nl80211Attr::Generation), 5);

        let out = render_full(&buf);
        let expected = "attr. type: 3 NL80211_ATTR_IFINDEX\n\
             attr. type: 6 NL80211_ATTR_MAC\n\
             attr. type: 21 NL80211_ATTR_STA_INFO\n\
             attr. type: 46 NL80211_ATTR_GENERATION\n\
             dev idx: 2147483647 if: \n\
             mac: AA:BB:CC:DD:EE:FF\n\
             \n\tinactive time:\t5000 ms\
             \n\trx bytes:\t1000000\
             \n\trx packets:\t1500\
             \n\tsignal:  \t-30 dBm\
             \n\tconnected time:\t3600 seconds\
             \n\tcurrent time:\t1000000 ms\n";
        assert_eq!(out, expected);
    }

    #[test]
    fn test_policy_violation_drops_single_field() {
        let mut sta = Vec::new();
        // Two byte inactive time violates the four byte policy.
        put_u16_attr(&mut sta, u16::from(Nl80211StaInfo::InactiveTime), 9);
        put_u32_attr(&mut sta, u16::from(Nl80211StaInfo::RxPackets), 77);
        let out = render_full(&message_with_sta(&sta));
        assert!(!out.contains("inactive time:"));
        assert!(out.contains("\n\trx packets:\t77"));
    }
}
