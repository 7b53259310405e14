// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Fixed 1024-byte datagram framing: a 36-byte ASCII uuid
//! shared by every fragment of one logical message, a 4-byte fragment count,
//! a 4-byte fragment index, and a 980-byte payload chunk.

use std::collections::HashMap;

/// Whole-datagram size on the wire.
pub const DATAGRAM_LEN: usize = 1024;
/// Width of the ASCII uuid field.
pub const UUID_LEN: usize = 36;
/// Width of the `total` and `index` fields.
const COUNTER_LEN: usize = 4;
/// Width of the payload chunk carried by a single datagram.
pub const DATA_LEN: usize = DATAGRAM_LEN - UUID_LEN - 2 * COUNTER_LEN;

/// One fragment of a logical message.
///
/// `data` holds exactly the bytes belonging to this fragment: for fragments
/// produced in-memory by [`fragment`] the last fragment's `data` is its true
/// (possibly short) length; fragments produced by [`Packet::decode`] (i.e.
/// recovered from a received datagram) always carry the full
/// zero-right-padded [`DATA_LEN`] bytes, since the wire layout has no field
/// recording the unpadded length. The envelope layer (`fc-wire::envelope`)
/// is written to tolerate the resulting trailing padding.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Packet {
    pub uuid: String,
    pub total: u32,
    pub index: u32,
    pub data: Vec<u8>,
}

impl Packet {
    /// Encode to the fixed 1024-byte wire layout, network byte order,
    /// right-padding `data` with zeros if shorter than [`DATA_LEN`].
    pub fn encode(&self) -> [u8; DATAGRAM_LEN] {
        let mut buf = [0u8; DATAGRAM_LEN];
        let uuid_bytes = self.uuid.as_bytes();
        let n = uuid_bytes.len().min(UUID_LEN);
        buf[..n].copy_from_slice(&uuid_bytes[..n]);
        buf[UUID_LEN..UUID_LEN + COUNTER_LEN].copy_from_slice(&self.total.to_be_bytes());
        buf[UUID_LEN + COUNTER_LEN..UUID_LEN + 2 * COUNTER_LEN]
            .copy_from_slice(&self.index.to_be_bytes());
        let data_start = UUID_LEN + 2 * COUNTER_LEN;
        let dn = self.data.len().min(DATA_LEN);
        buf[data_start..data_start + dn].copy_from_slice(&self.data[..dn]);
        buf
    }

    /// Decode a single datagram. Any size mismatch or non-UTF-8 uuid yields
    /// `None` — a malformed datagram is discarded silently.
    pub fn decode(raw: &[u8]) -> Option<Packet> {
        if raw.len() != DATAGRAM_LEN {
            return None;
        }
        let uuid = std::str::from_utf8(&raw[..UUID_LEN]).ok()?.to_string();
        let total = u32::from_be_bytes(raw[UUID_LEN..UUID_LEN + COUNTER_LEN].try_into().ok()?);
        let index = u32::from_be_bytes(
            raw[UUID_LEN + COUNTER_LEN..UUID_LEN + 2 * COUNTER_LEN].try_into().ok()?,
        );
        let data = raw[UUID_LEN + 2 * COUNTER_LEN..].to_vec();
        Some(Packet { uuid, total, index, data })
    }
}

/// Split `buf` into fragments sharing `uuid`. An empty buffer still yields
/// one (empty) fragment so zero-length messages round-trip.
pub fn fragment(uuid: &str, buf: &[u8]) -> Vec<Packet> {
    if buf.is_empty() {
        return vec![Packet { uuid: uuid.to_string(), total: 1, index: 0, data: Vec::new() }];
    }
    let total = buf.len().div_ceil(DATA_LEN) as u32;
    buf.chunks(DATA_LEN)
        .enumerate()
        .map(|(i, chunk)| Packet {
            uuid: uuid.to_string(),
            total,
            index: i as u32,
            data: chunk.to_vec(),
        })
        .collect()
}

/// Group a flat buffer of packets (possibly from several in-flight
/// messages) by uuid into "packet groups".
pub fn group(packets: &[Packet]) -> HashMap<String, Vec<Packet>> {
    let mut groups: HashMap<String, Vec<Packet>> = HashMap::new();
    for p in packets {
        groups.entry(p.uuid.clone()).or_default().push(p.clone());
    }
    groups
}

/// Is `{0..total}` fully covered by the given packets' indices?
pub fn is_complete(packets: &[Packet]) -> bool {
    let Some(first) = packets.first() else { return false };
    let total = first.total;
    if packets.iter().any(|p| p.uuid != first.uuid || p.total != total) {
        return false;
    }
    let mut seen = vec![false; total as usize];
    for p in packets {
        if let Some(slot) = seen.get_mut(p.index as usize) {
            *slot = true;
        }
    }
    seen.into_iter().all(|x| x)
}

/// Reassemble a complete packet group into its original byte buffer.
/// Returns `None` if the group is incomplete, empty, or mixes uuids/totals
/// (a malformed or still-in-flight group is never partially emitted).
pub fn reassemble(packets: &[Packet]) -> Option<Vec<u8>> {
    if !is_complete(packets) {
        return None;
    }
    let total = packets[0].total;
    let mut by_index: HashMap<u32, &Packet> = HashMap::new();
    for p in packets {
        by_index.insert(p.index, p);
    }
    let mut out = Vec::new();
    for i in 0..total {
        out.extend_from_slice(&by_index[&i].data);
    }
    Some(out)
}

#[cfg(test)]
#[path = "packet_tests.rs"]
mod tests;
