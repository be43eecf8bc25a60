#![allow(dead_code)]

use std::fs;
use std::path::Path;

use etherparse::PacketBuilder;

pub const RSSI_PORT: u16 = 8198;

const PCAPNG_SHB: u32 = 0x0A0D0D0A;
const PCAPNG_IDB: u32 = 1;
const PCAPNG_EPB: u32 = 6;
const LINKTYPE_ETHERNET: u16 = 1;

/// One captured frame: timestamp in microseconds, bytes, on-wire length.
pub struct CapturedFrame {
    pub ts_us: u64,
    pub data: Vec<u8>,
    pub orig_len: u32,
}

impl CapturedFrame {
    pub fn new(ts_us: u64, data: Vec<u8>) -> Self {
        let orig_len = data.len() as u32;
        Self {
            ts_us,
            data,
            orig_len,
        }
    }
}

pub fn udp_frame(src_port: u16, dst_port: u16, payload: &[u8]) -> Vec<u8> {
    let builder = PacketBuilder::ethernet2([1, 2, 3, 4, 5, 6], [7, 8, 9, 10, 11, 12])
        .ipv4([192, 168, 2, 10], [192, 168, 2, 1], 64)
        .udp(src_port, dst_port);
    let mut packet = Vec::<u8>::with_capacity(builder.size(payload.len()));
    builder.write(&mut packet, payload).expect("build udp frame");
    packet
}

pub fn tcp_frame(payload: &[u8]) -> Vec<u8> {
    let builder = PacketBuilder::ethernet2([1, 2, 3, 4, 5, 6], [7, 8, 9, 10, 11, 12])
        .ipv4([192, 168, 2, 10], [192, 168, 2, 1], 64)
        .tcp(RSSI_PORT, RSSI_PORT, 0, 0);
    let mut packet = Vec::<u8>::with_capacity(builder.size(payload.len()));
    builder.write(&mut packet, payload).expect("build tcp frame");
    packet
}

/// AXISP frame: version 4 / crc type 1, SOF and EOF set.
pub fn axisp_frame(payload: &[u8]) -> Vec<u8> {
    let mut frame = vec![0x14, 0x00, 0x00, 0x00, 0x01, 0x23, 0x00, 0x80];
    frame.extend_from_slice(payload);
    frame.extend_from_slice(&[0x00, 0x01, 0x04, 0x00, 0x00, 0x00, 0x12, 0x34]);
    frame
}

/// RSSI regular (ACK) packet carrying `payload`.
pub fn rssi_regular(payload: &[u8]) -> Vec<u8> {
    let mut packet = vec![0x40, 0x08, 0x05, 0x04, 0x00, 0x00, 0xbe, 0xef];
    packet.extend_from_slice(payload);
    packet
}

/// RSSI SYN packet with a complete parameter block.
pub fn rssi_syn() -> Vec<u8> {
    vec![
        0x80, 0x18, 0x00, 0x00, // flags, header length, seq, ack
        0x14, 0x08, 0x05, 0xdc, 0x00, 0x0a, 0x00, 0x05, 0x00, 0x64, 0x0f, 0x02, 0x03, 0x03,
        0xde, 0xad, 0xbe, 0xef,
    ]
}

pub fn write_pcapng(path: &Path, frames: &[CapturedFrame]) {
    let mut output = Vec::new();
    output.extend_from_slice(&pcapng_block(PCAPNG_SHB, &section_header_body()));
    output.extend_from_slice(&pcapng_block(PCAPNG_IDB, &interface_desc_body()));
    for frame in frames {
        output.extend_from_slice(&pcapng_block(PCAPNG_EPB, &enhanced_packet_body(frame)));
    }
    fs::write(path, output).expect("write pcapng");
}

pub fn write_pcap(path: &Path, frames: &[CapturedFrame]) {
    let mut output = Vec::new();
    output.extend_from_slice(&0xa1b2c3d4u32.to_le_bytes());
    output.extend_from_slice(&2u16.to_le_bytes());
    output.extend_from_slice(&4u16.to_le_bytes());
    output.extend_from_slice(&0i32.to_le_bytes());
    output.extend_from_slice(&0u32.to_le_bytes());
    output.extend_from_slice(&65535u32.to_le_bytes());
    output.extend_from_slice(&(LINKTYPE_ETHERNET as u32).to_le_bytes());
    for frame in frames {
        output.extend_from_slice(&((frame.ts_us / 1_000_000) as u32).to_le_bytes());
        output.extend_from_slice(&((frame.ts_us % 1_000_000) as u32).to_le_bytes());
        output.extend_from_slice(&(frame.data.len() as u32).to_le_bytes());
        output.extend_from_slice(&frame.orig_len.to_le_bytes());
        output.extend_from_slice(&frame.data);
    }
    fs::write(path, output).expect("write pcap");
}

fn pcapng_block(block_type: u32, body: &[u8]) -> Vec<u8> {
    let total_len = (12 + body.len()) as u32;
    let mut block = Vec::with_capacity(total_len as usize);
    block.extend_from_slice(&block_type.to_be_bytes());
    block.extend_from_slice(&total_len.to_be_bytes());
    block.extend_from_slice(body);
    block.extend_from_slice(&total_len.to_be_bytes());
    block
}

fn section_header_body() -> Vec<u8> {
    let mut body = Vec::new();
    body.extend_from_slice(&0x1A2B3C4Du32.to_be_bytes());
    body.extend_from_slice(&1u16.to_be_bytes());
    body.extend_from_slice(&0u16.to_be_bytes());
    body.extend_from_slice(&(-1i64).to_be_bytes());
    body
}

fn interface_desc_body() -> Vec<u8> {
    let mut body = Vec::new();
    body.extend_from_slice(&LINKTYPE_ETHERNET.to_be_bytes());
    body.extend_from_slice(&0u16.to_be_bytes());
    body.extend_from_slice(&65535u32.to_be_bytes());
    body
}

fn enhanced_packet_body(frame: &CapturedFrame) -> Vec<u8> {
    let ts_high = (frame.ts_us >> 32) as u32;
    let ts_low = (frame.ts_us & 0xffff_ffff) as u32;
    let cap_len = frame.data.len() as u32;
    let mut body = Vec::new();
    body.extend_from_slice(&0u32.to_be_bytes());
    body.extend_from_slice(&ts_high.to_be_bytes());
    body.extend_from_slice(&ts_low.to_be_bytes());
    body.extend_from_slice(&cap_len.to_be_bytes());
    body.extend_from_slice(&frame.orig_len.to_be_bytes());
    body.extend_from_slice(&frame.data);
    let pad_len = (4 - (frame.data.len() % 4)) % 4;
    body.extend(std::iter::repeat_n(0u8, pad_len));
    body
}
