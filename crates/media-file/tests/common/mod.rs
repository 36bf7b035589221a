// SPDX-FileCopyrightText: Copyright (C) 2018-2025 Uwe Klotz <uwedotklotzatgmaildotcom> et al.
// SPDX-License-Identifier: AGPL-3.0-or-later

//! Minimal audio files that are synthesized on the fly.

#![allow(dead_code)]
#![allow(unreachable_pub)]

use std::{
    io::Cursor,
    path::{Path, PathBuf},
};

use image::{DynamicImage, ImageFormat, RgbImage};
use tempfile::TempDir;

pub fn init_logger() {
    let _ = env_logger::builder().is_test(true).try_init();
}

/// MPEG-1 Layer III, 128 kbps, 44.1 kHz, stereo, no padding
const MPEG_FRAME_HEADER: [u8; 4] = [0xFF, 0xFB, 0x90, 0x00];

const MPEG_FRAME_LEN: usize = 417;

pub fn mp3_bytes() -> Vec<u8> {
    let mut frame = vec![0; MPEG_FRAME_LEN];
    frame[..4].copy_from_slice(&MPEG_FRAME_HEADER);
    frame.repeat(8)
}

pub fn wav_bytes() -> Vec<u8> {
    let samples = [0_u8; 64];
    let mut fmt = Vec::new();
    fmt.extend_from_slice(&1_u16.to_le_bytes()); // PCM
    fmt.extend_from_slice(&2_u16.to_le_bytes());
    fmt.extend_from_slice(&44_100_u32.to_le_bytes());
    fmt.extend_from_slice(&176_400_u32.to_le_bytes());
    fmt.extend_from_slice(&4_u16.to_le_bytes());
    fmt.extend_from_slice(&16_u16.to_le_bytes());
    let mut body = b"WAVE".to_vec();
    body.extend_from_slice(b"fmt ");
    body.extend_from_slice(&(fmt.len() as u32).to_le_bytes());
    body.extend_from_slice(&fmt);
    body.extend_from_slice(b"data");
    body.extend_from_slice(&(samples.len() as u32).to_le_bytes());
    body.extend_from_slice(&samples);
    let mut bytes = b"RIFF".to_vec();
    bytes.extend_from_slice(&(body.len() as u32).to_le_bytes());
    bytes.extend_from_slice(&body);
    bytes
}

pub fn flac_bytes() -> Vec<u8> {
    let mut bytes = b"fLaC".to_vec();
    // Last metadata block: STREAMINFO with 34 bytes
    bytes.extend_from_slice(&[0x80, 0x00, 0x00, 0x22]);
    // Block sizes
    bytes.extend_from_slice(&[0x10, 0x00, 0x10, 0x00]);
    // Frame sizes
    bytes.extend_from_slice(&[0; 6]);
    // 44.1 kHz, 2 channels, 16 bits per sample, unknown number of samples
    bytes.extend_from_slice(&[0x0A, 0xC4, 0x42, 0xF0, 0x00, 0x00, 0x00, 0x00]);
    // MD5
    bytes.extend_from_slice(&[0; 16]);
    // Audio frames
    bytes.extend_from_slice(&[0xFF, 0xF8, 0x69, 0x08, 0x00, 0x00, 0x00, 0x00]);
    bytes
}

pub fn aiff_bytes() -> Vec<u8> {
    let mut comm = Vec::new();
    comm.extend_from_slice(&2_u16.to_be_bytes());
    comm.extend_from_slice(&16_u32.to_be_bytes());
    comm.extend_from_slice(&16_u16.to_be_bytes());
    // 44.1 kHz as 80-bit extended precision
    comm.extend_from_slice(&[0x40, 0x0E, 0xAC, 0x44, 0, 0, 0, 0, 0, 0]);
    let mut ssnd = Vec::new();
    ssnd.extend_from_slice(&0_u32.to_be_bytes());
    ssnd.extend_from_slice(&0_u32.to_be_bytes());
    ssnd.extend_from_slice(&[0; 64]);
    let mut body = b"AIFF".to_vec();
    for (id, data) in [(b"COMM", comm), (b"SSND", ssnd)] {
        body.extend_from_slice(id);
        body.extend_from_slice(&(data.len() as u32).to_be_bytes());
        body.extend_from_slice(&data);
    }
    let mut bytes = b"FORM".to_vec();
    bytes.extend_from_slice(&(body.len() as u32).to_be_bytes());
    bytes.extend_from_slice(&body);
    bytes
}

/// An ASF header with an empty File Properties Object followed by
/// a few bytes that stand in for the Data Object.
pub fn asf_bytes() -> Vec<u8> {
    const HEADER_OBJECT_GUID: [u8; 16] = [
        0x30, 0x26, 0xB2, 0x75, 0x8E, 0x66, 0xCF, 0x11, 0xA6, 0xD9, 0x00, 0xAA, 0x00, 0x62, 0xCE,
        0x6C,
    ];
    const FILE_PROPERTIES_OBJECT_GUID: [u8; 16] = [
        0xA1, 0xDC, 0xAB, 0x8C, 0x47, 0xA9, 0xCF, 0x11, 0x8E, 0xE4, 0x00, 0xC0, 0x0C, 0x20, 0x53,
        0x65,
    ];
    let mut file_properties = FILE_PROPERTIES_OBJECT_GUID.to_vec();
    file_properties.extend_from_slice(&(24_u64 + 80).to_le_bytes());
    file_properties.extend_from_slice(&[0; 80]);
    let mut bytes = HEADER_OBJECT_GUID.to_vec();
    bytes.extend_from_slice(&((30 + file_properties.len()) as u64).to_le_bytes());
    bytes.extend_from_slice(&1_u32.to_le_bytes());
    bytes.extend_from_slice(&[1, 2]);
    bytes.extend_from_slice(&file_properties);
    bytes.extend_from_slice(&[0x55; 32]);
    bytes
}

fn mp4_atom(ident: &[u8; 4], data: &[u8]) -> Vec<u8> {
    let mut atom = ((8 + data.len()) as u32).to_be_bytes().to_vec();
    atom.extend_from_slice(ident);
    atom.extend_from_slice(data);
    atom
}

/// `ftyp`, a `moov` with only a movie header, and some `mdat` bytes.
pub fn mp4_bytes() -> Vec<u8> {
    let mut mvhd = vec![0; 100];
    // Time scale
    mvhd[12..16].copy_from_slice(&1000_u32.to_be_bytes());
    // Rate 1.0
    mvhd[20..24].copy_from_slice(&0x0001_0000_u32.to_be_bytes());
    // Volume 1.0
    mvhd[24..26].copy_from_slice(&0x0100_u16.to_be_bytes());
    // Unity matrix
    mvhd[36..40].copy_from_slice(&0x0001_0000_u32.to_be_bytes());
    mvhd[52..56].copy_from_slice(&0x0001_0000_u32.to_be_bytes());
    mvhd[68..72].copy_from_slice(&0x4000_0000_u32.to_be_bytes());
    // Next track ID
    mvhd[96..100].copy_from_slice(&1_u32.to_be_bytes());
    let mut bytes = mp4_atom(b"ftyp", b"M4A \0\0\0\0M4A isom");
    bytes.extend(mp4_atom(b"moov", &mp4_atom(b"mvhd", &mvhd)));
    bytes.extend(mp4_atom(b"mdat", &[0; 32]));
    bytes
}

const OGG_STREAM_SERIAL: u32 = 0x7461_6766;

const OGG_BEGIN_OF_STREAM: u8 = 0x02;

const OGG_END_OF_STREAM: u8 = 0x04;

fn ogg_crc32(data: &[u8]) -> u32 {
    let mut crc = 0_u32;
    for byte in data {
        crc ^= u32::from(*byte) << 24;
        for _ in 0..8 {
            crc = if crc & 0x8000_0000 == 0 {
                crc << 1
            } else {
                (crc << 1) ^ 0x04C1_1DB7
            };
        }
    }
    crc
}

fn ogg_page(
    header_type: u8,
    granule_position: u64,
    sequence: u32,
    packets: &[&[u8]],
) -> Vec<u8> {
    let mut lacing = Vec::new();
    for packet in packets {
        let mut remaining = packet.len();
        loop {
            let segment_len = remaining.min(255);
            lacing.push(segment_len as u8);
            remaining -= segment_len;
            if segment_len < 255 {
                break;
            }
        }
    }
    let mut page = b"OggS".to_vec();
    page.push(0);
    page.push(header_type);
    page.extend_from_slice(&granule_position.to_le_bytes());
    page.extend_from_slice(&OGG_STREAM_SERIAL.to_le_bytes());
    page.extend_from_slice(&sequence.to_le_bytes());
    // Checksum
    page.extend_from_slice(&[0; 4]);
    page.push(lacing.len() as u8);
    page.extend_from_slice(&lacing);
    for packet in packets {
        page.extend_from_slice(packet);
    }
    let crc = ogg_crc32(&page);
    page[22..26].copy_from_slice(&crc.to_le_bytes());
    page
}

const VENDOR: &[u8] = b"tagforge";

fn comment_packet(signature: &[u8], framing_bit: bool) -> Vec<u8> {
    let mut packet = signature.to_vec();
    packet.extend_from_slice(&(VENDOR.len() as u32).to_le_bytes());
    packet.extend_from_slice(VENDOR);
    // No comments
    packet.extend_from_slice(&0_u32.to_le_bytes());
    if framing_bit {
        packet.push(1);
    }
    packet
}

/// Identification, comment and setup header followed by a single audio page.
pub fn ogg_vorbis_bytes() -> Vec<u8> {
    let mut identification = b"\x01vorbis".to_vec();
    identification.extend_from_slice(&0_u32.to_le_bytes());
    identification.push(2);
    identification.extend_from_slice(&44_100_u32.to_le_bytes());
    identification.extend_from_slice(&0_i32.to_le_bytes());
    identification.extend_from_slice(&128_000_i32.to_le_bytes());
    identification.extend_from_slice(&0_i32.to_le_bytes());
    // Block sizes 256 and 2048
    identification.push(0xB8);
    identification.push(1);
    let comment = comment_packet(b"\x03vorbis", true);
    let mut setup = b"\x05vorbis".to_vec();
    setup.extend_from_slice(&[0; 16]);
    let mut bytes = ogg_page(OGG_BEGIN_OF_STREAM, 0, 0, &[&identification]);
    bytes.extend(ogg_page(0, 0, 1, &[&comment, &setup]));
    bytes.extend(ogg_page(OGG_END_OF_STREAM, 1024, 2, &[&[0; 16]]));
    bytes
}

/// Identification and comment header followed by a single audio page.
pub fn opus_bytes() -> Vec<u8> {
    let mut identification = b"OpusHead".to_vec();
    identification.push(1);
    identification.push(2);
    // Pre-skip
    identification.extend_from_slice(&312_u16.to_le_bytes());
    identification.extend_from_slice(&48_000_u32.to_le_bytes());
    // Output gain
    identification.extend_from_slice(&0_i16.to_le_bytes());
    // Channel mapping family
    identification.push(0);
    let comment = comment_packet(b"OpusTags", false);
    let mut bytes = ogg_page(OGG_BEGIN_OF_STREAM, 0, 0, &[&identification]);
    bytes.extend(ogg_page(0, 0, 1, &[&comment]));
    bytes.extend(ogg_page(OGG_END_OF_STREAM, 960, 2, &[&[0xFC, 0xFF, 0xFE]]));
    bytes
}

pub fn png_bytes(width: u32, height: u32) -> Vec<u8> {
    let image = DynamicImage::ImageRgb8(RgbImage::from_pixel(
        width,
        height,
        image::Rgb([200, 100, 50]),
    ));
    let mut bytes = Cursor::new(Vec::new());
    image.write_to(&mut bytes, ImageFormat::Png).unwrap();
    bytes.into_inner()
}

pub fn write_file(dir: &TempDir, file_name: &str, bytes: &[u8]) -> PathBuf {
    let path = dir.path().join(file_name);
    std::fs::write(&path, bytes).unwrap();
    path
}

/// File names in the directory, sorted.
pub fn dir_entries(dir: &Path) -> Vec<String> {
    let mut entries = std::fs::read_dir(dir)
        .unwrap()
        .map(|entry| entry.unwrap().file_name().to_string_lossy().into_owned())
        .collect::<Vec<_>>();
    entries.sort();
    entries
}
