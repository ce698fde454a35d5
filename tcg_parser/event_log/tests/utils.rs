/*
 * Copyright (c) Huawei Technologies Co., Ltd. 2025. All rights reserved.
 * Global Trust Authority is licensed under the Mulan PSL v2.
 * You can use this software according to the terms and conditions of the Mulan PSL v2.
 * You may obtain a copy of Mulan PSL v2 at:
 *     http://license.coscl.org.cn/MulanPSL2
 * THIS SOFTWARE IS PROVIDED ON AN "AS IS" BASIS, WITHOUT WARRANTIES OF ANY KIND, EITHER EXPRESS OR
 * IMPLIED, INCLUDING BUT NOT LIMITED TO NON-INFRINGEMENT, MERCHANTABILITY OR FIT FOR A PARTICULAR
 * PURPOSE.
 * See the Mulan PSL v2 for more details.
 */

#![allow(dead_code)]

use std::io::Write;
use tempfile::NamedTempFile;

pub const EV_NO_ACTION: u32 = 0x00000003;
pub const EV_SEPARATOR: u32 = 0x00000004;
pub const EV_POST_CODE: u32 = 0x00000001;
pub const EV_EFI_BOOT_SERVICES_APPLICATION: u32 = 0x80000003;
pub const EV_EFI_VARIABLE_BOOT: u32 = 0x80000002;

pub const TPM_ALG_SHA1: u16 = 0x0004;
pub const TPM_ALG_SHA256: u16 = 0x000B;

pub const SPEC_ID_SIGNATURE: &[u8; 16] = b"Spec ID Event03\0";

/// Build a spec-announcement payload
///
/// # Parameters
/// * `signature` - 16-byte signature
/// * `algorithms` - `(algorithm_id, digest_size)` pairs in declaration order
/// * `vendor_info` - Vendor bytes, at most 255
pub fn spec_id_payload_with_signature(signature: &[u8; 16], algorithms: &[(u16, u16)], vendor_info: &[u8]) -> Vec<u8> {
    let mut data = signature.to_vec();
    data.extend_from_slice(&0u32.to_le_bytes());   // platform class
    data.extend_from_slice(&[0, 2, 0, 2]);         // version minor, major, errata, uintn size
    data.extend_from_slice(&(algorithms.len() as u32).to_le_bytes());
    for (algorithm_id, digest_size) in algorithms {
        data.extend_from_slice(&algorithm_id.to_le_bytes());
        data.extend_from_slice(&digest_size.to_le_bytes());
    }
    data.push(vendor_info.len() as u8);
    data.extend_from_slice(vendor_info);
    data
}

pub fn spec_id_payload(algorithms: &[(u16, u16)]) -> Vec<u8> {
    spec_id_payload_with_signature(SPEC_ID_SIGNATURE, algorithms, &[])
}

/// Encode a legacy-header record
pub fn legacy_record(pcr_index: u32, event_type: u32, digest: [u8; 20], payload: &[u8]) -> Vec<u8> {
    let mut data = Vec::new();
    data.extend_from_slice(&pcr_index.to_le_bytes());
    data.extend_from_slice(&event_type.to_le_bytes());
    data.extend_from_slice(&digest);
    data.extend_from_slice(&(payload.len() as u32).to_le_bytes());
    data.extend_from_slice(payload);
    data
}

/// Valid bootstrap record announcing `algorithms`
pub fn bootstrap_record(algorithms: &[(u16, u16)]) -> Vec<u8> {
    legacy_record(0, EV_NO_ACTION, [0u8; 20], &spec_id_payload(algorithms))
}

/// Encode a crypto-agile record
///
/// # Parameters
/// * `digests` - `(algorithm_id, digest bytes)` in stream order
pub fn agile_record(pcr_index: u32, event_type: u32, digests: &[(u16, Vec<u8>)], payload: &[u8]) -> Vec<u8> {
    let mut data = Vec::new();
    data.extend_from_slice(&pcr_index.to_le_bytes());
    data.extend_from_slice(&event_type.to_le_bytes());
    data.extend_from_slice(&(digests.len() as u32).to_le_bytes());
    for (algorithm_id, digest) in digests {
        data.extend_from_slice(&algorithm_id.to_le_bytes());
        data.extend_from_slice(digest);
    }
    data.extend_from_slice(&(payload.len() as u32).to_le_bytes());
    data.extend_from_slice(payload);
    data
}

/// UTF-16LE with a NUL terminator
pub fn utf16z(text: &str) -> Vec<u8> {
    text.encode_utf16()
        .chain(std::iter::once(0))
        .flat_map(|unit| unit.to_le_bytes())
        .collect()
}

/// Device path node with a header computed from `body`
pub fn node(node_type: u8, sub_type: u8, body: &[u8]) -> Vec<u8> {
    let mut data = vec![node_type, sub_type];
    data.extend_from_slice(&((body.len() + 4) as u16).to_le_bytes());
    data.extend_from_slice(body);
    data
}

pub fn end_node() -> Vec<u8> {
    vec![0x7F, 0xFF, 0x04, 0x00]
}

/// Image-load payload wrapping `device_path`
pub fn image_load_payload(device_path: &[u8]) -> Vec<u8> {
    let mut data = Vec::new();
    data.extend_from_slice(&0x7000_0000u64.to_le_bytes());
    data.extend_from_slice(&0x2000u64.to_le_bytes());
    data.extend_from_slice(&0u64.to_le_bytes());
    data.extend_from_slice(&(device_path.len() as u64).to_le_bytes());
    data.extend_from_slice(device_path);
    data
}

/// Write `data` to a temporary file, like a measurement log exported from sysfs
pub fn write_log_file(data: &[u8]) -> NamedTempFile {
    let mut file = NamedTempFile::new().expect("create temp file");
    file.write_all(data).expect("write temp file");
    file.flush().expect("flush temp file");
    file
}
