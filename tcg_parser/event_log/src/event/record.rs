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

//! Record Reader
//!
//! One entry point per header shape. Both read the header, isolate the payload
//! into its own buffer of exactly the declared size, then hand that buffer to
//! the payload decoder. A failed read leaves no partially decoded record.

use crate::byte_reader::ByteReader;
use crate::digest::DigestRegistry;
use crate::error::EventLogError;
use crate::event::model::{
    EventRecordAgile, EventRecordLegacy, TpmDigestEntry,
    END_OF_LOG_MARKER, LEGACY_DIGEST_SIZE,
};
use crate::event::parser::{decode_agile_payload, decode_legacy_payload};

/// Wire size of `pcr_index` + `event_type`
const RECORD_HEADER_PREFIX_SIZE: usize = 8;

/// Read the isolated payload buffer: a u32 size followed by that many bytes
fn read_payload_buffer(reader: &mut ByteReader) -> Result<Vec<u8>, EventLogError> {
    let event_size: u32 = reader.read_u32()?;
    reader.read_bytes(event_size as usize)
}

/// Read one record with the legacy (TCG 1.2) header
///
/// # Errors
/// * `EventLogError::UnexpectedEnd` - If any header field or the payload runs past the data
pub fn read_legacy(reader: &mut ByteReader) -> Result<EventRecordLegacy, EventLogError> {
    let pcr_index: u32 = reader.read_u32()?;
    let event_type: u32 = reader.read_u32()?;
    let digest: [u8; LEGACY_DIGEST_SIZE] = reader.read_array()?;
    let event_data: Vec<u8> = read_payload_buffer(reader)?;

    let payload = decode_legacy_payload(pcr_index, event_type, &digest, &event_data);
    Ok(EventRecordLegacy { pcr_index, event_type, digest, payload })
}

/// Read the digest list of a crypto-agile record
///
/// Digests are kept in stream order. Each length comes from `registry`.
///
/// # Errors
/// * `EventLogError::UnknownAlgorithm` - If an algorithm id is absent from the registry
/// * `EventLogError::UnexpectedEnd` - If the count or any digest runs past the data
pub fn read_digests(reader: &mut ByteReader, registry: &DigestRegistry) -> Result<Vec<TpmDigestEntry>, EventLogError> {
    let digest_count: u32 = reader.read_u32()?;

    let mut digests: Vec<TpmDigestEntry> = Vec::new();
    for _ in 0..digest_count {
        let algorithm_id: u16 = reader.read_u16()?;
        let digest_size = registry.size_of(algorithm_id)
            .ok_or(EventLogError::UnknownAlgorithm(algorithm_id))?;
        let digest: Vec<u8> = reader.read_bytes(digest_size as usize)?;
        digests.push(TpmDigestEntry::new(algorithm_id, digest));
    }
    Ok(digests)
}

/// Read one record with the crypto-agile header
///
/// # Errors
/// * `EventLogError::UnknownAlgorithm` - If a digest uses an algorithm the registry does not list
/// * `EventLogError::UnexpectedEnd` - If any field, digest or the payload runs past the data
pub fn read_agile(reader: &mut ByteReader, registry: &DigestRegistry) -> Result<EventRecordAgile, EventLogError> {
    let pcr_index: u32 = reader.read_u32()?;
    let event_type: u32 = reader.read_u32()?;
    let digests: Vec<TpmDigestEntry> = read_digests(reader, registry)?;
    let event_data: Vec<u8> = read_payload_buffer(reader)?;

    let payload = decode_agile_payload(event_type, &event_data);
    Ok(EventRecordAgile { pcr_index, event_type, digests, payload })
}

/// True when the next record header is the erased-flash end-of-log marker
///
/// Looks at `pcr_index` and `event_type` only and does not move the reader.
pub fn at_end_marker(reader: &ByteReader) -> bool {
    match reader.peek_bytes(RECORD_HEADER_PREFIX_SIZE) {
        Some(prefix) => {
            let pcr_index = u32::from_le_bytes([prefix[0], prefix[1], prefix[2], prefix[3]]);
            let event_type = u32::from_le_bytes([prefix[4], prefix[5], prefix[6], prefix[7]]);
            pcr_index == END_OF_LOG_MARKER && event_type == END_OF_LOG_MARKER
        },
        None => false,
    }
}
