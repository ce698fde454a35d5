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

//! Event Parsing Module
//!
//! Turns an isolated payload buffer into a `Payload` variant. The legacy header
//! has a single rule (bootstrap or raw). Crypto-agile records dispatch on the
//! event type through a fixed table; every routine failure falls back to
//! `Payload::Raw` so one undecodable payload never stops the log traversal.
//!
//! The module defines `ByteParseable` implementations for each fixed payload
//! layout, all decoded field by field in little-endian order.

use log::debug;
use std::mem::size_of;

use crate::byte_reader::{ByteParseable, ByteReader};
use crate::device_path::parser::parse_device_path;
use crate::device_path::model::DevicePath;
use crate::digest::DigestAlgorithmEntry;
use crate::error::EventLogError;
use crate::event::model::{
    EventType, Payload,
    LEGACY_DIGEST_SIZE, NO_ACTION_EVENT_SIZE, UEFI_PARTITION_NAME_SIZE,
    SPEC_ID_EVENT_SIGNATURE_03, STARTUP_LOCALITY_SIGNATURE,
    EfiSpecIdEvent, StartupLocalityEvent,
    UefiImageLoadEvent, UefiVariableDataEvent,
    UefiPlatformFirmwareBlobEvent, UefiPlatformFirmwareBlobEvent2, UefiFirmwareBlobEvent,
    PCClientTaggedEvent,
    UefiPartitionHeader, UefiPartitionEntry, UefiGptDataEvent,
};

/// Wire size of `UefiPlatformFirmwareBlobEvent` (base + length)
const FIRMWARE_BLOB_SIZE: usize = size_of::<u64>() * 2;
/// Wire size of one `(algorithm_id, digest_size)` pair
const ALGORITHM_SIZE_ENTRY_SIZE: u64 = 4;
/// Smallest partition entry a GPT header may declare
const MIN_PARTITION_ENTRY_SIZE: u32 = 128;
const GPT_SIGNATURE_SIZE: usize = 8;

/// Printable ASCII, space through tilde
fn is_printable(byte: u8) -> bool {
    (0x20..=0x7E).contains(&byte)
}

impl ByteParseable for EfiSpecIdEvent {
    /// Parses the spec-announcement payload, signature included
    ///
    /// The signature is not validated here; the log driver checks it.
    fn parse_from(parser: &mut ByteReader) -> Result<Self, EventLogError> {
        let signature: [u8; NO_ACTION_EVENT_SIZE] = parser.read_array()?;
        let platform_class: u32 = parser.read_u32()?;
        let spec_version_minor: u8 = parser.read_u8()?;
        let spec_version_major: u8 = parser.read_u8()?;
        let spec_errata: u8 = parser.read_u8()?;
        let uintn_size: u8 = parser.read_u8()?;

        let algorithm_count: u32 = parser.read_u32()?;
        if u64::from(algorithm_count) * ALGORITHM_SIZE_ENTRY_SIZE > parser.remaining() {
            return Err(EventLogError::InputError(format!(
                "Algorithm count {} exceeds remaining data {}", algorithm_count, parser.remaining()
            )));
        }

        let mut digest_algorithms: Vec<DigestAlgorithmEntry> = Vec::with_capacity(algorithm_count as usize);
        for _ in 0..algorithm_count {
            let algorithm_id: u16 = parser.read_u16()?;
            let digest_size: u16 = parser.read_u16()?;
            digest_algorithms.push(DigestAlgorithmEntry::new(algorithm_id, digest_size));
        }

        let vendor_info_size: u8 = parser.read_u8()?;
        let vendor_info: Vec<u8> = parser.read_bytes(vendor_info_size as usize)?;

        Ok(EfiSpecIdEvent {
            signature,
            platform_class,
            spec_version_minor,
            spec_version_major,
            spec_errata,
            uintn_size,
            digest_algorithms,
            vendor_info,
        })
    }
}

impl ByteParseable for StartupLocalityEvent {
    /// Reads the locality byte that follows the 16-byte signature
    fn parse_from(parser: &mut ByteReader) -> Result<Self, EventLogError> {
        parser.skip(NO_ACTION_EVENT_SIZE as u64)?;
        let locality: u8 = parser.read_u8()?;
        Ok(StartupLocalityEvent { locality })
    }
}

impl ByteParseable for UefiPlatformFirmwareBlobEvent {
    fn parse_from(parser: &mut ByteReader) -> Result<Self, EventLogError> {
        let blob_base: u64 = parser.read_u64()?;
        let blob_length: u64 = parser.read_u64()?;
        Ok(UefiPlatformFirmwareBlobEvent { blob_base, blob_length })
    }
}

impl ByteParseable for UefiPlatformFirmwareBlobEvent2 {
    /// Compared to version 1, adds a length-prefixed description
    fn parse_from(parser: &mut ByteReader) -> Result<Self, EventLogError> {
        let blob_description_size: u8 = parser.read_u8()?;
        let blob_description: Vec<u8> = parser.read_bytes(blob_description_size as usize)?;
        let blob_base: u64 = parser.read_u64()?;
        let blob_length: u64 = parser.read_u64()?;
        Ok(UefiPlatformFirmwareBlobEvent2 {
            blob_description: String::from_utf8_lossy(&blob_description).to_string(),
            blob_base,
            blob_length,
        })
    }
}

impl ByteParseable for UefiFirmwareBlobEvent {
    /// Parses a payload that is either text or one of the two blob shapes
    ///
    /// A buffer of printable bytes only is the string itself. Otherwise a buffer of
    /// exactly `FIRMWARE_BLOB_SIZE` bytes is a version 1 blob, and anything else must
    /// decode as a version 2 blob. Bytes after the version 2 fields are ignored.
    ///
    /// # Errors
    /// * `EventLogError::InputError` - If the bytes match neither blob shape
    fn parse_from(parser: &mut ByteReader) -> Result<Self, EventLogError> {
        let data: Vec<u8> = parser.read_remaining();

        if data.iter().all(|&byte| is_printable(byte)) {
            return Ok(UefiFirmwareBlobEvent::UefiPlatformFirmwareString(
                String::from_utf8_lossy(&data).to_string()
            ));
        }

        let mut blob_reader = ByteReader::new(&data);
        if data.len() == FIRMWARE_BLOB_SIZE {
            let event = UefiPlatformFirmwareBlobEvent::parse_from(&mut blob_reader)?;
            return Ok(UefiFirmwareBlobEvent::UefiPlatformFirmwareBlob(event));
        }

        let event = UefiPlatformFirmwareBlobEvent2::parse_from(&mut blob_reader)?;
        Ok(UefiFirmwareBlobEvent::UefiPlatformFirmwareBlob2(event))
    }
}

impl ByteParseable for PCClientTaggedEvent {
    fn parse_from(parser: &mut ByteReader) -> Result<Self, EventLogError> {
        let tagged_event_id: u32 = parser.read_u32()?;
        let tagged_event_data_size: u32 = parser.read_u32()?;
        let tagged_event_data: Vec<u8> = parser.read_bytes(tagged_event_data_size as usize)?;
        Ok(PCClientTaggedEvent { tagged_event_id, tagged_event_data })
    }
}

impl ByteParseable for UefiVariableDataEvent {
    /// GUID, name length in UTF-16 units, data length in bytes, name, data
    fn parse_from(parser: &mut ByteReader) -> Result<Self, EventLogError> {
        let variable_name = parser.read_guid()?;
        let unicode_name_length: u64 = parser.read_u64()?;
        let variable_data_length: u64 = parser.read_u64()?;

        let name_units = usize::try_from(unicode_name_length)
            .map_err(|_| EventLogError::InputError(format!("Invalid name length: {}", unicode_name_length)))?;
        let unicode_name: String = parser.read_utf16_units(name_units)?;

        let data_length = usize::try_from(variable_data_length)
            .map_err(|_| EventLogError::InputError(format!("Invalid data length: {}", variable_data_length)))?;
        let variable_data: Vec<u8> = parser.read_bytes(data_length)?;

        Ok(UefiVariableDataEvent { variable_name, unicode_name, variable_data })
    }
}

impl ByteParseable for UefiImageLoadEvent {
    /// Parses image location, size and link address, then the device path
    ///
    /// The declared device path length only gates decoding; the path itself is
    /// read from every remaining payload byte.
    fn parse_from(parser: &mut ByteReader) -> Result<Self, EventLogError> {
        let image_location_in_memory: u64 = parser.read_u64()?;
        let image_length_in_memory: u64 = parser.read_u64()?;
        let image_link_time_address: u64 = parser.read_u64()?;
        let length_of_device_path: u64 = parser.read_u64()?;

        let device_path = if length_of_device_path != 0 {
            parse_device_path(parser)
        } else {
            DevicePath::default()
        };

        Ok(Self {
            image_location_in_memory,
            image_length_in_memory,
            image_link_time_address,
            length_of_device_path,
            device_path,
        })
    }
}

impl ByteParseable for UefiPartitionHeader {
    fn parse_from(parser: &mut ByteReader) -> Result<Self, EventLogError> {
        let signature: Vec<u8> = parser.read_bytes(GPT_SIGNATURE_SIZE)?;
        let revision: u32 = parser.read_u32()?;
        let header_size: u32 = parser.read_u32()?;
        let header_crc32: u32 = parser.read_u32()?;
        let reserved: u32 = parser.read_u32()?;
        let my_lba: u64 = parser.read_u64()?;
        let alternate_lba: u64 = parser.read_u64()?;
        let first_usable_lba: u64 = parser.read_u64()?;
        let last_usable_lba: u64 = parser.read_u64()?;
        let disk_guid = parser.read_guid()?;
        let partition_entries_lba: u64 = parser.read_u64()?;
        let number_of_partition_entries: u32 = parser.read_u32()?;
        let size_of_partition_entry: u32 = parser.read_u32()?;
        let partition_entry_array_crc32: u32 = parser.read_u32()?;
        Ok(Self {
            signature: String::from_utf8_lossy(&signature).trim_end_matches('\0').to_string(),
            revision,
            header_size,
            header_crc32,
            reserved,
            my_lba,
            alternate_lba,
            first_usable_lba,
            last_usable_lba,
            disk_guid,
            partition_entries_lba,
            number_of_partition_entries,
            size_of_partition_entry,
            partition_entry_array_crc32,
        })
    }
}

impl ByteParseable for UefiPartitionEntry {
    fn parse_from(parser: &mut ByteReader) -> Result<Self, EventLogError> {
        let partition_type_guid = parser.read_guid()?;
        let unique_partition_guid = parser.read_guid()?;
        let starting_lba: u64 = parser.read_u64()?;
        let ending_lba: u64 = parser.read_u64()?;
        let attributes: u64 = parser.read_u64()?;
        let partition_name: String = parser.read_utf16_units(UEFI_PARTITION_NAME_SIZE)?;
        Ok(Self {
            partition_type_guid,
            unique_partition_guid,
            starting_lba,
            ending_lba,
            attributes,
            partition_name,
        })
    }
}

impl ByteParseable for UefiGptDataEvent {
    /// Partition header, a u64 entry count, then entries of the size the header declares
    fn parse_from(parser: &mut ByteReader) -> Result<Self, EventLogError> {
        let uefi_partition_header = UefiPartitionHeader::parse_from(parser)?;
        let entry_size = uefi_partition_header.size_of_partition_entry;
        if entry_size < MIN_PARTITION_ENTRY_SIZE {
            return Err(EventLogError::InputError(format!("Invalid partition entry size: {}", entry_size)));
        }

        let number_of_partitions: u64 = parser.read_u64()?;
        if number_of_partitions.saturating_mul(u64::from(entry_size)) > parser.remaining() {
            return Err(EventLogError::InputError(format!(
                "{} partitions of {} bytes exceed remaining data {}",
                number_of_partitions, entry_size, parser.remaining()
            )));
        }

        let mut partitions: Vec<UefiPartitionEntry> = Vec::with_capacity(number_of_partitions as usize);
        for _ in 0..number_of_partitions {
            let mut entry = parser.sub_reader(entry_size as usize)?;
            partitions.push(UefiPartitionEntry::parse_from(&mut entry)?);
        }
        Ok(Self { uefi_partition_header, partitions })
    }
}

/// `EV_NO_ACTION` inside the stream: startup locality, an informational spec
/// announcement, or opaque bytes for any other signature
fn parse_no_action(parser: &mut ByteReader, data: &[u8]) -> Result<Payload, EventLogError> {
    match data.get(..NO_ACTION_EVENT_SIZE) {
        Some(signature) if signature == SPEC_ID_EVENT_SIGNATURE_03 => {
            EfiSpecIdEvent::parse_from(parser).map(Payload::SpecId)
        },
        Some(signature) if signature == STARTUP_LOCALITY_SIGNATURE => {
            StartupLocalityEvent::parse_from(parser).map(Payload::StartupLocality)
        },
        _ => Ok(Payload::Raw(data.to_vec())),
    }
}

/// Generic payload parsing function
///
/// # Type Parameters
/// * `T` - Payload shape to be parsed, must implement ByteParseable
/// * `F` - Function converting T into a `Payload` variant
///
/// # Errors
/// * `EventLogError::InputError` - If the bytes cannot be parsed as `T`
pub fn parse_typed_payload<T, F>(
    parser: &mut ByteReader,
    wrapper: F,
    payload_name: &str
) -> Result<Payload, EventLogError>
where
    T: ByteParseable,
    F: FnOnce(T) -> Payload
{
    T::parse_from(parser)
        .map(wrapper)
        .map_err(|e| EventLogError::InputError(
            format!("Failed to parse {}: {}", payload_name, e)
        ))
}

/// True when a legacy header marks the spec-announcement record
///
/// PCR 0, `EV_NO_ACTION` and an all-zero digest must all hold.
pub fn is_bootstrap_header(pcr_index: u32, event_type: u32, digest: &[u8; LEGACY_DIGEST_SIZE]) -> bool {
    pcr_index == 0
        && event_type == EventType::EvNoAction as u32
        && digest.iter().all(|&byte| byte == 0)
}

/// Decode the payload of a legacy-header record
///
/// Only the bootstrap record is interpreted. Any other legacy record, and a
/// bootstrap payload that cannot be decoded, keeps its bytes as `Payload::Raw`.
pub fn decode_legacy_payload(
    pcr_index: u32,
    event_type: u32,
    digest: &[u8; LEGACY_DIGEST_SIZE],
    data: &[u8],
) -> Payload {
    if !is_bootstrap_header(pcr_index, event_type, digest) {
        return Payload::Raw(data.to_vec());
    }

    let mut parser = ByteReader::new(data);
    match EfiSpecIdEvent::parse_from(&mut parser) {
        Ok(event) => Payload::SpecId(event),
        Err(e) => {
            debug!("Bootstrap payload kept raw: {}", e);
            Payload::Raw(data.to_vec())
        },
    }
}

/// Run the routine registered for `event_type`
///
/// Types without a routine decode to `Payload::Raw`.
fn parse_payload_data(event_type: EventType, data: &[u8]) -> Result<Payload, EventLogError> {
    let mut parser = ByteReader::new(data);
    match event_type {
        EventType::EvSCrtmVersion | EventType::EvIpl => {
            parser.read_ucs2_string().map(Payload::Text)
        },
        EventType::EvPostCode | EventType::EvPostCode2 |
        EventType::EvSCrtmContents | EventType::EvEfiHcrtmEvent => {
            parse_typed_payload(&mut parser, Payload::StringOrBlob, "string or blob")
        },
        EventType::EvEfiPlatformFirmwareBlob => {
            parse_typed_payload(&mut parser, Payload::FirmwareBlob, "firmware blob")
        },
        EventType::EvEfiPlatformFirmwareBlob2 => {
            parse_typed_payload(&mut parser, Payload::FirmwareBlob2, "firmware blob2")
        },
        EventType::EvEfiVariableDriverConfig | EventType::EvEfiVariableBoot |
        EventType::EvEfiVariableBoot2 | EventType::EvEfiVariableAuthority => {
            parse_typed_payload(&mut parser, Payload::Variable, "variable data")
        },
        EventType::EvEfiBootServicesApplication | EventType::EvEfiBootServicesDriver |
        EventType::EvEfiRuntimeServicesDriver => {
            parse_typed_payload(&mut parser, Payload::ImageLoad, "image load")
        },
        EventType::EvEfiGptEvent | EventType::EvEfiGptEvent2 => {
            parse_typed_payload(&mut parser, Payload::Gpt, "gpt event")
        },
        EventType::EvEventTag => {
            parse_typed_payload(&mut parser, Payload::EventTag, "tagged event")
        },
        EventType::EvEfiAction | EventType::EvAction => {
            Ok(Payload::Action(String::from_utf8_lossy(data).to_string()))
        },
        EventType::EvSeparator => Ok(Payload::Separator),
        EventType::EvNoAction => parse_no_action(&mut parser, data),
        _ => Ok(Payload::Raw(data.to_vec())),
    }
}

/// Decode the payload of a crypto-agile record
///
/// Never fails: a routine error is logged and the isolated bytes are kept as
/// `Payload::Raw`.
pub fn decode_agile_payload(event_type: u32, data: &[u8]) -> Payload {
    let Some(known_type) = EventType::from_u32(event_type) else {
        return Payload::Raw(data.to_vec());
    };

    match parse_payload_data(known_type, data) {
        Ok(payload) => payload,
        Err(e) => {
            debug!("{} payload of {} bytes kept raw: {}", known_type, data.len(), e);
            Payload::Raw(data.to_vec())
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn utf16_bytes(text: &str) -> Vec<u8> {
        text.encode_utf16().flat_map(|unit| unit.to_le_bytes()).collect()
    }

    #[test]
    fn test_is_printable_range() {
        assert!(is_printable(b' '));
        assert!(is_printable(b'~'));
        assert!(!is_printable(0x1F));
        assert!(!is_printable(0x7F));
    }

    #[test]
    fn test_utf16_string_stops_at_nul() {
        let mut data = utf16_bytes("1.0");
        data.extend_from_slice(&[0, 0, b'x', 0]);
        let payload = decode_agile_payload(EventType::EvSCrtmVersion as u32, &data);
        assert_eq!(payload, Payload::Text("1.0".to_string()));
    }

    #[test]
    fn test_variable_reads_exact_name_units() {
        let mut data = vec![0u8; 16];
        data.extend_from_slice(&2u64.to_le_bytes());
        data.extend_from_slice(&3u64.to_le_bytes());
        data.extend_from_slice(&utf16_bytes("PK"));
        data.extend_from_slice(&[1, 2, 3]);
        match decode_agile_payload(EventType::EvEfiVariableDriverConfig as u32, &data) {
            Payload::Variable(event) => {
                assert_eq!(event.unicode_name, "PK");
                assert_eq!(event.variable_data, vec![1, 2, 3]);
            },
            other => panic!("unexpected payload: {:?}", other),
        }
    }

    #[test]
    fn test_truncated_variable_falls_back_to_raw() {
        let data = vec![0u8; 20];
        let payload = decode_agile_payload(EventType::EvEfiVariableBoot as u32, &data);
        assert_eq!(payload, Payload::Raw(data));
    }

    #[test]
    fn test_unknown_no_action_signature_is_raw() {
        let data = b"SomethingElse\0\0\0\x01".to_vec();
        let payload = decode_agile_payload(EventType::EvNoAction as u32, &data);
        assert_eq!(payload, Payload::Raw(data));
    }

    #[test]
    fn test_startup_locality() {
        let mut data = STARTUP_LOCALITY_SIGNATURE.to_vec();
        data.push(3);
        let payload = decode_agile_payload(EventType::EvNoAction as u32, &data);
        assert_eq!(payload, Payload::StartupLocality(StartupLocalityEvent { locality: 3 }));
    }
}
