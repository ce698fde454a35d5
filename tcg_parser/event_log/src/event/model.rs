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

//! Event Type Definitions
//!
//! Event type catalogue, record shapes for both header formats and the payload
//! variants the dispatcher can produce. Serialization lives in `event::serialize`.

use serde::Serialize;
use std::fmt;
use uuid::Uuid;

use crate::device_path::model::DevicePath;
use crate::digest::{AlgorithmId, DigestAlgorithmEntry};

/// Fixed digest length of the legacy (TCG 1.2) header
pub const LEGACY_DIGEST_SIZE: usize = 20;
pub const NO_ACTION_EVENT_SIZE: usize = 16;
pub const UEFI_PARTITION_NAME_SIZE: usize = 36;

/// `pcr_index` and `event_type` of an erased-flash record header that ends the log
pub const END_OF_LOG_MARKER: u32 = 0xFFFF_FFFF;

/// Spec id event signature 03
pub const SPEC_ID_EVENT_SIGNATURE_03: &[u8] = &[
    0x53, 0x70, 0x65, 0x63, 0x20,  // "Spec "
    0x49, 0x44, 0x20,              // "ID "
    0x45, 0x76, 0x65, 0x6E, 0x74,  // "Event"
    0x30, 0x33,                    // "03"
    0x00                           // Null terminator
];

/// Byte representation of startup locality identifier
pub const STARTUP_LOCALITY_SIGNATURE: &[u8] = &[
    0x53, 0x74, 0x61, 0x72, 0x74, 0x75, 0x70,           // "Startup"
    0x4C, 0x6F, 0x63, 0x61, 0x6C, 0x69, 0x74, 0x79,     // "Locality"
    0x00                                                // Null terminator
];

/// TCG Event Type Enumeration
///
/// Defines the TCG PC Client event types and the UEFI-specific event types
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[repr(u32)]
pub enum EventType {
    EvPrebootCert = 0x00000000,
    EvPostCode = 0x00000001,
    EvUnused = 0x00000002,
    EvNoAction = 0x00000003,
    EvSeparator = 0x00000004,
    EvAction = 0x00000005,
    EvEventTag = 0x00000006,
    EvSCrtmContents = 0x00000007,
    EvSCrtmVersion = 0x00000008,
    EvCpuMicrocode = 0x00000009,
    EvPlatformConfigFlags = 0x0000000A,
    EvTableOfDevices = 0x0000000B,
    EvCompactHash = 0x0000000C,
    EvIpl = 0x0000000D,
    EvIplPartitionData = 0x0000000E,
    EvNonhostCode = 0x0000000F,
    EvNonhostConfig = 0x00000010,
    EvNonhostInfo = 0x00000011,
    EvOmitBootDeviceEvents = 0x00000012,
    EvPostCode2 = 0x00000013,

    // EFI specific event types
    EvEfiEventBase = 0x80000000,
    EvEfiVariableDriverConfig = 0x80000001,
    EvEfiVariableBoot = 0x80000002,
    EvEfiBootServicesApplication = 0x80000003,
    EvEfiBootServicesDriver = 0x80000004,
    EvEfiRuntimeServicesDriver = 0x80000005,
    EvEfiGptEvent = 0x80000006,
    EvEfiAction = 0x80000007,
    EvEfiPlatformFirmwareBlob = 0x80000008,
    EvEfiHandoffTables = 0x80000009,
    EvEfiPlatformFirmwareBlob2 = 0x8000000A,
    EvEfiHandoffTables2 = 0x8000000B,
    EvEfiVariableBoot2 = 0x8000000C,
    EvEfiGptEvent2 = 0x8000000D,
    EvEfiHcrtmEvent = 0x80000010,

    EvEfiVariableAuthority = 0x800000E0,
    EvEfiSpdmFirmwareBlob = 0x800000E1,
    EvEfiSpdmFirmwareConfig = 0x800000E2,
    EvEfiSpdmDevicePolicy = 0x800000E3,
    EvEfiSpdmDeviceAuthority = 0x800000E4,
}

impl EventType {
    pub fn from_u32(value: u32) -> Option<Self> {
        match value {
            0x00000000 => Some(Self::EvPrebootCert),
            0x00000001 => Some(Self::EvPostCode),
            0x00000002 => Some(Self::EvUnused),
            0x00000003 => Some(Self::EvNoAction),
            0x00000004 => Some(Self::EvSeparator),
            0x00000005 => Some(Self::EvAction),
            0x00000006 => Some(Self::EvEventTag),
            0x00000007 => Some(Self::EvSCrtmContents),
            0x00000008 => Some(Self::EvSCrtmVersion),
            0x00000009 => Some(Self::EvCpuMicrocode),
            0x0000000A => Some(Self::EvPlatformConfigFlags),
            0x0000000B => Some(Self::EvTableOfDevices),
            0x0000000C => Some(Self::EvCompactHash),
            0x0000000D => Some(Self::EvIpl),
            0x0000000E => Some(Self::EvIplPartitionData),
            0x0000000F => Some(Self::EvNonhostCode),
            0x00000010 => Some(Self::EvNonhostConfig),
            0x00000011 => Some(Self::EvNonhostInfo),
            0x00000012 => Some(Self::EvOmitBootDeviceEvents),
            0x00000013 => Some(Self::EvPostCode2),

            0x80000000 => Some(Self::EvEfiEventBase),
            0x80000001 => Some(Self::EvEfiVariableDriverConfig),
            0x80000002 => Some(Self::EvEfiVariableBoot),
            0x80000003 => Some(Self::EvEfiBootServicesApplication),
            0x80000004 => Some(Self::EvEfiBootServicesDriver),
            0x80000005 => Some(Self::EvEfiRuntimeServicesDriver),
            0x80000006 => Some(Self::EvEfiGptEvent),
            0x80000007 => Some(Self::EvEfiAction),
            0x80000008 => Some(Self::EvEfiPlatformFirmwareBlob),
            0x80000009 => Some(Self::EvEfiHandoffTables),
            0x8000000A => Some(Self::EvEfiPlatformFirmwareBlob2),
            0x8000000B => Some(Self::EvEfiHandoffTables2),
            0x8000000C => Some(Self::EvEfiVariableBoot2),
            0x8000000D => Some(Self::EvEfiGptEvent2),
            0x80000010 => Some(Self::EvEfiHcrtmEvent),

            0x800000E0 => Some(Self::EvEfiVariableAuthority),
            0x800000E1 => Some(Self::EvEfiSpdmFirmwareBlob),
            0x800000E2 => Some(Self::EvEfiSpdmFirmwareConfig),
            0x800000E3 => Some(Self::EvEfiSpdmDevicePolicy),
            0x800000E4 => Some(Self::EvEfiSpdmDeviceAuthority),
            _ => None,
        }
    }

    /// Canonical TCG name, e.g. `EV_NO_ACTION`
    pub fn name(&self) -> &'static str {
        match self {
            Self::EvPrebootCert => "EV_PREBOOT_CERT",
            Self::EvPostCode => "EV_POST_CODE",
            Self::EvUnused => "EV_UNUSED",
            Self::EvNoAction => "EV_NO_ACTION",
            Self::EvSeparator => "EV_SEPARATOR",
            Self::EvAction => "EV_ACTION",
            Self::EvEventTag => "EV_EVENT_TAG",
            Self::EvSCrtmContents => "EV_S_CRTM_CONTENTS",
            Self::EvSCrtmVersion => "EV_S_CRTM_VERSION",
            Self::EvCpuMicrocode => "EV_CPU_MICROCODE",
            Self::EvPlatformConfigFlags => "EV_PLATFORM_CONFIG_FLAGS",
            Self::EvTableOfDevices => "EV_TABLE_OF_DEVICES",
            Self::EvCompactHash => "EV_COMPACT_HASH",
            Self::EvIpl => "EV_IPL",
            Self::EvIplPartitionData => "EV_IPL_PARTITION_DATA",
            Self::EvNonhostCode => "EV_NONHOST_CODE",
            Self::EvNonhostConfig => "EV_NONHOST_CONFIG",
            Self::EvNonhostInfo => "EV_NONHOST_INFO",
            Self::EvOmitBootDeviceEvents => "EV_OMIT_BOOT_DEVICE_EVENTS",
            Self::EvPostCode2 => "EV_POST_CODE2",
            Self::EvEfiEventBase => "EV_EFI_EVENT_BASE",
            Self::EvEfiVariableDriverConfig => "EV_EFI_VARIABLE_DRIVER_CONFIG",
            Self::EvEfiVariableBoot => "EV_EFI_VARIABLE_BOOT",
            Self::EvEfiBootServicesApplication => "EV_EFI_BOOT_SERVICES_APPLICATION",
            Self::EvEfiBootServicesDriver => "EV_EFI_BOOT_SERVICES_DRIVER",
            Self::EvEfiRuntimeServicesDriver => "EV_EFI_RUNTIME_SERVICES_DRIVER",
            Self::EvEfiGptEvent => "EV_EFI_GPT_EVENT",
            Self::EvEfiAction => "EV_EFI_ACTION",
            Self::EvEfiPlatformFirmwareBlob => "EV_EFI_PLATFORM_FIRMWARE_BLOB",
            Self::EvEfiHandoffTables => "EV_EFI_HANDOFF_TABLES",
            Self::EvEfiPlatformFirmwareBlob2 => "EV_EFI_PLATFORM_FIRMWARE_BLOB2",
            Self::EvEfiHandoffTables2 => "EV_EFI_HANDOFF_TABLES2",
            Self::EvEfiVariableBoot2 => "EV_EFI_VARIABLE_BOOT2",
            Self::EvEfiGptEvent2 => "EV_EFI_GPT_EVENT2",
            Self::EvEfiHcrtmEvent => "EV_EFI_HCRTM_EVENT",
            Self::EvEfiVariableAuthority => "EV_EFI_VARIABLE_AUTHORITY",
            Self::EvEfiSpdmFirmwareBlob => "EV_EFI_SPDM_FIRMWARE_BLOB",
            Self::EvEfiSpdmFirmwareConfig => "EV_EFI_SPDM_FIRMWARE_CONFIG",
            Self::EvEfiSpdmDevicePolicy => "EV_EFI_SPDM_DEVICE_POLICY",
            Self::EvEfiSpdmDeviceAuthority => "EV_EFI_SPDM_DEVICE_AUTHORITY",
        }
    }
}

impl fmt::Display for EventType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Name for a raw event type tag
///
/// Unknown tags render as `0x` followed by eight uppercase hex digits.
pub fn event_type_name(event_type: u32) -> String {
    match EventType::from_u32(event_type) {
        Some(known) => known.name().to_string(),
        None => format!("0x{:08X}", event_type),
    }
}

/// One digest of a crypto-agile record, stored verbatim
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TpmDigestEntry {
    pub algorithm_id: u16,
    pub digest: Vec<u8>,
}

impl TpmDigestEntry {
    pub fn new(algorithm_id: u16, digest: Vec<u8>) -> Self {
        Self { algorithm_id, digest }
    }

    pub fn algorithm(&self) -> AlgorithmId {
        AlgorithmId::from(self.algorithm_id)
    }
}

/// Specification ID Event Data
///
/// Announces the TCG spec version and the digest algorithms used by every
/// crypto-agile record that follows.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EfiSpecIdEvent {
    pub signature: [u8; NO_ACTION_EVENT_SIZE],  // "Spec ID Event03"
    pub platform_class: u32,
    pub spec_version_minor: u8,
    pub spec_version_major: u8,
    pub spec_errata: u8,
    pub uintn_size: u8,                         // UINTN size field width
    pub digest_algorithms: Vec<DigestAlgorithmEntry>,
    pub vendor_info: Vec<u8>,
}

impl EfiSpecIdEvent {
    /// Signature text without trailing NULs
    pub fn signature_text(&self) -> String {
        String::from_utf8_lossy(&self.signature).trim_end_matches('\0').to_string()
    }

    pub fn has_expected_signature(&self) -> bool {
        self.signature.as_slice() == SPEC_ID_EVENT_SIGNATURE_03
    }
}

/// Startup Locality Event
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct StartupLocalityEvent {
    pub locality: u8,
}

/// UEFI image load event (boot services application/driver, runtime driver)
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UefiImageLoadEvent {
    pub image_location_in_memory: u64,
    pub image_length_in_memory: u64,
    pub image_link_time_address: u64,
    pub length_of_device_path: u64,
    pub device_path: DevicePath,
}

/// UEFI Variable Event Data
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UefiVariableDataEvent {
    pub variable_name: Uuid,                    // Variable GUID
    pub unicode_name: String,
    pub variable_data: Vec<u8>,
}

/// Platform Firmware Blob Event Data
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UefiPlatformFirmwareBlobEvent {
    pub blob_base: u64,                         // Efi physical address
    pub blob_length: u64,
}

/// Platform Firmware Blob Event2 Data
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UefiPlatformFirmwareBlobEvent2 {
    pub blob_description: String,
    pub blob_base: u64,
    pub blob_length: u64,
}

/// Payload that is either printable text or one of the two blob shapes
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum UefiFirmwareBlobEvent {
    UefiPlatformFirmwareString(String),
    UefiPlatformFirmwareBlob(UefiPlatformFirmwareBlobEvent),
    UefiPlatformFirmwareBlob2(UefiPlatformFirmwareBlobEvent2),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PCClientTaggedEvent {
    pub tagged_event_id: u32,
    pub tagged_event_data: Vec<u8>,
}

/// Gpt header
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UefiPartitionHeader {
    pub signature: String,                  // 8-char ASCII "EFI PART"
    pub revision: u32,
    pub header_size: u32,
    pub header_crc32: u32,
    pub reserved: u32,
    pub my_lba: u64,
    pub alternate_lba: u64,
    pub first_usable_lba: u64,
    pub last_usable_lba: u64,
    pub disk_guid: Uuid,
    pub partition_entries_lba: u64,
    pub number_of_partition_entries: u32,
    pub size_of_partition_entry: u32,
    pub partition_entry_array_crc32: u32,
}

/// GPT Partition Entry
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UefiPartitionEntry {
    pub partition_type_guid: Uuid,
    pub unique_partition_guid: Uuid,
    pub starting_lba: u64,
    pub ending_lba: u64,
    pub attributes: u64,
    pub partition_name: String,
}

/// EFI GPT Event Data
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UefiGptDataEvent {
    pub uefi_partition_header: UefiPartitionHeader,
    pub partitions: Vec<UefiPartitionEntry>,
}

/// Decoded record payload
///
/// Exactly one variant per record. `Raw` keeps the isolated payload bytes when no
/// routine applies or the routine failed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Payload {
    Raw(Vec<u8>),
    SpecId(EfiSpecIdEvent),
    StartupLocality(StartupLocalityEvent),
    ImageLoad(UefiImageLoadEvent),
    Variable(UefiVariableDataEvent),
    FirmwareBlob(UefiPlatformFirmwareBlobEvent),
    FirmwareBlob2(UefiPlatformFirmwareBlobEvent2),
    StringOrBlob(UefiFirmwareBlobEvent),
    Text(String),                           // UTF-16 string payload
    Action(String),                         // ASCII action string
    EventTag(PCClientTaggedEvent),
    Gpt(UefiGptDataEvent),
    Separator,
}

impl Payload {
    /// Short variant name used by renderers
    pub fn kind(&self) -> &'static str {
        match self {
            Payload::Raw(_) => "Raw",
            Payload::SpecId(_) => "SpecId",
            Payload::StartupLocality(_) => "StartupLocality",
            Payload::ImageLoad(_) => "ImageLoad",
            Payload::Variable(_) => "Variable",
            Payload::FirmwareBlob(_) => "FirmwareBlob",
            Payload::FirmwareBlob2(_) => "FirmwareBlob2",
            Payload::StringOrBlob(_) => "StringOrBlob",
            Payload::Text(_) => "Text",
            Payload::Action(_) => "Action",
            Payload::EventTag(_) => "EventTag",
            Payload::Gpt(_) => "Gpt",
            Payload::Separator => "Separator",
        }
    }
}

/// Record with the legacy (TCG 1.2) header: one fixed 20-byte digest
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EventRecordLegacy {
    pub pcr_index: u32,
    pub event_type: u32,
    pub digest: [u8; LEGACY_DIGEST_SIZE],
    pub payload: Payload,
}

impl EventRecordLegacy {
    pub fn event_type_name(&self) -> String {
        event_type_name(self.event_type)
    }
}

/// Record with the crypto-agile header: digests in stream order
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EventRecordAgile {
    pub pcr_index: u32,
    pub event_type: u32,
    pub digests: Vec<TpmDigestEntry>,
    pub payload: Payload,
}

impl EventRecordAgile {
    pub fn event_type_name(&self) -> String {
        event_type_name(self.event_type)
    }
}
