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

//! JSON shape of decoded records
//!
//! Digests and opaque bytes serialize as lowercase hex, addresses and lengths
//! of memory regions as `0x` strings, GUIDs in their canonical form, and device
//! paths as both the node list and their text form.

use serde::{
    Serialize, Serializer,
    ser::SerializeStruct,
};

use crate::device_path::model::DevicePath;
use crate::event::log::{EventLog, Termination};
use crate::event::model::{
    Payload, TpmDigestEntry,
    EventRecordLegacy, EventRecordAgile,
    EfiSpecIdEvent,
    UefiImageLoadEvent, UefiVariableDataEvent,
    UefiPlatformFirmwareBlobEvent, UefiPlatformFirmwareBlobEvent2, UefiFirmwareBlobEvent,
    PCClientTaggedEvent,
    UefiPartitionHeader, UefiPartitionEntry, UefiGptDataEvent,
};

fn hex_address(value: u64) -> String {
    format!("0x{:x}", value)
}

/// Serializes firmware BLOB data to JSON objects
///
/// # Parameters
/// * `serializer` - The serializer
/// * `description` - BLOB description, omitted for version 1 blobs
/// * `blob_base` - BLOB base address
/// * `blob_length` - BLOB length
fn serialize_firmware_blob<S>(
    serializer: S,
    description: Option<&str>,
    blob_base: u64,
    blob_length: u64
) -> Result<S::Ok, S::Error>
where
    S: Serializer
{
    let field_count = if description.is_some() { 3 } else { 2 };
    let mut state = serializer.serialize_struct("FirmwareBlob", field_count)?;
    if let Some(description) = description {
        state.serialize_field("description", description)?;
    }
    state.serialize_field("blob_base", &hex_address(blob_base))?;
    state.serialize_field("blob_length", &hex_address(blob_length))?;
    state.end()
}

impl Serialize for UefiPlatformFirmwareBlobEvent {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer {
        serialize_firmware_blob(serializer, None, self.blob_base, self.blob_length)
    }
}

impl Serialize for UefiPlatformFirmwareBlobEvent2 {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer {
        serialize_firmware_blob(serializer, Some(&self.blob_description), self.blob_base, self.blob_length)
    }
}

impl Serialize for UefiFirmwareBlobEvent {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer {
        match self {
            UefiFirmwareBlobEvent::UefiPlatformFirmwareString(value) => {
                let mut state = serializer.serialize_struct("FirmwareString", 1)?;
                state.serialize_field("value", value.trim_end_matches('\0'))?;
                state.end()
            },
            UefiFirmwareBlobEvent::UefiPlatformFirmwareBlob(blob) => blob.serialize(serializer),
            UefiFirmwareBlobEvent::UefiPlatformFirmwareBlob2(blob) => blob.serialize(serializer),
        }
    }
}

impl Serialize for EfiSpecIdEvent {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        let mut state = serializer.serialize_struct("EfiSpecIdEvent", 8)?; // field number
        state.serialize_field("signature", &self.signature_text())?;
        state.serialize_field("platform_class", &self.platform_class)?;
        state.serialize_field("spec_version_minor", &self.spec_version_minor)?;
        state.serialize_field("spec_version_major", &self.spec_version_major)?;
        state.serialize_field("spec_errata", &self.spec_errata)?;
        state.serialize_field("uintn_size", &self.uintn_size)?;
        state.serialize_field("digest_algorithms", &self.digest_algorithms)?;
        state.serialize_field("vendor_info", &hex::encode(&self.vendor_info))?;
        state.end()
    }
}

/// Device paths carry both the structured nodes and the canonical text
impl Serialize for DevicePath {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer {
        let mut state = serializer.serialize_struct("DevicePath", 2)?;
        state.serialize_field("nodes", self.nodes())?;
        state.serialize_field("text", &self.to_string())?;
        state.end()
    }
}

impl Serialize for UefiImageLoadEvent {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer {
        let mut state = serializer.serialize_struct("UefiImageLoadEvent", 5)?;
        state.serialize_field("image_location_in_memory", &hex_address(self.image_location_in_memory))?;
        state.serialize_field("image_length_in_memory", &self.image_length_in_memory)?;
        state.serialize_field("image_link_time_address", &hex_address(self.image_link_time_address))?;
        state.serialize_field("length_of_device_path", &self.length_of_device_path)?;
        state.serialize_field("device_path", &self.device_path)?;
        state.end()
    }
}

impl Serialize for UefiVariableDataEvent {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer {
        let mut state = serializer.serialize_struct("UefiVariableDataEvent", 3)?;
        state.serialize_field("variable_name", &self.variable_name)?;
        state.serialize_field("unicode_name", &self.unicode_name)?;
        state.serialize_field("variable_data", &hex::encode(&self.variable_data))?;
        state.end()
    }
}

impl Serialize for PCClientTaggedEvent {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer {
        let mut state = serializer.serialize_struct("PCClientTaggedEvent", 3)?;
        state.serialize_field("tagged_event_id", &self.tagged_event_id)?;
        state.serialize_field("tagged_event_data_size", &self.tagged_event_data.len())?;
        state.serialize_field("tagged_event_data", &hex::encode(&self.tagged_event_data))?;
        state.end()
    }
}

impl Serialize for UefiPartitionHeader {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer {
        let mut state = serializer.serialize_struct("UefiPartitionHeader", 14)?;
        state.serialize_field("signature", &self.signature)?;
        state.serialize_field("revision", &format!("0x{:08x}", self.revision))?;
        state.serialize_field("header_size", &self.header_size)?;
        state.serialize_field("header_crc32", &format!("0x{:08x}", self.header_crc32))?;
        state.serialize_field("reserved", &self.reserved)?;
        state.serialize_field("my_lba", &self.my_lba)?;
        state.serialize_field("alternate_lba", &self.alternate_lba)?;
        state.serialize_field("first_usable_lba", &self.first_usable_lba)?;
        state.serialize_field("last_usable_lba", &self.last_usable_lba)?;
        state.serialize_field("disk_guid", &self.disk_guid)?;
        state.serialize_field("partition_entries_lba", &self.partition_entries_lba)?;
        state.serialize_field("number_of_partition_entries", &self.number_of_partition_entries)?;
        state.serialize_field("size_of_partition_entry", &self.size_of_partition_entry)?;
        state.serialize_field("partition_entry_array_crc32", &format!("0x{:08x}", self.partition_entry_array_crc32))?;
        state.end()
    }
}

impl Serialize for UefiPartitionEntry {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer {
        let mut state = serializer.serialize_struct("UefiPartitionEntry", 6)?;
        state.serialize_field("partition_type_guid", &self.partition_type_guid)?;
        state.serialize_field("unique_partition_guid", &self.unique_partition_guid)?;
        state.serialize_field("starting_lba", &self.starting_lba)?;
        state.serialize_field("ending_lba", &self.ending_lba)?;
        state.serialize_field("attributes", &format!("0x{:016x}", self.attributes))?;
        state.serialize_field("partition_name", &self.partition_name)?;
        state.end()
    }
}

impl Serialize for UefiGptDataEvent {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer {
        let mut state = serializer.serialize_struct("UefiGptDataEvent", 3)?;
        state.serialize_field("uefi_partition_header", &self.uefi_partition_header)?;
        state.serialize_field("number_of_partitions", &self.partitions.len())?;
        state.serialize_field("partitions", &self.partitions)?;
        state.end()
    }
}

/// Serializes a payload as `{ "kind": ..., "value": ... }`
///
/// Marker payloads carry no value field.
impl Serialize for Payload {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer {
        let field_count = if matches!(self, Payload::Separator) { 1 } else { 2 };
        let mut state = serializer.serialize_struct("Payload", field_count)?;
        state.serialize_field("kind", self.kind())?;
        match self {
            Payload::Raw(data) => state.serialize_field("value", &hex::encode(data))?,
            Payload::SpecId(event) => state.serialize_field("value", event)?,
            Payload::StartupLocality(event) => state.serialize_field("value", event)?,
            Payload::ImageLoad(event) => state.serialize_field("value", event)?,
            Payload::Variable(event) => state.serialize_field("value", event)?,
            Payload::FirmwareBlob(event) => state.serialize_field("value", event)?,
            Payload::FirmwareBlob2(event) => state.serialize_field("value", event)?,
            Payload::StringOrBlob(event) => state.serialize_field("value", event)?,
            Payload::Text(text) | Payload::Action(text) => {
                state.serialize_field("value", text.trim_end_matches('\0'))?
            },
            Payload::EventTag(event) => state.serialize_field("value", event)?,
            Payload::Gpt(event) => state.serialize_field("value", event)?,
            Payload::Separator => {},
        }
        state.end()
    }
}

impl Serialize for TpmDigestEntry {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer {
        let mut state = serializer.serialize_struct("TpmDigestEntry", 2)?;
        state.serialize_field("algorithm", &self.algorithm())?;
        state.serialize_field("digest", &hex::encode(&self.digest))?;
        state.end()
    }
}

impl Serialize for EventRecordLegacy {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer {
        let mut state = serializer.serialize_struct("EventRecordLegacy", 4)?;
        state.serialize_field("pcr_index", &self.pcr_index)?;
        state.serialize_field("event_type", &self.event_type_name())?;
        state.serialize_field("digest", &hex::encode(self.digest))?;
        state.serialize_field("payload", &self.payload)?;
        state.end()
    }
}

impl Serialize for EventRecordAgile {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer {
        let mut state = serializer.serialize_struct("EventRecordAgile", 4)?;
        state.serialize_field("pcr_index", &self.pcr_index)?;
        state.serialize_field("event_type", &self.event_type_name())?;
        state.serialize_field("digests", &self.digests)?;
        state.serialize_field("payload", &self.payload)?;
        state.end()
    }
}

impl Serialize for Termination {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer {
        serializer.serialize_str(&self.to_string())
    }
}

impl Serialize for EventLog {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer {
        let mut state = serializer.serialize_struct("EventLog", 5)?;
        state.serialize_field("bootstrap", &self.bootstrap)?;
        state.serialize_field("digest_algorithms", self.registry.entries())?;
        state.serialize_field("records", &self.records)?;
        state.serialize_field("termination", &self.termination)?;
        state.serialize_field("remaining_bytes", &self.remaining_bytes)?;
        state.end()
    }
}
