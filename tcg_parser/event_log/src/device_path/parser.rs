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

//! Device Path Parsing Module
//!
//! Decodes a device path from a byte reader bounded by the enclosing payload.
//! Every node body is split off by its declared length before it is decoded, so
//! the reader always resumes on the next node header no matter how much of the
//! body the node decoder understood.

use log::debug;

use crate::byte_reader::{ByteParseable, ByteReader};
use crate::device_path::model::*;
use crate::error::EventLogError;

impl ByteParseable for PciNode {
    fn parse_from(parser: &mut ByteReader) -> Result<Self, EventLogError> {
        let function: u8 = parser.read_u8()?;
        let device: u8 = parser.read_u8()?;
        Ok(PciNode { function, device })
    }
}

impl ByteParseable for MemoryMappedNode {
    fn parse_from(parser: &mut ByteReader) -> Result<Self, EventLogError> {
        let memory_type: u32 = parser.read_u32()?;
        let start_address: u64 = parser.read_u64()?;
        let end_address: u64 = parser.read_u64()?;
        Ok(MemoryMappedNode { memory_type, start_address, end_address })
    }
}

impl ByteParseable for AcpiNode {
    fn parse_from(parser: &mut ByteReader) -> Result<Self, EventLogError> {
        let hid: u32 = parser.read_u32()?;
        let uid: u32 = parser.read_u32()?;
        Ok(AcpiNode { hid, uid })
    }
}

/// Non-empty string overrides the numeric default
fn acpi_id(default: u32, text: String) -> AcpiId {
    if text.is_empty() {
        AcpiId::Numeric(default)
    } else {
        AcpiId::Text(text)
    }
}

/// Read one optional id string, counting it when the body still holds bytes
fn read_id_string(parser: &mut ByteReader, string_count: &mut u8) -> Result<String, EventLogError> {
    if parser.remaining() < 2 {
        return Ok(String::new());
    }
    *string_count += 1;
    parser.read_ucs2_string()
}

impl ByteParseable for ExtendedAcpiNode {
    /// Three numeric defaults followed by HID, UID and CID strings in that order.
    /// A string missing from the node body reads as empty.
    fn parse_from(parser: &mut ByteReader) -> Result<Self, EventLogError> {
        let hid: u32 = parser.read_u32()?;
        let uid: u32 = parser.read_u32()?;
        let cid: u32 = parser.read_u32()?;
        let mut string_count: u8 = 0;
        let hid_str = read_id_string(parser, &mut string_count)?;
        let uid_str = read_id_string(parser, &mut string_count)?;
        let cid_str = read_id_string(parser, &mut string_count)?;
        Ok(ExtendedAcpiNode {
            hid: acpi_id(hid, hid_str),
            uid: acpi_id(uid, uid_str),
            cid: acpi_id(cid, cid_str),
            string_count,
        })
    }
}

impl ByteParseable for UsbNode {
    fn parse_from(parser: &mut ByteReader) -> Result<Self, EventLogError> {
        let parent_port: u8 = parser.read_u8()?;
        let interface: u8 = parser.read_u8()?;
        Ok(UsbNode { parent_port, interface })
    }
}

impl ByteParseable for LunNode {
    fn parse_from(parser: &mut ByteReader) -> Result<Self, EventLogError> {
        Ok(LunNode { lun: parser.read_u8()? })
    }
}

impl ByteParseable for SataNode {
    fn parse_from(parser: &mut ByteReader) -> Result<Self, EventLogError> {
        let hba_port: u16 = parser.read_u16()?;
        let port_multiplier_port: u16 = parser.read_u16()?;
        let logical_unit_number: u16 = parser.read_u16()?;
        Ok(SataNode { hba_port, port_multiplier_port, logical_unit_number })
    }
}

impl ByteParseable for NvmeNamespaceNode {
    fn parse_from(parser: &mut ByteReader) -> Result<Self, EventLogError> {
        let namespace_id: u32 = parser.read_u32()?;
        let extended_unique_id: [u8; 8] = parser.read_array()?;
        Ok(NvmeNamespaceNode { namespace_id, extended_unique_id })
    }
}

impl ByteParseable for HardDriveNode {
    fn parse_from(parser: &mut ByteReader) -> Result<Self, EventLogError> {
        let partition_number: u32 = parser.read_u32()?;
        let partition_start: u64 = parser.read_u64()?;
        let partition_size: u64 = parser.read_u64()?;
        let signature: [u8; 16] = parser.read_array()?;
        let partition_format: u8 = parser.read_u8()?;
        let signature_type: u8 = parser.read_u8()?;
        Ok(HardDriveNode {
            partition_number,
            partition_start,
            partition_size,
            signature,
            partition_format,
            signature_type,
        })
    }
}

impl ByteParseable for FilePathNode {
    /// The path fills the rest of the node and is NUL terminated
    fn parse_from(parser: &mut ByteReader) -> Result<Self, EventLogError> {
        Ok(FilePathNode { path: parser.read_ucs2_string()? })
    }
}

impl ByteParseable for FirmwareGuidNode {
    fn parse_from(parser: &mut ByteReader) -> Result<Self, EventLogError> {
        Ok(FirmwareGuidNode { name: parser.read_guid()? })
    }
}

impl ByteParseable for RelativeOffsetRangeNode {
    fn parse_from(parser: &mut ByteReader) -> Result<Self, EventLogError> {
        let reserved: u32 = parser.read_u32()?;
        let starting_offset: u64 = parser.read_u64()?;
        let ending_offset: u64 = parser.read_u64()?;
        Ok(RelativeOffsetRangeNode { reserved, starting_offset, ending_offset })
    }
}

fn parse_typed_node<T, F>(body: &mut ByteReader, wrapper: F) -> Result<Option<DevicePathNode>, EventLogError>
where
    T: ByteParseable,
    F: FnOnce(T) -> DevicePathNode
{
    T::parse_from(body).map(wrapper).map(Some)
}

/// Decode a node body for a known `(type, sub_type)`
///
/// Returns `Ok(None)` when the pair has no decoder.
fn parse_node_body(node_type: u8, sub_type: u8, body: &mut ByteReader) -> Result<Option<DevicePathNode>, EventLogError> {
    match (node_type, sub_type) {
        (HARDWARE_DEVICE_PATH, HW_PCI_DP) => parse_typed_node(body, DevicePathNode::Pci),
        (HARDWARE_DEVICE_PATH, HW_MEMMAP_DP) => parse_typed_node(body, DevicePathNode::MemoryMapped),

        (ACPI_DEVICE_PATH, ACPI_DP) => parse_typed_node(body, DevicePathNode::Acpi),
        (ACPI_DEVICE_PATH, ACPI_EXTENDED_DP) => parse_typed_node(body, DevicePathNode::ExtendedAcpi),

        (MESSAGING_DEVICE_PATH, MSG_USB_DP) => parse_typed_node(body, DevicePathNode::Usb),
        (MESSAGING_DEVICE_PATH, MSG_DEVICE_LOGICAL_UNIT_DP) => parse_typed_node(body, DevicePathNode::Lun),
        (MESSAGING_DEVICE_PATH, MSG_SATA_DP) => parse_typed_node(body, DevicePathNode::Sata),
        (MESSAGING_DEVICE_PATH, MSG_NVME_NAMESPACE_DP) => parse_typed_node(body, DevicePathNode::NvmeNamespace),

        (MEDIA_DEVICE_PATH, MEDIA_HARDDRIVE_DP) => parse_typed_node(body, DevicePathNode::HardDrive),
        (MEDIA_DEVICE_PATH, MEDIA_FILEPATH_DP) => parse_typed_node(body, DevicePathNode::FilePath),
        (MEDIA_DEVICE_PATH, MEDIA_PIWG_FW_FILE_DP) => parse_typed_node(body, DevicePathNode::FirmwareFile),
        (MEDIA_DEVICE_PATH, MEDIA_PIWG_FW_VOL_DP) => parse_typed_node(body, DevicePathNode::FirmwareVolume),
        (MEDIA_DEVICE_PATH, MEDIA_RELATIVE_OFFSET_RANGE_DP) => {
            parse_typed_node(body, DevicePathNode::RelativeOffsetRange)
        },

        _ => Ok(None),
    }
}

/// Read one node
///
/// Returns `Ok(None)` on the end-of-entire-path marker. Errors mean the reader
/// could not reach the next node header and decoding must stop.
fn parse_node(reader: &mut ByteReader) -> Result<Option<DevicePathNode>, EventLogError> {
    let node_type: u8 = reader.read_u8()?;
    let sub_type: u8 = reader.read_u8()?;
    let length: u16 = reader.read_u16()?;

    if node_type == END_DEVICE_PATH && sub_type == END_ENTIRE_DEVICE_PATH_SUBTYPE {
        return Ok(None);
    }

    if length < DEVICE_PATH_HEADER_SIZE {
        return Err(EventLogError::InputError(
            format!("Device path node ({:#04x}, {:#04x}) declares length {} shorter than its header",
                node_type, sub_type, length)
        ));
    }

    let mut body = reader.sub_reader((length - DEVICE_PATH_HEADER_SIZE) as usize)?;
    let unknown = || DevicePathNode::Unknown(UnknownNode { node_type, sub_type, length });

    let node = match parse_node_body(node_type, sub_type, &mut body) {
        Ok(Some(node)) => node,
        Ok(None) => unknown(),
        Err(e) => {
            debug!("Device path node ({:#04x}, {:#04x}) kept opaque: {}", node_type, sub_type, e);
            unknown()
        },
    };
    Ok(Some(node))
}

/// Decode device path nodes until the end marker or the end of `reader`
///
/// Decoding never fails as a whole: when a node header or a declared node length
/// runs past the data, the nodes decoded so far are returned. The end marker is
/// not part of the result.
pub fn parse_device_path(reader: &mut ByteReader) -> DevicePath {
    let mut nodes: Vec<DevicePathNode> = Vec::new();

    while !reader.is_end() {
        match parse_node(reader) {
            Ok(Some(node)) => nodes.push(node),
            Ok(None) => break,
            Err(e) => {
                debug!("Device path truncated after {} nodes: {}", nodes.len(), e);
                break;
            },
        }
    }

    DevicePath::new(nodes)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_short_node_length_stops_decoding() {
        let data = [HARDWARE_DEVICE_PATH, HW_PCI_DP, 0x02, 0x00, 0x00, 0x00];
        let mut reader = ByteReader::new(&data);
        let path = parse_device_path(&mut reader);
        assert!(path.is_empty());
    }

    #[test]
    fn test_known_node_with_short_body_becomes_unknown() {
        // Memory-mapped node whose body only holds the memory type
        let mut data = vec![HARDWARE_DEVICE_PATH, HW_MEMMAP_DP, 0x08, 0x00, 0x01, 0x00, 0x00, 0x00];
        data.extend_from_slice(&[END_DEVICE_PATH, END_ENTIRE_DEVICE_PATH_SUBTYPE, 0x04, 0x00]);
        let mut reader = ByteReader::new(&data);
        let path = parse_device_path(&mut reader);
        assert_eq!(path.nodes(), &[DevicePathNode::Unknown(UnknownNode {
            node_type: HARDWARE_DEVICE_PATH,
            sub_type: HW_MEMMAP_DP,
            length: 8,
        })]);
    }
}
