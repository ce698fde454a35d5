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

//! Device Path Type Definitions
//!
//! UEFI device paths are a sequence of typed nodes. Each node starts with a
//! 4-byte header `(type: u8, sub_type: u8, length: u16)` where `length` counts the
//! header itself. This module defines the node shapes understood by the decoder
//! and their wire encoding.

use serde::Serialize;
use uuid::Uuid;

/// Size of the common node header in bytes
pub const DEVICE_PATH_HEADER_SIZE: u16 = 4;

pub const HARDWARE_DEVICE_PATH: u8 = 0x01;
pub const ACPI_DEVICE_PATH: u8 = 0x02;
pub const MESSAGING_DEVICE_PATH: u8 = 0x03;
pub const MEDIA_DEVICE_PATH: u8 = 0x04;
pub const END_DEVICE_PATH: u8 = 0x7F;

pub const HW_PCI_DP: u8 = 0x01;
pub const HW_MEMMAP_DP: u8 = 0x03;
pub const ACPI_DP: u8 = 0x01;
pub const ACPI_EXTENDED_DP: u8 = 0x02;
pub const MSG_USB_DP: u8 = 0x05;
pub const MSG_DEVICE_LOGICAL_UNIT_DP: u8 = 0x11;
pub const MSG_SATA_DP: u8 = 0x12;
pub const MSG_NVME_NAMESPACE_DP: u8 = 0x17;
pub const MEDIA_HARDDRIVE_DP: u8 = 0x01;
pub const MEDIA_FILEPATH_DP: u8 = 0x04;
pub const MEDIA_PIWG_FW_FILE_DP: u8 = 0x06;
pub const MEDIA_PIWG_FW_VOL_DP: u8 = 0x07;
pub const MEDIA_RELATIVE_OFFSET_RANGE_DP: u8 = 0x08;
pub const END_ENTIRE_DEVICE_PATH_SUBTYPE: u8 = 0xFF;

/// Hard drive signature types
pub const SIGNATURE_TYPE_MBR: u8 = 0x01;
pub const SIGNATURE_TYPE_GUID: u8 = 0x02;

/// PCI device path (hardware 0x01/0x01)
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PciNode {
    pub function: u8,
    pub device: u8,
}

/// Memory-mapped device path (hardware 0x01/0x03)
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct MemoryMappedNode {
    pub memory_type: u32,
    pub start_address: u64,
    pub end_address: u64,
}

/// ACPI device path with numeric identifiers (0x02/0x01)
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct AcpiNode {
    pub hid: u32,
    pub uid: u32,
}

/// Identifier that is either the numeric default or a string override
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(untagged)]
pub enum AcpiId {
    Numeric(u32),
    Text(String),
}

/// Expanded ACPI device path (0x02/0x02)
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ExtendedAcpiNode {
    pub hid: AcpiId,
    pub uid: AcpiId,
    pub cid: AcpiId,
    /// Number of id strings present in the node body, 0 to 3
    #[serde(skip)]
    pub string_count: u8,
}

/// USB device path (messaging 0x03/0x05)
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct UsbNode {
    pub parent_port: u8,
    pub interface: u8,
}

/// Device logical unit (messaging 0x03/0x11)
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct LunNode {
    pub lun: u8,
}

/// SATA device path (messaging 0x03/0x12)
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SataNode {
    pub hba_port: u16,
    pub port_multiplier_port: u16,
    pub logical_unit_number: u16,
}

/// NVM Express namespace (messaging 0x03/0x17)
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct NvmeNamespaceNode {
    pub namespace_id: u32,
    pub extended_unique_id: [u8; 8],
}

/// Hard drive partition (media 0x04/0x01)
///
/// `signature` holds a 4-byte MBR disk signature in its first bytes when
/// `signature_type` is MBR, or a partition GUID when it is GPT.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct HardDriveNode {
    pub partition_number: u32,
    pub partition_start: u64,
    pub partition_size: u64,
    pub signature: [u8; 16],
    pub partition_format: u8,
    pub signature_type: u8,
}

impl HardDriveNode {
    pub fn mbr_signature(&self) -> u32 {
        u32::from_le_bytes([self.signature[0], self.signature[1], self.signature[2], self.signature[3]])
    }

    pub fn gpt_signature(&self) -> Uuid {
        Uuid::from_bytes_le(self.signature)
    }
}

/// File path (media 0x04/0x04)
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FilePathNode {
    pub path: String,
}

/// PIWG firmware volume or firmware file (media 0x04/0x07, 0x04/0x06)
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FirmwareGuidNode {
    pub name: Uuid,
}

/// Relative offset range (media 0x04/0x08)
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RelativeOffsetRangeNode {
    pub reserved: u32,
    pub starting_offset: u64,
    pub ending_offset: u64,
}

/// Node the decoder did not interpret; only the header is kept
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct UnknownNode {
    pub node_type: u8,
    pub sub_type: u8,
    pub length: u16,
}

/// A decoded device path node
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "node")]
pub enum DevicePathNode {
    Pci(PciNode),
    MemoryMapped(MemoryMappedNode),
    Acpi(AcpiNode),
    ExtendedAcpi(ExtendedAcpiNode),
    Usb(UsbNode),
    Lun(LunNode),
    Sata(SataNode),
    NvmeNamespace(NvmeNamespaceNode),
    HardDrive(HardDriveNode),
    FilePath(FilePathNode),
    FirmwareFile(FirmwareGuidNode),
    FirmwareVolume(FirmwareGuidNode),
    RelativeOffsetRange(RelativeOffsetRangeNode),
    Unknown(UnknownNode),
}

fn utf16_with_nul(text: &str) -> Vec<u8> {
    let mut bytes = Vec::with_capacity((text.len() + 1) * 2);
    for unit in text.encode_utf16().chain(std::iter::once(0)) {
        bytes.extend_from_slice(&unit.to_le_bytes());
    }
    bytes
}

impl AcpiId {
    fn numeric_default(&self) -> u32 {
        match self {
            AcpiId::Numeric(value) => *value,
            AcpiId::Text(_) => 0,
        }
    }

    fn string_override(&self) -> &str {
        match self {
            AcpiId::Numeric(_) => "",
            AcpiId::Text(text) => text,
        }
    }
}

impl DevicePathNode {
    /// `(type, sub_type)` pair written in the node header
    pub fn type_pair(&self) -> (u8, u8) {
        match self {
            DevicePathNode::Pci(_) => (HARDWARE_DEVICE_PATH, HW_PCI_DP),
            DevicePathNode::MemoryMapped(_) => (HARDWARE_DEVICE_PATH, HW_MEMMAP_DP),
            DevicePathNode::Acpi(_) => (ACPI_DEVICE_PATH, ACPI_DP),
            DevicePathNode::ExtendedAcpi(_) => (ACPI_DEVICE_PATH, ACPI_EXTENDED_DP),
            DevicePathNode::Usb(_) => (MESSAGING_DEVICE_PATH, MSG_USB_DP),
            DevicePathNode::Lun(_) => (MESSAGING_DEVICE_PATH, MSG_DEVICE_LOGICAL_UNIT_DP),
            DevicePathNode::Sata(_) => (MESSAGING_DEVICE_PATH, MSG_SATA_DP),
            DevicePathNode::NvmeNamespace(_) => (MESSAGING_DEVICE_PATH, MSG_NVME_NAMESPACE_DP),
            DevicePathNode::HardDrive(_) => (MEDIA_DEVICE_PATH, MEDIA_HARDDRIVE_DP),
            DevicePathNode::FilePath(_) => (MEDIA_DEVICE_PATH, MEDIA_FILEPATH_DP),
            DevicePathNode::FirmwareFile(_) => (MEDIA_DEVICE_PATH, MEDIA_PIWG_FW_FILE_DP),
            DevicePathNode::FirmwareVolume(_) => (MEDIA_DEVICE_PATH, MEDIA_PIWG_FW_VOL_DP),
            DevicePathNode::RelativeOffsetRange(_) => (MEDIA_DEVICE_PATH, MEDIA_RELATIVE_OFFSET_RANGE_DP),
            DevicePathNode::Unknown(node) => (node.node_type, node.sub_type),
        }
    }

    fn encode_body(&self) -> Vec<u8> {
        let mut body: Vec<u8> = Vec::new();
        match self {
            DevicePathNode::Pci(node) => {
                body.push(node.function);
                body.push(node.device);
            },
            DevicePathNode::MemoryMapped(node) => {
                body.extend_from_slice(&node.memory_type.to_le_bytes());
                body.extend_from_slice(&node.start_address.to_le_bytes());
                body.extend_from_slice(&node.end_address.to_le_bytes());
            },
            DevicePathNode::Acpi(node) => {
                body.extend_from_slice(&node.hid.to_le_bytes());
                body.extend_from_slice(&node.uid.to_le_bytes());
            },
            DevicePathNode::ExtendedAcpi(node) => {
                for id in [&node.hid, &node.uid, &node.cid] {
                    body.extend_from_slice(&id.numeric_default().to_le_bytes());
                }
                for id in [&node.hid, &node.uid, &node.cid].into_iter().take(node.string_count as usize) {
                    body.extend_from_slice(&utf16_with_nul(id.string_override()));
                }
            },
            DevicePathNode::Usb(node) => {
                body.push(node.parent_port);
                body.push(node.interface);
            },
            DevicePathNode::Lun(node) => body.push(node.lun),
            DevicePathNode::Sata(node) => {
                body.extend_from_slice(&node.hba_port.to_le_bytes());
                body.extend_from_slice(&node.port_multiplier_port.to_le_bytes());
                body.extend_from_slice(&node.logical_unit_number.to_le_bytes());
            },
            DevicePathNode::NvmeNamespace(node) => {
                body.extend_from_slice(&node.namespace_id.to_le_bytes());
                body.extend_from_slice(&node.extended_unique_id);
            },
            DevicePathNode::HardDrive(node) => {
                body.extend_from_slice(&node.partition_number.to_le_bytes());
                body.extend_from_slice(&node.partition_start.to_le_bytes());
                body.extend_from_slice(&node.partition_size.to_le_bytes());
                body.extend_from_slice(&node.signature);
                body.push(node.partition_format);
                body.push(node.signature_type);
            },
            DevicePathNode::FilePath(node) => body.extend_from_slice(&utf16_with_nul(&node.path)),
            DevicePathNode::FirmwareFile(node) | DevicePathNode::FirmwareVolume(node) => {
                body.extend_from_slice(&node.name.to_bytes_le());
            },
            DevicePathNode::RelativeOffsetRange(node) => {
                body.extend_from_slice(&node.reserved.to_le_bytes());
                body.extend_from_slice(&node.starting_offset.to_le_bytes());
                body.extend_from_slice(&node.ending_offset.to_le_bytes());
            },
            DevicePathNode::Unknown(node) => {
                let body_length = node.length.saturating_sub(DEVICE_PATH_HEADER_SIZE);
                body.resize(body_length as usize, 0);
            },
        }
        body
    }

    /// Encode the node, header included, in wire format
    ///
    /// Unknown nodes re-encode with a zero-filled body of their declared length.
    pub fn to_bytes(&self) -> Vec<u8> {
        let (node_type, sub_type) = self.type_pair();
        let body = self.encode_body();
        let length = (body.len() + DEVICE_PATH_HEADER_SIZE as usize) as u16;
        let mut bytes = Vec::with_capacity(length as usize);
        bytes.push(node_type);
        bytes.push(sub_type);
        bytes.extend_from_slice(&length.to_le_bytes());
        bytes.extend_from_slice(&body);
        bytes
    }

    /// Length the node occupies on the wire, header included
    pub fn encoded_length(&self) -> u16 {
        match self {
            DevicePathNode::Unknown(node) => node.length,
            _ => (self.encode_body().len() + DEVICE_PATH_HEADER_SIZE as usize) as u16,
        }
    }
}

/// Ordered device path, without its end marker
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct DevicePath {
    nodes: Vec<DevicePathNode>,
}

impl DevicePath {
    pub fn new(nodes: Vec<DevicePathNode>) -> Self {
        Self { nodes }
    }

    pub fn nodes(&self) -> &[DevicePathNode] {
        &self.nodes
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, DevicePathNode> {
        self.nodes.iter()
    }

    /// Path string of the first file node, if any
    pub fn file_path(&self) -> Option<&str> {
        self.nodes.iter().find_map(|node| match node {
            DevicePathNode::FilePath(file) => Some(file.path.as_str()),
            _ => None,
        })
    }

    /// Encode all nodes followed by an end-of-entire-path marker
    pub fn to_bytes(&self) -> Vec<u8> {
        let mut bytes: Vec<u8> = self.nodes.iter().flat_map(|node| node.to_bytes()).collect();
        bytes.extend_from_slice(&[END_DEVICE_PATH, END_ENTIRE_DEVICE_PATH_SUBTYPE]);
        bytes.extend_from_slice(&DEVICE_PATH_HEADER_SIZE.to_le_bytes());
        bytes
    }
}

impl<'a> IntoIterator for &'a DevicePath {
    type Item = &'a DevicePathNode;
    type IntoIter = std::slice::Iter<'a, DevicePathNode>;

    fn into_iter(self) -> Self::IntoIter {
        self.nodes.iter()
    }
}
