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

//! Device path text form
//!
//! Each node renders to one fixed notation, most starting with a backslash. A
//! whole path is the plain concatenation of its nodes.

use std::fmt;
use uuid::Uuid;

use crate::device_path::model::*;

// EISA-encoded PNP identifiers with a dedicated short form
const EISA_PNP0A03_PCI_ROOT: u32 = 0x0A03_41D0;
const EISA_PNP0A08_PCIE_ROOT: u32 = 0x0A08_41D0;
const EISA_PNP0A05_CONTAINER: u32 = 0x0A05_41D0;
const EISA_PNP0A06_CONTAINER: u32 = 0x0A06_41D0;
const EISA_PNP0C09_EC: u32 = 0x0C09_41D0;
const EISA_PNP0604_FLOPPY: u32 = 0x0604_41D0;
const EISA_PNP0301_KEYBOARD: u32 = 0x0301_41D0;
const EISA_PNP0501_SERIAL: u32 = 0x0501_41D0;

fn guid_text(guid: &Uuid) -> String {
    guid.hyphenated().to_string().to_uppercase()
}

impl fmt::Display for AcpiId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AcpiId::Numeric(value) => write!(f, "0x{:x}", value),
            AcpiId::Text(text) => write!(f, "{}", text),
        }
    }
}

impl fmt::Display for DevicePathNode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DevicePathNode::Pci(node) => write!(f, "\\Pci(0x{:x}, 0x{:x})", node.device, node.function),
            DevicePathNode::MemoryMapped(node) => write!(
                f, "\\MemoryMapped({}, 0x{:x}, 0x{:x})",
                node.memory_type, node.start_address, node.end_address
            ),
            DevicePathNode::Acpi(node) => match node.hid {
                EISA_PNP0A03_PCI_ROOT => write!(f, "\\PciRoot(0x{:x})", node.uid),
                EISA_PNP0A08_PCIE_ROOT => write!(f, "\\PcieRoot(0x{:x})", node.uid),
                EISA_PNP0A05_CONTAINER | EISA_PNP0A06_CONTAINER => write!(f, "\\AcpiContainer()"),
                EISA_PNP0C09_EC => write!(f, "\\EmbeddedController()"),
                EISA_PNP0604_FLOPPY => write!(f, "\\Floppy(0x{:x})", node.uid),
                EISA_PNP0301_KEYBOARD => write!(f, "\\Keyboard(0x{:x})", node.uid),
                EISA_PNP0501_SERIAL => write!(f, "\\Serial(0x{:x})", node.uid),
                _ => write!(f, "\\Acpi(0x{:08x},0x{:x})", node.hid, node.uid),
            },
            DevicePathNode::ExtendedAcpi(node) => {
                write!(f, "\\AcpiEx({},{},{})", node.hid, node.uid, node.cid)
            },
            DevicePathNode::Usb(node) => write!(f, "\\USB({}, {})", node.parent_port, node.interface),
            DevicePathNode::Lun(node) => write!(f, "\\Unit({})", node.lun),
            DevicePathNode::Sata(node) => write!(
                f, "\\Sata({}, {}, {})",
                node.hba_port, node.port_multiplier_port, node.logical_unit_number
            ),
            DevicePathNode::NvmeNamespace(node) => {
                let eui: Vec<String> = node.extended_unique_id.iter().map(|b| format!("{:02X}", b)).collect();
                write!(f, "\\NVMe(0x{:x}, {})", node.namespace_id, eui.join("-"))
            },
            DevicePathNode::HardDrive(node) => match node.signature_type {
                SIGNATURE_TYPE_MBR => write!(
                    f, "\\HD({},MBR,0x{:x},0x{:x},0x{:x})",
                    node.partition_number, node.mbr_signature(), node.partition_start, node.partition_size
                ),
                SIGNATURE_TYPE_GUID => write!(
                    f, "\\HD({},GPT,{{{}}},0x{:x},0x{:x})",
                    node.partition_number, guid_text(&node.gpt_signature()),
                    node.partition_start, node.partition_size
                ),
                other => write!(
                    f, "\\HD({},{},0x{:x},0x{:x})",
                    node.partition_number, other, node.partition_start, node.partition_size
                ),
            },
            DevicePathNode::FilePath(node) => write!(f, "{}", node.path),
            DevicePathNode::FirmwareFile(node) => write!(f, "\\FvFile({{{}}})", guid_text(&node.name)),
            DevicePathNode::FirmwareVolume(node) => write!(f, "\\FvVol({{{}}})", guid_text(&node.name)),
            DevicePathNode::RelativeOffsetRange(node) => write!(
                f, "\\Offset(0x{:x}, 0x{:x})",
                node.starting_offset, node.ending_offset
            ),
            DevicePathNode::Unknown(node) => write!(f, "\\Unknown({:x}, {:x})", node.node_type, node.sub_type),
        }
    }
}

impl fmt::Display for DevicePath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for node in self.iter() {
            write!(f, "{}", node)?;
        }
        Ok(())
    }
}
