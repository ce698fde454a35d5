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


//! Text rendering of a decoded session, one block per record

use std::fmt;
use tcg_event_log::event::model::UefiFirmwareBlobEvent;
use tcg_event_log::{EventLog, Payload, TpmDigestEntry};

fn write_digest_lines(f: &mut fmt::Formatter<'_>, digests: &[TpmDigestEntry]) -> fmt::Result {
    for entry in digests {
        writeln!(f, "  {}: {}", entry.algorithm(), hex::encode(&entry.digest))?;
    }
    Ok(())
}

/// One-line summary of a payload, plus a hex dump line for opaque bytes when `raw` is set
pub fn payload_summary(payload: &Payload, raw: bool) -> String {
    match payload {
        Payload::Raw(data) if raw && !data.is_empty() => {
            format!("Raw ({} bytes)\n  data: {}", data.len(), hex::encode(data))
        },
        Payload::Raw(data) => format!("Raw ({} bytes)", data.len()),
        Payload::SpecId(event) => {
            let algorithms: Vec<String> = event.digest_algorithms.iter()
                .map(|entry| format!("{}:{}", entry.algorithm(), entry.digest_size))
                .collect();
            format!(
                "SpecId {:?} version {}.{} errata {} algorithms [{}]",
                event.signature_text(), event.spec_version_major, event.spec_version_minor,
                event.spec_errata, algorithms.join(", ")
            )
        },
        Payload::StartupLocality(event) => format!("StartupLocality {}", event.locality),
        Payload::ImageLoad(event) => format!(
            "ImageLoad base 0x{:x} length 0x{:x} path {}",
            event.image_location_in_memory, event.image_length_in_memory, event.device_path
        ),
        Payload::Variable(event) => format!(
            "Variable {} {{{}}} ({} bytes)",
            event.unicode_name, event.variable_name, event.variable_data.len()
        ),
        Payload::FirmwareBlob(blob) => {
            format!("FirmwareBlob base 0x{:x} length 0x{:x}", blob.blob_base, blob.blob_length)
        },
        Payload::FirmwareBlob2(blob) => format!(
            "FirmwareBlob2 {:?} base 0x{:x} length 0x{:x}",
            blob.blob_description, blob.blob_base, blob.blob_length
        ),
        Payload::StringOrBlob(UefiFirmwareBlobEvent::UefiPlatformFirmwareString(text)) => {
            format!("String {:?}", text)
        },
        Payload::StringOrBlob(UefiFirmwareBlobEvent::UefiPlatformFirmwareBlob(blob)) => {
            format!("Blob base 0x{:x} length 0x{:x}", blob.blob_base, blob.blob_length)
        },
        Payload::StringOrBlob(UefiFirmwareBlobEvent::UefiPlatformFirmwareBlob2(blob)) => format!(
            "Blob {:?} base 0x{:x} length 0x{:x}",
            blob.blob_description, blob.blob_base, blob.blob_length
        ),
        Payload::Text(text) => format!("Text {:?}", text),
        Payload::Action(text) => format!("Action {:?}", text.trim_end_matches('\0')),
        Payload::EventTag(event) => format!(
            "EventTag id 0x{:x} ({} bytes)", event.tagged_event_id, event.tagged_event_data.len()
        ),
        Payload::Gpt(event) => format!(
            "Gpt disk {} with {} partitions",
            event.uefi_partition_header.disk_guid, event.partitions.len()
        ),
        Payload::Separator => "Separator".to_string(),
    }
}

/// Text report of a whole session
pub struct TextReport<'a> {
    event_log: &'a EventLog,
    raw: bool,
}

impl<'a> TextReport<'a> {
    pub fn new(event_log: &'a EventLog, raw: bool) -> Self {
        Self { event_log, raw }
    }
}

impl fmt::Display for TextReport<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let bootstrap = &self.event_log.bootstrap;
        writeln!(f, "[0] PCR {} {}", bootstrap.pcr_index, bootstrap.event_type_name())?;
        writeln!(f, "  sha1: {}", hex::encode(bootstrap.digest))?;
        writeln!(f, "  payload: {}", payload_summary(&bootstrap.payload, self.raw))?;

        for (index, record) in self.event_log.records.iter().enumerate() {
            writeln!(f, "[{}] PCR {} {}", index + 1, record.pcr_index, record.event_type_name())?;
            write_digest_lines(f, &record.digests)?;
            writeln!(f, "  payload: {}", payload_summary(&record.payload, self.raw))?;
        }

        writeln!(
            f, "{} records, {}, {} bytes remaining",
            self.event_log.record_count(), self.event_log.termination, self.event_log.remaining_bytes
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tcg_event_log::event::model::UefiPlatformFirmwareBlobEvent;

    #[test]
    fn test_raw_summary_dumps_hex_only_when_requested() {
        let payload = Payload::Raw(vec![0xde, 0xad]);
        assert_eq!(payload_summary(&payload, false), "Raw (2 bytes)");
        assert_eq!(payload_summary(&payload, true), "Raw (2 bytes)\n  data: dead");
    }

    #[test]
    fn test_blob_summary_uses_hex_addresses() {
        let payload = Payload::FirmwareBlob(UefiPlatformFirmwareBlobEvent { blob_base: 0xff000000, blob_length: 0x1000 });
        assert_eq!(payload_summary(&payload, false), "FirmwareBlob base 0xff000000 length 0x1000");
    }

    fn bootstrap_then_separator() -> Vec<u8> {
        let mut spec_id = b"Spec ID Event03\0".to_vec();
        spec_id.extend_from_slice(&[0, 0, 0, 0, 0, 2, 0, 2]);
        spec_id.extend_from_slice(&1u32.to_le_bytes());
        spec_id.extend_from_slice(&[0x04, 0x00, 0x14, 0x00, 0x00]);

        let mut data = vec![0u8; 4];
        data.extend_from_slice(&3u32.to_le_bytes());
        data.extend_from_slice(&[0u8; 20]);
        data.extend_from_slice(&(spec_id.len() as u32).to_le_bytes());
        data.extend_from_slice(&spec_id);

        data.extend_from_slice(&7u32.to_le_bytes());
        data.extend_from_slice(&4u32.to_le_bytes());
        data.extend_from_slice(&1u32.to_le_bytes());
        data.extend_from_slice(&[0x04, 0x00]);
        data.extend_from_slice(&[0xab; 20]);
        data.extend_from_slice(&0u32.to_le_bytes());
        data
    }

    #[test]
    fn test_text_report_lists_every_record() {
        let event_log = EventLog::parse(&bootstrap_then_separator()).unwrap();
        let text = TextReport::new(&event_log, false).to_string();
        let lines: Vec<&str> = text.lines().collect();

        assert_eq!(lines[0], "[0] PCR 0 EV_NO_ACTION");
        assert!(lines[2].starts_with("  payload: SpecId \"Spec ID Event03\""), "line: {}", lines[2]);
        assert_eq!(lines[3], "[1] PCR 7 EV_SEPARATOR");
        assert_eq!(lines[4], format!("  sha1: {}", "ab".repeat(20)));
        assert_eq!(lines[5], "  payload: Separator");
        assert_eq!(lines[6], "2 records, end of stream, 0 bytes remaining");
    }
}
