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


mod utils;

use tcg_event_log::event::model::{UefiFirmwareBlobEvent, UefiPlatformFirmwareBlobEvent};
use tcg_event_log::event::parser::{decode_agile_payload, decode_legacy_payload};
use tcg_event_log::{DigestRegistry, Payload};
use utils::{
    image_load_payload, node, spec_id_payload, end_node, utf16z,
    EV_EFI_BOOT_SERVICES_APPLICATION, EV_NO_ACTION, EV_POST_CODE, EV_SEPARATOR, TPM_ALG_SHA256,
};

const EV_EFI_ACTION: u32 = 0x80000007;
const EV_EFI_PLATFORM_FIRMWARE_BLOB: u32 = 0x80000008;
const EV_EFI_HCRTM_EVENT: u32 = 0x80000010;
const EV_EVENT_TAG: u32 = 0x00000006;

/// Test Objective: Verify that the bootstrap payload is decoded only under all three header conditions
/// Expected Result: SpecId for PCR 0 + EV_NO_ACTION + zero digest; Raw when any one condition changes
#[test]
fn test_bootstrap_requires_all_conditions() {
    let payload = spec_id_payload(&[(TPM_ALG_SHA256, 32)]);

    match decode_legacy_payload(0, EV_NO_ACTION, &[0u8; 20], &payload) {
        Payload::SpecId(event) => {
            assert!(event.has_expected_signature());
            assert_eq!(DigestRegistry::build(&event).size_of(TPM_ALG_SHA256), Some(32));
        },
        other => panic!("unexpected payload: {:?}", other),
    }

    let mut digest = [0u8; 20];
    digest[19] = 1;
    assert_eq!(decode_legacy_payload(1, EV_NO_ACTION, &[0u8; 20], &payload), Payload::Raw(payload.clone()));
    assert_eq!(decode_legacy_payload(0, EV_SEPARATOR, &[0u8; 20], &payload), Payload::Raw(payload.clone()));
    assert_eq!(decode_legacy_payload(0, EV_NO_ACTION, &digest, &payload), Payload::Raw(payload.clone()));
}

/// Test Objective: Verify that a truncated bootstrap payload stays opaque
/// Expected Result: Raw payload
#[test]
fn test_truncated_bootstrap_payload_is_raw() {
    let payload = spec_id_payload(&[(TPM_ALG_SHA256, 32)]);
    let short = &payload[..payload.len() - 3];
    assert_eq!(decode_legacy_payload(0, EV_NO_ACTION, &[0u8; 20], short), Payload::Raw(short.to_vec()));
}

/// Test Objective: Verify string-or-blob disambiguation on printable input
/// Expected Result: The bytes become a string payload
#[test]
fn test_string_or_blob_printable_is_string() {
    let payload = decode_agile_payload(EV_POST_CODE, b"ACPI DATA");
    assert_eq!(
        payload,
        Payload::StringOrBlob(UefiFirmwareBlobEvent::UefiPlatformFirmwareString("ACPI DATA".to_string()))
    );
}

/// Test Objective: Verify string-or-blob disambiguation on a 16-byte binary buffer
/// Expected Result: Version 1 blob with base and length
#[test]
fn test_string_or_blob_small_blob() {
    let mut data = 0xFFD0_0000u64.to_le_bytes().to_vec();
    data.extend_from_slice(&0x30000u64.to_le_bytes());

    let payload = decode_agile_payload(EV_POST_CODE, &data);
    assert_eq!(
        payload,
        Payload::StringOrBlob(UefiFirmwareBlobEvent::UefiPlatformFirmwareBlob(UefiPlatformFirmwareBlobEvent {
            blob_base: 0xFFD0_0000,
            blob_length: 0x30000,
        }))
    );
}

/// Test Objective: Verify string-or-blob disambiguation on a described blob
/// Expected Result: Version 2 blob carrying the description
#[test]
fn test_string_or_blob_described_blob() {
    let mut data = vec![4];
    data.extend_from_slice(b"POST");
    data.extend_from_slice(&0x1000u64.to_le_bytes());
    data.extend_from_slice(&0x200u64.to_le_bytes());

    match decode_agile_payload(EV_EFI_HCRTM_EVENT, &data) {
        Payload::StringOrBlob(UefiFirmwareBlobEvent::UefiPlatformFirmwareBlob2(blob)) => {
            assert_eq!(blob.blob_description, "POST");
            assert_eq!(blob.blob_base, 0x1000);
            assert_eq!(blob.blob_length, 0x200);
        },
        other => panic!("unexpected payload: {:?}", other),
    }
}

/// Test Objective: Verify that binary bytes matching neither blob shape stay opaque
/// Expected Result: Raw payload with the original bytes
#[test]
fn test_string_or_blob_neither_shape_is_raw() {
    // Description length 0xFF cannot fit in 20 bytes
    let mut data = vec![0xFF];
    data.extend_from_slice(&[0x01; 19]);
    assert_eq!(decode_agile_payload(EV_POST_CODE, &data), Payload::Raw(data.clone()));

    // Described blob cut off inside its base address
    let mut short = vec![3, b'a', b'b', b'c'];
    short.extend_from_slice(&[0x01; 4]);
    assert_eq!(decode_agile_payload(EV_POST_CODE, &short), Payload::Raw(short.clone()));
}

/// Test Objective: Verify that bytes after a complete described blob are ignored
/// Expected Result: Versioned blob with the description, base and length read from the front
#[test]
fn test_string_or_blob_described_blob_with_trailing_bytes() {
    let mut data = vec![3, b'a', b'b', b'c'];
    data.extend_from_slice(&0xFFE0_0000u64.to_le_bytes());
    data.extend_from_slice(&0x20_0000u64.to_le_bytes());
    data.extend_from_slice(&[0, 0]);

    match decode_agile_payload(EV_POST_CODE, &data) {
        Payload::StringOrBlob(UefiFirmwareBlobEvent::UefiPlatformFirmwareBlob2(blob)) => {
            assert_eq!(blob.blob_description, "abc");
            assert_eq!(blob.blob_base, 0xFFE0_0000);
            assert_eq!(blob.blob_length, 0x20_0000);
        },
        other => panic!("unexpected payload: {:?}", other),
    }
}

/// Test Objective: Verify the image load routine decodes the embedded device path
/// Expected Result: Image fields and device path text are available
#[test]
fn test_image_load_with_device_path() {
    let mut path = node(0x04, 0x04, &utf16z("\\EFI\\BOOT\\BOOTX64.EFI"));
    path.extend_from_slice(&end_node());

    match decode_agile_payload(EV_EFI_BOOT_SERVICES_APPLICATION, &image_load_payload(&path)) {
        Payload::ImageLoad(event) => {
            assert_eq!(event.image_location_in_memory, 0x7000_0000);
            assert_eq!(event.length_of_device_path, path.len() as u64);
            assert_eq!(event.device_path.to_string(), "\\EFI\\BOOT\\BOOTX64.EFI");
        },
        other => panic!("unexpected payload: {:?}", other),
    }
}

/// Test Objective: Verify that a zero device path length skips device path decoding
/// Expected Result: Empty device path
#[test]
fn test_image_load_without_device_path() {
    match decode_agile_payload(EV_EFI_BOOT_SERVICES_APPLICATION, &image_load_payload(&[])) {
        Payload::ImageLoad(event) => assert!(event.device_path.is_empty()),
        other => panic!("unexpected payload: {:?}", other),
    }
}

#[test]
fn test_fixed_and_text_routines() {
    let mut blob = 0x10u64.to_le_bytes().to_vec();
    blob.extend_from_slice(&0x20u64.to_le_bytes());
    assert!(matches!(decode_agile_payload(EV_EFI_PLATFORM_FIRMWARE_BLOB, &blob), Payload::FirmwareBlob(_)));
    assert!(matches!(decode_agile_payload(EV_EFI_PLATFORM_FIRMWARE_BLOB, &blob[..8]), Payload::Raw(_)));

    assert_eq!(
        decode_agile_payload(EV_EFI_ACTION, b"Calling EFI Application from Boot Option"),
        Payload::Action("Calling EFI Application from Boot Option".to_string())
    );
    assert_eq!(decode_agile_payload(EV_SEPARATOR, &[0xFF; 4]), Payload::Separator);

    let mut tagged = 0x1234u32.to_le_bytes().to_vec();
    tagged.extend_from_slice(&2u32.to_le_bytes());
    tagged.extend_from_slice(&[9, 9]);
    match decode_agile_payload(EV_EVENT_TAG, &tagged) {
        Payload::EventTag(event) => {
            assert_eq!(event.tagged_event_id, 0x1234);
            assert_eq!(event.tagged_event_data, vec![9, 9]);
        },
        other => panic!("unexpected payload: {:?}", other),
    }
}

/// Test Objective: Verify that event types without a routine keep their bytes
/// Expected Result: Raw payload for an undefined tag and for EV_CPU_MICROCODE
#[test]
fn test_types_without_routine_are_raw() {
    assert_eq!(decode_agile_payload(0x1234_5678, &[1, 2, 3]), Payload::Raw(vec![1, 2, 3]));
    assert_eq!(decode_agile_payload(0x00000009, &[4, 5]), Payload::Raw(vec![4, 5]));
}
