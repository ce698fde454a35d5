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

use std::fs;

use tcg_event_log::{EventLog, EventLogError, LogDriver, Payload, Termination};
use utils::{
    agile_record, bootstrap_record, end_node, image_load_payload, legacy_record, node,
    spec_id_payload_with_signature, utf16z, write_log_file,
    EV_EFI_BOOT_SERVICES_APPLICATION, EV_NO_ACTION, EV_SEPARATOR, TPM_ALG_SHA1, TPM_ALG_SHA256,
};

/// Test Objective: Verify the minimal end-to-end session
/// Expected Result: One streaming record with a separator payload and the digest stored verbatim
#[test]
fn test_bootstrap_then_separator() {
    let digest: Vec<u8> = (0u8..20).collect();
    let mut data = bootstrap_record(&[(TPM_ALG_SHA256, 20)]);
    data.extend_from_slice(&agile_record(4, EV_SEPARATOR, &[(TPM_ALG_SHA256, digest.clone())], &[]));

    let event_log = EventLog::parse(&data).unwrap();
    assert_eq!(event_log.registry.size_of(TPM_ALG_SHA256), Some(20));
    assert_eq!(event_log.records.len(), 1);

    let record = &event_log.records[0];
    assert_eq!(record.pcr_index, 4);
    assert_eq!(record.event_type_name(), "EV_SEPARATOR");
    assert_eq!(record.payload, Payload::Separator);
    assert_eq!(record.digests[0].digest, digest);
    assert_eq!(event_log.termination, Termination::EndOfStream);
    assert_eq!(event_log.remaining_bytes, 0);
    assert_eq!(event_log.record_count(), 2);
}

/// Test Objective: Verify that a wrong signature is a fatal bootstrap failure
/// Expected Result: InvalidBootstrap error
#[test]
fn test_bad_signature_fails_session() {
    let payload = spec_id_payload_with_signature(b"Spec ID Event00\0", &[(TPM_ALG_SHA1, 20)], &[]);
    let mut data = legacy_record(0, EV_NO_ACTION, [0u8; 20], &payload);
    data.extend_from_slice(&agile_record(0, EV_SEPARATOR, &[(TPM_ALG_SHA1, vec![0; 20])], &[]));

    let result = EventLog::parse(&data);
    assert!(matches!(result, Err(EventLogError::InvalidBootstrap(_))));
}

/// Test Objective: Verify that a first record that is not the spec announcement fails the session
/// Expected Result: InvalidBootstrap for a non-zero PCR and for empty input
#[test]
fn test_non_bootstrap_first_record_fails_session() {
    let data = legacy_record(1, EV_NO_ACTION, [0u8; 20], &spec_id_payload_with_signature(
        b"Spec ID Event03\0", &[(TPM_ALG_SHA1, 20)], &[]
    ));
    assert!(matches!(EventLog::parse(&data), Err(EventLogError::InvalidBootstrap(_))));
    assert!(matches!(EventLog::parse(&[]), Err(EventLogError::InvalidBootstrap(_))));
}

/// Test Objective: Verify that the erased-flash header ends streaming cleanly
/// Expected Result: EndMarker termination and the marker bytes left unread
#[test]
fn test_end_marker_stops_streaming() {
    let mut data = bootstrap_record(&[(TPM_ALG_SHA1, 20)]);
    data.extend_from_slice(&agile_record(0, EV_SEPARATOR, &[(TPM_ALG_SHA1, vec![1; 20])], &[]));
    data.extend_from_slice(&[0xFF; 32]);

    let event_log = EventLog::parse(&data).unwrap();
    assert_eq!(event_log.records.len(), 1);
    assert_eq!(event_log.termination, Termination::EndMarker);
    assert_eq!(event_log.remaining_bytes, 32);
}

/// Test Objective: Verify that a malformed record halts streaming but keeps earlier records
/// Expected Result: Malformed termination naming the unknown algorithm, one record returned
#[test]
fn test_unknown_algorithm_halts_streaming() {
    let mut data = bootstrap_record(&[(TPM_ALG_SHA1, 20)]);
    data.extend_from_slice(&agile_record(0, EV_SEPARATOR, &[(TPM_ALG_SHA1, vec![1; 20])], &[]));
    data.extend_from_slice(&agile_record(1, EV_SEPARATOR, &[(TPM_ALG_SHA256, vec![2; 32])], &[]));
    data.extend_from_slice(&agile_record(2, EV_SEPARATOR, &[(TPM_ALG_SHA1, vec![3; 20])], &[]));

    let event_log = EventLog::parse(&data).unwrap();
    assert_eq!(event_log.records.len(), 1);
    match &event_log.termination {
        Termination::Malformed(reason) => assert!(reason.contains("0x000b"), "reason: {}", reason),
        other => panic!("unexpected termination: {:?}", other),
    }
    assert!(event_log.remaining_bytes > 0);
}

/// Test Objective: Verify the record-by-record driver state machine
/// Expected Result: Nothing is yielded before bootstrap; bootstrap cannot run twice
#[test]
fn test_log_driver_states() {
    let mut data = bootstrap_record(&[(TPM_ALG_SHA1, 20)]);
    data.extend_from_slice(&agile_record(0, EV_SEPARATOR, &[(TPM_ALG_SHA1, vec![1; 20])], &[]));
    data.extend_from_slice(&agile_record(1, EV_SEPARATOR, &[(TPM_ALG_SHA1, vec![2; 20])], &[]));

    let mut driver = LogDriver::new(&data);
    assert!(driver.next_record().is_none());
    assert!(driver.termination().is_none());

    let (bootstrap, registry) = driver.bootstrap().unwrap();
    assert_eq!(bootstrap.pcr_index, 0);
    assert_eq!(registry.len(), 1);
    assert!(driver.bootstrap().is_err());

    let pcrs: Vec<u32> = driver.by_ref().map(|record| record.pcr_index).collect();
    assert_eq!(pcrs, vec![0, 1]);
    assert_eq!(driver.termination(), Some(&Termination::EndOfStream));
}

/// Test Objective: Verify that a rejected bootstrap record ends the session for good
/// Expected Result: A valid announcement after the rejected record is never read
#[test]
fn test_rejected_bootstrap_is_terminal() {
    let mut data = legacy_record(1, EV_NO_ACTION, [0u8; 20], &[0u8; 4]);
    data.extend_from_slice(&bootstrap_record(&[(TPM_ALG_SHA1, 20)]));
    data.extend_from_slice(&agile_record(0, EV_SEPARATOR, &[(TPM_ALG_SHA1, vec![1; 20])], &[]));

    let mut driver = LogDriver::new(&data);
    assert!(matches!(driver.bootstrap(), Err(EventLogError::InvalidBootstrap(_))));
    let position = driver.position();

    match driver.bootstrap() {
        Err(EventLogError::InvalidBootstrap(reason)) => assert!(reason.contains("rejected"), "reason: {}", reason),
        other => panic!("unexpected bootstrap result: {:?}", other),
    }
    assert_eq!(driver.position(), position);
    assert!(driver.next_record().is_none());
    assert!(driver.termination().is_none());
}

/// Test Objective: Verify decoding a log read from disk and its JSON form
/// Expected Result: Hex digests, payload kinds and the device path text appear in the JSON value
#[test]
fn test_event_log_from_file_to_json() {
    let mut path = node(0x04, 0x04, &utf16z("\\EFI\\BOOT\\BOOTX64.EFI"));
    path.extend_from_slice(&end_node());

    let mut data = bootstrap_record(&[(TPM_ALG_SHA256, 32), (TPM_ALG_SHA1, 20)]);
    data.extend_from_slice(&agile_record(
        4,
        EV_EFI_BOOT_SERVICES_APPLICATION,
        &[(TPM_ALG_SHA256, vec![0xAB; 32]), (TPM_ALG_SHA1, vec![0xCD; 20])],
        &image_load_payload(&path),
    ));
    let file = write_log_file(&data);

    let bytes = fs::read(file.path()).unwrap();
    let event_log = EventLog::parse(&bytes).unwrap();
    let json_value = event_log.to_json_value().unwrap();

    assert_eq!(json_value["bootstrap"]["event_type"], "EV_NO_ACTION");
    assert_eq!(json_value["bootstrap"]["payload"]["kind"], "SpecId");
    assert_eq!(json_value["bootstrap"]["payload"]["value"]["signature"], "Spec ID Event03");
    assert_eq!(json_value["digest_algorithms"][1]["digest_size"], 20);

    let record = &json_value["records"][0];
    assert_eq!(record["event_type"], "EV_EFI_BOOT_SERVICES_APPLICATION");
    assert_eq!(record["digests"][0]["algorithm"], "sha256");
    assert_eq!(record["digests"][0]["digest"], "ab".repeat(32));
    assert_eq!(record["digests"][1]["digest"], "cd".repeat(20));
    assert_eq!(record["payload"]["kind"], "ImageLoad");
    assert_eq!(record["payload"]["value"]["image_location_in_memory"], "0x70000000");
    assert_eq!(record["payload"]["value"]["device_path"]["text"], "\\EFI\\BOOT\\BOOTX64.EFI");
    assert_eq!(record["payload"]["value"]["device_path"]["nodes"][0]["node"], "FilePath");
    assert_eq!(json_value["termination"], "end of stream");
}
