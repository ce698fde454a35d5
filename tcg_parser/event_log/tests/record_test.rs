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

use tcg_event_log::{
    read_agile, read_legacy, ByteReader, DigestAlgorithmEntry, DigestRegistry, EventLogError, Payload,
};
use utils::{agile_record, legacy_record, EV_EFI_VARIABLE_BOOT, EV_NO_ACTION, EV_SEPARATOR};

fn registry(entries: &[(u16, u16)]) -> DigestRegistry {
    DigestRegistry::from(
        entries.iter()
            .map(|(algorithm_id, digest_size)| DigestAlgorithmEntry::new(*algorithm_id, *digest_size))
            .collect::<Vec<_>>()
    )
}

/// Test Objective: Verify that digest lengths come from the registry in stream order
/// Expected Result: 32 bytes for id 4, then 20 bytes for id 11, and the whole record is consumed
#[test]
fn test_agile_digests_follow_registry_sizes() {
    let registry = registry(&[(4, 32), (11, 20)]);
    let data = agile_record(7, EV_SEPARATOR, &[(4, vec![0x44; 32]), (11, vec![0xBB; 20])], &[0u8; 4]);

    let mut reader = ByteReader::new(&data);
    let record = read_agile(&mut reader, &registry).unwrap();

    assert_eq!(record.pcr_index, 7);
    assert_eq!(record.digests.len(), 2);
    assert_eq!(record.digests[0].algorithm_id, 4);
    assert_eq!(record.digests[0].digest, vec![0x44; 32]);
    assert_eq!(record.digests[1].algorithm_id, 11);
    assert_eq!(record.digests[1].digest, vec![0xBB; 20]);
    assert_eq!(reader.position(), data.len() as u64);
    // 4 + 4 + 4 header bytes, 2 + 32 and 2 + 20 digest bytes, 4 + 4 payload bytes
    assert_eq!(data.len(), 12 + 34 + 22 + 8);
}

/// Test Objective: Verify that an algorithm id absent from the registry fails the record
/// Expected Result: UnknownAlgorithm(99)
#[test]
fn test_agile_unknown_algorithm_fails() {
    let registry = registry(&[(4, 32), (11, 20)]);
    let data = agile_record(0, EV_SEPARATOR, &[(99, vec![0; 20])], &[]);

    let mut reader = ByteReader::new(&data);
    let result = read_agile(&mut reader, &registry);
    assert_eq!(result.unwrap_err(), EventLogError::UnknownAlgorithm(99));
    assert!(read_agile(&mut ByteReader::new(&data), &registry).ok().is_none());
}

/// Test Objective: Verify that a digest running past the data fails the read
/// Expected Result: UnexpectedEnd error
#[test]
fn test_agile_truncated_digest_fails() {
    let registry = registry(&[(11, 32)]);
    let mut data = agile_record(0, EV_SEPARATOR, &[(11, vec![0; 32])], &[]);
    data.truncate(20);

    let result = read_agile(&mut ByteReader::new(&data), &registry);
    assert!(result.unwrap_err().is_end_of_data());
}

/// Test Objective: Verify payload isolation when the payload decoder fails
/// Expected Result: Raw payload of the declared size, and the next record still reads
#[test]
fn test_failed_payload_does_not_disturb_position() {
    let registry = registry(&[(11, 32)]);
    let mut data = agile_record(1, EV_EFI_VARIABLE_BOOT, &[(11, vec![1; 32])], &[0xEE; 10]);
    data.extend_from_slice(&agile_record(2, EV_SEPARATOR, &[(11, vec![2; 32])], &[0u8; 4]));

    let mut reader = ByteReader::new(&data);
    let first = read_agile(&mut reader, &registry).unwrap();
    assert_eq!(first.payload, Payload::Raw(vec![0xEE; 10]));

    let second = read_agile(&mut reader, &registry).unwrap();
    assert_eq!(second.pcr_index, 2);
    assert_eq!(second.payload, Payload::Separator);
    assert!(reader.is_end());
}

/// Test Objective: Verify legacy header reading and failure on a short payload
/// Expected Result: Non-bootstrap legacy record keeps raw bytes; a short payload fails
#[test]
fn test_read_legacy() {
    let data = legacy_record(1, EV_NO_ACTION, [0u8; 20], b"abc");
    let record = read_legacy(&mut ByteReader::new(&data)).unwrap();
    assert_eq!(record.pcr_index, 1);
    assert_eq!(record.event_type_name(), "EV_NO_ACTION");
    assert_eq!(record.payload, Payload::Raw(b"abc".to_vec()));

    let short = &data[..data.len() - 1];
    assert!(read_legacy(&mut ByteReader::new(short)).is_err());
}
