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

//! TCG event log decoding
//!
//! Decodes the binary measurement log written by UEFI firmware: the legacy
//! bootstrap record with its spec announcement, then crypto-agile records whose
//! payloads are dispatched by event type. Image-load payloads embed UEFI device
//! paths, which are decoded into typed nodes with a canonical text form.

pub mod byte_reader;
pub mod device_path;
pub mod digest;
pub mod error;
pub mod event;

pub use byte_reader::{ByteParseable, ByteReader};
pub use device_path::model::{DevicePath, DevicePathNode};
pub use device_path::parser::parse_device_path;
pub use digest::{AlgorithmId, DigestAlgorithmEntry, DigestRegistry};
pub use error::EventLogError;
pub use event::log::{EventLog, LogDriver, Termination};
pub use event::model::{
    event_type_name, EventRecordAgile, EventRecordLegacy, EventType, Payload, TpmDigestEntry,
};
pub use event::record::{read_agile, read_legacy};
