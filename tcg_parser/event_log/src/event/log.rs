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

//! Event Log Parsing
//!
//! The log driver is a two-state machine over one forward-only reader:
//!
//! - `Bootstrap`: read the first record with the legacy header. It must carry the
//!   spec-announcement payload with the `Spec ID Event03` signature, otherwise the
//!   input is not a crypto-agile log and the session fails for good.
//! - `Streaming`: read crypto-agile records with the digest registry built from the
//!   bootstrap record until the data ends, an end-of-log marker appears, or a record
//!   cannot be read.
//!
//! Records decoded before streaming halts stay valid output. `EventLog` collects a
//! whole session; `LogDriver` exposes the same traversal record by record.

use log::{info, warn};
use serde_json::Value;
use std::fmt;

use crate::byte_reader::ByteReader;
use crate::digest::DigestRegistry;
use crate::error::EventLogError;
use crate::event::model::{EfiSpecIdEvent, EventRecordAgile, EventRecordLegacy, Payload};
use crate::event::record::{at_end_marker, read_agile, read_legacy};

/// How streaming ended
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Termination {
    /// Every byte of the input was consumed by complete records
    EndOfStream,
    /// An erased-flash record header (`0xFFFFFFFF`, `0xFFFFFFFF`) was found
    EndMarker,
    /// A record could not be read; the reason is kept for diagnostics
    Malformed(String),
}

impl fmt::Display for Termination {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Termination::EndOfStream => write!(f, "end of stream"),
            Termination::EndMarker => write!(f, "end-of-log marker"),
            Termination::Malformed(reason) => write!(f, "malformed record: {}", reason),
        }
    }
}

enum LogState {
    Bootstrap,
    Streaming(DigestRegistry),
    /// Bootstrap was rejected; nothing more is read
    Failed,
}

/// Record-by-record driver over a binary event log
///
/// Call `bootstrap` once, then iterate. Iteration yields nothing until the
/// bootstrap record has been accepted.
pub struct LogDriver<'a> {
    reader: ByteReader<'a>,
    state: LogState,
    termination: Option<Termination>,
}

impl<'a> LogDriver<'a> {
    pub fn new(data: &'a [u8]) -> Self {
        Self {
            reader: ByteReader::new(data),
            state: LogState::Bootstrap,
            termination: None,
        }
    }

    /// Read and validate the bootstrap record, then switch to streaming
    ///
    /// # Returns
    /// * The bootstrap record and the registry built from its payload
    ///
    /// # Errors
    /// * `EventLogError::InvalidBootstrap` - If the first record is unreadable, is not a
    ///   spec announcement, or carries an unexpected signature
    pub fn bootstrap(&mut self) -> Result<(EventRecordLegacy, DigestRegistry), EventLogError> {
        match self.state {
            LogState::Bootstrap => {},
            LogState::Streaming(_) => {
                return Err(EventLogError::InvalidBootstrap("Bootstrap record already read".to_string()));
            },
            LogState::Failed => {
                return Err(EventLogError::InvalidBootstrap("Bootstrap record was rejected".to_string()));
            },
        }

        let (record, registry) = match self.read_bootstrap() {
            Ok(bootstrap) => bootstrap,
            Err(e) => {
                self.state = LogState::Failed;
                return Err(e);
            },
        };
        self.state = LogState::Streaming(registry.clone());
        Ok((record, registry))
    }

    fn read_bootstrap(&mut self) -> Result<(EventRecordLegacy, DigestRegistry), EventLogError> {
        let record = read_legacy(&mut self.reader)
            .map_err(|e| EventLogError::InvalidBootstrap(format!("Failed to read first record: {}", e)))?;

        let spec_event: &EfiSpecIdEvent = match &record.payload {
            Payload::SpecId(event) => event,
            _ => {
                return Err(EventLogError::InvalidBootstrap(format!(
                    "First record is not a spec announcement: pcr {}, event type {}",
                    record.pcr_index, record.event_type_name()
                )));
            },
        };

        if !spec_event.has_expected_signature() {
            return Err(EventLogError::InvalidBootstrap(format!(
                "Unexpected signature: {:?}", spec_event.signature_text()
            )));
        }

        let registry = DigestRegistry::build(spec_event);
        info!("Event log announces digest algorithms {}", registry);
        Ok((record, registry))
    }

    /// Read the next crypto-agile record
    ///
    /// Returns `None` once streaming has halted; `termination` then says why.
    pub fn next_record(&mut self) -> Option<EventRecordAgile> {
        if self.termination.is_some() {
            return None;
        }
        let LogState::Streaming(registry) = &self.state else {
            return None;
        };

        if self.reader.is_end() {
            self.termination = Some(Termination::EndOfStream);
            return None;
        }
        if at_end_marker(&self.reader) {
            self.termination = Some(Termination::EndMarker);
            return None;
        }

        let start = self.reader.position();
        match read_agile(&mut self.reader, registry) {
            Ok(record) => Some(record),
            Err(e) => {
                warn!("Event log streaming halted at offset {}: {}", start, e);
                self.termination = Some(Termination::Malformed(e.to_string()));
                None
            },
        }
    }

    /// Why streaming halted, if it has
    pub fn termination(&self) -> Option<&Termination> {
        self.termination.as_ref()
    }

    /// Bytes not consumed by any complete record
    pub fn remaining(&self) -> u64 {
        self.reader.remaining()
    }

    /// Current offset into the input
    pub fn position(&self) -> u64 {
        self.reader.position()
    }
}

impl Iterator for LogDriver<'_> {
    type Item = EventRecordAgile;

    fn next(&mut self) -> Option<Self::Item> {
        self.next_record()
    }
}

/// A fully decoded event log session
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EventLog {
    pub bootstrap: EventRecordLegacy,
    pub registry: DigestRegistry,
    pub records: Vec<EventRecordAgile>,
    pub termination: Termination,
    /// Trailing bytes left undecoded when streaming halted
    pub remaining_bytes: u64,
}

impl EventLog {
    /// Decode a whole binary event log
    ///
    /// # Errors
    /// * `EventLogError::InvalidBootstrap` - If the first record is not a valid spec announcement.
    ///   No records are returned in that case.
    pub fn parse(data: &[u8]) -> Result<Self, EventLogError> {
        let mut driver = LogDriver::new(data);
        let (bootstrap, registry) = driver.bootstrap()?;

        let records: Vec<EventRecordAgile> = driver.by_ref().collect();
        let termination = driver.termination()
            .cloned()
            .unwrap_or(Termination::EndOfStream);

        Ok(Self {
            bootstrap,
            registry,
            records,
            termination,
            remaining_bytes: driver.remaining(),
        })
    }

    /// Spec announcement carried by the bootstrap record
    pub fn spec_id(&self) -> Option<&EfiSpecIdEvent> {
        match &self.bootstrap.payload {
            Payload::SpecId(event) => Some(event),
            _ => None,
        }
    }

    /// Number of records, bootstrap included
    pub fn record_count(&self) -> usize {
        self.records.len() + 1
    }

    /// Serialize the whole session to a JSON value
    ///
    /// # Errors
    /// * `EventLogError::InputError` - If serialization fails
    pub fn to_json_value(&self) -> Result<Value, EventLogError> {
        serde_json::to_value(self)
            .map_err(|e| EventLogError::InputError(format!("Failed to serialize event log: {}", e)))
    }
}
