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

//! Digest Registry
//!
//! The bootstrap record announces which hash algorithms the log uses and how long
//! each digest is. Crypto-agile records only carry algorithm ids, so the registry
//! built here is the sole source of digest lengths for the rest of the session.

use serde::Serialize;
use std::fmt;

use crate::event::model::EfiSpecIdEvent;

/// TPM hash algorithm identifier (TPM_ALG_ID)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum AlgorithmId {
    Sha1,
    Sha256,
    Sha384,
    Sha512,
    Sm3,
    Sha3_256,
    Sha3_384,
    Sha3_512,
    Unknown(u16),
}

impl From<u16> for AlgorithmId {
    fn from(value: u16) -> Self {
        match value {
            0x0004 => AlgorithmId::Sha1,
            0x000B => AlgorithmId::Sha256,
            0x000C => AlgorithmId::Sha384,
            0x000D => AlgorithmId::Sha512,
            0x0012 => AlgorithmId::Sm3,
            0x0027 => AlgorithmId::Sha3_256,
            0x0028 => AlgorithmId::Sha3_384,
            0x0029 => AlgorithmId::Sha3_512,
            other => AlgorithmId::Unknown(other),
        }
    }
}

impl From<AlgorithmId> for u16 {
    fn from(value: AlgorithmId) -> Self {
        match value {
            AlgorithmId::Sha1 => 0x0004,
            AlgorithmId::Sha256 => 0x000B,
            AlgorithmId::Sha384 => 0x000C,
            AlgorithmId::Sha512 => 0x000D,
            AlgorithmId::Sm3 => 0x0012,
            AlgorithmId::Sha3_256 => 0x0027,
            AlgorithmId::Sha3_384 => 0x0028,
            AlgorithmId::Sha3_512 => 0x0029,
            AlgorithmId::Unknown(raw) => raw,
        }
    }
}

impl AlgorithmId {
    /// Natural digest size of the algorithm, 0 when unknown
    ///
    /// Display only. Record decoding always takes sizes from the `DigestRegistry`.
    pub fn digest_size(&self) -> u16 {
        match self {
            AlgorithmId::Sha1 => 20,
            AlgorithmId::Sha256 | AlgorithmId::Sm3 | AlgorithmId::Sha3_256 => 32,
            AlgorithmId::Sha384 | AlgorithmId::Sha3_384 => 48,
            AlgorithmId::Sha512 | AlgorithmId::Sha3_512 => 64,
            AlgorithmId::Unknown(_) => 0,
        }
    }
}

impl fmt::Display for AlgorithmId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AlgorithmId::Sha1 => write!(f, "sha1"),
            AlgorithmId::Sha256 => write!(f, "sha256"),
            AlgorithmId::Sha384 => write!(f, "sha384"),
            AlgorithmId::Sha512 => write!(f, "sha512"),
            AlgorithmId::Sm3 => write!(f, "sm3"),
            AlgorithmId::Sha3_256 => write!(f, "sha3_256"),
            AlgorithmId::Sha3_384 => write!(f, "sha3_384"),
            AlgorithmId::Sha3_512 => write!(f, "sha3_512"),
            AlgorithmId::Unknown(raw) => write!(f, "UNKNOWN_0x{:04X}", raw),
        }
    }
}

impl Serialize for AlgorithmId {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: serde::Serializer {
        serializer.serialize_str(&self.to_string())
    }
}

/// One `(algorithm_id, digest_size)` pair from the spec-announcement payload
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct DigestAlgorithmEntry {
    pub algorithm_id: u16,
    pub digest_size: u16,
}

impl DigestAlgorithmEntry {
    pub fn new(algorithm_id: u16, digest_size: u16) -> Self {
        Self { algorithm_id, digest_size }
    }

    pub fn algorithm(&self) -> AlgorithmId {
        AlgorithmId::from(self.algorithm_id)
    }
}

/// Ordered algorithm-to-size table for one decoding session
///
/// Entries keep declaration order and duplicates are not merged. The registry is
/// immutable once built.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize)]
pub struct DigestRegistry {
    entries: Vec<DigestAlgorithmEntry>,
}

impl DigestRegistry {
    /// Build the registry from a decoded spec-announcement payload
    pub fn build(spec_event: &EfiSpecIdEvent) -> Self {
        Self::from(spec_event.digest_algorithms.clone())
    }

    /// Digest length for `algorithm_id`, first declaration wins
    pub fn size_of(&self, algorithm_id: u16) -> Option<u16> {
        self.entries.iter()
            .find(|entry| entry.algorithm_id == algorithm_id)
            .map(|entry| entry.digest_size)
    }

    pub fn entries(&self) -> &[DigestAlgorithmEntry] {
        &self.entries
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl From<Vec<DigestAlgorithmEntry>> for DigestRegistry {
    fn from(entries: Vec<DigestAlgorithmEntry>) -> Self {
        Self { entries }
    }
}

impl fmt::Display for DigestRegistry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let parts: Vec<String> = self.entries.iter()
            .map(|entry| format!("{}:{}", entry.algorithm(), entry.digest_size))
            .collect();
        write!(f, "[{}]", parts.join(", "))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_size_of_keeps_declaration_order() {
        let registry = DigestRegistry::from(vec![
            DigestAlgorithmEntry::new(0x000B, 32),
            DigestAlgorithmEntry::new(0x0004, 20),
            DigestAlgorithmEntry::new(0x000B, 48),
        ]);
        assert_eq!(registry.len(), 3);
        assert_eq!(registry.size_of(0x000B), Some(32));
        assert_eq!(registry.size_of(0x0004), Some(20));
        assert_eq!(registry.size_of(0x0063), None);
        assert_eq!(registry.entries()[2].digest_size, 48);
    }

    #[test]
    fn test_algorithm_id_round_trips_raw_value() {
        assert_eq!(AlgorithmId::from(0x000B), AlgorithmId::Sha256);
        assert_eq!(u16::from(AlgorithmId::from(0x1234)), 0x1234);
        assert_eq!(AlgorithmId::from(0x1234).to_string(), "UNKNOWN_0x1234");
        assert_eq!(AlgorithmId::Sha384.digest_size(), 48);
    }

    #[test]
    fn test_registry_display() {
        let registry = DigestRegistry::from(vec![
            DigestAlgorithmEntry::new(0x0004, 20),
            DigestAlgorithmEntry::new(0x000B, 32),
        ]);
        assert_eq!(registry.to_string(), "[sha1:20, sha256:32]");
    }
}
