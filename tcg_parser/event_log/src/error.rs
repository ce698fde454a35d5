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

//! Error types for event log decoding

use thiserror::Error;

/// Errors produced while decoding a TCG event log
///
/// Only `InvalidBootstrap` is fatal to a whole session. The other variants end the
/// current read attempt; the log driver decides whether to stop or fall back.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum EventLogError {
    #[error("Unexpected end of data: requested {requested} bytes but only {remaining} bytes remain")]
    UnexpectedEnd { requested: u64, remaining: u64 },

    #[error("Unknown digest algorithm: 0x{0:04x}")]
    UnknownAlgorithm(u16),

    #[error("Invalid bootstrap record: {0}")]
    InvalidBootstrap(String),

    #[error("Input error: {0}")]
    InputError(String),
}

impl EventLogError {
    /// True when the error only reports that the input ran out
    pub fn is_end_of_data(&self) -> bool {
        matches!(self, EventLogError::UnexpectedEnd { .. })
    }
}
