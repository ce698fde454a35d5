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


use thiserror::Error;

#[derive(Error, Debug)]
pub enum LogError {
    #[error("Failed to read log config: {0}")]
    ConfigRead(String),

    #[error("Failed to parse log config: {0}")]
    ConfigParse(String),

    #[error("Failed to create appender: {0}")]
    Appender(String),

    #[error("Failed to build log4rs config: {0}")]
    Build(String),

    #[error("Logger already initialized")]
    AlreadyInitialized,
}
