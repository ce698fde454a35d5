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


pub mod config;
pub mod error;
pub mod logger;

use std::{path::PathBuf, sync::OnceLock};

use crate::config::LogConfig;
use crate::error::LogError;

static LOGGER: OnceLock<logger::Logger> = OnceLock::new();

/// Initialize logging system
///
/// # Arguments
/// * `config_path` - Path to the logging configuration file
///
/// # Example
/// ```no_run
/// common_log::init_with_yaml("logging.yaml").expect("Failed to initialize logger");
/// log::info!("Logger initialized");
/// ```
pub fn init_with_yaml(config_path: impl Into<PathBuf>) -> Result<(), LogError> {
    let config = LogConfig::from_yaml(config_path)?;
    init_with_config(config)
}

/// Initialize logging system with config
///
/// # Arguments
/// * `config` - LogConfig info
///
/// # Example
/// ```no_run
/// use common_log::config::{LogConfig, LoggerConfig};
///
/// let mut root = LoggerConfig::console("root", "info");
/// root.log_directory = Some("logs".to_string());
/// root.log_file_name = Some("tcg-log.log".to_string());
/// let config = LogConfig { loggers: vec![root] };
/// common_log::init_with_config(config).expect("Failed to initialize logger");
/// ```
pub fn init_with_config(config: LogConfig) -> Result<(), LogError> {
    if LOGGER.get().is_some() {
        return Err(LogError::AlreadyInitialized);
    }
    let logger = logger::Logger::new_from_config(config)?;
    if LOGGER.set(logger).is_err() {
        return Err(LogError::AlreadyInitialized);
    }
    Ok(())
}

/// Initialize a stderr logger at `level`
pub fn init_console(level: &str) -> Result<(), LogError> {
    init_with_config(LogConfig::console(level))
}

pub fn is_initialized() -> bool {
    LOGGER.get().is_some()
}

// Re-export log macros for convenient use in other modules
pub use log::{debug, error, info, trace, warn};
