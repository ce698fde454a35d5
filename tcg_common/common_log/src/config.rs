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


use serde::Deserialize;
use std::path::PathBuf;

use crate::error::LogError;

const DEFAULT_MAX_FILE_SIZE: u64 = 10 * 1024 * 1024;
const DEFAULT_MAX_ZIP_COUNT: u32 = 6;

fn default_max_file_size() -> u64 {
    DEFAULT_MAX_FILE_SIZE
}

fn default_max_zip_count() -> u32 {
    DEFAULT_MAX_ZIP_COUNT
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct LogConfig {
    pub loggers: Vec<LoggerConfig>,
}

/// One logger, selected by module path prefix ("root" for the root logger)
///
/// Without `log_directory` and `log_file_name` the logger writes to stderr.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct LoggerConfig {
    pub path_prefix: String,
    pub level: String,
    #[serde(default)]
    pub log_directory: Option<String>,
    #[serde(default)]
    pub log_file_name: Option<String>,
    #[serde(default = "default_max_file_size")]
    pub max_file_size: u64,
    #[serde(default = "default_max_zip_count")]
    pub max_zip_count: u32,
}

impl LoggerConfig {
    /// Stderr logger for `path_prefix` at `level`
    pub fn console(path_prefix: &str, level: &str) -> Self {
        Self {
            path_prefix: path_prefix.to_string(),
            level: level.to_string(),
            log_directory: None,
            log_file_name: None,
            max_file_size: DEFAULT_MAX_FILE_SIZE,
            max_zip_count: DEFAULT_MAX_ZIP_COUNT,
        }
    }

    /// Full path of the log file, when the logger writes to a file
    pub fn log_file(&self) -> Option<PathBuf> {
        match (&self.log_directory, &self.log_file_name) {
            (Some(directory), Some(file_name)) => Some(PathBuf::from(directory).join(file_name)),
            _ => None,
        }
    }
}

impl LogConfig {
    pub fn from_yaml(path: impl Into<PathBuf>) -> Result<Self, LogError> {
        let path = path.into();
        let config_str = std::fs::read_to_string(&path)
            .map_err(|e| LogError::ConfigRead(format!("{}: {}", path.display(), e)))?;
        Self::from_yaml_str(&config_str)
    }

    pub fn from_yaml_str(config_str: &str) -> Result<Self, LogError> {
        serde_yaml::from_str(config_str).map_err(|e| LogError::ConfigParse(e.to_string()))
    }

    /// Single root logger on stderr
    pub fn console(level: &str) -> Self {
        Self { loggers: vec![LoggerConfig::console("root", level)] }
    }

    pub fn get_logger_config(&self, path_prefix: &str) -> Option<&LoggerConfig> {
        self.loggers.iter().find(|l| path_prefix.starts_with(&l.path_prefix))
    }

    pub fn get_root_config(&self) -> Option<&LoggerConfig> {
        self.get_logger_config("root")
    }
}
