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


use log::LevelFilter;
use log4rs::append::console::{ConsoleAppender, Target};
use log4rs::append::rolling_file::policy::compound::roll::fixed_window::FixedWindowRoller;
use log4rs::append::rolling_file::policy::compound::trigger::size::SizeTrigger as SizeBasedTriggerPolicy;
use log4rs::append::rolling_file::policy::compound::CompoundPolicy;
use log4rs::{
    append::rolling_file::RollingFileAppender,
    append::Append,
    config::{Appender, Root},
    encode::pattern::PatternEncoder,
    Config, Handle,
};
use std::path::PathBuf;

use crate::config::{LogConfig, LoggerConfig};
use crate::error::LogError;

const LOG_PATTERN: &str = "{d(%Y-%m-%d %H:%M:%S:%3f)} {l} [{M}:{L}] - {m}{n}";
const ROOT_PREFIX: &str = "root";

pub struct Logger {
    _handle: Handle,
}

impl Logger {
    pub fn new_from_yaml(config_path: impl Into<PathBuf>) -> Result<Self, LogError> {
        let config = LogConfig::from_yaml(config_path)?;
        Self::new_from_config(config)
    }

    pub fn new_from_config(config: LogConfig) -> Result<Self, LogError> {
        let final_config = Self::build_config(&config)?;
        let handle = log4rs::init_config(final_config)
            .map_err(|_| LogError::AlreadyInitialized)?;
        Ok(Self { _handle: handle })
    }

    /// Translate a `LogConfig` into a log4rs config without installing it
    ///
    /// Every non-root entry gets its own appender and a non-additive logger. The
    /// root entry, or a stderr appender at info level when absent, backs the root.
    pub fn build_config(config: &LogConfig) -> Result<Config, LogError> {
        let mut log4rs_config = Config::builder();

        for logger_config in config.loggers.iter().filter(|l| l.path_prefix != ROOT_PREFIX) {
            let appender = Self::create_appender(logger_config)?;
            let appender_name = format!("{}_appender", logger_config.path_prefix);
            log4rs_config = log4rs_config
                .appender(Appender::builder().build(&appender_name, appender));

            let logger = log4rs::config::Logger::builder()
                .appender(appender_name)
                .additive(false)
                .build(
                    logger_config.path_prefix.clone(),
                    Self::parse_level(&logger_config.level),
                );
            log4rs_config = log4rs_config.logger(logger);
        }

        let root_appender_name = "root_appender";
        let default_root = LoggerConfig::console(ROOT_PREFIX, "info");
        let root_config = config.get_root_config().unwrap_or(&default_root);
        let root_appender = Self::create_appender(root_config)?;
        log4rs_config = log4rs_config
            .appender(Appender::builder().build(root_appender_name, root_appender));

        let root = Root::builder()
            .appender(root_appender_name)
            .build(Self::parse_level(&root_config.level));
        log4rs_config.build(root).map_err(|e| LogError::Build(e.to_string()))
    }

    fn create_appender(config: &LoggerConfig) -> Result<Box<dyn Append>, LogError> {
        let encoder = Box::new(PatternEncoder::new(LOG_PATTERN));

        let Some(log_file) = config.log_file() else {
            let console = ConsoleAppender::builder()
                .encoder(encoder)
                .target(Target::Stderr)
                .build();
            return Ok(Box::new(console));
        };

        if let Some(directory) = log_file.parent() {
            std::fs::create_dir_all(directory)
                .map_err(|e| LogError::Appender(format!("{}: {}", directory.display(), e)))?;
        }

        // Archives are gzip-compressed by extension
        let archived_log_pattern = format!("{}.{{}}.gz", log_file.display());

        let size_trigger = SizeBasedTriggerPolicy::new(config.max_file_size);
        let roller = FixedWindowRoller::builder()
            .build(&archived_log_pattern, config.max_zip_count)
            .map_err(|e| LogError::Appender(e.to_string()))?;
        let compound_policy = CompoundPolicy::new(Box::new(size_trigger), Box::new(roller));

        let appender = RollingFileAppender::builder()
            .encoder(encoder)
            .build(&log_file, Box::new(compound_policy))
            .map_err(|e| LogError::Appender(format!("{}: {}", log_file.display(), e)))?;

        Ok(Box::new(appender))
    }

    pub fn parse_level(level: &str) -> LevelFilter {
        match level.to_lowercase().as_str() {
            "trace" => LevelFilter::Trace,
            "debug" => LevelFilter::Debug,
            "info" => LevelFilter::Info,
            "warn" => LevelFilter::Warn,
            "error" => LevelFilter::Error,
            "off" => LevelFilter::Off,
            _ => LevelFilter::Info,
        }
    }
}
