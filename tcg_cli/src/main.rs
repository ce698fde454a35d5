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


mod render;

use anyhow::{Context, Result};
use clap::{Parser, ValueEnum};
use log::info;
use std::fs;
use std::path::PathBuf;
use tcg_event_log::EventLog;

use crate::render::TextReport;

#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum)]
enum OutputFormat {
    Text,
    Json,
}

/// Decode a TCG crypto-agile event log
#[derive(Parser)]
#[clap(author, version, about, long_about = None)]
struct Cli {
    /// Binary event log, e.g. /sys/kernel/security/tpm0/binary_bios_measurements
    input: PathBuf,

    /// Output format
    #[clap(short, long, value_enum, default_value = "text")]
    format: OutputFormat,

    /// Log level for diagnostics on stderr
    #[clap(long, default_value = "warn")]
    log_level: String,

    /// YAML logging configuration, takes precedence over --log-level
    #[clap(long)]
    log_config: Option<PathBuf>,

    /// Dump undecoded payload bytes as hex in text output
    #[clap(long)]
    raw: bool,
}

fn init_logging(cli: &Cli) -> Result<()> {
    match &cli.log_config {
        Some(path) => common_log::init_with_yaml(path)
            .with_context(|| format!("Failed to initialize logging from {}", path.display())),
        None => common_log::init_console(&cli.log_level)
            .context("Failed to initialize console logging"),
    }
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_logging(&cli)?;

    let data = fs::read(&cli.input)
        .with_context(|| format!("Failed to read event log {}", cli.input.display()))?;
    let event_log = EventLog::parse(&data)
        .with_context(|| format!("Failed to decode event log {}", cli.input.display()))?;
    info!(
        "Decoded {} records from {} ({})",
        event_log.record_count(), cli.input.display(), event_log.termination
    );

    match cli.format {
        OutputFormat::Text => print!("{}", TextReport::new(&event_log, cli.raw)),
        OutputFormat::Json => {
            let value = event_log.to_json_value()?;
            println!("{}", serde_json::to_string_pretty(&value)?);
        },
    }
    Ok(())
}
