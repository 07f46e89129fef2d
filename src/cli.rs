//! Helpers shared by the command-line binaries: logging setup and chain rendering

use crate::blockchain::{Block, ChainSnapshot};
use crate::config::LoggingConfig;
use crate::error::ChainError;
use colored::*;
use comfy_table::presets::UTF8_FULL;
use comfy_table::Color as TableColor;
use comfy_table::{Attribute, Cell, ContentArrangement, Table};
use std::str::FromStr;

/// Characters of a digest shown in compact views.
const SHORT_HASH_LEN: usize = 16;

/// Installs the fmt subscriber at the configured level, writing to stderr.
///
/// A second call is a no-op.
pub fn init_logging(config: &LoggingConfig) -> Result<(), ChainError> {
    let level = tracing::Level::from_str(&config.level)
        .map_err(|e| ChainError::ConfigError(format!("Invalid log level '{}': {}", config.level, e)))?;

    // Err only means a global subscriber is already installed.
    let _ = tracing_subscriber::fmt()
        .with_max_level(level)
        .with_target(false)
        .with_writer(std::io::stderr)
        .try_init();
    Ok(())
}

/// Payload as text when it is UTF-8, otherwise `0x`-prefixed hex.
pub fn display_data(block: &Block) -> String {
    match block.data_as_str() {
        Some(text) => text.to_string(),
        None => format!("0x{}", hex::encode(&block.data)),
    }
}

pub fn short_hash(hash: &str) -> &str {
    match hash.char_indices().nth(SHORT_HASH_LEN) {
        Some((end, _)) => &hash[..end],
        None => hash,
    }
}

/// One-line summary of a block.
pub fn render_block_line(block: &Block) -> String {
    format!(
        "{} {} | {} {} | {} {}",
        "Block".bright_cyan(),
        block.index.to_string().bold(),
        "Hash:".bright_black(),
        short_hash(&block.hash).yellow(),
        "Data:".bright_black(),
        display_data(block)
    )
}

pub fn render_chain(snapshot: &ChainSnapshot) -> Table {
    let mut table = Table::new();
    table
        .load_preset(UTF8_FULL)
        .set_content_arrangement(ContentArrangement::Dynamic)
        .set_header(vec![
            Cell::new("Index")
                .fg(TableColor::Cyan)
                .add_attribute(Attribute::Bold),
            Cell::new("Timestamp")
                .fg(TableColor::Cyan)
                .add_attribute(Attribute::Bold),
            Cell::new("Previous")
                .fg(TableColor::Cyan)
                .add_attribute(Attribute::Bold),
            Cell::new("Hash")
                .fg(TableColor::Cyan)
                .add_attribute(Attribute::Bold),
            Cell::new("Data")
                .fg(TableColor::Cyan)
                .add_attribute(Attribute::Bold),
        ]);

    for block in snapshot.iter() {
        let hash_color = if block.is_genesis() {
            TableColor::Magenta
        } else {
            TableColor::Yellow
        };
        table.add_row(vec![
            Cell::new(format!("#{}", block.index)).fg(TableColor::White),
            Cell::new(block.timestamp.format("%Y-%m-%d %H:%M:%S%.3f").to_string()).fg(TableColor::Grey),
            Cell::new(short_hash(&block.previous_hash)).fg(TableColor::Grey),
            Cell::new(short_hash(&block.hash)).fg(hash_color),
            Cell::new(display_data(block)).fg(TableColor::White),
        ]);
    }
    table
}
