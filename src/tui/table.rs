use owo_colors::OwoColorize;
use tabled::{
    Table,
    builder::Builder,
    settings::{
        Alignment, Modify, Style,
        object::{Columns, Rows},
        themes::Colorization,
    },
};

use super::style::*;

fn build(headers: Vec<&str>, rows: Vec<Vec<String>>) -> Table {
    let mut builder = Builder::default();
    builder.push_record(headers);
    for row in rows {
        builder.push_record(row);
    }

    let mut table = builder.build();
    table
        .with(Style::rounded())
        .with(Modify::new(Rows::first()).with(TABLE_HEADER_COLOR));

    table
}

/// Builds a table for home sections and search results
pub fn build_listing_table(headers: Vec<&str>, rows: Vec<Vec<String>>) -> String {
    let mut table = build(headers, rows);
    table
        .with(Colorization::columns(TABLE_COLORS_LISTING))
        .with(Modify::new(Columns::first()).with(Alignment::center()));

    table.to_string()
}

/// Builds a table for the episode list of an anime
pub fn build_episodes_table(headers: Vec<&str>, rows: Vec<Vec<String>>) -> String {
    let mut table = build(headers, rows);
    table
        .with(Colorization::columns(TABLE_COLORS_EPISODES))
        .with(Modify::new(Columns::first()).with(Alignment::right()));

    table.to_string()
}

pub fn build_sources_table(headers: Vec<&str>, rows: Vec<Vec<String>>) -> String {
    let mut table = build(headers, rows);
    table.with(Colorization::columns(TABLE_COLORS_SOURCES));

    table.to_string()
}

/// Formats a title header
pub fn title(title: &str) -> String {
    title.cyan().bold().to_string()
}

/// Formats a failed envelope
pub fn failure(status: u16, message: &str) -> String {
    format!("{} {}", format!("[{status}]").red().bold(), message.red())
}

/// Cuts long payloads to a readable width
pub fn shorten(text: &str) -> String {
    match text.char_indices().nth(MAX_PAYLOAD_WIDTH) {
        Some((end, _)) => format!("{}…", &text[..end]),
        None => text.to_string(),
    }
}
