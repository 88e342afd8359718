use colored::*;
use lanmap_common::network::device::Device;
use unicode_width::UnicodeWidthStr;

use crate::terminal::colors;
use crate::terminal::format::{self, Detail};

pub const TOTAL_WIDTH: usize = 64;
const KEY_WIDTH: usize = 7;

pub fn print(msg: &str) {
    println!("{msg}");
}

/// `───⟦ TITLE ⟧───` spanning [`TOTAL_WIDTH`] columns.
pub fn section(title: &str) {
    let label: String = format!("⟦ {} ⟧", title.to_uppercase());
    let dashes: usize = TOTAL_WIDTH.saturating_sub(UnicodeWidthStr::width(label.as_str()));
    let left: usize = dashes / 2;

    print(&format!(
        "{}{}{}",
        "─".repeat(left).bright_black(),
        label.bright_green(),
        "─".repeat(dashes - left).bright_black()
    ));
}

pub fn fat_separator() {
    print(&"═".repeat(TOTAL_WIDTH).bright_black().to_string());
}

pub fn print_status<T: AsRef<str>>(msg: T) {
    print(&format!(
        "{} {}",
        ">".color(colors::SEPARATOR),
        msg.as_ref().color(colors::TEXT_DEFAULT)
    ));
}

/// One rendered diagnostic line, `[timestamp] message`, with the stamp dimmed.
pub fn diagnostic(line: &str) {
    match line.split_once("] ") {
        Some((stamp, message)) if stamp.starts_with('[') => print(&format!(
            "{} {}",
            format!("{stamp}]").color(colors::SEPARATOR),
            message.color(colors::TEXT_DEFAULT)
        )),
        _ => print_status(line),
    }
}

pub fn device(idx: usize, device: &Device) {
    let name: ColoredString = if device.has_hardware_address() {
        device.display_name.color(colors::PRIMARY)
    } else {
        device.display_name.color(colors::UNKNOWN)
    };
    print(&format!(
        "{}{}{} {}",
        "[".color(colors::SEPARATOR),
        idx.to_string().color(colors::ACCENT),
        "]".color(colors::SEPARATOR),
        name
    ));
    details(&format::device_to_details(device));
}

fn details(rows: &[Detail]) {
    for (i, (key, value)) in rows.iter().enumerate() {
        let branch: &str = if i + 1 == rows.len() { "└─" } else { "├─" };
        let dots: String = ".".repeat(KEY_WIDTH.saturating_sub(key.len()));
        print(&format!(
            " {} {}{}{} {}",
            branch.bright_black(),
            key.color(colors::TEXT_DEFAULT),
            dots.color(colors::SEPARATOR),
            ":".color(colors::SEPARATOR),
            value
        ));
    }
}

pub fn centerln(msg: &str) {
    let space = " ".repeat(TOTAL_WIDTH.saturating_sub(console::measure_text_width(msg)) / 2);
    print(&format!("{space}{msg}{space}"));
}

pub fn no_results(label: &str) {
    centerln(&format!("No devices found in {label}").red().bold().to_string());
}
