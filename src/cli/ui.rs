use std::io::{stderr, Write};

use crossterm::{
    execute,
    style::{Color as CtColor, Print, ResetColor, SetForegroundColor},
};
use indicatif::{ProgressBar, ProgressStyle};
use owo_colors::OwoColorize;

use crate::core::Report;
use crate::error::LhrError;

fn colored() -> bool {
    std::env::var("NO_COLOR").is_err()
}

fn print_line(color: CtColor, marker: &str, message: &str) {
    let mut out = stderr();
    if colored() {
        let _ = execute!(
            out,
            SetForegroundColor(color),
            Print(marker),
            Print(message),
            Print("\n"),
            ResetColor
        );
    } else {
        let _ = writeln!(out, "{}{}", marker, message);
    }
}

/// Print success message
pub fn print_success(message: &str) {
    print_line(CtColor::Green, "✅ ", message);
}

/// Print warning message
pub fn print_warning(message: &str) {
    print_line(CtColor::Yellow, "⚠️  ", message);
}

/// Print error message
pub fn print_error(error: &LhrError) {
    print_line(CtColor::Red, "❌ ", &error.to_string());
}

/// Print info message
pub fn print_info(message: &str) {
    print_line(CtColor::Blue, "ℹ️  ", message);
}

/// One `source -> destination` line for list output
pub fn format_mapping(source: &std::path::Path, destination: &std::path::Path) -> String {
    format!("{} -> {}", source.display(), destination.display())
}

/// Progress bar for a restore of `total` files, drawn on stderr
pub fn create_progress_bar(total: u64, enabled: bool) -> ProgressBar {
    if !enabled {
        return ProgressBar::hidden();
    }

    let pb = ProgressBar::new(total);
    if let Ok(style) = ProgressStyle::with_template(
        "{spinner:.green} [{elapsed_precise}] {bar:30.cyan/blue} {pos}/{len} {wide_msg}",
    ) {
        pb.set_style(style.progress_chars("▰▰▱"));
    }
    pb.set_message("restoring");
    pb
}

/// Print the end-of-run summary and every recorded failure
pub fn print_report(report: &Report, restored: bool) {
    let mut counts = vec![
        format!("{} loaded", report.loaded),
        format!("{} matched", report.matched),
        format!("{} outside path", report.unmatched.len()),
        format!("{} resolved", report.resolved),
    ];
    if restored {
        counts.push(format!("{} copied", report.copied));
        counts.push(format!("{} unchanged", report.unchanged));
    }
    if report.skipped > 0 {
        counts.push(format!("{} skipped", report.skipped));
    }
    let summary = counts.join(", ");

    if report.failures.is_empty() && report.skipped == 0 {
        print_success(&summary);
        return;
    }

    print_warning(&summary);
    for (kind, label) in [
        ("parse", "unreadable history entries"),
        ("mapping", "unmappable resources"),
        ("validation", "destination collision groups"),
        ("copy", "failed copies"),
    ] {
        let count = report.count(kind);
        if count > 0 && colored() {
            eprintln!("  {} {}", count.to_string().red().bold(), label);
        } else if count > 0 {
            eprintln!("  {} {}", count, label);
        }
    }
    for failure in &report.failures {
        let tag = format!("[{}]", failure.kind());
        if colored() {
            eprintln!("  {} {}", tag.red(), failure);
        } else {
            eprintln!("  {} {}", tag, failure);
        }
    }
}

/// Resources skipped because they fall outside the selected path
pub fn print_unmatched(report: &Report) {
    for resource in &report.unmatched {
        if colored() {
            eprintln!("  {} {}", "skip".dimmed(), resource);
        } else {
            eprintln!("  skip {}", resource);
        }
    }
}
