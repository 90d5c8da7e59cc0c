// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Output formats and rendering helpers for the listing commands.

use clap::ValueEnum;
use delta_core::run::RunMetadata;

/// `list-runs` output format.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, ValueEnum)]
pub enum OutputFormat {
    /// Column table for humans.
    #[default]
    Text,
    /// Full metadata as a JSON array.
    Json,
    /// Bare run IDs, one per line, for scripting.
    Raw,
}

/// Render run metadata in the requested format.
pub fn render_runs(runs: &[RunMetadata], format: OutputFormat, now_ms: u64) -> String {
    match format {
        OutputFormat::Text => render_table(runs, now_ms),
        OutputFormat::Json => {
            serde_json::to_string_pretty(runs).unwrap_or_else(|_| "[]".to_string())
        }
        OutputFormat::Raw => {
            runs.iter().map(|m| format!("{}\n", m.run_id)).collect()
        }
    }
}

fn render_table(runs: &[RunMetadata], now_ms: u64) -> String {
    if runs.is_empty() {
        return "no runs\n".to_string();
    }
    let id_width = runs
        .iter()
        .map(|m| m.run_id.as_str().len())
        .max()
        .unwrap_or(2)
        .max(2);
    let status_width = runs
        .iter()
        .map(|m| m.status.to_string().len())
        .max()
        .unwrap_or(6)
        .max(6);

    let mut out = format!(
        "{:<id_width$}  {:<status_width$}  {:>4}  {:>5}  TASK\n",
        "ID", "STATUS", "ITER", "AGE",
    );
    for meta in runs {
        out.push_str(&format!(
            "{:<id_width$}  {:<status_width$}  {:>4}  {:>5}  {}\n",
            meta.run_id.as_str(),
            meta.status.to_string(),
            meta.iterations_completed,
            format_age(now_ms.saturating_sub(meta.start_time_ms)),
            truncate_task(&meta.task),
        ));
    }
    out
}

/// Compact elapsed time: `42s`, `17m`, `3h`, `12d`.
pub fn format_age(elapsed_ms: u64) -> String {
    let seconds = elapsed_ms / 1000;
    if seconds < 60 {
        format!("{}s", seconds)
    } else if seconds < 3600 {
        format!("{}m", seconds / 60)
    } else if seconds < 86_400 {
        format!("{}h", seconds / 3600)
    } else {
        format!("{}d", seconds / 86_400)
    }
}

fn truncate_task(task: &str) -> String {
    const LIMIT: usize = 60;
    let flat = task.replace('\n', " ");
    if flat.chars().count() <= LIMIT {
        flat
    } else {
        let prefix: String = flat.chars().take(LIMIT - 1).collect();
        format!("{}…", prefix)
    }
}

#[cfg(test)]
#[path = "output_tests.rs"]
mod tests;
