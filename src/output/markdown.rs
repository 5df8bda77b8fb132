//! Markdown leaderboard generation
//!
//! Players are ranked by average KDA, best first.

use crate::output::OutputResult;
use crate::storage::SummaryRecord;
use std::fs::File;
use std::io::Write;
use std::path::Path;

/// Writes the leaderboard to a markdown file
pub fn generate_markdown_leaderboard(records: &[SummaryRecord], output_path: &Path) -> OutputResult<()> {
    let markdown = format_markdown_leaderboard(records);

    let mut file = File::create(output_path)?;
    file.write_all(markdown.as_bytes())?;

    Ok(())
}

/// Formats summary records as a markdown leaderboard
///
/// Records are expected in rank order.
pub fn format_markdown_leaderboard(records: &[SummaryRecord]) -> String {
    let mut md = String::new();

    md.push_str("# Rift-Ripple Leaderboard\n\n");
    md.push_str(&format!("- **Players**: {}\n\n", records.len()));

    if records.is_empty() {
        md.push_str("_No player summaries stored yet._\n");
        return md;
    }

    md.push_str("| # | Player | Region | KDA | K / D / A | Win Rate | Damage | DPM | Gold | GPM | CS | CS/min | Vision | Impact |\n");
    md.push_str("|---|--------|--------|-----|-----------|----------|--------|-----|------|-----|----|--------|--------|--------|\n");

    for (rank, r) in records.iter().enumerate() {
        md.push_str(&format!(
            "| {} | {}#{} | {} | {:.2} | {:.1} / {:.1} / {:.1} | {:.1}% | {:.0} | {:.0} | {:.0} | {:.0} | {:.1} | {:.2} | {:.1} | {:.3} |\n",
            rank + 1,
            escape_cell(&r.display_name),
            escape_cell(&r.tag),
            r.region.as_deref().unwrap_or("-"),
            r.avg_kda,
            r.avg_kills,
            r.avg_deaths,
            r.avg_assists,
            r.win_rate,
            r.avg_damage,
            r.avg_dpm,
            r.avg_gold,
            r.avg_gpm,
            r.avg_cs,
            r.avg_cs_per_minute,
            r.avg_vision_score,
            r.avg_impact_score,
        ));
    }

    md
}

// Player names are free text
fn escape_cell(text: &str) -> String {
    text.replace('|', "\\|")
}
