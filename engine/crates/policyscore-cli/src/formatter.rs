//! Output formatting for score reports

use anyhow::Result;
use policyscore_core::ScoreReport;

/// Format report as human-readable text
pub fn format_text(report: &ScoreReport) -> String {
    let mut output = String::new();

    output.push_str("═══════════════════════════════════════════════════════════════\n");
    output.push_str("                    POLICY BASELINE SCORE\n");
    output.push_str("═══════════════════════════════════════════════════════════════\n\n");

    output.push_str(&format!(
        "Generated: {}\n",
        report.generated_at.format("%Y-%m-%d %H:%M:%S UTC")
    ));
    if let Some(ref hostname) = report.hostname {
        output.push_str(&format!("Host: {}\n", hostname));
    }
    output.push_str(&format!(
        "Score: {}/{} ({:.1}%)\n\n",
        report.total_points,
        report.total_max,
        report.percentage()
    ));

    for section in &report.sections {
        output.push_str("───────────────────────────────────────────────────────────────\n");
        output.push_str(&format!(
            "{}: {}/{}\n",
            section.header, section.points, section.max_points
        ));
        output.push_str("───────────────────────────────────────────────────────────────\n");
        for line in &section.diagnostics {
            output.push_str(&format!("  {}\n", line));
        }
        output.push('\n');
    }

    let failed = report.failed_sections().count();
    if failed > 0 {
        output.push_str(&format!(
            "{} section(s) could not be evaluated and scored zero\n",
            failed
        ));
    }

    output
}

/// Format report as JSON
pub fn format_json(report: &ScoreReport, pretty: bool) -> Result<String> {
    let json = if pretty {
        serde_json::to_string_pretty(report)?
    } else {
        serde_json::to_string(report)?
    };
    Ok(json + "\n")
}
