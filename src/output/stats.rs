//! Summary rendering for the command line

use crate::output::traits::CrawlSummary;

/// Formats a run summary for display
pub fn format_summary(summary: &CrawlSummary) -> String {
    let mut out = String::new();

    out.push_str("=== Scrape Summary ===\n\n");
    out.push_str(&format!(
        "  Pages processed: {} (depth {}/{})\n",
        summary.processed, summary.depth, summary.max_depth
    ));
    out.push_str(&format!("  Links visited: {}\n", summary.visited));
    out.push_str(&format!("  Final queue size: {}\n", summary.queued));
    out.push_str(&format!(
        "  Skipped external: {}\n",
        summary.skipped_external
    ));
    out.push_str(&format!("  Failed: {}\n", summary.failed));

    if summary.extracted > 0 || summary.fallback_extracted > 0 {
        out.push_str(&format!(
            "  Selector matches: {} (body fallback: {})\n",
            summary.extracted, summary.fallback_extracted
        ));
    }

    out.push_str(&format!(
        "  Success rate: {:.1}%\n",
        summary.success_rate()
    ));

    match &summary.converted_path {
        Some(path) => out.push_str(&format!("  Markdown: {}\n", path.display())),
        None => out.push_str("  Markdown: not written\n"),
    }

    if summary.cancelled {
        out.push_str("\n  Run was cancelled before the frontier drained\n");
    } else if summary.hit_depth_limit() {
        out.push_str("\n  Stopped at the maximum depth\n");
    }

    out
}

/// Prints a run summary to stdout
pub fn print_summary(summary: &CrawlSummary) {
    print!("{}", format_summary(summary));
}
