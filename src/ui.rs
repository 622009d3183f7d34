//! Terminal output for the CLI.
//!
//! `format_*` functions are pure and return the text to print; `display_*` functions print it.

use crate::domain::BumpRule;
use crate::orchestration::BumpPlan;
use console::style;

/// Format and print an error message in red.
pub fn display_error(message: &str) {
    eprintln!("{} {}", style("ERROR:").red(), message);
}

/// Format and print a success message with green checkmark.
pub fn display_success(message: &str) {
    println!("{} {}", style("✓").green(), message);
}

/// Format and print a status message with yellow arrow.
pub fn display_status(message: &str) {
    println!("{} {}", style("→").yellow(), message);
}

/// Summary block of a planned change, one indented line per item.
///
/// `from` and `to` are inserted as given so callers can style them.
pub fn format_version_change(from: &str, to: &str, applied: &[BumpRule]) -> String {
    let mut lines = vec![format!("  From: {}", from), format!("  To:   {}", to)];
    if applied.is_empty() {
        lines.push("  No matching rules".to_string());
    }
    for rule in applied {
        let branch = rule.branch.as_deref().unwrap_or("*");
        lines.push(format!("  rule {} on {}", rule.trigger, branch));
    }
    lines.join("\n")
}

/// Display the proposed version change.
///
/// # Arguments
/// * `plan` - The computed change
/// * `dry_run` - Whether the change will be written
pub fn display_version_change(plan: &BumpPlan, dry_run: bool) {
    let header = if dry_run {
        "Proposed Version Change (dry run):"
    } else {
        "Version Change:"
    };
    println!("\n{}", style(header).bold());
    println!(
        "{}",
        format_version_change(
            &style(plan.current.to_string()).red().to_string(),
            &style(&plan.next).green().to_string(),
            &plan.applied
        )
    );
}
