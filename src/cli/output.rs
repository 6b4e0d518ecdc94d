//! CLI output formatting

use crate::core::Document;
use crate::plugin::RuleEvent;
use console::Emoji;

// Re-export style
pub use console::style;

// Emojis for output
pub static CHECK: Emoji<'_, '_> = Emoji("✅ ", "✓ ");
pub static CROSS: Emoji<'_, '_> = Emoji("❌ ", "✗ ");
pub static INFO: Emoji<'_, '_> = Emoji("ℹ️  ", "i ");
pub static WARN: Emoji<'_, '_> = Emoji("⚠️  ", "!");

/// Format a rule event for display
pub fn format_rule_event(event: &RuleEvent) -> String {
    match event {
        RuleEvent::DocumentRewritten { rule, document } => format!(
            "{} {} rewrote {}",
            CHECK,
            style(rule).cyan(),
            style(document).bold()
        ),
        RuleEvent::ChangeSetSkipped => format!(
            "{} {}",
            INFO,
            style("no path conditions, change set not fetched").dim()
        ),
        RuleEvent::ChangeSetFetched { files } => format!(
            "{} {} changed files",
            INFO,
            style(files).cyan()
        ),
        RuleEvent::Failed { rule, error } => format!(
            "{} {}: {}",
            CROSS,
            style(rule).red(),
            style(error).dim()
        ),
    }
}

/// One-line description of a document in the stream
pub fn format_document(document: &Document) -> String {
    let name = if document.name.is_empty() {
        "(unnamed)"
    } else {
        document.name.as_str()
    };
    let kind = if document.kind.is_empty() {
        "(no kind)"
    } else {
        document.kind.as_str()
    };

    if document.is_pipeline() {
        format!(
            "{} [{}] {} steps",
            style(name).bold(),
            kind,
            style(document.steps.len()).cyan()
        )
    } else {
        format!("{} [{}]", style(name).bold(), style(kind).dim())
    }
}
