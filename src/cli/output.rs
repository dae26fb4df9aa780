//! CLI output formatting

use crate::core::ResetConfig;
use console::Emoji;

// Re-export style
pub use console::style;

// Emojis for output
pub static CHECK: Emoji<'_, '_> = Emoji("✅ ", "✓ ");
pub static CROSS: Emoji<'_, '_> = Emoji("❌ ", "✗ ");
pub static INFO: Emoji<'_, '_> = Emoji("ℹ️  ", "i ");
pub static ROCKET: Emoji<'_, '_> = Emoji("🚀 ", "> ");

/// One line per reset step, for the startup banner
pub fn format_steps(config: &ResetConfig) -> Vec<String> {
    config
        .steps
        .iter()
        .enumerate()
        .map(|(i, step)| {
            let action = match (&step.command, step.delay_secs) {
                (Some(program), _) if step.args.is_empty() => program.clone(),
                (Some(program), _) => format!("{} {}", program, step.args.join(" ")),
                (None, secs) => format!("wait {}s", secs.unwrap_or_default()),
            };
            format!(
                "  {}. {} {}",
                i + 1,
                style(&step.name).bold(),
                style(action).dim()
            )
        })
        .collect()
}
