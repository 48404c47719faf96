//! Color and styling helpers for CLI output.

use crate::analysis::ImpactLevel;
use colored::{ColoredString, Colorize};

use super::OutputConfig;

/// Semantic role of a piece of output text.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Tone {
    /// Valid reports, low impact
    Success,
    /// Errors, cycles
    Error,
    /// Warnings, medium impact
    Warning,
    /// Token, mode and platform ids
    Id,
    /// Field labels
    Muted,
    /// Section headers
    Heading,
    /// High impact
    Alarm,
}

impl Tone {
    fn apply(self, text: &str) -> ColoredString {
        match self {
            Self::Success => text.green(),
            Self::Error => text.red(),
            Self::Warning => text.yellow(),
            Self::Id => text.cyan(),
            Self::Muted => text.dimmed(),
            Self::Heading => text.bold(),
            Self::Alarm => text.red().bold(),
        }
    }
}

impl From<ImpactLevel> for Tone {
    fn from(impact: ImpactLevel) -> Self {
        match impact {
            ImpactLevel::Low => Self::Success,
            ImpactLevel::Medium => Self::Warning,
            ImpactLevel::High => Self::Alarm,
        }
    }
}

/// Style `text` for its role, or return it unchanged when colors are off.
pub(crate) fn paint(tone: Tone, text: &str, config: &OutputConfig) -> String {
    if config.use_colors {
        tone.apply(text).to_string()
    } else {
        text.to_string()
    }
}

/// Impact level text, colored by severity.
pub(crate) fn paint_impact(impact: ImpactLevel, config: &OutputConfig) -> String {
    paint(impact.into(), &impact.to_string(), config)
}
