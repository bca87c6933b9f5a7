use serde::{Deserialize, Serialize};

/// Semantic color tokens resolved by the renderer's active theme.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ThemeToken {
    Background,
    Surface,
    Border,

    TextPrimary,
    TextSecondary,
    TextMuted,

    // Wheel
    WheelItemText,
    WheelItemSelected,
    SelectionBand,
    SelectionBorder,
    FadeOverlay,

    // Form
    SectionHeading,
    ColumnLabel,
    SummaryBackground,
    SummaryText,
    FocusRing,
}
