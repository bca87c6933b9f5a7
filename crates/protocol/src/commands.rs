use serde::{Deserialize, Serialize};

use crate::shared_str::SharedStr;
use crate::theme::ThemeToken;
use crate::types::{Point, Rect};

/// A single, stateless render instruction.
///
/// Views emit a `Vec<RenderCommand>` per frame. Renderers consume the
/// list in order; each command carries all the data it needs.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum RenderCommand {
    /// Draw a filled rectangle with an optional border.
    DrawRect {
        rect: Rect,
        color: ThemeToken,
        border_color: Option<ThemeToken>,
        corner_radius: f64,
    },

    /// Draw a text string anchored at `position`.
    ///
    /// `opacity` is in `[0, 1]` and multiplies the token's alpha.
    DrawText {
        position: Point,
        text: SharedStr,
        color: ThemeToken,
        font_size: f64,
        weight: FontWeight,
        opacity: f64,
        align: TextAlign,
    },

    /// Fill `rect` with a gradient that is fully `color` at `edge` and
    /// transparent at the opposite side.
    DrawFade {
        rect: Rect,
        color: ThemeToken,
        edge: FadeEdge,
    },

    /// Restrict subsequent drawing to a rectangular region.
    SetClip { rect: Rect },

    /// Remove the active clip region.
    ClearClip,

    /// Push an affine transform (applied to all subsequent commands until
    /// the matching `PopTransform`).
    PushTransform { translate: Point, scale: f64 },

    /// Pop the most recent transform.
    PopTransform,

    /// Begin a logical group (one wheel, one form section).
    BeginGroup {
        id: SharedStr,
        label: Option<SharedStr>,
    },

    /// End the current group.
    EndGroup,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum TextAlign {
    Left,
    Center,
    Right,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum FontWeight {
    Regular,
    Medium,
    Semibold,
}

impl FontWeight {
    /// CSS-style numeric weight.
    pub fn numeric(self) -> u16 {
        match self {
            FontWeight::Regular => 400,
            FontWeight::Medium => 500,
            FontWeight::Semibold => 600,
        }
    }
}

/// Which side of a `DrawFade` rect is opaque.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum FadeEdge {
    Top,
    Bottom,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn text_command_serializes_with_shared_label() {
        let cmd = RenderCommand::DrawText {
            position: Point::new(10.0, 20.0),
            text: SharedStr::from("15"),
            color: ThemeToken::WheelItemSelected,
            font_size: 24.0,
            weight: FontWeight::Semibold,
            opacity: 1.0,
            align: TextAlign::Center,
        };
        let json = serde_json::to_string(&cmd).unwrap_or_default();
        assert!(json.contains("\"DrawText\""));
        assert!(json.contains("\"text\":\"15\""));
        let back: Result<RenderCommand, _> = serde_json::from_str(&json);
        assert_eq!(back.ok(), Some(cmd));
    }

    #[test]
    fn transform_scale_is_a_plain_factor() {
        let cmd = RenderCommand::PushTransform {
            translate: Point::new(16.0, 120.0),
            scale: 1.0,
        };
        let json = serde_json::to_string(&cmd).unwrap_or_default();
        assert!(json.contains("\"scale\":1.0"));
        let back: Result<RenderCommand, _> = serde_json::from_str(&json);
        assert_eq!(back.ok(), Some(cmd));
    }

    #[test]
    fn weights_map_to_css_numbers() {
        assert_eq!(FontWeight::Regular.numeric(), 400);
        assert_eq!(FontWeight::Semibold.numeric(), 600);
    }
}
