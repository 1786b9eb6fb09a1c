use egui::{Color32, Pos2, Rect, Vec2, pos2};
use serde::{Deserialize, Serialize};

/// Heuristic glyph advance as a fraction of the font size. The core must
/// stay renderer-independent, so hit-testing measures text with this
/// approximation; the renderer lays glyphs out with real font metrics.
const ADVANCE_PER_CHAR: f32 = 0.6;
/// Line height as a fraction of the font size.
const LINE_HEIGHT: f32 = 1.2;

#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TextVariant {
    #[default]
    Plain,
    /// Decorated text rendered with a gradient fill; `gradient_id` on the
    /// element names which one.
    Decorated,
}

/// A text note anchored at its top-left corner.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TextElement {
    pub position: Pos2,
    pub text: String,
    pub font_size: f32,
    pub variant: TextVariant,
    pub gradient_id: Option<String>,
    pub color: Color32,
}

impl TextElement {
    pub fn new(position: Pos2, text: impl Into<String>, font_size: f32, color: Color32) -> Self {
        Self {
            position,
            text: text.into(),
            font_size,
            variant: TextVariant::default(),
            gradient_id: None,
            color,
        }
    }

    pub fn line_height(&self) -> f32 {
        self.font_size * LINE_HEIGHT
    }

    /// Bounding box unioned over all lines, using the heuristic advance.
    /// An empty string still occupies one line so a freshly placed note
    /// can be hit and edited.
    pub fn bounds(&self) -> Rect {
        let longest_line = self.text.lines().map(|l| l.chars().count()).max().unwrap_or(0);
        let line_count = self.text.lines().count().max(1);

        let width = (longest_line.max(1) as f32) * self.font_size * ADVANCE_PER_CHAR;
        let height = line_count as f32 * self.line_height();
        Rect::from_min_size(self.position, egui::vec2(width, height))
    }

    pub fn translate(&mut self, delta: Vec2) {
        self.position += delta;
    }

    pub fn scale_about(&mut self, anchor: Pos2, scale_x: f32, scale_y: f32) {
        self.position = pos2(
            anchor.x + (self.position.x - anchor.x) * scale_x,
            anchor.y + (self.position.y - anchor.y) * scale_y,
        );
        self.font_size *= (scale_x + scale_y) / 2.0;
    }
}
