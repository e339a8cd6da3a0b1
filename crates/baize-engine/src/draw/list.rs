//! Immediate-mode draw list.
//!
//! Games record primitive shapes and text every frame; the host canvas
//! replays them. Shapes live in a flat `f32` buffer (read directly out of
//! WASM memory), text labels are serialised to JSON because they carry
//! strings.
//!
//! ```ignore
//! ctx.draw.clear();
//! ctx.draw.fill_circle(Vec2::new(100.0, 100.0), 8.0, DrawColor::WHITE);
//! ctx.draw.dashed_line(a, b, 2.0, DrawColor::WHITE);
//! ctx.draw.text("FOUL", Vec2::new(600.0, 50.0), 32.0, TextAlign::Center, DrawColor::RED);
//! ```

use bytemuck::{Pod, Zeroable};
use glam::Vec2;
use serde::Serialize;

/// RGBA color for draw operations (components in 0.0 - 1.0).
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct DrawColor {
    pub r: f32,
    pub g: f32,
    pub b: f32,
    pub a: f32,
}

impl DrawColor {
    /// Create a color from RGBA components (0.0 - 1.0).
    pub const fn new(r: f32, g: f32, b: f32, a: f32) -> Self {
        Self { r, g, b, a }
    }

    /// Create a fully opaque color from RGB components.
    pub const fn rgb(r: f32, g: f32, b: f32) -> Self {
        Self { r, g, b, a: 1.0 }
    }

    /// Create a color from RGB u8 values (0-255) with full opacity.
    pub fn rgb8(r: u8, g: u8, b: u8) -> Self {
        Self {
            r: r as f32 / 255.0,
            g: g as f32 / 255.0,
            b: b as f32 / 255.0,
            a: 1.0,
        }
    }

    /// Create a color with the given alpha value.
    pub const fn with_alpha(self, a: f32) -> Self {
        Self { a, ..self }
    }

    pub const RED: Self = Self::rgb(1.0, 0.0, 0.0);
    pub const WHITE: Self = Self::rgb(1.0, 1.0, 1.0);
    pub const BLACK: Self = Self::rgb(0.0, 0.0, 0.0);
}

impl Default for DrawColor {
    fn default() -> Self {
        Self::WHITE
    }
}

/// Primitive kinds, stored in `DrawPrimitive::kind`.
/// Must stay in sync with the host-side replay code.
pub mod kind {
    pub const FILL_CIRCLE: f32 = 1.0;
    pub const STROKE_CIRCLE: f32 = 2.0;
    pub const LINE: f32 = 3.0;
    pub const ARC: f32 = 4.0;
    pub const FILL_RECT: f32 = 5.0;
    pub const STROKE_RECT: f32 = 6.0;
}

/// One shape on the wire. Field meaning depends on `kind`:
///
/// | kind          | x0, y0     | x1, y1           | size          | width  | dash |
/// |---------------|------------|------------------|---------------|--------|------|
/// | circles       | centre     | -                | radius        | stroke | -    |
/// | line          | start      | end              | -             | stroke | 0/1  |
/// | arc           | centre     | start/end angle  | radius        | stroke | -    |
/// | rects         | top-left   | width, height    | corner radius | stroke | -    |
#[repr(C)]
#[derive(Debug, Clone, Copy, Default, PartialEq, Pod, Zeroable)]
pub struct DrawPrimitive {
    pub kind: f32,
    pub x0: f32,
    pub y0: f32,
    pub x1: f32,
    pub y1: f32,
    pub size: f32,
    pub width: f32,
    pub dash: f32,
    pub r: f32,
    pub g: f32,
    pub b: f32,
    pub a: f32,
}

impl DrawPrimitive {
    /// Number of floats per primitive.
    pub const FLOATS: usize = 12;

    fn colored(kind: f32, color: DrawColor) -> Self {
        Self {
            kind,
            r: color.r,
            g: color.g,
            b: color.b,
            a: color.a,
            ..Self::default()
        }
    }
}

/// Horizontal anchor for a text label.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum TextAlign {
    Left,
    Center,
    Right,
}

/// A text label, anchored at `(x, y)`.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TextLabel {
    pub text: String,
    pub x: f32,
    pub y: f32,
    pub size: f32,
    pub align: TextAlign,
    pub color: DrawColor,
}

/// Per-frame list of draw commands.
#[derive(Debug, Default)]
pub struct DrawList {
    primitives: Vec<DrawPrimitive>,
    labels: Vec<TextLabel>,
}

impl DrawList {
    pub fn new() -> Self {
        Self {
            primitives: Vec::with_capacity(128),
            labels: Vec::with_capacity(8),
        }
    }

    /// Drop everything recorded so far. Call at the start of each frame.
    pub fn clear(&mut self) {
        self.primitives.clear();
        self.labels.clear();
    }

    pub fn fill_circle(&mut self, center: Vec2, radius: f32, color: DrawColor) {
        self.primitives.push(DrawPrimitive {
            x0: center.x,
            y0: center.y,
            size: radius,
            ..DrawPrimitive::colored(kind::FILL_CIRCLE, color)
        });
    }

    pub fn stroke_circle(&mut self, center: Vec2, radius: f32, width: f32, color: DrawColor) {
        self.primitives.push(DrawPrimitive {
            x0: center.x,
            y0: center.y,
            size: radius,
            width,
            ..DrawPrimitive::colored(kind::STROKE_CIRCLE, color)
        });
    }

    pub fn line(&mut self, from: Vec2, to: Vec2, width: f32, color: DrawColor) {
        self.push_line(from, to, width, false, color);
    }

    pub fn dashed_line(&mut self, from: Vec2, to: Vec2, width: f32, color: DrawColor) {
        self.push_line(from, to, width, true, color);
    }

    /// Stroke an arc between two angles (radians, clockwise in Y-down space).
    pub fn arc(
        &mut self,
        center: Vec2,
        radius: f32,
        start_angle: f32,
        end_angle: f32,
        width: f32,
        color: DrawColor,
    ) {
        self.primitives.push(DrawPrimitive {
            x0: center.x,
            y0: center.y,
            x1: start_angle,
            y1: end_angle,
            size: radius,
            width,
            ..DrawPrimitive::colored(kind::ARC, color)
        });
    }

    /// Fill an axis-aligned rectangle given its top-left corner.
    pub fn fill_rect(&mut self, top_left: Vec2, size: Vec2, corner_radius: f32, color: DrawColor) {
        self.primitives.push(DrawPrimitive {
            x0: top_left.x,
            y0: top_left.y,
            x1: size.x,
            y1: size.y,
            size: corner_radius,
            ..DrawPrimitive::colored(kind::FILL_RECT, color)
        });
    }

    pub fn stroke_rect(
        &mut self,
        top_left: Vec2,
        size: Vec2,
        corner_radius: f32,
        width: f32,
        color: DrawColor,
    ) {
        self.primitives.push(DrawPrimitive {
            x0: top_left.x,
            y0: top_left.y,
            x1: size.x,
            y1: size.y,
            size: corner_radius,
            width,
            ..DrawPrimitive::colored(kind::STROKE_RECT, color)
        });
    }

    pub fn text(
        &mut self,
        text: impl Into<String>,
        at: Vec2,
        size: f32,
        align: TextAlign,
        color: DrawColor,
    ) {
        self.labels.push(TextLabel {
            text: text.into(),
            x: at.x,
            y: at.y,
            size,
            align,
            color,
        });
    }

    pub fn primitives(&self) -> &[DrawPrimitive] {
        &self.primitives
    }

    pub fn labels(&self) -> &[TextLabel] {
        &self.labels
    }

    /// Pointer to the primitive buffer for zero-copy reads from JS.
    pub fn primitives_ptr(&self) -> *const f32 {
        bytemuck::cast_slice::<DrawPrimitive, f32>(&self.primitives).as_ptr()
    }

    /// Number of primitives recorded this frame.
    pub fn primitive_count(&self) -> usize {
        self.primitives.len()
    }

    /// Text labels as a JSON array.
    pub fn labels_json(&self) -> serde_json::Result<String> {
        serde_json::to_string(&self.labels)
    }

    fn push_line(&mut self, from: Vec2, to: Vec2, width: f32, dashed: bool, color: DrawColor) {
        self.primitives.push(DrawPrimitive {
            x0: from.x,
            y0: from.y,
            x1: to.x,
            y1: to.y,
            width,
            dash: if dashed { 1.0 } else { 0.0 },
            ..DrawPrimitive::colored(kind::LINE, color)
        });
    }
}
