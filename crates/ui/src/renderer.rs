use egui::{Align2, Color32, CornerRadius, FontId, Mesh, Pos2, Rect, Shape, Stroke, StrokeKind};
use wheel_pick_protocol::{FadeEdge, FontWeight, RenderCommand, TextAlign};

use crate::theme::{self, ThemeMode};

/// Transform state for PushTransform/PopTransform.
#[derive(Debug, Clone, Copy)]
struct Transform {
    tx: f64,
    ty: f64,
    s: f64,
}

impl Transform {
    fn identity() -> Self {
        Self {
            tx: 0.0,
            ty: 0.0,
            s: 1.0,
        }
    }

    fn apply(&self, x: f64, y: f64, offset: Pos2) -> Pos2 {
        Pos2::new(
            (x * self.s + self.tx) as f32 + offset.x,
            (y * self.s + self.ty) as f32 + offset.y,
        )
    }

    fn rect(&self, r: &wheel_pick_protocol::Rect, offset: Pos2) -> Rect {
        Rect::from_min_size(
            self.apply(r.x, r.y, offset),
            egui::vec2((r.w * self.s) as f32, (r.h * self.s) as f32),
        )
    }
}

/// A vertical gradient from `color` at the open edge to transparent.
fn fade_mesh(rect: Rect, color: Color32, edge: FadeEdge) -> Mesh {
    let clear = Color32::from_rgba_unmultiplied(color.r(), color.g(), color.b(), 0);
    let (top, bottom) = match edge {
        FadeEdge::Top => (color, clear),
        FadeEdge::Bottom => (clear, color),
    };
    let mut mesh = Mesh::default();
    mesh.colored_vertex(rect.left_top(), top);
    mesh.colored_vertex(rect.right_top(), top);
    mesh.colored_vertex(rect.right_bottom(), bottom);
    mesh.colored_vertex(rect.left_bottom(), bottom);
    mesh.add_triangle(0, 1, 2);
    mesh.add_triangle(0, 2, 3);
    mesh
}

/// Render a list of `RenderCommand` into an egui `Painter`.
///
/// `offset` is the top-left pixel position of the rendering area.
pub fn render_commands(
    painter: &mut egui::Painter,
    commands: &[RenderCommand],
    offset: Pos2,
    mode: ThemeMode,
) {
    let mut transform_stack: Vec<Transform> = vec![Transform::identity()];
    let mut clip_stack: Vec<Rect> = Vec::new();

    for cmd in commands {
        let tf = transform_stack
            .last()
            .copied()
            .unwrap_or(Transform::identity());
        match cmd {
            RenderCommand::DrawRect {
                rect,
                color,
                border_color,
                corner_radius,
            } => {
                let egui_rect = tf.rect(rect, offset);
                if egui_rect.width() < 0.5 || egui_rect.height() < 0.5 {
                    continue;
                }
                // Cull off-screen
                if !painter.clip_rect().intersects(egui_rect) {
                    continue;
                }
                let radius = CornerRadius::same(corner_radius.clamp(0.0, 255.0) as u8);
                painter.rect_filled(egui_rect, radius, theme::resolve(*color, mode));
                if let Some(bc) = border_color {
                    painter.rect_stroke(
                        egui_rect,
                        radius,
                        Stroke::new(1.0, theme::resolve(*bc, mode)),
                        StrokeKind::Inside,
                    );
                }
            }

            RenderCommand::DrawText {
                position,
                text,
                color,
                font_size,
                weight,
                opacity,
                align,
            } => {
                let pos = tf.apply(position.x, position.y, offset);
                let size = (*font_size * tf.s) as f32;
                if size < 1.0 || *opacity <= 0.0 {
                    continue;
                }
                let text_color = theme::resolve(*color, mode).gamma_multiply(*opacity as f32);
                let anchor = match align {
                    TextAlign::Left => Align2::LEFT_CENTER,
                    TextAlign::Center => Align2::CENTER_CENTER,
                    TextAlign::Right => Align2::RIGHT_CENTER,
                };
                let font = FontId::proportional(size);
                painter.text(pos, anchor, text.as_str(), font.clone(), text_color);
                // The bundled fonts have one weight; overdraw to embolden.
                if matches!(weight, FontWeight::Semibold) {
                    let nudged = pos + egui::vec2(0.6, 0.0);
                    painter.text(nudged, anchor, text.as_str(), font, text_color);
                }
            }

            RenderCommand::DrawFade { rect, color, edge } => {
                let egui_rect = tf.rect(rect, offset);
                if !painter.clip_rect().intersects(egui_rect) {
                    continue;
                }
                let mesh = fade_mesh(egui_rect, theme::resolve(*color, mode), *edge);
                painter.add(Shape::mesh(mesh));
            }

            RenderCommand::SetClip { rect } => {
                let clip_rect = tf.rect(rect, offset);
                clip_stack.push(painter.clip_rect());
                let intersected = painter.clip_rect().intersect(clip_rect);
                painter.set_clip_rect(intersected);
            }

            RenderCommand::ClearClip => {
                if let Some(prev) = clip_stack.pop() {
                    painter.set_clip_rect(prev);
                }
            }

            RenderCommand::PushTransform { translate, scale } => {
                let parent = tf;
                transform_stack.push(Transform {
                    tx: parent.tx + translate.x * parent.s,
                    ty: parent.ty + translate.y * parent.s,
                    s: parent.s * scale,
                });
            }

            RenderCommand::PopTransform => {
                if transform_stack.len() > 1 {
                    transform_stack.pop();
                }
            }

            RenderCommand::BeginGroup { .. } | RenderCommand::EndGroup => {
                // Groups carry no visuals in egui
            }
        }
    }
}
