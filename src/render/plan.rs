use crate::{
    assets::store::{AssetHandle, AssetResolver},
    experiment::catalog::ExperimentOutcome,
    foundation::core::{Point, Rgba8},
    session::state::ExperimentSession,
};

#[derive(Clone, Debug, Default, PartialEq, serde::Serialize)]
/// Flat, backend-agnostic list of draw primitives for one frame.
///
/// Ops are in painter's order: wires, then sprites, then text.
pub struct RenderPlan {
    pub ops: Vec<DrawOp>,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, serde::Serialize)]
#[serde(rename_all = "snake_case")]
pub enum TextRole {
    Status,
    StepCounter,
    StepText,
    Current,
    VoltageDrop,
    LedStatus,
    Info,
}

#[derive(Clone, Debug, PartialEq, serde::Serialize)]
#[serde(tag = "op", rename_all = "snake_case")]
pub enum DrawOp {
    Wire {
        from: String,
        to: String,
        start: Point,
        end: Point,
        color: Rgba8,
        width: f64,
    },
    Sprite {
        component: String,
        asset: AssetHandle,
        center: Point,
    },
    Text {
        role: TextRole,
        text: String,
        /// Baseline-left anchor.
        origin: Point,
        color: Rgba8,
        scale: f64,
    },
}

#[derive(Clone, Copy, Debug, PartialEq)]
/// Colors and text placement used by [`project_with_style`].
pub struct ProjectionStyle {
    pub text_origin: Point,
    pub line_pitch: f64,
    pub text_scale: f64,
    pub status_color: Rgba8,
    pub step_color: Rgba8,
    pub current_color: Rgba8,
    pub drop_color: Rgba8,
    pub led_color: Rgba8,
    pub info_color: Rgba8,
    pub wire_color: Rgba8,
    pub wire_width: f64,
}

impl Default for ProjectionStyle {
    fn default() -> Self {
        Self {
            text_origin: Point::new(10.0, 30.0),
            line_pitch: 30.0,
            text_scale: 0.6,
            status_color: Rgba8::opaque(0, 255, 0),
            step_color: Rgba8::opaque(255, 255, 255),
            current_color: Rgba8::opaque(255, 255, 0),
            drop_color: Rgba8::opaque(0, 200, 255),
            led_color: Rgba8::opaque(255, 128, 0),
            info_color: Rgba8::opaque(200, 200, 200),
            wire_color: Rgba8::opaque(255, 255, 0),
            wire_width: 3.0,
        }
    }
}

impl RenderPlan {
    pub fn texts(&self) -> impl Iterator<Item = (TextRole, &str)> {
        self.ops.iter().filter_map(|op| match op {
            DrawOp::Text { role, text, .. } => Some((*role, text.as_str())),
            _ => None,
        })
    }

    pub fn wires(&self) -> impl Iterator<Item = &DrawOp> {
        self.ops.iter().filter(|op| matches!(op, DrawOp::Wire { .. }))
    }

    pub fn sprites(&self) -> impl Iterator<Item = &DrawOp> {
        self.ops
            .iter()
            .filter(|op| matches!(op, DrawOp::Sprite { .. }))
    }
}

/// Project session state into draw ops with the default style.
pub fn project(session: &ExperimentSession, assets: &dyn AssetResolver) -> RenderPlan {
    project_with_style(session, assets, &ProjectionStyle::default())
}

#[tracing::instrument(skip_all)]
pub fn project_with_style(
    session: &ExperimentSession,
    assets: &dyn AssetResolver,
    style: &ProjectionStyle,
) -> RenderPlan {
    let mut ops = Vec::new();
    let mut text = Vec::new();
    let mut lines = TextLines::new(style);
    lines.push(&mut text, TextRole::Status, session.status(), style.status_color);

    let entry = if session.marker_in_view() {
        session.current_entry()
    } else {
        None
    };
    let Some(entry) = entry else {
        return RenderPlan { ops: text };
    };

    if entry.definition.is_some() {
        let layout = session.layout();

        for c in session.connections() {
            let (Some(start), Some(end)) = (layout.position(&c.from), layout.position(&c.to))
            else {
                continue;
            };
            ops.push(DrawOp::Wire {
                from: c.from.clone(),
                to: c.to.clone(),
                start,
                end,
                color: style.wire_color,
                width: style.wire_width,
            });
        }

        for v in session.visible_components() {
            let Some(asset) = v.kind.and_then(|k| assets.resolve(k)) else {
                continue;
            };
            let Some(center) = layout.position(&v.id) else {
                continue;
            };
            ops.push(DrawOp::Sprite {
                component: v.id.clone(),
                asset,
                center,
            });
        }

        let shown = session.step_cursor().map_or(0, |c| c + 1);
        lines.push(
            &mut text,
            TextRole::StepCounter,
            &format!("Step {shown}/{}", session.step_count()),
            style.step_color,
        );
        if let Some(step) = session.current_step() {
            lines.push(
                &mut text,
                TextRole::StepText,
                &step.display_text(),
                style.step_color,
            );
        }
    }

    match &entry.outcome {
        ExperimentOutcome::Solved(result) => {
            lines.push(
                &mut text,
                TextRole::Current,
                &format!("I = {:.4} A", result.current),
                style.current_color,
            );
            for d in &result.voltage_drops {
                lines.push(
                    &mut text,
                    TextRole::VoltageDrop,
                    &format!("{}: {:.2} V", d.resistor, d.volts),
                    style.drop_color,
                );
            }
            for l in &result.led_status {
                lines.push(
                    &mut text,
                    TextRole::LedStatus,
                    &format!("{}: {}", l.led, l.status),
                    style.led_color,
                );
            }
        }
        ExperimentOutcome::Informational(msg) => {
            lines.push(&mut text, TextRole::Info, msg, style.info_color);
        }
        ExperimentOutcome::Unavailable(_) => {}
    }

    ops.extend(text);
    RenderPlan { ops }
}

struct TextLines<'a> {
    style: &'a ProjectionStyle,
    next_y: f64,
}

impl<'a> TextLines<'a> {
    fn new(style: &'a ProjectionStyle) -> Self {
        Self {
            style,
            next_y: style.text_origin.y,
        }
    }

    fn push(&mut self, ops: &mut Vec<DrawOp>, role: TextRole, text: &str, color: Rgba8) {
        ops.push(DrawOp::Text {
            role,
            text: text.to_string(),
            origin: Point::new(self.style.text_origin.x, self.next_y),
            color,
            scale: self.style.text_scale,
        });
        self.next_y += self.style.line_pitch;
    }
}

#[cfg(test)]
#[path = "../../tests/unit/render/plan.rs"]
mod tests;
