use crate::{
    foundation::core::Point,
    foundation::error::{CircuitarError, CircuitarResult},
    session::state::Connection,
};

#[derive(Clone, Copy, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(default)]
/// Slot geometry for revealed components, in frame pixels.
pub struct LayoutParams {
    /// Center x of the first revealed component.
    pub origin_x: f64,
    /// Horizontal distance between consecutive reveal slots.
    pub gap_x: f64,
    /// Center y shared by all components.
    pub baseline_y: f64,
    /// Vertical shift applied to the first two branches leaving the source.
    pub branch_offset_y: f64,
}

impl Default for LayoutParams {
    fn default() -> Self {
        Self {
            origin_x: 150.0,
            gap_x: 160.0,
            baseline_y: 400.0,
            branch_offset_y: 90.0,
        }
    }
}

impl LayoutParams {
    pub fn validate(&self) -> CircuitarResult<()> {
        let all_finite = [
            self.origin_x,
            self.gap_x,
            self.baseline_y,
            self.branch_offset_y,
        ]
        .iter()
        .all(|v| v.is_finite());
        if !all_finite {
            return Err(CircuitarError::validation("layout values must be finite"));
        }
        if self.gap_x <= 0.0 {
            return Err(CircuitarError::validation("layout gap_x must be > 0"));
        }
        Ok(())
    }
}

#[derive(Clone, Debug, Default, PartialEq, serde::Serialize)]
/// Placed component centers, in reveal order.
pub struct Layout {
    pub slots: Vec<LayoutSlot>,
}

#[derive(Clone, Debug, PartialEq, serde::Serialize)]
pub struct LayoutSlot {
    pub component: String,
    pub center: Point,
}

impl Layout {
    pub fn position(&self, component: &str) -> Option<Point> {
        self.slots
            .iter()
            .find(|s| s.component == component)
            .map(|s| s.center)
    }

    pub fn is_empty(&self) -> bool {
        self.slots.is_empty()
    }
}

/// Place `visible` components left to right by reveal index.
///
/// Components wired directly to `source` are treated as branches: the first one is lifted by
/// `branch_offset_y`, the second lowered by the same amount.
pub fn compute_layout<'a>(
    visible: impl IntoIterator<Item = &'a str>,
    connections: &[Connection],
    source: Option<&str>,
    params: &LayoutParams,
) -> Layout {
    let mut branches: Vec<&str> = Vec::with_capacity(2);
    if let Some(source) = source {
        for c in connections {
            let other = if c.from == source {
                c.to.as_str()
            } else if c.to == source {
                c.from.as_str()
            } else {
                continue;
            };
            if other != source && !branches.contains(&other) {
                branches.push(other);
                if branches.len() == 2 {
                    break;
                }
            }
        }
    }

    let slots = visible
        .into_iter()
        .enumerate()
        .map(|(idx, id)| {
            let dy = match branches.iter().position(|b| *b == id) {
                Some(0) => -params.branch_offset_y,
                Some(_) => params.branch_offset_y,
                None => 0.0,
            };
            LayoutSlot {
                component: id.to_string(),
                center: Point::new(
                    params.origin_x + (idx as f64) * params.gap_x,
                    params.baseline_y + dy,
                ),
            }
        })
        .collect();

    Layout { slots }
}

#[cfg(test)]
#[path = "../../tests/unit/session/layout.rs"]
mod tests;
