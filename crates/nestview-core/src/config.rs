use crate::{Bounds, ListError, ListResult, Vec3};

/// Tunables for a nested list controller.
#[cfg_attr(feature = "serde", derive(serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
#[derive(Clone, Debug, PartialEq)]
pub struct ListConfig {
    /// Shaved off the row width so row sides are not clipped by the list edge.
    pub clip_margin: f32,
    /// Indentation per nesting level, along the axis perpendicular to scrolling.
    pub indent_step: f32,
    /// Initial viewport bounds in the controller's local space.
    pub bounds: Bounds,
    /// Return to the top when scrolled above the first row.
    pub return_to_top: bool,
    /// Largest length an array-size edit may commit.
    pub max_array_size: usize,
}

impl Default for ListConfig {
    fn default() -> Self {
        Self {
            clip_margin: 0.001,
            indent_step: 0.01,
            bounds: Bounds::new(Vec3::ZERO, Vec3::new(0.3, 0.1, 0.4)),
            return_to_top: true,
            max_array_size: 10_000,
        }
    }
}

impl ListConfig {
    pub fn with_bounds(mut self, bounds: Bounds) -> Self {
        self.bounds = bounds;
        self
    }

    pub fn with_indent_step(mut self, step: f32) -> Self {
        self.indent_step = step;
        self
    }

    pub fn validate(&self) -> ListResult<()> {
        validate_bounds(&self.bounds)?;
        if !self.clip_margin.is_finite() || self.clip_margin < 0.0 {
            return Err(ListError::InvalidBounds(format!(
                "clip margin {} must be a finite, non-negative number",
                self.clip_margin
            )));
        }
        if !self.indent_step.is_finite() {
            return Err(ListError::InvalidBounds(format!(
                "indent step {} must be finite",
                self.indent_step
            )));
        }
        Ok(())
    }
}

pub fn validate_bounds(bounds: &Bounds) -> ListResult<()> {
    let s = bounds.size;
    if !s.is_finite() || !bounds.center.is_finite() {
        return Err(ListError::InvalidBounds(format!("{bounds:?} is not finite")));
    }
    if s.x < 0.0 || s.y < 0.0 || s.z < 0.0 {
        return Err(ListError::InvalidBounds(format!(
            "size {s:?} has a negative component"
        )));
    }
    Ok(())
}
