// 📐 Bounded Plane Layout
// Score→pixel mapping, label placement with edge flips, tooltip
// placement with edge clamps. Pure geometry, no rendering dependency.
//
// The plane is a fixed square. Points land inside the padded drawable
// region; name labels may use the full drawable region; the detail
// tooltip may extend into the padding band but never past the inset
// plane edge.

use anyhow::{bail, Result};
use serde::{Deserialize, Serialize};

/// Total side length of the square plane, in pixels.
pub const PLANE_SIZE: f64 = 600.0;
/// Symmetric padding between the plane edge and the drawable region.
pub const PLANE_PADDING: f64 = 60.0;
/// Detail tooltip box dimensions.
pub const TOOLTIP_WIDTH: f64 = 220.0;
pub const TOOLTIP_HEIGHT: f64 = 180.0;
/// Inset margin the tooltip must keep from the absolute plane edges.
pub const EDGE_MARGIN: f64 = 10.0;
/// Name label box dimensions (half-width, since it anchors centered).
pub const LABEL_HALF_WIDTH: f64 = 45.0;
pub const LABEL_HEIGHT: f64 = 16.0;

const LABEL_BELOW_OFFSET: f64 = 10.0;
const LABEL_ABOVE_OFFSET: f64 = 24.0;
const LABEL_EDGE_GAP: f64 = 4.0;
const TOOLTIP_GAP: f64 = 15.0;

// ============================================================================
// GEOMETRY TYPES
// ============================================================================

/// A pixel position on the plane. Y grows downward.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Point {
    pub x: f64,
    pub y: f64,
}

/// How the label box hangs off its `left` coordinate.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LabelAnchor {
    /// `left` is the horizontal center of the box
    Center,
    /// `left` is the left edge of the box
    Start,
    /// `left` is the right edge of the box
    End,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct LabelPlacement {
    pub left: f64,
    pub top: f64,
    pub anchor: LabelAnchor,
}

// ============================================================================
// LAYOUT CONFIG
// ============================================================================

/// Fixed layout constants for one plane.
///
/// `Default` is the stock 600px plane. Non-standard dimensions go
/// through [`LayoutConfig::custom`], which rejects combinations the
/// placement policies cannot keep in bounds.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct LayoutConfig {
    pub size: f64,
    pub padding: f64,
    pub tooltip_width: f64,
    pub tooltip_height: f64,
    pub edge_margin: f64,
    pub label_half_width: f64,
    pub label_height: f64,
}

impl Default for LayoutConfig {
    fn default() -> Self {
        LayoutConfig {
            size: PLANE_SIZE,
            padding: PLANE_PADDING,
            tooltip_width: TOOLTIP_WIDTH,
            tooltip_height: TOOLTIP_HEIGHT,
            edge_margin: EDGE_MARGIN,
            label_half_width: LABEL_HALF_WIDTH,
            label_height: LABEL_HEIGHT,
        }
    }
}

impl LayoutConfig {
    /// Build a non-standard configuration.
    ///
    /// The tooltip clamps are only mutually exclusive while the tooltip
    /// fits inside the inset plane, and the label flips only resolve
    /// while the label box fits inside the drawable region. Both are
    /// checked here so the placement functions can rely on them.
    pub fn custom(
        size: f64,
        padding: f64,
        tooltip_width: f64,
        tooltip_height: f64,
        edge_margin: f64,
        label_half_width: f64,
        label_height: f64,
    ) -> Result<Self> {
        let chart = size - 2.0 * padding;
        if chart <= 0.0 {
            bail!(
                "Padding {}px leaves no drawable region on a {}px plane",
                padding,
                size
            );
        }
        if label_half_width * 2.0 >= chart || label_height >= chart {
            bail!(
                "Label box {}x{} does not fit the {}px drawable region",
                label_half_width * 2.0,
                label_height,
                chart
            );
        }
        let inset = size - 2.0 * edge_margin;
        if tooltip_width >= inset || tooltip_height >= inset {
            bail!(
                "Tooltip {}x{} does not fit the {}px plane with a {}px margin",
                tooltip_width,
                tooltip_height,
                size,
                edge_margin
            );
        }

        Ok(LayoutConfig {
            size,
            padding,
            tooltip_width,
            tooltip_height,
            edge_margin,
            label_half_width,
            label_height,
        })
    }

    /// Drawable chart side length.
    pub fn chart_size(&self) -> f64 {
        self.size - 2.0 * self.padding
    }

    /// Inner edge of the drawable region on both axes.
    pub fn min_bound(&self) -> f64 {
        self.padding
    }

    /// Opposite inner edge of the drawable region on both axes.
    pub fn max_bound(&self) -> f64 {
        self.padding + self.chart_size()
    }

    /// Map a 0-100 score to a pixel coordinate inside the drawable
    /// region: 0 lands on the inner edge, 100 on the opposite edge.
    pub fn map_score(&self, score: f64) -> f64 {
        self.padding + (score / 100.0) * self.chart_size()
    }

    /// Pixel position of an account point.
    ///
    /// The vertical axis is inverted so that higher potential renders
    /// higher on the plane: y comes from `100 − potential`.
    pub fn point(&self, volume_score: f64, potential_score: f64) -> Point {
        Point {
            x: self.map_score(volume_score),
            y: self.map_score(100.0 - potential_score),
        }
    }

    /// Place a name label for the point at `(point.x, point.y)`.
    ///
    /// Vertical: below the point by default; flips above when the box
    /// bottom would cross the drawable edge. Horizontal: centered by
    /// default; re-anchors start- or end-aligned beside the point when
    /// either box edge would cross a drawable bound. The axes are
    /// decided independently.
    pub fn label_placement(&self, point: Point) -> LabelPlacement {
        let mut top = point.y + LABEL_BELOW_OFFSET;
        if top + self.label_height > self.max_bound() {
            top = point.y - LABEL_ABOVE_OFFSET;
        }

        let mut left = point.x;
        let mut anchor = LabelAnchor::Center;
        if point.x - self.label_half_width < self.min_bound() {
            left = point.x + LABEL_EDGE_GAP;
            anchor = LabelAnchor::Start;
        } else if point.x + self.label_half_width > self.max_bound() {
            left = point.x - LABEL_EDGE_GAP;
            anchor = LabelAnchor::End;
        }

        LabelPlacement { left, top, anchor }
    }

    /// Place the detail tooltip for a selected point; returns its
    /// top-left corner.
    ///
    /// Horizontal: right of the point by default, flipped to the left
    /// when the box would cross the inset right edge. Vertical:
    /// centered on the point, clamped to the inset margin at the top
    /// and bottom. At most one vertical clamp can fire for any
    /// configuration accepted by [`LayoutConfig::custom`].
    pub fn tooltip_placement(&self, point: Point) -> Point {
        let mut left = point.x + TOOLTIP_GAP;
        if left + self.tooltip_width > self.size - self.edge_margin {
            left = point.x - self.tooltip_width - TOOLTIP_GAP;
        }

        let mut top = point.y - self.tooltip_height / 2.0;
        if top < self.edge_margin {
            top = self.edge_margin;
        } else if top + self.tooltip_height > self.size - self.edge_margin {
            top = self.size - self.tooltip_height - self.edge_margin;
        }

        Point { x: left, y: top }
    }
}

// ============================================================================
// TESTS
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    fn cfg() -> LayoutConfig {
        LayoutConfig::default()
    }

    #[test]
    fn test_map_score_endpoints() {
        let cfg = cfg();
        assert_eq!(cfg.map_score(0.0), PLANE_PADDING);
        assert_eq!(cfg.map_score(100.0), PLANE_PADDING + cfg.chart_size());
        assert_eq!(cfg.map_score(50.0), PLANE_SIZE / 2.0);
    }

    #[test]
    fn test_map_score_is_monotonic() {
        let cfg = cfg();
        let mut previous = cfg.map_score(0.0);
        for step in 1..=100 {
            let coord = cfg.map_score(f64::from(step));
            assert!(coord > previous);
            previous = coord;
        }
    }

    #[test]
    fn test_point_inverts_vertical_axis() {
        let cfg = cfg();

        // High potential renders high on the plane (small y)
        let high = cfg.point(50.0, 100.0);
        assert_eq!(high.y, cfg.min_bound());

        let low = cfg.point(50.0, 0.0);
        assert_eq!(low.y, cfg.max_bound());

        // Volume is not inverted
        assert_eq!(cfg.point(0.0, 50.0).x, cfg.min_bound());
        assert_eq!(cfg.point(100.0, 50.0).x, cfg.max_bound());
    }

    #[test]
    fn test_points_stay_in_drawable_region() {
        let cfg = cfg();
        for volume in [0.0, 12.5, 50.0, 99.0, 100.0] {
            for potential in [0.0, 33.0, 50.0, 100.0] {
                let p = cfg.point(volume, potential);
                assert!(p.x >= cfg.min_bound() && p.x <= cfg.max_bound());
                assert!(p.y >= cfg.min_bound() && p.y <= cfg.max_bound());
            }
        }
    }

    #[test]
    fn test_label_defaults_below_and_centered() {
        let cfg = cfg();
        let point = cfg.point(50.0, 50.0);
        let label = cfg.label_placement(point);

        assert_eq!(label.anchor, LabelAnchor::Center);
        assert_eq!(label.left, point.x);
        assert_eq!(label.top, point.y + 10.0);
    }

    #[test]
    fn test_label_flips_above_at_bottom_edge() {
        let cfg = cfg();
        // Zero potential sits on the bottom drawable edge
        let point = cfg.point(50.0, 0.0);
        let label = cfg.label_placement(point);

        assert_eq!(label.top, point.y - 24.0);
        assert!(label.top + cfg.label_height <= cfg.max_bound());
    }

    #[test]
    fn test_label_left_edge_never_centers() {
        let cfg = cfg();
        let point = cfg.point(0.0, 50.0);
        let label = cfg.label_placement(point);

        assert_eq!(label.anchor, LabelAnchor::Start);
        assert_eq!(label.left, point.x + 4.0);
        // Box now extends rightward only, so it cannot underflow
        assert!(label.left >= cfg.min_bound());
    }

    #[test]
    fn test_label_right_edge_never_centers() {
        let cfg = cfg();
        let point = cfg.point(100.0, 50.0);
        let label = cfg.label_placement(point);

        assert_eq!(label.anchor, LabelAnchor::End);
        assert_eq!(label.left, point.x - 4.0);
        assert!(label.left <= cfg.max_bound());
    }

    #[test]
    fn test_label_box_contained_for_interior_points() {
        let cfg = cfg();
        for volume in [0.0, 5.0, 50.0, 95.0, 100.0] {
            for potential in [0.0, 5.0, 50.0, 95.0, 100.0] {
                let label = cfg.label_placement(cfg.point(volume, potential));
                let (box_left, box_right) = match label.anchor {
                    LabelAnchor::Center => (
                        label.left - cfg.label_half_width,
                        label.left + cfg.label_half_width,
                    ),
                    LabelAnchor::Start => (label.left, label.left + 2.0 * cfg.label_half_width),
                    LabelAnchor::End => (label.left - 2.0 * cfg.label_half_width, label.left),
                };
                assert!(box_left >= cfg.min_bound(), "left overflow at {volume}/{potential}");
                assert!(box_right <= cfg.max_bound(), "right overflow at {volume}/{potential}");
                assert!(label.top >= cfg.min_bound() - 24.0);
                assert!(label.top + cfg.label_height <= cfg.max_bound() + f64::EPSILON);
            }
        }
    }

    #[test]
    fn test_tooltip_defaults_right_of_point() {
        let cfg = cfg();
        let point = cfg.point(20.0, 50.0);
        let tooltip = cfg.tooltip_placement(point);

        assert_eq!(tooltip.x, point.x + 15.0);
        assert_eq!(tooltip.y, point.y - cfg.tooltip_height / 2.0);
    }

    #[test]
    fn test_tooltip_flips_left_at_right_edge() {
        let cfg = cfg();
        let point = cfg.point(100.0, 50.0);
        let tooltip = cfg.tooltip_placement(point);

        assert_eq!(tooltip.x, point.x - cfg.tooltip_width - 15.0);
        assert!(tooltip.x + cfg.tooltip_width <= cfg.size - cfg.edge_margin);
    }

    #[test]
    fn test_tooltip_clamps_to_margin_at_top() {
        let cfg = cfg();
        // Topmost drawable point
        let point = cfg.point(50.0, 100.0);
        let tooltip = cfg.tooltip_placement(point);

        assert_eq!(tooltip.y, cfg.edge_margin);
    }

    #[test]
    fn test_tooltip_clamps_at_bottom() {
        let cfg = cfg();
        let point = cfg.point(50.0, 0.0);
        let tooltip = cfg.tooltip_placement(point);

        assert_eq!(tooltip.y, cfg.size - cfg.tooltip_height - cfg.edge_margin);
    }

    #[test]
    fn test_tooltip_always_inside_inset_plane() {
        let cfg = cfg();
        for volume in [0.0, 25.0, 50.0, 75.0, 100.0] {
            for potential in [0.0, 25.0, 50.0, 75.0, 100.0] {
                let tooltip = cfg.tooltip_placement(cfg.point(volume, potential));
                assert!(tooltip.x >= cfg.edge_margin);
                assert!(tooltip.x + cfg.tooltip_width <= cfg.size - cfg.edge_margin);
                assert!(tooltip.y >= cfg.edge_margin);
                assert!(tooltip.y + cfg.tooltip_height <= cfg.size - cfg.edge_margin);
            }
        }
    }

    #[test]
    fn test_custom_accepts_stock_dimensions() {
        assert!(LayoutConfig::custom(600.0, 60.0, 220.0, 180.0, 10.0, 45.0, 16.0).is_ok());
    }

    #[test]
    fn test_custom_rejects_oversized_tooltip() {
        // A tooltip taller than the inset plane would make both
        // vertical clamps apply, with the second silently winning
        let result = LayoutConfig::custom(600.0, 60.0, 220.0, 590.0, 10.0, 45.0, 16.0);
        assert!(result.is_err());
    }

    #[test]
    fn test_custom_rejects_label_wider_than_chart() {
        let result = LayoutConfig::custom(600.0, 60.0, 220.0, 180.0, 10.0, 300.0, 16.0);
        assert!(result.is_err());
    }

    #[test]
    fn test_custom_rejects_padding_consuming_the_plane() {
        let result = LayoutConfig::custom(600.0, 300.0, 220.0, 180.0, 10.0, 45.0, 16.0);
        assert!(result.is_err());
    }
}
