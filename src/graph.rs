//! Line graph geometry for sparklines
//!
//! Everything here is a pure function of the samples and the viewport, so a
//! renderer only has to stroke the returned points. Screen space has y growing
//! downward: the highest price sits at `y = 0`.

use crate::{error::GraphError, format::format_price_label};
use serde::{Deserialize, Serialize};

/// A point in render space
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct GraphPoint {
    pub x: f64,
    pub y: f64,
}

impl GraphPoint {
    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    fn distance_to(&self, other: &GraphPoint) -> f64 {
        (other.x - self.x).hypot(other.y - self.y)
    }
}

/// Maps price samples onto a `width` x `height` viewport
///
/// Points are spread evenly on x from `0` to `width`. A flat series or a
/// single sample has no vertical scale, so every y sits at `height / 2`.
pub fn normalize(samples: &[f64], width: f64, height: f64) -> Vec<GraphPoint> {
    if samples.is_empty() {
        return Vec::new();
    }

    let min_val = samples.iter().copied().fold(f64::INFINITY, f64::min);
    let max_val = samples.iter().copied().fold(f64::NEG_INFINITY, f64::max);
    let range = max_val - min_val;
    let flat = samples.len() < 2 || range == 0.0;

    let last_index = (samples.len() - 1).max(1) as f64;

    samples
        .iter()
        .enumerate()
        .map(|(i, &value)| {
            let x = width * i as f64 / last_index;
            let y = if flat {
                height / 2.0
            } else {
                let progress = (value - min_val) / range;
                (1.0 - progress) * height
            };
            GraphPoint::new(x, y)
        })
        .collect()
}

/// Index of the point horizontally closest to `cursor_x`
///
/// Ties go to the leftmost point.
pub fn nearest_index(cursor_x: f64, points: &[GraphPoint]) -> Result<usize, GraphError> {
    if points.is_empty() {
        return Err(GraphError::EmptyInput);
    }
    // NaN compares false against everything; fall back to the leftmost point
    if cursor_x.is_nan() {
        return Ok(0);
    }

    let mut best: Option<(usize, f64)> = None;

    for (i, point) in points.iter().enumerate() {
        let distance = (cursor_x - point.x).abs();
        match best {
            Some((_, best_distance)) if distance >= best_distance => {}
            _ => best = Some((i, distance)),
        }
    }

    best.map(|(i, _)| i).ok_or(GraphError::EmptyInput)
}

/// Point horizontally closest to `cursor_x`, leftmost on ties
pub fn nearest_by_horizontal_distance(
    cursor_x: f64,
    points: &[GraphPoint],
) -> Result<GraphPoint, GraphError> {
    nearest_index(cursor_x, points).map(|i| points[i])
}

/// Closed outline under the line, for the gradient fill
///
/// Starts at the bottom-left corner, follows the points, and ends at the
/// bottom-right corner.
pub fn area_path(points: &[GraphPoint], width: f64, height: f64) -> Vec<GraphPoint> {
    let mut path = Vec::with_capacity(points.len() + 2);
    path.push(GraphPoint::new(0.0, height));
    path.extend_from_slice(points);
    path.push(GraphPoint::new(width, height));
    path
}

/// Prefix of the polyline covering `progress` of its length
///
/// Used to animate the line being drawn. `progress` is clamped to `[0, 1]`
/// and the last segment is cut by linear interpolation.
pub fn trim_path(points: &[GraphPoint], progress: f64) -> Vec<GraphPoint> {
    let progress = if progress.is_nan() {
        0.0
    } else {
        progress.clamp(0.0, 1.0)
    };

    let total: f64 = points.windows(2).map(|w| w[0].distance_to(&w[1])).sum();
    if points.len() < 2 || total == 0.0 || progress >= 1.0 {
        return points.to_vec();
    }

    let target = total * progress;
    let mut trimmed = vec![points[0]];
    let mut travelled = 0.0;

    for segment in points.windows(2) {
        let (start, end) = (segment[0], segment[1]);
        let length = start.distance_to(&end);

        if travelled + length <= target {
            trimmed.push(end);
            travelled += length;
            continue;
        }

        let remaining = target - travelled;
        if remaining > 0.0 {
            let t = remaining / length;
            trimmed.push(GraphPoint::new(
                start.x + (end.x - start.x) * t,
                start.y + (end.y - start.y) * t,
            ));
        }
        break;
    }

    trimmed
}

/// Direction of the price move, picks the graph colouring
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Trend {
    Up,
    Down,
}

impl Trend {
    /// `Up` only for a strictly positive change
    pub fn from_change(percent: f64) -> Self {
        if percent > 0.0 {
            Trend::Up
        } else {
            Trend::Down
        }
    }
}

/// Sample under the pointer while dragging
#[derive(Debug, Clone, PartialEq)]
pub struct Highlight {
    pub point: GraphPoint,
    pub index: usize,
    pub value: f64,
    /// Price label, `$1234.56`
    pub label: String,
}

/// Interaction phase of the overlay
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum DragPhase {
    #[default]
    Idle,
    Dragging,
}

/// Drag/hover overlay over one sparkline
///
/// `begin` moves to `Dragging`, each `move_to` re-picks the nearest sample,
/// and `end` returns to `Idle` and clears the highlight.
#[derive(Debug, Clone)]
pub struct DragOverlay {
    samples: Vec<f64>,
    points: Vec<GraphPoint>,
    phase: DragPhase,
    highlight: Option<Highlight>,
}

impl DragOverlay {
    /// Builds the overlay for `samples` laid out in the given viewport
    pub fn new(samples: Vec<f64>, width: f64, height: f64) -> Self {
        let points = normalize(&samples, width, height);
        Self {
            samples,
            points,
            phase: DragPhase::Idle,
            highlight: None,
        }
    }

    /// Recomputes geometry after a viewport change
    ///
    /// An active highlight is dropped; the next move event picks it again.
    pub fn resize(&mut self, width: f64, height: f64) {
        self.points = normalize(&self.samples, width, height);
        self.highlight = None;
    }

    pub fn points(&self) -> &[GraphPoint] {
        &self.points
    }

    pub fn phase(&self) -> DragPhase {
        self.phase
    }

    pub fn highlight(&self) -> Option<&Highlight> {
        self.highlight.as_ref()
    }

    /// Pointer down at `x`
    ///
    /// Fails with `EmptyInput` and stays idle when there is nothing to pick.
    pub fn begin(&mut self, x: f64) -> Result<&Highlight, GraphError> {
        let highlight = self.pick(x)?;
        self.phase = DragPhase::Dragging;
        Ok(&*self.highlight.insert(highlight))
    }

    /// Pointer moved to `x`; no-op while idle
    pub fn move_to(&mut self, x: f64) -> Result<Option<&Highlight>, GraphError> {
        if self.phase == DragPhase::Idle {
            return Ok(None);
        }
        let highlight = self.pick(x)?;
        Ok(Some(&*self.highlight.insert(highlight)))
    }

    /// Pointer up
    pub fn end(&mut self) {
        self.phase = DragPhase::Idle;
        self.highlight = None;
    }

    fn pick(&self, x: f64) -> Result<Highlight, GraphError> {
        let index = nearest_index(x, &self.points)?;
        let value = self.samples[index];
        Ok(Highlight {
            point: self.points[index],
            index,
            value,
            label: format_price_label(value),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn xs(points: &[GraphPoint]) -> Vec<f64> {
        points.iter().map(|p| p.x).collect()
    }

    #[test]
    fn test_normalize_scales_to_viewport() {
        let points = normalize(&[10.0, 20.0, 15.0], 100.0, 50.0);
        assert_eq!(xs(&points), vec![0.0, 50.0, 100.0]);
        assert_eq!(points[0].y, 50.0);
        assert_eq!(points[1].y, 0.0);
        assert_eq!(points[2].y, 25.0);
    }

    #[test]
    fn test_normalize_flat_series_is_mid_height() {
        let points = normalize(&[3.0, 3.0, 3.0, 3.0], 90.0, 40.0);
        assert_eq!(points.len(), 4);
        assert!(points.iter().all(|p| p.y == 20.0));
        assert_eq!(xs(&points), vec![0.0, 30.0, 60.0, 90.0]);
    }

    #[test]
    fn test_normalize_single_sample() {
        let points = normalize(&[42.0], 100.0, 60.0);
        assert_eq!(points, vec![GraphPoint::new(0.0, 30.0)]);
    }

    #[test]
    fn test_normalize_empty() {
        assert!(normalize(&[], 100.0, 60.0).is_empty());
    }

    #[test]
    fn test_nearest_picks_closest() {
        let points = normalize(&[1.0, 2.0, 3.0], 20.0, 10.0);
        let nearest = nearest_by_horizontal_distance(9.0, &points).unwrap();
        assert_eq!(nearest.x, 10.0);
    }

    #[test]
    fn test_nearest_tie_goes_left() {
        let points = vec![
            GraphPoint::new(0.0, 0.0),
            GraphPoint::new(10.0, 0.0),
            GraphPoint::new(20.0, 0.0),
        ];
        let nearest = nearest_by_horizontal_distance(5.0, &points).unwrap();
        assert_eq!(nearest.x, 0.0);
        assert_eq!(nearest_index(15.0, &points), Ok(1));
    }

    #[test]
    fn test_nearest_outside_range() {
        let points = normalize(&[1.0, 2.0, 3.0], 20.0, 10.0);
        assert_eq!(nearest_index(-50.0, &points), Ok(0));
        assert_eq!(nearest_index(500.0, &points), Ok(2));
    }

    #[test]
    fn test_nearest_nan_cursor_is_leftmost() {
        let points = normalize(&[1.0, 2.0, 3.0], 20.0, 10.0);
        assert_eq!(nearest_index(f64::NAN, &points), Ok(0));
        assert_eq!(nearest_index(f64::NAN, &[]), Err(GraphError::EmptyInput));
    }

    #[test]
    fn test_nearest_empty_is_error() {
        assert_eq!(
            nearest_by_horizontal_distance(1.0, &[]),
            Err(GraphError::EmptyInput)
        );
    }

    #[test]
    fn test_area_path_closes_at_bottom() {
        let points = normalize(&[1.0, 2.0], 10.0, 5.0);
        let area = area_path(&points, 10.0, 5.0);
        assert_eq!(area.len(), 4);
        assert_eq!(area[0], GraphPoint::new(0.0, 5.0));
        assert_eq!(area[3], GraphPoint::new(10.0, 5.0));
    }

    #[test]
    fn test_trim_path() {
        let points = vec![
            GraphPoint::new(0.0, 0.0),
            GraphPoint::new(10.0, 0.0),
            GraphPoint::new(20.0, 0.0),
        ];
        assert_eq!(trim_path(&points, 0.0), vec![points[0]]);
        assert_eq!(trim_path(&points, 1.0), points);
        assert_eq!(
            trim_path(&points, 0.25),
            vec![points[0], GraphPoint::new(5.0, 0.0)]
        );
        assert_eq!(trim_path(&points, 0.5), vec![points[0], points[1]]);
        assert_eq!(trim_path(&points, 7.0), points);
    }

    #[test]
    fn test_trend() {
        assert_eq!(Trend::from_change(0.5), Trend::Up);
        assert_eq!(Trend::from_change(0.0), Trend::Down);
        assert_eq!(Trend::from_change(-2.0), Trend::Down);
    }

    #[test]
    fn test_drag_overlay_lifecycle() {
        let mut overlay = DragOverlay::new(vec![100.0, 200.0, 150.0], 20.0, 10.0);
        assert_eq!(overlay.phase(), DragPhase::Idle);
        assert_eq!(overlay.move_to(10.0), Ok(None));

        let highlight = overlay.begin(1.0).unwrap();
        assert_eq!(highlight.index, 0);
        assert_eq!(highlight.label, "$100.00");
        assert_eq!(overlay.phase(), DragPhase::Dragging);

        let highlight = overlay.move_to(11.0).unwrap().unwrap();
        assert_eq!(highlight.index, 1);
        assert_eq!(highlight.value, 200.0);
        assert_eq!(highlight.point, GraphPoint::new(10.0, 0.0));

        overlay.end();
        assert_eq!(overlay.phase(), DragPhase::Idle);
        assert!(overlay.highlight().is_none());
    }

    #[test]
    fn test_drag_overlay_empty_stays_idle() {
        let mut overlay = DragOverlay::new(Vec::new(), 20.0, 10.0);
        assert_eq!(overlay.begin(3.0), Err(GraphError::EmptyInput));
        assert_eq!(overlay.phase(), DragPhase::Idle);
    }

    #[test]
    fn test_drag_overlay_resize_clears_highlight() {
        let mut overlay = DragOverlay::new(vec![1.0, 2.0], 10.0, 10.0);
        overlay.begin(9.0).unwrap();
        overlay.resize(40.0, 10.0);
        assert!(overlay.highlight().is_none());
        assert_eq!(overlay.points()[1].x, 40.0);
        assert_eq!(overlay.move_to(1.0).unwrap().map(|h| h.index), Some(0));
    }
}
