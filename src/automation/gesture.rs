use serde::{Deserialize, Serialize};

use crate::error::{AppError, Result};

/// Upper bound on simultaneous strokes in one gesture
pub const MAX_GESTURE_PATHS: usize = 20;

/// Upper bound on the timestamp of any gesture sample
pub const MAX_GESTURE_DURATION_MS: i64 = 60_000;

/// Distance of each pinch finger from the centre at the start of the gesture
pub const PINCH_BASE_OFFSET: f64 = 100.0;

/// One timed sample of a stroke, in screen pixels and milliseconds from gesture start
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct GesturePoint {
    pub x: f64,
    pub y: f64,
    pub time_ms: i64,
}

impl GesturePoint {
    pub fn new(x: f64, y: f64, time_ms: i64) -> Self {
        Self { x, y, time_ms }
    }
}

/// A single stroke: time-ordered samples of one pointer
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GesturePath {
    pub points: Vec<GesturePoint>,
}

impl GesturePath {
    pub fn new(points: Vec<GesturePoint>) -> Self {
        Self { points }
    }

    pub fn end_ms(&self) -> i64 {
        self.points.last().map(|p| p.time_ms).unwrap_or(0)
    }
}

/// Reject malformed gestures before anything reaches the device
pub fn validate_paths(paths: &[GesturePath]) -> Result<()> {
    if paths.is_empty() {
        return Err(AppError::InvalidParams(
            "gesture requires at least one path".to_string(),
        ));
    }
    if paths.len() > MAX_GESTURE_PATHS {
        return Err(AppError::InvalidParams(format!(
            "gesture has {} paths, at most {} are allowed",
            paths.len(),
            MAX_GESTURE_PATHS
        )));
    }

    for (path_index, path) in paths.iter().enumerate() {
        if path.points.len() < 2 {
            return Err(AppError::InvalidParams(format!(
                "path {} needs at least 2 points, got {}",
                path_index,
                path.points.len()
            )));
        }

        let mut previous: Option<i64> = None;
        for (point_index, point) in path.points.iter().enumerate() {
            if !point.x.is_finite() || !point.y.is_finite() || point.x < 0.0 || point.y < 0.0 {
                return Err(AppError::InvalidParams(format!(
                    "path {} point {}: coordinates must be non-negative, got ({}, {})",
                    path_index, point_index, point.x, point.y
                )));
            }
            if point.time_ms < 0 {
                return Err(AppError::InvalidParams(format!(
                    "path {} point {}: time must be non-negative, got {}",
                    path_index, point_index, point.time_ms
                )));
            }
            if point.time_ms > MAX_GESTURE_DURATION_MS {
                return Err(AppError::InvalidParams(format!(
                    "path {} point {}: time {}ms exceeds the {}ms gesture limit",
                    path_index, point_index, point.time_ms, MAX_GESTURE_DURATION_MS
                )));
            }
            if let Some(prev) = previous {
                if point.time_ms <= prev {
                    return Err(AppError::InvalidParams(format!(
                        "path {} point {}: time {}ms must be greater than previous {}ms",
                        path_index, point_index, point.time_ms, prev
                    )));
                }
            }
            previous = Some(point.time_ms);
        }
    }

    Ok(())
}

/// Two horizontal strokes moving apart (`scale > 1`) or together (`scale < 1`)
pub fn pinch_paths(center_x: f64, center_y: f64, scale: f64, duration_ms: i64) -> Result<Vec<GesturePath>> {
    if !scale.is_finite() || scale <= 0.0 {
        return Err(AppError::InvalidParams(format!(
            "pinch scale must be greater than 0, got {}",
            scale
        )));
    }
    if duration_ms <= 0 {
        return Err(AppError::InvalidParams(format!(
            "pinch duration must be positive, got {}ms",
            duration_ms
        )));
    }
    if !center_x.is_finite() || !center_y.is_finite() || center_x < 0.0 || center_y < 0.0 {
        return Err(AppError::InvalidParams(format!(
            "pinch centre must be non-negative, got ({}, {})",
            center_x, center_y
        )));
    }

    let start = PINCH_BASE_OFFSET;
    let end = PINCH_BASE_OFFSET * scale;

    let left = GesturePath::new(vec![
        GesturePoint::new((center_x - start).max(0.0), center_y, 0),
        GesturePoint::new((center_x - end).max(0.0), center_y, duration_ms),
    ]);
    let right = GesturePath::new(vec![
        GesturePoint::new(center_x + start, center_y, 0),
        GesturePoint::new(center_x + end, center_y, duration_ms),
    ]);

    let paths = vec![left, right];
    validate_paths(&paths)?;
    Ok(paths)
}

/// Straight single-pointer stroke from one point to another
pub fn swipe_path(from: (f64, f64), to: (f64, f64), duration_ms: i64) -> Result<Vec<GesturePath>> {
    if duration_ms <= 0 {
        return Err(AppError::InvalidParams(format!(
            "swipe duration must be positive, got {}ms",
            duration_ms
        )));
    }
    let paths = vec![GesturePath::new(vec![
        GesturePoint::new(from.0, from.1, 0),
        GesturePoint::new(to.0, to.1, duration_ms),
    ])];
    validate_paths(&paths)?;
    Ok(paths)
}
