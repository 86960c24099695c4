//! Per-frame facial landmark sets as delivered by the upstream detector.
//!
//! Coordinates are normalized to `[0, 1]` relative to the frame width and
//! height, with `y` growing downward. The mapping from index to anatomical
//! point is fixed by the detector (see [`crate::constants::landmark_index`]).

use crate::{Error, Result};
use serde::{Deserialize, Serialize};

/// A single landmark point in normalized frame coordinates
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct LandmarkPoint {
    /// Horizontal position, 0 at the left frame edge
    pub x: f64,
    /// Vertical position, 0 at the top frame edge
    pub y: f64,
    /// Relative depth, if the detector provides it
    #[serde(default)]
    pub z: f64,
}

impl LandmarkPoint {
    /// Create a 2D point with zero depth
    #[must_use]
    pub const fn new(x: f64, y: f64) -> Self {
        Self { x, y, z: 0.0 }
    }

    fn is_finite(&self) -> bool {
        self.x.is_finite() && self.y.is_finite()
    }
}

/// Ordered landmark points for a single face
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct LandmarkSet {
    points: Vec<LandmarkPoint>,
}

impl LandmarkSet {
    /// Wrap an ordered list of points
    #[must_use]
    pub fn new(points: Vec<LandmarkPoint>) -> Self {
        Self { points }
    }

    /// Pick the face this crate works on when the detector reports several.
    ///
    /// Only the first face is used; additional faces are ignored.
    #[must_use]
    pub fn first_face(faces: &[Vec<LandmarkPoint>]) -> Option<Self> {
        faces.first().map(|points| Self::new(points.clone()))
    }

    /// Number of points in the set
    #[must_use]
    pub fn len(&self) -> usize {
        self.points.len()
    }

    /// Whether the set holds no points at all
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    /// All points in detector order
    #[must_use]
    pub fn points(&self) -> &[LandmarkPoint] {
        &self.points
    }

    /// Mutable access to a point, used to pose synthetic faces
    pub fn point_mut(&mut self, index: usize) -> Option<&mut LandmarkPoint> {
        self.points.get_mut(index)
    }

    /// Look up a required point.
    ///
    /// # Errors
    ///
    /// Returns [`Error::NoFaceDetected`] for an empty set and
    /// [`Error::MalformedLandmarkSet`] when the index is out of range or the
    /// point has non-finite coordinates.
    pub fn point(&self, index: usize) -> Result<LandmarkPoint> {
        if self.points.is_empty() {
            return Err(Error::NoFaceDetected);
        }

        let point = self.points.get(index).copied().ok_or_else(|| {
            Error::MalformedLandmarkSet(format!(
                "landmark {index} missing from set of {} points",
                self.points.len()
            ))
        })?;

        if !point.is_finite() {
            return Err(Error::MalformedLandmarkSet(format!(
                "landmark {index} has non-finite coordinates ({}, {})",
                point.x, point.y
            )));
        }

        Ok(point)
    }
}

impl From<Vec<LandmarkPoint>> for LandmarkSet {
    fn from(points: Vec<LandmarkPoint>) -> Self {
        Self::new(points)
    }
}
