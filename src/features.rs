//! Geometric feature extraction from a single landmark set.
//!
//! Every feature is a plain difference of landmark coordinates. Nothing is
//! carried between frames.

use crate::{
    constants::landmark_index as idx,
    landmarks::LandmarkSet,
    Error, Result,
};
use serde::Serialize;

/// Geometric scalars derived from one landmark set
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize)]
pub struct FeatureVector {
    /// Lower minus upper eyelid height of the left eye (small when closed)
    pub left_eye_gap: f64,
    /// Lower minus upper eyelid height of the right eye (small when closed)
    pub right_eye_gap: f64,
    /// Horizontal distance between the mouth corners
    pub mouth_width: f64,
    /// Vertical gap between the inner lips at the mouth center
    pub mouth_height: f64,
    /// Jaw asymmetry around the nose tip.
    ///
    /// Negative when the head turns to the subject's left, positive when it
    /// turns to the right.
    pub head_yaw: f64,
    /// Mouth center height minus mean corner height (positive when corners lift)
    pub mouth_curve: f64,
    /// Mean gap between eyebrow and upper eyelid
    pub brow_raise: f64,
}

impl FeatureVector {
    /// Mouth width over mouth height, with the height floored at `epsilon`
    #[must_use]
    pub fn mouth_aspect(&self, epsilon: f64) -> f64 {
        self.mouth_width / self.mouth_height.max(epsilon)
    }

    /// Mean of both eye gaps
    #[must_use]
    pub fn mean_eye_gap(&self) -> f64 {
        (self.left_eye_gap + self.right_eye_gap) / 2.0
    }
}

/// Extract the feature vector for one face.
///
/// # Errors
///
/// Returns [`Error::NoFaceDetected`] for an empty landmark set and
/// [`Error::MalformedLandmarkSet`] when a required index is missing or
/// non-finite.
pub fn extract_features(landmarks: &LandmarkSet) -> Result<FeatureVector> {
    if landmarks.is_empty() {
        return Err(Error::NoFaceDetected);
    }

    let left_upper = landmarks.point(idx::LEFT_EYE_UPPER)?;
    let left_lower = landmarks.point(idx::LEFT_EYE_LOWER)?;
    let right_upper = landmarks.point(idx::RIGHT_EYE_UPPER)?;
    let right_lower = landmarks.point(idx::RIGHT_EYE_LOWER)?;
    let left_brow = landmarks.point(idx::LEFT_BROW)?;
    let right_brow = landmarks.point(idx::RIGHT_BROW)?;
    let mouth_left = landmarks.point(idx::MOUTH_LEFT)?;
    let mouth_right = landmarks.point(idx::MOUTH_RIGHT)?;
    let lip_upper = landmarks.point(idx::UPPER_LIP_INNER)?;
    let lip_lower = landmarks.point(idx::LOWER_LIP_INNER)?;
    let nose = landmarks.point(idx::NOSE_TIP)?;
    let jaw_left = landmarks.point(idx::JAW_LEFT)?;
    let jaw_right = landmarks.point(idx::JAW_RIGHT)?;

    let mouth_center_y = (lip_upper.y + lip_lower.y) / 2.0;
    let corners_y = (mouth_left.y + mouth_right.y) / 2.0;

    // Jaw span on each side of the nose; equal spans mean a frontal face
    let left_span = jaw_left.x - nose.x;
    let right_span = nose.x - jaw_right.x;

    let features = FeatureVector {
        left_eye_gap: left_lower.y - left_upper.y,
        right_eye_gap: right_lower.y - right_upper.y,
        mouth_width: (mouth_left.x - mouth_right.x).abs(),
        mouth_height: lip_lower.y - lip_upper.y,
        head_yaw: left_span - right_span,
        mouth_curve: mouth_center_y - corners_y,
        brow_raise: ((left_upper.y - left_brow.y) + (right_upper.y - right_brow.y)) / 2.0,
    };

    log::trace!("Extracted features: {features:?}");

    Ok(features)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{constants::NUM_FACE_MESH_LANDMARKS, landmarks::LandmarkPoint};

    fn frontal_face() -> LandmarkSet {
        let mut set = LandmarkSet::new(vec![LandmarkPoint::new(0.5, 0.5); NUM_FACE_MESH_LANDMARKS]);
        let mut put = |i: usize, x: f64, y: f64| {
            *set.point_mut(i).unwrap() = LandmarkPoint::new(x, y);
        };
        put(idx::NOSE_TIP, 0.5, 0.5);
        put(idx::LEFT_EYE_UPPER, 0.56, 0.40);
        put(idx::LEFT_EYE_LOWER, 0.56, 0.42);
        put(idx::RIGHT_EYE_UPPER, 0.44, 0.40);
        put(idx::RIGHT_EYE_LOWER, 0.44, 0.42);
        put(idx::LEFT_BROW, 0.56, 0.36);
        put(idx::RIGHT_BROW, 0.44, 0.36);
        put(idx::MOUTH_LEFT, 0.55, 0.60);
        put(idx::MOUTH_RIGHT, 0.45, 0.60);
        put(idx::UPPER_LIP_INNER, 0.5, 0.598);
        put(idx::LOWER_LIP_INNER, 0.5, 0.602);
        put(idx::JAW_LEFT, 0.65, 0.5);
        put(idx::JAW_RIGHT, 0.35, 0.5);
        set
    }

    #[test]
    fn test_frontal_face_features() {
        let f = extract_features(&frontal_face()).unwrap();

        assert!((f.left_eye_gap - 0.02).abs() < 1e-9);
        assert!((f.right_eye_gap - 0.02).abs() < 1e-9);
        assert!((f.mouth_width - 0.1).abs() < 1e-9);
        assert!((f.mouth_height - 0.004).abs() < 1e-9);
        assert!(f.head_yaw.abs() < 1e-9);
        assert!(f.mouth_curve.abs() < 1e-9);
        assert!((f.brow_raise - 0.04).abs() < 1e-9);
    }

    #[test]
    fn test_head_turn_sign() {
        let mut face = frontal_face();
        // Nose drifts toward the subject's left jaw
        face.point_mut(idx::NOSE_TIP).unwrap().x = 0.55;
        let f = extract_features(&face).unwrap();
        assert!(f.head_yaw < 0.0);

        face.point_mut(idx::NOSE_TIP).unwrap().x = 0.45;
        let f = extract_features(&face).unwrap();
        assert!(f.head_yaw > 0.0);
    }

    #[test]
    fn test_lifted_corners_curve_up() {
        let mut face = frontal_face();
        face.point_mut(idx::MOUTH_LEFT).unwrap().y = 0.59;
        face.point_mut(idx::MOUTH_RIGHT).unwrap().y = 0.59;
        let f = extract_features(&face).unwrap();
        assert!(f.mouth_curve > 0.0);
    }

    #[test]
    fn test_deterministic() {
        let face = frontal_face();
        assert_eq!(extract_features(&face).unwrap(), extract_features(&face).unwrap());
    }

    #[test]
    fn test_empty_and_truncated_sets() {
        assert!(matches!(
            extract_features(&LandmarkSet::default()),
            Err(Error::NoFaceDetected)
        ));

        let truncated = LandmarkSet::new(vec![LandmarkPoint::new(0.5, 0.5); 100]);
        assert!(matches!(
            extract_features(&truncated),
            Err(Error::MalformedLandmarkSet(_))
        ));
    }

    #[test]
    fn test_mouth_aspect_guards_closed_mouth() {
        let f = FeatureVector {
            mouth_width: 0.1,
            mouth_height: 0.0,
            ..FeatureVector::default()
        };
        assert!(f.mouth_aspect(1e-3).is_finite());
        assert!((f.mouth_aspect(1e-3) - 100.0).abs() < 1e-9);
    }
}
