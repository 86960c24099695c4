//! Constants used throughout the crate

/// Number of landmarks in a full `FaceMesh` landmark set
pub const NUM_FACE_MESH_LANDMARKS: usize = 468;

/// Landmark indices consumed by the feature extractor.
///
/// These follow the `MediaPipe` `FaceMesh` numbering. "Left" and "right" refer
/// to the subject's own left and right, not the image sides.
pub mod landmark_index {
    /// Tip of the nose
    pub const NOSE_TIP: usize = 1;

    /// Upper eyelid, left eye
    pub const LEFT_EYE_UPPER: usize = 386;
    /// Lower eyelid, left eye
    pub const LEFT_EYE_LOWER: usize = 374;
    /// Upper eyelid, right eye
    pub const RIGHT_EYE_UPPER: usize = 159;
    /// Lower eyelid, right eye
    pub const RIGHT_EYE_LOWER: usize = 145;

    /// Middle of the left eyebrow
    pub const LEFT_BROW: usize = 334;
    /// Middle of the right eyebrow
    pub const RIGHT_BROW: usize = 105;

    /// Left mouth corner
    pub const MOUTH_LEFT: usize = 291;
    /// Right mouth corner
    pub const MOUTH_RIGHT: usize = 61;
    /// Inner edge of the upper lip at the mouth center
    pub const UPPER_LIP_INNER: usize = 13;
    /// Inner edge of the lower lip at the mouth center
    pub const LOWER_LIP_INNER: usize = 14;

    /// Left jaw contour point
    pub const JAW_LEFT: usize = 454;
    /// Right jaw contour point
    pub const JAW_RIGHT: usize = 234;

    /// Every index the extractor reads
    pub const REQUIRED: [usize; 13] = [
        NOSE_TIP,
        LEFT_EYE_UPPER,
        LEFT_EYE_LOWER,
        RIGHT_EYE_UPPER,
        RIGHT_EYE_LOWER,
        LEFT_BROW,
        RIGHT_BROW,
        MOUTH_LEFT,
        MOUTH_RIGHT,
        UPPER_LIP_INNER,
        LOWER_LIP_INNER,
        JAW_LEFT,
        JAW_RIGHT,
    ];
}

/// Default capacity of the expression history
pub const DEFAULT_HISTORY_CAPACITY: usize = 20;

/// Default share of the history a label must hold to be confirmed
pub const DEFAULT_CONFIDENCE_THRESHOLD: f64 = 0.7;

/// Default score awarded per completed level
pub const DEFAULT_POINTS_PER_LEVEL: u32 = 10;

/// Numeric precision epsilon
pub const EPSILON: f64 = 1e-10;
