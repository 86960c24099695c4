//! Rule-based expression classification.
//!
//! A fixed, ordered decision list maps a [`FeatureVector`] to exactly one
//! [`Expression`]. Compound expressions come first so that their feature
//! ranges win over the broad single-feature rules that could also match
//! (a drooping mouth, for example, often narrows the eyes enough to pass for
//! a blink). The first matching rule wins; when none match the result is
//! [`Expression::Neutral`].

use crate::{
    features::{extract_features, FeatureVector},
    landmarks::LandmarkSet,
    Error, Result,
};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Fixed expression taxonomy
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Expression {
    /// No rule matched
    Neutral,
    /// Closed mouth with lifted corners
    Smile,
    /// Drooping mouth corners
    Sad,
    /// Raised brows with an open mouth
    Surprised,
    /// Open mouth with lifted corners
    Laugh,
    /// Drooping mouth with narrowed eyes
    Cry,
    /// Furrowed brows with pressed lips
    Angry,
    /// Left eye closed
    BlinkLeft,
    /// Right eye closed
    BlinkRight,
    /// Head turned to the subject's left
    TurnLeft,
    /// Head turned to the subject's right
    TurnRight,
    /// No usable face in the frame
    NoFace,
}

impl Expression {
    /// Every expression in the taxonomy
    pub const ALL: [Self; 12] = [
        Self::Neutral,
        Self::Smile,
        Self::Sad,
        Self::Surprised,
        Self::Laugh,
        Self::Cry,
        Self::Angry,
        Self::BlinkLeft,
        Self::BlinkRight,
        Self::TurnLeft,
        Self::TurnRight,
        Self::NoFace,
    ];

    /// Stable kebab-case name
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Neutral => "neutral",
            Self::Smile => "smile",
            Self::Sad => "sad",
            Self::Surprised => "surprised",
            Self::Laugh => "laugh",
            Self::Cry => "cry",
            Self::Angry => "angry",
            Self::BlinkLeft => "blink-left",
            Self::BlinkRight => "blink-right",
            Self::TurnLeft => "turn-left",
            Self::TurnRight => "turn-right",
            Self::NoFace => "no-face",
        }
    }

    /// Player-facing prompt for this expression
    #[must_use]
    pub const fn description(&self) -> &'static str {
        match self {
            Self::Neutral => "neutral face",
            Self::Smile => "smile",
            Self::Sad => "sad face",
            Self::Surprised => "surprised face",
            Self::Laugh => "laughing face",
            Self::Cry => "crying face",
            Self::Angry => "angry face",
            Self::BlinkLeft => "left eye closed",
            Self::BlinkRight => "right eye closed",
            Self::TurnLeft => "head turned left",
            Self::TurnRight => "head turned right",
            Self::NoFace => "no face",
        }
    }
}

impl fmt::Display for Expression {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Expression {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        let wanted = s.trim().to_lowercase().replace('_', "-");
        Self::ALL
            .iter()
            .copied()
            .find(|e| e.as_str() == wanted)
            .ok_or_else(|| Error::InvalidInput(format!("Unknown expression: {s}")))
    }
}

/// Numeric thresholds used by the decision list.
///
/// Distances are in normalized frame units. The defaults assume a face
/// spanning roughly a third of the frame width and are meant to be tuned.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Thresholds {
    /// Eye gap below which an eye counts as closed
    pub eye_closed_gap: f64,
    /// Mean eye gap below which the eyes count as narrowed
    pub squint_gap: f64,
    /// Minimum mouth width/height ratio for a smile
    pub smile_mouth_aspect: f64,
    /// Minimum upward mouth curve for smile and laugh
    pub smile_curve: f64,
    /// Minimum mouth opening for a laugh
    pub laugh_mouth_open: f64,
    /// Minimum mouth opening for surprise
    pub surprise_mouth_open: f64,
    /// Minimum brow raise for surprise
    pub surprise_brow_raise: f64,
    /// Downward mouth curve beyond which the face is sad
    pub sad_curve: f64,
    /// Downward mouth curve beyond which a squinting face is crying
    pub cry_curve: f64,
    /// Brow raise below which the brows count as furrowed
    pub angry_brow_raise: f64,
    /// Mouth opening below which the lips count as pressed
    pub angry_mouth_open: f64,
    /// Jaw asymmetry beyond which the head counts as turned
    pub head_turn_yaw: f64,
    /// Floor for the mouth height when computing the mouth aspect
    pub mouth_height_floor: f64,
}

impl Default for Thresholds {
    fn default() -> Self {
        Self {
            eye_closed_gap: 0.008,
            squint_gap: 0.012,
            smile_mouth_aspect: 2.5,
            smile_curve: 0.005,
            laugh_mouth_open: 0.035,
            surprise_mouth_open: 0.04,
            surprise_brow_raise: 0.05,
            sad_curve: 0.004,
            cry_curve: 0.008,
            angry_brow_raise: 0.02,
            angry_mouth_open: 0.01,
            head_turn_yaw: 0.06,
            mouth_height_floor: 1e-4,
        }
    }
}

impl Thresholds {
    /// Check that every threshold is a usable number
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidConfiguration`] naming the first non-finite
    /// threshold, or a non-positive mouth height floor.
    pub fn validate(&self) -> Result<()> {
        let named = [
            ("eye_closed_gap", self.eye_closed_gap),
            ("squint_gap", self.squint_gap),
            ("smile_mouth_aspect", self.smile_mouth_aspect),
            ("smile_curve", self.smile_curve),
            ("laugh_mouth_open", self.laugh_mouth_open),
            ("surprise_mouth_open", self.surprise_mouth_open),
            ("surprise_brow_raise", self.surprise_brow_raise),
            ("sad_curve", self.sad_curve),
            ("cry_curve", self.cry_curve),
            ("angry_brow_raise", self.angry_brow_raise),
            ("angry_mouth_open", self.angry_mouth_open),
            ("head_turn_yaw", self.head_turn_yaw),
            ("mouth_height_floor", self.mouth_height_floor),
        ];

        if let Some((name, value)) = named.iter().find(|(_, v)| !v.is_finite()) {
            return Err(Error::InvalidConfiguration(format!(
                "Threshold {name} must be finite, got {value}"
            )));
        }
        if self.mouth_height_floor <= 0.0 {
            return Err(Error::InvalidConfiguration(
                "Threshold mouth_height_floor must be greater than 0".to_string(),
            ));
        }

        Ok(())
    }
}

type Predicate = fn(&FeatureVector, &Thresholds) -> bool;

/// One entry of the decision list
#[derive(Clone, Copy)]
pub struct Rule {
    /// Label produced when the predicate matches
    pub expression: Expression,
    predicate: Predicate,
}

impl Rule {
    /// Evaluate the predicate
    #[must_use]
    pub fn matches(&self, features: &FeatureVector, thresholds: &Thresholds) -> bool {
        (self.predicate)(features, thresholds)
    }
}

impl fmt::Debug for Rule {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Rule").field("expression", &self.expression).finish()
    }
}

fn is_surprised(f: &FeatureVector, t: &Thresholds) -> bool {
    f.mouth_height > t.surprise_mouth_open && f.brow_raise > t.surprise_brow_raise
}

fn is_laugh(f: &FeatureVector, t: &Thresholds) -> bool {
    f.mouth_height > t.laugh_mouth_open && f.mouth_curve > t.smile_curve
}

fn is_cry(f: &FeatureVector, t: &Thresholds) -> bool {
    f.mouth_curve < -t.cry_curve && f.mean_eye_gap() < t.squint_gap
}

fn is_sad(f: &FeatureVector, t: &Thresholds) -> bool {
    f.mouth_curve < -t.sad_curve
}

fn is_angry(f: &FeatureVector, t: &Thresholds) -> bool {
    f.brow_raise < t.angry_brow_raise && f.mouth_height < t.angry_mouth_open
}

fn is_smile(f: &FeatureVector, t: &Thresholds) -> bool {
    f.mouth_aspect(t.mouth_height_floor) > t.smile_mouth_aspect && f.mouth_curve > t.smile_curve
}

fn is_blink_left(f: &FeatureVector, t: &Thresholds) -> bool {
    f.left_eye_gap < t.eye_closed_gap
}

fn is_blink_right(f: &FeatureVector, t: &Thresholds) -> bool {
    f.right_eye_gap < t.eye_closed_gap
}

fn is_turn_left(f: &FeatureVector, t: &Thresholds) -> bool {
    f.head_yaw < -t.head_turn_yaw
}

fn is_turn_right(f: &FeatureVector, t: &Thresholds) -> bool {
    f.head_yaw > t.head_turn_yaw
}

/// Rules in priority order
static DECISION_LIST: [Rule; 10] = [
    Rule { expression: Expression::Surprised, predicate: is_surprised },
    Rule { expression: Expression::Laugh, predicate: is_laugh },
    Rule { expression: Expression::Cry, predicate: is_cry },
    Rule { expression: Expression::Sad, predicate: is_sad },
    Rule { expression: Expression::Angry, predicate: is_angry },
    Rule { expression: Expression::Smile, predicate: is_smile },
    Rule { expression: Expression::BlinkLeft, predicate: is_blink_left },
    Rule { expression: Expression::BlinkRight, predicate: is_blink_right },
    Rule { expression: Expression::TurnLeft, predicate: is_turn_left },
    Rule { expression: Expression::TurnRight, predicate: is_turn_right },
];

/// Stateless expression classifier over a replaceable threshold table
#[derive(Debug, Clone, Default)]
pub struct ExpressionClassifier {
    thresholds: Thresholds,
}

impl ExpressionClassifier {
    /// Classifier with the default thresholds
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Classifier with a substituted threshold table; rule order is unchanged
    #[must_use]
    pub fn with_thresholds(thresholds: Thresholds) -> Self {
        Self { thresholds }
    }

    /// Active threshold table
    #[must_use]
    pub fn thresholds(&self) -> &Thresholds {
        &self.thresholds
    }

    /// Rules in evaluation order
    #[must_use]
    pub fn rules(&self) -> &'static [Rule] {
        &DECISION_LIST
    }

    /// Map a feature vector to a single label
    #[must_use]
    pub fn classify(&self, features: &FeatureVector) -> Expression {
        DECISION_LIST
            .iter()
            .find(|rule| rule.matches(features, &self.thresholds))
            .map_or(Expression::Neutral, |rule| rule.expression)
    }

    /// Every rule that matches, in priority order.
    ///
    /// Only the first entry decides the label; the rest are diagnostic.
    #[must_use]
    pub fn matching_rules(&self, features: &FeatureVector) -> Vec<Expression> {
        DECISION_LIST
            .iter()
            .filter(|rule| rule.matches(features, &self.thresholds))
            .map(|rule| rule.expression)
            .collect()
    }

    /// Extract features and classify, degrading to [`Expression::NoFace`]
    /// when the landmark set is absent or unusable
    #[must_use]
    pub fn classify_landmarks(&self, landmarks: Option<&LandmarkSet>) -> Expression {
        let Some(landmarks) = landmarks else {
            return Expression::NoFace;
        };

        match extract_features(landmarks) {
            Ok(features) => self.classify(&features),
            Err(e) => {
                log::debug!("Frame classified as no-face: {e}");
                Expression::NoFace
            }
        }
    }
}
