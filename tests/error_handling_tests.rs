//! Error handling tests for all modules


use expression_quest::{
    classifier::{Expression, ExpressionClassifier},
    config::Config,
    constants::landmark_index as idx,
    error::{Error, Result},
    events::NoEvents,
    features::extract_features,
    game::{GameState, GameStateMachine},
    landmarks::{LandmarkPoint, LandmarkSet},
    pipeline::FramePipeline,
    smoothing::ConfidenceSmoother,
};
use test_helpers::neutral_face;

#[test]
fn test_feature_extraction_errors() {
    // Empty set
    let result = extract_features(&LandmarkSet::default());
    assert!(matches!(result, Err(Error::NoFaceDetected)));

    // Too few points for the jaw indices
    let short = LandmarkSet::new(vec![LandmarkPoint::new(0.5, 0.5); idx::JAW_LEFT]);
    match extract_features(&short) {
        Err(Error::MalformedLandmarkSet(msg)) => assert!(msg.contains("454")),
        other => panic!("Expected MalformedLandmarkSet, got {other:?}"),
    }

    // Non-finite coordinate at a required index
    let mut face = neutral_face();
    if let Some(point) = face.point_mut(idx::MOUTH_LEFT) {
        point.x = f64::INFINITY;
    }
    assert!(matches!(
        extract_features(&face),
        Err(Error::MalformedLandmarkSet(_))
    ));

    // Non-finite coordinate at an unused index is fine
    let mut face = neutral_face();
    if let Some(point) = face.point_mut(200) {
        point.y = f64::NAN;
    }
    assert!(extract_features(&face).is_ok());
}

#[test]
fn test_frame_failures_never_abort_pipeline() {
    let mut pipeline = FramePipeline::with_defaults();
    pipeline.start().unwrap();

    let mut broken = neutral_face();
    if let Some(point) = broken.point_mut(idx::NOSE_TIP) {
        point.x = f64::NAN;
    }

    let frames = vec![
        None,
        Some(LandmarkSet::default()),
        Some(LandmarkSet::new(vec![LandmarkPoint::new(0.1, 0.1); 3])),
        Some(broken),
    ];
    for frame in &frames {
        let outcome = pipeline.process_frame(frame.as_ref());
        assert_eq!(outcome.raw, Expression::NoFace);
    }
    assert_eq!(pipeline.state(), GameState::InProgress);

    // A good frame still classifies afterwards
    let outcome = pipeline.process_frame(Some(&neutral_face()));
    assert_eq!(outcome.raw, Expression::Neutral);
}

#[test]
fn test_classifier_degrades_to_no_face() {
    let classifier = ExpressionClassifier::new();
    assert_eq!(classifier.classify_landmarks(None), Expression::NoFace);

    let truncated = LandmarkSet::new(vec![LandmarkPoint::new(0.5, 0.5); 300]);
    assert_eq!(classifier.classify_landmarks(Some(&truncated)), Expression::NoFace);
    assert!(Error::MalformedLandmarkSet(String::new()).is_frame_failure());
    assert!(!Error::InvalidConfiguration(String::new()).is_frame_failure());
}

#[test]
fn test_configuration_errors_are_fatal_before_start() {
    let mut config = Config::default();
    config.game.target_sequence.clear();
    let result = FramePipeline::from_config(&config, Box::new(NoEvents));
    assert!(matches!(result, Err(Error::InvalidConfiguration(_))));

    let mut config = Config::default();
    config.smoothing.confidence_threshold = -0.5;
    assert!(FramePipeline::from_config(&config, Box::new(NoEvents)).is_err());

    let mut config = Config::default();
    config.smoothing.capacity = 0;
    assert!(FramePipeline::from_config(&config, Box::new(NoEvents)).is_err());
}

#[test]
fn test_game_start_errors() -> Result<()> {
    let mut game = GameStateMachine::new(vec![], 10);
    match game.start() {
        Err(Error::InvalidConfiguration(msg)) => assert!(msg.contains("empty")),
        other => panic!("Expected InvalidConfiguration, got {other:?}"),
    }
    assert_eq!(game.state(), GameState::NotStarted);

    let mut game = GameStateMachine::new(vec![Expression::Smile], 10);
    game.start()?;
    assert!(matches!(game.start(), Err(Error::InvalidState(_))));
    game.reset();
    game.start()?;
    Ok(())
}

#[test]
fn test_smoother_parameter_errors() {
    assert!(ConfidenceSmoother::new(0, 0.5).is_err());
    assert!(ConfidenceSmoother::new(10, 1.0001).is_err());
    assert!(ConfidenceSmoother::new(10, 0.0).is_ok());
}

#[test]
fn test_unknown_expression_name() {
    match "frown".parse::<Expression>() {
        Err(Error::InvalidInput(msg)) => assert!(msg.contains("frown")),
        other => panic!("Expected InvalidInput, got {other:?}"),
    }
}

#[test]
fn test_missing_config_file() {
    let result = Config::from_file("/nonexistent/expression-quest.yaml");
    assert!(matches!(result, Err(Error::Io(_))));
}
