#![cfg(feature = "render")]

use chatbubble::BubbleConfig;
use chatbubble::render::{Phase, SubjectId, compose_sync, simulate_sync};

#[test]
fn compose_sync_matches_the_text_model() {
    let config = BubbleConfig::empty_object();
    let bubble = compose_sync(&config, "Hello :wave:");
    let layout = chatbubble::layout_message("Hello :wave:", &chatbubble::BubbleSettings::default());
    assert_eq!(bubble.layout, layout);
    assert_eq!(bubble.layout.lines, vec!["Hello %img_wave%".to_string()]);
}

#[test]
fn simulate_sync_collects_every_frame() {
    let config = BubbleConfig::from_yaml_str("bubble:\n  lifetime-ticks: 0\n").unwrap();
    let mut engine = chatbubble::render::BubbleEngine::from_config(&config);

    let (bubble, frames) = simulate_sync(&mut engine, SubjectId(2), "hi", None)
        .unwrap()
        .unwrap();
    assert_eq!(bubble.subject, SubjectId(2));
    assert_eq!(frames.len(), 10);
    assert!(frames.iter().all(|f| f.phase != Phase::Holding));
    assert!(frames.last().unwrap().finished);
}

#[test]
fn simulate_sync_reports_disabled_bubbles() {
    let config = BubbleConfig::from_json_str(r#"{"bubble": {"enabled": false}}"#).unwrap();
    let mut engine = chatbubble::render::BubbleEngine::from_config(&config);
    assert!(
        simulate_sync(&mut engine, SubjectId(1), "hi", Some(5))
            .unwrap()
            .is_none()
    );
}

#[test]
fn engine_from_missing_path_is_a_config_error() {
    let err = chatbubble::render::engine_from_path("/no/such/bubble.yaml").unwrap_err();
    assert!(matches!(err, chatbubble::render::HeadlessError::Config(_)));
}
