use std::sync::Arc;
use std::thread;

use serde_json::json;

use assess_spec::{
    AnswerError, AnswerOp, AnswerSet, Engine, EngineError, Form, QuestionKind, ScoreTally,
    Session, SessionId, load_catalog,
};

fn climate_form() -> Arc<Form> {
    let catalog =
        load_catalog(include_str!("fixtures/self_assessment.json")).expect("catalog should load");
    Arc::clone(catalog.form("climateForm").expect("climate form"))
}

fn select(option: &str) -> AnswerOp {
    AnswerOp::Select(vec![option.to_string()])
}

#[test]
fn engine_drives_a_session() {
    let engine = Engine::new(climate_form());
    let id = engine.new_session();
    assert_eq!(engine.session_count(), 1);

    let visible = engine
        .answer(&id, "hasObj", select("hasObj/yes"))
        .expect("hasObj");
    assert!(visible.contains(&"objTerm".to_string()));
    engine
        .answer(&id, "objTerm", AnswerOp::Add("objTerm/medium".into()))
        .expect("objTerm");

    let results = engine.results(&id).expect("results");
    assert_eq!(results.sections[0].score, ScoreTally { actual: 2, max: 16 });
    assert_eq!(results.total.actual, 2);
    assert_eq!(results.visible_question_ids, visible);
    assert_eq!(results.progress.answered, 2);
}

#[test]
fn unknown_session_is_reported() {
    let engine = Engine::new(climate_form());
    let stranger = SessionId::new();
    let err = engine
        .answer(&stranger, "hasObj", select("hasObj/yes"))
        .expect_err("no such session");
    assert_eq!(err, EngineError::UnknownSession(stranger));
    assert!(engine.results(&stranger).is_err());
    assert!(!engine.end_session(&stranger));
}

#[test]
fn rejected_answer_is_surfaced_and_leaves_state() {
    let engine = Engine::new(climate_form());
    let id = engine.new_session();
    let err = engine
        .answer(&id, "objTerm", AnswerOp::Add("objTerm/short".into()))
        .expect_err("objTerm hidden");
    assert_eq!(
        err,
        EngineError::Answer(AnswerError::Hidden("objTerm".into()))
    );
    assert!(engine.export(&id).expect("export").is_empty());
}

#[test]
fn export_and_resume_round_trip() {
    let engine = Engine::new(climate_form());
    let id = engine.new_session();
    engine
        .answer(&id, "hasObj", select("hasObj/yes"))
        .expect("hasObj");
    engine
        .answer(&id, "objTerm", AnswerOp::Add("objTerm/short".into()))
        .expect("objTerm");
    engine
        .answer(&id, "objTerm", AnswerOp::Add("objTerm/long".into()))
        .expect("objTerm");

    let exported = engine.export(&id).expect("export");
    let wire = serde_json::to_value(&exported).expect("answers serialize");
    assert_eq!(
        wire,
        json!({
            "hasObj": "hasObj/yes",
            "objTerm": ["objTerm/long", "objTerm/short"]
        })
    );

    let restored: AnswerSet = serde_json::from_value(wire).expect("answers deserialize");
    let resumed = engine.resume(&restored).expect("resume");
    assert_ne!(resumed, id);
    assert_eq!(
        engine.results(&resumed).expect("results"),
        engine.results(&id).expect("results")
    );
    assert_eq!(engine.session_count(), 2);
}

#[test]
fn resume_rejects_answers_to_hidden_questions() {
    let engine = Engine::new(climate_form());
    let answers: AnswerSet = serde_json::from_value(json!({
        "hasObj": "hasObj/no",
        "objTerm": ["objTerm/short"]
    }))
    .expect("answers deserialize");
    let err = engine.resume(&answers).expect_err("objTerm hidden");
    assert_eq!(
        err,
        EngineError::Answer(AnswerError::Hidden("objTerm".into()))
    );
    assert_eq!(engine.session_count(), 0);
}

#[test]
fn resume_rejects_unknown_questions_and_options() {
    let form = climate_form();
    let unknown: AnswerSet =
        serde_json::from_value(json!({ "weather": "weather/sunny" })).expect("deserialize");
    let err = Session::resume(Arc::clone(&form), &unknown).expect_err("unknown question");
    assert_eq!(err, AnswerError::UnknownQuestion("weather".into()));

    let foreign: AnswerSet =
        serde_json::from_value(json!({ "knowlaw": "canexplain/yes" })).expect("deserialize");
    let err = Session::resume(form, &foreign).expect_err("foreign option");
    assert!(matches!(err, AnswerError::UnknownOption { .. }));
}

#[test]
fn typed_helpers_check_question_kind() {
    let mut session = Session::new(climate_form());
    let err = session
        .set_radio("activity", "activity/products")
        .expect_err("activity is a checkbox");
    assert_eq!(
        err,
        AnswerError::KindMismatch {
            question: "activity".into(),
            expected: QuestionKind::Radio,
            actual: QuestionKind::Checkbox,
        }
    );
    let err = session
        .add_checkbox("hasObj", "hasObj/yes")
        .expect_err("hasObj is a radio");
    assert!(matches!(err, AnswerError::KindMismatch { .. }));
}

#[test]
fn end_session_forgets_state() {
    let engine = Engine::new(climate_form());
    let id = engine.new_session();
    assert!(engine.end_session(&id));
    assert_eq!(engine.session_count(), 0);
    assert!(matches!(
        engine.export(&id),
        Err(EngineError::UnknownSession(_))
    ));
}

#[test]
fn sessions_are_independent_across_threads() {
    let engine = Engine::new(climate_form());
    let ids: Vec<SessionId> = (0..8).map(|_| engine.new_session()).collect();

    thread::scope(|scope| {
        for (index, id) in ids.iter().enumerate() {
            let engine = &engine;
            scope.spawn(move || {
                let option = if index % 2 == 0 {
                    "investGreen/yes"
                } else {
                    "investGreen/justabit"
                };
                engine
                    .answer(id, "investGreen", select(option))
                    .expect("investGreen");
            });
        }
    });

    for (index, id) in ids.iter().enumerate() {
        let expected = if index % 2 == 0 { 2 } else { 1 };
        let results = engine.results(id).expect("results");
        assert_eq!(results.total.actual, expected);
    }
}

#[test]
fn session_ids_parse_from_display() {
    let id = SessionId::new();
    let parsed: SessionId = id.to_string().parse().expect("uuid parses");
    assert_eq!(parsed, id);
    assert!("not-a-session".parse::<SessionId>().is_err());
}
