use std::sync::Arc;

use insta::assert_json_snapshot;
use serde_json::json;

use assess_spec::{
    AnswerSet, Form, ScoreTally, Session, load, load_catalog, resolve_visibility, score,
};

fn catalog_fixture() -> &'static str {
    include_str!("fixtures/self_assessment.json")
}

fn climate_form() -> Arc<Form> {
    let catalog = load_catalog(catalog_fixture()).expect("catalog should load");
    Arc::clone(catalog.form("climateForm").expect("climate form"))
}

fn basics_form() -> Arc<Form> {
    let document = json!([
        {
            "text": "Basics",
            "questions": [
                {
                    "type": "radio",
                    "text": "Tri des déchets ?",
                    "options": [
                        { "id": "sort/yes", "text": "Oui", "score": 2 },
                        { "id": "sort/no", "text": "Non", "score": 0 }
                    ]
                },
                {
                    "type": "checkbox",
                    "text": "Gestes",
                    "options": [
                        { "id": "habits/bike", "text": "Vélo", "score": 1 },
                        { "id": "habits/none", "text": "Aucun", "score": -1 },
                        { "id": "habits/plane", "text": "Avion", "score": 0 }
                    ]
                }
            ]
        }
    ]);
    Arc::new(load(&document.to_string()).expect("basics form loads"))
}

#[test]
fn empty_answers_score_zero_against_visible_maximum() {
    let form = climate_form();
    let session = Session::new(Arc::clone(&form));
    let report = score(&form, session.answers(), session.visibility());

    let maxima: Vec<i64> = report
        .sections
        .iter()
        .map(|section| section.score.max)
        .collect();
    assert_eq!(maxima, vec![11, 2, 16]);
    assert_eq!(report.total, ScoreTally { actual: 0, max: 29 });
    assert_eq!(report.total.ratio(), Some(0.0));
}

#[test]
fn answered_options_add_their_score() {
    let form = climate_form();
    let mut session = Session::new(Arc::clone(&form));
    session
        .set_radio("canexplain", "canexplain/yes")
        .expect("canexplain");
    session.set_radio("knowlaw", "knowlaw/no").expect("knowlaw");

    let report = score(&form, session.answers(), session.visibility());
    let maturity = &report.sections[0];
    assert_eq!(maturity.title, "Maturité climat");
    assert_eq!(maturity.score, ScoreTally { actual: 1, max: 11 });
    assert_eq!(maturity.score.ratio(), Some(1.0 / 11.0));
}

#[test]
fn revealed_questions_raise_the_maximum() {
    let form = climate_form();
    let mut session = Session::new(Arc::clone(&form));
    session.set_radio("hasObj", "hasObj/yes").expect("hasObj");

    let report = score(&form, session.answers(), session.visibility());
    assert_eq!(report.sections[0].score, ScoreTally { actual: 1, max: 16 });
    assert_eq!(report.total.max, 29 + 3 + 2);
}

#[test]
fn checkbox_maximum_counts_positive_scores_only() {
    let form = basics_form();
    let habits = form.question("habits").expect("habits");
    assert_eq!(habits.max_score(), 1);
    let sort = form.question("sort").expect("sort");
    assert_eq!(sort.max_score(), 2);

    let mut session = Session::new(Arc::clone(&form));
    session.add_checkbox("habits", "habits/none").expect("none");
    session.add_checkbox("habits", "habits/bike").expect("bike");
    let report = score(&form, session.answers(), session.visibility());
    assert_eq!(report.total, ScoreTally { actual: 0, max: 3 });
}

#[test]
fn all_zero_form_has_no_ratio() {
    let catalog = load_catalog(catalog_fixture()).expect("catalog should load");
    let company = Arc::clone(catalog.form("companyForm").expect("company form"));
    let mut session = Session::new(Arc::clone(&company));
    session.set_radio("size", "size/pme").expect("size");

    let report = score(&company, session.answers(), session.visibility());
    assert_eq!(report.total, ScoreTally { actual: 0, max: 0 });
    assert_eq!(report.total.ratio(), None);
}

#[test]
fn scoring_ignores_answers_of_hidden_questions() {
    let form = climate_form();
    let mut session = Session::new(Arc::clone(&form));
    session.set_radio("hasObj", "hasObj/yes").expect("hasObj");
    session
        .set_radio("parisCompat", "parisCompat/yes")
        .expect("parisCompat");

    // Same answers scored against the initial visibility: parisCompat is hidden.
    let initial = resolve_visibility(&form, &AnswerSet::new());
    let report = score(&form, session.answers(), &initial);
    assert_eq!(report.sections[0].score, ScoreTally { actual: 1, max: 11 });
}

#[test]
fn report_serializes_per_section() {
    let form = basics_form();
    let mut session = Session::new(Arc::clone(&form));
    session.set_radio("sort", "sort/yes").expect("sort");
    session.add_checkbox("habits", "habits/bike").expect("bike");

    let report = score(&form, session.answers(), session.visibility());
    assert_json_snapshot!(report, @r###"
    {
      "sections": [
        {
          "title": "Basics",
          "score": {
            "actual": 3,
            "max": 3
          }
        }
      ],
      "total": {
        "actual": 3,
        "max": 3
      }
    }
    "###);
}
