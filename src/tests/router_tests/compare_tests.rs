use crate::config::AppConfig;
use crate::errors::ServerError;
use crate::templates::pages::compare::NOTHING_SELECTED;
use crate::tests::utils::*;
use serde_json::json;
use std::sync::{Arc, Mutex};

fn select_both(t: &TestApp) -> String {
    let cookie = start_session(&t.app);
    post_form(&t.app, "/search", "city=Mixco", Some(&cookie)).unwrap();
    post_form(&t.app, "/select", "index=0&batch=1&selected=on", Some(&cookie)).unwrap();
    post_form(&t.app, "/select", "index=1&batch=1&selected=on", Some(&cookie)).unwrap();
    cookie
}

#[test]
fn comparison_series_follows_batch_order() {
    let t = test_app(vec![Ok(two_listings())]);
    let cookie = select_both(&t);

    assert_eq!(
        comparison_json(&t.app, &cookie),
        json!({ "points": [
            { "label": "A", "value": 200000.0 },
            { "label": "B", "value": 0.0 }
        ] })
    );
}

#[test]
fn compare_page_renders_chart_and_average() {
    let t = test_app(vec![Ok(two_listings())]);
    let cookie = select_both(&t);

    let resp = get(&t.app, "/compare", Some(&cookie)).unwrap();
    assert_eq!(resp.status(), 200);

    let body = body_string(resp);
    assert!(body.contains("width: 100.0%;"));
    assert!(body.contains("width: 0.0%;"));
    assert!(body.contains("Promedio"));
    assert!(body.contains("100000"));
    // no predictor configured
    assert!(!body.contains("/predict"));
}

#[test]
fn compare_with_nothing_selected_is_not_an_error() {
    let t = test_app(vec![Ok(two_listings())]);
    let cookie = start_session(&t.app);
    post_form(&t.app, "/search", "city=Mixco", Some(&cookie)).unwrap();

    let body = body_string(get(&t.app, "/compare", Some(&cookie)).unwrap());
    assert!(body.contains(NOTHING_SELECTED));
}

#[test]
fn comparison_downloads_as_xlsx() {
    let t = test_app(vec![Ok(two_listings())]);
    let cookie = select_both(&t);

    let resp = get(&t.app, "/compare.xlsx", Some(&cookie)).unwrap();

    assert_eq!(resp.status(), 200);
    assert_eq!(
        resp.headers().get("Content-Disposition").unwrap().to_str().unwrap(),
        "attachment; filename=\"comparacion_mixco.xlsx\""
    );
    assert!(body_bytes(resp).starts_with(b"PK"));
}

#[test]
fn prediction_is_not_found_when_disabled() {
    let t = test_app(vec![Ok(two_listings())]);
    let cookie = select_both(&t);

    let result = post_form(&t.app, "/predict", "", Some(&cookie));
    assert!(matches!(result, Err(ServerError::NotFound)));
}

#[test]
fn prediction_uses_the_selected_series() {
    let prompts = Arc::new(Mutex::new(Vec::new()));
    let predictor = StubPredictor {
        prompts: prompts.clone(),
        fail: false,
    };
    let t = test_app_with(
        AppConfig::default(),
        vec![Ok(two_listings())],
        None,
        Some(Box::new(predictor)),
    );
    let cookie = select_both(&t);

    let compare = body_string(get(&t.app, "/compare", Some(&cookie)).unwrap());
    assert!(compare.contains("/predict"));

    let body = body_string(post_form(&t.app, "/predict", "", Some(&cookie)).unwrap());
    assert!(body.contains("Los precios tienden a subir."));
    assert!(body.contains("Tendencia en Mixco"));

    let prompts = prompts.lock().unwrap();
    assert_eq!(prompts.len(), 1);
    assert!(prompts[0].contains("- A: 200000"));
    assert!(prompts[0].contains("- B: 0"));
}

#[test]
fn prediction_failure_is_shown_not_raised() {
    let predictor = StubPredictor {
        prompts: Arc::new(Mutex::new(Vec::new())),
        fail: true,
    };
    let t = test_app_with(
        AppConfig::default(),
        vec![Ok(two_listings())],
        None,
        Some(Box::new(predictor)),
    );
    let cookie = select_both(&t);

    let resp = post_form(&t.app, "/predict", "", Some(&cookie)).unwrap();
    assert_eq!(resp.status(), 200);
    assert!(body_string(resp).contains("Error al obtener la predicción"));
}

#[test]
fn prediction_without_selection_skips_the_model() {
    let prompts = Arc::new(Mutex::new(Vec::new()));
    let predictor = StubPredictor {
        prompts: prompts.clone(),
        fail: false,
    };
    let t = test_app_with(AppConfig::default(), vec![], None, Some(Box::new(predictor)));
    let cookie = start_session(&t.app);

    let body = body_string(post_form(&t.app, "/predict", "", Some(&cookie)).unwrap());

    assert!(body.contains(NOTHING_SELECTED));
    assert!(prompts.lock().unwrap().is_empty());
}
