use crate::config::AppConfig;
use crate::errors::ServerError;
use crate::search::SearchError;
use crate::tests::utils::*;
use serde_json::json;
use std::sync::{Arc, Mutex};

#[test]
fn new_visitor_gets_a_session_and_default_city() {
    let t = test_app(vec![]);

    let resp = get(&t.app, "/", None).unwrap();
    assert_eq!(resp.status(), 200);

    let cookie = resp.headers().get("Set-Cookie").unwrap().to_str().unwrap();
    assert!(cookie.starts_with("session="));
    assert!(cookie.contains("HttpOnly"));

    let body = body_string(resp);
    assert!(body.contains("Ciudad de Guatemala"));
}

#[test]
fn returning_visitor_keeps_the_session() {
    let t = test_app(vec![]);
    let cookie = start_session(&t.app);

    let resp = get(&t.app, "/", Some(&cookie)).unwrap();
    assert!(resp.headers().get("Set-Cookie").is_none());
}

#[test]
fn search_builds_query_and_redirects_home() {
    let t = test_app(vec![Ok(two_listings())]);
    let cookie = start_session(&t.app);

    let resp = post_form(&t.app, "/search", "city=Mixco", Some(&cookie)).unwrap();

    assert_eq!(resp.status(), 303);
    assert_eq!(resp.headers().get("Location").unwrap().to_str().unwrap(), "/");
    assert_eq!(*t.queries.lock().unwrap(), vec!["properties in Mixco".to_string()]);

    let body = body_string(get(&t.app, "/", Some(&cookie)).unwrap());
    assert!(body.contains("Propiedades en Mixco"));
    assert!(body.contains("Casa con jardín"));
    assert!(body.contains("Precio: 200000"));
    // missing snippet and unusable price get placeholders
    assert!(body.contains("No hay descripción disponible."));
    assert!(body.contains("Precio: N/D"));
    assert!(body.contains("0 seleccionadas"));
}

#[test]
fn blank_city_falls_back_to_default() {
    let t = test_app(vec![Ok(two_listings())]);
    let cookie = start_session(&t.app);

    post_form(&t.app, "/search", "city=+++", Some(&cookie)).unwrap();

    assert_eq!(
        *t.queries.lock().unwrap(),
        vec!["properties in Ciudad de Guatemala".to_string()]
    );
}

#[test]
fn configured_template_is_used() {
    let mut config = AppConfig::default();
    config.query = crate::domain::QueryBuilder::new("propiedades en {location}").unwrap();
    let t = test_app_with(config, vec![Ok(two_listings())], None, None);
    let cookie = start_session(&t.app);

    post_form(&t.app, "/search", "city=Antigua%20Guatemala", Some(&cookie)).unwrap();

    assert_eq!(
        *t.queries.lock().unwrap(),
        vec!["propiedades en Antigua Guatemala".to_string()]
    );
}

#[test]
fn empty_results_show_a_notice() {
    let t = test_app(vec![Ok(Vec::new())]);
    let cookie = start_session(&t.app);

    post_form(&t.app, "/search", "city=Xela", Some(&cookie)).unwrap();

    let body = body_string(get(&t.app, "/", Some(&cookie)).unwrap());
    assert!(body.contains("No se encontraron propiedades."));
    assert!(!body.contains("seleccionadas"));
}

#[test]
fn failed_search_clears_the_batch_and_reports() {
    let t = test_app(vec![
        Ok(two_listings()),
        Err(SearchError::Status {
            status: 403,
            body: "bad key".into(),
        }),
    ]);
    let cookie = start_session(&t.app);

    post_form(&t.app, "/search", "city=Mixco", Some(&cookie)).unwrap();
    post_form(&t.app, "/select", "index=0&batch=1&selected=on", Some(&cookie)).unwrap();
    let resp = post_form(&t.app, "/search", "city=Xela", Some(&cookie)).unwrap();
    assert_eq!(resp.status(), 303);

    let body = body_string(get(&t.app, "/", Some(&cookie)).unwrap());
    assert!(body.contains("Error al obtener datos de búsqueda"));
    assert!(body.contains("403"));
    assert!(!body.contains("Casa con jardín"));

    assert_eq!(comparison_json(&t.app, &cookie), json!({ "points": [] }));
}

#[test]
fn failed_search_can_preserve_the_last_batch() {
    let config = AppConfig {
        preserve_batch_on_failure: true,
        ..AppConfig::default()
    };
    let t = test_app_with(
        config,
        vec![Ok(two_listings()), Err(SearchError::Network("timeout".into()))],
        None,
        None,
    );
    let cookie = start_session(&t.app);

    post_form(&t.app, "/search", "city=Mixco", Some(&cookie)).unwrap();
    post_form(&t.app, "/select", "index=0&batch=1&selected=on", Some(&cookie)).unwrap();
    post_form(&t.app, "/search", "city=Xela", Some(&cookie)).unwrap();

    let body = body_string(get(&t.app, "/", Some(&cookie)).unwrap());
    assert!(body.contains("timeout"));
    assert!(body.contains("Casa con jardín"));

    assert_eq!(
        comparison_json(&t.app, &cookie),
        json!({ "points": [{ "label": "A", "value": 200000.0 }] })
    );
}

#[test]
fn markers_are_geocoded_once_per_batch() {
    let calls: Shared<String> = Arc::new(Mutex::new(Vec::new()));
    let geocoder = StubGeocoder {
        calls: calls.clone(),
    };
    let listings = vec![
        json!({ "title": "Casa", "address": "Zona 10", "price": 250000 }),
        json!({ "title": "Sin dirección", "price": 1 }),
    ];
    let t = test_app_with(
        AppConfig::default(),
        vec![Ok(listings)],
        Some(Box::new(geocoder)),
        None,
    );
    let cookie = start_session(&t.app);

    post_form(&t.app, "/search", "city=Mixco", Some(&cookie)).unwrap();
    let first = body_string(get(&t.app, "/", Some(&cookie)).unwrap());
    let second = body_string(get(&t.app, "/", Some(&cookie)).unwrap());

    assert!(first.contains("Casa: $250000"));
    assert!(second.contains("Casa: $250000"));
    assert_eq!(*calls.lock().unwrap(), vec!["Zona 10".to_string()]);
}

#[test]
fn unknown_route_is_not_found() {
    let t = test_app(vec![]);
    let result = get(&t.app, "/nope", None);

    assert!(matches!(result, Err(ServerError::NotFound)));
}

#[test]
fn cookieless_requests_that_keep_no_state_open_no_session() {
    let t = test_app(vec![]);

    for _ in 0..20 {
        assert!(matches!(get(&t.app, "/nope", None), Err(ServerError::NotFound)));

        let result = post_form(&t.app, "/select", "index=0&batch=0&selected=on", None);
        assert!(matches!(result, Err(ServerError::Conflict(_))));

        let result = post_form(&t.app, "/select", "index=0&batch=0", Some("session=forged"));
        assert!(matches!(result, Err(ServerError::Conflict(_))));

        let resp = get(&t.app, "/compare", None).unwrap();
        assert!(resp.headers().get("Set-Cookie").is_none());
        assert!(body_string(resp).contains("No se seleccionaron propiedades para comparar."));
    }

    assert_eq!(t.app.sessions.len(), 0);
}

#[test]
fn cookieless_search_opens_a_session() {
    let t = test_app(vec![Ok(two_listings())]);

    let resp = post_form(&t.app, "/search", "city=Mixco", None).unwrap();
    assert_eq!(resp.status(), 303);
    let set_cookie = resp.headers().get("Set-Cookie").unwrap().to_str().unwrap();
    let cookie = set_cookie.split(';').next().unwrap().to_string();

    assert_eq!(t.app.sessions.len(), 1);
    let body = body_string(get(&t.app, "/", Some(&cookie)).unwrap());
    assert!(body.contains("Propiedades en Mixco"));
}
