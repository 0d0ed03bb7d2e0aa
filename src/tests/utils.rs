use crate::app::App;
use crate::config::AppConfig;
use crate::geocode::{Coordinates, GeocodeError, Geocoder};
use crate::predict::{PredictError, TrendPredictor};
use crate::router::handle;
use crate::search::{SearchError, SearchProvider};
use astra::{Body, Response};
use http::{Method, Request};
use serde_json::{json, Value};
use std::collections::VecDeque;
use std::io::Read;
use std::sync::{Arc, Mutex};

pub type Shared<T> = Arc<Mutex<Vec<T>>>;

/// Answers searches from a queue; an exhausted queue means "no results".
pub struct StubSearch {
    responses: Mutex<VecDeque<Result<Vec<Value>, SearchError>>>,
    queries: Shared<String>,
}

impl SearchProvider for StubSearch {
    fn search(&self, query: &str) -> Result<Vec<Value>, SearchError> {
        self.queries.lock().unwrap().push(query.to_string());
        self.responses
            .lock()
            .unwrap()
            .pop_front()
            .unwrap_or_else(|| Ok(Vec::new()))
    }
}

pub struct StubGeocoder {
    pub calls: Shared<String>,
}

impl Geocoder for StubGeocoder {
    fn geocode(&self, address: &str) -> Result<Option<Coordinates>, GeocodeError> {
        self.calls.lock().unwrap().push(address.to_string());
        Ok(Some(Coordinates { lat: 14.6, lon: -90.5 }))
    }
}

pub struct StubPredictor {
    pub prompts: Shared<String>,
    pub fail: bool,
}

impl TrendPredictor for StubPredictor {
    fn predict(&self, prompt: &str) -> Result<String, PredictError> {
        self.prompts.lock().unwrap().push(prompt.to_string());
        if self.fail {
            Err(PredictError::ApiError("503 - overloaded".into()))
        } else {
            Ok("Los precios tienden a subir.".to_string())
        }
    }
}

pub struct TestApp {
    pub app: App,
    pub queries: Shared<String>,
}

pub fn test_app(responses: Vec<Result<Vec<Value>, SearchError>>) -> TestApp {
    test_app_with(AppConfig::default(), responses, None, None)
}

pub fn test_app_with(
    config: AppConfig,
    responses: Vec<Result<Vec<Value>, SearchError>>,
    geocoder: Option<Box<dyn Geocoder>>,
    predictor: Option<Box<dyn TrendPredictor>>,
) -> TestApp {
    let queries: Shared<String> = Arc::default();
    let search = StubSearch {
        responses: Mutex::new(responses.into()),
        queries: queries.clone(),
    };

    TestApp {
        app: App::new(config, Box::new(search), geocoder, predictor),
        queries,
    }
}

/// Two listings: one priced as a string, one with an unusable price.
pub fn two_listings() -> Vec<Value> {
    vec![
        json!({ "title": "A", "snippet": "Casa con jardín", "price": "200000" }),
        json!({ "title": "B", "price": "bad" }),
    ]
}

pub fn get(app: &App, path: &str, cookie: Option<&str>) -> Result<Response, crate::errors::ServerError> {
    let mut builder = Request::builder().method(Method::GET).uri(path);
    if let Some(cookie) = cookie {
        builder = builder.header("Cookie", cookie);
    }
    handle(builder.body(Body::empty()).unwrap(), app)
}

pub fn post_form(
    app: &App,
    path: &str,
    form: &str,
    cookie: Option<&str>,
) -> Result<Response, crate::errors::ServerError> {
    let mut builder = Request::builder()
        .method(Method::POST)
        .uri(path)
        .header("Content-Type", "application/x-www-form-urlencoded");
    if let Some(cookie) = cookie {
        builder = builder.header("Cookie", cookie);
    }
    handle(builder.body(Body::from(form.to_string())).unwrap(), app)
}

/// Opens a session and returns its `session=...` cookie pair.
pub fn start_session(app: &App) -> String {
    let resp = get(app, "/", None).expect("home page failed");
    let set_cookie = resp
        .headers()
        .get("Set-Cookie")
        .expect("new session should set a cookie")
        .to_str()
        .unwrap();

    set_cookie.split(';').next().unwrap().to_string()
}

pub fn body_string(resp: Response) -> String {
    let mut body = String::new();
    resp.into_body().reader().read_to_string(&mut body).unwrap();
    body
}

pub fn body_bytes(resp: Response) -> Vec<u8> {
    let mut body = Vec::new();
    resp.into_body().reader().read_to_end(&mut body).unwrap();
    body
}

pub fn comparison_json(app: &App, cookie: &str) -> Value {
    let resp = get(app, "/api/comparison", Some(cookie)).unwrap();
    serde_json::from_str(&body_string(resp)).unwrap()
}
