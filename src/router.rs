use crate::app::App;
use crate::domain::{project, ComparisonSeries, StoreState};
use crate::errors::ServerError;
use crate::geocode::map_markers;
use crate::predict::trend_prompt;
use crate::responses::{error_to_response, html_response, json_response, see_other, ResultResp};
use crate::session::{session_expired, token_from_cookie_header, Session, SessionRegistry};
use crate::spreadsheets::export_comparison_xlsx;
use crate::templates::pages::compare::NOTHING_SELECTED;
use crate::templates::pages::{
    compare_page, home_page, prediction_page, selection_count, HomeVm, ListingRow,
};
use astra::Request;
use std::collections::HashMap;
use std::io::Read;
use std::str::FromStr;

const MAX_FORM_BYTES: u64 = 64 * 1024;

/// The caller's session for one request; opened only by routes that need
/// to keep state.
struct RequestSession<'a> {
    registry: &'a SessionRegistry,
    token: Option<String>,
    created: bool,
    now: i64,
}

impl RequestSession<'_> {
    fn token(&self) -> Option<&str> {
        self.token.as_deref()
    }

    fn open(&mut self) -> Result<String, ServerError> {
        if let Some(token) = &self.token {
            return Ok(token.clone());
        }

        let token = self.registry.open(self.now)?;
        self.token = Some(token.clone());
        self.created = true;
        Ok(token)
    }
}

pub fn handle(req: Request, app: &App) -> ResultResp {
    let now = chrono::Utc::now().timestamp();

    let cookie = req
        .headers()
        .get("Cookie")
        .and_then(|v| v.to_str().ok())
        .and_then(token_from_cookie_header)
        .map(str::to_string);

    let mut session = RequestSession {
        registry: &app.sessions,
        token: app.sessions.touch(cookie.as_deref(), now)?,
        created: false,
        now,
    };

    let mut resp = match route(req, app, &mut session) {
        Ok(resp) => resp,
        // A session opened by a failed request still needs its cookie.
        Err(e) if session.created => error_to_response(e),
        Err(e) => return Err(e),
    };

    if let (true, Some(token)) = (session.created, session.token()) {
        let cookie = format!(
            "session={token}; Path=/; HttpOnly; SameSite=Lax; Max-Age={}",
            app.config.session_ttl_secs
        );
        resp.headers_mut().insert(
            "set-cookie",
            cookie.parse().map_err(|_| ServerError::InternalError)?,
        );
    }

    Ok(resp)
}

fn route(req: Request, app: &App, session: &mut RequestSession) -> ResultResp {
    let method = req.method().as_str().to_string();
    let path = req.uri().path().to_string();

    tracing::debug!(%method, %path, "request");

    match (method.as_str(), path.as_str()) {
        ("GET", "/") => home(app, session),
        ("POST", "/search") => search(req, app, session),
        ("POST", "/select") => select(req, app, session.token()),
        ("GET", "/compare") => compare(app, session.token()),
        ("GET", "/compare.xlsx") => compare_xlsx(app, session.token()),
        ("GET", "/api/comparison") => comparison_json(app, session.token()),
        ("POST", "/predict") => predict(app, session.token()),
        _ => Err(ServerError::NotFound),
    }
}

fn home(app: &App, session: &mut RequestSession) -> ResultResp {
    let token = session.open()?;

    let (mut vm, pending) = app.sessions.with_session(&token, |s| {
        let mut vm = home_vm(app, s);
        let generation = s.results.generation();

        let pending = match &s.markers {
            Some((cached, markers)) if *cached == generation => {
                vm.markers = markers.clone();
                None
            }
            _ if app.geocoder.is_some() && s.results.state() == StoreState::Populated => {
                Some((generation, s.results.records().to_vec()))
            }
            _ => None,
        };

        Ok((vm, pending))
    })?;

    // Geocode outside the session lock; it is network-bound.
    if let (Some((generation, records)), Some(geocoder)) = (pending, app.geocoder.as_deref()) {
        let markers = map_markers(&records, geocoder);
        vm.markers = markers.clone();

        app.sessions.with_session(&token, |s| {
            if s.results.generation() == generation {
                s.markers = Some((generation, markers));
            }
            Ok(())
        })?;
    }

    html_response(home_page(&vm))
}

fn home_vm(app: &App, s: &Session) -> HomeVm {
    let rows = s
        .results
        .records()
        .iter()
        .enumerate()
        .map(|(index, record)| ListingRow {
            index,
            title: record.title().to_string(),
            snippet: record.snippet().map(str::to_string),
            price_label: record.price_label(),
            selected: s.results.is_selected(index),
        })
        .collect();

    HomeVm {
        city: session_city(app, s),
        results_city: s.city.clone(),
        notice: s.notice.clone(),
        rows,
        batch: s.results.generation(),
        selected_count: s.results.selected_count(),
        markers: Vec::new(),
        map_center: app.config.map_center,
    }
}

fn search(req: Request, app: &App, session: &mut RequestSession) -> ResultResp {
    let form = read_form(req)?;

    let city = form
        .get("city")
        .map(|c| c.trim())
        .filter(|c| !c.is_empty())
        .unwrap_or(app.config.default_city.as_str())
        .to_string();

    let query = app.config.query.build(&city);
    tracing::info!(%city, %query, "searching listings");

    // Network call happens before the session is locked.
    let outcome = app.search.search(&query);

    let token = session.open()?;
    app.sessions.with_session(&token, |s| {
        s.apply_search(&city, outcome, app.config.preserve_batch_on_failure);
        tracing::info!(listings = s.results.len(), "batch ingested");
        Ok(())
    })?;

    see_other("/")
}

fn select(req: Request, app: &App, token: Option<&str>) -> ResultResp {
    // Without a session there is no batch to select from.
    let token = token.ok_or_else(session_expired)?;
    let form = read_form(req)?;

    let index: usize = parse_field(&form, "index")?;
    let batch: u64 = parse_field(&form, "batch")?;
    // htmx only sends a checked checkbox
    let value = matches!(
        form.get("selected").map(String::as_str),
        Some("on" | "true" | "1")
    );

    let count = app.sessions.with_session(token, |s| {
        if s.results.generation() != batch {
            tracing::warn!(
                batch,
                current = s.results.generation(),
                "selection for a replaced batch"
            );
            return Err(ServerError::Conflict(
                "La lista de propiedades cambió; recargue la página.".into(),
            ));
        }

        s.results.set_selected(index, value).map_err(|e| {
            tracing::error!(index, error = %e, "selection out of sync with batch");
            ServerError::from(e)
        })?;

        Ok(s.results.selected_count())
    })?;

    html_response(selection_count(count))
}

fn selected_series(
    app: &App,
    token: Option<&str>,
) -> Result<(String, ComparisonSeries), ServerError> {
    app.sessions.view(token, |s| {
        (session_city(app, s), project(s.results.selected_records()))
    })
}

fn compare(app: &App, token: Option<&str>) -> ResultResp {
    let (_, series) = selected_series(app, token)?;
    html_response(compare_page(&series, app.predictor.is_some()))
}

fn compare_xlsx(app: &App, token: Option<&str>) -> ResultResp {
    let (city, series) = selected_series(app, token)?;
    export_comparison_xlsx(&series, &city)
}

fn comparison_json(app: &App, token: Option<&str>) -> ResultResp {
    let (_, series) = selected_series(app, token)?;
    json_response(&series)
}

fn predict(app: &App, token: Option<&str>) -> ResultResp {
    let Some(predictor) = app.predictor.as_deref() else {
        return Err(ServerError::NotFound);
    };

    let (city, series) = selected_series(app, token)?;
    if series.is_empty() {
        return html_response(prediction_page(&city, Err(NOTHING_SELECTED.to_string())));
    }

    match predictor.predict(&trend_prompt(&city, &series)) {
        Ok(text) => html_response(prediction_page(&city, Ok(text.as_str()))),
        Err(e) => {
            tracing::warn!(error = %e, "trend prediction failed");
            html_response(prediction_page(
                &city,
                Err(format!("Error al obtener la predicción: {e}")),
            ))
        }
    }
}

fn session_city(app: &App, s: &Session) -> String {
    if s.city.is_empty() {
        app.config.default_city.clone()
    } else {
        s.city.clone()
    }
}

fn read_form(mut req: Request) -> Result<HashMap<String, String>, ServerError> {
    let mut body = Vec::new();
    req.body_mut()
        .reader()
        .take(MAX_FORM_BYTES + 1)
        .read_to_end(&mut body)
        .map_err(|e| ServerError::BadRequest(format!("failed to read body: {e}")))?;

    if body.len() as u64 > MAX_FORM_BYTES {
        return Err(ServerError::BadRequest("request body too large".into()));
    }

    Ok(url::form_urlencoded::parse(&body).into_owned().collect())
}

fn parse_field<T: FromStr>(form: &HashMap<String, String>, name: &str) -> Result<T, ServerError> {
    form.get(name)
        .and_then(|v| v.trim().parse().ok())
        .ok_or_else(|| ServerError::BadRequest(format!("missing or invalid field '{name}'")))
}
