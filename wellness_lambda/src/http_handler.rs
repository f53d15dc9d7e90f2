use lambda_http::{Body, Error, Request, RequestExt, Response, http::Method};
use serde_json::json;
use std::sync::Arc;
use wellness_core::{handlers, Config, Cors, Envelope, Notifier, RecordSink, RecordStore};

/// Collaborators shared by every invocation
pub(crate) struct AppState {
    pub config: Config,
    pub diet: Arc<dyn RecordStore>,
    pub posture: Arc<dyn RecordStore>,
    pub questions: Arc<dyn RecordStore>,
    pub newsletter: Arc<dyn RecordSink>,
    pub registrations: Arc<dyn RecordSink>,
    pub notifier: Arc<dyn Notifier>,
}

#[derive(Debug, PartialEq)]
enum Route<'a> {
    Bmi,
    LungHealth,
    DietReport,
    RecoveryReport,
    Posture(Option<&'a str>),
    Questions,
    Register,
    Subscribe,
}

impl Route<'_> {
    fn cors(&self) -> Cors {
        match self {
            Route::Bmi | Route::LungHealth | Route::RecoveryReport => Cors::POST,
            Route::DietReport => Cors::POST_GET,
            Route::Posture(_) | Route::Questions => Cors::GET,
            Route::Register | Route::Subscribe => Cors::ACCOUNT,
        }
    }

    fn allows(&self, method: &Method) -> bool {
        match self {
            Route::DietReport => method == Method::POST || method == Method::GET,
            Route::Posture(_) | Route::Questions => method == Method::GET,
            _ => method == Method::POST,
        }
    }
}

/// Match on the trailing path segments so any stage prefix (`/prod/bmi`) works
fn route(path: &str) -> Option<Route<'_>> {
    let segments: Vec<&str> = path.split('/').filter(|s| !s.is_empty()).collect();
    let last = *segments.last()?;

    if segments.len() >= 2 && segments[segments.len() - 2] == "posture" {
        return Some(Route::Posture(Some(last)));
    }

    match last {
        "bmi" => Some(Route::Bmi),
        "lung-health" => Some(Route::LungHealth),
        "diet-report" => Some(Route::DietReport),
        "recovery-report" => Some(Route::RecoveryReport),
        "posture" => Some(Route::Posture(None)),
        "questions" => Some(Route::Questions),
        "register" => Some(Route::Register),
        "subscribe" => Some(Route::Subscribe),
        _ => None,
    }
}

/// Main Lambda handler - routes requests to the endpoint handlers
pub(crate) async fn function_handler(state: &AppState, event: Request) -> Result<Response<Body>, Error> {
    let method = event.method().clone();
    let path = event.uri().path().to_string();
    let body = std::str::from_utf8(event.body().as_ref()).ok();
    tracing::debug!("{} {}", method, path);

    let Some(route) = route(&path) else {
        return to_response(Envelope::not_found(Cors::POST_GET, "Not found"));
    };

    if method == Method::OPTIONS {
        return to_response(Envelope::preflight(route.cors()));
    }
    if !route.allows(&method) {
        return to_response(Envelope::new(
            405,
            route.cors(),
            json!({ "error": "Method not allowed" }),
        ));
    }

    let query = event.query_string_parameters_ref();
    let envelope = match route {
        Route::Bmi => handlers::bmi(body),
        Route::LungHealth => handlers::lung_health(body),
        Route::DietReport => {
            handlers::diet_report(state.diet.as_ref(), state.config.lookup.timeout(), body).await
        }
        Route::RecoveryReport => handlers::recovery_report(body),
        Route::Posture(from_path) => {
            let posture_id = event
                .path_parameters_ref()
                .and_then(|p| p.first("postureId"))
                .or(from_path);
            handlers::posture_report(state.posture.as_ref(), posture_id).await
        }
        Route::Questions => {
            let relationship_type = query.and_then(|q| {
                q.first("relationshipType").or_else(|| q.first("type"))
            });
            let category = query.and_then(|q| q.first("category"));
            handlers::training_questions(state.questions.as_ref(), relationship_type, category)
                .await
        }
        Route::Register => handlers::register_user(state.registrations.as_ref(), body).await,
        Route::Subscribe => {
            handlers::subscribe_user(
                state.newsletter.as_ref(),
                state.notifier.as_ref(),
                &state.config.notifier.sender_email,
                body,
            )
            .await
        }
    };

    tracing::info!("{} {} -> {}", method, path, envelope.status_code);
    to_response(envelope)
}

fn to_response(envelope: Envelope) -> Result<Response<Body>, Error> {
    let mut builder = Response::builder().status(envelope.status_code);
    for (name, value) in &envelope.headers {
        builder = builder.header(name.as_str(), value.as_str());
    }
    let resp = builder
        .body(Body::from(envelope.body_string()))
        .map_err(Box::new)?;
    Ok(resp)
}
