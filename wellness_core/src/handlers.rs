//! Endpoint handlers.
//!
//! Each handler takes the raw request body (or path/query values) plus any
//! injected collaborators and always answers with an `Envelope`. Errors are
//! mapped to envelopes here and never escape to the caller.

use crate::normalize::{self, Payload};
use crate::{
    accounts, bmi, lung, questions, recovery, resolver, Cors, Envelope, Error, Notifier,
    RecordSink, RecordStore, Result,
};
use serde_json::{json, Value};
use std::time::Duration;

/// Attribute holding the report text in the posture table
pub const POSTURE_REPORT_ATTRIBUTE: &str = "report";

/// `POST /bmi`
pub fn bmi(body: Option<&str>) -> Envelope {
    tracing::debug!("BMI request body: {:?}", body);
    let input = match normalize::parse_body(body).and_then(|p| normalize::bmi_input(&p)) {
        Ok(input) => input,
        Err(e) => return Envelope::from_error(Cors::POST, &e),
    };

    match bmi::assess_bmi(&input) {
        Ok(result) => Envelope::ok(Cors::POST, &result),
        Err(e) => Envelope::internal_with(Cors::POST, &e, "Failed to calculate BMI"),
    }
}

/// `POST /lung-health`
pub fn lung_health(body: Option<&str>) -> Envelope {
    tracing::debug!("Lung health request body: {:?}", body);
    let result = normalize::parse_body(body)
        .and_then(|p| normalize::lung_input(&p))
        .and_then(|input| lung::lung_health_score(&input));

    match result {
        Ok(score) => Envelope::ok(Cors::POST, &score),
        Err(e) => Envelope::from_error(Cors::POST, &e),
    }
}

/// `POST|GET /diet-report`
///
/// Every food group is optional, so an absent body reads as all zeros.
pub async fn diet_report(
    store: &dyn RecordStore,
    timeout: Duration,
    body: Option<&str>,
) -> Envelope {
    let payload = match body {
        Some(raw) if !raw.trim().is_empty() => normalize::parse_body(Some(raw)),
        _ => Ok(Payload::new()),
    };
    let input = match payload.and_then(|p| normalize::diet_input(&p)) {
        Ok(input) => input,
        Err(e) => return Envelope::from_error(Cors::POST_GET, &e),
    };

    let report = resolver::resolve_diet_report(store, &input, timeout).await;
    Envelope::ok(Cors::POST_GET, &report)
}

/// `POST /recovery-report`
pub fn recovery_report(body: Option<&str>) -> Envelope {
    match normalize::parse_body(body).and_then(|p| normalize::recovery_input(&p)) {
        Ok(input) => Envelope::ok(Cors::POST, &recovery::recovery_report(&input)),
        Err(e) => Envelope::from_error(Cors::POST, &e),
    }
}

/// `GET /posture/{postureId}`
pub async fn posture_report(store: &dyn RecordStore, posture_id: Option<&str>) -> Envelope {
    let posture_id = match posture_id.map(str::trim).filter(|id| !id.is_empty()) {
        Some(id) => id,
        None => return Envelope::bad_request(Cors::GET, "postureId", "Missing posture ID"),
    };

    match store.get(posture_id).await {
        Ok(Some(record)) => match record.get(POSTURE_REPORT_ATTRIBUTE) {
            Some(report) if !is_blank(report) => {
                Envelope::ok(Cors::GET, &json!({ "report": report }))
            }
            _ => Envelope::not_found(Cors::GET, "Posture report not found"),
        },
        Ok(None) => {
            tracing::debug!("No posture report for {}", posture_id);
            Envelope::not_found(Cors::GET, "Posture report not found")
        }
        Err(e) => Envelope::internal_with(Cors::GET, &e, "Failed to fetch posture report"),
    }
}

/// Null and empty-string reports count as missing
fn is_blank(value: &Value) -> bool {
    match value {
        Value::Null => true,
        Value::String(s) => s.trim().is_empty(),
        _ => false,
    }
}

/// `GET /questions?relationshipType=...&category=...`
pub async fn training_questions(
    store: &dyn RecordStore,
    relationship_type: Option<&str>,
    category: Option<&str>,
) -> Envelope {
    let relationship_type = match relationship_type.filter(|t| !t.trim().is_empty()) {
        Some(t) => t,
        None => {
            return Envelope::bad_request(
                Cors::GET,
                "relationshipType",
                "Missing relationshipType query parameter",
            )
        }
    };

    match store.query(relationship_type).await {
        Ok(records) => {
            let items: Vec<_> = questions::filter_by_category(records, category)
                .into_iter()
                .map(|r| r.into_value())
                .collect();
            tracing::debug!("{} questions for {}", items.len(), relationship_type);
            Envelope::ok(Cors::GET, &items)
        }
        Err(e) => Envelope::internal_with(Cors::GET, &e, "Failed to fetch questions"),
    }
}

fn account_payload(body: Option<&str>) -> Result<Payload> {
    normalize::parse_body(body)
}

/// `POST /register`
pub async fn register_user(sink: &dyn RecordSink, body: Option<&str>) -> Envelope {
    let outcome = match account_payload(body) {
        Ok(payload) => accounts::register(sink, &payload).await,
        Err(e) => Err(e),
    };
    account_envelope(outcome, "User registered successfully!")
}

/// `POST /subscribe`
pub async fn subscribe_user(
    sink: &dyn RecordSink,
    notifier: &dyn Notifier,
    sender: &str,
    body: Option<&str>,
) -> Envelope {
    let outcome = match account_payload(body) {
        Ok(payload) => accounts::subscribe(sink, notifier, sender, &payload).await,
        Err(e) => Err(e),
    };
    account_envelope(outcome, "Subscription successful!")
}

fn account_envelope(outcome: Result<()>, success: &str) -> Envelope {
    match outcome {
        Ok(()) => Envelope::message(200, Cors::ACCOUNT, success),
        Err(e @ Error::Validation { .. }) => Envelope::from_error(Cors::ACCOUNT, &e),
        Err(e) => Envelope::internal(Cors::ACCOUNT, &e),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{FoodGroup, LogNotifier, MemoryStore, Record, FALLBACK_TEXT};
    use serde_json::Value;

    const TIMEOUT: Duration = Duration::from_millis(200);

    #[test]
    fn test_bmi_end_to_end() {
        let envelope = bmi(Some(r#"{"height": 170, "weight": 70}"#));
        assert_eq!(envelope.status_code, 200);
        assert_eq!(envelope.body["bmi"], 24.22);
        assert_eq!(envelope.body["category"], "normal");
        assert_eq!(envelope.body["points"], 2);
        assert!(envelope.body["message"].is_string());
    }

    #[test]
    fn test_bmi_missing_weight() {
        let envelope = bmi(Some(r#"{"height": 170}"#));
        assert_eq!(envelope.status_code, 400);
        assert_eq!(
            envelope.body["error"],
            "Invalid input: height and weight are required"
        );
        assert_eq!(envelope.headers["Access-Control-Allow-Methods"], "OPTIONS,POST");
    }

    #[test]
    fn test_bmi_malformed_json() {
        assert_eq!(bmi(Some("{height:")).status_code, 400);
        assert_eq!(bmi(None).status_code, 400);
    }

    #[test]
    fn test_lung_health() {
        let envelope = lung_health(Some(
            r#"{"age": 40, "gender": "male", "pulse": "80", "breathHoldTime": 40}"#,
        ));
        assert_eq!(envelope.status_code, 200);
        assert_eq!(envelope.body["score"], 50.0);

        let envelope = lung_health(Some(
            r#"{"age": 40, "gender": "male", "pulse": 0, "breathHoldTime": 40}"#,
        ));
        assert_eq!(envelope.status_code, 400);
        assert_eq!(envelope.body["field"], "pulse");
    }

    #[test]
    fn test_non_finite_scores_are_500() {
        let envelope = lung_health(Some(
            r#"{"age": 1, "gender": "m", "pulse": 1e-300, "breathHoldTime": 1e300}"#,
        ));
        assert_eq!(envelope.status_code, 500);
        assert!(envelope.body.get("score").is_none());

        let envelope = bmi(Some(r#"{"height": 100, "weight": 1e307}"#));
        assert_eq!(envelope.status_code, 500);
        assert_eq!(envelope.body["error"], "Failed to calculate BMI");
    }

    #[tokio::test]
    async fn test_diet_report() {
        let store = MemoryStore::with_records(
            "reportId",
            vec![Record::new()
                .with("reportId", "veg-below")
                .with("recommendation", "Add a side salad.")],
        );

        let envelope = diet_report(&store, TIMEOUT, Some(r#"{"vegetables": 1}"#)).await;

        assert_eq!(envelope.status_code, 200);
        assert_eq!(envelope.body["vegetables"], "Add a side salad.");
        assert_eq!(envelope.body["fruits"], FALLBACK_TEXT);
        assert_eq!(envelope.body.as_object().unwrap().len(), FoodGroup::ALL.len());
        assert_eq!(
            envelope.headers["Access-Control-Allow-Methods"],
            "OPTIONS,POST,GET"
        );
    }

    #[tokio::test]
    async fn test_diet_report_keeps_presentation_order() {
        let store = MemoryStore::new("reportId");
        let envelope = diet_report(&store, TIMEOUT, None).await;

        let keys: Vec<&str> = envelope
            .body
            .as_object()
            .unwrap()
            .keys()
            .map(String::as_str)
            .collect();
        assert_eq!(
            keys,
            vec!["vegetables", "protein", "grains", "nutsSeeds", "dairy", "fruits"]
        );

        let wire = envelope.body_string();
        let positions: Vec<usize> = FoodGroup::ALL
            .iter()
            .map(|g| wire.find(&format!("\"{}\"", g.field_name())).unwrap())
            .collect();
        assert!(positions.windows(2).all(|w| w[0] < w[1]));
    }

    #[tokio::test]
    async fn test_diet_report_without_body_reads_zeros() {
        let store = MemoryStore::new("reportId");
        let envelope = diet_report(&store, TIMEOUT, None).await;
        assert_eq!(envelope.status_code, 200);

        let envelope = diet_report(&store, TIMEOUT, Some(r#"{"dairy": "lots"}"#)).await;
        assert_eq!(envelope.status_code, 400);
    }

    #[test]
    fn test_recovery_report() {
        let envelope = recovery_report(Some(
            r#"{"sleep": 6, "workoutRecovery": 20, "relaxation": 10}"#,
        ));
        assert_eq!(envelope.status_code, 200);
        assert_eq!(envelope.body["message"], "Your Recovery Report");
        let feedback = envelope.body["data"]["personalizedFeedback"].as_str().unwrap();
        assert!(feedback.contains("You should try to sleep more"));
        assert_eq!(envelope.body["data"]["sleep"], "You slept for 6 hours.");
    }

    #[tokio::test]
    async fn test_posture_report() {
        let store = MemoryStore::with_records(
            "posture_id",
            vec![
                Record::new()
                    .with("posture_id", "forward-head")
                    .with("report", "Tuck your chin."),
                Record::new().with("posture_id", "sway-back").with("report", ""),
            ],
        );

        let envelope = posture_report(&store, Some("forward-head")).await;
        assert_eq!(envelope.status_code, 200);
        assert_eq!(envelope.body["report"], "Tuck your chin.");

        assert_eq!(posture_report(&store, Some("slouch")).await.status_code, 404);
        assert_eq!(posture_report(&store, Some("sway-back")).await.status_code, 404);
        assert_eq!(posture_report(&store, None).await.status_code, 400);
    }

    #[tokio::test]
    async fn test_training_questions() {
        let store = MemoryStore::with_records(
            "RelationshipType",
            vec![
                Record::new()
                    .with("RelationshipType", "Partner")
                    .with("QuestionID", "Q1")
                    .with("Category", "General"),
                Record::new()
                    .with("RelationshipType", "Partner")
                    .with("QuestionID", "Q2")
                    .with("Category", "Trust"),
            ],
        );

        let envelope = training_questions(&store, Some("Partner"), None).await;
        assert_eq!(envelope.status_code, 200);
        assert_eq!(envelope.body.as_array().unwrap().len(), 2);

        let envelope = training_questions(&store, Some("Partner"), Some("Trust")).await;
        assert_eq!(envelope.body[0]["QuestionID"], "Q2");

        let envelope = training_questions(&store, Some("Stranger"), None).await;
        assert_eq!(envelope.body, Value::Array(vec![]));

        assert_eq!(training_questions(&store, None, None).await.status_code, 400);
    }

    #[tokio::test]
    async fn test_register_and_subscribe() {
        let store = MemoryStore::new("email");

        let envelope = register_user(
            &store,
            Some(r#"{"email":"a@b.co","firstName":"A","lastName":"B","password":"pw"}"#),
        )
        .await;
        assert_eq!(envelope.status_code, 200);
        assert_eq!(envelope.body["message"], "User registered successfully!");
        assert_eq!(
            envelope.headers["Access-Control-Allow-Headers"],
            "Content-Type, Authorization"
        );

        let envelope = subscribe_user(
            &store,
            &LogNotifier,
            "info@dyadic.health",
            Some(r#"{"email":"a@b.co"}"#),
        )
        .await;
        assert_eq!(envelope.status_code, 400);
        assert_eq!(store.len(), 1);
    }
}
