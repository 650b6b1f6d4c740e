//! Hosted token-classification model client
//!
//! Calls a Hugging Face style inference endpoint:
//! `POST {endpoint}/{model_id}` with `{"inputs": ..., "parameters": {...}}`,
//! answered by a list of `{entity_group|entity, word, score, start, end}`.
//!
//! The HTTP client is built on first use and cached for the lifetime of the
//! recognizer. Failures that cannot clear up between calls (a client that
//! will not build, 401/403/404/410 from the service) are cached too, and later
//! calls fail with the cached message without touching the network. Timeouts,
//! connection errors, 503 and other statuses are retried on the next call.

use std::time::Duration;

use once_cell::sync::OnceCell;
use reqwest::blocking::Client;
use reqwest::StatusCode;
use serde::{Deserialize, Serialize};

use jobreq_core::{Entity, JobReqError, NerConfig, Result};

use crate::ner::{validate_threshold, EntityRecognizer, LabelMap};

/// Recognizer backed by a hosted pretrained model
pub struct InferenceRecognizer {
    endpoint: String,
    model_id: String,
    api_token: Option<String>,
    timeout: Duration,
    labels: LabelMap,
    client: OnceCell<std::result::Result<Client, String>>,
    failure: OnceCell<String>,
}

#[derive(Debug, Serialize)]
struct InferenceRequest<'a> {
    inputs: &'a str,
    parameters: InferenceParameters,
}

#[derive(Debug, Serialize)]
struct InferenceParameters {
    aggregation_strategy: &'static str,
}

/// One prediction; grouped and ungrouped responses use different label keys
#[derive(Debug, Deserialize)]
struct Prediction {
    entity_group: Option<String>,
    entity: Option<String>,
    word: String,
    score: f64,
    start: Option<usize>,
    end: Option<usize>,
}

impl InferenceRecognizer {
    /// Create a new client for a model
    pub fn new(
        endpoint: impl Into<String>,
        model_id: impl Into<String>,
        labels: LabelMap,
    ) -> Self {
        Self {
            endpoint: endpoint.into(),
            model_id: model_id.into(),
            api_token: None,
            timeout: Duration::from_secs(30),
            labels,
            client: OnceCell::new(),
            failure: OnceCell::new(),
        }
    }

    /// Create from config
    pub fn from_config(config: &NerConfig) -> Self {
        Self {
            api_token: config.api_token.clone(),
            timeout: Duration::from_secs(config.timeout_secs),
            ..Self::new(
                config.endpoint.clone(),
                config.model_id.clone(),
                LabelMap::new(&config.label_categories),
            )
        }
    }

    /// Set the bearer token
    pub fn with_api_token(mut self, token: impl Into<String>) -> Self {
        self.api_token = Some(token.into());
        self
    }

    /// Set the request timeout
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Full model URL
    pub fn model_url(&self) -> String {
        format!(
            "{}/{}",
            self.endpoint.trim_end_matches('/'),
            self.model_id.trim_start_matches('/')
        )
    }

    /// Get the cached client, building it on first use
    fn client(&self) -> Result<&Client> {
        let cached = self.client.get_or_init(|| {
            tracing::debug!(model = %self.model_id, "Initializing inference client");
            Client::builder()
                .timeout(self.timeout)
                .build()
                .map_err(|e| format!("failed to build HTTP client: {e}"))
        });

        cached
            .as_ref()
            .map_err(|e| JobReqError::ModelUnavailable(e.clone()))
    }

    /// Remember a failure that later calls would repeat
    fn fail_permanently(&self, message: String) -> JobReqError {
        let message = self.failure.get_or_init(|| {
            tracing::warn!(model = %self.model_id, "Disabling inference: {message}");
            message
        });
        JobReqError::ModelUnavailable(message.clone())
    }

    fn to_entity(&self, text: &str, prediction: Prediction) -> Entity {
        let label = prediction
            .entity_group
            .or(prediction.entity)
            .unwrap_or_else(|| "UNKNOWN".to_string());

        // Offsets are character positions; fall back to the model's word
        let span = match (prediction.start, prediction.end) {
            (Some(start), Some(end)) => char_span(text, start, end),
            _ => None,
        };
        let span_text = span
            .map(str::to_string)
            .unwrap_or_else(|| prediction.word.replace("##", "").trim().to_string());

        let category = self.labels.normalize(&label);
        Entity::new(span_text, label, prediction.score, category)
    }
}

impl EntityRecognizer for InferenceRecognizer {
    fn recognize(&self, text: &str, confidence_threshold: f64) -> Result<Vec<Entity>> {
        validate_threshold(confidence_threshold)?;

        if text.trim().is_empty() {
            return Ok(Vec::new());
        }

        if let Some(message) = self.failure.get() {
            return Err(JobReqError::ModelUnavailable(message.clone()));
        }

        let client = self.client()?;
        let request = InferenceRequest {
            inputs: text,
            parameters: InferenceParameters {
                aggregation_strategy: "simple",
            },
        };

        let mut builder = client.post(self.model_url()).json(&request);
        if let Some(token) = &self.api_token {
            builder = builder.bearer_auth(token);
        }

        let response = builder
            .send()
            .map_err(|e| JobReqError::ModelUnavailable(format!("inference request failed: {e}")))?;

        let status = response.status();
        if status == StatusCode::SERVICE_UNAVAILABLE {
            return Err(JobReqError::ModelUnavailable(format!(
                "model {} is loading or unavailable",
                self.model_id
            )));
        }
        if !status.is_success() {
            let error_text = response.text().unwrap_or_default();
            let message = format!("inference error ({status}): {error_text}");
            if is_permanent(status) {
                return Err(self.fail_permanently(message));
            }
            return Err(JobReqError::ModelUnavailable(message));
        }

        let predictions: Vec<Prediction> = response.json().map_err(|e| {
            JobReqError::ModelUnavailable(format!("failed to parse inference response: {e}"))
        })?;

        tracing::debug!(count = predictions.len(), "Received model predictions");

        Ok(predictions
            .into_iter()
            .filter(|p| p.score >= confidence_threshold)
            .map(|p| self.to_entity(text, p))
            .filter(|e| !e.text.is_empty())
            .collect())
    }

    fn name(&self) -> &str {
        &self.model_id
    }
}

/// Statuses that repeat on every call with the same endpoint and token
fn is_permanent(status: StatusCode) -> bool {
    matches!(
        status,
        StatusCode::UNAUTHORIZED | StatusCode::FORBIDDEN | StatusCode::NOT_FOUND | StatusCode::GONE
    )
}

/// Slice `text` by character offsets
fn char_span(text: &str, start: usize, end: usize) -> Option<&str> {
    if start >= end {
        return None;
    }

    let mut indices = text.char_indices().map(|(i, _)| i).chain(Some(text.len()));
    let byte_start = indices.nth(start)?;
    let byte_end = indices.nth(end - start - 1)?;
    text.get(byte_start..byte_end)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::{BufRead, BufReader, Read, Write};
    use std::net::{TcpListener, TcpStream};
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::{Arc, Mutex};

    use jobreq_core::RequirementCategory;

    fn recognizer() -> InferenceRecognizer {
        InferenceRecognizer::from_config(&NerConfig::default())
    }

    /// Local HTTP endpoint answering every request with a fixed response
    struct StubServer {
        url: String,
        hits: Arc<AtomicUsize>,
        requests: Arc<Mutex<Vec<(String, String)>>>,
    }

    impl StubServer {
        fn start(status: &'static str, body: &'static str) -> Self {
            let listener = TcpListener::bind("127.0.0.1:0").unwrap();
            let url = format!("http://{}", listener.local_addr().unwrap());
            let hits = Arc::new(AtomicUsize::new(0));
            let requests = Arc::new(Mutex::new(Vec::new()));

            let (thread_hits, thread_requests) = (Arc::clone(&hits), Arc::clone(&requests));
            std::thread::spawn(move || {
                for mut stream in listener.incoming().flatten() {
                    thread_hits.fetch_add(1, Ordering::SeqCst);
                    let request = read_request(&stream);
                    thread_requests.lock().unwrap().push(request);

                    let response = format!(
                        "HTTP/1.1 {status}\r\nContent-Type: application/json\r\nContent-Length: {}\r\nConnection: close\r\n\r\n{body}",
                        body.len()
                    );
                    let _ = stream.write_all(response.as_bytes());
                }
            });

            Self {
                url,
                hits,
                requests,
            }
        }

        fn hits(&self) -> usize {
            self.hits.load(Ordering::SeqCst)
        }

        fn recognizer(&self) -> InferenceRecognizer {
            InferenceRecognizer::new(
                self.url.clone(),
                "test/ner-model",
                LabelMap::new(&NerConfig::default().label_categories),
            )
            .with_timeout(Duration::from_secs(5))
        }
    }

    /// Read one request; returns the lowercased head and the body
    fn read_request(stream: &TcpStream) -> (String, String) {
        let mut reader = BufReader::new(stream);
        let mut head = String::new();
        let mut content_length = 0;

        loop {
            let mut line = String::new();
            if reader.read_line(&mut line).unwrap_or(0) == 0 || line == "\r\n" {
                break;
            }
            let lower = line.to_ascii_lowercase();
            if let Some(value) = lower.strip_prefix("content-length:") {
                content_length = value.trim().parse().unwrap_or(0);
            }
            head.push_str(&lower);
        }

        let mut body = vec![0; content_length];
        let _ = reader.read_exact(&mut body);
        (head, String::from_utf8_lossy(&body).into_owned())
    }

    #[test]
    fn test_model_url() {
        let ner = InferenceRecognizer::new(
            "https://models.example.com/",
            "org/ner-model",
            LabelMap::default(),
        );
        assert_eq!(ner.model_url(), "https://models.example.com/org/ner-model");
        assert_eq!(ner.name(), "org/ner-model");
    }

    #[test]
    fn test_char_span() {
        assert_eq!(char_span("Python dev", 0, 6), Some("Python"));
        assert_eq!(char_span("naïve Rust", 6, 10), Some("Rust"));
        assert_eq!(char_span("short", 2, 2), None);
        assert_eq!(char_span("short", 3, 10), None);
    }

    #[test]
    fn test_prediction_to_entity_uses_offsets() {
        let ner = recognizer();
        let prediction = Prediction {
            entity_group: Some("MISC".to_string()),
            entity: None,
            word: "python".to_string(),
            score: 0.97,
            start: Some(21),
            end: Some(27),
        };

        let text = "We are looking for a Python developer";
        let entity = ner.to_entity(text, prediction);
        assert_eq!(entity.text, "Python");
        assert_eq!(entity.label, "MISC");
        assert_eq!(
            entity.category,
            jobreq_core::RequirementCategory::TechnicalSkill
        );
    }

    #[test]
    fn test_prediction_without_offsets_uses_word() {
        let ner = recognizer();
        let prediction = Prediction {
            entity_group: None,
            entity: Some("B-ORG".to_string()),
            word: "##Corp".to_string(),
            score: 0.8,
            start: None,
            end: None,
        };

        let entity = ner.to_entity("Acme Corp", prediction);
        assert_eq!(entity.text, "Corp");
        assert_eq!(entity.category, jobreq_core::RequirementCategory::Other);
    }

    #[test]
    fn test_parse_grouped_response() {
        let json = r#"[{"entity_group":"ORG","score":0.99,"word":"Acme","start":0,"end":4}]"#;
        let predictions: Vec<Prediction> = serde_json::from_str(json).unwrap();
        assert_eq!(predictions.len(), 1);
        assert_eq!(predictions[0].entity_group.as_deref(), Some("ORG"));
    }

    #[test]
    fn test_empty_text_skips_request() {
        let ner = InferenceRecognizer::new("http://127.0.0.1:9", "none", LabelMap::default());
        assert!(ner.recognize("   ", 0.7).unwrap().is_empty());
    }

    #[test]
    fn test_unreachable_endpoint_is_model_unavailable() {
        // Port 9 (discard) is closed on test hosts
        let ner = InferenceRecognizer::new("http://127.0.0.1:9", "none", LabelMap::default())
            .with_timeout(Duration::from_secs(2));
        let err = ner.recognize("Python developer", 0.7).unwrap_err();
        assert!(matches!(err, JobReqError::ModelUnavailable(_)));
    }

    #[test]
    fn test_recognize_filters_by_threshold_and_maps_char_offsets() {
        let server = StubServer::start(
            "200 OK",
            r#"[{"entity_group":"MISC","score":0.91,"word":"python","start":6,"end":12},
                {"entity_group":"ORG","score":0.5,"word":"Kafka","start":17,"end":22}]"#,
        );
        let ner = server.recognizer().with_api_token("secret");

        let entities = ner.recognize("Naïve Python and Kafka role", 0.7).unwrap();

        assert_eq!(entities.len(), 1);
        assert_eq!(entities[0].text, "Python");
        assert_eq!(entities[0].label, "MISC");
        assert_eq!(entities[0].confidence, 0.91);
        assert_eq!(entities[0].category, RequirementCategory::TechnicalSkill);

        let entities = ner.recognize("Naïve Python and Kafka role", 0.5).unwrap();
        assert_eq!(entities.len(), 2);
        assert_eq!(entities[1].text, "Kafka");
        assert_eq!(entities[1].category, RequirementCategory::Other);

        let requests = server.requests.lock().unwrap();
        let (head, body) = &requests[0];
        assert!(head.starts_with("post /test/ner-model "));
        assert!(head.contains("authorization: bearer secret"));
        assert!(body.contains(r#""aggregation_strategy":"simple""#));
        assert!(body.contains("Naïve Python"));
    }

    #[test]
    fn test_unauthorized_is_cached() {
        let server = StubServer::start("401 Unauthorized", r#"{"error":"Invalid token"}"#);
        let ner = server.recognizer();

        for _ in 0..5 {
            let err = ner.recognize("Python developer", 0.7).unwrap_err();
            match err {
                JobReqError::ModelUnavailable(message) => assert!(message.contains("401")),
                other => panic!("unexpected error: {other:?}"),
            }
        }
        assert_eq!(server.hits(), 1);
    }

    #[test]
    fn test_server_error_is_retried() {
        let server = StubServer::start("500 Internal Server Error", "boom");
        let ner = server.recognizer();

        for _ in 0..2 {
            let err = ner.recognize("Python developer", 0.7).unwrap_err();
            match err {
                JobReqError::ModelUnavailable(message) => assert!(message.contains("500")),
                other => panic!("unexpected error: {other:?}"),
            }
        }
        assert_eq!(server.hits(), 2);
    }

    #[test]
    fn test_loading_model_is_retried() {
        let server = StubServer::start("503 Service Unavailable", r#"{"error":"loading"}"#);
        let ner = server.recognizer();

        for _ in 0..2 {
            let err = ner.recognize("Python developer", 0.7).unwrap_err();
            match err {
                JobReqError::ModelUnavailable(message) => {
                    assert!(message.contains("loading or unavailable"))
                }
                other => panic!("unexpected error: {other:?}"),
            }
        }
        assert_eq!(server.hits(), 2);
    }

    #[test]
    fn test_malformed_response_is_model_unavailable() {
        let server = StubServer::start("200 OK", r#"{"not":"a list"}"#);
        let err = server.recognizer().recognize("Python", 0.7).unwrap_err();
        assert!(matches!(err, JobReqError::ModelUnavailable(_)));
    }
}
