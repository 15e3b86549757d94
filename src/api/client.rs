//! # API Client
//!
//! `reqwest` client for the reminder server. One client is built at startup and
//! shared by the poller and the dose logger.

use anyhow::{anyhow, Result};
use async_trait::async_trait;
use log::debug;
use reqwest::header::{HeaderMap, HeaderValue, CONTENT_TYPE, COOKIE};
use reqwest::{Client, Response, Url};

use crate::api::protocol::{decode_reminders, DoseLogged, MedicationId, Reminder};
use crate::api::{DoseRecorder, ReminderFeed};
use crate::core::{ApiError, Config};

const USER_AGENT: &str = concat!("medminder/", env!("CARGO_PKG_VERSION"));

pub struct ApiClient {
    http: Client,
    base_url: Url,
}

impl ApiClient {
    pub fn new(config: &Config) -> Result<Self> {
        let base_url = Url::parse(&config.base_url)
            .map_err(|e| anyhow!("Invalid base URL '{}': {}", config.base_url, e))?;

        let mut headers = HeaderMap::new();
        if let Some(ref cookie) = config.session_cookie {
            let value = HeaderValue::from_str(cookie)
                .map_err(|e| anyhow!("Session cookie is not a valid header value: {e}"))?;
            headers.insert(COOKIE, value);
        }

        let http = Client::builder()
            .timeout(config.request_timeout)
            .user_agent(USER_AGENT)
            .default_headers(headers)
            .build()?;

        Ok(ApiClient { http, base_url })
    }

    /// Build `{base}/{segments...}`, percent-encoding each segment
    fn endpoint(&self, segments: &[&str]) -> Url {
        let mut url = self.base_url.clone();
        if let Ok(mut path) = url.path_segments_mut() {
            path.pop_if_empty().extend(segments);
        }
        url
    }

    fn check_status(response: Response) -> Result<Response, ApiError> {
        let status = response.status();
        if status.is_success() {
            Ok(response)
        } else {
            Err(ApiError::Status(status))
        }
    }
}

#[async_trait]
impl ReminderFeed for ApiClient {
    async fn upcoming_reminders(&self) -> Result<Vec<Reminder>, ApiError> {
        let url = self.endpoint(&["api", "upcoming-reminders"]);
        debug!("GET {url}");

        let response = self.http.get(url).send().await.map_err(ApiError::Transport)?;
        let response = Self::check_status(response)?;
        // Only a body that is not a JSON array fails the whole fetch
        let rows = response
            .json::<Vec<serde_json::Value>>()
            .await
            .map_err(ApiError::Decode)?;
        Ok(decode_reminders(rows))
    }
}

#[async_trait]
impl DoseRecorder for ApiClient {
    async fn log_dose(&self, medication_id: &MedicationId) -> Result<DoseLogged, ApiError> {
        let id = medication_id.to_string();
        let url = self.endpoint(&["api", "dose", &id]);
        debug!("POST {url}");

        let response = self
            .http
            .post(url)
            .header(CONTENT_TYPE, "application/json")
            .send()
            .await
            .map_err(ApiError::Transport)?;
        let response = Self::check_status(response)?;
        response.json::<DoseLogged>().await.map_err(ApiError::Decode)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::extract::Path;
    use axum::http::{HeaderMap as AxumHeaders, StatusCode};
    use axum::routing::{get, post};
    use axum::{Json, Router};
    use serde_json::{json, Value};
    use std::time::Duration;

    async fn serve(router: Router) -> String {
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move {
            axum::serve(listener, router).await.unwrap();
        });
        format!("http://{addr}")
    }

    fn client_for(base_url: String) -> ApiClient {
        let config = Config {
            base_url,
            session_cookie: Some("session=abc123".to_string()),
            ..Config::default()
        };
        ApiClient::new(&config).unwrap()
    }

    #[tokio::test]
    async fn test_fetches_upcoming_reminders() {
        let router = Router::new().route(
            "/api/upcoming-reminders",
            get(|| async {
                Json(json!([
                    {"id": 1, "medication_name": "Aspirin", "dosage": "100mg", "time": "08:30", "medication_id": 7},
                    {"id": 2, "medication_name": "Metformin", "dosage": "500mg", "time": "19:00", "medication_id": 9}
                ]))
            }),
        );
        let client = client_for(serve(router).await);

        let reminders = client.upcoming_reminders().await.unwrap();
        assert_eq!(reminders.len(), 2);
        assert_eq!(reminders[0].medication_name, "Aspirin");
        assert_eq!(reminders[1].medication_id, MedicationId::Number(9));
    }

    #[tokio::test]
    async fn test_bad_row_does_not_drop_good_rows() {
        let router = Router::new().route(
            "/api/upcoming-reminders",
            get(|| async {
                Json(json!([
                    {"id": 7, "medication_name": "Aspirin", "dosage": "100mg", "time": "08:30", "medication_id": 7},
                    {"id": 8, "medication_name": "Broken", "dosage": null, "time": "08:30", "medication_id": 8}
                ]))
            }),
        );
        let client = client_for(serve(router).await);

        let reminders = client.upcoming_reminders().await.unwrap();
        assert_eq!(reminders.len(), 1);
        assert_eq!(reminders[0].medication_name, "Aspirin");
        assert_eq!(reminders[0].dosage, "100mg");
        assert_eq!(reminders[0].medication_id, MedicationId::Number(7));
    }

    #[tokio::test]
    async fn test_non_success_status_is_reported() {
        let router = Router::new().route(
            "/api/upcoming-reminders",
            get(|| async { StatusCode::SERVICE_UNAVAILABLE }),
        );
        let client = client_for(serve(router).await);

        match client.upcoming_reminders().await {
            Err(ApiError::Status(status)) => assert_eq!(status, StatusCode::SERVICE_UNAVAILABLE),
            other => panic!("expected status error, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn test_unexpected_body_is_decode_error() {
        let router = Router::new().route(
            "/api/upcoming-reminders",
            get(|| async { Json(json!({"error": "not a list"})) }),
        );
        let client = client_for(serve(router).await);

        assert!(matches!(
            client.upcoming_reminders().await,
            Err(ApiError::Decode(_))
        ));
    }

    #[tokio::test]
    async fn test_unreachable_server_is_transport_error() {
        // Bind then drop to get a port nobody listens on
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        drop(listener);

        let client = client_for(format!("http://{addr}"));
        assert!(matches!(
            client.upcoming_reminders().await,
            Err(ApiError::Transport(_))
        ));
    }

    #[tokio::test]
    async fn test_log_dose_posts_json_with_cookie() {
        let router = Router::new().route(
            "/api/dose/:id",
            post(|Path(id): Path<String>, headers: AxumHeaders| async move {
                let cookie = headers
                    .get("cookie")
                    .and_then(|v| v.to_str().ok())
                    .unwrap_or_default();
                let content_type = headers
                    .get("content-type")
                    .and_then(|v| v.to_str().ok())
                    .unwrap_or_default();
                if cookie != "session=abc123" || content_type != "application/json" {
                    return (StatusCode::UNAUTHORIZED, Json(Value::Null));
                }
                (
                    StatusCode::OK,
                    Json(json!({"success": true, "message": format!("Dose logged for {id}")})),
                )
            }),
        );
        let client = client_for(serve(router).await);

        let logged = client.log_dose(&MedicationId::Number(7)).await.unwrap();
        assert!(logged.success);
        assert_eq!(logged.message, "Dose logged for 7");
    }

    #[tokio::test]
    async fn test_log_dose_server_error() {
        let router = Router::new().route(
            "/api/dose/:id",
            post(|| async { StatusCode::INTERNAL_SERVER_ERROR }),
        );
        let client = client_for(serve(router).await);

        match client.log_dose(&MedicationId::Number(7)).await {
            Err(ApiError::Status(status)) => assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR),
            other => panic!("expected status error, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn test_slow_server_times_out() {
        let router = Router::new().route(
            "/api/upcoming-reminders",
            get(|| async {
                tokio::time::sleep(Duration::from_secs(2)).await;
                Json(json!([]))
            }),
        );
        let config = Config {
            base_url: serve(router).await,
            request_timeout: Duration::from_millis(200),
            ..Config::default()
        };
        let client = ApiClient::new(&config).unwrap();

        let err = client.upcoming_reminders().await.unwrap_err();
        assert!(err.is_timeout(), "expected timeout, got {err:?}");
    }

    #[test]
    fn test_endpoint_encodes_segments() {
        let client = client_for("http://localhost:5000/".to_string());
        let url = client.endpoint(&["api", "dose", "a b/c"]);
        assert_eq!(url.as_str(), "http://localhost:5000/api/dose/a%20b%2Fc");
    }

    #[test]
    fn test_invalid_cookie_rejected() {
        let config = Config {
            session_cookie: Some("bad\ncookie".to_string()),
            ..Config::default()
        };
        assert!(ApiClient::new(&config).is_err());
    }
}
