//! reqwest implementation of [`Backend`].

use async_trait::async_trait;
use reqwest::Url;
use reqwest::multipart::{Form, Part};
use serde::de::DeserializeOwned;
use tracing::debug;

use crate::config::{EDIT_SEGMENT, EditorConfig, UPLOAD_IMAGE_PATH};
use crate::models::AssessmentDocument;
use crate::protocol::{FileBlob, SaveResponse, UPLOAD_FIELD, UploadResponse};

use super::{Backend, BackendError};

/// Talks to the exam server over HTTP.
pub struct HttpBackend {
    client: reqwest::Client,
    config: EditorConfig,
}

impl HttpBackend {
    pub fn new(config: EditorConfig) -> Self {
        let client = reqwest::Client::builder()
            .connect_timeout(config.timeout.min(std::time::Duration::from_secs(5)))
            .timeout(config.timeout)
            .build()
            .unwrap_or_else(|_| reqwest::Client::new());

        Self { client, config }
    }

    pub fn config(&self) -> &EditorConfig {
        &self.config
    }

    async fn decode<T: DeserializeOwned>(response: reqwest::Response) -> Result<T, BackendError> {
        let status = response.status();
        if !status.is_success() {
            return Err(BackendError::Status(status.as_u16()));
        }

        let body = response.text().await?;
        serde_json::from_str(&body).map_err(BackendError::Decode)
    }
}

#[async_trait]
impl Backend for HttpBackend {
    async fn upload_image(&self, file: FileBlob) -> Result<String, BackendError> {
        let url = self.config.url(UPLOAD_IMAGE_PATH);
        debug!(%url, file = %file.file_name, bytes = file.bytes.len(), "uploading image");

        let part = Part::bytes(file.bytes)
            .file_name(file.file_name)
            .mime_str(&file.mime)?;
        let form = Form::new().part(UPLOAD_FIELD, part);

        let response = self.client.post(url).multipart(form).send().await?;
        let parsed: UploadResponse = Self::decode(response).await?;
        parsed.into_url().ok_or(BackendError::MissingUrl)
    }

    async fn save_assessment(
        &self,
        document: &AssessmentDocument,
    ) -> Result<SaveResponse, BackendError> {
        let url = edit_url(&self.config.server_url, &document.id)?;
        debug!(%url, questions = document.questions.len(), "saving assessment");

        let response = self.client.post(url).json(document).send().await?;
        Self::decode(response).await
    }
}

/// Save endpoint for `id` under `base`. The id is one encoded path segment,
/// so `/`, `?` and `#` in it cannot change the request target.
fn edit_url(base: &str, id: &str) -> Result<Url, BackendError> {
    let mut url = Url::parse(base).map_err(|e| BackendError::InvalidUrl(format!("{base}: {e}")))?;
    url.path_segments_mut()
        .map_err(|_| BackendError::InvalidUrl(base.to_string()))?
        .pop_if_empty()
        .extend([EDIT_SEGMENT, id]);
    Ok(url)
}

#[cfg(test)]
mod tests {
    use std::sync::{Arc, Mutex};

    use axum::extract::{Multipart, Path, State};
    use axum::http::StatusCode;
    use axum::routing::post;
    use axum::{Json, Router};
    use serde_json::Value;

    use super::*;
    use crate::models::{QuestionKind, QuestionRecord};

    #[derive(Debug, Clone, PartialEq)]
    enum Received {
        Upload {
            field: String,
            file_name: Option<String>,
            bytes: Vec<u8>,
        },
        Save {
            id: String,
            body: Value,
        },
    }

    /// Canned answer of the local exam server plus what it was sent.
    #[derive(Clone)]
    struct ServerState {
        status: StatusCode,
        body: String,
        received: Arc<Mutex<Vec<Received>>>,
    }

    async fn handle_upload(
        State(state): State<ServerState>,
        mut multipart: Multipart,
    ) -> (StatusCode, String) {
        while let Ok(Some(field)) = multipart.next_field().await {
            let name = field.name().unwrap_or_default().to_string();
            let file_name = field.file_name().map(str::to_string);
            let bytes = field.bytes().await.map(|b| b.to_vec()).unwrap_or_default();
            state.received.lock().unwrap().push(Received::Upload {
                field: name,
                file_name,
                bytes,
            });
        }
        (state.status, state.body.clone())
    }

    async fn handle_save(
        State(state): State<ServerState>,
        Path(id): Path<String>,
        Json(body): Json<Value>,
    ) -> (StatusCode, String) {
        state.received.lock().unwrap().push(Received::Save { id, body });
        (state.status, state.body.clone())
    }

    async fn spawn_server(status: StatusCode, body: &str) -> (HttpBackend, Arc<Mutex<Vec<Received>>>) {
        let received = Arc::new(Mutex::new(Vec::new()));
        let state = ServerState {
            status,
            body: body.to_string(),
            received: received.clone(),
        };
        let app = Router::new()
            .route(UPLOAD_IMAGE_PATH, post(handle_upload))
            .route("/edit/{id}", post(handle_save))
            .with_state(state);

        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move {
            let _ = axum::serve(listener, app).await;
        });

        let backend = HttpBackend::new(EditorConfig::new(format!("http://{addr}")));
        (backend, received)
    }

    fn picture() -> FileBlob {
        FileBlob::new("mapa.png", "image/png", vec![0x89, b'P', b'N', b'G'])
    }

    fn document(id: &str) -> AssessmentDocument {
        let mut question = QuestionRecord::new(1, QuestionKind::Discursive);
        question.text = "<p>Explain X</p>".to_string();
        AssessmentDocument {
            id: id.to_string(),
            questions: vec![question],
            ..AssessmentDocument::draft()
        }
    }

    #[tokio::test]
    async fn test_upload_sends_file_field_and_returns_url() {
        let (backend, received) =
            spawn_server(StatusCode::OK, r#"{"url": "/static/uploads/mapa.png"}"#).await;

        let url = backend.upload_image(picture()).await.unwrap();

        assert_eq!(url, "/static/uploads/mapa.png");
        assert_eq!(
            received.lock().unwrap().as_slice(),
            &[Received::Upload {
                field: UPLOAD_FIELD.to_string(),
                file_name: Some("mapa.png".to_string()),
                bytes: vec![0x89, b'P', b'N', b'G'],
            }]
        );
    }

    #[tokio::test]
    async fn test_upload_error_status_fails() {
        let (backend, _) =
            spawn_server(StatusCode::INTERNAL_SERVER_ERROR, r#"{"url": "/x.png"}"#).await;

        let err = backend.upload_image(picture()).await.unwrap_err();
        assert!(matches!(err, BackendError::Status(500)));
    }

    #[tokio::test]
    async fn test_upload_without_url_fails() {
        let (backend, _) = spawn_server(StatusCode::OK, r#"{"error": "too big"}"#).await;
        let err = backend.upload_image(picture()).await.unwrap_err();
        assert!(matches!(err, BackendError::MissingUrl));

        let (backend, _) = spawn_server(StatusCode::OK, "<html>oops</html>").await;
        let err = backend.upload_image(picture()).await.unwrap_err();
        assert!(matches!(err, BackendError::Decode(_)));
    }

    #[tokio::test]
    async fn test_save_posts_json_to_edit_endpoint() {
        let answer = serde_json::to_string(&SaveResponse::success("42")).unwrap();
        let (backend, received) = spawn_server(StatusCode::OK, &answer).await;

        let response = backend.save_assessment(&document("42")).await.unwrap();

        assert!(response.is_success());
        assert_eq!(response.id.as_deref(), Some("42"));
        let received = received.lock().unwrap();
        let Received::Save { id, body } = &received[0] else {
            panic!("expected a save request, got {:?}", received[0]);
        };
        assert_eq!(id, "42");
        assert_eq!(body["questions"][0]["type"], "discursive");
        assert_eq!(body["questions"][0]["text"], "<p>Explain X</p>");
    }

    #[tokio::test]
    async fn test_save_error_status_fails() {
        let (backend, _) = spawn_server(StatusCode::NOT_FOUND, r#"{"status": "error"}"#).await;

        let err = backend.save_assessment(&document("42")).await.unwrap_err();
        assert!(matches!(err, BackendError::Status(404)));
    }

    #[tokio::test]
    async fn test_save_with_unreadable_body_fails() {
        let (backend, _) = spawn_server(StatusCode::OK, "saved!").await;

        let err = backend.save_assessment(&document("42")).await.unwrap_err();
        assert!(matches!(err, BackendError::Decode(_)));
    }

    #[tokio::test]
    async fn test_save_id_stays_one_path_segment() {
        let answer = serde_json::to_string(&SaveResponse::success("a/b?c#d")).unwrap();
        let (backend, received) = spawn_server(StatusCode::OK, &answer).await;

        backend.save_assessment(&document("a/b?c#d")).await.unwrap();

        let received = received.lock().unwrap();
        assert!(matches!(&received[0], Received::Save { id, .. } if id == "a/b?c#d"));
    }

    #[test]
    fn test_edit_url_encodes_the_id() {
        let url = edit_url("http://exams.local", "a/b?c#d").unwrap();
        assert_eq!(url.as_str(), "http://exams.local/edit/a%2Fb%3Fc%23d");

        let url = edit_url("http://exams.local/app", "42").unwrap();
        assert_eq!(url.as_str(), "http://exams.local/app/edit/42");

        assert!(matches!(edit_url("not a url", "42"), Err(BackendError::InvalidUrl(_))));
    }
}
