use axum::Router;
use axum::response::IntoResponse;
use axum::routing::post;
use tokio::net::TcpListener;
use tokio::sync::oneshot;

use palaver::application::ports::{TranslationBackend, TranslationBackendError};
use palaver::domain::{LanguageCode, SourceLanguage};
use palaver::infrastructure::translation::GoogleTranslator;

async fn start_mock_server(
    response_status: u16,
    response_body: &'static str,
) -> (String, oneshot::Sender<()>) {
    let (shutdown_tx, shutdown_rx) = oneshot::channel::<()>();

    let app = Router::new().route(
        "/",
        post(move || async move {
            let status = axum::http::StatusCode::from_u16(response_status).unwrap();
            (status, response_body).into_response()
        }),
    );

    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    let base_url = format!("http://{}", addr);

    tokio::spawn(async move {
        axum::serve(listener, app)
            .with_graceful_shutdown(async {
                shutdown_rx.await.ok();
            })
            .await
            .ok();
    });

    (base_url, shutdown_tx)
}

fn spanish() -> LanguageCode {
    LanguageCode::parse("es").unwrap()
}

#[tokio::test]
async fn given_successful_response_when_translating_then_returns_text_and_detected_source() {
    let body = r#"{"data":{"translations":[{"translatedText":"Hola","detectedSourceLanguage":"en"}]}}"#;
    let (base_url, shutdown_tx) = start_mock_server(200, body).await;

    let translator = GoogleTranslator::new(&base_url, "test-key");
    let result = translator
        .translate("Hello", &SourceLanguage::Auto, &spanish())
        .await
        .unwrap();

    assert_eq!(result.text, "Hola");
    assert_eq!(result.detected_source.as_deref(), Some("en"));
    shutdown_tx.send(()).ok();
}

#[tokio::test]
async fn given_bad_request_when_translating_then_unsupported_pair() {
    let body = r#"{"error":{"code":400,"message":"Bad language pair: en|en"}}"#;
    let (base_url, shutdown_tx) = start_mock_server(400, body).await;

    let translator = GoogleTranslator::new(&base_url, "test-key");
    let result = translator
        .translate("Hello", &SourceLanguage::Auto, &spanish())
        .await;

    assert!(matches!(
        result,
        Err(TranslationBackendError::UnsupportedPair { .. })
    ));
    shutdown_tx.send(()).ok();
}

#[tokio::test]
async fn given_forbidden_response_when_translating_then_access_denied() {
    let body = r#"{"error":{"code":403,"message":"API key invalid"}}"#;
    let (base_url, shutdown_tx) = start_mock_server(403, body).await;

    let translator = GoogleTranslator::new(&base_url, "bad-key");
    let result = translator
        .translate("Hello", &SourceLanguage::Auto, &spanish())
        .await;

    assert!(matches!(
        result,
        Err(TranslationBackendError::AccessDenied(_))
    ));
    shutdown_tx.send(()).ok();
}

#[tokio::test]
async fn given_server_error_when_translating_then_unavailable() {
    let (base_url, shutdown_tx) = start_mock_server(503, "upstream overloaded").await;

    let translator = GoogleTranslator::new(&base_url, "test-key");
    let result = translator
        .translate("Hello", &SourceLanguage::Auto, &spanish())
        .await;

    assert!(matches!(
        result,
        Err(TranslationBackendError::Unavailable(_))
    ));
    shutdown_tx.send(()).ok();
}

#[tokio::test]
async fn given_empty_translations_array_then_invalid_response() {
    let body = r#"{"data":{"translations":[]}}"#;
    let (base_url, shutdown_tx) = start_mock_server(200, body).await;

    let translator = GoogleTranslator::new(&base_url, "test-key");
    let result = translator
        .translate("Hello", &SourceLanguage::Auto, &spanish())
        .await;

    assert!(matches!(
        result,
        Err(TranslationBackendError::InvalidResponse(_))
    ));
    shutdown_tx.send(()).ok();
}
