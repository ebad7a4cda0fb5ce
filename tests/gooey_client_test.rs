use axum::Router;
use axum::response::IntoResponse;
use axum::routing::{get, post};
use tokio::net::TcpListener;
use tokio::sync::oneshot;

use palaver::application::ports::{
    LipsyncSource, LipsyncSubmission, VideoBackendError, VideoJobState, VideoSynthesisBackend,
};
use palaver::infrastructure::video::GooeyLipsyncClient;

/// Mock provider serving both submission endpoints and a status document.
async fn start_mock_server(status_body: &'static str) -> (String, oneshot::Sender<()>) {
    let (shutdown_tx, shutdown_rx) = oneshot::channel::<()>();

    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    let base_url = format!("http://{}", addr);

    let submit_body = format!(
        r#"{{"run_id":"run-1","status_url":"{}/runs/run-1"}}"#,
        base_url
    );
    let tts_body = submit_body.clone();

    let app = Router::new()
        .route(
            "/v3/Lipsync/async",
            post(move || async move { submit_body.into_response() }),
        )
        .route(
            "/v3/LipsyncTTS/async",
            post(move || async move { tts_body.into_response() }),
        )
        .route(
            "/runs/run-1",
            get(move || async move { status_body.into_response() }),
        );

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

async fn start_rejecting_server(
    response_status: u16,
    response_body: &'static str,
) -> (String, oneshot::Sender<()>) {
    let (shutdown_tx, shutdown_rx) = oneshot::channel::<()>();

    let app = Router::new().route(
        "/v3/Lipsync/async",
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

fn audio_submission() -> LipsyncSubmission {
    LipsyncSubmission {
        face_url: "https://faces.invalid/face.png".to_string(),
        source: LipsyncSource::AudioUrl("https://artifacts.invalid/audio.mp3".to_string()),
    }
}

#[tokio::test]
async fn given_accepted_run_when_polling_completed_then_video_url_returned() {
    let status_body =
        r#"{"status":"completed","detail":null,"output":{"output_video":"https://videos.invalid/out.mp4"}}"#;
    let (base_url, shutdown_tx) = start_mock_server(status_body).await;

    let client = GooeyLipsyncClient::new(&base_url, "test-key");
    let job = client.submit(&audio_submission()).await.unwrap();
    assert_eq!(job.job_id, "run-1");

    let state = client.poll(&job).await.unwrap();
    assert_eq!(
        state,
        VideoJobState::Completed {
            video_url: "https://videos.invalid/out.mp4".to_string()
        }
    );
    shutdown_tx.send(()).ok();
}

#[tokio::test]
async fn given_text_submission_then_tts_endpoint_accepts_it() {
    let status_body = r#"{"status":"running","detail":null,"output":null}"#;
    let (base_url, shutdown_tx) = start_mock_server(status_body).await;

    let client = GooeyLipsyncClient::new(&base_url, "test-key");
    let submission = LipsyncSubmission {
        face_url: "https://faces.invalid/face.png".to_string(),
        source: LipsyncSource::Text("Hello there".to_string()),
    };

    let job = client.submit(&submission).await.unwrap();
    let state = client.poll(&job).await.unwrap();
    assert_eq!(state, VideoJobState::Running);
    shutdown_tx.send(()).ok();
}

#[tokio::test]
async fn given_failed_run_when_polling_then_failure_reason_surfaced() {
    let status_body = r#"{"status":"failed","detail":"no face detected","output":null}"#;
    let (base_url, shutdown_tx) = start_mock_server(status_body).await;

    let client = GooeyLipsyncClient::new(&base_url, "test-key");
    let job = client.submit(&audio_submission()).await.unwrap();

    let state = client.poll(&job).await.unwrap();
    assert_eq!(
        state,
        VideoJobState::Failed {
            reason: "no face detected".to_string()
        }
    );
    shutdown_tx.send(()).ok();
}

#[tokio::test]
async fn given_unprocessable_submission_then_rejected_input() {
    let (base_url, shutdown_tx) =
        start_rejecting_server(422, r#"{"detail":"input_face is required"}"#).await;

    let client = GooeyLipsyncClient::new(&base_url, "test-key");
    let result = client.submit(&audio_submission()).await;

    assert!(matches!(result, Err(VideoBackendError::RejectedInput(_))));
    shutdown_tx.send(()).ok();
}

#[tokio::test]
async fn given_unauthorized_submission_then_access_denied() {
    let (base_url, shutdown_tx) = start_rejecting_server(401, "invalid api key").await;

    let client = GooeyLipsyncClient::new(&base_url, "bad-key");
    let result = client.submit(&audio_submission()).await;

    assert!(matches!(result, Err(VideoBackendError::AccessDenied(_))));
    shutdown_tx.send(()).ok();
}

#[tokio::test]
async fn given_gateway_error_then_unavailable() {
    let (base_url, shutdown_tx) = start_rejecting_server(502, "bad gateway").await;

    let client = GooeyLipsyncClient::new(&base_url, "test-key");
    let result = client.submit(&audio_submission()).await;

    assert!(matches!(result, Err(VideoBackendError::Unavailable(_))));
    shutdown_tx.send(()).ok();
}
