//! Web form for uploading a recording and reading the prediction.
//!
//! Endpoints:
//! - GET  /            - Upload form
//! - POST /            - Upload (multipart field `audio`), page with the result
//! - POST /api/predict - Upload (multipart field `audio`), JSON [`Report`]
//! - GET  /healthz     - Liveness probe

use std::net::SocketAddr;
use std::sync::Arc;

use anyhow::{Context, Result};
use axum::{
    Router,
    body::Bytes,
    extract::{DefaultBodyLimit, Multipart, State, multipart::MultipartError},
    http::StatusCode,
    response::{Html, IntoResponse, Json, Response},
    routing::{get, post},
};
use minijinja::{Environment, context};
use parkvoice_detector::{PredictionService, Report};
use tower_http::trace::TraceLayer;
use tracing::{info, warn};

const TITLE: &str = "Parkinson's Disease Voice Detector 🎤🧠";
const DESCRIPTION: &str =
    "Upload a sustained vowel sound (like 'ahhh') to detect Parkinson's based on acoustic features.";

/// Shared handler state.
#[derive(Clone)]
pub struct AppState {
    service: Arc<PredictionService>,
    templates: Arc<Environment<'static>>,
}

impl AppState {
    pub fn new(service: PredictionService) -> Result<Self> {
        let mut env = Environment::new();
        env.add_template("index.html", INDEX_HTML)?;
        Ok(Self {
            service: Arc::new(service),
            templates: Arc::new(env),
        })
    }
}

/// Builds the router.
pub fn router(state: AppState, max_upload_bytes: usize) -> Router {
    Router::new()
        .route("/", get(index).post(submit))
        .route("/api/predict", post(api_predict))
        .route("/healthz", get(|| async { "ok" }))
        .layer(DefaultBodyLimit::max(max_upload_bytes))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

/// Binds `addr` and serves until Ctrl-C.
pub async fn serve(addr: &str, state: AppState, max_upload_bytes: usize) -> Result<()> {
    let addr = parse_addr(addr)?;
    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .with_context(|| format!("failed to bind {addr}"))?;
    info!("server started at http://{}", addr);

    axum::serve(listener, router(state, max_upload_bytes))
        .with_graceful_shutdown(shutdown_signal())
        .await?;
    info!("server stopped");
    Ok(())
}

/// Parses an address; `:7860` means all interfaces.
fn parse_addr(addr: &str) -> Result<SocketAddr> {
    let addr = if addr.starts_with(':') {
        format!("0.0.0.0{}", addr)
    } else {
        addr.to_string()
    };
    addr.parse()
        .with_context(|| format!("invalid listen address {addr:?}"))
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        warn!(error = %e, "failed to listen for ctrl-c");
        std::future::pending::<()>().await;
    }
}

async fn index(State(state): State<AppState>) -> Response {
    render_page(&state, None)
}

async fn submit(State(state): State<AppState>, multipart: Multipart) -> Response {
    let report = predict_upload(&state, multipart).await;
    render_page(&state, Some(&report))
}

async fn api_predict(State(state): State<AppState>, multipart: Multipart) -> Json<Report> {
    Json(predict_upload(&state, multipart).await)
}

/// Runs the pipeline on the uploaded `audio` field. Never fails: problems
/// with the upload become an error report.
async fn predict_upload(state: &AppState, mut multipart: Multipart) -> Report {
    let data = match read_audio(&mut multipart).await {
        Ok(Some(data)) => data,
        Ok(None) => return Report::failure("No audio file uploaded"),
        Err(e) => {
            warn!(error = %e, "bad upload");
            return Report::failure(format!("Invalid upload: {}", e.body_text()));
        }
    };

    let service = state.service.clone();
    match tokio::task::spawn_blocking(move || Report::new(&service.predict_wav_bytes(&data))).await {
        Ok(report) => report,
        Err(e) => {
            warn!(error = %e, "prediction task failed");
            Report::failure("Prediction failed unexpectedly")
        }
    }
}

async fn read_audio(multipart: &mut Multipart) -> Result<Option<Bytes>, MultipartError> {
    while let Some(field) = multipart.next_field().await? {
        if field.name() != Some("audio") {
            continue;
        }
        let data = field.bytes().await?;
        return Ok((!data.is_empty()).then_some(data));
    }
    Ok(None)
}

fn render_page(state: &AppState, report: Option<&Report>) -> Response {
    let page = state.templates.get_template("index.html").and_then(|tmpl| {
        tmpl.render(context! {
            title => TITLE,
            description => DESCRIPTION,
            report => report,
        })
    });
    match page {
        Ok(html) => Html(html).into_response(),
        Err(e) => {
            warn!(error = %e, "template render failed");
            (StatusCode::INTERNAL_SERVER_ERROR, "template error").into_response()
        }
    }
}

const INDEX_HTML: &str = r#"<!DOCTYPE html>
<html lang="en">
<head>
  <meta charset="utf-8">
  <title>{{ title }}</title>
  <style>
    body { font-family: system-ui, sans-serif; max-width: 40rem; margin: 3rem auto; padding: 0 1rem; }
    form { margin: 1.5rem 0; padding: 1rem; border: 1px solid #ccc; border-radius: 8px; }
    pre { font-size: 1.25rem; padding: 1rem; border-radius: 8px; background: #f4f4f4; white-space: pre-wrap; }
    pre.error { background: #fdecea; }
  </style>
</head>
<body>
  <h1>{{ title }}</h1>
  <p>{{ description }}</p>
  <form method="post" action="/" enctype="multipart/form-data">
    <label for="audio">Upload .wav file</label><br>
    <input id="audio" name="audio" type="file" accept=".wav,audio/wav,audio/x-wav" required>
    <button type="submit">Submit</button>
  </form>
  {% if report %}
  <pre class="{{ 'result' if report.ok else 'error' }}">{{ report.text }}</pre>
  {% endif %}
</body>
</html>
"#;

#[cfg(test)]
mod tests {
    use super::*;
    use parkvoice_model::classifier::LogisticRegression;
    use parkvoice_model::{CLASSES, Classifier, ModelStore, StandardScaler};
    use parkvoice_phonation::{FEATURE_COUNT, FeatureExtractor};
    use std::io::Cursor;

    fn test_state() -> AppState {
        let classifier = Classifier::LogisticRegression(LogisticRegression {
            classes: CLASSES.to_vec(),
            coef: vec![0.0; FEATURE_COUNT],
            intercept: 1.0,
        });
        let store = ModelStore::from_parts(classifier, StandardScaler::identity()).unwrap();
        let service = PredictionService::new(Arc::new(store), FeatureExtractor::default());
        AppState::new(service).unwrap()
    }

    fn wav(samples: impl Iterator<Item = f64>) -> Vec<u8> {
        let spec = hound::WavSpec {
            channels: 1,
            sample_rate: 16000,
            bits_per_sample: 16,
            sample_format: hound::SampleFormat::Int,
        };
        let mut cursor = Cursor::new(Vec::new());
        {
            let mut writer = hound::WavWriter::new(&mut cursor, spec).unwrap();
            for s in samples {
                writer.write_sample((s * 32767.0) as i16).unwrap();
            }
            writer.finalize().unwrap();
        }
        cursor.into_inner()
    }

    fn vowel() -> Vec<u8> {
        wav((0..16000).map(|i| {
            let t = i as f64 / 16000.0;
            (1..=4)
                .map(|h| 0.3 * (2.0 * std::f64::consts::PI * 150.0 * h as f64 * t).sin() / h as f64)
                .sum()
        }))
    }

    async fn spawn_server() -> String {
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        let app = router(test_state(), 1024 * 1024);
        tokio::spawn(async move {
            axum::serve(listener, app).await.unwrap();
        });
        format!("http://{addr}")
    }

    fn upload(data: Vec<u8>) -> reqwest::multipart::Form {
        let part = reqwest::multipart::Part::bytes(data).file_name("clip.wav");
        reqwest::multipart::Form::new().part("audio", part)
    }

    #[test]
    fn test_parse_addr() {
        assert_eq!(parse_addr(":7860").unwrap().to_string(), "0.0.0.0:7860");
        assert_eq!(parse_addr("127.0.0.1:80").unwrap().to_string(), "127.0.0.1:80");
        assert!(parse_addr("nope").is_err());
    }

    #[test]
    fn test_page_renders() {
        let state = test_state();
        let report = Report::failure("No audio file uploaded");
        let page = state
            .templates
            .get_template("index.html")
            .unwrap()
            .render(context! { title => TITLE, description => DESCRIPTION, report => Some(&report) })
            .unwrap();
        assert!(page.contains("Upload .wav file"));
        assert!(page.contains("No audio file uploaded"));
        assert!(page.contains(r#"class="error""#));
    }

    #[tokio::test]
    async fn test_silent_upload_reports_no_voiced_frames() {
        let base = spawn_server().await;
        let silent = wav(std::iter::repeat_n(0.0, 16000));

        let report: serde_json::Value = reqwest::Client::new()
            .post(format!("{base}/api/predict"))
            .multipart(upload(silent))
            .send()
            .await
            .unwrap()
            .json()
            .await
            .unwrap();

        assert_eq!(report["ok"], false);
        let text = report["text"].as_str().unwrap();
        assert!(text.starts_with("⚠️"), "{}", text);
        assert!(text.contains("No voiced frames found"), "{}", text);
    }

    #[tokio::test]
    async fn test_vowel_upload_reports_label() {
        let base = spawn_server().await;

        let report: serde_json::Value = reqwest::Client::new()
            .post(format!("{base}/api/predict"))
            .multipart(upload(vowel()))
            .send()
            .await
            .unwrap()
            .json()
            .await
            .unwrap();

        assert_eq!(report["ok"], true, "{}", report);
        // Intercept 1.0 with zero weights: P(class 1) = sigmoid(1).
        assert_eq!(report["label"], "parkinsons");
        assert_eq!(
            report["text"],
            "🧠 Parkinson's Detected\nConfidence: 73.11%"
        );
    }

    #[tokio::test]
    async fn test_form_page_round_trip() {
        let base = spawn_server().await;
        let client = reqwest::Client::new();

        let page = client.get(&base).send().await.unwrap().text().await.unwrap();
        assert!(page.contains("Parkinson's Disease Voice Detector"));

        let resp = client
            .post(&base)
            .multipart(reqwest::multipart::Form::new().text("other", "x"))
            .send()
            .await
            .unwrap();
        assert_eq!(resp.status(), reqwest::StatusCode::OK);
        let page = resp.text().await.unwrap();
        assert!(page.contains("No audio file uploaded"), "{}", page);

        let health = client.get(format!("{base}/healthz")).send().await.unwrap();
        assert_eq!(health.text().await.unwrap(), "ok");
    }
}
