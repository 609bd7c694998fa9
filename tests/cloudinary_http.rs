use std::collections::{BTreeMap, HashMap};
use std::sync::{Arc, Mutex};

use axum::extract::State;
use axum::http::StatusCode;
use axum::routing::post;
use axum::{Form, Json, Router};
use base64::Engine;
use base64::engine::general_purpose::STANDARD;
use serde_json::{Value, json};
use studybuddy::capability::Capability;
use studybuddy::config::CloudinaryCredentials;
use studybuddy::error::MediaError;
use studybuddy::media::cloudinary::sign_params;
use studybuddy::media::{AvatarManager, CloudinaryClient, ImageHost};
use tokio::net::TcpListener;

const PNG_MAGIC: &[u8] = &[0x89, b'P', b'N', b'G', 0x0D, 0x0A, 0x1A, 0x0A, 0, 0, 0, 13];

type Forms = Arc<Mutex<Vec<HashMap<String, String>>>>;

async fn upload_ok(
    State(forms): State<Forms>,
    Form(form): Form<HashMap<String, String>>,
) -> Json<Value> {
    forms.lock().expect("lock should not be poisoned").push(form);
    Json(json!({
        "asset_id": "3515c6000a548515f1134043f9785c2f",
        "public_id": "studybuddy-avatars/k3jd9x",
        "version": 1712345678,
        "format": "png",
        "width": 300,
        "height": 300,
        "bytes": 5120,
        "url": "http://res.cloudinary.com/demo/image/upload/v1712345678/studybuddy-avatars/k3jd9x.png",
        "secure_url": "https://res.cloudinary.com/demo/image/upload/v1712345678/studybuddy-avatars/k3jd9x.png"
    }))
}

async fn destroy_ok(
    State(forms): State<Forms>,
    Form(form): Form<HashMap<String, String>>,
) -> Json<Value> {
    forms.lock().expect("lock should not be poisoned").push(form);
    Json(json!({"result": "ok"}))
}

async fn serve(router: Router) -> String {
    let listener = TcpListener::bind("127.0.0.1:0")
        .await
        .expect("test listener should bind");
    let addr = listener.local_addr().expect("listener should have an address");
    tokio::spawn(async move {
        axum::serve(listener, router)
            .await
            .expect("test server should run");
    });
    format!("http://{addr}")
}

fn credentials() -> CloudinaryCredentials {
    CloudinaryCredentials {
        cloud_name: "demo".to_string(),
        api_key: "1234".to_string(),
        api_secret: "abcd".to_string(),
    }
}

fn manager_for(base_url: &str) -> AvatarManager {
    let client = CloudinaryClient::new(credentials(), base_url);
    AvatarManager::new(
        Capability::Enabled(Arc::new(client) as Arc<dyn ImageHost>),
        "studybuddy-avatars",
    )
}

fn signed_part(form: &HashMap<String, String>, keys: &[&'static str]) -> BTreeMap<&'static str, String> {
    keys.iter()
        .map(|key| (*key, form.get(*key).cloned().unwrap_or_default()))
        .collect()
}

#[tokio::test]
async fn upload_sends_signed_avatar_transformation() {
    let forms = Forms::default();
    let base = serve(
        Router::new()
            .route("/v1_1/demo/image/upload", post(upload_ok))
            .with_state(forms.clone()),
    )
    .await;
    let manager = manager_for(&base);

    let url = manager
        .upload_avatar("data:image/png;base64,iVBORw0KGgo=")
        .await
        .expect("upload should succeed");

    assert_eq!(
        url,
        "https://res.cloudinary.com/demo/image/upload/v1712345678/studybuddy-avatars/k3jd9x.png"
    );
    assert_eq!(manager.extract_public_id(&url), "studybuddy-avatars/k3jd9x");

    let form = forms.lock().expect("lock should not be poisoned").remove(0);
    assert_eq!(form["file"], "data:image/png;base64,iVBORw0KGgo=");
    assert_eq!(form["folder"], "studybuddy-avatars");
    assert_eq!(form["transformation"], "c_fill,g_face,h_300,w_300");
    assert_eq!(form["api_key"], "1234");
    let expected = sign_params(&signed_part(&form, &["folder", "timestamp", "transformation"]), "abcd");
    assert_eq!(form["signature"], expected);
}

#[tokio::test]
async fn upload_with_id_keeps_provider_identifier() {
    let forms = Forms::default();
    let base = serve(
        Router::new()
            .route("/v1_1/demo/image/upload", post(upload_ok))
            .with_state(forms.clone()),
    )
    .await;

    let avatar = manager_for(&base)
        .upload_avatar_with_id(&STANDARD.encode(PNG_MAGIC))
        .await
        .expect("upload should succeed");

    assert_eq!(avatar.public_id, "studybuddy-avatars/k3jd9x");
    let form = forms.lock().expect("lock should not be poisoned").remove(0);
    assert!(form["file"].starts_with("data:image/png;base64,"));
}

#[tokio::test]
async fn upload_failure_is_reported_without_cause() {
    let base = serve(Router::new().route(
        "/v1_1/demo/image/upload",
        post(|| async {
            (
                StatusCode::BAD_REQUEST,
                Json(json!({"error": {"message": "Invalid image file"}})),
            )
        }),
    ))
    .await;

    let err = manager_for(&base)
        .upload_avatar("https://example.com/me.png")
        .await
        .err()
        .expect("upload should fail");

    assert!(matches!(err, MediaError::Upload));
    assert_eq!(err.to_string(), "Failed to upload avatar");
}

#[tokio::test]
async fn invalid_payload_never_reaches_the_host() {
    let forms = Forms::default();
    let base = serve(
        Router::new()
            .route("/v1_1/demo/image/upload", post(upload_ok))
            .with_state(forms.clone()),
    )
    .await;

    let err = manager_for(&base)
        .upload_avatar("%%% definitely not an image %%%")
        .await
        .err()
        .expect("payload should be rejected");

    assert!(matches!(err, MediaError::InvalidPayload(_)));
    assert!(forms.lock().expect("lock should not be poisoned").is_empty());
}

#[tokio::test]
async fn delete_sends_signed_public_id() {
    let forms = Forms::default();
    let base = serve(
        Router::new()
            .route("/v1_1/demo/image/destroy", post(destroy_ok))
            .with_state(forms.clone()),
    )
    .await;

    let result = manager_for(&base)
        .delete_avatar("studybuddy-avatars/k3jd9x")
        .await
        .expect("delete should succeed");

    assert!(result.is_ok());
    let form = forms.lock().expect("lock should not be poisoned").remove(0);
    assert_eq!(form["public_id"], "studybuddy-avatars/k3jd9x");
    let expected = sign_params(&signed_part(&form, &["public_id", "timestamp"]), "abcd");
    assert_eq!(form["signature"], expected);
}

#[tokio::test]
async fn delete_failure_is_reported_without_cause() {
    let base = serve(Router::new().route(
        "/v1_1/demo/image/destroy",
        post(|| async { (StatusCode::UNAUTHORIZED, "Invalid Signature") }),
    ))
    .await;

    let err = manager_for(&base)
        .delete_avatar("studybuddy-avatars/k3jd9x")
        .await
        .err()
        .expect("delete should fail");

    assert!(matches!(err, MediaError::Delete));
    assert_eq!(err.to_string(), "Failed to delete avatar");
}

#[tokio::test]
async fn delete_of_unknown_id_returns_not_found() {
    let base = serve(Router::new().route(
        "/v1_1/demo/image/destroy",
        post(|| async { Json(json!({"result": "not found"})) }),
    ))
    .await;

    let result = manager_for(&base)
        .delete_avatar("studybuddy-avatars/missing")
        .await
        .expect("host answered, so delete should not error");

    assert!(!result.is_ok());
    assert_eq!(result.result, "not found");
}
