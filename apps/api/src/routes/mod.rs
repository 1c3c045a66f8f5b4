pub mod health;
pub mod ui;

use axum::{
    http::Uri,
    routing::{get, post},
    Router,
};

use crate::context::handlers as context;
use crate::errors::AppError;
use crate::generation::handlers as generation;
use crate::report::handlers as report;
use crate::state::AppState;

async fn not_found(uri: Uri) -> AppError {
    AppError::NotFound(format!("No route for {uri}"))
}

pub fn build_router(state: AppState) -> Router {
    Router::new()
        .route("/", get(ui::index_handler))
        .route("/api/health", get(health::health_handler))
        // Role catalog and context
        .route("/api/roles", get(context::handle_list_roles))
        .route("/api/context", get(context::handle_get_context))
        // Prompt composition and generation
        .route("/api/prompt", post(generation::handle_compose_prompt))
        .route("/api/generate", post(generation::handle_generate))
        // Report export
        .route("/api/report", post(report::handle_report))
        .fallback(not_found)
        .with_state(state)
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;
    use std::sync::Arc;

    use async_trait::async_trait;
    use axum::{
        body::Body,
        http::{header, Request, StatusCode},
        response::{IntoResponse, Response},
        Json,
    };
    use serde_json::{json, Value};
    use tower::ServiceExt;

    use super::*;
    use crate::config::Config;
    use crate::context::ContextStore;
    use crate::llm_client::OllamaClient;
    use crate::report::PdfRenderer;

    struct StubContexts(HashMap<String, String>);

    #[async_trait]
    impl ContextStore for StubContexts {
        async fn context_for_role(&self, role: &str) -> String {
            self.0.get(role).cloned().unwrap_or_default()
        }
    }

    /// Mock inference host: "good" models stream text, anything else fails.
    async fn mock_generate(Json(body): Json<Value>) -> Response {
        let model = body["model"].as_str().unwrap_or_default();
        if model.starts_with("good") {
            let lines = [
                json!({"model": model, "response": "Output from ", "done": false}),
                json!({"model": model, "response": model, "done": false}),
                json!({"model": model, "response": "", "done": true}),
            ];
            lines
                .iter()
                .map(|l| format!("{l}\n"))
                .collect::<String>()
                .into_response()
        } else {
            (
                StatusCode::SERVICE_UNAVAILABLE,
                Json(json!({"error": "model is loading"})),
            )
                .into_response()
        }
    }

    async fn spawn_inference_host() -> String {
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        let app = Router::new().route("/api/generate", post(mock_generate));
        tokio::spawn(async move {
            axum::serve(listener, app).await.unwrap();
        });
        format!("http://{addr}")
    }

    fn test_state(config: Config, roles: Vec<&str>) -> AppState {
        let contexts = HashMap::from([(
            "Chef".to_string(),
            "Plan menus and direct kitchen staff.".to_string(),
        )]);
        let llm = OllamaClient::new(
            &config.ollama_host,
            config.max_tokens,
            config.generation_timeout,
        )
        .unwrap();
        AppState {
            config,
            roles: Arc::new(roles.into_iter().map(String::from).collect()),
            contexts: Arc::new(StubContexts(contexts)),
            llm,
            pdf: PdfRenderer::unavailable(),
        }
    }

    fn app(roles: Vec<&str>) -> Router {
        build_router(test_state(Config::for_tests(), roles))
    }

    async fn app_with_models(mistral: &str, qwen: &str) -> Router {
        let mut config = Config::for_tests();
        config.ollama_host = spawn_inference_host().await;
        config.mistral_model = mistral.to_string();
        config.qwen_model = qwen.to_string();
        build_router(test_state(config, vec!["Chef"]))
    }

    fn get_request(uri: &str) -> Request<Body> {
        Request::builder().uri(uri).body(Body::empty()).unwrap()
    }

    fn post_json(uri: &str, body: Value) -> Request<Body> {
        Request::builder()
            .method("POST")
            .uri(uri)
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(body.to_string()))
            .unwrap()
    }

    async fn body_bytes(response: Response) -> Vec<u8> {
        axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap()
            .to_vec()
    }

    async fn body_json(response: Response) -> Value {
        serde_json::from_slice(&body_bytes(response).await).unwrap()
    }

    #[tokio::test]
    async fn test_health_with_empty_catalog() {
        let response = app(vec![]).oneshot(get_request("/api/health")).await.unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(
            body_json(response).await,
            json!({"status": "ok", "mistral_model": "mistral:latest", "qwen_model": "qwen3:4b"})
        );
    }

    #[tokio::test]
    async fn test_roles_listed_in_order() {
        let response = app(vec!["Nurse", "Chef", "Actuary"])
            .oneshot(get_request("/api/roles"))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(body_json(response).await, json!(["Nurse", "Chef", "Actuary"]));
    }

    #[tokio::test]
    async fn test_empty_catalog_lists_no_roles() {
        let response = app(vec![]).oneshot(get_request("/api/roles")).await.unwrap();
        assert_eq!(body_json(response).await, json!([]));
    }

    #[tokio::test]
    async fn test_context_for_known_and_unknown_roles() {
        let app = app(vec!["Chef"]);

        let response = app
            .clone()
            .oneshot(get_request("/api/context?role=Chef"))
            .await
            .unwrap();
        assert_eq!(
            body_json(response).await,
            json!({"context": "Plan menus and direct kitchen staff."})
        );

        let response = app
            .oneshot(get_request("/api/context?role=Astronaut%20Chef"))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(body_json(response).await, json!({"context": ""}));
    }

    #[tokio::test]
    async fn test_context_without_role_is_structured_400() {
        let response = app(vec![]).oneshot(get_request("/api/context")).await.unwrap();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        assert_eq!(body_json(response).await["error"]["code"], "VALIDATION_ERROR");
    }

    #[tokio::test]
    async fn test_prompt_preview_matches_composer() {
        let response = app(vec![])
            .oneshot(post_json(
                "/api/prompt",
                json!({"role": "Chef", "task": "Write a menu", "style": ""}),
            ))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        let prompt = body_json(response).await["prompt"]
            .as_str()
            .unwrap()
            .to_string();
        assert!(prompt.starts_with("Role: Chef\n\nTask:\nWrite a menu\n\n"));
        assert!(!prompt.contains("Style:"));
    }

    #[tokio::test]
    async fn test_generate_rejects_blank_task() {
        let response = app(vec![])
            .oneshot(post_json("/api/generate", json!({"role": "Chef", "task": "  "})))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        assert_eq!(body_json(response).await["error"]["code"], "VALIDATION_ERROR");
    }

    #[tokio::test]
    async fn test_generate_without_task_is_structured_400() {
        let response = app(vec![])
            .oneshot(post_json("/api/generate", json!({"role": "Chef"})))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        let body = body_json(response).await;
        assert_eq!(body["error"]["code"], "VALIDATION_ERROR");
        assert_eq!(body["error"]["message"], "task cannot be empty");
    }

    #[tokio::test]
    async fn test_malformed_generate_bodies_are_structured_400() {
        let app = app(vec![]);
        let bodies = [
            Body::from(json!({"role": "Chef", "task": null}).to_string()),
            Body::from(json!({"role": "Chef", "task": 42}).to_string()),
            Body::from("{not json"),
        ];
        for body in bodies {
            let request = Request::builder()
                .method("POST")
                .uri("/api/generate")
                .header(header::CONTENT_TYPE, "application/json")
                .body(body)
                .unwrap();
            let response = app.clone().oneshot(request).await.unwrap();
            assert_eq!(response.status(), StatusCode::BAD_REQUEST);
            assert_eq!(body_json(response).await["error"]["code"], "VALIDATION_ERROR");
        }
    }

    #[tokio::test]
    async fn test_prompt_without_json_content_type_is_structured_400() {
        let request = Request::builder()
            .method("POST")
            .uri("/api/prompt")
            .body(Body::from(json!({"role": "Chef", "task": "Write"}).to_string()))
            .unwrap();
        let response = app(vec![]).oneshot(request).await.unwrap();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        assert_eq!(body_json(response).await["error"]["code"], "VALIDATION_ERROR");
    }

    #[tokio::test]
    async fn test_generate_returns_both_outputs() {
        let app = app_with_models("good-mistral", "good-qwen").await;
        let response = app
            .oneshot(post_json(
                "/api/generate",
                json!({"role": "Chef", "task": "Write a menu"}),
            ))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(
            body_json(response).await,
            json!({
                "mistral": "Output from good-mistral",
                "qwen": "Output from good-qwen"
            })
        );
    }

    #[tokio::test]
    async fn test_generate_one_backend_failing() {
        let app = app_with_models("good-mistral", "broken-qwen").await;
        let response = app
            .oneshot(post_json(
                "/api/generate",
                json!({"role": "Chef", "task": "Write a menu"}),
            ))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        let body = body_json(response).await;
        assert_eq!(body["mistral"], "Output from good-mistral");
        let qwen = body["qwen"].as_str().unwrap();
        assert!(
            qwen.starts_with("[Error calling Qwen model broken-qwen: "),
            "qwen was {qwen}"
        );
        assert!(qwen.contains("model is loading"));
    }

    #[tokio::test]
    async fn test_generate_host_unreachable() {
        // Config::for_tests points the inference host at a closed port.
        let response = app(vec![])
            .oneshot(post_json(
                "/api/generate",
                json!({"role": "Chef", "task": "Write a menu"}),
            ))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        let body = body_json(response).await;
        assert!(body["mistral"]
            .as_str()
            .unwrap()
            .starts_with("[Error calling Mistral model mistral:latest: "));
        assert!(body["qwen"]
            .as_str()
            .unwrap()
            .starts_with("[Error calling Qwen model qwen3:4b: "));
    }

    #[tokio::test]
    async fn test_text_report_download() {
        let response = app(vec![])
            .oneshot(post_json(
                "/api/report",
                json!({"type": "txt", "mistral": "M <out>", "qwen": "Q & out"}),
            ))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(
            response.headers()[header::CONTENT_DISPOSITION],
            "attachment; filename=\"art_of_prompting_report.txt\""
        );
        let text = String::from_utf8(body_bytes(response).await).unwrap();
        assert!(text.contains("M <out>"));
        assert!(text.contains("Q & out"));
    }

    #[tokio::test]
    async fn test_html_report_download() {
        let response = app(vec![])
            .oneshot(post_json(
                "/api/report",
                json!({"type": "html", "mistral": "Mistral verbatim", "qwen": "Qwen verbatim"}),
            ))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(
            response.headers()[header::CONTENT_TYPE],
            "text/html; charset=utf-8"
        );
        let html = String::from_utf8(body_bytes(response).await).unwrap();
        assert!(html.contains("<pre style=\"white-space:pre-wrap\">Mistral verbatim</pre>"));
        assert!(html.contains("<pre style=\"white-space:pre-wrap\">Qwen verbatim</pre>"));
    }

    #[tokio::test]
    async fn test_pdf_report_without_renderer() {
        let response = app(vec![])
            .oneshot(post_json(
                "/api/report",
                json!({"type": "pdf", "mistral": "m", "qwen": "q"}),
            ))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        assert_eq!(
            body_json(response).await["error"]["code"],
            "CAPABILITY_UNAVAILABLE"
        );
    }

    #[tokio::test]
    async fn test_unknown_report_type() {
        let response = app(vec![])
            .oneshot(post_json(
                "/api/report",
                json!({"type": "docx", "mistral": "m", "qwen": "q"}),
            ))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        let body = body_json(response).await;
        assert_eq!(body["error"]["code"], "VALIDATION_ERROR");
        assert!(body["error"]["message"].as_str().unwrap().contains("docx"));
    }

    #[tokio::test]
    async fn test_report_with_null_output_is_structured_400() {
        let response = app(vec![])
            .oneshot(post_json(
                "/api/report",
                json!({"type": "txt", "mistral": null, "qwen": "q"}),
            ))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        assert_eq!(
            response.headers()[header::CONTENT_TYPE],
            "application/json"
        );
        assert_eq!(body_json(response).await["error"]["code"], "VALIDATION_ERROR");
    }

    #[tokio::test]
    async fn test_report_type_defaults_to_text() {
        let response = app(vec![])
            .oneshot(post_json("/api/report", json!({"mistral": "m"})))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(
            response.headers()[header::CONTENT_TYPE],
            "text/plain; charset=utf-8"
        );
    }

    #[tokio::test]
    async fn test_index_page_served() {
        let response = app(vec![]).oneshot(get_request("/")).await.unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        let page = String::from_utf8(body_bytes(response).await).unwrap();
        assert!(page.contains("<title>Art Of Prompting</title>"));
    }

    #[tokio::test]
    async fn test_unknown_route_is_structured_404() {
        let response = app(vec![]).oneshot(get_request("/api/nope")).await.unwrap();
        assert_eq!(response.status(), StatusCode::NOT_FOUND);
        assert_eq!(body_json(response).await["error"]["code"], "NOT_FOUND");
    }
}
