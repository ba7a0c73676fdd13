use serde_json::json;
use transcript_lens::{create_llm, AppError, ConfigBuilder, LLMProvider};
use wiremock::matchers::{body_partial_json, header, method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

#[tokio::test]
async fn test_gemini_completion() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/v1beta/models/gemini-2.0-flash:generateContent"))
        .and(query_param("key", "test-key"))
        .and(body_partial_json(json!({
            "contents": [{"parts": [{"text": "Summarize this"}]}]
        })))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "candidates": [{
                "content": {"parts": [{"text": "- point one\n"}, {"text": "- point two"}]}
            }],
            "usageMetadata": {"totalTokenCount": 42}
        })))
        .expect(1)
        .mount(&server)
        .await;

    let config = ConfigBuilder::new()
        .with_api_key("test-key".to_string())
        .with_llm_endpoint(format!("{}/v1beta", server.uri()))
        .build();
    let llm = create_llm(&config.llm).unwrap();

    let response = llm.complete("Summarize this").await.unwrap();

    assert_eq!(response.content, "- point one\n- point two");
    assert_eq!(response.tokens_used, Some(42));
}

#[tokio::test]
async fn test_gemini_error_keeps_message() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(429).set_body_string("Resource has been exhausted"))
        .mount(&server)
        .await;

    let config = ConfigBuilder::new()
        .with_api_key("test-key".to_string())
        .with_llm_endpoint(server.uri())
        .build();
    let llm = create_llm(&config.llm).unwrap();

    let err = llm.complete("hello").await.unwrap_err();

    assert!(matches!(err, AppError::Completion(_)));
    assert!(err.to_string().contains("429"));
    assert!(err.to_string().contains("Resource has been exhausted"));
}

#[tokio::test]
async fn test_gemini_empty_candidates_is_an_error() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"candidates": []})))
        .mount(&server)
        .await;

    let config = ConfigBuilder::new()
        .with_api_key("test-key".to_string())
        .with_llm_endpoint(server.uri())
        .build();
    let llm = create_llm(&config.llm).unwrap();

    assert!(matches!(llm.complete("hello").await, Err(AppError::Completion(_))));
}

#[tokio::test]
async fn test_openai_completion_sends_bearer_token() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/v1/chat/completions"))
        .and(header("Authorization", "Bearer sk-test"))
        .and(body_partial_json(json!({
            "model": "gpt-4o-mini",
            "messages": [{"role": "user", "content": "What is Rust?"}]
        })))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "choices": [{"message": {"role": "assistant", "content": "A language."}}],
            "usage": {"total_tokens": 12}
        })))
        .expect(1)
        .mount(&server)
        .await;

    let config = ConfigBuilder::new()
        .with_llm_provider(LLMProvider::OpenAI)
        .with_api_key("sk-test".to_string())
        .with_model("gpt-4o-mini".to_string())
        .with_llm_endpoint(format!("{}/v1/chat/completions", server.uri()))
        .build();
    let llm = create_llm(&config.llm).unwrap();

    let response = llm.complete("What is Rust?").await.unwrap();

    assert_eq!(llm.provider_type(), LLMProvider::OpenAI);
    assert_eq!(response.content, "A language.");
    assert_eq!(response.tokens_used, Some(12));
}

#[tokio::test]
async fn test_lmstudio_completion() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/v1/chat/completions"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "choices": [{"message": {"role": "assistant", "content": "local answer"}}]
        })))
        .mount(&server)
        .await;

    let config = ConfigBuilder::new()
        .with_llm_provider(LLMProvider::LMStudio)
        .with_llm_endpoint(format!("{}/v1/chat/completions", server.uri()))
        .with_model("local-model".to_string())
        .build();
    let llm = create_llm(&config.llm).unwrap();

    let response = llm.complete("hi").await.unwrap();

    assert_eq!(response.content, "local answer");
    assert_eq!(response.tokens_used, None);
}

#[tokio::test]
async fn test_lmstudio_server_error() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(500).set_body_string("model not loaded"))
        .mount(&server)
        .await;

    let config = ConfigBuilder::new()
        .with_llm_provider(LLMProvider::LMStudio)
        .with_llm_endpoint(server.uri())
        .build();
    let llm = create_llm(&config.llm).unwrap();

    let err = llm.complete("hi").await.unwrap_err();
    assert!(err.to_string().contains("model not loaded"));
}
