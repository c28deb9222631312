use serde_json::{json, Value};
use wiremock::matchers::{header, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

use hireline_analyzer::{analyze_documents, Analyzer, AnalyzerError, OpenAiAnalyzer, Turn, TurnRequest};
use hireline_core::config::AnalyzerConfig;

fn analyzer_for(server: &MockServer) -> OpenAiAnalyzer {
    let config = AnalyzerConfig {
        api_key: "sk-test".to_string(),
        api_base: Some(server.uri()),
        ..AnalyzerConfig::default()
    };
    OpenAiAnalyzer::new(&config)
}

fn completion_body(text: &str) -> Value {
    json!({
        "id": "chatcmpl-test",
        "object": "chat.completion",
        "choices": [
            {"index": 0, "message": {"role": "assistant", "content": text}, "finish_reason": "stop"}
        ]
    })
}

#[tokio::test]
async fn reply_returns_assistant_text() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/chat/completions"))
        .and(header("Authorization", "Bearer sk-test"))
        .respond_with(ResponseTemplate::new(200).set_body_json(completion_body(
            "Hello, how can I help?",
        )))
        .expect(1)
        .mount(&server)
        .await;

    let analyzer = analyzer_for(&server);
    let reply = analyzer
        .reply(TurnRequest {
            message: "Hi".to_string(),
            history: Vec::new(),
            context: None,
        })
        .await
        .unwrap();

    assert_eq!(reply, "Hello, how can I help?");
}

#[tokio::test]
async fn reply_windows_history_to_recent_turns() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/chat/completions"))
        .respond_with(ResponseTemplate::new(200).set_body_json(completion_body("ok")))
        .mount(&server)
        .await;

    let analyzer = analyzer_for(&server);
    let history = vec![
        Turn::user("first"),
        Turn::assistant("first reply"),
        Turn::user("second"),
        Turn::assistant("second reply"),
    ];
    analyzer
        .reply(TurnRequest {
            message: "third".to_string(),
            history,
            context: None,
        })
        .await
        .unwrap();

    let requests = server.received_requests().await.unwrap();
    assert_eq!(requests.len(), 1);
    let body: Value = serde_json::from_slice(&requests[0].body).unwrap();
    let messages = body["messages"].as_array().unwrap();

    // system + windowed history (default window of 2) + current message
    assert_eq!(messages.len(), 4);
    assert_eq!(messages[0]["role"], "system");
    assert_eq!(messages[1]["content"], "second");
    assert_eq!(messages[2]["content"], "second reply");
    assert_eq!(messages[3]["content"], "third");
    assert_eq!(body["model"], "gpt-4o-mini");
}

#[tokio::test]
async fn reply_surfaces_api_errors() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/chat/completions"))
        .respond_with(ResponseTemplate::new(429).set_body_string("rate limited"))
        .mount(&server)
        .await;

    let analyzer = analyzer_for(&server);
    let err = analyzer
        .reply(TurnRequest {
            message: "Hi".to_string(),
            history: Vec::new(),
            context: None,
        })
        .await
        .unwrap_err();

    match err {
        AnalyzerError::ApiError(message) => {
            assert!(message.contains("429"));
            assert!(message.contains("rate limited"));
        }
        other => panic!("expected ApiError, got {:?}", other),
    }
}

#[tokio::test]
async fn reply_rejects_empty_choices() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/chat/completions"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"choices": []})))
        .mount(&server)
        .await;

    let analyzer = analyzer_for(&server);
    let err = analyzer
        .reply(TurnRequest {
            message: "Hi".to_string(),
            history: Vec::new(),
            context: None,
        })
        .await
        .unwrap_err();

    assert!(matches!(err, AnalyzerError::InvalidResponse(_)));
}

#[tokio::test]
async fn interview_questions_skip_the_api_when_no_gaps_exist() {
    let server = MockServer::start().await;
    // No mock mounted: a request would fail the test via the HTTP error.

    let analyzer = analyzer_for(&server);
    let resume = json!({"skills": ["rust"]});
    let vacancy = json!({"required_skills": ["rust"]});
    let gaps = analyze_documents(&resume, &vacancy);
    assert!(gaps.is_empty());

    let questions = analyzer
        .interview_questions(&resume, &vacancy, &gaps)
        .await
        .unwrap();
    assert!(questions.contains("good match"));
    assert!(server.received_requests().await.unwrap().is_empty());
}

#[tokio::test]
async fn interview_questions_use_review_parameters() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/chat/completions"))
        .respond_with(ResponseTemplate::new(200).set_body_json(completion_body(
            "1. Tell me about your AWS experience.",
        )))
        .mount(&server)
        .await;

    let analyzer = analyzer_for(&server);
    let resume = json!({"skills": ["python"]});
    let vacancy = json!({"required_skills": ["python", "aws"]});
    let gaps = analyze_documents(&resume, &vacancy);

    let questions = analyzer
        .interview_questions(&resume, &vacancy, &gaps)
        .await
        .unwrap();
    assert!(questions.contains("AWS"));

    let requests = server.received_requests().await.unwrap();
    let body: Value = serde_json::from_slice(&requests[0].body).unwrap();
    assert_eq!(body["max_tokens"], 512);
    assert!((body["temperature"].as_f64().unwrap() - 0.2).abs() < 1e-6);
}
