use async_trait::async_trait;
use loglens_analyzer::prompts::{BASE_INSTRUCTION, QUERY_INSTRUCTION, QUESTION_HEADER};
use loglens_analyzer::{Analyzer, AnalyzerSettings, ErrorKind, LlmClient, LlmError};
use loglens_core::AnomalyKind;
use std::sync::{Arc, Mutex};
use std::time::Duration;

// ============ FAKE LLM ============

enum Reply {
    Text(&'static str),
    ApiError(&'static str),
    MissingKey,
    Slow(Duration),
}

struct FakeLlm {
    reply: Reply,
    calls: Mutex<Vec<(String, String)>>,
}

impl FakeLlm {
    fn new(reply: Reply) -> Arc<Self> {
        Arc::new(Self {
            reply,
            calls: Mutex::new(Vec::new()),
        })
    }

    fn calls(&self) -> Vec<(String, String)> {
        self.calls.lock().unwrap().clone()
    }
}

#[async_trait]
impl LlmClient for FakeLlm {
    async fn generate_json(&self, system: &str, prompt: &str) -> Result<String, LlmError> {
        self.calls
            .lock()
            .unwrap()
            .push((system.to_string(), prompt.to_string()));

        match &self.reply {
            Reply::Text(text) => Ok(text.to_string()),
            Reply::ApiError(msg) => Err(LlmError::ApiError(msg.to_string())),
            Reply::MissingKey => Err(LlmError::MissingApiKey("GEMINI_API_KEY")),
            Reply::Slow(delay) => {
                tokio::time::sleep(*delay).await;
                Ok(OK_REPORT.to_string())
            }
        }
    }

    fn model(&self) -> &str {
        "fake-model"
    }

    fn provider(&self) -> &str {
        "fake"
    }
}

const OK_REPORT: &str = r#"{"summary":"ok","anomalies":[]}"#;

fn analyzer(fake: &Arc<FakeLlm>) -> Analyzer {
    Analyzer::new(fake.clone(), AnalyzerSettings::default())
}

fn numbered_log(n: usize) -> String {
    (1..=n)
        .map(|i| format!("2024-02-08 10:{:02}:{:02} INFO event {}", i / 60 % 60, i % 60, i))
        .collect::<Vec<_>>()
        .join("\n")
}

// ============ FORWARDED CONTENT ============

#[tokio::test]
async fn test_small_log_forwarded_unchanged() {
    let fake = FakeLlm::new(Reply::Text(OK_REPORT));
    let log = "2024-02-08 10:30:00 ERROR db timeout\r\n2024-02-08 10:30:05 INFO retry ok\n";

    analyzer(&fake).analyze(log.as_bytes(), None).await.unwrap();

    let calls = fake.calls();
    assert_eq!(calls.len(), 1);
    assert_eq!(calls[0].1, log);
}

#[tokio::test]
async fn test_large_log_truncated_to_first_500_lines() {
    let fake = FakeLlm::new(Reply::Text(OK_REPORT));
    let log = numbered_log(750);

    analyzer(&fake).analyze(log.as_bytes(), None).await.unwrap();

    let forwarded = &fake.calls()[0].1;
    assert_eq!(forwarded, &numbered_log(500));
    assert!(forwarded.ends_with("event 500"));
    assert!(!forwarded.contains("event 501"));
}

#[tokio::test]
async fn test_custom_line_cap() {
    let fake = FakeLlm::new(Reply::Text(OK_REPORT));
    let settings = AnalyzerSettings {
        max_lines: 3,
        ..Default::default()
    };

    Analyzer::new(fake.clone(), settings)
        .analyze(b"a\nb\nc\nd\ne\n", None)
        .await
        .unwrap();

    assert_eq!(fake.calls()[0].1, "a\nb\nc");
}

#[tokio::test]
async fn test_invalid_utf8_never_calls_model() {
    let fake = FakeLlm::new(Reply::Text(OK_REPORT));

    let err = analyzer(&fake)
        .analyze(&[0x4c, 0x4f, 0x47, 0xc3, 0x28], None)
        .await
        .unwrap_err();

    assert_eq!(err.kind(), ErrorKind::InvalidInput);
    assert!(err.is_client_error());
    assert!(fake.calls().is_empty());
}

// ============ PROMPT SELECTION ============

#[tokio::test]
async fn test_empty_query_uses_base_template() {
    for query in [None, Some("")] {
        let fake = FakeLlm::new(Reply::Text(OK_REPORT));
        analyzer(&fake).analyze(b"line one\n", query).await.unwrap();

        let (system, user) = &fake.calls()[0];
        assert_eq!(system, BASE_INSTRUCTION);
        assert_ne!(system, QUERY_INSTRUCTION);
        assert_eq!(user, "line one\n");
    }
}

#[tokio::test]
async fn test_query_uses_query_template() {
    let fake = FakeLlm::new(Reply::Text(OK_REPORT));
    let question = "What caused the SEGFAULT at 03:00?";

    analyzer(&fake)
        .analyze(b"03:00:01 kernel: segfault at 0\n", Some(question))
        .await
        .unwrap();

    let (system, user) = &fake.calls()[0];
    assert_eq!(system, QUERY_INSTRUCTION);
    assert_ne!(system, BASE_INSTRUCTION);
    assert!(user.starts_with("03:00:01 kernel: segfault at 0\n"));
    assert!(user.contains(QUESTION_HEADER));
    assert!(user.ends_with(question));
}

// ============ RESPONSE VALIDATION ============

#[tokio::test]
async fn test_empty_report_returned() {
    let fake = FakeLlm::new(Reply::Text(OK_REPORT));
    let report = analyzer(&fake).analyze(b"x\n", None).await.unwrap();

    assert_eq!(report.summary, "ok");
    assert!(report.anomalies.is_empty());
}

#[tokio::test]
async fn test_report_returned_in_model_order() {
    let fake = FakeLlm::new(Reply::Text(
        r#"{"summary":"two issues","anomalies":[
            {"type":"warning","timestamp":"N/A","message":"slow disk"},
            {"type":"error","timestamp":"10:30:00","message":"db timeout"}
        ]}"#,
    ));
    let report = analyzer(&fake).analyze(b"x\n", None).await.unwrap();

    assert_eq!(report.anomalies.len(), 2);
    assert_eq!(report.anomalies[0].kind, AnomalyKind::Warning);
    assert_eq!(report.anomalies[1].message, "db timeout");
}

#[tokio::test]
async fn test_unknown_anomaly_type_rejected() {
    let fake = FakeLlm::new(Reply::Text(
        r#"{"summary":"bad","anomalies":[
            {"type":"error","timestamp":"N/A","message":"fine"},
            {"type":"critical","timestamp":"N/A","message":"not allowed"}
        ]}"#,
    ));
    let err = analyzer(&fake).analyze(b"x\n", None).await.unwrap_err();
    assert_eq!(err.kind(), ErrorKind::UpstreamFormat);
}

#[tokio::test]
async fn test_non_json_is_format_error() {
    let fake = FakeLlm::new(Reply::Text("I could not analyse this log, sorry."));
    let err = analyzer(&fake).analyze(b"x\n", None).await.unwrap_err();

    println!("Error: {}", err);
    assert_eq!(err.kind(), ErrorKind::UpstreamFormat);
    assert_ne!(err.kind(), ErrorKind::UpstreamCall);
    assert!(err.to_string().contains("parse"));
}

#[tokio::test]
async fn test_missing_anomalies_is_format_error() {
    let fake = FakeLlm::new(Reply::Text(r#"{"summary":"ok"}"#));
    let err = analyzer(&fake).analyze(b"x\n", None).await.unwrap_err();
    assert_eq!(err.kind(), ErrorKind::UpstreamFormat);
}

// ============ UPSTREAM FAILURES ============

#[tokio::test]
async fn test_api_failure_is_call_error() {
    let fake = FakeLlm::new(Reply::ApiError("429 Too Many Requests: quota exceeded"));
    let err = analyzer(&fake).analyze(b"x\n", None).await.unwrap_err();

    assert_eq!(err.kind(), ErrorKind::UpstreamCall);
    assert!(err.to_string().contains("quota exceeded"));
    // single try
    assert_eq!(fake.calls().len(), 1);
}

#[tokio::test]
async fn test_missing_credential_is_configuration_error() {
    let fake = FakeLlm::new(Reply::MissingKey);
    let err = analyzer(&fake).analyze(b"x\n", None).await.unwrap_err();

    assert_eq!(err.kind(), ErrorKind::Configuration);
    assert!(err.to_string().contains("GEMINI_API_KEY"));
}

#[tokio::test]
async fn test_slow_model_times_out() {
    let fake = FakeLlm::new(Reply::Slow(Duration::from_secs(5)));
    let settings = AnalyzerSettings {
        timeout: Duration::from_millis(50),
        ..Default::default()
    };

    let err = Analyzer::new(fake.clone(), settings)
        .analyze(b"x\n", None)
        .await
        .unwrap_err();

    assert_eq!(err.kind(), ErrorKind::UpstreamCall);
    assert!(err.to_string().contains("no response within"));
}
