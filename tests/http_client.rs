//! End-to-end tests of the reqwest client against a scripted local HTTP server.

use std::io::{Read, Write};
use std::net::{TcpListener, TcpStream};
use std::sync::{Arc, Mutex};
use std::thread;
use std::time::{Duration, Instant};

use serde_json::{Value, json};
use vma_mix::client::{HttpClient, PredictionService, RequestError};
use vma_mix::config::ClientConfig;
use vma_mix::domain::{Field, ParameterSet};
use vma_mix::session::{Session, SubmissionState, SubmitError};

#[derive(Debug, Clone)]
enum Reply {
    Json(u16, Value),
    Text(u16, String),
    /// Read the request, then hold the connection open without answering.
    Hang(Duration),
}

#[derive(Debug, Clone)]
struct Recorded {
    method: String,
    path: String,
    body: String,
}

struct ServerHarness {
    base_url: String,
    requests: Arc<Mutex<Vec<Recorded>>>,
    join_handle: Option<thread::JoinHandle<()>>,
}

impl ServerHarness {
    /// Serve `replies` to successive connections, one reply per connection.
    fn start(replies: Vec<Reply>) -> Self {
        let listener = TcpListener::bind("127.0.0.1:0").unwrap();
        let base_url = format!("http://{}", listener.local_addr().unwrap());
        let requests = Arc::new(Mutex::new(Vec::new()));
        let recorded = Arc::clone(&requests);

        let join_handle = thread::spawn(move || {
            for reply in replies {
                let Ok((mut stream, _)) = listener.accept() else {
                    return;
                };
                if let Some(req) = read_request(&mut stream) {
                    recorded.lock().unwrap().push(req);
                }
                write_reply(&mut stream, reply);
            }
        });

        Self {
            base_url,
            requests,
            join_handle: Some(join_handle),
        }
    }

    fn client(&self, timeout_secs: u64) -> HttpClient {
        let config = ClientConfig::default()
            .with_overrides(Some(&self.base_url), Some(timeout_secs))
            .unwrap();
        HttpClient::new(config).unwrap()
    }

    fn requests(&self) -> Vec<Recorded> {
        self.requests.lock().unwrap().clone()
    }

    fn finish(mut self) -> Vec<Recorded> {
        if let Some(handle) = self.join_handle.take() {
            handle.join().unwrap();
        }
        self.requests()
    }
}

fn find_header_end(bytes: &[u8]) -> Option<usize> {
    bytes.windows(4).position(|window| window == b"\r\n\r\n")
}

fn read_request(stream: &mut TcpStream) -> Option<Recorded> {
    stream.set_read_timeout(Some(Duration::from_secs(5))).ok()?;
    let mut bytes = Vec::new();
    let mut buf = [0_u8; 4096];

    let header_end = loop {
        let read = stream.read(&mut buf).ok()?;
        if read == 0 {
            return None;
        }
        bytes.extend_from_slice(&buf[..read]);
        if let Some(pos) = find_header_end(&bytes) {
            break pos + 4;
        }
    };

    let head = String::from_utf8_lossy(&bytes[..header_end]).to_string();
    let mut lines = head.lines();
    let mut request_line = lines.next()?.split_whitespace();
    let method = request_line.next()?.to_string();
    let path = request_line.next()?.to_string();
    let content_length = lines
        .filter_map(|line| line.split_once(':'))
        .find(|(name, _)| name.trim().eq_ignore_ascii_case("content-length"))
        .and_then(|(_, value)| value.trim().parse::<usize>().ok())
        .unwrap_or(0);

    while bytes.len() < header_end + content_length {
        let read = stream.read(&mut buf).ok()?;
        if read == 0 {
            break;
        }
        bytes.extend_from_slice(&buf[..read]);
    }
    let body = String::from_utf8_lossy(&bytes[header_end..]).to_string();

    Some(Recorded { method, path, body })
}

fn write_reply(stream: &mut TcpStream, reply: Reply) {
    let (status, body) = match reply {
        Reply::Json(status, value) => (status, value.to_string()),
        Reply::Text(status, text) => (status, text),
        Reply::Hang(duration) => {
            thread::sleep(duration);
            return;
        }
    };
    let reason = if status < 400 { "OK" } else { "Error" };
    let response = format!(
        "HTTP/1.1 {status} {reason}\r\nContent-Type: application/json\r\nContent-Length: {}\r\nConnection: close\r\n\r\n{body}",
        body.len()
    );
    let _ = stream.write_all(response.as_bytes());
    let _ = stream.flush();
}

fn prediction_body(vma: f64) -> Value {
    json!({
        "success": true,
        "predicted_vma": vma,
        "confidence": "High",
        "model_info": { "r2_score": 0.7712, "rmse": 0.5123, "model_type": "ExtraTrees Approach 3" },
        "timestamp": "2025-03-01 10:20:30"
    })
}

/// A base URL with nothing listening behind it.
fn dead_url() -> String {
    let listener = TcpListener::bind("127.0.0.1:0").unwrap();
    let addr = listener.local_addr().unwrap();
    drop(listener);
    format!("http://{addr}")
}

#[test]
fn default_submission_sends_the_thirteen_defaults() {
    let server = ServerHarness::start(vec![Reply::Json(200, prediction_body(14.37))]);
    let client = server.client(5);

    let result = client.predict(&ParameterSet::defaults()).unwrap();
    assert_eq!(result.predicted_vma, 14.37);
    assert_eq!(result.confidence, "High");
    assert_eq!(result.timestamp, "2025-03-01 10:20:30");

    let requests = server.finish();
    assert_eq!(requests.len(), 1);
    assert_eq!(requests[0].method, "POST");
    assert_eq!(requests[0].path, "/predict");

    let body: Value = serde_json::from_str(&requests[0].body).unwrap();
    let expected = json!({
        "RAP_PERCENT": 10.0, "AC": 5.0, "GSB": 2.65,
        "PASS_19": 95.0, "PASS_12_5": 85.0, "PASS_9_5": 70.0, "PASS_4_75": 50.0,
        "PASS_2_36": 30.0, "PASS_1_18": 20.0, "PASS_0_6": 15.0, "PASS_0_3": 10.0,
        "PASS_0_15": 5.0, "PASS_0_075": 3.0
    });
    assert_eq!(body, expected);
}

#[test]
fn edited_values_reach_the_wire() {
    let server = ServerHarness::start(vec![Reply::Json(200, prediction_body(15.0))]);
    let client = server.client(5);

    let mut session = Session::new();
    session.set_field(Field::Ac, "5.75").unwrap();
    session.set_field(Field::Pass0_6, "18.2").unwrap();
    session.submit(&client).unwrap();

    let requests = server.finish();
    let body: Value = serde_json::from_str(&requests[0].body).unwrap();
    assert_eq!(body["AC"], json!(5.75));
    assert_eq!(body["PASS_0_6"], json!(18.2));
    assert_eq!(body.as_object().unwrap().len(), 13);
}

#[test]
fn error_status_is_a_server_error() {
    let server = ServerHarness::start(vec![Reply::Json(500, json!({ "detail": "Model not loaded" }))]);
    let err = server.client(5).predict(&ParameterSet::defaults()).unwrap_err();
    assert_eq!(err, RequestError::ServerError { status: 500 });
    server.finish();
}

#[test]
fn incomplete_payload_is_malformed() {
    let server = ServerHarness::start(vec![
        Reply::Json(200, json!({ "confidence": "High", "timestamp": "t" })),
        Reply::Text(200, "not json".to_string()),
    ]);
    let client = server.client(5);
    for _ in 0..2 {
        assert!(matches!(
            client.predict(&ParameterSet::defaults()),
            Err(RequestError::MalformedResponse(_))
        ));
    }
    server.finish();
}

#[test]
fn refused_connection_is_unreachable_and_session_recovers() {
    let config = ClientConfig::default().with_overrides(Some(&dead_url()), Some(5)).unwrap();
    let dead = HttpClient::new(config).unwrap();

    let mut session = Session::new();
    let err = session.submit(&dead).unwrap_err();
    assert!(matches!(err, SubmitError::Request(RequestError::Unreachable(_))), "{err:?}");
    assert!(matches!(session.state(), SubmissionState::Failed(RequestError::Unreachable(_))));
    assert!(session.prediction().is_none());

    // The session is re-armed: a later submission goes through.
    let server = ServerHarness::start(vec![Reply::Json(200, prediction_body(13.9))]);
    let result = session.submit(&server.client(5)).unwrap();
    assert_eq!(result.predicted_vma, 13.9);
    assert!(matches!(session.state(), SubmissionState::Succeeded(_)));
    server.finish();
}

#[test]
fn silent_backend_times_out_as_unreachable() {
    let server = ServerHarness::start(vec![Reply::Hang(Duration::from_secs(3))]);
    let err = server.client(1).predict(&ParameterSet::defaults()).unwrap_err();
    assert!(matches!(err, RequestError::Unreachable(_)), "{err:?}");
    server.finish();
}

#[test]
fn model_info_success_false_leaves_info_absent() {
    let server = ServerHarness::start(vec![Reply::Json(200, json!({ "success": false }))]);
    let client = server.client(5);

    let mut session = Session::new();
    assert!(session.load_model_info(&client).is_none());
    assert_eq!(session.state(), &SubmissionState::Idle);

    let requests = server.finish();
    assert_eq!(requests[0].method, "GET");
    assert_eq!(requests[0].path, "/api/model-info");
}

#[test]
fn silent_model_info_backend_does_not_hold_up_the_session() {
    let server = ServerHarness::start(vec![Reply::Hang(Duration::from_secs(3))]);
    let mut session = Session::new();

    let started = Instant::now();
    session.load_model_info_in_background(Arc::new(server.client(1)));
    assert!(started.elapsed() < Duration::from_millis(500), "{:?}", started.elapsed());
    assert!(session.is_loading_model_info());

    session.set_field(Field::Gsb, "2.7").unwrap();
    assert_eq!(session.params().get(Field::Gsb), 2.7);

    let mut settled = false;
    for _ in 0..100 {
        if session.poll_model_info() {
            settled = true;
            break;
        }
        thread::sleep(Duration::from_millis(50));
    }
    assert!(settled, "model info fetch never timed out");
    assert!(session.model_info().is_none());
    assert_eq!(session.state(), &SubmissionState::Idle);
    server.finish();
}

#[test]
fn model_info_not_found_is_non_fatal() {
    let server = ServerHarness::start(vec![Reply::Json(404, json!({ "detail": "Model information not available" }))]);
    let client = server.client(5);
    assert_eq!(client.fetch_model_info(), Err(RequestError::ServerError { status: 404 }));
    server.finish();

    let mut session = Session::new();
    let config = ClientConfig::default().with_overrides(Some(&dead_url()), Some(5)).unwrap();
    assert!(session.load_model_info(&HttpClient::new(config).unwrap()).is_none());
}

#[test]
fn model_info_is_loaded() {
    let server = ServerHarness::start(vec![Reply::Json(
        200,
        json!({
            "success": true,
            "model_info": {
                "r2_score": 0.7712, "rmse": 0.5123, "mae": 0.3901,
                "model_type": "ExtraTrees Approach 3",
                "feature_count": 13,
                "features": ["RAP_PERCENT", "AC", "GSB"]
            }
        }),
    )]);
    let mut session = Session::new();
    let info = session.load_model_info(&server.client(5)).cloned().unwrap();
    assert_eq!(info.model_type, "ExtraTrees Approach 3");
    assert_eq!(info.rmse, 0.5123);
    assert_eq!(info.feature_count, Some(13));
    server.finish();
}

#[test]
fn health_endpoint() {
    let server = ServerHarness::start(vec![Reply::Json(
        200,
        json!({ "status": "healthy", "model_loaded": true, "timestamp": "2025-03-01T10:20:30" }),
    )]);
    let health = server.client(5).fetch_health().unwrap();
    assert!(health.is_healthy());
    let requests = server.finish();
    assert_eq!(requests[0].path, "/health");
}
