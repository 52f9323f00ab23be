use planboard_core::MemoryKeyValueBackend;
use planboard_remote::model::{TaskUpdate, WireTaskStatus};
use planboard_remote::{ApiClient, ApiError, SessionStore, LOGIN_ROUTE};
use std::io::{BufRead, BufReader, Read, Write};
use std::net::TcpListener;
use std::sync::mpsc::{self, Receiver};
use std::thread;

struct Recorded {
    request_line: String,
    headers: Vec<String>,
    body: String,
}

impl Recorded {
    fn header(&self, name: &str) -> Option<&str> {
        let prefix = format!("{}:", name.to_ascii_lowercase());
        self.headers.iter().find_map(|line| {
            line.to_ascii_lowercase()
                .starts_with(&prefix)
                .then(|| line[prefix.len()..].trim())
        })
    }
}

/// Serves one canned `(status, body)` response per connection, in order,
/// and reports each request it saw.
fn serve(responses: Vec<(u16, &'static str)>) -> (String, Receiver<Recorded>) {
    let listener = TcpListener::bind("127.0.0.1:0").unwrap();
    let base_url = format!("http://{}/api", listener.local_addr().unwrap());
    let (sender, receiver) = mpsc::channel();

    thread::spawn(move || {
        for (status, body) in responses {
            let (mut stream, _) = listener.accept().unwrap();
            let mut reader = BufReader::new(stream.try_clone().unwrap());

            let mut request_line = String::new();
            reader.read_line(&mut request_line).unwrap();
            let mut headers = Vec::new();
            loop {
                let mut line = String::new();
                reader.read_line(&mut line).unwrap();
                let line = line.trim_end().to_string();
                if line.is_empty() {
                    break;
                }
                headers.push(line);
            }
            let length = headers
                .iter()
                .find_map(|line| {
                    let lower = line.to_ascii_lowercase();
                    lower
                        .strip_prefix("content-length:")
                        .map(|value| value.trim().parse::<usize>().unwrap())
                })
                .unwrap_or(0);
            let mut raw_body = vec![0u8; length];
            reader.read_exact(&mut raw_body).unwrap();

            let response = format!(
                "HTTP/1.1 {status} X\r\nContent-Type: application/json\r\nContent-Length: {}\r\nConnection: close\r\n\r\n{body}",
                body.len()
            );
            stream.write_all(response.as_bytes()).unwrap();
            stream.flush().unwrap();

            sender
                .send(Recorded {
                    request_line: request_line.trim_end().to_string(),
                    headers,
                    body: String::from_utf8(raw_body).unwrap(),
                })
                .unwrap();
        }
    });

    (base_url, receiver)
}

fn api_client(base_url: &str) -> ApiClient<MemoryKeyValueBackend> {
    ApiClient::new(base_url, SessionStore::new(MemoryKeyValueBackend::new())).unwrap()
}

const LOGIN_BODY: &str = concat!(
    r#"{"message":"ok","access_token":"jwt-abc","user":{"id":"u1","username":"mona","#,
    r#""email":"mona@example.com","created_at":"2024-01-02T03:04:05.000001","#,
    r#""updated_at":null}}"#
);

#[test]
fn login_stores_session_and_later_requests_send_bearer_token() {
    let (base_url, requests) = serve(vec![(200, LOGIN_BODY), (200, "[]")]);
    let client = api_client(&base_url);

    let auth = client.login("mona", "secret1").unwrap();
    assert_eq!(auth.user.id, "u1");
    assert!(client.session().is_authenticated());
    assert_eq!(client.session().token().as_deref(), Some("jwt-abc"));

    let login = requests.recv().unwrap();
    assert_eq!(login.request_line, "POST /api/auth/login HTTP/1.1");
    assert_eq!(login.header("content-type"), Some("application/json"));
    assert_eq!(login.header("authorization"), None);
    let sent: serde_json::Value = serde_json::from_str(&login.body).unwrap();
    assert_eq!(sent["username"], "mona");

    let projects = client.projects().unwrap();
    assert!(projects.is_empty());
    let listing = requests.recv().unwrap();
    assert_eq!(listing.request_line, "GET /api/projects HTTP/1.1");
    assert_eq!(listing.header("authorization"), Some("Bearer jwt-abc"));
}

#[test]
fn unauthorized_response_clears_session_and_reports_login_redirect() {
    let (base_url, _requests) = serve(vec![
        (200, LOGIN_BODY),
        (401, r#"{"msg":"Token has expired"}"#),
    ]);
    let client = api_client(&base_url);
    client.login("mona", "secret1").unwrap();

    let err = client.notifications().unwrap_err();

    assert!(matches!(
        err,
        ApiError::SessionExpired { redirect_to } if redirect_to == LOGIN_ROUTE
    ));
    assert!(!client.session().is_authenticated());
    assert_eq!(client.session().user(), None);
}

#[test]
fn error_body_message_is_surfaced_with_status() {
    let (base_url, _requests) = serve(vec![(403, r#"{"error":"no access"}"#)]);
    let client = api_client(&base_url);

    let err = client.project("p9").unwrap_err();
    match err {
        ApiError::Status { status, message } => {
            assert_eq!(status, 403);
            assert_eq!(message, "no access");
        }
        other => panic!("unexpected error: {other}"),
    }
}

#[test]
fn task_update_sends_snake_case_status() {
    let task_body = concat!(
        r#"{"id":"t1","project_id":"p1","name":"Frame walls","status":"in_progress","#,
        r#""start_date":"2024-05-01","end_date":"2024-05-03"}"#
    );
    let (base_url, requests) = serve(vec![(200, task_body)]);
    let client = api_client(&base_url);

    let update = TaskUpdate {
        status: Some(WireTaskStatus::InProgress),
        ..TaskUpdate::default()
    };
    let task = client.update_task("t1", &update).unwrap();
    assert_eq!(task.status, WireTaskStatus::InProgress);

    let recorded = requests.recv().unwrap();
    assert_eq!(recorded.request_line, "PUT /api/tasks/t1 HTTP/1.1");
    assert_eq!(recorded.body, r#"{"status":"in_progress"}"#);
}

#[test]
fn delete_accepts_empty_no_content_response() {
    let (base_url, requests) = serve(vec![(204, "")]);
    let client = api_client(&base_url);

    client.delete_comment("c1").unwrap();
    let recorded = requests.recv().unwrap();
    assert_eq!(recorded.request_line, "DELETE /api/comments/c1 HTTP/1.1");
}
