//! Test doubles: a fake HTTP transport and a log recorder.

use std::sync::{Mutex, Once};
use std::thread::{self, ThreadId};

use super::*;

#[derive(Debug, Clone, Default)]
pub(crate) struct FakeTransport {
    state: Arc<Mutex<FakeTransportState>>,
}

#[derive(Debug, Default)]
struct FakeTransportState {
    requests: Vec<HttpRequest>,
    token_response: Option<(u16, String)>,
    message_response: Option<(u16, String)>,
    message_log_id: Option<String>,
    failure: Option<String>,
}

impl FakeTransport {
    pub(crate) fn new() -> Self {
        Self::default()
    }

    /// Answer the token endpoint with a successful grant.
    pub(crate) fn with_token(self, token: &str, expire_secs: u64) -> Self {
        let body = serde_json::json!({
            "code": 0,
            "msg": "ok",
            "tenant_access_token": token,
            "expire": expire_secs,
        });
        self.with_token_body(200, body.to_string())
    }

    pub(crate) fn with_token_body(self, status: u16, body: impl Into<String>) -> Self {
        self.lock().token_response = Some((status, body.into()));
        self
    }

    pub(crate) fn with_message(self, status: u16, body: impl Into<String>) -> Self {
        self.lock().message_response = Some((status, body.into()));
        self
    }

    /// `X-Tt-Logid` header returned by the message endpoint.
    pub(crate) fn with_log_id(self, log_id: &str) -> Self {
        self.lock().message_log_id = Some(log_id.to_owned());
        self
    }

    /// Fail every request at the transport level.
    pub(crate) fn failing(self, message: &str) -> Self {
        self.lock().failure = Some(message.to_owned());
        self
    }

    pub(super) fn requests(&self) -> Vec<HttpRequest> {
        self.lock().requests.clone()
    }

    pub(crate) fn token_requests(&self) -> usize {
        self.requests()
            .iter()
            .filter(|request| is_token_request(request))
            .count()
    }

    pub(crate) fn message_requests(&self) -> usize {
        self.requests()
            .iter()
            .filter(|request| !is_token_request(request))
            .count()
    }

    /// Query string and JSON body of the most recent message request.
    pub(crate) fn last_message(&self) -> Option<(String, serde_json::Value)> {
        self.requests()
            .into_iter()
            .rev()
            .find(|request| !is_token_request(request))
            .map(|request| {
                (
                    request.url.query().unwrap_or_default().to_owned(),
                    request.body,
                )
            })
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, FakeTransportState> {
        self.state.lock().unwrap()
    }
}

fn is_token_request(request: &HttpRequest) -> bool {
    request.url.path() == crate::transport::TENANT_ACCESS_TOKEN_PATH
}

impl HttpTransport for FakeTransport {
    fn post_json<'a>(
        &'a self,
        request: HttpRequest,
    ) -> BoxFuture<'a, Result<HttpResponse, Box<dyn StdError + Send + Sync>>> {
        Box::pin(async move {
            let mut state = self.lock();
            let token_request = is_token_request(&request);
            state.requests.push(request);

            if let Some(message) = state.failure.clone() {
                return Err(message.into());
            }

            let (response, log_id) = if token_request {
                (state.token_response.clone(), None)
            } else {
                (
                    state.message_response.clone(),
                    state.message_log_id.clone(),
                )
            };
            let (status, body) = response.ok_or("no fake response configured")?;
            Ok(HttpResponse {
                status,
                body,
                log_id,
            })
        })
    }
}

pub(crate) fn make_client(transport: FakeTransport) -> FeishuClient {
    FeishuClient::with_transport(
        Credentials::new("cli_test", "secret").unwrap(),
        "https://example.invalid",
        Arc::new(transport),
    )
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct CapturedLog {
    pub(crate) level: log::Level,
    pub(crate) message: String,
}

struct RecordingLogger;

static LOGGER: RecordingLogger = RecordingLogger;
static INSTALL: Once = Once::new();
static RECORDS: Mutex<Vec<(ThreadId, CapturedLog)>> = Mutex::new(Vec::new());

impl log::Log for RecordingLogger {
    fn enabled(&self, _metadata: &log::Metadata<'_>) -> bool {
        true
    }

    fn log(&self, record: &log::Record<'_>) {
        let entry = CapturedLog {
            level: record.level(),
            message: record.args().to_string(),
        };
        RECORDS
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push((thread::current().id(), entry));
    }

    fn flush(&self) {}
}

/// Records log lines emitted on the current thread from now on.
///
/// Tests run in parallel on separate threads; `#[tokio::test]` drives the
/// future on the test thread, so filtering by thread isolates each test.
pub(crate) struct LogCapture {
    thread: ThreadId,
}

pub(crate) fn capture_logs() -> LogCapture {
    INSTALL.call_once(|| {
        log::set_logger(&LOGGER).expect("no other logger is installed in tests");
        log::set_max_level(log::LevelFilter::Trace);
    });

    let thread = thread::current().id();
    RECORDS
        .lock()
        .unwrap_or_else(PoisonError::into_inner)
        .retain(|(owner, _)| *owner != thread);
    LogCapture { thread }
}

impl LogCapture {
    pub(crate) fn at(&self, level: log::Level) -> Vec<String> {
        RECORDS
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .iter()
            .filter(|(owner, entry)| *owner == self.thread && entry.level == level)
            .map(|(_, entry)| entry.message.clone())
            .collect()
    }
}
