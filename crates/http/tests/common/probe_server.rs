//! Minimal HTTP/1.1 server for validation-engine integration tests.
//!
//! Behavior keys off the request path so one server can exercise the whole
//! HEAD/GET escalation matrix. Every request is recorded so tests can assert
//! which methods were actually issued.

use std::io::{Read, Write};
use std::net::{TcpListener, TcpStream};
use std::sync::{Arc, Mutex};
use std::thread;

/// One observed request.
#[derive(Debug, Clone)]
pub struct RequestRecord {
    pub method: String,
    pub path: String,
    /// The raw request head, for header assertions.
    pub raw: String,
}

/// Handle to a running probe server.
pub struct ProbeServer {
    base_url: String,
    requests: Arc<Mutex<Vec<RequestRecord>>>,
}

impl ProbeServer {
    /// Start a server on an ephemeral port. It runs until the process exits.
    pub fn start() -> Self {
        let listener = TcpListener::bind("127.0.0.1:0").expect("bind");
        let port = listener.local_addr().unwrap().port();
        let requests: Arc<Mutex<Vec<RequestRecord>>> = Arc::new(Mutex::new(Vec::new()));

        let log = Arc::clone(&requests);
        thread::spawn(move || {
            for stream in listener.incoming().flatten() {
                let log = Arc::clone(&log);
                thread::spawn(move || handle(stream, &log));
            }
        });

        Self {
            base_url: format!("http://127.0.0.1:{}", port),
            requests,
        }
    }

    /// Full URL for a path on this server.
    pub fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    /// Methods observed for `path`, in arrival order.
    pub fn methods_for(&self, path: &str) -> Vec<String> {
        self.requests
            .lock()
            .unwrap()
            .iter()
            .filter(|r| r.path == path)
            .map(|r| r.method.clone())
            .collect()
    }

    /// All records observed for `path`.
    pub fn records_for(&self, path: &str) -> Vec<RequestRecord> {
        self.requests
            .lock()
            .unwrap()
            .iter()
            .filter(|r| r.path == path)
            .cloned()
            .collect()
    }
}

fn handle(mut stream: TcpStream, log: &Arc<Mutex<Vec<RequestRecord>>>) {
    let _ = stream.set_read_timeout(Some(std::time::Duration::from_secs(2)));
    let _ = stream.set_write_timeout(Some(std::time::Duration::from_secs(2)));

    let mut buf = [0u8; 8192];
    let n = match stream.read(&mut buf) {
        Ok(0) | Err(_) => return,
        Ok(n) => n,
    };
    let raw = match std::str::from_utf8(&buf[..n]) {
        Ok(s) => s.to_string(),
        Err(_) => return,
    };

    let mut first_line = raw.lines().next().unwrap_or("").split_whitespace();
    let method = first_line.next().unwrap_or("").to_string();
    let path = first_line.next().unwrap_or("").to_string();

    log.lock().unwrap().push(RequestRecord {
        method: method.clone(),
        path: path.clone(),
        raw,
    });

    let head = method.eq_ignore_ascii_case("HEAD");
    let response = match path.as_str() {
        "/ok" => plain(200, "OK", if head { "" } else { "hello" }),
        "/missing" => plain(404, "Not Found", ""),
        "/forbidden" => {
            if head {
                plain(405, "Method Not Allowed", "")
            } else {
                plain(403, "Forbidden", "")
            }
        }
        "/badrequest" => {
            if head {
                plain(500, "Internal Server Error", "")
            } else {
                plain(400, "Bad Request", "")
            }
        }
        "/headbroken" => {
            if head {
                plain(500, "Internal Server Error", "")
            } else {
                // Honors the single-byte Range request.
                "HTTP/1.1 206 Partial Content\r\nContent-Range: bytes 0-0/5\r\n\
                 Content-Length: 1\r\nConnection: close\r\n\r\nh"
                    .to_string()
            }
        }
        _ => plain(200, "OK", if head { "" } else { "hello" }),
    };

    let _ = stream.write_all(response.as_bytes());
}

fn plain(code: u16, reason: &str, body: &str) -> String {
    format!(
        "HTTP/1.1 {} {}\r\nContent-Length: {}\r\nConnection: close\r\n\r\n{}",
        code,
        reason,
        body.len(),
        body
    )
}
