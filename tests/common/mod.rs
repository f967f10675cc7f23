/// Local stand-ins for the hosted services, built on tiny_http.
///
/// Each fake answers a fixed number of requests with canned responses,
/// records what it received, then shuts its thread down.

use std::io::Read;
use std::sync::mpsc::{self, Receiver};
use std::thread::{self, JoinHandle};

/// One request as the fake saw it.
#[derive(Debug, Clone)]
pub struct Recorded {
    pub method: String,
    pub url: String,
    pub headers: Vec<(String, String)>,
    pub body: String,
}

impl Recorded {
    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers
            .iter()
            .find(|(n, _)| n.eq_ignore_ascii_case(name))
            .map(|(_, v)| v.as_str())
    }
}

pub struct FakeServer {
    pub base_url: String,
    requests: Receiver<Recorded>,
    handle: JoinHandle<()>,
}

impl FakeServer {
    /// Starts a server that answers one request per entry in `responses`
    /// (status, body), in order.
    pub fn start(responses: Vec<(u16, String)>) -> Self {
        let server = tiny_http::Server::http("127.0.0.1:0").expect("bind fake server");
        let port = server
            .server_addr()
            .to_ip()
            .expect("fake server has an IP address")
            .port();
        let (tx, rx) = mpsc::channel();

        let handle = thread::spawn(move || {
            for (status, body) in responses {
                let mut request = match server.recv() {
                    Ok(r) => r,
                    Err(_) => return,
                };

                let mut received = String::new();
                request.as_reader().read_to_string(&mut received).ok();

                tx.send(Recorded {
                    method: request.method().to_string(),
                    url: request.url().to_string(),
                    headers: request
                        .headers()
                        .iter()
                        .map(|h| (h.field.to_string(), h.value.to_string()))
                        .collect(),
                    body: received,
                })
                .ok();

                let response = tiny_http::Response::from_string(body)
                    .with_status_code(tiny_http::StatusCode::from(status));
                request.respond(response).ok();
            }
        });

        Self {
            base_url: format!("http://127.0.0.1:{}", port),
            requests: rx,
            handle,
        }
    }

    /// Waits for the server thread and returns everything it received.
    pub fn finish(self) -> Vec<Recorded> {
        self.handle.join().expect("fake server thread panicked");
        self.requests.try_iter().collect()
    }
}
