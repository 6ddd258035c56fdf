//! Disposable HTTP server for capture pages
//!
//! This server is NOT a daemon. It:
//! - Starts on a random port
//! - Serves one HTML document
//! - Shuts down when its render context is released

use crate::{Result, VisionError};
use std::net::TcpListener;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::thread;
use std::time::Duration;
use tiny_http::{Header, Response, Server};
use tracing::{debug, trace};

const POLL_INTERVAL: Duration = Duration::from_millis(50);

/// Server bound to a random local port, not yet serving.
pub struct PageServer {
    server: Server,
    port: u16,
    html_content: String,
}

impl PageServer {
    /// Bind to a random available port.
    pub fn new(html_content: String) -> Result<Self> {
        let listener = TcpListener::bind("127.0.0.1:0")?;
        let port = listener.local_addr()?.port();

        let server = Server::from_listener(listener, None).map_err(|e| {
            VisionError::Io(std::io::Error::new(std::io::ErrorKind::Other, e.to_string()))
        })?;

        Ok(Self {
            server,
            port,
            html_content,
        })
    }

    pub fn url(&self) -> String {
        format!("http://127.0.0.1:{}/", self.port)
    }

    fn respond(&self, request: tiny_http::Request) -> Result<()> {
        trace!(url = request.url(), "page request");
        if request.url() != "/" {
            return request
                .respond(Response::empty(404))
                .map_err(VisionError::Io);
        }

        let mut response = Response::from_string(self.html_content.as_str());
        if let Ok(header) = Header::from_bytes(&b"Content-Type"[..], &b"text/html; charset=UTF-8"[..]) {
            response = response.with_header(header);
        }
        request.respond(response).map_err(VisionError::Io)
    }

    /// Serve from a background thread until [`RunningServer::stop`].
    pub fn spawn(self) -> RunningServer {
        let url = self.url();
        let stopped = Arc::new(AtomicBool::new(false));
        let flag = stopped.clone();

        let handle = thread::spawn(move || {
            while !flag.load(Ordering::SeqCst) {
                match self.server.recv_timeout(POLL_INTERVAL) {
                    Ok(Some(request)) => {
                        if let Err(e) = self.respond(request) {
                            debug!(error = %e, "failed to answer page request");
                        }
                    }
                    Ok(None) => {}
                    Err(_) => break,
                }
            }
        });

        RunningServer {
            url,
            stopped,
            handle: Some(handle),
        }
    }
}

/// Handle to a serving [`PageServer`]. Stops the server when dropped.
pub struct RunningServer {
    url: String,
    stopped: Arc<AtomicBool>,
    handle: Option<thread::JoinHandle<()>>,
}

impl RunningServer {
    pub fn url(&self) -> &str {
        &self.url
    }

    pub fn stop(&mut self) -> Result<()> {
        self.stopped.store(true, Ordering::SeqCst);
        if let Some(handle) = self.handle.take() {
            handle
                .join()
                .map_err(|_| VisionError::Capture("page server thread panicked".to_string()))?;
            debug!(url = %self.url, "page server stopped");
        }
        Ok(())
    }
}

impl Drop for RunningServer {
    fn drop(&mut self) {
        let _ = self.stop();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::{Read, Write};
    use std::net::TcpStream;

    fn get(url: &str, path: &str) -> String {
        let addr = url.trim_start_matches("http://").trim_end_matches('/');
        let mut stream = TcpStream::connect(addr).unwrap();
        write!(stream, "GET {} HTTP/1.1\r\nHost: {}\r\nConnection: close\r\n\r\n", path, addr).unwrap();
        let mut out = String::new();
        stream.read_to_string(&mut out).unwrap();
        out
    }

    #[test]
    fn test_server_url() {
        let server = PageServer::new("<p>x</p>".to_string()).unwrap();
        assert!(server.url().starts_with("http://127.0.0.1:"));
    }

    #[test]
    fn test_serves_page_until_stopped() {
        let mut running = PageServer::new("<p>hello</p>".to_string()).unwrap().spawn();
        let url = running.url().to_string();

        let first = get(&url, "/");
        assert!(first.starts_with("HTTP/1.1 200"));
        assert!(first.contains("text/html; charset=UTF-8"));
        assert!(first.ends_with("<p>hello</p>"));

        assert!(get(&url, "/favicon.ico").starts_with("HTTP/1.1 404"));
        assert!(get(&url, "/").ends_with("<p>hello</p>"));

        running.stop().unwrap();
        running.stop().unwrap();
    }
}
