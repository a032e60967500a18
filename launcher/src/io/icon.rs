//! Best-effort fetch of decorative module icons.
//!
//! Failures never surface: every error path logs at debug level and returns
//! `None`, and the caller falls back to the module's emoji. No retries.

use reqwest::blocking::Client;
use tracing::debug;

use crate::io::config::IconConfig;

/// Fetch the icon image at `url`, or `None` on any failure.
pub fn fetch_icon(url: &str, config: &IconConfig) -> Option<Vec<u8>> {
    let mut builder = Client::builder()
        .user_agent(config.user_agent.as_str())
        .timeout(config.timeout());
    if !config.system_proxy {
        builder = builder.no_proxy();
    }
    let client = match builder.build() {
        Ok(client) => client,
        Err(e) => {
            debug!(err = %e, "failed to build icon client");
            return None;
        }
    };

    let response = match client.get(url).send().and_then(|r| r.error_for_status()) {
        Ok(response) => response,
        Err(e) => {
            debug!(url, err = %e, "icon fetch failed");
            return None;
        }
    };

    match response.bytes() {
        Ok(body) => {
            debug!(url, bytes = body.len(), "icon fetched");
            Some(body.to_vec())
        }
        Err(e) => {
            debug!(url, err = %e, "icon body read failed");
            None
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::{BufRead, BufReader, Read, Write};
    use std::net::TcpListener;
    use std::thread;
    use std::time::{Duration, Instant};

    fn local_config() -> IconConfig {
        IconConfig {
            system_proxy: false,
            ..IconConfig::default()
        }
    }

    /// Serve one HTTP response and return the request's `user-agent` header.
    fn serve_once(
        status_line: &'static str,
        body: &'static [u8],
    ) -> (String, thread::JoinHandle<String>) {
        let listener = TcpListener::bind("127.0.0.1:0").expect("bind");
        let url = format!("http://{}/icon.png", listener.local_addr().expect("addr"));
        let handle = thread::spawn(move || {
            let (stream, _) = listener.accept().expect("accept");
            let mut reader = BufReader::new(stream.try_clone().expect("clone"));
            let mut user_agent = String::new();
            loop {
                let mut line = String::new();
                reader.read_line(&mut line).expect("read request");
                let trimmed = line.trim_end();
                if trimmed.is_empty() {
                    break;
                }
                if let Some((name, value)) = trimmed.split_once(':')
                    && name.eq_ignore_ascii_case("user-agent")
                {
                    user_agent = value.trim().to_string();
                }
            }
            let mut stream = stream;
            write!(
                stream,
                "{status_line}\r\nContent-Length: {}\r\nContent-Type: image/png\r\nConnection: close\r\n\r\n",
                body.len()
            )
            .expect("write head");
            stream.write_all(body).expect("write body");
            user_agent
        });
        (url, handle)
    }

    #[test]
    fn returns_body_and_sends_user_agent() {
        let (url, server) = serve_once("HTTP/1.1 200 OK", b"PNG!");
        let config = IconConfig {
            user_agent: "suite-test/1.0".to_string(),
            ..local_config()
        };
        assert_eq!(fetch_icon(&url, &config), Some(b"PNG!".to_vec()));
        assert_eq!(server.join().expect("server"), "suite-test/1.0");
    }

    #[test]
    fn error_status_falls_back() {
        let (url, server) = serve_once("HTTP/1.1 404 Not Found", b"");
        assert_eq!(fetch_icon(&url, &local_config()), None);
        server.join().expect("server");
    }

    #[test]
    fn refused_connection_falls_back() {
        let listener = TcpListener::bind("127.0.0.1:0").expect("bind");
        let url = format!("http://{}/icon.png", listener.local_addr().expect("addr"));
        drop(listener);
        assert_eq!(fetch_icon(&url, &local_config()), None);
    }

    #[test]
    fn silent_server_times_out() {
        let listener = TcpListener::bind("127.0.0.1:0").expect("bind");
        let url = format!("http://{}/icon.png", listener.local_addr().expect("addr"));
        let server = thread::spawn(move || {
            let (mut stream, _) = listener.accept().expect("accept");
            stream
                .set_read_timeout(Some(Duration::from_secs(10)))
                .expect("read timeout");
            // Hold the connection open without answering until the client gives up.
            let mut buf = [0u8; 1024];
            while matches!(stream.read(&mut buf), Ok(n) if n > 0) {}
        });
        let config = IconConfig {
            timeout_secs: 1,
            ..local_config()
        };

        let started = Instant::now();
        assert_eq!(fetch_icon(&url, &config), None);
        assert!(started.elapsed() < Duration::from_secs(5));
        server.join().expect("server");
    }

    #[test]
    fn malformed_url_falls_back() {
        assert_eq!(fetch_icon("not a url", &IconConfig::default()), None);
    }
}
