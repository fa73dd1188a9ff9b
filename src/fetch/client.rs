// src/fetch/client.rs

use anyhow::{Context, Result};
use reqwest::blocking::Client;
use tracing::debug;
use url::Url;

use super::{html::parse_first_table, FetchError, TableFetcher};
use crate::process::RawTable;

/// Blocking HTTP fetcher. One client is reused for the whole batch.
pub struct HttpFetcher {
    client: Client,
}

impl HttpFetcher {
    /// Build a client that sends `user_agent` on every request.
    pub fn new(user_agent: &str) -> Result<Self> {
        let client = Client::builder()
            .user_agent(user_agent)
            .build()
            .context("building HTTP client")?;
        Ok(Self { client })
    }

    pub fn with_client(client: Client) -> Self {
        Self { client }
    }
}

impl TableFetcher for HttpFetcher {
    fn fetch_table(&self, url: &Url) -> Result<RawTable, FetchError> {
        debug!(%url, "GET");
        let resp = self.client.get(url.clone()).send()?;
        let status = resp.status();
        if !status.is_success() {
            return Err(FetchError::Status(status));
        }
        let body = resp.text()?;
        parse_first_table(&body)?.ok_or(FetchError::NoTable)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::DEFAULT_USER_AGENT;
    use std::{
        io::{Read, Write},
        net::TcpListener,
        sync::mpsc,
        thread,
    };

    /// Answer exactly one request on a loopback port and hand the raw request
    /// text back through the channel.
    fn serve_once(status_line: &'static str, body: &'static str) -> (Url, mpsc::Receiver<String>) {
        let listener = TcpListener::bind("127.0.0.1:0").unwrap();
        let addr = listener.local_addr().unwrap();
        let (tx, rx) = mpsc::channel();
        thread::spawn(move || {
            if let Ok((mut stream, _)) = listener.accept() {
                let mut buf = [0u8; 8192];
                let n = stream.read(&mut buf).unwrap_or(0);
                let _ = tx.send(String::from_utf8_lossy(&buf[..n]).into_owned());
                let resp = format!(
                    "HTTP/1.1 {}\r\nContent-Type: text/html\r\nContent-Length: {}\r\nConnection: close\r\n\r\n{}",
                    status_line,
                    body.len(),
                    body
                );
                let _ = stream.write_all(resp.as_bytes());
            }
        });
        let url = Url::parse(&format!("http://{}/nfl/adp/qb.php", addr)).unwrap();
        (url, rx)
    }

    fn fetcher() -> HttpFetcher {
        let client = Client::builder()
            .user_agent(DEFAULT_USER_AGENT)
            .no_proxy()
            .build()
            .unwrap();
        HttpFetcher::with_client(client)
    }

    #[test]
    fn ok_page_yields_first_table_and_sends_user_agent() {
        let (url, rx) = serve_once(
            "200 OK",
            "<table><thead><tr><th>QB</th><th>Player Team (Bye)</th></tr></thead>\
             <tbody><tr><td>1</td><td>Josh Allen BUF (12)</td></tr></tbody></table>",
        );
        let table = fetcher().fetch_table(&url).unwrap();
        assert_eq!(table.headers, vec!["QB", "Player Team (Bye)"]);
        assert_eq!(table.len(), 1);

        let request = rx.recv().unwrap().to_ascii_lowercase();
        assert!(request.contains(&format!("user-agent: {}", DEFAULT_USER_AGENT.to_ascii_lowercase())));
    }

    #[test]
    fn not_found_is_a_status_error() {
        let (url, _rx) = serve_once("404 Not Found", "gone");
        let err = fetcher().fetch_table(&url).unwrap_err();
        match err {
            FetchError::Status(s) => assert_eq!(s.as_u16(), 404),
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn page_without_table_is_no_table() {
        let (url, _rx) = serve_once("200 OK", "<html><body>maintenance</body></html>");
        assert!(matches!(fetcher().fetch_table(&url), Err(FetchError::NoTable)));
    }
}
