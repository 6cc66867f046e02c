use reqwest::StatusCode;
use reqwest::blocking::{Client, Response};
use serde::de::DeserializeOwned;
use std::time::Duration;

use super::error::{MailError, Result};
use super::types::{Email, FlagUpdate, Mailbox, NewEmail, SendReceipt, ServerError};
use crate::config::ServerConfig;

/// The `/emails` endpoints the client needs
pub trait MailApi {
    fn list_mailbox(&self, mailbox: Mailbox) -> Result<Vec<Email>>;
    fn get_email(&self, id: u64) -> Result<Email>;
    fn update_flags(&self, id: u64, update: FlagUpdate) -> Result<()>;
    /// Returns the server's confirmation message
    fn send_email(&self, draft: &NewEmail) -> Result<String>;
}

pub struct HttpClient {
    base_url: String,
    http: Client,
}

impl HttpClient {
    pub fn new(config: &ServerConfig) -> Result<Self> {
        let http = Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()?;
        Ok(Self {
            base_url: config.base_url.trim_end_matches('/').to_string(),
            http,
        })
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    fn read_json<T: DeserializeOwned>(&self, response: Response, path: &str) -> Result<T> {
        let status = response.status();
        let text = response.text()?;
        decode_body(status, &text, path)
    }
}

impl MailApi for HttpClient {
    fn list_mailbox(&self, mailbox: Mailbox) -> Result<Vec<Email>> {
        let path = mailbox_path(mailbox);
        tracing::debug!(%path, "GET");
        let response = self.http.get(self.url(&path)).send()?;
        self.read_json(response, &path)
    }

    fn get_email(&self, id: u64) -> Result<Email> {
        let path = email_path(id);
        tracing::debug!(%path, "GET");
        let response = self.http.get(self.url(&path)).send()?;
        self.read_json(response, &path)
    }

    fn update_flags(&self, id: u64, update: FlagUpdate) -> Result<()> {
        let path = email_path(id);
        tracing::debug!(%path, ?update, "PUT");
        let response = self.http.put(self.url(&path)).json(&update).send()?;
        let status = response.status();
        if status.is_success() {
            return Ok(());
        }
        // Error bodies are optional here; fall back to the status.
        let text = response.text().unwrap_or_default();
        Err(error_from_body(&text).unwrap_or(MailError::Status {
            status: status.as_u16(),
            path,
        }))
    }

    fn send_email(&self, draft: &NewEmail) -> Result<String> {
        let path = "/emails";
        tracing::debug!(%path, recipients = %draft.recipients, "POST");
        let response = self.http.post(self.url(path)).json(draft).send()?;
        let receipt: SendReceipt = self.read_json(response, path)?;
        Ok(receipt.message)
    }
}

pub fn mailbox_path(mailbox: Mailbox) -> String {
    format!("/emails/{}", mailbox.as_str())
}

pub fn email_path(id: u64) -> String {
    format!("/emails/{}", id)
}

fn error_from_body(text: &str) -> Option<MailError> {
    serde_json::from_str::<ServerError>(text)
        .ok()
        .map(|e| MailError::Server(e.error))
}

/// An `{"error"}` body wins over the status code, which wins over decoding
pub(crate) fn decode_body<T: DeserializeOwned>(
    status: StatusCode,
    text: &str,
    path: &str,
) -> Result<T> {
    if let Some(err) = error_from_body(text) {
        return Err(err);
    }
    if !status.is_success() {
        return Err(MailError::Status {
            status: status.as_u16(),
            path: path.to_string(),
        });
    }
    serde_json::from_str(text).map_err(|e| MailError::Decode {
        path: path.to_string(),
        reason: e.to_string(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_paths() {
        assert_eq!(mailbox_path(Mailbox::Archive), "/emails/archive");
        assert_eq!(email_path(42), "/emails/42");
    }

    #[test]
    fn test_base_url_trailing_slash() {
        let config = ServerConfig {
            base_url: "http://localhost:8000/".to_string(),
            ..ServerConfig::default()
        };
        let client = HttpClient::new(&config).unwrap();
        assert_eq!(client.url("/emails/inbox"), "http://localhost:8000/emails/inbox");
    }

    #[test]
    fn test_decode_list_preserves_order() {
        let body = r#"[
            {"id": 3, "sender": "c@x.com", "subject": "third"},
            {"id": 1, "sender": "a@x.com", "subject": "first"}
        ]"#;
        let emails: Vec<Email> = decode_body(StatusCode::OK, body, "/emails/inbox").unwrap();
        let ids: Vec<u64> = emails.iter().map(|e| e.id).collect();
        assert_eq!(ids, vec![3, 1]);
    }

    #[test]
    fn test_decode_server_error() {
        let body = r#"{"error": "Recipient required"}"#;
        let err = decode_body::<SendReceipt>(StatusCode::BAD_REQUEST, body, "/emails")
            .unwrap_err();
        assert!(matches!(err, MailError::Server(ref m) if m == "Recipient required"));
        assert_eq!(err.to_string(), "Recipient required");
    }

    #[test]
    fn test_decode_status_without_error_body() {
        let err = decode_body::<Email>(StatusCode::NOT_FOUND, "<h1>Not Found</h1>", "/emails/9")
            .unwrap_err();
        assert!(matches!(err, MailError::Status { status: 404, .. }));
    }

    #[test]
    fn test_decode_garbage() {
        let err = decode_body::<Vec<Email>>(StatusCode::OK, "{]", "/emails/sent").unwrap_err();
        assert!(matches!(err, MailError::Decode { ref path, .. } if path == "/emails/sent"));
    }

    #[test]
    fn test_send_receipt() {
        let receipt: SendReceipt =
            decode_body(StatusCode::CREATED, r#"{"message": "Email sent"}"#, "/emails").unwrap();
        assert_eq!(receipt.message, "Email sent");
    }
}
