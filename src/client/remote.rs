use std::time::Duration;

use reqwest::blocking::{Client, RequestBuilder, Response};
use reqwest::StatusCode;
use serde::Deserialize;
use serde::de::DeserializeOwned;

use super::backend::{Backend, Collection};
use super::error::ClientError;
use crate::insights::ProductivityReport;
use crate::models::{
    Acknowledgement, ChatExchange, ChatRequest, PrioritizeOutcome, SummarizedNote, User, UserPatch,
};

#[derive(Debug, Deserialize)]
struct ErrorBody {
    message: String,
    #[serde(default)]
    error: Option<String>,
}

/// Blocking HTTP client for the LifeOS API
pub struct RemoteBackend {
    client: Client,
    base_url: String,
}

impl RemoteBackend {
    pub fn new(base_url: &str, timeout: Duration) -> Result<Self, ClientError> {
        let client = Client::builder().timeout(timeout).build()?;
        Ok(Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    fn send<T: DeserializeOwned>(&self, request: RequestBuilder, kind: &str) -> Result<T, ClientError> {
        let response = request.send()?;
        Self::read(response, kind)
    }

    fn read<T: DeserializeOwned>(response: Response, kind: &str) -> Result<T, ClientError> {
        let status = response.status();
        if status == StatusCode::NOT_FOUND {
            return Err(ClientError::NotFound(kind.to_string()));
        }
        if !status.is_success() {
            let text = response.text().unwrap_or_default();
            let message = match serde_json::from_str::<ErrorBody>(&text) {
                Ok(ErrorBody { message, error: Some(error) }) => format!("{} ({})", message, error),
                Ok(ErrorBody { message, error: None }) => message,
                Err(_) => text,
            };
            return Err(ClientError::Status {
                status: status.as_u16(),
                message,
            });
        }
        Ok(response.json()?)
    }
}

impl Backend for RemoteBackend {
    fn list<C: Collection>(&self) -> Result<Vec<C>, ClientError> {
        self.send(self.client.get(self.url(C::ENDPOINT)), C::KIND)
    }

    fn create<C: Collection>(&self, draft: C::Draft) -> Result<C, ClientError> {
        C::check("created")?;
        self.send(self.client.post(self.url(C::ENDPOINT)).json(&draft), C::KIND)
    }

    fn update<C: Collection>(&self, id: &str, patch: C::Patch) -> Result<C, ClientError> {
        C::check("updated")?;
        let url = self.url(&format!("{}/{}", C::ENDPOINT, id));
        self.send(self.client.patch(url).json(&patch), C::KIND)
    }

    fn delete<C: Collection>(&self, id: &str) -> Result<(), ClientError> {
        C::check("deleted")?;
        let url = self.url(&format!("{}/{}", C::ENDPOINT, id));
        let _: Acknowledgement = self.send(self.client.delete(url), C::KIND)?;
        Ok(())
    }

    fn send_message(&self, content: &str) -> Result<ChatExchange, ClientError> {
        let body = ChatRequest {
            content: content.to_string(),
        };
        self.send(
            self.client.post(self.url("/api/chat/messages")).json(&body),
            "Chat message",
        )
    }

    fn prioritize_tasks(&self) -> Result<PrioritizeOutcome, ClientError> {
        self.send(self.client.post(self.url("/api/tasks/prioritize")), "Task")
    }

    fn summarize_note(&self, id: &str) -> Result<SummarizedNote, ClientError> {
        let url = self.url(&format!("/api/notes/{}/summarize", id));
        self.send(self.client.post(url), "Note")
    }

    fn productivity(&self) -> Result<ProductivityReport, ClientError> {
        self.send(self.client.get(self.url("/api/analytics/productivity")), "Analytics")
    }

    fn user(&self) -> Result<User, ClientError> {
        self.send(self.client.get(self.url("/api/user")), "User")
    }

    fn update_user(&self, patch: UserPatch) -> Result<User, ClientError> {
        self.send(self.client.patch(self.url("/api/user")).json(&patch), "User")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn closed_port_is_reported_as_unreachable() {
        // Port 9 (discard) is essentially never listening on loopback
        let backend = RemoteBackend::new("http://127.0.0.1:9/", Duration::from_millis(500)).unwrap();
        assert_eq!(backend.base_url(), "http://127.0.0.1:9");

        let err = backend.list::<crate::models::Task>().unwrap_err();
        assert!(err.falls_back(), "unexpected error: {err:?}");
    }

    #[test]
    fn chat_messages_cannot_be_deleted_remotely() {
        let backend = RemoteBackend::new("http://127.0.0.1:9", Duration::from_millis(500)).unwrap();
        let err = backend.delete::<crate::models::ChatMessage>("x").unwrap_err();
        assert!(matches!(err, ClientError::Unsupported { .. }));
    }
}
