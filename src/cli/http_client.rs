use std::time::Duration;

use reqwest::blocking::{Client, RequestBuilder, Response};
use serde::{Serialize, de::DeserializeOwned};

use crate::server::response::MessageResponse;

#[derive(Clone)]
pub struct ApiClient {
    client: Client,
    base_url: String,
    token: Option<String>,
}

impl ApiClient {
    pub fn new(server_url: &str, token: Option<String>) -> anyhow::Result<Self> {
        let client = Client::builder().timeout(Duration::from_secs(30)).build()?;
        Ok(Self {
            client,
            base_url: server_url.trim_end_matches('/').to_string(),
            token: token.filter(|t| !t.is_empty()),
        })
    }

    #[must_use]
    pub fn has_token(&self) -> bool {
        self.token.is_some()
    }

    pub fn get<T: DeserializeOwned>(&self, path: &str) -> anyhow::Result<T> {
        let resp = self.authorize(self.client.get(self.url(path))).send()?;
        handle_response(resp)
    }

    pub fn post<T: DeserializeOwned, B: Serialize>(
        &self,
        path: &str,
        body: &B,
    ) -> anyhow::Result<T> {
        let resp = self
            .authorize(self.client.post(self.url(path)))
            .json(body)
            .send()?;
        handle_response(resp)
    }

    pub fn put<T: DeserializeOwned, B: Serialize>(
        &self,
        path: &str,
        body: &B,
    ) -> anyhow::Result<T> {
        let resp = self
            .authorize(self.client.put(self.url(path)))
            .json(body)
            .send()?;
        handle_response(resp)
    }

    pub fn delete(&self, path: &str) -> anyhow::Result<String> {
        let resp = self.authorize(self.client.delete(self.url(path))).send()?;
        let body: MessageResponse = handle_response(resp)?;
        Ok(body.message)
    }

    fn url(&self, path: &str) -> String {
        format!("{}/api{}", self.base_url, path)
    }

    fn authorize(&self, request: RequestBuilder) -> RequestBuilder {
        match &self.token {
            Some(token) => request.bearer_auth(token),
            None => request,
        }
    }
}

fn handle_response<T: DeserializeOwned>(resp: Response) -> anyhow::Result<T> {
    let status = resp.status();
    if status.is_success() {
        return Ok(resp.json()?);
    }

    let message = resp
        .json::<MessageResponse>()
        .map(|body| body.message)
        .unwrap_or_else(|_| "Server error (no details provided)".into());
    Err(anyhow::anyhow!("{message} ({})", status.as_u16()))
}
