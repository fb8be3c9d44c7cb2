//! HTTP implementation of the drafts data source.

use async_trait::async_trait;
use reqwest::Client;
use shared::domain::Game;

use crate::{DraftsApi, FetchDraftsError};

pub struct HttpDraftsApi {
    http: Client,
    api_base: String,
}

impl HttpDraftsApi {
    pub fn new(api_base: impl Into<String>) -> Self {
        let api_base = api_base.into();
        Self {
            http: Client::new(),
            api_base: api_base.trim_end_matches('/').to_string(),
        }
    }

    fn drafts_url(&self) -> String {
        format!("{}/drafts", self.api_base)
    }
}

#[async_trait]
impl DraftsApi for HttpDraftsApi {
    async fn list_drafts(&self) -> Result<Vec<Game>, FetchDraftsError> {
        let response = self
            .http
            .get(self.drafts_url())
            .send()
            .await
            .map_err(|error| FetchDraftsError::Network(error.to_string()))?;
        let status = response.status();
        if !status.is_success() {
            return Err(FetchDraftsError::Server {
                status: status.as_u16(),
            });
        }
        response
            .json::<Vec<Game>>()
            .await
            .map_err(|error| FetchDraftsError::Payload(error.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn trims_trailing_slash_from_api_base() {
        let api = HttpDraftsApi::new("http://127.0.0.1:9/api/");
        assert_eq!(api.drafts_url(), "http://127.0.0.1:9/api/drafts");
    }

    #[test]
    fn keeps_api_base_without_trailing_slash_as_is() {
        let api = HttpDraftsApi::new("http://127.0.0.1:9/api");
        assert_eq!(api.drafts_url(), "http://127.0.0.1:9/api/drafts");
    }
}
