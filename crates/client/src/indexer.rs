//! Indexer REST client.

use crate::error::ClientError;
use arckit_primitives::Address;
use base64::{Engine, engine::general_purpose::STANDARD as BASE64};
use serde::Deserialize;
use url::Url;

/// Header carrying the indexer API token.
const TOKEN_HEADER: &str = "X-Indexer-API-Token";

/// Note prefix stamped on application-create transactions so deployments can
/// be found again by creator and name.
pub const DEPLOY_NOTE_PREFIX: &str = "arckit/v1:";

/// The deploy note for a named application.
pub fn deploy_note(name: &str) -> Vec<u8> {
    format!("{DEPLOY_NOTE_PREFIX}{name}").into_bytes()
}

/// Typed client for the indexer's REST API.
#[derive(Debug, Clone)]
pub struct IndexerClient {
    http: reqwest::Client,
    base: Url,
    token: String,
}

#[derive(Deserialize)]
struct TransactionSearchResponse {
    #[serde(default)]
    transactions: Vec<IndexedTransaction>,
}

#[derive(Deserialize)]
struct IndexedTransaction {
    #[serde(rename = "created-application-index", default)]
    created_application_index: u64,
    #[serde(default)]
    note: String,
}

#[derive(Deserialize)]
struct ApiErrorBody {
    message: String,
}

impl IndexerClient {
    /// Create a client for the indexer at `base`, authenticating with
    /// `token` when it is non-empty.
    pub fn new(base: Url, token: impl Into<String>) -> Self {
        Self {
            http: reqwest::Client::new(),
            base,
            token: token.into(),
        }
    }

    /// Find the newest application created by `creator` whose deploy note
    /// names `name`.
    pub async fn find_application(
        &self,
        creator: &Address,
        name: &str,
    ) -> Result<Option<u64>, ClientError> {
        let mut url = self.base.clone();
        {
            let mut segments = url.path_segments_mut().expect("base url cannot be a base");
            segments.pop_if_empty();
            segments.extend(["v2", "transactions"]);
        }
        let mut request = self
            .http
            .get(url)
            .query(&[
                ("address", creator.to_string()),
                ("tx-type", "appl".to_owned()),
                ("note-prefix", BASE64.encode(DEPLOY_NOTE_PREFIX)),
            ]);
        if !self.token.is_empty() {
            request = request.header(TOKEN_HEADER, &self.token);
        }
        let response = request.send().await?;
        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            let message = serde_json::from_str::<ApiErrorBody>(&body)
                .map(|e| e.message)
                .unwrap_or(body);
            return Err(ClientError::Api {
                status: status.as_u16(),
                message,
            });
        }
        let search: TransactionSearchResponse = response.json().await?;

        let wanted = deploy_note(name);
        Ok(search
            .transactions
            .into_iter()
            .filter(|txn| txn.created_application_index > 0)
            .filter(|txn| {
                BASE64
                    .decode(&txn.note)
                    .is_ok_and(|note| note == wanted)
            })
            .map(|txn| txn.created_application_index)
            .last())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn deploy_note_is_prefixed_name() {
        assert_eq!(deploy_note("mytoken"), b"arckit/v1:mytoken");
    }
}
