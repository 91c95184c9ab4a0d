//! Node (algod) REST client.

use crate::{
    error::ClientError,
    transaction::{SignedTransaction, SuggestedParams, encode_canonical},
};
use base64::{Engine, engine::general_purpose::STANDARD as BASE64};
use serde::{Deserialize, Serialize};
use std::time::Duration;
use url::Url;

/// Header carrying the node API token.
const TOKEN_HEADER: &str = "X-Algo-API-Token";

/// Typed client for the node's REST API.
#[derive(Debug, Clone)]
pub struct AlgodClient {
    http: reqwest::Client,
    base: Url,
    token: String,
}

/// One entry of an application's global state.
#[derive(Debug, Clone, Deserialize)]
pub struct StateEntry {
    /// Base64-encoded raw key.
    pub key: String,
    /// The stored value.
    pub value: StateValue,
}

/// The value half of a global state entry.
#[derive(Debug, Clone, Deserialize)]
pub struct StateValue {
    /// Base64-encoded bytes value; meaningful when `kind` is 1.
    #[serde(default)]
    pub bytes: String,
    /// Uint value; meaningful when `kind` is 2.
    #[serde(default)]
    pub uint: u64,
    /// Value kind discriminator (1 = bytes, 2 = uint).
    #[serde(rename = "type", default)]
    pub kind: u64,
}

/// Decoded global state of an application.
#[derive(Debug, Clone)]
pub struct GlobalState {
    entries: Vec<(Vec<u8>, StateValue)>,
}

impl GlobalState {
    /// Look up a bytes-valued key, decoding its base64 payload.
    pub fn bytes(&self, key: &str) -> Option<Vec<u8>> {
        self.entries
            .iter()
            .find(|(k, v)| k == key.as_bytes() && v.kind == 1)
            .and_then(|(_, v)| BASE64.decode(&v.bytes).ok())
    }

    /// Look up a uint-valued key.
    pub fn uint(&self, key: &str) -> Option<u64> {
        self.entries
            .iter()
            .find(|(k, v)| k == key.as_bytes() && v.kind == 2)
            .map(|(_, v)| v.uint)
    }
}

/// A transaction as reported by the pending/confirmed endpoint.
#[derive(Debug, Clone, Deserialize)]
pub struct PendingTransaction {
    /// The round the transaction was confirmed in, if any.
    #[serde(rename = "confirmed-round", default)]
    pub confirmed_round: u64,
    /// Pool rejection reason, empty while the transaction is in flight.
    #[serde(rename = "pool-error", default)]
    pub pool_error: String,
    /// Base64-encoded application log entries.
    #[serde(default)]
    pub logs: Vec<String>,
    /// Id of a created application, for application-create transactions.
    #[serde(rename = "application-index", default)]
    pub application_index: u64,
}

impl PendingTransaction {
    /// The raw decoded application logs.
    pub fn decoded_logs(&self) -> Result<Vec<Vec<u8>>, ClientError> {
        self.logs
            .iter()
            .map(|log| BASE64.decode(log).map_err(ClientError::from))
            .collect()
    }
}

#[derive(Deserialize)]
struct TransactionParamsResponse {
    fee: u64,
    #[serde(rename = "genesis-hash")]
    genesis_hash: String,
    #[serde(rename = "genesis-id")]
    genesis_id: String,
    #[serde(rename = "last-round")]
    last_round: u64,
    #[serde(rename = "min-fee")]
    min_fee: u64,
}

#[derive(Deserialize)]
struct ApplicationResponse {
    params: ApplicationParams,
}

#[derive(Deserialize)]
struct ApplicationParams {
    #[serde(rename = "global-state", default)]
    global_state: Vec<StateEntry>,
}

#[derive(Deserialize)]
struct SubmitResponse {
    #[serde(rename = "txId")]
    tx_id: String,
}

#[derive(Serialize)]
struct SimulateRequest<'a> {
    #[serde(rename = "allow-empty-signatures")]
    allow_empty_signatures: bool,
    #[serde(rename = "txn-groups")]
    txn_groups: Vec<SimulateRequestGroup<'a>>,
}

#[derive(Serialize)]
struct SimulateRequestGroup<'a> {
    txns: &'a [SignedTransaction],
}

#[derive(Deserialize)]
struct SimulateResponse {
    #[serde(rename = "txn-groups")]
    txn_groups: Vec<SimulateGroupResult>,
}

#[derive(Deserialize)]
struct SimulateGroupResult {
    #[serde(rename = "failure-message", default)]
    failure_message: String,
    #[serde(rename = "txn-results", default)]
    txn_results: Vec<SimulateTxnResult>,
}

#[derive(Deserialize)]
struct SimulateTxnResult {
    #[serde(rename = "txn-result")]
    txn_result: PendingTransaction,
}

#[derive(Deserialize)]
struct ApiErrorBody {
    message: String,
}

async fn check<T: serde::de::DeserializeOwned>(
    response: reqwest::Response,
) -> Result<T, ClientError> {
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
    Ok(response.json::<T>().await?)
}

impl AlgodClient {
    /// Create a client for the node at `base`, authenticating with `token`
    /// when it is non-empty.
    pub fn new(base: Url, token: impl Into<String>) -> Self {
        Self {
            http: reqwest::Client::new(),
            base,
            token: token.into(),
        }
    }

    fn get(&self, path: &str) -> reqwest::RequestBuilder {
        let mut request = self.http.get(join(&self.base, path));
        if !self.token.is_empty() {
            request = request.header(TOKEN_HEADER, &self.token);
        }
        request
    }

    fn post(&self, path: &str) -> reqwest::RequestBuilder {
        let mut request = self.http.post(join(&self.base, path));
        if !self.token.is_empty() {
            request = request.header(TOKEN_HEADER, &self.token);
        }
        request
    }

    /// Fetch suggested transaction parameters.
    pub async fn suggested_params(&self) -> Result<SuggestedParams, ClientError> {
        let params: TransactionParamsResponse =
            check(self.get("v2/transactions/params").send().await?).await?;
        Ok(SuggestedParams {
            fee: params.fee,
            min_fee: params.min_fee,
            first_valid: params.last_round,
            genesis_id: params.genesis_id,
            genesis_hash: BASE64.decode(&params.genesis_hash)?,
        })
    }

    /// Fetch an application's global state.
    pub async fn application_global_state(
        &self,
        app_id: u64,
    ) -> Result<GlobalState, ClientError> {
        let app: ApplicationResponse = check(
            self.get(&format!("v2/applications/{app_id}"))
                .send()
                .await?,
        )
        .await?;
        let entries = app
            .params
            .global_state
            .into_iter()
            .map(|entry| Ok((BASE64.decode(&entry.key)?, entry.value)))
            .collect::<Result<_, ClientError>>()?;
        Ok(GlobalState { entries })
    }

    /// Submit a signed transaction group and return the reported txid.
    pub async fn submit(&self, group: &[SignedTransaction]) -> Result<String, ClientError> {
        let mut body = Vec::new();
        for stxn in group {
            body.extend_from_slice(&encode_canonical(stxn)?);
        }
        let response: SubmitResponse = check(
            self.post("v2/transactions")
                .header(reqwest::header::CONTENT_TYPE, "application/x-binary")
                .body(body)
                .send()
                .await?,
        )
        .await?;
        Ok(response.tx_id)
    }

    /// Fetch the pending/confirmed status of a transaction.
    pub async fn pending_transaction(
        &self,
        txid: &str,
    ) -> Result<PendingTransaction, ClientError> {
        check(
            self.get(&format!("v2/transactions/pending/{txid}"))
                .query(&[("format", "json")])
                .send()
                .await?,
        )
        .await
    }

    /// Poll until `txid` is confirmed, for at most `rounds` rounds.
    pub async fn wait_for_confirmation(
        &self,
        txid: &str,
        rounds: u64,
    ) -> Result<PendingTransaction, ClientError> {
        for _ in 0..rounds {
            let pending = self.pending_transaction(txid).await?;
            if !pending.pool_error.is_empty() {
                return Err(ClientError::Rejected {
                    txid: txid.to_owned(),
                    message: pending.pool_error,
                });
            }
            if pending.confirmed_round > 0 {
                tracing::debug!(txid, round = pending.confirmed_round, "confirmed");
                return Ok(pending);
            }
            tokio::time::sleep(Duration::from_secs(1)).await;
        }
        Err(ClientError::ConfirmationTimeout {
            txid: txid.to_owned(),
            rounds,
        })
    }

    /// Simulate an (optionally unsigned) transaction group, returning the
    /// per-transaction results.
    pub async fn simulate(
        &self,
        group: &[SignedTransaction],
    ) -> Result<Vec<PendingTransaction>, ClientError> {
        let request = SimulateRequest {
            allow_empty_signatures: true,
            txn_groups: vec![SimulateRequestGroup { txns: group }],
        };
        let response: SimulateResponse = check(
            self.post("v2/transactions/simulate")
                .header(reqwest::header::CONTENT_TYPE, "application/msgpack")
                .body(encode_canonical(&request)?)
                .send()
                .await?,
        )
        .await?;
        let Some(group) = response.txn_groups.into_iter().next() else {
            return Err(ClientError::Simulation("empty response".to_owned()));
        };
        if !group.failure_message.is_empty() {
            return Err(ClientError::Simulation(group.failure_message));
        }
        Ok(group
            .txn_results
            .into_iter()
            .map(|result| result.txn_result)
            .collect())
    }
}

fn join(base: &Url, path: &str) -> Url {
    // bases are validated urls; appending a relative api path cannot fail
    let mut url = base.clone();
    {
        let mut segments = url.path_segments_mut().expect("base url cannot be a base");
        segments.pop_if_empty();
        for segment in path.split('/') {
            segments.push(segment);
        }
    }
    url
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn url_join_handles_trailing_slash() {
        let base: Url = "http://localhost:4001".parse().unwrap();
        assert_eq!(
            join(&base, "v2/transactions/params").as_str(),
            "http://localhost:4001/v2/transactions/params"
        );
        let base: Url = "http://localhost:4001/".parse().unwrap();
        assert_eq!(
            join(&base, "v2/status").as_str(),
            "http://localhost:4001/v2/status"
        );
    }

    #[test]
    fn global_state_lookup() {
        let state = GlobalState {
            entries: vec![
                (
                    b"name".to_vec(),
                    StateValue {
                        bytes: BASE64.encode(b"VIA\0\0"),
                        uint: 0,
                        kind: 1,
                    },
                ),
                (
                    b"decimals".to_vec(),
                    StateValue {
                        bytes: String::new(),
                        uint: 6,
                        kind: 2,
                    },
                ),
            ],
        };
        assert_eq!(state.bytes("name").unwrap(), b"VIA\0\0");
        assert_eq!(state.uint("decimals"), Some(6));
        assert_eq!(state.bytes("decimals"), None);
        assert_eq!(state.uint("missing"), None);
    }
}
