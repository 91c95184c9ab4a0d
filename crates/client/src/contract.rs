//! Application-call client.
//!
//! [`ContractClient`] is the single entry point the per-standard clients sit
//! on: it owns the target application id, the signing account and the call
//! knobs (flat fee, escrow payment amount, on-complete action), and turns a
//! method plus encoded arguments into either a submitted transaction group
//! or a fee-less simulated read.

use crate::{
    account::Account,
    algod::{AlgodClient, PendingTransaction},
    error::ClientError,
    transaction::{self, OnComplete, SignedTransaction, Transaction},
};
use arckit_primitives::{Address, abi, abi::Method};

/// Rounds waited for confirmation before giving up.
const DEFAULT_WAIT_ROUNDS: u64 = 10;

/// A client bound to one deployed application.
#[derive(Debug, Clone)]
pub struct ContractClient {
    algod: AlgodClient,
    app_id: u64,
    account: Account,
    fee: u64,
    payment_amount: u64,
    on_complete: OnComplete,
    simulate_only: bool,
}

impl ContractClient {
    /// Bind `account` to the application `app_id` on the node behind
    /// `algod`.
    pub fn new(algod: AlgodClient, app_id: u64, account: Account) -> Self {
        Self {
            algod,
            app_id,
            account,
            fee: 0,
            payment_amount: 0,
            on_complete: OnComplete::NoOp,
            simulate_only: false,
        }
    }

    /// The bound application id.
    pub fn app_id(&self) -> u64 {
        self.app_id
    }

    /// The sender address of outgoing calls.
    pub fn sender(&self) -> Address {
        self.account.address()
    }

    /// Override the flat fee in microunits (0 keeps the suggested fee).
    pub fn set_fee(&mut self, fee: u64) {
        self.fee = fee;
    }

    /// Attach an escrow payment of `amount` microunits ahead of the call.
    pub fn set_payment_amount(&mut self, amount: u64) {
        self.payment_amount = amount;
    }

    /// Override the on-complete action of outgoing calls.
    pub fn set_on_complete(&mut self, on_complete: OnComplete) {
        self.on_complete = on_complete;
    }

    /// Simulate instead of submitting when set.
    pub fn set_simulate_only(&mut self, simulate_only: bool) {
        self.simulate_only = simulate_only;
    }

    fn method_args(method: Method, args: Vec<Vec<u8>>) -> Vec<Vec<u8>> {
        let mut app_args = Vec::with_capacity(args.len() + 1);
        app_args.push(method.selector().to_vec());
        app_args.extend(args);
        app_args
    }

    /// Invoke a state-changing method: build the group, sign, submit and
    /// wait for confirmation. With simulation enabled the group is simulated
    /// instead and the simulated result returned.
    pub async fn call(
        &self,
        method: Method,
        args: Vec<Vec<u8>>,
    ) -> Result<PendingTransaction, ClientError> {
        let params = self.algod.suggested_params().await?;
        let sender = self.account.address();

        let mut call = Transaction::app_call(
            &params,
            &sender,
            self.app_id,
            Self::method_args(method, args),
            self.on_complete,
        );
        if self.fee > 0 {
            call = call.with_fee(self.fee, &params);
        }

        let mut group = Vec::with_capacity(2);
        if self.payment_amount > 0 {
            group.push(Transaction::payment(
                &params,
                &sender,
                &Address::from_app_id(self.app_id),
                self.payment_amount,
            ));
        }
        group.push(call);
        if group.len() > 1 {
            transaction::assign_group(&mut group)?;
        }

        let call_txid = group
            .last()
            .expect("group contains the app call")
            .id()?;

        if self.simulate_only {
            let unsigned: Vec<_> = group
                .into_iter()
                .map(SignedTransaction::unsigned)
                .collect();
            let results = self.algod.simulate(&unsigned).await?;
            tracing::info!(txid = %call_txid, method = method.signature, "simulated");
            return results.into_iter().last().ok_or(ClientError::MissingReturn);
        }

        let signed = group
            .into_iter()
            .map(|txn| self.account.sign_transaction(txn))
            .collect::<Result<Vec<_>, _>>()?;
        self.algod.submit(&signed).await?;
        tracing::info!(txid = %call_txid, method = method.signature, "submitted");
        self.algod
            .wait_for_confirmation(&call_txid, DEFAULT_WAIT_ROUNDS)
            .await
    }

    /// Invoke a read-only method through simulation and return the raw ABI
    /// return payload.
    pub async fn read(&self, method: Method, args: Vec<Vec<u8>>) -> Result<Vec<u8>, ClientError> {
        let params = self.algod.suggested_params().await?;
        let sender = self.account.address();
        let call = Transaction::app_call(
            &params,
            &sender,
            self.app_id,
            Self::method_args(method, args),
            OnComplete::NoOp,
        );
        let results = self
            .algod
            .simulate(&[SignedTransaction::unsigned(call)])
            .await?;
        let result = results.into_iter().next().ok_or(ClientError::MissingReturn)?;
        return_value(&result)
    }

    /// The node client this contract client talks through.
    pub fn algod(&self) -> &AlgodClient {
        &self.algod
    }

    /// The signing account.
    pub fn account(&self) -> &Account {
        &self.account
    }
}

/// Extract the ABI return payload from a confirmed or simulated call: the
/// last log entry carrying the return marker.
pub fn return_value(result: &PendingTransaction) -> Result<Vec<u8>, ClientError> {
    let logs = result.decoded_logs()?;
    logs.iter()
        .rev()
        .find_map(|log| abi::return_payload(log))
        .map(<[u8]>::to_vec)
        .ok_or(ClientError::MissingReturn)
}

/// Sign `group` with `account`, submit it and wait for the last member to
/// confirm. Used for flows that build their own transactions (deploy,
/// program updates).
pub async fn sign_and_send(
    algod: &AlgodClient,
    account: &Account,
    mut group: Vec<Transaction>,
) -> Result<PendingTransaction, ClientError> {
    if group.len() > 1 {
        transaction::assign_group(&mut group)?;
    }
    let last_txid = group
        .last()
        .ok_or(ClientError::MissingReturn)?
        .id()?;
    let signed = group
        .into_iter()
        .map(|txn| account.sign_transaction(txn))
        .collect::<Result<Vec<_>, _>>()?;
    algod.submit(&signed).await?;
    algod
        .wait_for_confirmation(&last_txid, DEFAULT_WAIT_ROUNDS)
        .await
}

#[cfg(test)]
mod tests {
    use super::*;
    use arckit_primitives::abi::RETURN_PREFIX;
    use base64::{Engine, engine::general_purpose::STANDARD as BASE64};

    fn pending_with_logs(logs: Vec<Vec<u8>>) -> PendingTransaction {
        let encoded = logs.iter().map(|log| BASE64.encode(log)).collect();
        PendingTransaction {
            confirmed_round: 1,
            pool_error: String::new(),
            logs: encoded,
            application_index: 0,
        }
    }

    #[test]
    fn return_value_takes_last_marked_log() {
        let mut first = RETURN_PREFIX.to_vec();
        first.push(0x01);
        let mut second = RETURN_PREFIX.to_vec();
        second.push(0x02);
        let result = pending_with_logs(vec![b"plain".to_vec(), first, second]);
        assert_eq!(return_value(&result).unwrap(), vec![0x02]);
    }

    #[test]
    fn return_value_requires_marker() {
        let result = pending_with_logs(vec![b"no marker here".to_vec()]);
        assert!(matches!(
            return_value(&result),
            Err(ClientError::MissingReturn)
        ));
    }

    #[test]
    fn selector_leads_method_args() {
        let method = Method::new("arc200_transfer(address,uint256)bool");
        let args = ContractClient::method_args(method, vec![vec![0xaa; 32], vec![0; 32]]);
        assert_eq!(args.len(), 3);
        assert_eq!(args[0], method.selector().to_vec());
    }
}
