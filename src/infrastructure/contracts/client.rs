use std::future::Future;
use std::sync::Arc;

use ethers::{
    abi::{Abi, Detokenize, Tokenize},
    contract::{Contract, ContractFactory},
    middleware::SignerMiddleware,
    providers::{Http, Middleware, Provider},
    signers::{LocalWallet, Signer},
    types::{Address, TransactionReceipt, H256, U256},
};
use tracing::{debug, info};

use crate::domain::{CallReceipt, ContractError, DeploymentHandle, EventStateCode};
use crate::infrastructure::contracts::abis::ContractArtifact;
use crate::infrastructure::contracts::types::{ChainConfig, TxSettings};

/// Middleware stack every write goes through.
pub type SignerClient<M> = SignerMiddleware<M, LocalWallet>;

/// Open an HTTP provider and check it serves the configured chain.
pub async fn connect_http(chain: &ChainConfig) -> Result<Provider<Http>, ContractError> {
    let provider = Provider::<Http>::try_from(chain.rpc_url.as_str())
        .map_err(|e| ContractError::Config(format!("invalid RPC URL {}: {}", chain.rpc_url, e)))?;

    verify_chain_id(&provider, chain.chain_id).await?;
    info!(chain = %chain.name, rpc = %chain.rpc_url, "connected to node");
    Ok(provider)
}

/// Fail unless the node reports `expected` as its chain id.
pub async fn verify_chain_id<M: Middleware>(provider: &M, expected: u64) -> Result<(), ContractError> {
    let chain_id = provider
        .get_chainid()
        .await
        .map_err(|e| ContractError::NetworkError(e.to_string()))?;

    if chain_id != U256::from(expected) {
        return Err(ContractError::Config(format!(
            "Chain ID mismatch: node reports {}, configured {}",
            chain_id, expected
        )));
    }
    Ok(())
}

/// Client bound to one KickBack deployment and one signing account.
#[derive(Clone, Debug)]
pub struct KickBackClient<M: Middleware> {
    provider: M,
    settings: TxSettings,
    abi: Abi,
    handle: DeploymentHandle,
    wallet: LocalWallet,
    contract: Contract<SignerClient<M>>,
}

impl<M> KickBackClient<M>
where
    M: Middleware + Clone + 'static,
{
    /// Bind to `handle` without touching the network.
    pub fn at(provider: M, settings: TxSettings, abi: Abi, wallet: LocalWallet, handle: DeploymentHandle) -> Self {
        let wallet = wallet.with_chain_id(settings.chain_id);
        let signer = SignerMiddleware::new(provider.clone(), wallet.clone());
        let contract = Contract::new(handle.address(), abi.clone(), Arc::new(signer));

        Self {
            provider,
            settings,
            abi,
            handle,
            wallet,
            contract,
        }
    }

    /// Bind to an existing deployment, checking that code lives at its address.
    pub async fn attach(
        provider: M,
        settings: TxSettings,
        abi: Abi,
        wallet: LocalWallet,
        handle: DeploymentHandle,
    ) -> Result<Self, ContractError> {
        let code = provider
            .get_code(handle.address(), None)
            .await
            .map_err(|e| ContractError::NetworkError(e.to_string()))?;

        if code.is_empty() {
            return Err(ContractError::DeploymentError(format!("no contract code at {}", handle)));
        }

        info!(contract = %handle, "attached to KickBack");
        Ok(Self::at(provider, settings, abi, wallet, handle))
    }

    /// Deploy a new KickBack instance signed by `wallet` and wait for it to be mined.
    pub async fn deploy(
        provider: M,
        settings: TxSettings,
        artifact: &ContractArtifact,
        wallet: LocalWallet,
        deposit: U256,
        limit_attendees: U256,
    ) -> Result<Self, ContractError> {
        let wallet = wallet.with_chain_id(settings.chain_id);
        let signer = SignerMiddleware::new(provider.clone(), wallet.clone());
        let factory = ContractFactory::new(artifact.abi.clone(), artifact.bytecode.clone(), Arc::new(signer));

        let mut deployer = factory
            .deploy((deposit, limit_attendees))
            .map_err(|e| ContractError::DeploymentError(e.to_string()))?
            .confirmations(settings.confirmations);
        if settings.legacy {
            deployer = deployer.legacy();
        }

        debug!(%deposit, %limit_attendees, deployer = ?wallet.address(), "deploying KickBack");
        let (contract, receipt) = with_timeout(&settings, "deploy", deployer.send_with_receipt())
            .await?
            .map_err(|e| ContractError::DeploymentError(e.to_string()))?;

        ensure_deployed(&receipt)?;

        let handle = DeploymentHandle::new(contract.address());
        info!(contract = %handle, tx = ?receipt.transaction_hash, "KickBack deployed");

        Ok(Self {
            provider,
            settings,
            abi: artifact.abi.clone(),
            handle,
            wallet,
            contract,
        })
    }

    /// Same deployment, writes signed by another account.
    pub fn connect(&self, wallet: LocalWallet) -> Self {
        Self::at(
            self.provider.clone(),
            self.settings.clone(),
            self.abi.clone(),
            wallet,
            self.handle,
        )
    }

    pub fn handle(&self) -> DeploymentHandle {
        self.handle
    }

    pub fn signer_address(&self) -> Address {
        self.wallet.address()
    }

    pub fn provider(&self) -> &M {
        &self.provider
    }

    // ============ GENERIC CALLS ============

    /// Invoke a read-only method and decode its result.
    pub async fn call<T, D>(&self, method: &str, args: T) -> Result<D, ContractError>
    where
        T: Tokenize,
        D: Detokenize,
    {
        debug!(contract = %self.handle, method, "read call");
        let call = self.contract.method::<T, D>(method, args)?;
        call.call().await.map_err(|e| ContractError::from_call(method, e))
    }

    /// Send a state-changing method and wait for its inclusion.
    pub async fn send<T>(&self, method: &str, args: T, value: Option<U256>) -> Result<CallReceipt, ContractError>
    where
        T: Tokenize,
    {
        let mut call = self.contract.method::<T, ()>(method, args)?;
        if let Some(value) = value {
            call = call.value(value);
        }
        if self.settings.legacy {
            call = call.legacy();
        }
        if let Some(gas) = self.settings.gas_limit {
            call = call.gas(gas);
        }

        let pending = call
            .send()
            .await
            .map_err(|e| ContractError::from_call(method, e))?;
        let tx_hash = *pending;
        debug!(contract = %self.handle, method, tx = ?tx_hash, from = ?self.wallet.address(), "transaction sent");

        let receipt: Option<TransactionReceipt> =
            with_timeout(&self.settings, method, pending.confirmations(self.settings.confirmations))
                .await?
                .map_err(|e| ContractError::from_pending(method, e))?;
        let call_receipt = confirmed_receipt(method, tx_hash, value.unwrap_or_default(), receipt)?;

        info!(
            method,
            tx = ?call_receipt.transaction_hash,
            block = call_receipt.block_number,
            gas_used = %call_receipt.gas_used,
            "transaction confirmed"
        );
        Ok(call_receipt)
    }

    // ============ KICKBACK METHODS ============

    /// Deposit every attendee must pay to register.
    pub async fn deposit(&self) -> Result<U256, ContractError> {
        self.call("deposit", ()).await
    }

    pub async fn admin(&self) -> Result<Address, ContractError> {
        self.call("admin", ()).await
    }

    /// Register the connected account, paying `value`.
    pub async fn register(&self, value: U256) -> Result<CallReceipt, ContractError> {
        self.send("register", (), Some(value)).await
    }

    pub async fn start_event(&self) -> Result<CallReceipt, ContractError> {
        self.send("startEvent", (), None).await
    }

    pub async fn mark_attendance(&self, attendee: Address) -> Result<CallReceipt, ContractError> {
        self.send("markAttendance", attendee, None).await
    }

    pub async fn event_state(&self) -> Result<EventStateCode, ContractError> {
        self.call::<_, u8>("eventState", ()).await.map(EventStateCode)
    }

    pub async fn payout_amount(&self) -> Result<U256, ContractError> {
        self.call("payoutAmount", ()).await
    }

    pub async fn finalize_event(&self) -> Result<CallReceipt, ContractError> {
        self.send("finalizeEvent", (), None).await
    }

    pub async fn withdraw(&self) -> Result<CallReceipt, ContractError> {
        self.send("withdraw", (), None).await
    }

    // ============ ACCOUNT QUERIES ============

    /// Native balance of `address` at the latest block.
    pub async fn balance_of(&self, address: Address) -> Result<U256, ContractError> {
        self.provider
            .get_balance(address, None)
            .await
            .map_err(|e| ContractError::NetworkError(e.to_string()))
    }
}

/// A deployment receipt with status 0 means the constructor reverted.
fn ensure_deployed(receipt: &TransactionReceipt) -> Result<(), ContractError> {
    if receipt.status.map(|s| s.is_zero()).unwrap_or(false) {
        return Err(ContractError::DeploymentError(format!(
            "constructor reverted in transaction {:?}",
            receipt.transaction_hash
        )));
    }
    Ok(())
}

/// Map the result of waiting on `tx_hash` to a successful call receipt.
fn confirmed_receipt(
    method: &str,
    tx_hash: H256,
    value: U256,
    receipt: Option<TransactionReceipt>,
) -> Result<CallReceipt, ContractError> {
    let receipt = receipt.ok_or_else(|| {
        ContractError::NetworkError(format!("{} transaction {:?} was dropped", method, tx_hash))
    })?;

    let call_receipt = CallReceipt::from_receipt(method, value, &receipt);
    if !call_receipt.succeeded() {
        return Err(ContractError::CallReverted {
            method: method.to_string(),
            reason: format!("transaction {:?} reverted", tx_hash),
        });
    }
    Ok(call_receipt)
}

async fn with_timeout<F: Future>(settings: &TxSettings, method: &str, fut: F) -> Result<F::Output, ContractError> {
    match settings.timeout {
        Some(timeout) => tokio::time::timeout(timeout, fut).await.map_err(|_| {
            ContractError::NetworkError(format!("{} timed out after {}s", method, timeout.as_secs()))
        }),
        None => Ok(fut.await),
    }
}
