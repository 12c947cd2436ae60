use std::path::PathBuf;

use ethers::providers::{Http, Middleware, Provider};
use ethers::types::{Address, U256};
use tracing::{debug, info};

use crate::domain::{CallReceipt, ContractError, DeploymentHandle, Role, ScenarioReport};
use crate::infrastructure::contracts::abis::{self, ContractArtifact};
use crate::infrastructure::contracts::client::{connect_http, KickBackClient};
use crate::infrastructure::contracts::types::{ClientConfig, NativeCurrency, TxSettings};
use crate::infrastructure::contracts::utils::units::{display_amount, parse_amount};
use crate::infrastructure::contracts::Accounts;

/// Deposit used by the demo, in native currency units.
pub const DEMO_DEPOSIT: &str = "1";
pub const DEMO_LIMIT_ATTENDEES: u64 = 10;

/// Parameters of the standalone deploy script.
pub const DEPLOY_DEPOSIT: &str = "0.5";
pub const DEPLOY_LIMIT_ATTENDEES: u64 = 10;

/// Service layer for KickBack operations
/// Owns the provider and accounts, hands out clients bound to a role.
pub struct KickBackService<M: Middleware> {
    provider: M,
    accounts: Accounts,
    settings: TxSettings,
    currency: NativeCurrency,
    artifact_path: PathBuf,
    deployed_address: Option<Address>,
}

impl KickBackService<Provider<Http>> {
    /// Connect to the configured node over HTTP.
    pub async fn new(config: ClientConfig) -> Result<Self, ContractError> {
        let provider = connect_http(&config.chain).await?;
        Self::with_provider(provider, &config)
    }
}

impl<M> KickBackService<M>
where
    M: Middleware + Clone + 'static,
{
    pub fn with_provider(provider: M, config: &ClientConfig) -> Result<Self, ContractError> {
        let accounts = Accounts::from_config(&config.accounts, config.chain.chain_id)?;
        if accounts.is_empty() {
            return Err(ContractError::Config("no accounts configured".to_string()));
        }

        Ok(Self {
            provider,
            accounts,
            settings: TxSettings::from_config(config),
            currency: config.chain.native_currency.clone(),
            artifact_path: config.artifact_path.clone(),
            deployed_address: config.deployed_address,
        })
    }

    pub fn accounts(&self) -> &Accounts {
        &self.accounts
    }

    pub fn currency(&self) -> &NativeCurrency {
        &self.currency
    }

    /// Parse a native currency amount such as "1" or "0.25" into wei.
    pub fn amount(&self, value: &str) -> Result<U256, ContractError> {
        parse_amount(value, &self.currency)
    }

    pub fn format(&self, value: U256) -> String {
        display_amount(value, &self.currency)
    }

    fn artifact(&self) -> Result<ContractArtifact, ContractError> {
        abis::load_artifact(&self.artifact_path)
    }

    /// Deploy a fresh KickBack instance from the owner account.
    pub async fn deploy(&self, deposit: U256, limit_attendees: u64) -> Result<KickBackClient<M>, ContractError> {
        let artifact = self.artifact()?;
        let client = KickBackClient::deploy(
            self.provider.clone(),
            self.settings.clone(),
            &artifact,
            self.accounts.owner()?.clone(),
            deposit,
            U256::from(limit_attendees),
        )
        .await?;

        info!("KickBack deployed to: {}", client.handle());
        Ok(client)
    }

    /// Attach the owner account to an existing deployment.
    pub async fn attach(&self, handle: DeploymentHandle) -> Result<KickBackClient<M>, ContractError> {
        // The artifact ABI may carry more than the fixed interface
        let abi = if self.artifact_path.exists() {
            self.artifact()?.abi
        } else {
            debug!(path = %self.artifact_path.display(), "no artifact, using embedded KickBack ABI");
            abis::load_kickback_abi()?
        };

        KickBackClient::attach(
            self.provider.clone(),
            self.settings.clone(),
            abi,
            self.accounts.owner()?.clone(),
            handle,
        )
        .await
    }

    /// Attach when a deployment address is configured, deploy otherwise.
    pub async fn deploy_or_attach(&self, deposit: U256, limit_attendees: u64) -> Result<KickBackClient<M>, ContractError> {
        match self.deployed_address {
            Some(address) => self.attach(DeploymentHandle::new(address)).await,
            None => self.deploy(deposit, limit_attendees).await,
        }
    }

    /// Client for the same deployment, signing as `role`.
    pub fn as_role(&self, client: &KickBackClient<M>, role: Role) -> Result<KickBackClient<M>, ContractError> {
        Ok(client.connect(self.accounts.get(role)?.clone()))
    }

    /// Deploy (or attach), register two attendees, run the event to completion
    /// and withdraw for the attendee marked present.
    pub async fn run_scenario(&self) -> Result<ScenarioReport, ContractError> {
        self.run_scenario_with(|_, _| {}).await
    }

    /// Same as [`run_scenario`](Self::run_scenario), handing every observed
    /// value to `observe` as soon as it is read.
    pub async fn run_scenario_with<F>(&self, mut observe: F) -> Result<ScenarioReport, ContractError>
    where
        F: FnMut(&str, &str),
    {
        let mut note = |label: &str, value: String| {
            info!("{}: {}", label, value);
            observe(label, &value);
        };

        let kickback = self
            .deploy_or_attach(self.amount(DEMO_DEPOSIT)?, DEMO_LIMIT_ATTENDEES)
            .await?;
        note("KickBack deployed to", kickback.handle().to_string());

        let deposit = kickback.deposit().await?;
        note("deposit", self.format(deposit));
        let admin = kickback.admin().await?;
        note("admin", format!("{:?}", admin));

        let attendee1 = self.as_role(&kickback, Role::Attendee(1))?;
        let attendee2 = self.as_role(&kickback, Role::Attendee(2))?;
        let attendee1_address = attendee1.signer_address();

        let balance_before_register = kickback.balance_of(attendee1_address).await?;
        note("beforeRegisterBalance", self.format(balance_before_register));

        let first = attendee1.register(deposit).await?;
        note("register", self.describe(&first));
        let balance_after_register = kickback.balance_of(attendee1_address).await?;
        note("afterRegisterBalance", self.format(balance_after_register));
        let second = attendee2.register(deposit).await?;
        note("register", self.describe(&second));

        kickback.start_event().await?;
        kickback.mark_attendance(attendee1_address).await?;
        let state_after_start = kickback.event_state().await?;
        note("state", state_after_start.to_string());
        let payout_after_start = kickback.payout_amount().await?;
        note("payout", payout_after_start.to_string());

        kickback.finalize_event().await?;
        let state_after_finalize = kickback.event_state().await?;
        note("state", state_after_finalize.to_string());
        let payout_after_finalize = kickback.payout_amount().await?;
        note("payout", payout_after_finalize.to_string());

        let balance_before_withdraw = kickback.balance_of(attendee1_address).await?;
        let withdrawal = attendee1.withdraw().await?;
        note("withdraw value", withdrawal.value.to_string());
        let balance_after_withdraw = kickback.balance_of(attendee1_address).await?;
        note("afterWithdrawnBalance", self.format(balance_after_withdraw));

        let report = ScenarioReport {
            deployment: kickback.handle(),
            deposit,
            admin,
            balance_before_register,
            balance_after_register,
            registrations: vec![first, second],
            state_after_start,
            payout_after_start,
            state_after_finalize,
            payout_after_finalize,
            balance_before_withdraw,
            withdrawal,
            balance_after_withdraw,
        };
        note("withdrawn amount", self.format(report.withdrawn_amount()));

        Ok(report)
    }

    fn describe(&self, receipt: &CallReceipt) -> String {
        format!(
            "tx {:?} from {:?} value {} block {}",
            receipt.transaction_hash,
            receipt.from,
            self.format(receipt.value),
            receipt.block_number
        )
    }
}
