//! [`DripClient`], the async entry point for depositors, keepers and admins.

use std::time::{SystemTime, UNIX_EPOCH};

use solana_client::{
    nonblocking::rpc_client::RpcClient,
    rpc_config::{RpcAccountInfoConfig, RpcProgramAccountsConfig},
    rpc_filter::{Memcmp, MemcmpEncodedBytes, RpcFilterType},
};
use solana_sdk::{
    commitment_config::CommitmentConfig,
    instruction::Instruction,
    pubkey,
    pubkey::Pubkey,
    signature::{Keypair, Signature, Signer},
    transaction::Transaction,
};

use crate::{
    error::{Error, Result},
    instructions::{
        close_position_ix, deposit_ix, derive_ata, derive_position, derive_vault,
        derive_vault_period, drip_spl_token_swap_ix, init_vault_ix, init_vault_period_ix,
        init_vault_proto_config_ix, withdraw_b_ix, DepositAccounts, DripAccounts,
        SplTokenSwapAccounts, WithdrawAccounts,
    },
    math::quote_withdrawal,
    state::{
        account_disc, parse_position, parse_proto_config, parse_token_amount, parse_vault,
        parse_vault_period, PositionState, ProtoConfigState, VaultPeriodState, VaultState,
    },
    types::{
        CreateProtoConfigParams, CreateProtoConfigResult, CreateVaultParams, CreateVaultResult,
        DepositParams, DepositResult, DripResult, PositionInfo, VaultInfo, VaultKey,
        WithdrawResult, WithdrawalQuote,
    },
};

// ─── Constants ────────────────────────────────────────────────────────────────

pub const DEFAULT_PROGRAM_ID: Pubkey = pubkey!("dripTrkvSyQKvkyWg7oi4jmeEGMA5scSYowHArJ9Vwk");
const DEVNET_RPC:  &str = "https://api.devnet.solana.com";
const MAINNET_RPC: &str = "https://api.mainnet-beta.solana.com";

/// Offset of `Position::vault`, right after the discriminator.
const POSITION_VAULT_OFFSET: usize = 8;

// ─── Client ───────────────────────────────────────────────────────────────────

/// Async Drip client for Solana.
///
/// ```rust,no_run
/// # use drip_sdk::{DripClient, DepositParams, VaultKey};
/// # use solana_sdk::{pubkey::Pubkey, signature::Keypair};
/// # #[tokio::main]
/// # async fn main() -> Result<(), Box<dyn std::error::Error>> {
/// let client = DripClient::devnet();
/// let payer  = Keypair::new();
/// let vault  = VaultKey {
///     token_a_mint: Pubkey::new_unique(),
///     token_b_mint: Pubkey::new_unique(),
///     proto_config: Pubkey::new_unique(),
/// };
/// let deposit = client.deposit(&payer, DepositParams {
///     vault, token_a_amount: 1_000_000, number_of_swaps: 10,
///     referrer: None, with_metadata: true,
/// }).await?;
/// println!("Position {} drips {} per period", deposit.position, deposit.periodic_drip_amount);
/// # Ok(())
/// # }
/// ```
pub struct DripClient {
    rpc_url:    String,
    program_id: Pubkey,
}

impl DripClient {
    /// Create a client pointing at any RPC endpoint.
    pub fn new(rpc_url: impl Into<String>) -> Self {
        Self { rpc_url: rpc_url.into(), program_id: DEFAULT_PROGRAM_ID }
    }

    pub fn devnet() -> Self {
        Self::new(DEVNET_RPC)
    }

    pub fn mainnet() -> Self {
        Self::new(MAINNET_RPC)
    }

    /// Override the program ID (locally deployed programs, forks).
    pub fn with_program_id(mut self, program_id: Pubkey) -> Self {
        self.program_id = program_id;
        self
    }

    pub fn program_id(&self) -> &Pubkey {
        &self.program_id
    }

    // ── Setup ─────────────────────────────────────────────────────────────────

    /// Create a proto config. Its keypair is generated here and returned by
    /// address only; the config is immutable once written.
    pub async fn create_proto_config(
        &self,
        payer:  &Keypair,
        params: CreateProtoConfigParams,
    ) -> Result<CreateProtoConfigResult> {
        // The program stores |granularity|; only zero is refused
        if params.granularity == 0 {
            return Err(Error::InvalidArgument("granularity must be non-zero".into()));
        }
        let rpc = self.rpc();
        let proto_config = Keypair::new();

        let ix = init_vault_proto_config_ix(
            &self.program_id,
            &payer.pubkey(),
            &proto_config.pubkey(),
            params.granularity,
            params.token_a_drip_trigger_spread,
            params.token_b_withdrawal_spread,
            params.token_b_referral_spread,
            &params.admin,
        );
        let sig = self.sign_and_send(&rpc, &[ix], payer, &[&proto_config]).await?;

        Ok(CreateProtoConfigResult { signature: sig.to_string(), proto_config: proto_config.pubkey() })
    }

    /// Create a vault and its period 0. `admin` must be the proto config's admin.
    pub async fn create_vault(
        &self,
        admin:  &Keypair,
        params: CreateVaultParams,
    ) -> Result<CreateVaultResult> {
        if params.whitelisted_swaps.len() > 5 {
            return Err(Error::InvalidArgument("at most 5 whitelisted swaps".into()));
        }
        let rpc = self.rpc();
        let key = params.vault;
        let (vault, _) = self.vault_address(&key);

        let ixs = [
            init_vault_ix(
                &self.program_id,
                &admin.pubkey(),
                &key.proto_config,
                &key.token_a_mint,
                &key.token_b_mint,
                &params.treasury_token_b,
                &params.whitelisted_swaps,
                params.max_slippage_bps,
                params.max_price_deviation_bps,
            ),
            init_vault_period_ix(&self.program_id, &admin.pubkey(), &vault, 0),
        ];
        let sig = self.sign_and_send(&rpc, &ixs, admin, &[]).await?;

        Ok(CreateVaultResult {
            signature:       sig.to_string(),
            vault,
            token_a_account: derive_ata(&vault, &key.token_a_mint),
            token_b_account: derive_ata(&vault, &key.token_b_mint),
        })
    }

    /// Create one vault period. Permissionless.
    pub async fn init_vault_period(
        &self,
        payer:     &Keypair,
        vault:     &Pubkey,
        period_id: u64,
    ) -> Result<String> {
        let rpc = self.rpc();
        let ix = init_vault_period_ix(&self.program_id, &payer.pubkey(), vault, period_id);
        Ok(self.sign_and_send(&rpc, &[ix], payer, &[]).await?.to_string())
    }

    // ── Positions ─────────────────────────────────────────────────────────────

    /// Open a position. The expiry period is created in the same transaction
    /// when it does not exist yet.
    pub async fn deposit(&self, payer: &Keypair, params: DepositParams) -> Result<DepositResult> {
        if params.number_of_swaps == 0 {
            return Err(Error::InvalidArgument("number_of_swaps must be positive".into()));
        }
        let periodic_drip_amount = params.token_a_amount / params.number_of_swaps;
        if periodic_drip_amount == 0 {
            return Err(Error::InvalidArgument(
                "deposit is smaller than number_of_swaps; periodic drip amount would be 0".into(),
            ));
        }

        let rpc = self.rpc();
        let (vault, vault_state) = self.fetch_vault_by_key(&rpc, &params.vault).await?;

        let expiry_period_id = vault_state
            .last_drip_period
            .checked_add(params.number_of_swaps)
            .ok_or(Error::MathOverflow)?;
        let (vault_period_end, _) = derive_vault_period(&vault, expiry_period_id, &self.program_id);

        let mut ixs = Vec::with_capacity(2);
        if !self.account_exists(&rpc, &vault_period_end).await {
            ixs.push(init_vault_period_ix(&self.program_id, &payer.pubkey(), &vault, expiry_period_id));
        }

        let position_mint = Keypair::new();
        let (position, _) = derive_position(&position_mint.pubkey(), &self.program_id);
        ixs.push(deposit_ix(
            &self.program_id,
            &DepositAccounts {
                depositor:     payer.pubkey(),
                vault,
                token_a_mint:  vault_state.token_a_mint,
                vault_period_end,
                position_mint: position_mint.pubkey(),
                referrer:      params.referrer,
            },
            params.token_a_amount,
            params.number_of_swaps,
            params.with_metadata,
        ));
        let sig = self.sign_and_send(&rpc, &ixs, payer, &[&position_mint]).await?;

        Ok(DepositResult {
            signature:     sig.to_string(),
            vault,
            position,
            position_mint: position_mint.pubkey(),
            periodic_drip_amount,
            expiry_period_id,
        })
    }

    /// Withdraw the token B a position has accrued. `payer` must hold the
    /// position token.
    pub async fn withdraw(&self, payer: &Keypair, position_mint: &Pubkey) -> Result<WithdrawResult> {
        let rpc = self.rpc();
        let ctx = self.withdrawal_context(&rpc, position_mint).await?;
        if ctx.quote.gross_token_b == 0 {
            return Err(Error::NothingToWithdraw(ctx.position));
        }

        let ix = withdraw_b_ix(&self.program_id, &ctx.accounts(payer.pubkey(), payer.pubkey(), *position_mint));
        let sig = self.sign_and_send(&rpc, &[ix], payer, &[]).await?;

        Ok(WithdrawResult { signature: sig.to_string(), position: ctx.position, quote: ctx.quote })
    }

    /// Close a position: pay out accrued token B, refund undripped token A,
    /// burn the position token and close its token account.
    pub async fn close_position(
        &self,
        payer:         &Keypair,
        position_mint: &Pubkey,
    ) -> Result<WithdrawResult> {
        self.close_position_for(payer, &payer.pubkey(), position_mint).await
    }

    /// Close `holder`'s position as the proto config admin. Payouts go to
    /// the holder's token accounts and the position token stays with them,
    /// marked closed.
    pub async fn admin_close_position(
        &self,
        admin:         &Keypair,
        holder:        &Pubkey,
        position_mint: &Pubkey,
    ) -> Result<WithdrawResult> {
        self.close_position_for(admin, holder, position_mint).await
    }

    async fn close_position_for(
        &self,
        signer:        &Keypair,
        holder:        &Pubkey,
        position_mint: &Pubkey,
    ) -> Result<WithdrawResult> {
        let rpc = self.rpc();
        let ctx = self.withdrawal_context(&rpc, position_mint).await?;

        let (vault_period_expiry, _) = derive_vault_period(
            &ctx.vault,
            ctx.position_state.expiry_period_id(),
            &self.program_id,
        );
        let ix = close_position_ix(
            &self.program_id,
            &ctx.accounts(signer.pubkey(), *holder, *position_mint),
            &vault_period_expiry,
        );
        let sig = self.sign_and_send(&rpc, &[ix], signer, &[]).await?;

        Ok(WithdrawResult { signature: sig.to_string(), position: ctx.position, quote: ctx.quote })
    }

    // ── Drip ──────────────────────────────────────────────────────────────────

    /// Trigger the vault's next drip through an SPL token-swap pool. The
    /// period being closed is created first when missing.
    pub async fn drip_spl_token_swap(
        &self,
        trigger:          &Keypair,
        vault:            &Pubkey,
        pool:             SplTokenSwapAccounts,
        drip_fee_token_a: &Pubkey,
    ) -> Result<DripResult> {
        let rpc = self.rpc();
        let vault_state = self.fetch_vault(&rpc, vault).await?;
        if vault_state.drip_amount == 0 {
            return Err(Error::InvalidArgument(format!("vault {vault} has nothing to drip")));
        }

        let last = vault_state.last_drip_period;
        let current = last.checked_add(1).ok_or(Error::MathOverflow)?;
        let (last_vault_period, _)    = derive_vault_period(vault, last, &self.program_id);
        let (current_vault_period, _) = derive_vault_period(vault, current, &self.program_id);

        let mut ixs = Vec::with_capacity(2);
        if !self.account_exists(&rpc, &current_vault_period).await {
            ixs.push(init_vault_period_ix(&self.program_id, &trigger.pubkey(), vault, current));
        }
        ixs.push(drip_spl_token_swap_ix(
            &self.program_id,
            &DripAccounts {
                trigger:          trigger.pubkey(),
                vault:            *vault,
                proto_config:     vault_state.proto_config,
                token_a_mint:     vault_state.token_a_mint,
                token_b_mint:     vault_state.token_b_mint,
                last_vault_period,
                current_vault_period,
                drip_fee_token_a: *drip_fee_token_a,
                oracle_config:    vault_state.oracle_config,
            },
            &pool,
        ));
        let sig = self.sign_and_send(&rpc, &ixs, trigger, &[]).await?;

        Ok(DripResult {
            signature:   sig.to_string(),
            vault:       *vault,
            period_id:   current,
            drip_amount: vault_state.drip_amount,
        })
    }

    // ── Read operations ───────────────────────────────────────────────────────

    /// Vault state, token balances and time to the next drip.
    pub async fn vault_info(&self, key: &VaultKey) -> Result<VaultInfo> {
        let rpc = self.rpc();
        let (address, state) = self.fetch_vault_by_key(&rpc, key).await?;

        let token_a_balance = parse_token_amount(&rpc.get_account_data(&state.token_a_account).await?)?;
        let token_b_balance = parse_token_amount(&rpc.get_account_data(&state.token_b_account).await?)?;
        let next_drip_in = (state.drip_activation_timestamp - unix_now()).max(0);

        Ok(VaultInfo { address, state, token_a_balance, token_b_balance, next_drip_in })
    }

    /// A position and what withdrawing it would pay right now.
    pub async fn position_info(&self, position_mint: &Pubkey) -> Result<PositionInfo> {
        let rpc = self.rpc();
        let (address, _) = derive_position(position_mint, &self.program_id);
        let state = parse_position(&rpc.get_account_data(&address).await?)?;
        let vault = self.fetch_vault(&rpc, &state.vault).await?;
        let proto = self.fetch_proto_config(&rpc, &vault.proto_config).await?;
        let quote = self.quote_inner(&rpc, &state, &vault, &proto).await?;
        Ok(PositionInfo { address, state, quote })
    }

    /// Quote a withdrawal for the position behind `position_mint`.
    pub async fn quote_withdrawal(&self, position_mint: &Pubkey) -> Result<WithdrawalQuote> {
        let rpc = self.rpc();
        Ok(self.withdrawal_context(&rpc, position_mint).await?.quote)
    }

    /// Every position of `vault`, open or closed, with quotes for the open ones.
    pub async fn vault_positions(&self, vault: &Pubkey) -> Result<Vec<PositionInfo>> {
        let rpc = self.rpc();
        let vault_state = self.fetch_vault(&rpc, vault).await?;
        let proto = self.fetch_proto_config(&rpc, &vault_state.proto_config).await?;

        let mut infos = Vec::new();
        for (address, state) in self.fetch_positions(&rpc, vault).await? {
            let quote = self.quote_inner(&rpc, &state, &vault_state, &proto).await?;
            infos.push(PositionInfo { address, state, quote });
        }
        Ok(infos)
    }

    pub async fn fetch_vault_period(&self, vault: &Pubkey, period_id: u64) -> Result<VaultPeriodState> {
        let rpc = self.rpc();
        self.fetch_period(&rpc, vault, period_id).await
    }

    // ── Private helpers ───────────────────────────────────────────────────────

    fn rpc(&self) -> RpcClient {
        RpcClient::new_with_commitment(self.rpc_url.clone(), CommitmentConfig::confirmed())
    }

    fn vault_address(&self, key: &VaultKey) -> (Pubkey, u8) {
        derive_vault(&key.token_a_mint, &key.token_b_mint, &key.proto_config, &self.program_id)
    }

    async fn sign_and_send(
        &self,
        rpc:          &RpcClient,
        instructions: &[Instruction],
        payer:        &Keypair,
        extra:        &[&Keypair],
    ) -> Result<Signature> {
        let blockhash = rpc.get_latest_blockhash().await?;
        let mut signers: Vec<&dyn Signer> = vec![payer];
        signers.extend(extra.iter().map(|k| k as &dyn Signer));
        let tx = Transaction::new_signed_with_payer(
            instructions,
            Some(&payer.pubkey()),
            &signers,
            blockhash,
        );
        Ok(rpc.send_and_confirm_transaction(&tx).await?)
    }

    async fn account_exists(&self, rpc: &RpcClient, address: &Pubkey) -> bool {
        rpc.get_account_data(address).await.is_ok()
    }

    async fn fetch_vault_by_key(&self, rpc: &RpcClient, key: &VaultKey) -> Result<(Pubkey, VaultState)> {
        let (vault, _) = self.vault_address(key);
        let data = rpc
            .get_account_data(&vault)
            .await
            .map_err(|_| Error::VaultNotFound(key.token_a_mint, key.token_b_mint))?;
        Ok((vault, parse_vault(&data)?))
    }

    async fn fetch_vault(&self, rpc: &RpcClient, vault: &Pubkey) -> Result<VaultState> {
        parse_vault(&rpc.get_account_data(vault).await?)
    }

    async fn fetch_proto_config(&self, rpc: &RpcClient, address: &Pubkey) -> Result<ProtoConfigState> {
        parse_proto_config(&rpc.get_account_data(address).await?)
    }

    async fn fetch_period(&self, rpc: &RpcClient, vault: &Pubkey, period_id: u64) -> Result<VaultPeriodState> {
        let (address, _) = derive_vault_period(vault, period_id, &self.program_id);
        let data = rpc
            .get_account_data(&address)
            .await
            .map_err(|_| Error::VaultPeriodMissing { vault: *vault, period_id })?;
        parse_vault_period(&data)
    }

    /// `None` for closed positions.
    async fn quote_inner(
        &self,
        rpc:      &RpcClient,
        position: &PositionState,
        vault:    &VaultState,
        proto:    &ProtoConfigState,
    ) -> Result<Option<WithdrawalQuote>> {
        if position.is_closed {
            return Ok(None);
        }
        let (i, j) = position.withdrawal_window(vault.last_drip_period);
        let period_i = self.fetch_period(rpc, &position.vault, i).await?;
        let period_j = self.fetch_period(rpc, &position.vault, j).await?;
        quote_withdrawal(position, proto, &period_i, &period_j).map(Some)
    }

    async fn withdrawal_context(&self, rpc: &RpcClient, position_mint: &Pubkey) -> Result<WithdrawalContext> {
        let (position, _) = derive_position(position_mint, &self.program_id);
        let position_state = parse_position(&rpc.get_account_data(&position).await?)?;
        if position_state.is_closed {
            return Err(Error::PositionClosed(position));
        }
        let vault = self.fetch_vault(rpc, &position_state.vault).await?;
        let proto = self.fetch_proto_config(rpc, &vault.proto_config).await?;
        let quote = self
            .quote_inner(rpc, &position_state, &vault, &proto)
            .await?
            .ok_or(Error::PositionClosed(position))?;

        Ok(WithdrawalContext {
            position,
            vault:           position_state.vault,
            vault_period_i:  derive_vault_period(&position_state.vault, quote.period_id_i, &self.program_id).0,
            vault_period_j:  derive_vault_period(&position_state.vault, quote.period_id_j, &self.program_id).0,
            position_state,
            vault_state:     vault,
            quote,
        })
    }

    /// Fetch all `Position` accounts of `vault` via `getProgramAccounts`.
    async fn fetch_positions(&self, rpc: &RpcClient, vault: &Pubkey) -> Result<Vec<(Pubkey, PositionState)>> {
        let config = RpcProgramAccountsConfig {
            filters: Some(vec![
                RpcFilterType::Memcmp(Memcmp::new(
                    0,
                    MemcmpEncodedBytes::Bytes(account_disc("Position").to_vec()),
                )),
                RpcFilterType::Memcmp(Memcmp::new(
                    POSITION_VAULT_OFFSET,
                    MemcmpEncodedBytes::Bytes(vault.to_bytes().to_vec()),
                )),
            ]),
            account_config: RpcAccountInfoConfig { ..Default::default() },
            ..Default::default()
        };

        let raw = rpc.get_program_accounts_with_config(&self.program_id, config).await?;

        Ok(raw
            .into_iter()
            .filter_map(|(pk, acc)| parse_position(&acc.data).ok().map(|p| (pk, p)))
            .collect())
    }
}

/// Everything `withdraw_b` and `close_position` need about one position.
struct WithdrawalContext {
    position:       Pubkey,
    vault:          Pubkey,
    vault_period_i: Pubkey,
    vault_period_j: Pubkey,
    position_state: PositionState,
    vault_state:    VaultState,
    quote:          WithdrawalQuote,
}

impl WithdrawalContext {
    fn accounts(&self, withdrawer: Pubkey, holder: Pubkey, position_mint: Pubkey) -> WithdrawAccounts {
        WithdrawAccounts {
            withdrawer,
            holder,
            vault:            self.vault,
            proto_config:     self.vault_state.proto_config,
            token_a_mint:     self.vault_state.token_a_mint,
            token_b_mint:     self.vault_state.token_b_mint,
            treasury_token_b: self.vault_state.treasury_token_b_account,
            position_mint,
            vault_period_i:   self.vault_period_i,
            vault_period_j:   self.vault_period_j,
            referrer:         self.position_state.referrer,
        }
    }
}

fn unix_now() -> i64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_secs() as i64)
        .unwrap_or_default()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn builder_overrides_program_id() {
        let program_id = Pubkey::new_unique();
        let client = DripClient::devnet().with_program_id(program_id);
        assert_eq!(client.program_id(), &program_id);
        assert_eq!(DripClient::mainnet().program_id(), &DEFAULT_PROGRAM_ID);
    }

    #[tokio::test]
    async fn deposit_rejects_zero_swaps_before_any_rpc_call() {
        let client = DripClient::new("http://127.0.0.1:1");
        let params = DepositParams {
            vault: VaultKey {
                token_a_mint: Pubkey::new_unique(),
                token_b_mint: Pubkey::new_unique(),
                proto_config: Pubkey::new_unique(),
            },
            token_a_amount:  1_000,
            number_of_swaps: 0,
            referrer:        None,
            with_metadata:   false,
        };
        let err = client.deposit(&Keypair::new(), params).await.unwrap_err();
        assert!(matches!(err, Error::InvalidArgument(_)));
    }

    #[tokio::test]
    async fn deposit_rejects_dust_amounts() {
        let client = DripClient::new("http://127.0.0.1:1");
        let params = DepositParams {
            vault: VaultKey {
                token_a_mint: Pubkey::new_unique(),
                token_b_mint: Pubkey::new_unique(),
                proto_config: Pubkey::new_unique(),
            },
            token_a_amount:  3,
            number_of_swaps: 4,
            referrer:        None,
            with_metadata:   false,
        };
        let err = client.deposit(&Keypair::new(), params).await.unwrap_err();
        assert!(matches!(err, Error::InvalidArgument(_)));
    }

    #[tokio::test]
    async fn proto_config_refuses_only_zero_granularity() {
        let client = DripClient::new("http://127.0.0.1:1");
        let params = |granularity| CreateProtoConfigParams {
            granularity,
            token_a_drip_trigger_spread: 10,
            token_b_withdrawal_spread:   10,
            token_b_referral_spread:     10,
            admin:                       Pubkey::new_unique(),
        };
        let payer = Keypair::new();

        let zero = client.create_proto_config(&payer, params(0)).await.unwrap_err();
        assert!(matches!(zero, Error::InvalidArgument(_)));

        // A negative period length is stored as its absolute value, so it
        // reaches the network instead of failing locally
        let negative = client.create_proto_config(&payer, params(-60)).await.unwrap_err();
        assert!(matches!(negative, Error::Rpc(_)));
    }

    #[tokio::test]
    async fn missing_vault_is_reported_by_mints() {
        let client = DripClient::new("http://127.0.0.1:1");
        let key = VaultKey {
            token_a_mint: Pubkey::new_unique(),
            token_b_mint: Pubkey::new_unique(),
            proto_config: Pubkey::new_unique(),
        };
        match client.vault_info(&key).await {
            Err(Error::VaultNotFound(a, b)) => {
                assert_eq!((a, b), (key.token_a_mint, key.token_b_mint));
            }
            other => panic!("expected VaultNotFound, got {other:?}"),
        }
    }
}
