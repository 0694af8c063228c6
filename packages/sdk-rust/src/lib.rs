//! Drip Rust SDK
//!
//! Client for Drip dollar-cost-averaging vaults on Solana. Deposit token A,
//! let keepers swap a slice of it into token B every period, and withdraw
//! the accrued token B whenever you like. No Anchor dependency required.
//!
//! # Quick Start
//!
//! ```rust,no_run
//! use drip_sdk::{DepositParams, DripClient, VaultKey};
//! use solana_sdk::{pubkey::Pubkey, signature::Keypair};
//! use std::str::FromStr;
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let client = DripClient::devnet();
//!     let keypair = Keypair::new(); // a funded wallet
//!
//!     let vault = VaultKey {
//!         token_a_mint: Pubkey::from_str("EPjFWdd5AufqSSqeM2qN1xzybapC8G4wEGGkZwyTDt1v")?,
//!         token_b_mint: Pubkey::from_str("So11111111111111111111111111111111111111112")?,
//!         proto_config: Pubkey::new_unique(), // the deployment's proto config
//!     };
//!
//!     // 1. Spread 100 USDC over 10 periods
//!     let deposit = client.deposit(&keypair, DepositParams {
//!         vault,
//!         token_a_amount:  100_000_000,
//!         number_of_swaps: 10,
//!         referrer:        None,
//!         with_metadata:   true,
//!     }).await?;
//!
//!     // 2. Later: check what has accrued, then withdraw it
//!     let quote = client.quote_withdrawal(&deposit.position_mint).await?;
//!     println!("Withdrawable: {} at avg price {:.4}", quote.user_token_b, quote.average_price);
//!     let result = client.withdraw(&keypair, &deposit.position_mint).await?;
//!     println!("Withdrew! tx: {}", result.signature);
//!
//!     Ok(())
//! }
//! ```
//!
//! # Feature Overview
//!
//! | Method | Description |
//! |--------|-------------|
//! | [`DripClient::create_proto_config`] | Period length and spreads shared by vaults |
//! | [`DripClient::create_vault`] | Vault for a mint pair, with period 0 |
//! | [`DripClient::init_vault_period`] | Create one vault period |
//! | [`DripClient::deposit`] | Open a position, receive the position token |
//! | [`DripClient::drip_spl_token_swap`] | Keeper: swap one period's slice |
//! | [`DripClient::withdraw`] | Withdraw accrued token B |
//! | [`DripClient::close_position`] | Withdraw, refund token A, burn the position token |
//! | [`DripClient::admin_close_position`] | Close a holder's position as the proto config admin |
//! | [`DripClient::quote_withdrawal`] | Off-chain withdrawal and fee breakdown |
//! | [`DripClient::vault_info`] | Vault state, balances, next drip time |
//! | [`DripClient::vault_positions`] | All positions of a vault |
//!
//! Admin and oracle instructions are available as builders in
//! [`instructions`].

pub mod client;
pub mod error;
pub mod instructions;
pub mod math;
pub mod state;
pub mod types;

pub use client::DripClient;
pub use error::{Error, Result};
pub use types::*;
