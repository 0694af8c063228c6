#![allow(ambiguous_glob_reexports)]

pub mod drip_math;
pub mod venue;
pub mod drip_common;
pub mod settlement;
pub mod vault_admin;

pub mod init_vault_proto_config;
pub mod init_vault;
pub mod init_vault_period;
pub mod init_oracle_config;
pub mod update_oracle_config;
pub mod deposit;
pub mod deposit_with_metadata;
pub mod drip_spl_token_swap;
pub mod drip_orca_whirlpool;
pub mod withdraw_b;
pub mod close_position;
pub mod set_vault_swap_whitelist;
pub mod set_vault_max_slippage_bps;
pub mod set_vault_max_price_deviation_bps;
pub mod set_vault_oracle_config;
pub mod admin_withdraw;
pub mod close_vault;
pub mod close_vault_period;
pub mod close_vault_proto_config;

pub use drip_common::*;
pub use settlement::*;
pub use vault_admin::*;

pub use init_vault_proto_config::*;
pub use init_vault::*;
pub use init_vault_period::*;
pub use init_oracle_config::*;
pub use update_oracle_config::*;
pub use deposit::*;
pub use deposit_with_metadata::*;
pub use drip_spl_token_swap::*;
pub use drip_orca_whirlpool::*;
pub use withdraw_b::*;
pub use close_position::*;
pub use set_vault_swap_whitelist::*;
pub use set_vault_max_slippage_bps::*;
pub use set_vault_max_price_deviation_bps::*;
pub use set_vault_oracle_config::*;
pub use admin_withdraw::*;
pub use close_vault::*;
pub use close_vault_period::*;
pub use close_vault_proto_config::*;
