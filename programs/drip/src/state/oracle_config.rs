use anchor_lang::prelude::*;
use pyth_sdk_solana::state::{load_price_account, PriceStatus, SolanaPriceAccount};
use crate::{constants::*, error::DripError};

// ─── OracleConfig ─────────────────────────────────────────────────────────────
// External price reference a vault can opt into. Only `update_authority`
// may change it.
#[account]
#[derive(Default)]
pub struct OracleConfig {
    pub enabled: bool,             // 1
    /// 0 = Pyth
    pub source: u8,                // 1
    pub update_authority: Pubkey,  // 32
    pub token_a_mint: Pubkey,      // 32
    pub token_a_price: Pubkey,     // 32
    pub token_b_mint: Pubkey,      // 32
    pub token_b_price: Pubkey,     // 32
}

impl OracleConfig {
    // 8 discriminator + 1+1+32*5 = 170
    pub const LEN: usize = 170;

    #[allow(clippy::too_many_arguments)]
    pub fn set(
        &mut self,
        enabled: bool,
        source: u8,
        update_authority: Pubkey,
        token_a_mint: Pubkey,
        token_a_price: Pubkey,
        token_b_mint: Pubkey,
        token_b_price: Pubkey,
    ) -> Result<()> {
        require!(source == ORACLE_SOURCE_PYTH, DripError::InvalidOracleSource);
        self.enabled = enabled;
        self.source = source;
        self.update_authority = update_authority;
        self.token_a_mint = token_a_mint;
        self.token_a_price = token_a_price;
        self.token_b_mint = token_b_mint;
        self.token_b_price = token_b_price;
        Ok(())
    }
}

// ─── Pyth price records ───────────────────────────────────────────────────────

/// Aggregate price published by an external oracle account.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PriceRecord {
    pub price: i64,
    pub confidence: u64,
    pub exponent: i32,
    pub product: Pubkey,
    pub trading: bool,
}

impl PriceRecord {
    pub fn decode(data: &[u8]) -> Result<Self> {
        let account: &SolanaPriceAccount =
            load_price_account(data).map_err(|_| error!(DripError::InvalidOracleAccount))?;
        Ok(Self {
            price: account.agg.price,
            confidence: account.agg.conf,
            exponent: account.expo,
            product: Pubkey::new_from_array(account.prod.to_bytes()),
            trading: account.agg.status == PriceStatus::Trading,
        })
    }

    /// Decode an account and require a live aggregate price.
    pub fn load(account: &AccountInfo) -> Result<Self> {
        let record = Self::decode(&account.try_borrow_data()?)?;
        require!(record.trading, DripError::OracleIsOffline);
        Ok(record)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use anchor_lang::error::Error;

    // Pyth v2 price account: header, then the aggregate at byte 208
    fn price_account(status: u32) -> Vec<u8> {
        let mut data = vec![0u8; 3_312];
        data[0..4].copy_from_slice(&0xa1b2_c3d4u32.to_le_bytes());
        data[4..8].copy_from_slice(&2u32.to_le_bytes());
        data[8..12].copy_from_slice(&3u32.to_le_bytes());
        data[20..24].copy_from_slice(&(-8i32).to_le_bytes());
        data[112..144].copy_from_slice(&[7u8; 32]);
        data[208..216].copy_from_slice(&2_512_345_678i64.to_le_bytes());
        data[216..224].copy_from_slice(&1_000u64.to_le_bytes());
        data[224..228].copy_from_slice(&status.to_le_bytes());
        data
    }

    #[test]
    fn decodes_aggregate_price() {
        let record = PriceRecord::decode(&price_account(1)).unwrap();
        assert_eq!(record.price, 2_512_345_678);
        assert_eq!(record.confidence, 1_000);
        assert_eq!(record.exponent, -8);
        assert_eq!(record.product, Pubkey::new_from_array([7u8; 32]));
        assert!(record.trading);
    }

    #[test]
    fn halted_price_is_not_trading() {
        let record = PriceRecord::decode(&price_account(0)).unwrap();
        assert!(!record.trading);
    }

    #[test]
    fn rejects_foreign_accounts() {
        let expected = Error::from(DripError::InvalidOracleAccount);

        assert_eq!(PriceRecord::decode(&[0u8; 64]).unwrap_err(), expected);

        let mut wrong_magic = price_account(1);
        wrong_magic[0] = 0;
        assert_eq!(PriceRecord::decode(&wrong_magic).unwrap_err(), expected);

        let mut product_account = price_account(1);
        product_account[8] = 2;
        assert_eq!(PriceRecord::decode(&product_account).unwrap_err(), expected);
    }

    #[test]
    fn only_pyth_source_is_accepted() {
        let mut config = OracleConfig::default();
        let key = Pubkey::new_unique();
        let err = config.set(true, 1, key, key, key, key, key).unwrap_err();
        assert_eq!(err, Error::from(DripError::InvalidOracleSource));

        config.set(true, ORACLE_SOURCE_PYTH, key, key, key, key, key).unwrap();
        assert!(config.enabled);
    }
}
