//! On-chain account deserialization.
//!
//! Parses raw account bytes for every Drip account type.  Fields are read in
//! Borsh order after the 8-byte Anchor discriminator; `Option<Pubkey>` fields
//! take 1 byte when `None` and 33 when `Some`, so `Vault` and `Position` are
//! read with a cursor rather than fixed offsets.

use serde::Serialize;
use solana_sdk::{hash::hash, pubkey::Pubkey};

use crate::error::{Error, Result};

/// Anchor account discriminator: `sha256("account:{TypeName}")[..8]`.
pub fn account_disc(type_name: &str) -> [u8; 8] {
    let h = hash(format!("account:{type_name}").as_bytes());
    let mut out = [0u8; 8];
    out.copy_from_slice(&h.to_bytes()[..8]);
    out
}

// ─── VaultProtoConfig ─────────────────────────────────────────────────────────

/// Layout: `granularity(8) trigger_spread(2) withdrawal_spread(2)
/// referral_spread(2) admin(32)` = 54 bytes with the discriminator.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ProtoConfigState {
    pub granularity:                 u64,
    pub token_a_drip_trigger_spread: u16,
    pub token_b_withdrawal_spread:   u16,
    pub token_b_referral_spread:     u16,
    pub admin:                       Pubkey,
}

pub fn parse_proto_config(data: &[u8]) -> Result<ProtoConfigState> {
    let mut r = Reader::account(data, "VaultProtoConfig")?;
    Ok(ProtoConfigState {
        granularity:                 r.u64()?,
        token_a_drip_trigger_spread: r.u16()?,
        token_b_withdrawal_spread:   r.u16()?,
        token_b_referral_spread:     r.u16()?,
        admin:                       r.pubkey()?,
    })
}

// ─── Vault ────────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct VaultState {
    pub proto_config:             Pubkey,
    pub token_a_mint:             Pubkey,
    pub token_b_mint:             Pubkey,
    pub token_a_account:          Pubkey,
    pub token_b_account:          Pubkey,
    pub treasury_token_b_account: Pubkey,
    pub oracle_config:            Option<Pubkey>,
    /// Filled whitelist slots only
    pub whitelisted_swaps:        Vec<Pubkey>,
    pub limit_swaps:              bool,
    pub max_slippage_bps:         u16,
    pub max_price_deviation_bps:  u16,
    pub last_drip_period:         u64,
    pub drip_amount:              u64,
    pub drip_activation_timestamp: i64,
}

pub fn parse_vault(data: &[u8]) -> Result<VaultState> {
    let mut r = Reader::account(data, "Vault")?;
    let proto_config             = r.pubkey()?;
    let token_a_mint             = r.pubkey()?;
    let token_b_mint             = r.pubkey()?;
    let token_a_account          = r.pubkey()?;
    let token_b_account          = r.pubkey()?;
    let treasury_token_b_account = r.pubkey()?;
    let oracle_config            = r.option_pubkey()?;
    let mut whitelisted_swaps = Vec::new();
    for _ in 0..5 {
        if let Some(swap) = r.option_pubkey()? {
            whitelisted_swaps.push(swap);
        }
    }
    Ok(VaultState {
        proto_config,
        token_a_mint,
        token_b_mint,
        token_a_account,
        token_b_account,
        treasury_token_b_account,
        oracle_config,
        whitelisted_swaps,
        limit_swaps:               r.bool()?,
        max_slippage_bps:          r.u16()?,
        max_price_deviation_bps:   r.u16()?,
        last_drip_period:          r.u64()?,
        drip_amount:               r.u64()?,
        drip_activation_timestamp: r.i64()?,
    })
}

// ─── VaultPeriod ──────────────────────────────────────────────────────────────

/// Layout: `vault(32) period_id(8) dar(8) twap(16) drip_timestamp(8) bump(1)`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct VaultPeriodState {
    pub vault:          Pubkey,
    pub period_id:      u64,
    pub dar:            u64,
    /// Cumulative Q64.64 price sum up to this period
    pub twap:           u128,
    /// Zero until the period has been dripped
    pub drip_timestamp: i64,
}

pub fn parse_vault_period(data: &[u8]) -> Result<VaultPeriodState> {
    let mut r = Reader::account(data, "VaultPeriod")?;
    Ok(VaultPeriodState {
        vault:          r.pubkey()?,
        period_id:      r.u64()?,
        dar:            r.u64()?,
        twap:           r.u128()?,
        drip_timestamp: r.i64()?,
    })
}

// ─── Position ─────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PositionState {
    pub vault:                         Pubkey,
    /// Mint of the position token
    pub position_authority:            Pubkey,
    pub referrer:                      Option<Pubkey>,
    pub deposited_token_a_amount:      u64,
    pub withdrawn_token_b_amount:      u64,
    pub deposit_timestamp:             i64,
    pub drip_period_id_before_deposit: u64,
    pub number_of_swaps:               u64,
    pub periodic_drip_amount:          u64,
    pub is_closed:                     bool,
}

impl PositionState {
    pub fn expiry_period_id(&self) -> u64 {
        self.drip_period_id_before_deposit.saturating_add(self.number_of_swaps)
    }

    /// `(i, j)` period ids a withdrawal must use given the vault's last drip.
    pub fn withdrawal_window(&self, last_drip_period: u64) -> (u64, u64) {
        (
            self.drip_period_id_before_deposit,
            self.expiry_period_id().min(last_drip_period),
        )
    }
}

pub fn parse_position(data: &[u8]) -> Result<PositionState> {
    let mut r = Reader::account(data, "Position")?;
    Ok(PositionState {
        vault:                         r.pubkey()?,
        position_authority:            r.pubkey()?,
        referrer:                      r.option_pubkey()?,
        deposited_token_a_amount:      r.u64()?,
        withdrawn_token_b_amount:      r.u64()?,
        deposit_timestamp:             r.i64()?,
        drip_period_id_before_deposit: r.u64()?,
        number_of_swaps:               r.u64()?,
        periodic_drip_amount:          r.u64()?,
        is_closed:                     r.bool()?,
    })
}

// ─── OracleConfig ─────────────────────────────────────────────────────────────

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct OracleConfigState {
    pub enabled:          bool,
    pub source:           u8,
    pub update_authority: Pubkey,
    pub token_a_mint:     Pubkey,
    pub token_a_price:    Pubkey,
    pub token_b_mint:     Pubkey,
    pub token_b_price:    Pubkey,
}

pub fn parse_oracle_config(data: &[u8]) -> Result<OracleConfigState> {
    let mut r = Reader::account(data, "OracleConfig")?;
    Ok(OracleConfigState {
        enabled:          r.bool()?,
        source:           r.u8()?,
        update_authority: r.pubkey()?,
        token_a_mint:     r.pubkey()?,
        token_a_price:    r.pubkey()?,
        token_b_mint:     r.pubkey()?,
        token_b_price:    r.pubkey()?,
    })
}

// ─── SPL token account ────────────────────────────────────────────────────────

/// Read the `amount` field from a packed SPL token account.
///
/// Token account layout: `mint(32) owner(32) amount(8) …`
pub fn parse_token_amount(data: &[u8]) -> Result<u64> {
    if data.len() < 72 {
        return Err(Error::ParseError {
            offset: 64,
            reason: format!("Token account is {} bytes; need at least 72", data.len()),
        });
    }
    let mut r = Reader { data, offset: 64 };
    r.u64()
}

// ─── Byte-slice cursor ────────────────────────────────────────────────────────

pub(crate) struct Reader<'a> {
    data:   &'a [u8],
    offset: usize,
}

impl<'a> Reader<'a> {
    /// Check the Anchor discriminator and position the cursor after it.
    fn account(data: &'a [u8], type_name: &str) -> Result<Self> {
        if data.len() < 8 || data[..8] != account_disc(type_name) {
            return Err(Error::ParseError {
                offset: 0,
                reason: format!("not a {type_name} account"),
            });
        }
        Ok(Self { data, offset: 8 })
    }

    fn take<const N: usize>(&mut self) -> Result<[u8; N]> {
        let offset = self.offset;
        let b: [u8; N] = self
            .data
            .get(offset..offset + N)
            .and_then(|s| s.try_into().ok())
            .ok_or_else(|| Error::ParseError {
                offset,
                reason: format!("slice too short for {N} bytes"),
            })?;
        self.offset += N;
        Ok(b)
    }

    fn u8(&mut self) -> Result<u8> {
        Ok(self.take::<1>()?[0])
    }

    fn bool(&mut self) -> Result<bool> {
        Ok(self.u8()? != 0)
    }

    fn u16(&mut self) -> Result<u16> {
        Ok(u16::from_le_bytes(self.take()?))
    }

    fn u64(&mut self) -> Result<u64> {
        Ok(u64::from_le_bytes(self.take()?))
    }

    fn i64(&mut self) -> Result<i64> {
        Ok(i64::from_le_bytes(self.take()?))
    }

    fn u128(&mut self) -> Result<u128> {
        Ok(u128::from_le_bytes(self.take()?))
    }

    fn pubkey(&mut self) -> Result<Pubkey> {
        Ok(Pubkey::from(self.take::<32>()?))
    }

    fn option_pubkey(&mut self) -> Result<Option<Pubkey>> {
        let offset = self.offset;
        match self.u8()? {
            0 => Ok(None),
            1 => Ok(Some(self.pubkey()?)),
            tag => Err(Error::ParseError { offset, reason: format!("invalid Option tag {tag}") }),
        }
    }
}
