use std::str::FromStr;

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::types::{AccountId, TransactionId};

/// A transaction submitted for batch processing.
///
/// Only the `id` is required. The remaining fields are carried as submitted and are
/// never mutated here; the upstream system owns the authoritative status.
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct Transaction {
    /// Identifier of the record in the upstream system.
    pub id: TransactionId,
    /// Owning account, if known.
    #[serde(default)]
    pub account_id: Option<AccountId>,
    /// Signed amount. Absent amounts stay absent; they only count as zero when summed.
    #[serde(default)]
    pub amount: Option<Decimal>,
    /// `deposit`, `withdrawal`, or any other value passed through as-is.
    #[serde(rename = "type", default)]
    pub transaction_type: Option<String>,
    /// `pending`, `completed`, `failed`, or any other value passed through as-is.
    #[serde(default)]
    pub status: Option<String>,
    #[serde(default)]
    pub description: Option<String>
}

#[cfg(test)]
impl Transaction {
    pub fn new(id: impl Into<TransactionId>) -> Self {
        Self {
            id: id.into(),
            account_id: None,
            amount: None,
            transaction_type: None,
            status: None,
            description: None
        }
    }
}

/// A raw record as returned by the upstream `GET /transactions` listing.
///
/// No field is enforced: missing keys deserialize to `None` and unknown keys are ignored.
/// The amount stays a plain float so that one out-of-range value cannot spoil the whole
/// listing; it only has to fit a `Decimal` once it is actually summed.
#[derive(Debug, Clone, Default, PartialEq, Deserialize, Serialize)]
#[serde(default)]
pub struct TransactionView {
    pub id: Option<TransactionId>,
    pub account_id: Option<AccountId>,
    pub amount: Option<f64>,
    #[serde(rename = "type")]
    pub transaction_type: Option<String>,
    pub status: Option<String>,
    pub description: Option<String>
}

impl TransactionView {
    /// The amount as money, with a missing amount counting as zero.
    ///
    /// Returns `None` when the upstream value does not fit a `Decimal`.
    pub fn amount_or_zero(&self) -> Option<Decimal> {
        match self.amount {
            None => Some(Decimal::ZERO),
            Some(amount) => Decimal::from_str(&amount.to_string()).ok()
        }
    }
}
