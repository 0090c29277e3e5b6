// src/models/finance.rs

use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use validator::Validate;

use crate::common::{
    error::AppError,
    money::amount_overflow,
    validation::{non_negative_amount, not_blank, positive_amount},
};

// ==========================================
// Client sub-ledger
// ==========================================

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ClientFinance {
    pub id: i64,
    #[schema(example = "Acme S.A.C.")]
    pub client: String,
    #[schema(example = "1000.00")]
    pub total: Decimal,
    #[schema(example = "500.00")]
    pub advance: Decimal,
    #[schema(example = "0.00")]
    pub paid: Decimal,
    pub date: NaiveDate,
    /// `total - advance - paid`, computed on read.
    #[schema(read_only, example = "500.00")]
    pub balance: Decimal,
}

impl ClientFinance {
    /// `None` when the stored amounts are too far apart to subtract.
    pub fn compute_balance(total: Decimal, advance: Decimal, paid: Decimal) -> Option<Decimal> {
        total.checked_sub(advance)?.checked_sub(paid)
    }

    pub fn bucket(&self) -> BalanceBucket {
        if self.balance <= Decimal::ZERO {
            BalanceBucket::PaidOff
        } else if self.advance > Decimal::ZERO {
            BalanceBucket::AdvancePending
        } else {
            BalanceBucket::FullyPending
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub enum BalanceBucket {
    PaidOff,
    AdvancePending,
    FullyPending,
}

/// Every row lands in exactly one bucket.
#[derive(Debug, Clone, Default, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct BalanceBuckets {
    pub paid_off: Vec<ClientFinance>,
    pub advance_pending: Vec<ClientFinance>,
    pub fully_pending: Vec<ClientFinance>,
}

impl BalanceBuckets {
    pub fn partition(rows: Vec<ClientFinance>) -> Self {
        let mut buckets = Self::default();
        for row in rows {
            match row.bucket() {
                BalanceBucket::PaidOff => buckets.paid_off.push(row),
                BalanceBucket::AdvancePending => buckets.advance_pending.push(row),
                BalanceBucket::FullyPending => buckets.fully_pending.push(row),
            }
        }
        buckets
    }

    pub fn len(&self) -> usize {
        self.paid_off.len() + self.advance_pending.len() + self.fully_pending.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

#[derive(Debug, Clone, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct NewClientFinance {
    #[validate(custom(function = "not_blank"))]
    pub client: String,

    #[validate(custom(function = "non_negative_amount"))]
    pub total: Decimal,

    #[serde(default)]
    #[validate(custom(function = "non_negative_amount"))]
    pub advance: Decimal,

    #[serde(default)]
    #[validate(custom(function = "non_negative_amount"))]
    pub paid: Decimal,

    pub date: Option<NaiveDate>,
}

#[derive(Debug, Clone, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct RecordPaymentPayload {
    #[validate(custom(function = "non_negative_amount"))]
    pub advance: Decimal,

    #[validate(custom(function = "non_negative_amount"))]
    pub paid: Decimal,
}

// ==========================================
// Company ledger
// ==========================================

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type, ToSchema)]
#[sqlx(rename_all = "lowercase")]
#[serde(rename_all = "lowercase")]
pub enum MovementKind {
    Income,
    Expense,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct Movement {
    pub id: i64,
    pub kind: MovementKind,
    #[schema(example = "Pago de cliente Acme")]
    pub description: String,
    #[schema(example = "1500.00")]
    pub monto: Decimal,
    pub date: NaiveDate,
}

#[derive(Debug, Clone, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct NewMovement {
    pub kind: MovementKind,

    #[validate(custom(function = "not_blank"))]
    pub description: String,

    #[validate(custom(function = "positive_amount"))]
    pub monto: Decimal,

    pub date: Option<NaiveDate>,
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct MovementWithBalance {
    #[serde(flatten)]
    pub movement: Movement,
    /// Running balance after this movement.
    pub balance: Decimal,
}

impl MovementWithBalance {
    /// Expects movements already in ledger order (date, then id).
    pub fn running(movements: Vec<Movement>) -> Result<Vec<Self>, AppError> {
        let mut balance = Decimal::ZERO;
        movements
            .into_iter()
            .map(|movement| -> Result<Self, AppError> {
                balance = match movement.kind {
                    MovementKind::Income => balance.checked_add(movement.monto),
                    MovementKind::Expense => balance.checked_sub(movement.monto),
                }
                .ok_or_else(|| amount_overflow("balance"))?;
                Ok(Self { movement, balance })
            })
            .collect()
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct LedgerSummary {
    pub income: Decimal,
    pub expense: Decimal,
    pub net: Decimal,
}

impl LedgerSummary {
    pub fn from_movements<'a>(
        movements: impl IntoIterator<Item = &'a Movement>,
    ) -> Result<Self, AppError> {
        let (income, expense) = movements.into_iter().try_fold(
            (Decimal::ZERO, Decimal::ZERO),
            |(income, expense), m| match m.kind {
                MovementKind::Income => Some((income.checked_add(m.monto)?, expense)),
                MovementKind::Expense => Some((income, expense.checked_add(m.monto)?)),
            },
        )
        .ok_or_else(|| amount_overflow("monto"))?;

        let net = income.checked_sub(expense).ok_or_else(|| amount_overflow("monto"))?;
        Ok(Self { income, expense, net })
    }
}
