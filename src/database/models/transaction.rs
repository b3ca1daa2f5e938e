use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

/// Ledger row written by the checkout and payment flows. Admin aggregation
/// routes read these; nothing in this service mutates a completed row.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct Transaction {
    pub id: Uuid,
    /// NULL amounts exist in legacy rows; aggregation treats them as zero.
    pub amount: Option<Decimal>,
    /// "income" or "expense".
    pub kind: String,
    pub status: String,
    pub category: String,
    pub payment_intent_id: Option<String>,
    pub profile_id: Option<Uuid>,
    pub created_at: DateTime<Utc>,
}

impl Transaction {
    pub fn amount_or_zero(&self) -> Decimal {
        self.amount.unwrap_or(Decimal::ZERO)
    }

    /// Income counts positive, expense negative. Unknown kinds contribute
    /// nothing, mirroring how the admin reports ignore them.
    pub fn signed_amount(&self) -> Decimal {
        match self.kind.as_str() {
            "income" => self.amount_or_zero(),
            "expense" => -self.amount_or_zero(),
            _ => Decimal::ZERO,
        }
    }

    pub fn is_completed(&self) -> bool {
        self.status == "completed"
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn row(amount: Option<Decimal>, kind: &str) -> Transaction {
        Transaction {
            id: Uuid::new_v4(),
            amount,
            kind: kind.to_string(),
            status: "completed".to_string(),
            category: "store".to_string(),
            payment_intent_id: None,
            profile_id: None,
            created_at: Utc::now(),
        }
    }

    #[test]
    fn missing_amount_counts_as_zero() {
        assert_eq!(row(None, "income").amount_or_zero(), Decimal::ZERO);
        assert_eq!(row(None, "expense").signed_amount(), Decimal::ZERO);
    }

    #[test]
    fn expense_is_negative_income_positive() {
        assert_eq!(row(Some(Decimal::from(200)), "expense").signed_amount(), Decimal::from(-200));
        assert_eq!(row(Some(Decimal::from(500)), "income").signed_amount(), Decimal::from(500));
        assert_eq!(row(Some(Decimal::from(7)), "transfer").signed_amount(), Decimal::ZERO);
    }
}
