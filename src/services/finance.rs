use std::collections::BTreeMap;

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::Serialize;
use sqlx::PgPool;

use crate::database::models::Transaction;

/// Scalar cashflow report over a set of completed transactions.
#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
pub struct CashflowTotals {
    pub income: Decimal,
    pub expense: Decimal,
    pub profit: Decimal,
}

/// Loads completed transactions, optionally bounded to `[from, to)`.
///
/// Status filtering happens here, in the query: the aggregation functions
/// below assume their input is already the exact row set to sum.
pub async fn completed_between(
    pool: &PgPool,
    from: Option<DateTime<Utc>>,
    to: Option<DateTime<Utc>>,
) -> Result<Vec<Transaction>, sqlx::Error> {
    sqlx::query_as::<_, Transaction>(
        "SELECT id, amount, kind, status, category, payment_intent_id, profile_id, created_at \
         FROM transactions \
         WHERE status = 'completed' \
           AND ($1::timestamptz IS NULL OR created_at >= $1) \
           AND ($2::timestamptz IS NULL OR created_at < $2) \
         ORDER BY created_at",
    )
    .bind(from)
    .bind(to)
    .fetch_all(pool)
    .await
}

/// Loads completed income transactions for the revenue report.
pub async fn completed_income(pool: &PgPool) -> Result<Vec<Transaction>, sqlx::Error> {
    sqlx::query_as::<_, Transaction>(
        "SELECT id, amount, kind, status, category, payment_intent_id, profile_id, created_at \
         FROM transactions \
         WHERE status = 'completed' AND kind = 'income' \
         ORDER BY created_at",
    )
    .fetch_all(pool)
    .await
}

/// Single linear pass over the given rows. Profit is income minus expense;
/// an empty slice yields all zeros.
pub fn totals(rows: &[Transaction]) -> CashflowTotals {
    let mut income = Decimal::ZERO;
    let mut expense = Decimal::ZERO;

    for row in rows {
        match row.kind.as_str() {
            "income" => income += row.amount_or_zero(),
            "expense" => expense += row.amount_or_zero(),
            _ => {}
        }
    }

    CashflowTotals {
        income,
        expense,
        profit: income - expense,
    }
}

/// Net signed amount per key, initialized to zero on first sight. A sorted
/// map keeps the rendered report stable without a second sort downstream.
pub fn net_by_key<F>(rows: &[Transaction], key: F) -> BTreeMap<String, Decimal>
where
    F: Fn(&Transaction) -> String,
{
    let mut grouped = BTreeMap::new();
    for row in rows {
        *grouped.entry(key(row)).or_insert(Decimal::ZERO) += row.signed_amount();
    }
    grouped
}

pub fn day_key(row: &Transaction) -> String {
    row.created_at.date_naive().to_string()
}

pub fn category_key(row: &Transaction) -> String {
    row.category.clone()
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;
    use uuid::Uuid;

    fn row(amount: i64, kind: &str, status: &str, category: &str, day: u32) -> Transaction {
        Transaction {
            id: Uuid::new_v4(),
            amount: Some(Decimal::from(amount)),
            kind: kind.to_string(),
            status: status.to_string(),
            category: category.to_string(),
            payment_intent_id: None,
            profile_id: None,
            created_at: Utc.with_ymd_and_hms(2026, 3, day, 12, 0, 0).unwrap(),
        }
    }

    #[test]
    fn profit_excludes_rows_filtered_out_upstream() {
        let all = vec![
            row(500, "income", "completed", "store", 1),
            row(200, "expense", "completed", "parts", 1),
            row(100, "expense", "pending", "parts", 2),
        ];

        // Filtering is the query's job; simulate it before aggregating.
        let completed: Vec<_> = all.into_iter().filter(Transaction::is_completed).collect();
        let report = totals(&completed);

        assert_eq!(report.income, Decimal::from(500));
        assert_eq!(report.expense, Decimal::from(200));
        assert_eq!(report.profit, Decimal::from(300));
    }

    #[test]
    fn empty_rows_yield_zero_totals_and_empty_mapping() {
        let report = totals(&[]);
        assert_eq!(report.income, Decimal::ZERO);
        assert_eq!(report.expense, Decimal::ZERO);
        assert_eq!(report.profit, Decimal::ZERO);
        assert!(net_by_key(&[], day_key).is_empty());
        assert!(net_by_key(&[], category_key).is_empty());
    }

    #[test]
    fn grouped_sums_equal_ungrouped_total() {
        let rows = vec![
            row(500, "income", "completed", "store", 1),
            row(120, "income", "completed", "repairs", 1),
            row(200, "expense", "completed", "parts", 2),
            row(30, "expense", "completed", "store", 3),
        ];

        let net = totals(&rows).profit;
        for grouped in [net_by_key(&rows, day_key), net_by_key(&rows, category_key)] {
            let sum: Decimal = grouped.values().copied().sum();
            assert_eq!(sum, net);
        }
    }

    #[test]
    fn missing_amount_rows_contribute_zero() {
        let mut rows = vec![row(500, "income", "completed", "store", 1)];
        rows.push(Transaction {
            amount: None,
            ..row(0, "expense", "completed", "parts", 1)
        });

        let report = totals(&rows);
        assert_eq!(report.profit, Decimal::from(500));
    }

    #[test]
    fn day_keys_group_by_calendar_date() {
        let rows = vec![
            row(10, "income", "completed", "store", 1),
            row(20, "income", "completed", "store", 1),
            row(5, "expense", "completed", "store", 2),
        ];

        let by_day = net_by_key(&rows, day_key);
        assert_eq!(by_day.len(), 2);
        assert_eq!(by_day["2026-03-01"], Decimal::from(30));
        assert_eq!(by_day["2026-03-02"], Decimal::from(-5));
    }
}
