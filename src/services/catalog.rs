use rust_decimal::Decimal;
use sqlx::PgPool;
use uuid::Uuid;

use crate::database::models::Product;
use crate::error::ApiError;

pub async fn list_active(pool: &PgPool) -> Result<Vec<Product>, sqlx::Error> {
    sqlx::query_as::<_, Product>(
        "SELECT id, name, description, category, price, stock, status, created_at \
         FROM products WHERE status = 'active' ORDER BY created_at DESC",
    )
    .fetch_all(pool)
    .await
}

pub async fn find(pool: &PgPool, id: Uuid) -> Result<Option<Product>, sqlx::Error> {
    sqlx::query_as::<_, Product>(
        "SELECT id, name, description, category, price, stock, status, created_at \
         FROM products WHERE id = $1",
    )
    .bind(id)
    .fetch_optional(pool)
    .await
}

pub async fn find_many(pool: &PgPool, ids: &[Uuid]) -> Result<Vec<Product>, sqlx::Error> {
    sqlx::query_as::<_, Product>(
        "SELECT id, name, description, category, price, stock, status, created_at \
         FROM products WHERE id = ANY($1) AND status = 'active'",
    )
    .bind(ids)
    .fetch_all(pool)
    .await
}

/// Prices a cart server-side against catalog rows. Quantities must be
/// positive and every requested product must exist in `products`.
pub fn order_total(products: &[Product], requested: &[(Uuid, i32)]) -> Result<Decimal, ApiError> {
    let mut total = Decimal::ZERO;

    for (product_id, quantity) in requested {
        if *quantity <= 0 {
            return Err(ApiError::bad_request("item quantity must be positive"));
        }
        let product = products
            .iter()
            .find(|p| p.id == *product_id)
            .ok_or_else(|| ApiError::bad_request(format!("unknown product: {product_id}")))?;
        total += product.price * Decimal::from(*quantity);
    }

    Ok(total)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;

    fn product(id: Uuid, price: i64) -> Product {
        Product {
            id,
            name: "Widget".to_string(),
            description: None,
            category: "general".to_string(),
            price: Decimal::from(price),
            stock: 10,
            status: "active".to_string(),
            created_at: Utc::now(),
        }
    }

    #[test]
    fn totals_cart_lines() {
        let a = Uuid::new_v4();
        let b = Uuid::new_v4();
        let catalog = vec![product(a, 10), product(b, 25)];

        let total = order_total(&catalog, &[(a, 2), (b, 1)]).unwrap();
        assert_eq!(total, Decimal::from(45));
    }

    #[test]
    fn rejects_unknown_product_and_bad_quantity() {
        let a = Uuid::new_v4();
        let catalog = vec![product(a, 10)];

        assert!(order_total(&catalog, &[(Uuid::new_v4(), 1)]).is_err());
        assert!(order_total(&catalog, &[(a, 0)]).is_err());
        assert!(order_total(&catalog, &[(a, -2)]).is_err());
    }

    #[test]
    fn empty_cart_totals_zero() {
        assert_eq!(order_total(&[], &[]).unwrap(), Decimal::ZERO);
    }
}
