use chrono::{DateTime, Utc};
use sqlx::types::Json;
use sqlx::PgPool;
use uuid::Uuid;

use crate::clients::mailer::{mask_email, Mailer};
use crate::database::models::{Appointment, RepairItem};
use crate::error::ApiError;

pub async fn create(
    pool: &PgPool,
    profile_id: Option<Uuid>,
    customer_email: &str,
    device: &str,
    items: Vec<RepairItem>,
    scheduled_at: DateTime<Utc>,
) -> Result<Appointment, sqlx::Error> {
    sqlx::query_as::<_, Appointment>(
        "INSERT INTO appointments (id, profile_id, customer_email, device, status, items, scheduled_at) \
         VALUES ($1, $2, $3, $4, 'scheduled', $5, $6) \
         RETURNING id, profile_id, customer_email, device, status, items, scheduled_at, created_at",
    )
    .bind(Uuid::new_v4())
    .bind(profile_id)
    .bind(customer_email)
    .bind(device)
    .bind(Json(items))
    .bind(scheduled_at)
    .fetch_one(pool)
    .await
}

pub async fn list(pool: &PgPool) -> Result<Vec<Appointment>, sqlx::Error> {
    sqlx::query_as::<_, Appointment>(
        "SELECT id, profile_id, customer_email, device, status, items, scheduled_at, created_at \
         FROM appointments ORDER BY scheduled_at",
    )
    .fetch_all(pool)
    .await
}

pub async fn find(pool: &PgPool, id: Uuid) -> Result<Option<Appointment>, sqlx::Error> {
    sqlx::query_as::<_, Appointment>(
        "SELECT id, profile_id, customer_email, device, status, items, scheduled_at, created_at \
         FROM appointments WHERE id = $1",
    )
    .bind(id)
    .fetch_optional(pool)
    .await
}

/// Renders the status notification subject and body for an appointment.
pub fn status_email(appointment: &Appointment) -> (String, String) {
    let subject = format!("Repair update for your {}", appointment.device);

    let mut body = format!(
        "<p>Your repair appointment for <b>{}</b> is now <b>{}</b>.</p>",
        appointment.device, appointment.status
    );
    if !appointment.items.0.is_empty() {
        body.push_str("<ul>");
        for item in &appointment.items.0 {
            body.push_str(&format!("<li>{} — {}</li>", item.name, item.price));
        }
        body.push_str("</ul>");
    }
    body.push_str(&format!(
        "<p>Scheduled for {}.</p>",
        appointment.scheduled_at.format("%Y-%m-%d %H:%M UTC")
    ));

    (subject, body)
}

/// Hands the status email to the transactional mailer. The recipient address
/// only ever reaches the logs masked.
pub async fn notify(mailer: &dyn Mailer, appointment: &Appointment) -> Result<(), ApiError> {
    let (subject, body) = status_email(appointment);
    mailer.send(&appointment.customer_email, &subject, &body).await?;

    tracing::info!(
        to = %mask_email(&appointment.customer_email),
        appointment = %appointment.id,
        status = %appointment.status,
        "sent appointment status email"
    );
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use rust_decimal::Decimal;
    use std::sync::Mutex;

    fn appointment(status: &str) -> Appointment {
        Appointment {
            id: Uuid::new_v4(),
            profile_id: None,
            customer_email: "john.doe@example.com".to_string(),
            device: "iPhone 12".to_string(),
            status: status.to_string(),
            items: Json(vec![RepairItem {
                name: "Screen replacement".to_string(),
                price: Decimal::from(89),
            }]),
            scheduled_at: Utc::now(),
            created_at: Utc::now(),
        }
    }

    #[test]
    fn status_email_names_device_status_and_items() {
        let (subject, body) = status_email(&appointment("ready_for_pickup"));
        assert!(subject.contains("iPhone 12"));
        assert!(body.contains("ready_for_pickup"));
        assert!(body.contains("Screen replacement"));
    }

    #[derive(Default)]
    struct RecordingMailer {
        sent: Mutex<Vec<(String, String)>>,
    }

    #[async_trait]
    impl Mailer for RecordingMailer {
        async fn send(&self, to: &str, subject: &str, _html: &str) -> Result<(), ApiError> {
            self.sent.lock().unwrap().push((to.to_string(), subject.to_string()));
            Ok(())
        }
    }

    #[tokio::test]
    async fn notify_sends_to_the_customer_address() {
        let mailer = RecordingMailer::default();
        notify(&mailer, &appointment("in_progress")).await.unwrap();

        let sent = mailer.sent.lock().unwrap();
        assert_eq!(sent.len(), 1);
        assert_eq!(sent[0].0, "john.doe@example.com");
        assert!(sent[0].1.contains("iPhone 12"));
    }
}
