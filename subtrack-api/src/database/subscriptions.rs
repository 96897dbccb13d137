use crate::database::AsyncDbConnection;
use anyhow::Result;
use rusqlite::{params, Connection, OptionalExtension, Row, TransactionBehavior};
use shared_types::{
    BillingCycle, CreateSubscriptionRequest, Currency, ExtractedSubscription, Subscription,
    SubscriptionStats, SubscriptionStatus, UpdateSubscriptionRequest,
};

const SUBSCRIPTION_COLUMNS: &str = "id, company, service_name, email, monthly_cost, yearly_cost,
        currency, billing_cycle, status, cancel_url, notes, created_at, updated_at,
        next_billing_date";

fn row_to_subscription(row: &Row) -> rusqlite::Result<Subscription> {
    let currency: String = row.get(6)?;
    let billing_cycle: String = row.get(7)?;
    let status: String = row.get(8)?;

    Ok(Subscription {
        id: row.get(0)?,
        company: row.get(1)?,
        service_name: row.get(2)?,
        email: row.get(3)?,
        monthly_cost: row.get(4)?,
        yearly_cost: row.get(5)?,
        currency: Currency::from_code(&currency).unwrap_or_default(),
        billing_cycle: BillingCycle::from_db_str(&billing_cycle),
        status: SubscriptionStatus::from_db_str(&status),
        cancel_url: row.get(9)?,
        notes: row.get(10)?,
        created_at: row.get(11)?,
        updated_at: row.get(12)?,
        next_billing_date: row.get(13)?,
    })
}

fn query_subscription(conn: &Connection, id: i64) -> Result<Option<Subscription>> {
    let subscription = conn
        .query_row(
            &format!("SELECT {} FROM subscriptions WHERE id = ?", SUBSCRIPTION_COLUMNS),
            [id],
            row_to_subscription,
        )
        .optional()?;

    Ok(subscription)
}

pub async fn insert_subscription(
    conn: AsyncDbConnection,
    request: &CreateSubscriptionRequest,
) -> Result<i64> {
    let conn = conn.lock().await?;
    let now = chrono::Utc::now().timestamp();

    let id: i64 = conn.query_row(
        "INSERT INTO subscriptions
         (company, service_name, email, monthly_cost, yearly_cost, currency, billing_cycle,
          status, cancel_url, notes, created_at, next_billing_date)
         VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?)
         RETURNING id",
        params![
            &request.company,
            request.service_name.as_deref(),
            request.email.as_deref(),
            request.monthly_cost,
            request.yearly_cost,
            request.currency.as_str(),
            request.billing_cycle.as_str(),
            request.status.as_str(),
            request.cancel_url.as_deref(),
            request.notes.as_deref(),
            now,
            request.next_billing_date,
        ],
        |row| row.get(0),
    )?;

    Ok(id)
}

/// Store an extracted subscription unless one with the same (company, email) pair
/// exists. The lookup and the insert run in one immediate transaction, so concurrent
/// discoveries cannot both store the pair. Returns `None` when it was already stored.
pub async fn insert_extracted_if_absent(
    conn: AsyncDbConnection,
    extracted: &ExtractedSubscription,
) -> Result<Option<i64>> {
    let mut conn = conn.lock().await?;
    let request = CreateSubscriptionRequest::from(extracted);
    let now = chrono::Utc::now().timestamp();

    let tx = conn.transaction_with_behavior(TransactionBehavior::Immediate)?;
    let id: Option<i64> = tx
        .query_row(
            "INSERT INTO subscriptions
             (company, email, monthly_cost, yearly_cost, currency, billing_cycle, status,
              created_at)
             SELECT ?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8
             WHERE NOT EXISTS (
                 SELECT 1 FROM subscriptions WHERE company = ?1 AND email IS ?2
             )
             RETURNING id",
            params![
                &request.company,
                request.email.as_deref(),
                request.monthly_cost,
                request.yearly_cost,
                request.currency.as_str(),
                request.billing_cycle.as_str(),
                request.status.as_str(),
                now,
            ],
            |row| row.get(0),
        )
        .optional()?;
    tx.commit()?;

    Ok(id)
}

pub async fn get_subscription(conn: AsyncDbConnection, id: i64) -> Result<Option<Subscription>> {
    let conn = conn.lock().await?;
    query_subscription(&conn, id)
}

pub async fn list_subscriptions(conn: AsyncDbConnection) -> Result<Vec<Subscription>> {
    let conn = conn.lock().await?;

    let mut stmt = conn.prepare(&format!(
        "SELECT {} FROM subscriptions ORDER BY id",
        SUBSCRIPTION_COLUMNS
    ))?;

    let subscriptions = stmt
        .query_map([], row_to_subscription)?
        .collect::<Result<Vec<_>, _>>()?;

    Ok(subscriptions)
}

/// Apply the provided fields only; `Some(None)` clears a nullable column. Returns `None`
/// when no row has this id.
pub async fn update_subscription(
    conn: AsyncDbConnection,
    id: i64,
    request: &UpdateSubscriptionRequest,
) -> Result<Option<Subscription>> {
    let conn = conn.lock().await?;

    let Some(existing) = query_subscription(&conn, id)? else {
        return Ok(None);
    };

    let updated = Subscription {
        id,
        company: request.company.clone().unwrap_or(existing.company),
        service_name: request.service_name.clone().unwrap_or(existing.service_name),
        email: request.email.clone().unwrap_or(existing.email),
        monthly_cost: request.monthly_cost.unwrap_or(existing.monthly_cost),
        yearly_cost: request.yearly_cost.unwrap_or(existing.yearly_cost),
        currency: request.currency.unwrap_or(existing.currency),
        billing_cycle: request.billing_cycle.unwrap_or(existing.billing_cycle),
        status: request.status.unwrap_or(existing.status),
        cancel_url: request.cancel_url.clone().unwrap_or(existing.cancel_url),
        notes: request.notes.clone().unwrap_or(existing.notes),
        created_at: existing.created_at,
        updated_at: Some(chrono::Utc::now().timestamp()),
        next_billing_date: request
            .next_billing_date
            .unwrap_or(existing.next_billing_date),
    };

    conn.execute(
        "UPDATE subscriptions
         SET company = ?, service_name = ?, email = ?, monthly_cost = ?, yearly_cost = ?,
             currency = ?, billing_cycle = ?, status = ?, cancel_url = ?, notes = ?,
             updated_at = ?, next_billing_date = ?
         WHERE id = ?",
        params![
            &updated.company,
            updated.service_name.as_deref(),
            updated.email.as_deref(),
            updated.monthly_cost,
            updated.yearly_cost,
            updated.currency.as_str(),
            updated.billing_cycle.as_str(),
            updated.status.as_str(),
            updated.cancel_url.as_deref(),
            updated.notes.as_deref(),
            updated.updated_at,
            updated.next_billing_date,
            id,
        ],
    )?;

    Ok(Some(updated))
}

/// Returns `false` when no row had this id.
pub async fn delete_subscription(conn: AsyncDbConnection, id: i64) -> Result<bool> {
    let conn = conn.lock().await?;
    let deleted = conn.execute("DELETE FROM subscriptions WHERE id = ?", [id])?;
    Ok(deleted > 0)
}

pub async fn get_stats(conn: AsyncDbConnection) -> Result<SubscriptionStats> {
    let conn = conn.lock().await?;

    let (total_subscriptions, total_monthly_cost, total_yearly_cost): (i64, f64, f64) = conn
        .query_row(
            "SELECT COUNT(*), COALESCE(SUM(monthly_cost), 0.0), COALESCE(SUM(yearly_cost), 0.0)
             FROM subscriptions",
            [],
            |row| Ok((row.get(0)?, row.get(1)?, row.get(2)?)),
        )?;

    Ok(SubscriptionStats {
        total_subscriptions,
        total_monthly_cost,
        total_yearly_cost,
        estimated_yearly: total_monthly_cost * 12.0,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::database::test_support::temp_database;

    fn netflix() -> CreateSubscriptionRequest {
        CreateSubscriptionRequest {
            email: Some("netflix@netflix.com".to_string()),
            monthly_cost: 15.99,
            yearly_cost: 191.88,
            ..CreateSubscriptionRequest::new("Netflix")
        }
    }

    #[actix_web::test]
    async fn test_insert_and_get() {
        let (db, _dir) = temp_database();
        let conn = db.async_connection.clone();

        let id = insert_subscription(conn.clone(), &netflix()).await.unwrap();
        let stored = get_subscription(conn, id).await.unwrap().unwrap();

        assert_eq!(stored.id, id);
        assert_eq!(stored.company, "Netflix");
        assert_eq!(stored.monthly_cost, 15.99);
        assert_eq!(stored.currency, Currency::Usd);
        assert_eq!(stored.billing_cycle, BillingCycle::Monthly);
        assert_eq!(stored.status, SubscriptionStatus::Active);
        assert!(stored.created_at > 0);
        assert!(stored.updated_at.is_none());
    }

    #[actix_web::test]
    async fn test_get_missing_returns_none() {
        let (db, _dir) = temp_database();
        assert!(get_subscription(db.async_connection.clone(), 42)
            .await
            .unwrap()
            .is_none());
    }

    #[actix_web::test]
    async fn test_list_ordered_by_id() {
        let (db, _dir) = temp_database();
        let conn = db.async_connection.clone();

        insert_subscription(conn.clone(), &netflix()).await.unwrap();
        insert_subscription(conn.clone(), &CreateSubscriptionRequest::new("Hulu"))
            .await
            .unwrap();

        let companies: Vec<String> = list_subscriptions(conn)
            .await
            .unwrap()
            .into_iter()
            .map(|s| s.company)
            .collect();
        assert_eq!(companies, vec!["Netflix", "Hulu"]);
    }

    #[actix_web::test]
    async fn test_partial_update() {
        let (db, _dir) = temp_database();
        let conn = db.async_connection.clone();
        let id = insert_subscription(conn.clone(), &netflix()).await.unwrap();

        let request = UpdateSubscriptionRequest {
            status: Some(SubscriptionStatus::Cancelled),
            notes: Some(Some("Moved to the family plan".to_string())),
            ..Default::default()
        };
        let updated = update_subscription(conn.clone(), id, &request)
            .await
            .unwrap()
            .unwrap();

        assert_eq!(updated.status, SubscriptionStatus::Cancelled);
        assert_eq!(updated.company, "Netflix");
        assert_eq!(updated.monthly_cost, 15.99);
        assert!(updated.updated_at.is_some());

        let stored = get_subscription(conn, id).await.unwrap().unwrap();
        assert_eq!(stored, updated);
    }

    #[actix_web::test]
    async fn test_update_clears_nullable_fields() {
        let (db, _dir) = temp_database();
        let conn = db.async_connection.clone();
        let request = CreateSubscriptionRequest {
            notes: Some("Student discount".to_string()),
            cancel_url: Some("https://www.netflix.com/cancelplan".to_string()),
            next_billing_date: Some(1_700_000_000),
            ..netflix()
        };
        let id = insert_subscription(conn.clone(), &request).await.unwrap();

        let clear = UpdateSubscriptionRequest {
            notes: Some(None),
            email: Some(None),
            next_billing_date: Some(None),
            ..Default::default()
        };
        update_subscription(conn.clone(), id, &clear).await.unwrap();

        let stored = get_subscription(conn, id).await.unwrap().unwrap();
        assert!(stored.notes.is_none());
        assert!(stored.email.is_none());
        assert!(stored.next_billing_date.is_none());
        assert_eq!(
            stored.cancel_url.as_deref(),
            Some("https://www.netflix.com/cancelplan")
        );
    }

    #[actix_web::test]
    async fn test_update_missing_returns_none() {
        let (db, _dir) = temp_database();
        let result = update_subscription(
            db.async_connection.clone(),
            7,
            &UpdateSubscriptionRequest::default(),
        )
        .await
        .unwrap();
        assert!(result.is_none());
    }

    #[actix_web::test]
    async fn test_delete() {
        let (db, _dir) = temp_database();
        let conn = db.async_connection.clone();
        let id = insert_subscription(conn.clone(), &netflix()).await.unwrap();

        assert!(delete_subscription(conn.clone(), id).await.unwrap());
        assert!(!delete_subscription(conn.clone(), id).await.unwrap());
        assert!(get_subscription(conn, id).await.unwrap().is_none());
    }

    fn amazon_prime() -> ExtractedSubscription {
        ExtractedSubscription {
            company: "Amazon Prime".to_string(),
            email: "auto-confirm@amazon.com".to_string(),
            monthly_cost: 11.58,
            yearly_cost: 139.0,
            currency: Currency::Usd,
            billing_cycle: BillingCycle::Yearly,
            status: SubscriptionStatus::Active,
        }
    }

    #[actix_web::test]
    async fn test_insert_extracted_if_absent() {
        let (db, _dir) = temp_database();
        let conn = db.async_connection.clone();

        let id = insert_extracted_if_absent(conn.clone(), &amazon_prime())
            .await
            .unwrap()
            .unwrap();
        let stored = get_subscription(conn.clone(), id).await.unwrap().unwrap();

        assert_eq!(stored.company, "Amazon Prime");
        assert_eq!(stored.email.as_deref(), Some("auto-confirm@amazon.com"));
        assert_eq!(stored.billing_cycle, BillingCycle::Yearly);
        assert_eq!(stored.yearly_cost, 139.0);

        assert_eq!(
            insert_extracted_if_absent(conn.clone(), &amazon_prime())
                .await
                .unwrap(),
            None
        );

        let other_account = ExtractedSubscription {
            email: "prime@amazon.co.uk".to_string(),
            ..amazon_prime()
        };
        assert!(insert_extracted_if_absent(conn.clone(), &other_account)
            .await
            .unwrap()
            .is_some());
        assert_eq!(list_subscriptions(conn).await.unwrap().len(), 2);
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 4)]
    async fn test_concurrent_insert_if_absent_stores_once() {
        let (db, _dir) = temp_database();
        let conn = db.async_connection.clone();
        let extracted = amazon_prime();

        let results = insert_concurrently(conn.clone(), &extracted).await;
        assert_eq!(results.iter().filter(|id| id.is_some()).count(), 1);
        assert_eq!(list_subscriptions(conn).await.unwrap().len(), 1);
    }

    async fn insert_concurrently(
        conn: AsyncDbConnection,
        extracted: &ExtractedSubscription,
    ) -> Vec<Option<i64>> {
        let handles: Vec<_> = (0..4)
            .map(|_| {
                let conn = conn.clone();
                let extracted = extracted.clone();
                tokio::spawn(async move { insert_extracted_if_absent(conn, &extracted).await })
            })
            .collect();

        let mut results = Vec::new();
        for handle in handles {
            results.push(handle.await.unwrap().unwrap());
        }
        results
    }

    #[actix_web::test]
    async fn test_stats() {
        let (db, _dir) = temp_database();
        let conn = db.async_connection.clone();

        let empty = get_stats(conn.clone()).await.unwrap();
        assert_eq!(empty.total_subscriptions, 0);
        assert_eq!(empty.total_monthly_cost, 0.0);
        assert_eq!(empty.estimated_yearly, 0.0);

        insert_subscription(conn.clone(), &netflix()).await.unwrap();
        insert_subscription(
            conn.clone(),
            &CreateSubscriptionRequest {
                monthly_cost: 10.0,
                yearly_cost: 120.0,
                status: SubscriptionStatus::Cancelled,
                ..CreateSubscriptionRequest::new("Hulu")
            },
        )
        .await
        .unwrap();

        let stats = get_stats(conn).await.unwrap();
        assert_eq!(stats.total_subscriptions, 2);
        assert!((stats.total_monthly_cost - 25.99).abs() < 1e-9);
        assert!((stats.total_yearly_cost - 311.88).abs() < 1e-9);
        assert!((stats.estimated_yearly - 311.88).abs() < 1e-9);
    }
}
