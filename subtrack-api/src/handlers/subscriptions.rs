use actix_web::{web, HttpResponse, Result as ActixResult};
use shared_types::{
    CreateSubscriptionRequest, DiscoverSubscriptionsResponse, ErrorResponse, MessageResponse,
    SubscriptionsResponse, UpdateSubscriptionRequest,
};
use std::sync::Arc;
use tracing::info;

use crate::database::subscriptions as db;
use crate::database::Database;
use crate::jobs::discovery_manager::DiscoveryManager;

fn not_found() -> HttpResponse {
    HttpResponse::NotFound().json(ErrorResponse {
        error: "Subscription not found".to_string(),
    })
}

pub async fn list_subscriptions(database: web::Data<Arc<Database>>) -> ActixResult<HttpResponse> {
    let subscriptions = db::list_subscriptions(database.async_connection.clone())
        .await
        .map_err(|e| actix_web::error::ErrorInternalServerError(e.to_string()))?;

    Ok(HttpResponse::Ok().json(SubscriptionsResponse { subscriptions }))
}

pub async fn get_subscription(
    database: web::Data<Arc<Database>>,
    path: web::Path<i64>,
) -> ActixResult<HttpResponse> {
    let subscription_id = path.into_inner();

    let subscription = db::get_subscription(database.async_connection.clone(), subscription_id)
        .await
        .map_err(|e| actix_web::error::ErrorInternalServerError(e.to_string()))?;

    match subscription {
        Some(subscription) => Ok(HttpResponse::Ok().json(subscription)),
        None => Ok(not_found()),
    }
}

pub async fn create_subscription(
    database: web::Data<Arc<Database>>,
    request: web::Json<CreateSubscriptionRequest>,
) -> ActixResult<HttpResponse> {
    let id = db::insert_subscription(database.async_connection.clone(), &request)
        .await
        .map_err(|e| actix_web::error::ErrorInternalServerError(e.to_string()))?;

    let created = db::get_subscription(database.async_connection.clone(), id)
        .await
        .map_err(|e| actix_web::error::ErrorInternalServerError(e.to_string()))?
        .ok_or_else(|| actix_web::error::ErrorInternalServerError("Created subscription vanished"))?;

    info!("Created subscription: id={}, company={}", id, created.company);

    Ok(HttpResponse::Created().json(created))
}

pub async fn update_subscription(
    database: web::Data<Arc<Database>>,
    path: web::Path<i64>,
    request: web::Json<UpdateSubscriptionRequest>,
) -> ActixResult<HttpResponse> {
    let subscription_id = path.into_inner();

    let updated = db::update_subscription(
        database.async_connection.clone(),
        subscription_id,
        &request,
    )
    .await
    .map_err(|e| actix_web::error::ErrorInternalServerError(e.to_string()))?;

    match updated {
        Some(subscription) => Ok(HttpResponse::Ok().json(subscription)),
        None => Ok(not_found()),
    }
}

pub async fn delete_subscription(
    database: web::Data<Arc<Database>>,
    path: web::Path<i64>,
) -> ActixResult<HttpResponse> {
    let subscription_id = path.into_inner();

    let deleted = db::delete_subscription(database.async_connection.clone(), subscription_id)
        .await
        .map_err(|e| actix_web::error::ErrorInternalServerError(e.to_string()))?;

    if !deleted {
        return Ok(not_found());
    }

    info!("Cancelled subscription: id={}", subscription_id);

    Ok(HttpResponse::Ok().json(MessageResponse {
        message: "Subscription cancelled successfully".to_string(),
    }))
}

pub async fn discover_subscriptions(
    manager: web::Data<Arc<DiscoveryManager>>,
) -> ActixResult<HttpResponse> {
    info!("Triggering subscription discovery");

    let outcome = manager
        .discover()
        .await
        .map_err(|e| actix_web::error::ErrorInternalServerError(e.to_string()))?;

    info!(
        "Subscription discovery completed: added={}, total={}",
        outcome.added, outcome.total
    );

    Ok(HttpResponse::Ok().json(DiscoverSubscriptionsResponse {
        message: format!("Discovered {} new subscriptions", outcome.added),
        total: outcome.total,
    }))
}

pub async fn get_stats(database: web::Data<Arc<Database>>) -> ActixResult<HttpResponse> {
    let stats = db::get_stats(database.async_connection.clone())
        .await
        .map_err(|e| actix_web::error::ErrorInternalServerError(e.to_string()))?;

    Ok(HttpResponse::Ok().json(stats))
}

/// Register the subscription routes. The stats and discover paths are declared
/// before `{id}` so they are never captured as an id.
pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.route(
        "/api/subscriptions/stats/summary",
        web::get().to(get_stats),
    )
    .route(
        "/api/subscriptions/discover",
        web::post().to(discover_subscriptions),
    )
    .route("/api/subscriptions", web::get().to(list_subscriptions))
    .route("/api/subscriptions", web::post().to(create_subscription))
    .route("/api/subscriptions/{id}", web::get().to(get_subscription))
    .route("/api/subscriptions/{id}", web::put().to(update_subscription))
    .route(
        "/api/subscriptions/{id}",
        web::delete().to(delete_subscription),
    );
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::database::test_support::temp_database;
    use crate::integrations::MockInbox;
    use actix_web::{http::StatusCode, test, App};
    use extractors::SubscriptionExtractor;
    use shared_types::{BillingCycle, Subscription, SubscriptionStats, SubscriptionStatus};

    macro_rules! init_app {
        ($db:expr) => {{
            let manager = Arc::new(DiscoveryManager::new(
                $db.async_connection.clone(),
                SubscriptionExtractor::new().unwrap(),
                Arc::new(MockInbox::new()),
            ));
            test::init_service(
                App::new()
                    .app_data(web::Data::new($db.clone()))
                    .app_data(web::Data::new(manager))
                    .configure(configure),
            )
            .await
        }};
    }

    #[actix_web::test]
    async fn test_create_then_get() {
        let (db, _dir) = temp_database();
        let app = init_app!(db);

        let req = test::TestRequest::post()
            .uri("/api/subscriptions")
            .set_json(serde_json::json!({
                "company": "Disney+",
                "monthly_cost": 7.99,
                "yearly_cost": 95.88,
                "currency": "EUR"
            }))
            .to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::CREATED);
        let created: Subscription = test::read_body_json(resp).await;
        assert_eq!(created.company, "Disney+");
        assert_eq!(created.billing_cycle, BillingCycle::Monthly);

        let req = test::TestRequest::get()
            .uri(&format!("/api/subscriptions/{}", created.id))
            .to_request();
        let fetched: Subscription = test::call_and_read_body_json(&app, req).await;
        assert_eq!(fetched, created);
    }

    #[actix_web::test]
    async fn test_create_rejects_missing_company() {
        let (db, _dir) = temp_database();
        let app = init_app!(db);

        let req = test::TestRequest::post()
            .uri("/api/subscriptions")
            .set_json(serde_json::json!({ "monthly_cost": 5.0 }))
            .to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
    }

    #[actix_web::test]
    async fn test_missing_subscription_is_404() {
        let (db, _dir) = temp_database();
        let app = init_app!(db);

        let req = test::TestRequest::get()
            .uri("/api/subscriptions/99")
            .to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::NOT_FOUND);
        let body: ErrorResponse = test::read_body_json(resp).await;
        assert_eq!(body.error, "Subscription not found");

        let req = test::TestRequest::put()
            .uri("/api/subscriptions/99")
            .set_json(serde_json::json!({ "notes": "nothing here" }))
            .to_request();
        assert_eq!(
            test::call_service(&app, req).await.status(),
            StatusCode::NOT_FOUND
        );

        let req = test::TestRequest::delete()
            .uri("/api/subscriptions/99")
            .to_request();
        assert_eq!(
            test::call_service(&app, req).await.status(),
            StatusCode::NOT_FOUND
        );
    }

    #[actix_web::test]
    async fn test_update_and_delete() {
        let (db, _dir) = temp_database();
        let app = init_app!(db);

        let id = db::insert_subscription(
            db.async_connection.clone(),
            &CreateSubscriptionRequest::new("Hulu"),
        )
        .await
        .unwrap();

        let req = test::TestRequest::put()
            .uri(&format!("/api/subscriptions/{}", id))
            .set_json(serde_json::json!({ "status": "cancelled", "monthly_cost": 17.99 }))
            .to_request();
        let updated: Subscription = test::call_and_read_body_json(&app, req).await;
        assert_eq!(updated.status, SubscriptionStatus::Cancelled);
        assert_eq!(updated.monthly_cost, 17.99);
        assert_eq!(updated.company, "Hulu");

        let req = test::TestRequest::delete()
            .uri(&format!("/api/subscriptions/{}", id))
            .to_request();
        let body: MessageResponse = test::call_and_read_body_json(&app, req).await;
        assert_eq!(body.message, "Subscription cancelled successfully");

        let req = test::TestRequest::get().uri("/api/subscriptions").to_request();
        let list: SubscriptionsResponse = test::call_and_read_body_json(&app, req).await;
        assert!(list.subscriptions.is_empty());
    }

    #[actix_web::test]
    async fn test_update_with_null_clears_notes() {
        let (db, _dir) = temp_database();
        let app = init_app!(db);

        let id = db::insert_subscription(
            db.async_connection.clone(),
            &CreateSubscriptionRequest {
                notes: Some("Shared with roommates".to_string()),
                ..CreateSubscriptionRequest::new("Hulu")
            },
        )
        .await
        .unwrap();

        let req = test::TestRequest::put()
            .uri(&format!("/api/subscriptions/{}", id))
            .set_json(serde_json::json!({ "notes": null }))
            .to_request();
        let updated: Subscription = test::call_and_read_body_json(&app, req).await;
        assert!(updated.notes.is_none());

        let req = test::TestRequest::get()
            .uri(&format!("/api/subscriptions/{}", id))
            .to_request();
        let fetched: Subscription = test::call_and_read_body_json(&app, req).await;
        assert!(fetched.notes.is_none());
        assert_eq!(fetched.company, "Hulu");
    }

    #[actix_web::test]
    async fn test_discover_then_stats() {
        let (db, _dir) = temp_database();
        let app = init_app!(db);

        let req = test::TestRequest::post()
            .uri("/api/subscriptions/discover")
            .to_request();
        let body: DiscoverSubscriptionsResponse = test::call_and_read_body_json(&app, req).await;
        assert_eq!(body.message, "Discovered 3 new subscriptions");
        assert_eq!(body.total, 3);

        let req = test::TestRequest::post()
            .uri("/api/subscriptions/discover")
            .to_request();
        let body: DiscoverSubscriptionsResponse = test::call_and_read_body_json(&app, req).await;
        assert_eq!(body.message, "Discovered 0 new subscriptions");
        assert_eq!(body.total, 3);

        let req = test::TestRequest::get()
            .uri("/api/subscriptions/stats/summary")
            .to_request();
        let stats: SubscriptionStats = test::call_and_read_body_json(&app, req).await;
        assert_eq!(stats.total_subscriptions, 3);
        // 15.99 + 9.99 + 11.58 and 191.88 + 119.88 + 139.0
        assert!((stats.total_monthly_cost - 37.56).abs() < 1e-9);
        assert!((stats.total_yearly_cost - 450.76).abs() < 1e-9);
        assert!((stats.estimated_yearly - 450.72).abs() < 1e-9);
    }
}
