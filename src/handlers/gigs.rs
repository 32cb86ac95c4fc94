use actix_web::{HttpResponse, Responder, web};
use sea_orm::DatabaseConnection;
use uuid::Uuid;

use crate::auth::middleware::AuthenticatedUser;
use crate::cache::{CacheConfig, CacheData, keys};
use crate::db::gigs as gig_db;
use crate::models::gigs::{self, CreateGig, GigListQuery};

/// GET /api/gigs — list all open gigs, newest first, optionally filtered by
/// title. Public. Served read-through from the listing cache.
pub async fn get_gigs(
    db: web::Data<DatabaseConnection>,
    cache: web::Data<CacheData>,
    cache_config: web::Data<CacheConfig>,
    query: web::Query<GigListQuery>,
) -> impl Responder {
    let search = query.search.as_deref().unwrap_or("");
    let cache_key = keys::gig_list(search);

    if let Ok(Some(cached)) = cache.get::<Vec<gigs::Model>>(&cache_key).await {
        return HttpResponse::Ok().json(cached);
    }

    match gig_db::list_open_gigs(db.get_ref(), query.search.as_deref()).await {
        Ok(open_gigs) => {
            let ttl = cache_config.gig_list_ttl.as_secs();
            if let Err(e) = cache.set(&cache_key, &open_gigs, Some(ttl)).await {
                tracing::warn!("Failed to cache gig listing: {e}");
            }
            HttpResponse::Ok().json(open_gigs)
        }
        Err(e) => {
            tracing::error!("Failed to fetch gigs: {e}");
            HttpResponse::InternalServerError().json(serde_json::json!({
                "error": "Unexpected failure",
            }))
        }
    }
}

/// GET /api/gigs/{id} — get a single gig. Public.
pub async fn get_gig(db: web::Data<DatabaseConnection>, path: web::Path<Uuid>) -> impl Responder {
    let id = path.into_inner();
    match gig_db::get_gig_by_id(db.get_ref(), id).await {
        Ok(Some(gig)) => HttpResponse::Ok().json(gig),
        Ok(None) => HttpResponse::NotFound().json(serde_json::json!({
            "error": format!("Gig {id} not found"),
        })),
        Err(e) => {
            tracing::error!("Database error: {e}");
            HttpResponse::InternalServerError().json(serde_json::json!({
                "error": "Unexpected failure",
            }))
        }
    }
}

/// POST /api/gigs — create a new gig (requires authentication).
/// New gigs always start in `open` status.
pub async fn create_gig(
    user: AuthenticatedUser,
    db: web::Data<DatabaseConnection>,
    cache: web::Data<CacheData>,
    body: web::Json<CreateGig>,
) -> impl Responder {
    let input = body.into_inner();

    if input.title.trim().is_empty() || input.description.trim().is_empty() {
        return HttpResponse::BadRequest().json(serde_json::json!({
            "error": "Title and description must not be empty",
        }));
    }
    if !input.budget.is_finite() || input.budget < 0.0 {
        return HttpResponse::BadRequest().json(serde_json::json!({
            "error": "Budget must be a non-negative number",
        }));
    }

    match gig_db::insert_gig(db.get_ref(), input, user.0.id).await {
        Ok(gig) => {
            // The listing changed; drop every cached variant of it.
            if let Err(e) = cache.delete_pattern(keys::gig_list_pattern()).await {
                tracing::warn!("Failed to invalidate gig listing cache: {e}");
            }
            HttpResponse::Created().json(gig)
        }
        Err(e) => {
            tracing::error!("Failed to create gig: {e}");
            HttpResponse::InternalServerError().json(serde_json::json!({
                "error": "Unexpected failure",
            }))
        }
    }
}
