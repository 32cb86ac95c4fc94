use actix_web::{HttpResponse, Responder, web};
use sea_orm::DatabaseConnection;
use std::sync::Arc;
use uuid::Uuid;

use crate::auth::middleware::AuthenticatedUser;
use crate::bidding::{self, BidError};
use crate::cache::{CacheData, keys};
use crate::hiring::{self, HireError};
use crate::models::bids::SubmitBid;
use crate::notify::server::NotificationServer;

fn bid_error_response(e: BidError) -> HttpResponse {
    let body = serde_json::json!({ "error": e.to_string() });
    match e {
        BidError::GigNotFound(_) => HttpResponse::NotFound().json(body),
        BidError::NotOwner => HttpResponse::Forbidden().json(body),
        BidError::GigNotOpen | BidError::OwnBid | BidError::DuplicateBid => {
            HttpResponse::Conflict().json(body)
        }
        BidError::InvalidInput(_) => HttpResponse::BadRequest().json(body),
        BidError::Db(e) => {
            tracing::error!("Database error: {e}");
            HttpResponse::InternalServerError().json(serde_json::json!({
                "error": "Unexpected failure",
            }))
        }
    }
}

fn hire_error_response(e: HireError) -> HttpResponse {
    let body = serde_json::json!({ "error": e.to_string() });
    match e {
        HireError::BidNotFound(_) | HireError::GigNotFound(_) => {
            HttpResponse::NotFound().json(body)
        }
        HireError::NotOwner => HttpResponse::Forbidden().json(body),
        HireError::GigNotOpen | HireError::BidNotPending => HttpResponse::Conflict().json(body),
        HireError::Db(e) => {
            tracing::error!("Database error: {e}");
            HttpResponse::InternalServerError().json(serde_json::json!({
                "error": "Unexpected failure",
            }))
        }
    }
}

/// POST /api/bids — submit a bid on an open gig (requires authentication).
pub async fn submit_bid(
    user: AuthenticatedUser,
    db: web::Data<DatabaseConnection>,
    body: web::Json<SubmitBid>,
) -> impl Responder {
    match bidding::submit_bid(db.get_ref(), &user.0, body.into_inner()).await {
        Ok(bid) => HttpResponse::Created().json(bid),
        Err(e) => bid_error_response(e),
    }
}

/// GET /api/bids/gig/{gig_id} — list bids on a gig, newest first.
/// Only the gig owner may view them.
pub async fn get_bids_by_gig(
    user: AuthenticatedUser,
    db: web::Data<DatabaseConnection>,
    path: web::Path<Uuid>,
) -> impl Responder {
    let gig_id = path.into_inner();
    match bidding::list_bids(db.get_ref(), user.0.id, gig_id).await {
        Ok(bids) => HttpResponse::Ok().json(bids),
        Err(e) => bid_error_response(e),
    }
}

/// PATCH /api/bids/{id}/hire — hire the freelancer behind a bid.
///
/// Only the gig owner may hire; the coordinator guarantees exactly one bid
/// per gig ever wins, no matter how many hire attempts race.
pub async fn hire(
    user: AuthenticatedUser,
    db: web::Data<DatabaseConnection>,
    cache: web::Data<CacheData>,
    notifications: web::Data<Arc<NotificationServer>>,
    path: web::Path<Uuid>,
) -> impl Responder {
    let bid_id = path.into_inner();

    match hiring::hire(db.get_ref(), notifications.get_ref(), user.0.id, bid_id).await {
        Ok(hired_bid) => {
            // The gig left the open listing; drop the cached variants.
            if let Err(e) = cache.delete_pattern(keys::gig_list_pattern()).await {
                tracing::warn!("Failed to invalidate gig listing cache: {e}");
            }
            HttpResponse::Ok().json(serde_json::json!({
                "message": "Freelancer hired successfully",
                "bid": hired_bid,
            }))
        }
        Err(e) => hire_error_response(e),
    }
}
