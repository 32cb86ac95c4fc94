pub mod auth;
pub mod bids;
pub mod gigs;
pub mod notifications;

use actix_web::web;

pub fn init_routes(cfg: &mut web::ServiceConfig) {
    // ── Auth routes (protected by JWT via the AuthenticatedUser extractor) ──
    cfg.service(web::scope("/auth").route("/me", web::get().to(auth::me)));

    // ── Gig routes (listing/detail are public, creation requires a JWT) ──
    cfg.service(
        web::scope("/gigs")
            .route("", web::get().to(gigs::get_gigs))
            .route("", web::post().to(gigs::create_gig))
            .route("/{id}", web::get().to(gigs::get_gig)),
    );

    // ── Bid routes (all protected — require valid JWT) ──
    cfg.service(
        web::scope("/bids")
            .route("", web::post().to(bids::submit_bid))
            .route("/gig/{gig_id}", web::get().to(bids::get_bids_by_gig))
            .route("/{id}/hire", web::patch().to(bids::hire)),
    );

    // ── Realtime notification feed (auth via token query param) ──
    cfg.service(
        web::scope("/notifications").route("/ws", web::get().to(notifications::ws_connect)),
    );
}
