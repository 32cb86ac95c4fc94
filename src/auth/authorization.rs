use uuid::Uuid;

use crate::models::gigs::Model;

/// The single ownership predicate. Every path that gates on "is this the
/// gig's owner" (hire, list-bids, self-bid check) goes through here.
pub fn is_owner(gig: &Model, user_id: Uuid) -> bool {
    gig.user_id == user_id
}
