use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Gig fields included in a notification payload.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GigRef {
    pub id: Uuid,
    pub title: String,
}

/// Bid fields included in a notification payload.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BidRef {
    pub id: Uuid,
    pub price: f64,
}

/// Events the server pushes to a client over WebSocket.
///
/// The notification feed is one-way: clients only listen.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ServerEvent {
    /// The connected freelancer's bid was accepted.
    Hired {
        message: String,
        gig: GigRef,
        bid: BidRef,
    },
}

impl ServerEvent {
    /// Build the hired event for a winning bid.
    pub fn hired(gig_id: Uuid, gig_title: &str, bid_id: Uuid, price: f64) -> Self {
        ServerEvent::Hired {
            message: format!("You have been hired for {gig_title}!"),
            gig: GigRef {
                id: gig_id,
                title: gig_title.to_string(),
            },
            bid: BidRef { id: bid_id, price },
        }
    }
}
