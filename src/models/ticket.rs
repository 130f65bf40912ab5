//! Check-in ticket model

use serde::Serialize;
use utoipa::ToSchema;

/// Printable entry pass for one check-in
#[derive(Debug, Clone, PartialEq, Eq, Serialize, ToSchema)]
pub struct Ticket {
    pub visitor_id: String,
    pub name: String,
    pub purpose: String,
    /// Check-in date in the kiosk's local time (d/M/yyyy)
    pub date: String,
    pub greeting: String,
    /// Text encoded in the QR code
    pub qr_payload: String,
    /// Image URL on the external QR endpoint
    pub qr_url: String,
}
