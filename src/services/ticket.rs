//! Entry tickets and their QR code

use chrono::FixedOffset;
use reqwest::Url;

use super::export::locale_date;
use crate::{
    config::TicketConfig,
    models::{ticket::Ticket, visitor::VisitorRecord},
};

/// Text encoded in the QR code: `<prefix>:<id>|<name>`
pub fn qr_payload(record: &VisitorRecord, config: &TicketConfig) -> String {
    format!("{}:{}|{}", config.qr_prefix, record.id, record.name)
}

/// Image URL on the external QR endpoint, empty if the endpoint is not a URL
pub fn qr_url(payload: &str, config: &TicketConfig) -> String {
    let size = format!("{0}x{0}", config.qr_size);
    match Url::parse_with_params(&config.qr_endpoint, &[("size", size.as_str()), ("data", payload)]) {
        Ok(url) => url.to_string(),
        Err(e) => {
            tracing::warn!("Invalid QR endpoint {:?}: {}", config.qr_endpoint, e);
            String::new()
        }
    }
}

pub fn build_ticket(record: &VisitorRecord, config: &TicketConfig, offset: FixedOffset) -> Ticket {
    let payload = qr_payload(record, config);
    let date = record
        .parsed_timestamp()
        .map(|ts| locale_date(&ts, offset))
        .unwrap_or_else(|| record.timestamp.clone());

    Ticket {
        visitor_id: record.id.clone(),
        name: record.name.clone(),
        purpose: record.purpose.tag().to_string(),
        date,
        greeting: record.ai_greeting.clone(),
        qr_url: qr_url(&payload, config),
        qr_payload: payload,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::enums::VisitPurpose;

    fn record() -> VisitorRecord {
        VisitorRecord {
            id: "LIB-123".to_string(),
            name: "Ana Putri".to_string(),
            email: String::new(),
            phone: String::new(),
            school: String::new(),
            member_id: String::new(),
            purpose: VisitPurpose::Borrowing,
            timestamp: "2024-01-10T20:00:00.000Z".to_string(),
            ai_greeting: "Halo Ana".to_string(),
        }
    }

    #[test]
    fn test_ticket_fields() {
        let wib = FixedOffset::east_opt(7 * 3600).unwrap();
        let ticket = build_ticket(&record(), &TicketConfig::default(), wib);

        assert_eq!(ticket.qr_payload, "UMMLIB:LIB-123|Ana Putri");
        assert_eq!(ticket.date, "11/1/2024");
        assert_eq!(ticket.purpose, "Meminjam");
        assert!(ticket
            .qr_url
            .starts_with("https://api.qrserver.com/v1/create-qr-code/?size=300x300&data="));
        assert!(ticket.qr_url.contains("UMMLIB%3ALIB-123%7CAna+Putri"));
    }

    #[test]
    fn test_bad_endpoint_degrades_to_empty_url() {
        let config = TicketConfig {
            qr_endpoint: "not a url".to_string(),
            ..TicketConfig::default()
        };
        assert_eq!(qr_url("x", &config), "");
    }
}
