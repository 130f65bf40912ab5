//! Visitor record model and lenient remote-row mapping

use chrono::{DateTime, NaiveDateTime, SecondsFormat, Utc};
use once_cell::sync::Lazy;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use snowflaked::sync::Generator;
use utoipa::ToSchema;
use uuid::Uuid;
use validator::Validate;

use super::enums::VisitPurpose;
use super::ticket::Ticket;

static ID_GENERATOR: Lazy<Generator> = Lazy::new(|| Generator::new(0));

/// Name used when a remote row carries no name at all
pub const UNKNOWN_NAME: &str = "Unknown";

/// One check-in event
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct VisitorRecord {
    /// Stable join key between local cache and remote sheet
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub email: String,
    /// Kept verbatim, leading zeros included
    #[serde(default)]
    pub phone: String,
    /// School or institution
    #[serde(default)]
    pub school: String,
    /// Library member id, empty for guests
    #[serde(default)]
    pub member_id: String,
    #[serde(default)]
    #[schema(value_type = String, example = "Membaca")]
    pub purpose: VisitPurpose,
    /// RFC 3339 instant, set at creation
    pub timestamp: String,
    #[serde(default)]
    pub ai_greeting: String,
}

/// Check-in form submission
#[derive(Debug, Clone, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CheckInRequest {
    #[validate(length(min = 1, message = "Name is required"))]
    pub name: String,
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub phone: String,
    #[serde(default)]
    pub school: String,
    #[serde(default)]
    pub member_id: String,
    /// Visit purpose tag (Membaca, Meminjam, Mengembalikan, Belajar, Wifi, Lainnya)
    #[serde(default)]
    #[schema(value_type = String, example = "Belajar")]
    pub purpose: VisitPurpose,
}

/// Check-in result returned to the kiosk
#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct CheckInResponse {
    pub visitor: VisitorRecord,
    pub greeting: String,
    pub ticket: Ticket,
}

/// Where the displayed visitor list comes from
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, ToSchema)]
#[serde(rename_all = "lowercase")]
pub enum ViewSource {
    Local,
    Remote,
}

/// Admin visitor list
#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct VisitorList {
    pub source: ViewSource,
    pub total: usize,
    pub visitors: Vec<VisitorRecord>,
}

/// Outcome of an operator-triggered sync
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, ToSchema)]
#[serde(rename_all = "lowercase")]
pub enum SyncOutcome {
    /// The displayed list was replaced by the remote rows
    Replaced,
    /// The sheet returned nothing, the displayed list is unchanged
    Empty,
}

#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct SyncResponse {
    pub outcome: SyncOutcome,
    pub count: usize,
    pub message: String,
}

/// Whether the remote endpoint is the built-in one
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, ToSchema)]
#[serde(rename_all = "lowercase")]
pub enum EndpointKind {
    Default,
    Custom,
}

/// Dashboard counters
#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct VisitorStats {
    pub total: usize,
    pub today: usize,
    pub endpoint: EndpointKind,
}

impl VisitorRecord {
    /// Build a fresh record at check-in time
    pub fn new_check_in(request: &CheckInRequest, greeting: String, now: DateTime<Utc>) -> Self {
        Self {
            id: generate_id(),
            name: request.name.trim().to_string(),
            email: request.email.trim().to_string(),
            phone: request.phone.trim().to_string(),
            school: request.school.trim().to_string(),
            member_id: request.member_id.trim().to_string(),
            purpose: request.purpose,
            timestamp: now.to_rfc3339_opts(SecondsFormat::Millis, true),
            ai_greeting: greeting,
        }
    }

    /// Check-in instant, `None` if the stored text is not a recognised timestamp
    pub fn parsed_timestamp(&self) -> Option<DateTime<Utc>> {
        parse_timestamp(&self.timestamp)
    }

    /// Total mapping from a loosely-typed sheet row.
    ///
    /// Keys are compared after lowercasing and dropping non-alphanumerics, so
    /// `Member ID`, `memberId` and `member_id` all land on `memberId`. Missing
    /// or empty values fall back to field defaults.
    pub fn from_remote_row(row: &Map<String, Value>) -> Self {
        let pick = |aliases: &[&str]| lookup(row, aliases);

        Self {
            id: pick(ID_ALIASES).unwrap_or_else(fallback_id),
            name: pick(NAME_ALIASES).unwrap_or_else(|| UNKNOWN_NAME.to_string()),
            email: pick(EMAIL_ALIASES).unwrap_or_default(),
            phone: pick(PHONE_ALIASES).unwrap_or_default(),
            school: pick(SCHOOL_ALIASES).unwrap_or_default(),
            member_id: pick(MEMBER_ID_ALIASES).unwrap_or_default(),
            purpose: pick(PURPOSE_ALIASES)
                .map(|p| VisitPurpose::parse(&p))
                .unwrap_or_default(),
            timestamp: pick(TIMESTAMP_ALIASES)
                .unwrap_or_else(|| Utc::now().to_rfc3339_opts(SecondsFormat::Millis, true)),
            ai_greeting: pick(GREETING_ALIASES).unwrap_or_default(),
        }
    }
}

const ID_ALIASES: &[&str] = &["id"];
const NAME_ALIASES: &[&str] = &["name", "nama"];
const EMAIL_ALIASES: &[&str] = &["email"];
const PHONE_ALIASES: &[&str] = &["phone", "nohp", "telepon"];
const SCHOOL_ALIASES: &[&str] = &["school", "instansi"];
const MEMBER_ID_ALIASES: &[&str] = &["memberid", "idanggota"];
const PURPOSE_ALIASES: &[&str] = &["purpose", "tujuan"];
const TIMESTAMP_ALIASES: &[&str] = &["timestamp", "waktucheckin"];
const GREETING_ALIASES: &[&str] = &["aigreeting", "pesanai"];

fn normalize_key(key: &str) -> String {
    key.chars()
        .filter(|c| c.is_alphanumeric())
        .flat_map(char::to_lowercase)
        .collect()
}

fn lookup(row: &Map<String, Value>, aliases: &[&str]) -> Option<String> {
    aliases.iter().find_map(|alias| {
        row.iter()
            .filter(|(key, _)| normalize_key(key) == *alias)
            .find_map(|(_, value)| value_text(value))
    })
}

/// Sheet cells arrive as strings, numbers or booleans
fn value_text(value: &Value) -> Option<String> {
    let text = match value {
        Value::String(s) => s.clone(),
        Value::Number(n) => match (n.as_i64(), n.as_u64()) {
            (Some(i), _) => i.to_string(),
            (None, Some(u)) => u.to_string(),
            _ => n.to_string(),
        },
        Value::Bool(b) => b.to_string(),
        Value::Null | Value::Array(_) | Value::Object(_) => return None,
    };
    (!text.is_empty()).then_some(text)
}

/// Time-ordered id for a new check-in
pub fn generate_id() -> String {
    let id: u64 = ID_GENERATOR.generate();
    format!("LIB-{}", id)
}

fn fallback_id() -> String {
    format!("REMOTE-{}", Uuid::new_v4().simple())
}

/// Parse RFC 3339, or a naive ISO datetime taken as UTC
pub fn parse_timestamp(raw: &str) -> Option<DateTime<Utc>> {
    let raw = raw.trim();
    if let Ok(dt) = DateTime::parse_from_rfc3339(raw) {
        return Some(dt.with_timezone(&Utc));
    }
    ["%Y-%m-%dT%H:%M:%S%.f", "%Y-%m-%d %H:%M:%S"]
        .iter()
        .find_map(|fmt| NaiveDateTime::parse_from_str(raw, fmt).ok())
        .map(|naive| naive.and_utc())
}
