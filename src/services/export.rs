//! Period buckets and CSV export of visitor records

use chrono::{DateTime, Datelike, Duration, FixedOffset, NaiveDate, TimeZone, Utc};

use crate::models::{enums::ExportPeriod, visitor::VisitorRecord};

/// Column titles of the exported sheet, in order
pub const CSV_HEADERS: [&str; 9] = [
    "ID",
    "Nama",
    "Email",
    "No HP",
    "Instansi",
    "ID Anggota",
    "Tujuan",
    "Waktu Check-in",
    "Pesan AI",
];

/// Rendered export, ready to download
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CsvExport {
    pub filename: String,
    pub content: String,
}

/// Keep the records whose timestamp falls in `period` relative to `now`.
///
/// `now` carries the kiosk's local time zone: day and month boundaries are
/// taken there. Records with an unparseable timestamp only survive `All`.
/// Relative order is preserved.
pub fn filter_by_period<Tz: TimeZone>(
    records: &[VisitorRecord],
    period: ExportPeriod,
    now: &DateTime<Tz>,
) -> Vec<VisitorRecord> {
    if period == ExportPeriod::All {
        return records.to_vec();
    }

    let now_utc = now.with_timezone(&Utc);
    let day_start = start_of_local_day(now);
    let tz = now.timezone();

    let in_bucket = |ts: DateTime<Utc>| match period {
        ExportPeriod::All => true,
        ExportPeriod::Daily => ts >= day_start && ts < day_start + Duration::days(1),
        ExportPeriod::Weekly => ts >= now_utc - Duration::days(7),
        ExportPeriod::Monthly => {
            let local = ts.with_timezone(&tz);
            local.year() == now.year() && local.month() == now.month()
        }
    };

    records
        .iter()
        .filter(|r| r.parsed_timestamp().is_some_and(|ts| in_bucket(ts)))
        .cloned()
        .collect()
}

fn start_of_local_day<Tz: TimeZone>(now: &DateTime<Tz>) -> DateTime<Utc> {
    let midnight = now.date_naive().and_time(chrono::NaiveTime::MIN);
    now.timezone()
        .from_local_datetime(&midnight)
        .earliest()
        // Midnight skipped by a DST jump: fall back to the UTC reading
        .unwrap_or_else(|| midnight.and_utc().with_timezone(&now.timezone()))
        .with_timezone(&Utc)
}

/// `d/M/yyyy, HH.mm.ss` as printed by the id-ID locale
pub fn locale_datetime(ts: &DateTime<Utc>, offset: FixedOffset) -> String {
    ts.with_timezone(&offset)
        .format("%-d/%-m/%Y, %H.%M.%S")
        .to_string()
}

/// `d/M/yyyy` as printed by the id-ID locale
pub fn locale_date(ts: &DateTime<Utc>, offset: FixedOffset) -> String {
    ts.with_timezone(&offset).format("%-d/%-m/%Y").to_string()
}

fn quoted(value: &str) -> String {
    format!("\"{}\"", value.replace('"', "\"\""))
}

/// Quote only when the value would break the row
fn bare(value: &str) -> String {
    if value.contains([',', '"', '\n', '\r']) {
        quoted(value)
    } else {
        value.to_string()
    }
}

fn csv_row(record: &VisitorRecord, offset: FixedOffset) -> String {
    let checked_in = record
        .parsed_timestamp()
        .map(|ts| locale_datetime(&ts, offset))
        .unwrap_or_else(|| record.timestamp.clone());

    [
        bare(&record.id),
        quoted(&record.name),
        quoted(&record.email),
        // Leading apostrophe keeps spreadsheets from eating the zeros
        bare(&format!("'{}", record.phone)),
        quoted(&record.school),
        quoted(&record.member_id),
        quoted(record.purpose.tag()),
        quoted(&checked_in),
        quoted(&record.ai_greeting),
    ]
    .join(",")
}

/// Header plus one row per record, joined by `\n`, no trailing newline
pub fn export_csv(records: &[VisitorRecord], offset: FixedOffset) -> String {
    std::iter::once(CSV_HEADERS.join(","))
        .chain(records.iter().map(|r| csv_row(r, offset)))
        .collect::<Vec<_>>()
        .join("\n")
}

pub fn export_filename(period: ExportPeriod, today: NaiveDate) -> String {
    format!("Export_Pengunjung_{}_{}.csv", period, today.format("%Y-%m-%d"))
}
