//! Visitors service: check-in, admin view reconciliation, stats and export

use chrono::{DateTime, FixedOffset, Utc};
use std::sync::Arc;
use tokio::{sync::RwLock, task::JoinHandle};
use validator::Validate;

use super::{
    export::{self, CsvExport},
    greeting::Greeter,
    settings::SettingsService,
    sheets::SheetsClient,
    ticket,
};
use crate::{
    config::TicketConfig,
    error::{AppError, AppResult},
    models::{
        enums::ExportPeriod,
        ticket::Ticket,
        visitor::{
            CheckInRequest, CheckInResponse, SyncOutcome, SyncResponse, ViewSource, VisitorList,
            VisitorRecord, VisitorStats,
        },
    },
    repository::Repository,
};

#[derive(Clone)]
pub struct VisitorsService {
    repository: Repository,
    sheets: SheetsClient,
    settings: SettingsService,
    greeter: Arc<dyn Greeter>,
    ticket: TicketConfig,
    offset: FixedOffset,
    /// Rows last pulled from the sheet, newest first. `None` shows the local
    /// cache. Dropped on the next check-in so new visitors are never hidden.
    remote_view: Arc<RwLock<Option<Vec<VisitorRecord>>>>,
}

impl VisitorsService {
    pub fn new(
        repository: Repository,
        sheets: SheetsClient,
        settings: SettingsService,
        greeter: Arc<dyn Greeter>,
        ticket: TicketConfig,
        offset: FixedOffset,
    ) -> Self {
        Self {
            repository,
            sheets,
            settings,
            greeter,
            ticket,
            offset,
            remote_view: Arc::new(RwLock::new(None)),
        }
    }

    fn now(&self) -> DateTime<FixedOffset> {
        Utc::now().with_timezone(&self.offset)
    }

    /// Register a visitor.
    ///
    /// The greeting is awaited because it is stored in the record. The local
    /// save completes before returning; the sheet append runs in the
    /// background and its outcome is never reported back. A synced sheet view
    /// is discarded so the admin list shows the cache again.
    pub async fn check_in(&self, request: CheckInRequest) -> AppResult<CheckInResponse> {
        request.validate()?;
        if request.name.trim().is_empty() {
            return Err(AppError::Validation("Name is required".to_string()));
        }

        let greeting = self
            .greeter
            .greet(request.name.trim(), request.purpose.tag())
            .await;
        let record = VisitorRecord::new_check_in(&request, greeting.clone(), Utc::now());

        self.repository.visitors.append(&record).await;
        if self.remote_view.write().await.take().is_some() {
            tracing::debug!("Check-in dropped the synced view, showing the local cache");
        }
        // Detached, completion is never awaited
        let _mirror = self.mirror_to_sheet(record.clone()).await;

        tracing::info!("Visitor {} checked in ({})", record.id, record.purpose);

        Ok(CheckInResponse {
            ticket: ticket::build_ticket(&record, &self.ticket, self.offset),
            visitor: record,
            greeting,
        })
    }

    /// Fire-and-forget append to the configured sheet endpoint
    pub async fn mirror_to_sheet(&self, record: VisitorRecord) -> JoinHandle<()> {
        let endpoint = self.settings.script_url().await;
        let sheets = self.sheets.clone();
        tokio::spawn(async move {
            sheets.append(&endpoint, &record).await;
        })
    }

    /// Records currently displayed to the admin
    pub async fn list(&self) -> VisitorList {
        let (source, visitors) = self.displayed().await;
        VisitorList {
            source,
            total: visitors.len(),
            visitors,
        }
    }

    async fn displayed(&self) -> (ViewSource, Vec<VisitorRecord>) {
        if let Some(remote) = self.remote_view.read().await.as_ref() {
            return (ViewSource::Remote, remote.clone());
        }
        (ViewSource::Local, self.repository.visitors.load().await)
    }

    /// Pull the sheet and let it replace the displayed list.
    ///
    /// Remote wins outright: no merge with local-only rows. An empty sheet
    /// leaves the current view alone. The local cache is never written.
    pub async fn sync(&self) -> AppResult<SyncResponse> {
        let endpoint = self.settings.script_url().await;
        let mut rows = self.sheets.fetch_all(&endpoint).await?;

        if rows.is_empty() {
            tracing::info!("Sync found no rows in the sheet, keeping current view");
            return Ok(SyncResponse {
                outcome: SyncOutcome::Empty,
                count: 0,
                message: "No data found in the sheet, or the data format is not recognised."
                    .to_string(),
            });
        }

        // The sheet appends at the bottom
        rows.reverse();
        let count = rows.len();
        *self.remote_view.write().await = Some(rows);

        tracing::info!("Sync replaced the displayed list with {} sheet rows", count);
        Ok(SyncResponse {
            outcome: SyncOutcome::Replaced,
            count,
            message: format!("Loaded {} visitors from the sheet.", count),
        })
    }

    /// Go back to showing the local cache
    pub async fn reset_view(&self) -> VisitorList {
        *self.remote_view.write().await = None;
        self.list().await
    }

    /// Wipe the local cache (confirmation required). The sheet keeps its rows.
    pub async fn clear_local(&self, confirmed: bool) -> AppResult<()> {
        self.repository.visitors.clear(confirmed).await?;
        *self.remote_view.write().await = None;
        Ok(())
    }

    pub async fn stats(&self) -> VisitorStats {
        self.stats_at(&self.now()).await
    }

    pub async fn stats_at(&self, now: &DateTime<FixedOffset>) -> VisitorStats {
        let (_, visitors) = self.displayed().await;
        VisitorStats {
            total: visitors.len(),
            today: export::filter_by_period(&visitors, ExportPeriod::Daily, now).len(),
            endpoint: self.settings.endpoint_kind().await,
        }
    }

    pub async fn export(&self, period: ExportPeriod) -> AppResult<CsvExport> {
        self.export_at(period, &self.now()).await
    }

    /// CSV of the displayed visitors falling in `period`
    pub async fn export_at(
        &self,
        period: ExportPeriod,
        now: &DateTime<FixedOffset>,
    ) -> AppResult<CsvExport> {
        let (_, visitors) = self.displayed().await;
        let selected = export::filter_by_period(&visitors, period, now);

        if selected.is_empty() {
            return Err(AppError::NotFound(format!(
                "No visitors for period: {}",
                period
            )));
        }

        tracing::info!("Exporting {} visitors ({})", selected.len(), period);
        Ok(CsvExport {
            filename: export::export_filename(period, now.with_timezone(&Utc).date_naive()),
            content: export::export_csv(&selected, self.offset),
        })
    }

    /// Ticket for a visitor held in the local cache
    pub async fn ticket(&self, id: &str) -> AppResult<Ticket> {
        let record = self
            .repository
            .visitors
            .find(id)
            .await
            .ok_or_else(|| AppError::UnknownVisitor(format!("Visitor with id {} not found", id)))?;
        Ok(ticket::build_ticket(&record, &self.ticket, self.offset))
    }
}
