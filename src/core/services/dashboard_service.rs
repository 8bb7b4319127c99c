use chrono::NaiveDate;
use rust_decimal::Decimal;
use tracing::debug;
use uuid::Uuid;

use crate::core::services::search::filter_entries;
use crate::core::services::summary_service::{PeriodSummary, SummaryService};
use crate::core::services::ServiceResult;
use crate::domain::{DateRange, MonetaryRecord, PeriodKind, RecordKind};
use crate::storage::{DataStore, RecordQuery};

/// What the home screen shows for one period.
#[derive(Debug, Clone, PartialEq)]
pub struct DashboardView {
    pub summary: PeriodSummary,
    /// Only computed for day views.
    pub month_to_date_balance: Option<Decimal>,
    /// `summary.transactions` narrowed by the search text.
    pub visible: Vec<MonetaryRecord>,
}

pub struct DashboardService;

impl DashboardService {
    pub fn load(
        store: &dyn DataStore,
        user_id: Uuid,
        period: PeriodKind,
        anchor: NaiveDate,
        search: &str,
    ) -> ServiceResult<DashboardView> {
        let range = DateRange::for_period(period, anchor);
        let query = RecordQuery::for_user(user_id).in_range(range);
        let (incomes, expenses) = fetch_both(store, query)?;
        let summary = SummaryService::summarize(&incomes, &expenses, period, anchor);

        let month_to_date_balance = if period == PeriodKind::Day {
            let mtd = RecordQuery::for_user(user_id).in_range(DateRange::month_to_date(anchor));
            let (incomes, expenses) = fetch_both(store, mtd)?;
            Some(SummaryService::month_to_date_balance(&incomes, &expenses, anchor))
        } else {
            None
        };

        let visible = filter_entries(&summary.transactions, search);
        debug!(
            %period,
            %anchor,
            total = summary.transactions.len(),
            visible = visible.len(),
            "loaded dashboard"
        );
        Ok(DashboardView {
            summary,
            month_to_date_balance,
            visible,
        })
    }
}

pub(crate) fn fetch_both(
    store: &dyn DataStore,
    query: RecordQuery,
) -> ServiceResult<(Vec<MonetaryRecord>, Vec<MonetaryRecord>)> {
    let incomes = store.fetch(RecordKind::Income, &query)?;
    let expenses = store.fetch(RecordKind::Expense, &query)?;
    Ok((incomes, expenses))
}
