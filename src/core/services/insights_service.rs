//! Per-tag view: one period's activity and all-time totals for a single tag.

use chrono::NaiveDate;
use uuid::Uuid;

use crate::core::services::dashboard_service::fetch_both;
use crate::core::services::summary_service::{PeriodSummary, SummaryService, Totals};
use crate::core::services::{ServiceError, ServiceResult};
use crate::domain::{DateRange, Owned, PeriodKind, Tag};
use crate::storage::{DataStore, RecordQuery};

#[derive(Debug, Clone, PartialEq)]
pub struct TagInsights {
    pub tag: Tag,
    pub period: PeriodSummary,
    pub all_time: Totals,
}

pub struct InsightsService;

impl InsightsService {
    pub fn for_tag(
        store: &dyn DataStore,
        user_id: Uuid,
        tag_id: Uuid,
        period: PeriodKind,
        anchor: NaiveDate,
    ) -> ServiceResult<TagInsights> {
        let tag = store.get_tag(tag_id)?;
        if !tag.is_owned_by(user_id) {
            return Err(ServiceError::Invalid(format!(
                "tag {tag_id} does not belong to the current user"
            )));
        }

        let base = RecordQuery::for_user(user_id).with_tag(tag_id);
        let range = DateRange::for_period(period, anchor);
        let (incomes, expenses) = fetch_both(store, base.in_range(range))?;
        let summary = SummaryService::summarize(&incomes, &expenses, period, anchor);

        let (all_incomes, all_expenses) = fetch_both(store, base)?;
        let all_time = SummaryService::all_time_totals(&all_incomes, &all_expenses);

        Ok(TagInsights {
            tag,
            period: summary,
            all_time,
        })
    }
}
