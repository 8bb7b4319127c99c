//! Expands one recurring request into dated installment drafts.

use chrono::NaiveDateTime;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use tracing::debug;
use uuid::Uuid;

use crate::domain::period::shift_month_time;
use crate::domain::record::{validate_description, RecordDraft, RecordKind, MAX_INSTALLMENTS};
use crate::errors::{CoreError, CoreResult};

/// Smallest series worth grouping; a single entry is a plain record.
pub const MIN_INSTALLMENTS: u32 = 2;

/// Input for an installment expense or a recurring income.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct RecurrenceRequest {
    pub kind: RecordKind,
    pub description: String,
    pub start_date: NaiveDateTime,
    pub count: u32,
    pub base_amount: Decimal,
    /// `Some` switches on per-installment amounts; missing indexes fall back to
    /// `base_amount`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub overrides: Option<Vec<Decimal>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tag_id: Option<Uuid>,
}

impl RecurrenceRequest {
    pub fn new(
        kind: RecordKind,
        description: impl Into<String>,
        start_date: NaiveDateTime,
        count: u32,
        base_amount: Decimal,
    ) -> Self {
        Self {
            kind,
            description: description.into(),
            start_date,
            count,
            base_amount,
            overrides: None,
            tag_id: None,
        }
    }

    pub fn with_overrides(mut self, overrides: Vec<Decimal>) -> Self {
        self.overrides = Some(overrides);
        self
    }

    pub fn with_tag(mut self, tag_id: Option<Uuid>) -> Self {
        self.tag_id = tag_id;
        self
    }

    /// Amount for the zero-based installment `index`.
    pub fn amount_at(&self, index: usize) -> Decimal {
        self.overrides
            .as_ref()
            .and_then(|values| values.get(index).copied())
            .unwrap_or(self.base_amount)
    }
}

pub struct RecurrenceService;

impl RecurrenceService {
    /// Generates `request.count` drafts sharing a freshly allocated group id.
    pub fn generate(request: &RecurrenceRequest) -> CoreResult<Vec<RecordDraft>> {
        Self::generate_with_group(request, Uuid::new_v4())
    }

    /// Installment `i` (zero-based) falls `i` calendar months after the start,
    /// clamped to the last day of shorter months. Each date is computed from the
    /// start date, so a series starting on the 31st returns to the 31st.
    pub fn generate_with_group(
        request: &RecurrenceRequest,
        group_id: Uuid,
    ) -> CoreResult<Vec<RecordDraft>> {
        Self::validate(request)?;
        let description = request.description.trim().to_string();
        let drafts: Vec<RecordDraft> = (0..request.count)
            .map(|i| RecordDraft {
                kind: request.kind,
                description: description.clone(),
                amount: request.amount_at(i as usize),
                transaction_date: shift_month_time(request.start_date, i as i32),
                installment_index: i + 1,
                installment_total: request.count,
                group_id: Some(group_id),
                tag_id: request.tag_id,
                received: false,
            })
            .collect();
        debug!(
            group = %group_id,
            count = request.count,
            kind = %request.kind,
            "generated installment series"
        );
        Ok(drafts)
    }

    fn validate(request: &RecurrenceRequest) -> CoreResult<()> {
        if !(MIN_INSTALLMENTS..=MAX_INSTALLMENTS).contains(&request.count) {
            return Err(CoreError::invalid(format!(
                "installment count {} is outside {MIN_INSTALLMENTS}..={MAX_INSTALLMENTS}",
                request.count
            )));
        }
        validate_description(&request.description)?;
        if let Some(overrides) = &request.overrides {
            if overrides.len() > request.count as usize {
                return Err(CoreError::invalid(format!(
                    "{} per-installment amounts given for {} installments",
                    overrides.len(),
                    request.count
                )));
            }
        }
        for index in 0..request.count as usize {
            let amount = request.amount_at(index);
            if amount <= Decimal::ZERO {
                return Err(CoreError::invalid(format!(
                    "installment {} has non-positive amount {amount}",
                    index + 1
                )));
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;
    use rust_decimal_macros::dec;

    fn start(y: i32, m: u32, d: u32) -> NaiveDateTime {
        NaiveDate::from_ymd_opt(y, m, d)
            .unwrap()
            .and_hms_opt(9, 30, 0)
            .unwrap()
    }

    #[test]
    fn month_end_start_clamps_then_recovers() {
        let request =
            RecurrenceRequest::new(RecordKind::Expense, "Gym", start(2025, 1, 31), 3, dec!(100));
        let drafts = RecurrenceService::generate(&request).unwrap();
        let dates: Vec<_> = drafts.iter().map(|d| d.transaction_date).collect();
        assert_eq!(dates, vec![start(2025, 1, 31), start(2025, 2, 28), start(2025, 3, 31)]);
    }

    #[test]
    fn overrides_fill_missing_indexes_with_base() {
        let request =
            RecurrenceRequest::new(RecordKind::Expense, "TV", start(2025, 5, 10), 3, dec!(50))
                .with_overrides(vec![dec!(80), dec!(20)]);
        let amounts: Vec<_> = RecurrenceService::generate(&request)
            .unwrap()
            .into_iter()
            .map(|d| d.amount)
            .collect();
        assert_eq!(amounts, vec![dec!(80), dec!(20), dec!(50)]);
    }

    #[test]
    fn zero_base_is_fine_when_overrides_cover_everything() {
        let request =
            RecurrenceRequest::new(RecordKind::Income, "Freelance", start(2025, 5, 1), 2, dec!(0))
                .with_overrides(vec![dec!(1500), dec!(900)]);
        assert_eq!(RecurrenceService::generate(&request).unwrap().len(), 2);
    }

    #[test]
    fn rejects_invalid_requests() {
        let base =
            RecurrenceRequest::new(RecordKind::Expense, "Car", start(2025, 1, 1), 12, dec!(10));

        let mut one = base.clone();
        one.count = 1;
        assert!(matches!(RecurrenceService::generate(&one), Err(CoreError::InvalidInput(_))));

        let mut too_many = base.clone();
        too_many.count = 49;
        assert!(RecurrenceService::generate(&too_many).is_err());

        let mut blank = base.clone();
        blank.description = " ".into();
        assert!(RecurrenceService::generate(&blank).is_err());

        let mut free = base.clone();
        free.base_amount = dec!(0);
        assert!(RecurrenceService::generate(&free).is_err());

        let partial = RecurrenceRequest { base_amount: dec!(0), ..base.clone() }
            .with_overrides(vec![dec!(5)]);
        assert!(RecurrenceService::generate(&partial).is_err());

        let negative_override = base.clone().with_overrides(vec![dec!(5), dec!(-1)]);
        assert!(RecurrenceService::generate(&negative_override).is_err());
    }
}
