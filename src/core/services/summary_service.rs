use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::domain::common::total;
use crate::domain::{DateRange, MonetaryRecord, PeriodKind, RecordKind};

/// Totals and merged feed for one period.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct PeriodSummary {
    pub period: PeriodKind,
    pub anchor: NaiveDate,
    pub range: DateRange,
    pub totals: Totals,
    /// Incomes and expenses inside the range, newest first.
    pub transactions: Vec<MonetaryRecord>,
}

#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct Totals {
    pub income: Decimal,
    pub expense: Decimal,
    pub balance: Decimal,
}

impl Totals {
    pub fn new(income: Decimal, expense: Decimal) -> Self {
        Self {
            income,
            expense,
            balance: income - expense,
        }
    }
}

pub struct SummaryService;

impl SummaryService {
    /// Filters both lists into the period's range, sums them and merges them
    /// into a single feed sorted by date descending. Records are stamped with
    /// the kind of the list they came from; ties keep incomes-then-expenses
    /// input order.
    pub fn summarize(
        incomes: &[MonetaryRecord],
        expenses: &[MonetaryRecord],
        period: PeriodKind,
        anchor: NaiveDate,
    ) -> PeriodSummary {
        let range = DateRange::for_period(period, anchor);
        let incomes = in_range(incomes, &range, RecordKind::Income);
        let expenses = in_range(expenses, &range, RecordKind::Expense);
        let totals = Totals::new(total(&incomes), total(&expenses));

        let mut transactions = incomes;
        transactions.extend(expenses);
        transactions.sort_by(|a, b| b.transaction_date.cmp(&a.transaction_date));

        debug!(
            %period,
            %anchor,
            entries = transactions.len(),
            balance = %totals.balance,
            "summarized period"
        );
        PeriodSummary {
            period,
            anchor,
            range,
            totals,
            transactions,
        }
    }

    /// Balance from the first of the anchor's month through the end of the anchor day.
    pub fn month_to_date_balance(
        incomes: &[MonetaryRecord],
        expenses: &[MonetaryRecord],
        anchor: NaiveDate,
    ) -> Decimal {
        Self::totals_in(incomes, expenses, &DateRange::month_to_date(anchor)).balance
    }

    pub fn totals_in(
        incomes: &[MonetaryRecord],
        expenses: &[MonetaryRecord],
        range: &DateRange,
    ) -> Totals {
        let sum = |records: &[MonetaryRecord]| {
            total(
                records
                    .iter()
                    .filter(|record| range.contains(record.transaction_date)),
            )
        };
        Totals::new(sum(incomes), sum(expenses))
    }

    /// Totals across every record regardless of date.
    pub fn all_time_totals(incomes: &[MonetaryRecord], expenses: &[MonetaryRecord]) -> Totals {
        Totals::new(total(incomes), total(expenses))
    }
}

fn in_range(
    records: &[MonetaryRecord],
    range: &DateRange,
    kind: RecordKind,
) -> Vec<MonetaryRecord> {
    records
        .iter()
        .filter(|record| range.contains(record.transaction_date))
        .cloned()
        .map(|mut record| {
            record.kind = kind;
            record
        })
        .collect()
}
