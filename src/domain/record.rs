//! Income and expense records.

use std::fmt;

use chrono::NaiveDateTime;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::domain::common::{Amounted, Displayable, Identifiable, Owned};
use crate::errors::{CoreError, CoreResult};

/// Longest series the installment generator accepts.
pub const MAX_INSTALLMENTS: u32 = 48;

/// Which side of the ledger a record belongs to.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "snake_case")]
pub enum RecordKind {
    Income,
    Expense,
}

impl RecordKind {
    pub fn sign(self) -> char {
        match self {
            RecordKind::Income => '+',
            RecordKind::Expense => '-',
        }
    }
}

impl fmt::Display for RecordKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            RecordKind::Income => "Income",
            RecordKind::Expense => "Expense",
        };
        f.write_str(label)
    }
}

/// A stored income or expense.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct MonetaryRecord {
    pub id: Uuid,
    pub user_id: Uuid,
    pub kind: RecordKind,
    pub description: String,
    pub amount: Decimal,
    pub transaction_date: NaiveDateTime,
    pub installment_index: u32,
    pub installment_total: u32,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub group_id: Option<Uuid>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tag_id: Option<Uuid>,
    #[serde(default)]
    pub received: bool,
}

impl MonetaryRecord {
    /// Materializes a draft once the store has allocated its identifier.
    pub fn from_draft(id: Uuid, user_id: Uuid, draft: RecordDraft) -> Self {
        Self {
            id,
            user_id,
            kind: draft.kind,
            description: draft.description,
            amount: draft.amount,
            transaction_date: draft.transaction_date,
            installment_index: draft.installment_index,
            installment_total: draft.installment_total,
            group_id: draft.group_id,
            tag_id: draft.tag_id,
            received: draft.received,
        }
    }

    pub fn is_installment(&self) -> bool {
        self.installment_total > 1
    }

    /// Applies a full-field edit. Installment bookkeeping is left untouched.
    pub fn apply(&mut self, update: &RecordUpdate) -> CoreResult<()> {
        update.validate()?;
        self.description = update.description.trim().to_string();
        self.amount = update.amount;
        self.transaction_date = update.transaction_date;
        self.tag_id = update.tag_id;
        self.received = update.received;
        Ok(())
    }
}

impl Identifiable for MonetaryRecord {
    fn id(&self) -> Uuid {
        self.id
    }
}

impl Owned for MonetaryRecord {
    fn user_id(&self) -> Uuid {
        self.user_id
    }
}

impl Amounted for MonetaryRecord {
    fn amount(&self) -> Decimal {
        self.amount
    }
}

impl Displayable for MonetaryRecord {
    fn display_label(&self) -> String {
        if self.is_installment() {
            format!(
                "{} ({}/{})",
                self.description, self.installment_index, self.installment_total
            )
        } else {
            self.description.clone()
        }
    }
}

/// A record that has not been persisted yet.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct RecordDraft {
    pub kind: RecordKind,
    pub description: String,
    pub amount: Decimal,
    pub transaction_date: NaiveDateTime,
    pub installment_index: u32,
    pub installment_total: u32,
    pub group_id: Option<Uuid>,
    pub tag_id: Option<Uuid>,
    pub received: bool,
}

impl RecordDraft {
    /// A standalone (non-installment) record.
    pub fn single(
        kind: RecordKind,
        description: impl Into<String>,
        amount: Decimal,
        transaction_date: NaiveDateTime,
    ) -> Self {
        Self {
            kind,
            description: description.into(),
            amount,
            transaction_date,
            installment_index: 1,
            installment_total: 1,
            group_id: None,
            tag_id: None,
            received: false,
        }
    }

    pub fn with_tag(mut self, tag_id: Option<Uuid>) -> Self {
        self.tag_id = tag_id;
        self
    }

    pub fn validate(&self) -> CoreResult<()> {
        validate_description(&self.description)?;
        validate_amount(self.amount)?;
        if self.installment_total == 0
            || self.installment_index == 0
            || self.installment_index > self.installment_total
        {
            return Err(CoreError::invalid(format!(
                "installment {}/{} is out of range",
                self.installment_index, self.installment_total
            )));
        }
        if self.installment_total > 1 && self.group_id.is_none() {
            return Err(CoreError::invalid("installments require a group id"));
        }
        Ok(())
    }
}

impl Amounted for RecordDraft {
    fn amount(&self) -> Decimal {
        self.amount
    }
}

/// Editable fields of a single stored record.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct RecordUpdate {
    pub description: String,
    pub amount: Decimal,
    pub transaction_date: NaiveDateTime,
    pub tag_id: Option<Uuid>,
    #[serde(default)]
    pub received: bool,
}

impl RecordUpdate {
    /// Seeds an update from the current state of a record.
    pub fn from_record(record: &MonetaryRecord) -> Self {
        Self {
            description: record.description.clone(),
            amount: record.amount,
            transaction_date: record.transaction_date,
            tag_id: record.tag_id,
            received: record.received,
        }
    }

    pub fn validate(&self) -> CoreResult<()> {
        validate_description(&self.description)?;
        validate_amount(self.amount)
    }
}

pub(crate) fn validate_description(description: &str) -> CoreResult<()> {
    if description.trim().is_empty() {
        return Err(CoreError::invalid("description must not be empty"));
    }
    Ok(())
}

pub(crate) fn validate_amount(amount: Decimal) -> CoreResult<()> {
    if amount <= Decimal::ZERO {
        return Err(CoreError::invalid(format!(
            "amount must be positive, got {amount}"
        )));
    }
    Ok(())
}
