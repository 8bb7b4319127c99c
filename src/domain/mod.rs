pub mod common;
pub mod period;
pub mod record;
pub mod tag;

pub use common::{Amounted, Displayable, Identifiable, NamedEntity, Owned};
pub use period::{DateRange, PeriodKind};
pub use record::{MonetaryRecord, RecordDraft, RecordKind, RecordUpdate, MAX_INSTALLMENTS};
pub use tag::{Tag, TagColor, TagDraft, TextColor};
