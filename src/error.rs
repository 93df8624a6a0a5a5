use chrono::NaiveDate;
use thiserror::Error;

use crate::schema::NodeLevel;

#[derive(Error, Debug)]
pub enum ReconcileError {
    #[error("orphan {level} node {id} ({name}) references missing parent {parent_id}")]
    OrphanNode {
        level: NodeLevel,
        id: i64,
        name: String,
        parent_id: i64,
    },

    #[error("transaction dated {date} references unknown {level} id {id}")]
    UnknownNodeRef {
        level: NodeLevel,
        id: i64,
        date: NaiveDate,
    },

    #[error("invalid month {0}: must be between 1 and 12")]
    InvalidMonth(u32),

    #[error("window start {start} is after window end {end}")]
    WindowOrder { start: NaiveDate, end: NaiveDate },
}

pub type Result<T> = std::result::Result<T, ReconcileError>;
