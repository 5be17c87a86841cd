//! Publication record - one immutable snapshot in a decision's history.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::domain::foundation::Timestamp;

/// One entry in a decision's append-only publication history.
///
/// Order 1 is the original publication; order N is the (N-1)-th
/// republication. Each record snapshots the ementa as it read at
/// publication time. Never edited or deleted.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Publication {
    order: u32,
    publication_number: String,
    publication_date: NaiveDate,
    ementa_title: String,
    ementa_body: String,
    /// Required for every republication, absent on the original.
    republish_reason: Option<String>,
    published_at: Timestamp,
}

impl Publication {
    pub(crate) fn new(
        order: u32,
        publication_number: String,
        publication_date: NaiveDate,
        ementa_title: String,
        ementa_body: String,
        republish_reason: Option<String>,
    ) -> Self {
        Self {
            order,
            publication_number,
            publication_date,
            ementa_title,
            ementa_body,
            republish_reason,
            published_at: Timestamp::now(),
        }
    }

    /// Reconstitute a publication from persistence.
    pub fn reconstitute(
        order: u32,
        publication_number: String,
        publication_date: NaiveDate,
        ementa_title: String,
        ementa_body: String,
        republish_reason: Option<String>,
        published_at: Timestamp,
    ) -> Self {
        Self {
            order,
            publication_number,
            publication_date,
            ementa_title,
            ementa_body,
            republish_reason,
            published_at,
        }
    }

    pub fn order(&self) -> u32 {
        self.order
    }

    pub fn publication_number(&self) -> &str {
        &self.publication_number
    }

    pub fn publication_date(&self) -> NaiveDate {
        self.publication_date
    }

    pub fn ementa_title(&self) -> &str {
        &self.ementa_title
    }

    pub fn ementa_body(&self) -> &str {
        &self.ementa_body
    }

    pub fn republish_reason(&self) -> Option<&str> {
        self.republish_reason.as_deref()
    }

    pub fn published_at(&self) -> &Timestamp {
        &self.published_at
    }

    pub fn is_original(&self) -> bool {
        self.order == 1
    }
}
