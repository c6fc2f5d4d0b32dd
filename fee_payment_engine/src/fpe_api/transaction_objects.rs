use std::{fmt::Display, str::FromStr};

use chrono::{DateTime, Utc};
use fpg_common::FeeAmount;
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

use crate::{
    db_types::{CustomOrderId, PaymentStatus, StudentInfo},
    fpe_api::errors::TransactionQueryError,
    helpers::parse_leading_int,
};

pub const DEFAULT_PAGE: i64 = 1;
pub const DEFAULT_LIMIT: i64 = 10;

//--------------------------------------      Sorting        ---------------------------------------------------------
/// The transaction fields that reports can be sorted on.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum SortField {
    #[default]
    PaymentTime,
    CollectId,
    SchoolId,
    Gateway,
    CustomOrderId,
    StudentName,
    StudentEmail,
    OrderAmount,
    TransactionAmount,
    Status,
    PaymentMode,
    BankReference,
}

impl SortField {
    /// The SQL expression for this field in the orders/statuses join.
    pub fn column(&self) -> &'static str {
        match self {
            SortField::PaymentTime => "s.payment_time",
            SortField::CollectId => "o.id",
            SortField::SchoolId => "o.school_id",
            SortField::Gateway => "o.gateway_name",
            SortField::CustomOrderId => "o.custom_order_id",
            SortField::StudentName => "o.student_name",
            SortField::StudentEmail => "o.student_email",
            SortField::OrderAmount => "s.order_amount",
            SortField::TransactionAmount => "s.transaction_amount",
            SortField::Status => "s.status",
            SortField::PaymentMode => "s.payment_mode",
            SortField::BankReference => "s.bank_reference",
        }
    }
}

impl FromStr for SortField {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim() {
            "payment_time" => Ok(Self::PaymentTime),
            "collect_id" => Ok(Self::CollectId),
            "school_id" => Ok(Self::SchoolId),
            "gateway" => Ok(Self::Gateway),
            "custom_order_id" => Ok(Self::CustomOrderId),
            "student_name" => Ok(Self::StudentName),
            "student_email" => Ok(Self::StudentEmail),
            "order_amount" => Ok(Self::OrderAmount),
            "transaction_amount" => Ok(Self::TransactionAmount),
            "status" => Ok(Self::Status),
            "payment_mode" => Ok(Self::PaymentMode),
            "bank_reference" => Ok(Self::BankReference),
            _ => Err(format!("Cannot sort transactions by '{s}'")),
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum SortOrder {
    Asc,
    #[default]
    Desc,
}

impl SortOrder {
    /// `asc` sorts ascending. Anything else, including no value, sorts descending.
    pub fn from_param(param: Option<&str>) -> Self {
        match param {
            Some("asc") => SortOrder::Asc,
            _ => SortOrder::Desc,
        }
    }

    pub fn sql(&self) -> &'static str {
        match self {
            SortOrder::Asc => "ASC",
            SortOrder::Desc => "DESC",
        }
    }
}

//--------------------------------------      Paging         ---------------------------------------------------------
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Paging {
    pub page: i64,
    pub limit: i64,
}

impl Default for Paging {
    fn default() -> Self {
        Self { page: DEFAULT_PAGE, limit: DEFAULT_LIMIT }
    }
}

impl Paging {
    /// Reads `page` and `limit` from raw query values. Missing, non-numeric or non-positive values fall back to the
    /// defaults of page 1 and 10 records per page.
    pub fn from_params(page: Option<&str>, limit: Option<&str>) -> Self {
        let read = |v: Option<&str>, default: i64| v.and_then(parse_leading_int).filter(|v| *v > 0).unwrap_or(default);
        Self { page: read(page, DEFAULT_PAGE), limit: read(limit, DEFAULT_LIMIT) }
    }

    pub fn offset(&self) -> i64 {
        (self.page - 1).saturating_mul(self.limit)
    }
}

/// Raw query-string parameters accepted by the transaction listing endpoints.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct TransactionListParams {
    pub page: Option<String>,
    pub limit: Option<String>,
    pub sort: Option<String>,
    pub order: Option<String>,
    pub status: Option<String>,
}

impl TransactionListParams {
    pub fn paging(&self) -> Paging {
        Paging::from_params(self.page.as_deref(), self.limit.as_deref())
    }
}

//--------------------------------------   Query filters     ---------------------------------------------------------
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TransactionFilter {
    pub school_id: Option<String>,
    pub status: Option<PaymentStatus>,
}

impl TransactionFilter {
    pub fn with_school_id<S: Into<String>>(mut self, school_id: S) -> Self {
        self.school_id = Some(school_id.into());
        self
    }

    pub fn with_status(mut self, status: PaymentStatus) -> Self {
        self.status = Some(status);
        self
    }

    /// Parses and applies an optional status filter from a query parameter. Blank values are ignored.
    pub fn with_status_param(self, status: Option<&str>) -> Result<Self, TransactionQueryError> {
        match status.map(str::trim).filter(|s| !s.is_empty()) {
            Some(s) => {
                let status = PaymentStatus::from_str(s).map_err(|e| TransactionQueryError::QueryError(e.to_string()))?;
                Ok(self.with_status(status))
            },
            None => Ok(self),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.school_id.is_none() && self.status.is_none()
    }
}

impl Display for TransactionFilter {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        if self.is_empty() {
            return write!(f, "No filters.");
        }
        if let Some(school_id) = &self.school_id {
            write!(f, "school_id: {school_id}. ")?;
        }
        if let Some(status) = &self.status {
            write!(f, "status: {status}. ")?;
        }
        Ok(())
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TransactionQuery {
    pub filter: TransactionFilter,
    pub sort: SortField,
    pub order: SortOrder,
    pub paging: Paging,
}

impl TransactionQuery {
    pub fn new(filter: TransactionFilter, paging: Paging) -> Self {
        Self { filter, paging, ..Default::default() }
    }

    pub fn sorted_by(mut self, sort: SortField, order: SortOrder) -> Self {
        self.sort = sort;
        self.order = order;
        self
    }
}

//--------------------------------------   Query results     ---------------------------------------------------------
/// One row of a transaction report. Status fields are empty for orders without a status record.
#[derive(Debug, Clone, PartialEq, Eq, FromRow, Serialize)]
pub struct TransactionSummary {
    pub collect_id: i64,
    pub school_id: String,
    pub gateway: String,
    pub custom_order_id: CustomOrderId,
    pub student_name: String,
    pub student_email: String,
    pub order_amount: Option<FeeAmount>,
    pub transaction_amount: Option<FeeAmount>,
    pub status: Option<PaymentStatus>,
    pub payment_mode: Option<String>,
    pub payment_time: Option<DateTime<Utc>>,
    pub bank_reference: Option<String>,
}

/// The full view of a single transaction.
#[derive(Debug, Clone, PartialEq, Eq, FromRow, Serialize)]
pub struct TransactionDetail {
    pub collect_id: i64,
    pub custom_order_id: CustomOrderId,
    pub school_id: String,
    #[sqlx(flatten)]
    pub student_info: StudentInfo,
    pub gateway: String,
    pub order_amount: Option<FeeAmount>,
    pub transaction_amount: Option<FeeAmount>,
    pub status: Option<PaymentStatus>,
    pub payment_mode: Option<String>,
    pub payment_details: Option<String>,
    pub bank_reference: Option<String>,
    pub payment_message: Option<String>,
    pub error_message: Option<String>,
    pub payment_time: Option<DateTime<Utc>>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct PaginationInfo {
    pub current_page: i64,
    pub total_pages: i64,
    pub total_records: i64,
    pub limit: i64,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TransactionPage {
    pub transactions: Vec<TransactionSummary>,
    pub pagination: PaginationInfo,
}
