use log::trace;
use sqlx::{QueryBuilder, Sqlite, SqliteConnection};

use crate::{
    db_types::CustomOrderId,
    fpe_api::transaction_objects::{TransactionDetail, TransactionFilter, TransactionQuery, TransactionSummary},
};

const JOIN: &str = "FROM orders o LEFT JOIN order_statuses s ON s.collect_id = o.id";

const SUMMARY_COLUMNS: &str = r#"
    o.id AS collect_id,
    o.school_id,
    o.gateway_name AS gateway,
    o.custom_order_id,
    o.student_name,
    o.student_email,
    s.order_amount,
    s.transaction_amount,
    s.status,
    s.payment_mode,
    s.payment_time,
    s.bank_reference
"#;

const DETAIL_COLUMNS: &str = r#"
    o.id AS collect_id,
    o.custom_order_id,
    o.school_id,
    o.student_name,
    o.student_id,
    o.student_email,
    o.gateway_name AS gateway,
    s.order_amount,
    s.transaction_amount,
    s.status,
    s.payment_mode,
    s.payment_details,
    s.bank_reference,
    s.payment_message,
    s.error_message,
    s.payment_time
"#;

fn push_filter(builder: &mut QueryBuilder<'_, Sqlite>, filter: &TransactionFilter) {
    if filter.is_empty() {
        return;
    }
    builder.push(" WHERE ");
    let mut where_clause = builder.separated(" AND ");
    if let Some(school_id) = &filter.school_id {
        where_clause.push("o.school_id = ");
        where_clause.push_bind_unseparated(school_id.clone());
    }
    if let Some(status) = filter.status {
        where_clause.push("s.status = ");
        where_clause.push_bind_unseparated(status);
    }
}

/// Fetches one page of the orders/statuses join.
///
/// Ties on the sort field are broken by the order id, in the same direction, so that pages are stable.
pub async fn fetch_transactions(
    query: &TransactionQuery,
    conn: &mut SqliteConnection,
) -> Result<Vec<TransactionSummary>, sqlx::Error> {
    let mut builder = QueryBuilder::new(format!("SELECT {SUMMARY_COLUMNS} {JOIN}"));
    push_filter(&mut builder, &query.filter);
    let direction = query.order.sql();
    builder.push(format!(" ORDER BY {} {direction}, o.id {direction}", query.sort.column()));
    builder.push(" LIMIT ");
    builder.push_bind(query.paging.limit);
    builder.push(" OFFSET ");
    builder.push_bind(query.paging.offset());
    trace!("📝️ Executing query: {}", builder.sql());
    let transactions = builder.build_query_as::<TransactionSummary>().fetch_all(conn).await?;
    trace!("📝️ Result of fetch_transactions: {}", transactions.len());
    Ok(transactions)
}

pub async fn count_transactions(filter: &TransactionFilter, conn: &mut SqliteConnection) -> Result<i64, sqlx::Error> {
    let mut builder = QueryBuilder::new(format!("SELECT COUNT(*) {JOIN}"));
    push_filter(&mut builder, filter);
    trace!("📝️ Executing query: {}", builder.sql());
    let count = builder.build_query_scalar::<i64>().fetch_one(conn).await?;
    Ok(count)
}

pub async fn fetch_transaction_detail(
    custom_order_id: &CustomOrderId,
    conn: &mut SqliteConnection,
) -> Result<Option<TransactionDetail>, sqlx::Error> {
    let sql = format!("SELECT {DETAIL_COLUMNS} {JOIN} WHERE o.custom_order_id = $1");
    sqlx::query_as(&sql).bind(custom_order_id.as_str()).fetch_optional(conn).await
}
