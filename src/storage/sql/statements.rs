//! Backend-independent sea-query statements for the dashboard reads.
//!
//! Every builder returns an owned statement; rendering to a dialect happens
//! in `SqlDatabase::build_select` / `build_insert`.

use sea_query::{
    Alias, Asterisk, Condition, Expr, Func, InsertStatement, IntoColumnRef, Order, Query,
    SelectStatement, SimpleExpr,
};

use super::SqlDatabase;
use crate::model::{Customer, Invoice, InvoiceStatus, Revenue as RevenuePoint};
use crate::query::{CustomerFilter, InvoiceFilter, PageWindow};
use crate::storage::schema::{Aggregates, Customers, Invoices, Revenue};
use crate::utils::format::to_iso8601;

/// Case-insensitive substring match in the backend's dialect.
///
/// The pattern is expected to be lowercased and escaped already.
fn contains<DB: SqlDatabase, C: IntoColumnRef>(col: C, pattern: &str) -> SimpleExpr {
    DB::contains_insensitive(col.into_column_ref(), pattern)
}

/// `SUM(expr)` cast back to a 64-bit integer.
///
/// PostgreSQL widens `SUM(bigint)` to `numeric`; the cast keeps both
/// backends decoding to `i64`.
fn sum_as_bigint(expr: impl Into<SimpleExpr>) -> SimpleExpr {
    Func::cast_as(Func::sum(expr), Alias::new("BIGINT")).into()
}

pub fn revenue() -> SelectStatement {
    Query::select()
        .columns([Revenue::Month, Revenue::Revenue])
        .from(Revenue::Table)
        .to_owned()
}

/// Invoices inner-joined with their customer's display fields, no filter.
fn invoices_with_customers() -> SelectStatement {
    Query::select()
        .columns([
            (Invoices::Table, Invoices::Id),
            (Invoices::Table, Invoices::CustomerId),
            (Invoices::Table, Invoices::Amount),
            (Invoices::Table, Invoices::Date),
            (Invoices::Table, Invoices::Status),
        ])
        .columns([
            (Customers::Table, Customers::Name),
            (Customers::Table, Customers::Email),
            (Customers::Table, Customers::ImageUrl),
        ])
        .from(Invoices::Table)
        .inner_join(
            Customers::Table,
            Expr::col((Customers::Table, Customers::Id))
                .equals((Invoices::Table, Invoices::CustomerId)),
        )
        .to_owned()
}

/// Newest first by instant; id breaks ties so pages are stable across calls.
fn order_newest_first<DB: SqlDatabase>(stmt: &mut SelectStatement) -> &mut SelectStatement {
    let date = (Invoices::Table, Invoices::Date).into_column_ref();
    stmt.order_by_expr(DB::date_sort_key(date), Order::Desc)
        .order_by((Invoices::Table, Invoices::Id), Order::Desc)
}

pub fn latest_invoices<DB: SqlDatabase>(limit: u64) -> SelectStatement {
    let mut stmt = invoices_with_customers();
    order_newest_first::<DB>(&mut stmt).limit(limit).to_owned()
}

pub fn count_invoices() -> SelectStatement {
    Query::select()
        .expr_as(Func::count(Expr::col(Asterisk)), Aggregates::Count)
        .from(Invoices::Table)
        .to_owned()
}

pub fn count_customers() -> SelectStatement {
    Query::select()
        .expr_as(Func::count(Expr::col(Asterisk)), Aggregates::Count)
        .from(Customers::Table)
        .to_owned()
}

pub fn sum_amount_by_status(status: InvoiceStatus) -> SelectStatement {
    Query::select()
        .expr_as(sum_as_bigint(Expr::col(Invoices::Amount)), Aggregates::Total)
        .from(Invoices::Table)
        .and_where(Expr::col(Invoices::Status).eq(status.as_str()))
        .to_owned()
}

/// OR of the four invoice search clauses; the amount clause only when the
/// term is numeric.
pub fn invoice_condition<DB: SqlDatabase>(filter: &InvoiceFilter) -> Condition {
    let pattern = filter.like_pattern();

    Condition::any()
        .add(contains::<DB, _>((Customers::Table, Customers::Name), &pattern))
        .add(contains::<DB, _>((Customers::Table, Customers::Email), &pattern))
        .add_option(
            filter
                .amount()
                .map(|amount| Expr::col((Invoices::Table, Invoices::Amount)).eq(amount)),
        )
        .add(contains::<DB, _>((Invoices::Table, Invoices::Status), &pattern))
}

pub fn find_invoices<DB: SqlDatabase>(
    filter: &InvoiceFilter,
    window: PageWindow,
) -> SelectStatement {
    let mut stmt = invoices_with_customers();
    stmt.cond_where(invoice_condition::<DB>(filter));
    order_newest_first::<DB>(&mut stmt)
        .limit(window.limit)
        .offset(window.offset)
        .to_owned()
}

/// Same join and predicate as [`find_invoices`], counted instead of paged.
pub fn count_invoices_matching<DB: SqlDatabase>(filter: &InvoiceFilter) -> SelectStatement {
    Query::select()
        .expr_as(Func::count(Expr::col(Asterisk)), Aggregates::Count)
        .from(Invoices::Table)
        .inner_join(
            Customers::Table,
            Expr::col((Customers::Table, Customers::Id))
                .equals((Invoices::Table, Invoices::CustomerId)),
        )
        .cond_where(invoice_condition::<DB>(filter))
        .to_owned()
}

pub fn invoice_by_id(id: &str) -> SelectStatement {
    Query::select()
        .columns([
            Invoices::Id,
            Invoices::CustomerId,
            Invoices::Amount,
            Invoices::Status,
        ])
        .from(Invoices::Table)
        .and_where(Expr::col(Invoices::Id).eq(id))
        .to_owned()
}

pub fn customers_by_name() -> SelectStatement {
    Query::select()
        .columns([Customers::Id, Customers::Name])
        .from(Customers::Table)
        .order_by(Customers::Name, Order::Asc)
        .order_by(Customers::Id, Order::Asc)
        .to_owned()
}

pub fn customer_condition<DB: SqlDatabase>(filter: &CustomerFilter) -> Condition {
    let pattern = filter.like_pattern();

    Condition::any()
        .add(contains::<DB, _>((Customers::Table, Customers::Name), &pattern))
        .add(contains::<DB, _>((Customers::Table, Customers::Email), &pattern))
}

pub fn matching_customers<DB: SqlDatabase>(filter: &CustomerFilter) -> SelectStatement {
    Query::select()
        .columns([
            (Customers::Table, Customers::Id),
            (Customers::Table, Customers::Name),
            (Customers::Table, Customers::Email),
            (Customers::Table, Customers::ImageUrl),
        ])
        .from(Customers::Table)
        .cond_where(customer_condition::<DB>(filter))
        .order_by((Customers::Table, Customers::Name), Order::Asc)
        .order_by((Customers::Table, Customers::Id), Order::Asc)
        .to_owned()
}

pub fn invoices_for_customers(customer_ids: &[String]) -> SelectStatement {
    Query::select()
        .columns([
            Invoices::Id,
            Invoices::CustomerId,
            Invoices::Amount,
            Invoices::Status,
        ])
        .from(Invoices::Table)
        .and_where(Expr::col(Invoices::CustomerId).is_in(customer_ids.iter().cloned()))
        .order_by(Invoices::Id, Order::Asc)
        .to_owned()
}

/// Per-customer COUNT and status-scoped SUMs computed in one grouped read.
pub fn customer_rollups<DB: SqlDatabase>(filter: &CustomerFilter) -> SelectStatement {
    let status_total = |status: InvoiceStatus| -> SimpleExpr {
        let amount_if_status = Expr::case(
            Expr::col((Invoices::Table, Invoices::Status)).eq(status.as_str()),
            Expr::col((Invoices::Table, Invoices::Amount)),
        )
        .finally(Expr::val(0));

        Func::coalesce([sum_as_bigint(amount_if_status), Expr::val(0).into()]).into()
    };

    Query::select()
        .columns([
            (Customers::Table, Customers::Id),
            (Customers::Table, Customers::Name),
            (Customers::Table, Customers::Email),
            (Customers::Table, Customers::ImageUrl),
        ])
        .expr_as(
            Func::count(Expr::col((Invoices::Table, Invoices::Id))),
            Aggregates::TotalInvoices,
        )
        .expr_as(status_total(InvoiceStatus::Pending), Aggregates::TotalPending)
        .expr_as(status_total(InvoiceStatus::Paid), Aggregates::TotalPaid)
        .from(Customers::Table)
        .left_join(
            Invoices::Table,
            Expr::col((Invoices::Table, Invoices::CustomerId))
                .equals((Customers::Table, Customers::Id)),
        )
        .cond_where(customer_condition::<DB>(filter))
        .group_by_col((Customers::Table, Customers::Id))
        .group_by_col((Customers::Table, Customers::Name))
        .group_by_col((Customers::Table, Customers::Email))
        .group_by_col((Customers::Table, Customers::ImageUrl))
        .order_by((Customers::Table, Customers::Name), Order::Asc)
        .order_by((Customers::Table, Customers::Id), Order::Asc)
        .to_owned()
}

pub fn insert_customer(customer: &Customer) -> InsertStatement {
    Query::insert()
        .into_table(Customers::Table)
        .columns([
            Customers::Id,
            Customers::Name,
            Customers::Email,
            Customers::ImageUrl,
        ])
        .values_panic([
            customer.id.clone().into(),
            customer.name.clone().into(),
            customer.email.clone().into(),
            customer.image_url.clone().into(),
        ])
        .to_owned()
}

pub fn insert_invoice(invoice: &Invoice) -> InsertStatement {
    Query::insert()
        .into_table(Invoices::Table)
        .columns([
            Invoices::Id,
            Invoices::CustomerId,
            Invoices::Amount,
            Invoices::Date,
            Invoices::Status,
        ])
        .values_panic([
            invoice.id.clone().into(),
            invoice.customer_id.clone().into(),
            invoice.amount.into(),
            to_iso8601(&invoice.date).into(),
            invoice.status.as_str().into(),
        ])
        .to_owned()
}

pub fn insert_revenue(point: &RevenuePoint) -> InsertStatement {
    Query::insert()
        .into_table(Revenue::Table)
        .columns([Revenue::Month, Revenue::Revenue])
        .values_panic([point.month.clone().into(), point.revenue.into()])
        .to_owned()
}

#[cfg(all(test, feature = "sqlite"))]
mod tests {
    use sea_query::SqliteQueryBuilder;

    use super::*;
    use crate::storage::sql::sqlite::Sqlite;

    #[test]
    fn test_numeric_filter_includes_amount_clause() {
        let filter = InvoiceFilter::from_query("666");
        let sql = find_invoices::<Sqlite>(&filter, PageWindow::for_page(1))
            .to_string(SqliteQueryBuilder);

        assert!(sql.contains(r#""invoices"."amount" = 666"#), "{sql}");
        assert!(sql.contains(" OR "), "{sql}");
    }

    #[test]
    fn test_non_numeric_filter_omits_amount_clause() {
        let filter = InvoiceFilter::from_query("abc");
        let sql = find_invoices::<Sqlite>(&filter, PageWindow::for_page(1))
            .to_string(SqliteQueryBuilder);

        assert!(!sql.contains(r#""invoices"."amount" ="#), "{sql}");
        assert!(sql.contains("'%abc%'"), "{sql}");
    }

    #[test]
    fn test_find_invoices_sorts_and_pages() {
        let filter = InvoiceFilter::from_query("");
        let sql = find_invoices::<Sqlite>(&filter, PageWindow::for_page(3))
            .to_string(SqliteQueryBuilder);

        assert!(
            sql.contains(r#"ORDER BY julianday("invoices"."date") DESC, "invoices"."id" DESC"#),
            "{sql}"
        );
        assert!(sql.contains("LIMIT 6"), "{sql}");
        assert!(sql.contains("OFFSET 12"), "{sql}");
    }

    #[test]
    fn test_count_matching_shares_the_table_predicate() {
        let filter = InvoiceFilter::from_query("Lee");
        let count_sql = count_invoices_matching::<Sqlite>(&filter).to_string(SqliteQueryBuilder);
        let where_sql = Query::select()
            .column(Asterisk)
            .from(Invoices::Table)
            .cond_where(invoice_condition::<Sqlite>(&filter))
            .to_string(SqliteQueryBuilder);

        let predicate = where_sql
            .split_once(" WHERE ")
            .map(|(_, p)| p)
            .expect("predicate rendered");
        assert!(count_sql.ends_with(predicate), "{count_sql}");
    }

    #[test]
    fn test_sum_by_status_is_scoped() {
        let sql = sum_amount_by_status(InvoiceStatus::Paid).to_string(SqliteQueryBuilder);
        assert!(sql.contains("SUM"), "{sql}");
        assert!(sql.contains(r#""status" = 'paid'"#), "{sql}");
    }

    #[test]
    fn test_sqlite_search_lowers_the_column() {
        let sql = matching_customers::<Sqlite>(&CustomerFilter::from_query("Émile"))
            .to_string(SqliteQueryBuilder);

        assert!(sql.contains(r#"LOWER("customers"."name") LIKE '%Émile%' ESCAPE '!'"#), "{sql}");
    }
}
