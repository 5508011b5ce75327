//! PostgreSQL storage backend using sqlx.
//!
//! Provides `PostgresStore<E>`, one table per entity, with predicates
//! translated into parameterized `WHERE` clauses via `sqlx::QueryBuilder`.
//!
//! # Feature flag
//!
//! This module is gated behind the `postgres` feature flag:
//! ```toml
//! [dependencies]
//! pizzeria = { version = "0.1", features = ["postgres"] }
//! ```

use crate::core::entity::{Entity, EntityField};
use crate::core::error::{PizzeriaError, PizzeriaResult, QueryError, StorageError};
use crate::core::field::FieldValue;
use crate::core::predicate::{Condition, Operator, Predicate};
use crate::core::query::PageRequest;
use crate::core::store::EntityStore;
use crate::entities::pizza::{Pizza, PizzaSize};
use crate::entities::topping::Topping;
use async_trait::async_trait;
use sqlx::postgres::{PgPoolOptions, PgRow};
use sqlx::{PgPool, Postgres, QueryBuilder, Row};
use std::marker::PhantomData;

const BACKEND: &str = "postgres";

// ---------------------------------------------------------------------------
// Connection and schema management
// ---------------------------------------------------------------------------

/// Open a connection pool
pub async fn connect(database_url: &str, max_connections: u32) -> PizzeriaResult<PgPool> {
    PgPoolOptions::new()
        .max_connections(max_connections)
        .connect(database_url)
        .await
        .map_err(|e| {
            StorageError::ConnectionError {
                backend: BACKEND.to_string(),
                message: e.to_string(),
            }
            .into()
        })
}

/// Apply the required tables (idempotent).
///
/// Safe to call on every startup.
pub async fn ensure_schema(pool: &PgPool) -> PizzeriaResult<()> {
    sqlx::query(
        "CREATE TABLE IF NOT EXISTS pizza (
            id BIGSERIAL PRIMARY KEY,
            pizza_size VARCHAR(32) NOT NULL,
            price DOUBLE PRECISION NOT NULL CHECK (price >= 1)
        )",
    )
    .execute(pool)
    .await
    .map_err(storage_error)?;

    sqlx::query(
        "CREATE TABLE IF NOT EXISTS topping (
            id BIGSERIAL PRIMARY KEY,
            name VARCHAR(255) NOT NULL CHECK (char_length(name) >= 2),
            price DOUBLE PRECISION NOT NULL,
            description VARCHAR(255)
        )",
    )
    .execute(pool)
    .await
    .map_err(storage_error)?;

    Ok(())
}

fn storage_error(e: sqlx::Error) -> PizzeriaError {
    let integrity = e
        .as_database_error()
        .is_some_and(|db| db.is_check_violation() || db.is_unique_violation());
    if integrity {
        StorageError::IntegrityError {
            message: e.to_string(),
        }
        .into()
    } else {
        StorageError::QueryError {
            backend: BACKEND.to_string(),
            message: e.to_string(),
        }
        .into()
    }
}

fn to_bind(parameter: &str, value: usize) -> PizzeriaResult<i64> {
    i64::try_from(value).map_err(|e| {
        QueryError::InvalidValue {
            parameter: parameter.to_string(),
            value: value.to_string(),
            message: e.to_string(),
        }
        .into()
    })
}

// ---------------------------------------------------------------------------
// Row mapping
// ---------------------------------------------------------------------------

/// An entity stored in its own table, one column per field
pub trait PgRecord: Entity + Unpin {
    const TABLE: &'static str;

    /// Columns ordered byte-wise (`COLLATE "C"`) when sorted
    const TEXT_COLUMNS: &'static [&'static str];

    fn from_row(row: &PgRow) -> Result<Self, sqlx::Error>;
}

impl PgRecord for Pizza {
    const TABLE: &'static str = "pizza";
    const TEXT_COLUMNS: &'static [&'static str] = &["pizza_size"];

    fn from_row(row: &PgRow) -> Result<Self, sqlx::Error> {
        let size: String = row.try_get("pizza_size")?;
        Ok(Pizza {
            id: Some(row.try_get("id")?),
            size: size
                .parse::<PizzaSize>()
                .map_err(|e| sqlx::Error::Decode(Box::new(e)))?,
            price: row.try_get("price")?,
        })
    }
}

impl PgRecord for Topping {
    const TABLE: &'static str = "topping";
    const TEXT_COLUMNS: &'static [&'static str] = &["name", "description"];

    fn from_row(row: &PgRow) -> Result<Self, sqlx::Error> {
        Ok(Topping {
            id: Some(row.try_get("id")?),
            name: row.try_get("name")?,
            price: row.try_get("price")?,
            description: row.try_get("description")?,
        })
    }
}

// ---------------------------------------------------------------------------
// SQL generation
// ---------------------------------------------------------------------------

fn data_fields<F: EntityField>() -> impl Iterator<Item = F> {
    F::all().iter().copied().filter(|field| *field != F::id())
}

fn column_list<F: EntityField>() -> String {
    F::all()
        .iter()
        .map(|field| field.column())
        .collect::<Vec<_>>()
        .join(", ")
}

fn push_value(builder: &mut QueryBuilder<'_, Postgres>, value: &FieldValue) {
    match value {
        FieldValue::Integer(i) => {
            builder.push_bind(*i);
        }
        FieldValue::Decimal(d) => {
            builder.push_bind(*d);
        }
        FieldValue::String(s) => {
            builder.push_bind(s.clone());
        }
        FieldValue::Null => {
            builder.push("NULL");
        }
    }
}

/// Text compares by byte order, like `FieldValue::compare`, whatever the
/// database collation
fn push_column(builder: &mut QueryBuilder<'_, Postgres>, column: &str, text: bool) {
    builder.push(column);
    if text {
        builder.push(" COLLATE \"C\"");
    }
}

fn push_comparison(
    builder: &mut QueryBuilder<'_, Postgres>,
    column: &str,
    op: &str,
    value: &FieldValue,
) {
    push_column(builder, column, matches!(value, FieldValue::String(_)));
    builder.push(op);
    push_value(builder, value);
}

fn push_condition<F: EntityField>(builder: &mut QueryBuilder<'_, Postgres>, condition: &Condition<F>) {
    let column = condition.field.column();
    match &condition.operator {
        Operator::Equals(value) => push_comparison(builder, column, " = ", value),
        Operator::NotEquals(value) => push_comparison(builder, column, " <> ", value),
        Operator::GreaterThan(value) => push_comparison(builder, column, " > ", value),
        Operator::GreaterThanOrEqual(value) => push_comparison(builder, column, " >= ", value),
        Operator::LessThan(value) => push_comparison(builder, column, " < ", value),
        Operator::LessThanOrEqual(value) => push_comparison(builder, column, " <= ", value),
        Operator::In(values) if values.is_empty() => {
            builder.push("FALSE");
        }
        Operator::In(values) => {
            builder.push(column).push(" IN (");
            for (i, value) in values.iter().enumerate() {
                if i > 0 {
                    builder.push(", ");
                }
                push_value(builder, value);
            }
            builder.push(")");
        }
        Operator::Specified(true) => {
            builder.push(column).push(" IS NOT NULL");
        }
        Operator::Specified(false) => {
            builder.push(column).push(" IS NULL");
        }
        // strpos yields NULL for NULL columns, so both forms skip them
        Operator::Contains(needle) => {
            builder.push("strpos(").push(column).push(", ");
            builder.push_bind(needle.clone());
            builder.push(") > 0");
        }
        Operator::DoesNotContain(needle) => {
            builder.push("strpos(").push(column).push(", ");
            builder.push_bind(needle.clone());
            builder.push(") = 0");
        }
    }
}

/// Append ` WHERE a AND b ...`, or nothing for an always-true predicate
fn push_predicate<F: EntityField>(builder: &mut QueryBuilder<'_, Postgres>, predicate: &Predicate<F>) {
    for (i, condition) in predicate.conditions().iter().enumerate() {
        builder.push(if i == 0 { " WHERE " } else { " AND " });
        push_condition(builder, condition);
    }
}

fn push_select<F: EntityField>(
    builder: &mut QueryBuilder<'_, Postgres>,
    table: &str,
    predicate: &Predicate<F>,
) {
    builder.push("SELECT ");
    if predicate.is_distinct() {
        builder.push("DISTINCT ");
    }
    builder.push(column_list::<F>()).push(" FROM ").push(table);
    push_predicate(builder, predicate);
}

/// `ORDER BY` the sort keys then id; Postgres sorts NULLs last ascending and
/// first descending, which matches the in-memory store
fn push_order<F: EntityField>(
    builder: &mut QueryBuilder<'_, Postgres>,
    page: Option<&PageRequest<F>>,
    text_columns: &[&str],
) {
    builder.push(" ORDER BY ");
    if let Some(page) = page {
        for sort in &page.sort {
            let column = sort.field.column();
            push_column(builder, column, text_columns.contains(&column));
            builder
                .push(" ")
                .push(sort.direction.as_sql())
                .push(", ");
        }
    }
    builder.push(F::id().column()).push(" ASC");
}

// ---------------------------------------------------------------------------
// PostgresStore<E>
// ---------------------------------------------------------------------------

/// Entity store backed by PostgreSQL
pub struct PostgresStore<E> {
    pool: PgPool,
    _marker: PhantomData<fn() -> E>,
}

impl<E> Clone for PostgresStore<E> {
    fn clone(&self) -> Self {
        Self {
            pool: self.pool.clone(),
            _marker: PhantomData,
        }
    }
}

impl<E: PgRecord> PostgresStore<E> {
    pub fn new(pool: PgPool) -> Self {
        Self {
            pool,
            _marker: PhantomData,
        }
    }

    async fn insert(&self, entity: &E) -> PizzeriaResult<i64> {
        let mut builder = QueryBuilder::<Postgres>::new("INSERT INTO ");
        builder.push(E::TABLE).push(" (");
        let columns: Vec<&str> = data_fields::<E::Field>().map(|f| f.column()).collect();
        builder.push(columns.join(", ")).push(") VALUES (");
        for (i, field) in data_fields::<E::Field>().enumerate() {
            if i > 0 {
                builder.push(", ");
            }
            push_value(&mut builder, &entity.field_value(field));
        }
        builder.push(") RETURNING id");

        builder
            .build_query_scalar::<i64>()
            .fetch_one(&self.pool)
            .await
            .map_err(storage_error)
    }

    async fn upsert(&self, entity: &E, id: i64) -> PizzeriaResult<()> {
        let mut builder = QueryBuilder::<Postgres>::new("INSERT INTO ");
        builder.push(E::TABLE).push(" (").push(column_list::<E::Field>());
        builder.push(") VALUES (");
        builder.push_bind(id);
        for field in data_fields::<E::Field>() {
            builder.push(", ");
            push_value(&mut builder, &entity.field_value(field));
        }
        builder.push(") ON CONFLICT (id) DO UPDATE SET ");
        for (i, field) in data_fields::<E::Field>().enumerate() {
            if i > 0 {
                builder.push(", ");
            }
            builder
                .push(field.column())
                .push(" = EXCLUDED.")
                .push(field.column());
        }

        builder
            .build()
            .execute(&self.pool)
            .await
            .map_err(storage_error)?;
        Ok(())
    }
}

#[async_trait]
impl<E: PgRecord> EntityStore<E> for PostgresStore<E> {
    async fn find_by_id(&self, id: i64) -> PizzeriaResult<Option<E>> {
        let mut builder = QueryBuilder::<Postgres>::new("SELECT ");
        builder
            .push(column_list::<E::Field>())
            .push(" FROM ")
            .push(E::TABLE)
            .push(" WHERE id = ");
        builder.push_bind(id);

        let row = builder
            .build()
            .fetch_optional(&self.pool)
            .await
            .map_err(storage_error)?;
        row.as_ref()
            .map(E::from_row)
            .transpose()
            .map_err(storage_error)
    }

    async fn exists_by_id(&self, id: i64) -> PizzeriaResult<bool> {
        let mut builder = QueryBuilder::<Postgres>::new("SELECT EXISTS (SELECT 1 FROM ");
        builder.push(E::TABLE).push(" WHERE id = ");
        builder.push_bind(id);
        builder.push(")");

        builder
            .build_query_scalar::<bool>()
            .fetch_one(&self.pool)
            .await
            .map_err(storage_error)
    }

    async fn save(&self, mut entity: E) -> PizzeriaResult<E> {
        match entity.id() {
            Some(id) => self.upsert(&entity, id).await?,
            None => {
                let id = self.insert(&entity).await?;
                entity.assign_id(id);
            }
        }
        Ok(entity)
    }

    async fn delete_by_id(&self, id: i64) -> PizzeriaResult<()> {
        let mut builder = QueryBuilder::<Postgres>::new("DELETE FROM ");
        builder.push(E::TABLE).push(" WHERE id = ");
        builder.push_bind(id);

        builder
            .build()
            .execute(&self.pool)
            .await
            .map_err(storage_error)?;
        Ok(())
    }

    async fn find_matching(
        &self,
        predicate: &Predicate<E::Field>,
        page: Option<&PageRequest<E::Field>>,
    ) -> PizzeriaResult<Vec<E>> {
        let mut builder = QueryBuilder::<Postgres>::new("");
        push_select(&mut builder, E::TABLE, predicate);
        push_order(&mut builder, page, E::TEXT_COLUMNS);
        if let Some(page) = page {
            builder.push(" LIMIT ");
            builder.push_bind(to_bind("size", page.size)?);
            builder.push(" OFFSET ");
            builder.push_bind(to_bind("page", page.offset())?);
        }

        tracing::debug!(sql = builder.sql(), "find matching {}", E::resource_name());
        let rows = builder
            .build()
            .fetch_all(&self.pool)
            .await
            .map_err(storage_error)?;
        rows.iter()
            .map(E::from_row)
            .collect::<Result<Vec<_>, _>>()
            .map_err(storage_error)
    }

    async fn count_matching(&self, predicate: &Predicate<E::Field>) -> PizzeriaResult<u64> {
        let mut builder = QueryBuilder::<Postgres>::new("SELECT COUNT(*) FROM (");
        push_select(&mut builder, E::TABLE, predicate);
        builder.push(") AS matching");

        let count = builder
            .build_query_scalar::<i64>()
            .fetch_one(&self.pool)
            .await
            .map_err(storage_error)?;
        Ok(count.max(0) as u64)
    }
}
