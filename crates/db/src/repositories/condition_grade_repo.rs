//! Repository for `condition_grades` and `watch_condition_grades`.
//!
//! Both tables share one layout: a code column per condition field of the
//! shape, a `grade` label and a unique constraint over all code columns
//! named `uq_<table>_key`.

use sqlx::{PgPool, Postgres, QueryBuilder};
use tradein_core::condition::{ConditionGradeRecord, ConditionQuery, ConditionShape};

pub struct ConditionGradeRepo;

impl ConditionGradeRepo {
    /// Grade labels of records whose codes equal every field of `filter`.
    ///
    /// At most two labels are returned; that is enough to tell a unique match
    /// from an ambiguous one. `filter` must only name fields of `shape`.
    pub async fn matching_grades(
        pool: &PgPool,
        shape: ConditionShape,
        filter: &ConditionQuery,
    ) -> Result<Vec<String>, sqlx::Error> {
        let mut builder: QueryBuilder<Postgres> =
            QueryBuilder::new(format!("SELECT grade FROM {} WHERE ", shape.table()));
        let mut conditions = builder.separated(" AND ");
        for (field, code) in filter.iter() {
            conditions.push(format!("{} = ", field.column()));
            conditions.push_bind_unseparated(code.to_string());
        }
        builder.push(" ORDER BY id LIMIT 2");

        builder.build_query_scalar::<String>().fetch_all(pool).await
    }

    /// Insert a record or replace the grade of the record with the same key.
    ///
    /// Returns `true` when a new row was inserted.
    pub async fn upsert(pool: &PgPool, record: &ConditionGradeRecord) -> Result<bool, sqlx::Error> {
        let shape = record.shape;
        let columns: Vec<&str> = shape.fields().iter().map(|f| f.column()).collect();
        let placeholders: Vec<String> = (1..=columns.len() + 1).map(|i| format!("${i}")).collect();

        let query = format!(
            "INSERT INTO {table} ({columns}, grade) \
             VALUES ({placeholders}) \
             ON CONFLICT ON CONSTRAINT uq_{table}_key \
             DO UPDATE SET grade = EXCLUDED.grade, updated_at = now() \
             RETURNING (xmax = 0)",
            table = shape.table(),
            columns = columns.join(", "),
            placeholders = placeholders.join(", "),
        );

        let mut q = sqlx::query_scalar::<_, bool>(&query);
        for field in shape.fields() {
            q = q.bind(record.codes.get(*field).unwrap_or_default());
        }
        q.bind(record.grade.label()).fetch_one(pool).await
    }

    /// Number of records in the table of `shape`.
    pub async fn count(pool: &PgPool, shape: ConditionShape) -> Result<i64, sqlx::Error> {
        let query = format!("SELECT COUNT(*) FROM {}", shape.table());
        sqlx::query_scalar::<_, i64>(&query).fetch_one(pool).await
    }
}
