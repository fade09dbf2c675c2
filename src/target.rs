//! The abstract query object the interpreter mutates.
//!
//! [`QueryTarget`] is the seam between parameter interpretation and the
//! actual query builder: the interpreter only ever issues `order_by`,
//! `where` and `paginate` calls through it, and never executes anything.
//! The crate ships the Sea-ORM implementation; tests substitute a recorder.

use crate::filter::FilterOperator;
use crate::sort::SortDirection;
use sea_orm::sea_query::{Alias, Expr, SimpleExpr};
use sea_orm::{EntityTrait, QueryFilter, QuerySelect, QueryTrait, Select};
use serde_json::Value;

/// A composable query that sorting, filtering and pagination can be applied
/// to. Methods chain by value, mirroring builder-style query APIs.
pub trait QueryTarget: Sized {
    /// Append an order-by clause. Successive calls are tie-breakers.
    #[must_use]
    fn apply_order_by(self, field: &str, direction: SortDirection) -> Self;

    /// Append a where clause comparing `field` to `value` with `operator`.
    #[must_use]
    fn apply_where(self, field: &str, operator: FilterOperator, value: &Value) -> Self;

    /// Restrict the query to one page. Offset arithmetic is the
    /// implementation's concern, not the interpreter's.
    #[must_use]
    fn apply_paginate(self, limit: u64, page: u64) -> Self;
}

impl<E: EntityTrait> QueryTarget for Select<E> {
    fn apply_order_by(mut self, field: &str, direction: SortDirection) -> Self {
        QueryTrait::query(&mut self).order_by(Alias::new(field), direction.into());
        self
    }

    fn apply_where(self, field: &str, operator: FilterOperator, value: &Value) -> Self {
        self.filter(condition_expr(field, operator, value))
    }

    fn apply_paginate(self, limit: u64, page: u64) -> Self {
        // Pages are 1-based; page 0 is treated as the first page. Both
        // values are untrusted, so the offset saturates instead of
        // overflowing.
        let offset = page.saturating_sub(1).saturating_mul(limit);
        self.limit(limit).offset(offset)
    }
}

/// Build the Sea-ORM expression for one filter condition.
///
/// Null values translate to `IS NULL` / `IS NOT NULL` (equality semantics
/// cannot compare against SQL null).
fn condition_expr(field: &str, operator: FilterOperator, value: &Value) -> SimpleExpr {
    let column = || Expr::col(Alias::new(field));

    if value.is_null() {
        return match operator {
            FilterOperator::Ne | FilterOperator::NotLike => column().is_not_null(),
            _ => column().is_null(),
        };
    }

    match operator {
        FilterOperator::Eq => column().eq(query_value(value)),
        FilterOperator::Ne => column().ne(query_value(value)),
        FilterOperator::Gt => column().gt(query_value(value)),
        FilterOperator::Gte => column().gte(query_value(value)),
        FilterOperator::Lt => column().lt(query_value(value)),
        FilterOperator::Lte => column().lte(query_value(value)),
        FilterOperator::Like => column().like(pattern(value)),
        FilterOperator::NotLike => column().not_like(pattern(value)),
    }
}

/// Convert a JSON value into a bindable query value. Arrays and objects
/// fall back to their JSON text rendering.
fn query_value(value: &Value) -> sea_orm::Value {
    match value {
        Value::Bool(b) => (*b).into(),
        Value::Number(n) => n.as_i64().map_or_else(
            || {
                n.as_u64()
                    .map_or_else(|| n.as_f64().unwrap_or_default().into(), Into::into)
            },
            Into::into,
        ),
        Value::String(s) => s.clone().into(),
        // Null is handled before binding; kept total anyway.
        Value::Null => sea_orm::Value::String(None),
        other => other.to_string().into(),
    }
}

/// `LIKE` patterns are taken verbatim; the client supplies its own
/// wildcards.
fn pattern(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use sea_orm::sea_query::SqliteQueryBuilder;
    use serde_json::json;

    mod task {
        use sea_orm::entity::prelude::*;

        #[derive(Clone, Debug, PartialEq, DeriveEntityModel)]
        #[sea_orm(table_name = "tasks")]
        pub struct Model {
            #[sea_orm(primary_key)]
            pub id: i32,
            pub title: String,
            pub age: i32,
        }

        #[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
        pub enum Relation {}

        impl ActiveModelBehavior for ActiveModel {}
    }

    fn sql(mut query: Select<task::Entity>) -> String {
        QueryTrait::query(&mut query).to_string(SqliteQueryBuilder)
    }

    #[test]
    fn test_order_by_renders_in_call_order() {
        let query = task::Entity::find()
            .apply_order_by("title", SortDirection::Desc)
            .apply_order_by("age", SortDirection::Asc);
        let sql = sql(query);
        assert!(sql.contains(r#"ORDER BY "title" DESC, "age" ASC"#), "{sql}");
    }

    #[test]
    fn test_where_with_operator_and_string_value() {
        let sql = sql(task::Entity::find().apply_where("age", FilterOperator::Gt, &json!("18")));
        assert!(sql.contains(r#""age" > '18'"#), "{sql}");
    }

    #[test]
    fn test_where_with_numeric_and_boolean_values() {
        let rendered = sql(task::Entity::find().apply_where("age", FilterOperator::Lte, &json!(30)));
        assert!(rendered.contains(r#""age" <= 30"#), "{rendered}");

        let rendered = sql(task::Entity::find().apply_where("done", FilterOperator::Eq, &json!(true)));
        assert!(rendered.contains(r#""done" = TRUE"#), "{rendered}");
    }

    #[test]
    fn test_null_value_becomes_is_null() {
        let rendered = sql(task::Entity::find().apply_where("title", FilterOperator::Eq, &json!(null)));
        assert!(rendered.contains(r#""title" IS NULL"#), "{rendered}");

        let rendered = sql(task::Entity::find().apply_where("title", FilterOperator::Ne, &json!(null)));
        assert!(rendered.contains(r#""title" IS NOT NULL"#), "{rendered}");
    }

    #[test]
    fn test_like_keeps_client_pattern() {
        let sql =
            sql(task::Entity::find().apply_where("title", FilterOperator::Like, &json!("%urgent%")));
        assert!(sql.contains(r#""title" LIKE '%urgent%'"#), "{sql}");
    }

    #[test]
    fn test_paginate_computes_offset() {
        let sql = sql(task::Entity::find().apply_paginate(10, 3));
        assert!(sql.contains("LIMIT 10"), "{sql}");
        assert!(sql.contains("OFFSET 20"), "{sql}");
    }

    #[test]
    fn test_paginate_first_page_offset_zero() {
        let sql = sql(task::Entity::find().apply_paginate(10, 1));
        assert!(sql.contains("OFFSET 0"), "{sql}");
    }

    #[test]
    fn test_paginate_with_extreme_page_saturates_instead_of_overflowing() {
        // limit and page come straight from the client; the offset must not
        // wrap or panic however large the product gets.
        let rendered = sql(task::Entity::find().apply_paginate(2, u64::MAX));
        assert!(rendered.contains(&format!("OFFSET {}", u64::MAX)), "{rendered}");

        let rendered = sql(task::Entity::find().apply_paginate(u64::MAX, u64::MAX));
        assert!(rendered.contains(&format!("OFFSET {}", u64::MAX)), "{rendered}");
    }
}
