//! The request interpreter: one parameter set, at most one bound query.

use crate::errors::QueryError;
use crate::filter::filter_conditions;
use crate::group::{self, Groups};
use crate::models::QueryParams;
use crate::sort::sort_directives;
use crate::target::QueryTarget;
use serde_json::{Value, json};

/// Pagination page size when `limit` is absent.
pub const DEFAULT_LIMIT: u64 = 10;
/// Pagination page when `page` is absent.
pub const DEFAULT_PAGE: u64 = 1;

/// Interprets one request's parameters against one bound query.
///
/// Created per request (usually through a [`crate::QueryHandler`]), used for
/// zero or more `apply_*` calls, then discarded; holds no state beyond the
/// parameters, the bound query and the guard configuration.
///
/// Every `apply_*` call validates the whole parameter fully before touching
/// the query, so a rejected request leaves the bound query as it was.
#[derive(Debug)]
pub struct RequestQuery<Q> {
    params: QueryParams,
    query: Option<Q>,
    sort_fields: Value,
    filter_fields: Value,
}

impl<Q: QueryTarget> RequestQuery<Q> {
    /// An interpreter with no bound query. Only `apply_group_by` works until
    /// one is attached with [`Self::set_query`].
    #[must_use]
    pub fn new(params: QueryParams) -> Self {
        Self { params, query: None, sort_fields: json!("*"), filter_fields: json!("*") }
    }

    /// An interpreter bound to `query` from the start.
    #[must_use]
    pub fn with_query(params: QueryParams, query: Q) -> Self {
        Self { query: Some(query), ..Self::new(params) }
    }

    /// Attach the query. Binding happens at most once per interpreter.
    ///
    /// # Errors
    ///
    /// `QueryAlreadyBound` on a second attempt.
    pub fn set_query(&mut self, query: Q) -> Result<(), QueryError> {
        if self.query.is_some() {
            return Err(QueryError::QueryAlreadyBound);
        }
        self.query = Some(query);
        Ok(())
    }

    /// Restrict which fields the `sort` parameter may touch.
    pub fn set_sort_fields(&mut self, guard: impl Into<Value>) {
        self.sort_fields = guard.into();
    }

    /// Restrict which fields the `filter` parameter may touch.
    pub fn set_filter_fields(&mut self, guard: impl Into<Value>) {
        self.filter_fields = guard.into();
    }

    /// The bound query, if any.
    pub const fn query(&self) -> Option<&Q> {
        self.query.as_ref()
    }

    /// Consume the interpreter and hand back the bound query.
    pub fn into_query(self) -> Option<Q> {
        self.query
    }

    /// Apply the `sort` parameter (map or scalar shape) as order-by calls,
    /// in the order given.
    ///
    /// # Errors
    ///
    /// `QueryNotBound` without a bound query (even when `sort` is absent);
    /// otherwise whatever [`sort_directives`] raises.
    pub fn apply_sort(&mut self) -> Result<&mut Self, QueryError> {
        self.ensure_bound()?;
        let directives = sort_directives(&self.params, &self.sort_fields)?;
        self.mutate_query(|query| {
            directives
                .into_iter()
                .fold(query, |q, d| q.apply_order_by(&d.field, d.direction))
        });
        Ok(self)
    }

    /// Apply the `filter` parameter as where clauses, in iteration order.
    ///
    /// # Errors
    ///
    /// `QueryNotBound` without a bound query; otherwise whatever
    /// [`filter_conditions`] raises.
    pub fn apply_filter(&mut self) -> Result<&mut Self, QueryError> {
        self.ensure_bound()?;
        let conditions = filter_conditions(&self.params, &self.filter_fields)?;
        self.mutate_query(|query| {
            conditions
                .into_iter()
                .fold(query, |q, c| q.apply_where(&c.field, c.operator, &c.value))
        });
        Ok(self)
    }

    /// Apply pagination when `limit` or `page` is present (presence, not
    /// truthiness), with `limit` defaulting to 10 and `page` to 1.
    ///
    /// # Errors
    ///
    /// `QueryNotBound` without a bound query.
    pub fn apply_pagination(&mut self) -> Result<&mut Self, QueryError> {
        self.ensure_bound()?;
        if self.params.wants_pagination() {
            let limit = self.params.limit.unwrap_or(DEFAULT_LIMIT);
            let page = self.params.page.unwrap_or(DEFAULT_PAGE);
            self.mutate_query(|query| query.apply_paginate(limit, page));
        }
        Ok(self)
    }

    /// Group materialized rows by the `group_by` field and optionally re-key
    /// the result through `group_map`.
    ///
    /// Returns `Ok(None)` when `group_by` is absent; the caller keeps its
    /// rows as they are. Otherwise returns the (possibly re-keyed) grouping
    /// for the caller to assign. Needs no bound query.
    ///
    /// # Errors
    ///
    /// `InvalidGroupMap` when `group_map` is not an object,
    /// `MalformedParameter` when it is not decodable JSON.
    pub fn apply_group_by(&self, rows: &[Value]) -> Result<Option<Groups>, QueryError> {
        let Some(group_by) = self.params.group_by.as_deref() else {
            return Ok(None);
        };

        let groups = group::group_rows(rows, group_by);

        let Some(raw_map) = self.params.group_map.as_deref() else {
            return Ok(Some(groups));
        };
        let map: Value = serde_json::from_str(raw_map).map_err(|e| {
            QueryError::MalformedParameter { name: "group_map", detail: e.to_string() }
        })?;
        Ok(Some(group::remap_groups(groups, &map)?))
    }

    fn ensure_bound(&self) -> Result<(), QueryError> {
        if self.query.is_none() {
            return Err(QueryError::QueryNotBound);
        }
        Ok(())
    }

    /// Run a by-value transformation over the bound query. Callers check
    /// `ensure_bound` first; an unbound query is left untouched.
    fn mutate_query(&mut self, f: impl FnOnce(Q) -> Q) {
        if let Some(query) = self.query.take() {
            self.query = Some(f(query));
        }
    }
}
