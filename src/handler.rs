//! The capability an endpoint handler holds to get query-parameter handling
//! by composition.
//!
//! A [`QueryHandler`] owns the request's parameters and guard configuration,
//! lazily creates one [`RequestQuery`] per request, and forwards the
//! `handle_*` calls to it. Two access modes exist on purpose: sort, filter
//! and pagination require an interpreter with a bound query; group-by
//! creates a query-less interpreter on demand because it never touches the
//! query.

use crate::errors::QueryError;
use crate::group::Groups;
use crate::interpreter::RequestQuery;
use crate::models::QueryParams;
use crate::target::QueryTarget;
use serde_json::{Value, json};

/// Per-request query-handling capability for an endpoint handler.
#[derive(Debug)]
pub struct QueryHandler<Q> {
    params: QueryParams,
    interpreter: Option<RequestQuery<Q>>,
    sort_fields: Value,
    filter_fields: Value,
}

impl<Q: QueryTarget> QueryHandler<Q> {
    #[must_use]
    pub fn new(params: QueryParams) -> Self {
        Self {
            params,
            interpreter: None,
            sort_fields: json!("*"),
            filter_fields: json!("*"),
        }
    }

    /// Configure the sort-field guard. Applies to every interpreter this
    /// handler subsequently creates.
    pub fn set_sort_fields(&mut self, guard: impl Into<Value>) -> &mut Self {
        self.sort_fields = guard.into();
        self
    }

    /// Configure the filter-field guard. Applies to every interpreter this
    /// handler subsequently creates.
    pub fn set_filter_fields(&mut self, guard: impl Into<Value>) -> &mut Self {
        self.filter_fields = guard.into();
        self
    }

    /// Create the interpreter bound to `query`.
    ///
    /// # Errors
    ///
    /// `QueryAlreadyBound` when an interpreter already exists, including the
    /// query-less one `handle_group_by` creates.
    pub fn set_query(&mut self, query: Q) -> Result<&mut Self, QueryError> {
        if self.interpreter.is_some() {
            return Err(QueryError::QueryAlreadyBound);
        }
        let mut interpreter = RequestQuery::with_query(self.params.clone(), query);
        interpreter.set_sort_fields(self.sort_fields.clone());
        interpreter.set_filter_fields(self.filter_fields.clone());
        self.interpreter = Some(interpreter);
        Ok(self)
    }

    /// Forward to [`RequestQuery::apply_sort`].
    ///
    /// # Errors
    ///
    /// `QueryNotBound` when no query has been attached, plus anything the
    /// interpreter raises.
    pub fn handle_sort(&mut self) -> Result<&mut Self, QueryError> {
        self.required()?.apply_sort()?;
        Ok(self)
    }

    /// Forward to [`RequestQuery::apply_filter`].
    ///
    /// # Errors
    ///
    /// `QueryNotBound` when no query has been attached, plus anything the
    /// interpreter raises.
    pub fn handle_filter(&mut self) -> Result<&mut Self, QueryError> {
        self.required()?.apply_filter()?;
        Ok(self)
    }

    /// Forward to [`RequestQuery::apply_pagination`].
    ///
    /// # Errors
    ///
    /// `QueryNotBound` when no query has been attached, plus anything the
    /// interpreter raises.
    pub fn handle_pagination(&mut self) -> Result<&mut Self, QueryError> {
        self.required()?.apply_pagination()?;
        Ok(self)
    }

    /// Forward to [`RequestQuery::apply_group_by`], creating a query-less
    /// interpreter when none exists yet.
    ///
    /// # Errors
    ///
    /// Anything the interpreter raises; grouping itself never needs a bound
    /// query.
    pub fn handle_group_by(&mut self, rows: &[Value]) -> Result<Option<Groups>, QueryError> {
        self.lazy().apply_group_by(rows)
    }

    /// The bound query, if an interpreter with one exists.
    pub fn query(&self) -> Option<&Q> {
        self.interpreter.as_ref().and_then(RequestQuery::query)
    }

    /// Consume the handler and hand back the bound query.
    pub fn into_query(self) -> Option<Q> {
        self.interpreter.and_then(RequestQuery::into_query)
    }

    /// Require-already-bound access mode.
    fn required(&mut self) -> Result<&mut RequestQuery<Q>, QueryError> {
        self.interpreter.as_mut().ok_or(QueryError::QueryNotBound)
    }

    /// Create-if-absent access mode; the created interpreter has no query.
    fn lazy(&mut self) -> &RequestQuery<Q> {
        self.interpreter.get_or_insert_with(|| {
            let mut interpreter = RequestQuery::new(self.params.clone());
            interpreter.set_sort_fields(self.sort_fields.clone());
            interpreter.set_filter_fields(self.filter_fields.clone());
            interpreter
        })
    }
}
