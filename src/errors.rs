//! # Error Handling for Query-Parameter Interpretation
//!
//! Every failure the interpreter can raise is a [`QueryError`]. The taxonomy
//! splits cleanly into request-input errors (the client sent something the
//! DSL rejects, 4xx) and programmer/configuration errors (the handler wired
//! things up wrong, 5xx).
//!
//! ## Philosophy
//!
//! **Never expose internal errors to users**. Configuration and binding bugs
//! are logged server-side via `tracing` but the HTTP body only ever carries a
//! generic message. Request-input errors are user-facing by definition and
//! returned verbatim.
//!
//! ## Usage
//!
//! ```rust,ignore
//! async fn my_handler(Query(params): Query<QueryParams>) -> Result<Json<Data>, QueryError> {
//!     let mut handler = QueryHandler::new(params);
//!     handler.set_query(todo::Entity::find())?;
//!     handler.handle_sort()?; // raises FieldNotAllowed, InvalidSortDirection, ...
//!     // ...
//! }
//! ```

use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde::Serialize;
use std::fmt;

/// Everything that can go wrong while interpreting request parameters.
///
/// Request-input variants map to 4xx responses; binding and configuration
/// variants map to 500 and have their detail logged rather than exposed.
#[derive(Debug)]
pub enum QueryError {
    /// 500 - a second attempt to attach a query to a handler that already
    /// has one.
    QueryAlreadyBound,

    /// 500 - sort/filter/pagination invoked with no attached query.
    QueryNotBound,

    /// 500 - a field guard is neither the wildcard `"*"` nor an array.
    GuardMisconfigured {
        /// Which guard setting is malformed (`sort_fields` / `filter_fields`).
        guard: &'static str,
    },

    /// 417 Expectation Failed - a sort or filter field is not in the
    /// configured allow-list.
    FieldNotAllowed {
        /// The rejected field name.
        field: String,
        /// What the field was used for (`sort` / `filter`).
        usage: &'static str,
    },

    /// 400 - a sort direction is present but not `ASC` or `DESC`.
    InvalidSortDirection {
        /// The direction as received.
        given: String,
    },

    /// 400 - a structured filter condition has no `value` key.
    MissingFilterValue {
        /// The field whose condition is incomplete.
        field: String,
    },

    /// 400 - a filter operator is not one the DSL supports.
    InvalidFilterOperator {
        /// The operator as received.
        given: String,
    },

    /// 400 - `group_map` is present but not a JSON object.
    InvalidGroupMap,

    /// 400 - a structured parameter (`sort`, `filter`, `group_map`) could
    /// not be decoded as JSON.
    MalformedParameter {
        /// The parameter name.
        name: &'static str,
        /// The decode failure, logged and echoed to the client (it concerns
        /// their own input, not server internals).
        detail: String,
    },
}

impl QueryError {
    /// Get the HTTP status code for this error
    #[must_use]
    pub fn status_code(&self) -> StatusCode {
        match self {
            Self::QueryAlreadyBound | Self::QueryNotBound | Self::GuardMisconfigured { .. } => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
            Self::FieldNotAllowed { .. } => StatusCode::EXPECTATION_FAILED,
            Self::InvalidSortDirection { .. }
            | Self::MissingFilterValue { .. }
            | Self::InvalidFilterOperator { .. }
            | Self::InvalidGroupMap
            | Self::MalformedParameter { .. } => StatusCode::BAD_REQUEST,
        }
    }

    /// Get the user-facing error message (sanitized)
    fn user_message(&self) -> String {
        match self {
            // Internal detail stays out of the response body.
            Self::QueryAlreadyBound | Self::QueryNotBound | Self::GuardMisconfigured { .. } => {
                "An internal error occurred".to_string()
            }
            Self::FieldNotAllowed { field, usage } => {
                format!("Field `{field}` not allowed to {usage}")
            }
            Self::InvalidSortDirection { given } => {
                format!("Sort direction must be \"ASC\" or \"DESC\", got `{given}`")
            }
            Self::MissingFilterValue { field } => {
                format!("Filter condition `{field}` requires a value")
            }
            Self::InvalidFilterOperator { given } => {
                format!("Unsupported filter operator `{given}`")
            }
            Self::InvalidGroupMap => "`group_map` must be an object".to_string(),
            Self::MalformedParameter { name, detail } => {
                format!("`{name}` is not valid JSON: {detail}")
            }
        }
    }

    /// The full message, including detail that never reaches the client.
    /// Used for logging and `Display`.
    fn internal_message(&self) -> String {
        match self {
            Self::QueryAlreadyBound => "Query already set".to_string(),
            Self::QueryNotBound => "Query not set".to_string(),
            Self::GuardMisconfigured { guard } => {
                format!("`{guard}` must be an array of field names or \"*\"")
            }
            _ => self.user_message(),
        }
    }

    /// Log internal error details (not sent to user)
    ///
    /// Uses the `tracing` crate - only emits if the host has enabled tracing.
    fn log_internal(&self) {
        match self {
            Self::QueryAlreadyBound | Self::QueryNotBound | Self::GuardMisconfigured { .. } => {
                tracing::error!(
                    detail = %self.internal_message(),
                    "request-query configuration error"
                );
            }
            _ => {
                tracing::debug!(
                    error = %self.user_message(),
                    status = %self.status_code(),
                    "request-query rejected parameters"
                );
            }
        }
    }
}

/// Error response sent to users (sanitized)
#[derive(Serialize)]
struct ErrorResponse {
    /// Error message
    error: String,
}

impl IntoResponse for QueryError {
    fn into_response(self) -> Response {
        self.log_internal();

        let status = self.status_code();
        let response = ErrorResponse { error: self.user_message() };

        (status, Json(response)).into_response()
    }
}

impl fmt::Display for QueryError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.internal_message())
    }
}

impl std::error::Error for QueryError {}
