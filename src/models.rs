use serde::Deserialize;
use utoipa::{IntoParams, ToSchema};

/// Query parameters for sorting, filtering, pagination and grouping.
///
/// Scalar parameters (`order`, `limit`, `page`, `group_by`) arrive as plain
/// values; the structured parameters (`sort` in map shape, `filter`,
/// `group_map`) arrive as JSON-encoded strings, decoded by the interpreter.
///
/// # Sorting
/// Two shapes are accepted:
/// - **Map shape:** `sort` is a JSON object from field to direction, applied
///   in insertion order (successive order-by calls are tie-breakers):
///   ```json
///   {"name": "desc", "age": ""}
///   ```
///   An empty or absent direction defaults to `ASC`.
/// - **Scalar shape:** `sort` is a single field name and the separate
///   `order` parameter optionally supplies `ASC`/`DESC`.
///
/// # Filtering
/// The `filter` parameter is a JSON object from field to condition. A scalar
/// condition means equality; an object condition carries an explicit
/// `value` and an optional `operator`:
/// ```json
/// {"name": "elon", "age": {"operator": ">", "value": "18"}}
/// ```
/// The literal strings `"true"`, `"false"` and `"null"` (any case) are
/// coerced to boolean and null values; everything else passes through
/// unchanged.
///
/// # Pagination
/// Plain `limit` (default 10) and `page` (default 1) parameters; pagination
/// activates when at least one of the two is present.
///
/// # Grouping
/// `group_by` names the field to group materialized rows by; the optional
/// `group_map` is a JSON object renaming raw group keys to output keys:
/// ```json
/// {"a": "alpha", "b": "beta"}
/// ```
#[derive(Clone, Debug, Default, Deserialize, IntoParams, ToSchema)]
#[into_params(parameter_in = Query)]
pub struct QueryParams {
    /// Sort specification: a field name, or a JSON object from field to
    /// direction.
    ///
    /// Example: `{"name": "desc", "age": ""}`
    #[param(example = json!({"name": "desc", "age": ""}))]
    pub sort: Option<String>,
    /// Sort direction for the scalar `sort` shape (ASC or DESC).
    ///
    /// Example: `DESC`
    #[param(example = "DESC")]
    pub order: Option<String>,
    /// JSON-encoded filter conditions per field.
    ///
    /// Example: `{"age": {"operator": ">", "value": "18"}}`
    #[param(example = json!({"age": {"operator": ">", "value": "18"}}))]
    pub filter: Option<String>,
    /// Page size for pagination.
    ///
    /// Example: `10`
    #[param(example = 10)]
    pub limit: Option<u64>,
    /// Page number for pagination (1-based).
    ///
    /// Example: `1`
    #[param(example = 1)]
    pub page: Option<u64>,
    /// Field to group materialized rows by.
    ///
    /// Example: `team`
    #[param(example = "team")]
    pub group_by: Option<String>,
    /// JSON-encoded renaming of raw group keys to output keys.
    ///
    /// Example: `{"a": "alpha"}`
    #[param(example = json!({"a": "alpha"}))]
    pub group_map: Option<String>,
}

impl QueryParams {
    /// Whether pagination was requested (presence, not truthiness).
    #[must_use]
    pub const fn wants_pagination(&self) -> bool {
        self.limit.is_some() || self.page.is_some()
    }
}
