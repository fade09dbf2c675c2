//! Sort-directive parsing and direction normalization.

use crate::errors::QueryError;
use crate::guard::{self, GuardOutcome};
use crate::models::QueryParams;
use sea_orm::sea_query::Order;
use serde_json::{Map, Value};

/// Normalized sort direction.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum SortDirection {
    #[default]
    Asc,
    Desc,
}

impl SortDirection {
    /// Normalize a raw direction string.
    ///
    /// Absent or empty input defaults to ascending; otherwise the input is
    /// compared case-insensitively against `ASC`/`DESC`.
    ///
    /// # Errors
    ///
    /// `InvalidSortDirection` for anything else.
    pub fn normalize(raw: Option<&str>) -> Result<Self, QueryError> {
        let Some(raw) = raw else {
            return Ok(Self::Asc);
        };
        if raw.is_empty() {
            return Ok(Self::Asc);
        }
        match raw.to_uppercase().as_str() {
            "ASC" => Ok(Self::Asc),
            "DESC" => Ok(Self::Desc),
            _ => Err(QueryError::InvalidSortDirection { given: raw.to_string() }),
        }
    }
}

impl From<SortDirection> for Order {
    fn from(direction: SortDirection) -> Self {
        match direction {
            SortDirection::Asc => Self::Asc,
            SortDirection::Desc => Self::Desc,
        }
    }
}

/// One parsed sort instruction: a field plus a normalized direction.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct SortDirective {
    pub field: String,
    pub direction: SortDirection,
}

/// Parse and validate the request's sort directives, in application order.
///
/// Map shape (`sort` is a JSON object) yields one directive per entry in
/// insertion order; scalar shape yields a single directive whose direction
/// comes from the `order` parameter. Returns an empty vec when `sort` is
/// absent.
///
/// # Errors
///
/// `FieldNotAllowed`/`GuardMisconfigured` from the guard check,
/// `InvalidSortDirection` from normalization, `MalformedParameter` when a
/// map-shaped `sort` is not decodable JSON.
pub(crate) fn sort_directives(
    params: &QueryParams,
    sort_guard: &Value,
) -> Result<Vec<SortDirective>, QueryError> {
    let Some(sort) = params.sort.as_deref() else {
        return Ok(Vec::new());
    };

    if sort.trim_start().starts_with('{') {
        let entries: Map<String, Value> = serde_json::from_str(sort)
            .map_err(|e| QueryError::MalformedParameter { name: "sort", detail: e.to_string() })?;
        entries
            .iter()
            .map(|(field, direction)| {
                // Guard first, direction second, per entry.
                check_guard(field, sort_guard)?;
                let direction = SortDirection::normalize(direction_str(direction)?)?;
                Ok(SortDirective { field: field.clone(), direction })
            })
            .collect()
    } else {
        check_guard(sort, sort_guard)?;
        let direction = SortDirection::normalize(params.order.as_deref())?;
        Ok(vec![SortDirective { field: sort.to_string(), direction }])
    }
}

fn check_guard(field: &str, sort_guard: &Value) -> Result<(), QueryError> {
    match guard::validate(field, sort_guard) {
        GuardOutcome::Allowed => Ok(()),
        GuardOutcome::Rejected => {
            Err(QueryError::FieldNotAllowed { field: field.to_string(), usage: "sort" })
        }
        GuardOutcome::Misconfigured => Err(QueryError::GuardMisconfigured { guard: "sort_fields" }),
    }
}

/// Direction value from a map-shaped sort entry. Null counts as absent;
/// anything non-string is rejected with the value's JSON rendering in the
/// message.
fn direction_str(value: &Value) -> Result<Option<&str>, QueryError> {
    match value {
        Value::Null => Ok(None),
        Value::String(s) => Ok(Some(s)),
        other => Err(QueryError::InvalidSortDirection { given: other.to_string() }),
    }
}
