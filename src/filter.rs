//! Filter-condition parsing, operator parsing and value normalization.

use crate::errors::QueryError;
use crate::guard::{self, GuardOutcome};
use crate::models::QueryParams;
use serde_json::{Map, Value};
use std::fmt;
use std::str::FromStr;

/// Comparison operators the filter DSL supports.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum FilterOperator {
    #[default]
    Eq,
    Ne,
    Gt,
    Gte,
    Lt,
    Lte,
    Like,
    NotLike,
}

impl FromStr for FilterOperator {
    type Err = QueryError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "=" => Ok(Self::Eq),
            "!=" | "<>" => Ok(Self::Ne),
            ">" => Ok(Self::Gt),
            ">=" => Ok(Self::Gte),
            "<" => Ok(Self::Lt),
            "<=" => Ok(Self::Lte),
            _ => match s.to_lowercase().as_str() {
                "like" => Ok(Self::Like),
                "not like" => Ok(Self::NotLike),
                _ => Err(QueryError::InvalidFilterOperator { given: s.to_string() }),
            },
        }
    }
}

impl fmt::Display for FilterOperator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let symbol = match self {
            Self::Eq => "=",
            Self::Ne => "!=",
            Self::Gt => ">",
            Self::Gte => ">=",
            Self::Lt => "<",
            Self::Lte => "<=",
            Self::Like => "LIKE",
            Self::NotLike => "NOT LIKE",
        };
        write!(f, "{symbol}")
    }
}

/// One parsed filter instruction: field, operator and normalized value.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct FilterCondition {
    pub field: String,
    pub operator: FilterOperator,
    pub value: Value,
}

/// Parse and validate the request's filter conditions, in iteration order.
///
/// A scalar condition means equality against the (normalized) scalar; an
/// object condition must carry `value` and may carry `operator`. Returns an
/// empty vec when `filter` is absent.
///
/// # Errors
///
/// `FieldNotAllowed`/`GuardMisconfigured` from the guard check,
/// `MissingFilterValue` for an object condition without `value`,
/// `InvalidFilterOperator` for an unknown operator, `MalformedParameter`
/// when `filter` is not decodable JSON.
pub(crate) fn filter_conditions(
    params: &QueryParams,
    filter_guard: &Value,
) -> Result<Vec<FilterCondition>, QueryError> {
    let Some(filter) = params.filter.as_deref() else {
        return Ok(Vec::new());
    };

    let entries: Map<String, Value> = serde_json::from_str(filter)
        .map_err(|e| QueryError::MalformedParameter { name: "filter", detail: e.to_string() })?;

    entries
        .iter()
        .map(|(field, condition)| {
            check_guard(field, filter_guard)?;
            let (operator, value) = parse_condition(field, condition)?;
            Ok(FilterCondition { field: field.clone(), operator, value: normalize_value(value) })
        })
        .collect()
}

fn check_guard(field: &str, filter_guard: &Value) -> Result<(), QueryError> {
    match guard::validate(field, filter_guard) {
        GuardOutcome::Allowed => Ok(()),
        GuardOutcome::Rejected => {
            Err(QueryError::FieldNotAllowed { field: field.to_string(), usage: "filter" })
        }
        GuardOutcome::Misconfigured => {
            Err(QueryError::GuardMisconfigured { guard: "filter_fields" })
        }
    }
}

/// Split a raw condition into operator and value. Objects are structured
/// conditions; everything else is an equality test against the value itself.
fn parse_condition(field: &str, condition: &Value) -> Result<(FilterOperator, Value), QueryError> {
    let Some(structured) = condition.as_object() else {
        return Ok((FilterOperator::Eq, condition.clone()));
    };

    let value = structured
        .get("value")
        .ok_or_else(|| QueryError::MissingFilterValue { field: field.to_string() })?;

    let operator = match structured.get("operator") {
        None | Some(Value::Null) => FilterOperator::Eq,
        Some(Value::String(op)) => op.parse()?,
        Some(other) => return Err(QueryError::InvalidFilterOperator { given: other.to_string() }),
    };

    Ok((operator, value.clone()))
}

/// Coerce the literal strings `true`/`false`/`null` (any case) to their JSON
/// counterparts; pass everything else through unchanged. No numeric
/// coercion and no partial matches: `"42"` stays a string, `"TrueLove"`
/// stays `"TrueLove"`.
#[must_use]
pub fn normalize_value(value: Value) -> Value {
    let Value::String(ref s) = value else {
        return value;
    };
    match s.to_lowercase().as_str() {
        "true" => Value::Bool(true),
        "false" => Value::Bool(false),
        "null" => Value::Null,
        _ => value,
    }
}
