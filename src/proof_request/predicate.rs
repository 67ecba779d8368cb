//! # Predicate Mapping
//!
//! Maps JSON Schema numeric range keywords in a field filter to `AnonCreds`
//! predicates.

use serde_json::Value;

use super::PredicateType;
use crate::dif_exch::Filter;
use crate::{Error, Result};

// Supported keywords, in the order predicates are generated.
const RANGE_KEYWORDS: [(&str, PredicateType); 4] = [
    ("exclusiveMinimum", PredicateType::GreaterThan),
    ("minimum", PredicateType::GreaterThanOrEqual),
    ("exclusiveMaximum", PredicateType::LessThan),
    ("maximum", PredicateType::LessThanOrEqual),
];

/// Translate a field filter into one `(operator, value)` pair per range
/// keyword. A lower bound always precedes an upper bound.
///
/// # Errors
///
/// Returns `UnsupportedFilter` if the filter is missing, contains a keyword
/// other than `type` and the four numeric range keywords, or has a value that
/// is not a 32-bit integer.
pub fn predicates(filter: Option<&Filter>) -> Result<Vec<(PredicateType, i32)>> {
    let Some(filter) = filter else {
        return Err(Error::UnsupportedFilter("predicate field has no filter".into()));
    };

    if let Some(key) =
        filter.keywords.keys().find(|k| !RANGE_KEYWORDS.iter().any(|(kw, _)| kw == k))
    {
        return Err(Error::UnsupportedFilter(format!("unsupported filter property '{key}'")));
    }

    let mut predicates = vec![];
    for (keyword, p_type) in RANGE_KEYWORDS {
        let Some(value) = filter.keywords.get(keyword) else {
            continue;
        };
        predicates.push((p_type, to_i32(keyword, value)?));
    }
    Ok(predicates)
}

fn to_i32(keyword: &str, value: &Value) -> Result<i32> {
    value
        .as_i64()
        .and_then(|v| i32::try_from(v).ok())
        .ok_or_else(|| Error::UnsupportedFilter(format!("'{keyword}' must be an integer: {value}")))
}
