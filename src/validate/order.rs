//! Sort-order checks over enumerated items

use crate::query::SortDirection;
use crate::validate::records::{require, wrong_type};
use crate::validate::{ValidationError, ValidationResult};
use serde_json::Value;
use std::cmp::Ordering;

/// Verifies that `items` are monotonic on `field` in `direction`
///
/// Equal neighbours are allowed. The field must be a number on every item,
/// or a string on every item; strings compare lexicographically, which
/// orders ISO dates correctly.
pub fn check_order(
    items: &[Value],
    field: &str,
    direction: SortDirection,
    context: &str,
) -> ValidationResult {
    for (index, pair) in items.windows(2).enumerate() {
        let a = require(&pair[0], field, context)?;
        let b = require(&pair[1], field, context)?;

        let ordering = compare(a, b)
            .ok_or_else(|| wrong_type(context, field, "a number or string on every item"))?;

        let in_order = match direction {
            SortDirection::Ascending => ordering != Ordering::Greater,
            SortDirection::Descending => ordering != Ordering::Less,
        };
        if !in_order {
            return Err(ValidationError::OutOfOrder {
                context: context.to_string(),
                field: field.to_string(),
                index,
                next: index + 1,
            });
        }
    }
    Ok(())
}

fn compare(a: &Value, b: &Value) -> Option<Ordering> {
    match (a, b) {
        (Value::Number(x), Value::Number(y)) => x.as_f64()?.partial_cmp(&y.as_f64()?),
        (Value::String(x), Value::String(y)) => Some(x.cmp(y)),
        _ => None,
    }
}
