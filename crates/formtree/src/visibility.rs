//! Conditional visibility evaluation.
//!
//! A field with no `visible_when` rules is always visible; otherwise every
//! rule must hold (pure conjunction, short-circuiting on the first failure).
//! The target value is read from the full data snapshot; an absent key
//! evaluates as null.

use std::cmp::Ordering;

use serde_json::{Map, Value};
use tracing::warn;

use crate::fields::{Field, VisibilityOperator, VisibilityRule};

/// Evaluates whether `field` is visible for the given data snapshot.
pub fn evaluate_visibility(field: &Field, data: &Map<String, Value>) -> bool {
    let Some(rules) = &field.core().visible_when else {
        return true;
    };
    rules.iter().all(|rule| rule_holds(rule, data))
}

fn rule_holds(rule: &VisibilityRule, data: &Map<String, Value>) -> bool {
    let value = data.get(&rule.field).unwrap_or(&Value::Null);

    match &rule.operator {
        VisibilityOperator::Equals => loose_eq(value, &rule.value),
        VisibilityOperator::NotEquals => !loose_eq(value, &rule.value),
        VisibilityOperator::In => member_of(value, &rule.value),
        VisibilityOperator::NotIn => !member_of(value, &rule.value),
        VisibilityOperator::Gt => {
            !value.is_null() && compare(value, &rule.value) == Some(Ordering::Greater)
        }
        VisibilityOperator::Lt => {
            !value.is_null() && compare(value, &rule.value) == Some(Ordering::Less)
        }
        VisibilityOperator::IsEmpty => is_empty(value),
        VisibilityOperator::IsNotEmpty => !is_empty(value),
        // Unrecognized operators contribute nothing; the field stays visible
        // on this rule.
        VisibilityOperator::Other(operator) => {
            warn!(%operator, field = %rule.field, "unknown visibility operator");
            true
        }
    }
}

/// Structural equality with value-based numeric comparison, so `1` equals
/// `1.0` across integer/float JSON representations.
fn loose_eq(a: &Value, b: &Value) -> bool {
    match (a.as_f64(), b.as_f64()) {
        (Some(x), Some(y)) if a.is_number() && b.is_number() => x == y,
        _ => a == b,
    }
}

/// Membership in the rule value, treating a null rule value as the empty
/// list.
fn member_of(value: &Value, haystack: &Value) -> bool {
    haystack
        .as_array()
        .is_some_and(|items| items.iter().any(|item| loose_eq(item, value)))
}

/// Orders numbers numerically and strings lexicographically; everything
/// else is non-comparable.
fn compare(a: &Value, b: &Value) -> Option<Ordering> {
    if a.is_number() && b.is_number() {
        return a.as_f64()?.partial_cmp(&b.as_f64()?);
    }
    match (a, b) {
        (Value::String(x), Value::String(y)) => Some(x.cmp(y)),
        _ => None,
    }
}

/// Null, empty string and empty list count as empty.
fn is_empty(value: &Value) -> bool {
    match value {
        Value::Null => true,
        Value::String(s) => s.is_empty(),
        Value::Array(items) => items.is_empty(),
        _ => false,
    }
}
