//! Value filters: one predicate against one attribute.
//!
//! A [`Comparison`] carries exactly the operands its shape needs, so a filter
//! can never hold the wrong number of values. [`ValueFilter::new`] is the
//! checked entry point for callers that hold a [`FilterType`] tag and a value
//! list instead.

use std::cmp::Ordering;
use std::fmt;

use crate::entity::{AttributeDefinition, Value};
use crate::error::{Error, Result};

/// Comparison shape of a filter.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FilterType {
    Equality,
    Inequality,
    LessThan,
    LessThanOrEqualTo,
    GreaterThan,
    GreaterThanOrEqualTo,
    Between,
    MatchesSet,
    DoesNotMatchSet,
    IsNull,
    IsNotNull,
}

impl FilterType {
    /// Number of values the tag takes, `None` for set filters.
    pub fn arity(self) -> Option<usize> {
        match self {
            FilterType::IsNull | FilterType::IsNotNull => Some(0),
            FilterType::Equality
            | FilterType::Inequality
            | FilterType::LessThan
            | FilterType::LessThanOrEqualTo
            | FilterType::GreaterThan
            | FilterType::GreaterThanOrEqualTo => Some(1),
            FilterType::Between => Some(2),
            FilterType::MatchesSet | FilterType::DoesNotMatchSet => None,
        }
    }
}

impl fmt::Display for FilterType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Debug::fmt(self, f)
    }
}

/// A comparison together with its operands.
#[derive(Debug, Clone, PartialEq)]
pub enum Comparison {
    /// `= v`, `LIKE v` for text, `IS NULL` for a null operand.
    Equality(Value),
    /// `<> v`, `NOT LIKE v` for text, `IS NOT NULL` for a null operand.
    Inequality(Value),
    LessThan(Value),
    LessThanOrEqualTo(Value),
    GreaterThan(Value),
    GreaterThanOrEqualTo(Value),
    /// Inclusive range, always stored low to high.
    Between { low: Value, high: Value },
    MatchesSet(Vec<Value>),
    DoesNotMatchSet(Vec<Value>),
    IsNull,
    IsNotNull,
}

impl Comparison {
    pub fn filter_type(&self) -> FilterType {
        match self {
            Comparison::Equality(_) => FilterType::Equality,
            Comparison::Inequality(_) => FilterType::Inequality,
            Comparison::LessThan(_) => FilterType::LessThan,
            Comparison::LessThanOrEqualTo(_) => FilterType::LessThanOrEqualTo,
            Comparison::GreaterThan(_) => FilterType::GreaterThan,
            Comparison::GreaterThanOrEqualTo(_) => FilterType::GreaterThanOrEqualTo,
            Comparison::Between { .. } => FilterType::Between,
            Comparison::MatchesSet(_) => FilterType::MatchesSet,
            Comparison::DoesNotMatchSet(_) => FilterType::DoesNotMatchSet,
            Comparison::IsNull => FilterType::IsNull,
            Comparison::IsNotNull => FilterType::IsNotNull,
        }
    }

    /// Values bound to parameters, in placeholder order.
    ///
    /// Null equality and inequality render as null checks and bind nothing.
    pub fn parameter_values(&self) -> Vec<&Value> {
        match self {
            Comparison::Equality(Value::Null) | Comparison::Inequality(Value::Null) => Vec::new(),
            Comparison::Equality(v)
            | Comparison::Inequality(v)
            | Comparison::LessThan(v)
            | Comparison::LessThanOrEqualTo(v)
            | Comparison::GreaterThan(v)
            | Comparison::GreaterThanOrEqualTo(v) => vec![v],
            Comparison::Between { low, high } => vec![low, high],
            Comparison::MatchesSet(values) | Comparison::DoesNotMatchSet(values) => {
                values.iter().collect()
            }
            Comparison::IsNull | Comparison::IsNotNull => Vec::new(),
        }
    }

    /// Number of parameters the comparison consumes.
    pub fn arity(&self) -> usize {
        self.parameter_values().len()
    }
}

/// A predicate against one attribute.
#[derive(Debug, Clone, PartialEq)]
pub struct ValueFilter {
    attribute: AttributeDefinition,
    comparison: Comparison,
}

impl ValueFilter {
    /// Build a filter from a tag and its values, checking the value count.
    pub fn new(
        attribute: AttributeDefinition,
        filter_type: FilterType,
        values: Vec<Value>,
    ) -> Result<Self> {
        if let Some(expected) = filter_type.arity() {
            if values.len() != expected {
                return Err(Error::invalid_argument(format!(
                    "{} filter on '{}' takes {} value(s), got {}",
                    filter_type,
                    attribute.property_name,
                    expected,
                    values.len()
                )));
            }
        }

        let mut values = values.into_iter();
        let comparison = match filter_type {
            FilterType::Equality => Comparison::Equality(operand(&mut values)),
            FilterType::Inequality => Comparison::Inequality(operand(&mut values)),
            FilterType::LessThan => Comparison::LessThan(operand(&mut values)),
            FilterType::LessThanOrEqualTo => Comparison::LessThanOrEqualTo(operand(&mut values)),
            FilterType::GreaterThan => Comparison::GreaterThan(operand(&mut values)),
            FilterType::GreaterThanOrEqualTo => {
                Comparison::GreaterThanOrEqualTo(operand(&mut values))
            }
            FilterType::Between => Comparison::Between {
                low: operand(&mut values),
                high: operand(&mut values),
            },
            FilterType::MatchesSet => Comparison::MatchesSet(values.collect()),
            FilterType::DoesNotMatchSet => Comparison::DoesNotMatchSet(values.collect()),
            FilterType::IsNull => Comparison::IsNull,
            FilterType::IsNotNull => Comparison::IsNotNull,
        };

        Self::with_comparison(attribute, comparison)
    }

    /// Build a filter from a comparison, rejecting null operands where the
    /// comparison has no null form.
    pub fn with_comparison(attribute: AttributeDefinition, comparison: Comparison) -> Result<Self> {
        match comparison {
            Comparison::Between { low, high } => Self::between(attribute, low, high),
            Comparison::MatchesSet(values) => Self::matches_set(attribute, values),
            Comparison::DoesNotMatchSet(values) => Self::does_not_match_set(attribute, values),
            Comparison::LessThan(Value::Null)
            | Comparison::LessThanOrEqualTo(Value::Null)
            | Comparison::GreaterThan(Value::Null)
            | Comparison::GreaterThanOrEqualTo(Value::Null) => Err(Error::invalid_argument(format!(
                "{} filter on '{}' cannot compare against null",
                comparison.filter_type(),
                attribute.property_name
            ))),
            comparison => Ok(Self {
                attribute,
                comparison,
            }),
        }
    }

    /// Equality filter. A null value matches absence.
    pub fn equal(attribute: AttributeDefinition, value: Value) -> Self {
        Self {
            attribute,
            comparison: Comparison::Equality(value),
        }
    }

    /// Inclusive range filter.
    ///
    /// Bounds given high to low are swapped; equal bounds degrade to an
    /// equality filter.
    pub fn between(attribute: AttributeDefinition, low: Value, high: Value) -> Result<Self> {
        if low.is_null() || high.is_null() {
            return Err(Error::invalid_argument(format!(
                "between filter on '{}' needs two non-null bounds",
                attribute.property_name
            )));
        }

        let comparison = match low.compare(&high) {
            Some(Ordering::Less) => Comparison::Between { low, high },
            Some(Ordering::Greater) => Comparison::Between {
                low: high,
                high: low,
            },
            Some(Ordering::Equal) => Comparison::Equality(low),
            None => {
                return Err(Error::invalid_argument(format!(
                    "between filter on '{}' has incomparable bounds {:?} and {:?}",
                    attribute.property_name, low, high
                )))
            }
        };

        Ok(Self {
            attribute,
            comparison,
        })
    }

    /// Set membership. Null members are dropped.
    pub fn matches_set(attribute: AttributeDefinition, values: Vec<Value>) -> Result<Self> {
        let values = non_null_members(&attribute, values)?;
        Ok(Self {
            attribute,
            comparison: Comparison::MatchesSet(values),
        })
    }

    /// Set exclusion. Null members are dropped.
    pub fn does_not_match_set(attribute: AttributeDefinition, values: Vec<Value>) -> Result<Self> {
        let values = non_null_members(&attribute, values)?;
        Ok(Self {
            attribute,
            comparison: Comparison::DoesNotMatchSet(values),
        })
    }

    pub fn attribute(&self) -> &AttributeDefinition {
        &self.attribute
    }

    pub fn comparison(&self) -> &Comparison {
        &self.comparison
    }

    pub fn filter_type(&self) -> FilterType {
        self.comparison.filter_type()
    }

    /// Values bound by this filter, in placeholder order.
    pub fn parameter_values(&self) -> Vec<&Value> {
        self.comparison.parameter_values()
    }
}

fn operand(values: &mut impl Iterator<Item = Value>) -> Value {
    values.next().unwrap_or(Value::Null)
}

fn non_null_members(attribute: &AttributeDefinition, values: Vec<Value>) -> Result<Vec<Value>> {
    let values: Vec<Value> = values.into_iter().filter(|v| !v.is_null()).collect();
    if values.is_empty() {
        return Err(Error::invalid_argument(format!(
            "set filter on '{}' needs at least one non-null value",
            attribute.property_name
        )));
    }
    Ok(values)
}
