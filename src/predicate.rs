//! Compiles a [`FilterSpec`] into an ordered, parameterized predicate set.
//!
//! The same compiled set feeds every query shape (record listing, summary
//! statistics, grouped comparisons, monthly trends), so all of them see
//! exactly the same filtered population.
//!
//! Field order is fixed: year, suburb, layout, postcode, property type,
//! start date, end date. Predicates are always AND-ed together.

use std::collections::BTreeSet;
use std::fmt;

use chrono::NaiveDate;
use serde::Serialize;

use crate::filter::FilterSpec;
use crate::sql_builder::Param;

const YEAR_EXPR: &str = "YEAR(p.date_sold)";
const SUBURB_COLUMN: &str = "p.suburb_id";
const LAYOUT_COLUMN: &str = "p.layout_id";
const POSTCODE_COLUMN: &str = "s.postcode";
const PROPERTY_TYPE_COLUMN: &str = "p.property_type";
const DATE_COLUMN: &str = "p.date_sold";
const DATE_PLACEHOLDER: &str = "CAST(? AS DATE)";

// ---------------------------------------------------------------------------
// Predicate
// ---------------------------------------------------------------------------

/// One filter condition: a clause template, the name of the binding it
/// carries, and the bound values in placeholder order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Predicate {
    name: &'static str,
    clause: String,
    values: Vec<Param>,
}

impl Predicate {
    fn new(name: &'static str, clause: String, values: Vec<Param>) -> Self {
        Self {
            name,
            clause,
            values,
        }
    }

    /// Equality for one value, membership for several.
    fn selection(name: &'static str, expr: &str, values: Vec<Param>) -> Self {
        let clause = if values.len() == 1 {
            binary(expr, "=", "?")
        } else {
            let placeholders: Vec<&str> = values.iter().map(|_| "?").collect();
            format!("{} IN ({})", expr, placeholders.join(", "))
        };
        Self::new(name, clause, values)
    }

    /// A single bound compared with `op`.
    fn comparison(name: &'static str, expr: &str, op: &str, placeholder: &str, value: Param) -> Self {
        Self::new(name, binary(expr, op, placeholder), vec![value])
    }

    /// Parameter name identifying this binding (e.g. `"suburb_id"`).
    pub fn name(&self) -> &'static str {
        self.name
    }

    /// Clause template containing only fixed identifiers and `?` placeholders.
    pub fn clause(&self) -> &str {
        &self.clause
    }

    pub fn values(&self) -> &[Param] {
        &self.values
    }

    /// True when this predicate tests membership in a set of several values.
    pub fn is_membership(&self) -> bool {
        self.values.len() > 1
    }
}

impl fmt::Display for Predicate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} [{}]", self.clause, self.name)
    }
}

// ---------------------------------------------------------------------------
// PredicateSet
// ---------------------------------------------------------------------------

/// Ordered predicates compiled from one [`FilterSpec`].
///
/// An empty set matches the whole population.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct PredicateSet {
    predicates: Vec<Predicate>,
}

impl PredicateSet {
    /// Compile a filter specification.
    pub fn compile(spec: &FilterSpec) -> Self {
        let mut predicates = Vec::new();

        if !spec.years.is_empty() {
            predicates.push(Predicate::selection("year", YEAR_EXPR, int_params(&spec.years)));
        }

        if !spec.suburb_ids.is_empty() {
            predicates.push(Predicate::selection(
                "suburb_id",
                SUBURB_COLUMN,
                int_params(&spec.suburb_ids),
            ));
        }

        if !spec.layout_ids.is_empty() {
            predicates.push(Predicate::selection(
                "layout_id",
                LAYOUT_COLUMN,
                int_params(&spec.layout_ids),
            ));
        }

        if let Some(postcode) = spec.postcode {
            predicates.push(Predicate::selection(
                "postcode",
                POSTCODE_COLUMN,
                vec![Param::from(postcode)],
            ));
        }

        if let Some(ref property_type) = spec.property_type {
            predicates.push(Predicate::selection(
                "property_type",
                PROPERTY_TYPE_COLUMN,
                vec![Param::from(property_type.as_str())],
            ));
        }

        // Two independent inclusive bounds; an inverted range matches nothing.
        if let Some(from) = spec.date_from {
            predicates.push(Predicate::comparison(
                "date_from",
                DATE_COLUMN,
                ">=",
                DATE_PLACEHOLDER,
                date_param(from),
            ));
        }

        if let Some(to) = spec.date_to {
            predicates.push(Predicate::comparison(
                "date_to",
                DATE_COLUMN,
                "<=",
                DATE_PLACEHOLDER,
                date_param(to),
            ));
        }

        Self { predicates }
    }

    /// Number of WHERE fragments this set contributes.
    pub fn len(&self) -> usize {
        self.predicates.len()
    }

    pub fn is_empty(&self) -> bool {
        self.predicates.is_empty()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Predicate> {
        self.predicates.iter()
    }

    /// Look up a predicate by parameter name.
    pub fn get(&self, name: &str) -> Option<&Predicate> {
        self.predicates.iter().find(|p| p.name == name)
    }

    /// Parameter names in compiled order.
    pub fn names(&self) -> Vec<&'static str> {
        self.predicates.iter().map(|p| p.name).collect()
    }

    /// All bound values in placeholder order.
    pub fn params(&self) -> Vec<Param> {
        self.predicates
            .iter()
            .flat_map(|p| p.values.iter().cloned())
            .collect()
    }
}

impl<'a> IntoIterator for &'a PredicateSet {
    type Item = &'a Predicate;
    type IntoIter = std::slice::Iter<'a, Predicate>;

    fn into_iter(self) -> Self::IntoIter {
        self.predicates.iter()
    }
}

fn int_params<T: Copy + Into<i64>>(values: &BTreeSet<T>) -> Vec<Param> {
    values.iter().map(|v| Param::Int((*v).into())).collect()
}

fn date_param(date: NaiveDate) -> Param {
    Param::Text(date.format("%Y-%m-%d").to_string())
}

fn binary(expr: &str, op: &str, placeholder: &str) -> String {
    format!("{} {} {}", expr, op, placeholder)
}
