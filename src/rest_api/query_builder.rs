//! # Query Clause Builder
//!
//! Turns recognised query parameters into the tail of a `SELECT`: joins,
//! a single `WHERE`, grouping and pagination, plus the named values to bind.
//!
//! Only static, parameter-free text (joins, predicate templates, grouping)
//! is ever concatenated into the SQL. Caller-supplied values are bound.

use rusqlite::types::{ToSql, ToSqlOutput};

use super::errors::ClientError;
use super::parser::{
    is_numeric, validate, whole_number, QueryParameters, ValidParams, WholeNumberError,
};

/// Rows per page
pub const PAGE_SIZE: i64 = 10;

/// Identifier filters that must be numeric, in predicate order
const NUMERIC_FILTERS: [&str; 2] = ["content_id", "author_id"];

const SEARCH: &str = "search";
const PAGE: &str = "page";
const OFFSET: &str = "offset";

/// Joins appended only when the named parameter is present
pub type RequiredJoins = [(&'static str, &'static str)];

/// A value bound to a named placeholder
#[derive(Debug, Clone, PartialEq)]
pub enum BoundValue {
    Text(String),
    Integer(i64),
}

impl ToSql for BoundValue {
    fn to_sql(&self) -> rusqlite::Result<ToSqlOutput<'_>> {
        match self {
            BoundValue::Text(text) => text.to_sql(),
            BoundValue::Integer(value) => value.to_sql(),
        }
    }
}

impl From<&str> for BoundValue {
    fn from(value: &str) -> Self {
        BoundValue::Text(value.to_string())
    }
}

impl From<String> for BoundValue {
    fn from(value: String) -> Self {
        BoundValue::Text(value)
    }
}

impl From<i64> for BoundValue {
    fn from(value: i64) -> Self {
        BoundValue::Integer(value)
    }
}

/// Placeholder name (without the leading `:`) to bound value
#[derive(Debug, Clone, Default, PartialEq)]
pub struct BoundParams {
    values: Vec<(String, BoundValue)>,
}

impl BoundParams {
    pub fn new() -> Self {
        Self::default()
    }

    /// Bind `value` to `:name`, replacing an earlier binding of the same name
    pub fn bind(&mut self, name: impl Into<String>, value: impl Into<BoundValue>) {
        let name = name.into();
        let value = value.into();
        match self.values.iter_mut().find(|(key, _)| *key == name) {
            Some(slot) => slot.1 = value,
            None => self.values.push((name, value)),
        }
    }

    /// Builder-style [`BoundParams::bind`]
    pub fn with(mut self, name: impl Into<String>, value: impl Into<BoundValue>) -> Self {
        self.bind(name, value);
        self
    }

    pub fn get(&self, name: &str) -> Option<&BoundValue> {
        self.values
            .iter()
            .find(|(key, _)| key == name)
            .map(|(_, value)| value)
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    /// `(":name", value)` pairs ready for rusqlite's named binding
    pub fn to_named(&self) -> Vec<(String, &dyn ToSql)> {
        self.values
            .iter()
            .map(|(name, value)| (format!(":{}", name), value as &dyn ToSql))
            .collect()
    }
}

/// Output of a build: the SQL tail and its bindings
#[derive(Debug, Clone, Default, PartialEq)]
pub struct QueryClauses {
    pub sql: String,
    pub params: BoundParams,
}

/// Per-endpoint clause builder.
///
/// ```ignore
/// let clauses = QueryBuilder::new(&VALID_PARAMS)
///     .joins(REQUIRED_JOINS)
///     .grouping("GROUP BY author.id")
///     .build(request.query())?;
/// ```
#[derive(Debug, Clone, Copy)]
pub struct QueryBuilder<'a> {
    valid: &'a ValidParams,
    joins: &'a RequiredJoins,
    grouping: &'a str,
}

impl<'a> QueryBuilder<'a> {
    pub fn new(valid: &'a ValidParams) -> Self {
        Self {
            valid,
            joins: &[],
            grouping: "",
        }
    }

    pub fn joins(mut self, joins: &'a RequiredJoins) -> Self {
        self.joins = joins;
        self
    }

    pub fn grouping(mut self, grouping: &'a str) -> Self {
        self.grouping = grouping;
        self
    }

    pub fn build(&self, params: &QueryParameters) -> Result<QueryClauses, ClientError> {
        build(params, self.valid, self.joins, self.grouping)
    }
}

/// Build the SQL tail for `params`.
///
/// Order of the output: joins, `WHERE`, grouping, `LIMIT`/`OFFSET`.
/// Predicates are emitted content_id, author_id, search regardless of the
/// order the caller sent them in. Nothing is emitted if validation fails.
pub fn build(
    params: &QueryParameters,
    valid: &ValidParams,
    required_joins: &RequiredJoins,
    required_grouping: &str,
) -> Result<QueryClauses, ClientError> {
    validate(params, valid)?;

    let mut sql = String::new();
    let mut bound = BoundParams::new();
    let mut filters: Vec<&str> = Vec::new();

    for (name, join) in required_joins {
        if params.contains(name) {
            sql.push(' ');
            sql.push_str(join);
        }
    }

    for name in NUMERIC_FILTERS {
        if let Some(value) = params.get(name) {
            if !is_numeric(value) {
                return Err(expected_number(name));
            }
            if let Some(predicate) = valid.predicate(name) {
                filters.push(predicate);
                bound.bind(name, value);
            }
        }
    }

    if let Some(value) = params.get(SEARCH) {
        if let Some(predicate) = valid.predicate(SEARCH) {
            filters.push(predicate);
            bound.bind(SEARCH, format!("%{}%", value));
        }
    }

    if !filters.is_empty() {
        sql.push_str(" WHERE ");
        sql.push_str(&filters.join(" AND "));
    }

    if !required_grouping.is_empty() {
        sql.push(' ');
        sql.push_str(required_grouping);
    }

    if let Some(value) = params.get(PAGE) {
        let offset = page_offset(value)?;
        sql.push_str(&format!(" LIMIT {} OFFSET :{}", PAGE_SIZE, OFFSET));
        bound.bind(OFFSET, offset);
    }

    Ok(QueryClauses { sql, params: bound })
}

/// `(page - 1) * PAGE_SIZE` for a whole page number of at least 1
fn page_offset(value: &str) -> Result<i64, ClientError> {
    let page = match whole_number(value) {
        Ok(page) if page >= 1 => page,
        Ok(_) | Err(WholeNumberError::Fractional) => {
            return Err(ClientError::invalid_parameter(
                "page must be a whole number of 1 or more",
            ))
        }
        Err(WholeNumberError::OutOfRange) => return Err(out_of_range()),
        Err(WholeNumberError::NotANumber) => return Err(expected_number(PAGE)),
    };

    page.checked_sub(1)
        .and_then(|page| page.checked_mul(PAGE_SIZE))
        .ok_or_else(out_of_range)
}

fn out_of_range() -> ClientError {
    ClientError::invalid_parameter("page is out of range")
}

fn expected_number(name: &str) -> ClientError {
    ClientError::invalid_parameter(format!("{}: Expected a number.", name))
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::StatusCode;

    const VALID: ValidParams = ValidParams::new(&[
        ("content_id", "content.id = :content_id"),
        ("author_id", "content_has_author.author = :author_id"),
        ("search", "content.title LIKE :search"),
        ("page", ""),
    ]);

    const JOINS: &RequiredJoins = &[(
        "author_id",
        "JOIN content_has_author ON content.id = content_has_author.content",
    )];

    fn params(pairs: &[(&str, &str)]) -> QueryParameters {
        pairs.iter().copied().collect()
    }

    #[test]
    fn test_no_params_no_where() {
        let clauses = build(&params(&[]), &VALID, JOINS, "GROUP BY content.id").unwrap();
        assert_eq!(clauses.sql, " GROUP BY content.id");
        assert!(clauses.params.is_empty());
    }

    #[test]
    fn test_fixed_predicate_order() {
        let clauses = build(
            &params(&[("search", "paper"), ("content_id", "5")]),
            &VALID,
            &[],
            "",
        )
        .unwrap();

        assert_eq!(
            clauses.sql,
            " WHERE content.id = :content_id AND content.title LIKE :search"
        );
        assert_eq!(clauses.params.get("content_id"), Some(&BoundValue::from("5")));
        assert_eq!(clauses.params.get("search"), Some(&BoundValue::from("%paper%")));
        assert_eq!(clauses.params.len(), 2);
    }

    #[test]
    fn test_join_only_when_present() {
        let without = build(&params(&[("content_id", "1")]), &VALID, JOINS, "").unwrap();
        assert!(!without.sql.contains("JOIN"));

        let with = build(&params(&[("author_id", "2")]), &VALID, JOINS, "").unwrap();
        assert_eq!(
            with.sql,
            " JOIN content_has_author ON content.id = content_has_author.content \
             WHERE content_has_author.author = :author_id"
        );
    }

    #[test]
    fn test_pagination_after_grouping() {
        let clauses = build(
            &params(&[("page", "3"), ("author_id", "2")]),
            &VALID,
            JOINS,
            "GROUP BY content.id",
        )
        .unwrap();

        assert!(clauses.sql.ends_with(" GROUP BY content.id LIMIT 10 OFFSET :offset"));
        assert_eq!(clauses.params.get("offset"), Some(&BoundValue::Integer(20)));
    }

    #[test]
    fn test_first_page_offset_zero() {
        let clauses = build(&params(&[("page", "1")]), &VALID, &[], "").unwrap();
        assert_eq!(clauses.sql, " LIMIT 10 OFFSET :offset");
        assert_eq!(clauses.params.get("offset"), Some(&BoundValue::Integer(0)));
    }

    #[test]
    fn test_non_numeric_identifier() {
        let err = build(&params(&[("content_id", "five")]), &VALID, &[], "").unwrap_err();
        assert_eq!(err.status(), StatusCode::UNPROCESSABLE_ENTITY);
        assert_eq!(err.message(), "Invalid Parameter: content_id: Expected a number.");

        let err = build(&params(&[("author_id", "")]), &VALID, &[], "").unwrap_err();
        assert_eq!(err.message(), "Invalid Parameter: author_id: Expected a number.");
    }

    #[test]
    fn test_float_identifier_accepted() {
        let clauses = build(&params(&[("content_id", "2.0")]), &VALID, &[], "").unwrap();
        assert_eq!(clauses.params.get("content_id"), Some(&BoundValue::from("2.0")));
    }

    #[test]
    fn test_page_validation() {
        let err = build(&params(&[("page", "two")]), &VALID, &[], "").unwrap_err();
        assert_eq!(err.message(), "Invalid Parameter: page: Expected a number.");

        for bad in ["0", "-1", "1.5"] {
            let err = build(&params(&[("page", bad)]), &VALID, &[], "").unwrap_err();
            assert_eq!(err.status(), StatusCode::UNPROCESSABLE_ENTITY, "page={bad}");
        }

        let err = build(&params(&[("page", "1e300")]), &VALID, &[], "").unwrap_err();
        assert_eq!(err.message(), "Invalid Parameter: page is out of range");
    }

    #[test]
    fn test_page_offset_overflow_is_rejected() {
        // (i64::MAX / PAGE_SIZE) rounds up to this value as an f64
        let err = build(&params(&[("page", "922337203685477632")]), &VALID, &[], "").unwrap_err();
        assert_eq!(err.status(), StatusCode::UNPROCESSABLE_ENTITY);
        assert_eq!(err.message(), "Invalid Parameter: page is out of range");

        let err = build(&params(&[("page", "9223372036854775807")]), &VALID, &[], "").unwrap_err();
        assert_eq!(err.message(), "Invalid Parameter: page is out of range");
    }

    #[test]
    fn test_last_addressable_page() {
        let last = (i64::MAX / PAGE_SIZE + 1).to_string();
        let clauses = build(&params(&[("page", last.as_str())]), &VALID, &[], "").unwrap();
        assert_eq!(
            clauses.params.get("offset"),
            Some(&BoundValue::Integer(i64::MAX / PAGE_SIZE * PAGE_SIZE))
        );
    }

    #[test]
    fn test_unknown_parameter_aborts_build() {
        let err = build(
            &params(&[("content_id", "5"), ("sort", "title")]),
            &VALID,
            JOINS,
            "GROUP BY content.id",
        )
        .unwrap_err();
        assert_eq!(err.message(), "Invalid Parameter: Unknown Parameter sort");
    }

    #[test]
    fn test_search_is_not_number_checked() {
        let clauses = build(&params(&[("search", "42%")]), &VALID, &[], "").unwrap();
        assert_eq!(clauses.params.get("search"), Some(&BoundValue::from("%42%%")));
    }

    #[test]
    fn test_builder_matches_free_function() {
        let input = params(&[("author_id", "4"), ("page", "2")]);
        let via_builder = QueryBuilder::new(&VALID)
            .joins(JOINS)
            .grouping("GROUP BY content.id")
            .build(&input)
            .unwrap();
        let direct = build(&input, &VALID, JOINS, "GROUP BY content.id").unwrap();
        assert_eq!(via_builder, direct);
    }
}
