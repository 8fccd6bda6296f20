//! # Query Parameter Parser
//!
//! Parses the raw query string into an ordered parameter set and checks it
//! against an endpoint's allow-list.

use super::errors::ClientError;

/// Query parameters as received, in received order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct QueryParameters {
    pairs: Vec<(String, String)>,
}

impl QueryParameters {
    /// Parse a raw (still percent-encoded) query string
    pub fn parse(raw: Option<&str>) -> Result<Self, ClientError> {
        let raw = match raw {
            Some(raw) if !raw.is_empty() => raw,
            _ => return Ok(Self::default()),
        };

        let pairs: Vec<(String, String)> = serde_urlencoded::from_str(raw)
            .map_err(|_| ClientError::bad_request("Malformed query string"))?;

        Ok(Self { pairs })
    }

    /// Value of a parameter. A repeated name resolves to its last value.
    pub fn get(&self, name: &str) -> Option<&str> {
        self.pairs
            .iter()
            .rev()
            .find(|(key, _)| key == name)
            .map(|(_, value)| value.as_str())
    }

    pub fn contains(&self, name: &str) -> bool {
        self.pairs.iter().any(|(key, _)| key == name)
    }

    /// Parameter names in received order
    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.pairs.iter().map(|(key, _)| key.as_str())
    }

    pub fn is_empty(&self) -> bool {
        self.pairs.is_empty()
    }

    pub fn len(&self) -> usize {
        self.pairs.len()
    }
}

impl<K, V> FromIterator<(K, V)> for QueryParameters
where
    K: Into<String>,
    V: Into<String>,
{
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        Self {
            pairs: iter
                .into_iter()
                .map(|(key, value)| (key.into(), value.into()))
                .collect(),
        }
    }
}

/// An endpoint's allow-list: parameter name to SQL predicate template.
///
/// Parameters that only steer the query shape (`page`) carry an empty
/// template.
#[derive(Debug, Clone, Copy)]
pub struct ValidParams {
    entries: &'static [(&'static str, &'static str)],
}

impl ValidParams {
    /// Allow-list that accepts nothing
    pub const NONE: ValidParams = ValidParams::new(&[]);

    pub const fn new(entries: &'static [(&'static str, &'static str)]) -> Self {
        Self { entries }
    }

    pub fn contains(&self, name: &str) -> bool {
        self.entries.iter().any(|(key, _)| *key == name)
    }

    /// Predicate template for `name`, if it has one
    pub fn predicate(&self, name: &str) -> Option<&'static str> {
        self.entries
            .iter()
            .find(|(key, _)| *key == name)
            .map(|(_, template)| *template)
            .filter(|template| !template.is_empty())
    }
}

/// Reject the first parameter name that is not in the allow-list.
///
/// An empty parameter set is always valid here; endpoints that need at least
/// one parameter enforce that themselves.
pub fn validate(params: &QueryParameters, valid: &ValidParams) -> Result<bool, ClientError> {
    match params.names().find(|name| !valid.contains(name)) {
        Some(unknown) => Err(ClientError::invalid_parameter(format!(
            "Unknown Parameter {}",
            unknown
        ))),
        None => Ok(true),
    }
}

/// Generic numeric-string test: optional sign, digits with an optional
/// fraction, optional exponent. Surrounding whitespace is allowed.
///
/// Scanned by hand because `str::parse::<f64>` also accepts `inf`, `NaN`
/// and `infinity`, which are not numbers to a caller.
pub fn is_numeric(value: &str) -> bool {
    let value = value.trim();
    let bytes = value.as_bytes();
    let mut i = 0;

    if i < bytes.len() && (bytes[i] == b'+' || bytes[i] == b'-') {
        i += 1;
    }

    let int_start = i;
    while i < bytes.len() && bytes[i].is_ascii_digit() {
        i += 1;
    }
    let mut digits = i - int_start;

    if i < bytes.len() && bytes[i] == b'.' {
        i += 1;
        let frac_start = i;
        while i < bytes.len() && bytes[i].is_ascii_digit() {
            i += 1;
        }
        digits += i - frac_start;
    }

    if digits == 0 {
        return false;
    }

    if i < bytes.len() && (bytes[i] == b'e' || bytes[i] == b'E') {
        i += 1;
        if i < bytes.len() && (bytes[i] == b'+' || bytes[i] == b'-') {
            i += 1;
        }
        let exp_start = i;
        while i < bytes.len() && bytes[i].is_ascii_digit() {
            i += 1;
        }
        if i == exp_start {
            return false;
        }
    }

    i == bytes.len()
}

/// Largest magnitude below which every integer is exact in an `f64` (2^53)
const MAX_EXACT_FLOAT: f64 = 9_007_199_254_740_992.0;

/// Why a numeric string is not usable as an `i64`
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WholeNumberError {
    NotANumber,
    Fractional,
    OutOfRange,
}

/// Integer value of a numeric string. Plain integers are read exactly across
/// the whole `i64` range; integral float forms such as `"3.0"` or `"1e3"`
/// only within ±2^53.
pub fn whole_number(value: &str) -> Result<i64, WholeNumberError> {
    let value = value.trim();
    if let Ok(number) = value.parse::<i64>() {
        return Ok(number);
    }

    match value.parse::<f64>() {
        Ok(number) if is_numeric(value) => whole_float(number),
        _ => Err(WholeNumberError::NotANumber),
    }
}

/// Integer value of a float that is integral and exactly representable
pub fn whole_float(number: f64) -> Result<i64, WholeNumberError> {
    if !number.is_finite() || number.abs() > MAX_EXACT_FLOAT {
        return Err(WholeNumberError::OutOfRange);
    }
    if number.fract() != 0.0 {
        return Err(WholeNumberError::Fractional);
    }
    Ok(number as i64)
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::StatusCode;

    const PARAMS: ValidParams = ValidParams::new(&[
        ("content_id", "content.id = :content_id"),
        ("search", "content.title LIKE :search"),
        ("page", ""),
    ]);

    #[test]
    fn test_parse_keeps_received_order() {
        let params = QueryParameters::parse(Some("search=paper&content_id=5&page=2")).unwrap();
        let names: Vec<&str> = params.names().collect();
        assert_eq!(names, vec!["search", "content_id", "page"]);
        assert_eq!(params.get("content_id"), Some("5"));
    }

    #[test]
    fn test_parse_decodes_values() {
        let params = QueryParameters::parse(Some("search=calm%20interfaces")).unwrap();
        assert_eq!(params.get("search"), Some("calm interfaces"));

        let params = QueryParameters::parse(Some("search=a+b")).unwrap();
        assert_eq!(params.get("search"), Some("a b"));
    }

    #[test]
    fn test_parse_empty() {
        assert!(QueryParameters::parse(None).unwrap().is_empty());
        assert!(QueryParameters::parse(Some("")).unwrap().is_empty());
    }

    #[test]
    fn test_repeated_name_last_wins() {
        let params = QueryParameters::parse(Some("page=1&page=3")).unwrap();
        assert_eq!(params.get("page"), Some("3"));
        assert_eq!(params.len(), 2);
    }

    #[test]
    fn test_validate_accepts_known() {
        let params: QueryParameters = [("content_id", "5"), ("page", "1")].into_iter().collect();
        assert!(validate(&params, &PARAMS).unwrap());
        assert!(validate(&QueryParameters::default(), &PARAMS).unwrap());
    }

    #[test]
    fn test_validate_names_first_unknown() {
        let params: QueryParameters = [("content_id", "5"), ("colour", "red"), ("size", "9")]
            .into_iter()
            .collect();

        let err = validate(&params, &PARAMS).unwrap_err();
        assert_eq!(err.status(), StatusCode::UNPROCESSABLE_ENTITY);
        assert_eq!(err.message(), "Invalid Parameter: Unknown Parameter colour");
    }

    #[test]
    fn test_empty_allow_list_rejects_everything() {
        let params: QueryParameters = [("page", "1")].into_iter().collect();
        assert!(validate(&params, &ValidParams::NONE).is_err());
    }

    #[test]
    fn test_predicate_lookup() {
        assert_eq!(PARAMS.predicate("content_id"), Some("content.id = :content_id"));
        assert_eq!(PARAMS.predicate("page"), None);
        assert_eq!(PARAMS.predicate("author_id"), None);
    }

    #[test]
    fn test_is_numeric() {
        for ok in ["5", "-3", "+7", "2.5", ".5", "5.", "1e3", "1.5E-2", " 12 "] {
            assert!(is_numeric(ok), "{ok} should be numeric");
        }
        for bad in ["", "abc", "5a", "1e", "--1", ".", "inf", "NaN", "0x1A", "1 2"] {
            assert!(!is_numeric(bad), "{bad} should not be numeric");
        }
    }

    #[test]
    fn test_whole_number() {
        assert_eq!(whole_number("42"), Ok(42));
        assert_eq!(whole_number(" -7 "), Ok(-7));
        assert_eq!(whole_number("3.0"), Ok(3));
        assert_eq!(whole_number("1e3"), Ok(1000));
        assert_eq!(whole_number("9007199254740993"), Ok(9_007_199_254_740_993));
        assert_eq!(whole_number("9223372036854775807"), Ok(i64::MAX));
        assert_eq!(whole_number("2.5"), Err(WholeNumberError::Fractional));
        assert_eq!(whole_number("9223372036854775808"), Err(WholeNumberError::OutOfRange));
        assert_eq!(whole_number("9007199254740993.0"), Err(WholeNumberError::OutOfRange));
        assert_eq!(whole_number("inf"), Err(WholeNumberError::NotANumber));
        assert_eq!(whole_number("seven"), Err(WholeNumberError::NotANumber));
    }
}
