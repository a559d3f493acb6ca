//! Request parameters as seen by validation stages
//!
//! Mirrors an HTTP form or query string: every name maps to the ordered
//! list of values it was given. The `required_*` helpers produce the
//! missing/malformed parameter errors handlers report back to clients.

use crate::error::{StreelityError, StreelityResult};
use std::collections::HashMap;

#[derive(Debug, Clone, Default, PartialEq)]
pub struct Params {
    values: HashMap<String, Vec<String>>,
}

impl Params {
    pub fn new() -> Self {
        Self::default()
    }

    /// Decode a URL-encoded query or form body (`a=1&a=2&b=x`)
    ///
    /// A leading `?` is ignored. Repeated names keep every value in order.
    pub fn from_query(query: &str) -> Self {
        let query = query.strip_prefix('?').unwrap_or(query);
        url::form_urlencoded::parse(query.as_bytes())
            .map(|(name, value)| (name.into_owned(), value.into_owned()))
            .collect()
    }

    pub fn append(&mut self, name: impl Into<String>, value: impl Into<String>) {
        self.values.entry(name.into()).or_default().push(value.into());
    }

    pub fn get(&self, name: &str) -> Option<&[String]> {
        self.values.get(name).map(Vec::as_slice)
    }

    pub fn first(&self, name: &str) -> Option<&str> {
        self.get(name)
            .and_then(|values| values.first())
            .map(String::as_str)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.values.contains_key(name)
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    /// All values for `name`, or a missing-parameter error
    pub fn required(&self, name: &str) -> StreelityResult<&[String]> {
        self.get(name)
            .ok_or_else(|| StreelityError::MissingParam(name.to_string()))
    }

    /// First value for `name`, or a missing-parameter error
    ///
    /// A name given with an empty value list counts as missing.
    pub fn required_first(&self, name: &str) -> StreelityResult<&str> {
        self.required(name)?
            .first()
            .map(String::as_str)
            .ok_or_else(|| StreelityError::MissingParam(name.to_string()))
    }

    pub fn required_int(&self, name: &str) -> StreelityResult<i64> {
        parse_int(name, self.required_first(name)?)
    }

    pub fn required_float(&self, name: &str) -> StreelityResult<f64> {
        parse_float(name, self.required_first(name)?)
    }

    /// First two values for `name`, e.g. a `location` given as lat then lon
    pub fn required_pair(&self, name: &str) -> StreelityResult<(&str, &str)> {
        match self.required(name)? {
            [first, second, ..] => Ok((first.as_str(), second.as_str())),
            _ => Err(StreelityError::InvalidParam(format!(
                "{} param must have 2 values",
                name
            ))),
        }
    }
}

/// Parse `raw` as a 64-bit integer, naming `label` in the error
pub fn parse_int(label: &str, raw: &str) -> StreelityResult<i64> {
    raw.parse::<i64>()
        .map_err(|_| StreelityError::malformed(label, "int"))
}

/// Parse `raw` as a 64-bit float, naming `label` in the error
pub fn parse_float(label: &str, raw: &str) -> StreelityResult<f64> {
    raw.parse::<f64>()
        .map_err(|_| StreelityError::malformed(label, "float"))
}

impl<K, V> FromIterator<(K, V)> for Params
where
    K: Into<String>,
    V: Into<String>,
{
    fn from_iter<T: IntoIterator<Item = (K, V)>>(iter: T) -> Self {
        let mut params = Params::new();
        for (name, value) in iter {
            params.append(name, value);
        }
        params
    }
}

impl From<HashMap<String, Vec<String>>> for Params {
    fn from(values: HashMap<String, Vec<String>>) -> Self {
        Self { values }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_query() {
        let params = Params::from_query("?location=10.5&location=20.25&address=1%20Le%20Loi");

        assert_eq!(
            params.get("location").unwrap(),
            &["10.5".to_string(), "20.25".to_string()]
        );
        assert_eq!(params.first("address"), Some("1 Le Loi"));
        assert_eq!(params.len(), 2);
    }

    #[test]
    fn test_empty_query() {
        let params = Params::from_query("");
        assert!(params.is_empty());
        assert!(params.get("id").is_none());
    }

    #[test]
    fn test_required_missing() {
        let params = Params::new();
        let err = params.required("range").unwrap_err();

        assert!(matches!(err, StreelityError::MissingParam(_)));
        assert_eq!(err.to_string(), "range param is missing");
    }

    #[test]
    fn test_required_int() {
        let params: Params = vec![("id", "42"), ("order", "abc")].into_iter().collect();

        assert_eq!(params.required_int("id").unwrap(), 42);
        let err = params.required_int("order").unwrap_err();
        assert!(matches!(err, StreelityError::MalformedParam { .. }));
        assert_eq!(err.to_string(), "cannot parse order to int");
    }

    #[test]
    fn test_required_float() {
        let params = Params::from_query("range=3.0&lat=north");

        assert_eq!(params.required_float("range").unwrap(), 3.0);
        assert_eq!(
            params.required_float("lat").unwrap_err().to_string(),
            "cannot parse lat to float"
        );
    }

    #[test]
    fn test_required_pair() {
        let params = Params::from_query("location=1&location=2&location=3&single=1");

        assert_eq!(params.required_pair("location").unwrap(), ("1", "2"));
        assert_eq!(
            params.required_pair("single").unwrap_err().to_string(),
            "single param must have 2 values"
        );
        assert!(matches!(
            params.required_pair("absent"),
            Err(StreelityError::MissingParam(_))
        ));
    }

    #[test]
    fn test_empty_value_list_counts_as_missing() {
        let mut values = HashMap::new();
        values.insert("body".to_string(), Vec::new());
        let params = Params::from(values);

        assert!(params.contains("body"));
        assert!(params.required("body").is_ok());
        assert!(matches!(
            params.required_first("body"),
            Err(StreelityError::MissingParam(_))
        ));
    }

    #[test]
    fn test_parse_helpers() {
        assert_eq!(parse_int("id", "-7").unwrap(), -7);
        assert!(parse_int("id", "7.5").is_err());
        assert_eq!(parse_float("location[1]", "20.25").unwrap(), 20.25);
        assert_eq!(
            parse_float("location[0]", "x").unwrap_err().to_string(),
            "cannot parse location[0] to float"
        );
    }
}
