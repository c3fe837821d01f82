use url::form_urlencoded;

/// An order-preserving multimap of query parameters.
///
/// Mirrors what a browser's `URLSearchParams` holds: a key may appear
/// several times and entries keep their insertion order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct QueryParams {
    pairs: Vec<(String, String)>,
}

/// A value to write under a query key with [`QueryParams::encode`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ParamValue {
    Absent,
    Scalar(String),
    List(Vec<String>),
}

impl QueryParams {
    pub fn new() -> Self {
        Self::default()
    }

    /// Parse a query string. A leading `?` is ignored.
    pub fn parse(query: &str) -> Self {
        let query = query.strip_prefix('?').unwrap_or(query);
        let pairs = form_urlencoded::parse(query.as_bytes())
            .map(|(k, v)| (k.into_owned(), v.into_owned()))
            .collect();
        Self { pairs }
    }

    /// First value stored under `key`.
    pub fn get(&self, key: &str) -> Option<&str> {
        self.pairs
            .iter()
            .find(|(k, _)| k == key)
            .map(|(_, v)| v.as_str())
    }

    /// Every value stored under `key`, in insertion order.
    pub fn get_all(&self, key: &str) -> Vec<&str> {
        self.pairs
            .iter()
            .filter(|(k, _)| k == key)
            .map(|(_, v)| v.as_str())
            .collect()
    }

    /// Replace every value under `key` with a single one.
    ///
    /// The new entry takes the position of the first existing one, so
    /// rewriting a key does not reorder the query string.
    pub fn set(&mut self, key: &str, value: impl Into<String>) {
        self.replace_all(key, vec![value.into()]);
    }

    /// Replace every value under `key` with `values`, placed where the first
    /// existing entry was (or at the end for a new key).
    fn replace_all(&mut self, key: &str, values: Vec<String>) {
        let first = self.pairs.iter().position(|(k, _)| k == key);
        self.delete(key);
        let at = first.unwrap_or(self.pairs.len());
        let tail = self.pairs.split_off(at);
        self.pairs
            .extend(values.into_iter().map(|v| (key.to_string(), v)));
        self.pairs.extend(tail);
    }

    pub fn delete(&mut self, key: &str) {
        self.pairs.retain(|(k, _)| k != key);
    }

    pub fn is_empty(&self) -> bool {
        self.pairs.is_empty()
    }

    /// Write `value` under `key`.
    ///
    /// Absent values, empty strings and empty lists remove the key. Lists
    /// replace the key with one entry per element. Scalars replace all
    /// previous values. Existing keys keep their position, so applying
    /// the same call twice is a no-op the second time.
    pub fn encode(&mut self, key: &str, value: impl Into<ParamValue>) {
        match value.into() {
            ParamValue::Absent => self.delete(key),
            ParamValue::Scalar(s) if s.is_empty() => self.delete(key),
            ParamValue::Scalar(s) => self.set(key, s),
            ParamValue::List(items) if items.is_empty() => self.delete(key),
            ParamValue::List(items) => self.replace_all(key, items),
        }
    }
}

impl std::fmt::Display for QueryParams {
    /// Serialize as `application/x-www-form-urlencoded`, without a leading `?`.
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let mut serializer = form_urlencoded::Serializer::new(String::new());
        for (k, v) in &self.pairs {
            serializer.append_pair(k, v);
        }
        f.write_str(&serializer.finish())
    }
}

impl From<&str> for ParamValue {
    fn from(value: &str) -> Self {
        ParamValue::Scalar(value.to_string())
    }
}

impl From<String> for ParamValue {
    fn from(value: String) -> Self {
        ParamValue::Scalar(value)
    }
}

impl From<u64> for ParamValue {
    fn from(value: u64) -> Self {
        ParamValue::Scalar(value.to_string())
    }
}

impl From<bool> for ParamValue {
    fn from(value: bool) -> Self {
        ParamValue::Scalar(value.to_string())
    }
}

impl From<&[String]> for ParamValue {
    fn from(value: &[String]) -> Self {
        ParamValue::List(value.to_vec())
    }
}

impl From<Vec<String>> for ParamValue {
    fn from(value: Vec<String>) -> Self {
        ParamValue::List(value)
    }
}

impl<T: Into<ParamValue>> From<Option<T>> for ParamValue {
    fn from(value: Option<T>) -> Self {
        value.map_or(ParamValue::Absent, Into::into)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_keeps_repeated_keys_in_order() {
        let params = QueryParams::parse("?features=hiss&location=S%C3%B6dermalm&features=balkong");
        assert_eq!(params.get_all("features"), vec!["hiss", "balkong"]);
        assert_eq!(params.get("location"), Some("Södermalm"));
        assert_eq!(params.get("missing"), None);
    }

    #[test]
    fn parse_decodes_plus_and_percent_escapes() {
        let params = QueryParams::parse("query=tre+rum&energyClass=A%2CB");
        assert_eq!(params.get("query"), Some("tre rum"));
        assert_eq!(params.get("energyClass"), Some("A,B"));
    }

    #[test]
    fn encode_absent_and_empty_delete_the_key() {
        let mut params = QueryParams::parse("minPrice=100&location=Solna&features=hiss");
        params.encode("minPrice", None::<u64>);
        params.encode("location", "");
        params.encode("features", Vec::<String>::new());
        assert!(params.is_empty());
    }

    #[test]
    fn encode_list_replaces_existing_entries() {
        let mut params = QueryParams::parse("features=old&query=x&features=older");
        params.encode("features", vec!["hiss".to_string(), "balkong".to_string()]);
        assert_eq!(params.get_all("features"), vec!["hiss", "balkong"]);
        assert_eq!(params.get("query"), Some("x"));
    }

    #[test]
    fn encode_scalar_replaces_all_values_in_place() {
        let mut params = QueryParams::parse("a=1&sortBy=newest&b=2&sortBy=oldest");
        params.encode("sortBy", "price-asc");
        assert_eq!(params.to_string(), "a=1&sortBy=price-asc&b=2");
    }

    #[test]
    fn encode_list_keeps_key_position() {
        let mut params = QueryParams::parse("page=1&features=old&maxPrice=5&features=older");
        params.encode("features", vec!["hiss".to_string(), "balkong".to_string()]);
        assert_eq!(
            params.to_string(),
            "page=1&features=hiss&features=balkong&maxPrice=5"
        );
    }

    #[test]
    fn encode_is_idempotent() {
        let mut once = QueryParams::parse("page=2");
        once.encode("features", vec!["hiss".to_string(), "balkong".to_string()]);
        once.encode("maxPrice", 4_000_000u64);

        let mut twice = once.clone();
        twice.encode("features", vec!["hiss".to_string(), "balkong".to_string()]);
        twice.encode("maxPrice", 4_000_000u64);

        assert_eq!(once, twice);
    }

    #[test]
    fn display_round_trips_through_parse() {
        let mut params = QueryParams::new();
        params.encode("location", "Kungsholmen & Vasastan");
        params.encode("energyClass", "A,B");
        let reparsed = QueryParams::parse(&params.to_string());
        assert_eq!(reparsed, params);
    }
}
