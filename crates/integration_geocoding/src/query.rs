//! Query building
//!
//! Maps semantic call inputs (text, focus point, boundary filters, paging)
//! onto the flat, dotted parameter names the search API expects, e.g.
//! `focus.point.lat` or `boundary.rect.min_lon`.

use std::fmt;

use domain::{Boundary, GeoLocation};
use url::form_urlencoded;

/// Name of the API key parameter
pub const API_KEY_PARAM: &str = "api_key";

/// A scalar query parameter value
#[derive(Debug, Clone, PartialEq)]
pub enum QueryValue {
    /// Free text
    Text(String),
    /// Numeric value, rendered without a trailing `.0` for whole numbers
    Number(f64),
}

impl fmt::Display for QueryValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Text(text) => f.write_str(text),
            Self::Number(number) => write!(f, "{number}"),
        }
    }
}

impl From<&str> for QueryValue {
    fn from(value: &str) -> Self {
        Self::Text(value.to_string())
    }
}

impl From<String> for QueryValue {
    fn from(value: String) -> Self {
        Self::Text(value)
    }
}

impl From<f64> for QueryValue {
    fn from(value: f64) -> Self {
        Self::Number(value)
    }
}

impl From<u32> for QueryValue {
    fn from(value: u32) -> Self {
        Self::Number(f64::from(value))
    }
}

/// Ordered parameter mapping sent with a single request
///
/// Parameters keep their insertion order so that the encoded form, and
/// therefore the [`signature`](Self::signature), is stable for equal input.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Query {
    params: Vec<(String, QueryValue)>,
}

impl Query {
    /// Set a parameter, replacing any earlier value under the same name
    pub fn insert(&mut self, key: impl Into<String>, value: impl Into<QueryValue>) {
        let key = key.into();
        let value = value.into();
        match self.params.iter_mut().find(|(k, _)| *k == key) {
            Some((_, existing)) => *existing = value,
            None => self.params.push((key, value)),
        }
    }

    /// Look up a parameter
    #[must_use]
    pub fn get(&self, key: &str) -> Option<&QueryValue> {
        self.params.iter().find(|(k, _)| k == key).map(|(_, v)| v)
    }

    /// Whether a parameter is set
    #[must_use]
    pub fn contains_key(&self, key: &str) -> bool {
        self.get(key).is_some()
    }

    /// Parameter names in insertion order
    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.params.iter().map(|(k, _)| k.as_str())
    }

    /// Number of parameters
    #[must_use]
    pub fn len(&self) -> usize {
        self.params.len()
    }

    /// Whether no parameter is set
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.params.is_empty()
    }

    /// URL-encoded form (`application/x-www-form-urlencoded`)
    #[must_use]
    pub fn to_query_string(&self) -> String {
        let mut serializer = form_urlencoded::Serializer::new(String::new());
        for (key, value) in &self.params {
            serializer.append_pair(key, &value.to_string());
        }
        serializer.finish()
    }

    /// Stable encoding of the full mapping, used as cache key and to tell
    /// the latest autocomplete query apart from superseded ones
    #[must_use]
    pub fn signature(&self) -> String {
        self.to_query_string()
    }

    /// Copy with the API key value masked, safe to log or hand back to callers
    #[must_use]
    pub fn masked(&self) -> Self {
        let params = self
            .params
            .iter()
            .map(|(key, value)| {
                if key == API_KEY_PARAM {
                    (key.clone(), QueryValue::from("***"))
                } else {
                    (key.clone(), value.clone())
                }
            })
            .collect();
        Self { params }
    }

    /// Encoded form with the API key masked, for logging
    #[must_use]
    pub fn redacted(&self) -> String {
        self.masked().to_query_string()
    }
}

/// Whether circle boundaries are forwarded
///
/// The autocomplete endpoint does not support them.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CircleFilter {
    /// Add `boundary.circle.*` parameters
    Include,
    /// Drop circle boundaries silently
    Ignore,
}

/// Builds a [`Query`] one semantic field at a time
///
/// Absent optional inputs are omitted; building never fails.
#[derive(Debug, Clone)]
pub struct QueryBuilder {
    query: Query,
}

impl QueryBuilder {
    /// Start a query authenticated with `api_key`
    #[must_use]
    pub fn new(api_key: &str) -> Self {
        let mut query = Query::default();
        query.insert(API_KEY_PARAM, api_key);
        Self { query }
    }

    /// Free-text search input
    #[must_use]
    pub fn text(mut self, text: &str) -> Self {
        self.query.insert("text", text);
        self
    }

    /// Maximum number of results
    #[must_use]
    pub fn size(mut self, size: u32) -> Self {
        self.query.insert("size", size);
        self
    }

    /// Comma-separated data sources; an empty string omits the parameter
    #[must_use]
    pub fn sources(mut self, sources: &str) -> Self {
        if !sources.is_empty() {
            self.query.insert("sources", sources);
        }
        self
    }

    /// Comma-separated layer types
    #[must_use]
    pub fn layers(mut self, layers: Option<&str>) -> Self {
        if let Some(layers) = layers.filter(|l| !l.is_empty()) {
            self.query.insert("layers", layers);
        }
        self
    }

    /// Point used to bias ranking toward nearby results
    #[must_use]
    pub fn focus_point(mut self, point: Option<&GeoLocation>) -> Self {
        if let Some(point) = point {
            self.query.insert("focus.point.lat", point.latitude());
            self.query.insert("focus.point.lon", point.longitude());
        }
        self
    }

    /// Point to reverse geocode
    #[must_use]
    pub fn point(mut self, point: &GeoLocation) -> Self {
        self.query.insert("point.lat", point.latitude());
        self.query.insert("point.lon", point.longitude());
        self
    }

    /// Country, rectangle and circle filters, merged additively
    #[must_use]
    pub fn boundary(mut self, boundary: Option<&Boundary>, circles: CircleFilter) -> Self {
        let Some(boundary) = boundary else {
            return self;
        };

        if let Some(country) = boundary.country.as_deref().filter(|c| !c.is_empty()) {
            self.query.insert("boundary.country", country);
        }

        if let Some(rect) = &boundary.rect {
            self.query.insert("boundary.rect.min_lat", rect.min_lat());
            self.query.insert("boundary.rect.min_lon", rect.min_lon());
            self.query.insert("boundary.rect.max_lat", rect.max_lat());
            self.query.insert("boundary.rect.max_lon", rect.max_lon());
        }

        if let (Some(circle), CircleFilter::Include) = (&boundary.circle, circles) {
            let center = circle.center();
            self.query.insert("boundary.circle.lat", center.latitude());
            self.query.insert("boundary.circle.lon", center.longitude());
            self.query.insert("boundary.circle.radius", circle.radius());
        }

        self
    }

    /// Finish building
    #[must_use]
    pub fn build(self) -> Query {
        self.query
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use domain::{BoundaryCircle, BoundaryRect};
    use proptest::prelude::*;

    fn sample_rect() -> BoundaryRect {
        BoundaryRect::new(38.0, -78.0, 39.0, -76.0).unwrap()
    }

    fn sample_circle() -> BoundaryCircle {
        BoundaryCircle::new(GeoLocation::new(38.9, -77.0).unwrap(), 5.0).unwrap()
    }

    #[test]
    fn test_number_rendering() {
        assert_eq!(QueryValue::from(10_u32).to_string(), "10");
        assert_eq!(QueryValue::from(38.976745).to_string(), "38.976745");
        assert_eq!(QueryValue::from(-77.023104).to_string(), "-77.023104");
        assert_eq!(QueryValue::from("gn,oa").to_string(), "gn,oa");
    }

    #[test]
    fn test_api_key_comes_first() {
        let query = QueryBuilder::new("test-key").text("123 abc st").build();
        assert_eq!(query.keys().collect::<Vec<_>>(), vec!["api_key", "text"]);
        assert_eq!(query.get("api_key"), Some(&QueryValue::from("test-key")));
    }

    #[test]
    fn test_query_string_encoding() {
        let query = QueryBuilder::new("test-key")
            .size(10)
            .text("123 abc st")
            .sources("gn,oa,osm,wof")
            .build();
        assert_eq!(
            query.to_query_string(),
            "api_key=test-key&size=10&text=123+abc+st&sources=gn%2Coa%2Cosm%2Cwof"
        );
    }

    #[test]
    fn test_redacted_masks_api_key() {
        let query = QueryBuilder::new("secret").text("abc").build();
        let redacted = query.redacted();
        assert!(!redacted.contains("secret"));
        assert_eq!(redacted, "api_key=***&text=abc");

        let masked = query.masked();
        assert_eq!(masked.get(API_KEY_PARAM), Some(&QueryValue::from("***")));
        assert_eq!(masked.get("text"), Some(&QueryValue::from("abc")));
        assert_eq!(query.get(API_KEY_PARAM), Some(&QueryValue::from("secret")));
    }

    #[test]
    fn test_insert_replaces_existing() {
        let mut query = Query::default();
        query.insert("size", 5_u32);
        query.insert("size", 10_u32);
        assert_eq!(query.len(), 1);
        assert_eq!(query.get("size"), Some(&QueryValue::Number(10.0)));
    }

    #[test]
    fn test_empty_sources_omitted() {
        let query = QueryBuilder::new("k").sources("").build();
        assert!(!query.contains_key("sources"));
    }

    #[test]
    fn test_layers_only_when_present() {
        let without = QueryBuilder::new("k").layers(None).build();
        assert!(!without.contains_key("layers"));

        let with = QueryBuilder::new("k").layers(Some("address,venue")).build();
        assert_eq!(with.get("layers"), Some(&QueryValue::from("address,venue")));
    }

    #[test]
    fn test_focus_point() {
        let point = GeoLocation::new(38.976745, -77.023104).unwrap();
        let query = QueryBuilder::new("k").focus_point(Some(&point)).build();
        assert_eq!(query.get("focus.point.lat"), Some(&QueryValue::Number(38.976745)));
        assert_eq!(query.get("focus.point.lon"), Some(&QueryValue::Number(-77.023104)));
    }

    #[test]
    fn test_reverse_point() {
        let point = GeoLocation::new(38.976745, -77.023104).unwrap();
        let query = QueryBuilder::new("k").point(&point).build();
        assert_eq!(
            query.keys().collect::<Vec<_>>(),
            vec!["api_key", "point.lat", "point.lon"]
        );
    }

    #[test]
    fn test_country_only_boundary() {
        let boundary = Boundary::country("USA");
        let query = QueryBuilder::new("k")
            .boundary(Some(&boundary), CircleFilter::Include)
            .build();

        assert_eq!(query.get("boundary.country"), Some(&QueryValue::from("USA")));
        assert!(query.keys().all(|k| !k.starts_with("boundary.rect")));
        assert!(query.keys().all(|k| !k.starts_with("boundary.circle")));
    }

    #[test]
    fn test_rect_boundary() {
        let boundary = Boundary::default().with_rect(sample_rect());
        let query = QueryBuilder::new("k")
            .boundary(Some(&boundary), CircleFilter::Include)
            .build();

        assert_eq!(query.get("boundary.rect.min_lat"), Some(&QueryValue::Number(38.0)));
        assert_eq!(query.get("boundary.rect.min_lon"), Some(&QueryValue::Number(-78.0)));
        assert_eq!(query.get("boundary.rect.max_lat"), Some(&QueryValue::Number(39.0)));
        assert_eq!(query.get("boundary.rect.max_lon"), Some(&QueryValue::Number(-76.0)));
        assert!(!query.contains_key("boundary.country"));
    }

    #[test]
    fn test_circle_boundary_included() {
        let boundary = Boundary::default().with_circle(sample_circle());
        let query = QueryBuilder::new("k")
            .boundary(Some(&boundary), CircleFilter::Include)
            .build();

        assert_eq!(query.get("boundary.circle.lat"), Some(&QueryValue::Number(38.9)));
        assert_eq!(query.get("boundary.circle.lon"), Some(&QueryValue::Number(-77.0)));
        assert_eq!(query.get("boundary.circle.radius"), Some(&QueryValue::Number(5.0)));
    }

    #[test]
    fn test_circle_boundary_ignored() {
        let boundary = Boundary::country("USA").with_circle(sample_circle());
        let query = QueryBuilder::new("k")
            .boundary(Some(&boundary), CircleFilter::Ignore)
            .build();

        assert!(query.contains_key("boundary.country"));
        assert!(query.keys().all(|k| !k.starts_with("boundary.circle")));
    }

    #[test]
    fn test_absent_boundary_adds_nothing() {
        let query = QueryBuilder::new("k")
            .boundary(None, CircleFilter::Include)
            .build();
        assert_eq!(query.len(), 1);
    }

    #[test]
    fn test_signature_is_stable() {
        let build = || {
            QueryBuilder::new("k")
                .text("123 abc st")
                .sources("gn,oa,osm,wof")
                .boundary(Some(&Boundary::country("USA")), CircleFilter::Ignore)
                .build()
        };
        assert_eq!(build().signature(), build().signature());

        let other = QueryBuilder::new("k").text("123 abc").build();
        assert_ne!(build().signature(), other.signature());
    }

    proptest! {
        #[test]
        fn rect_parameters_match_bounds(
            lat_a in -90.0f64..=90.0f64,
            lat_b in -90.0f64..=90.0f64,
            lon_a in -180.0f64..=180.0f64,
            lon_b in -180.0f64..=180.0f64
        ) {
            let rect = BoundaryRect::new(
                lat_a.min(lat_b),
                lon_a.min(lon_b),
                lat_a.max(lat_b),
                lon_a.max(lon_b),
            )
            .unwrap();
            let boundary = Boundary::default().with_rect(rect);
            let query = QueryBuilder::new("k")
                .boundary(Some(&boundary), CircleFilter::Include)
                .build();

            prop_assert_eq!(
                query.get("boundary.rect.min_lat"),
                Some(&QueryValue::Number(rect.min_lat()))
            );
            prop_assert_eq!(
                query.get("boundary.rect.min_lon"),
                Some(&QueryValue::Number(rect.min_lon()))
            );
            prop_assert_eq!(
                query.get("boundary.rect.max_lat"),
                Some(&QueryValue::Number(rect.max_lat()))
            );
            prop_assert_eq!(
                query.get("boundary.rect.max_lon"),
                Some(&QueryValue::Number(rect.max_lon()))
            );
        }

        #[test]
        fn country_boundary_has_no_shape_keys(country in "[A-Z]{2,3}") {
            let boundary = Boundary::country(country.clone());
            let query = QueryBuilder::new("k")
                .boundary(Some(&boundary), CircleFilter::Include)
                .build();

            let boundary_keys: Vec<_> = query
                .keys()
                .filter(|k| k.starts_with("boundary."))
                .collect();
            prop_assert_eq!(boundary_keys, vec!["boundary.country"]);
            prop_assert_eq!(query.get("boundary.country"), Some(&QueryValue::Text(country)));
        }
    }
}
