//! Place-name search.
//!
//! Resolves free text such as "Reykjavik" to coordinates through a geocoding
//! service. Failures never disturb the chart: the caller keeps its current
//! observer state and the problem is logged.

use serde::Deserialize;
use thiserror::Error;

use crate::observer::ObserverState;

/// OpenStreetMap Nominatim search endpoint
pub const NOMINATIM_SEARCH_URL: &str = "https://nominatim.openstreetmap.org/search";

/// Identifies this client to the geocoding service, which requires one
pub const DEFAULT_USER_AGENT: &str = concat!("skychart/", env!("CARGO_PKG_VERSION"));

/// Best match for a place search.
#[derive(Debug, Clone, PartialEq)]
pub struct PlaceMatch {
    pub latitude_deg: f64,
    pub longitude_deg: f64,
    /// Short display label, the first component of the full place name
    pub label: String,
}

#[derive(Debug, Error)]
pub enum PlaceLookupError {
    #[error("Place search request failed: {0}")]
    Transport(#[from] ureq::Error),

    #[error("Malformed place search response: {0}")]
    Parse(String),
}

/// Anything that can turn a place name into coordinates.
pub trait PlaceLookup {
    /// Best match for `query`, or `None` when nothing matched.
    fn lookup(&self, query: &str) -> Result<Option<PlaceMatch>, PlaceLookupError>;
}

#[derive(Debug, Deserialize)]
struct SearchResult {
    lat: String,
    lon: String,
    display_name: String,
}

/// Parse a Nominatim `format=json` response body and keep the first result.
///
/// Coordinates arrive as strings; the label is everything before the first comma
/// of `display_name`.
pub fn parse_search_response(body: &str) -> Result<Option<PlaceMatch>, PlaceLookupError> {
    let results: Vec<SearchResult> =
        serde_json::from_str(body).map_err(|e| PlaceLookupError::Parse(e.to_string()))?;
    let Some(first) = results.into_iter().next() else {
        return Ok(None);
    };

    let latitude_deg = first
        .lat
        .trim()
        .parse::<f64>()
        .map_err(|e| PlaceLookupError::Parse(format!("latitude {:?}: {e}", first.lat)))?;
    let longitude_deg = first
        .lon
        .trim()
        .parse::<f64>()
        .map_err(|e| PlaceLookupError::Parse(format!("longitude {:?}: {e}", first.lon)))?;
    let label = first
        .display_name
        .split(',')
        .next()
        .unwrap_or_default()
        .to_string();

    Ok(Some(PlaceMatch {
        latitude_deg,
        longitude_deg,
        label,
    }))
}

/// Nominatim-backed place search.
#[derive(Debug, Clone)]
pub struct NominatimLookup {
    endpoint: String,
    user_agent: String,
}

impl Default for NominatimLookup {
    fn default() -> Self {
        Self::new(NOMINATIM_SEARCH_URL)
    }
}

impl NominatimLookup {
    pub fn new(endpoint: impl Into<String>) -> Self {
        Self {
            endpoint: endpoint.into(),
            user_agent: DEFAULT_USER_AGENT.to_string(),
        }
    }

    pub fn with_user_agent(mut self, user_agent: impl Into<String>) -> Self {
        self.user_agent = user_agent.into();
        self
    }

    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }
}

impl PlaceLookup for NominatimLookup {
    fn lookup(&self, query: &str) -> Result<Option<PlaceMatch>, PlaceLookupError> {
        log::debug!("Searching {} for {:?}", self.endpoint, query);
        let body = ureq::get(&self.endpoint)
            .query("format", "json")
            .query("q", query)
            .query("limit", "1")
            .header("User-Agent", &self.user_agent)
            .call()?
            .body_mut()
            .read_to_string()?;
        parse_search_response(&body)
    }
}

/// Observer state after searching for `query`.
///
/// An empty query, no match, a failed search or out-of-range coordinates all
/// leave `current` untouched. The timestamp is always kept.
pub fn apply_place_lookup<L: PlaceLookup + ?Sized>(
    lookup: &L,
    query: &str,
    current: &ObserverState,
) -> ObserverState {
    let query = query.trim();
    if query.is_empty() {
        return *current;
    }

    match lookup.lookup(query) {
        Ok(Some(place)) => {
            match ObserverState::new(place.latitude_deg, place.longitude_deg, current.timestamp()) {
                Ok(observer) => {
                    log::info!(
                        "Resolved {:?} to {} ({:.4}, {:.4})",
                        query,
                        place.label,
                        place.latitude_deg,
                        place.longitude_deg
                    );
                    observer
                }
                Err(e) => {
                    log::warn!("Ignoring place search result for {:?}: {e}", query);
                    *current
                }
            }
        }
        Ok(None) => {
            log::info!("No place found for {:?}", query);
            *current
        }
        Err(e) => {
            log::warn!("Place search for {:?} failed: {e}", query);
            *current
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;
    use std::cell::RefCell;

    /// Canned lookup that records the queries it receives
    struct StubLookup {
        response: fn() -> Result<Option<PlaceMatch>, PlaceLookupError>,
        queries: RefCell<Vec<String>>,
    }

    impl StubLookup {
        fn new(response: fn() -> Result<Option<PlaceMatch>, PlaceLookupError>) -> Self {
            Self {
                response,
                queries: RefCell::new(Vec::new()),
            }
        }
    }

    impl PlaceLookup for StubLookup {
        fn lookup(&self, query: &str) -> Result<Option<PlaceMatch>, PlaceLookupError> {
            self.queries.borrow_mut().push(query.to_string());
            (self.response)()
        }
    }

    fn current() -> ObserverState {
        let timestamp = NaiveDate::from_ymd_opt(2024, 6, 1)
            .unwrap()
            .and_hms_opt(21, 30, 0)
            .unwrap();
        ObserverState::new(31.23, 121.47, timestamp).unwrap()
    }

    #[test]
    fn test_parse_first_result() {
        let body = r#"[
            {"place_id": 1, "lat": "39.9057136", "lon": "116.3912972",
             "display_name": "Beijing, Dongcheng District, China"},
            {"place_id": 2, "lat": "0", "lon": "0", "display_name": "Elsewhere"}
        ]"#;
        let place = parse_search_response(body).unwrap().unwrap();
        assert_eq!(place.latitude_deg, 39.9057136);
        assert_eq!(place.longitude_deg, 116.3912972);
        assert_eq!(place.label, "Beijing");
    }

    #[test]
    fn test_parse_empty_result_list() {
        assert_eq!(parse_search_response("[]").unwrap(), None);
    }

    #[test]
    fn test_parse_rejects_bad_payloads() {
        assert!(matches!(parse_search_response("{}"), Err(PlaceLookupError::Parse(_))));
        let bad_lat = r#"[{"lat": "north", "lon": "1.0", "display_name": "x"}]"#;
        assert!(matches!(parse_search_response(bad_lat), Err(PlaceLookupError::Parse(_))));
    }

    #[test]
    fn test_apply_match_keeps_timestamp() {
        let lookup = StubLookup::new(|| {
            Ok(Some(PlaceMatch {
                latitude_deg: 64.1466,
                longitude_deg: -21.9426,
                label: "Reykjavik".to_string(),
            }))
        });
        let updated = apply_place_lookup(&lookup, "  Reykjavik ", &current());
        assert_eq!(updated.latitude_deg(), 64.1466);
        assert_eq!(updated.longitude_deg(), -21.9426);
        assert_eq!(updated.timestamp(), current().timestamp());
        assert_eq!(lookup.queries.borrow().as_slice(), ["Reykjavik"]);
    }

    #[test]
    fn test_apply_empty_query_skips_lookup() {
        let lookup = StubLookup::new(|| Ok(None));
        assert_eq!(apply_place_lookup(&lookup, "   ", &current()), current());
        assert!(lookup.queries.borrow().is_empty());
    }

    #[test]
    fn test_apply_failures_leave_state_unchanged() {
        let no_match = StubLookup::new(|| Ok(None));
        assert_eq!(apply_place_lookup(&no_match, "Atlantis", &current()), current());

        let broken = StubLookup::new(|| Err(PlaceLookupError::Parse("truncated".to_string())));
        assert_eq!(apply_place_lookup(&broken, "Paris", &current()), current());

        let out_of_range = StubLookup::new(|| {
            Ok(Some(PlaceMatch {
                latitude_deg: 123.0,
                longitude_deg: 0.0,
                label: "Nowhere".to_string(),
            }))
        });
        assert_eq!(apply_place_lookup(&out_of_range, "Nowhere", &current()), current());
    }

    #[test]
    fn test_default_endpoint() {
        assert_eq!(NominatimLookup::default().endpoint(), NOMINATIM_SEARCH_URL);
    }
}
