//! Free-text stop and route name resolution.
//!
//! Matching is case-insensitive on trimmed input. An exact name match wins
//! over partial matches; otherwise any name containing the query matches.
//! A looser rule (substring, or same first three characters) is used only to
//! suggest alternatives when nothing resolves.

use std::collections::HashSet;

use crate::domain::Stop;

use super::store::ScheduleStore;

/// Number of leading characters compared by the suggestion prefix rule.
const SUGGESTION_PREFIX_CHARS: usize = 3;

/// Canonical form used for every name comparison.
pub fn normalize(s: &str) -> String {
    s.trim().to_lowercase()
}

/// Resolves names against one snapshot.
#[derive(Debug, Clone, Copy)]
pub struct NameResolver<'a> {
    store: &'a ScheduleStore,
}

impl<'a> NameResolver<'a> {
    pub fn new(store: &'a ScheduleStore) -> Self {
        Self { store }
    }

    /// Stops whose name matches `text`, in table order.
    ///
    /// Empty means "not found"; it is never an error.
    pub fn resolve_stops(&self, text: &str) -> Vec<&'a Stop> {
        let stops = self.store.stops();
        resolve(text, stops, |s| s.name.as_str())
    }

    /// Route names (headsigns) matching `text`, in first-seen order.
    pub fn resolve_routes(&self, text: &str) -> Vec<&'a str> {
        let names = self.store.route_names();
        resolve(text, names, String::as_str)
            .into_iter()
            .map(String::as_str)
            .collect()
    }

    /// Distinct stop names loosely matching `text`, for "did you mean" hints.
    pub fn suggest_stops(&self, text: &str, limit: usize) -> Vec<String> {
        suggest(text, self.store.stops().iter().map(|s| s.name.as_str()), limit)
    }

    /// Distinct route names loosely matching `text`.
    pub fn suggest_routes(&self, text: &str, limit: usize) -> Vec<String> {
        suggest(
            text,
            self.store.route_names().iter().map(String::as_str),
            limit,
        )
    }

    /// One display name per distinct normalized stop name, alphabetical.
    ///
    /// The display form is the first occurrence in table order.
    pub fn stop_names(&self) -> Vec<String> {
        let names = self.store.stops().iter().map(|s| s.name.as_str());
        distinct_stop_names(names)
    }

    /// Distinct route names, sorted by their exact text.
    ///
    /// Headsigns differing only by case are different routes and both listed.
    pub fn route_names(&self) -> Vec<String> {
        let mut names = self.store.route_names().to_vec();
        names.sort();
        names
    }
}

/// Exact-before-partial matching over `items`.
fn resolve<'a, T>(text: &str, items: &'a [T], name: impl Fn(&T) -> &str) -> Vec<&'a T> {
    let query = normalize(text);
    if query.is_empty() {
        return Vec::new();
    }

    let exact: Vec<&T> = items
        .iter()
        .filter(|item| normalize(name(*item)) == query)
        .collect();
    if !exact.is_empty() {
        return exact;
    }

    items
        .iter()
        .filter(|item| normalize(name(*item)).contains(&query))
        .collect()
}

/// Names containing the query or sharing its first few characters.
fn suggest<'a>(text: &str, names: impl Iterator<Item = &'a str>, limit: usize) -> Vec<String> {
    let query = normalize(text);
    if query.is_empty() {
        return Vec::new();
    }
    let prefix: String = query.chars().take(SUGGESTION_PREFIX_CHARS).collect();

    let mut seen = HashSet::new();
    names
        .filter(|name| {
            let n = normalize(name);
            (n.contains(&query) || n.starts_with(&prefix)) && seen.insert(n)
        })
        .take(limit)
        .map(str::to_string)
        .collect()
}

/// Deduplicate by normalized form, keep the first display form, sort.
fn distinct_stop_names<'a>(names: impl Iterator<Item = &'a str>) -> Vec<String> {
    let mut seen = HashSet::new();
    let mut out: Vec<(String, &str)> = names
        .filter(|name| !name.trim().is_empty())
        .filter_map(|name| {
            let key = normalize(name);
            seen.insert(key.clone()).then_some((key, name))
        })
        .collect();
    out.sort();
    out.into_iter().map(|(_, name)| name.to_string()).collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{ServiceId, StopId, Trip, TripId};
    use crate::schedule::FeedTables;

    fn store(stop_names: &[&str], headsigns: &[&str]) -> ScheduleStore {
        let stops = stop_names
            .iter()
            .enumerate()
            .map(|(i, name)| Stop::new(StopId::new(format!("S{i}")).unwrap(), *name))
            .collect();
        let trips = headsigns
            .iter()
            .enumerate()
            .map(|(i, h)| Trip {
                id: TripId::new(format!("T{i}")).unwrap(),
                headsign: Some(h.to_string()),
                service_id: ServiceId::new("WKDY").unwrap(),
                short_name: None,
            })
            .collect();
        ScheduleStore::new(FeedTables {
            stops,
            trips,
            ..FeedTables::default()
        })
    }

    fn names(stops: Vec<&Stop>) -> Vec<&str> {
        stops.into_iter().map(|s| s.name.as_str()).collect()
    }

    #[test]
    fn exact_match_takes_priority() {
        let store = store(&["University / Ingersoll", "University", "University"], &[]);
        let resolver = NameResolver::new(&store);
        let found = resolver.resolve_stops("university");
        assert_eq!(names(found.clone()), vec!["University", "University"]);
        assert_eq!(found[0].id.as_str(), "S1");
        assert_eq!(found[1].id.as_str(), "S2");
    }

    #[test]
    fn substring_when_no_exact() {
        let store = store(&["DART Central Station", "Fairgrounds", "Dartmouth Rd"], &[]);
        let resolver = NameResolver::new(&store);
        assert_eq!(
            names(resolver.resolve_stops("dart")),
            vec!["DART Central Station", "Dartmouth Rd"]
        );
    }

    #[test]
    fn case_and_whitespace_insensitive() {
        let store = store(&["DART Central Station"], &[]);
        let resolver = NameResolver::new(&store);
        let expected = vec!["DART Central Station"];
        assert_eq!(names(resolver.resolve_stops("dart")), expected);
        assert_eq!(names(resolver.resolve_stops("DART")), expected);
        assert_eq!(names(resolver.resolve_stops(" Dart ")), expected);
    }

    #[test]
    fn no_match_is_empty() {
        let store = store(&["Fairgrounds"], &["University"]);
        let resolver = NameResolver::new(&store);
        assert!(resolver.resolve_stops("Nonexistent Station").is_empty());
        assert!(resolver.resolve_routes("Nonexistent").is_empty());
        assert!(resolver.resolve_stops("   ").is_empty());
    }

    #[test]
    fn prefix_rule_is_not_used_for_resolution() {
        let store = store(&["Fairgrounds"], &[]);
        let resolver = NameResolver::new(&store);
        assert!(resolver.resolve_stops("Fairview").is_empty());
        assert_eq!(resolver.suggest_stops("Fairview", 5), vec!["Fairgrounds"]);
    }

    #[test]
    fn routes_exact_then_partial() {
        let store = store(&[], &["UNIVERSITY / INGERSOLL", "UNIVERSITY", "FAIRGROUNDS"]);
        let resolver = NameResolver::new(&store);
        assert_eq!(resolver.resolve_routes("University"), vec!["UNIVERSITY"]);
        assert_eq!(
            resolver.resolve_routes("univ"),
            vec!["UNIVERSITY / INGERSOLL", "UNIVERSITY"]
        );
    }

    #[test]
    fn suggestions_deduplicate_and_cap() {
        let store = store(
            &["Maury St", "Maury St", "Mauritius Ave", "Main St", "Market", "Mall", "Maury Ct"],
            &[],
        );
        let resolver = NameResolver::new(&store);
        assert_eq!(
            resolver.suggest_stops("Maury Street", 5),
            vec!["Maury St", "Mauritius Ave", "Maury Ct"]
        );
        assert_eq!(resolver.suggest_stops("ma", 2), vec!["Maury St", "Mauritius Ave"]);
        assert!(resolver.suggest_stops("", 5).is_empty());
    }

    #[test]
    fn suggestions_offer_one_display_form_per_name() {
        let store = store(&["University", "university", "UNIVERSITY "], &[]);
        let resolver = NameResolver::new(&store);
        assert_eq!(resolver.suggest_stops("Univ Hall", 5), vec!["University"]);
    }

    #[test]
    fn stop_names_distinct_sorted_first_display_form() {
        let store = store(&["University", "Fairgrounds", "university"], &[]);
        let resolver = NameResolver::new(&store);
        assert_eq!(resolver.stop_names(), vec!["Fairgrounds", "University"]);
    }

    #[test]
    fn route_names_sorted() {
        let store = store(&[], &["UNIVERSITY", "FAIRGROUNDS", "UNIVERSITY", "E 14TH ST"]);
        let resolver = NameResolver::new(&store);
        assert_eq!(
            resolver.route_names(),
            vec!["E 14TH ST", "FAIRGROUNDS", "UNIVERSITY"]
        );
    }

    #[test]
    fn route_names_keep_case_distinct_headsigns() {
        let store = store(&[], &["University", "UNIVERSITY", "University"]);
        let resolver = NameResolver::new(&store);
        assert_eq!(store.route_names(), ["University", "UNIVERSITY"]);
        assert_eq!(resolver.resolve_routes("university").len(), 2);
        assert_eq!(resolver.route_names(), vec!["UNIVERSITY", "University"]);
    }
}
