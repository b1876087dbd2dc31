//! Home page link list assembled from environment-style settings

use std::collections::{BTreeMap, HashSet};

use serde::{Deserialize, Serialize};

const LINK_PREFIX: &str = "STACK_LINK_";
const LABEL_PREFIX: &str = "STACK_LABEL_";

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HomeLink {
    pub name: String,
    pub href: String,
}

impl HomeLink {
    fn new(name: impl Into<String>, href: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            href: href.into(),
        }
    }
}

/// Builds the deduplicated link list shown on the home page.
///
/// Sources, in order:
/// - the built-in dashboard and categorise links unless `STACK_INCLUDE_DEFAULT_LINKS=false`
/// - every `STACK_LINK_<ID>` entry, labelled by `STACK_LABEL_<ID>` or derived from `<ID>`
/// - `STACK_NAV_LINKS`, a `name|href` list separated by newlines, `;` or `,`
pub fn build_home_links(env: &BTreeMap<String, String>) -> Vec<HomeLink> {
    let mut links = Vec::new();

    if !is_disabled(env, "STACK_INCLUDE_DEFAULT_LINKS") {
        let dashboard = value(env, "STACK_DASHBOARD_NAME").unwrap_or("Traefik Dashboard");
        links.push(HomeLink::new(dashboard, "/dashboard/"));

        if !is_disabled(env, "STACK_INCLUDE_CATEGORISE_LINK") {
            let categorise =
                value(env, "CATEGORISE_LOGIN_NAME").unwrap_or("Actual Auto Categorise");
            links.push(HomeLink::new(categorise, "/categorise/"));
        }
    }

    links.extend(env.iter().filter_map(|(key, raw)| {
        let id = key.strip_prefix(LINK_PREFIX)?;
        let href = normalize_link_href(raw)?;
        let name = value(env, &format!("{LABEL_PREFIX}{id}"))
            .map(str::to_string)
            .unwrap_or_else(|| id.replace("__", "/").replace('_', "-").to_lowercase());
        Some(HomeLink { name, href })
    }));

    if let Some(raw) = env.get("STACK_NAV_LINKS") {
        links.extend(parse_nav_links(raw));
    }

    dedup_links(links)
}

fn value<'a>(env: &'a BTreeMap<String, String>, key: &str) -> Option<&'a str> {
    env.get(key).map(|v| v.trim()).filter(|v| !v.is_empty())
}

fn is_disabled(env: &BTreeMap<String, String>, key: &str) -> bool {
    value(env, key).is_some_and(|v| v.eq_ignore_ascii_case("false"))
}

/// Absolute http(s) links are kept, anything else becomes a root-relative path
pub fn normalize_link_href(raw: &str) -> Option<String> {
    let href = raw.trim();
    if href.is_empty() {
        return None;
    }
    if crate::redirect::is_absolute_http_url(href) || href.starts_with('/') {
        return Some(href.to_string());
    }
    Some(format!("/{href}"))
}

/// Parses `name|href` entries; an entry without `|` uses the href as its name
pub fn parse_nav_links(raw: &str) -> Vec<HomeLink> {
    raw.split(['\n', '\r', ';', ','])
        .map(str::trim)
        .filter(|entry| !entry.is_empty())
        .filter_map(|entry| {
            let (name, href) = match entry.split_once('|') {
                Some((name, href)) => (name.trim(), normalize_link_href(href)?),
                None => ("", normalize_link_href(entry)?),
            };
            let name = if name.is_empty() { href.clone() } else { name.to_string() };
            Some(HomeLink { name, href })
        })
        .collect()
}

fn dedup_links(links: Vec<HomeLink>) -> Vec<HomeLink> {
    let mut seen = HashSet::new();
    links
        .into_iter()
        .filter(|link| seen.insert((link.name.clone(), link.href.clone())))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn env_map(pairs: &[(&str, &str)]) -> BTreeMap<String, String> {
        pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect()
    }

    #[test]
    fn test_default_links() {
        let links = build_home_links(&BTreeMap::new());
        assert_eq!(
            links,
            vec![
                HomeLink::new("Traefik Dashboard", "/dashboard/"),
                HomeLink::new("Actual Auto Categorise", "/categorise/"),
            ]
        );
    }

    #[test]
    fn test_defaults_can_be_disabled() {
        let links = build_home_links(&env_map(&[("STACK_INCLUDE_DEFAULT_LINKS", "FALSE")]));
        assert!(links.is_empty());

        let links = build_home_links(&env_map(&[
            ("STACK_INCLUDE_CATEGORISE_LINK", "false"),
            ("STACK_DASHBOARD_NAME", "Proxy"),
        ]));
        assert_eq!(links, vec![HomeLink::new("Proxy", "/dashboard/")]);
    }

    #[test]
    fn test_stack_link_entries() {
        let links = build_home_links(&env_map(&[
            ("STACK_INCLUDE_DEFAULT_LINKS", "false"),
            ("STACK_LINK_BUDGET__REPORTS", "budget/reports"),
            ("STACK_LINK_ACTUAL_WEB", "https://actual.example.com"),
            ("STACK_LABEL_ACTUAL_WEB", "Actual Budget"),
            ("STACK_LINK_EMPTY", "  "),
        ]));
        assert_eq!(
            links,
            vec![
                HomeLink::new("Actual Budget", "https://actual.example.com"),
                HomeLink::new("budget/reports", "/budget/reports"),
            ]
        );
    }

    #[test]
    fn test_nav_links_parsing() {
        let links = parse_nav_links("Grafana|/grafana/; docs ,\nWiki|wiki\n|");
        assert_eq!(
            links,
            vec![
                HomeLink::new("Grafana", "/grafana/"),
                HomeLink::new("/docs", "/docs"),
                HomeLink::new("Wiki", "/wiki"),
            ]
        );
    }

    #[test]
    fn test_duplicates_removed_keeping_first() {
        let links = build_home_links(&env_map(&[(
            "STACK_NAV_LINKS",
            "Traefik Dashboard|/dashboard/,Other|/dashboard/",
        )]));
        assert_eq!(
            links,
            vec![
                HomeLink::new("Traefik Dashboard", "/dashboard/"),
                HomeLink::new("Actual Auto Categorise", "/categorise/"),
                HomeLink::new("Other", "/dashboard/"),
            ]
        );
    }

    #[test]
    fn test_normalize_link_href() {
        assert_eq!(normalize_link_href(""), None);
        assert_eq!(normalize_link_href(" /a "), Some("/a".to_string()));
        assert_eq!(normalize_link_href("a"), Some("/a".to_string()));
        assert_eq!(
            normalize_link_href("HTTP://x.example"),
            Some("HTTP://x.example".to_string())
        );
    }
}
