use std::collections::BTreeSet;
use std::str::FromStr;

use unicode_normalization::char::is_combining_mark;
use unicode_normalization::UnicodeNormalization;

use super::model::Scent;

/// Sentinel shown in the family facet list; maps to `criteria.family = None`.
pub const ALL_FAMILIES: &str = "All";

/// Which note fields the free-text query searches.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SearchScope {
    #[default]
    Any,
    Top,
    Heart,
    Base,
}

impl SearchScope {
    pub fn label(self) -> &'static str {
        match self {
            SearchScope::Any => "Any",
            SearchScope::Top => "Top",
            SearchScope::Heart => "Heart",
            SearchScope::Base => "Base",
        }
    }

    pub fn cycle(self) -> Self {
        match self {
            SearchScope::Any => SearchScope::Top,
            SearchScope::Top => SearchScope::Heart,
            SearchScope::Heart => SearchScope::Base,
            SearchScope::Base => SearchScope::Any,
        }
    }
}

impl FromStr for SearchScope {
    type Err = ();

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "any" => Ok(SearchScope::Any),
            "top" => Ok(SearchScope::Top),
            "heart" => Ok(SearchScope::Heart),
            "base" => Ok(SearchScope::Base),
            _ => Err(()),
        }
    }
}

/// User-selected filter state. `None` for family/status means "match all".
#[derive(Debug, Clone, Default, PartialEq)]
pub struct FilterCriteria {
    pub query: String,
    pub family: Option<String>,
    pub status: Option<String>,
    pub scope: SearchScope,
}

/// Lowercase, decompose, and strip combining marks so that queries match
/// regardless of accents: `normalize("Ciprée") == normalize("cipree")`.
pub fn normalize(text: &str) -> String {
    text.to_lowercase()
        .nfd()
        .filter(|c| !is_combining_mark(*c))
        .collect()
}

fn scoped_fields(scent: &Scent, scope: SearchScope) -> Vec<&str> {
    match scope {
        SearchScope::Top => vec![scent.top_notes.as_str()],
        SearchScope::Heart => vec![scent.heart_notes.as_str()],
        SearchScope::Base => vec![scent.base_notes.as_str()],
        SearchScope::Any => vec![
            scent.name.as_str(),
            scent.family.as_str(),
            scent.top_notes.as_str(),
            scent.heart_notes.as_str(),
            scent.base_notes.as_str(),
            scent.key_ingredients.as_str(),
        ],
    }
}

/// Apply all criteria as a logical AND, preserving the dataset's order.
///
/// Family and status are exact matches against a controlled vocabulary, so
/// no normalization there; the free-text query is a normalized substring
/// test against the scoped fields joined with whitespace.
pub fn apply_filters(scents: &[Scent], criteria: &FilterCriteria) -> Vec<Scent> {
    let nq = normalize(criteria.query.trim());

    scents
        .iter()
        .filter(|s| {
            if let Some(family) = &criteria.family {
                if &s.family != family {
                    return false;
                }
            }
            if let Some(status) = &criteria.status {
                if &s.status != status {
                    return false;
                }
            }
            if nq.is_empty() {
                return true;
            }
            let hay = scoped_fields(s, criteria.scope)
                .iter()
                .map(|f| normalize(f))
                .collect::<Vec<_>>()
                .join(" ");
            hay.contains(&nq)
        })
        .cloned()
        .collect()
}

/// Distinct family values in the dataset, sorted, with the "All" sentinel
/// prepended. Recomputed whenever the dataset is replaced.
pub fn family_facets(scents: &[Scent]) -> Vec<String> {
    let distinct: BTreeSet<&str> = scents.iter().map(|s| s.family.as_str()).collect();
    let mut out = Vec::with_capacity(distinct.len() + 1);
    out.push(ALL_FAMILIES.to_string());
    out.extend(distinct.into_iter().map(String::from));
    out
}
