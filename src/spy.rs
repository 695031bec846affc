//! Decisions behind the reveal, scroll-spy and stats watchers.

pub const REVEAL_THRESHOLD: f64 = 0.15;
pub const SPY_THRESHOLD: f64 = 0.2;
pub const STATS_THRESHOLD: f64 = 0.5;

pub const HIDDEN_CLASS: &str = "hidden";
pub const SHOW_CLASS: &str = "show";
pub const ACTIVE_CLASS: &str = "active";
pub const SKILLS_SECTION_ID: &str = "skills";
pub const STATS_SECTION_ID: &str = "stats";

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct VisibilityEntry<'a> {
    pub id: &'a str,
    pub intersecting: bool,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Reveal {
    pub animate_skills: bool,
}

/// Reveal is one-way: leaving the viewport never produces an action.
pub fn reveal(entry: VisibilityEntry<'_>) -> Option<Reveal> {
    entry.intersecting.then(|| Reveal {
        animate_skills: entry.id == SKILLS_SECTION_ID,
    })
}

/// Section whose link ends up active after one observer callback. Every
/// intersecting entry resets the links in turn, so the last one wins.
pub fn spy_target<'a, I>(entries: I) -> Option<&'a str>
where
    I: IntoIterator<Item = VisibilityEntry<'a>>,
{
    entries
        .into_iter()
        .filter(|entry| entry.intersecting)
        .last()
        .map(|entry| entry.id)
}

pub fn link_fragment(href: &str) -> &str {
    href.strip_prefix('#').unwrap_or("")
}

/// Active flag per link for the given target section.
pub fn active_links<'a, I>(hrefs: I, target: &str) -> Vec<bool>
where
    I: IntoIterator<Item = &'a str>,
{
    hrefs
        .into_iter()
        .map(|href| !target.is_empty() && link_fragment(href) == target)
        .collect()
}
