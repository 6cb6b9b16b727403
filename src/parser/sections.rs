//! Bracket-tag scanning for manifest text.
//!
//! Scanning is a flat two-step process: a linear pass over the text emits one
//! [`SectionEvent`] per `[TAG]` / `[/TAG]`, then [`Sections::from_events`]
//! folds those events into a name → content map. Nesting is never checked.
//! Content that follows an opening tag (up to the next tag of any kind)
//! belongs to that section; content after a closing tag is discarded; a tag
//! opened twice keeps its last content.

use regex::Regex;
use std::collections::HashMap;
use std::sync::LazyLock;

/// Uppercase tag bodies, plus the mixed-case `Registers` alias.
static TAG_REGEX: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"\[(/?)([A-Z_]+|Registers)\]").expect("section tag regex is valid")
});

/// A single tag found in manifest text.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SectionEvent<'a> {
    /// Tag name without brackets or slash
    pub name: &'a str,
    /// True for `[/NAME]`
    pub is_close: bool,
    /// Raw text between this tag and the next one (or end of input)
    pub content: &'a str,
}

/// Scans `text` for section tags in order of appearance.
pub fn scan_sections(text: &str) -> Vec<SectionEvent<'_>> {
    let tags: Vec<_> = TAG_REGEX
        .captures_iter(text)
        .filter_map(|caps| {
            let whole = caps.get(0)?;
            let name = caps.get(2)?.as_str();
            let is_close = caps.get(1).is_some_and(|m| !m.as_str().is_empty());
            Some((whole.start(), whole.end(), name, is_close))
        })
        .collect();

    tags.iter()
        .enumerate()
        .map(|(idx, &(_, end, name, is_close))| {
            let content_end = tags.get(idx + 1).map_or(text.len(), |next| next.0);
            SectionEvent {
                name,
                is_close,
                content: &text[end..content_end],
            }
        })
        .collect()
}

/// Section contents keyed by tag name.
#[derive(Debug, Clone, Default)]
pub struct Sections<'a> {
    contents: HashMap<&'a str, &'a str>,
}

impl<'a> Sections<'a> {
    /// Folds scan events into section contents.
    pub fn from_events(events: impl IntoIterator<Item = SectionEvent<'a>>) -> Self {
        let mut contents = HashMap::new();
        for event in events {
            if !event.is_close {
                contents.insert(event.name, event.content.trim());
            }
        }
        Self { contents }
    }

    /// Content of a section; blank sections count as absent.
    pub fn get(&self, name: &str) -> Option<&'a str> {
        self.contents
            .get(name)
            .copied()
            .filter(|content| !content.is_empty())
    }

    /// Content of the first present section among `names`.
    pub fn first_of(&self, names: &[&str]) -> Option<&'a str> {
        names.iter().find_map(|name| self.get(name))
    }

    /// Names of all non-blank sections, sorted.
    pub fn names(&self) -> Vec<&'a str> {
        let mut names: Vec<_> = self
            .contents
            .iter()
            .filter(|(_, content)| !content.is_empty())
            .map(|(name, _)| *name)
            .collect();
        names.sort_unstable();
        names
    }
}

/// Splits manifest text into its sections.
pub fn split_sections(text: &str) -> Sections<'_> {
    Sections::from_events(scan_sections(text))
}
