//! Split merged items into tag sections and render them as markdown.

use regex_lite::Regex;

use crate::github::Tag;

use super::item::ChangelogItem;

/// Heading for items that match none of the grouping labels.
pub const OTHER_GROUP: &str = "Other";

/// Filtering and layout settings shared by every generation mode.
#[derive(Debug, Clone)]
pub struct RenderOptions {
    /// Labels to group by, in heading order.
    pub labels: Vec<String>,
    /// Items carrying any of these labels are dropped.
    pub excluded_labels: Vec<String>,
    /// Items whose title matches are dropped.
    pub title_filter: Option<Regex>,
    /// Heading for the leading section of not-yet-tagged items.
    pub next_tag: Option<String>,
    /// Whether the leading untagged section is rendered at all.
    pub include_untagged: bool,
}

impl Default for RenderOptions {
    fn default() -> Self {
        Self {
            labels: Vec::new(),
            excluded_labels: Vec::new(),
            title_filter: None,
            next_tag: None,
            include_untagged: true,
        }
    }
}

impl RenderOptions {
    fn is_excluded(&self, item: &ChangelogItem) -> bool {
        let title_matches = self
            .title_filter
            .as_ref()
            .is_some_and(|re| re.is_match(&item.title));

        title_matches || item.labels.iter().any(|l| self.excluded_labels.contains(&l.name))
    }
}

/// Items released under one tag. The first entry of a changelog holds the untagged items.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChangelogEntry {
    pub tag: Option<String>,
    pub items: Vec<ChangelogItem>,
}

/// Items of an entry sharing a grouping label.
#[derive(Debug)]
pub struct ItemGroup<'a> {
    pub name: String,
    pub items: Vec<&'a ChangelogItem>,
}

impl ChangelogEntry {
    fn new(tag: Option<String>) -> Self {
        Self {
            tag,
            items: Vec::new(),
        }
    }

    /// Group items by label, in label order.
    ///
    /// An item lands in the group of the first label it carries. Grouping stops
    /// once every item is placed; whatever is left goes under [`OTHER_GROUP`].
    pub fn groups(&self, labels: &[String]) -> Vec<ItemGroup<'_>> {
        let mut remaining: Vec<&ChangelogItem> = self.items.iter().collect();
        let mut groups = Vec::new();

        for label in labels {
            if remaining.is_empty() {
                break;
            }

            let (matching, rest): (Vec<_>, Vec<_>) =
                remaining.into_iter().partition(|item| item.has_label(label));
            remaining = rest;

            groups.push(ItemGroup {
                name: capitalize_words(label),
                items: matching,
            });
        }

        if !remaining.is_empty() {
            groups.push(ItemGroup {
                name: OTHER_GROUP.to_string(),
                items: remaining,
            });
        }

        groups
    }
}

/// Walk items newest first and cut a new section at each tagged merge commit.
///
/// The first entry is always present and holds everything merged after the
/// newest matching tag. Tag matching happens before filtering, so an excluded
/// item still opens its tag's section.
pub fn split_by_tags(
    items: Vec<ChangelogItem>,
    tags: &[Tag],
    options: &RenderOptions,
) -> Vec<ChangelogEntry> {
    let mut remaining_tags: Vec<&Tag> = tags.iter().collect();
    let mut entries = Vec::new();
    let mut entry = ChangelogEntry::new(options.next_tag.clone());

    for item in items {
        if let Some(sha) = item.merge_commit_sha.as_deref() {
            if let Some(index) = remaining_tags.iter().position(|t| t.commit.sha == sha) {
                let tag = remaining_tags.remove(index);
                entries.push(std::mem::replace(
                    &mut entry,
                    ChangelogEntry::new(Some(tag.name.clone())),
                ));
            }
        }

        if !options.is_excluded(&item) {
            entry.items.push(item);
        }
    }

    entries.push(entry);
    entries
}

/// Render entries as markdown.
pub fn render(entries: &[ChangelogEntry], options: &RenderOptions) -> String {
    let skip = if options.include_untagged { 0 } else { 1 };
    let mut lines: Vec<String> = Vec::new();

    for entry in entries.iter().skip(skip) {
        if let Some(tag) = &entry.tag {
            if !entry.items.is_empty() {
                lines.push(format!("\n# {}", tag));
                lines.push("------\n".to_string());
            }
        }

        let groups = entry.groups(&options.labels);
        let show_group_name = groups.len() > 1;

        for group in groups {
            if show_group_name && !group.items.is_empty() {
                lines.push(format!("\n### {}\n", group.name));
            }

            lines.extend(group.items.iter().map(|item| item.formatted_line()));
        }
    }

    let mut out = lines.join("\n");
    out.push('\n');
    out
}

/// Split and render in one step.
pub fn create_changelog(items: Vec<ChangelogItem>, tags: &[Tag], options: &RenderOptions) -> String {
    let entries = split_by_tags(items, tags, options);
    render(&entries, options)
}

/// Upper-case the first letter of every space-separated word.
pub fn capitalize_words(s: &str) -> String {
    s.split(' ')
        .filter(|word| !word.is_empty())
        .map(|word| {
            let mut chars = word.chars();
            match chars.next() {
                Some(first) => first.to_uppercase().chain(chars).collect(),
                None => String::new(),
            }
        })
        .collect::<Vec<String>>()
        .join(" ")
}
