//! Wiki landmark page parsing.
//!
//! The two wiki pages lay their landmarks out differently, so each dataset carries
//! a [`Layout`]: the CSS selectors and attribute names that locate names, grades and
//! removal markers. Supporting another page layout means writing another rule, not
//! another parser.

use scraper::{ElementRef, Html, Selector};

use crate::model::{LandmarkId, Status};
use crate::{Error, Result, UNKNOWN};

/// Page where a table groups landmarks by region, one row per region.
#[derive(Debug, Clone)]
pub struct GroupedRule {
    /// The landmark table. A page without it is a parse failure.
    pub table: String,
    pub row: String,
    /// Header cell holding the region name.
    pub group: String,
    /// Cell holding the region's landmark links.
    pub list: String,
    pub link: String,
}

/// Page where every landmark is a list item carrying its own grade and status.
#[derive(Debug, Clone)]
pub struct FlatRule {
    pub item: String,
    pub link: String,
    /// Link attribute preferred over the link text for the name.
    pub title_attr: String,
    pub grade: String,
    pub grade_attr: String,
    /// Present inside an item when the landmark was removed.
    pub removed: String,
}

#[derive(Debug, Clone)]
pub enum Layout {
    Grouped(GroupedRule),
    Flat(FlatRule),
}

/// Landmark names of one region, in page order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RegionGroup {
    pub region: String,
    pub landmarks: Vec<String>,
}

/// One landmark from a flat page; the id is assigned while parsing.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FlatItem {
    pub id: LandmarkId,
    pub name: String,
    pub grade: String,
    pub status: Status,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum WikiLandmarks {
    Grouped(Vec<RegionGroup>),
    Flat(Vec<FlatItem>),
}

impl WikiLandmarks {
    pub fn len(&self) -> usize {
        match self {
            WikiLandmarks::Grouped(groups) => groups.iter().map(|g| g.landmarks.len()).sum(),
            WikiLandmarks::Flat(items) => items.len(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn empty_like(layout: &Layout) -> Self {
        match layout {
            Layout::Grouped(_) => WikiLandmarks::Grouped(Vec::new()),
            Layout::Flat(_) => WikiLandmarks::Flat(Vec::new()),
        }
    }
}

impl Layout {
    /// Extracts the landmarks from a wiki page according to this layout.
    pub fn parse(&self, html: &str) -> Result<WikiLandmarks> {
        let doc = Html::parse_document(html);
        match self {
            Layout::Grouped(rule) => parse_grouped(&doc, rule).map(WikiLandmarks::Grouped),
            Layout::Flat(rule) => parse_flat(&doc, rule).map(WikiLandmarks::Flat),
        }
    }
}

fn parse_grouped(doc: &Html, rule: &GroupedRule) -> Result<Vec<RegionGroup>> {
    let table_selector = create_selector(&rule.table)?;
    let row_selector = create_selector(&rule.row)?;
    let group_selector = create_selector(&rule.group)?;
    let list_selector = create_selector(&rule.list)?;
    let link_selector = create_selector(&rule.link)?;

    let table = doc
        .select(&table_selector)
        .next()
        .ok_or_else(|| Error::MissingElement(rule.table.clone()))?;

    let mut groups: Vec<RegionGroup> = Vec::new();
    for row in table.select(&row_selector) {
        let (Some(group), Some(list)) = (
            row.select(&group_selector).next(),
            row.select(&list_selector).next(),
        ) else {
            continue;
        };

        let region = stripped_text(group);
        if region.is_empty() {
            continue;
        }
        let landmarks = list
            .select(&link_selector)
            .map(stripped_text)
            .filter(|name| !name.is_empty())
            .collect();

        // A region seen twice keeps its first position but the later row's names.
        match groups.iter_mut().find(|g| g.region == region) {
            Some(existing) => existing.landmarks = landmarks,
            None => groups.push(RegionGroup { region, landmarks }),
        }
    }
    Ok(groups)
}

fn parse_flat(doc: &Html, rule: &FlatRule) -> Result<Vec<FlatItem>> {
    let item_selector = create_selector(&rule.item)?;
    let link_selector = create_selector(&rule.link)?;
    let grade_selector = create_selector(&rule.grade)?;
    let removed_selector = create_selector(&rule.removed)?;

    let mut items = Vec::new();
    let mut next_id = 1;
    for item in doc.select(&item_selector) {
        let Some(link) = item.select(&link_selector).next() else {
            continue;
        };
        let name = match link.value().attr(&rule.title_attr).map(str::trim) {
            Some(title) if !title.is_empty() => title.to_string(),
            _ => stripped_text(link),
        };
        if name.is_empty() {
            continue;
        }

        let grade = item
            .select(&grade_selector)
            .next()
            .and_then(|el| el.value().attr(&rule.grade_attr))
            .filter(|label| !label.is_empty())
            .unwrap_or(UNKNOWN)
            .to_string();

        let status = if item.select(&removed_selector).next().is_some() {
            Status::Removed
        } else {
            Status::Normal
        };

        items.push(FlatItem {
            id: LandmarkId::Sequence(next_id),
            name,
            grade,
            status,
        });
        next_id += 1;
    }
    Ok(items)
}

/// Text of every descendant text node, each trimmed, concatenated.
pub(crate) fn stripped_text(el: ElementRef) -> String {
    el.text().map(str::trim).collect()
}

#[inline]
pub(crate) fn create_selector(sel_str: &str) -> Result<Selector> {
    Selector::parse(sel_str).map_err(|_| Error::ParseMissingSelector(sel_str.into()))
}
