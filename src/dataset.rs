//! The two landmark datasets and everything that differs between them.

use std::path::{Path, PathBuf};

use crate::merge::MergeTables;
use crate::wiki::{FlatRule, GroupedRule, Layout};
use crate::{
    GROUPED_GRADE, HOUTU_COORDINATES_URL, HOUTU_WIKI_URL, MARKER_SET, ZTH_COORDINATES_URL,
    ZTH_WIKI_URL,
};

#[derive(Debug, Clone)]
pub struct DatasetConfig {
    /// Source name used by the API (`?source=`) and for the output file.
    pub name: &'static str,
    pub wiki_url: String,
    pub coordinates_url: String,
    pub marker_set: String,
    pub layout: Layout,
    pub tables: MergeTables,
}

impl DatasetConfig {
    pub fn zth() -> Self {
        Self {
            name: "zth",
            wiki_url: ZTH_WIKI_URL.into(),
            coordinates_url: ZTH_COORDINATES_URL.into(),
            marker_set: MARKER_SET.into(),
            layout: zth_layout(),
            tables: MergeTables::default(),
        }
    }

    pub fn houtu() -> Self {
        Self {
            name: "houtu",
            wiki_url: HOUTU_WIKI_URL.into(),
            coordinates_url: HOUTU_COORDINATES_URL.into(),
            marker_set: MARKER_SET.into(),
            layout: houtu_layout(),
            tables: houtu_tables(),
        }
    }

    pub fn all() -> Vec<Self> {
        vec![Self::zth(), Self::houtu()]
    }

    pub fn by_name(name: &str) -> Option<Self> {
        Self::all().into_iter().find(|d| d.name == name)
    }

    pub fn output_path(&self, data_dir: &Path) -> PathBuf {
        output_path(data_dir, self.name)
    }
}

/// `{data_dir}/landmark/{source}.json`
pub fn output_path(data_dir: &Path, source: &str) -> PathBuf {
    data_dir.join("landmark").join(format!("{source}.json"))
}

pub fn zth_layout() -> Layout {
    Layout::Flat(FlatRule {
        item: ".navbox-inner .navbox-list li".into(),
        link: "a".into(),
        title_attr: "title".into(),
        grade: "small".into(),
        grade_attr: "aria-label".into(),
        removed: r#"span[style*="line-through"]"#.into(),
    })
}

pub fn houtu_layout() -> Layout {
    Layout::Grouped(GroupedRule {
        table: "table.navbox-houtu_landmarks".into(),
        row: "tr".into(),
        group: "th.navbox-group".into(),
        list: "td.navbox-list-with-group".into(),
        link: "a".into(),
    })
}

pub fn houtu_tables() -> MergeTables {
    let prefixes = [
        ("中大陆", "C"),
        ("北大陆", "N"),
        ("东大陆", "E"),
        ("东南陆缘", "ES"),
        ("西南陆缘", "WS"),
        ("西大陆", "W"),
    ];
    MergeTables {
        prefixes: prefixes
            .into_iter()
            .map(|(region, prefix)| (region.to_string(), prefix.to_string()))
            .collect(),
        aliases: [("后土交通局一号展示场", "交通局1号展场")]
            .into_iter()
            .map(|(wiki, marker)| (wiki.to_string(), marker.to_string()))
            .collect(),
        grade: GROUPED_GRADE.into(),
    }
}
