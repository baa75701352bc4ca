use std::collections::HashMap;

use crate::coords::CoordinateMap;
use crate::model::{Coordinates, LandmarkId, LandmarkRecord, Status};
use crate::wiki::{FlatItem, RegionGroup, WikiLandmarks};

/// Fixed lookup data used while merging the grouped layout.
#[derive(Debug, Clone, Default)]
pub struct MergeTables {
    /// Region name -> id prefix. Regions not listed here are dropped.
    pub prefixes: Vec<(String, String)>,
    /// Wiki name -> marker label, for names the two sources spell differently.
    pub aliases: HashMap<String, String>,
    /// Grade given to every grouped landmark.
    pub grade: String,
}

impl MergeTables {
    fn prefix_of(&self, region: &str) -> Option<&str> {
        self.prefixes
            .iter()
            .find(|(name, _)| name == region)
            .map(|(_, prefix)| prefix.as_str())
    }

    fn lookup_name<'a>(&'a self, name: &'a str) -> &'a str {
        self.aliases.get(name).map(String::as_str).unwrap_or(name)
    }
}

/// Joins parsed wiki landmarks with marker coordinates. Input order is kept.
pub fn merge(landmarks: WikiLandmarks, coords: &CoordinateMap, tables: &MergeTables) -> Vec<LandmarkRecord> {
    match landmarks {
        WikiLandmarks::Grouped(groups) => merge_grouped(&groups, coords, tables),
        WikiLandmarks::Flat(items) => merge_flat(items, coords),
    }
}

/// Ids are `{prefix}-{n:02}`, counted per prefix across all regions sharing it.
pub fn merge_grouped(
    groups: &[RegionGroup],
    coords: &CoordinateMap,
    tables: &MergeTables,
) -> Vec<LandmarkRecord> {
    let mut counters: HashMap<&str, u32> = HashMap::new();
    let mut records = Vec::new();

    for group in groups {
        let Some(prefix) = tables.prefix_of(&group.region) else {
            continue;
        };
        for name in &group.landmarks {
            let counter = counters.entry(prefix).or_insert(0);
            *counter += 1;

            let coordinates = coords
                .get(tables.lookup_name(name))
                .cloned()
                .unwrap_or_else(Coordinates::unknown);

            records.push(LandmarkRecord {
                id: LandmarkId::Code(format!("{prefix}-{counter:02}")),
                name: name.clone(),
                grade: tables.grade.clone(),
                status: Status::Normal,
                coordinates,
            });
        }
    }
    records
}

/// Flat items already carry id, grade and status; only coordinates are attached,
/// by exact name.
pub fn merge_flat(items: Vec<FlatItem>, coords: &CoordinateMap) -> Vec<LandmarkRecord> {
    items
        .into_iter()
        .map(|item| {
            let coordinates = coords.get(&item.name).cloned().unwrap_or_else(Coordinates::unknown);
            LandmarkRecord {
                id: item.id,
                name: item.name,
                grade: item.grade,
                status: item.status,
                coordinates,
            }
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::coords::parse_markers;
    use crate::dataset::houtu_tables;
    use serde_json::json;

    fn group(region: &str, names: &[&str]) -> RegionGroup {
        RegionGroup {
            region: region.into(),
            landmarks: names.iter().map(|n| n.to_string()).collect(),
        }
    }

    fn ids(records: &[LandmarkRecord]) -> Vec<String> {
        records.iter().map(|r| r.id.to_string()).collect()
    }

    #[test]
    fn single_landmark_with_marker() {
        let coords = parse_markers(
            &json!({"sets":{"Tori":{"markers":{"m1":{"label":"塔","x":1,"y":2,"z":3}}}}}),
            "Tori",
        );
        let records = merge(
            WikiLandmarks::Grouped(vec![group("中大陆", &["塔"])]),
            &coords,
            &houtu_tables(),
        );
        assert_eq!(
            serde_json::to_value(&records).unwrap(),
            json!([{"id":"C-01","name":"塔","grade":"白级","status":"Normal","coordinates":{"x":1,"y":2,"z":3}}])
        );
    }

    #[test]
    fn unknown_regions_are_dropped_and_counters_are_per_prefix() {
        let groups = vec![
            group("中大陆", &["a", "b"]),
            group("月球", &["x", "y", "z"]),
            group("北大陆", &["c"]),
            group("中大陆", &["d"]),
        ];
        let records = merge_grouped(&groups, &CoordinateMap::new(), &houtu_tables());
        assert_eq!(ids(&records), ["C-01", "C-02", "N-01", "C-03"]);
        assert!(records.iter().all(|r| r.coordinates == Coordinates::unknown()));
    }

    #[test]
    fn regions_sharing_a_prefix_continue_its_sequence() {
        let tables = MergeTables {
            prefixes: vec![("东".into(), "E".into()), ("东南".into(), "E".into())],
            aliases: HashMap::new(),
            grade: "白级".into(),
        };
        let groups = vec![group("东", &["a", "b"]), group("东南", &["c"])];
        let records = merge_grouped(&groups, &CoordinateMap::new(), &tables);
        assert_eq!(ids(&records), ["E-01", "E-02", "E-03"]);
    }

    #[test]
    fn aliases_apply_before_lookup_but_not_to_the_name() {
        let coords = parse_markers(
            &json!({"sets":{"Tori":{"markers":{"m":{"label":"交通局1号展场","x":5,"y":6,"z":7}}}}}),
            "Tori",
        );
        let records = merge_grouped(
            &[group("西大陆", &["后土交通局一号展示场"])],
            &coords,
            &houtu_tables(),
        );
        assert_eq!(records[0].name, "后土交通局一号展示场");
        assert_eq!(records[0].id.to_string(), "W-01");
        assert_eq!(records[0].coordinates.as_f64(), Some((5.0, 6.0, 7.0)));
    }

    #[test]
    fn flat_items_match_exact_names_only() {
        let coords = parse_markers(
            &json!({"sets":{"Tori":{"markers":{
                "a":{"label":"零洲塔","x":1,"y":2,"z":3},
                "b":{"label":"交通局1号展场","x":5,"y":6,"z":7}
            }}}}),
            "Tori",
        );
        let items = vec![
            FlatItem {
                id: LandmarkId::Sequence(1),
                name: "零洲塔".into(),
                grade: "金级".into(),
                status: Status::Removed,
            },
            FlatItem {
                id: LandmarkId::Sequence(2),
                name: "后土交通局一号展示场".into(),
                grade: "Unknown".into(),
                status: Status::Normal,
            },
        ];
        let records = merge_flat(items, &coords);
        assert_eq!(ids(&records), ["1", "2"]);
        assert_eq!(records[0].status, Status::Removed);
        assert_eq!(records[0].grade, "金级");
        assert!(records[0].coordinates.is_known());
        assert_eq!(records[1].coordinates, Coordinates::unknown());
    }
}
