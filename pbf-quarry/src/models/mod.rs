use std::fmt;
use std::ops::AddAssign;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::errors::Error;

/// Bounding box of a PBF extract, in nanodegrees.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Bound {
    pub left: i64,
    pub right: i64,
    pub top: i64,
    pub bottom: i64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum Element {
    Node(Node),
    Way(Way),
    Relation(Relation),
}

impl Element {
    pub fn element_type(&self) -> ElementType {
        match self {
            Element::Node(_) => ElementType::Node,
            Element::Way(_) => ElementType::Way,
            Element::Relation(_) => ElementType::Relation,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ElementType {
    Node,
    Way,
    Relation,
}

impl ElementType {
    pub fn as_str(&self) -> &'static str {
        match self {
            ElementType::Node => "node",
            ElementType::Way => "way",
            ElementType::Relation => "relation",
        }
    }
}

impl fmt::Display for ElementType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ElementType {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "node" => Ok(ElementType::Node),
            "way" => Ok(ElementType::Way),
            "relation" => Ok(ElementType::Relation),
            _ => Err(Error::decode(format!("illegal element type: {}", s))),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Tag {
    pub key: String,
    pub value: String,
}

/// Authoring metadata attached to an element.
///
/// Every field carries an explicit presence flag: the wire encoding uses a
/// raw zero for "not present", but a genuine zero value read with presence
/// information survives as `Some(0)`.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct EntityInfo {
    pub version: Option<i32>,
    /// Milliseconds since the epoch.
    pub timestamp: Option<i64>,
    pub changeset: Option<i64>,
    pub uid: Option<i64>,
    pub user: Option<String>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct Node {
    pub id: i64,
    pub info: EntityInfo,
    pub tags: Vec<Tag>,
    pub latitude: f64,
    pub longitude: f64,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct Way {
    pub id: i64,
    pub info: EntityInfo,
    pub tags: Vec<Tag>,
    pub node_refs: Vec<i64>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct Relation {
    pub id: i64,
    pub info: EntityInfo,
    pub tags: Vec<Tag>,
    pub members: Vec<RelationMember>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct RelationMember {
    pub id: i64,
    pub role: String,
    pub member_type: ElementType,
}

/// Per-kind element tally, used by the stats pipeline and the writers.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ElementCount {
    pub nodes: u64,
    pub ways: u64,
    pub relations: u64,
}

impl ElementCount {
    pub fn total(&self) -> u64 {
        self.nodes + self.ways + self.relations
    }
}

impl AddAssign for ElementCount {
    fn add_assign(&mut self, other: Self) {
        self.nodes += other.nodes;
        self.ways += other.ways;
        self.relations += other.relations;
    }
}

impl fmt::Display for ElementCount {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "(nodes = {} / ways = {} / relations = {})",
            self.nodes, self.ways, self.relations
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn element_type_round_trips_through_str() {
        for element_type in [ElementType::Node, ElementType::Way, ElementType::Relation] {
            assert_eq!(
                element_type.as_str().parse::<ElementType>().unwrap(),
                element_type
            );
        }
        assert!("area".parse::<ElementType>().is_err());
    }

    #[test]
    fn element_count_accumulates() {
        let mut total = ElementCount::default();
        total += ElementCount {
            nodes: 2,
            ways: 1,
            relations: 0,
        };
        total += ElementCount {
            nodes: 1,
            ways: 0,
            relations: 4,
        };
        assert_eq!(total.nodes, 3);
        assert_eq!(total.total(), 8);
        assert_eq!(total.to_string(), "(nodes = 3 / ways = 1 / relations = 4)");
    }
}
