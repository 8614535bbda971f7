use serde::{Deserialize, Serialize};

use super::field::FieldCodec;
use crate::errors::{Error, Result};
use crate::models::{
    Bound, ElementType, EntityInfo, Node, Relation, RelationMember, Tag, Way,
};
use crate::pbf::proto::osmformat;
use crate::pbf::proto::osmformat::Relation_MemberType;

pub struct HeaderReader {
    header: osmformat::HeaderBlock,
}

/// File-level metadata extracted from the header block, serialized as the
/// `header.json` sidecar next to the element tables.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HeaderSummary {
    pub bbox: Option<Bound>,
    pub required_features: Vec<String>,
    pub optional_features: Vec<String>,
    pub writingprogram: Option<String>,
    pub source: Option<String>,
    pub osmosis_replication_timestamp: Option<i64>,
    pub osmosis_replication_sequence_number: Option<i64>,
    pub osmosis_replication_base_url: Option<String>,
}

impl HeaderReader {
    pub fn new(header: osmformat::HeaderBlock) -> Self {
        Self { header }
    }

    pub fn bound(&self) -> Option<Bound> {
        if self.header.has_bbox() {
            let bbox = self.header.get_bbox();
            Some(Bound {
                left: bbox.get_left(),
                right: bbox.get_right(),
                top: bbox.get_top(),
                bottom: bbox.get_bottom(),
            })
        } else {
            None
        }
    }

    pub fn summary(&self) -> HeaderSummary {
        let optional_string = |present: bool, value: &str| {
            if present {
                Some(value.to_owned())
            } else {
                None
            }
        };
        HeaderSummary {
            bbox: self.bound(),
            required_features: self.header.get_required_features().to_vec(),
            optional_features: self.header.get_optional_features().to_vec(),
            writingprogram: optional_string(
                self.header.has_writingprogram(),
                self.header.get_writingprogram(),
            ),
            source: optional_string(self.header.has_source(), self.header.get_source()),
            osmosis_replication_timestamp: if self.header.has_osmosis_replication_timestamp() {
                Some(self.header.get_osmosis_replication_timestamp())
            } else {
                None
            },
            osmosis_replication_sequence_number: if self
                .header
                .has_osmosis_replication_sequence_number()
            {
                Some(self.header.get_osmosis_replication_sequence_number())
            } else {
                None
            },
            osmosis_replication_base_url: optional_string(
                self.header.has_osmosis_replication_base_url(),
                self.header.get_osmosis_replication_base_url(),
            ),
        }
    }
}

/// Decodes the records of one primitive block into domain elements.
///
/// Any malformed field aborts the whole block: corrupt input must not
/// produce partially-wrong output.
pub struct PrimitiveReader {
    block: osmformat::PrimitiveBlock,
    codec: FieldCodec,
}

impl PrimitiveReader {
    pub fn new(block: osmformat::PrimitiveBlock) -> Result<Self> {
        Ok(Self {
            codec: FieldCodec::new_with_block(&block)?,
            block,
        })
    }

    pub fn get_all_elements(&self) -> Result<(Vec<Node>, Vec<Way>, Vec<Relation>)> {
        let mut nodes: Vec<Node> = Vec::new();
        let mut ways: Vec<Way> = Vec::new();
        let mut relations: Vec<Relation> = Vec::new();

        for group in self.block.get_primitivegroup() {
            if group.has_dense() {
                nodes.append(&mut self.process_dense(group.get_dense())?);
            }
            nodes.append(&mut self.process_nodes(group.get_nodes())?);
            ways.append(&mut self.process_ways(group.get_ways())?);
            relations.append(&mut self.process_relations(group.get_relations())?);
        }

        Ok((nodes, ways, relations))
    }

    fn process_dense(&self, dense: &osmformat::DenseNodes) -> Result<Vec<Node>> {
        let ids = dense.get_id();
        let lats = dense.get_lat();
        let lons = dense.get_lon();
        if lats.len() != ids.len() || lons.len() != ids.len() {
            return Err(Error::decode(format!(
                "dense node arrays disagree: {} ids, {} lats, {} lons",
                ids.len(),
                lats.len(),
                lons.len()
            )));
        }

        let infos = self.decode_dense_info(dense)?;
        let mut tags = self.decode_dense_tags(dense.get_keys_vals(), ids.len())?;

        let mut result = Vec::with_capacity(ids.len());
        let mut node_id: i64 = 0;
        let mut latitude: i64 = 0;
        let mut longitude: i64 = 0;
        for (i, info) in infos.into_iter().enumerate() {
            node_id += ids[i];
            latitude += lats[i];
            longitude += lons[i];
            result.push(Node {
                id: node_id,
                info,
                tags: std::mem::take(&mut tags[i]),
                latitude: self.codec.decode_latitude(latitude),
                longitude: self.codec.decode_longitude(longitude),
            });
        }
        Ok(result)
    }

    /// Splits the flat `keys_vals` sequence into per-node tag lists.
    ///
    /// Pairs of string indices belong to the current node until a `0`
    /// sentinel closes its list; a lone `0` is a tagless node. The sequence
    /// must be consumed exactly once across all nodes of the group.
    fn decode_dense_tags(&self, keys_vals: &[i32], count: usize) -> Result<Vec<Vec<Tag>>> {
        let mut tags: Vec<Vec<Tag>> = vec![Vec::new(); count];
        if keys_vals.is_empty() {
            // Entirely absent means every node in the group is tagless.
            return Ok(tags);
        }

        let mut iter = keys_vals.iter();
        for node_tags in tags.iter_mut() {
            loop {
                let key_index = match iter.next() {
                    None => {
                        return Err(Error::decode(
                            "dense keys_vals exhausted before every node was terminated",
                        ))
                    }
                    Some(0) => break,
                    Some(&index) => index,
                };
                let value_index = match iter.next() {
                    None => {
                        return Err(Error::decode(format!(
                            "dense keys_vals holds key {} with no value",
                            key_index
                        )))
                    }
                    Some(&index) => index,
                };
                node_tags.push(Tag {
                    key: self.string_at(key_index as i64)?.to_owned(),
                    value: self.string_at(value_index as i64)?.to_owned(),
                });
            }
        }
        if iter.next().is_some() {
            return Err(Error::decode(
                "dense keys_vals holds entries beyond the last node",
            ));
        }
        Ok(tags)
    }

    fn decode_dense_info(&self, dense: &osmformat::DenseNodes) -> Result<Vec<EntityInfo>> {
        let count = dense.get_id().len();
        if !dense.has_denseinfo() {
            return Ok(vec![EntityInfo::default(); count]);
        }
        let info = dense.get_denseinfo();

        let versions = info.get_version();
        let timestamps = info.get_timestamp();
        let changesets = info.get_changeset();
        let uids = info.get_uid();
        let user_sids = info.get_user_sid();
        for (name, len) in [
            ("version", versions.len()),
            ("timestamp", timestamps.len()),
            ("changeset", changesets.len()),
            ("uid", uids.len()),
            ("user_sid", user_sids.len()),
        ] {
            if len != 0 && len != count {
                return Err(Error::decode(format!(
                    "dense info {} column has {} entries for {} nodes",
                    name, len, count
                )));
            }
        }

        // The dense form has no per-record presence, so a decoded zero is
        // the only available absence marker here. Plain Info records keep
        // real presence flags (see decode_info).
        let mut result = Vec::with_capacity(count);
        let mut timestamp: i64 = 0;
        let mut changeset: i64 = 0;
        let mut uid: i64 = 0;
        let mut user_sid: i64 = 0;
        for i in 0..count {
            let mut entry = EntityInfo::default();
            if let Some(&version) = versions.get(i) {
                entry.version = if version == 0 { None } else { Some(version) };
            }
            if let Some(&delta) = timestamps.get(i) {
                timestamp += delta;
                entry.timestamp = if timestamp == 0 {
                    None
                } else {
                    Some(self.codec.decode_timestamp(timestamp))
                };
            }
            if let Some(&delta) = changesets.get(i) {
                changeset += delta;
                entry.changeset = if changeset == 0 { None } else { Some(changeset) };
            }
            if let Some(&delta) = uids.get(i) {
                uid += delta as i64;
                entry.uid = if uid == 0 { None } else { Some(uid) };
            }
            if let Some(&delta) = user_sids.get(i) {
                user_sid += delta as i64;
                let user = self.string_at(user_sid)?;
                if !user.is_empty() {
                    entry.user = Some(user.to_owned());
                }
            }
            result.push(entry);
        }
        Ok(result)
    }

    fn decode_info(&self, info: &osmformat::Info) -> Result<EntityInfo> {
        let user = if info.has_user_sid() {
            let name = self.string_at(info.get_user_sid() as i64)?;
            if name.is_empty() {
                None
            } else {
                Some(name.to_owned())
            }
        } else {
            None
        };
        Ok(EntityInfo {
            version: if info.has_version() {
                Some(info.get_version())
            } else {
                None
            },
            timestamp: if info.has_timestamp() {
                Some(self.codec.decode_timestamp(info.get_timestamp()))
            } else {
                None
            },
            changeset: if info.has_changeset() {
                Some(info.get_changeset())
            } else {
                None
            },
            uid: if info.has_uid() {
                Some(info.get_uid() as i64)
            } else {
                None
            },
            user,
        })
    }

    fn entity_info(&self, elm_info: Option<&osmformat::Info>) -> Result<EntityInfo> {
        match elm_info {
            Some(info) => self.decode_info(info),
            None => Ok(EntityInfo::default()),
        }
    }

    fn process_tags(&self, keys: &[u32], vals: &[u32]) -> Result<Vec<Tag>> {
        if keys.len() != vals.len() {
            return Err(Error::decode(format!(
                "tag arrays disagree: {} keys, {} values",
                keys.len(),
                vals.len()
            )));
        }
        let mut tags = Vec::with_capacity(keys.len());
        for (&key_index, &val_index) in keys.iter().zip(vals) {
            tags.push(Tag {
                key: self.string_at(key_index as i64)?.to_owned(),
                value: self.string_at(val_index as i64)?.to_owned(),
            });
        }
        Ok(tags)
    }

    fn process_nodes(&self, nodes: &[osmformat::Node]) -> Result<Vec<Node>> {
        let mut result = Vec::with_capacity(nodes.len());
        for elm in nodes {
            result.push(Node {
                id: elm.get_id(),
                info: self.entity_info(elm.info.as_ref())?,
                tags: self.process_tags(elm.get_keys(), elm.get_vals())?,
                latitude: self.codec.decode_latitude(elm.get_lat()),
                longitude: self.codec.decode_longitude(elm.get_lon()),
            });
        }
        Ok(result)
    }

    fn process_ways(&self, ways: &[osmformat::Way]) -> Result<Vec<Way>> {
        let mut result = Vec::with_capacity(ways.len());
        for elm in ways {
            let mut node_refs = Vec::with_capacity(elm.get_refs().len());
            let mut node_id: i64 = 0;
            for &ref_delta in elm.get_refs() {
                node_id += ref_delta;
                node_refs.push(node_id);
            }
            result.push(Way {
                id: elm.get_id(),
                info: self.entity_info(elm.info.as_ref())?,
                tags: self.process_tags(elm.get_keys(), elm.get_vals())?,
                node_refs,
            });
        }
        Ok(result)
    }

    fn process_relations(&self, relations: &[osmformat::Relation]) -> Result<Vec<Relation>> {
        let mut result = Vec::with_capacity(relations.len());
        for elm in relations {
            result.push(Relation {
                id: elm.get_id(),
                info: self.entity_info(elm.info.as_ref())?,
                tags: self.process_tags(elm.get_keys(), elm.get_vals())?,
                members: self.process_members(
                    elm.get_memids(),
                    elm.get_types(),
                    elm.get_roles_sid(),
                )?,
            });
        }
        Ok(result)
    }

    fn process_members(
        &self,
        member_ids: &[i64],
        member_types: &[Relation_MemberType],
        member_roles: &[i32],
    ) -> Result<Vec<RelationMember>> {
        if member_types.len() != member_ids.len() || member_roles.len() != member_ids.len() {
            return Err(Error::decode(format!(
                "relation member arrays disagree: {} ids, {} types, {} roles",
                member_ids.len(),
                member_types.len(),
                member_roles.len()
            )));
        }
        let mut members = Vec::with_capacity(member_ids.len());
        let mut member_id: i64 = 0;
        for i in 0..member_ids.len() {
            member_id += member_ids[i];
            let member_type = match member_types[i] {
                Relation_MemberType::NODE => ElementType::Node,
                Relation_MemberType::WAY => ElementType::Way,
                Relation_MemberType::RELATION => ElementType::Relation,
            };
            members.push(RelationMember {
                id: member_id,
                role: self.string_at(member_roles[i] as i64)?.to_owned(),
                member_type,
            });
        }
        Ok(members)
    }

    fn string_at(&self, index: i64) -> Result<&str> {
        let index = usize::try_from(index)
            .map_err(|_| Error::decode(format!("negative string table index {}", index)))?;
        self.codec.decode_string(index)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pbf::proto::osmformat::{
        DenseInfo, DenseNodes, HeaderBBox, HeaderBlock, Info, PrimitiveBlock, PrimitiveGroup,
        StringTable,
    };

    fn block_with_strings(entries: &[&str]) -> PrimitiveBlock {
        let mut table = StringTable::new();
        for entry in entries {
            table.mut_s().push(entry.as_bytes().to_vec());
        }
        let mut block = PrimitiveBlock::new();
        block.set_stringtable(table);
        block
    }

    fn single_group(block: &mut PrimitiveBlock) -> &mut PrimitiveGroup {
        block.mut_primitivegroup().push(PrimitiveGroup::new());
        block.mut_primitivegroup().last_mut().unwrap()
    }

    #[test]
    fn dense_ids_are_delta_decoded() {
        let mut block = block_with_strings(&[""]);
        let mut dense = DenseNodes::new();
        for delta in [5i64, -2, 3] {
            dense.mut_id().push(delta);
            dense.mut_lat().push(0);
            dense.mut_lon().push(0);
        }
        single_group(&mut block).set_dense(dense);

        let reader = PrimitiveReader::new(block).unwrap();
        let (nodes, _, _) = reader.get_all_elements().unwrap();
        let ids: Vec<i64> = nodes.iter().map(|n| n.id).collect();
        assert_eq!(ids, vec![5, 3, 6]);
    }

    #[test]
    fn dense_coordinates_are_scaled() {
        let mut block = block_with_strings(&[""]);
        let mut dense = DenseNodes::new();
        dense.mut_id().push(1);
        dense.mut_lat().push(1_234_567_890);
        dense.mut_lon().push(-1_234_567_890);
        single_group(&mut block).set_dense(dense);

        let reader = PrimitiveReader::new(block).unwrap();
        let (nodes, _, _) = reader.get_all_elements().unwrap();
        assert!((nodes[0].latitude - 123.456789).abs() < 1e-12);
        assert!((nodes[0].longitude + 123.456789).abs() < 1e-12);
    }

    #[test]
    fn dense_tags_split_on_sentinels() {
        let mut block = block_with_strings(&["", "a", "b", "c", "d", "e", "f"]);
        let mut dense = DenseNodes::new();
        for _ in 0..3 {
            dense.mut_id().push(1);
            dense.mut_lat().push(0);
            dense.mut_lon().push(0);
        }
        for index in [1, 2, 0, 0, 3, 4, 5, 6, 0] {
            dense.mut_keys_vals().push(index);
        }
        single_group(&mut block).set_dense(dense);

        let reader = PrimitiveReader::new(block).unwrap();
        let (nodes, _, _) = reader.get_all_elements().unwrap();
        assert_eq!(
            nodes[0].tags,
            vec![Tag {
                key: "a".into(),
                value: "b".into()
            }]
        );
        assert!(nodes[1].tags.is_empty());
        assert_eq!(
            nodes[2].tags,
            vec![
                Tag {
                    key: "c".into(),
                    value: "d".into()
                },
                Tag {
                    key: "e".into(),
                    value: "f".into()
                },
            ]
        );
    }

    #[test]
    fn dense_tags_left_over_fail_the_block() {
        let mut block = block_with_strings(&["", "a", "b"]);
        let mut dense = DenseNodes::new();
        dense.mut_id().push(1);
        dense.mut_lat().push(0);
        dense.mut_lon().push(0);
        for index in [0, 1, 2, 0] {
            dense.mut_keys_vals().push(index);
        }
        single_group(&mut block).set_dense(dense);

        let reader = PrimitiveReader::new(block).unwrap();
        let err = reader.get_all_elements().unwrap_err();
        assert!(matches!(err, Error::Decode(_)), "got {:?}", err);
    }

    #[test]
    fn dense_tags_shortfall_fails_the_block() {
        let mut block = block_with_strings(&["", "a", "b"]);
        let mut dense = DenseNodes::new();
        for _ in 0..2 {
            dense.mut_id().push(1);
            dense.mut_lat().push(0);
            dense.mut_lon().push(0);
        }
        // Terminates the first node only.
        for index in [1, 2, 0] {
            dense.mut_keys_vals().push(index);
        }
        single_group(&mut block).set_dense(dense);

        let reader = PrimitiveReader::new(block).unwrap();
        assert!(reader.get_all_elements().is_err());
    }

    #[test]
    fn dense_info_runs_cumulative_sums() {
        let mut block = block_with_strings(&["", "alice", "bob"]);
        block.set_date_granularity(1000);
        let mut dense = DenseNodes::new();
        let mut info = DenseInfo::new();
        for (id, version, ts, cs, uid, sid) in
            [(1, 1, 10, 100, 7, 1), (1, 2, 5, 1, -7, 1), (1, 3, -15, 4, 9, 0)]
        {
            dense.mut_id().push(id);
            dense.mut_lat().push(0);
            dense.mut_lon().push(0);
            info.mut_version().push(version);
            info.mut_timestamp().push(ts);
            info.mut_changeset().push(cs);
            info.mut_uid().push(uid);
            info.mut_user_sid().push(sid);
        }
        dense.set_denseinfo(info);
        single_group(&mut block).set_dense(dense);

        let reader = PrimitiveReader::new(block).unwrap();
        let (nodes, _, _) = reader.get_all_elements().unwrap();

        assert_eq!(nodes[0].info.version, Some(1));
        assert_eq!(nodes[0].info.timestamp, Some(10_000));
        assert_eq!(nodes[0].info.changeset, Some(100));
        assert_eq!(nodes[0].info.uid, Some(7));
        assert_eq!(nodes[0].info.user.as_deref(), Some("alice"));

        // Timestamps accumulate, uids cancel back to zero (absent), and the
        // user name follows the delta-coded string id.
        assert_eq!(nodes[1].info.timestamp, Some(15_000));
        assert_eq!(nodes[1].info.uid, None);
        assert_eq!(nodes[1].info.user.as_deref(), Some("bob"));

        assert_eq!(nodes[2].info.timestamp, None);
        assert_eq!(nodes[2].info.changeset, Some(105));
        assert_eq!(nodes[2].info.uid, Some(9));
        assert_eq!(nodes[2].info.user.as_deref(), Some("bob"));
    }

    #[test]
    fn plain_info_keeps_genuine_zero_values() {
        let mut block = block_with_strings(&["", "carol"]);
        let mut node = osmformat::Node::new();
        node.set_id(42);
        node.set_lat(0);
        node.set_lon(0);
        let mut info = Info::new();
        info.set_version(0);
        info.set_timestamp(0);
        info.set_uid(3);
        info.set_user_sid(1);
        node.set_info(info);
        single_group(&mut block).mut_nodes().push(node);

        let reader = PrimitiveReader::new(block).unwrap();
        let (nodes, _, _) = reader.get_all_elements().unwrap();
        let decoded = &nodes[0].info;
        assert_eq!(decoded.version, Some(0));
        assert_eq!(decoded.timestamp, Some(0));
        assert_eq!(decoded.changeset, None);
        assert_eq!(decoded.uid, Some(3));
        assert_eq!(decoded.user.as_deref(), Some("carol"));
    }

    #[test]
    fn way_refs_are_delta_decoded() {
        let mut block = block_with_strings(&["", "highway", "primary"]);
        let mut way = osmformat::Way::new();
        way.set_id(9);
        way.mut_keys().push(1);
        way.mut_vals().push(2);
        for delta in [100i64, 1, 1, -3] {
            way.mut_refs().push(delta);
        }
        single_group(&mut block).mut_ways().push(way);

        let reader = PrimitiveReader::new(block).unwrap();
        let (_, ways, _) = reader.get_all_elements().unwrap();
        assert_eq!(ways[0].node_refs, vec![100, 101, 102, 99]);
        assert_eq!(ways[0].tags[0].key, "highway");
        assert_eq!(ways[0].tags[0].value, "primary");
    }

    #[test]
    fn relation_members_decode_types_and_roles() {
        let mut block = block_with_strings(&["", "outer", "inner"]);
        let mut relation = osmformat::Relation::new();
        relation.set_id(77);
        for (memid, role, member_type) in [
            (10i64, 1, Relation_MemberType::WAY),
            (5, 2, Relation_MemberType::NODE),
            (-3, 1, Relation_MemberType::RELATION),
        ] {
            relation.mut_memids().push(memid);
            relation.mut_roles_sid().push(role);
            relation.mut_types().push(member_type);
        }
        single_group(&mut block).mut_relations().push(relation);

        let reader = PrimitiveReader::new(block).unwrap();
        let (_, _, relations) = reader.get_all_elements().unwrap();
        let members = &relations[0].members;
        assert_eq!(members[0].id, 10);
        assert_eq!(members[0].member_type.as_str(), "way");
        assert_eq!(members[0].role, "outer");
        assert_eq!(members[1].id, 15);
        assert_eq!(members[1].member_type.as_str(), "node");
        assert_eq!(members[2].id, 12);
        assert_eq!(members[2].member_type.as_str(), "relation");
    }

    #[test]
    fn out_of_range_string_index_fails_the_block() {
        let mut block = block_with_strings(&[""]);
        let mut node = osmformat::Node::new();
        node.set_id(1);
        node.set_lat(0);
        node.set_lon(0);
        node.mut_keys().push(5);
        node.mut_vals().push(5);
        single_group(&mut block).mut_nodes().push(node);

        let reader = PrimitiveReader::new(block).unwrap();
        assert!(reader.get_all_elements().is_err());
    }

    #[test]
    fn header_summary_captures_bbox_and_features() {
        let mut header = HeaderBlock::new();
        let mut bbox = HeaderBBox::new();
        bbox.set_left(-1_000_000_000);
        bbox.set_right(1_000_000_000);
        bbox.set_top(2_000_000_000);
        bbox.set_bottom(-2_000_000_000);
        header.set_bbox(bbox);
        header.mut_required_features().push("OsmSchema-V0.6".into());
        header.mut_required_features().push("DenseNodes".into());
        header.set_writingprogram("osmium".into());

        let summary = HeaderReader::new(header).summary();
        let bound = summary.bbox.unwrap();
        assert_eq!(bound.left, -1_000_000_000);
        assert_eq!(bound.top, 2_000_000_000);
        assert_eq!(summary.required_features.len(), 2);
        assert_eq!(summary.writingprogram.as_deref(), Some("osmium"));
        assert_eq!(summary.source, None);
    }
}
