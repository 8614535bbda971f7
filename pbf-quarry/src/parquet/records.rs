use std::sync::Arc;

use arrow::array::{
    ArrayRef, Float64Builder, Int32Builder, Int64Builder, ListBuilder, MapBuilder, RecordBatch,
    StringBuilder, StructBuilder,
};
use arrow::datatypes::{DataType, Field};

use crate::errors::{Error, Result};
use crate::models::{EntityInfo, Node, Relation, RelationMember, Tag, Way};
use crate::parquet::schemas::{get_node_schema, get_relation_schema, get_way_schema};

struct InfoBuilder {
    version: Int32Builder,
    timestamp: Int64Builder,
    changeset: Int64Builder,
    uid: Int64Builder,
    user_sid: StringBuilder,
}

impl InfoBuilder {
    fn with_capacity(capacity: usize) -> Self {
        Self {
            version: Int32Builder::with_capacity(capacity),
            timestamp: Int64Builder::with_capacity(capacity),
            changeset: Int64Builder::with_capacity(capacity),
            uid: Int64Builder::with_capacity(capacity),
            user_sid: StringBuilder::new(),
        }
    }

    fn append(&mut self, info: &EntityInfo) {
        self.version.append_option(info.version);
        self.timestamp.append_option(info.timestamp);
        self.changeset.append_option(info.changeset);
        self.uid.append_option(info.uid);
        self.user_sid.append_option(info.user.as_deref());
    }
}

struct TagsBuilder {
    builder: MapBuilder<StringBuilder, StringBuilder>,
}

impl TagsBuilder {
    fn new() -> Self {
        Self {
            builder: MapBuilder::new(None, StringBuilder::new(), StringBuilder::new()),
        }
    }

    // An element without tags gets a null map, not an empty one.
    fn append(&mut self, tags: &[Tag]) -> Result<()> {
        if tags.is_empty() {
            self.builder
                .append(false)
                .map_err(|err| Error::write(format!("building tags column: {}", err)))?;
            return Ok(());
        }
        for tag in tags {
            self.builder.keys().append_value(&tag.key);
            self.builder.values().append_value(&tag.value);
        }
        self.builder
            .append(true)
            .map_err(|err| Error::write(format!("building tags column: {}", err)))
    }

    fn finish(&mut self) -> ArrayRef {
        Arc::new(self.builder.finish()) as ArrayRef
    }
}

struct RelationMembersBuilder {
    builder: ListBuilder<StructBuilder>,
}

impl RelationMembersBuilder {
    fn with_capacity(capacity: usize) -> Self {
        let fields = vec![
            Field::new("role", DataType::Utf8, false),
            Field::new("id", DataType::Int64, false),
            Field::new("type", DataType::Utf8, false),
        ];
        let member = StructBuilder::from_fields(fields, capacity);
        Self {
            builder: ListBuilder::with_capacity(member, capacity),
        }
    }

    fn append(&mut self, members: &[RelationMember]) -> Result<()> {
        let struct_builder = self.builder.values();
        for member in members {
            let role_builder = struct_builder
                .field_builder::<StringBuilder>(0)
                .ok_or_else(|| Error::write("member role builder missing"))?;
            role_builder.append_value(&member.role);

            let id_builder = struct_builder
                .field_builder::<Int64Builder>(1)
                .ok_or_else(|| Error::write("member id builder missing"))?;
            id_builder.append_value(member.id);

            let type_builder = struct_builder
                .field_builder::<StringBuilder>(2)
                .ok_or_else(|| Error::write("member type builder missing"))?;
            type_builder.append_value(member.member_type.as_str());

            struct_builder.append(true);
        }
        self.builder.append(true);
        Ok(())
    }

    fn finish(&mut self) -> ArrayRef {
        Arc::new(self.builder.finish()) as ArrayRef
    }
}

fn finish_batch(schema: Arc<arrow::datatypes::Schema>, columns: Vec<ArrayRef>) -> Result<RecordBatch> {
    RecordBatch::try_new(schema, columns)
        .map_err(|err| Error::write(format!("assembling record batch: {}", err)))
}

pub fn create_batch_for_nodes(nodes: &[Node]) -> Result<Option<RecordBatch>> {
    if nodes.is_empty() {
        return Ok(None);
    }

    let mut id = Int64Builder::with_capacity(nodes.len());
    let mut tags = TagsBuilder::new();
    let mut latitude = Float64Builder::with_capacity(nodes.len());
    let mut longitude = Float64Builder::with_capacity(nodes.len());
    let mut info = InfoBuilder::with_capacity(nodes.len());

    for node in nodes {
        id.append_value(node.id);
        tags.append(&node.tags)?;
        latitude.append_value(node.latitude);
        longitude.append_value(node.longitude);
        info.append(&node.info);
    }

    let columns = vec![
        Arc::new(id.finish()) as ArrayRef,
        Arc::new(info.version.finish()) as ArrayRef,
        tags.finish(),
        Arc::new(latitude.finish()) as ArrayRef,
        Arc::new(longitude.finish()) as ArrayRef,
        Arc::new(info.timestamp.finish()) as ArrayRef,
        Arc::new(info.changeset.finish()) as ArrayRef,
        Arc::new(info.uid.finish()) as ArrayRef,
        Arc::new(info.user_sid.finish()) as ArrayRef,
    ];
    finish_batch(get_node_schema(), columns).map(Some)
}

pub fn create_batch_for_ways(ways: &[Way]) -> Result<Option<RecordBatch>> {
    if ways.is_empty() {
        return Ok(None);
    }

    let mut id = Int64Builder::with_capacity(ways.len());
    let mut tags = TagsBuilder::new();
    let mut nodes = ListBuilder::with_capacity(Int64Builder::new(), ways.len());
    let mut info = InfoBuilder::with_capacity(ways.len());

    for way in ways {
        id.append_value(way.id);
        tags.append(&way.tags)?;
        for node_ref in &way.node_refs {
            nodes.values().append_value(*node_ref);
        }
        nodes.append(true);
        info.append(&way.info);
    }

    let columns = vec![
        Arc::new(id.finish()) as ArrayRef,
        Arc::new(info.version.finish()) as ArrayRef,
        tags.finish(),
        Arc::new(nodes.finish()) as ArrayRef,
        Arc::new(info.timestamp.finish()) as ArrayRef,
        Arc::new(info.changeset.finish()) as ArrayRef,
        Arc::new(info.uid.finish()) as ArrayRef,
        Arc::new(info.user_sid.finish()) as ArrayRef,
    ];
    finish_batch(get_way_schema(), columns).map(Some)
}

pub fn create_batch_for_relations(relations: &[Relation]) -> Result<Option<RecordBatch>> {
    if relations.is_empty() {
        return Ok(None);
    }

    let mut id = Int64Builder::with_capacity(relations.len());
    let mut tags = TagsBuilder::new();
    let mut members = RelationMembersBuilder::with_capacity(relations.len());
    let mut info = InfoBuilder::with_capacity(relations.len());

    for relation in relations {
        id.append_value(relation.id);
        tags.append(&relation.tags)?;
        members.append(&relation.members)?;
        info.append(&relation.info);
    }

    let columns = vec![
        Arc::new(id.finish()) as ArrayRef,
        Arc::new(info.version.finish()) as ArrayRef,
        tags.finish(),
        members.finish(),
        Arc::new(info.timestamp.finish()) as ArrayRef,
        Arc::new(info.changeset.finish()) as ArrayRef,
        Arc::new(info.uid.finish()) as ArrayRef,
        Arc::new(info.user_sid.finish()) as ArrayRef,
    ];
    finish_batch(get_relation_schema(), columns).map(Some)
}

#[cfg(test)]
mod tests {
    use arrow::array::{Array, MapArray};

    use super::*;
    use crate::models::{ElementType, EntityInfo};

    #[test]
    fn empty_input_builds_no_batch() {
        assert!(create_batch_for_nodes(&[]).unwrap().is_none());
        assert!(create_batch_for_ways(&[]).unwrap().is_none());
        assert!(create_batch_for_relations(&[]).unwrap().is_none());
    }

    #[test]
    fn node_batch_maps_absent_fields_to_null() {
        let tagged = Node {
            id: 1,
            info: EntityInfo {
                version: Some(2),
                timestamp: Some(1_000),
                changeset: Some(3),
                uid: Some(4),
                user: Some("dave".into()),
            },
            tags: vec![Tag {
                key: "amenity".into(),
                value: "cafe".into(),
            }],
            latitude: 1.5,
            longitude: -2.5,
        };
        let bare = Node {
            id: 2,
            ..Default::default()
        };

        let batch = create_batch_for_nodes(&[tagged, bare]).unwrap().unwrap();
        assert_eq!(batch.num_rows(), 2);
        assert_eq!(batch.schema(), get_node_schema());

        let versions = batch.column(1);
        assert!(!versions.is_null(0));
        assert!(versions.is_null(1));

        let tags = batch
            .column(2)
            .as_any()
            .downcast_ref::<MapArray>()
            .unwrap();
        assert!(!tags.is_null(0));
        assert!(tags.is_null(1));
    }

    #[test]
    fn relation_batch_carries_member_structs() {
        let relation = Relation {
            id: 5,
            info: EntityInfo::default(),
            tags: Vec::new(),
            members: vec![RelationMember {
                id: 11,
                role: "outer".into(),
                member_type: ElementType::Way,
            }],
        };
        let batch = create_batch_for_relations(&[relation]).unwrap().unwrap();
        assert_eq!(batch.num_rows(), 1);
        assert_eq!(batch.schema(), get_relation_schema());
    }

    #[test]
    fn way_batch_keeps_ref_order() {
        let way = Way {
            id: 3,
            info: EntityInfo::default(),
            tags: Vec::new(),
            node_refs: vec![7, 8, 9],
        };
        let batch = create_batch_for_ways(&[way]).unwrap().unwrap();
        assert_eq!(batch.num_rows(), 1);
        assert_eq!(batch.schema(), get_way_schema());
    }
}
