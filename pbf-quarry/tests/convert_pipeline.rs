use std::fs::{self, File};
use std::io::{Cursor, Write};
use std::path::Path;

use arrow::array::{Array, Float64Array, Int64Array};
use flate2::write::ZlibEncoder;
use flate2::Compression;
use parquet::arrow::arrow_reader::ParquetRecordBatchReaderBuilder;

use pbf_quarry::models::{ElementCount, ElementType};
use pbf_quarry::parquet::writer::{prepare_output_path, WriterConfig};
use pbf_quarry::pbf::codecs::blob::BlobReader;
use pbf_quarry::pbf::proto::fileformat::{Blob, BlobHeader};
use pbf_quarry::pbf::proto::osmformat::{
    DenseNodes, HeaderBlock, Info, PrimitiveBlock, PrimitiveGroup, Relation, Relation_MemberType,
    StringTable, Way,
};
use pbf_quarry::pbf::readers::PbfReader;
use pbf_quarry::pipeline::{run_pipeline, ElementSink, PipelineOptions, StatsHandler};

fn frame(blob_type: &str, blob: &Blob) -> Vec<u8> {
    let blob_bytes = protobuf::Message::write_to_bytes(blob).unwrap();
    let mut header = BlobHeader::new();
    header.set_field_type(blob_type.to_string());
    header.set_datasize(blob_bytes.len() as i32);
    let header_bytes = protobuf::Message::write_to_bytes(&header).unwrap();

    let mut out = Vec::new();
    out.extend_from_slice(&(header_bytes.len() as u32).to_be_bytes());
    out.extend_from_slice(&header_bytes);
    out.extend_from_slice(&blob_bytes);
    out
}

fn zlib_blob(block_bytes: &[u8]) -> Blob {
    let mut encoder = ZlibEncoder::new(Vec::new(), Compression::default());
    encoder.write_all(block_bytes).unwrap();
    let mut blob = Blob::new();
    blob.set_raw_size(block_bytes.len() as i32);
    blob.set_zlib_data(encoder.finish().unwrap());
    blob
}

fn header_frame() -> Vec<u8> {
    let mut header = HeaderBlock::new();
    header.mut_required_features().push("OsmSchema-V0.6".into());
    header.mut_required_features().push("DenseNodes".into());
    header.set_writingprogram("pbf-quarry-tests".into());
    let bytes = protobuf::Message::write_to_bytes(&header).unwrap();
    frame("OSMHeader", &zlib_blob(&bytes))
}

/// One block holding three dense nodes, one way and one relation, with
/// deliberately delta-heavy encodings.
fn data_frame() -> Vec<u8> {
    let mut table = StringTable::new();
    for entry in ["", "highway", "primary", "stop", "alice"] {
        table.mut_s().push(entry.as_bytes().to_vec());
    }
    let mut block = PrimitiveBlock::new();
    block.set_stringtable(table);

    let mut dense = DenseNodes::new();
    for (id, lat, lon) in [
        (100i64, 1_234_567_890i64, -300i64),
        (1, 10, 10),
        (1, 10, 10),
    ] {
        dense.mut_id().push(id);
        dense.mut_lat().push(lat);
        dense.mut_lon().push(lon);
    }
    // First node tagged highway=primary, the other two untagged.
    for index in [1, 2, 0, 0, 0] {
        dense.mut_keys_vals().push(index);
    }

    let mut way = Way::new();
    way.set_id(7);
    way.mut_keys().push(1);
    way.mut_vals().push(2);
    for delta in [100i64, 1, 1] {
        way.mut_refs().push(delta);
    }
    let mut info = Info::new();
    info.set_version(3);
    info.set_timestamp(1_500);
    info.set_uid(42);
    info.set_user_sid(4);
    way.set_info(info);

    let mut relation = Relation::new();
    relation.set_id(9);
    relation.mut_memids().push(7);
    relation.mut_roles_sid().push(3);
    relation.mut_types().push(Relation_MemberType::WAY);

    let mut group = PrimitiveGroup::new();
    group.set_dense(dense);
    group.mut_ways().push(way);
    group.mut_relations().push(relation);
    block.mut_primitivegroup().push(group);

    let bytes = protobuf::Message::write_to_bytes(&block).unwrap();
    frame("OSMData", &zlib_blob(&bytes))
}

fn pbf_stream(data_frames: usize) -> Vec<u8> {
    let mut stream = header_frame();
    for _ in 0..data_frames {
        stream.extend_from_slice(&data_frame());
    }
    stream
}

fn count_parquet_rows(dir: &Path) -> usize {
    let mut rows = 0;
    for entry in fs::read_dir(dir).unwrap() {
        let path = entry.unwrap().path();
        if path.extension().is_some_and(|ext| ext == "parquet") {
            let reader = ParquetRecordBatchReaderBuilder::try_new(File::open(path).unwrap())
                .unwrap()
                .build()
                .unwrap();
            for batch in reader {
                rows += batch.unwrap().num_rows();
            }
        }
    }
    rows
}

#[test]
fn pipeline_converts_stream_to_element_tables() {
    let dir = tempfile::tempdir().unwrap();
    let root = dir.path().join("out");
    prepare_output_path(&root).unwrap();

    let reader = BlobReader::new(Cursor::new(pbf_stream(6)));
    let outputs = run_pipeline(
        reader,
        PipelineOptions {
            workers: 3,
            queue_capacity: 4,
        },
        |_worker| ElementSink::new(&root, WriterConfig::default()),
        |header| pbf_quarry::parquet::writer::write_header_json(&root, header.payload()),
    )
    .unwrap();

    let mut total = ElementCount::default();
    for output in outputs {
        total += output;
    }
    assert_eq!(total.nodes, 18);
    assert_eq!(total.ways, 6);
    assert_eq!(total.relations, 6);

    assert_eq!(count_parquet_rows(&root.join("nodes")), 18);
    assert_eq!(count_parquet_rows(&root.join("ways")), 6);
    assert_eq!(count_parquet_rows(&root.join("relations")), 6);

    let header_json = fs::read_to_string(root.join("header.json")).unwrap();
    assert!(header_json.contains("pbf-quarry-tests"));
}

#[test]
fn node_table_holds_decoded_coordinates() {
    let dir = tempfile::tempdir().unwrap();
    let root = dir.path().join("out");
    prepare_output_path(&root).unwrap();

    let reader = BlobReader::new(Cursor::new(pbf_stream(1)));
    run_pipeline(
        reader,
        PipelineOptions {
            workers: 1,
            queue_capacity: 1,
        },
        |_worker| ElementSink::new(&root, WriterConfig::default()),
        |_header| Ok(()),
    )
    .unwrap();

    let nodes_dir = root.join("nodes");
    let path = fs::read_dir(&nodes_dir)
        .unwrap()
        .filter_map(|e| e.ok())
        .map(|e| e.path())
        .find(|p| p.extension().is_some_and(|ext| ext == "parquet"))
        .unwrap();
    let reader = ParquetRecordBatchReaderBuilder::try_new(File::open(path).unwrap())
        .unwrap()
        .build()
        .unwrap();
    let batches: Vec<_> = reader.map(|b| b.unwrap()).collect();
    assert_eq!(batches.len(), 1);
    let batch = &batches[0];

    let id_column = batch
        .column(0)
        .as_any()
        .downcast_ref::<Int64Array>()
        .unwrap();
    let ids: Vec<i64> = (0..batch.num_rows()).map(|i| id_column.value(i)).collect();
    assert_eq!(ids, vec![100, 101, 102]);

    let versions = batch.column(1);
    assert!(versions.is_null(0), "dense nodes without info have no version");

    let latitudes = batch
        .column(3)
        .as_any()
        .downcast_ref::<Float64Array>()
        .unwrap();
    assert!((latitudes.value(0) - 123.456789).abs() < 1e-9);
    assert!((latitudes.value(1) - 123.456790).abs() < 1e-9);
}

#[test]
fn sequential_reader_matches_pipeline_counts() {
    let stream = pbf_stream(4);

    let mut reader = PbfReader::new(Cursor::new(stream.clone()));
    let mut sequential = ElementCount::default();
    let mut headers = 0u64;
    reader
        .read(|header, element| {
            if header.is_some() {
                headers += 1;
            }
            match element.map(|e| e.element_type()) {
                Some(ElementType::Node) => sequential.nodes += 1,
                Some(ElementType::Way) => sequential.ways += 1,
                Some(ElementType::Relation) => sequential.relations += 1,
                None => {}
            }
        })
        .unwrap();
    assert_eq!(headers, 1);

    let blob_reader = BlobReader::new(Cursor::new(stream));
    let outputs = run_pipeline(
        blob_reader,
        PipelineOptions {
            workers: 2,
            queue_capacity: 2,
        },
        |_worker| Ok(StatsHandler::default()),
        |_header| Ok(()),
    )
    .unwrap();
    let mut parallel = ElementCount::default();
    for output in outputs {
        parallel += output;
    }

    assert_eq!(sequential, parallel);
    assert_eq!(sequential.total(), 4 * 5);
}
