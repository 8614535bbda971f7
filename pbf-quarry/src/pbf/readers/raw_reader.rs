use std::fs::File;
use std::io::{BufReader, Read};
use std::path::Path;

use crate::errors::Result;
use crate::models::Element;
use crate::pbf::codecs::blob::{BlobReader, DecodedBlob};
use crate::pbf::codecs::block_decorators::{HeaderReader, PrimitiveReader};

/// Single-pass reader that decodes a PBF stream in source order.
///
/// This is the sequential counterpart of the worker-pool pipeline: one
/// thread, one block at a time, elements delivered in block order.
pub struct PbfReader<R: Read + Send> {
    blob_reader: BlobReader<R>,
}

impl<R: Read + Send> PbfReader<R> {
    pub fn new(reader: R) -> PbfReader<R> {
        Self {
            blob_reader: BlobReader::new(reader),
        }
    }

    /// Decodes every frame, invoking the callback once per header block and
    /// once per element. The first error aborts the read.
    pub fn read<F>(&mut self, mut callback: F) -> Result<()>
    where
        F: FnMut(Option<HeaderReader>, Option<Element>),
    {
        while let Some(blob) = self.blob_reader.next_blob()? {
            match blob.decode()? {
                DecodedBlob::OsmHeader(header) => {
                    callback(Some(HeaderReader::new(header)), None);
                }
                DecodedBlob::OsmData(block) => {
                    let reader = PrimitiveReader::new(block)?;
                    let (nodes, ways, relations) = reader.get_all_elements()?;
                    for node in nodes {
                        callback(None, Some(Element::Node(node)));
                    }
                    for way in ways {
                        callback(None, Some(Element::Way(way)));
                    }
                    for relation in relations {
                        callback(None, Some(Element::Relation(relation)));
                    }
                }
            }
        }
        Ok(())
    }

    /// Byte offset of the next unread frame.
    pub fn offset(&self) -> u64 {
        self.blob_reader.offset
    }
}

impl PbfReader<BufReader<File>> {
    pub fn from_path<P: AsRef<Path>>(path: P) -> Result<Self> {
        Ok(Self {
            blob_reader: BlobReader::from_path(path)?,
        })
    }
}
