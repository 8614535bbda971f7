use std::fs::File;
use std::io::{BufReader, ErrorKind, Read, Seek, SeekFrom};

use byteorder::{BigEndian, ByteOrder};
use flate2::read::ZlibDecoder;

use crate::errors::{Error, Result};
use crate::pbf::proto::fileformat::{Blob, BlobHeader};
use crate::pbf::proto::osmformat::{HeaderBlock, PrimitiveBlock};

pub const OSM_HEADER_TYPE: &str = "OSMHeader";
pub const OSM_DATA_TYPE: &str = "OSMData";

pub enum DecodedBlob {
    OsmHeader(HeaderBlock),
    OsmData(PrimitiveBlock),
}

/// One frame of the PBF stream: the parsed header, the raw header bytes it
/// was parsed from, and the still-compressed blob payload.
#[derive(Debug)]
pub struct RawBlob {
    header: BlobHeader,
    header_bytes: Vec<u8>,
    payload: Vec<u8>,
    offset: u64,
}

impl RawBlob {
    pub fn blob_type(&self) -> &str {
        self.header.get_field_type()
    }

    pub fn is_header(&self) -> bool {
        self.blob_type() == OSM_HEADER_TYPE
    }

    pub fn header_bytes(&self) -> &[u8] {
        &self.header_bytes
    }

    pub fn payload(&self) -> &[u8] {
        &self.payload
    }

    /// Byte offset of this frame in the source stream.
    pub fn offset(&self) -> u64 {
        self.offset
    }

    pub fn into_parts(self) -> (Vec<u8>, Vec<u8>) {
        (self.header_bytes, self.payload)
    }

    pub fn into_payload(self) -> Vec<u8> {
        self.payload
    }

    pub fn decode(&self) -> Result<DecodedBlob> {
        match self.blob_type() {
            OSM_HEADER_TYPE => Ok(DecodedBlob::OsmHeader(decode_block(&self.payload)?)),
            OSM_DATA_TYPE => Ok(DecodedBlob::OsmData(decode_block(&self.payload)?)),
            other => Err(Error::decode(format!("unsupported blob type: {}", other))),
        }
    }
}

/// Returns the decompressed contents of a blob.
///
/// Exactly one of the supported variants (raw, zlib, zstd) must be present.
/// Corruption is not transient, so there are no retries here.
pub fn decompress(blob: &Blob) -> Result<Vec<u8>> {
    let data = if blob.has_raw() {
        blob.get_raw().to_vec()
    } else if blob.has_zlib_data() {
        let mut decoder = ZlibDecoder::new(blob.get_zlib_data());
        let mut buffer = Vec::with_capacity(raw_size_hint(blob));
        decoder
            .read_to_end(&mut buffer)
            .map_err(|err| Error::codec(format!("zlib decompression failed: {}", err)))?;
        buffer
    } else if blob.has_zstd_data() {
        zstd::stream::decode_all(blob.get_zstd_data())
            .map_err(|err| Error::codec(format!("zstd decompression failed: {}", err)))?
    } else {
        return Err(Error::codec("blob carries no supported compression variant"));
    };

    if blob.has_raw_size() && blob.get_raw_size() as usize != data.len() {
        return Err(Error::codec(format!(
            "blob declares raw_size {} but decompressed to {} bytes",
            blob.get_raw_size(),
            data.len()
        )));
    }
    Ok(data)
}

fn raw_size_hint(blob: &Blob) -> usize {
    if blob.has_raw_size() {
        blob.get_raw_size().max(0) as usize
    } else {
        0
    }
}

/// Parses a frame payload into its block message: unwraps the blob envelope,
/// runs the codec dispatch, then decodes the block itself.
pub fn decode_block<M: protobuf::Message>(payload: &[u8]) -> Result<M> {
    let blob: Blob = protobuf::Message::parse_from_bytes(payload)
        .map_err(|err| Error::codec(format!("invalid blob envelope: {}", err)))?;
    let data = decompress(&blob)?;
    protobuf::Message::parse_from_bytes(&data)
        .map_err(|err| Error::decode(format!("invalid block contents: {}", err)))
}

/// Sequential reader for the length-prefixed PBF frame stream.
///
/// Holds no buffer beyond the frame in flight. `offset` always points at the
/// next unread frame, which makes a recorded offset sufficient to resume.
pub struct BlobReader<R: Read + Send> {
    reader: R,
    pub offset: u64,
    pub eof: bool,
}

impl<R: Read + Send> BlobReader<R> {
    pub fn new(reader: R) -> BlobReader<R> {
        Self {
            reader,
            offset: 0,
            eof: false,
        }
    }

    pub fn next_blob(&mut self) -> Result<Option<RawBlob>> {
        let frame_offset = self.offset;

        let mut length_prefix = [0u8; 4];
        let read = read_until_full(&mut self.reader, &mut length_prefix)
            .map_err(|err| Error::framing(frame_offset, err.to_string()))?;
        if read == 0 {
            // A stream ending exactly on a frame boundary is a clean EOF.
            self.eof = true;
            return Ok(None);
        }
        if read < length_prefix.len() {
            return Err(Error::framing(frame_offset, "truncated frame length prefix"));
        }
        self.offset += 4;
        let header_size = BigEndian::read_u32(&length_prefix) as usize;

        let header_bytes = self.read_frame_section(header_size, "blob header")?;
        let header: BlobHeader = protobuf::Message::parse_from_bytes(&header_bytes)
            .map_err(|err| Error::framing(frame_offset, format!("invalid blob header: {}", err)))?;

        let datasize = header.get_datasize();
        if datasize < 0 {
            return Err(Error::framing(
                frame_offset,
                format!("negative blob datasize {}", datasize),
            ));
        }
        let payload = self.read_frame_section(datasize as usize, "blob payload")?;

        Ok(Some(RawBlob {
            header,
            header_bytes,
            payload,
            offset: frame_offset,
        }))
    }

    fn read_frame_section(&mut self, size: usize, what: &str) -> Result<Vec<u8>> {
        let mut bytes = vec![0u8; size];
        self.reader.read_exact(&mut bytes).map_err(|err| {
            let reason = if err.kind() == ErrorKind::UnexpectedEof {
                format!("short read of {} byte {}", size, what)
            } else {
                format!("reading {}: {}", what, err)
            };
            Error::framing(self.offset, reason)
        })?;
        self.offset += size as u64;
        Ok(bytes)
    }
}

fn read_until_full<R: Read>(reader: &mut R, buffer: &mut [u8]) -> std::io::Result<usize> {
    let mut read = 0;
    while read < buffer.len() {
        match reader.read(&mut buffer[read..]) {
            Ok(0) => break,
            Ok(n) => read += n,
            Err(ref err) if err.kind() == ErrorKind::Interrupted => continue,
            Err(err) => return Err(err),
        }
    }
    Ok(read)
}

impl BlobReader<BufReader<File>> {
    pub fn from_path<P: AsRef<std::path::Path>>(path: P) -> Result<Self> {
        let file = File::open(path.as_ref()).map_err(|err| {
            Error::framing(0, format!("opening {}: {}", path.as_ref().display(), err))
        })?;
        Ok(Self::new(BufReader::with_capacity(8 * 1024 * 1024, file)))
    }
}

impl<R: Read + Seek + Send> BlobReader<R> {
    pub fn seek(&mut self, offset: u64) -> Result<()> {
        self.reader
            .seek(SeekFrom::Start(offset))
            .map_err(|err| Error::framing(offset, format!("seek failed: {}", err)))?;
        self.offset = offset;
        self.eof = false;
        Ok(())
    }
}

impl<R: Read + Send> Iterator for BlobReader<R> {
    type Item = Result<RawBlob>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.eof {
            None
        } else {
            self.next_blob().transpose()
        }
    }
}

/// Reads up to `max_frames` frames starting at `start_offset` and returns
/// them together with the offset of the first unread frame.
///
/// Offset bookkeeping stays with the caller, so this composes with whatever
/// checkpointing scheme drives the resumption.
pub fn read_range<R: Read + Seek + Send>(
    stream: R,
    start_offset: u64,
    max_frames: usize,
) -> Result<(Vec<RawBlob>, u64)> {
    let mut reader = BlobReader::new(stream);
    reader.seek(start_offset)?;

    let mut frames = Vec::new();
    while frames.len() < max_frames {
        match reader.next_blob()? {
            Some(blob) => frames.push(blob),
            None => break,
        }
    }
    Ok((frames, reader.offset))
}

#[cfg(test)]
mod tests {
    use std::io::Cursor;

    use super::*;

    fn frame(blob_type: &str, payload: &[u8]) -> Vec<u8> {
        let mut header = BlobHeader::new();
        header.set_field_type(blob_type.to_string());
        header.set_datasize(payload.len() as i32);
        let header_bytes = protobuf::Message::write_to_bytes(&header).unwrap();

        let mut out = Vec::new();
        out.extend_from_slice(&(header_bytes.len() as u32).to_be_bytes());
        out.extend_from_slice(&header_bytes);
        out.extend_from_slice(payload);
        out
    }

    #[test]
    fn frames_round_trip() {
        let mut stream = Vec::new();
        stream.extend_from_slice(&frame(OSM_HEADER_TYPE, b"first"));
        stream.extend_from_slice(&frame(OSM_DATA_TYPE, b"second payload"));

        let mut reader = BlobReader::new(Cursor::new(stream));
        let first = reader.next_blob().unwrap().unwrap();
        assert_eq!(first.blob_type(), OSM_HEADER_TYPE);
        assert_eq!(first.payload(), b"first");
        assert_eq!(first.offset(), 0);

        let second = reader.next_blob().unwrap().unwrap();
        assert_eq!(second.blob_type(), OSM_DATA_TYPE);
        assert_eq!(second.payload(), b"second payload");

        let reparsed: BlobHeader =
            protobuf::Message::parse_from_bytes(second.header_bytes()).unwrap();
        assert_eq!(reparsed.get_datasize(), 14);

        assert!(reader.next_blob().unwrap().is_none());
        assert!(reader.eof);
    }

    #[test]
    fn truncated_payload_is_a_framing_error() {
        let mut stream = frame(OSM_DATA_TYPE, b"payload");
        stream.truncate(stream.len() - 3);

        let mut reader = BlobReader::new(Cursor::new(stream));
        let err = reader.next_blob().unwrap_err();
        assert!(matches!(err, Error::Framing { .. }), "got {:?}", err);
    }

    #[test]
    fn truncated_length_prefix_is_a_framing_error() {
        let mut reader = BlobReader::new(Cursor::new(vec![0u8, 0, 1]));
        let err = reader.next_blob().unwrap_err();
        assert!(matches!(err, Error::Framing { .. }), "got {:?}", err);
    }

    #[test]
    fn read_range_resumes_at_recorded_offset() {
        let first = frame(OSM_DATA_TYPE, b"one");
        let second = frame(OSM_DATA_TYPE, b"two");
        let third = frame(OSM_DATA_TYPE, b"three");
        let mut stream = first.clone();
        stream.extend_from_slice(&second);
        stream.extend_from_slice(&third);

        let (frames, offset) = read_range(Cursor::new(stream.clone()), 0, 2).unwrap();
        assert_eq!(frames.len(), 2);
        assert_eq!(frames[1].payload(), b"two");
        assert_eq!(offset, (first.len() + second.len()) as u64);

        let (rest, end) = read_range(Cursor::new(stream.clone()), offset, 10).unwrap();
        assert_eq!(rest.len(), 1);
        assert_eq!(rest[0].payload(), b"three");
        assert_eq!(end, stream.len() as u64);
    }

    #[test]
    fn decompress_raw_passes_through() {
        let mut blob = Blob::new();
        blob.set_raw(b"plain".to_vec());
        blob.set_raw_size(5);
        assert_eq!(decompress(&blob).unwrap(), b"plain");
    }

    #[test]
    fn decompress_zlib() {
        use flate2::write::ZlibEncoder;
        use flate2::Compression;
        use std::io::Write;

        let mut encoder = ZlibEncoder::new(Vec::new(), Compression::default());
        encoder.write_all(b"compressed contents").unwrap();
        let compressed = encoder.finish().unwrap();

        let mut blob = Blob::new();
        blob.set_zlib_data(compressed);
        blob.set_raw_size(19);
        assert_eq!(decompress(&blob).unwrap(), b"compressed contents");
    }

    #[test]
    fn decompress_zstd() {
        let compressed = zstd::stream::encode_all(&b"zstd contents"[..], 0).unwrap();
        let mut blob = Blob::new();
        blob.set_zstd_data(compressed);
        assert_eq!(decompress(&blob).unwrap(), b"zstd contents");
    }

    #[test]
    fn missing_variant_is_a_codec_error() {
        let blob = Blob::new();
        let err = decompress(&blob).unwrap_err();
        assert!(matches!(err, Error::Codec(_)), "got {:?}", err);
    }

    #[test]
    fn raw_size_mismatch_is_a_codec_error() {
        let mut blob = Blob::new();
        blob.set_raw(b"four".to_vec());
        blob.set_raw_size(99);
        let err = decompress(&blob).unwrap_err();
        assert!(matches!(err, Error::Codec(_)), "got {:?}", err);
    }
}
