pub mod partition;

use std::path::PathBuf;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::thread;
use std::time::Duration;

use crossbeam_channel::{bounded, Receiver, RecvTimeoutError, SendTimeoutError, Sender};

use crate::errors::{Error, Result};
use crate::models::ElementCount;
use crate::parquet::writer::{ElementWriter, WriterConfig};
use crate::pbf::codecs::blob::{decode_block, RawBlob, OSM_DATA_TYPE, OSM_HEADER_TYPE};
use crate::pbf::codecs::block_decorators::PrimitiveReader;
use crate::pbf::proto::osmformat::PrimitiveBlock;

/// How long a worker waits on the queue before re-checking the shutdown
/// condition.
const POP_TIMEOUT: Duration = Duration::from_millis(100);

/// How long the producer waits to enqueue before re-checking for a worker
/// abort.
const PUSH_TIMEOUT: Duration = Duration::from_millis(100);

#[derive(Debug, Clone)]
pub struct PipelineOptions {
    /// Size of the decode worker pool.
    pub workers: usize,
    /// Bound of the frame queue between the producer and the workers.
    pub queue_capacity: usize,
}

impl Default for PipelineOptions {
    fn default() -> Self {
        Self {
            workers: 8,
            queue_capacity: 100,
        }
    }
}

/// Per-worker consumer of primitive-block payloads.
///
/// Each worker owns its handler exclusively, so implementations need no
/// internal synchronization.
pub trait BlobHandler {
    type Output: Send;

    fn handle(&mut self, payload: Vec<u8>) -> Result<()>;

    /// Called once after the queue has drained; releases whatever the
    /// handler holds open and reports its result.
    fn finish(self) -> Result<Self::Output>;
}

/// Counts decoded elements without writing anything.
#[derive(Default)]
pub struct StatsHandler {
    counts: ElementCount,
}

impl BlobHandler for StatsHandler {
    type Output = ElementCount;

    fn handle(&mut self, payload: Vec<u8>) -> Result<()> {
        let block: PrimitiveBlock = decode_block(&payload)?;
        let reader = PrimitiveReader::new(block)?;
        let (nodes, ways, relations) = reader.get_all_elements()?;
        self.counts += ElementCount {
            nodes: nodes.len() as u64,
            ways: ways.len() as u64,
            relations: relations.len() as u64,
        };
        Ok(())
    }

    fn finish(self) -> Result<ElementCount> {
        Ok(self.counts)
    }
}

/// Decodes blocks into an `ElementWriter` owned by one worker.
///
/// Every sink gets its own writer and therefore its own run id, so workers
/// never coordinate on filenames.
pub struct ElementSink {
    writer: ElementWriter,
    counts: ElementCount,
}

impl ElementSink {
    pub fn new(root: impl Into<PathBuf>, config: WriterConfig) -> Result<Self> {
        Ok(Self {
            writer: ElementWriter::new(root, config)?,
            counts: ElementCount::default(),
        })
    }
}

impl BlobHandler for ElementSink {
    type Output = ElementCount;

    fn handle(&mut self, payload: Vec<u8>) -> Result<()> {
        self.counts += self.writer.write_elements(&payload)?;
        Ok(())
    }

    fn finish(mut self) -> Result<ElementCount> {
        self.writer.close()?;
        Ok(self.counts)
    }
}

/// Runs the producer/worker-pool pipeline over a stream of frames.
///
/// The producer feeds data-frame payloads into a bounded queue and routes
/// header frames to `on_header`. Workers drain the queue until the producer
/// has finished AND the queue is empty, so enqueued work is never dropped
/// at shutdown. The first error wins; writers held by handlers are closed
/// before it surfaces.
pub fn run_pipeline<S, H, F, G>(
    source: S,
    options: PipelineOptions,
    handler_factory: F,
    mut on_header: G,
) -> Result<Vec<H::Output>>
where
    S: Iterator<Item = Result<RawBlob>>,
    H: BlobHandler,
    F: Fn(usize) -> Result<H> + Send + Sync,
    G: FnMut(&RawBlob) -> Result<()>,
{
    let (sender, receiver) = bounded::<Vec<u8>>(options.queue_capacity);
    let finished = Arc::new(AtomicBool::new(false));
    let abort = Arc::new(AtomicBool::new(false));

    thread::scope(|scope| {
        let mut handles = Vec::with_capacity(options.workers);
        for worker_id in 0..options.workers {
            let receiver = receiver.clone();
            let finished = Arc::clone(&finished);
            let abort = Arc::clone(&abort);
            let factory = &handler_factory;
            handles.push(scope.spawn(move || {
                worker_loop(worker_id, receiver, &finished, &abort, factory)
            }));
        }
        drop(receiver);

        let produced = produce(source, &sender, &abort, &mut on_header);
        finished.store(true, Ordering::SeqCst);
        drop(sender);

        let mut first_error = produced.err();
        let mut outputs = Vec::with_capacity(handles.len());
        for handle in handles {
            match handle.join() {
                Ok(Ok(output)) => outputs.push(output),
                Ok(Err(err)) => {
                    log::error!("decode worker failed: {}", err);
                    first_error.get_or_insert(err);
                }
                Err(_) => {
                    first_error.get_or_insert(Error::decode("decode worker panicked"));
                }
            }
        }

        match first_error {
            Some(err) => Err(err),
            None => Ok(outputs),
        }
    })
}

fn produce<S, G>(
    source: S,
    sender: &Sender<Vec<u8>>,
    abort: &AtomicBool,
    on_header: &mut G,
) -> Result<()>
where
    S: Iterator<Item = Result<RawBlob>>,
    G: FnMut(&RawBlob) -> Result<()>,
{
    let mut frames: u64 = 0;
    for blob in source {
        let blob = blob?;
        match blob.blob_type() {
            OSM_HEADER_TYPE => {
                on_header(&blob)?;
                continue;
            }
            OSM_DATA_TYPE => {}
            other => {
                log::warn!("skipping frame with unknown blob type {:?}", other);
                continue;
            }
        }

        frames += 1;
        let mut payload = blob.into_payload();
        loop {
            if abort.load(Ordering::SeqCst) {
                // A worker already failed; its error is what the caller sees.
                return Ok(());
            }
            match sender.send_timeout(payload, PUSH_TIMEOUT) {
                Ok(()) => break,
                Err(SendTimeoutError::Timeout(returned)) => payload = returned,
                Err(SendTimeoutError::Disconnected(_)) => return Ok(()),
            }
        }
    }
    log::info!("producer finished after {} data frames", frames);
    Ok(())
}

fn worker_loop<H, F>(
    worker_id: usize,
    receiver: Receiver<Vec<u8>>,
    finished: &AtomicBool,
    abort: &AtomicBool,
    factory: &F,
) -> Result<H::Output>
where
    H: BlobHandler,
    F: Fn(usize) -> Result<H>,
{
    let mut handler = factory(worker_id)?;
    loop {
        if finished.load(Ordering::SeqCst) && receiver.is_empty() {
            break;
        }
        match receiver.recv_timeout(POP_TIMEOUT) {
            Ok(payload) => {
                if let Err(err) = handler.handle(payload) {
                    abort.store(true, Ordering::SeqCst);
                    // Dropping the handler closes any writers it owns.
                    return Err(err);
                }
            }
            Err(RecvTimeoutError::Timeout) => continue,
            Err(RecvTimeoutError::Disconnected) => break,
        }
    }
    handler.finish()
}

#[cfg(test)]
mod tests {
    use std::sync::atomic::AtomicU64;

    use super::*;
    use crate::pbf::proto::fileformat::{Blob, BlobHeader};
    use crate::pbf::proto::osmformat::{PrimitiveGroup, StringTable};

    fn data_frame_bytes(payload: &[u8]) -> Vec<u8> {
        let mut header = BlobHeader::new();
        header.set_field_type(OSM_DATA_TYPE.to_string());
        header.set_datasize(payload.len() as i32);
        let header_bytes = protobuf::Message::write_to_bytes(&header).unwrap();

        let mut out = Vec::new();
        out.extend_from_slice(&(header_bytes.len() as u32).to_be_bytes());
        out.extend_from_slice(&header_bytes);
        out.extend_from_slice(payload);
        out
    }

    fn raw_blob(payload: &[u8]) -> RawBlob {
        use crate::pbf::codecs::blob::BlobReader;
        use std::io::Cursor;

        let mut reader = BlobReader::new(Cursor::new(data_frame_bytes(payload)));
        reader.next_blob().unwrap().unwrap()
    }

    fn primitive_payload(node_count: usize) -> Vec<u8> {
        let mut table = StringTable::new();
        table.mut_s().push(Vec::new());
        let mut block = PrimitiveBlock::new();
        block.set_stringtable(table);
        let mut group = PrimitiveGroup::new();
        let mut dense = crate::pbf::proto::osmformat::DenseNodes::new();
        for i in 0..node_count {
            dense.mut_id().push(i as i64 + 1);
            dense.mut_lat().push(1);
            dense.mut_lon().push(1);
        }
        group.set_dense(dense);
        block.mut_primitivegroup().push(group);
        let block_bytes = protobuf::Message::write_to_bytes(&block).unwrap();

        let mut blob = Blob::new();
        blob.set_raw(block_bytes.clone());
        blob.set_raw_size(block_bytes.len() as i32);
        protobuf::Message::write_to_bytes(&blob).unwrap()
    }

    struct CountingHandler<'a> {
        handled: &'a AtomicU64,
    }

    impl BlobHandler for CountingHandler<'_> {
        type Output = u64;

        fn handle(&mut self, _payload: Vec<u8>) -> Result<()> {
            self.handled.fetch_add(1, Ordering::SeqCst);
            Ok(())
        }

        fn finish(self) -> Result<u64> {
            Ok(self.handled.load(Ordering::SeqCst))
        }
    }

    #[test]
    fn every_queued_frame_is_processed() {
        let total = AtomicU64::new(0);
        let frames: Vec<Result<RawBlob>> =
            (0..57).map(|_| Ok(raw_blob(b"payload"))).collect();

        run_pipeline(
            frames.into_iter(),
            PipelineOptions {
                workers: 4,
                queue_capacity: 8,
            },
            |_| Ok(CountingHandler { handled: &total }),
            |_| Ok(()),
        )
        .unwrap();

        assert_eq!(total.load(Ordering::SeqCst), 57);
    }

    #[test]
    fn stats_pipeline_counts_elements() {
        let frames: Vec<Result<RawBlob>> = (0..5)
            .map(|_| Ok(raw_blob(&primitive_payload(10))))
            .collect();

        let outputs = run_pipeline(
            frames.into_iter(),
            PipelineOptions {
                workers: 3,
                queue_capacity: 2,
            },
            |_| Ok(StatsHandler::default()),
            |_| Ok(()),
        )
        .unwrap();

        let mut total = ElementCount::default();
        for output in outputs {
            total += output;
        }
        assert_eq!(total.nodes, 50);
        assert_eq!(total.ways, 0);
    }

    #[test]
    fn corrupt_payload_fails_the_run() {
        // A blob envelope with no compression variant set.
        let empty_blob = protobuf::Message::write_to_bytes(&Blob::new()).unwrap();
        let frames: Vec<Result<RawBlob>> = vec![Ok(raw_blob(&empty_blob))];

        let err = run_pipeline(
            frames.into_iter(),
            PipelineOptions {
                workers: 2,
                queue_capacity: 2,
            },
            |_| Ok(StatsHandler::default()),
            |_| Ok(()),
        )
        .unwrap_err();
        assert!(matches!(err, Error::Codec(_)), "got {:?}", err);
    }

    #[test]
    fn worker_failure_stops_the_producer() {
        struct FailingHandler;
        impl BlobHandler for FailingHandler {
            type Output = ();

            fn handle(&mut self, _payload: Vec<u8>) -> Result<()> {
                Err(Error::decode("induced failure"))
            }

            fn finish(self) -> Result<()> {
                Ok(())
            }
        }

        // Far more frames than the queue holds; without the abort check the
        // producer would block forever once all workers have died.
        let frames: Vec<Result<RawBlob>> =
            (0..10_000).map(|_| Ok(raw_blob(b"payload"))).collect();

        let err = run_pipeline(
            frames.into_iter(),
            PipelineOptions {
                workers: 2,
                queue_capacity: 4,
            },
            |_| Ok(FailingHandler),
            |_| Ok(()),
        )
        .unwrap_err();
        assert!(matches!(err, Error::Decode(_)), "got {:?}", err);
    }

    #[test]
    fn header_frames_are_routed_not_queued() {
        let mut header = BlobHeader::new();
        header.set_field_type(OSM_HEADER_TYPE.to_string());
        header.set_datasize(3);
        let header_bytes = protobuf::Message::write_to_bytes(&header).unwrap();
        let mut stream = Vec::new();
        stream.extend_from_slice(&(header_bytes.len() as u32).to_be_bytes());
        stream.extend_from_slice(&header_bytes);
        stream.extend_from_slice(b"hdr");

        use crate::pbf::codecs::blob::BlobReader;
        use std::io::Cursor;
        let mut reader = BlobReader::new(Cursor::new(stream));
        let header_frame = reader.next_blob().unwrap().unwrap();

        let frames: Vec<Result<RawBlob>> =
            vec![Ok(header_frame), Ok(raw_blob(b"payload"))];

        let seen = AtomicU64::new(0);
        let handled = AtomicU64::new(0);
        run_pipeline(
            frames.into_iter(),
            PipelineOptions {
                workers: 1,
                queue_capacity: 2,
            },
            |_| Ok(CountingHandler { handled: &handled }),
            |blob| {
                assert!(blob.is_header());
                seen.fetch_add(1, Ordering::SeqCst);
                Ok(())
            },
        )
        .unwrap();

        assert_eq!(seen.load(Ordering::SeqCst), 1);
        assert_eq!(handled.load(Ordering::SeqCst), 1);
    }
}
