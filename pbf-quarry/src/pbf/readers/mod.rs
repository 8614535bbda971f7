pub mod raw_reader;

pub use raw_reader::PbfReader;
