pub mod blob;
pub mod block_decorators;
pub mod field;
