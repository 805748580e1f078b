pub mod tinywebdb;

pub use tinywebdb::TinyWebDb;
