// File I/O operations

pub mod csv;
pub mod discover;
pub mod reference;
pub mod writer;
pub mod xlsx;

pub use discover::discover_inputs;
pub use reference::read_reference;
pub use writer::write_records;
pub use xlsx::XlsxSource;
