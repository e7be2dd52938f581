//! Service layer separating I/O from pipeline business logic

pub mod io;

pub use io::ImageIOService;
