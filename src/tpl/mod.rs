//! The plugin tags and the verbatim machinery they are built on.

pub mod compress;
pub mod handlebars;
pub mod scanner;
pub mod tags;
pub mod verbatim;

pub use scanner::{Piece, scan_verbatim};
pub use verbatim::VerbatimNode;
