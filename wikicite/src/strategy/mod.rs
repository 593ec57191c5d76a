//! Article text sources that live inside this crate.
//!
//! Only the local filesystem source is here; the MediaWiki API source lives
//! in `wikicite-api`.

pub mod fs;
