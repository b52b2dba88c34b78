pub mod dates;
pub mod entry;
