pub mod daf_header;
pub mod directory;
pub mod ephemeris_record;
pub mod kernel_comment;
pub mod naif_data;
pub mod naif_ids;
pub mod summary_record;
