//! Column family definitions for RocksDB.
//!
//! - state: whole-value blobs for each piece of client state, rewritten on
//!   every change

use rocksdb::{ColumnFamilyDescriptor, Options};

/// Column family name for persisted client state
pub const CF_STATE: &str = "state";

/// All column family names
pub const ALL_CF_NAMES: &[&str] = &[CF_STATE];

/// Create column family options for state blobs
fn state_options() -> Options {
    let mut opts = Options::default();
    opts.set_compression_type(rocksdb::DBCompressionType::Zstd);
    opts
}

/// Build all column family descriptors
pub fn build_cf_descriptors() -> Vec<ColumnFamilyDescriptor> {
    vec![ColumnFamilyDescriptor::new(CF_STATE, state_options())]
}
