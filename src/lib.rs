//! Library for generating custom EDID base blocks.
//! Provides reusable modules for the byte-sum checksum, detailed timing
//! packing, 128-byte block assembly and output file writing.

pub mod checksum;
pub mod edid;
pub mod output;
pub mod timing;
