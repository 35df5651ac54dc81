//! Tunable constants shared by the pipeline and storage crates.

/// Cap on the number of example sentence ids retained per word in the
/// `contains` table, both when the Course Assembler first populates it
/// and again when the shrink pass re-caps it after frequency classes
/// are bumped.
pub const MAX_EXAMPLES: usize = 30;

/// Size of the bounded min-heap the Difficulty Engine keeps per word
/// while scanning sentences for examples.
pub const DIFFICULTY_HEAP_SIZE: usize = 3;

/// Maximum number of open file handles the link partitioner keeps
/// resident before evicting the least-recently-used one.
pub const LINK_PARTITION_LRU_CAP: usize = 100;
