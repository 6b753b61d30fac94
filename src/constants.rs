// src/constants.rs

// Two time axes are considered identical for joining when every pair of
// samples differs by at most this much.
pub const TIME_MATCH_TOLERANCE: f64 = 1e-10;

// Delimited text.
pub const DEFAULT_DELIMITER: u8 = b',';

// Whitespace text files mark header and comment lines with this character.
pub const TEXT_COMMENT_CHAR: char = '#';

// Sample files: the first column is the coordinate along the sampled set.
pub const SAMPLE_COORD_NAME: &str = "coord";
pub const VECTOR_COMPONENT_SUFFIXES: [&str; 3] = ["x", "y", "z"];
pub const VECTOR_MAGNITUDE_SUFFIX: &str = "mag";

// Timeline files with surplus names get an index column at the split point.
pub const TIMELINE_INDEX_NAME: &str = "index";

// Prefix used by join for colliding names when the other table has no title.
pub const DEFAULT_JOIN_PREFIX: &str = "other_";

// Strings in numeric columns and numbers in string columns are written like this
// when a cell holds "no value".
pub const NAN_TEXT: &str = "nan";

// Variable name that aliases the column being recalculated.
pub const THIS_VARIABLE: &str = "this";

// Subscript accessor for columns whose names are not identifiers: data['a b'].
pub const DATA_VARIABLE: &str = "data";

// Deepest nesting the expression parser accepts.
pub const MAX_EXPRESSION_DEPTH: usize = 256;

// src/constants.rs
