//! Free-text genetics parsing.
//!
//! Breeders write lineage informally: "OG Kush x Durban Poison",
//! "Wino #4", "Triangle Kush<TAB>Hindu Kush x Lemon Thai x Chemdawg".
//! Every function here is total. Any input string, including the empty
//! string, has a defined result; nothing returns an error.

pub mod line;
pub mod name;

pub use line::{
    bulk_parse_genetics, find_separator, normalize_separators, parse_genetics_line,
    parse_genetics_text, split_parents, GeneticsLine, GENETICS_SEPARATOR, PARENT_SEPARATORS,
};
pub use name::{parse_strain_name, ParsedName};
