pub mod hash;

pub use hash::{HashParams, MapParam, NoteParam};
