mod kelompok;

pub use kelompok::Kelompok;
