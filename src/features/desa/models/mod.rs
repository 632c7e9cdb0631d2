mod desa;

pub use desa::Desa;
