mod generus;

pub use generus::{Gender, Generus};
