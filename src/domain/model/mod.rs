mod prescription;

pub use prescription::{Prescription, TIMESTAMP_FORMAT};
