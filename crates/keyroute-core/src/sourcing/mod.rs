//! Candidate credential sourcing

mod sourcer;

pub use sourcer::KeySourcer;
