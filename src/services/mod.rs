pub mod exporter;
pub mod result_writer;
pub mod scoring;
pub mod shuffler;
pub mod warn_writer;

pub use exporter::{export_fill_blank, export_simple_mc};
pub use result_writer::ResultWriter;
pub use scoring::{
    evaluate, evaluate_shuffled, AttemptRecord, ExerciseScore, Response, PASS_THRESHOLD,
};
pub use shuffler::{ShuffledChoice, Shuffler};
pub use warn_writer::WarnWriter;
