pub mod registry;
pub mod parser;

pub use registry::{split_subjects, Teacher, TeacherRegistry};
pub use parser::{load_roster, read_roster};
