pub mod requests;
pub mod export;

pub use requests::{
    AddTeacherRequest, AssignRequest, RelocateRequest, SetupRequest, SlotRequest, SubstituteRequest,
    NO_LUNCH,
};
pub use export::{export_grid_to_csv, export_roster_to_csv, write_grid_csv, write_roster_csv};
