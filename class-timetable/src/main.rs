use std::path::Path;

use class_timetable::config::ServerConfig;
use class_timetable::display::{print_roster, print_timetable, write_timetable_to_file};
use class_timetable::form::{export_grid_to_csv, export_roster_to_csv};
use class_timetable::roster::load_roster;
use class_timetable::timetable::slot_utils::default_time_slots;
use class_timetable::{logging, web, GridConfig, TeacherRegistry, Timetable};

/// Periods in the week printed by CLI mode
const CLI_PERIODS: u32 = 6;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    logging::init();

    // Check if we should run in web mode
    let args: Vec<String> = std::env::args().collect();
    if args.len() > 1 && args[1] == "web" {
        let config = ServerConfig::from_env(args.get(2).map(String::as_str));
        println!("Access the site at http://localhost:{}", config.port);
        web::start_server(config).await?;
        return Ok(());
    }

    // CLI mode: print an empty week for the roster on disk, or the sample roster
    let roster_path = "data/teachers.csv";
    let registry = if Path::new(roster_path).exists() {
        println!("Loading teachers from {}...", roster_path);
        load_roster(roster_path)?
    } else {
        TeacherRegistry::sample()
    };

    let config = GridConfig::school_week(default_time_slots(CLI_PERIODS), false, None);
    let timetable = Timetable::new(registry, &config)?;

    print_roster(timetable.registry());
    print_timetable("Weekly Timetable", &timetable);

    println!("\n=== Writing Timetable to Files ===");
    write_timetable_to_file("Weekly Timetable", &timetable, "timetable.txt")?;
    export_grid_to_csv(timetable.grid(), Path::new("timetable.csv"))?;
    export_roster_to_csv(timetable.registry(), Path::new("teachers.csv"))?;
    println!("Timetable saved to:");
    println!("  - timetable.txt");
    println!("  - timetable.csv");
    println!("  - teachers.csv");

    Ok(())
}
