use std::fs::File;
use std::io::BufReader;
use std::path::PathBuf;
use std::process::ExitCode;

use clap::Parser;
use log::{debug, error};

use commission::error::DynResult;
use commission::{FixtureQuery, FixtureRecord, FixtureRegistry, GroupMask, Project};
use dali_commission as commission;

#[derive(Parser, Debug)]
/// List the fixtures of a commissioning project
struct CmdArgs {
    /// Project file (JSON)
    project: PathBuf,
    /// Address filter, e.g. 12, 0-10, -20 or 30-
    #[arg(short = 'a', long, default_value = "")]
    address: String,
    /// Only fixtures in any of these groups (0-15), may be repeated
    #[arg(short = 'g', long = "group")]
    groups: Vec<u8>,
    /// Group the listing by room
    #[arg(long)]
    rooms: bool,
    /// Print the first free short address
    #[arg(long)]
    next_free: bool,
}

fn load_project(path: &PathBuf) -> DynResult<(Project, FixtureRegistry)> {
    let project = Project::from_json(BufReader::new(File::open(path)?))?;
    let registry = project.registry()?;
    Ok((project, registry))
}

fn print_fixture(f: &FixtureRecord) {
    let address = f
        .short_address()
        .map_or_else(|| "—".to_string(), |a| a.to_string());
    let commissioned = f
        .commissioned_at()
        .map_or_else(|| "—".to_string(), |t| t.format("%Y-%m-%d").to_string());
    let dt_type = f
        .dt_type()
        .map_or_else(|| "—".to_string(), |t| format!("{} {}", t, t.description()));
    println!(
        "{:>3}  {:<28} {:<20} {:<16} {:<28} {}",
        address,
        f.label(),
        f.groups(),
        f.room().unwrap_or("—"),
        dt_type,
        commissioned
    );
}

fn print_project(project: &Project) {
    println!("{} ({})", project.title, project.control_system);
    if let Some(contact) = project.contact_name() {
        println!("Contact: {}", contact);
    }
    if let Some(site) = &project.site_address {
        println!("Site: {}", site);
    }
}

fn main() -> ExitCode {
    tracing_subscriber::fmt::init();
    let args = CmdArgs::parse();

    let groups = match GroupMask::from_groups(args.groups.iter().copied()) {
        Ok(g) => g,
        Err(e) => {
            error!("Invalid group filter: {}", e);
            return ExitCode::FAILURE;
        }
    };

    let (project, registry) = match load_project(&args.project) {
        Ok(p) => p,
        Err(e) => {
            error!("Failed to load {}: {}", args.project.display(), e);
            return ExitCode::FAILURE;
        }
    };
    debug!("Project {} has {} fixtures", project.id, registry.len());

    print_project(&project);
    let query = FixtureQuery::new().address_text(&args.address).groups(groups);
    println!("{}", query.range().hint());
    if !groups.is_empty() {
        println!("Groups (match any): {}", groups);
    }
    println!();

    if args.rooms {
        for room in query.rooms(registry.fixtures()) {
            println!("{} ({})", room.name, room.fixtures.len());
            for f in room.fixtures {
                print_fixture(f);
            }
            println!();
        }
    } else {
        let fixtures = query.apply(registry.fixtures());
        if fixtures.is_empty() && !query.is_unfiltered() {
            println!("No matches. Try clearing or adjusting filters.");
        }
        for f in fixtures {
            print_fixture(f);
        }
    }

    if args.next_free {
        match registry.address_space().first_free() {
            Some(a) => println!("Next free address: {}", a),
            None => println!("All 64 short addresses are in use"),
        }
    }
    ExitCode::SUCCESS
}
