//! docx-smartart CLI
//!
//! Assembles a demonstration document containing every supported diagram
//! topology, or injects a single diagram into an existing document.
//!
//! Usage:
//!   docx-smartart [OPTIONS]
//!
//! Options:
//!   -t, --templates <DIR>   Template archive directory
//!   -c, --config <FILE>     Defaults file (TOML)
//!   -o, --output <FILE>     Output document path
//!   -b, --base <FILE>       Existing document to inject into
//!       --topology <NAME>   Generate only one topology

use std::path::PathBuf;

use clap::Parser;

use docx_smartart::{
    add_cycle, add_hierarchy, add_list, add_process, add_pyramid, add_radial, Defaults,
    DocxPackage, HierarchyItem, Placement, SmartArtError, TemplateRepository, Topology,
};

#[derive(Parser)]
#[command(name = "docx-smartart")]
#[command(about = "Generate Word documents with native, editable SmartArt diagrams")]
struct Cli {
    /// Template archive directory (overrides the defaults file)
    #[arg(short, long)]
    templates: Option<PathBuf>,

    /// Defaults file (TOML)
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Output document path
    #[arg(short, long, default_value = "sample.docx")]
    output: PathBuf,

    /// Existing document to inject into instead of starting fresh
    #[arg(short, long)]
    base: Option<PathBuf>,

    /// Generate only one topology (list, process, hierarchy, cycle,
    /// pyramid, radial)
    #[arg(long, value_parser = parse_topology)]
    topology: Option<Topology>,
}

fn parse_topology(s: &str) -> Result<Topology, String> {
    s.parse::<Topology>().map_err(|e| e.to_string())
}

fn main() {
    env_logger::init();
    let cli = Cli::parse();

    let defaults = match &cli.config {
        Some(path) => match Defaults::from_file(path) {
            Ok(d) => d,
            Err(e) => {
                eprintln!("Error loading defaults '{}': {}", path.display(), e);
                std::process::exit(1);
            }
        },
        None => Defaults::default(),
    };

    let template_dir = cli
        .templates
        .clone()
        .unwrap_or_else(|| defaults.template_dir.clone());
    let mut repo = TemplateRepository::new(template_dir);

    let mut doc = match &cli.base {
        Some(path) => match DocxPackage::open(path) {
            Ok(doc) => doc,
            Err(e) => {
                eprintln!("Error opening document '{}': {}", path.display(), e);
                std::process::exit(1);
            }
        },
        None => DocxPackage::new(),
    };

    let topologies: Vec<Topology> = match cli.topology {
        Some(t) => vec![t],
        None => Topology::ALL.to_vec(),
    };

    for topology in topologies {
        if let Err(e) = add_demo_diagram(&mut doc, &mut repo, &defaults, topology) {
            eprintln!("Error adding {topology} diagram: {e}");
            std::process::exit(1);
        }
    }

    if let Err(e) = doc.save(&cli.output) {
        eprintln!("Error saving '{}': {}", cli.output.display(), e);
        std::process::exit(1);
    }
    println!("Wrote {}", cli.output.display());
}

fn add_demo_diagram(
    doc: &mut DocxPackage,
    repo: &mut TemplateRepository,
    defaults: &Defaults,
    topology: Topology,
) -> Result<(), SmartArtError> {
    let extent = defaults.extent(topology);
    let placement = match topology {
        Topology::List => {
            doc.add_heading("Key Features", 2)?;
            add_list(
                doc,
                repo,
                &["Fast Performance", "Easy to Use", "Secure by Default", "Open Source"],
                extent,
            )?
        }
        Topology::Process => {
            doc.add_heading("Development Lifecycle", 2)?;
            add_process(
                doc,
                repo,
                &["Requirements", "Design", "Implementation", "Testing", "Deployment"],
                extent,
            )?
        }
        Topology::Hierarchy => {
            doc.add_heading("Organization", 2)?;
            add_hierarchy(
                doc,
                repo,
                &[HierarchyItem::with_children(
                    "CEO",
                    vec![
                        HierarchyItem::with_children(
                            "VP Engineering",
                            vec![
                                HierarchyItem::new("Frontend Lead"),
                                HierarchyItem::new("Backend Lead"),
                            ],
                        ),
                        HierarchyItem::with_children(
                            "VP Marketing",
                            vec![HierarchyItem::new("Brand Manager")],
                        ),
                    ],
                )],
                extent,
            )?
        }
        Topology::Cycle => {
            doc.add_heading("Agile Sprint Cycle", 2)?;
            add_cycle(
                doc,
                repo,
                &["Plan", "Design", "Develop", "Test", "Review"],
                extent,
            )?
        }
        Topology::Pyramid => {
            doc.add_heading("Needs Hierarchy", 2)?;
            add_pyramid(
                doc,
                repo,
                &["Self-Actualization", "Esteem", "Belonging", "Safety", "Physiological"],
                extent,
            )?
        }
        Topology::Radial => {
            doc.add_heading("Microservices", 2)?;
            add_radial(
                doc,
                repo,
                "API Gateway",
                &["Auth Service", "User Service", "Payment Service", "Notification Service"],
                extent,
            )?
        }
    };

    report_truncation(topology, placement);
    Ok(())
}

fn report_truncation(topology: Topology, placement: Placement) {
    if placement.truncated() {
        eprintln!(
            "warning: {topology} diagram placed {} of {} labels (seed shape limit)",
            placement.placed, placement.requested
        );
    }
}
