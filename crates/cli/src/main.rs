//! Degreeplan CLI - build requirement graphs and semester plans.

use std::collections::HashSet;
use std::path::PathBuf;

use anyhow::Result;
use clap::{Parser, Subcommand};
use tracing::{info, Level};

use degreeplan_core::{Catalog, CourseId};
use degreeplan_graph::{is_satisfied, to_dot, DependencyGraph, GraphBuilder, NodePayload};
use degreeplan_planner::{Plan, PlanStatus, Planner, PlannerConfig};
use degreeplan_storage::{load_catalog, load_corpus};

#[derive(Parser)]
#[command(name = "degreeplan")]
#[command(about = "Degree requirement graphs and semester plans", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Build a plan that satisfies every requirement section
    Plan {
        /// Catalog JSON file
        #[arg(long)]
        catalog: PathBuf,
        /// Prerequisite corpus JSON file
        #[arg(long)]
        corpus: PathBuf,
        /// School key inside the corpus file
        #[arg(long, default_value = "neu")]
        school: String,
        /// Per-semester credit cap
        #[arg(long, default_value = "18")]
        credit_cap: u32,
        /// Courses already completed, e.g. "CS 2500"
        #[arg(long)]
        taken: Vec<CourseId>,
        /// Emit the plan as JSON
        #[arg(long)]
        json: bool,
    },
    /// Build the dependency graph and summarize or export it
    Graph {
        /// Catalog JSON file
        #[arg(long)]
        catalog: PathBuf,
        /// Prerequisite corpus JSON file
        #[arg(long)]
        corpus: PathBuf,
        /// School key inside the corpus file
        #[arg(long, default_value = "neu")]
        school: String,
        /// Emit DOT text instead of a summary
        #[arg(long)]
        dot: bool,
    },
    /// Report which sections a set of taken courses satisfies
    Audit {
        /// Catalog JSON file
        #[arg(long)]
        catalog: PathBuf,
        /// Prerequisite corpus JSON file
        #[arg(long)]
        corpus: PathBuf,
        /// School key inside the corpus file
        #[arg(long, default_value = "neu")]
        school: String,
        /// Courses already completed, e.g. "CS 2500"
        #[arg(long)]
        taken: Vec<CourseId>,
    },
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_max_level(Level::INFO)
        .init();

    let cli = Cli::parse();

    match cli.command {
        Commands::Plan {
            catalog,
            corpus,
            school,
            credit_cap,
            taken,
            json,
        } => {
            let (catalog, graph) = build_graph(&catalog, &corpus, &school)?;
            let starting: HashSet<CourseId> = taken.into_iter().collect();
            let config = PlannerConfig::new().with_credit_cap(credit_cap);
            let plan = Planner::new(&graph)
                .with_config(config)
                .plan(&starting, catalog.total_credits_required)?;
            if json {
                println!("{}", serde_json::to_string_pretty(&plan)?);
            } else {
                print_plan(&plan);
            }
        }
        Commands::Graph {
            catalog,
            corpus,
            school,
            dot,
        } => {
            let (_, graph) = build_graph(&catalog, &corpus, &school)?;
            if dot {
                print!("{}", to_dot(&graph));
            } else {
                let courses = graph.courses().count();
                let edges = graph.edges().count();
                println!(
                    "{} nodes ({} courses), {} edges, {} sections",
                    graph.len(),
                    courses,
                    edges,
                    graph.roots().len()
                );
                if !graph.missing_courses().is_empty() {
                    println!("missing from corpus:");
                    for id in graph.missing_courses() {
                        println!("  {id}");
                    }
                }
            }
        }
        Commands::Audit {
            catalog,
            corpus,
            school,
            taken,
        } => {
            let (_, graph) = build_graph(&catalog, &corpus, &school)?;
            let taken: HashSet<CourseId> = taken.into_iter().collect();
            let mut unsatisfied = 0;
            for root in graph.roots() {
                let ok = is_satisfied(&graph, root, &taken)?;
                let title = match graph.node(root).map(|n| &n.payload) {
                    Some(NodePayload::Section { title }) => title.as_str(),
                    _ => "?",
                };
                println!("{} {}", if ok { "[ok]  " } else { "[todo]" }, title);
                if !ok {
                    unsatisfied += 1;
                }
            }
            println!("{unsatisfied} of {} sections unsatisfied", graph.roots().len());
        }
    }

    Ok(())
}

/// Load both inputs and build the dependency graph.
fn build_graph(
    catalog_path: &PathBuf,
    corpus_path: &PathBuf,
    school: &str,
) -> Result<(Catalog, DependencyGraph)> {
    let catalog = load_catalog(catalog_path)?;
    let corpus = load_corpus(corpus_path, school)?;
    info!(
        sections = catalog.sections.len(),
        corpus_courses = corpus.len(),
        "inputs loaded"
    );
    let graph = GraphBuilder::new(&corpus).build(&catalog.sections)?;
    info!(nodes = graph.len(), "dependency graph built");
    Ok((catalog, graph))
}

fn print_plan(plan: &Plan) {
    for (i, semester) in plan.semesters.iter().enumerate() {
        let courses: Vec<String> = semester.courses.iter().map(ToString::to_string).collect();
        println!(
            "Semester {}: {} ({} credits)",
            i + 1,
            if courses.is_empty() {
                "-".to_string()
            } else {
                courses.join(", ")
            },
            semester.total_credits
        );
    }
    match plan.status {
        PlanStatus::Complete => println!(
            "Plan complete: {} credits over {} semesters (degree total {})",
            plan.earned_credits(),
            plan.semesters.len(),
            plan.required_credits
        ),
        PlanStatus::Incomplete {
            unsatisfied_sections,
        } => println!(
            "Plan incomplete: {unsatisfied_sections} sections unsatisfied, no further progress possible"
        ),
        PlanStatus::RoundLimitExceeded {
            unsatisfied_sections,
        } => println!(
            "Plan incomplete: round limit exceeded with {unsatisfied_sections} sections unsatisfied"
        ),
    }
}
