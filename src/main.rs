use anyhow::{Context, Result};
use clap::Parser;
use kittener_lib::palette;
use kittener_lib::{init_logging, GenerationReport, NeatConfig, Population, TaskKind};
use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};

#[derive(Parser, Debug)]
#[command(author, version, about = "Evolve NEAT networks on a built-in task", long_about = None)]
struct Args {
    /// Config file path
    #[arg(short, long, default_value = "config.toml")]
    config: PathBuf,

    /// Task that scores the genomes
    #[arg(short, long, value_enum, default_value = "xor")]
    task: TaskArg,

    /// Number of generations to run
    #[arg(short, long, default_value_t = 100)]
    generations: u64,

    /// Population size, overriding the config file
    #[arg(short, long)]
    population: Option<usize>,

    /// RNG seed, overriding the config file
    #[arg(short, long)]
    seed: Option<u64>,

    /// Append one JSON line per generation to this file
    #[arg(short, long)]
    report: Option<PathBuf>,

    /// Print every species each generation
    #[arg(short, long)]
    verbose: bool,
}

#[derive(clap::ValueEnum, Clone, Copy, Debug)]
enum TaskArg {
    Xor,
    Dodge,
}

impl From<TaskArg> for TaskKind {
    fn from(arg: TaskArg) -> Self {
        match arg {
            TaskArg::Xor => TaskKind::Xor,
            TaskArg::Dodge => TaskKind::Dodge,
        }
    }
}

fn load_config(path: &Path) -> Result<NeatConfig> {
    if !path.exists() {
        tracing::warn!(path = %path.display(), "Config file not found, using defaults");
        return Ok(NeatConfig::default());
    }
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read {}", path.display()))?;
    NeatConfig::from_toml(&content).with_context(|| format!("Invalid config {}", path.display()))
}

fn print_species(report: &GenerationReport) {
    for s in &report.species {
        println!(
            "  Species {:3} {} -> Orgs: {:3}  Fit: {:12.4}  Stale: {:2}",
            s.id,
            palette::to_hex(palette::species_color(s.id)),
            s.members,
            s.avg_fitness,
            s.staleness
        );
    }
}

fn main() -> Result<()> {
    init_logging();
    let args = Args::parse();

    let seed = args.seed.unwrap_or(0);
    let mut task = TaskKind::from(args.task).build(seed);

    let mut config = load_config(&args.config)?;
    config.population.inputs = task.inputs();
    config.population.outputs = task.outputs();
    if let Some(size) = args.population {
        config.population.size = size;
    }
    if args.seed.is_some() {
        config.population.seed = args.seed;
    }

    let mut population = Population::new(config)?;
    let mut report_file = match &args.report {
        Some(path) => Some(BufWriter::new(
            File::create(path).with_context(|| format!("Failed to create {}", path.display()))?,
        )),
        None => None,
    };

    println!(
        "Running task '{}' for {} generations with {} genomes",
        task.name(),
        args.generations,
        population.len()
    );

    for _ in 0..args.generations {
        task.evaluate(&mut population)?;
        let report = population.advance_generation();

        println!(
            "Generation {:4}  species {:3}  best {:10.4}  threshold {:.3}{}",
            report.generation,
            report.species_count(),
            report.best_fitness,
            report.compatibility_threshold,
            if report.collapsed { "  (collapse)" } else { "" }
        );
        if args.verbose {
            print_species(&report);
        }
        if let Some(out) = report_file.as_mut() {
            serde_json::to_writer(&mut *out, &report)?;
            writeln!(out)?;
        }

        if task
            .target_fitness()
            .is_some_and(|target| report.best_fitness >= target)
        {
            println!("Target fitness reached at generation {}", report.generation);
            break;
        }
    }

    if let Some(mut out) = report_file {
        out.flush()?;
    }
    tracing::info!(
        generations = population.current_generation(),
        innovations = population.registry().len(),
        hidden_nodes = population.registry().split_count(),
        "Run finished"
    );
    Ok(())
}
