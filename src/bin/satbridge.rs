use std::fs::File;
use std::io::BufReader;

use anyhow::{bail, Result};
use clap::{Parser, Subcommand};

use satbridge::host::{Host, SearchOptions, ValueOrder};
use satbridge::model::parse::parse_model_reader;
use satbridge::model::{build, build_with, Model};
use satbridge::solver::recording::RecordingSolver;
use satbridge::solver::varisat::VarisatSolver;

#[derive(Debug, Parser)]
#[command(name = "satbridge")]
#[command(about = "Boolean models checked incrementally by a SAT engine during search")]
struct Cli {
    #[command(subcommand)]
    command: Cmd,
}

#[derive(Debug, Subcommand)]
enum Cmd {
    Check {
        path: String,
        /// Write the encoded clauses as DIMACS.
        #[arg(long)]
        emit: Option<String>,
    },
    Solve {
        path: String,
        #[arg(long)]
        limit: Option<usize>,
        #[arg(long, default_value = "min")]
        order: String,
        #[arg(long, default_value_t = 0)]
        seed: u64,
    },
}

fn main() -> Result<()> {
    env_logger::init();
    let cli = Cli::parse();
    match cli.command {
        Cmd::Check { path, emit } => check_cmd(&path, emit.as_deref())?,
        Cmd::Solve {
            path,
            limit,
            order,
            seed,
        } => solve_cmd(&path, limit, &order, seed)?,
    }
    Ok(())
}

fn load_model(path: &str) -> Result<Model> {
    let file = File::open(path)?;
    parse_model_reader(BufReader::new(file))
}

fn check_cmd(path: &str, emit: Option<&str>) -> Result<()> {
    let model = load_model(path)?;
    let mut dimacs = None;
    let built = build_with(
        &model,
        RecordingSolver::new(VarisatSolver::new()),
        |sat| dimacs = Some(sat.engine().to_dimacs()),
    )?;
    if let (Some(out), Some(text)) = (emit, dimacs) {
        std::fs::write(out, text)?;
    }
    println!(
        "vars={} literals={} clauses={} root={}",
        built.summary.vars,
        built.summary.literals,
        built.summary.clauses,
        if built.root_consistent { "ok" } else { "unsat" }
    );
    Ok(())
}

fn solve_cmd(path: &str, limit: Option<usize>, order: &str, seed: u64) -> Result<()> {
    let model = load_model(path)?;
    let order = match order {
        "min" => ValueOrder::Min,
        "max" => ValueOrder::Max,
        "random" => ValueOrder::Random { seed },
        _ => bail!("unknown order '{}', expected min|max|random", order),
    };
    let mut built = build(&model)?;
    if !built.root_consistent {
        println!("solutions=0 (root unsat)");
        return Ok(());
    }
    let vars = built.bool_vars();
    let outcome = built.search.solve(&vars, SearchOptions { limit, order });
    for solution in &outcome.solutions {
        let line = vars
            .iter()
            .zip(solution)
            .map(|(&v, value)| format!("{}={}", built.search.store().name(v), value))
            .collect::<Vec<_>>()
            .join(" ");
        println!("{}", line);
    }
    println!(
        "solutions={} nodes={} failures={}",
        outcome.stats.solutions, outcome.stats.nodes, outcome.stats.failures
    );
    Ok(())
}
