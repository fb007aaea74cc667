use std::{error::Error, path::PathBuf, process};

use clap::Parser;
use gridmdp::{
    algo::{self, Algorithm, Solution},
    config::Config,
    ds::Grid,
    env::{GridWorld, State},
    export, render,
};
use rand::{rngs::StdRng, SeedableRng};

#[derive(Debug, Parser)]
#[command(
    name = "solve_grid",
    about = "Solve the default 6x6 grid world with one of the implemented algorithms"
)]
struct Args {
    /// Algorithm to run: value_iteration, policy_iteration, sarsa, expected_sarsa,
    /// q_learning, monte_carlo or dyna_q
    #[arg(long, value_parser = Algorithm::parse)]
    algorithm: Algorithm,

    /// Display the greedy policy as arrows
    #[arg(long)]
    display_policy: bool,

    /// Display the utilities with three decimals
    #[arg(long)]
    display_utilities: bool,

    /// Seed of the random generator used by the sample-based algorithms
    #[arg(long, default_value_t = 0)]
    seed: u64,

    /// Write the per-sweep history of the dynamic programming algorithms to this CSV file
    #[arg(long)]
    export: Option<PathBuf>,
}

fn display(title: &str, labels: &Grid<String>, env: &GridWorld) -> Result<(), Box<dyn Error>> {
    #[cfg(feature = "viz")]
    gridmdp::viz::show(title, labels, env.cells())?;

    #[cfg(not(feature = "viz"))]
    {
        let _ = env;
        println!("\n{title}\n{}", render::to_text(labels));
    }

    Ok(())
}

fn main() -> Result<(), Box<dyn Error>> {
    let args = match Args::try_parse() {
        Ok(args) => args,
        Err(e) => {
            // Usage errors and --help both exit cleanly
            e.print()?;
            process::exit(0);
        }
    };

    let config = Config::default();
    let env = GridWorld::from_config(&config.grid)?;
    let mut rng = StdRng::seed_from_u64(args.seed);

    let solution = algo::run(args.algorithm, &env, &config, &mut rng)?;

    if let Solution::Planning(dp) = &solution {
        println!("Number of iterations: {}\n", dp.iterations);
        if let Some(path) = &args.export {
            export::write_history_to_path(&dp.history, path)?;
            println!("Wrote sweep history to {}", path.display());
        }
    }

    let utilities = solution.utilities();
    println!("(Column, Row)");
    for (State { row, col }, u) in utilities.iter() {
        println!("({col}, {row}): {u}");
    }

    let title = args.algorithm.to_string();
    if args.display_policy {
        display(&title, &render::policy_glyphs(&solution.policy(&env)), &env)?;
    }
    if args.display_utilities {
        display(&title, &render::utility_labels(&utilities), &env)?;
    }

    Ok(())
}
