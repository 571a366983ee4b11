use std::num::NonZeroUsize;

use anyhow::{bail, Context, Result};
use clap::{Parser, ValueEnum};
use rand::SeedableRng;
use rand_pcg::Pcg64;
use tilepath::tiles::{Board, Heuristic};
use tilepath::{DuplicateScan, SearchOptions, Searcher, Solution, DEFAULT_PARALLEL_MIN_LEN};
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(about = "Solve a sliding-tile puzzle with uniform cost search or A*")]
struct Options {
    /// Start board, e.g. "1,2,3,4,5,6,0,7,8". Generated by scrambling the goal if omitted.
    start: Option<Board>,
    /// Goal board. Defaults to the solved board of the start's width.
    #[arg(long)]
    goal: Option<Board>,
    #[arg(long, value_enum, default_value_t = Algorithm::Both)]
    algorithm: Algorithm,
    #[arg(long, value_enum, default_value_t = HeuristicArg::Manhattan)]
    heuristic: HeuristicArg,
    /// Threads scanning the frontier for duplicates; 1 scans sequentially.
    #[arg(long, default_value_t = 1)]
    workers: usize,
    /// Frontier length from which the parallel scan is used.
    #[arg(long, default_value_t = DEFAULT_PARALLEL_MIN_LEN)]
    min_parallel_len: usize,
    /// Width of the generated board when no start board is given.
    #[arg(long, default_value_t = 3)]
    width: usize,
    /// Random moves applied to the goal to generate a start board.
    #[arg(long, default_value_t = 20)]
    scramble: usize,
    #[arg(long, default_value_t = 0)]
    seed: u64,
    /// Print every board along the solution.
    #[arg(long)]
    show: bool,
}

#[derive(Clone, Copy, ValueEnum)]
enum Algorithm {
    Uc,
    Astar,
    Both,
}

#[derive(Clone, Copy, ValueEnum)]
enum HeuristicArg {
    Zero,
    MisplacedTiles,
    Manhattan,
}

impl From<HeuristicArg> for Heuristic {
    fn from(arg: HeuristicArg) -> Self {
        match arg {
            HeuristicArg::Zero => Heuristic::Zero,
            HeuristicArg::MisplacedTiles => Heuristic::MisplacedTiles,
            HeuristicArg::Manhattan => Heuristic::Manhattan,
        }
    }
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .init();

    let opt = Options::parse();

    let width = opt.start.as_ref().map_or(opt.width, Board::width);
    if !(2..=tilepath::tiles::MAX_WIDTH).contains(&width) {
        bail!("board width {width} is not supported");
    }
    let goal = opt.goal.clone().unwrap_or_else(|| Board::solved(width));
    let start = match opt.start.clone() {
        Some(start) => start,
        None => goal.scramble(opt.scramble, &mut Pcg64::seed_from_u64(opt.seed)),
    };

    if !start.is_solvable_to(&goal) {
        eprintln!("warning: {start} cannot reach {goal}; the search will exhaust its frontier");
    }

    let duplicate_scan = match NonZeroUsize::new(opt.workers) {
        Some(workers) if workers.get() > 1 => {
            DuplicateScan::with_workers(workers, opt.min_parallel_len)
                .context("failed to start the duplicate scan workers")?
        }
        _ => DuplicateScan::Sequential,
    };
    let mut searcher = Searcher::new(SearchOptions { duplicate_scan });

    println!("Start:\n{start:#}");
    println!("Goal:\n{goal:#}");

    if matches!(opt.algorithm, Algorithm::Uc | Algorithm::Both) {
        let solution = searcher.uniform_cost(start.clone(), &goal)?;
        report("Uniform cost", &solution);
        if opt.show {
            show(&start, &solution)?;
        }
    }

    if matches!(opt.algorithm, Algorithm::Astar | Algorithm::Both) {
        let heuristic = Heuristic::from(opt.heuristic);
        let solution = searcher.astar(start.clone(), &goal, |s, g| heuristic.estimate(s, g))?;
        report(&format!("A* ({})", heuristic.name()), &solution);
        if opt.show {
            show(&start, &solution)?;
        }
    }

    Ok(())
}

fn report(name: &str, solution: &Solution) {
    let stats = &solution.stats;
    println!("{name}:");
    if solution.is_solved() {
        println!("  path:                    {}", solution.path_string());
    } else {
        println!("  path:                    (no solution)");
    }
    println!("  path length:             {}", stats.path_length);
    println!("  state expansions:        {}", stats.expansions);
    println!("  successors generated:    {}", stats.generated);
    println!("  max frontier length:     {}", stats.max_frontier_len);
    println!("  mid-heap deletions:      {}", stats.mid_heap_deletions);
    println!("  local loops avoided:     {}", stats.local_loops_avoided);
    println!("  attempted re-expansions: {}", stats.attempted_reexpansions);
    println!("  running time:            {:.6}s", stats.elapsed.as_secs_f64());
}

fn show(start: &Board, solution: &Solution) -> Result<()> {
    let mut board = start.clone();
    for (i, &direction) in solution.path.iter().enumerate() {
        board = board
            .apply_path(&[direction])
            .with_context(|| format!("move {i} ({direction:?}) is illegal"))?;
        println!("{}. {}\n{board:#}", i + 1, direction.symbol());
    }
    Ok(())
}
