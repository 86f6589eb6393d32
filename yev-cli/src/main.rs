//! yev: CLI binary for the expected-value Yahtzee engine.
//!
//! Subcommands:
//! - play      one game per strategy on shared dice, printed as a scorecard
//! - sim       many games per strategy, summary + histogram (+ NDJSON events)
//! - decide    what to do with a given roll
//! - expected  expected value of every category from a (partial) roll
//! - stats     fresh-turn score distribution of every category

use std::env;
use std::path::PathBuf;
use std::process;
use std::time::Instant;

use yev_core::{
    Category, CategorySet, Config, DiceMultiset, EventKeyedDice, ScoreCard, StrategyKind,
};
use yev_engine::{
    build_strategy, play_game, render_histogram, simulate, Attempts, CategoryTables, Decision,
    Engine, GameRecord, SimulationResult, Strategy,
};
use yev_logging::{
    DecisionEventV1, GameEventV1, NdjsonWriter, RunManifestV1, SimSummaryEventV1,
    TurnSummaryV1, VersionInfoV1,
};

fn digits(d: &DiceMultiset) -> String {
    if d.is_empty() {
        return "-".to_string();
    }
    d.values().iter().map(|v| (b'0' + v) as char).collect()
}

/// Value following a flag, or exit with a usage error.
fn flag_value<'a>(args: &'a [String], i: usize, flag: &str) -> &'a str {
    match args.get(i + 1) {
        Some(v) => v,
        None => {
            eprintln!("Missing value for {flag}");
            process::exit(1);
        }
    }
}

fn parse_flag<T: std::str::FromStr>(args: &[String], i: usize, flag: &str) -> T {
    let raw = flag_value(args, i, flag);
    raw.parse().unwrap_or_else(|_| {
        eprintln!("Invalid {flag} value: {raw}");
        process::exit(1);
    })
}

fn parse_dice(raw: &str) -> DiceMultiset {
    raw.parse().unwrap_or_else(|e| {
        eprintln!("Invalid --dice value {raw:?}: {e}");
        process::exit(1);
    })
}

fn parse_categories(raw: &str) -> CategorySet {
    if raw.trim() == "all" {
        return CategorySet::ALL;
    }
    raw.split(',')
        .filter(|s| !s.trim().is_empty())
        .map(|s| {
            s.parse::<Category>().unwrap_or_else(|e| {
                eprintln!("{e}");
                process::exit(1);
            })
        })
        .collect()
}

fn parse_strategies(raw: &str) -> Vec<StrategyKind> {
    raw.split(',')
        .map(|s| {
            StrategyKind::parse(s).unwrap_or_else(|| {
                eprintln!("Unknown strategy: {s} (expected random, greedy, rare or expected_value)");
                process::exit(1);
            })
        })
        .collect()
}

fn load_config(path: Option<&str>) -> (Config, Option<String>) {
    let Some(path) = path else {
        return (Config::default(), None);
    };
    let bytes = std::fs::read(path).unwrap_or_else(|e| {
        eprintln!("Failed to read config file: {e}");
        process::exit(1);
    });
    let text = String::from_utf8_lossy(&bytes);
    let cfg = Config::from_yaml(&text).unwrap_or_else(|e| {
        eprintln!("Failed to load config: {e}");
        process::exit(1);
    });
    (cfg, Some(yev_logging::hash_config_bytes(&bytes)))
}

fn cmd_play(args: &[String]) {
    let mut config_path: Option<String> = None;
    let mut seed: Option<u64> = None;
    let mut strategies: Option<Vec<StrategyKind>> = None;

    let mut i = 0usize;
    while i < args.len() {
        match args[i].as_str() {
            "--help" | "-h" => {
                println!(
                    r#"yev play

USAGE:
    yev play [--seed S] [--strategies LIST] [--config PATH]

OPTIONS:
    --seed S            Dice seed; every strategy sees the same dice per (turn, roll) (default: config seed)
    --strategies LIST   Comma-separated: random,greedy,rare,expected_value (default: config)
    --config PATH       YAML config
"#
                );
                return;
            }
            "--seed" => {
                seed = Some(parse_flag(args, i, "--seed"));
                i += 2;
            }
            "--strategies" => {
                strategies = Some(parse_strategies(flag_value(args, i, "--strategies")));
                i += 2;
            }
            "--config" => {
                config_path = Some(flag_value(args, i, "--config").to_string());
                i += 2;
            }
            other => {
                eprintln!("Unknown option for `yev play`: {}", other);
                eprintln!("Run `yev play --help` for usage.");
                process::exit(1);
            }
        }
    }

    let (cfg, _) = load_config(config_path.as_deref());
    let seed = seed.unwrap_or(cfg.simulation.seed);
    let kinds = strategies.unwrap_or_else(|| cfg.simulation.strategies.clone());
    let engine = Engine::with_config(cfg.engine.clone());

    let mut columns = Vec::with_capacity(kinds.len());
    for kind in kinds {
        let strategy = build_strategy(kind, &engine);
        let mut dice = EventKeyedDice::new(seed);
        let game = play_game(strategy.as_ref(), &mut dice, strategy.name()).unwrap_or_else(|e| {
            eprintln!("Game failed for {}: {e}", strategy.name());
            process::exit(1);
        });
        columns.push(game.column);
    }

    let tables = CategoryTables::shared();
    let card = ScoreCard::new(columns);
    print!("{}", card.render(|cat, score| tables.percentile(cat, score)));
}

fn game_event(run_id: &str, game_id: u64, seed: u64, g: &GameRecord) -> GameEventV1 {
    GameEventV1 {
        event: "game",
        ts_ms: yev_logging::now_ms(),
        v: VersionInfoV1::default(),
        run_id: run_id.to_string(),
        strategy: g.strategy.clone(),
        game_id,
        seed,
        total: g.total(),
        upper_total: g.column.upper_total(),
        upper_bonus: g.got_upper_bonus(),
        rolls_used: g.rolls_used() as u64,
        turns: g
            .turns
            .iter()
            .map(|t| TurnSummaryV1 {
                turn: t.turn,
                category: t.category.name().to_string(),
                dice: t.roll.values(),
                score: t.score,
                rolls: t.rolls.len() as u8,
            })
            .collect(),
    }
}

fn decision_events(run_id: &str, game_id: u64, g: &GameRecord) -> Vec<DecisionEventV1> {
    let mut out = Vec::new();
    for t in &g.turns {
        for (step, d) in t.decisions.iter().enumerate() {
            // Decision `step` was taken on the roll before it (nothing before the first).
            let dice = if step == 0 {
                Vec::new()
            } else {
                t.rolls.get(step - 1).map(|r| r.values()).unwrap_or_default()
            };
            let (action, category, keep) = match *d {
                Decision::Commit { category, .. } => {
                    ("commit", Some(category.name().to_string()), None)
                }
                Decision::Reroll { keep, .. } => ("reroll", None, Some(keep.values())),
            };
            out.push(DecisionEventV1 {
                event: "decision",
                ts_ms: yev_logging::now_ms(),
                v: VersionInfoV1::default(),
                run_id: run_id.to_string(),
                strategy: g.strategy.clone(),
                game_id,
                turn: t.turn,
                step: step as u8,
                dice,
                action,
                category,
                keep,
                expected_value: d.expected_value(),
            });
        }
    }
    out
}

fn summary_event(
    run_id: &str,
    sim: &SimulationResult,
    engine: &Engine,
    elapsed_ms: u64,
) -> SimSummaryEventV1 {
    let s = sim.summary();
    let stats = engine.value_cache().stats();
    SimSummaryEventV1 {
        event: "sim_summary",
        ts_ms: yev_logging::now_ms(),
        v: VersionInfoV1::default(),
        run_id: run_id.to_string(),
        strategy: sim.strategy.clone(),
        games: sim.games.len() as u64,
        seed: sim.seed,
        mean: s.mean,
        median: s.median,
        std_dev: s.std_dev,
        min: s.min,
        max: s.max,
        upper_bonus_rate: sim.upper_bonus_rate(),
        ev_cache_hits: stats.hits(),
        ev_cache_misses: stats.misses(),
        elapsed_ms,
    }
}

fn cmd_sim(args: &[String]) {
    let mut config_path: Option<String> = None;
    let mut games: Option<u32> = None;
    let mut seed: Option<u64> = None;
    let mut strategies: Option<Vec<StrategyKind>> = None;
    let mut threads: Option<usize> = None;
    let mut events: Option<String> = None;
    let mut out: Option<String> = None;
    let mut log_decisions = false;
    let mut no_hist = false;

    let mut i = 0usize;
    while i < args.len() {
        match args[i].as_str() {
            "--help" | "-h" => {
                println!(
                    r#"yev sim

USAGE:
    yev sim [--games N] [--seed S] [--strategies LIST] [--threads N] [--events PATH] [--out DIR] [--config PATH]

OPTIONS:
    --games N           Games per strategy (default: 1000)
    --seed S            Base seed; game i uses seed + i (default: 0)
    --strategies LIST   Comma-separated: random,greedy,rare,expected_value (default: all)
    --threads N         Rayon worker threads (default: rayon's choice)
    --events PATH       Append NDJSON game + summary events to PATH
    --log-decisions     Also log every engine decision (with --events)
    --out DIR           Write a run manifest to DIR/run.json
    --config PATH       YAML config; flags override it
    --no-hist           Skip printing histograms
"#
                );
                return;
            }
            "--games" => {
                games = Some(parse_flag(args, i, "--games"));
                i += 2;
            }
            "--seed" => {
                seed = Some(parse_flag(args, i, "--seed"));
                i += 2;
            }
            "--strategies" | "--strategy" => {
                strategies = Some(parse_strategies(flag_value(args, i, "--strategies")));
                i += 2;
            }
            "--threads" => {
                threads = Some(parse_flag(args, i, "--threads"));
                i += 2;
            }
            "--events" => {
                events = Some(flag_value(args, i, "--events").to_string());
                i += 2;
            }
            "--out" => {
                out = Some(flag_value(args, i, "--out").to_string());
                i += 2;
            }
            "--config" => {
                config_path = Some(flag_value(args, i, "--config").to_string());
                i += 2;
            }
            "--log-decisions" => {
                log_decisions = true;
                i += 1;
            }
            "--no-hist" => {
                no_hist = true;
                i += 1;
            }
            other => {
                eprintln!("Unknown option for `yev sim`: {}", other);
                eprintln!("Run `yev sim --help` for usage.");
                process::exit(1);
            }
        }
    }

    let (mut cfg, config_hash) = load_config(config_path.as_deref());
    if let Some(g) = games {
        cfg.simulation.games = g;
    }
    if let Some(s) = seed {
        cfg.simulation.seed = s;
    }
    if let Some(s) = strategies {
        cfg.simulation.strategies = s;
    }
    if threads.is_some() {
        cfg.simulation.threads = threads;
    }
    if events.is_some() {
        cfg.logging.events_path = events;
    }
    cfg.validate().unwrap_or_else(|e| {
        eprintln!("{e}");
        process::exit(1);
    });

    let pool = {
        let mut b = rayon::ThreadPoolBuilder::new();
        if let Some(n) = cfg.simulation.threads {
            b = b.num_threads(n);
        }
        b.build().unwrap_or_else(|e| {
            eprintln!("Failed to build thread pool: {e}");
            process::exit(1);
        })
    };

    let run_id = out
        .as_deref()
        .and_then(|o| PathBuf::from(o).file_name().map(|s| s.to_string_lossy().into_owned()))
        .unwrap_or_else(|| format!("sim-{}", yev_logging::now_ms()));

    let mut manifest = RunManifestV1::new(&run_id, "sim");
    manifest.git_hash = yev_logging::try_git_hash();
    manifest.config_hash = config_hash;
    manifest.games_per_strategy = cfg.simulation.games as u64;
    manifest.seed = cfg.simulation.seed;
    manifest.events_path = cfg.logging.events_path.clone();
    let run_json = out.as_ref().map(|o| {
        std::fs::create_dir_all(o).unwrap_or_else(|e| {
            eprintln!("Failed to create output dir: {e}");
            process::exit(1);
        });
        PathBuf::from(o).join("run.json")
    });

    let mut writer = cfg.logging.events_path.as_ref().map(|p| {
        NdjsonWriter::open_append_with_flush(p, cfg.logging.flush_every).unwrap_or_else(|e| {
            eprintln!("Failed to open events file: {e}");
            process::exit(1);
        })
    });

    let engine = Engine::with_config(cfg.engine.clone());
    let strategies: Vec<Box<dyn Strategy>> = cfg
        .simulation
        .strategies
        .iter()
        .map(|&k| build_strategy(k, &engine))
        .collect();
    manifest.strategies = strategies.iter().map(|s| s.name().to_string()).collect();

    println!(
        "Simulating {} games per strategy (seed={})...",
        cfg.simulation.games, cfg.simulation.seed
    );
    for strategy in &strategies {
        let t0 = Instant::now();
        let sim = pool
            .install(|| simulate(strategy.as_ref(), cfg.simulation.games, cfg.simulation.seed))
            .unwrap_or_else(|e| {
                eprintln!("Simulation failed for {}: {e}", strategy.name());
                process::exit(1);
            });
        let elapsed_ms = t0.elapsed().as_millis() as u64;
        let s = sim.summary();

        println!();
        println!("{}:", sim.strategy);
        println!("  - Games: {}", sim.games.len());
        println!(
            "  - Score: mean={:.2}, median={}, std={:.2}, min={}, max={}",
            s.mean, s.median, s.std_dev, s.min, s.max
        );
        println!("  - Upper bonus rate: {:.1}%", sim.upper_bonus_rate() * 100.0);
        println!("  - Time: {:.2}s", elapsed_ms as f64 / 1000.0);
        if !no_hist {
            println!();
            print!("{}", render_histogram(&sim.scores()));
        }

        if let Some(w) = writer.as_mut() {
            let write = |w: &mut NdjsonWriter| -> Result<(), yev_logging::NdjsonError> {
                for (i, g) in sim.games.iter().enumerate() {
                    let game_id = i as u64;
                    if log_decisions {
                        for e in decision_events(&run_id, game_id, g) {
                            w.write_event(&e)?;
                        }
                    }
                    w.write_event(&game_event(&run_id, game_id, sim.seed + game_id, g))?;
                }
                w.write_event(&summary_event(&run_id, &sim, &engine, elapsed_ms))?;
                w.flush()
            };
            write(w).unwrap_or_else(|e| {
                eprintln!("Failed to write events: {e}");
                process::exit(1);
            });
        }

        manifest.games_completed += sim.games.len() as u64;
        if let Some(path) = &run_json {
            yev_logging::write_manifest_atomic(path, &manifest).unwrap_or_else(|e| {
                eprintln!("Failed to write run manifest: {e}");
                process::exit(1);
            });
        }
    }

    if let Some(path) = &run_json {
        manifest.finished_ts_ms = Some(yev_logging::now_ms());
        yev_logging::write_manifest_atomic(path, &manifest).unwrap_or_else(|e| {
            eprintln!("Failed to write run manifest: {e}");
            process::exit(1);
        });
    }
}

fn cmd_decide(args: &[String]) {
    let mut dice: Option<DiceMultiset> = None;
    let mut open = CategorySet::ALL;
    let mut attempts: u8 = 2;
    let mut verbose = false;

    let mut i = 0usize;
    while i < args.len() {
        match args[i].as_str() {
            "--help" | "-h" => {
                println!(
                    r#"yev decide

USAGE:
    yev decide --dice 12346 [--open LIST] [--attempts N] [--verbose]

OPTIONS:
    --dice D            Dice on the table as digits, "-" for none (required)
    --open LIST         Comma-separated open categories, names or indices (default: all)
    --attempts N        Physical rolls still allowed this turn, 0..=3 (default: 2)
    --verbose           Also print the best keep options
"#
                );
                return;
            }
            "--dice" => {
                dice = Some(parse_dice(flag_value(args, i, "--dice")));
                i += 2;
            }
            "--open" => {
                open = parse_categories(flag_value(args, i, "--open"));
                i += 2;
            }
            "--attempts" => {
                attempts = parse_flag(args, i, "--attempts");
                i += 2;
            }
            "--verbose" | "-v" => {
                verbose = true;
                i += 1;
            }
            other => {
                eprintln!("Unknown option for `yev decide`: {}", other);
                eprintln!("Run `yev decide --help` for usage.");
                process::exit(1);
            }
        }
    }

    let dice = dice.unwrap_or_else(|| {
        eprintln!("Missing --dice");
        process::exit(1);
    });
    let attempts = Attempts::new(attempts).unwrap_or_else(|| {
        eprintln!("--attempts must be in 0..=3");
        process::exit(1);
    });

    let engine = Engine::new();
    let decision = engine
        .decide_move(dice, open, attempts)
        .unwrap_or_else(|e| {
            eprintln!("Cannot decide: {e}");
            process::exit(1);
        });

    println!("Dice: {} ({})", digits(&dice), dice);
    match decision {
        Decision::Commit {
            category,
            expected_value,
        } => println!("Decision: commit {} (ev={:.4})", category, expected_value),
        Decision::Reroll {
            keep,
            expected_value,
        } => println!(
            "Decision: reroll keeping {} (ev={:.4})",
            digits(&keep),
            expected_value
        ),
    }

    if verbose && !attempts.is_exhausted() {
        let mut kv = engine.keep_values(dice, open).unwrap_or_else(|e| {
            eprintln!("Cannot rank keeps: {e}");
            process::exit(1);
        });
        // Stable sort keeps enumeration order among equal values.
        kv.sort_by(|a, b| b.1.total_cmp(&a.1));
        println!();
        println!("Best keeps:");
        for (k, v) in kv.iter().take(8) {
            println!("  {:>5}  {:.4}", digits(k), v);
        }
    }
}

fn cmd_expected(args: &[String]) {
    let mut dice = DiceMultiset::EMPTY;
    let mut category: Option<Category> = None;

    let mut i = 0usize;
    while i < args.len() {
        match args[i].as_str() {
            "--help" | "-h" => {
                println!(
                    r#"yev expected

USAGE:
    yev expected [--dice D] [--category C]

OPTIONS:
    --dice D        Dice already held, as digits (default: none)
    --category C    Only print this category
"#
                );
                return;
            }
            "--dice" => {
                dice = parse_dice(flag_value(args, i, "--dice"));
                i += 2;
            }
            "--category" => {
                let raw = flag_value(args, i, "--category");
                category = Some(raw.parse().unwrap_or_else(|e| {
                    eprintln!("{e}");
                    process::exit(1);
                }));
                i += 2;
            }
            other => {
                eprintln!("Unknown option for `yev expected`: {}", other);
                eprintln!("Run `yev expected --help` for usage.");
                process::exit(1);
            }
        }
    }

    let engine = Engine::new();
    let values = engine.expected_values(dice);
    println!("Expected values from {}:", digits(&dice));
    for cat in Category::ALL {
        if category.is_some_and(|c| c != cat) {
            continue;
        }
        println!("  {:<16} {:>8.4}", cat.name(), values[cat.index()]);
    }
}

fn cmd_stats(args: &[String]) {
    let mut category: Option<Category> = None;

    let mut i = 0usize;
    while i < args.len() {
        match args[i].as_str() {
            "--help" | "-h" => {
                println!(
                    r#"yev stats

USAGE:
    yev stats [--category C]

Prints each category's score distribution over one fresh roll of five dice.
With --category, prints that category's full CDF.
"#
                );
                return;
            }
            "--category" => {
                let raw = flag_value(args, i, "--category");
                category = Some(raw.parse().unwrap_or_else(|e| {
                    eprintln!("{e}");
                    process::exit(1);
                }));
                i += 2;
            }
            other => {
                eprintln!("Unknown option for `yev stats`: {}", other);
                eprintln!("Run `yev stats --help` for usage.");
                process::exit(1);
            }
        }
    }

    let tables = CategoryTables::shared();
    if let Some(cat) = category {
        let d = tables.get(cat);
        println!("{} (N={}):", cat, d.total_weight());
        for &(score, weight) in d.entries() {
            println!(
                "  {:>3}  {:>5}  {:.4}",
                score,
                weight,
                d.percentile(score)
            );
        }
        return;
    }

    println!(
        "{:<16} {:>8} {:>6} {:>4} {:>4}",
        "category", "mean", "median", "min", "max"
    );
    for cat in Category::ALL {
        let d = tables.get(cat);
        println!(
            "{:<16} {:>8.4} {:>6} {:>4} {:>4}",
            cat.name(),
            d.mean(),
            d.median().unwrap_or(0),
            d.min().unwrap_or(0),
            d.max().unwrap_or(0)
        );
    }
}

fn print_help() {
    eprintln!(
        r#"yev - expected-value Yahtzee engine

USAGE:
    yev <COMMAND> [OPTIONS]

COMMANDS:
    play        Play one game per strategy on shared dice and print the scorecard
    sim         Simulate many games per strategy
    decide      Decide what to do with a roll
    expected    Expected value of every category from a roll
    stats       Fresh-turn score distributions

OPTIONS:
    -h, --help          Print this help message
    -V, --version       Print version

Run `yev <COMMAND> --help` for command options.
"#
    );
}

fn print_version() {
    println!("yev {}", env!("CARGO_PKG_VERSION"));
}

fn main() {
    let args: Vec<String> = env::args().collect();

    if args.len() < 2 {
        print_help();
        process::exit(0);
    }

    match args[1].as_str() {
        "-h" | "--help" | "help" => {
            print_help();
        }
        "-V" | "--version" => {
            print_version();
        }
        "play" => {
            cmd_play(&args[2..]);
        }
        "sim" => {
            cmd_sim(&args[2..]);
        }
        "decide" => {
            cmd_decide(&args[2..]);
        }
        "expected" => {
            cmd_expected(&args[2..]);
        }
        "stats" => {
            cmd_stats(&args[2..]);
        }
        other => {
            eprintln!("Unknown command: {}", other);
            print_help();
            process::exit(1);
        }
    }
}
