use anyhow::{anyhow, bail, Context, Result};
use chrono::NaiveDate;
use neotrack::{
    config::Settings,
    extract::{load_approaches, load_neos},
    filters::{create_filters, limit, FilterArgs},
    write::write_results,
    NearEarthObject, NeoDatabase,
};
use std::{env, path::PathBuf, process::exit, time::Instant};
use tracing::info;
use tracing_subscriber::{fmt, EnvFilter};

const USAGE: &str = "\
Usage:
  neotrack inspect (--pdes DESIGNATION | --name NAME) [--verbose]
  neotrack query [--date YYYY-MM-DD] [--start-date YYYY-MM-DD] [--end-date YYYY-MM-DD]
                 [--min-distance AU] [--max-distance AU]
                 [--min-velocity KM_S] [--max-velocity KM_S]
                 [--min-diameter KM] [--max-diameter KM]
                 [--hazardous | --not-hazardous] [--limit N] [--outfile PATH]

Data paths come from NEOTRACK_NEO_CSV / NEOTRACK_CAD_JSON (default data/neos.csv, data/cad.json).";

enum Lookup {
    Designation(String),
    Name(String),
}

enum Command {
    Inspect { lookup: Lookup, verbose: bool },
    Query {
        filters: FilterArgs,
        limit: Option<usize>,
        outfile: Option<PathBuf>,
    },
}

fn main() {
    // ─── 1) init logging ─────────────────────────────────────────────
    let env_filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    fmt::Subscriber::builder()
        .with_env_filter(env_filter)
        .with_writer(std::io::stderr)
        .init();

    let args: Vec<String> = env::args().skip(1).collect();
    let command = match parse_args(&args) {
        Ok(cmd) => cmd,
        Err(e) => {
            eprintln!("Error: {}\n\n{}", e, USAGE);
            exit(2);
        }
    };

    if let Err(e) = run(command) {
        eprintln!("Error: {:#}", e);
        exit(1);
    }
}

fn run(command: Command) -> Result<()> {
    // ─── 2) configure paths ──────────────────────────────────────────
    let settings = Settings::from_env().context("reading settings")?;

    // ─── 3) load & link ──────────────────────────────────────────────
    let start = Instant::now();
    let neos = load_neos(&settings.neo_csv_path)
        .with_context(|| format!("loading NEOs from {}", settings.neo_csv_path.display()))?;
    let approaches = load_approaches(&settings.cad_json_path).with_context(|| {
        format!(
            "loading close approaches from {}",
            settings.cad_json_path.display()
        )
    })?;
    let db = NeoDatabase::new(neos, approaches);
    info!(elapsed = ?start.elapsed(), "database ready");

    // ─── 4) dispatch ─────────────────────────────────────────────────
    match command {
        Command::Inspect { lookup, verbose } => {
            let neo = match &lookup {
                Lookup::Designation(pdes) => db.get_neo_by_designation(pdes),
                Lookup::Name(name) => db.get_neo_by_name(name),
            };
            match neo {
                Some(neo) => print_neo(&db, neo, verbose),
                None => println!("No matching NEOs exist in the database."),
            }
        }
        Command::Query {
            filters,
            limit: n,
            outfile,
        } => {
            let filters = create_filters(&filters);
            let n = n.or(settings.limit);
            let results = limit(db.query(&filters), n);
            match outfile {
                Some(path) => {
                    write_results(results, &path)
                        .with_context(|| format!("writing {}", path.display()))?;
                    info!(path = %path.display(), "results written");
                }
                None => {
                    let mut any = false;
                    for join in results {
                        any = true;
                        println!("{}", join.approach);
                    }
                    if !any {
                        println!("No matching close approaches.");
                    }
                }
            }
        }
    }
    Ok(())
}

fn print_neo(db: &NeoDatabase, neo: &NearEarthObject, verbose: bool) {
    println!("{}", neo);
    if verbose {
        for approach in db.approaches_of(neo) {
            println!("- {}", approach);
        }
    }
}

fn parse_args(args: &[String]) -> Result<Command> {
    let (sub, rest) = args
        .split_first()
        .ok_or_else(|| anyhow!("missing subcommand"))?;
    let mut it = rest.iter();

    match sub.as_str() {
        "inspect" => {
            let (mut pdes, mut name, mut verbose) = (None, None, false);
            while let Some(flag) = it.next() {
                match flag.as_str() {
                    "--pdes" => pdes = Some(value(&mut it, flag)?.to_string()),
                    "--name" => name = Some(value(&mut it, flag)?.to_string()),
                    "-v" | "--verbose" => verbose = true,
                    other => bail!("unknown option {}", other),
                }
            }
            let lookup = match (pdes, name) {
                (Some(p), None) => Lookup::Designation(p),
                (None, Some(n)) => Lookup::Name(n),
                _ => bail!("inspect needs exactly one of --pdes or --name"),
            };
            Ok(Command::Inspect { lookup, verbose })
        }
        "query" => {
            let mut filters = FilterArgs::default();
            let mut n = None;
            let mut outfile = None;
            while let Some(flag) = it.next() {
                match flag.as_str() {
                    "-d" | "--date" => filters.date = Some(date(value(&mut it, flag)?)?),
                    "-s" | "--start-date" => {
                        filters.start_date = Some(date(value(&mut it, flag)?)?)
                    }
                    "-e" | "--end-date" => filters.end_date = Some(date(value(&mut it, flag)?)?),
                    "--min-distance" => filters.distance_min = Some(number(&mut it, flag)?),
                    "--max-distance" => filters.distance_max = Some(number(&mut it, flag)?),
                    "--min-velocity" => filters.velocity_min = Some(number(&mut it, flag)?),
                    "--max-velocity" => filters.velocity_max = Some(number(&mut it, flag)?),
                    "--min-diameter" => filters.diameter_min = Some(number(&mut it, flag)?),
                    "--max-diameter" => filters.diameter_max = Some(number(&mut it, flag)?),
                    "--hazardous" => filters.hazardous = Some(true),
                    "--not-hazardous" => filters.hazardous = Some(false),
                    "-l" | "--limit" => {
                        let raw = value(&mut it, flag)?;
                        n = Some(
                            raw.parse::<usize>()
                                .with_context(|| format!("{} expects a count, got {}", flag, raw))?,
                        );
                    }
                    "-o" | "--outfile" => outfile = Some(PathBuf::from(value(&mut it, flag)?)),
                    other => bail!("unknown option {}", other),
                }
            }
            Ok(Command::Query {
                filters,
                limit: n,
                outfile,
            })
        }
        "-h" | "--help" => {
            println!("{}", USAGE);
            exit(0);
        }
        other => bail!("unknown subcommand {}", other),
    }
}

fn value<'a>(it: &mut std::slice::Iter<'a, String>, flag: &str) -> Result<&'a str> {
    it.next()
        .map(String::as_str)
        .ok_or_else(|| anyhow!("{} expects a value", flag))
}

fn number(it: &mut std::slice::Iter<'_, String>, flag: &str) -> Result<f64> {
    let raw = value(it, flag)?;
    raw.parse::<f64>()
        .with_context(|| format!("{} expects a number, got {}", flag, raw))
}

fn date(raw: &str) -> Result<NaiveDate> {
    NaiveDate::parse_from_str(raw, "%Y-%m-%d")
        .with_context(|| format!("expected YYYY-MM-DD, got {}", raw))
}
