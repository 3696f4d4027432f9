mod report;

use std::collections::BTreeMap;
use std::io::{self, IsTerminal};
use std::path::PathBuf;

use log::{LevelFilter, Log, Metadata, Record};
use phonoreflex::{
    Category, Dialect, DirSource, DisplayOptions, FinalClass, Initials, Layer, Notation, PhonologyStore, Predictor,
    ReflexOptions, ReflexRun, Reflexes,
};

const DEFAULT_DATA_DIR: &str = "data";

struct StderrLogger;

impl Log for StderrLogger {
    fn enabled(&self, metadata: &Metadata) -> bool {
        metadata.level() <= log::max_level()
    }

    fn log(&self, record: &Record) {
        if self.enabled(record.metadata()) {
            eprintln!("[{:<5} {}] {}", record.level(), record.target(), record.args());
        }
    }

    fn flush(&self) {}
}

static LOGGER: StderrLogger = StderrLogger;

fn init_logging() {
    let level = std::env::var("PHONOREFLEX_LOG")
        .ok()
        .and_then(|value| value.trim().parse::<LevelFilter>().ok())
        .unwrap_or(LevelFilter::Warn);
    if log::set_logger(&LOGGER).is_ok() {
        log::set_max_level(level);
    }
}

fn main() {
    init_logging();

    let config = match parse_args() {
        Ok(config) => config,
        Err(err) => {
            eprintln!("{err}");
            std::process::exit(2);
        }
    };

    if let Err(err) = run(&config) {
        eprintln!("error: {err}");
        std::process::exit(1);
    }
}

enum Command {
    Predict { initials: String, full_final: String, pronunciation: String },
    Reflex { index: usize },
    Show { dialect: Dialect, pronunciation: String },
    Strata,
}

struct CliConfig {
    command: Command,
    data: PathBuf,
    dialect: Dialect,
    to: Notation,
    from: Notation,
    mc: Option<usize>,
    proto: bool,
    variant: bool,
    color: bool,
}

fn run(config: &CliConfig) -> phonoreflex::Result<()> {
    match &config.command {
        Command::Predict { initials, full_final, pronunciation } => {
            let category = Category::new(Initials::parse(initials), FinalClass::parse(full_final));
            let (reflexes, runs) = predict(&category, pronunciation, config.dialect);
            report::print_prediction(&category, pronunciation, &reflexes, &runs, config.color);
        }
        Command::Reflex { index } => {
            let store = PhonologyStore::new(DirSource::new(&config.data));
            let phonology = store.load()?;
            let entry = phonology
                .catalog()
                .entry_at(*index)
                .ok_or_else(|| phonoreflex::Error::NotFound { what: "MC entry", value: index.to_string() })?;
            let recorded = phonology.reflex_map(*index, config.dialect)?;
            let predicted =
                entry.reflex(config.dialect).map(|baseline| predict(&entry.info.category(), baseline, config.dialect));
            let predicted = predicted.as_ref().map(|(reflexes, runs)| (reflexes, runs.as_slice()));
            report::print_entry(*index, entry, &recorded, predicted, config.color);
        }
        Command::Show { dialect, pronunciation } => {
            let store = PhonologyStore::new(DirSource::new(&config.data));
            let phonology = store.load()?;
            let mc = match config.mc {
                Some(index) => Some(
                    phonology
                        .catalog()
                        .entry_at(index)
                        .ok_or_else(|| phonoreflex::Error::NotFound { what: "MC entry", value: index.to_string() })?
                        .info
                        .clone(),
                ),
                None => None,
            };
            let options = DisplayOptions { proto: config.proto, variant: config.variant, ..DisplayOptions::default() };
            println!("{}", phonology.display(*dialect, pronunciation, config.to, config.from, mc.as_ref(), &options));
        }
        Command::Strata => {
            let store = PhonologyStore::new(DirSource::new(&config.data));
            let phonology = store.load()?;
            let mut export = BTreeMap::new();
            export.insert(config.dialect.code(), phonology.derive_strata(config.dialect));
            let json = serde_json::to_string_pretty(&export)
                .map_err(|source| phonoreflex::Error::Serialize { what: "strata", source })?;
            println!("{json}");
        }
    }
    Ok(())
}

/// Readings in every layer plus traces of the layer rules, run on the
/// toneless body.
fn predict(category: &Category, pronunciation: &str, dialect: Dialect) -> (Reflexes, Vec<ReflexRun>) {
    let predictor = Predictor::for_dialect(dialect);
    let reflexes = predictor.get_reflexes(category, pronunciation, ReflexOptions::default());
    let (body, _) = Predictor::split_tone(pronunciation);
    let runs = [Layer::Vernacular, Layer::Recent]
        .into_iter()
        .map(|layer| predictor.predict_with_trace(category, body, layer))
        .collect();
    (reflexes, runs)
}

fn parse_args() -> Result<CliConfig, String> {
    let mut positional: Vec<String> = Vec::new();
    let mut data: Option<PathBuf> = None;
    let mut dialect = Dialect::Fg;
    let mut to = Notation::Pinyin;
    let mut from = Notation::Pinyin;
    let mut mc = None;
    let mut proto = false;
    let mut variant = true;
    let mut color = io::stdout().is_terminal();
    let mut args = std::env::args().skip(1);

    while let Some(arg) = args.next() {
        let (flag, inline) = match arg.split_once('=') {
            Some((flag, value)) if flag.starts_with("--") => (flag.to_string(), Some(value.to_string())),
            _ => (arg.clone(), None),
        };
        let mut value = |name: &str| {
            inline.clone().or_else(|| args.next()).ok_or_else(|| format!("error: {name} expects a value"))
        };
        match flag.as_str() {
            "-h" | "--help" => {
                print_help();
                std::process::exit(0);
            }
            "-V" | "--version" => {
                println!("phonoreflex {}", env!("CARGO_PKG_VERSION"));
                std::process::exit(0);
            }
            "--color" => color = true,
            "--no-color" => color = false,
            "--proto" => proto = true,
            "--no-variant" => variant = false,
            "--data" => data = Some(PathBuf::from(value("--data")?)),
            "--dialect" => dialect = parse_dialect(&value("--dialect")?)?,
            "--to" => to = parse_notation(&value("--to")?)?,
            "--from" => from = parse_notation(&value("--from")?)?,
            "--mc" => {
                let raw = value("--mc")?;
                mc = Some(raw.parse().map_err(|_| format!("error: invalid --mc '{raw}' (expected an index)"))?);
            }
            "--" => {
                positional.extend(args.by_ref());
                break;
            }
            _ if flag.starts_with('-') && flag.len() > 1 => return Err(format!("error: unknown option '{arg}'")),
            _ => positional.push(arg),
        }
    }

    let data = data
        .or_else(|| std::env::var_os("PHONOREFLEX_DATA").map(PathBuf::from))
        .unwrap_or_else(|| PathBuf::from(DEFAULT_DATA_DIR));

    let command = match positional.iter().map(String::as_str).collect::<Vec<_>>().as_slice() {
        ["predict", initials, full_final, pronunciation] => Command::Predict {
            initials: initials.to_string(),
            full_final: full_final.to_string(),
            pronunciation: pronunciation.to_string(),
        },
        ["reflex", index] => Command::Reflex {
            index: index.parse().map_err(|_| format!("error: invalid index '{index}'"))?,
        },
        ["show", code, pronunciation] => {
            Command::Show { dialect: parse_dialect(code)?, pronunciation: pronunciation.to_string() }
        }
        ["strata"] => Command::Strata,
        [] => return Err(format!("error: no command provided\n\n{}", help_text())),
        [other, ..] => return Err(format!("error: bad arguments for '{other}'\n\n{}", help_text())),
    };

    Ok(CliConfig { command, data, dialect, to, from, mc, proto, variant, color })
}

fn parse_dialect(code: &str) -> Result<Dialect, String> {
    Dialect::from_code(code).ok_or_else(|| format!("error: unknown dialect '{code}' (expected FG, PM, GC or SW)"))
}

fn parse_notation(key: &str) -> Result<Notation, String> {
    Notation::from_key(key).ok_or_else(|| format!("error: unknown notation '{key}' (expected pinyin, ipaRaw or ipaStrict)"))
}

fn print_help() {
    println!("{}", help_text());
}

fn help_text() -> String {
    format!(
        "phonoreflex {version}

Middle Chinese reflex prediction and syllable display.

Usage:
  phonoreflex [OPTIONS] predict <initials> <final> <pronunciation>
  phonoreflex [OPTIONS] reflex <index>
  phonoreflex [OPTIONS] show <dialect> <pronunciation>
  phonoreflex [OPTIONS] strata

Commands:
  predict   Derive stratum readings of a category, e.g. `predict 知 臻眞三開 tin1`.
            Needs no data.
  reflex    Recorded and predicted readings of a catalog entry.
  show      Display a pronunciation in another notation.
  strata    Export derived strata of the catalog as JSON.

Options:
  --data <dir>           Data directory. Default: $PHONOREFLEX_DATA or ./{data}
  --dialect <code>       Dialect for predict, reflex and strata. Default: FG
  --to <notation>        Output notation of show (pinyin, ipaRaw, ipaStrict).
  --from <notation>      Input notation of show. Default: pinyin
  --mc <index>           Catalog entry the shown pronunciation belongs to.
  --proto                Show the proto-form.
  --no-variant           Disable variant pronunciations.
  --color                Force ANSI color output.
  --no-color             Disable ANSI color output.
  -h, --help             Show this help message.
  -V, --version          Print version information.

Environment:
  PHONOREFLEX_LOG        Log level on stderr (error, warn, info, debug, trace).
  PHONOREFLEX_DATA       Default data directory.

Exit codes:
  0  Success.
  1  Data or lookup error.
  2  Invalid arguments.
",
        version = env!("CARGO_PKG_VERSION"),
        data = DEFAULT_DATA_DIR
    )
}
