//! Extract form values or tables from a fragment file
//!
//! Reads positioned text fragments (JSON, one list per page), reconstructs
//! the table on each selected page and prints either the harvested key/value
//! mapping as JSON or the tables as CSV/HTML.
//!
//! Usage:
//!   cargo run --release --bin extract_form -- --fragments page.json
//!   cargo run --release --bin extract_form -- --fragments page.json --pages 0-1 \
//!       --lines 2- --strategy INVOICE --strategy-config strategies.properties
//!   cargo run --release --bin extract_form -- --fragments page.json --format csv

use std::fs;
use std::path::PathBuf;
use std::process;

use pdf_table_kv::converters::TableConverter;
use pdf_table_kv::keyvalue::{parse_properties, StrategyRegistry, ALTERNATING_CELL};
use pdf_table_kv::{ExtractionConfig, JsonFragmentSource, LineRange, PageRange, TableExtractor};

#[derive(Debug, Clone, Copy, PartialEq)]
enum OutputFormat {
    Map,
    Csv,
    Html,
}

struct CliConfig {
    fragments: PathBuf,
    pages: PageRange,
    lines: LineRange,
    strategy: String,
    strategy_config: Option<PathBuf>,
    format: OutputFormat,
    csv_delimiter: char,
    html_header: bool,
    verbose: bool,
}

impl CliConfig {
    fn from_args() -> Result<Self, String> {
        let args: Vec<String> = std::env::args().collect();
        let mut fragments = None;
        let mut pages = PageRange::all();
        let mut lines = LineRange::all();
        let mut strategy = ALTERNATING_CELL.to_string();
        let mut strategy_config = None;
        let mut format = OutputFormat::Map;
        let mut csv_delimiter = ',';
        let mut html_header = false;
        let mut verbose = false;

        let mut i = 1;
        while i < args.len() {
            let flag = args[i].as_str();
            match flag {
                "--fragments" | "-f" => {
                    fragments = Some(PathBuf::from(value_of(&args, &mut i, flag)?));
                },
                "--pages" | "-p" => {
                    pages = value_of(&args, &mut i, flag)?
                        .parse()
                        .map_err(|e| format!("{}", e))?;
                },
                "--lines" | "-l" => {
                    lines = value_of(&args, &mut i, flag)?
                        .parse()
                        .map_err(|e| format!("{}", e))?;
                },
                "--strategy" | "-s" => {
                    strategy = value_of(&args, &mut i, flag)?.to_string();
                },
                "--strategy-config" => {
                    strategy_config = Some(PathBuf::from(value_of(&args, &mut i, flag)?));
                },
                "--format" => {
                    format = match value_of(&args, &mut i, flag)? {
                        "map" | "json" => OutputFormat::Map,
                        "csv" => OutputFormat::Csv,
                        "html" => OutputFormat::Html,
                        other => return Err(format!("unknown format '{}'", other)),
                    };
                },
                "--csv-delimiter" => {
                    let value = value_of(&args, &mut i, flag)?;
                    let mut chars = value.chars();
                    csv_delimiter = match (chars.next(), chars.next()) {
                        (Some(c), None) => c,
                        _ => return Err(format!("CSV delimiter must be one character, got '{}'", value)),
                    };
                },
                "--html-header" => {
                    html_header = true;
                },
                "--verbose" | "-v" => {
                    verbose = true;
                },
                "--help" | "-h" => {
                    print_usage();
                    process::exit(0);
                },
                other => return Err(format!("unknown argument '{}'", other)),
            }
            i += 1;
        }

        Ok(Self {
            fragments: fragments.ok_or("missing --fragments FILE")?,
            pages,
            lines,
            strategy,
            strategy_config,
            format,
            csv_delimiter,
            html_header,
            verbose,
        })
    }
}

fn value_of<'a>(args: &'a [String], i: &mut usize, flag: &str) -> Result<&'a str, String> {
    *i += 1;
    args.get(*i)
        .map(|s| s.as_str())
        .ok_or_else(|| format!("{} requires a value", flag))
}

fn print_usage() {
    println!("Usage: extract_form --fragments FILE [options]");
    println!();
    println!("Options:");
    println!("  --pages R              page window, e.g. 0, 1-3, 2- (default: all)");
    println!("  --lines R              line window within each page (default: all)");
    println!("  --strategy NAME        key/value strategy (default: {})", ALTERNATING_CELL);
    println!("  --strategy-config FILE NAME.property=value overrides");
    println!("  --format map|csv|html  output format (default: map)");
    println!("  --csv-delimiter C      CSV field delimiter (default: ,)");
    println!("  --html-header          render the first row as <th>");
    println!("  --verbose              debug logging");
}

fn load_registry(path: Option<&PathBuf>) -> Result<StrategyRegistry, Box<dyn std::error::Error>> {
    let mut registry = StrategyRegistry::with_defaults();
    if let Some(path) = path {
        let text = fs::read_to_string(path)?;
        registry.merge_properties(parse_properties(&text)?)?;
        log::info!("loaded strategy overrides from {}", path.display());
    }
    Ok(registry)
}

fn run(config: &CliConfig) -> Result<String, Box<dyn std::error::Error>> {
    let extraction = ExtractionConfig::new()
        .with_csv_delimiter(config.csv_delimiter)
        .with_html_header_row(config.html_header);
    let extractor = TableExtractor::new(extraction);

    if config.format == OutputFormat::Map {
        let registry = load_registry(config.strategy_config.as_ref())?;
        let source = JsonFragmentSource::open(&config.fragments)?;
        let values = extractor.extract_form_values_by_name(
            source,
            config.pages,
            config.lines,
            &registry,
            &config.strategy,
        )?;
        return Ok(serde_json::to_string_pretty(&values)?);
    }

    let source = JsonFragmentSource::open(&config.fragments)?;
    let tables = extractor.extract_tables(source, config.pages, config.lines)?;
    let converter: Box<dyn TableConverter> = match config.format {
        OutputFormat::Csv => Box::new(extractor.config().csv_converter()),
        _ => Box::new(extractor.config().html_converter()),
    };
    let rendered: Vec<String> = tables.iter().map(|t| converter.convert(t)).collect();
    Ok(rendered.join("\n"))
}

fn main() {
    let config = match CliConfig::from_args() {
        Ok(config) => config,
        Err(e) => {
            eprintln!("Error: {}", e);
            print_usage();
            process::exit(2);
        },
    };

    let default_level = if config.verbose { "debug" } else { "warn" };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(default_level)).init();

    match run(&config) {
        Ok(output) => println!("{}", output),
        Err(e) => {
            eprintln!("Error: {}", e);
            process::exit(1);
        },
    }
}
