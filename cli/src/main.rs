use std::fs;
use std::io::Write;
use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};
use prost::Message;
use prost_reflect::DynamicMessage;
use snippet_report::{
    FileListingSource, ItemErrorPolicy, ListingSource, OutputFormat, ReportConfig,
    generate_report, write_reports,
};
use snippet_report_core::MappingOptions;
use snippet_report_schema::{REPORT_MESSAGE, SchemaRegistry, report_schema};
use tracing::info;
use tracing_subscriber::EnvFilter;

#[derive(Debug, Parser)]
#[command(name = "generate-ssr")]
#[command(about = "Snippet Status Report generation from saved creative listings")]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Build the report from a saved creative listing and write its files.
    Generate(GenerateArgs),
    /// Print a binary-encoded message as JSON.
    ToJson(ToJsonArgs),
    /// Encode a JSON document as a binary message.
    FromJson(FromJsonArgs),
    /// Print the CSV header columns, one per line.
    Columns,
}

#[derive(Debug, Args)]
struct GenerateArgs {
    /// Saved creative-listing JSON, or `-` for stdin.
    #[arg(long)]
    input: PathBuf,
    /// Directory receiving the report files (overrides the config file).
    #[arg(long)]
    output_dir: Option<PathBuf>,
    /// Report file name without extension (overrides the config file).
    #[arg(long)]
    basename: Option<String>,
    /// YAML configuration file.
    #[arg(long)]
    config: Option<PathBuf>,
    /// Formats to write; repeat for several (default: all).
    #[arg(long = "format", value_enum)]
    formats: Vec<OutputFormat>,
    /// Leave out listing items that fail to map instead of aborting.
    #[arg(long)]
    skip_invalid: bool,
}

#[derive(Debug, Args)]
struct SchemaArgs {
    /// FileDescriptorSet file (`protoc --descriptor_set_out`); the built-in
    /// report schema is used when omitted.
    #[arg(long)]
    descriptor_set: Option<PathBuf>,
    /// Fully-qualified message type name.
    #[arg(long, default_value = REPORT_MESSAGE)]
    message_type: String,
}

#[derive(Debug, Args)]
struct ToJsonArgs {
    /// Binary-encoded message file.
    #[arg(long)]
    input: PathBuf,
    /// Output JSON path (default: stdout).
    #[arg(long)]
    output: Option<PathBuf>,
    #[command(flatten)]
    schema: SchemaArgs,
    /// Emit unset fields as null or [].
    #[arg(long)]
    all_fields: bool,
    /// Emit enum values as numbers rather than names.
    #[arg(long)]
    enum_numbers: bool,
}

#[derive(Debug, Args)]
struct FromJsonArgs {
    /// JSON document file.
    #[arg(long)]
    input: PathBuf,
    /// Output path for the binary encoding.
    #[arg(long)]
    output: PathBuf,
    #[command(flatten)]
    schema: SchemaArgs,
    /// Read enum values as numbers rather than names.
    #[arg(long)]
    enum_numbers: bool,
}

fn main() {
    let cli = Cli::parse();

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .init();

    let result = match cli.command {
        Command::Generate(args) => run_generate(args),
        Command::ToJson(args) => run_to_json(args),
        Command::FromJson(args) => run_from_json(args),
        Command::Columns => run_columns(),
    };

    if let Err(err) = result {
        eprintln!("error: {err}");
        std::process::exit(1);
    }
}

fn run_generate(args: GenerateArgs) -> Result<(), String> {
    let mut config = match &args.config {
        Some(path) => ReportConfig::load(path)
            .map_err(|err| format!("failed to load config {}: {err}", path.display()))?,
        None => ReportConfig::default(),
    };
    if let Some(dir) = args.output_dir {
        config.output.directory = dir;
    }
    if let Some(basename) = args.basename {
        config.output.basename = basename;
    }
    if !args.formats.is_empty() {
        config.output.formats = args.formats;
    }
    if args.skip_invalid {
        config.on_item_error = ItemErrorPolicy::Skip;
    }

    let listing = FileListingSource::new(&args.input)
        .fetch()
        .map_err(|err| err.to_string())?;
    let schema = report_schema().map_err(|err| err.to_string())?;
    let report = generate_report(schema, &listing, &config.assembly_options())
        .map_err(|err| err.to_string())?;

    let written = write_reports(
        &report.message,
        &config.output.directory,
        &config.output.basename,
        &config.output.formats,
    )
    .map_err(|err| err.to_string())?;

    if report.stats.items_skipped > 0 {
        eprintln!(
            "Skipped {} of {} listing items",
            report.stats.items_skipped, report.stats.items_seen
        );
    }
    for path in written {
        println!("{}", path.display());
    }
    Ok(())
}

fn run_to_json(args: ToJsonArgs) -> Result<(), String> {
    let loaded;
    let registry = match &args.schema.descriptor_set {
        Some(path) => {
            loaded = SchemaRegistry::from_descriptor_set_file(path).map_err(|err| {
                format!("failed to load descriptor set {}: {err}", path.display())
            })?;
            &loaded
        }
        None => report_schema().map_err(|err| err.to_string())?.registry(),
    };
    let descriptor = registry
        .message(&args.schema.message_type)
        .map_err(|err| err.to_string())?;

    let bytes = fs::read(&args.input)
        .map_err(|err| format!("failed to read {}: {err}", args.input.display()))?;
    let message = DynamicMessage::decode(descriptor, bytes.as_slice())
        .map_err(|err| format!("failed to decode {}: {err}", args.input.display()))?;

    let options = MappingOptions::new()
        .with_enum_names(!args.enum_numbers)
        .with_all_fields(args.all_fields);
    let json = registry
        .mapper(options)
        .encode(&message)
        .map_err(|err| err.to_string())?;
    let rendered = serde_json::to_string_pretty(&json).map_err(|err| err.to_string())?;

    match &args.output {
        Some(path) => {
            fs::write(path, format!("{rendered}\n"))
                .map_err(|err| format!("failed to write {}: {err}", path.display()))?;
            info!(path = %path.display(), "wrote JSON");
        }
        None => {
            let mut stdout = std::io::stdout().lock();
            writeln!(stdout, "{rendered}").map_err(|err| err.to_string())?;
        }
    }
    Ok(())
}

fn run_from_json(args: FromJsonArgs) -> Result<(), String> {
    let loaded;
    let registry = match &args.schema.descriptor_set {
        Some(path) => {
            loaded = SchemaRegistry::from_descriptor_set_file(path).map_err(|err| {
                format!("failed to load descriptor set {}: {err}", path.display())
            })?;
            &loaded
        }
        None => report_schema().map_err(|err| err.to_string())?.registry(),
    };
    let descriptor = registry
        .message(&args.schema.message_type)
        .map_err(|err| err.to_string())?;

    let text = fs::read_to_string(&args.input)
        .map_err(|err| format!("failed to read {}: {err}", args.input.display()))?;
    let json: serde_json::Value = serde_json::from_str(&text)
        .map_err(|err| format!("failed to parse {}: {err}", args.input.display()))?;

    let message = registry
        .mapper(MappingOptions::new().with_enum_names(!args.enum_numbers))
        .decode(descriptor, &json)
        .map_err(|err| err.to_string())?;

    fs::write(&args.output, message.encode_to_vec())
        .map_err(|err| format!("failed to write {}: {err}", args.output.display()))?;
    info!(path = %args.output.display(), "wrote binary message");
    Ok(())
}

fn run_columns() -> Result<(), String> {
    let schema = report_schema().map_err(|err| err.to_string())?;
    let mut stdout = std::io::stdout().lock();
    for column in schema.item_columns() {
        writeln!(stdout, "{column}").map_err(|err| err.to_string())?;
    }
    Ok(())
}
