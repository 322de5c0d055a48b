//! Onboard CLI - reshape facility asset spreadsheets for platform import
//!
//! # Commands
//!
//! ```bash
//! onboard asset-ids survey.xlsx                      # Add Asset ID column (XLSX)
//! onboard facility survey.xlsx -n acme -o f.csv      # Building (Facility) sheet
//! onboard location survey.xlsx -n acme -o l.csv      # Floors
//! onboard space survey.xlsx -n acme -o s.csv         # Sublocations
//! onboard equipment survey.xlsx -n acme --policy block
//! onboard map-assets locations.csv spaces.csv        # Fill asset* by name
//! onboard vocabulary                                 # Show equipment vocabulary
//! ```
//!
//! Result tables go to stdout as CSV unless `--output` is given; the file
//! extension (`.csv` or `.xlsx`) picks the format. Diagnostics go to stderr.

use clap::{Args, Parser, Subcommand};
use onboard::{
    run_asset_ids, run_domain, run_mapping, to_csv_bytes, write_table, ConsoleSink, Domain,
    EquipmentPolicy, MemorySink, OnboardOptions, Outcome, RunReport, Table, Tee,
};
use std::error::Error;
use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};

#[derive(Parser)]
#[command(name = "onboard")]
#[command(about = "Reshape facility asset spreadsheets into platform import files", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Append a generated Asset ID to every row of the asset sheet
    AssetIds {
        /// Input workbook (or CSV)
        input: PathBuf,

        /// Sheet to read (default: "Asset,location")
        #[arg(short, long)]
        sheet: Option<String>,

        /// Output file (default: <input>_with_asset_ids.xlsx)
        #[arg(short, long)]
        output: Option<PathBuf>,

        /// Write a JSON run report
        #[arg(long)]
        report: Option<PathBuf>,
    },

    /// Build facility records from the "Building (Facility)" sheet
    Facility(DomainArgs),

    /// Build location (floor) records
    Location(DomainArgs),

    /// Build space (sublocation) records
    Space(DomainArgs),

    /// Build equipment records, checking classes and types
    Equipment {
        #[command(flatten)]
        args: DomainArgs,

        /// What unknown classes/types do: warn or block
        #[arg(long)]
        policy: Option<EquipmentPolicy>,

        /// Vocabulary JSON file replacing the bundled one
        #[arg(long)]
        vocabulary: Option<PathBuf>,

        /// Save the validation report text to a file
        #[arg(long)]
        warnings_out: Option<PathBuf>,
    },

    /// Fill asset* on a space export from a location export's ids
    MapAssets {
        /// Location CSV (name*, id)
        locations: PathBuf,

        /// Space CSV (asset name)
        spaces: PathBuf,

        /// Output file (default: stdout)
        #[arg(short, long)]
        output: Option<PathBuf>,

        /// Write a JSON run report
        #[arg(long)]
        report: Option<PathBuf>,
    },

    /// Show the equipment vocabulary in use
    Vocabulary {
        /// Vocabulary JSON file replacing the bundled one
        #[arg(long)]
        vocabulary: Option<PathBuf>,
    },
}

#[derive(Args)]
struct DomainArgs {
    /// Input workbook (or CSV)
    input: PathBuf,

    /// Namespace stamped on every record (default: $ONBOARD_NAMESPACE)
    #[arg(short, long)]
    namespace: Option<String>,

    /// Template CSV (default: <template dir>/<domain>_template.csv)
    #[arg(short, long)]
    template: Option<PathBuf>,

    /// Sheet to read instead of the domain default
    #[arg(short, long)]
    sheet: Option<String>,

    /// Output file (default: stdout)
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// Write a JSON run report
    #[arg(long)]
    report: Option<PathBuf>,
}

impl DomainArgs {
    fn options(&self) -> Result<OnboardOptions, Box<dyn Error>> {
        let mut options = OnboardOptions::from_env()?;
        if let Some(ref namespace) = self.namespace {
            options.namespace = namespace.clone();
        }
        options.template = self.template.clone();
        options.sheet = self.sheet.clone();
        Ok(options)
    }
}

/// Where a run's results go.
struct Destination<'a> {
    operation: &'static str,
    output: Option<&'a Path>,
    report: Option<&'a Path>,
    warnings_out: Option<&'a Path>,
    sheet_name: String,
}

fn main() {
    // Load .env file (if present)
    dotenvy::dotenv().ok();

    let cli = Cli::parse();

    let result = match cli.command {
        Commands::AssetIds {
            input,
            sheet,
            output,
            report,
        } => cmd_asset_ids(&input, sheet, output, report.as_deref()),

        Commands::Facility(args) => cmd_domain(Domain::Facility, &args, None),
        Commands::Location(args) => cmd_domain(Domain::Location, &args, None),
        Commands::Space(args) => cmd_domain(Domain::Space, &args, None),

        Commands::Equipment {
            args,
            policy,
            vocabulary,
            warnings_out,
        } => cmd_domain(
            Domain::Equipment,
            &args,
            Some(EquipmentArgs {
                policy,
                vocabulary,
                warnings_out,
            }),
        ),

        Commands::MapAssets {
            locations,
            spaces,
            output,
            report,
        } => cmd_map_assets(&locations, &spaces, output.as_deref(), report.as_deref()),

        Commands::Vocabulary { vocabulary } => cmd_vocabulary(vocabulary),
    };

    if let Err(e) = result {
        eprintln!("❌ Error: {}", e);
        std::process::exit(1);
    }
}

struct EquipmentArgs {
    policy: Option<EquipmentPolicy>,
    vocabulary: Option<PathBuf>,
    warnings_out: Option<PathBuf>,
}

fn cmd_domain(
    domain: Domain,
    args: &DomainArgs,
    equipment: Option<EquipmentArgs>,
) -> Result<(), Box<dyn Error>> {
    eprintln!("📄 Processing {}: {}", domain, args.input.display());

    let mut options = args.options()?;
    let mut warnings_out = None;
    if let Some(equipment) = equipment {
        if let Some(policy) = equipment.policy {
            options.equipment_policy = policy;
        }
        if equipment.vocabulary.is_some() {
            options.vocabulary = equipment.vocabulary;
        }
        warnings_out = equipment.warnings_out;
    }

    let bytes = fs::read(&args.input)?;
    let memory = MemorySink::new();
    let sink = Tee::new(&ConsoleSink, &memory);
    let outcome = Outcome::from_extraction(run_domain(domain, &bytes, &options, &sink));

    finish(
        outcome,
        memory,
        Destination {
            operation: domain.name(),
            output: args.output.as_deref(),
            report: args.report.as_deref(),
            warnings_out: warnings_out.as_deref(),
            sheet_name: domain.name().to_string(),
        },
    )
}

fn cmd_asset_ids(
    input: &Path,
    sheet: Option<String>,
    output: Option<PathBuf>,
    report: Option<&Path>,
) -> Result<(), Box<dyn Error>> {
    eprintln!("📄 Generating asset IDs: {}", input.display());

    let bytes = fs::read(input)?;
    let memory = MemorySink::new();
    let sink = Tee::new(&ConsoleSink, &memory);
    let outcome = Outcome::from_table(run_asset_ids(&bytes, sheet.as_deref(), &sink));

    let output = output.unwrap_or_else(|| default_asset_id_output(input));
    let sheet_name = sheet.unwrap_or_else(|| Domain::Equipment.default_sheet().to_string());

    finish(
        outcome,
        memory,
        Destination {
            operation: "asset-ids",
            output: Some(&output),
            report,
            warnings_out: None,
            sheet_name,
        },
    )
}

fn default_asset_id_output(input: &Path) -> PathBuf {
    let stem = input
        .file_stem()
        .and_then(|s| s.to_str())
        .unwrap_or("assets");
    input.with_file_name(format!("{}_with_asset_ids.xlsx", stem))
}

fn cmd_map_assets(
    locations: &Path,
    spaces: &Path,
    output: Option<&Path>,
    report: Option<&Path>,
) -> Result<(), Box<dyn Error>> {
    eprintln!(
        "📄 Mapping system assets: {} → {}",
        locations.display(),
        spaces.display()
    );

    let location_bytes = fs::read(locations)?;
    let space_bytes = fs::read(spaces)?;
    let memory = MemorySink::new();
    let sink = Tee::new(&ConsoleSink, &memory);
    let outcome =
        Outcome::from_cross_reference(run_mapping(&location_bytes, &space_bytes, &sink));

    finish(
        outcome,
        memory,
        Destination {
            operation: "system-asset-mapping",
            output,
            report,
            warnings_out: None,
            sheet_name: "mapped".to_string(),
        },
    )
}

fn cmd_vocabulary(vocabulary: Option<PathBuf>) -> Result<(), Box<dyn Error>> {
    let mut options = OnboardOptions::from_env()?;
    if vocabulary.is_some() {
        options.vocabulary = vocabulary;
    }
    let vocab = options.load_vocabulary()?;
    println!("{}", serde_json::to_string_pretty(&vocab.to_file())?);
    Ok(())
}

/// Write the table, findings and report of a run, then turn the outcome
/// into the process result.
fn finish(
    outcome: Outcome,
    memory: MemorySink,
    dest: Destination<'_>,
) -> Result<(), Box<dyn Error>> {
    if let Some(text) = outcome.report() {
        eprintln!("\n{}\n", text);
        if let Some(path) = dest.warnings_out {
            fs::write(path, text)?;
            eprintln!("💾 Report written to: {}", path.display());
        }
    }

    if let Some(table) = outcome.table() {
        write_output(table, dest.output, &dest.sheet_name)?;
    }

    if let Some(path) = dest.report {
        RunReport::new(dest.operation, &outcome, memory.into_entries()).write(path)?;
        eprintln!("💾 Run report written to: {}", path.display());
    }

    match outcome {
        Outcome::Success { .. } => {
            eprintln!("✨ Done!");
            Ok(())
        }
        Outcome::ValidationFindings { table: Some(_), findings, .. } => {
            eprintln!("✨ Done with {} warning(s)", findings.len());
            Ok(())
        }
        Outcome::ValidationFindings { table: None, findings, .. } => {
            Err(format!("{}: {} blocking finding(s), no file produced", dest.operation, findings.len()).into())
        }
        Outcome::StructuralError { message } => Err(message.into()),
        Outcome::Failure { message } => {
            Err(format!("{} failed: {}", dest.operation, message).into())
        }
    }
}

fn write_output(table: &Table, path: Option<&Path>, sheet_name: &str) -> Result<(), Box<dyn Error>> {
    match path {
        Some(p) => {
            write_table(table, p, sheet_name)?;
            eprintln!("💾 Output written to: {}", p.display());
        }
        None => {
            std::io::stdout().write_all(&to_csv_bytes(table)?)?;
        }
    }
    Ok(())
}
