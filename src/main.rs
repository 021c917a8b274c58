use std::io;
use std::path::{Path, PathBuf};

use anyhow::{bail, Context, Result};
use clap::{Parser, Subcommand, ValueEnum};
use tracing::{debug, warn};

use txdecode::config::{self, Config};
use txdecode::domain::abi::{parse_selector_hex, DecodedArgs, ParamSpec};
use txdecode::domain::tx::ReturnData;
use txdecode::export::{
    self, CollisionRow, DecodeReport, Export, FunctionRow, FunctionTable, LookupReport,
    OutputFormat, ScanReport, SelectorReport,
};
use txdecode::infrastructure::abi::{
    canonical, decode_named, find_collisions, load_interface, resolve, selector, selector_hex,
    AbiScanner,
};
use txdecode::infrastructure::FixtureSource;
use txdecode::{app, logging, TxDecoder};

#[derive(Debug, Parser)]
#[command(
    name = "txdecode",
    version,
    about = "Resolve contract calls against their ABI and decode arguments and results"
)]
struct Args {
    /// Output format (defaults to the config value, then text)
    #[arg(long, global = true, value_enum)]
    format: Option<OutputFormat>,

    /// Config file (defaults to $TXDECODE_CONFIG or ~/.config/txdecode/config.toml)
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Enable debug logging
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Print the selector of a function signature
    Selector {
        /// e.g. "transfer(address to, uint256 amount)"
        signature: String,
    },

    /// List the functions of an interface file with their selectors
    Functions {
        #[arg(long)]
        abi: PathBuf,
    },

    /// Resolve and decode call data
    DecodeInput {
        #[arg(long)]
        abi: PathBuf,
        /// Selector-prefixed call data as hex
        #[arg(long)]
        data: String,
    },

    /// Decode return data of the function the call data invokes
    DecodeOutput {
        #[arg(long)]
        abi: PathBuf,
        /// Selector-prefixed call data as hex
        #[arg(long)]
        data: String,
        /// Return data: 0x-prefixed ABI data, or bare hex of a text message
        #[arg(long)]
        result: String,
    },

    /// Decode data against an ad-hoc type list
    Decode {
        /// A signature such as "f(uint256,(bool,string))" or a bare list "uint256,string"
        #[arg(long)]
        types: String,
        #[arg(long)]
        data: String,
    },

    /// Decode a saved transaction by id
    Tx {
        #[arg(value_enum)]
        action: TxAction,
        id: String,
        /// Directory of saved node responses (defaults to config fixtures_dir)
        #[arg(long)]
        fixtures: Option<PathBuf>,
    },

    /// Scan directories for interface files
    Scan {
        /// Directories to scan (defaults to config abi_paths)
        dirs: Vec<PathBuf>,
    },

    /// Find scanned functions by selector
    Lookup {
        /// e.g. 0xa9059cbb
        selector: String,
        dirs: Vec<PathBuf>,
    },
}

#[derive(Debug, Clone, Copy, ValueEnum)]
enum TxAction {
    Input,
    Result,
    Revert,
}

fn main() -> Result<()> {
    let args = Args::parse();
    let config = config::load(args.config.as_deref());
    logging::init(args.verbose, config.log_level.as_deref());

    let format = args.format.or(config.output.format).unwrap_or_default();
    run(args.command, &config, format)
}

fn run(command: Command, config: &Config, format: OutputFormat) -> Result<()> {
    match command {
        Command::Selector { signature } => {
            let signature = canonical::normalize_signature(&signature)?;
            emit(
                format,
                &SelectorReport {
                    selector: selector_hex(selector(&signature)),
                    signature,
                },
            )
        }
        Command::Functions { abi } => emit(format, &function_table(&abi)?),
        Command::DecodeInput { abi, data } => {
            let interface = load_interface(&abi)?;
            let call_data = parse_hex(&data).context("invalid --data")?;
            emit(format, &app::decode_input(&call_data, &interface)?)
        }
        Command::DecodeOutput { abi, data, result } => {
            let interface = load_interface(&abi)?;
            let call_data = parse_hex(&data).context("invalid --data")?;
            let resolution = resolve(&call_data, &interface)?;
            let return_data = ReturnData::from_node_result(&result).context("invalid --result")?;
            emit(format, &app::decode_output(resolution.function, &return_data)?)
        }
        Command::Decode { types, data } => emit(format, &decode_ad_hoc(&types, &data)?),
        Command::Tx {
            action,
            id,
            fixtures,
        } => {
            let root = fixtures
                .or_else(|| config.fixtures_root())
                .context("no --fixtures given and no fixtures_dir configured")?;
            let decoder = TxDecoder::new(FixtureSource::new(root));
            match action {
                TxAction::Input => emit(format, &decoder.decode_input_by_id(&id)?),
                TxAction::Result => emit(format, &decoder.decode_result_by_id(&id)?),
                TxAction::Revert => emit(format, &decoder.decode_revert_message(&id)?),
            }
        }
        Command::Scan { dirs } => {
            let index = AbiScanner::scan_roots(&scan_roots(dirs, config)?);
            let report = ScanReport::new(&index);
            for collision in &report.collisions {
                warn!(
                    selector = %collision.selector,
                    signatures = %collision.signatures.join(" | "),
                    "selector collision"
                );
            }
            emit(format, &report)
        }
        Command::Lookup { selector, dirs } => {
            let Some(wanted) = parse_selector_hex(&selector) else {
                bail!("invalid selector `{}`, expected 4 bytes of hex", selector);
            };
            let index = AbiScanner::scan_roots(&scan_roots(dirs, config)?);
            emit(format, &LookupReport::new(&index, wanted))
        }
    }
}

fn emit(format: OutputFormat, item: &impl Export) -> Result<()> {
    let stdout = io::stdout();
    let mut out = stdout.lock();
    export::write(&mut out, format, item)
}

fn parse_hex(data: &str) -> Result<Vec<u8>> {
    let trimmed = data.trim();
    let payload = trimmed
        .strip_prefix("0x")
        .or_else(|| trimmed.strip_prefix("0X"))
        .unwrap_or(trimmed);
    Ok(hex::decode(payload)?)
}

fn scan_roots(dirs: Vec<PathBuf>, config: &Config) -> Result<Vec<PathBuf>> {
    let roots = if dirs.is_empty() { config.abi_roots() } else { dirs };
    if roots.is_empty() {
        bail!("no directories given and no abi_paths configured");
    }
    Ok(roots)
}

fn function_table(path: &Path) -> Result<FunctionTable> {
    let interface = load_interface(path)?;

    let mut functions = Vec::new();
    for function in interface.functions() {
        let signature = canonical::canonicalize_signature(&function.name, &function.inputs)?;
        functions.push(FunctionRow {
            selector: selector_hex(selector(&signature)),
            signature,
            name: function.name.clone(),
            source: None,
        });
    }

    let collisions: Vec<CollisionRow> = find_collisions(&interface)?
        .iter()
        .map(CollisionRow::from)
        .collect();
    for collision in &collisions {
        warn!(
            selector = %collision.selector,
            signatures = %collision.signatures.join(" | "),
            "duplicate selector in interface, later entry wins"
        );
    }

    Ok(FunctionTable {
        functions,
        collisions,
    })
}

/// Decode against a signature or a bare type list.
///
/// When a named signature is given and the data starts with its selector,
/// the selector is skipped.
fn decode_ad_hoc(types: &str, data: &str) -> Result<DecodeReport> {
    let types = types.trim();
    let named = types.find('(').is_some_and(|open| open > 0);
    let signature = if named {
        canonical::normalize_signature(types)?
    } else {
        canonical::normalize_signature(&format!("({})", types))?
    };
    let (name, params): (String, Vec<ParamSpec>) = canonical::parse_signature(&signature)?;

    let mut bytes = parse_hex(data).context("invalid --data")?;
    if !name.is_empty() && bytes.get(..4) == Some(&selector(&signature)[..]) {
        debug!(%signature, "skipping selector");
        bytes.drain(..4);
    }

    let values: DecodedArgs = decode_named(&bytes, &params)?;
    Ok(DecodeReport { signature, values })
}
