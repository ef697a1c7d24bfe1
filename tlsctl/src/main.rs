//! tlsctl: Command-line tool for inspecting TLS certificate chains.

use anyhow::{Context, Result};
use clap::{Args, Parser, Subcommand};
use std::io::Read;
use std::path::PathBuf;
use std::time::Duration;
use tlsctl_lib::{ChainInfo, QueryOptions};
use tracing::debug;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(
    name = "tlsctl",
    about = "Query TLS certificate information for a given endpoint",
    long_about = "tlsctl connects to a TLS endpoint, or reads a PEM bundle, and displays\n\
                  certificate metadata for every certificate in the chain: common name,\n\
                  issuer, validity dates, key usage, SANs, and more. Port defaults to 443\n\
                  if not specified.\n\n\
                  Certificates are classified as leaf, intermediate, or root. No\n\
                  signature, trust, or revocation checking is performed on the output.",
    after_help = "EXAMPLES:\n\
                  \n  tlsctl example.com\
                  \n  tlsctl --json example.com:8443\
                  \n  tlsctl client -o yaml example.com\
                  \n  tlsctl client --insecure --pem localhost:8443\
                  \n  tlsctl pem chain.pem\
                  \n  cat chain.pem | tlsctl pem -o json",
    args_conflicts_with_subcommands = true,
    arg_required_else_help = true
)]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,

    #[command(flatten)]
    legacy: LegacyArgs,
}

// Root form: `tlsctl FQDN[:PORT] [--json]`.
#[derive(Args)]
struct LegacyArgs {
    /// Endpoint to query, FQDN[:PORT]
    endpoint: Option<String>,
    /// Output in JSON format
    #[arg(long)]
    json: bool,
}

#[derive(Subcommand)]
enum Commands {
    /// Query a TLS endpoint and display its certificate chain
    #[command(after_help = "EXAMPLES:\n\
                      \n  tlsctl client example.com\
                      \n  tlsctl client -o json example.com:443\
                      \n  tlsctl client --timeout 30s slow.example.com\
                      \n  tlsctl client --insecure self-signed.example.com")]
    Client {
        /// Endpoint to query, FQDN[:PORT]
        endpoint: String,
        /// Output format (text, json, yaml)
        #[arg(short, long, env = "TLSCTL_OUTPUT", default_value = "text")]
        output: String,
        /// Include the PEM encoding of each certificate
        #[arg(long)]
        pem: bool,
        /// Accept any server certificate
        #[arg(long)]
        insecure: bool,
        /// Connect and handshake timeout (seconds or humantime, e.g. 10s, 1m)
        #[arg(long, env = "TLSCTL_TIMEOUT", default_value = "10s", value_parser = parse_duration)]
        timeout: Duration,
    },
    /// Parse and display certificates from a PEM file
    #[command(after_help = "EXAMPLES:\n\
                      \n  tlsctl pem chain.pem\
                      \n  tlsctl pem -o yaml --pem bundle.pem\
                      \n  cat chain.pem | tlsctl pem")]
    Pem {
        /// PEM file. Reads from stdin if omitted.
        file: Option<PathBuf>,
        /// Output format (text, json, yaml)
        #[arg(short, long, env = "TLSCTL_OUTPUT", default_value = "text")]
        output: String,
        /// Include the PEM encoding of each certificate
        #[arg(long)]
        pem: bool,
    },
    /// Print version information
    Version,
}

/// Maximum size for PEM inputs (10 MiB).
const MAX_INPUT_BYTES: u64 = 10 * 1024 * 1024;

fn read_input(file: Option<&PathBuf>) -> Result<Vec<u8>> {
    match file {
        Some(path) => {
            let meta = std::fs::metadata(path)
                .with_context(|| format!("Failed to stat file: {}", path.display()))?;
            if meta.len() > MAX_INPUT_BYTES {
                anyhow::bail!(
                    "File too large ({} bytes, max {} bytes): {}",
                    meta.len(),
                    MAX_INPUT_BYTES,
                    path.display()
                );
            }
            std::fs::read(path).with_context(|| format!("Failed to read file: {}", path.display()))
        }
        None => {
            read_limited(std::io::stdin(), MAX_INPUT_BYTES).context("Failed to read from stdin")
        }
    }
}

/// Read all of `reader`, failing if it holds more than `limit` bytes.
fn read_limited(reader: impl Read, limit: u64) -> Result<Vec<u8>> {
    let mut buf = Vec::new();
    reader.take(limit + 1).read_to_end(&mut buf)?;
    if buf.len() as u64 > limit {
        anyhow::bail!("Input too large (max {} bytes)", limit);
    }
    Ok(buf)
}

/// Parse a duration string using humantime format.
///
/// Plain numbers (e.g. "30") default to seconds.
fn parse_duration(s: &str) -> Result<Duration> {
    if s.chars().all(|c| c.is_ascii_digit()) {
        let secs: u64 = s.parse().context("Invalid duration value")?;
        return Ok(Duration::from_secs(secs));
    }
    humantime::parse_duration(s).with_context(|| format!("Invalid duration: '{s}'"))
}

/// Split `FQDN[:PORT]` into host and port, defaulting the port to 443.
fn normalize_endpoint(endpoint: &str) -> Result<(String, u16)> {
    let parts: Vec<&str> = endpoint.split(':').collect();
    let (host, port) = match parts.as_slice() {
        [host] => (*host, ""),
        [host, port] => (*host, *port),
        _ => anyhow::bail!(
            "invalid endpoint format: expected FQDN[:PORT], got {:?}",
            endpoint
        ),
    };
    if host.is_empty() {
        anyhow::bail!("invalid hostname: hostname cannot be empty");
    }
    if port.is_empty() {
        return Ok((host.to_string(), 443));
    }
    let port = port
        .parse::<i64>()
        .ok()
        .and_then(|n| u16::try_from(n).ok())
        .ok_or_else(|| anyhow::anyhow!("invalid port: port must be a number in the range 0-65535"))?;
    Ok((host.to_string(), port))
}

fn version_string() -> String {
    format!(
        "tlsctl version {} (commit: {}, built: {})",
        env!("CARGO_PKG_VERSION"),
        option_env!("TLSCTL_COMMIT").unwrap_or("none"),
        option_env!("TLSCTL_BUILD_DATE").unwrap_or("unknown"),
    )
}

fn query_endpoint(endpoint: &str, options: &QueryOptions) -> Result<ChainInfo> {
    let (host, port) = normalize_endpoint(endpoint)?;
    debug!(%host, port, timeout = ?options.timeout, "querying endpoint");
    tlsctl_lib::query(&host, port, options)
        .with_context(|| format!("Failed to query {}:{}", host, port))
}

fn print_chain(chain: &ChainInfo, output: &str, pem: bool) -> Result<()> {
    print!("{}", tlsctl_lib::render(chain, output, pem)?);
    Ok(())
}

fn init_tracing() {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_tracing();

    match &cli.command {
        Some(Commands::Client {
            endpoint,
            output,
            pem,
            insecure,
            timeout,
        }) => {
            let options = if *insecure {
                QueryOptions::insecure()?
            } else {
                QueryOptions::verified()?
            }
            .timeout(*timeout);
            let chain = query_endpoint(endpoint, &options)?;
            print_chain(&chain, output, *pem)?;
        }
        Some(Commands::Pem { file, output, pem }) => {
            let input = read_input(file.as_ref())?;
            let chain = tlsctl_lib::decode_pem_chain(&input).with_context(|| match file {
                Some(path) => format!("Failed to parse PEM file: {}", path.display()),
                None => "Failed to parse PEM from stdin".to_string(),
            })?;
            print_chain(&chain, output, *pem)?;
        }
        Some(Commands::Version) => {
            println!("{}", version_string());
        }
        None => {
            let Some(endpoint) = &cli.legacy.endpoint else {
                anyhow::bail!("missing endpoint: expected FQDN[:PORT]");
            };
            let chain = query_endpoint(endpoint, &QueryOptions::verified()?)?;
            let output = if cli.legacy.json { "json" } else { "text" };
            print_chain(&chain, output, false)?;
        }
    }

    Ok(())
}
