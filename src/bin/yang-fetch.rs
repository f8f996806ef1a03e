//! YANG Fetch CLI
//!
//! Command-line interface for pulling a YANG module and its imports from a
//! device or a local mirror directory.

use std::path::{Component, Path, PathBuf};
use std::process::ExitCode;

use clap::{Args, Parser, Subcommand};
use serde::Serialize;
use tracing_subscriber::EnvFilter;
use yang_fetch::{resolve, Catalog, DirectorySession, Resolution, SchemaSession};

#[derive(Parser)]
#[command(name = "yang-fetch")]
#[command(about = "Fetch YANG modules and their transitive imports")]
#[command(version)]
struct Cli {
    /// Increase log verbosity (-v info, -vv debug, -vvv trace)
    #[arg(long, short, global = true, action = clap::ArgAction::Count)]
    verbose: u8,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Fetch a schema and every schema it imports
    Fetch {
        /// Identifier of the root schema (module name)
        schema: String,

        #[command(flatten)]
        source: SourceArgs,

        /// Output file (stdout if not specified)
        #[arg(long)]
        output: Option<PathBuf>,

        /// Pretty-print JSON output
        #[arg(long)]
        pretty: bool,

        /// Also write each fetched module to <DIR>/<identifier>.yang
        #[arg(long)]
        save_dir: Option<PathBuf>,
    },

    /// List the schemas the source advertises
    List {
        #[command(flatten)]
        source: SourceArgs,

        /// Pretty-print JSON output
        #[arg(long)]
        pretty: bool,
    },
}

#[derive(Args)]
struct SourceArgs {
    /// Serve schemas from a local directory of .yang files
    #[arg(long, conflicts_with = "url", required_unless_present = "url")]
    dir: Option<PathBuf>,

    /// RESTCONF root of the device (e.g. https://host/restconf)
    #[arg(long, conflicts_with = "dir", required_unless_present = "dir")]
    url: Option<String>,

    /// Username for HTTP basic authentication
    #[arg(long, requires = "url")]
    user: Option<String>,

    /// Password for HTTP basic authentication
    #[arg(long, env = "YANG_FETCH_PASSWORD", hide_env_values = true)]
    password: Option<String>,

    /// Request timeout in seconds
    #[arg(long, default_value_t = 10, value_parser = clap::value_parser!(u64).range(1..))]
    timeout: u64,
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    let result = match cli.command {
        Commands::Fetch {
            schema,
            source,
            output,
            pretty,
            save_dir,
        } => run_fetch(&schema, &source, output, pretty, save_dir.as_deref()),

        Commands::List { source, pretty } => run_list(&source, pretty),
    };

    match result {
        Ok(()) => ExitCode::SUCCESS,
        Err(code) => ExitCode::from(code),
    }
}

fn init_logging(verbose: u8) {
    let level = match verbose {
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace",
    };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

fn open_session(source: &SourceArgs) -> Result<Box<dyn SchemaSession>, u8> {
    if let Some(dir) = &source.dir {
        let session: Box<dyn SchemaSession> = Box::new(DirectorySession::new(dir));
        return Ok(session);
    }

    let Some(url) = &source.url else {
        eprintln!("Error: one of --dir or --url is required");
        return Err(2);
    };

    #[cfg(feature = "remote")]
    {
        let mut session = yang_fetch::RestconfSession::new(url.as_str())
            .timeout(std::time::Duration::from_secs(source.timeout));
        if let Some(user) = &source.user {
            session = session.credentials(user.as_str(), source.password.as_deref());
        }
        let session: Box<dyn SchemaSession> = Box::new(session);
        Ok(session)
    }
    #[cfg(not(feature = "remote"))]
    {
        eprintln!("Error: cannot reach {}: built without the remote feature", url);
        Err(2)
    }
}

fn run_fetch(
    schema: &str,
    source: &SourceArgs,
    output: Option<PathBuf>,
    pretty: bool,
    save_dir: Option<&Path>,
) -> Result<(), u8> {
    let mut session = open_session(source)?;

    let resolution = resolve(&mut *session, schema).map_err(|e| {
        eprintln!("Error: {}", e);
        e.exit_code() as u8
    })?;

    if let Some(dir) = save_dir {
        save_modules(dir, &resolution)?;
    }

    let json_output = to_json(&resolution, pretty)?;
    match output {
        Some(path) => {
            std::fs::write(&path, &json_output).map_err(|e| {
                eprintln!("Error writing to {}: {}", path.display(), e);
                3u8
            })?;
        }
        None => {
            println!("{}", json_output);
        }
    }

    Ok(())
}

fn run_list(source: &SourceArgs, pretty: bool) -> Result<(), u8> {
    let mut session = open_session(source)?;

    let mut catalog = Catalog::new();
    let entries = catalog.ensure_loaded(&mut *session).map_err(|e| {
        eprintln!("Error: {}", e);
        e.exit_code() as u8
    })?;

    println!("{}", to_json(entries, pretty)?);
    Ok(())
}

/// File name for a module, or `None` when the identifier is not a single
/// plain path component (separators, `..`, `.`, roots).
fn module_file_name(identifier: &str) -> Option<String> {
    let mut components = Path::new(identifier).components();
    match (components.next(), components.next()) {
        (Some(Component::Normal(name)), None) if name == identifier => {
            Some(format!("{}.yang", identifier))
        }
        _ => None,
    }
}

/// Write every fetched module as `<identifier>.yang` under `dir`.
///
/// Identifiers come from the device; all are checked before anything is
/// written.
fn save_modules(dir: &Path, resolution: &Resolution) -> Result<(), u8> {
    let mut files = Vec::with_capacity(resolution.fetched.len());
    for (identifier, body) in &resolution.fetched {
        let Some(name) = module_file_name(identifier) else {
            eprintln!(
                "Error: refusing to save '{}': not a plain file name",
                identifier
            );
            return Err(3);
        };
        files.push((dir.join(name), body));
    }

    std::fs::create_dir_all(dir).map_err(|e| {
        eprintln!("Error creating {}: {}", dir.display(), e);
        3u8
    })?;

    for (path, body) in files {
        std::fs::write(&path, body).map_err(|e| {
            eprintln!("Error writing to {}: {}", path.display(), e);
            3u8
        })?;
        tracing::info!(path = %path.display(), "saved module");
    }
    Ok(())
}

fn to_json<T: Serialize + ?Sized>(value: &T, pretty: bool) -> Result<String, u8> {
    if pretty {
        serde_json::to_string_pretty(value)
    } else {
        serde_json::to_string(value)
    }
    .map_err(|e| {
        eprintln!("Error serializing output: {}", e);
        2u8
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn plain_identifier_is_a_file_name() {
        assert_eq!(
            module_file_name("ietf-interfaces").as_deref(),
            Some("ietf-interfaces.yang")
        );
    }

    #[test]
    fn path_like_identifiers_are_rejected() {
        for identifier in ["../escaped", "..", ".", "a/b", "/etc/passwd", "a/", "./a", ""] {
            assert_eq!(module_file_name(identifier), None, "{}", identifier);
        }
    }
}
