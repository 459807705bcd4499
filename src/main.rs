use std::fs;
use std::io::{self, Read};
use std::path::PathBuf;
use std::process;

use clap::{Args, Parser, Subcommand};
use log::{error, LevelFilter};

use matrix_lab::api::{error_body, handle_json, Endpoint};
use matrix_lab::LabError;

/// Small-matrix numerics over JSON requests
#[derive(Debug, Parser)]
#[command(version, about, long_about = None)]
struct Cli {
    /// Log debug output (per-iteration estimates, intermediate matrices)
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    tool: Tool,
}

#[derive(Subcommand, Debug)]
enum Tool {
    /// Rotate and translate a 2x2, 3x3 or 4x4 matrix
    Transform(RequestArgs),

    /// Dominant eigenpair by power iteration
    PowerMethod(RequestArgs),

    /// Principal component analysis
    Pca(RequestArgs),

    /// Full eigendecomposition
    Eigen(RequestArgs),
}

#[derive(Args, Debug)]
struct RequestArgs {
    /// JSON request file; read from stdin when omitted
    #[arg(short, long)]
    input: Option<PathBuf>,

    /// Pretty-print the JSON response
    #[arg(long)]
    pretty: bool,
}

impl Tool {
    fn endpoint(&self) -> Endpoint {
        match self {
            Tool::Transform(_) => Endpoint::Transform,
            Tool::PowerMethod(_) => Endpoint::PowerMethod,
            Tool::Pca(_) => Endpoint::Pca,
            Tool::Eigen(_) => Endpoint::ComputeEigen,
        }
    }

    fn args(&self) -> &RequestArgs {
        match self {
            Tool::Transform(args) | Tool::PowerMethod(args) | Tool::Pca(args) | Tool::Eigen(args) => args,
        }
    }
}

fn read_body(input: Option<&PathBuf>) -> Result<String, LabError> {
    match input {
        Some(path) => fs::read_to_string(path).map_err(|e| {
            LabError::MalformedRequest(format!("could not read {}: {}", path.display(), e))
        }),
        None => {
            let mut body = String::new();
            io::stdin()
                .read_to_string(&mut body)
                .map_err(|e| LabError::MalformedRequest(format!("could not read stdin: {}", e)))?;
            Ok(body)
        }
    }
}

fn prettify(response: String) -> String {
    match serde_json::from_str::<serde_json::Value>(&response) {
        Ok(value) => serde_json::to_string_pretty(&value).unwrap_or(response),
        Err(_) => response,
    }
}

fn run(tool: &Tool) -> Result<String, LabError> {
    let args = tool.args();
    let body = read_body(args.input.as_ref())?;
    let response = handle_json(tool.endpoint(), &body)?;
    Ok(if args.pretty { prettify(response) } else { response })
}

fn main() {
    let cli = Cli::parse();

    let default_filter = if cli.verbose { "debug" } else { "info" };
    env_logger::Builder::default()
        .filter_level(LevelFilter::Warn)
        .parse_env(env_logger::Env::default().default_filter_or(default_filter))
        .init();

    match run(&cli.tool) {
        Ok(response) => println!("{}", response),
        Err(e) => {
            error!("{} failed: {}", cli.tool.endpoint().path(), e);
            println!("{}", error_body(&e));
            process::exit(1);
        }
    }
}
