//! generate typed java client classes from a graphql schema
//!
//! this binary reads a schema from a file or an http endpoint and writes one
//! java source file per generated class under the output directory:
//! - one query class per root operation field, with a typed builder
//! - a tree of projection classes for building selection sets
//! - plain data types for the object and interface types encountered
//!
//! command help reference (kept in sync with `querygen --help`):
#[doc = concat!("```text\n", include_str!("querygen-help.txt"), "\n```")]
pub const CLI_HELP: &str = include_str!("querygen-help.txt");

use querygen::render;
use querygen::{
    ClientGenerator, CodeGenConfig, Error, GenerationResult, JavaDataTypeEmitter, SchemaIndex,
};
use reqwest::blocking::Client as BlockingClient;
use reqwest::header::{HeaderMap, HeaderValue, AUTHORIZATION};
use std::fs;
use std::path::{Path, PathBuf};

#[derive(Debug)]
struct Args {
    url: Option<String>,
    token: Option<String>,
    schema_path: Option<PathBuf>,
    operations_path: Option<PathBuf>,
    config_path: Option<PathBuf>,
    out_dir: PathBuf,
    max_depth: Option<i32>,
    short_names: bool,
    skip_entities: bool,
    include: Vec<String>,
    exclude: Vec<String>,
    query_package: Option<String>,
    projection_package: Option<String>,
    types_package: Option<String>,
}

enum ParseArgsError {
    Help,
    Message(String),
}

fn main() {
    tracing_subscriber::fmt::init();

    let args = match parse_args(std::env::args().collect()) {
        Ok(args) => args,
        Err(ParseArgsError::Help) => {
            print!("{CLI_HELP}");
            return;
        }
        Err(ParseArgsError::Message(err)) => {
            eprintln!("{err}\n\n{CLI_HELP}");
            std::process::exit(1);
        }
    };

    if let Err(err) = run(&args) {
        eprintln!("codegen failed: {err}");
        std::process::exit(1);
    }
}

fn parse_args(args: Vec<String>) -> Result<Args, ParseArgsError> {
    let mut url = None;
    let mut token = None;
    let mut schema_path = None;
    let mut operations_path = None;
    let mut config_path = None;
    let mut out_dir = None;
    let mut max_depth = None;
    let mut short_names = false;
    let mut skip_entities = false;
    let mut include = Vec::new();
    let mut exclude = Vec::new();
    let mut query_package = None;
    let mut projection_package = None;
    let mut types_package = None;

    let mut iter = args.into_iter().skip(1);
    while let Some(arg) = iter.next() {
        match arg.as_str() {
            "--url" => url = iter.next(),
            "--token" => token = iter.next(),
            "--schema" => schema_path = iter.next().map(PathBuf::from),
            "--operations" => operations_path = iter.next().map(PathBuf::from),
            "--config" => config_path = iter.next().map(PathBuf::from),
            "--out" => out_dir = iter.next().map(PathBuf::from),
            "--max-depth" => {
                let value = iter
                    .next()
                    .ok_or_else(|| ParseArgsError::Message("--max-depth needs a value".to_string()))?;
                max_depth = Some(value.parse().map_err(|_| {
                    ParseArgsError::Message(format!("invalid --max-depth value: {value}"))
                })?);
            }
            "--short-names" => short_names = true,
            "--skip-entities" => skip_entities = true,
            "--include" => {
                if let Some(value) = iter.next() {
                    include.extend(split_names(&value));
                }
            }
            "--exclude" => {
                if let Some(value) = iter.next() {
                    exclude.extend(split_names(&value));
                }
            }
            "--query-package" => query_package = iter.next(),
            "--projection-package" => projection_package = iter.next(),
            "--types-package" => types_package = iter.next(),
            "--help" | "-h" => return Err(ParseArgsError::Help),
            _ => return Err(ParseArgsError::Message(format!("unknown argument: {arg}"))),
        }
    }

    let out_dir =
        out_dir.ok_or_else(|| ParseArgsError::Message("--out is required".to_string()))?;

    if url.is_none() && schema_path.is_none() {
        return Err(ParseArgsError::Message(
            "--url or --schema is required".to_string(),
        ));
    }

    Ok(Args {
        url,
        token,
        schema_path,
        operations_path,
        config_path,
        out_dir,
        max_depth,
        short_names,
        skip_entities,
        include,
        exclude,
        query_package,
        projection_package,
        types_package,
    })
}

fn split_names(value: &str) -> Vec<String> {
    value
        .split(',')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(str::to_string)
        .collect()
}

fn run(args: &Args) -> querygen::Result<()> {
    let config = build_config(args)?;
    config.validate()?;

    let schema_text = load_schema(args)?;
    let doc = querygen::parse_schema(&schema_text)?;
    let schema = SchemaIndex::new(&doc);

    let operations_text = match &args.operations_path {
        Some(path) => Some(read_file(path)?),
        None => None,
    };
    let operations = match &operations_text {
        Some(text) => Some(querygen::parse_operations(text)?),
        None => None,
    };

    let mut data_types = JavaDataTypeEmitter::new(&config.types_package);
    let mut generator = ClientGenerator::new(&config, &schema, &mut data_types);
    let result = generator.generate_all(operations.as_ref());

    let written = write_units(&args.out_dir, &result)?;
    tracing::info!(
        queries = result.query_types.len(),
        projections = result.projections.len(),
        data_types = result.data_types.len(),
        files = written,
        "generation complete"
    );

    Ok(())
}

fn build_config(args: &Args) -> querygen::Result<CodeGenConfig> {
    let mut config = match &args.config_path {
        Some(path) => CodeGenConfig::from_json(&read_file(path)?)?,
        None => CodeGenConfig::new(),
    };

    if let Some(depth) = args.max_depth {
        config.max_projection_depth = depth;
    }
    if args.short_names {
        config.short_projection_names = true;
    }
    if args.skip_entities {
        config.skip_entity_queries = true;
    }
    if !args.include.is_empty() {
        config.include_operations = args.include.iter().cloned().collect();
    }
    if !args.exclude.is_empty() {
        config.exclude_fields = args.exclude.iter().cloned().collect();
    }
    if let Some(package) = &args.query_package {
        config.query_package = package.clone();
    }
    if let Some(package) = &args.projection_package {
        config.projection_package = package.clone();
    }
    if let Some(package) = &args.types_package {
        config.types_package = package.clone();
    }

    Ok(config)
}

fn load_schema(args: &Args) -> querygen::Result<String> {
    if let Some(path) = &args.schema_path {
        return read_file(path);
    }

    let url = args
        .url
        .as_ref()
        .ok_or_else(|| Error::Config("--url is required when --schema not provided".to_string()))?;
    let url = url::Url::parse(url)?;

    let mut headers = HeaderMap::new();
    if let Some(token) = &args.token {
        headers.insert(
            AUTHORIZATION,
            HeaderValue::from_str(&format!("Bearer {token}"))
                .map_err(|err| Error::Config(format!("invalid token header value: {err}")))?,
        );
    }

    let client = BlockingClient::new();
    let response = client.get(url).headers(headers).send()?;
    Ok(response.error_for_status()?.text()?)
}

fn read_file(path: &Path) -> querygen::Result<String> {
    fs::read_to_string(path)
        .map_err(|err| Error::Config(format!("failed to read {}: {err}", path.display())))
}

fn write_units(out_dir: &Path, result: &GenerationResult) -> querygen::Result<usize> {
    let mut written = 0;
    for unit in result.units() {
        let path = out_dir.join(render::unit_path(unit));
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }
        fs::write(&path, render::render_unit(unit))?;
        written += 1;
    }
    Ok(written)
}
