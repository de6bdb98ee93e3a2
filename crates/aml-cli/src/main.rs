//! `aml` - compiles an AML message to HTML.

use std::io::{self, Read};
use std::path::{Path, PathBuf};
use std::process::ExitCode;

use aml_config::Config;
use aml_engine::{
    CedictDictionary, Dictionary, LinkResolver, NoDictionary, ParseOptions, PrefixResolver,
    RenderOptions, Renderer, Unresolved, compile_with,
};
use anyhow::{Context, Result, bail};
use clap::Parser;

#[derive(Parser)]
#[command(name = "aml")]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Message file to compile; `-` or nothing reads stdin
    input: Option<PathBuf>,

    /// Configuration file path
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Print only the part before the first --MORE--
    #[arg(long)]
    summary: bool,

    /// Print html, summary, truncation and diagnostics as JSON
    #[arg(long)]
    json: bool,

    /// Attach every position to chess diagrams
    #[arg(long)]
    replay: bool,
}

fn main() -> ExitCode {
    env_logger::Builder::from_default_env()
        .filter_level(log::LevelFilter::Info)
        .init();

    match run(Cli::parse()) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            log::error!("{e:#}");
            eprintln!("Error: {e:#}");
            ExitCode::FAILURE
        }
    }
}

fn run(cli: Cli) -> Result<()> {
    let config = load_config(cli.config.as_deref())?;
    let text = read_input(cli.input.as_deref(), config.max_input_bytes)?;

    let dictionary: Box<dyn Dictionary> = match &config.dictionary_path {
        Some(path) => Box::new(
            CedictDictionary::load(path)
                .with_context(|| format!("loading dictionary {}", path.display()))?,
        ),
        None => Box::new(NoDictionary),
    };
    let links: Box<dyn LinkResolver> = match &config.wiki_base_url {
        Some(base) => Box::new(PrefixResolver::new(base.clone())),
        None => Box::new(Unresolved),
    };

    let renderer = Renderer::new(&*dictionary, &*links).with_options(RenderOptions {
        chess_replay: cli.replay || config.chess_replay,
        max_word_len: config.max_word_len,
        new_page_url: config.new_page_url.clone(),
    });
    let parse_options = ParseOptions {
        max_depth: config.max_nesting_depth,
    };

    let rendered = compile_with(&text, &parse_options, &renderer);
    for diagnostic in &rendered.diagnostics {
        log::warn!("{diagnostic}");
    }

    if cli.json {
        println!("{}", serde_json::to_string_pretty(&rendered)?);
    } else if cli.summary {
        println!("{}", rendered.summary.as_deref().unwrap_or(&rendered.html));
    } else {
        println!("{}", rendered.html);
    }
    Ok(())
}

fn load_config(path: Option<&Path>) -> Result<Config> {
    let loaded = match path {
        Some(path) => {
            log::info!("Config path: {}", path.display());
            let config = Config::load_from_path(path)?;
            if config.is_none() {
                bail!("config file {} does not exist", path.display());
            }
            config
        }
        None => Config::load()?,
    };
    Ok(loaded.unwrap_or_else(|| {
        log::debug!("no config file found, using defaults");
        Config::default()
    }))
}

/// Reads the message, refusing anything over `limit` bytes.
fn read_input(path: Option<&Path>, limit: usize) -> Result<String> {
    let mut bytes = Vec::new();
    match path {
        Some(path) if path != Path::new("-") => {
            let file = std::fs::File::open(path)
                .with_context(|| format!("opening {}", path.display()))?;
            file.take(limit as u64 + 1)
                .read_to_end(&mut bytes)
                .with_context(|| format!("reading {}", path.display()))?;
        }
        _ => {
            io::stdin()
                .lock()
                .take(limit as u64 + 1)
                .read_to_end(&mut bytes)
                .context("reading stdin")?;
        }
    }
    if bytes.len() > limit {
        bail!("input is larger than the {limit} byte limit");
    }
    String::from_utf8(bytes).context("input is not valid UTF-8")
}
