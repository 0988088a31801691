//! Veneer command-line front end.
//!
//! `list <dir>` shows the skins found in a directory, `check <skin>`
//! reports what a load recovered from, and `render <skin> <out.png>`
//! lays out one layout headless and writes it as a PNG.

mod loader;
mod snapshot;

use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result, bail};

use loader::FsLoader;
use veneer_engine::{SkinEngine, SoftwareSurface};
use veneer_skin::{Conditions, Skin, TargetTable, discover_skins, parse_skin};
use veneer_types::config::EngineConfig;

const USAGE: &str = "usage:
  veneer list <dir>
  veneer check <skin> [--flag NAME]...
  veneer render <skin> <out.png> [--layout NAME] [--geometry FILE] [--config FILE] [--flag NAME]...";

#[derive(Debug, Default, PartialEq)]
struct Options {
    positional: Vec<String>,
    layout: Option<String>,
    geometry: Option<PathBuf>,
    config: Option<PathBuf>,
    flags: Vec<String>,
}

fn parse_args(args: impl IntoIterator<Item = String>) -> Result<Options> {
    let mut opts = Options::default();
    let mut args = args.into_iter();
    while let Some(arg) = args.next() {
        let mut value = |name: &str| {
            args.next()
                .with_context(|| format!("{name} needs a value"))
        };
        match arg.as_str() {
            "--layout" => opts.layout = Some(value("--layout")?),
            "--geometry" => opts.geometry = Some(value("--geometry")?.into()),
            "--config" => opts.config = Some(value("--config")?.into()),
            "--flag" => opts.flags.push(value("--flag")?),
            s if s.starts_with("--") => bail!("unknown option {s}"),
            _ => opts.positional.push(arg),
        }
    }
    Ok(opts)
}

fn load_config(path: Option<&Path>) -> Result<EngineConfig> {
    let Some(path) = path else {
        return Ok(EngineConfig::default());
    };
    let text = fs::read_to_string(path).with_context(|| format!("reading {}", path.display()))?;
    Ok(EngineConfig::from_toml(&text)?)
}

fn load_skin(path: &Path, flags: &[String], config: &EngineConfig) -> Result<Skin> {
    let source = fs::read_to_string(path).with_context(|| format!("reading {}", path.display()))?;
    let root = path.parent().unwrap_or_else(|| Path::new("."));
    let mut loader = FsLoader::new(root);
    let conditions: Conditions = flags.iter().map(String::as_str).collect();
    let skin = parse_skin(&source, &conditions, &TargetTable::new(), &mut loader, config)
        .with_context(|| format!("loading {}", path.display()))?;
    for d in &skin.diagnostics {
        log::warn!("{}: {d}", path.display());
    }
    Ok(skin)
}

fn list(dir: &Path) -> Vec<String> {
    discover_skins(dir)
        .into_iter()
        .map(|(name, path)| format!("{name}\t{}", path.display()))
        .collect()
}

fn check(path: &Path, opts: &Options) -> Result<Skin> {
    let config = load_config(opts.config.as_deref())?;
    let skin = load_skin(path, &opts.flags, &config)?;
    println!(
        "{} ({} layout(s): {}), {} diagnostic(s)",
        skin.name,
        skin.layouts.len(),
        skin.layout_names().collect::<Vec<_>>().join(", "),
        skin.diagnostics.len()
    );
    Ok(skin)
}

fn render(path: &Path, out: &Path, opts: &Options) -> Result<()> {
    let config = load_config(opts.config.as_deref())?;
    let skin = load_skin(path, &opts.flags, &config)?;
    let mut engine = SkinEngine::new(skin, config);

    let mut preferred = None;
    if let Some(geometry) = &opts.geometry
        && geometry.exists()
    {
        let text = fs::read_to_string(geometry)?;
        preferred = engine.restore_geometry(&text);
    }
    if let Some(name) = &opts.layout {
        let index = engine
            .skin()
            .layout_index(name)
            .with_context(|| format!("no layout named '{name}'"))?;
        preferred = Some(index);
    }

    let mut host = SoftwareSurface::new(snapshot::SCREEN.0, snapshot::SCREEN.1);
    engine.start(preferred, &mut host)?;
    let bitmap = snapshot::render(&engine, &mut host)?;
    snapshot::save_png(out, &bitmap)?;
    log::info!(
        "rendered '{}' ({}x{}) to {}",
        engine.active_layout().map_or("", |l| l.name.as_str()),
        bitmap.width,
        bitmap.height,
        out.display()
    );

    if let Some(geometry) = &opts.geometry {
        fs::write(geometry, engine.save_geometry()?)
            .with_context(|| format!("writing {}", geometry.display()))?;
    }
    Ok(())
}

fn main() -> Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let mut args = std::env::args().skip(1);
    let command = args.next().unwrap_or_default();
    let opts = parse_args(args)?;
    match (command.as_str(), opts.positional.as_slice()) {
        ("list", [dir]) => {
            for line in list(Path::new(dir)) {
                println!("{line}");
            }
        },
        ("check", [skin]) => {
            check(Path::new(skin), &opts)?;
        },
        ("render", [skin, out]) => render(Path::new(skin), Path::new(out), &opts)?,
        _ => bail!("{USAGE}"),
    }
    Ok(())
}
