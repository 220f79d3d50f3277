//! Hunt command: randomize a preset and print or save the result.

use crate::commands::common::{apply_overrides, load_preset};
use clap::Args;
use howl_config::{HuntEngine, HuntMode, ParamStore, Preset};
use std::path::PathBuf;

#[derive(Args)]
pub struct HuntArgs {
    /// Intensity: stalk, chase, or kill
    #[arg(short, long, default_value = "stalk")]
    mode: HuntMode,

    /// Preset to start from (defaults when omitted)
    #[arg(short, long, value_name = "PRESET")]
    from: Option<PathBuf>,

    /// Parameter override applied before hunting, repeatable
    #[arg(long = "set", value_name = "ID=VALUE")]
    set: Vec<String>,

    /// Seed for a reproducible hunt
    #[arg(long)]
    seed: Option<u64>,

    /// Parameter id to leave alone, repeatable (replaces the default "gain")
    #[arg(long = "keep", value_name = "ID")]
    keep: Vec<String>,

    /// Name of the resulting preset
    #[arg(short, long)]
    name: Option<String>,

    /// Write the preset here instead of printing it
    #[arg(short, long, value_name = "OUTPUT")]
    output: Option<PathBuf>,
}

pub fn run(args: HuntArgs) -> anyhow::Result<()> {
    let store = ParamStore::new();
    let base = load_preset(&store, args.from.as_deref())?;
    apply_overrides(&store, &args.set)?;

    let mut engine = args.seed.map_or_else(HuntEngine::new, HuntEngine::with_seed);
    if !args.keep.is_empty() {
        engine = engine.with_exclusions(args.keep.iter().cloned());
    }
    let report = engine.hunt_store(&store, args.mode);

    let name = args
        .name
        .or_else(|| base.as_ref().map(|p| format!("{} ({:?})", p.name, args.mode)))
        .unwrap_or_else(|| format!("{:?} Hunt", args.mode));
    let mut preset = Preset::capture(&store, name);
    if let Some(base) = base {
        preset.description = base.description;
        preset.rhythm = base.rhythm;
    }

    let summary: Vec<String> = report
        .changes
        .iter()
        .map(|c| format!("{}: {:.3} -> {:.3}", c.id, c.from, c.to))
        .collect();

    if let Some(path) = &args.output {
        preset.save(path)?;
        println!("{:?}: {} parameter(s) changed", report.mode, report.len());
        for line in &summary {
            println!("  {line}");
        }
        println!("Saved {}", path.display());
    } else {
        println!("# {:?}: {} parameter(s) changed", report.mode, report.len());
        for line in &summary {
            println!("#   {line}");
        }
        print!("{}", preset.to_toml()?);
    }

    Ok(())
}
