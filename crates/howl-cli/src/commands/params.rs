//! Parameter listing command.

#![allow(clippy::print_literal)] // Table headers use literal strings

use clap::Args;
use howl_config::{ParamScale, descriptors};

#[derive(Args)]
pub struct ParamsArgs {
    /// Only show parameters in this group (e.g. "Filter")
    #[arg(short, long)]
    group: Option<String>,
}

fn format_value(value: f32, step: f32) -> String {
    if step >= 1.0 {
        format!("{value:.0}")
    } else {
        format!("{value:.3}")
    }
}

pub fn run(args: ParamsArgs) -> anyhow::Result<()> {
    let shown: Vec<_> = descriptors()
        .iter()
        .filter(|d| {
            args.group
                .as_deref()
                .is_none_or(|g| d.group.eq_ignore_ascii_case(g))
        })
        .collect();

    if shown.is_empty() {
        anyhow::bail!(
            "No parameters in group '{}'",
            args.group.as_deref().unwrap_or_default()
        );
    }

    println!(
        "  {:16}  {:18}  {:>10}  {:>10}  {:>10}  {:10}  {}",
        "Id", "Name", "Min", "Max", "Default", "Group", "Unit"
    );
    println!(
        "  {:16}  {:18}  {:>10}  {:>10}  {:>10}  {:10}  {}",
        "--", "----", "---", "---", "-------", "-----", "----"
    );
    for desc in &shown {
        let log = if desc.scale == ParamScale::Logarithmic {
            " (log)"
        } else {
            ""
        };
        println!(
            "  {:16}  {:18}  {:>10}  {:>10}  {:>10}  {:10}  {}{}",
            desc.id,
            desc.name,
            format_value(desc.min, desc.step),
            format_value(desc.max, desc.step),
            format_value(desc.default, desc.step),
            desc.group,
            desc.unit.suffix().trim(),
            log
        );
    }
    println!();
    println!("{} parameter(s)", shown.len());

    Ok(())
}
