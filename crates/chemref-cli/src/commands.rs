//! Subcommand implementations.

use chemref_model::{CcdCategory, Result, VariantSelect};
use chemref_pdb::{CcdQuery, category_from_name, ccd};
use chemref_store::{DataStore, Loader};
use chemref_update::{ensure_ccd, update_all, update_ccd, update_periodic_table};
use tracing::info;

use crate::cli::{CcdArgs, Cli, UpdateArgs, UpdateTarget, VariantArg};

/// Loader over the directory selected by `--data-dir`, the environment,
/// or the bundled default, in that order.
pub fn loader_from_cli(cli: &Cli) -> Loader {
    match &cli.data_dir {
        Some(dir) => Loader::new(DataStore::new(dir)),
        None => Loader::from_env(),
    }
}

pub fn run_get_periodic_table(loader: &Loader) -> Result<()> {
    let table = chemref_atom::periodic_table(loader)?;
    println!("{table}");
    Ok(())
}

pub fn run_get_autodock_types(loader: &Loader) -> Result<()> {
    let table = chemref_atom::autodock_atom_types(loader)?;
    println!("{table}");
    Ok(())
}

pub fn run_get_ccd(loader: &Loader, args: &CcdArgs) -> Result<()> {
    let category = category_from_name(&args.category)?;
    let mut query = CcdQuery::new(category).with_variant(match args.variant {
        VariantArg::Aa => VariantSelect::Aa,
        VariantArg::NonAa => VariantSelect::NonAa,
        VariantArg::Any => VariantSelect::Any,
    });
    if !args.comp_ids.is_empty() {
        query = query.with_component_ids(args.comp_ids.iter().cloned());
    }

    let table = if args.ensure {
        ensure_ccd(loader, &query)?
    } else {
        ccd(loader, &query)?.into_table(loader)?
    };
    println!("{table}");
    Ok(())
}

pub fn run_update(loader: &Loader, args: &UpdateArgs) -> Result<()> {
    match args.target {
        UpdateTarget::Atom => {
            let path = update_periodic_table(loader)?;
            info!(path = %path.display(), "periodic table written");
        }
        UpdateTarget::Pdb => {
            let report = update_ccd(loader)?;
            print_update_report(&report);
        }
        UpdateTarget::All => {
            update_all(loader)?;
        }
    }
    Ok(())
}

pub fn run_categories() {
    for category in CcdCategory::ALL {
        println!("{category}");
    }
}

fn print_update_report(report: &chemref_update::CcdUpdateReport) {
    println!("{} files written", report.written.len());
    for entry in report.problems.summary() {
        println!(
            "{}/{}: {} validation issues, {} duplicate rows, {} merge conflicts",
            entry.stage,
            entry.category,
            entry.validation_issues,
            entry.duplicate_rows,
            entry.merge_conflicts
        );
    }
}
