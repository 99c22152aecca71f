//! Launcher regeneration
//!
//! Without dependency names every distribution found is processed, system
//! packages first and then user packages. With names, only the dependency
//! closure of those names is processed, in resolution order.

use crate::context::InstallContext;
use crate::errors::CliError;
use clap::Args;
use sitescripts_config::Config;
use sitescripts_launcher::Phrasing;
use sitescripts_logger as logger;
use sitescripts_metadata::{resolve, Distribution, Requirement, SitePartition, WorkingSet};
use std::path::PathBuf;
use tracing::debug;

#[derive(Args, Debug, Clone)]
pub struct InstallArgs {
    /// Directory the launchers are written into (e.g. <venv>/bin)
    #[arg(value_name = "DEST")]
    pub dest: PathBuf,

    /// Only regenerate launchers for these distributions and their dependencies
    #[arg(value_name = "DEPS")]
    pub deps: Vec<String>,

    /// Interpreter written into the launchers' shebang
    #[arg(long, value_name = "PATH")]
    pub python: Option<PathBuf>,

    /// Prefix of the base installation whose site-packages are scanned
    #[arg(long, value_name = "DIR")]
    pub base_prefix: Option<PathBuf>,

    /// Python version (X.Y) of the base installation
    #[arg(long, value_name = "X.Y")]
    pub python_version: Option<String>,

    /// System site-packages directory to scan instead of the discovered ones
    #[arg(long = "system-site", value_name = "DIR")]
    pub system_site: Vec<PathBuf>,

    /// User site-packages directory to scan instead of the discovered one
    #[arg(long = "user-site", value_name = "DIR")]
    pub user_site: Vec<PathBuf>,

    /// Ignore user site-packages
    #[arg(long)]
    pub no_user_site: bool,

    /// Proceed even if the environment does not include system site-packages
    #[arg(long)]
    pub allow_isolated: bool,

    /// User base directory (defaults to PYTHONUSERBASE or ~/.local)
    #[arg(long, value_name = "DIR")]
    pub user_base: Option<PathBuf>,
}

pub fn handle_install(args: InstallArgs) -> Result<(), CliError> {
    let config = Config::load()?;
    let context = InstallContext::resolve(&args, &config)?;
    debug!("Resolved install context: {:?}", context);

    let written = if args.deps.is_empty() {
        install_partitioned(&context)?
    } else {
        install_dependencies(&context, &args.deps)?
    };

    logger::success(&format!(
        "Wrote {} launcher(s) into {}",
        written,
        context.dest.display()
    ));
    Ok(())
}

/// Generate for system-only distributions, then for user distributions
fn install_partitioned(context: &InstallContext) -> Result<usize, CliError> {
    let partition =
        SitePartition::from_paths(&context.site_paths.system, &context.site_paths.user)?;
    let generator = context.generator(Phrasing::Generating);
    let mut written = 0;

    logger::info("generating console scripts of system packages");
    for distribution in sorted_by_key(&partition.system) {
        written += generator.generate(distribution)?.len();
    }

    logger::info("generating console scripts of user packages");
    for distribution in sorted_by_key(&partition.user) {
        written += generator.generate(distribution)?.len();
    }

    Ok(written)
}

/// Generate for the dependency closure of `deps`
fn install_dependencies(context: &InstallContext, deps: &[String]) -> Result<usize, CliError> {
    let universe =
        SitePartition::from_paths(&context.site_paths.system, &context.site_paths.user)?
            .universe();
    let requirements = deps
        .iter()
        .map(|dep| Requirement::parse(dep))
        .collect::<Result<Vec<_>, _>>()?;

    let closure = resolve(&requirements, &universe)?;
    logger::info(&format!(
        "installing console scripts of {}",
        closure.keys().collect::<Vec<_>>().join(", ")
    ));

    let generator = context.generator(Phrasing::Installing);
    let mut written = 0;
    for distribution in closure.iter() {
        written += generator.generate(distribution)?.len();
    }

    Ok(written)
}

fn sorted_by_key(working_set: &WorkingSet) -> Vec<&Distribution> {
    let mut distributions: Vec<&Distribution> = working_set.iter().collect();
    distributions.sort_by(|a, b| a.key().cmp(b.key()));
    distributions
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sorted_by_key() {
        let mut working_set = WorkingSet::new();
        working_set.insert(Distribution::new("Zeta", "1.0", "/site"));
        working_set.insert(Distribution::new("alpha", "1.0", "/site"));
        working_set.insert(Distribution::new("Mid_Pkg", "1.0", "/site"));

        let keys: Vec<&str> = sorted_by_key(&working_set)
            .iter()
            .map(|d| d.key())
            .collect();
        assert_eq!(keys, ["alpha", "mid-pkg", "zeta"]);
    }
}
