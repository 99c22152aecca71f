//! Resolution of everything an install run needs before touching the disk
//!
//! Each setting follows the same precedence: command-line flag, then the
//! config file, then what the destination's virtual environment or the
//! filesystem reveals.

use crate::commands::install::InstallArgs;
use crate::errors::CliError;
use sitescripts_config::site_paths::{
    default_user_base, detect_platlibdir, system_site_packages, user_site_packages,
};
use sitescripts_config::venv_paths::{
    find_python_version, python_on_path, resolve_python_exe, venv_root_for_scripts_dir,
    PYVENV_CFG,
};
use sitescripts_config::{Config, PythonVersion, PyvenvCfg, SitePaths};
use sitescripts_launcher::{max_length, Phrasing, ScriptGenerator};
use sitescripts_logger as logger;
use std::path::{Path, PathBuf};

/// Resolved inputs of one install run
#[derive(Debug, Clone)]
pub struct InstallContext {
    pub dest: PathBuf,
    pub interpreter: String,
    pub site_paths: SitePaths,
    pub groups: Vec<String>,
    pub shebang_limit: usize,
}

impl InstallContext {
    pub fn resolve(args: &InstallArgs, config: &Config) -> Result<Self, CliError> {
        let venv_root = venv_root_for_scripts_dir(&args.dest);
        let pyvenv = venv_root
            .as_deref()
            .and_then(|root| PyvenvCfg::read(root).ok());

        if let (Some(root), Some(cfg)) = (venv_root.as_deref(), pyvenv.as_ref()) {
            if !cfg.include_system_site_packages()
                && config.require_system_site()
                && !args.allow_isolated
            {
                return Err(CliError::SystemSiteDisabled(root.join(PYVENV_CFG)));
            }
        }

        let interpreter = resolve_interpreter(args, config, venv_root.as_deref())?;
        let interpreter = interpreter
            .to_str()
            .map(ToString::to_string)
            .ok_or_else(|| CliError::NonUtf8Interpreter(interpreter.clone()))?;
        logger::debug(&format!("Using interpreter {}", interpreter));

        let site_paths = resolve_site_paths(args, config, pyvenv.as_ref(), Path::new(&interpreter))?;
        logger::debug(&format!("System site-packages: {:?}", site_paths.system));
        logger::debug(&format!("User site-packages: {:?}", site_paths.user));

        Ok(Self {
            dest: args.dest.clone(),
            interpreter,
            site_paths,
            groups: config.groups(),
            shebang_limit: max_length(config.shebang_limit()),
        })
    }

    pub fn generator(&self, phrasing: Phrasing) -> ScriptGenerator {
        ScriptGenerator::new(&self.dest, &self.interpreter)
            .with_shebang_limit(self.shebang_limit)
            .with_groups(self.groups.clone())
            .with_phrasing(phrasing)
    }
}

fn resolve_interpreter(
    args: &InstallArgs,
    config: &Config,
    venv_root: Option<&Path>,
) -> Result<PathBuf, CliError> {
    if let Some(python) = args.python.clone().or_else(|| config.python.clone()) {
        return Ok(python);
    }
    if let Some(root) = venv_root {
        match resolve_python_exe(root) {
            Ok(python) => return Ok(python),
            Err(e) => logger::debug(&format!("No interpreter in {}: {}", root.display(), e)),
        }
    }
    python_on_path().ok_or(CliError::InterpreterNotFound)
}

fn resolve_site_paths(
    args: &InstallArgs,
    config: &Config,
    pyvenv: Option<&PyvenvCfg>,
    interpreter: &Path,
) -> Result<SitePaths, CliError> {
    let want_user = !args.no_user_site && config.include_user_site();
    let need_system_discovery = args.system_site.is_empty();
    let need_user_discovery = want_user && args.user_site.is_empty();

    if !need_system_discovery && !need_user_discovery {
        return Ok(SitePaths {
            system: args.system_site.clone(),
            user: if want_user { args.user_site.clone() } else { Vec::new() },
        });
    }

    let base_prefix = args
        .base_prefix
        .clone()
        .or_else(|| config.base_prefix.clone())
        .or_else(|| pyvenv.and_then(PyvenvCfg::base_prefix))
        .or_else(|| interpreter.parent().and_then(Path::parent).map(Path::to_path_buf));

    let version = resolve_version(args, config, pyvenv, base_prefix.as_deref())?;

    let system = if need_system_discovery {
        let base_prefix = base_prefix
            .as_deref()
            .ok_or_else(|| CliError::BasePrefixNotFound(interpreter.to_path_buf()))?;
        let version =
            version.ok_or_else(|| CliError::PythonVersionNotFound(base_prefix.to_path_buf()))?;
        let platlibdir = detect_platlibdir(base_prefix, version);
        system_site_packages(base_prefix, version, platlibdir)
    } else {
        args.system_site.clone()
    };

    let user = if !want_user {
        Vec::new()
    } else if !need_user_discovery {
        args.user_site.clone()
    } else {
        match (resolve_user_base(args, config), version) {
            (Some(user_base), Some(version)) => vec![user_site_packages(&user_base, version)],
            _ => {
                logger::warn("Cannot locate user site-packages; only system packages are used");
                Vec::new()
            }
        }
    };

    Ok(SitePaths { system, user })
}

fn resolve_version(
    args: &InstallArgs,
    config: &Config,
    pyvenv: Option<&PyvenvCfg>,
    base_prefix: Option<&Path>,
) -> Result<Option<PythonVersion>, CliError> {
    if let Some(raw) = args
        .python_version
        .as_deref()
        .or(config.python_version.as_deref())
    {
        return Ok(Some(raw.parse()?));
    }
    if let Some(version) = pyvenv.and_then(PyvenvCfg::version) {
        return Ok(Some(version));
    }
    Ok(base_prefix.and_then(|prefix| find_python_version(prefix).ok()))
}

fn resolve_user_base(args: &InstallArgs, config: &Config) -> Option<PathBuf> {
    args.user_base
        .clone()
        .or_else(|| {
            std::env::var_os("PYTHONUSERBASE")
                .filter(|v| !v.is_empty())
                .map(PathBuf::from)
        })
        .or_else(|| config.user_base.clone())
        .or_else(default_user_base)
}
