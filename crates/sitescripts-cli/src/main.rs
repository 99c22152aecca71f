use clap::Parser;
use sitescripts::{
    commands::install::{self, InstallArgs},
    init_tracing, logger, GlobalOpts,
};

#[derive(Parser)]
#[command(name = "sitescripts")]
#[command(version = env!("CARGO_PKG_VERSION"))]
#[command(
    about = "Regenerate console-script launchers for another interpreter",
    long_about = "sitescripts enumerates the Python distributions installed in system and user \
site-packages and writes their console_scripts and gui_scripts launchers into DEST, \
pointing at the chosen interpreter."
)]
struct Cli {
    #[command(flatten)]
    global: GlobalOpts,

    #[command(flatten)]
    install: InstallArgs,
}

fn main() {
    let cli = Cli::parse();

    init_tracing();
    if let Err(e) = logger::init_with_verbosity(
        cli.global.verbosity_level(),
        cli.global.quiet,
        cli.global.log_file.as_deref(),
    ) {
        eprintln!("Warning: Failed to initialize logger: {}", e);
    }

    if let Err(e) = install::handle_install(cli.install) {
        logger::error(&e.to_string());
        std::process::exit(1);
    }
}
