use clap::Parser;
use tickoff::cli::commands::Cli;
use tickoff::cli::settings;
use tickoff::logging;

fn main() {
    let cli = Cli::parse();
    if let Err(e) = run(&cli) {
        eprintln!("error: {}", e);
        std::process::exit(1);
    }
}

fn run(cli: &Cli) -> Result<(), Box<dyn std::error::Error>> {
    let settings = settings::resolve(cli)?;
    // Dropping the guard flushes buffered log lines, so it lives until return
    let _log_guard = logging::init_logging(&settings.log_filter, &settings.data_dir)?;

    tickoff::tui::run(&settings).inspect_err(|e| {
        tracing::error!(error = %e, "tick exited with an error");
    })
}
