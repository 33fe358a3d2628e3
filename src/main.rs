use clap::Parser;
use gcodeutil::{init_logging, Cli};

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    // Initialize logging
    init_logging(cli.verbose)?;

    // Rewrite the program and report the outcome
    match gcodeutil::run(&cli) {
        Ok(report) => println!("Modified file saved to: {}", report.output.display()),
        Err(e) if e.is_input_not_found() => println!("{}", e),
        Err(e) => {
            tracing::debug!("Run failed: {:?}", e);
            eprintln!("Error: {}", e);
        }
    }

    Ok(())
}
