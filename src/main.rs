use nexus_engine::cli::{parse, Cli};
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

fn init_tracing(cli: &Cli) {
    let filter = EnvFilter::try_from_env("NEXUS_LOG").unwrap_or_else(|_| {
        EnvFilter::new(if cli.quiet {
            "error"
        } else {
            match cli.verbose {
                0 => "warn",
                1 => "nexus_engine=info,warn",
                _ => "nexus_engine=debug,info",
            }
        })
    });
    tracing_subscriber::registry()
        .with(filter)
        .with(fmt::layer().compact().with_writer(std::io::stderr))
        .init();
}

fn main() {
    let cli = parse();
    init_tracing(&cli);
    let code = nexus_engine::app::run_cli(cli);
    if code != 0 {
        std::process::exit(code);
    }
}
