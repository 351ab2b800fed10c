use atomic_css::cli::{self, Cli};
use atomic_css::log_init::init_logger;
use clap::Parser;

#[tokio::main]
async fn main() {
    let cli = Cli::parse();
    if let Err(err) = init_logger(cli.verbose, cli.log_file.clone()) {
        eprintln!("{}", err);
    }

    let code = match cli::run(cli).await {
        Ok(code) => code,
        Err(err) => {
            eprintln!("error: {}", err);
            1
        }
    };
    std::process::exit(code);
}
