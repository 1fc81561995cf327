use clap::Parser;
use rujak::interfaces::cli::{run, Cli};

fn main() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter("info")
        .with_writer(std::io::stderr)
        .try_init();

    let cli = Cli::parse();

    match run(cli) {
        Ok(outcome) => match serde_json::to_string(&outcome) {
            Ok(json) => println!("{}", json),
            Err(e) => {
                eprintln!("{}", serde_json::json!({ "error": e.to_string() }));
                std::process::exit(1);
            }
        },
        Err(e) => {
            eprintln!("{}", serde_json::json!({ "error": e.to_string() }));
            std::process::exit(1);
        }
    }
}
