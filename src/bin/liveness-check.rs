use clap::Parser;

use liveness_server::http::{fetch_url, PlainStatus, StatusTemplate};

#[derive(Parser)]
#[command(name = "liveness-check")]
#[command(about = "Probe a liveness server and exit non-zero unless it is live", long_about = None)]
struct Cli {
    #[arg(short, long, default_value = "http://127.0.0.1:7701/")]
    url: String,

    /// Require the reported label to match
    #[arg(short, long)]
    expect: Option<String>,
}

#[tokio::main]
async fn main() {
    let cli = Cli::parse();

    let body = match fetch_url(&cli.url).await {
        Ok(body) => body,
        Err(e) => {
            eprintln!("Error: {}", e);
            std::process::exit(1);
        }
    };
    let body = String::from_utf8_lossy(&body);
    print!("{}", body);

    if let Some(label) = cli.expect {
        let expected = PlainStatus.render(&label);
        if body != expected {
            eprintln!("Error: expected {:?}, got {:?}", expected, body);
            std::process::exit(1);
        }
    }
}
