use std::error::Error;
use std::io::{self, Write};
use std::process::ExitCode;

use clap::Parser;
use feishu_im::{Config, FeishuClient, ReceiveIdType};
use log::LevelFilter;

const USAGE: [&str; 2] = [
    "This is a Feishu client example.",
    "Pass <RECEIVE_ID_TYPE> <RECEIVE_ID> <MESSAGE> to send a text message \
     (RECEIVE_ID_TYPE: open_id, user_id, union_id, email or chat_id).",
];

#[derive(Parser, Debug)]
#[command(
    name = "feishu-send",
    about = "Send a text message through the Feishu/Lark Open Platform"
)]
struct Cli {
    /// How the recipient is addressed: open_id, user_id, union_id, email or chat_id
    #[arg(requires = "receive_id")]
    receive_id_type: Option<ReceiveIdType>,

    /// Recipient id, e.g. ou_xxx for open_id or oc_xxx for chat_id
    #[arg(requires = "message")]
    receive_id: Option<String>,

    /// Text to send
    message: Option<String>,
}

impl Cli {
    fn target(self) -> Option<(ReceiveIdType, String, String)> {
        Some((self.receive_id_type?, self.receive_id?, self.message?))
    }
}

fn print_usage(out: &mut impl Write) -> io::Result<()> {
    for line in USAGE {
        writeln!(out, "{line}")?;
    }
    Ok(())
}

fn init_logging(level: LevelFilter) {
    env_logger::Builder::new()
        .filter_level(level)
        .parse_default_env()
        .init();
}

fn error_message(err: &dyn Error) -> String {
    format!("error: {err}")
}

async fn run(cli: Cli) -> Result<(), Box<dyn Error>> {
    let Some((receive_id_type, receive_id, message)) = cli.target() else {
        print_usage(&mut io::stdout().lock())?;
        return Ok(());
    };

    let config = Config::from_env()?;
    init_logging(config.log_level);

    let client = FeishuClient::from_config(&config)?;
    client
        .send_text_message(receive_id_type, receive_id, message)
        .await?;
    Ok(())
}

#[tokio::main]
async fn main() -> ExitCode {
    dotenvy::dotenv().ok();

    match run(Cli::parse()).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            eprintln!("{}", error_message(&*err));
            ExitCode::FAILURE
        }
    }
}
