//! Question answering from the terminal

use std::io::Write;

use tokio::io::AsyncBufReadExt;
use tokio::io::BufReader;

use crate::cli::commands::OptionArgs;
use crate::cli::output::print_error;
use crate::cli::output::print_info;
use crate::services::Services;
use crate::session::ChatSession;
use crate::AppConfig;
use crate::Result;

fn print_fragment(fragment: &str) {
    print!("{fragment}");
    let _ = std::io::stdout().flush();
}

/// Answer one question, printing fragments as they arrive
pub async fn handle_ask(config: &AppConfig, question: &str, options: &OptionArgs) -> Result<()> {
    let options = options.apply(&config.chat);
    options.validate()?;

    let services = Services::connect(config).await?;
    let mut session = ChatSession::new();

    let result = services
        .pipeline()
        .respond(&mut session, question, &options, |fragment, _| print_fragment(fragment))
        .await;
    println!();

    services.shutdown().await;
    result.map(|_| ())
}

/// Interactive loop over a single session
///
/// `/reset` starts a new transcript, `/exit` (or end of input) quits. A failed
/// request is reported and the loop continues.
pub async fn handle_chat(config: &AppConfig, options: &OptionArgs) -> Result<()> {
    let options = options.apply(&config.chat);
    options.validate()?;

    let services = Services::connect(config).await?;
    let pipeline = services.pipeline();
    let mut session = ChatSession::new();

    print_info("Type a question, /reset for a new conversation, /exit to quit.");
    let mut lines = BufReader::new(tokio::io::stdin()).lines();

    loop {
        print!("\n> ");
        let _ = std::io::stdout().flush();

        let Some(line) = lines.next_line().await? else {
            break;
        };
        match line.trim() {
            "" => continue,
            "/exit" | "/quit" => break,
            "/reset" => {
                session = ChatSession::new();
                print_info("Started a new conversation");
                continue;
            }
            _ => {}
        }

        let result = pipeline
            .respond(&mut session, &line, &options, |fragment, _| print_fragment(fragment))
            .await;
        println!();
        if let Err(e) = result {
            print_error(&format!("{} error: {e}", e.kind().as_str()));
        }
    }

    services.shutdown().await;
    Ok(())
}
