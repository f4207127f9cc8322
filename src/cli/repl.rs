//! Line-oriented chat loop over stdin/stdout.

use std::io::Write;

use tokio::io::{AsyncBufReadExt, BufReader};

use super::Cli;
use crate::agent::Session;
use crate::config::ClientConfig;
use crate::error::ChatError;
use crate::types::ChatModel;

/// What a single input line asks the loop to do.
#[derive(Debug, PartialEq, Eq)]
pub enum ReplCommand<'a> {
    Quit,
    History,
    Skip,
    Say(&'a str),
}

pub fn parse_line(line: &str) -> ReplCommand<'_> {
    let trimmed = line.trim();
    if trimmed.is_empty() {
        return ReplCommand::Skip;
    }
    if trimmed.eq_ignore_ascii_case("exit") || trimmed.eq_ignore_ascii_case("quit") {
        return ReplCommand::Quit;
    }
    if trimmed == "/history" {
        return ReplCommand::History;
    }
    ReplCommand::Say(trimmed)
}

/// Resolve configuration: config file and env, then CLI flags on top.
pub fn resolve_config(cli: &Cli) -> Result<ClientConfig, ChatError> {
    let path = cli.config.clone().unwrap_or_else(ClientConfig::default_path);
    let mut config = ClientConfig::load_from(path)?;

    if let Some(system) = &cli.system {
        config = config.with_persona(system.clone());
    }

    let mut defaults = config.defaults().clone();
    if let Some(model) = &cli.model {
        defaults.model = ChatModel::from(model.clone());
    }
    if let Some(t) = cli.temperature {
        defaults.temperature = t;
    }
    if let Some(max) = cli.max_tokens {
        defaults.max_tokens = max;
    }
    defaults.validate()?;

    Ok(config.with_defaults(defaults))
}

/// Run the chat loop until EOF or `exit`.
pub async fn run(cli: Cli) -> Result<(), ChatError> {
    let config = resolve_config(&cli)?;
    let session = Session::from_config(&config)?;
    let conversation = session.create_conversation();

    println!("seekchat ({}) - type \"exit\" to end the session", session.defaults().model);

    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    loop {
        print!("> ");
        std::io::stdout().flush()?;

        let Some(line) = lines.next_line().await? else {
            break;
        };

        match parse_line(&line) {
            ReplCommand::Quit => break,
            ReplCommand::Skip => continue,
            ReplCommand::History => {
                println!("{} messages in history", conversation.history_len());
            }
            ReplCommand::Say(text) => {
                match session.chat(text, &conversation, session.defaults()).await {
                    Ok(reply) if reply.is_empty() => println!("(no reply)"),
                    Ok(reply) => println!("{}\n", reply.all_content()),
                    Err(e) => eprintln!("Error: {e}"),
                }
            }
        }
    }

    Ok(())
}
