use wavi_core::{ChatOutcome, ChatSession, Config};

use crate::common::{self, CliResult};

/// Interactive session; an empty line or end of input quits.
pub fn run(config: &Config) -> CliResult {
    let rt = common::runtime()?;
    let mut today = common::controller(config)?;
    let mut chat = ChatSession::new();
    println!("Describe the habit you want to build. Empty line quits.");

    while let Some(text) = common::prompt("you")? {
        if text.is_empty() {
            break;
        }
        match rt.block_on(chat.send(today.gateway(), &text))? {
            ChatOutcome::FollowUp(question) => println!("wavi: {question}"),
            ChatOutcome::Failed(message) => {
                eprintln!("wavi: {message}");
                chat.reset();
            }
            ChatOutcome::DraftReady(draft) => {
                println!(
                    "wavi: {} {} on {} from {} to {}",
                    draft.icon, draft.name, draft.days_of_week, draft.start_time, draft.end_time
                );
                let answer = common::prompt("create it? [y/N]")?.unwrap_or_default();
                if answer.eq_ignore_ascii_case("y") {
                    rt.block_on(today.create_habit(&draft))?;
                    println!("habit created");
                    break;
                }
                tracing::debug!(turns = chat.history().len(), "draft declined");
                chat.reset();
            }
        }
    }
    Ok(())
}
