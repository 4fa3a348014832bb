//! Interactive terminal debate client
//!
//! Generates (or loads) a cast for a debate question, then runs the debate one
//! user action at a time.
//!
//! Usage: cargo run --bin symposium -- --topic "Should cities ban cars?"

use anyhow::{anyhow, Result};
use clap::Parser;
use dialoguer::{Confirm, Input, Select};
use dotenvy::dotenv;
use log::info;
use std::path::PathBuf;
use std::sync::Arc;

use symposium::core::{default_transcript_path, Config, DebateError, DISPLAY_WIDTH};
use symposium::features::characters::CastFile;
use symposium::features::debate::{
    DebateEvent, DebateOrchestrator, DebateSession, StepReport, UserAction,
};
use symposium::features::oracle::{OpenAiOracle, Oracle, RetryPolicy};
use symposium::features::transcript::render_transcript;
use symposium::features::UsageTracker;

#[derive(Parser, Debug)]
#[command(name = "symposium", about = "Run a moderated debate between generated characters")]
struct Args {
    /// Debate question (prompted for if omitted)
    #[arg(long)]
    topic: Option<String>,

    /// YAML cast file to use instead of generating characters
    #[arg(long)]
    cast: Option<PathBuf>,

    /// JSON transcript to resume from (needs the cast it was recorded with)
    #[arg(long, requires = "cast")]
    load: Option<PathBuf>,
}

enum MenuChoice {
    Action(UserAction),
    SaveTranscript,
    LoadTranscript,
    SaveCast,
    Quit,
}

fn menu() -> Vec<(String, MenuChoice)> {
    let mut items: Vec<(String, MenuChoice)> = UserAction::all()
        .iter()
        .map(|action| (action.label().to_string(), MenuChoice::Action(*action)))
        .collect();
    items.push(("Save transcript".to_string(), MenuChoice::SaveTranscript));
    items.push(("Load transcript".to_string(), MenuChoice::LoadTranscript));
    items.push(("Save cast".to_string(), MenuChoice::SaveCast));
    items.push(("Quit".to_string(), MenuChoice::Quit));
    items
}

#[tokio::main]
async fn main() -> Result<()> {
    // Load environment variables from .env file
    dotenv().ok();
    let args = Args::parse();

    let config = Config::from_env()?;

    // The openai crate reads its key from the environment, not from our config
    std::env::set_var("OPENAI_API_KEY", &config.openai_api_key);
    std::env::set_var("OPENAI_KEY", &config.openai_api_key);

    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(&config.log_level))
        .init();

    info!("Starting Symposium with model {}", config.openai_model);

    let usage_tracker = UsageTracker::new();
    let oracle: Arc<dyn Oracle> = Arc::new(
        OpenAiOracle::new(&config.openai_model)
            .with_retry(RetryPolicy::with_attempts(config.openai_max_attempts))
            .with_usage_tracker(usage_tracker.clone()),
    );
    let orchestrator = DebateOrchestrator::new(oracle, config.debate.clone());

    let cast = args.cast.as_deref().map(CastFile::load).transpose()?;
    let topic = match args
        .topic
        .or_else(|| cast.as_ref().and_then(|c| c.topic.clone()))
    {
        Some(topic) if !topic.trim().is_empty() => topic.trim().to_string(),
        _ => prompt_topic()?,
    };

    let mut session = open_session(&orchestrator, &topic, cast).await?;
    if let Some(path) = &args.load {
        session.load(path)?;
    }

    print_header(&session);
    run(&orchestrator, &mut session, &config).await?;

    println!("\n{}", usage_tracker.summary());
    Ok(())
}

fn prompt_topic() -> Result<String> {
    let topic: String = Input::new()
        .with_prompt("Debate question")
        .validate_with(|input: &String| -> Result<(), String> {
            if input.trim().is_empty() {
                return Err("The question cannot be empty".to_string());
            }
            Ok(())
        })
        .interact_text()?;
    Ok(topic.trim().to_string())
}

/// Build the session from a cast file, or keep asking the oracle for a cast
/// until one is usable or the user gives up.
async fn open_session(
    orchestrator: &DebateOrchestrator,
    topic: &str,
    cast: Option<CastFile>,
) -> Result<DebateSession> {
    if let Some(cast) = cast {
        return Ok(DebateSession::new(topic, cast.characters)?);
    }

    loop {
        println!("Generating characters for \"{topic}\"...");
        match orchestrator.start_session(topic).await {
            Ok(session) => return Ok(session),
            Err(e) => {
                match e.downcast_ref::<DebateError>() {
                    Some(DebateError::NoCharacters) => {
                        eprintln!("⚠️ No usable characters were generated.")
                    }
                    _ => eprintln!("⚠️ Character generation failed: {e:#}"),
                }
                let retry = Confirm::new()
                    .with_prompt("Try again?")
                    .default(true)
                    .interact()?;
                if !retry {
                    return Err(anyhow!("Cannot start a debate without characters"));
                }
            }
        }
    }
}

fn print_header(session: &DebateSession) {
    println!("\n=== {} ===\n", session.topic());
    println!("Participants:");
    for character in session.characters() {
        println!("  • {}: {}", character.label(), character.summary);
    }
    println!();
    println!(
        "{}",
        render_transcript(session.directory(), session.log(), DISPLAY_WIDTH)
    );
}

async fn run(
    orchestrator: &DebateOrchestrator,
    session: &mut DebateSession,
    config: &Config,
) -> Result<()> {
    let items = menu();
    let labels: Vec<&str> = items.iter().map(|(label, _)| label.as_str()).collect();

    loop {
        println!();
        let index = Select::new()
            .with_prompt(format!("Turn {}", session.turn_count()))
            .items(&labels)
            .default(0)
            .interact()?;

        match &items[index].1 {
            MenuChoice::Action(action) => {
                session.begin_action(*action);
                let Some(event) = compose_event(session, *action)? else {
                    session.cancel_action();
                    continue;
                };
                match orchestrator.step(session, event).await {
                    Ok(report) => print_report(session, &report),
                    Err(e) => {
                        session.cancel_action();
                        eprintln!("⚠️ {e:#}");
                    }
                }
            }
            MenuChoice::SaveTranscript => {
                let default = default_transcript_path(
                    &config.transcript_dir,
                    session.topic(),
                    &session.id().to_string(),
                );
                let path: String = Input::new()
                    .with_prompt("Save transcript to")
                    .default(default.display().to_string())
                    .interact_text()?;
                match session.save(&PathBuf::from(&path)) {
                    Ok(()) => println!("💾 Saved {} messages to {path}", session.log().len()),
                    Err(e) => eprintln!("⚠️ Could not save transcript: {e:#}"),
                }
            }
            MenuChoice::LoadTranscript => {
                let path: String = Input::new()
                    .with_prompt("Load transcript from")
                    .interact_text()?;
                match session.load(&PathBuf::from(&path)) {
                    Ok(()) => {
                        println!(
                            "{}",
                            render_transcript(session.directory(), session.log(), DISPLAY_WIDTH)
                        );
                    }
                    Err(e) => eprintln!("⚠️ Could not load transcript: {e:#}"),
                }
            }
            MenuChoice::SaveCast => {
                let path: String = Input::new()
                    .with_prompt("Save cast to")
                    .default("cast.yaml".to_string())
                    .interact_text()?;
                let cast = CastFile::new(
                    Some(session.topic().to_string()),
                    session.characters().to_vec(),
                );
                match cast.save(&PathBuf::from(&path)) {
                    Ok(()) => println!("💾 Saved cast to {path}"),
                    Err(e) => eprintln!("⚠️ Could not save cast: {e:#}"),
                }
            }
            MenuChoice::Quit => break,
        }
    }

    Ok(())
}

/// Ask for whatever the action needs. `None` means the user backed out.
fn compose_event(session: &DebateSession, action: UserAction) -> Result<Option<DebateEvent>> {
    let event = match action {
        UserAction::Continue => DebateEvent::ContinueDebate,
        UserAction::JumpIn => {
            let text: String = Input::new()
                .with_prompt("Your message")
                .allow_empty(true)
                .interact_text()?;
            DebateEvent::UserJumpIn(text)
        }
        UserAction::ReplyTo => {
            let mut labels: Vec<String> = session.characters().iter().map(|c| c.label()).collect();
            labels.push("Back".to_string());
            let index = Select::new()
                .with_prompt("Reply to")
                .items(&labels)
                .default(0)
                .interact()?;
            let Some(character) = session.characters().get(index) else {
                return Ok(None);
            };
            let text: String = Input::new()
                .with_prompt(format!("Your reply to {}", character.name))
                .allow_empty(true)
                .interact_text()?;
            DebateEvent::UserReplyTo {
                target: character.name.clone(),
                text,
            }
        }
        UserAction::NewDirection => {
            let text: String = Input::new()
                .with_prompt("New direction (leave blank for a suggestion)")
                .allow_empty(true)
                .interact_text()?;
            DebateEvent::UserNewDirection(text)
        }
    };
    Ok(Some(event))
}

fn print_report(session: &DebateSession, report: &StepReport) {
    for warning in &report.warnings {
        eprintln!("⚠️ {warning}");
    }
    if !report.appended.is_empty() {
        println!();
        println!(
            "{}",
            render_transcript(session.directory(), &report.appended, DISPLAY_WIDTH)
        );
    }
}
