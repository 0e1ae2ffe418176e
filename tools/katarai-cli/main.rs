use clap::Parser;
use katarai::prelude::*;
use std::fs;
use std::io::{self, Write};

/// Plays a persisted dialog scenario in the terminal.
///
/// Statements are printed instead of synthesized; choices are read from
/// stdin. Useful for checking a scenario end to end without the 3-D viewer.
#[derive(Parser)]
#[command(name = "katarai-cli", version, about)]
struct Cli {
    /// Path to the dialog definition JSON
    dialog: String,

    /// Pick the first presented choice automatically instead of prompting
    #[arg(long)]
    auto: bool,
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    let json = fs::read_to_string(&cli.dialog)?;
    let definition = DialogDefinition::from_json_str(&json)?;
    println!(
        "Scenario '{}' ({} nodes, {} connections)",
        definition.scenario.name,
        definition.nodes.len(),
        definition.connections.len()
    );

    let mut engine = ScenarioEngine::from_definition(&definition)?;
    engine.start()?;

    loop {
        for event in engine.take_events() {
            match event {
                EngineEvent::Started => println!("--- scenario started ---"),
                EngineEvent::SpeechRequested(request) => {
                    println!("  \"{}\"", request.text);
                    engine.speech_finished(request.handle);
                }
                EngineEvent::PointsUpdated { total } => {
                    println!("  [points: {total}]");
                }
                EngineEvent::Ended => {
                    println!("--- scenario ended, {} points ---", engine.total_points());
                    return Ok(());
                }
            }
        }

        if engine.pending_choice().is_some() {
            let choices: Vec<Choice> = engine.middleware().choices().to_vec();
            if choices.is_empty() {
                println!("Scenario stalled: choice requested but none available.");
                return Ok(());
            }
            let picked = if cli.auto {
                0
            } else {
                prompt_choice(&choices)?
            };
            engine.choose(&choices[picked].key);
        } else if engine.middleware().speaking().is_none() {
            // Neither suspended nor producing events: the graph stalled
            // (unreachable end node or cyclic wiring).
            println!("Scenario stalled without reaching an end node.");
            return Ok(());
        }
    }
}

fn prompt_choice(choices: &[Choice]) -> Result<usize> {
    println!("Select a response:");
    for (index, choice) in choices.iter().enumerate() {
        println!("  [{}] {} ({} points)", index + 1, choice.text, choice.points);
    }
    loop {
        print!("> ");
        io::stdout().flush()?;
        let mut line = String::new();
        io::stdin().read_line(&mut line)?;
        match line.trim().parse::<usize>() {
            Ok(n) if n >= 1 && n <= choices.len() => return Ok(n - 1),
            _ => println!("Enter a number between 1 and {}", choices.len()),
        }
    }
}
