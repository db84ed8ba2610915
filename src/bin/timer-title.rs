//! Print, or set on the terminal, the running-timers title for a saved snapshot.

use std::path::PathBuf;

use clap::Parser;

use timer_proxy::timer::load_save;
use timer_proxy::title::{update_title, RecordingTitle, TerminalTitle};

#[derive(Parser)]
#[command(name = "timer-title")]
#[command(about = "Compute the aggregate title for a saved timer snapshot", long_about = None)]
struct Cli {
    /// Saved snapshot (JSON with a `timers` map)
    save: PathBuf,

    /// Set the terminal window title instead of printing it
    #[arg(short, long)]
    terminal: bool,
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();
    let save = load_save(&cli.save)?;

    if cli.terminal {
        update_title(&save, &mut TerminalTitle::stdout())?;
    } else {
        let mut sink = RecordingTitle::new();
        update_title(&save, &mut sink)?;
        if let Some(title) = sink.title() {
            println!("{}", title);
        }
    }

    Ok(())
}
