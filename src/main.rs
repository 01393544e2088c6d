use clap::Parser;
use color_eyre::Result;
use studytrack::cli::{Cli, Commands};
use studytrack::{Config, Profile, Store};

fn main() -> Result<()> {
    color_eyre::install()?;

    let cli = Cli::parse();

    let profile = if cli.dev { Profile::Dev } else { Profile::Prod };

    let config = Config::load_with_profile(profile)?;

    let data_path = config.get_data_path();
    let store = Store::open(
        data_path
            .to_str()
            .ok_or_else(|| color_eyre::eyre::eyre!("Data path contains invalid UTF-8"))?,
    )?;

    match cli.command.unwrap_or(Commands::Tui) {
        Commands::Tui => {
            let app = studytrack::tui::App::new(config, store);
            studytrack::tui::run_event_loop(app)?;
        }
        Commands::AddTask {
            title,
            due,
            description,
        } => {
            studytrack::cli::handle_add_task(title, due, description, &store)?;
        }
        Commands::AddNote { title, content } => {
            studytrack::cli::handle_add_note(title, content, &store)?;
        }
        Commands::Log { subject, minutes } => {
            studytrack::cli::handle_log(subject, minutes, &store)?;
        }
        Commands::Stats => {
            studytrack::cli::handle_stats(&store)?;
        }
    }

    Ok(())
}
