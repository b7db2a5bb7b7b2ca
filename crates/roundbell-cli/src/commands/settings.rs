use clap::Subcommand;
use roundbell_core::{AppConfig, Settings, SettingsPatch, Theme};
use serde_json::json;

use crate::common::{open_app, parse_duration_secs};

#[derive(Subcommand)]
pub enum SettingsAction {
    /// Print the current settings as JSON
    Show,
    /// Change one or more settings
    Set {
        /// Round length (90, 90s, 3m, 1m30s)
        #[arg(long = "round", value_parser = parse_duration_secs)]
        round: Option<u32>,
        /// Break length, may be 0
        #[arg(long = "break", value_parser = parse_duration_secs)]
        break_: Option<u32>,
        /// Number of rounds (1-20)
        #[arg(long)]
        rounds: Option<u32>,
        /// Color theme: green, blue, red or yellow
        #[arg(long)]
        theme: Option<Theme>,
    },
}

fn print_settings(settings: &Settings) -> Result<(), Box<dyn std::error::Error>> {
    let out = json!({
        "roundDuration": settings.round_duration,
        "breakDuration": settings.break_duration,
        "rounds": settings.rounds,
        "theme": settings.theme,
        "gradient": settings.theme.gradient(),
    });
    println!("{}", serde_json::to_string_pretty(&out)?);
    Ok(())
}

pub fn run(action: SettingsAction) -> Result<(), Box<dyn std::error::Error>> {
    let config = AppConfig::load()?;
    let mut app = open_app(&config)?;

    match action {
        SettingsAction::Show => print_settings(app.settings())?,
        SettingsAction::Set {
            round,
            break_,
            rounds,
            theme,
        } => {
            let patch = SettingsPatch {
                round_duration: round,
                break_duration: break_,
                rounds,
                theme,
            };
            if patch.is_empty() {
                return Err("nothing to set (use --round, --break, --rounds or --theme)".into());
            }
            let settings = app.update_settings(&patch).clone();
            app.flush();
            print_settings(&settings)?;
        }
    }
    Ok(())
}
