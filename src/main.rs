use ChemEqStudio::Utils::logger::{init_logger, parse_level};
use ChemEqStudio::cli::cli_main::run_interactive_menu;
use ChemEqStudio::settings::SettingsManager;
use std::path::Path;

pub fn main() {
    let settings = SettingsManager::new();
    let level = parse_level(&settings.settings().log_level);
    let log_file = settings.settings().log_file.clone();
    if let Err(e) = init_logger(level, log_file.as_deref().map(Path::new)) {
        eprintln!("logging disabled: {}", e);
    }
    run_interactive_menu(settings);
}
