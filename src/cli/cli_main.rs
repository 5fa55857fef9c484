use super::cli_examples::examples_menu;
use super::cli_simulation::{SimulationSession, simulation_menu};
use crate::Kinetics::catalyst_library::get_all_catalysts;
use crate::Utils::export::{catalysts_table, reaction_info_table, reactions_table};
use crate::settings::{SettingsManager, TIME_SCALES};
use log::error;
use std::io::{self, Write};

pub fn run_interactive_menu(settings: SettingsManager) {
    let mut session = SimulationSession::new(settings);
    loop {
        show_main_menu(&session);
        let choice = get_user_input();

        match choice.trim() {
            "1" => select_reaction(&mut session),
            "2" => simulation_menu(&mut session),
            "3" => {
                catalysts_table(&get_all_catalysts()).printstd();
            }
            "4" => settings_menu(&mut session),
            "5" => examples_menu(),
            "0" => {
                println!("Goodbye!");
                break;
            }
            _ => println!("Invalid choice. Please try again."),
        }
    }
}
/* colors
Blue (\x1b[34m) - Welcome header text

Yellow (\x1b[33m) - Menu options

Cyan (\x1b[36m) - "Enter your choice:" prompt

Reset (\x1b[0m) - Returns to normal color after each colored section
*/
fn show_main_menu(session: &SimulationSession) {
    println!(
        "\x1b[34m\n Welcome to ChemEqStudio: reversible reactions, Le Chatelier's principle\n
    and catalysis in a box \n \x1b[0m"
    );
    println!("Current reaction: {}", session.engine().reaction().equation());
    println!("\x1b[33m1. Select reaction\x1b[0m");
    println!("\x1b[33m2. Simulation\x1b[0m");
    println!("\x1b[33m3. Catalyst reference\x1b[0m");
    println!("\x1b[33m4. Settings\x1b[0m");
    println!("\x1b[33m5. Examples\x1b[0m");
    println!("\x1b[33m0. Exit\x1b[0m");
    print!("\x1b[36mEnter your choice: \x1b[0m");
    io::stdout().flush().ok();
}

fn select_reaction(session: &mut SimulationSession) {
    reactions_table(&session.catalog()).printstd();
    let Some(n) = prompt_parse::<usize>("Reaction number: ") else {
        println!("Invalid number.");
        return;
    };
    match n.checked_sub(1).map(|i| session.select_reaction(i)) {
        Some(Ok(())) => {
            println!("Selected: {}", session.engine().reaction().name);
            reaction_info_table(session.engine().reaction()).printstd();
        }
        Some(Err(e)) => println!("{}", e),
        None => println!("Invalid number."),
    }
}

fn settings_menu(session: &mut SimulationSession) {
    loop {
        let s = session.settings().settings().clone();
        println!("\n=== Settings ===");
        println!("1. Speed ({:.1}x)", s.speed);
        println!("2. Time scale ({}x)", s.time_scale());
        println!("3. Steps per run ({})", s.steps_per_run);
        println!("4. Reset to defaults");
        println!("0. Back to main menu");
        println!("effective dt = {:.4} s", s.effective_dt());
        print!("Enter your choice: ");
        io::stdout().flush().ok();

        let result = match get_user_input().trim() {
            "1" => match prompt_parse::<f64>("Speed (0.1 - 5.0): ") {
                Some(v) => session.settings_mut().update(|s| s.set_speed(v)),
                None => continue,
            },
            "2" => {
                println!("Time scales: {:?}", TIME_SCALES);
                match prompt_parse::<usize>("Index (0 - 4): ") {
                    Some(i) => session.settings_mut().update(|s| s.set_time_scale_index(i)),
                    None => continue,
                }
            }
            "3" => match prompt_parse::<usize>("Steps per run: ") {
                Some(n) => session.settings_mut().update(|s| s.set_steps_per_run(n)),
                None => continue,
            },
            "4" => session.settings_mut().reset_to_defaults(),
            "0" => break,
            _ => {
                println!("Invalid choice. Please try again.");
                continue;
            }
        };
        if let Err(e) = result {
            error!("{}", e);
        }
    }
}

/// one line from stdin; empty on a read error
pub(crate) fn get_user_input() -> String {
    let mut input = String::new();
    if let Err(e) = io::stdin().read_line(&mut input) {
        error!("failed to read input: {}", e);
    }
    input
}

pub(crate) fn prompt(message: &str) -> String {
    print!("\x1b[36m{}\x1b[0m", message);
    io::stdout().flush().ok();
    get_user_input().trim().to_string()
}

pub(crate) fn prompt_parse<T: std::str::FromStr>(message: &str) -> Option<T> {
    prompt(message).parse().ok()
}
