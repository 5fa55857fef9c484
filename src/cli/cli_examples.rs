use super::cli_main::get_user_input;
use crate::Examples::equilibrium_examples::equilibrium_examples;
use std::io::{self, Write};

pub fn examples_menu() {
    loop {
        println!("\n=== Examples ===");
        println!("1. N₂O₄ ⇌ 2NO₂ relaxation to equilibrium");
        println!("2. Le Chatelier: temperature step");
        println!("3. Le Chatelier: compression");
        println!("4. Catalysis: Haber-Bosch with and without iron");
        println!("5. Le Chatelier: adding product");
        println!("6. Export a run to CSV and JSON");
        println!("0. Back to main menu");
        print!("Enter your choice: ");
        io::stdout().flush().ok();

        let choice = get_user_input();
        match choice.trim() {
            "1" => equilibrium_examples(0),
            "2" => equilibrium_examples(1),
            "3" => equilibrium_examples(2),
            "4" => equilibrium_examples(3),
            "5" => equilibrium_examples(4),
            "6" => equilibrium_examples(5),
            "0" => break,
            _ => println!("Invalid choice. Please try again."),
        }
    }
}
