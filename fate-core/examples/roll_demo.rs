//! Demo of the dice engine and outcome classification.

use fate_core::{calculate_outcome, ladder_label, roll_dice, ActionType, RollType};

fn main() {
    println!("=== Fate dice demo ===\n");

    demo_roll(Some("Lutar"), 3, RollType::Normal, Some(2));
    demo_roll(Some("Atletismo"), 2, RollType::Normal, Some(4));
    demo_roll(None, 0, RollType::Normal, None);
    demo_roll(Some("Ofício"), 1, RollType::Advantage, Some(1));

    println!("\n=== Done ===");
}

fn demo_roll(skill: Option<&str>, modifier: i32, roll_type: RollType, opposition: Option<i32>) {
    let result = roll_dice("Helena", skill, Some(ActionType::Overcome), modifier, roll_type);
    print!(
        "{} ({}): {} -> {}",
        result.actor,
        skill.unwrap_or("sem perícia"),
        result,
        ladder_label(result.total)
    );

    match calculate_outcome(result.total, opposition) {
        Some(outcome) => println!(" vs {} -> {}", opposition.unwrap_or(0), outcome),
        None => println!(" (rolagem livre)"),
    }
}
