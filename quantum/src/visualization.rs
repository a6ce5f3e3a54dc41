use crate::HandState;

/// Draws one row per player with the number of cards per suit. Absent suits
/// are marked with ✗, the last column counts the unidentified cards.
pub fn visualize_hands(hands: &[HandState]) -> String {
    let number_of_suits = hands.first().map_or(0, |hand| hand.suits.number_of_suits());

    // Draw the top of the box
    let mut result = String::from("     ");
    for suit in 0..number_of_suits {
        result += &format!(" {:>2}", suit);
    }
    result += "  ?\n    ╭";
    for _ in 0..=number_of_suits {
        result += "───";
    }
    result += "╮";

    for (player, hand) in hands.iter().enumerate() {
        result += &format!("\n{:>3} │", player);
        for suit in 0..number_of_suits {
            if hand.does_not_have_suit.contains(suit) {
                result += "  ✗";
            } else {
                result += &format!(" {:>2}", hand.suits.suit(suit));
            }
        }
        result += &format!(" {:>2}│", hand.suits.unknown());
    }

    // Draw the bottom of the box
    result += "\n    ╰";
    for _ in 0..=number_of_suits {
        result += "───";
    }
    result += "╯";
    result
}
