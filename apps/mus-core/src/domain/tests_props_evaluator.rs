use std::cmp::Ordering;

use proptest::prelude::*;

use crate::domain::evaluator::{best_seat, compare_for, compare_juego, participates};
use crate::domain::hand::puntos;
use crate::domain::strength::{general_strength, lance_strength, pares_strength};
use crate::domain::{classify_pares, test_gens, test_prelude, Lance};

proptest! {
    #![proptest_config(test_prelude::proptest_config())]

    /// Every lance score and the general score stay within 0..=100.
    #[test]
    fn prop_strengths_are_bounded(hand in test_gens::hand(), lance in test_gens::lance()) {
        prop_assert!(lance_strength(&hand, lance) <= 100);
        prop_assert!(general_strength(&hand) <= 100);
    }

    /// duples > medias > pareja > none, for the engine ordering and the AI scores alike.
    #[test]
    fn prop_pares_hierarchy(a in test_gens::hand(), b in test_gens::hand()) {
        let kind_a = classify_pares(&a).map(|p| p.kind);
        let kind_b = classify_pares(&b).map(|p| p.kind);
        if kind_a > kind_b {
            prop_assert_eq!(compare_for(Lance::Pares, &a, &b), Ordering::Greater);
            prop_assert!(pares_strength(&a) > pares_strength(&b),
                "{:?} ({:?}) vs {:?} ({:?})", a, kind_a, b, kind_b);
        }
    }

    /// 31 beats every other juego value, including 32 and 40.
    #[test]
    fn prop_treinta_y_una_beats_all(a in test_gens::hand(), b in test_gens::hand()) {
        if puntos(&a) == 31 && puntos(&b) != 31 {
            prop_assert_eq!(compare_juego(&a, &b), Ordering::Greater);
            prop_assert_eq!(lance_strength(&a, Lance::Juego), 100);
        }
    }

    /// The best seat participates and no other seat holds a strictly better hand.
    #[test]
    fn prop_best_seat_is_unbeaten(
        hands in test_gens::four_hands(),
        lance in test_gens::lance(),
        mano in test_gens::player_id(),
    ) {
        match best_seat(lance, &hands, mano) {
            None => prop_assert!(hands.iter().all(|h| !participates(lance, h))),
            Some(best) => {
                prop_assert!(participates(lance, &hands[best as usize]));
                for (seat, hand) in hands.iter().enumerate() {
                    if participates(lance, hand) {
                        prop_assert_ne!(
                            compare_for(lance, hand, &hands[best as usize]),
                            Ordering::Greater,
                            "seat {} beats best seat {}", seat, best
                        );
                    }
                }
            }
        }
    }
}
