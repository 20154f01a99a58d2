use proptest::prelude::*;

use crate::ai::context::{EnviteContext, Posicion};
use crate::ai::heuristic::{ordago_thresholds, HeuristicPlayer};
use crate::ai::test_rng::{FixedRng, ALWAYS, NEVER};
use crate::ai::trait_def::{EnviteDecision, MusAi};
use crate::domain::fixtures::{h, FOUR_KINGS, NADA, TREINTA_Y_UNA};
use crate::domain::hand::is_paired;
use crate::domain::strength::lance_strength;
use crate::domain::{test_gens, test_prelude, EnviteAction, Lance};

const PAIR_OF_ACES: &str = "1O 1C 4E 5B";
/// Grande 56: just under the mano acceptance threshold.
const CABALLO_BAJO: &str = "11O 6C 4E 1B";
/// Grande 88.
const REY_CABALLO: &str = "12O 11C 7E 6B";
/// Grande 77.
const REY_SIETE: &str = "12O 7C 4E 1B";

fn bot(value: u64) -> HeuristicPlayer<FixedRng> {
    HeuristicPlayer::with_rng(FixedRng::always(value))
}

fn mano() -> EnviteContext {
    EnviteContext::default()
}

fn segundo() -> EnviteContext {
    EnviteContext {
        posicion: Posicion::Segundo,
        ..EnviteContext::default()
    }
}

/// Contexts that move the órdago thresholds the most in either direction.
fn shifting_contexts() -> Vec<EnviteContext> {
    let desesperado = EnviteContext {
        marcador_rival: 30,
        marcador_propio: 5,
        piedras_restantes: 10,
        ..mano()
    };
    let rivales_callados = EnviteContext {
        equipo_rival: vec![1, 3],
        declaraciones_pares: [Some(true), Some(false), Some(true), Some(false)],
        declaraciones_juego: [Some(true), Some(false), Some(true), Some(false)],
        ..mano()
    };
    let todo_a_favor = EnviteContext {
        marcador_rival: 30,
        marcador_propio: 5,
        piedras_restantes: 10,
        pareja_ya_envido: true,
        ..rivales_callados.clone()
    };
    vec![
        mano(),
        segundo(),
        desesperado,
        EnviteContext {
            pareja_ya_envido: true,
            ..segundo()
        },
        rivales_callados,
        todo_a_favor,
    ]
}

fn decide(
    ai: &impl MusAi,
    hand: &str,
    lance: Lance,
    bet: u8,
    ctx: &EnviteContext,
) -> EnviteDecision {
    ai.decide_envite(&h(hand), lance, bet, ctx)
        .expect("decision")
}

#[test]
fn cuts_with_duples_and_31_even_when_gates_open() {
    let ai = bot(ALWAYS);
    assert!(!ai.decide_mus(&h(FOUR_KINGS)).unwrap());
    assert!(!ai.decide_mus(&h(TREINTA_Y_UNA)).unwrap());
}

#[test]
fn mediocre_hand_mus_follows_rng() {
    assert!(bot(ALWAYS).decide_mus(&h(NADA)).unwrap());
    assert!(!bot(NEVER).decide_mus(&h(NADA)).unwrap());
}

#[test]
fn keeps_made_hands_on_discard() {
    let ai = bot(ALWAYS);
    assert!(ai.select_discard(&h(FOUR_KINGS)).unwrap().is_empty());
    assert!(ai.select_discard(&h(TREINTA_Y_UNA)).unwrap().is_empty());
}

#[test]
fn discards_least_useful_loose_card() {
    // general 33: one card, the 5 scores lowest
    assert_eq!(bot(ALWAYS).select_discard(&h(NADA)).unwrap(), vec![1]);
    // the aces stay, the 5 goes
    assert_eq!(bot(ALWAYS).select_discard(&h(PAIR_OF_ACES)).unwrap(), vec![3]);
}

#[test]
fn bluff_gate_opens_below_threshold() {
    assert_eq!(
        decide(&bot(ALWAYS), NADA, Lance::Grande, 0, &segundo()),
        EnviteDecision::envido(2)
    );
    assert_eq!(
        decide(&bot(NEVER), NADA, Lance::Grande, 0, &segundo()),
        EnviteDecision::paso()
    );
}

#[test]
fn never_bluffs_near_the_win() {
    let ctx = EnviteContext {
        marcador_propio: 36,
        ..segundo()
    };
    assert_eq!(
        decide(&bot(ALWAYS), NADA, Lance::Grande, 0, &ctx),
        EnviteDecision::paso()
    );
}

#[test]
fn monster_opens_with_ordago_when_gate_passes() {
    assert_eq!(
        decide(&bot(ALWAYS), FOUR_KINGS, Lance::Grande, 0, &mano()),
        EnviteDecision::ordago(40)
    );
}

#[test]
fn mano_sometimes_traps_with_a_monster() {
    let ai = HeuristicPlayer::with_rng(FixedRng::script(&[NEVER, ALWAYS]));
    assert_eq!(
        decide(&ai, FOUR_KINGS, Lance::Grande, 0, &mano()),
        EnviteDecision::paso()
    );
}

#[test]
fn value_bet_scales_with_margin() {
    assert_eq!(
        decide(&bot(NEVER), FOUR_KINGS, Lance::Grande, 0, &mano()),
        EnviteDecision::envido(5)
    );
    let near_win = EnviteContext {
        marcador_propio: 36,
        ..mano()
    };
    assert_eq!(
        decide(&bot(NEVER), FOUR_KINGS, Lance::Grande, 0, &near_win),
        EnviteDecision::envido(2)
    );
}

#[test]
fn close_call_on_small_bets_only() {
    assert_eq!(
        decide(&bot(ALWAYS), CABALLO_BAJO, Lance::Grande, 2, &mano()),
        EnviteDecision::quiero(2)
    );
    assert_eq!(
        decide(&bot(NEVER), CABALLO_BAJO, Lance::Grande, 2, &mano()),
        EnviteDecision::no_quiero()
    );
    assert_eq!(
        decide(&bot(ALWAYS), CABALLO_BAJO, Lance::Grande, 3, &mano()),
        EnviteDecision::no_quiero()
    );
}

#[test]
fn large_bets_need_a_wide_margin() {
    assert_eq!(
        decide(&bot(NEVER), FOUR_KINGS, Lance::Grande, 8, &segundo()),
        EnviteDecision::quiero(8)
    );
    let ctx = EnviteContext {
        apuesta_rival: 8,
        ..segundo()
    };
    assert_eq!(
        decide(&bot(ALWAYS), REY_CABALLO, Lance::Grande, 8, &ctx),
        EnviteDecision::quiero(8)
    );
    assert_eq!(
        decide(&bot(NEVER), REY_CABALLO, Lance::Grande, 8, &ctx),
        EnviteDecision::no_quiero()
    );
}

#[test]
fn counter_raise_is_capped_by_remaining_piedras() {
    let ctx = EnviteContext {
        piedras_restantes: 4,
        ..segundo()
    };
    assert_eq!(
        decide(&bot(ALWAYS), FOUR_KINGS, Lance::Grande, 3, &ctx),
        EnviteDecision::envido(1)
    );
    let ctx = EnviteContext {
        piedras_restantes: 3,
        ..segundo()
    };
    assert_eq!(
        decide(&bot(ALWAYS), FOUR_KINGS, Lance::Grande, 3, &ctx),
        EnviteDecision::quiero(3)
    );
}

#[test]
fn answers_a_big_bet_with_ordago() {
    assert_eq!(
        decide(&bot(ALWAYS), FOUR_KINGS, Lance::Grande, 4, &segundo()),
        EnviteDecision::ordago(40)
    );
}

#[test]
fn ordago_acceptance_moves_with_context() {
    let ordago = |ctx: EnviteContext| EnviteContext {
        ordago_activo: true,
        ..ctx
    };
    assert_eq!(
        decide(&bot(ALWAYS), FOUR_KINGS, Lance::Grande, 40, &ordago(segundo())),
        EnviteDecision::quiero(40)
    );

    let cautious = ordago(EnviteContext {
        pareja_paso: true,
        ..segundo()
    });
    assert_eq!(
        decide(&bot(ALWAYS), REY_CABALLO, Lance::Grande, 40, &cautious),
        EnviteDecision::no_quiero()
    );

    let desperate = EnviteContext {
        marcador_rival: 20,
        piedras_restantes: 20,
        ..cautious
    };
    assert_eq!(
        decide(&bot(ALWAYS), REY_CABALLO, Lance::Grande, 20, &desperate),
        EnviteDecision::quiero(20)
    );
}

#[test]
fn ordago_acceptance_never_drops_below_floor() {
    // 88 - 8 - 3 - 3 = 74, clamped up to 78
    let ctx = EnviteContext {
        ordago_activo: true,
        marcador_rival: 20,
        pareja_ya_envido: true,
        piedras_restantes: 20,
        ..mano()
    };
    assert_eq!(ordago_thresholds(Lance::Grande).minimo, 78);
    assert_eq!(lance_strength(&h(REY_SIETE), Lance::Grande), 77);
    assert_eq!(
        decide(&bot(ALWAYS), REY_SIETE, Lance::Grande, 20, &ctx),
        EnviteDecision::no_quiero()
    );
}

#[test]
fn mano_with_31_always_takes_juego_ordago() {
    let ctx = EnviteContext {
        ordago_activo: true,
        ..mano()
    };
    assert_eq!(
        decide(&bot(NEVER), TREINTA_Y_UNA, Lance::Juego, 40, &ctx),
        EnviteDecision::quiero(40)
    );
}

#[test]
fn pair_of_aces_is_never_accepted() {
    for value in [ALWAYS, NEVER] {
        for bet in 1..=10 {
            assert_eq!(
                decide(&bot(value), PAIR_OF_ACES, Lance::Pares, bet, &segundo()),
                EnviteDecision::no_quiero()
            );
        }
        let ordago = EnviteContext {
            ordago_activo: true,
            marcador_rival: 30,
            ..mano()
        };
        assert_eq!(
            decide(&bot(value), PAIR_OF_ACES, Lance::Pares, 10, &ordago),
            EnviteDecision::no_quiero()
        );
    }
}

#[test]
fn thirty_one_bets_juego_most_of_the_time() {
    for ctx in [mano(), segundo()] {
        let bets = (0..200u64)
            .filter(|&seed| {
                let ai = HeuristicPlayer::new(Some(seed));
                decide(&ai, TREINTA_Y_UNA, Lance::Juego, 0, &ctx).action.is_bet()
            })
            .count();
        assert!(bets > 100, "{bets}/200 bets at {:?}", ctx.posicion);
    }
}

#[test]
fn same_seed_same_decisions() {
    let a = HeuristicPlayer::new(Some(7));
    let b = HeuristicPlayer::new(Some(7));
    for _ in 0..50 {
        assert_eq!(
            decide(&a, NADA, Lance::Grande, 0, &segundo()),
            decide(&b, NADA, Lance::Grande, 0, &segundo())
        );
        assert_eq!(
            a.decide_mus(&h(NADA)).unwrap(),
            b.decide_mus(&h(NADA)).unwrap()
        );
    }
}

proptest! {
    #![proptest_config(test_prelude::proptest_config())]

    /// Órdago is only ever proposed at or above the opening threshold,
    /// whatever the context.
    #[test]
    fn prop_no_ordago_below_threshold(
        hand in test_gens::hand(),
        lance in test_gens::lance(),
        bet in 0u8..8,
        seed in any::<u64>(),
    ) {
        let ai = HeuristicPlayer::new(Some(seed));
        for ctx in shifting_contexts() {
            let d = ai.decide_envite(&hand, lance, bet, &ctx).unwrap();
            if d.action == EnviteAction::Ordago {
                prop_assert!(lance_strength(&hand, lance) >= ordago_thresholds(lance).apertura);
            }
        }
    }

    /// An órdago is never accepted below the lance floor, however far the
    /// context lowers the acceptance threshold.
    #[test]
    fn prop_no_ordago_accepted_below_floor(
        hand in test_gens::hand(),
        lance in test_gens::lance(),
        seed in any::<u64>(),
    ) {
        let ai = HeuristicPlayer::new(Some(seed));
        for ctx in shifting_contexts() {
            let ctx = EnviteContext { ordago_activo: true, ..ctx };
            let d = ai.decide_envite(&hand, lance, 40, &ctx).unwrap();
            if d.action == EnviteAction::Quiero {
                let fuerza = lance_strength(&hand, lance);
                prop_assert!(
                    fuerza >= ordago_thresholds(lance).minimo,
                    "{lance:?} accepted at {fuerza} with {ctx:?}"
                );
            }
        }
    }

    /// Decisions fit the seat's position in the betting.
    #[test]
    fn prop_decisions_fit_position(
        hand in test_gens::hand(),
        lance in test_gens::lance(),
        bet in 1u8..12,
        seed in any::<u64>(),
    ) {
        let ai = HeuristicPlayer::new(Some(seed));
        let open = ai.decide_envite(&hand, lance, 0, &segundo()).unwrap();
        prop_assert!(!matches!(open.action, EnviteAction::Quiero | EnviteAction::NoQuiero));

        let answer = ai.decide_envite(&hand, lance, bet, &segundo()).unwrap();
        prop_assert_ne!(answer.action, EnviteAction::Paso);

        let ctx = EnviteContext { ordago_activo: true, ..segundo() };
        let ordago = ai.decide_envite(&hand, lance, bet, &ctx).unwrap();
        prop_assert!(matches!(ordago.action, EnviteAction::Quiero | EnviteAction::NoQuiero));
    }

    /// Discards are distinct, in range, at most three, and never break a pair.
    #[test]
    fn prop_discard_keeps_pairs(hand in test_gens::hand(), seed in any::<u64>()) {
        let ai = HeuristicPlayer::new(Some(seed));
        let picks = ai.select_discard(&hand).unwrap();
        prop_assert!(picks.len() <= 3);
        prop_assert!(picks.windows(2).all(|w| w[0] < w[1]));
        for idx in picks {
            prop_assert!(idx < hand.len());
            prop_assert!(!is_paired(&hand, hand[idx]));
        }
    }
}
