use crate::domain::fixtures::{hands, FOUR_ACES, FOUR_KINGS, NADA};
use crate::domain::rules::DECK_SIZE;
use crate::domain::{
    EnviteAction, EventRecorder, GameEvent, Lance, MusEngine, Phase, Resolution, Team, TeamPoints,
};

/// Seat 0 holds four kings, seat 1 four aces, seats 2 and 3 nothing.
const KINGS_VS_ACES: [&str; 4] = [FOUR_KINGS, FOUR_ACES, NADA, "4C 5E 6B 7O"];

fn started() -> (MusEngine, EventRecorder) {
    let mut engine = MusEngine::with_seed(7);
    let recorder = EventRecorder::new();
    engine.subscribe(recorder.clone());
    assert!(engine.start_game());
    (engine, recorder)
}

/// Started engine with fixed hands, mus already cut by mano: Grande is open.
fn at_grande(seats: [&str; 4]) -> (MusEngine, EventRecorder) {
    let (mut engine, recorder) = started();
    engine.set_hands(hands(seats));
    assert!(engine.handle_mus(0, false));
    recorder.take();
    (engine, recorder)
}

fn cards_accounted(engine: &MusEngine) -> usize {
    let in_hands: usize = (0..4)
        .map(|p| engine.player_hand(p).map_or(0, |h| h.len()))
        .sum();
    engine.deck_remaining() + in_hands + engine.discard_pile().len()
}

fn pass_lance(engine: &mut MusEngine) {
    for _ in 0..4 {
        let player = engine.current_turn_player().expect("someone to act");
        assert!(engine.handle_envite(player, EnviteAction::Paso, None));
    }
}

fn resolutions(recorder: &EventRecorder) -> Vec<(Lance, Option<Team>, u8, Resolution)> {
    recorder
        .events()
        .into_iter()
        .filter_map(|e| match e {
            GameEvent::LanceResolved {
                lance,
                ganador,
                puntos,
                razon,
            } => Some((lance, ganador, puntos, razon)),
            _ => None,
        })
        .collect()
}

fn last_error(recorder: &EventRecorder) -> Option<GameEvent> {
    recorder
        .events()
        .into_iter()
        .rev()
        .find(|e| matches!(e, GameEvent::Error { .. }))
}

#[test]
fn start_game_deals_and_opens_mus() {
    let (engine, recorder) = started();
    assert_eq!(
        recorder.names(),
        vec![
            "gameStarted",
            "roundStarted",
            "cardsDealt",
            "phaseChanged",
            "musPhaseStarted",
            "turnChanged"
        ]
    );
    assert_eq!(engine.phase(), Phase::Mus);
    assert_eq!(engine.current_turn_player(), Some(0));
    for p in 0..4 {
        assert_eq!(engine.player_hand(p).map(|h| h.len()), Some(4));
    }
    assert_eq!(engine.deck_remaining(), DECK_SIZE - 16);
    assert_eq!(cards_accounted(&engine), DECK_SIZE);

    let snap = engine.get_state();
    assert_eq!(snap.round_no, 1);
    assert_eq!(snap.mano, 0);
    assert_eq!(snap.postre, 3);
}

#[test]
fn same_seed_deals_same_hands() {
    let (a, _) = started();
    let (b, _) = started();
    assert_eq!(a.get_state().hands, b.get_state().hands);
}

#[test]
fn mus_out_of_turn_is_rejected_without_state_change() {
    let (mut engine, recorder) = started();
    let before = engine.get_state();
    assert!(!engine.handle_mus(1, true));
    assert_eq!(engine.get_state(), before);
    match last_error(&recorder) {
        Some(GameEvent::Error {
            expected, received, ..
        }) => {
            assert_eq!(expected, Some(0));
            assert_eq!(received, Some(1));
        }
        other => panic!("expected error event, got {other:?}"),
    }
}

#[test]
fn unknown_player_and_wrong_phase_are_rejected() {
    let (mut engine, recorder) = started();
    assert!(!engine.handle_mus(7, true));
    assert!(!engine.handle_envite(0, EnviteAction::Paso, None));
    assert!(!engine.handle_descarte(0, &[0]));
    assert_eq!(
        recorder.names().iter().filter(|n| **n == "error").count(),
        3
    );
    assert_eq!(engine.phase(), Phase::Mus);
    assert!(engine.is_player_turn(0));
}

#[test]
fn everyone_wants_mus_opens_descarte_then_mus_again() {
    let (mut engine, recorder) = started();
    for p in 0..4 {
        assert!(engine.handle_mus(p, true));
    }
    assert_eq!(engine.phase(), Phase::Descarte);
    assert_eq!(engine.current_turn_player(), Some(0));

    for p in 0..4 {
        assert!(engine.handle_descarte(p, &[0, 2]));
        assert_eq!(cards_accounted(&engine), DECK_SIZE);
        assert_eq!(engine.player_hand(p).map(|h| h.len()), Some(4));
    }
    assert_eq!(engine.phase(), Phase::Mus);
    assert_eq!(engine.discard_pile().len(), 8);

    let snap = engine.get_state();
    assert_eq!(snap.mus_rounds, 1);
    assert_eq!(snap.descartes, [Some(2); 4]);
    let names = recorder.names();
    assert!(names.contains(&"descartePhaseStarted"));
    assert!(names.contains(&"cardsDiscarded"));
    assert!(names.contains(&"descarteFinished"));
}

#[test]
fn keeping_all_cards_is_a_valid_discard() {
    let (mut engine, _) = started();
    for p in 0..4 {
        assert!(engine.handle_mus(p, true));
    }
    let before = engine.player_hand(0).map(<[_]>::to_vec);
    assert!(engine.handle_descarte(0, &[]));
    assert_eq!(engine.player_hand(0).map(<[_]>::to_vec), before);
}

#[test]
fn bad_discard_indices_are_rejected() {
    let (mut engine, _) = started();
    for p in 0..4 {
        assert!(engine.handle_mus(p, true));
    }
    let before = engine.get_state();
    assert!(!engine.handle_descarte(0, &[4]));
    assert!(!engine.handle_descarte(0, &[1, 1]));
    assert!(!engine.handle_descarte(0, &[0, 1, 2, 3, 0]));
    assert!(!engine.handle_descarte(1, &[0]));
    assert_eq!(engine.get_state(), before);
    assert_eq!(engine.current_turn_player(), Some(0));
}

#[test]
fn exhausted_draw_pile_reshuffles_discards() {
    let (mut engine, recorder) = started();
    for _ in 0..2 {
        for p in 0..4 {
            assert!(engine.handle_mus(p, true));
        }
        for p in 0..4 {
            assert!(engine.handle_descarte(p, &[0, 1, 2, 3]));
            assert_eq!(cards_accounted(&engine), DECK_SIZE);
        }
    }
    let reshuffled = recorder
        .events()
        .into_iter()
        .find_map(|e| match e {
            GameEvent::DeckReshuffled { returned } => Some(returned),
            _ => None,
        });
    assert_eq!(reshuffled, Some(24));
    assert_eq!(engine.phase(), Phase::Mus);
}

#[test]
fn cutting_mus_opens_grande_at_mano() {
    let (mut engine, recorder) = started();
    assert!(engine.handle_mus(0, true));
    recorder.take();
    assert!(engine.handle_mus(1, false));
    assert_eq!(
        recorder.names(),
        vec![
            "musResponse",
            "musCortado",
            "lancesStarted",
            "phaseChanged",
            "enviteStarted",
            "turnChanged"
        ]
    );
    let snap = engine.get_state();
    assert_eq!(snap.phase, Phase::Envite);
    assert_eq!(snap.lance, Some(Lance::Grande));
    assert_eq!(snap.turn, Some(0));
}

#[test]
fn all_pass_round_pays_base_values_and_rotates_mano() {
    let (mut engine, recorder) = at_grande(KINGS_VS_ACES);
    for _ in 0..4 {
        pass_lance(&mut engine);
    }
    assert_eq!(
        resolutions(&recorder),
        vec![
            (Lance::Grande, Some(Team::Equipo1), 1, Resolution::Paso),
            (Lance::Chica, Some(Team::Equipo2), 1, Resolution::Paso),
            (Lance::Pares, Some(Team::Equipo1), 3, Resolution::Paso),
            (Lance::Juego, Some(Team::Equipo1), 2, Resolution::Paso),
        ]
    );
    assert_eq!(
        engine.piedras(),
        TeamPoints {
            equipo1: 6,
            equipo2: 1
        }
    );
    let snap = engine.get_state();
    assert_eq!(snap.round_no, 2);
    assert_eq!(snap.mano, 1);
    assert_eq!(snap.postre, 0);
    assert_eq!(snap.phase, Phase::Mus);
    assert_eq!(snap.turn, Some(1));
    assert!(snap.historial.is_empty());
    assert!(recorder.names().contains(&"roundFinished"));
}

#[test]
fn no_quiero_pays_one_deje_whatever_the_stake() {
    let (mut engine, recorder) = at_grande(KINGS_VS_ACES);
    assert!(engine.handle_envite(0, EnviteAction::Envido, Some(10)));
    assert_eq!(engine.get_state().apuesta(), 10);
    assert!(engine.handle_envite(1, EnviteAction::NoQuiero, None));
    assert_eq!(
        resolutions(&recorder),
        vec![(Lance::Grande, Some(Team::Equipo1), 1, Resolution::NoQuiero)]
    );
    let snap = engine.get_state();
    assert_eq!(snap.lance, Some(Lance::Chica));
    assert_eq!(snap.puntos_pendientes.equipo1, 1);
    assert_eq!(snap.historial[0].apuesta_final, 10);
}

#[test]
fn envido_two_then_two_then_quiero_pays_four() {
    let (mut engine, recorder) = at_grande(KINGS_VS_ACES);
    assert!(engine.handle_envite(0, EnviteAction::Envido, Some(2)));
    assert_eq!(engine.current_turn_player(), Some(1));
    assert!(engine.handle_envite(1, EnviteAction::Envido, Some(2)));
    assert_eq!(engine.get_state().apuesta(), 4);
    // the raise hands the answer back to equipo1, mano first
    assert_eq!(engine.current_turn_player(), Some(0));
    assert!(engine.handle_envite(0, EnviteAction::Quiero, None));
    assert_eq!(
        resolutions(&recorder),
        vec![(Lance::Grande, Some(Team::Equipo1), 4, Resolution::Quiero)]
    );
}

#[test]
fn responder_pass_moves_obligation_to_partner_then_counts_as_no_quiero() {
    let (mut engine, recorder) = at_grande(KINGS_VS_ACES);
    assert!(engine.handle_envite(0, EnviteAction::Envido, None));
    assert!(!engine.handle_envite(2, EnviteAction::Quiero, None));
    assert!(engine.handle_envite(1, EnviteAction::Paso, None));
    assert_eq!(engine.current_turn_player(), Some(3));
    assert!(engine.get_state().must_respond(3));
    assert!(engine.handle_envite(3, EnviteAction::Paso, None));
    assert_eq!(
        resolutions(&recorder),
        vec![(Lance::Grande, Some(Team::Equipo1), 1, Resolution::NoQuiero)]
    );
}

#[test]
fn bet_after_passes_goes_to_rival_who_has_not_spoken() {
    let (mut engine, recorder) = at_grande(KINGS_VS_ACES);
    assert!(engine.handle_envite(0, EnviteAction::Paso, None));
    assert!(engine.handle_envite(1, EnviteAction::Paso, None));
    assert!(engine.handle_envite(2, EnviteAction::Envido, Some(2)));
    assert_eq!(engine.current_turn_player(), Some(3));
    assert!(!engine.handle_envite(1, EnviteAction::Quiero, None));
    assert!(engine.handle_envite(3, EnviteAction::Quiero, None));
    assert_eq!(
        resolutions(&recorder),
        vec![(Lance::Grande, Some(Team::Equipo1), 2, Resolution::Quiero)]
    );
}

#[test]
fn illegal_envite_actions_are_rejected() {
    let (mut engine, recorder) = at_grande(KINGS_VS_ACES);
    assert!(!engine.handle_envite(0, EnviteAction::Quiero, None));
    assert!(!engine.handle_envite(0, EnviteAction::NoQuiero, None));
    assert!(!engine.handle_envite(0, EnviteAction::Envido, Some(0)));
    assert!(!engine.handle_envite_token(0, "subo", None));
    match last_error(&recorder) {
        Some(GameEvent::Error { mensaje, .. }) => assert!(mensaje.contains("subo")),
        other => panic!("expected error event, got {other:?}"),
    }
    assert!(!engine.handle_envite(1, EnviteAction::Paso, None));
    assert_eq!(engine.current_turn_player(), Some(0));
    assert_eq!(engine.get_state().apuesta(), 0);

    assert!(engine.handle_envite_token(0, "ordago", None));
    assert!(!engine.handle_envite(1, EnviteAction::Envido, None));
    assert!(!engine.handle_envite(1, EnviteAction::Ordago, None));
    assert!(engine.get_state().ordago_activo);
}

#[test]
fn envido_token_uses_default_amount() {
    let (mut engine, _) = at_grande(KINGS_VS_ACES);
    assert!(engine.handle_envite_token(0, "envido", None));
    assert_eq!(engine.get_state().apuesta(), 2);
    assert!(engine.handle_envite_token(1, "no quiero", None));
}

#[test]
fn accepted_ordago_ends_the_game() {
    let (mut engine, recorder) = at_grande(KINGS_VS_ACES);
    assert!(engine.handle_envite(0, EnviteAction::Ordago, None));
    assert_eq!(engine.get_state().apuesta(), 40);
    assert!(engine.handle_envite(1, EnviteAction::Quiero, None));

    assert_eq!(engine.phase(), Phase::GameOver);
    assert_eq!(engine.piedras().equipo1, 40);
    assert_eq!(engine.get_state().winner, Some(Team::Equipo1));
    let over = recorder.events().into_iter().find_map(|e| match e {
        GameEvent::GameOver { ganador, ordago, .. } => Some((ganador, ordago)),
        _ => None,
    });
    assert_eq!(over, Some((Team::Equipo1, true)));
    assert_eq!(
        resolutions(&recorder)[0].3,
        Resolution::Ordago,
        "lance settled as an ordago"
    );

    assert!(!engine.handle_mus(0, true));
    assert!(!engine.handle_envite(2, EnviteAction::Paso, None));
}

#[test]
fn refused_ordago_is_a_deje_and_play_continues() {
    let (mut engine, recorder) = at_grande(KINGS_VS_ACES);
    assert!(engine.handle_envite(0, EnviteAction::Ordago, None));
    assert!(engine.handle_envite(1, EnviteAction::NoQuiero, None));
    let snap = engine.get_state();
    assert!(!snap.ordago_activo);
    assert_eq!(snap.lance, Some(Lance::Chica));
    assert_eq!(snap.phase, Phase::Envite);
    assert_eq!(
        resolutions(&recorder),
        vec![(Lance::Grande, Some(Team::Equipo1), 1, Resolution::NoQuiero)]
    );
}

#[test]
fn pares_is_skipped_and_juego_becomes_punto() {
    let (mut engine, recorder) = at_grande([
        "12O 11C 7E 1B",
        "10O 6C 5E 4B",
        "11O 7C 6E 1C",
        "10C 5O 4C 2E",
    ]);
    pass_lance(&mut engine);
    pass_lance(&mut engine);

    let events = recorder.events();
    assert!(events.iter().any(|e| matches!(
        e,
        GameEvent::LanceSkipped {
            lance: Lance::Pares,
            ..
        }
    )));
    assert!(events.iter().any(|e| matches!(
        e,
        GameEvent::JuegoDetectado {
            hay_juego: false,
            lance_resultante: Lance::Punto,
            ..
        }
    )));
    let snap = engine.get_state();
    assert_eq!(snap.lance, Some(Lance::Punto));
    assert_eq!(snap.declaraciones.pares, Some(vec![]));
    assert_eq!(snap.declaraciones.juego, Some(vec![]));

    pass_lance(&mut engine);
    let resolved = resolutions(&recorder);
    assert_eq!(resolved.len(), 3);
    // 28 beats 25, 24 and 20
    assert_eq!(
        resolved[2],
        (Lance::Punto, Some(Team::Equipo1), 1, Resolution::Paso)
    );
}

#[test]
fn pares_declarations_list_holders_from_mano() {
    let (mut engine, recorder) = at_grande(KINGS_VS_ACES);
    pass_lance(&mut engine);
    pass_lance(&mut engine);
    let declared = recorder.events().into_iter().find_map(|e| match e {
        GameEvent::ParesDetectados {
            hay_pares,
            jugadores,
        } => Some((hay_pares, jugadores.iter().map(|d| d.player).collect::<Vec<_>>())),
        _ => None,
    });
    assert_eq!(declared, Some((true, vec![0, 1])));
    // everybody still speaks in pares, holders or not
    assert_eq!(engine.get_state().lance, Some(Lance::Pares));
    pass_lance(&mut engine);
    assert_eq!(engine.get_state().lance, Some(Lance::Juego));
}

#[test]
fn reaching_forty_at_round_end_finishes_the_game() {
    let (mut engine, recorder) = at_grande(KINGS_VS_ACES);
    engine.state_mut().piedras = TeamPoints {
        equipo1: 38,
        equipo2: 39,
    };
    for _ in 0..4 {
        pass_lance(&mut engine);
    }
    // grande (eq1 +1 → 39), chica (eq2 +1 → 40) ends it before pares is credited
    assert_eq!(engine.phase(), Phase::GameOver);
    assert_eq!(engine.get_state().winner, Some(Team::Equipo2));
    assert_eq!(
        engine.piedras(),
        TeamPoints {
            equipo1: 39,
            equipo2: 40
        }
    );
    let over = recorder.events().into_iter().find_map(|e| match e {
        GameEvent::GameOver { ganador, ordago, .. } => Some((ganador, ordago)),
        _ => None,
    });
    assert_eq!(over, Some((Team::Equipo2, false)));
}
