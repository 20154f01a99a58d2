//! HeuristicPlayer: the single competent Mus bot.
//!
//! Mus/cut:
//! - Always cut with duples or 31; almost always with good pares plus juego.
//! - Otherwise the probability of asking for mus falls with general strength.
//!
//! Discard:
//! - Keep duples, good medias and 31 untouched; never break a pair.
//! - Throw away the least useful loose cards, more of them the weaker the hand.
//!
//! Envite:
//! - Per-lance thresholds to open and to accept, shifted by position, score
//!   zone, inferred rival strength, rival declarations, what happened in
//!   earlier lances and what the partner did.
//! - Bluffs are a small independent gate below the opening threshold, never
//!   near a winning score and never an órdago.
//! - Órdago uses its own much higher thresholds on the raw lance strength.
//!   Context can only move those thresholds, within a fixed floor.
//!
//! Randomness comes from an injected RNG so tests can force every branch.

use std::sync::Mutex;

use rand::rngs::StdRng;
use rand::{Rng, RngCore, SeedableRng};
use tracing::trace;

use crate::ai::context::EnviteContext;
use crate::ai::trait_def::{AiError, EnviteDecision, MusAi};
use crate::domain::evaluator::{classify_pares, ParesKind};
use crate::domain::hand::{is_paired, puntos, tiene_juego};
use crate::domain::state::LanceRecord;
use crate::domain::strength::{
    general_strength, grande_strength, chica_strength, juego_strength, lance_strength,
    pares_strength,
};
use crate::domain::{Card, EnviteAction, Lance, Rank};

/// Opening and accepting thresholds for ordinary bets.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct Umbrales {
    apostar: i32,
    querer: i32,
    min_absoluto: i32,
}

fn umbrales(lance: Lance, es_mano: bool) -> Umbrales {
    // (apostar, querer, querer de mano, minimo absoluto)
    let (apostar, querer, querer_mano, min_absoluto) = match lance {
        Lance::Grande | Lance::Chica => (70, 65, 60, 0),
        // a pair of aces (8) never plays
        Lance::Pares => (42, 40, 38, 20),
        Lance::Juego => (30, 25, 15, 0),
        Lance::Punto => (80, 75, 70, 0),
    };
    Umbrales {
        apostar,
        querer: if es_mano { querer_mano } else { querer },
        min_absoluto,
    }
}

/// Órdago thresholds on raw lance strength.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct OrdagoThresholds {
    /// Minimum to propose an órdago. Never moved by context.
    pub apertura: u8,
    /// Base minimum to accept one; context shifts it.
    pub aceptar: u8,
    /// Floor the shifted acceptance threshold can never go below.
    pub minimo: u8,
}

pub const fn ordago_thresholds(lance: Lance) -> OrdagoThresholds {
    match lance {
        Lance::Pares => OrdagoThresholds {
            apertura: 90,
            aceptar: 82,
            minimo: 72,
        },
        Lance::Juego => OrdagoThresholds {
            apertura: 92,
            aceptar: 85,
            minimo: 75,
        },
        Lance::Grande | Lance::Chica | Lance::Punto => OrdagoThresholds {
            apertura: 95,
            aceptar: 88,
            minimo: 78,
        },
    }
}

/// Signals derived from the context for one decision.
#[derive(Debug, Clone, Copy)]
struct Signals {
    es_mano: bool,
    zona_adentro: bool,
    zona_desesperada: bool,
    fuerza_inferida_rival: i32,
    info_bonus: i32,
    info_ventaja: bool,
    ajuste_memoria: i32,
    pareja_aposto: bool,
    pareja_paso: bool,
    piedras_restantes: u8,
}

impl Signals {
    fn read(ctx: &EnviteContext, lance: Lance) -> Self {
        let diferencia = ctx.marcador_rival as i32 - ctx.marcador_propio as i32;
        let para_ganar = ctx.piedras_para_ganar as i32 - ctx.marcador_propio as i32;

        let fuerza_inferida_rival = match ctx.apuesta_rival {
            a if a >= 10 => 80,
            a if a >= 5 => 70,
            a if a >= 2 => 55,
            _ if ctx.pareja_paso => 40,
            _ => 50,
        };
        let info_bonus = info_bonus(lance, ctx);

        Self {
            es_mano: ctx.es_mano(),
            zona_adentro: para_ganar <= 5,
            zona_desesperada: diferencia > 15,
            fuerza_inferida_rival,
            info_bonus,
            info_ventaja: info_bonus >= 10,
            ajuste_memoria: memory_adjustment(&ctx.historial_lances, lance, &ctx.equipo_rival),
            pareja_aposto: ctx.pareja_ya_envido,
            pareja_paso: ctx.pareja_paso,
            piedras_restantes: ctx.piedras_restantes,
        }
    }

    /// Threshold shift from rival declarations: silence from both rivals
    /// lowers it, a declared rival raises it.
    fn info_shift(&self) -> i32 {
        -(self.info_bonus / 3)
    }
}

fn info_bonus(lance: Lance, ctx: &EnviteContext) -> i32 {
    if ctx.equipo_rival.is_empty() {
        return 0;
    }
    let (declaraciones, si) = match lance {
        Lance::Pares => (&ctx.declaraciones_pares, -10),
        Lance::Juego => (&ctx.declaraciones_juego, -5),
        _ => return 0,
    };
    let of = |seat: &u8| declaraciones.get(*seat as usize).copied().flatten();
    if ctx.equipo_rival.iter().all(|s| of(s) == Some(false)) {
        15
    } else if ctx.equipo_rival.iter().any(|s| of(s) == Some(true)) {
        si
    } else {
        0
    }
}

/// Threshold nudge from earlier lances this round. Negative means the
/// rivals look weak. Clamped to ±20.
fn memory_adjustment(historial: &[LanceRecord], actual: Lance, rivales: &[u8]) -> i32 {
    let mut ajuste = 0;
    for record in historial {
        let respuesta = |seat: &u8| record.respuestas.get(*seat as usize).copied().flatten();
        let rival_aposto = rivales
            .iter()
            .any(|s| respuesta(s).is_some_and(EnviteAction::is_bet));
        let rival_paso = rivales
            .iter()
            .all(|s| matches!(respuesta(s), None | Some(EnviteAction::Paso)));

        if rival_aposto && record.apuesta_final >= 3 {
            match (record.lance, actual) {
                // strong grande means kings, so a weak chica, and vice versa
                (Lance::Grande, Lance::Chica) | (Lance::Chica, Lance::Grande) => ajuste -= 10,
                (Lance::Pares, Lance::Juego | Lance::Punto) => ajuste += 5,
                _ => {}
            }
        }
        if rival_paso {
            ajuste -= 3;
        }
    }
    ajuste.clamp(-20, 20)
}

fn is_pair_of_aces(hand: &[Card]) -> bool {
    classify_pares(hand).is_some_and(|p| {
        p.kind == ParesKind::Pareja && p.values.first() == Some(&Rank::As.comparison_value())
    })
}

/// Bet size for a margin over the opening threshold.
fn bet_size(margen: i32, s: &Signals) -> u8 {
    let mut amount: u8 = match margen {
        m if m >= 25 => 5,
        m if m >= 15 => 4,
        m if m >= 8 => 3,
        _ => 2,
    };
    if s.piedras_restantes <= 10 {
        amount = amount.min(3);
    }
    if s.zona_adentro {
        amount = amount.min(2);
    }
    if s.zona_desesperada && margen >= 15 {
        amount += 1;
    }
    amount
}

pub struct HeuristicPlayer<R = StdRng> {
    rng: Mutex<R>,
}

impl HeuristicPlayer<StdRng> {
    pub const NAME: &'static str = "HeuristicPlayer";
    pub const VERSION: &'static str = "2.0.0";

    /// `Some(seed)` replays the same decisions; `None` uses OS entropy.
    pub fn new(seed: Option<u64>) -> Self {
        let rng = match seed {
            Some(s) => StdRng::seed_from_u64(s),
            None => StdRng::from_os_rng(),
        };
        Self::with_rng(rng)
    }
}

impl<R: RngCore + Send> HeuristicPlayer<R> {
    pub fn with_rng(rng: R) -> Self {
        Self {
            rng: Mutex::new(rng),
        }
    }

    fn roll(&self) -> Result<f64, AiError> {
        let mut rng = self
            .rng
            .lock()
            .map_err(|e| AiError::Internal(format!("RNG lock poisoned: {e}")))?;
        Ok(rng.random::<f64>())
    }

    fn chance(&self, p: f64) -> Result<bool, AiError> {
        Ok(self.roll()? < p)
    }

    fn bluff(&self, lance: Lance, s: &Signals) -> Result<Option<u8>, AiError> {
        if s.zona_adentro {
            return Ok(None);
        }
        let mut tasa = match lance {
            Lance::Grande | Lance::Chica => 0.08,
            Lance::Juego => 0.05,
            Lance::Pares => 0.03,
            Lance::Punto => 0.02,
        };
        if !s.es_mano {
            tasa += 0.03;
        }
        if s.ajuste_memoria < -5 {
            tasa += 0.02;
        }
        if s.pareja_aposto {
            tasa += 0.02;
        }
        if s.zona_desesperada {
            tasa += 0.05;
        }
        if !self.chance(tasa)? {
            return Ok(None);
        }

        let r = self.roll()?;
        let amount = if r < 0.70 {
            2
        } else if r < 0.95 {
            3
        } else if self.chance(0.5)? {
            4
        } else {
            5
        };
        Ok(Some(amount))
    }

    fn respond_ordago(
        &self,
        fuerza: i32,
        lance: Lance,
        s: &Signals,
        hand: &[Card],
    ) -> Result<EnviteDecision, AiError> {
        if lance == Lance::Juego && fuerza == 100 && s.es_mano {
            return Ok(EnviteDecision::quiero(s.piedras_restantes));
        }
        if lance == Lance::Pares && is_pair_of_aces(hand) {
            return Ok(EnviteDecision::no_quiero());
        }

        let t = ordago_thresholds(lance);
        let mut umbral = t.aceptar as i32;
        if s.zona_adentro {
            umbral += 5;
        }
        if s.zona_desesperada {
            umbral -= 8;
        }
        if s.info_ventaja {
            umbral -= 5;
        }
        if s.es_mano && matches!(lance, Lance::Grande | Lance::Juego) {
            umbral -= 3;
        }
        if s.fuerza_inferida_rival >= 80 {
            umbral += 3;
        }
        if s.pareja_aposto {
            umbral -= 3;
        }
        if s.pareja_paso {
            umbral += 2;
        }
        let umbral = umbral.max(t.minimo as i32);
        trace!(%lance, fuerza, umbral, "ordago response");

        if fuerza >= umbral {
            Ok(EnviteDecision::quiero(s.piedras_restantes))
        } else {
            Ok(EnviteDecision::no_quiero())
        }
    }

    fn open(&self, fuerza: i32, lance: Lance, s: &Signals) -> Result<EnviteDecision, AiError> {
        let u = umbrales(lance, s.es_mano);
        if fuerza < u.min_absoluto {
            return Ok(EnviteDecision::paso());
        }

        let mut umbral = u.apostar + s.ajuste_memoria + s.info_shift();
        if s.pareja_aposto {
            umbral -= 5;
        }
        if s.pareja_paso && fuerza < umbral + 10 {
            umbral += 2;
        }
        trace!(%lance, fuerza, umbral, "open");

        if fuerza < umbral {
            if fuerza > 25 {
                if let Some(amount) = self.bluff(lance, s)? {
                    trace!(%lance, fuerza, amount, "bluff");
                    return Ok(EnviteDecision::envido(amount));
                }
            }
            return Ok(EnviteDecision::paso());
        }

        let t = ordago_thresholds(lance);
        if fuerza >= t.apertura as i32 && !s.zona_adentro {
            if lance == Lance::Juego && fuerza == 100 && s.es_mano && self.chance(0.35)? {
                return Ok(EnviteDecision::ordago(s.piedras_restantes));
            }
            if self.chance(0.20)? {
                return Ok(EnviteDecision::ordago(s.piedras_restantes));
            }
        }

        // mano with a monster sometimes passes to hunt
        if s.es_mano && fuerza >= 93 && self.chance(0.30)? {
            return Ok(EnviteDecision::paso());
        }

        if s.zona_adentro {
            return Ok(EnviteDecision::envido(2));
        }
        Ok(EnviteDecision::envido(bet_size(fuerza - umbral, s)))
    }

    fn respond(
        &self,
        fuerza: i32,
        current_bet: u8,
        lance: Lance,
        s: &Signals,
        hand: &[Card],
    ) -> Result<EnviteDecision, AiError> {
        let u = umbrales(lance, s.es_mano);
        if fuerza < u.min_absoluto || (lance == Lance::Pares && is_pair_of_aces(hand)) {
            return Ok(EnviteDecision::no_quiero());
        }

        let mut umbral = u.querer + s.ajuste_memoria + s.info_shift();
        if s.fuerza_inferida_rival >= 70 {
            umbral += 5;
        } else if s.fuerza_inferida_rival >= 55 {
            umbral += 2;
        }
        if s.pareja_paso {
            umbral += 3;
        }
        if s.pareja_aposto {
            umbral -= 3;
        }
        trace!(%lance, fuerza, umbral, current_bet, "respond");

        if fuerza < umbral {
            if current_bet <= 2 && fuerza >= umbral - 5 && self.chance(0.3)? {
                return Ok(EnviteDecision::quiero(current_bet));
            }
            return Ok(EnviteDecision::no_quiero());
        }

        let margen = fuerza - umbral;
        if current_bet >= 8 {
            if margen >= 25 || (margen >= 15 && self.chance(0.5)?) {
                return Ok(EnviteDecision::quiero(current_bet));
            }
            return Ok(EnviteDecision::no_quiero());
        }

        if s.zona_adentro {
            if margen >= 10 || (current_bet <= 3 && margen >= 0) {
                return Ok(EnviteDecision::quiero(current_bet));
            }
            return Ok(EnviteDecision::no_quiero());
        }

        let t = ordago_thresholds(lance);
        if fuerza >= t.apertura as i32 && current_bet >= 4 && self.chance(0.20)? {
            return Ok(EnviteDecision::ordago(s.piedras_restantes));
        }

        let raise = (margen >= 30 && self.chance(0.40)?) || (margen >= 20 && self.chance(0.25)?);
        if raise {
            let room = s.piedras_restantes.saturating_sub(current_bet);
            let amount = bet_size(margen, s).min(room);
            if amount > 0 {
                return Ok(EnviteDecision::envido(amount));
            }
        }
        Ok(EnviteDecision::quiero(current_bet))
    }
}

impl<R: RngCore + Send> MusAi for HeuristicPlayer<R> {
    fn decide_mus(&self, hand: &[Card]) -> Result<bool, AiError> {
        let pares = classify_pares(hand);
        let pares_fuerza = pares_strength(hand);
        let juego = tiene_juego(hand);

        if pares.as_ref().is_some_and(|p| p.kind == ParesKind::Duples) || puntos(hand) == 31 {
            return Ok(false);
        }

        if pares.is_some() && juego {
            if pares_fuerza >= 40 {
                return self.chance(0.05);
            }
            if pares_fuerza < 25 && juego_strength(hand) < 30 {
                return self.chance(0.70);
            }
            return self.chance(0.20);
        }

        if pares.as_ref().is_some_and(|p| p.kind == ParesKind::Medias) && pares_fuerza >= 70 {
            return self.chance(0.15);
        }
        if grande_strength(hand) >= 92 || chica_strength(hand) >= 92 {
            return self.chance(0.10);
        }

        let general = general_strength(hand) as f64;
        if general >= 55.0 {
            return self.chance(0.25);
        }
        if general < 25.0 {
            return Ok(true);
        }
        self.chance((55.0 - general) / 55.0)
    }

    fn select_discard(&self, hand: &[Card]) -> Result<Vec<usize>, AiError> {
        let pares = classify_pares(hand);
        let pts = puntos(hand);
        match &pares {
            Some(p) if p.kind == ParesKind::Duples => return Ok(Vec::new()),
            Some(p) if p.kind == ParesKind::Medias && pares_strength(hand) >= 60 => {
                return Ok(Vec::new())
            }
            _ if pts == 31 => return Ok(Vec::new()),
            _ => {}
        }

        let mut scored: Vec<(usize, i32, bool)> = hand
            .iter()
            .enumerate()
            .map(|(idx, &card)| {
                let paired = is_paired(hand, card);
                let orden = card.orden() as i32;
                let value = card.comparison_value();
                let mut score = orden * 2;
                if paired {
                    score += 30;
                }
                if value == Rank::Rey.comparison_value() {
                    score += 10;
                }
                if value == Rank::As.comparison_value() {
                    score += 8;
                }
                if (25..31).contains(&pts) && card.point_value() >= 7 {
                    score += 8;
                }
                if card.point_value() == 10 {
                    score += 5;
                }
                if !paired && (3..=5).contains(&orden) {
                    score -= 5;
                }
                (idx, score, paired)
            })
            .collect();
        scored.sort_by_key(|&(_, score, _)| score);

        let cuantas = match general_strength(hand) {
            g if g < 20 => 3,
            g if g < 30 => 2,
            g if g < 45 => 1,
            _ => 0,
        };
        let mut indices: Vec<usize> = scored
            .into_iter()
            .filter(|&(_, _, paired)| !paired)
            .take(cuantas)
            .map(|(idx, _, _)| idx)
            .collect();
        indices.sort_unstable();
        Ok(indices)
    }

    fn decide_envite(
        &self,
        hand: &[Card],
        lance: Lance,
        current_bet: u8,
        ctx: &EnviteContext,
    ) -> Result<EnviteDecision, AiError> {
        let fuerza = lance_strength(hand, lance) as i32;
        let signals = Signals::read(ctx, lance);

        let decision = if ctx.ordago_activo {
            self.respond_ordago(fuerza, lance, &signals, hand)?
        } else if current_bet == 0 {
            self.open(fuerza, lance, &signals)?
        } else {
            self.respond(fuerza, current_bet, lance, &signals, hand)?
        };
        trace!(%lance, fuerza, current_bet, action = %decision.action, amount = decision.amount, "envite decision");
        Ok(decision)
    }
}
