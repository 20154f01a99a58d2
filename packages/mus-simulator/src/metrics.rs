//! Metrics collection and output for simulation results.

use std::collections::BTreeMap;

use mus_core::domain::Resolution;
use mus_core::Team;
use serde::Serialize;

use crate::simulator::{GameResult, RoundSummary};
use crate::types::MetricsLevel;

/// Complete game metrics for output.
#[derive(Debug, Clone, Serialize)]
pub struct GameMetrics {
    pub game_id: u32,
    pub seed: u64,
    pub timestamp: String,
    pub config: GameConfig,
    pub result: GameResultMetrics,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub rounds: Vec<RoundMetrics>,
    pub seat_metrics: Vec<SeatMetrics>,
}

#[derive(Debug, Clone, Serialize)]
pub struct GameConfig {
    pub ai_types: [String; 4],
    pub total_games: u32,
}

#[derive(Debug, Clone, Serialize)]
pub struct GameResultMetrics {
    pub winner: Team,
    pub piedras: [u8; 2],
    pub rounds_played: usize,
    pub ended_by_ordago: bool,
    /// Lances resolved per reason, keyed by `paso`, `quiero`, `no_quiero`, `ordago`.
    pub lances_by_reason: BTreeMap<String, u32>,
    pub mus_rounds: u32,
    pub duration_ms: f64,
}

#[derive(Debug, Clone, Serialize)]
pub struct RoundMetrics {
    pub round_no: u32,
    pub mano: u8,
    pub mus_rounds: u8,
    pub lances: Vec<LanceMetrics>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub skipped: Vec<String>,
    pub piedras: [u8; 2],
}

#[derive(Debug, Clone, Serialize)]
pub struct LanceMetrics {
    pub lance: String,
    pub ganador: Option<Team>,
    pub puntos: u8,
    pub razon: Resolution,
}

#[derive(Debug, Clone, Serialize)]
pub struct SeatMetrics {
    pub seat: u8,
    pub team: Team,
    pub ai_type: String,
    pub won: bool,
    pub actions: u32,
    pub cuts: u32,
    pub bets: u32,
    pub ordagos: u32,
}

/// Build metrics from a finished game.
pub fn build_game_metrics(
    game_id: u32,
    seed: u64,
    ai_types: [String; 4],
    total_games: u32,
    result: &GameResult,
    duration_ms: f64,
    level: MetricsLevel,
) -> GameMetrics {
    let timestamp = time::OffsetDateTime::now_utc()
        .format(&time::format_description::well_known::Rfc3339)
        .unwrap_or_else(|_| String::from("unknown"));

    let mut lances_by_reason = BTreeMap::new();
    for lance in result.rounds.iter().flat_map(|r| &r.lances) {
        *lances_by_reason.entry(reason_key(lance.razon)).or_insert(0) += 1;
    }

    let rounds = match level {
        MetricsLevel::Basic => Vec::new(),
        MetricsLevel::Detailed => result.rounds.iter().map(build_round_metrics).collect(),
    };

    let seat_metrics = (0..4u8)
        .map(|seat| {
            let idx = seat as usize;
            let team = Team::of(seat);
            SeatMetrics {
                seat,
                team,
                ai_type: ai_types[idx].clone(),
                won: team == result.winner,
                actions: result.actions[idx],
                cuts: result.cuts[idx],
                bets: result.bets[idx],
                ordagos: result.ordagos[idx],
            }
        })
        .collect();

    GameMetrics {
        game_id,
        seed,
        timestamp,
        config: GameConfig {
            ai_types,
            total_games,
        },
        result: GameResultMetrics {
            winner: result.winner,
            piedras: result.piedras,
            rounds_played: result.rounds.len(),
            ended_by_ordago: result.ended_by_ordago,
            lances_by_reason,
            mus_rounds: result.rounds.iter().map(|r| r.mus_rounds as u32).sum(),
            duration_ms,
        },
        rounds,
        seat_metrics,
    }
}

fn reason_key(razon: Resolution) -> String {
    serde_json::to_value(razon)
        .ok()
        .and_then(|v| v.as_str().map(str::to_owned))
        .unwrap_or_else(|| format!("{razon:?}"))
}

fn build_round_metrics(round: &RoundSummary) -> RoundMetrics {
    RoundMetrics {
        round_no: round.round_no,
        mano: round.mano,
        mus_rounds: round.mus_rounds,
        lances: round
            .lances
            .iter()
            .map(|l| LanceMetrics {
                lance: l.lance.to_string(),
                ganador: l.ganador,
                puntos: l.puntos,
                razon: l.razon,
            })
            .collect(),
        skipped: round.skipped.iter().map(ToString::to_string).collect(),
        piedras: round.piedras,
    }
}

/// CSV summary row for quick analysis.
#[derive(Debug, Serialize)]
pub struct CsvSummaryRow {
    pub game_id: u32,
    pub seed: u64,
    pub winner: String,
    pub equipo1: u8,
    pub equipo2: u8,
    pub rounds: usize,
    pub ordago: bool,
    pub seat0_ai: String,
    pub seat1_ai: String,
    pub seat2_ai: String,
    pub seat3_ai: String,
}

impl From<&GameMetrics> for CsvSummaryRow {
    fn from(metrics: &GameMetrics) -> Self {
        let [seat0_ai, seat1_ai, seat2_ai, seat3_ai] = metrics.config.ai_types.clone();
        CsvSummaryRow {
            game_id: metrics.game_id,
            seed: metrics.seed,
            winner: metrics.result.winner.to_string(),
            equipo1: metrics.result.piedras[0],
            equipo2: metrics.result.piedras[1],
            rounds: metrics.result.rounds_played,
            ordago: metrics.result.ended_by_ordago,
            seat0_ai,
            seat1_ai,
            seat2_ai,
            seat3_ai,
        }
    }
}
