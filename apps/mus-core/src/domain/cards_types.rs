//! Core card-related types: Card, Rank, Suit
//!
//! The Spanish deck has 40 cards: four suits and ranks 1–7 plus the three
//! figures (10 Sota, 11 Caballo, 12 Rey). Every rank-derived value used by the
//! engine or by the bots comes from the single table in [`Rank`]: the 3 plays
//! as a King and the 2 plays as an Ace everywhere.

#[derive(Debug, Copy, Clone, Eq, PartialEq, Ord, PartialOrd, Hash)]
pub enum Suit {
    Oros,
    Copas,
    Espadas,
    Bastos,
}

impl Suit {
    pub const ALL: [Suit; 4] = [Suit::Oros, Suit::Copas, Suit::Espadas, Suit::Bastos];
}

#[derive(Debug, Copy, Clone, Eq, PartialEq, Ord, PartialOrd, Hash)]
pub enum Rank {
    As,
    Dos,
    Tres,
    Cuatro,
    Cinco,
    Seis,
    Siete,
    Sota,
    Caballo,
    Rey,
}

impl Rank {
    pub const ALL: [Rank; 10] = [
        Rank::As,
        Rank::Dos,
        Rank::Tres,
        Rank::Cuatro,
        Rank::Cinco,
        Rank::Seis,
        Rank::Siete,
        Rank::Sota,
        Rank::Caballo,
        Rank::Rey,
    ];

    /// Printed number on the card (no 8 or 9 in the Spanish deck).
    pub const fn number(self) -> u8 {
        match self {
            Rank::As => 1,
            Rank::Dos => 2,
            Rank::Tres => 3,
            Rank::Cuatro => 4,
            Rank::Cinco => 5,
            Rank::Seis => 6,
            Rank::Siete => 7,
            Rank::Sota => 10,
            Rank::Caballo => 11,
            Rank::Rey => 12,
        }
    }

    pub fn from_number(n: u8) -> Option<Rank> {
        Rank::ALL.into_iter().find(|r| r.number() == n)
    }

    /// Rank after Mus normalization: 3 → Rey, 2 → As.
    pub const fn normalized(self) -> Rank {
        match self {
            Rank::Tres => Rank::Rey,
            Rank::Dos => Rank::As,
            other => other,
        }
    }

    /// Value used to compare hands in Grande, Chica and Pares (3→12, 2→1).
    pub const fn comparison_value(self) -> u8 {
        self.normalized().number()
    }

    /// Value used for Juego and Punto (figures and 3 → 10, 2 → 1).
    pub const fn point_value(self) -> u8 {
        match self.normalized() {
            Rank::Sota | Rank::Caballo | Rank::Rey => 10,
            other => other.number(),
        }
    }

    /// Dense 1..=8 ordering of the normalized rank (As = 1, Rey = 8).
    pub const fn orden(self) -> u8 {
        orden_for_value(self.comparison_value())
    }

    pub const fn name(self) -> &'static str {
        match self {
            Rank::As => "As",
            Rank::Dos => "Dos",
            Rank::Tres => "Tres",
            Rank::Cuatro => "Cuatro",
            Rank::Cinco => "Cinco",
            Rank::Seis => "Seis",
            Rank::Siete => "Siete",
            Rank::Sota => "Sota",
            Rank::Caballo => "Caballo",
            Rank::Rey => "Rey",
        }
    }
}

/// Maps a comparison value (1, 4..=7, 10..=12) onto the dense 1..=8 scale.
pub const fn orden_for_value(value: u8) -> u8 {
    match value {
        12 => 8,
        11 => 7,
        10 => 6,
        7 => 5,
        6 => 4,
        5 => 3,
        4 => 2,
        _ => 1,
    }
}

#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash)]
pub struct Card {
    pub suit: Suit,
    pub rank: Rank,
}

impl Card {
    pub const fn new(suit: Suit, rank: Rank) -> Self {
        Self { suit, rank }
    }

    pub const fn comparison_value(self) -> u8 {
        self.rank.comparison_value()
    }

    pub const fn point_value(self) -> u8 {
        self.rank.point_value()
    }

    pub const fn orden(self) -> u8 {
        self.rank.orden()
    }

    /// Human-readable Spanish name, e.g. "Rey de oros".
    pub fn nombre(self) -> String {
        let palo = match self.suit {
            Suit::Oros => "oros",
            Suit::Copas => "copas",
            Suit::Espadas => "espadas",
            Suit::Bastos => "bastos",
        };
        format!("{} de {palo}", self.rank.name())
    }
}

// Note: Ord on Card is only for stable sorting (suit, then rank).
// Lance comparisons go through the evaluator.
impl Ord for Card {
    fn cmp(&self, other: &Self) -> std::cmp::Ordering {
        match self.suit.cmp(&other.suit) {
            std::cmp::Ordering::Equal => self.rank.cmp(&other.rank),
            ord => ord,
        }
    }
}

impl PartialOrd for Card {
    fn partial_cmp(&self, other: &Self) -> Option<std::cmp::Ordering> {
        Some(self.cmp(other))
    }
}

/// The 40 cards in canonical order (suit-major).
pub fn full_deck() -> Vec<Card> {
    let mut deck = Vec::with_capacity(40);
    for suit in Suit::ALL {
        for rank in Rank::ALL {
            deck.push(Card { suit, rank });
        }
    }
    deck
}
