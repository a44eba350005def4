//! Card, Suit, Rank and pile identifiers for a standard 52-card deck.
//!
//! - `CardId` is a compact 1-byte identity (0..=51). Identity never
//!   changes during a game; it is what every lookup compares.
//! - `Card` layers the two pieces of mutable play state on top of the
//!   identity: whether the card is face-up (`flipped`) and which pile it
//!   currently sits in (`field`). Only the pile engines change either.
//! - `PileId` names one of the 13 piles on the board.

use core::fmt;
use std::str::FromStr;

use rand::Rng;
use rand::seq::SliceRandom;
use serde::{Deserialize, Serialize};

/// Number of suits in a standard deck.
pub const NUM_SUITS: u8 = 4;
/// Number of ranks in a standard deck.
pub const NUM_RANKS: u8 = 13;
/// Number of cards in a standard deck.
pub const CARDS_PER_DECK: u8 = NUM_SUITS * NUM_RANKS;
/// Number of tableau columns.
pub const NUM_COLUMNS: usize = 7;
/// Number of foundation (goal) piles.
pub const NUM_GOALS: usize = 4;

/// Identity of a card, represented compactly as an index in 0..=51.
///
/// The mapping is:
/// ```text
/// index = suit as u8 * 13 + rank as u8
/// ```
/// where `rank` is 0=Ace, 1=Two, ..., 12=King.
#[derive(Clone, Copy, PartialEq, Eq, Hash, Debug, PartialOrd, Ord)]
pub struct CardId(u8);

impl CardId {
    /// Create an identity from a suit and rank.
    #[inline]
    pub fn new(suit: Suit, rank: Rank) -> Self {
        CardId(suit as u8 * NUM_RANKS + rank as u8)
    }

    /// Create an identity from a raw index, rejecting anything >= 52.
    #[inline]
    pub fn from_index(index: u8) -> Option<Self> {
        (index < CARDS_PER_DECK).then_some(CardId(index))
    }

    /// Return the raw 0..=51 index.
    #[inline]
    pub fn index(self) -> u8 {
        self.0
    }

    #[inline]
    pub fn suit(self) -> Suit {
        Suit::ALL[(self.0 / NUM_RANKS) as usize]
    }

    #[inline]
    pub fn rank(self) -> Rank {
        Rank::ALL[(self.0 % NUM_RANKS) as usize]
    }
}

impl fmt::Display for CardId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}{}", self.rank().short_char(), self.suit().short_char())
    }
}

/// The four suits in a standard deck.
#[derive(Clone, Copy, PartialEq, Eq, Hash, Debug, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
#[repr(u8)]
pub enum Suit {
    Hearts = 0,
    Clubs = 1,
    Spades = 2,
    Diamonds = 3,
}

/// Card colour, the only suit property the tableau rules look at.
#[derive(Clone, Copy, PartialEq, Eq, Hash, Debug)]
pub enum Color {
    Red,
    Black,
}

/// The thirteen ranks in a standard deck.
///
/// Ace is the lowest rank (0); use `number()` to get 1..=13.
#[derive(Clone, Copy, PartialEq, Eq, Hash, Debug, PartialOrd, Ord)]
#[repr(u8)]
pub enum Rank {
    Ace = 0,
    Two,
    Three,
    Four,
    Five,
    Six,
    Seven,
    Eight,
    Nine,
    Ten,
    Jack,
    Queen,
    King, // 12
}

impl Suit {
    /// All suits in a fixed, reproducible order.
    pub const ALL: [Suit; NUM_SUITS as usize] =
        [Suit::Hearts, Suit::Clubs, Suit::Spades, Suit::Diamonds];

    #[inline]
    pub fn color(self) -> Color {
        match self {
            Suit::Hearts | Suit::Diamonds => Color::Red,
            Suit::Clubs | Suit::Spades => Color::Black,
        }
    }

    /// Single-character representation: 'H', 'C', 'S', or 'D'.
    #[inline]
    pub fn short_char(self) -> char {
        match self {
            Suit::Hearts => 'H',
            Suit::Clubs => 'C',
            Suit::Spades => 'S',
            Suit::Diamonds => 'D',
        }
    }
}

impl Rank {
    /// All ranks in a fixed, reproducible order (Ace..King).
    pub const ALL: [Rank; NUM_RANKS as usize] = [
        Rank::Ace,
        Rank::Two,
        Rank::Three,
        Rank::Four,
        Rank::Five,
        Rank::Six,
        Rank::Seven,
        Rank::Eight,
        Rank::Nine,
        Rank::Ten,
        Rank::Jack,
        Rank::Queen,
        Rank::King,
    ];

    /// Construct a rank from its number 1..=13 (Ace=1, King=13).
    #[inline]
    pub fn from_number(n: u8) -> Option<Self> {
        n.checked_sub(1).and_then(|i| Rank::ALL.get(i as usize).copied())
    }

    /// Rank number in 1..=13 (Ace=1, King=13).
    #[inline]
    pub fn number(self) -> u8 {
        self as u8 + 1
    }

    #[inline]
    pub fn short_char(self) -> char {
        match self {
            Rank::Ace => 'A',
            Rank::Two => '2',
            Rank::Three => '3',
            Rank::Four => '4',
            Rank::Five => '5',
            Rank::Six => '6',
            Rank::Seven => '7',
            Rank::Eight => '8',
            Rank::Nine => '9',
            Rank::Ten => 'T',
            Rank::Jack => 'J',
            Rank::Queen => 'Q',
            Rank::King => 'K',
        }
    }
}

/// Identifier of one of the 13 piles on the board.
///
/// The string form matches the persisted snapshot keys (`deckPile`,
/// `flippedPile`, `column1Pile`..`column7Pile`, `goal1Pile`..`goal4Pile`).
/// Column and goal indices are 0-based internally.
#[derive(Clone, Copy, PartialEq, Eq, Hash, Debug, Serialize, Deserialize)]
#[serde(into = "String", try_from = "String")]
pub enum PileId {
    Deck,
    Flipped,
    Column(u8),
    Goal(u8),
}

impl PileId {
    /// Column pile for a 0-based index, if it exists.
    pub fn column(index: usize) -> Option<Self> {
        (index < NUM_COLUMNS).then_some(PileId::Column(index as u8))
    }

    /// Goal pile for a 0-based index, if it exists.
    pub fn goal(index: usize) -> Option<Self> {
        (index < NUM_GOALS).then_some(PileId::Goal(index as u8))
    }

    pub fn columns() -> impl Iterator<Item = PileId> {
        (0..NUM_COLUMNS as u8).map(PileId::Column)
    }

    pub fn goals() -> impl Iterator<Item = PileId> {
        (0..NUM_GOALS as u8).map(PileId::Goal)
    }

    /// Every pile on the board, in snapshot order.
    pub fn all() -> impl Iterator<Item = PileId> {
        [PileId::Deck, PileId::Flipped]
            .into_iter()
            .chain(PileId::columns())
            .chain(PileId::goals())
    }

    pub fn is_column(self) -> bool {
        matches!(self, PileId::Column(_))
    }

    pub fn is_goal(self) -> bool {
        matches!(self, PileId::Goal(_))
    }
}

impl fmt::Display for PileId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PileId::Deck => f.write_str("deckPile"),
            PileId::Flipped => f.write_str("flippedPile"),
            PileId::Column(i) => write!(f, "column{}Pile", i + 1),
            PileId::Goal(i) => write!(f, "goal{}Pile", i + 1),
        }
    }
}

/// Error returned when a string is not a known pile name.
#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
#[error("unknown pile id '{0}'")]
pub struct ParsePileIdError(pub String);

impl FromStr for PileId {
    type Err = ParsePileIdError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let numbered = |prefix: &str, max: usize| -> Option<u8> {
            let n: usize = s.strip_prefix(prefix)?.strip_suffix("Pile")?.parse().ok()?;
            (1..=max).contains(&n).then(|| (n - 1) as u8)
        };
        match s {
            "deckPile" => Ok(PileId::Deck),
            "flippedPile" => Ok(PileId::Flipped),
            _ => numbered("column", NUM_COLUMNS)
                .map(PileId::Column)
                .or_else(|| numbered("goal", NUM_GOALS).map(PileId::Goal))
                .ok_or_else(|| ParsePileIdError(s.to_string())),
        }
    }
}

impl From<PileId> for String {
    fn from(id: PileId) -> Self {
        id.to_string()
    }
}

impl TryFrom<String> for PileId {
    type Error = ParsePileIdError;

    fn try_from(s: String) -> Result<Self, Self::Error> {
        s.parse()
    }
}

/// A playing card: a fixed identity plus its face state and location.
///
/// Equality is structural, so two snapshots compare equal only when every
/// card agrees on face state and location too. Code that needs to find
/// "the same card" compares `id()`.
#[derive(Clone, Copy, PartialEq, Eq, Hash, Debug, Serialize, Deserialize)]
#[serde(try_from = "CardRecord", into = "CardRecord")]
pub struct Card {
    id: CardId,
    flipped: bool,
    field: PileId,
}

impl Card {
    /// Create a face-down card sitting in the deck pile.
    #[inline]
    pub fn new(suit: Suit, rank: Rank) -> Self {
        Card {
            id: CardId::new(suit, rank),
            flipped: false,
            field: PileId::Deck,
        }
    }

    /// Builder used by tests and snapshot decoding.
    #[inline]
    pub fn with_state(mut self, flipped: bool, field: PileId) -> Self {
        self.flipped = flipped;
        self.field = field;
        self
    }

    #[inline]
    pub fn id(&self) -> CardId {
        self.id
    }

    #[inline]
    pub fn suit(&self) -> Suit {
        self.id.suit()
    }

    #[inline]
    pub fn rank(&self) -> Rank {
        self.id.rank()
    }

    /// Rank number in 1..=13 (Ace=1, King=13).
    #[inline]
    pub fn rank_number(&self) -> u8 {
        self.rank().number()
    }

    #[inline]
    pub fn color(&self) -> Color {
        self.suit().color()
    }

    /// Whether the card is face-up.
    #[inline]
    pub fn flipped(&self) -> bool {
        self.flipped
    }

    /// The pile this card currently belongs to.
    #[inline]
    pub fn field(&self) -> PileId {
        self.field
    }

    /// Image file name for the card face, e.g. `"7C.png"`.
    pub fn image(&self) -> String {
        format!("{}.png", self.short_str())
    }

    /// Short string like "AH", "7C", "TD", "KS".
    pub fn short_str(&self) -> String {
        self.id.to_string()
    }

    #[inline]
    pub(crate) fn set_flipped(&mut self, flipped: bool) {
        self.flipped = flipped;
    }

    #[inline]
    pub(crate) fn set_field(&mut self, field: PileId) {
        self.field = field;
    }
}

impl fmt::Display for Card {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Display::fmt(&self.id, f)
    }
}

/// Wire form of a card in persisted snapshots.
#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
struct CardRecord {
    id: u8,
    rank: u8,
    suit: Suit,
    image: String,
    flipped: bool,
    card_field: PileId,
}

impl From<Card> for CardRecord {
    fn from(card: Card) -> Self {
        CardRecord {
            id: card.id.index(),
            rank: card.rank_number(),
            suit: card.suit(),
            image: card.image(),
            flipped: card.flipped,
            card_field: card.field,
        }
    }
}

/// Error for a persisted card whose fields disagree with each other.
#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
#[error("invalid card record: {0}")]
pub struct InvalidCardRecord(String);

impl TryFrom<CardRecord> for Card {
    type Error = InvalidCardRecord;

    fn try_from(rec: CardRecord) -> Result<Self, Self::Error> {
        let id = CardId::from_index(rec.id)
            .ok_or_else(|| InvalidCardRecord(format!("id {} out of range", rec.id)))?;
        let rank = Rank::from_number(rec.rank)
            .ok_or_else(|| InvalidCardRecord(format!("rank {} out of range", rec.rank)))?;
        if id != CardId::new(rec.suit, rank) {
            return Err(InvalidCardRecord(format!(
                "id {} does not match {:?} {}",
                rec.id, rec.suit, rec.rank
            )));
        }
        Ok(Card {
            id,
            flipped: rec.flipped,
            field: rec.card_field,
        })
    }
}

/// Colour of a card.
#[inline]
pub fn color_of(card: &Card) -> Color {
    card.color()
}

/// Tableau stacking rule: may `lower` be placed directly on `upper`?
///
/// True if `lower` is exactly one rank below `upper` and the colours
/// differ.
#[inline]
pub fn is_sequential(upper: &Card, lower: &Card) -> bool {
    lower.rank_number() + 1 == upper.rank_number() && upper.color() != lower.color()
}

/// Generate a standard 52-card deck in a fixed order, all face-down in
/// the deck pile.
///
/// Suits follow `Suit::ALL` order, and ranks follow `Rank::ALL` order.
pub fn standard_deck() -> Vec<Card> {
    Suit::ALL
        .iter()
        .flat_map(|&suit| Rank::ALL.iter().map(move |&rank| Card::new(suit, rank)))
        .collect()
}

/// A uniformly random permutation of the standard deck.
pub fn create_shuffled_deck<R: Rng + ?Sized>(rng: &mut R) -> Vec<Card> {
    let mut deck = standard_deck();
    deck.shuffle(rng);
    deck
}
