use clap::{Parser, Subcommand};
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(name = "deckz")]
#[command(about = "Command-line flashcard decks, quizzes and study stats", long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Option<Commands>,

    /// Data directory (defaults to the platform data dir)
    #[arg(long, global = true)]
    pub dir: Option<PathBuf>,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// List decks
    #[command(alias = "ls")]
    List,

    /// Create a new deck
    #[command(alias = "n")]
    Add {
        /// Title of the deck
        title: String,
    },

    /// Rename a deck
    Rename {
        /// Deck number (from `deckz list`)
        deck: usize,
        title: String,
    },

    /// Delete a deck and all its cards
    #[command(alias = "rm")]
    Delete {
        /// Deck number
        #[arg(required_unless_present = "all")]
        deck: Option<usize>,

        /// Delete every deck
        #[arg(long, conflicts_with = "deck")]
        all: bool,
    },

    /// List a deck's cards
    Cards {
        /// Deck number
        deck: usize,

        /// Only cards whose front or back contains this text
        #[arg(short, long)]
        search: Option<String>,
    },

    /// Add a card to a deck
    #[command(name = "add-card", alias = "c")]
    AddCard {
        /// Deck number
        deck: usize,
        front: String,
        back: String,
    },

    /// Edit one or both sides of a card
    #[command(name = "edit-card")]
    EditCard {
        /// Deck number
        deck: usize,
        /// Card number (from `deckz cards`)
        card: usize,

        #[arg(long)]
        front: Option<String>,

        #[arg(long)]
        back: Option<String>,
    },

    /// Delete a card
    #[command(name = "rm-card")]
    RmCard {
        /// Deck number
        deck: usize,
        /// Card number
        card: usize,
    },

    /// Move cards to a new position within their deck
    #[command(name = "move")]
    Move {
        /// Deck number
        deck: usize,

        /// Card numbers to move (e.g. 1 3)
        #[arg(required = true, num_args = 1..)]
        cards: Vec<usize>,

        /// Position the block lands at
        #[arg(long)]
        to: usize,
    },

    /// Shuffle a deck's card order
    Shuffle {
        /// Deck number
        deck: usize,
    },

    /// Toggle a card's marked flag
    Mark {
        /// Deck number
        deck: usize,
        /// Card number
        card: usize,
    },

    /// Import front/back pairs from a text file (one pair per line)
    Import {
        /// Deck number
        deck: usize,
        /// File to read; "-" for stdin
        file: PathBuf,
    },

    /// Run a scored quiz over a deck
    #[command(alias = "q")]
    Quiz {
        /// Deck number
        deck: usize,

        /// Only quiz the marked cards
        #[arg(long)]
        marked: bool,
    },

    /// Free study: flip through a deck without a recorded score
    Study {
        /// Deck number
        deck: usize,

        /// Only study the marked cards
        #[arg(long)]
        marked: bool,
    },

    /// Show quiz statistics and mastery
    Stats {
        /// Deck number (omit for all decks)
        deck: Option<usize>,
    },

    /// Replace all decks with the built-in sample data
    Reset,
}
