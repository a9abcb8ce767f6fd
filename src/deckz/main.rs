use clap::Parser;
use colored::*;
use deckz::error::{DeckzError, Result};
use deckz::init::{self, AppContext};
use deckz::model::{Card, Deck};
use deckz::parse::parse_pairs;
use deckz::session::{Answer, QuizSession, StudySession};
use deckz::stats;
use std::io::{self, BufRead, Read, Write};
use unicode_width::UnicodeWidthStr;
use uuid::Uuid;

mod args;
use args::{Cli, Commands};

fn main() {
    env_logger::init();

    let cli = Cli::parse();
    let mut ctx = init::initialize(cli.dir);

    let outcome = run(&mut ctx, cli.command);
    ctx.shutdown();

    if let Err(e) = outcome {
        eprintln!("{} {}", "Error:".red(), e);
        std::process::exit(1);
    }
}

fn run(ctx: &mut AppContext, command: Option<Commands>) -> Result<()> {
    match command {
        Some(Commands::List) | None => handle_list(ctx),
        Some(Commands::Add { title }) => handle_add(ctx, &title),
        Some(Commands::Rename { deck, title }) => handle_rename(ctx, deck, &title),
        Some(Commands::Delete { deck, all }) => handle_delete(ctx, deck, all),
        Some(Commands::Cards { deck, search }) => handle_cards(ctx, deck, search),
        Some(Commands::AddCard { deck, front, back }) => handle_add_card(ctx, deck, &front, &back),
        Some(Commands::EditCard {
            deck,
            card,
            front,
            back,
        }) => handle_edit_card(ctx, deck, card, front, back),
        Some(Commands::RmCard { deck, card }) => handle_rm_card(ctx, deck, card),
        Some(Commands::Move { deck, cards, to }) => handle_move(ctx, deck, &cards, to),
        Some(Commands::Shuffle { deck }) => handle_shuffle(ctx, deck),
        Some(Commands::Mark { deck, card }) => handle_mark(ctx, deck, card),
        Some(Commands::Import { deck, file }) => handle_import(ctx, deck, &file),
        Some(Commands::Quiz { deck, marked }) => handle_quiz(ctx, deck, marked),
        Some(Commands::Study { deck, marked }) => handle_study(ctx, deck, marked),
        Some(Commands::Stats { deck }) => handle_stats(ctx, deck),
        Some(Commands::Reset) => handle_reset(ctx),
    }
}

// --- Resolution ---
// Decks and cards are addressed by the 1-based position shown in the
// listings; stable UUIDs stay internal.

fn resolve_deck(ctx: &AppContext, number: usize) -> Result<Uuid> {
    ctx.store
        .decks()
        .get(number.checked_sub(1).ok_or_else(bad_deck)?)
        .map(|d| d.id)
        .ok_or_else(bad_deck)
}

fn resolve_card(ctx: &AppContext, deck_id: Uuid, number: usize) -> Result<Uuid> {
    let deck = ctx
        .store
        .deck(deck_id)
        .ok_or_else(bad_deck)?;
    deck.cards
        .get(number.checked_sub(1).ok_or_else(bad_card)?)
        .map(|c| c.id)
        .ok_or_else(bad_card)
}

fn bad_deck() -> DeckzError {
    DeckzError::Api("No such deck (see `deckz list` for numbers)".into())
}

fn bad_card() -> DeckzError {
    DeckzError::Api("No such card (see `deckz cards <deck>` for numbers)".into())
}

// --- Deck commands ---

const TITLE_WIDTH: usize = 40;

fn handle_list(ctx: &mut AppContext) -> Result<()> {
    let decks = ctx.store.decks();
    if decks.is_empty() {
        println!("No decks. Create one with `deckz add <title>`.");
        return Ok(());
    }

    for (i, deck) in decks.iter().enumerate() {
        let marked = ctx.store.marked_count(deck.id);
        let title = pad_to_width(&deck.title, TITLE_WIDTH);
        let cards = format!("{:>3} cards", deck.card_count());
        let marked = if marked > 0 {
            format!("  {marked} marked").yellow()
        } else {
            "".normal()
        };
        println!("{:>3}. {}{}{}", i + 1, title.bold(), cards.dimmed(), marked);
    }
    Ok(())
}

fn handle_add(ctx: &mut AppContext, title: &str) -> Result<()> {
    let title = title.trim();
    if title.is_empty() {
        return Err(DeckzError::Api("Deck title cannot be empty".into()));
    }
    ctx.store.add_deck(title);
    println!("{} {}", "Created deck".green(), title.bold());
    Ok(())
}

fn handle_rename(ctx: &mut AppContext, deck: usize, title: &str) -> Result<()> {
    let id = resolve_deck(ctx, deck)?;
    ctx.store.rename_deck(id, title);
    println!("{}", "Renamed.".green());
    Ok(())
}

fn handle_delete(ctx: &mut AppContext, deck: Option<usize>, all: bool) -> Result<()> {
    if all {
        ctx.store.delete_all();
        println!("{}", "Deleted all decks.".green());
        return Ok(());
    }
    let number = deck.ok_or_else(bad_deck)?;
    let id = resolve_deck(ctx, number)?;
    let title = ctx.store.deck(id).map(|d| d.title.clone()).unwrap_or_default();
    ctx.store.delete_deck(id);
    println!("{} {}", "Deleted deck".green(), title.bold());
    Ok(())
}

fn handle_reset(ctx: &mut AppContext) -> Result<()> {
    ctx.store.reset_to_sample();
    println!("{}", "Restored the sample decks.".green());
    Ok(())
}

// --- Card commands ---

fn handle_cards(ctx: &mut AppContext, deck: usize, search: Option<String>) -> Result<()> {
    let id = resolve_deck(ctx, deck)?;

    if let Some(term) = search {
        let hits = ctx.store.search_cards(id, &term);
        if hits.is_empty() {
            println!("No matching cards.");
            return Ok(());
        }
        for card in hits {
            print_card_line(None, card);
        }
        return Ok(());
    }

    let deck = ctx.store.deck(id).ok_or_else(bad_deck)?;
    if deck.cards.is_empty() {
        println!("Deck is empty. Add cards with `deckz add-card` or `deckz import`.");
        return Ok(());
    }
    for (i, card) in deck.cards.iter().enumerate() {
        print_card_line(Some(i + 1), card);
    }
    Ok(())
}

fn print_card_line(number: Option<usize>, card: &Card) {
    let marker = if card.is_marked {
        "★ ".yellow()
    } else {
        "  ".normal()
    };
    let front = pad_to_width(&card.front_text, TITLE_WIDTH);
    match number {
        Some(n) => println!("{n:>3}. {marker}{front}{}", card.back_text.dimmed()),
        None => println!("     {marker}{front}{}", card.back_text.dimmed()),
    }
}

fn handle_add_card(ctx: &mut AppContext, deck: usize, front: &str, back: &str) -> Result<()> {
    let id = resolve_deck(ctx, deck)?;
    if front.trim().is_empty() || back.trim().is_empty() {
        return Err(DeckzError::Api("Both sides of a card must be non-empty".into()));
    }
    ctx.store.add_card(front, back, id);
    println!("{}", "Added card.".green());
    Ok(())
}

fn handle_edit_card(
    ctx: &mut AppContext,
    deck: usize,
    card: usize,
    front: Option<String>,
    back: Option<String>,
) -> Result<()> {
    if front.is_none() && back.is_none() {
        return Err(DeckzError::Api("Nothing to change; pass --front and/or --back".into()));
    }
    let deck_id = resolve_deck(ctx, deck)?;
    let card_id = resolve_card(ctx, deck_id, card)?;
    ctx.store
        .update_card(card_id, deck_id, front.as_deref(), back.as_deref());
    println!("{}", "Updated.".green());
    Ok(())
}

fn handle_rm_card(ctx: &mut AppContext, deck: usize, card: usize) -> Result<()> {
    let deck_id = resolve_deck(ctx, deck)?;
    let card_id = resolve_card(ctx, deck_id, card)?;
    ctx.store.delete_card(card_id, deck_id);
    println!("{}", "Deleted card.".green());
    Ok(())
}

fn handle_move(ctx: &mut AppContext, deck: usize, cards: &[usize], to: usize) -> Result<()> {
    let deck_id = resolve_deck(ctx, deck)?;
    let from: Vec<usize> = cards
        .iter()
        .map(|&n| n.checked_sub(1).ok_or_else(bad_card))
        .collect::<Result<_>>()?;
    let to = to.saturating_sub(1);
    ctx.store.move_cards(deck_id, &from, to);
    println!("{}", "Moved.".green());
    Ok(())
}

fn handle_shuffle(ctx: &mut AppContext, deck: usize) -> Result<()> {
    let deck_id = resolve_deck(ctx, deck)?;
    ctx.store.shuffle_deck(deck_id);
    println!("{}", "Shuffled.".green());
    Ok(())
}

fn handle_mark(ctx: &mut AppContext, deck: usize, card: usize) -> Result<()> {
    let deck_id = resolve_deck(ctx, deck)?;
    let card_id = resolve_card(ctx, deck_id, card)?;
    ctx.store.toggle_mark(card_id, deck_id);
    println!("{}", "Toggled mark.".green());
    Ok(())
}

fn handle_import(ctx: &mut AppContext, deck: usize, file: &std::path::Path) -> Result<()> {
    let deck_id = resolve_deck(ctx, deck)?;

    let text = if file.as_os_str() == "-" {
        let mut buf = String::new();
        io::stdin().read_to_string(&mut buf)?;
        buf
    } else {
        std::fs::read_to_string(file)?
    };

    let pairs = parse_pairs(&text);
    if pairs.is_empty() {
        println!("No card pairs found in the input.");
        return Ok(());
    }
    let count = pairs.len();
    ctx.store.add_cards(&pairs, deck_id);
    println!("{} {count} cards.", "Imported".green());
    Ok(())
}

// --- Sessions ---

fn handle_quiz(ctx: &mut AppContext, deck: usize, marked_only: bool) -> Result<()> {
    let deck_id = resolve_deck(ctx, deck)?;
    let (title, cards) = session_snapshot(ctx, deck_id, marked_only)?;

    let Some(mut session) = QuizSession::new(cards) else {
        println!("{}", empty_snapshot_message(marked_only));
        return Ok(());
    };

    println!("{} {}", "Quiz:".bold(), title);
    println!("{}", "Answer each card with y (knew it), n (missed it) or q to quit.".dimmed());

    let stdin = io::stdin();
    let mut lines = stdin.lock().lines();
    while let Some(card) = session.current_card() {
        println!();
        println!(
            "{} {}",
            format!("[{}/{}]", session.answered() + 1, session.total()).dimmed(),
            card.front_text.bold()
        );
        println!("    {}", card.back_text.cyan());
        print!("y/n/q> ");
        io::stdout().flush()?;

        match read_choice(&mut lines) {
            Some('y') => session.answer(Answer::Correct),
            Some('n') => session.answer(Answer::Wrong),
            Some('q') | None => {
                println!("\n{}", "Quiz abandoned; nothing recorded.".dimmed());
                return Ok(());
            }
            Some(_) => println!("{}", "Please answer y, n or q.".dimmed()),
        }
    }

    // Finished every card: this is the only path that records a result.
    let outcome = session
        .outcome()
        .ok_or_else(|| DeckzError::Api("Quiz ended without an outcome".into()))?;
    ctx.store.record_quiz_result(
        deck_id,
        outcome.correct,
        outcome.wrong,
        outcome.total,
        outcome.elapsed_seconds,
    );

    let accuracy = f64::from(outcome.correct) / f64::from(outcome.total);
    println!();
    println!(
        "{} {}/{} correct ({:.0}%) — grade {}",
        "Done:".green().bold(),
        outcome.correct,
        outcome.total,
        accuracy * 100.0,
        stats::grade(accuracy).to_string().bold()
    );
    Ok(())
}

fn handle_study(ctx: &mut AppContext, deck: usize, marked_only: bool) -> Result<()> {
    let deck_id = resolve_deck(ctx, deck)?;
    let (title, cards) = session_snapshot(ctx, deck_id, marked_only)?;

    let Some(mut session) = StudySession::new(cards, ctx.config.skip_policy()) else {
        println!("{}", empty_snapshot_message(marked_only));
        return Ok(());
    };

    println!("{} {}", "Study:".bold(), title);
    println!(
        "{}",
        "y (knew it), n (missed it), s (skip), q to quit. Cards repeat until you quit.".dimmed()
    );

    let stdin = io::stdin();
    let mut lines = stdin.lock().lines();
    loop {
        let card = session.current_card();
        println!();
        println!("{}", card.front_text.bold());
        println!("    {}", card.back_text.cyan());
        print!("y/n/s/q> ");
        io::stdout().flush()?;

        match read_choice(&mut lines) {
            Some('y') => session.mark_correct(),
            Some('n') => session.mark_wrong(),
            Some('s') => session.skip(),
            Some('q') | None => break,
            Some(_) => println!("{}", "Please answer y, n, s or q.".dimmed()),
        }
    }

    let (right, wrong) = session.tallies();
    println!();
    println!(
        "Session over: {right} right, {wrong} wrong over {} attempts. Not recorded.",
        session.attempted()
    );
    Ok(())
}

/// Order-frozen copy of a deck's cards for a session, optionally reduced
/// to the marked subset; store edits made while a session runs do not
/// reach it.
fn session_snapshot(
    ctx: &AppContext,
    deck_id: Uuid,
    marked_only: bool,
) -> Result<(String, Vec<Card>)> {
    let deck: Deck = ctx.store.deck(deck_id).cloned().ok_or_else(bad_deck)?;
    let cards = if marked_only {
        deck.cards.into_iter().filter(|c| c.is_marked).collect()
    } else {
        deck.cards
    };
    Ok((deck.title, cards))
}

fn empty_snapshot_message(marked_only: bool) -> &'static str {
    if marked_only {
        "No marked cards in this deck."
    } else {
        "Deck is empty; nothing to study."
    }
}

fn read_choice(lines: &mut impl Iterator<Item = io::Result<String>>) -> Option<char> {
    let line = lines.next()?.ok()?;
    line.trim().chars().next().map(|c| c.to_ascii_lowercase())
}

// --- Stats ---

fn handle_stats(ctx: &mut AppContext, deck: Option<usize>) -> Result<()> {
    match deck {
        Some(number) => {
            let deck_id = resolve_deck(ctx, number)?;
            let title = ctx
                .store
                .deck(deck_id)
                .map(|d| d.title.clone())
                .unwrap_or_default();
            print_deck_stats(ctx, deck_id, &title);
        }
        None => {
            let decks: Vec<(Uuid, String)> = ctx
                .store
                .decks()
                .iter()
                .map(|d| (d.id, d.title.clone()))
                .collect();
            if decks.is_empty() {
                println!("No decks.");
                return Ok(());
            }
            for (i, (id, title)) in decks.iter().enumerate() {
                let s = stats::stats_for_deck(ctx.store.history(), *id);
                let mastery = stats::mastery_for_deck(ctx.store.history(), *id);
                let summary = if s.sessions == 0 {
                    "no sessions yet".dimmed().to_string()
                } else {
                    format!(
                        "{} sessions, mastery {:.0}% ({})",
                        s.sessions,
                        mastery * 100.0,
                        stats::grade(mastery)
                    )
                };
                println!("{:>3}. {}{}", i + 1, pad_to_width(title, TITLE_WIDTH).bold(), summary);
            }
        }
    }
    Ok(())
}

fn print_deck_stats(ctx: &AppContext, deck_id: Uuid, title: &str) {
    let history = ctx.store.history();
    let s = stats::stats_for_deck(history, deck_id);
    println!("{} {}", "Stats:".bold(), title);

    if s.sessions == 0 {
        println!("No quiz sessions recorded yet.");
        return;
    }

    let mastery = stats::mastery_for_deck(history, deck_id);
    println!("  sessions: {}", s.sessions);
    println!("  average:  {:.0}%", s.avg_accuracy * 100.0);
    println!("  best:     {:.0}%", s.best_accuracy * 100.0);
    println!(
        "  mastery:  {:.0}% — grade {}",
        mastery * 100.0,
        stats::grade(mastery).to_string().bold()
    );

    println!();
    println!("{}", "Recent sessions (newest first):".dimmed());
    let formatter = timeago::Formatter::new();
    for result in history.iter().filter(|r| r.deck_id == deck_id).take(10) {
        let age = chrono::Utc::now()
            .signed_duration_since(result.date)
            .to_std()
            .unwrap_or_default();
        println!(
            "  {:>3}/{:<3} ({:.0}%)  {}",
            result.correct,
            result.total,
            result.accuracy() * 100.0,
            formatter.convert(age).dimmed()
        );
    }
}

// --- Formatting ---

fn pad_to_width(s: &str, width: usize) -> String {
    let truncated = truncate_to_width(s, width.saturating_sub(2));
    let padding = width.saturating_sub(truncated.width());
    format!("{}{}", truncated, " ".repeat(padding))
}

fn truncate_to_width(s: &str, max_width: usize) -> String {
    use unicode_width::UnicodeWidthChar;

    let mut result = String::new();
    let mut current_width = 0;

    for c in s.chars() {
        let char_width = c.width().unwrap_or(0);
        if current_width + char_width > max_width.saturating_sub(1) {
            result.push('…');
            return result;
        }
        result.push(c);
        current_width += char_width;
    }

    result
}
