use std::io::Write;

use knights_tour::board::Square;
use knights_tour::game::{ClickOutcome, Game, START_SQUARE};
use knights_tour::stats::{MemoryBackend, StatsStore};
use rand::Rng;

const GAMES: usize = 100_000;
const PROGRESS_EVERY: usize = 10_000;

/// Play one game to the end, picking uniformly among legal moves until the
/// knight is stuck or the tour is complete. Returns the squares toured,
/// start included.
fn play_game(game: &mut Game, rng: &mut impl Rng) -> Vec<Square> {
    let mut path = vec![START_SQUARE];
    loop {
        let moves = game.legal_moves();
        if moves.is_empty() {
            return path;
        }
        let target = moves[rng.gen_range(0..moves.len())];
        match game.click(target) {
            ClickOutcome::Rejected => return path,
            ClickOutcome::Moved => path.push(target),
            ClickOutcome::Won => {
                path.push(target);
                return path;
            }
        }
    }
}

fn main() {
    println!(
        "=== Knight's Tour random-play simulation (built {}) ===",
        env!("BUILD_TIMESTAMP")
    );
    println!(
        "Games: {GAMES}, board: 5x5, start square: {}\n",
        START_SQUARE.to_algebraic()
    );

    let mut rng = rand::thread_rng();
    let mut game = Game::new(StatsStore::load(Box::new(MemoryBackend::new())));

    let mut total_visited: u64 = 0;
    let mut wins: usize = 0;
    let mut games_by_length = [0usize; 26];
    let mut best_path: Vec<Square> = Vec::new();

    for i in 0..GAMES {
        if i > 0 {
            game.reset();
        }
        let path = play_game(&mut game, &mut rng);
        total_visited += path.len() as u64;
        games_by_length[path.len()] += 1;
        if game.session().won {
            wins += 1;
        }
        if path.len() > best_path.len() {
            best_path = path;
        }

        if (i + 1) % PROGRESS_EVERY == 0 {
            print!("  {} / {GAMES} games played...\r", i + 1);
            std::io::stdout().flush().ok();
        }
    }
    println!();

    let mean = total_visited as f64 / GAMES as f64;
    println!("--- Results ---\n");
    println!("  mean squares visited: {mean:.2}");
    println!("  best tour length:     {} of 25 squares", best_path.len());
    println!("  completed tours:      {wins}");

    println!("\n  distribution (squares visited -> games):");
    for (visited, count) in games_by_length.iter().enumerate() {
        if *count > 0 {
            println!("    {visited:>2}  {count}");
        }
    }

    let squares: Vec<String> = best_path.iter().map(|s| s.to_algebraic()).collect();
    println!("\n  longest tour found:");
    println!("    {}", squares.join(" "));

    let stats = game.stats();
    println!("\n--- Accumulated stats record ---\n");
    println!("  games played:     {}", stats.games_played);
    println!("  best score:       {}", stats.best_score);
    match stats.min_moves_to_win {
        Some(moves) => println!("  min moves to win: {moves}"),
        None => println!("  min moves to win: -"),
    }
}
