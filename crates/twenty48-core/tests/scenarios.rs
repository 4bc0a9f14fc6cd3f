use rand::rngs::StdRng;
use rand::SeedableRng;
use twenty48_core::{
    apply_move, is_terminal, new_game, reduce_row, Board, Direction, Engine, TerminalRule,
};

#[test]
fn pair_in_top_row_pushed_left() {
    let start = Board::from_rows([[2, 2, 0, 0], [0; 4], [0; 4], [0; 4]]).unwrap();
    for seed in 0..32 {
        let mut rng = StdRng::seed_from_u64(seed);
        let r = apply_move(start, 0, Direction::Left, &mut rng);
        assert!(r.changed);
        assert!(!r.game_over);
        assert_eq!(r.score, 4);
        assert_eq!(r.board.get((0, 0)), 4);

        let others: Vec<_> = r
            .board
            .cells()
            .filter(|&(cell, v)| cell != (0, 0) && v != 0)
            .collect();
        assert_eq!(others.len(), 1, "seed {seed}");
        assert!(matches!(others[0].1, 2 | 4));
    }
}

#[test]
fn board_of_twos_is_terminal_under_default_rule() {
    let twos = Board::from_rows([[2; 4]; 4]).unwrap();
    assert!(is_terminal(twos));
    assert!(Engine::default().is_terminal(twos));
    assert!(!Engine::new(TerminalRule::NoMoves).is_terminal(twos));
}

#[test]
fn triple_run_pushed_right() {
    let r = reduce_row([2, 2, 2, 0]);
    assert_eq!(r.line, [0, 0, 2, 4]);
    assert_eq!(r.gained, 4);
}

#[test]
fn seeded_games_replay_identically() {
    let play = |seed: u64| {
        let mut rng = StdRng::seed_from_u64(seed);
        let mut game = new_game(&mut rng);
        let mut moves = 0;
        while !game.game_over && moves < 500 {
            let dir = Direction::ALL[moves % 4];
            let r = apply_move(game.board, game.score, dir, &mut rng);
            game.board = r.board;
            game.score = r.score;
            game.game_over = r.game_over;
            moves += 1;
        }
        game
    };
    assert_eq!(play(11), play(11));
    let g = play(11);
    assert!(g.score > 0);
    assert_eq!(g.score % 4, 0);
}
