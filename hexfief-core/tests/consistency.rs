//! Cross-checks between the fast search path and the full engine
//!
//! The search path mutates the real grid through its own apply/undo pair.
//! These properties pin down (a) exact reversibility over arbitrary
//! reachable action sequences and (b) agreement with the full rules on
//! the action subset the fast path supports.

use proptest::prelude::*;

use hexfief_core::search::{self, SearchAction};
use hexfief_core::{apply_action, generate_map, legal_actions, Action, GameState, MapConfig};

fn seeded_state(seed: u64) -> GameState {
    let config = MapConfig::new(10, 8, 2, seed).expect("dimensions are valid");
    let mut state = generate_map(&config).expect("valid config generates");
    state.start_turn();
    // Put a few units on the board so the move set is non-trivial.
    let buys: Vec<Action> = legal_actions(&state)
        .into_iter()
        .filter(|a| matches!(a, Action::BuyUnit { .. }))
        .take(4)
        .collect();
    for action in buys {
        let _ = apply_action(&mut state, action);
    }
    state
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(48))]

    #[test]
    fn apply_undo_restores_the_grid_bit_for_bit(
        seed in 0u64..500,
        picks in prop::collection::vec(any::<prop::sample::Index>(), 1..24),
    ) {
        let mut state = seeded_state(seed);
        let players = state.players().len();
        let mut current = state.current_index();
        let grid = state.grid_mut();
        let snapshot = grid.clone();

        let mut trail = Vec::new();
        for pick in &picks {
            let actions = search::search_actions(grid, current as u8);
            let action = actions[pick.index(actions.len())];
            let (next, undo) = search::apply(grid, current, players, action);
            trail.push(undo);
            current = next;
        }
        for undo in trail.into_iter().rev() {
            search::undo(grid, undo);
        }
        prop_assert_eq!(&*grid, &snapshot);
    }

    #[test]
    fn fast_path_agrees_with_the_engine(seed in 0u64..500) {
        let state = seeded_state(seed);
        let pid = state.current_player().id;
        let grid = state.grid();

        // Everything the fast path generates must be engine-legal and
        // land the same power on the same owner's hex.
        for action in search::search_actions(grid, pid) {
            match action {
                SearchAction::Capture { from, to } => {
                    let mut probe = state.clone();
                    apply_action(&mut probe, Action::Attack { from, to })
                        .expect("fast-path capture must be engine-legal");
                    prop_assert_eq!(probe.grid()[to].owner, Some(pid));
                    prop_assert_eq!(probe.grid()[to].unit, grid[from].unit);
                    prop_assert!(!probe.grid()[from].has_unit());
                }
                SearchAction::Step { from, to } => {
                    let mut probe = state.clone();
                    apply_action(&mut probe, Action::Move { from, to })
                        .expect("fast-path step must be engine-legal");
                    prop_assert_eq!(probe.grid()[to].unit, grid[from].unit);
                    prop_assert_eq!(probe.grid()[to].owner, grid[to].owner);
                    prop_assert!(!probe.grid()[from].has_unit());
                }
                SearchAction::EndTurn => {}
            }
        }

        // And the other way round: every adjacent engine move or attack
        // in the supported subset must be generated by the fast path.
        let fast = search::search_actions(grid, pid);
        for action in legal_actions(&state) {
            match action {
                Action::Attack { from, to } if grid.neighbors(from).any(|n| n == to) => {
                    prop_assert!(
                        fast.contains(&SearchAction::Capture { from, to }),
                        "engine attack {from}->{to} missing from fast path"
                    );
                }
                Action::Move { from, to }
                    if grid.neighbors(from).any(|n| n == to) && grid[to].is_open() =>
                {
                    prop_assert!(
                        fast.contains(&SearchAction::Step { from, to }),
                        "engine move {from}->{to} missing from fast path"
                    );
                }
                _ => {}
            }
        }
    }
}
