use ludo_tactical_engine::{
    init_match, legal_actions, move_piece, roll, BankEntry, BankSource, Color, EventType, MatchState, Player,
    RulesConfig, ScriptedEntropy, TriggerKind, TurnPhase, HOME, YARD,
};

fn new_match() -> MatchState {
    init_match(
        "SCEN",
        vec![Player::new("red", "Red", Color::Red), Player::new("green", "Green", Color::Green)],
        RulesConfig::default(),
        &mut ScriptedEntropy::new([1]),
    )
    .expect("two seats")
}

fn with_bank(mut state: MatchState, values: &[u8]) -> MatchState {
    for &value in values {
        state.turn.bank_sequence += 1;
        let id = state.turn.bank_sequence;
        state.turn.bank.push(BankEntry { id, value, source: BankSource::Base, created_at_sequence: id });
    }
    state.turn.phase = TurnPhase::AwaitingMove;
    state
}

#[test]
fn yard_exit_on_six_keeps_the_turn() {
    let state = new_match();
    let rolled = roll(&state, "red", &mut ScriptedEntropy::new([6, 2])).expect("roll");
    assert_eq!(rolled.rolls_added.len(), 2);
    assert_eq!(rolled.rolls_added[1].source, BankSource::ChainBonus);

    let exit = legal_actions(&rolled.state, "red").into_iter().find(|a| a.die_value == 6).expect("exit");
    let moved = move_piece(&rolled.state, "red", &exit, &mut ScriptedEntropy::new([1])).expect("move");
    assert_eq!(moved.state.players[0].tokens[exit.piece_index].position, Color::Red.start_index());
    assert_eq!(moved.state.active_player_id, "red");
    assert_eq!(moved.state.turn.phase, TurnPhase::AwaitingMove);

    let step = legal_actions(&moved.state, "red")[0];
    let done = move_piece(&moved.state, "red", &step, &mut ScriptedEntropy::new([1])).expect("move");
    assert_eq!(done.state.active_player_id, "green");
    assert_eq!(done.state.turn.phase, TurnPhase::AwaitingRoll);
    assert_eq!(done.state.turn.bonus_chain, 0);
}

#[test]
fn plain_capture_sends_victim_home_and_pays_a_die() {
    let mut state = with_bank(new_match(), &[3]);
    state.players[0].tokens[0].position = 20;
    state.players[1].tokens[0].position = 23;

    let action = legal_actions(&state, "red").into_iter().find(|a| a.piece_index == 0).expect("capture move");
    let res = move_piece(&state, "red", &action, &mut ScriptedEntropy::new([4])).expect("move");

    assert_eq!(res.state.players[1].tokens[0].position, YARD);
    assert_eq!(res.state.players[0].tokens[0].position, 23);
    assert_eq!(res.bonus_triggers.len(), 1);
    assert_eq!(res.bonus_triggers[0].kind, TriggerKind::Kill);
    assert_eq!(res.state.turn.bank.len(), 1);
    assert_eq!(res.state.turn.bank[0].source, BankSource::KillBonus);
    assert_eq!(res.state.active_player_id, "red");
    let event = res.state.last_event.expect("event");
    assert_eq!(event.ty, EventType::PieceMoved);
    assert_eq!(event.payload["captured"][0]["playerId"], "green");
}

#[test]
fn capture_takes_every_enemy_token_on_the_square() {
    let mut state = with_bank(new_match(), &[4]);
    state.players[0].tokens[0].position = 20;
    state.players[0].tokens[1].position = 20;
    state.players[1].tokens[0].position = 22;
    state.players[1].tokens[1].position = 22;

    let pair = legal_actions(&state, "red").into_iter().find(|a| a.is_pair_move()).expect("pair move");
    let res = move_piece(&state, "red", &pair, &mut ScriptedEntropy::new([3])).expect("move");
    assert_eq!(res.state.players[1].tokens[0].position, YARD);
    assert_eq!(res.state.players[1].tokens[1].position, YARD);
    assert_eq!(res.state.players[0].tokens[0].position, 22);
    assert_eq!(res.state.players[0].tokens[1].position, 22);
}

#[test]
fn single_on_enemy_pair_coexists() {
    let mut state = with_bank(new_match(), &[3]);
    state.players[0].tokens[0].position = 20;
    state.players[1].tokens[0].position = 23;
    state.players[1].tokens[1].position = 23;

    let action = legal_actions(&state, "red").into_iter().find(|a| a.piece_index == 0).expect("coexist move");
    let res = move_piece(&state, "red", &action, &mut ScriptedEntropy::new([1])).expect("move");
    assert_eq!(res.state.players[1].tokens[0].position, 23);
    assert_eq!(res.state.players[1].tokens[1].position, 23);
    assert!(res.bonus_triggers.is_empty());
}

#[test]
fn invincible_stack_blocks_the_landing() {
    let mut state = with_bank(new_match(), &[3]);
    state.players[0].tokens[0].position = 20;
    for t in 0..3 {
        state.players[1].tokens[t].position = 23;
    }
    assert!(legal_actions(&state, "red").iter().all(|a| a.piece_index != 0));

    // Still blocked with one of our own tokens already there.
    state.players[0].tokens[1].position = 23;
    assert!(legal_actions(&state, "red").iter().all(|a| a.piece_index != 0));
}

#[test]
fn arrow_glide_resolves_combat_at_the_head_only() {
    let mut state = with_bank(new_match(), &[2]);
    state.players[0].tokens[0].position = 2;
    state.players[1].tokens[0].position = 4;
    state.players[1].tokens[1].position = 9;

    let action = legal_actions(&state, "red")[0];
    assert_eq!((action.target, action.glide_head), (4, Some(9)));
    let res = move_piece(&state, "red", &action, &mut ScriptedEntropy::new([5, 3])).expect("move");

    assert_eq!(res.state.players[0].tokens[0].position, 9);
    assert_eq!(res.state.players[1].tokens[0].position, 4);
    assert_eq!(res.state.players[1].tokens[1].position, YARD);
    let kinds: Vec<TriggerKind> = res.bonus_triggers.iter().map(|t| t.kind).collect();
    assert_eq!(kinds, vec![TriggerKind::ArrowOuter, TriggerKind::Kill]);
    let sources: Vec<BankSource> = res.state.turn.bank.iter().map(|e| e.source).collect();
    assert_eq!(sources, vec![BankSource::ArrowBonus, BankSource::KillBonus]);
}

#[test]
fn inner_arrow_only_serves_its_color() {
    let mut state = with_bank(new_match(), &[2]);
    state.players[0].tokens[0].position = 48;
    let action = legal_actions(&state, "red")[0];
    assert_eq!(action.glide_head, Some(52));

    state.players[0].tokens[0].position = 9;
    let action = legal_actions(&state, "red")[0];
    assert_eq!((action.target, action.glide_head), (11, None));
}

#[test]
fn overshooting_lane_die_is_not_offered() {
    let mut state = with_bank(new_match(), &[5]);
    state.players[0].tokens[0].position = 55;
    state.players[0].tokens[1].position = 30;
    let actions = legal_actions(&state, "red");
    assert!(actions.iter().all(|a| a.piece_index != 0));
    assert!(actions.iter().any(|a| a.piece_index == 1));
}

#[test]
fn home_stretch_bank_is_discarded_after_move() {
    let mut state = with_bank(new_match(), &[2, 2]);
    state.players[0].tokens[0].position = 55;
    for t in 1..4 {
        state.players[0].tokens[t].position = HOME;
    }
    state.players[0].home_count = 3;

    let action = legal_actions(&state, "red")[0];
    let res = move_piece(&state, "red", &action, &mut ScriptedEntropy::new([1])).expect("move");
    assert!(res.discarded);
    assert!(res.state.turn.bank.is_empty());
    assert_eq!(res.state.turn.phase, TurnPhase::AwaitingRoll);
    assert_eq!(res.state.active_player_id, "green");
    assert_eq!(res.state.last_event.expect("event").ty, EventType::BankDiscarded);
}

#[test]
fn home_stretch_bank_is_discarded_on_roll() {
    let mut state = new_match();
    state.players[0].tokens[0].position = 56;
    for t in 1..4 {
        state.players[0].tokens[t].position = HOME;
    }
    state.players[0].home_count = 3;
    let res = roll(&state, "red", &mut ScriptedEntropy::new([4])).expect("roll");
    assert!(res.state.turn.bank.is_empty());
    assert_eq!(res.state.active_player_id, "green");
    assert_eq!(res.state.last_event.expect("event").payload["reason"], "home_stretch_exact_sum");
}

#[test]
fn yard_token_switches_off_the_exact_sum_rule() {
    let mut state = new_match();
    state.players[0].tokens[0].position = 56;
    let res = roll(&state, "red", &mut ScriptedEntropy::new([4])).expect("roll");
    assert_eq!(res.state.active_player_id, "green");
    assert_eq!(res.state.last_event.expect("event").payload["reason"], "no_legal_moves");

    state.players[0].tokens[0].position = YARD;
    state.players[0].tokens[1].position = 55;
    for t in 2..4 {
        state.players[0].tokens[t].position = HOME;
    }
    state.players[0].home_count = 2;
    let res = roll(&state, "red", &mut ScriptedEntropy::new([6, 3])).expect("roll");
    assert_eq!(res.state.active_player_id, "red");
    assert_eq!(res.state.turn.phase, TurnPhase::AwaitingMove);
    assert_eq!(res.state.turn.bank.len(), 2);
    let actions = legal_actions(&res.state, "red");
    assert!(actions.iter().any(|a| a.die_value == 6 && a.piece_index == 0 && a.target == 0));
    assert!(actions.iter().any(|a| a.die_value == 3 && a.piece_index == 1 && a.target == HOME));
}

#[test]
fn spent_entry_never_comes_back() {
    let mut state = with_bank(new_match(), &[3, 4]);
    state.players[0].tokens[0].position = 20;
    let action = legal_actions(&state, "red")[0];
    let res = move_piece(&state, "red", &action, &mut ScriptedEntropy::new([1])).expect("move");
    assert!(legal_actions(&res.state, "red").iter().all(|a| a.entry_id != action.entry_id));
    let again = move_piece(&res.state, "red", &action, &mut ScriptedEntropy::new([1])).unwrap_err();
    assert_eq!(again.code(), "stale_bank_entry");
}

#[test]
fn snapshot_round_trips() {
    let state = with_bank(new_match(), &[6, 3]);
    let blob = state.to_json().expect("encode");
    assert_eq!(MatchState::from_json(&blob).expect("decode"), state);

    let mut broken = state.clone();
    broken.players[0].home_count = 2;
    let blob = broken.to_json().expect("encode");
    assert_eq!(MatchState::from_json(&blob).unwrap_err().code(), "internal_invariant_violation");
}

#[test]
fn init_rejects_bad_seating() {
    let mut entropy = ScriptedEntropy::new([1]);
    let solo = init_match("X", vec![Player::new("a", "A", Color::Red)], RulesConfig::default(), &mut entropy);
    assert_eq!(solo.unwrap_err().code(), "invalid_action");

    let same = init_match(
        "X",
        vec![Player::new("a", "A", Color::Red), Player::new("b", "B", Color::Red)],
        RulesConfig::default(),
        &mut entropy,
    );
    assert!(same.is_err());

    let loose = RulesConfig { players_min: 0, ..RulesConfig::default() };
    let empty = init_match("X", vec![], loose, &mut entropy);
    assert_eq!(empty.unwrap_err().code(), "invalid_action");
}
