#![no_main]

//! Wire request fuzzer.
//!
//! Arbitrary bytes are parsed as JSON action requests. Whatever parses must
//! be answered without panicking, and a rejected request must hand back the
//! unchanged snapshot.

use elementa::{respond, ActionRequest, GameSoa, GameState};
use libfuzzer_sys::fuzz_target;

fuzz_target!(|data: &[u8]| {
    let Ok(request) = serde_json::from_slice::<ActionRequest>(data) else {
        return;
    };

    let mut state = GameState::initial(data.len() as u64);
    let before = GameSoa::from(&state);
    for player in 0..2 {
        let response = respond(&mut state, player, &request);
        if !response.ok {
            assert_eq!(response.game_soa, before);
        } else {
            break;
        }
    }
});
