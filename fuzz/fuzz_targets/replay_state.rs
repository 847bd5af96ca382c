#![no_main]

use libfuzzer_sys::fuzz_target;
use okr_core::{AppState, Dataset, UiEvent};

const IDS: [&str; 5] = ["OBJ-1", "OBJ-2", "OBJ-3", "KR-3", "KR-404"];

fuzz_target!(|data: &[u8]| {
    let Ok(mut state) = AppState::new(Dataset::sample()) else {
        return;
    };
    for chunk in data.chunks(3) {
        let [op, id, ts] = [chunk[0], *chunk.get(1).unwrap_or(&0), *chunk.get(2).unwrap_or(&0)];
        let id = IDS[usize::from(id) % IDS.len()];
        let ts = i64::from(ts);
        let event = match op % 3 {
            0 => UiEvent::objective_click(id, ts),
            1 => UiEvent::open_kr_click(id, ts),
            _ => UiEvent::close_drawer(ts),
        };
        state.apply(&event);

        // Exactly one known objective stays active.
        assert!(state.dataset().objective(state.active_objective_id()).is_some());
        if let Some(kr_id) = state.drawer().open_kr_id() {
            assert!(state.dataset().key_result(kr_id).is_some());
        }
    }
});
