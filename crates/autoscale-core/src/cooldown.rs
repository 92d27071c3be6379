//! Cooldown / admission controller (4.F).
//!
//! Pure except for logging: it neither reads nor writes state. Callers
//! pass in the already-loaded `PersistedState` and the current time.

use crate::types::{DenialReason, InstanceSnapshot, PersistedState};

/// Outcome of an admission check, including the cooldown that was
/// actually applied so the orchestrator can log it without
/// re-deriving the direction/overload logic.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Admission {
    pub admit: bool,
    pub selected_cooldown_minutes: u32,
    pub scale_out: bool,
}

/// Evaluate whether a non-trivial suggested size may be acted upon now.
pub fn evaluate(
    snapshot: &InstanceSnapshot,
    suggested_size: i64,
    state: &PersistedState,
    now_ms: i64,
) -> Admission {
    let scale_out = suggested_size > snapshot.current_size;

    let selected_cooldown_minutes = if snapshot.is_overloaded {
        snapshot.overload_cooling_minutes.unwrap_or_else(|| {
            tracing::debug!(
                instance = %snapshot.key(),
                "overloaded with no overload cooldown configured, defaulting to scale-out cooldown"
            );
            snapshot.scale_out_cooling_minutes
        })
    } else if scale_out {
        snapshot.scale_out_cooling_minutes
    } else {
        snapshot.scale_in_cooling_minutes
    };

    let reference = state.cooldown_reference();
    let admit = if reference == 0 {
        true
    } else {
        let elapsed_ms = now_ms - reference;
        elapsed_ms >= i64::from(selected_cooldown_minutes) * 60_000
    };

    if !admit {
        tracing::debug!(
            instance = %snapshot.key(),
            selected_cooldown_minutes,
            reference,
            now_ms,
            "denying resize: within cooldown window"
        );
    }

    Admission {
        admit,
        selected_cooldown_minutes,
        scale_out,
    }
}

impl Admission {
    pub fn denial_reason(&self) -> Option<DenialReason> {
        (!self.admit).then_some(DenialReason::WithinCooldown)
    }
}
