use serde::Serialize;

/// The celebration runs for 3 seconds, one burst every 250 ms.
pub const CELEBRATION_DURATION_MS: u32 = 3_000;
pub const CELEBRATION_TICK_MS: u32 = 250;

/// Platform-appropriate random number in [0, 1).
/// Uses js_sys::Math::random() in WASM builds, rand crate natively.
fn random_f64() -> f64 {
    #[cfg(target_arch = "wasm32")]
    {
        js_sys::Math::random()
    }
    #[cfg(not(target_arch = "wasm32"))]
    {
        use rand::Rng;
        rand::thread_rng().gen::<f64>()
    }
}

/// Parameters for one confetti burst. Serialized camelCase so the snapshot
/// can be handed straight to the canvas-confetti renderer:
/// `{ particleCount, spread, origin: { x, y } }`.
#[derive(Clone, Serialize, Debug)]
#[serde(rename_all = "camelCase")]
pub struct Burst {
    pub particle_count: u32,
    pub spread: u32,
    pub origin: Origin,
}

#[derive(Clone, Serialize, Debug)]
pub struct Origin {
    pub x: f64,
    pub y: f64,
}

impl Burst {
    /// A burst somewhere in the upper half of the viewport.
    fn random() -> Burst {
        Burst {
            particle_count: 50,
            spread: 70,
            origin: Origin {
                x: random_f64(),
                y: random_f64() * 0.5,
            },
        }
    }
}

/// The win celebration as a fixed tick schedule: 12 bursts, then done.
/// Whatever timer drives it owns cancellation; dropping the schedule
/// mid-run is how a reset or a fresh win cuts a celebration short.
#[derive(Clone, Debug)]
pub struct Celebration {
    remaining_ticks: u32,
}

impl Celebration {
    pub fn start() -> Self {
        Celebration {
            remaining_ticks: CELEBRATION_DURATION_MS / CELEBRATION_TICK_MS,
        }
    }

    /// The next burst, or None once the schedule is exhausted. The driving
    /// timer clears itself on None.
    pub fn tick(&mut self) -> Option<Burst> {
        if self.remaining_ticks == 0 {
            return None;
        }
        self.remaining_ticks -= 1;
        Some(Burst::random())
    }

    pub fn is_finished(&self) -> bool {
        self.remaining_ticks == 0
    }
}
