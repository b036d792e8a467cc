//! Frame events for external collaborators (audio triggers, HUD, shop).
//! Fire-and-forget: the simulation pushes, the embedder drains once per
//! frame and never replies.

use crate::ecs::components::EnemyKind;

#[derive(Debug, Clone, PartialEq)]
pub enum GameEvent {
    PlayerFired { charged: bool },
    ChargeReady,
    PlayerDamaged { amount: f32 },
    PlayerKilled,
    PlayerRespawned,
    EnemyDestroyed { kind: EnemyKind, reward: u64 },
    HumanoidCaptured,
    /// Captor destroyed mid-carry; the humanoid is falling.
    HumanoidDropped,
    /// Carried above the capture altitude and converted into a mutant.
    HumanoidConverted,
    /// Caught by the player mid-fall.
    HumanoidCaught,
    /// Returned to the ground; score and currency granted.
    HumanoidRescued { reward: u64 },
    HumanoidKilled,
    WaveStarted { wave: u32 },
    WaveCleared { wave: u32, bonus: u64 },
    SmartBombDetonated { destroyed: u32 },
    ShieldDeployed,
    ShieldDepleted,
    GameOver,
}

/// Per-frame event buffer.
#[derive(Debug, Default)]
pub struct EventQueue {
    events: Vec<GameEvent>,
}

impl EventQueue {
    pub fn new() -> Self {
        Self { events: Vec::with_capacity(32) }
    }

    pub fn push(&mut self, event: GameEvent) {
        self.events.push(event);
    }

    /// Hand the accumulated events to the embedder, leaving the buffer empty.
    pub fn take(&mut self) -> Vec<GameEvent> {
        std::mem::take(&mut self.events)
    }

    pub fn is_empty(&self) -> bool {
        self.events.is_empty()
    }

    /// Test helper: how many events match the predicate.
    pub fn count(&self, pred: impl Fn(&GameEvent) -> bool) -> usize {
        self.events.iter().filter(|e| pred(e)).count()
    }
}
