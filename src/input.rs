use glam::Vec2;

/// Pressed-action set, polled once per frame by the embedder and handed to
/// `Game::update`. Key binding lives outside the simulation.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct InputState {
    pub left: bool,
    pub right: bool,
    pub up: bool,
    pub down: bool,
    /// Regular cooldown-gated shot while held.
    pub fire: bool,
    /// Hold to charge, release to loose the big piercing shot.
    pub charge: bool,
    pub smart_bomb: bool,
    pub deploy_shield: bool,
}

impl InputState {
    /// Driving direction per axis: -1, 0 or 1. Opposed keys cancel.
    pub fn drive(&self) -> Vec2 {
        let x = (self.right as i8 - self.left as i8) as f32;
        let y = (self.down as i8 - self.up as i8) as f32;
        Vec2::new(x, y)
    }
}

/// One frame of input with press/release edges resolved against the
/// previous frame.
#[derive(Debug, Clone, Copy, Default)]
pub struct InputPulse {
    pub held: InputState,
    pub fire_pressed: bool,
    pub charge_released: bool,
    pub smart_bomb_pressed: bool,
    pub shield_pressed: bool,
}

impl InputPulse {
    pub fn new(prev: InputState, now: InputState) -> Self {
        Self {
            held: now,
            fire_pressed: now.fire && !prev.fire,
            charge_released: !now.charge && prev.charge,
            smart_bomb_pressed: now.smart_bomb && !prev.smart_bomb,
            shield_pressed: now.deploy_shield && !prev.deploy_shield,
        }
    }
}
