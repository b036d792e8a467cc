//! Side-scrolling arcade defense simulation core.
//!
//! The crate owns the entity layer: player physics, enemy steering AI,
//! the capture/rescue state machine, collision resolution, wave pacing
//! and the smoothed look-ahead camera. Rendering, audio and UI live in
//! the embedder; they consume [`Game::build_scene`], [`Game::drain_events`]
//! and the query accessors, and feed [`Game::update`] an [`InputState`]
//! once per frame.

pub mod app;
pub mod camera;
pub mod ecs;
pub mod events;
pub mod game;
pub mod geom;
pub mod input;
pub mod particles;
pub mod scene;
pub mod shield;
pub mod spatial;
pub mod terrain;
pub mod wave;

pub use ecs::components::{EnemyKind, PlayerState};
pub use events::GameEvent;
pub use game::{Game, GameConfig, GameStatus};
pub use input::InputState;
pub use scene::{MinimapBlip, SpriteInstance};
