//! # VoxelGame
//!
//! The main game crate: engine glue around the ECS core.
//!
//! ## Architecture
//!
//! ```text
//! ┌──────────────────────────────── Game ─────────────────────────────────┐
//! │                                                                       │
//! │  main thread                          "server" thread                 │
//! │  ┌─────────────────────────┐          ┌─────────────────────────┐     │
//! │  │ WorldRenderer           │          │ World                   │     │
//! │  │  Coordinator            │          │  Coordinator            │     │
//! │  │  local IDs [1, 4M)      │          │  shared IDs [4M, ~4G)   │     │
//! │  │  RenderSystem           │          │                         │     │
//! │  └─────────────────────────┘          └─────────────────────────┘     │
//! │         frame loop                         tick loop                  │
//! └───────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Modules
//!
//! - `config`: TOML configuration
//! - `error`: Engine and config errors
//! - `frame`: Frame and tick pacing
//! - `game`: Game driver
//! - `logging`: Subscriber setup
//! - `renderer`: Client world renderer and render system
//! - `server`: Server thread and start/stop handshake
//! - `world`: Server world

pub mod config;
pub mod error;
pub mod frame;
pub mod game;
pub mod logging;
pub mod renderer;
pub mod server;
pub mod world;

// Re-export the ECS core
pub use voxelgame_core as ecs;

// Re-export commonly used types
pub use config::{ClientConfig, GameConfig, LogConfig, ServerConfig};
pub use error::{ConfigError, EngineError, EngineResult};
pub use frame::{FrameClock, FrameStats};
pub use game::Game;
pub use logging::init_logging;
pub use renderer::{RenderInstance, RenderSystem, WorldRenderer};
pub use server::Server;
pub use world::World;
