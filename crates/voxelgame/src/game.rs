//! # Game Driver
//!
//! Owns the configuration, the client world renderer and the server, and
//! runs the client frame loop.
//!
//! ```text
//! Game::new(config)
//!   initialize()   world renderer + server thread
//!   start_game()   test object, on_load, then per frame: update, render
//!   destroy()      server shutdown, renderer teardown
//! ```

use tracing::{info, warn};
use voxelgame_core::{Position3D, Transform3D};
use voxelgame_shared::{Vec3, GAME_TITLE};

use crate::config::GameConfig;
use crate::error::{EngineError, EngineResult};
use crate::frame::{FrameClock, FrameStats};
use crate::renderer::WorldRenderer;
use crate::server::Server;

/// Where the test object is placed.
const TEST_OBJECT_POSITION: Vec3 = Vec3::new(0.0, 0.0, -2.0);

/// Top-level game object.
pub struct Game {
    config: GameConfig,
    renderer: Option<WorldRenderer>,
    server: Server,
}

impl Game {
    /// Creates an uninitialized game.
    #[must_use]
    pub fn new(config: GameConfig) -> Self {
        let server = Server::new(config.server.clone());
        Self {
            config,
            renderer: None,
            server,
        }
    }

    /// Creates the world renderer and starts the server.
    ///
    /// # Errors
    ///
    /// Renderer initialization or server start-up errors.
    pub fn initialize(&mut self) -> EngineResult<()> {
        info!(title = GAME_TITLE, "initializing game");

        self.renderer = Some(WorldRenderer::initialize()?);
        self.server.start()?;

        Ok(())
    }

    /// Runs the game: creates the test object, loads the renderer, then runs
    /// `client.frame_limit` frames at `client.target_fps`.
    ///
    /// Returns the frame timing of the run.
    ///
    /// # Errors
    ///
    /// [`EngineError::NotInitialized`] before [`Game::initialize`],
    /// otherwise the first failing load, update or render.
    pub fn start_game(&mut self) -> EngineResult<FrameStats> {
        let renderer = self.renderer.as_mut().ok_or(EngineError::NotInitialized)?;

        let transform = renderer.coordinator().signature_of::<Transform3D>();
        let test_object = renderer.create_client_entity(transform);
        if test_object.is_null() {
            warn!("could not create the test object, skipping it");
        } else {
            let ecs = renderer.coordinator_mut();
            ecs.get_component_mut::<Position3D>(test_object).0 = TEST_OBJECT_POSITION;
            *ecs.get_component_mut::<Transform3D>(test_object) = Transform3D::identity();
        }

        renderer.on_load()?;

        let mut clock = FrameClock::from_fps(self.config.client.target_fps);
        for _ in 0..self.config.client.frame_limit {
            let delta_t = clock.begin_frame();
            renderer.update(delta_t)?;
            renderer.render()?;
            clock.end_frame();
        }

        let stats = *clock.stats();
        info!(
            frames = stats.frames,
            avg_frame_ms = stats.avg_frame_ms(),
            late_frames = stats.late_frames,
            late_ratio = stats.late_ratio(),
            server_ticks = self.server.tick_count(),
            "game loop finished"
        );
        Ok(stats)
    }

    /// Shuts the server down and tears the renderer down. Safe to call more
    /// than once.
    pub fn destroy(&mut self) {
        self.server.shutdown();
        if let Some(renderer) = self.renderer.take() {
            renderer.destroy();
        }
    }

    /// The configuration.
    #[must_use]
    pub fn config(&self) -> &GameConfig {
        &self.config
    }

    /// The world renderer, once initialized.
    #[must_use]
    pub fn renderer(&self) -> Option<&WorldRenderer> {
        self.renderer.as_ref()
    }

    /// The server.
    #[must_use]
    pub fn server(&self) -> &Server {
        &self.server
    }
}

impl Drop for Game {
    fn drop(&mut self) {
        self.destroy();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{ClientConfig, ServerConfig};

    fn quick_config() -> GameConfig {
        GameConfig {
            server: ServerConfig {
                tick_interval_ms: 5,
                join_timeout_ms: 2000,
            },
            client: ClientConfig {
                frame_limit: 3,
                target_fps: 500,
            },
            ..GameConfig::default()
        }
    }

    #[test]
    fn test_start_before_initialize_fails() {
        let mut game = Game::new(quick_config());
        assert!(matches!(game.start_game(), Err(EngineError::NotInitialized)));
    }

    #[test]
    fn test_full_run() {
        let mut game = Game::new(quick_config());
        game.initialize().unwrap();
        assert!(game.server().is_running());

        let stats = game.start_game().unwrap();
        assert_eq!(stats.frames, 3);

        let instances = game.renderer().unwrap().render_system().unwrap().instances();
        assert_eq!(instances.len(), 1);
        assert_eq!(instances[0].position, TEST_OBJECT_POSITION);
        assert_eq!(instances[0].scale, Vec3::ONE);

        game.destroy();
        assert!(!game.server().is_running());
        assert!(game.renderer().is_none());
        game.destroy();
    }
}
