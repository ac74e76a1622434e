//! Game Runtime
//!
//! Per-frame loop glue: players read their devices and move, fired bullets
//! enter the world, bullets age and despawn, then the world camera follows
//! every player. Drawing is a separate step so the host can skip it.

use crate::asset::AssetTable;
use crate::config::GameConfig;
use crate::error::Result;
use crate::input::{Action, InputDevice};
use crate::rasterizer::{Color, Vec2, Window};
use super::entity::Entity;
use super::player::{FrameContext, Player};
use super::world::World;

/// Colour of level geometry
const SOLID_COLOR: Color = Color::new(92, 84, 112);

/// Colour of the pivot-to-muzzle overlay
const AIM_LINE_COLOR: Color = Color::new(255, 64, 64);

/// Counters for one simulated frame
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct FrameStats {
    pub players: usize,
    pub bullets: usize,
    pub fired: usize,
    pub despawned: usize,
}

pub struct Runtime {
    config: GameConfig,
    assets: AssetTable,
    pub world: World,
    pub window: Window,
    paused: bool,
    next_player_id: usize,
}

impl Runtime {
    /// Build the window and spawn one player per input device, up to
    /// `player.max_players`.
    pub fn new(config: GameConfig, assets: AssetTable, devices: usize) -> Result<Self> {
        config.validate()?;
        assets.validate()?;

        let resolution = (config.display.width, config.display.height);
        let window = Window::new(resolution, config.camera)?;
        let mut runtime = Self {
            config,
            assets,
            world: World::new(),
            window,
            paused: false,
            next_player_id: 0,
        };
        for device in 0..devices {
            runtime.add_player(device)?;
        }
        Ok(runtime)
    }

    pub fn config(&self) -> &GameConfig {
        &self.config
    }

    pub fn is_paused(&self) -> bool {
        self.paused
    }

    /// Spawn a player driven by `device`. Returns `None` once the player cap
    /// is reached.
    pub fn add_player(&mut self, device: usize) -> Result<Option<Entity>> {
        let count = self.world.player_count();
        if count >= self.config.player.max_players {
            tracing::info!(device, max = self.config.player.max_players, "player cap reached, device ignored");
            return Ok(None);
        }

        let spawns = &self.config.arena.spawn_points;
        let spawn = spawns.get(count % spawns.len().max(1)).copied().unwrap_or(Vec2::ZERO);
        let id = self.next_player_id;
        let player = Player::new(
            id,
            device,
            spawn,
            &self.config.player,
            &self.config.weapon,
            &self.config.bullet,
            &self.assets,
        )?;
        self.next_player_id += 1;

        let entity = self.world.spawn_player(player);
        tracing::info!(player = id, device, x = spawn.x, y = spawn.y, "player joined");
        self.retarget_camera();
        Ok(Some(entity))
    }

    /// Hot-plugged devices each get a player
    pub fn add_devices(&mut self, devices: &[usize]) -> Result<()> {
        for &device in devices {
            self.add_player(device)?;
        }
        Ok(())
    }

    /// One player: follow it. Several: zoom to fit them all.
    fn retarget_camera(&mut self) {
        let camera = self.window.world_mut();
        match self.world.player_entities() {
            [] => camera.untrack(),
            [one] => camera.track(*one, Vec2::ZERO),
            many => camera.track_many(many, Vec2::ZERO),
        }
    }

    /// Simulate one frame
    pub fn frame(&mut self, dt: f32, devices: &[InputDevice]) -> Result<FrameStats> {
        if devices.iter().any(|d| d.action_pressed(Action::Pause)) {
            self.paused = !self.paused;
            tracing::info!(paused = self.paused, "pause toggled");
        }

        let mut stats = FrameStats::default();
        if self.paused {
            stats.players = self.world.player_count();
            stats.bullets = self.world.bullet_count();
            return Ok(stats);
        }

        let ctx = FrameContext {
            dt,
            solids: &self.config.arena.solids,
            view: self.window.world().view(),
            cursor_speed: self.config.input.cursor_speed,
            assets: &self.assets,
        };

        let mut fired = Vec::new();
        let ids = self.world.player_entities().to_vec();
        for id in ids {
            let Some(player) = self.world.player_mut(id) else { continue };
            let Some(device) = devices.get(player.device) else { continue };
            if let Some(bullet) = player.update(device, &ctx)? {
                tracing::debug!(player = player.id, heading = bullet.heading, "fired");
                fired.push(bullet);
            }
        }
        stats.fired = fired.len();
        for bullet in fired {
            self.world.spawn_bullet(bullet);
        }

        self.world.update_bullets(dt, &self.config.arena.solids);
        stats.despawned = self.world.flush_despawns();

        let world = &self.world;
        self.window.update(|entity| world.rect_of(entity));

        stats.players = self.world.player_count();
        stats.bullets = self.world.bullet_count();
        Ok(stats)
    }

    /// Submit everything and rasterize both cameras. Returns the number of
    /// sprites drawn.
    pub fn draw(&mut self) -> usize {
        let (world_camera, foreground) = self.window.cameras_mut();
        for solid in &self.config.arena.solids {
            world_camera.queue_rect(*solid, SOLID_COLOR);
        }
        for (_, player) in self.world.players.iter() {
            player.submit(world_camera, foreground);
            if self.config.display.aim_lines {
                let weapon = &player.weapon;
                world_camera.queue_line(weapon.transform, weapon.muzzle_position(), AIM_LINE_COLOR);
            }
        }
        for (_, bullet) in self.world.bullets.iter() {
            world_camera.submit(&bullet.body.sprite);
        }

        let drawn = self.window.draw_world(self.config.display.clear_color);
        drawn + self.window.draw_foreground()
    }

    /// Change the physical resolution. The world camera keeps its zoom and
    /// shows more or less of the arena.
    pub fn resize(&mut self, width: usize, height: usize) -> Result<()> {
        self.window.resize((width, height))?;
        self.config.display.width = width;
        self.config.display.height = height;
        tracing::info!(width, height, "resized");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::input::{Controls, DeviceState, Key, Mouse};

    fn runtime(devices: usize) -> Runtime {
        let mut config = GameConfig::default();
        config.display.width = 320;
        config.display.height = 180;
        config.camera.scale = 2.0;
        Runtime::new(config, AssetTable::placeholder(), devices).unwrap()
    }

    fn keyboard(keys: &[Key], mouse: &[Mouse]) -> DeviceState {
        DeviceState {
            keys: keys.iter().copied().collect(),
            mouse: mouse.iter().copied().collect(),
            pointer: Vec2::new(300.0, 90.0),
            ..DeviceState::default()
        }
    }

    #[test]
    fn test_one_player_per_device_up_to_cap() {
        let mut rt = runtime(1);
        assert_eq!(rt.world.player_count(), 1);

        for device in 1..10 {
            rt.add_player(device).unwrap();
        }
        assert_eq!(rt.world.player_count(), rt.config().player.max_players);
        assert!(rt.add_player(99).unwrap().is_none());
    }

    #[test]
    fn test_frame_moves_player() {
        let mut rt = runtime(1);
        let id = rt.world.player_entities()[0];
        let start = rt.world.player(id).unwrap().rect().position();

        let mut kb = InputDevice::keyboard(Controls::keyboard());
        kb.update(keyboard(&[Key::D], &[]));
        rt.frame(0.1, std::slice::from_ref(&kb)).unwrap();

        let now = rt.world.player(id).unwrap().rect().position();
        assert!(now.x > start.x);
        assert_eq!(now.y, start.y);
    }

    #[test]
    fn test_fired_bullets_enter_world_and_expire() {
        let mut rt = runtime(1);
        let mut kb = InputDevice::keyboard(Controls::keyboard());

        kb.update(keyboard(&[], &[Mouse::Left]));
        let stats = rt.frame(0.016, std::slice::from_ref(&kb)).unwrap();
        assert_eq!(stats.fired, 1);
        assert_eq!(stats.bullets, 1);

        // Held: single-shot weapon does not fire again
        kb.update(keyboard(&[], &[Mouse::Left]));
        let stats = rt.frame(0.016, std::slice::from_ref(&kb)).unwrap();
        assert_eq!(stats.fired, 0);

        let mut despawned = 0;
        for _ in 0..200 {
            kb.update(keyboard(&[], &[]));
            despawned += rt.frame(0.016, std::slice::from_ref(&kb)).unwrap().despawned;
        }
        assert_eq!(despawned, 1);
        assert_eq!(rt.world.bullet_count(), 0);
    }

    #[test]
    fn test_pause_freezes_simulation() {
        let mut rt = runtime(1);
        let id = rt.world.player_entities()[0];
        let mut kb = InputDevice::keyboard(Controls::keyboard());

        kb.update(keyboard(&[Key::Escape], &[]));
        rt.frame(0.1, std::slice::from_ref(&kb)).unwrap();
        assert!(rt.is_paused());

        let frozen = rt.world.player(id).unwrap().rect();
        kb.update(keyboard(&[Key::D], &[]));
        rt.frame(0.1, std::slice::from_ref(&kb)).unwrap();
        assert_eq!(rt.world.player(id).unwrap().rect(), frozen);

        kb.update(keyboard(&[Key::Escape], &[]));
        rt.frame(0.1, std::slice::from_ref(&kb)).unwrap();
        assert!(!rt.is_paused());
    }

    #[test]
    fn test_draw_submits_players_and_cursor() {
        let mut rt = runtime(1);
        let kb = InputDevice::keyboard(Controls::keyboard());
        rt.frame(0.016, std::slice::from_ref(&kb)).unwrap();
        // Player and weapon in the world, cursor in the foreground
        assert_eq!(rt.draw(), 3);
        assert_eq!(rt.window.world().queued(), 0);
    }

    #[test]
    fn test_aim_lines_overlay() {
        let mut config = GameConfig::default();
        config.display.width = 320;
        config.display.height = 180;
        config.camera.scale = 2.0;
        config.display.aim_lines = true;
        let mut rt = Runtime::new(config, AssetTable::placeholder(), 1).unwrap();
        let kb = InputDevice::keyboard(Controls::keyboard());
        rt.frame(0.016, std::slice::from_ref(&kb)).unwrap();
        rt.draw();

        let id = rt.world.player_entities()[0];
        let weapon = &rt.world.player(id).unwrap().weapon;
        let scroll = rt.window.world().scroll();
        let pixel = |p: Vec2| {
            let at = p - scroll;
            rt.window.world().surface().get_pixel(at.x.floor() as usize, at.y.floor() as usize)
        };
        assert_eq!(pixel(weapon.transform), AIM_LINE_COLOR);
        assert_eq!(pixel(weapon.muzzle_position()), AIM_LINE_COLOR);

        // Off by default
        let mut rt = runtime(1);
        rt.frame(0.016, std::slice::from_ref(&kb)).unwrap();
        rt.draw();
        let id = rt.world.player_entities()[0];
        let weapon = &rt.world.player(id).unwrap().weapon;
        let at = weapon.transform - rt.window.world().scroll();
        let color = rt.window.world().surface().get_pixel(at.x.floor() as usize, at.y.floor() as usize);
        assert_ne!(color, AIM_LINE_COLOR);
    }

    #[test]
    fn test_resize_keeps_zoom_and_config_in_step() {
        let mut rt = runtime(1);
        rt.resize(640, 360).unwrap();
        assert_eq!(rt.window.resolution(), (640, 360));
        assert_eq!(rt.window.world().screen_size(), Vec2::new(320.0, 180.0));
        assert_eq!((rt.config().display.width, rt.config().display.height), (640, 360));

        let kb = InputDevice::keyboard(Controls::keyboard());
        rt.frame(0.016, std::slice::from_ref(&kb)).unwrap();
        assert_eq!(rt.draw(), 3);
        assert!(rt.resize(0, 360).is_err());
    }

    #[test]
    fn test_missing_devices_are_skipped() {
        let mut rt = runtime(2);
        let kb = InputDevice::keyboard(Controls::keyboard());
        let stats = rt.frame(0.016, std::slice::from_ref(&kb)).unwrap();
        assert_eq!(stats.players, 2);
    }
}
