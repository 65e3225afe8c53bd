//! FlightView: maps a `core::FlightSnapshot` into a terminal framebuffer.
//!
//! This module is pure (no I/O). It can be unit-tested.
//!
//! Draw order, back to front: sky, stars, clouds, ground, trees, rocket and
//! exhaust (or the explosion), HUD.

use crate::core::rocket::{sprite_for, EXPLOSION_SPRITE};
use crate::core::scenery::{is_star_at, PropKind, Scenery};
use crate::core::FlightSnapshot;
use crate::fb::{CellStyle, FrameBuffer, Rgb};
use crate::types::EXHAUST_THRESHOLD;

/// Terminal viewport dimensions.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Viewport {
    pub width: u16,
    pub height: u16,
}

impl Viewport {
    pub fn new(width: u16, height: u16) -> Self {
        Self { width, height }
    }
}

/// World-to-screen offset: the focus point sits in the middle of the viewport.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Camera {
    pub left: i32,
    pub top: i32,
}

impl Camera {
    pub fn centred_on((x, y): (i32, i32), viewport: Viewport) -> Self {
        Self {
            left: x.saturating_sub(viewport.width as i32 / 2),
            top: y.saturating_sub(viewport.height as i32 / 2),
        }
    }

    pub fn to_screen(&self, x: i32, y: i32) -> (i32, i32) {
        (x.saturating_sub(self.left), y.saturating_sub(self.top))
    }

    pub fn to_world(&self, sx: i32, sy: i32) -> (i32, i32) {
        (sx.saturating_add(self.left), sy.saturating_add(self.top))
    }
}

/// Atmospheric layer boundaries in km.
pub const TROPOSPHERE_TOP_KM: f64 = 12.0;
pub const STRATOSPHERE_TOP_KM: f64 = 50.0;
pub const MESOSPHERE_TOP_KM: f64 = 85.0;

/// Sky colour for the rocket's altitude.
///
/// Light blue darkens through the troposphere, deep blue fades to indigo in
/// the stratosphere, dark purple fades out through the mesosphere, and above
/// that it is black.
pub fn sky_color(altitude_km: f64) -> Rgb {
    let km = if altitude_km.is_finite() { altitude_km.max(0.0) } else { 0.0 };
    if km < TROPOSPHERE_TOP_KM {
        let blue = (255.0 - km * 50.0).clamp(100.0, 255.0);
        Rgb::new(100, 100, blue as u8)
    } else if km < STRATOSPHERE_TOP_KM {
        let progress = (km - TROPOSPHERE_TOP_KM) / (STRATOSPHERE_TOP_KM - TROPOSPHERE_TOP_KM);
        let blue = 100.0 - progress * 50.0;
        Rgb::new(0, 0, (blue + 50.0) as u8)
    } else if km < MESOSPHERE_TOP_KM {
        let progress = (km - STRATOSPHERE_TOP_KM) / (MESOSPHERE_TOP_KM - STRATOSPHERE_TOP_KM);
        let val = (50.0 - progress * 50.0).max(0.0);
        Rgb::new((val / 2.0) as u8, 0, val as u8)
    } else {
        Rgb::BLACK
    }
}

const ROCKET_FG: Rgb = Rgb::new(255, 255, 255);
const STAR_FG: Rgb = Rgb::new(255, 230, 90);
const CLOUD_FG: Rgb = Rgb::new(235, 235, 235);
const TREE_FG: Rgb = Rgb::new(60, 180, 75);
const GROUND_FG: Rgb = Rgb::new(60, 180, 75);
const SOIL_BG: Rgb = Rgb::new(40, 28, 16);
const SIDE_FLAME_FG: Rgb = Rgb::new(90, 140, 255);
const MAIN_FLAME_FG: Rgb = Rgb::new(255, 80, 50);
const EXPLOSION_FG: Rgb = Rgb::new(255, 70, 40);
const STAGE_FG: Rgb = Rgb::new(255, 220, 60);
const HUD_FG: Rgb = Rgb::new(255, 255, 255);
const BANNER_FG: Rgb = Rgb::new(200, 80, 220);

/// Width reserved for the stats block at the right edge.
const STATS_WIDTH: u16 = 25;

const COSMIC_BANNER: &str = "COSMIC SPEED!";

/// Terminal view of the flight.
#[derive(Debug, Clone, Copy, Default)]
pub struct FlightView;

impl FlightView {
    pub fn new() -> Self {
        Self
    }

    /// Render a frame into an existing framebuffer.
    ///
    /// Callers can reuse a framebuffer across frames; it is only resized when
    /// the viewport changes.
    pub fn render_into(
        &self,
        snap: &FlightSnapshot<'_>,
        scenery: &Scenery,
        viewport: Viewport,
        fb: &mut FrameBuffer,
    ) {
        fb.resize(viewport.width, viewport.height);
        let camera = Camera::centred_on(snap.focus(), viewport);
        let sky = sky_color(snap.altitude_km());
        fb.clear(CellStyle::new(HUD_FG, sky).into_cell(' '));

        if snap.altitude_km() >= TROPOSPHERE_TOP_KM {
            self.draw_stars(fb, &camera, snap.ground_level, viewport);
        }

        let (w, h) = (viewport.width as i32, viewport.height as i32);
        for prop in scenery.visible(camera.left, camera.top, w, h) {
            if prop.kind == PropKind::Cloud {
                let (sx, sy) = camera.to_screen(prop.x, prop.y);
                fb.put_sprite(sx, sy, prop.kind.sprite(), CLOUD_FG);
            }
        }

        self.draw_ground(fb, &camera, snap.ground_level, viewport);

        for prop in scenery.visible(camera.left, camera.top, w, h) {
            if prop.kind == PropKind::Tree {
                let (sx, sy) = camera.to_screen(prop.x, prop.y);
                fb.put_sprite(sx, sy, prop.kind.sprite(), TREE_FG);
            }
        }

        match snap.explosion {
            Some(explosion) => {
                let (sx, sy) = camera.to_screen(explosion.x, explosion.y);
                fb.put_sprite(sx, sy, &EXPLOSION_SPRITE[..], EXPLOSION_FG);
            }
            None => {
                let sprite = sprite_for(snap.stage);
                let (sx, sy) = camera.to_screen(snap.rocket.x, snap.rocket.y);
                fb.put_sprite(sx, sy, sprite.as_slice(), ROCKET_FG);
                self.draw_exhaust(fb, snap, sx, sy, &sprite);
            }
        }

        self.draw_hud(fb, snap, viewport);
    }

    /// Convenience helper that allocates a new framebuffer.
    pub fn render(
        &self,
        snap: &FlightSnapshot<'_>,
        scenery: &Scenery,
        viewport: Viewport,
    ) -> FrameBuffer {
        let mut fb = FrameBuffer::new(viewport.width, viewport.height);
        self.render_into(snap, scenery, viewport, &mut fb);
        fb
    }

    fn draw_stars(&self, fb: &mut FrameBuffer, camera: &Camera, ground: i32, vp: Viewport) {
        for sy in 0..vp.height as i32 {
            for sx in 0..vp.width as i32 {
                let (wx, wy) = camera.to_world(sx, sy);
                if wy < ground && is_star_at(wx, wy) {
                    fb.overlay_char(sx, sy, '*', STAR_FG);
                }
            }
        }
    }

    fn draw_ground(&self, fb: &mut FrameBuffer, camera: &Camera, ground: i32, vp: Viewport) {
        let (_, ground_row) = camera.to_screen(0, ground);
        if ground_row >= vp.height as i32 {
            return;
        }
        let surface = CellStyle::new(GROUND_FG, SOIL_BG).into_cell('=');
        let soil = CellStyle::new(SOIL_BG, SOIL_BG).into_cell(' ');
        for sy in ground_row.max(0)..vp.height as i32 {
            let cell = if sy == ground_row { surface } else { soil };
            for sx in 0..vp.width as i32 {
                fb.set_clipped(sx, sy, cell);
            }
        }
    }

    /// Side flames at one and two thirds of the hull height, main-engine
    /// flames under (or reverse flames over) the hull.
    fn draw_exhaust(
        &self,
        fb: &mut FrameBuffer,
        snap: &FlightSnapshot<'_>,
        sx: i32,
        sy: i32,
        sprite: &[&str],
    ) {
        let width = sprite.iter().map(|r| r.chars().count()).max().unwrap_or(0) as i32;
        let height = sprite.len() as i32;
        let rocket = &snap.rocket;

        let side = if rocket.thrust_x > EXHAUST_THRESHOLD {
            Some(("=>", sx - 2))
        } else if rocket.thrust_x < -EXHAUST_THRESHOLD {
            Some(("<=", sx + width))
        } else {
            None
        };
        if let Some((flame, x)) = side {
            for y in [sy + height / 3, sy + 2 * height / 3] {
                put_flame(fb, x, y, flame, SIDE_FLAME_FG);
            }
        }

        let main = if rocket.thrust_y > snap.hover_thrust + EXHAUST_THRESHOLD {
            Some(("vv", sy + height, MAIN_FLAME_FG))
        } else if rocket.thrust_y < snap.hover_thrust - EXHAUST_THRESHOLD {
            Some(("^^", sy - 1, SIDE_FLAME_FG))
        } else {
            None
        };
        if let Some((flame, y, fg)) = main {
            put_flame(fb, sx + width / 3, y, flame, fg);
            put_flame(fb, sx + 2 * width / 3 - 2, y, flame, fg);
        }
    }

    fn draw_hud(&self, fb: &mut FrameBuffer, snap: &FlightSnapshot<'_>, vp: Viewport) {
        let sky = sky_color(snap.altitude_km());
        let label = CellStyle::new(STAGE_FG, sky).bold();
        let text = CellStyle::new(HUD_FG, Rgb::BLACK);

        fb.put_fmt(1, 1, format_args!("Stage:{}", snap.stage.name), label);
        if snap.crashes > 0 {
            fb.put_fmt(1, 2, format_args!("Crashes: {}", snap.crashes), text);
        }

        let rocket = &snap.rocket;
        let v_dir = if rocket.vy < 0.0 {
            "▲"
        } else if rocket.vy > 0.0 {
            "▼"
        } else {
            ""
        };
        let h_dir = if rocket.vx > 0.0 {
            "►"
        } else if rocket.vx < 0.0 {
            "◄"
        } else {
            ""
        };

        let x = vp.width.saturating_sub(STATS_WIDTH);
        let mut y = 1;
        fb.put_fmt(x, y, format_args!("Altitude: {:.2} km", snap.altitude_km()), text);
        y += 1;
        fb.put_fmt(x, y, format_args!("Vspeed: {:.2} {}", rocket.vy.abs(), v_dir), text);
        y += 1;
        fb.put_fmt(x, y, format_args!("Hspeed: {:.2} {}", rocket.vx.abs(), h_dir), text);
        y += 1;
        fb.put_fmt(
            x,
            y,
            format_args!("Thrust: V={:.2} H={:.2}", rocket.thrust_y, rocket.thrust_x),
            text,
        );
        y += 1;
        fb.put_fmt(
            x,
            y,
            format_args!("Fuel: {:.0} ({:.0}%)", rocket.fuel, snap.fuel_ratio() * 100.0),
            text,
        );
        y += 1;
        fb.put_fmt(x, y, format_args!("Gravity: {:.2}", snap.gravity), text);
        y += 1;
        if snap.in_space {
            fb.put_str(x, y, "*** SPACE ***", text.bold());
        }

        if snap.cosmic_speed {
            self.draw_banner(fb, vp, COSMIC_BANNER);
        }
    }

    /// Boxed message in the top-right corner.
    fn draw_banner(&self, fb: &mut FrameBuffer, vp: Viewport, message: &str) {
        let box_w = message.chars().count() as u16 + 4;
        let x0 = vp.width.saturating_sub(box_w);
        let style = CellStyle::new(BANNER_FG, Rgb::BLACK).bold();

        for dx in 0..box_w {
            let edge = if dx == 0 || dx + 1 == box_w { '+' } else { '-' };
            fb.put_char(x0 + dx, 0, edge, style);
            fb.put_char(x0 + dx, 2, edge, style);
        }
        fb.fill_rect(x0, 1, box_w, 1, ' ', style);
        fb.put_char(x0, 1, '|', style);
        fb.put_str(x0 + 2, 1, message, style);
        fb.put_char(x0 + box_w - 1, 1, '|', style);
    }
}

fn put_flame(fb: &mut FrameBuffer, x: i32, y: i32, flame: &str, fg: Rgb) {
    for (i, ch) in flame.chars().enumerate() {
        fb.overlay_char(x + i as i32, y, ch, fg);
    }
}
