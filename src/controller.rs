use glam::Vec2;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::api::TileSource;
use crate::resolver::{query_contacts, resolve_motion};
use crate::types::{Aabb, ResolverConfig};

/// Fixed simulation rate. The host calls [`step`] exactly once per frame.
pub const HZ: f32 = 60.0;
pub const DT: f32 = 1.0 / HZ;

bitflags::bitflags! {
    /// Input snapshot for one fixed step. Device handling stays with the
    /// host; the core only sees plain button state.
    #[derive(Copy, Clone, Debug, Default, PartialEq, Eq)]
    pub struct Buttons: u8 {
        const LEFT  = 1 << 0;
        const RIGHT = 1 << 1;
        const DOWN  = 1 << 2; // reserved for fast-fall
        const JUMP  = 1 << 3;
        const GRAB  = 1 << 4;
        const GLIDE = 1 << 5;
    }
}

/// Movement tuning in pixels and seconds. Values are configuration, not
/// invariants.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct PlayerParams {
    pub land_max_speed: f32,
    pub land_acceleration: f32,
    pub land_deceleration: f32,
    /// The only horizontal authority while airborne.
    pub air_correction_acceleration: f32,
    pub jump_velocity: f32,
    /// Window after takeoff in which releasing JUMP cuts the ascent.
    pub jump_stop_time: f32,
    pub jump_cut_multiplier: f32,
    pub gravity: f32,
    pub terminal_velocity: f32,
    pub glide_fall_speed: f32,
    pub wall_slide_speed: f32,
    /// Horizontal speed kicked away from the wall on a wall jump.
    pub wall_jump_kick: f32,
    pub coyote_time: f32,
    pub jump_buffer: f32,
    /// Hitbox size in pixels; must stay strictly smaller than a tile.
    pub hitbox_size: Vec2,
}

impl Default for PlayerParams {
    fn default() -> Self {
        Self {
            land_max_speed: 120.0,
            land_acceleration: 900.0,
            land_deceleration: 1400.0,
            air_correction_acceleration: 420.0,
            jump_velocity: 260.0,
            jump_stop_time: 0.2,
            jump_cut_multiplier: 0.4,
            gravity: 800.0,
            terminal_velocity: 320.0,
            glide_fall_speed: 60.0,
            wall_slide_speed: 80.0,
            wall_jump_kick: 150.0,
            coyote_time: 0.085,
            jump_buffer: 0.1,
            hitbox_size: Vec2::new(10.0, 14.0),
        }
    }
}

/// Named movement states. Transitions are guarded by contact flags, input
/// edges and timers in [`step`].
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum PlayerState {
    #[default]
    Grounded,
    Jumping,
    Falling,
    WallGrab,
    Gliding,
}

/// Simulation state for one player.
#[derive(Clone, Debug, Default)]
pub struct PlayerBody {
    /// Top-left corner of the hitbox, pixels.
    pub position: Vec2,
    /// Pixels per second.
    pub velocity: Vec2,
    pub state: PlayerState,
    coyote: f32,
    jump_buffer: f32,
    jump_hold: f32,
    jump_was_down: bool,
}

impl PlayerBody {
    /// Spawn airborne at a level's start position; the first steps settle
    /// the body onto whatever is below.
    pub fn spawn(position: Vec2) -> PlayerBody {
        PlayerBody {
            position,
            state: PlayerState::Falling,
            ..PlayerBody::default()
        }
    }

    pub fn hitbox(&self, params: &PlayerParams) -> Aabb {
        Aabb::from_corner_size(self.position, params.hitbox_size)
    }
}

/// Edge events from one step, for the host's audio/animation glue.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq)]
pub struct StepEvents {
    pub jumped: bool,
    pub landed: bool,
    pub bonked: bool,
    pub grabbed_wall: bool,
}

fn start_jump(params: &PlayerParams, body: &mut PlayerBody, ev: &mut StepEvents) {
    body.velocity.y = -params.jump_velocity;
    body.state = PlayerState::Jumping;
    body.jump_hold = 0.0;
    body.jump_buffer = 0.0;
    body.coyote = 0.0;
    ev.jumped = true;
}

/// One fixed 60Hz step: input edges, state transitions, integration through
/// the swept resolver, then post-move contact handling. Deterministic for a
/// given grid, body and input sequence.
pub fn step<T: TileSource>(
    params: &PlayerParams,
    tiles: &T,
    cfg: &ResolverConfig,
    body: &mut PlayerBody,
    buttons: Buttons,
) -> StepEvents {
    let mut ev = StepEvents::default();
    let prev_state = body.state;

    let jump_down = buttons.contains(Buttons::JUMP);
    let jump_pressed = jump_down && !body.jump_was_down;
    let jump_released = !jump_down && body.jump_was_down;
    body.jump_was_down = jump_down;

    let move_dir = (buttons.contains(Buttons::RIGHT) as i32
        - buttons.contains(Buttons::LEFT) as i32) as f32;

    let contacts = query_contacts(tiles, &body.hitbox(params), cfg);

    // Timers.
    if contacts.grounded {
        body.coyote = params.coyote_time;
    } else {
        body.coyote = (body.coyote - DT).max(0.0);
    }
    if jump_pressed {
        body.jump_buffer = params.jump_buffer;
    } else {
        body.jump_buffer = (body.jump_buffer - DT).max(0.0);
    }

    let wants_jump = body.jump_buffer > 0.0;
    let can_ground_jump = contacts.grounded || body.coyote > 0.0;

    // Horizontal control. Full authority on the ground, correction-only in
    // the air; a wall grab pins the box instead.
    if body.state != PlayerState::WallGrab {
        let (accel, decel) = if body.state == PlayerState::Grounded {
            (params.land_acceleration, params.land_deceleration)
        } else {
            (
                params.air_correction_acceleration,
                params.air_correction_acceleration,
            )
        };
        if move_dir != 0.0 {
            let turning = body.velocity.x != 0.0 && body.velocity.x.signum() != move_dir;
            let rate = if turning { decel } else { accel };
            body.velocity.x += rate * DT * move_dir;
        } else if body.state == PlayerState::Grounded {
            let braking = decel * DT;
            if body.velocity.x.abs() <= braking {
                body.velocity.x = 0.0;
            } else {
                body.velocity.x -= body.velocity.x.signum() * braking;
            }
        }
        body.velocity.x = body
            .velocity
            .x
            .clamp(-params.land_max_speed, params.land_max_speed);
    }

    match body.state {
        PlayerState::Grounded => {
            body.velocity.y = 0.0;
            if wants_jump {
                start_jump(params, body, &mut ev);
            } else if !contacts.grounded {
                // Walked off a ledge; coyote keeps the jump live briefly.
                body.state = PlayerState::Falling;
            }
        }
        PlayerState::Jumping => {
            body.jump_hold += DT;
            if jump_released && body.jump_hold < params.jump_stop_time && body.velocity.y < 0.0 {
                let cut = -params.jump_velocity * params.jump_cut_multiplier;
                if body.velocity.y < cut {
                    body.velocity.y = cut;
                }
            }
            body.velocity.y += params.gravity * DT;
            if body.velocity.y >= 0.0 {
                body.state = PlayerState::Falling;
            } else if buttons.contains(Buttons::GRAB) && contacts.touching_wall() {
                body.state = PlayerState::WallGrab;
                ev.grabbed_wall = true;
            }
        }
        PlayerState::Falling => {
            body.velocity.y = (body.velocity.y + params.gravity * DT).min(params.terminal_velocity);
            if wants_jump && can_ground_jump {
                start_jump(params, body, &mut ev);
            } else if buttons.contains(Buttons::GRAB) && contacts.touching_wall() {
                body.state = PlayerState::WallGrab;
                ev.grabbed_wall = true;
            } else if buttons.contains(Buttons::GLIDE) && body.velocity.y > 0.0 {
                body.state = PlayerState::Gliding;
            }
        }
        PlayerState::WallGrab => {
            body.velocity.x = 0.0;
            body.velocity.y =
                (body.velocity.y + params.gravity * DT).min(params.wall_slide_speed);
            if wants_jump {
                let away = -(contacts.wall_direction() as f32);
                start_jump(params, body, &mut ev);
                body.velocity.x = away * params.wall_jump_kick;
            } else if !buttons.contains(Buttons::GRAB) || !contacts.touching_wall() {
                body.state = PlayerState::Falling;
            }
        }
        PlayerState::Gliding => {
            body.velocity.y =
                (body.velocity.y + params.gravity * DT).min(params.glide_fall_speed);
            if !buttons.contains(Buttons::GLIDE) {
                body.state = PlayerState::Falling;
            }
        }
    }

    // Integrate through the resolver; it reports how much of the frame's
    // displacement is achievable, and the remainder slides along the axis
    // that was not blocked.
    let frame_disp = body.velocity * DT;
    let t = resolve_motion(tiles, &body.hitbox(params), frame_disp, cfg);
    body.position += frame_disp * t;

    if t < 1.0 {
        let after = query_contacts(tiles, &body.hitbox(params), cfg);
        let mut slide = frame_disp * (1.0 - t);
        if after.ceiling && body.velocity.y < 0.0 {
            ev.bonked = true;
        }
        if (after.grounded && body.velocity.y > 0.0) || (after.ceiling && body.velocity.y < 0.0) {
            body.velocity.y = 0.0;
            slide.y = 0.0;
        }
        if (after.wall_left && body.velocity.x < 0.0) || (after.wall_right && body.velocity.x > 0.0)
        {
            body.velocity.x = 0.0;
            slide.x = 0.0;
        }
        if slide != Vec2::ZERO {
            let t2 = resolve_motion(tiles, &body.hitbox(params), slide, cfg);
            body.position += slide * t2;
            if t2 < 1.0 {
                let pinned = query_contacts(tiles, &body.hitbox(params), cfg);
                if pinned.ceiling && body.velocity.y < 0.0 {
                    ev.bonked = true;
                }
                if (pinned.grounded && body.velocity.y > 0.0)
                    || (pinned.ceiling && body.velocity.y < 0.0)
                {
                    body.velocity.y = 0.0;
                }
                if (pinned.wall_left && body.velocity.x < 0.0)
                    || (pinned.wall_right && body.velocity.x > 0.0)
                {
                    body.velocity.x = 0.0;
                }
            }
        }
    }

    // The post-move contact set drives landing and leaving the ground.
    let post = query_contacts(tiles, &body.hitbox(params), cfg);
    match body.state {
        PlayerState::Falling | PlayerState::Gliding | PlayerState::WallGrab => {
            if post.grounded && body.velocity.y >= 0.0 {
                body.velocity.y = 0.0;
                body.state = PlayerState::Grounded;
                ev.landed = true;
            }
        }
        PlayerState::Grounded => {
            if !post.grounded {
                body.state = PlayerState::Falling;
            }
        }
        PlayerState::Jumping => {}
    }

    if body.state != prev_state {
        debug!(from = ?prev_state, to = ?body.state, "player state changed");
    }

    ev
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::grid::TileGrid;

    fn flat_level() -> TileGrid {
        TileGrid::from_ascii(
            "\
            ........\n\
            ........\n\
            ........\n\
            ........\n\
            ........\n\
            ........\n\
            ........\n\
            ########",
            16,
        )
    }

    fn walled_level() -> TileGrid {
        TileGrid::from_ascii(
            "\
            ......#.\n\
            ......#.\n\
            ......#.\n\
            ......#.\n\
            ......#.\n\
            ......#.\n\
            ......#.\n\
            ########",
            16,
        )
    }

    fn run<T: TileSource>(
        tiles: &T,
        body: &mut PlayerBody,
        frames: usize,
        script: impl Fn(usize) -> Buttons,
    ) -> Vec<StepEvents> {
        let params = PlayerParams::default();
        let cfg = ResolverConfig::default();
        (0..frames)
            .map(|f| step(&params, tiles, &cfg, body, script(f)))
            .collect()
    }

    #[test]
    fn test_spawn_settles_onto_floor() {
        let g = flat_level();
        // Floor top at y=112; 14px tall hitbox 2px above it.
        let mut body = PlayerBody::spawn(Vec2::new(20.0, 96.0));
        let events = run(&g, &mut body, 10, |_| Buttons::empty());
        assert_eq!(body.state, PlayerState::Grounded);
        assert_eq!(events.iter().filter(|e| e.landed).count(), 1);
        assert!((body.position.y + 14.0 - 112.0).abs() < 1e-3);
        assert_eq!(body.velocity.y, 0.0);
    }

    #[test]
    fn test_jump_rises_and_lands_again() {
        let g = flat_level();
        let mut body = PlayerBody::spawn(Vec2::new(20.0, 98.0));
        // Settle first.
        run(&g, &mut body, 10, |_| Buttons::empty());
        let rest_y = body.position.y;

        let events = run(&g, &mut body, 200, |f| {
            if f == 0 { Buttons::JUMP } else { Buttons::empty() }
        });
        assert_eq!(events.iter().filter(|e| e.jumped).count(), 1);
        assert!(events[0].jumped);
        assert_eq!(events.iter().filter(|e| e.landed).count(), 1);
        assert_eq!(body.state, PlayerState::Grounded);
        assert!((body.position.y - rest_y).abs() < 1e-2);
    }

    #[test]
    fn test_walk_stops_at_wall_face() {
        let g = walled_level();
        let mut body = PlayerBody::spawn(Vec2::new(20.0, 98.0));
        run(&g, &mut body, 10, |_| Buttons::empty());

        run(&g, &mut body, 120, |_| Buttons::RIGHT);
        // Wall column starts at x=96; 10px wide hitbox pressed against it.
        assert!((body.position.x + 10.0 - 96.0).abs() < 1e-2);
        assert_eq!(body.velocity.x, 0.0);
        assert_eq!(body.state, PlayerState::Grounded);
    }

    #[test]
    fn test_ceiling_bonk() {
        let g = TileGrid::from_ascii(
            "\
            ########\n\
            ........\n\
            ........\n\
            ########",
            16,
        );
        // Corridor interior y in [16, 48); rest the body on the floor.
        let mut body = PlayerBody::spawn(Vec2::new(20.0, 32.0));
        run(&g, &mut body, 10, |_| Buttons::empty());

        let events = run(&g, &mut body, 60, |f| {
            if f < 20 { Buttons::JUMP } else { Buttons::empty() }
        });
        assert_eq!(events.iter().filter(|e| e.bonked).count(), 1);
        // Never through the ceiling, and back on the floor afterwards.
        assert!(body.position.y >= 16.0 - 1e-3);
        assert_eq!(body.state, PlayerState::Grounded);
    }

    #[test]
    fn test_wall_grab_then_wall_jump() {
        let g = walled_level();
        // Flush against the wall column's left face (x=96), high up.
        let mut body = PlayerBody::spawn(Vec2::new(86.0, 30.0));

        let events = run(&g, &mut body, 5, |_| Buttons::GRAB);
        assert_eq!(body.state, PlayerState::WallGrab);
        assert_eq!(events.iter().filter(|e| e.grabbed_wall).count(), 1);
        assert!(body.velocity.y <= PlayerParams::default().wall_slide_speed);

        let events = run(&g, &mut body, 2, |_| Buttons::GRAB | Buttons::JUMP);
        assert!(events[0].jumped);
        assert_eq!(body.state, PlayerState::Jumping);
        // Kicked away from a wall on the right: leftward.
        assert!(body.velocity.x < 0.0);
        assert!(body.velocity.y < 0.0);
    }

    #[test]
    fn test_glide_caps_fall_speed() {
        let g = flat_level();
        let mut body = PlayerBody::spawn(Vec2::new(20.0, 10.0));
        run(&g, &mut body, 30, |_| Buttons::GLIDE);
        assert_eq!(body.state, PlayerState::Gliding);
        assert!(body.velocity.y <= PlayerParams::default().glide_fall_speed + 1e-4);

        // Releasing glide falls properly again.
        run(&g, &mut body, 3, |_| Buttons::empty());
        assert!(
            body.state == PlayerState::Falling || body.state == PlayerState::Grounded
        );
    }

    #[test]
    fn test_walking_off_ledge_starts_falling() {
        let g = TileGrid::from_ascii(
            "\
            ........\n\
            ........\n\
            ####....\n\
            ........\n\
            ........\n\
            ########",
            16,
        );
        // Platform top at y=32.
        let mut body = PlayerBody::spawn(Vec2::new(8.0, 16.0));
        run(&g, &mut body, 5, |_| Buttons::empty());
        assert_eq!(body.state, PlayerState::Grounded);

        let mut fell = false;
        let params = PlayerParams::default();
        let cfg = ResolverConfig::default();
        for _ in 0..200 {
            step(&params, &g, &cfg, &mut body, Buttons::RIGHT);
            if body.state == PlayerState::Falling {
                fell = true;
                break;
            }
        }
        assert!(fell);
    }

    #[test]
    fn test_scripted_run_is_deterministic() {
        let script = |f: usize| {
            let mut b = Buttons::empty();
            if f < 120 {
                b |= Buttons::RIGHT;
            }
            if f == 10 || f == 90 {
                b |= Buttons::JUMP;
            }
            if (60..80).contains(&f) {
                b |= Buttons::GLIDE;
            }
            b
        };

        let trace = |_: ()| {
            let g = walled_level();
            let params = PlayerParams::default();
            let cfg = ResolverConfig::default();
            let mut body = PlayerBody::spawn(Vec2::new(20.0, 98.0));
            let mut out = Vec::with_capacity(180);
            for f in 0..180 {
                step(&params, &g, &cfg, &mut body, script(f));
                out.push((body.position, body.velocity, body.state));
            }
            out
        };

        let a = trace(());
        let b = trace(());
        assert_eq!(a, b);

        // The run ends settled against floor or wall, inside the level.
        let (pos, _, state) = a[179];
        assert_eq!(state, PlayerState::Grounded);
        assert!(pos.x >= 0.0 && pos.x + 10.0 <= 96.0 + 1e-3);
        assert!((pos.y + 14.0 - 112.0).abs() < 1e-2);
    }
}
