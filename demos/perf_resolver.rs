use glam::Vec2;
use std::time::Instant;
use tilestep::*;

fn main() {
    // 256x256 map with ~25% solids in a checkerboard-ish pattern.
    let (w, h) = (256i32, 256i32);
    let mut tiles = Vec::with_capacity((w * h) as usize);
    for y in 0..h {
        for x in 0..w {
            tiles.push(if (x ^ y) & 0x3 == 0 {
                TileType::Wall
            } else {
                TileType::Empty
            });
        }
    }
    let grid = TileGrid::new(16, w, h, tiles);
    let cfg = ResolverConfig::default();

    // Motion-resolution throughput.
    let n_sweeps = 100_000;
    let t0 = Instant::now();
    let mut acc = 0.0f32;
    for i in 0..n_sweeps {
        let a = (i as f32 * 0.01).sin();
        let hb = Aabb::from_corner_size(
            Vec2::new(100.0 + (i % 57) as f32, 100.0 + (i % 43) as f32),
            Vec2::new(10.0, 12.0),
        );
        let vel = Vec2::new(96.0 * a.abs() + 16.0, 32.0 * a);
        acc += resolve_motion(&grid, &hb, vel, &cfg);
    }
    let dt = t0.elapsed().as_secs_f64();
    println!(
        "resolve_motion: sweeps={} secs={:.3} throughput={:.0} sweeps/s checksum={:.3}",
        n_sweeps,
        dt,
        n_sweeps as f64 / dt,
        acc
    );

    // Contact-query throughput.
    let n_queries = 200_000;
    let t1 = Instant::now();
    let mut grounded = 0usize;
    for i in 0..n_queries {
        let hb = Aabb::from_corner_size(
            Vec2::new(64.0 + (i % 199) as f32, 64.0 + (i % 173) as f32),
            Vec2::new(10.0, 12.0),
        );
        if query_contacts(&grid, &hb, &cfg).grounded {
            grounded += 1;
        }
    }
    let dt2 = t1.elapsed().as_secs_f64();
    println!(
        "query_contacts: queries={} secs={:.3} throughput={:.0} queries/s grounded={}",
        n_queries,
        dt2,
        n_queries as f64 / dt2,
        grounded
    );
}
