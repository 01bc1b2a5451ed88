use tilestep::controller::{step, Buttons, PlayerBody, PlayerParams};
use tilestep::*;

fn main() {
    let level = LevelMap::from_ascii(
        "\
        ....................\n\
        ....................\n\
        ....................\n\
        ....................\n\
        .P................X.\n\
        ..................X.\n\
        ..................X.\n\
        .....~~~..........X.\n\
        ####################",
        16,
    );

    let params = PlayerParams::default();
    let cfg = ResolverConfig::default();
    let mut body = PlayerBody::spawn(level.player_start);

    // Scripted input: run right, jump the lava strip, glide over it, keep
    // running to the exit.
    let script = |f: usize| {
        let mut b = Buttons::RIGHT;
        if f == 35 {
            b |= Buttons::JUMP;
        }
        if (45..120).contains(&f) {
            b |= Buttons::GLIDE;
        }
        b
    };

    for frame in 0..400 {
        let ev = step(&params, &level.grid, &cfg, &mut body, script(frame));
        if ev.jumped || ev.landed || ev.bonked || ev.grabbed_wall {
            println!(
                "frame {frame:3}: pos=({:7.2},{:7.2}) state={:?}{}{}{}{}",
                body.position.x,
                body.position.y,
                body.state,
                if ev.jumped { " jumped" } else { "" },
                if ev.landed { " landed" } else { "" },
                if ev.bonked { " bonked" } else { "" },
                if ev.grabbed_wall { " grabbed" } else { "" },
            );
        }
        if level.hazard_overlap(&body.hitbox(&params)) {
            println!("frame {frame:3}: burned in lava at {:?}", body.position);
            return;
        }
        if level.at_exit(&body.hitbox(&params)) {
            println!("frame {frame:3}: reached the exit at {:?}", body.position);
            return;
        }
    }

    let contacts = query_contacts(&level.grid, &body.hitbox(&params), &cfg);
    println!(
        "done: pos=({:.2},{:.2}) vel=({:.2},{:.2}) state={:?} contacts={contacts:?}",
        body.position.x, body.position.y, body.velocity.x, body.velocity.y, body.state
    );
}
