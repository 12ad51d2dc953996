//! Runs a canned collide-and-release scenario against a single tracked/proxy
//! pair and prints per-tick telemetry plus the final world hash. Handy for
//! eyeballing the mode machine and for pinning determinism across builds.

use anyhow::{Context, Result, bail};
use clap::{ArgAction, Parser};
use tetherphys_core::{iso, quat_identity, vec3, Hand};
use tetherphys_feedback::RecordingHaptics;
use tetherphys_follow::{FollowParams, GrabInput, GrabSource};
use tetherphys_viz::{DebugSettings, RecordingGhost};
use tetherphys_world::World;

#[derive(Parser, Debug)]
#[command(name="scenario", version, about="Canned collide-and-release run with per-tick telemetry and a final state hash")]
struct Opts {
    /// Physics rate in Hz
    #[arg(long, default_value_t = 90)]
    hz: u32,

    /// Total steps to run
    #[arg(long, default_value_t = 180)]
    steps: u32,

    /// Step at which the obstruction begins
    #[arg(long, default_value_t = 30)]
    hit: u32,

    /// Step at which the obstruction clears
    #[arg(long, default_value_t = 120)]
    clear: u32,

    /// Grab source name ("LeftHandAnchor" / "RightHandAnchor"); omit to run ungrabbed
    #[arg(long)]
    grab: Option<String>,

    /// Lateral hand speed while obstructed (m/s)
    #[arg(long, default_value_t = 0.9)]
    drag_speed: f32,

    /// Print one line per tick (default prints every 10th)
    #[arg(long, action=ArgAction::SetTrue)]
    verbose: bool,

    /// Emit per-tick JSONL ledgers under out/
    #[arg(long, action=ArgAction::SetTrue)]
    json: bool,
}

fn main() -> Result<()> {
    let opts = Opts::parse();
    if opts.hz == 0 {
        bail!("--hz must be positive");
    }
    if opts.clear <= opts.hit {
        bail!("--clear must come after --hit");
    }
    let dt = 1.0 / opts.hz as f32;

    let mut w = World::new();
    let id = w.add_avatar(iso(vec3(0.0, 1.2, 0.0), quat_identity()), 1.0, FollowParams::default());
    w.set_debug(DebugSettings {
        json_every: if opts.json { 1 } else { 0 },
        ..DebugSettings::default()
    });

    if let Some(ref name) = opts.grab {
        Hand::from_source_name(name)
            .with_context(|| format!("grab source {name:?} names neither hand"))?;
        w.set_grab(id, GrabInput {
            grabbed: true,
            source: Some(GrabSource { name: name.clone(), pose: w.tracked_pose(id) }),
        });
    }

    let mut haptics = RecordingHaptics::new();
    let mut ghosts = RecordingGhost::default();

    for step in 0..opts.steps {
        if step == opts.hit {
            w.contact_begin(id, w.avatar_pose(id).pos + vec3(0.05, 0.0, 0.0));
        }
        if step > opts.hit && step < opts.clear {
            let mut t = w.tracked_pose(id);
            t.pos += vec3(opts.drag_speed * dt, 0.0, 0.0);
            w.set_tracked_pose(id, t);
            w.contact_persist(id);
        }
        if step == opts.clear {
            w.contact_end(id);
        }

        w.poll_with(&mut haptics);
        w.step_with(dt, &mut haptics, &mut ghosts);

        if opts.verbose || step % 10 == 0 {
            let gap = (w.avatar_pose(id).pos - w.tracked_pose(id).pos).length();
            let rumble = opts.grab.as_deref()
                .and_then(Hand::from_source_name)
                .and_then(|h| haptics.last_for(h))
                .map(|(_, a)| a)
                .unwrap_or(0.0);
            println!(
                "tick {:4}  t={:6.3}s  mode={:<11?}  gap={:.4}m  rumble={:.3}  ghost={}",
                w.tick_index(), w.time(),
                w.mode_of(id).context("no decision recorded")?,
                gap, rumble, w.ghost_visible(id),
            );
        }
    }

    println!("ghost toggles: {:?}", ghosts.toggles);
    println!("final hash: {:02x?}", w.step_hash());
    Ok(())
}
