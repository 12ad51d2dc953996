use tetherphys_world::*;
use tetherphys_core::{vec3, iso, quat_identity};
use tetherphys_follow::{FollowParams, GrabInput, GrabSource};

fn main() {
    let mut w = World::new();
    let id = w.add_avatar(iso(vec3(0.0, 1.2, 0.0), quat_identity()), 1.0, FollowParams::default());

    // Grab with the right hand, then script a short obstruction.
    w.set_grab(id, GrabInput {
        grabbed: true,
        source: Some(GrabSource {
            name: "RightHandAnchor".to_string(),
            pose: iso(vec3(0.0, 1.15, 0.05), quat_identity()),
        }),
    });

    let dt = 1.0 / 90.0;
    for step in 0..90 {
        if step == 10 {
            w.contact_begin(id, w.avatar_pose(id).pos + vec3(0.05, 0.0, 0.0));
        }
        if step > 10 && step < 40 {
            // Hand keeps moving through the wall while the proxy is held back.
            let mut t = w.tracked_pose(id);
            t.pos += vec3(0.01, 0.0, 0.0);
            w.set_tracked_pose(id, t);
            w.contact_persist(id);
        }
        if step == 40 {
            w.contact_end(id);
        }
        w.poll();
        let stats = w.step(dt);
        let hash = w.step_hash();
        println!("step {step:02}  mode={:?}  colliding={}  hash={:02x?}",
                 w.mode_of(id).unwrap(), stats.colliding, &hash[..4]);
    }
}
