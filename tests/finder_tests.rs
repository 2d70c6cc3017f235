mod common;

use chrono::Utc;
use uuid::Uuid;

use common::{at, profile, World};
use ember_match::models::{Block, Decision, Gender, SwipeDecision, UserState};
use ember_match::services::{BlockStorage, SwipeStorage};

/// One candidate failing each filter rule, one passing all of them.
#[test]
fn test_every_exclusion_rule_applies() {
    let world = World::new();
    let seeker = at(profile("Ana", Gender::Woman, &[Gender::Man]), 52.52, 13.405);
    world.users.insert(seeker.clone());

    let mut paused = profile("Paused", Gender::Man, &[Gender::Woman]);
    paused.state = UserState::Paused;

    // Ana is not in his interested-in set
    let not_interested = profile("NotInterested", Gender::Man, &[Gender::Man]);

    // A woman; not in Ana's interested-in set
    let wrong_gender = profile("WrongGender", Gender::Woman, &[Gender::Woman]);

    let mut age_mismatch = profile("AgeMismatch", Gender::Man, &[Gender::Woman]);
    age_mismatch.min_age = 45;
    age_mismatch.max_age = 60;

    // Hamburg is past his 50 km limit even though Ana would travel further
    let mut too_far = at(
        profile("TooFar", Gender::Man, &[Gender::Woman]),
        53.5511,
        9.9937,
    );
    too_far.max_distance_km = 50;

    let already_liked = profile("Liked", Gender::Man, &[Gender::Woman]);
    let already_passed = profile("Passed", Gender::Man, &[Gender::Woman]);
    let blocked = profile("Blocked", Gender::Man, &[Gender::Woman]);
    let eligible = profile("Eligible", Gender::Man, &[Gender::Woman]);

    for user in [
        &paused,
        &not_interested,
        &wrong_gender,
        &age_mismatch,
        &too_far,
        &already_liked,
        &already_passed,
        &blocked,
        &eligible,
    ] {
        world.users.insert((*user).clone());
    }

    world.swipes.record(SwipeDecision {
        from: seeker.id,
        to: already_liked.id,
        decision: Decision::Like,
        created_at: Utc::now(),
    });
    world.swipes.record(SwipeDecision {
        from: seeker.id,
        to: already_passed.id,
        decision: Decision::Pass,
        created_at: Utc::now(),
    });
    world.blocks.record(Block {
        user_a: blocked.id,
        user_b: seeker.id,
        created_at: Utc::now(),
    });

    let found: Vec<Uuid> = world
        .finder()
        .find_candidates(&seeker)
        .iter()
        .map(|u| u.id)
        .collect();
    assert_eq!(found, vec![eligible.id]);
}

#[test]
fn test_seeker_never_sees_themselves() {
    let world = World::new();
    // Interested in their own gender, so the self-check is what excludes them
    let seeker = profile("Ana", Gender::Woman, &[Gender::Woman]);
    world.users.insert(seeker.clone());

    assert!(world.finder().find_candidates(&seeker).is_empty());
}

#[test]
fn test_ineligible_seeker_yields_empty_not_error() {
    let world = World::new();
    // No interested-in set at all
    let seeker = profile("Ana", Gender::Woman, &[]);
    let candidate = profile("Ben", Gender::Man, &[Gender::Woman]);
    world.users.insert(seeker.clone());
    world.users.insert(candidate);

    assert!(world.finder().find_candidates(&seeker).is_empty());
}
