//! Property tests for the alive partition and capacity bound.

use particle_fx::prelude::*;
use proptest::prelude::*;

/// Operations applied directly to a store.
#[derive(Debug, Clone)]
enum Op {
    Wake(usize),
    Kill(usize),
    Clear,
}

fn op() -> impl Strategy<Value = Op> {
    prop_oneof![
        4 => any::<usize>().prop_map(Op::Wake),
        4 => any::<usize>().prop_map(Op::Kill),
        1 => Just(Op::Clear),
    ]
}

fn assert_partition(data: &ParticleData) -> Result<(), TestCaseError> {
    prop_assert!(data.alive_count() <= data.capacity());
    let live = (0..data.alive_count()).filter(|&i| data.is_alive(i)).count();
    prop_assert_eq!(live, data.alive_count());
    Ok(())
}

fn system(capacity: usize, rate: f32, min_life: f32, max_life: f32, seed: u64) -> ParticleSystem {
    ParticleSystem::new(capacity)
        .unwrap()
        .with_emitter(
            ParticleEmitter::new(rate)
                .with_seed(seed)
                .with_generator(BasicTimeGen::new(min_life, max_life).unwrap())
                .with_generator(BasicVelGen::new(Vec4::splat(-1.0), Vec4::splat(1.0)).unwrap()),
        )
        .with_updater(BasicTimeUpdater)
        .with_updater(EulerUpdater::new(Vec4::new(0.0, -9.8, 0.0, 0.0)))
        .with_updater(FloorUpdater::default())
}

proptest! {
    #[test]
    fn test_partition_holds_under_wake_and_kill(
        capacity in 1usize..64,
        ops in prop::collection::vec(op(), 0..200)
    ) {
        let mut data = ParticleData::new(capacity).unwrap();
        for op in ops {
            match op {
                Op::Wake(i) => {
                    let free = data.capacity() - data.alive_count();
                    if free > 0 {
                        data.wake(data.alive_count() + i % free);
                    }
                }
                Op::Kill(i) => {
                    if data.alive_count() > 0 {
                        data.kill(i % data.alive_count());
                    }
                }
                Op::Clear => data.clear(),
            }
            assert_partition(&data)?;
        }
    }

    #[test]
    fn test_partition_and_capacity_hold_under_update(
        capacity in 1usize..256,
        rate in 0.0f32..100_000.0,
        min_life in 0.0f32..1.0,
        extra_life in 0.0f32..2.0,
        seed in any::<u64>(),
        steps in prop::collection::vec(0.0f64..0.5, 1..40)
    ) {
        let mut system = system(capacity, rate, min_life, min_life + extra_life, seed);
        for dt in steps {
            system.update(dt);
            prop_assert!(system.num_alive_particles() <= system.num_all_particles());
            assert_partition(system.data())?;
            let ratio = system.alive_to_all_ratio();
            prop_assert!((0.0..=1.0).contains(&ratio));
        }
    }

    #[test]
    fn test_live_particles_have_non_negative_life(
        rate in 0.0f32..5_000.0,
        seed in any::<u64>(),
        steps in 1usize..60
    ) {
        let mut system = system(512, rate, 0.0, 0.5, seed);
        for _ in 0..steps {
            system.update(1.0 / 60.0);
            let data = system.data();
            for t in &data.times()[..data.alive_count()] {
                prop_assert!(t.x >= 0.0);
            }
        }
    }
}
