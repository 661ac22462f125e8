use std::{collections::HashMap, sync::Arc};

use parking_lot::Mutex;
use pumpkin_config::advanced_config;
use pumpkin_util::{
    ResourceLocation,
    random::{RandomGenerator, get_seed, legacy_rand::LegacyRand, seed::Seed128, xoroshiro128::Xoroshiro},
};

use crate::loot::registry::LootDataResolver;

/// A random shared between evaluations. Locked per draw, never for a whole evaluation.
pub type SharedRandom = Arc<Mutex<RandomGenerator>>;

/// Named random streams that stay stable across evaluations of the same table.
pub struct RandomSequences {
    world_seed: i64,
    salt: i32,
    include_world_seed: bool,
    include_sequence_id: bool,
    sequences: Mutex<HashMap<ResourceLocation, SharedRandom>>,
}

impl RandomSequences {
    pub fn new(world_seed: i64, salt: i32, include_world_seed: bool, include_sequence_id: bool) -> Self {
        Self {
            world_seed,
            salt,
            include_world_seed,
            include_sequence_id,
            sequences: Mutex::new(HashMap::new()),
        }
    }

    fn create(&self, id: &ResourceLocation) -> RandomGenerator {
        let world_seed = if self.include_world_seed { self.world_seed } else { 0 };
        let seed = Seed128::upgrade_unmixed((world_seed ^ i64::from(self.salt)) as u64);
        let seed = if self.include_sequence_id {
            seed.xor(Seed128::from_hash_of(&id.to_string()))
        } else {
            seed
        };
        RandomGenerator::Xoroshiro(Xoroshiro::from_seed128(seed.mixed()))
    }

    /// The sequence for `id`, created on first use. Each sequence has its own lock.
    pub fn get(&self, id: &ResourceLocation) -> SharedRandom {
        self.sequences
            .lock()
            .entry(id.clone())
            .or_insert_with(|| Arc::new(Mutex::new(self.create(id))))
            .clone()
    }

    pub fn reset(&self, id: &ResourceLocation) {
        self.sequences.lock().remove(id);
    }

    pub fn len(&self) -> usize {
        self.sequences.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// The world state loot evaluation reads from.
pub struct Level {
    seed: i64,
    day_time: i64,
    raining: bool,
    thundering: bool,
    random: SharedRandom,
    random_sequences: RandomSequences,
    data: Arc<dyn LootDataResolver>,
}

impl Level {
    pub fn new(seed: i64, data: Arc<dyn LootDataResolver>) -> Self {
        let config = &advanced_config().loot;
        Self {
            seed,
            day_time: 0,
            raining: false,
            thundering: false,
            random: Arc::new(Mutex::new(RandomGenerator::Legacy(LegacyRand::from_seed(
                get_seed(),
            )))),
            random_sequences: RandomSequences::new(
                seed,
                config.random_sequence_salt,
                config.include_world_seed,
                config.include_sequence_id,
            ),
            data,
        }
    }

    pub fn with_random(mut self, random: RandomGenerator) -> Self {
        self.random = Arc::new(Mutex::new(random));
        self
    }

    pub fn with_day_time(mut self, day_time: i64) -> Self {
        self.day_time = day_time;
        self
    }

    pub fn with_weather(mut self, raining: bool, thundering: bool) -> Self {
        self.raining = raining;
        self.thundering = thundering;
        self
    }

    pub fn seed(&self) -> i64 {
        self.seed
    }

    pub fn day_time(&self) -> i64 {
        self.day_time
    }

    pub fn is_raining(&self) -> bool {
        self.raining
    }

    pub fn is_thundering(&self) -> bool {
        self.thundering
    }

    pub fn data(&self) -> &dyn LootDataResolver {
        self.data.as_ref()
    }

    /// The level's ambient random, used when nothing more specific is available.
    pub fn random(&self) -> SharedRandom {
        self.random.clone()
    }

    pub fn random_sequence(&self, id: &ResourceLocation) -> SharedRandom {
        self.random_sequences.get(id)
    }

    pub fn random_sequences(&self) -> &RandomSequences {
        &self.random_sequences
    }
}
