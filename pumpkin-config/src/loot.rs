use serde::{Deserialize, Serialize};

#[derive(Deserialize, Serialize, Clone, Debug)]
#[serde(default)]
pub struct LootConfig {
    /// Reject loot parameters that the table's parameter set does not allow.
    /// Vanilla keeps them around, so this is off by default.
    pub strict_context_params: bool,
    /// Resolve item ids that were never registered to a plain item stacking to 64.
    pub implicit_items: bool,
    /// Max stack size of implicitly created items.
    pub implicit_max_stack_size: u8,
    /// Salt mixed into every random sequence seed.
    pub random_sequence_salt: i32,
    pub include_world_seed: bool,
    pub include_sequence_id: bool,
}

impl Default for LootConfig {
    fn default() -> Self {
        Self {
            strict_context_params: false,
            implicit_items: true,
            implicit_max_stack_size: 64,
            random_sequence_salt: 0,
            include_world_seed: true,
            include_sequence_id: true,
        }
    }
}

impl LootConfig {
    pub fn validate(&self) {
        assert!(
            self.implicit_max_stack_size >= 1 && self.implicit_max_stack_size <= 99,
            "Implicit max stack size must be between 1 and 99"
        );
    }
}
