pub mod random;
pub mod resource_location;

pub use resource_location::ResourceLocation;
