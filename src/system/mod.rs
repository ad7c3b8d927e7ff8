pub mod frequency;
pub mod measure;
pub mod sampler;
pub mod topology;
