pub mod bio_material;
pub mod characteristic;
pub mod design;
pub mod experiment;
pub mod factor;
pub mod file;
pub mod ids;
pub mod measurement;
pub mod names;
