pub mod emitters;
pub mod error;
pub mod generator;
pub mod keywords;
pub mod type_mapper;

pub use error::GeneratorError;
pub use generator::CSharpGenerator;
