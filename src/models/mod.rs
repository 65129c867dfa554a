mod family;

pub use family::ModelFamily;
